//! Spacecraft fleet: three squads of small glowing craft crossing the scene.

use bevy::prelude::*;
use rand::Rng;

use crate::types::SceneEntity;

/// Number of spacecraft on a desktop-class device.
pub const FLEET_COUNT: usize = 12;

/// Half-extent of the cube craft are spawned in.
const SPAWN_EXTENT: f32 = 600.0;
const SPEED_MIN: f32 = 0.6;
const SPEED_MAX: f32 = 1.4;
const TUMBLE_MAX: f32 = 0.005;
const HULL_RADIUS: f32 = 4.0;
const HULL_LENGTH: f32 = 14.0;

/// Squad a craft belongs to; decides its hull color.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Squad {
    Cyan,
    Magenta,
    Amber,
}

impl Squad {
    pub const ALL: [Squad; 3] = [Squad::Cyan, Squad::Magenta, Squad::Amber];

    /// Squad for the n-th craft; squads are assigned round-robin.
    pub fn for_index(index: usize) -> Self {
        Self::ALL[index % Self::ALL.len()]
    }

    pub fn color(self) -> Color {
        match self {
            Squad::Cyan => Color::srgb_u8(0x00, 0xe5, 0xff),
            Squad::Magenta => Color::srgb_u8(0xff, 0x2d, 0xd4),
            Squad::Amber => Color::srgb_u8(0xff, 0xb3, 0x00),
        }
    }
}

/// Travel and tumble state of one craft.
#[derive(Component, Clone, Copy, Debug)]
pub struct Spacecraft {
    /// Translation per frame.
    pub velocity: Vec3,
    /// Rotation per frame around the local x, y and z axes.
    pub angular_velocity: Vec3,
    pub squad: Squad,
}

impl Spacecraft {
    /// Roll a craft for `squad` and its starting position.
    pub fn generate(squad: Squad, rng: &mut impl Rng) -> (Self, Vec3) {
        let position = Vec3::new(
            rng.random_range(-SPAWN_EXTENT..SPAWN_EXTENT),
            rng.random_range(-SPAWN_EXTENT..SPAWN_EXTENT),
            rng.random_range(-SPAWN_EXTENT..SPAWN_EXTENT),
        );

        let heading = Vec3::new(
            rng.random_range(-1.0..1.0),
            rng.random_range(-1.0..1.0),
            rng.random_range(-1.0..1.0),
        )
        .try_normalize()
        .unwrap_or(Vec3::X);
        let speed = rng.random_range(SPEED_MIN..SPEED_MAX);

        let angular_velocity = Vec3::new(
            rng.random_range(-TUMBLE_MAX..TUMBLE_MAX),
            rng.random_range(-TUMBLE_MAX..TUMBLE_MAX),
            rng.random_range(-TUMBLE_MAX..TUMBLE_MAX),
        );

        (
            Self {
                velocity: heading * speed,
                angular_velocity,
                squad,
            },
            position,
        )
    }
}

/// Hull orientation with the nose (cone tip, +Y) along `velocity`.
pub fn heading_rotation(velocity: Vec3) -> Quat {
    Quat::from_rotation_arc(Vec3::Y, velocity.normalize_or(Vec3::Y))
}

/// Spawn `count` craft with one shared hull mesh and a material per squad.
pub fn spawn_fleet(
    commands: &mut Commands,
    meshes: &mut Assets<Mesh>,
    materials: &mut Assets<StandardMaterial>,
    rng: &mut impl Rng,
    count: usize,
) -> Vec<Entity> {
    let hull = meshes.add(Cone::new(HULL_RADIUS, HULL_LENGTH));
    let squad_materials: Vec<(Squad, Handle<StandardMaterial>)> = Squad::ALL
        .iter()
        .map(|&squad| {
            let color = squad.color();
            let material = materials.add(StandardMaterial {
                base_color: color,
                emissive: color.to_linear() * 0.8,
                metallic: 0.6,
                perceptual_roughness: 0.3,
                ..default()
            });
            (squad, material)
        })
        .collect();

    let mut spawned = Vec::with_capacity(count);
    for index in 0..count {
        let squad = Squad::for_index(index);
        let (craft, position) = Spacecraft::generate(squad, rng);
        let material = squad_materials
            .iter()
            .find(|(s, _)| *s == squad)
            .map(|(_, m)| m.clone())
            .unwrap_or_default();

        let rotation = heading_rotation(craft.velocity);
        let entity = commands
            .spawn((
                SceneEntity,
                Mesh3d(hull.clone()),
                MeshMaterial3d(material),
                Transform::from_translation(position).with_rotation(rotation),
                craft,
            ))
            .id();
        spawned.push(entity);
    }

    info!("Spawned {} spacecraft", spawned.len());
    spawned
}
