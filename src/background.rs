//! Background of the scene: the star field and the scene lighting.

use std::f32::consts::TAU;

use bevy::prelude::*;
use rand::Rng;

use crate::motion::{STAR_SIZE_MAX, STAR_SIZE_MIN};
use crate::planets::hex_color;
use crate::sun::SUN_POSITION;
use crate::types::SceneEntity;

/// Number of stars on a desktop-class device.
pub const STAR_COUNT: usize = 8000;

/// World units of star radius per unit of star size.
pub const STAR_SCALE: f32 = 0.35;

/// Inner radius and depth of the spherical shell the stars live in.
const SHELL_INNER: f32 = 800.0;
const SHELL_DEPTH: f32 = 1200.0;
/// Shell center is pushed back so most stars sit behind the planets.
const SHELL_Z_SHIFT: f32 = -300.0;

/// Dim violet fill so the night sides of planets never go fully black.
pub const AMBIENT_COLOR: u32 = 0x606080;
pub const AMBIENT_BRIGHTNESS: f32 = 150.0;

/// Root of the star field; rotating it turns every star.
#[derive(Component, Clone, Copy, Debug, Default)]
pub struct StarField;

/// One star and its current point size.
#[derive(Component, Clone, Copy, Debug)]
pub struct Star {
    /// Size in `[1, 6]`; the transform scale is `size * STAR_SCALE`.
    pub size: f32,
}

/// Spectral class of a star, chosen per star at generation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum StarClass {
    /// Hot blue-white, about 3% of stars.
    BlueWhite,
    /// Warm yellow-orange, about 3% of stars.
    Warm,
    White,
}

impl StarClass {
    fn pick(roll: f32) -> Self {
        if roll > 0.97 {
            StarClass::BlueWhite
        } else if roll > 0.94 {
            StarClass::Warm
        } else {
            StarClass::White
        }
    }

    fn color(self) -> Color {
        match self {
            StarClass::BlueWhite => Color::srgb(0.7, 0.8, 1.0),
            StarClass::Warm => Color::srgb(1.0, 0.9, 0.7),
            StarClass::White => Color::srgb(0.9, 0.9, 0.95),
        }
    }
}

/// Random point in the star shell.
pub fn star_position(rng: &mut impl Rng) -> Vec3 {
    let radius = SHELL_INNER + rng.random::<f32>() * SHELL_DEPTH;
    let theta = rng.random::<f32>() * TAU;
    let phi = (rng.random::<f32>() * 2.0 - 1.0).acos();

    Vec3::new(
        radius * phi.sin() * theta.cos(),
        radius * phi.sin() * theta.sin(),
        radius * phi.cos() + SHELL_Z_SHIFT,
    )
}

/// Spawn the star field with `count` stars. Returns the field root.
pub fn spawn_starfield(
    commands: &mut Commands,
    meshes: &mut Assets<Mesh>,
    materials: &mut Assets<StandardMaterial>,
    rng: &mut impl Rng,
    count: usize,
) -> Entity {
    let star_mesh = meshes.add(Sphere::new(1.0).mesh().uv(8, 6));

    let class_material = |materials: &mut Assets<StandardMaterial>, class: StarClass| {
        let color = class.color();
        materials.add(StandardMaterial {
            base_color: color,
            emissive: color.to_linear() * 0.95,
            unlit: true,
            ..default()
        })
    };
    let blue_white = class_material(materials, StarClass::BlueWhite);
    let warm = class_material(materials, StarClass::Warm);
    let white = class_material(materials, StarClass::White);

    let field = commands
        .spawn((SceneEntity, StarField, Transform::default(), Visibility::default()))
        .id();

    let mut stars = Vec::with_capacity(count);
    for _ in 0..count {
        let material = match StarClass::pick(rng.random()) {
            StarClass::BlueWhite => blue_white.clone(),
            StarClass::Warm => warm.clone(),
            StarClass::White => white.clone(),
        };
        let size = rng.random_range(STAR_SIZE_MIN..STAR_SIZE_MAX);

        let star = commands
            .spawn((
                SceneEntity,
                Star { size },
                Mesh3d(star_mesh.clone()),
                MeshMaterial3d(material),
                Transform::from_translation(star_position(rng))
                    .with_scale(Vec3::splat(size * STAR_SCALE)),
            ))
            .id();
        stars.push(star);
    }
    commands.entity(field).add_children(&stars);

    info!("Spawned {} background stars", count);
    field
}

/// Ambient fill used while the scene is mounted.
pub fn scene_ambient_light() -> GlobalAmbientLight {
    GlobalAmbientLight {
        color: hex_color(AMBIENT_COLOR),
        brightness: AMBIENT_BRIGHTNESS,
        ..default()
    }
}

/// Set up the scene lights: ambient fill, a warm point light at the sun and
/// a cool back light.
pub fn spawn_lighting(commands: &mut Commands) {
    commands.insert_resource(scene_ambient_light());

    commands.spawn((
        SceneEntity,
        PointLight {
            color: Color::srgb_u8(0xff, 0xff, 0xee),
            intensity: 4.0e9,
            range: 2500.0,
            shadows_enabled: false,
            ..default()
        },
        Transform::from_translation(SUN_POSITION),
    ));

    commands.spawn((
        SceneEntity,
        DirectionalLight {
            color: Color::srgb_u8(0x44, 0x88, 0xff),
            illuminance: 1500.0,
            shadows_enabled: false,
            ..default()
        },
        Transform::from_xyz(-500.0, 200.0, -500.0).looking_at(Vec3::ZERO, Vec3::Y),
    ));

    debug!("Scene lighting initialized");
}
