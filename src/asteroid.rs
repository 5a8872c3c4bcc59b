//! Asteroid belt: irregular rocks drifting and tumbling in a wide ring.
//!
//! Asteroids carry no physics. Each one has a constant drift velocity and
//! angular velocity; the motion systems reflect them back inward when they
//! leave the belt bounds.

use std::f32::consts::TAU;

use bevy::mesh::VertexAttributeValues;
use bevy::prelude::*;
use rand::Rng;

use crate::types::{SceneEntity, SceneError};

/// Number of asteroids on a desktop-class device.
pub const ASTEROID_COUNT: usize = 40;

const SIZE_MIN: f32 = 8.0;
const SIZE_RANGE: f32 = 20.0;
const BELT_INNER: f32 = 400.0;
const BELT_WIDTH: f32 = 300.0;
const BELT_HALF_HEIGHT: f32 = 100.0;
/// Largest drift speed per axis per frame.
const DRIFT_MAX: f32 = 0.05;
/// Largest tumble rate per axis per frame.
const TUMBLE_MAX: f32 = 0.01;
/// Fractional radial jitter applied to each rock vertex.
const ROCK_JITTER: f32 = 0.3;

/// Drift and tumble state of one asteroid.
#[derive(Component, Clone, Copy, Debug)]
pub struct Asteroid {
    /// Translation per frame.
    pub velocity: Vec3,
    /// Rotation per frame around the local x, y and z axes.
    pub angular_velocity: Vec3,
    pub size: f32,
}

impl Asteroid {
    /// Roll a new asteroid and its starting position in the belt.
    pub fn generate(rng: &mut impl Rng) -> (Self, Vec3) {
        let angle = rng.random::<f32>() * TAU;
        let radius = BELT_INNER + rng.random::<f32>() * BELT_WIDTH;
        let position = Vec3::new(
            angle.cos() * radius,
            rng.random_range(-BELT_HALF_HEIGHT..BELT_HALF_HEIGHT),
            angle.sin() * radius,
        );

        let mut symmetric = |max: f32| {
            Vec3::new(
                rng.random_range(-max..max),
                rng.random_range(-max..max),
                rng.random_range(-max..max),
            )
        };
        let velocity = symmetric(DRIFT_MAX);
        let angular_velocity = symmetric(TUMBLE_MAX);
        let size = SIZE_MIN + rng.random::<f32>() * SIZE_RANGE;

        (
            Self {
                velocity,
                angular_velocity,
                size,
            },
            position,
        )
    }
}

/// Build an irregular rock: a subdivided icosphere with every vertex pushed
/// radially by up to `ROCK_JITTER` of the radius, shaded flat.
pub fn rock_mesh(size: f32, rng: &mut impl Rng) -> Result<Mesh, SceneError> {
    let mut mesh = Sphere::new(size)
        .mesh()
        .ico(1)
        .map_err(|e| SceneError::MeshBuild {
            what: "asteroid",
            reason: e.to_string(),
        })?;

    match mesh.attribute_mut(Mesh::ATTRIBUTE_POSITION) {
        Some(VertexAttributeValues::Float32x3(positions)) => {
            for position in positions.iter_mut() {
                let scale = 1.0 + rng.random_range(-ROCK_JITTER..ROCK_JITTER);
                for component in position.iter_mut() {
                    *component *= scale;
                }
            }
        }
        _ => {
            return Err(SceneError::MeshBuild {
                what: "asteroid",
                reason: "icosphere has no float3 positions".to_string(),
            });
        }
    }

    // Split shared vertices so every face gets its own normal
    mesh.duplicate_vertices();
    mesh.compute_flat_normals();
    Ok(mesh)
}

/// Spawn `count` asteroids sharing one rock material.
pub fn spawn_asteroids(
    commands: &mut Commands,
    meshes: &mut Assets<Mesh>,
    materials: &mut Assets<StandardMaterial>,
    rng: &mut impl Rng,
    count: usize,
) -> Result<Vec<Entity>, SceneError> {
    let material = materials.add(StandardMaterial {
        base_color: Color::srgb_u8(0x66, 0x66, 0x66),
        perceptual_roughness: 0.9,
        metallic: 0.1,
        ..default()
    });

    let mut spawned = Vec::with_capacity(count);
    for _ in 0..count {
        let (asteroid, position) = Asteroid::generate(rng);
        let mesh = meshes.add(rock_mesh(asteroid.size, rng)?);
        let entity = commands
            .spawn((
                SceneEntity,
                Mesh3d(mesh),
                MeshMaterial3d(material.clone()),
                Transform::from_translation(position),
                asteroid,
            ))
            .id();
        spawned.push(entity);
    }

    info!("Spawned {} asteroids", spawned.len());
    Ok(spawned)
}
