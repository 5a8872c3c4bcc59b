//! Particle bursts for collisions and clicks.
//!
//! A burst is a scene entity with its particles as children. One system ages
//! every live burst each frame, moves and damps its particles, fades its
//! material, and on completion releases its assets and despawns it.
//!
//! - Explosion: orange sparks where two spacecraft collide
//! - Ripple: a pale blue ring where a click hit empty space
//! - Planet ping: a white spray around a clicked planet

use std::f32::consts::TAU;

use bevy::prelude::*;
use rand::Rng;

use crate::planets::hex_color;
use crate::types::{FrameSet, SceneEntity, SceneRng};

/// Type of particle burst.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BurstKind {
    /// Spacecraft collision
    Explosion,
    /// Click on empty space
    Ripple,
    /// Click on a planet
    PlanetPing,
}

/// Fixed parameters of a burst kind.
#[derive(Clone, Copy, Debug)]
pub struct BurstProfile {
    pub particle_count: usize,
    /// Velocity multiplier applied every frame.
    pub damping: f32,
    /// Lifetime in frames.
    pub max_age: u32,
    pub color: u32,
    /// Rendered radius of one particle.
    pub particle_size: f32,
}

impl BurstKind {
    pub fn profile(self) -> BurstProfile {
        match self {
            BurstKind::Explosion => BurstProfile {
                particle_count: 40,
                damping: 0.96,
                max_age: 50,
                color: 0xff8833,
                particle_size: 2.0,
            },
            BurstKind::Ripple => BurstProfile {
                particle_count: 30,
                damping: 0.96,
                max_age: 40,
                color: 0xccddff,
                particle_size: 1.5,
            },
            BurstKind::PlanetPing => BurstProfile {
                particle_count: 60,
                damping: 0.98,
                max_age: 50,
                color: 0xffffff,
                particle_size: 3.0,
            },
        }
    }

    /// Initial particle velocities for one burst of this kind.
    pub fn particle_velocities(self, rng: &mut impl Rng) -> Vec<Vec3> {
        let count = self.profile().particle_count;
        match self {
            BurstKind::Explosion | BurstKind::PlanetPing => (0..count)
                .map(|_| {
                    Vec3::new(
                        rng.random_range(-SPRAY_SPEED..SPRAY_SPEED),
                        rng.random_range(-SPRAY_SPEED..SPRAY_SPEED),
                        rng.random_range(-SPRAY_SPEED..SPRAY_SPEED),
                    )
                })
                .collect(),
            BurstKind::Ripple => (0..count)
                .map(|i| {
                    let angle = i as f32 / count as f32 * TAU;
                    let speed = rng.random_range(RIPPLE_SPEED_MIN..RIPPLE_SPEED_MAX);
                    Vec3::new(
                        angle.cos() * speed,
                        angle.sin() * speed,
                        (rng.random::<f32>() - 0.5) * speed,
                    )
                })
                .collect(),
        }
    }
}

/// Largest per-axis particle speed of explosions and planet pings.
const SPRAY_SPEED: f32 = 2.5;
const RIPPLE_SPEED_MIN: f32 = 2.0;
const RIPPLE_SPEED_MAX: f32 = 5.0;

/// Request for a burst at a world position.
#[derive(Message, Clone, Copy, Debug)]
pub struct SpawnBurstEvent {
    pub position: Vec3,
    pub kind: BurstKind,
}

/// State of a live burst.
#[derive(Component, Clone, Debug)]
pub struct ParticleBurst {
    pub kind: BurstKind,
    /// Frames since the burst spawned.
    pub age: u32,
    pub max_age: u32,
    pub damping: f32,
    pub mesh: Handle<Mesh>,
    pub material: Handle<StandardMaterial>,
}

/// Result of aging a burst by one frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum BurstStatus {
    Active { opacity: f32 },
    Finished,
}

impl ParticleBurst {
    /// Linear fade from 1 at spawn to 0 at max age.
    pub fn opacity(&self) -> f32 {
        if self.max_age == 0 {
            return 0.0;
        }
        (1.0 - self.age as f32 / self.max_age as f32).max(0.0)
    }

    /// Age by one frame.
    pub fn advance(&mut self) -> BurstStatus {
        self.age = self.age.saturating_add(1);
        if self.age >= self.max_age {
            BurstStatus::Finished
        } else {
            BurstStatus::Active {
                opacity: self.opacity(),
            }
        }
    }
}

/// One particle of a burst, positioned relative to the burst root.
#[derive(Component, Clone, Copy, Debug)]
pub struct BurstParticle {
    pub velocity: Vec3,
}

/// Plugin for particle bursts.
pub struct EffectsPlugin;

impl Plugin for EffectsPlugin {
    fn build(&self, app: &mut App) {
        app.add_message::<SpawnBurstEvent>().add_systems(
            Update,
            (spawn_bursts, advance_bursts)
                .chain()
                .in_set(FrameSet::Effects),
        );
    }
}

/// Spawn one burst with its particles. Returns the burst root.
pub fn spawn_burst(
    commands: &mut Commands,
    meshes: &mut Assets<Mesh>,
    materials: &mut Assets<StandardMaterial>,
    rng: &mut impl Rng,
    position: Vec3,
    kind: BurstKind,
) -> Entity {
    let profile = kind.profile();
    let color = hex_color(profile.color);

    let mesh = meshes.add(Sphere::new(profile.particle_size).mesh().uv(8, 6));
    let material = materials.add(StandardMaterial {
        base_color: color,
        emissive: color.to_linear(),
        alpha_mode: AlphaMode::Add,
        unlit: true,
        ..default()
    });

    let burst = commands
        .spawn((
            SceneEntity,
            ParticleBurst {
                kind,
                age: 0,
                max_age: profile.max_age,
                damping: profile.damping,
                mesh: mesh.clone(),
                material: material.clone(),
            },
            Transform::from_translation(position),
            Visibility::default(),
        ))
        .id();

    let particles: Vec<Entity> = kind
        .particle_velocities(rng)
        .into_iter()
        .map(|velocity| {
            commands
                .spawn((
                    SceneEntity,
                    BurstParticle { velocity },
                    Mesh3d(mesh.clone()),
                    MeshMaterial3d(material.clone()),
                    Transform::default(),
                ))
                .id()
        })
        .collect();
    commands.entity(burst).add_children(&particles);

    debug!("Spawned {:?} burst at {:?}", kind, position);
    burst
}

/// Spawn bursts requested this frame.
pub fn spawn_bursts(
    mut commands: Commands,
    mut requests: MessageReader<SpawnBurstEvent>,
    meshes: Option<ResMut<Assets<Mesh>>>,
    materials: Option<ResMut<Assets<StandardMaterial>>>,
    mut rng: ResMut<SceneRng>,
) {
    let (Some(mut meshes), Some(mut materials)) = (meshes, materials) else {
        requests.clear();
        return;
    };

    for request in requests.read() {
        spawn_burst(
            &mut commands,
            &mut meshes,
            &mut materials,
            &mut rng.rng,
            request.position,
            request.kind,
        );
    }
}

/// Age every burst, move its particles and remove finished bursts.
pub fn advance_bursts(
    mut commands: Commands,
    mut bursts: Query<(Entity, &mut ParticleBurst, Option<&Children>)>,
    mut particles: Query<(&mut BurstParticle, &mut Transform)>,
    mut meshes: Option<ResMut<Assets<Mesh>>>,
    mut materials: Option<ResMut<Assets<StandardMaterial>>>,
) {
    for (entity, mut burst, children) in bursts.iter_mut() {
        match burst.advance() {
            BurstStatus::Finished => {
                if let Some(meshes) = meshes.as_mut() {
                    meshes.remove(&burst.mesh);
                }
                if let Some(materials) = materials.as_mut() {
                    materials.remove(&burst.material);
                }
                commands.entity(entity).despawn();
            }
            BurstStatus::Active { opacity } => {
                if let Some(children) = children {
                    for &child in &children[..] {
                        // Particles may already be gone
                        let Ok((mut particle, mut transform)) = particles.get_mut(child) else {
                            continue;
                        };
                        transform.translation += particle.velocity;
                        particle.velocity *= burst.damping;
                    }
                }
                if let Some(material) = materials
                    .as_mut()
                    .and_then(|materials| materials.get_mut(&burst.material))
                {
                    material.base_color = material.base_color.with_alpha(opacity);
                }
            }
        }
    }
}
