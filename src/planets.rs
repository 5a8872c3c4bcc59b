//! Planets, their rings and moons, and the dataset each one advertises.
//!
//! Planets are authored in a fixed table. Each one carries the metadata of a
//! marketplace dataset which the overlay shows when the planet is selected.

use std::f32::consts::{FRAC_PI_2, PI, TAU};

use bevy::prelude::*;
use rand::Rng;

use crate::motion::scroll_parallax;
use crate::types::SceneEntity;

/// Emissive intensity of a planet at rest.
pub const EMISSIVE_IDLE: f32 = 0.3;
/// Emissive intensity of the hovered planet.
pub const EMISSIVE_HOVER: f32 = 0.6;

/// Moon radius as a fraction of its parent.
pub const MOON_RADIUS_RATIO: f32 = 0.25;

/// Ring inner/outer radius as multiples of the planet radius.
const RING_INNER: f32 = 1.5;
const RING_OUTER: f32 = 2.2;

/// Spin speed range drawn per planet (radians per frame).
const SPIN_SPEED_MIN: f32 = 0.0008;
const SPIN_SPEED_RANGE: f32 = 0.0012;

/// Dataset quality tier, shown as a status badge.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum QualityTier {
    Premium,
    LiveFeed,
    Verified,
}

impl QualityTier {
    pub fn label(self) -> &'static str {
        match self {
            QualityTier::Premium => "Premium",
            QualityTier::LiveFeed => "Live Feed",
            QualityTier::Verified => "Verified",
        }
    }
}

/// Dataset advertised by a planet.
#[derive(Component, Clone, Debug, PartialEq)]
pub struct DatasetMetadata {
    pub name: String,
    pub category: String,
    /// Human-readable storage size, e.g. "2.4 TB".
    pub size: String,
    /// Human-readable price, e.g. "50 SUI".
    pub price: String,
    pub downloads: u32,
    pub quality: QualityTier,
}

/// Static form of [`DatasetMetadata`] used by the planet table.
#[derive(Clone, Copy, Debug)]
pub struct DatasetSpec {
    pub name: &'static str,
    pub category: &'static str,
    pub size: &'static str,
    pub price: &'static str,
    pub downloads: u32,
    pub quality: QualityTier,
}

impl DatasetSpec {
    pub fn to_metadata(&self) -> DatasetMetadata {
        DatasetMetadata {
            name: self.name.to_string(),
            category: self.category.to_string(),
            size: self.size.to_string(),
            price: self.price.to_string(),
            downloads: self.downloads,
            quality: self.quality,
        }
    }
}

/// A moon attached to a planet in the table.
#[derive(Clone, Copy, Debug)]
pub struct MoonSpec {
    pub radius_ratio: f32,
    /// Phase offset of the moon along its orbit (radians).
    pub phase: f32,
}

/// One authored planet.
#[derive(Clone, Copy, Debug)]
pub struct PlanetSpec {
    pub size: f32,
    /// Base color as 0xRRGGBB.
    pub color: u32,
    /// Emissive color as 0xRRGGBB.
    pub emissive: u32,
    pub position: Vec3,
    pub orbital_speed: f32,
    pub ring: bool,
    pub moons: &'static [MoonSpec],
    pub dataset: DatasetSpec,
}

const SINGLE_MOON: &[MoonSpec] = &[MoonSpec {
    radius_ratio: MOON_RADIUS_RATIO,
    phase: 0.0,
}];

/// The six planets of the backdrop.
pub const PLANET_TABLE: &[PlanetSpec] = &[
    // Gas giant in the distance
    PlanetSpec {
        size: 350.0,
        color: 0x8b7355,
        emissive: 0x4a3828,
        position: Vec3::new(-500.0, 200.0, -500.0),
        orbital_speed: 0.0001,
        ring: true,
        moons: &[],
        dataset: DatasetSpec {
            name: "Global Weather Patterns 2024",
            category: "Climate",
            size: "2.4 TB",
            price: "50 SUI",
            downloads: 243,
            quality: QualityTier::LiveFeed,
        },
    },
    // Blue-gray rocky planet
    PlanetSpec {
        size: 250.0,
        color: 0x4a6580,
        emissive: 0x1a2530,
        position: Vec3::new(600.0, -250.0, -300.0),
        orbital_speed: 0.00015,
        ring: false,
        moons: SINGLE_MOON,
        dataset: DatasetSpec {
            name: "DeFi Transaction Analytics",
            category: "Finance",
            size: "860 GB",
            price: "125 SUI",
            downloads: 89,
            quality: QualityTier::Premium,
        },
    },
    // Desert planet, very close
    PlanetSpec {
        size: 200.0,
        color: 0xc69c6d,
        emissive: 0x6d4e2a,
        position: Vec3::new(-350.0, -150.0, -150.0),
        orbital_speed: 0.0002,
        ring: false,
        moons: &[],
        dataset: DatasetSpec {
            name: "Medical Imaging - Chest X-Rays",
            category: "Healthcare",
            size: "1.1 TB",
            price: "200 SUI",
            downloads: 156,
            quality: QualityTier::Premium,
        },
    },
    // Icy planet
    PlanetSpec {
        size: 280.0,
        color: 0x6b9faf,
        emissive: 0x2a4a5a,
        position: Vec3::new(450.0, 300.0, -600.0),
        orbital_speed: 0.00008,
        ring: true,
        moons: &[],
        dataset: DatasetSpec {
            name: "Urban Traffic Flow Analysis",
            category: "Transportation",
            size: "540 GB",
            price: "30 SUI",
            downloads: 67,
            quality: QualityTier::LiveFeed,
        },
    },
    // Small reddish rocky planet
    PlanetSpec {
        size: 150.0,
        color: 0x9b6b5e,
        emissive: 0x4a2a1e,
        position: Vec3::new(250.0, 150.0, -100.0),
        orbital_speed: 0.00025,
        ring: false,
        moons: &[],
        dataset: DatasetSpec {
            name: "Sentiment Analysis Algorithm",
            category: "AI/ML",
            size: "12 GB",
            price: "80 SUI",
            downloads: 312,
            quality: QualityTier::Verified,
        },
    },
    // Purple gas giant
    PlanetSpec {
        size: 320.0,
        color: 0x7a6b9f,
        emissive: 0x3a2a4a,
        position: Vec3::new(-650.0, -300.0, -550.0),
        orbital_speed: 0.00012,
        ring: false,
        moons: SINGLE_MOON,
        dataset: DatasetSpec {
            name: "Satellite Earth Observation",
            category: "Geospatial",
            size: "4.8 TB",
            price: "300 SUI",
            downloads: 41,
            quality: QualityTier::Premium,
        },
    },
];

/// Convert 0xRRGGBB to a color.
pub fn hex_color(hex: u32) -> Color {
    Color::srgb_u8((hex >> 16) as u8, (hex >> 8) as u8, hex as u8)
}

/// Orbit and spin state of a planet.
#[derive(Component, Clone, Debug)]
pub struct Planet {
    /// Position in the planet table.
    pub index: usize,
    pub radius: f32,
    pub base_color: Color,
    /// Full-strength emissive color; the material shows it scaled by intensity.
    pub emissive: LinearRgba,
    /// Authored position the orbit path passes through.
    pub anchor: Vec3,
    /// Distance of the anchor from the y axis.
    pub orbital_radius: f32,
    /// Orbital angle increment per frame (radians).
    pub orbital_speed: f32,
    /// Spin increment per frame (radians).
    pub spin_speed: f32,
    /// Angle at the anchor, `atan2(z, x)` in `[0, 2π)`.
    pub initial_angle: f32,
    /// Current orbital angle in `[0, 2π)`.
    pub angle: f32,
    /// Sum of the per-frame orbit nudges since spawn.
    pub drift: Vec3,
}

impl Planet {
    pub fn from_spec(index: usize, spec: &PlanetSpec, spin_speed: f32) -> Self {
        let initial_angle = spec.position.z.atan2(spec.position.x).rem_euclid(TAU);
        Self {
            index,
            radius: spec.size,
            base_color: hex_color(spec.color),
            emissive: hex_color(spec.emissive).to_linear(),
            anchor: spec.position,
            orbital_radius: spec.position.x.hypot(spec.position.z),
            orbital_speed: spec.orbital_speed,
            spin_speed,
            initial_angle,
            angle: initial_angle,
            drift: Vec3::ZERO,
        }
    }

    /// World position for the accumulated drift and smoothed scroll fraction.
    pub fn position(&self, scroll: f32) -> Vec3 {
        self.anchor + self.drift + scroll_parallax(scroll, self.index)
    }

    /// Emissive color at the given intensity.
    pub fn emissive_at(&self, intensity: f32) -> LinearRgba {
        self.emissive * intensity
    }
}

/// A moon revolving around its parent planet.
#[derive(Component, Clone, Debug)]
pub struct Moon {
    pub radius_ratio: f32,
    pub phase: f32,
    /// Radius of the parent planet; the moon orbits at 2.5x this.
    pub parent_radius: f32,
}

/// Marker for a planet ring.
#[derive(Component, Clone, Copy, Debug, Default)]
pub struct PlanetRing;

/// Spawn every planet in `table`, with rings and moons as children.
pub fn spawn_planets(
    commands: &mut Commands,
    meshes: &mut Assets<Mesh>,
    materials: &mut Assets<StandardMaterial>,
    rng: &mut impl Rng,
    table: &[PlanetSpec],
) -> Vec<Entity> {
    let mut spawned = Vec::with_capacity(table.len());

    for (index, spec) in table.iter().enumerate() {
        let spin_speed = SPIN_SPEED_MIN + rng.random::<f32>() * SPIN_SPEED_RANGE;
        let planet = Planet::from_spec(index, spec, spin_speed);

        let material = materials.add(StandardMaterial {
            base_color: planet.base_color,
            emissive: planet.emissive_at(EMISSIVE_IDLE),
            perceptual_roughness: 0.85,
            ..default()
        });
        let mesh = meshes.add(Sphere::new(spec.size).mesh().uv(48, 48));

        let tilt = Quat::from_euler(
            EulerRot::XYZ,
            rng.random::<f32>() * PI,
            0.0,
            rng.random::<f32>() * PI,
        );
        let transform = Transform::from_translation(planet.position(0.0)).with_rotation(tilt);

        let entity = commands
            .spawn((
                SceneEntity,
                Mesh3d(mesh),
                MeshMaterial3d(material),
                transform,
                spec.dataset.to_metadata(),
                planet,
            ))
            .id();

        if spec.ring {
            let ring_mesh = meshes.add(Annulus::new(spec.size * RING_INNER, spec.size * RING_OUTER));
            let ring_material = materials.add(StandardMaterial {
                base_color: Color::srgba(0.545, 0.545, 0.545, 0.5),
                alpha_mode: AlphaMode::Blend,
                unlit: true,
                double_sided: true,
                cull_mode: None,
                ..default()
            });
            let ring_tilt = FRAC_PI_2 + (rng.random::<f32>() - 0.5) * 0.3;
            let ring = commands
                .spawn((
                    SceneEntity,
                    PlanetRing,
                    Mesh3d(ring_mesh),
                    MeshMaterial3d(ring_material),
                    Transform::from_rotation(Quat::from_rotation_x(ring_tilt)),
                ))
                .id();
            commands.entity(entity).add_child(ring);
        }

        for moon_spec in spec.moons {
            let moon = Moon {
                radius_ratio: moon_spec.radius_ratio,
                phase: moon_spec.phase,
                parent_radius: spec.size,
            };
            let moon_mesh = meshes.add(Sphere::new(spec.size * moon.radius_ratio).mesh().uv(24, 24));
            let moon_material = materials.add(StandardMaterial {
                base_color: hex_color(0x888888),
                emissive: hex_color(0x222222).to_linear() * 0.2,
                ..default()
            });
            let offset = crate::motion::moon_offset(0.0, moon.phase, moon.parent_radius);
            let moon_entity = commands
                .spawn((
                    SceneEntity,
                    Mesh3d(moon_mesh),
                    MeshMaterial3d(moon_material),
                    Transform::from_translation(offset),
                    moon,
                ))
                .id();
            commands.entity(entity).add_child(moon_entity);
        }

        spawned.push(entity);
    }

    info!("Spawned {} planets", spawned.len());
    spawned
}
