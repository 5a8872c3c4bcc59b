//! The sun: a displaced, animated surface wrapped in two translucent shells.
//!
//! All three layers share one shader (`shaders/sun.wgsl`) and differ only in
//! their uniforms. Each layer owns its material so the time uniform can be
//! written per layer from the scene clock.

use bevy::prelude::*;
use bevy::render::render_resource::{AsBindGroup, ShaderType};
use bevy::shader::ShaderRef;

use crate::types::{FrameSet, SceneClock, SceneEntity};

/// World position of the sun.
pub const SUN_POSITION: Vec3 = Vec3::new(700.0, 350.0, -1200.0);
/// Radius of the sun surface.
pub const SUN_RADIUS: f32 = 120.0;

const SHADER_PATH: &str = "shaders/sun.wgsl";

/// Which shell of the sun a material renders.
#[derive(Component, Clone, Copy, Debug, PartialEq, Eq)]
pub enum SunLayer {
    Surface,
    Corona,
    Atmosphere,
}

impl SunLayer {
    pub const ALL: [SunLayer; 3] = [SunLayer::Surface, SunLayer::Corona, SunLayer::Atmosphere];

    /// Shell radius relative to the surface.
    pub fn radius_scale(self) -> f32 {
        match self {
            SunLayer::Surface => 1.0,
            SunLayer::Corona => 1.2,
            SunLayer::Atmosphere => 1.5,
        }
    }

    /// Initial shader parameters for this layer.
    pub fn params(self) -> SunParams {
        let (color, displacement, opacity) = match self {
            SunLayer::Surface => (Vec4::new(1.0, 0.62, 0.18, 1.0), 4.0, 1.0),
            SunLayer::Corona => (Vec4::new(1.0, 0.45, 0.1, 1.0), 8.0, 0.45),
            SunLayer::Atmosphere => (Vec4::new(1.0, 0.8, 0.5, 1.0), 0.0, 0.2),
        };
        SunParams {
            color,
            time: 0.0,
            displacement,
            opacity,
            layer: self as u32,
        }
    }

    fn fallback_color(self) -> Color {
        let c = self.params().color;
        Color::srgba(c.x, c.y, c.z, self.params().opacity)
    }
}

/// Uniform block of the sun shader.
#[derive(ShaderType, Clone, Copy, Debug, PartialEq)]
pub struct SunParams {
    pub color: Vec4,
    /// Scene clock time, written every frame.
    pub time: f32,
    /// Vertex displacement amplitude in world units.
    pub displacement: f32,
    pub opacity: f32,
    /// `SunLayer` discriminant.
    pub layer: u32,
}

/// Animated material for the sun layers.
#[derive(Asset, TypePath, AsBindGroup, Debug, Clone)]
pub struct SunMaterial {
    #[uniform(0)]
    pub params: SunParams,
}

impl Material for SunMaterial {
    fn vertex_shader() -> ShaderRef {
        SHADER_PATH.into()
    }

    fn fragment_shader() -> ShaderRef {
        SHADER_PATH.into()
    }

    fn alpha_mode(&self) -> AlphaMode {
        if self.params.opacity < 1.0 {
            AlphaMode::Add
        } else {
            AlphaMode::Opaque
        }
    }
}

/// Registers the sun material and its clock-driven animation.
///
/// With a renderer the material gets its full pipeline; with only an asset
/// server it is registered as a plain asset so the scene still mounts.
pub struct SunPlugin;

impl Plugin for SunPlugin {
    fn build(&self, app: &mut App) {
        if app.is_plugin_added::<bevy::render::RenderPlugin>() {
            app.add_plugins(MaterialPlugin::<SunMaterial>::default());
        } else if app.is_plugin_added::<AssetPlugin>() {
            app.init_asset::<SunMaterial>();
        } else {
            warn!("No asset storage available; the sun will not be shaded");
        }

        app.add_systems(Update, advance_sun_shaders.in_set(FrameSet::Motion));
    }
}

/// Spawn the sun surface with its shells as children. Returns the surface.
///
/// Falls back to unlit standard materials when the sun material is not
/// registered.
pub fn spawn_sun(
    commands: &mut Commands,
    meshes: &mut Assets<Mesh>,
    standard_materials: &mut Assets<StandardMaterial>,
    sun_materials: Option<&mut Assets<SunMaterial>>,
) -> Entity {
    let mut sun_materials = sun_materials;
    if sun_materials.is_none() {
        warn!("Sun material unavailable, using flat fallback");
    }

    let mut layers = Vec::with_capacity(SunLayer::ALL.len());
    for layer in SunLayer::ALL {
        let mesh = meshes.add(Sphere::new(SUN_RADIUS * layer.radius_scale()).mesh().uv(64, 64));
        let mut entity = commands.spawn((SceneEntity, layer, Mesh3d(mesh)));

        match sun_materials.as_deref_mut() {
            Some(materials) => {
                entity.insert(MeshMaterial3d(materials.add(SunMaterial {
                    params: layer.params(),
                })));
            }
            None => {
                let color = layer.fallback_color();
                entity.insert(MeshMaterial3d(standard_materials.add(StandardMaterial {
                    base_color: color,
                    emissive: color.to_linear(),
                    alpha_mode: if layer == SunLayer::Surface {
                        AlphaMode::Opaque
                    } else {
                        AlphaMode::Add
                    },
                    unlit: true,
                    ..default()
                })));
            }
        }
        layers.push(entity.id());
    }

    let surface = layers[0];
    commands
        .entity(surface)
        .insert(Transform::from_translation(SUN_POSITION))
        .add_children(&layers[1..]);

    debug!("Spawned sun at {:?}", SUN_POSITION);
    surface
}

/// Feed the scene clock to every sun layer.
pub fn advance_sun_shaders(
    clock: Res<SceneClock>,
    layers: Query<&MeshMaterial3d<SunMaterial>, With<SunLayer>>,
    materials: Option<ResMut<Assets<SunMaterial>>>,
) {
    let Some(mut materials) = materials else {
        return;
    };
    for handle in layers.iter() {
        if let Some(material) = materials.get_mut(&handle.0) {
            material.params.time = clock.time;
        }
    }
}
