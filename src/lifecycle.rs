//! Mounting and tearing down the backdrop.
//!
//! The scene exists only in `BackdropPhase::Mounted`. Entering the state
//! builds every pool and registers the host listeners; leaving it releases
//! every asset the scene created and despawns the scene. All frame systems
//! are gated on the mounted state, so nothing runs after teardown.

use bevy::prelude::*;

use crate::asteroid::{ASTEROID_COUNT, spawn_asteroids};
use crate::background::{STAR_COUNT, spawn_lighting, spawn_starfield};
use crate::camera::{CameraPlugin, CameraPose, CameraRig, spawn_camera};
use crate::collision::CollisionPlugin;
use crate::config::SceneConfig;
use crate::effects::EffectsPlugin;
use crate::fleet::{FLEET_COUNT, spawn_fleet};
use crate::input::{InputPlugin, Listeners};
use crate::interaction::{CursorHint, HoveredPlanet, InteractionPlugin, Selection};
use crate::motion::MotionPlugin;
use crate::planets::{PLANET_TABLE, spawn_planets};
use crate::sun::{SunMaterial, SunPlugin, spawn_sun};
use crate::time::TimePlugin;
use crate::types::{FrameSet, SceneClock, SceneEntity, SceneRng};

/// Whether the backdrop is currently in the world.
#[derive(States, Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum BackdropPhase {
    #[default]
    Unmounted,
    Mounted,
}

/// The whole backdrop: generators, frame systems and lifecycle.
///
/// Requires `StatesPlugin` (part of `DefaultPlugins`). Mount by switching to
/// `BackdropPhase::Mounted`.
pub struct BackdropPlugin {
    pub config: SceneConfig,
}

impl BackdropPlugin {
    pub fn new(config: SceneConfig) -> Self {
        Self { config }
    }
}

impl Plugin for BackdropPlugin {
    fn build(&self, app: &mut App) {
        info!(
            "Backdrop configured: route {:?}, device {:?}, seed {}",
            self.config.route, self.config.device, self.config.seed
        );

        app.insert_resource(self.config.clone())
            .insert_resource(SceneRng::new(self.config.seed))
            .init_state::<BackdropPhase>()
            .configure_sets(
                Update,
                (
                    FrameSet::Input,
                    FrameSet::Motion,
                    FrameSet::Collision,
                    FrameSet::Effects,
                    FrameSet::Camera,
                    FrameSet::Selection,
                )
                    .chain()
                    .run_if(in_state(BackdropPhase::Mounted)),
            )
            .add_plugins((
                TimePlugin,
                InputPlugin,
                CameraPlugin,
                MotionPlugin,
                SunPlugin,
                CollisionPlugin,
                EffectsPlugin,
                InteractionPlugin,
            ))
            .add_systems(OnEnter(BackdropPhase::Mounted), mount_scene)
            .add_systems(OnExit(BackdropPhase::Mounted), teardown_scene);
    }
}

/// Build the scene and register the host listeners.
pub fn mount_scene(
    mut commands: Commands,
    config: Res<SceneConfig>,
    meshes: Option<ResMut<Assets<Mesh>>>,
    materials: Option<ResMut<Assets<StandardMaterial>>>,
    mut sun_materials: Option<ResMut<Assets<SunMaterial>>>,
    mut rng: ResMut<SceneRng>,
    mut clock: ResMut<SceneClock>,
    mut rig: ResMut<CameraRig>,
    mut pose: ResMut<CameraPose>,
    mut hovered: ResMut<HoveredPlanet>,
    mut selection: ResMut<Selection>,
    mut cursor: ResMut<CursorHint>,
) {
    clock.reset();
    rng.reset();
    *rig = CameraRig::default();
    *pose = CameraPose::for_route(config.route, &rig);
    *hovered = HoveredPlanet::default();
    *cursor = CursorHint::default();
    selection.clear();

    let (Some(mut meshes), Some(mut materials)) = (meshes, materials) else {
        warn!("No mesh or material storage; the backdrop will not render");
        return;
    };
    let rng = &mut rng.rng;

    spawn_camera(&mut commands, &pose);
    spawn_lighting(&mut commands);
    spawn_starfield(
        &mut commands,
        &mut meshes,
        &mut materials,
        rng,
        config.scaled_count(STAR_COUNT),
    );
    spawn_sun(
        &mut commands,
        &mut meshes,
        &mut materials,
        sun_materials.as_deref_mut(),
    );
    spawn_planets(&mut commands, &mut meshes, &mut materials, rng, PLANET_TABLE);
    if let Err(e) = spawn_asteroids(
        &mut commands,
        &mut meshes,
        &mut materials,
        rng,
        config.scaled_count(ASTEROID_COUNT),
    ) {
        warn!("Asteroid belt skipped: {}", e);
    }
    spawn_fleet(
        &mut commands,
        &mut meshes,
        &mut materials,
        rng,
        config.scaled_count(FLEET_COUNT),
    );

    let listeners = Listeners::for_clicks(config.click_selection_enabled());
    commands.insert_resource(listeners);

    info!(
        "Backdrop mounted ({:?}, {} meshes, {} materials)",
        config.route,
        meshes.len(),
        materials.len()
    );
}

/// Remove the listeners, release scene assets and despawn the scene.
pub fn teardown_scene(
    mut commands: Commands,
    scene: Query<
        (
            Entity,
            Option<&Mesh3d>,
            Option<&MeshMaterial3d<StandardMaterial>>,
            Option<&MeshMaterial3d<SunMaterial>>,
            Has<ChildOf>,
        ),
        With<SceneEntity>,
    >,
    mut meshes: Option<ResMut<Assets<Mesh>>>,
    mut materials: Option<ResMut<Assets<StandardMaterial>>>,
    mut sun_materials: Option<ResMut<Assets<SunMaterial>>>,
    mut hovered: ResMut<HoveredPlanet>,
    mut selection: ResMut<Selection>,
    mut cursor: ResMut<CursorHint>,
) {
    commands.remove_resource::<Listeners>();

    let mut roots = 0;
    for (entity, mesh, material, sun_material, has_parent) in scene.iter() {
        // Shared handles are removed on first sight; later removals are no-ops
        if let (Some(mesh), Some(meshes)) = (mesh, meshes.as_mut()) {
            meshes.remove(&mesh.0);
        }
        if let (Some(material), Some(materials)) = (material, materials.as_mut()) {
            materials.remove(&material.0);
        }
        if let (Some(material), Some(sun_materials)) = (sun_material, sun_materials.as_mut()) {
            sun_materials.remove(&material.0);
        }

        // Children go with their root
        if !has_parent {
            commands.entity(entity).despawn();
            roots += 1;
        }
    }

    commands.insert_resource(GlobalAmbientLight::default());
    *hovered = HoveredPlanet::default();
    *cursor = CursorHint::default();
    selection.clear();

    info!("Backdrop torn down ({} scene roots despawned)", roots);
}
