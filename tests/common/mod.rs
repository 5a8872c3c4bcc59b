//! Common test utilities for integration tests.

#![allow(dead_code)]

use bevy::asset::AssetPlugin;
use bevy::prelude::*;
use bevy::state::app::StatesPlugin;

use orbital_backdrop::config::DeviceClass;
use orbital_backdrop::interaction::{SelectionChanged, SelectionRecord};
use orbital_backdrop::planets::Planet;
use orbital_backdrop::types::FrameSet;
use orbital_backdrop::{BackdropPhase, BackdropPlugin, SceneConfig};

/// Every `SelectionChanged` payload seen since the app was built.
#[derive(Resource, Default)]
pub struct SelectionLog(pub Vec<Option<SelectionRecord>>);

impl SelectionLog {
    pub fn last(&self) -> Option<&Option<SelectionRecord>> {
        self.0.last()
    }
}

fn record_selection(mut changes: MessageReader<SelectionChanged>, mut log: ResMut<SelectionLog>) {
    log.0.extend(changes.read().map(|change| change.0.clone()));
}

/// Small landing configuration used by most tests.
pub fn mobile_landing() -> SceneConfig {
    SceneConfig::landing()
        .with_device(DeviceClass::Mobile)
        .with_seed(42)
}

/// Create a headless app with asset storage but no renderer.
pub fn headless_app(config: SceneConfig) -> App {
    let mut app = App::new();
    app.add_plugins((MinimalPlugins, AssetPlugin::default(), StatesPlugin));
    app.init_asset::<Mesh>();
    app.init_asset::<StandardMaterial>();
    app.add_plugins(BackdropPlugin::new(config));
    app.init_resource::<SelectionLog>()
        .add_systems(Update, record_selection.after(FrameSet::Selection));
    app
}

/// Create a headless app without any asset storage.
pub fn bare_app(config: SceneConfig) -> App {
    let mut app = App::new();
    app.add_plugins((MinimalPlugins, StatesPlugin));
    app.add_plugins(BackdropPlugin::new(config));
    app
}

pub fn mount(app: &mut App) {
    app.world_mut()
        .resource_mut::<NextState<BackdropPhase>>()
        .set(BackdropPhase::Mounted);
    app.update();
}

pub fn unmount(app: &mut App) {
    app.world_mut()
        .resource_mut::<NextState<BackdropPhase>>()
        .set(BackdropPhase::Unmounted);
    app.update();
}

pub fn run_frames(app: &mut App, frames: usize) {
    for _ in 0..frames {
        app.update();
    }
}

/// Number of entities carrying component `C`.
pub fn count<C: Component>(app: &mut App) -> usize {
    let mut query = app.world_mut().query_filtered::<Entity, With<C>>();
    query.iter(app.world()).count()
}

/// Entities carrying component `C`.
pub fn entities<C: Component>(app: &mut App) -> Vec<Entity> {
    let mut query = app.world_mut().query_filtered::<Entity, With<C>>();
    query.iter(app.world()).collect()
}

/// Park every planet far behind the camera except `keep`, which is moved to
/// the origin (it keeps its small per-frame drift). Takes effect on the next
/// frame.
pub fn isolate_planet_at_origin(app: &mut App, keep: Entity) {
    let mut query = app.world_mut().query::<(Entity, &mut Planet)>();
    for (entity, mut planet) in query.iter_mut(app.world_mut()) {
        if entity == keep {
            planet.anchor = Vec3::ZERO;
            planet.drift = Vec3::ZERO;
            planet.orbital_speed = 0.0;
        } else {
            planet.anchor = Vec3::new(0.0, 0.0, 5000.0);
        }
    }
}
