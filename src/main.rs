//! Orbital Backdrop - demo host
//!
//! Runs the backdrop in a desktop window with a virtual scrolling page
//! and the dataset card overlay.

use bevy::prelude::*;
use bevy_egui::EguiPlugin;

use orbital_backdrop::host::HostShellPlugin;
use orbital_backdrop::ui::OverlayPlugin;
use orbital_backdrop::{BackdropPlugin, SceneConfig};

fn main() -> AppExit {
    let config = match SceneConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("invalid backdrop configuration: {e}");
            return AppExit::error();
        }
    };

    App::new()
        .add_plugins(DefaultPlugins.set(WindowPlugin {
            primary_window: Some(Window {
                title: "Orbital Backdrop".into(),
                ..default()
            }),
            ..default()
        }))
        .insert_resource(ClearColor(Color::BLACK))
        .add_plugins(EguiPlugin::default())
        .add_plugins((BackdropPlugin::new(config), HostShellPlugin, OverlayPlugin))
        .run()
}
