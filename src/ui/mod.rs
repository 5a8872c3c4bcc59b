//! Overlay collaborator for the demo binary, built on egui.
//!
//! Shows the dataset card for the selected planet and mirrors the
//! backdrop's cursor hint onto the window pointer.

pub mod icons;
mod metadata_card;

use bevy::prelude::*;
use bevy_egui::{EguiContexts, EguiPrimaryContextPass, egui};

use crate::interaction::CursorHint;
use crate::types::FrameSet;

pub use metadata_card::{CardState, group_thousands};

/// Plugin that adds the overlay systems.
pub struct OverlayPlugin;

impl Plugin for OverlayPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<CardState>()
            .init_resource::<icons::FontsInitialized>()
            .add_systems(
                Update,
                metadata_card::receive_selection.after(FrameSet::Selection),
            )
            // Font initialization MUST run before any UI systems that use icons
            .add_systems(EguiPrimaryContextPass, icons::setup_fonts)
            .add_systems(
                EguiPrimaryContextPass,
                (metadata_card::metadata_card_system, apply_cursor_hint)
                    .after(icons::setup_fonts)
                    .run_if(|init: Res<icons::FontsInitialized>| init.0),
            );
    }
}

/// Show a pointing hand while a planet is under the pointer.
fn apply_cursor_hint(mut contexts: EguiContexts, hint: Res<CursorHint>) {
    if *hint != CursorHint::Interactive {
        return;
    }
    if let Ok(ctx) = contexts.ctx_mut() {
        ctx.set_cursor_icon(egui::CursorIcon::PointingHand);
    }
}
