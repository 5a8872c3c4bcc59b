//! Phosphor icon definitions for the overlay.
//!
//! Icons are initialized via `setup_fonts` when the app starts.

use bevy::prelude::*;
use bevy_egui::{EguiContexts, egui};

use crate::planets::QualityTier;

/// Resource to track if fonts have been initialized.
#[derive(Resource, Default)]
pub struct FontsInitialized(pub bool);

/// System to initialize Phosphor icon fonts.
/// Runs in EguiPrimaryContextPass where the egui context is guaranteed to be ready.
pub fn setup_fonts(mut contexts: EguiContexts, mut initialized: ResMut<FontsInitialized>) {
    if initialized.0 {
        return;
    }

    let Ok(ctx) = contexts.ctx_mut() else {
        return;
    };

    let mut fonts = egui::FontDefinitions::default();
    egui_phosphor::add_to_fonts(&mut fonts, egui_phosphor::Variant::Regular);

    ctx.set_fonts(fonts);
    initialized.0 = true;

    info!("Phosphor icon fonts initialized");
}

/// Close/X icon
pub const CLOSE: &str = egui_phosphor::regular::X;
/// Dataset/database icon
pub const DATASET: &str = egui_phosphor::regular::DATABASE;
/// Storage size icon
pub const STORAGE: &str = egui_phosphor::regular::HARD_DRIVES;
/// Price/coin icon
pub const PRICE: &str = egui_phosphor::regular::COINS;
/// Downloads icon
pub const DOWNLOADS: &str = egui_phosphor::regular::DOWNLOAD_SIMPLE;
/// Access/arrow icon
pub const ACCESS: &str = egui_phosphor::regular::ARROW_RIGHT;

/// Badge icon for a dataset quality tier.
pub fn quality_icon(quality: QualityTier) -> &'static str {
    match quality {
        QualityTier::Premium => egui_phosphor::regular::STAR,
        QualityTier::LiveFeed => egui_phosphor::regular::BROADCAST,
        QualityTier::Verified => egui_phosphor::regular::SEAL_CHECK,
    }
}
