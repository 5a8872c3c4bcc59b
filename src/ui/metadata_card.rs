//! Dataset card - floating panel over the selected planet.
//!
//! Follows the selection record published by the backdrop: centered on the
//! planet's screen position and scaled by its distance from the camera.

use bevy::prelude::*;
use bevy_egui::{EguiContexts, egui};

use crate::input::CloseSelection;
use crate::interaction::{SelectionChanged, SelectionRecord};
use crate::planets::QualityTier;

use super::icons;

/// Colors for the dataset card.
mod colors {
    use bevy_egui::egui::Color32;

    pub const CARD_BG: Color32 = Color32::from_rgba_premultiplied(10, 10, 18, 235);
    pub const CARD_BORDER: Color32 = Color32::from_rgb(200, 210, 60);
    pub const ACCENT: Color32 = Color32::from_rgb(220, 230, 70);
    pub const HYDRO: Color32 = Color32::from_rgb(90, 170, 255);
    pub const GRASS: Color32 = Color32::from_rgb(110, 210, 120);
    pub const MUTED: Color32 = Color32::from_rgb(140, 140, 150);
}

/// Card width at scale 1.
const CARD_WIDTH: f32 = 320.0;

/// Latest record received from the backdrop.
#[derive(Resource, Default)]
pub struct CardState {
    pub record: Option<SelectionRecord>,
}

/// Keep the last published record.
pub fn receive_selection(mut changes: MessageReader<SelectionChanged>, mut card: ResMut<CardState>) {
    if let Some(SelectionChanged(record)) = changes.read().last() {
        card.record = record.clone();
    }
}

fn quality_color(quality: QualityTier) -> egui::Color32 {
    match quality {
        QualityTier::Premium => colors::ACCENT,
        QualityTier::LiveFeed => colors::GRASS,
        QualityTier::Verified => colors::HYDRO,
    }
}

/// Thousands separators for download counts.
pub fn group_thousands(value: u32) -> String {
    let digits = value.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }
    grouped
}

/// System to render the dataset card.
pub fn metadata_card_system(
    mut contexts: EguiContexts,
    card: Res<CardState>,
    mut close: MessageWriter<CloseSelection>,
) {
    let Some(record) = card.record.as_ref() else {
        return;
    };
    let Ok(ctx) = contexts.ctx_mut() else {
        return;
    };

    let s = record.scale;
    let dataset = &record.dataset;
    let position = egui::pos2(record.screen_position.x, record.screen_position.y);

    egui::Window::new("Dataset")
        .title_bar(false)
        .resizable(false)
        .collapsible(false)
        .pivot(egui::Align2::CENTER_CENTER)
        .fixed_pos(position)
        .frame(
            egui::Frame::new()
                .fill(colors::CARD_BG)
                .inner_margin(16.0 * s)
                .stroke(egui::Stroke::new(1.0, colors::CARD_BORDER))
                .corner_radius(6.0 * s),
        )
        .show(ctx, |ui| {
            ui.set_width(CARD_WIDTH * s);

            ui.horizontal(|ui| {
                ui.label(egui::RichText::new(icons::DATASET).size(18.0 * s).color(colors::ACCENT));
                ui.label(
                    egui::RichText::new(&dataset.name)
                        .strong()
                        .size(18.0 * s)
                        .color(colors::ACCENT),
                );
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    if ui
                        .button(egui::RichText::new(icons::CLOSE).size(14.0 * s))
                        .clicked()
                    {
                        close.write(CloseSelection);
                    }
                });
            });
            ui.label(
                egui::RichText::new(dataset.category.to_uppercase())
                    .monospace()
                    .size(11.0 * s)
                    .color(colors::MUTED),
            );
            ui.separator();

            let row = |ui: &mut egui::Ui, icon: &str, label: &str, value: egui::RichText| {
                ui.horizontal(|ui| {
                    ui.label(egui::RichText::new(format!("{icon} {label}")).size(12.0 * s).color(colors::MUTED));
                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        ui.label(value);
                    });
                });
            };

            row(
                ui,
                icons::STORAGE,
                "STORAGE",
                egui::RichText::new(&dataset.size).strong().size(14.0 * s).color(colors::HYDRO),
            );
            row(
                ui,
                icons::PRICE,
                "PRICE",
                egui::RichText::new(&dataset.price).strong().size(14.0 * s).color(colors::ACCENT),
            );
            row(
                ui,
                icons::DOWNLOADS,
                "DOWNLOADS",
                egui::RichText::new(group_thousands(dataset.downloads))
                    .strong()
                    .size(14.0 * s),
            );
            row(
                ui,
                icons::quality_icon(dataset.quality),
                "STATUS",
                egui::RichText::new(dataset.quality.label())
                    .size(12.0 * s)
                    .color(quality_color(dataset.quality)),
            );

            ui.add_space(8.0 * s);
            ui.add_sized(
                [CARD_WIDTH * s, 28.0 * s],
                egui::Button::new(
                    egui::RichText::new(format!("ACCESS DATASET {}", icons::ACCESS))
                        .monospace()
                        .size(12.0 * s)
                        .color(colors::ACCENT),
                ),
            );
        });
}
