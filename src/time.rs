//! Scene clock advancement.
//!
//! The clock counts rendered frames, not wall time: every mounted frame adds
//! a fixed step, so motion is tied to the display refresh rate.

use bevy::prelude::*;

use crate::types::{FrameSet, SceneClock};

/// Plugin providing the scene clock.
pub struct TimePlugin;

impl Plugin for TimePlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<SceneClock>()
            .add_systems(Update, advance_clock.in_set(FrameSet::Input));
    }
}

/// Advance the scene clock by one frame.
fn advance_clock(mut clock: ResMut<SceneClock>) {
    clock.tick();
}
