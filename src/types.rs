//! Core scene types shared by every subsystem.

use bevy::prelude::*;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

/// System sets for ordering the per-frame work.
///
/// Handlers only write targets, so they run first; the camera runs after
/// the pools have moved and selection tracking runs last so the published
/// screen position matches the frame being rendered.
#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub enum FrameSet {
    /// Host input handlers (pointer, click, scroll, resize, close).
    Input,
    /// Closed-form motion of stars, planets, moons, asteroids and craft.
    Motion,
    /// Pairwise spacecraft contact resolution.
    Collision,
    /// Particle burst spawning and aging.
    Effects,
    /// Camera smoothing and pose.
    Camera,
    /// Selection re-projection and publication.
    Selection,
}

/// Errors raised while building scene content.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum SceneError {
    #[error("failed to build {what} mesh: {reason}")]
    MeshBuild { what: &'static str, reason: String },
}

/// Simulation time advanced once per rendered frame.
pub const FRAME_TIME_STEP: f32 = 0.01;

/// Marker for every entity owned by the mounted scene.
///
/// Teardown releases the assets of and despawns everything carrying this.
#[derive(Component, Clone, Copy, Debug, Default)]
pub struct SceneEntity;

/// Frame counter and shared simulation time.
#[derive(Resource, Clone, Debug, Default)]
pub struct SceneClock {
    /// Frames advanced since mount.
    pub frame: u64,
    /// Simulation time in scene units (0.01 per frame).
    pub time: f32,
}

impl SceneClock {
    /// Advance by one frame.
    pub fn tick(&mut self) {
        self.frame += 1;
        self.time += FRAME_TIME_STEP;
    }

    /// Reset to the mount state.
    pub fn reset(&mut self) {
        self.frame = 0;
        self.time = 0.0;
    }
}

/// Seedable RNG used by generators, twinkle, collisions and effects.
#[derive(Resource)]
pub struct SceneRng {
    pub rng: ChaCha8Rng,
    seed: u64,
}

impl SceneRng {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            seed,
        }
    }

    /// Re-seed so every mount generates the same scene for the same seed.
    pub fn reset(&mut self) {
        self.rng = ChaCha8Rng::seed_from_u64(self.seed);
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }
}

impl Default for SceneRng {
    fn default() -> Self {
        Self::new(0x5EED)
    }
}
