//! Orbital Backdrop - ambient 3D scene for a data marketplace
//!
//! A library crate providing the backdrop as a Bevy plugin: star field,
//! shaded sun, orbiting dataset planets, asteroid belt, colliding
//! spacecraft, a scroll-driven camera and planet picking.

pub mod asteroid;
pub mod background;
pub mod camera;
pub mod collision;
pub mod config;
pub mod effects;
pub mod fleet;
pub mod host;
pub mod input;
pub mod interaction;
pub mod lifecycle;
pub mod motion;
pub mod planets;
pub mod sun;
pub mod time;
pub mod types;
pub mod ui;

pub use config::SceneConfig;
pub use lifecycle::{BackdropPhase, BackdropPlugin};

#[cfg(test)]
pub mod test_utils;
