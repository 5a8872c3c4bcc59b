//! Scene configuration supplied by the host at construction time.
//!
//! The host decides which route the scene sits behind and what class of
//! device it runs on. Both are fixed for the lifetime of the plugin; a route
//! change is a remount.

use std::str::FromStr;

use bevy::prelude::*;

/// Environment variable selecting the route (`landing` or `static`).
pub const ROUTE_ENV: &str = "BACKDROP_ROUTE";
/// Environment variable overriding device detection (`desktop` or `mobile`).
pub const DEVICE_ENV: &str = "BACKDROP_DEVICE";
/// Environment variable fixing the generator seed.
pub const SEED_ENV: &str = "BACKDROP_SEED";

/// Errors produced while reading configuration.
#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    #[error("unknown route {0:?} (expected \"landing\" or \"static\")")]
    UnknownRoute(String),

    #[error("unknown device class {0:?} (expected \"desktop\" or \"mobile\")")]
    UnknownDevice(String),

    #[error("invalid seed {0:?} (expected an unsigned integer)")]
    InvalidSeed(String),
}

/// Which page the scene is mounted behind.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum RouteMode {
    /// Landing page: scripted flight camera and click selection.
    #[default]
    Landing,
    /// Any other page: static camera, no click handling.
    Static,
}

impl FromStr for RouteMode {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "landing" | "home" | "/" => Ok(RouteMode::Landing),
            "static" | "page" => Ok(RouteMode::Static),
            other => Err(ConfigError::UnknownRoute(other.to_string())),
        }
    }
}

/// Coarse device capability class.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum DeviceClass {
    #[default]
    Desktop,
    /// Low-capability device: entity counts are halved.
    Mobile,
}

impl DeviceClass {
    /// Detect from the compile target.
    pub fn detect() -> Self {
        if cfg!(any(target_os = "android", target_os = "ios")) {
            DeviceClass::Mobile
        } else {
            DeviceClass::Desktop
        }
    }

    /// Multiplier applied to star, asteroid and spacecraft counts.
    pub fn entity_multiplier(self) -> f32 {
        match self {
            DeviceClass::Desktop => 1.0,
            DeviceClass::Mobile => 0.5,
        }
    }
}

impl FromStr for DeviceClass {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "desktop" => Ok(DeviceClass::Desktop),
            "mobile" | "low" => Ok(DeviceClass::Mobile),
            other => Err(ConfigError::UnknownDevice(other.to_string())),
        }
    }
}

/// Construction-time configuration of the backdrop.
#[derive(Resource, Clone, Debug, PartialEq, Eq)]
pub struct SceneConfig {
    pub route: RouteMode,
    pub device: DeviceClass,
    /// Seed for every procedural choice the scene makes.
    pub seed: u64,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            route: RouteMode::Landing,
            device: DeviceClass::detect(),
            seed: 0x5EED,
        }
    }
}

impl SceneConfig {
    pub fn landing() -> Self {
        Self {
            route: RouteMode::Landing,
            ..Default::default()
        }
    }

    pub fn static_page() -> Self {
        Self {
            route: RouteMode::Static,
            ..Default::default()
        }
    }

    pub fn with_device(mut self, device: DeviceClass) -> Self {
        self.device = device;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Whether clicks select planets (landing route only).
    pub fn click_selection_enabled(&self) -> bool {
        self.route == RouteMode::Landing
    }

    /// Scale a desktop entity count by the device multiplier.
    pub fn scaled_count(&self, desktop_count: usize) -> usize {
        (desktop_count as f32 * self.device.entity_multiplier()).floor() as usize
    }

    /// Build from `BACKDROP_*` environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup (environment, test table).
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let route = match lookup(ROUTE_ENV) {
            Some(value) => value.parse()?,
            None => RouteMode::default(),
        };

        let device = match lookup(DEVICE_ENV) {
            Some(value) => value.parse()?,
            None => DeviceClass::detect(),
        };

        let seed = match lookup(SEED_ENV) {
            Some(value) => value
                .trim()
                .parse::<u64>()
                .map_err(|_| ConfigError::InvalidSeed(value.clone()))?,
            None => clock_seed(),
        };

        Ok(Self {
            route,
            device,
            seed,
        })
    }
}

/// Seed from the wall clock so each launch looks a little different.
fn clock_seed() -> u64 {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or(0x5EED)
}
