//! Test utilities for backdrop simulation tests.
//!
//! Provides proptest strategies and fixtures for entity states, and
//! assertions for angle and separation invariants.

use bevy::math::Vec3;

/// Fixtures for creating test states.
pub mod fixtures {
    use super::*;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    use crate::collision::CraftBody;
    use crate::motion::ASTEROID_BOUND;

    /// Deterministic RNG for a test.
    pub fn rng(seed: u64) -> ChaCha8Rng {
        ChaCha8Rng::seed_from_u64(seed)
    }

    /// Strategy for a vector with every component in `[-extent, extent]`.
    pub fn vec3_in(extent: f32) -> impl Strategy<Value = Vec3> {
        (-extent..=extent, -extent..=extent, -extent..=extent)
            .prop_map(|(x, y, z)| Vec3::new(x, y, z))
    }

    /// Strategy for an asteroid position inside the belt and a drift velocity
    /// in the generator's range.
    pub fn asteroid_state() -> impl Strategy<Value = (Vec3, Vec3)> {
        (vec3_in(ASTEROID_BOUND), vec3_in(0.05))
    }

    /// Two craft `gap` apart on the x axis, closing on each other.
    pub fn closing_pair(center: Vec3, gap: f32, speed: f32) -> Vec<CraftBody> {
        vec![
            CraftBody {
                position: center - Vec3::X * (gap / 2.0),
                velocity: Vec3::X * speed,
            },
            CraftBody {
                position: center + Vec3::X * (gap / 2.0),
                velocity: -Vec3::X * speed,
            },
        ]
    }
}

/// Assertions for checking scene invariants.
pub mod assertions {
    use super::*;
    use std::f32::consts::TAU;

    /// Forward angular distance from `from` to `to`, in `[0, 2π)`.
    pub fn forward_angle(from: f32, to: f32) -> f32 {
        (to - from).rem_euclid(TAU)
    }

    /// Whether every component of `a - b` lies within `tolerance`.
    pub fn within_component(a: Vec3, b: Vec3, tolerance: f32) -> bool {
        (a - b).abs().max_element() <= tolerance
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_forward_angle_across_wrap() {
        let forward = assertions::forward_angle(6.28, 0.0005);
        assert!(forward > 0.0 && forward < 0.01);
    }

    #[test]
    fn test_closing_pair_layout() {
        let pair = fixtures::closing_pair(Vec3::ZERO, 10.0, 1.0);
        assert_eq!(pair[0].position.distance(pair[1].position), 10.0);
        assert!(pair[0].velocity.dot(pair[1].velocity) < 0.0);
    }

    #[test]
    fn test_within_component() {
        assert!(assertions::within_component(Vec3::ONE, Vec3::splat(1.05), 0.1));
        assert!(!assertions::within_component(Vec3::ONE, Vec3::splat(1.2), 0.1));
    }
}
