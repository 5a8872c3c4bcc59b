//! Property-based tests for the motion integrator using proptest.
//!
//! These tests verify the pool invariants across a wide range of rates,
//! positions and velocities.

use std::f32::consts::TAU;

use proptest::prelude::*;

use super::*;
use crate::planets::{PLANET_TABLE, Planet};
use crate::test_utils::{assertions, fixtures};

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// The orbital angle moves forward by exactly one step every frame,
    /// modulo 2π, and never leaves `[0, 2π)`.
    #[test]
    fn prop_orbital_angle_strictly_increases(
        start in 0.0f32..TAU,
        speed in 0.00005f32..0.01,
        scroll in 0.0f32..1.0,
        frames in 1usize..2000,
    ) {
        let multiplier = scroll_multiplier(scroll);
        let mut angle = start;
        for _ in 0..frames {
            let next = advance_angle(angle, speed, multiplier);
            let forward = assertions::forward_angle(angle, next);
            prop_assert!(forward > 0.0, "angle went from {} to {}", angle, next);
            prop_assert!((forward - speed * multiplier).abs() < 1e-4);
            prop_assert!((0.0..TAU).contains(&next));
            angle = next;
        }
    }

    /// Asteroids never escape the belt by more than one velocity step.
    #[test]
    fn prop_asteroid_stays_in_bounds(
        (position, velocity) in fixtures::asteroid_state(),
        frames in 1usize..5000,
    ) {
        let mut position = position;
        let mut velocity = velocity;
        let limit = ASTEROID_BOUND + velocity.abs().max_element() + 1e-3;

        for _ in 0..frames {
            position += velocity;
            let reflected = reflect_into_bounds(position, velocity, ASTEROID_BOUND);

            // Each axis is handled on its own: a flip only happens on an axis
            // that is out of bounds
            for axis in 0..3 {
                if reflected[axis] != velocity[axis] {
                    prop_assert!(position[axis].abs() > ASTEROID_BOUND);
                    prop_assert_eq!(reflected[axis], -velocity[axis]);
                }
            }
            velocity = reflected;

            prop_assert!(position.abs().max_element() <= limit,
                "asteroid escaped to {:?}", position);
        }
    }

    /// Spacecraft positions wrap to the opposite face instead of reflecting.
    #[test]
    fn prop_spacecraft_wraps(
        start in fixtures::vec3_in(FLEET_BOUND),
        velocity in fixtures::vec3_in(3.0),
        frames in 1usize..3000,
    ) {
        let mut position = start;
        for _ in 0..frames {
            let moved = position + velocity;
            let wrapped = wrap_into_bounds(moved, FLEET_BOUND);
            for axis in 0..3 {
                if moved[axis] > FLEET_BOUND {
                    prop_assert_eq!(wrapped[axis], -FLEET_BOUND);
                } else if moved[axis] < -FLEET_BOUND {
                    prop_assert_eq!(wrapped[axis], FLEET_BOUND);
                } else {
                    prop_assert_eq!(wrapped[axis], moved[axis]);
                }
            }
            position = wrapped;
            prop_assert!(position.abs().max_element() <= FLEET_BOUND);
        }
    }

    /// Every frame moves a planet by exactly one nudge, whatever the
    /// scroll position does in between.
    #[test]
    fn prop_orbit_step_is_one_nudge(
        speed in 0.00008f32..0.00025,
        scrolls in prop::collection::vec(0.0f32..1.0, 1..200),
    ) {
        let mut planet = Planet::from_spec(0, &PLANET_TABLE[0], 0.001);
        planet.orbital_speed = speed;
        for scroll in scrolls {
            let before = planet.drift;
            advance_orbit(&mut planet, scroll_multiplier(scroll));
            let step = (planet.drift - before).length();
            prop_assert!((step - ORBIT_NUDGE).abs() < 1e-3, "step {}", step);
        }
    }

    /// Twinkled sizes never leave `[1, 6]`.
    #[test]
    fn prop_twinkle_clamped(size in 1.0f32..6.0, seed in any::<u64>()) {
        let mut rng = fixtures::rng(seed);
        let mut size = size;
        for _ in 0..500 {
            size = twinkle(size, &mut rng);
            prop_assert!((STAR_SIZE_MIN..=STAR_SIZE_MAX).contains(&size));
        }
    }
}
