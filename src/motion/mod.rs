//! Closed-form per-frame motion for every entity pool.
//!
//! Nothing here integrates forces. Each frame adds fixed increments: angles
//! advance by a per-body rate, bodies translate by their velocity, and the
//! bounds are enforced by reflection (asteroids) or wrapping (spacecraft).
//! All increments are per frame, not per second, so the scene runs at the
//! display refresh rate.

use std::f32::consts::TAU;

use bevy::prelude::*;
use rand::Rng;

use crate::asteroid::Asteroid;
use crate::camera::CameraRig;
use crate::fleet::Spacecraft;
use crate::planets::{Moon, Planet};
use crate::background::{STAR_SCALE, Star, StarField};
use crate::types::{FrameSet, SceneClock, SceneRng};

#[cfg(test)]
mod proptest_motion;

/// Per-frame orbit nudge length layered on the authored position.
pub const ORBIT_NUDGE: f32 = 0.2;
/// Extra rate multiplier per unit of scroll fraction.
pub const SCROLL_ACCELERATION: f32 = 2.0;
/// Planet tilt spin as a fraction of its main spin.
pub const SPIN_TILT_RATIO: f32 = 0.1;

/// Moon orbit rate against simulation time.
pub const MOON_ORBIT_RATE: f32 = 0.5;
/// Moon orbit distance as a multiple of the parent radius.
pub const MOON_DISTANCE_RATIO: f32 = 2.5;
/// Moon self-rotation per frame.
pub const MOON_SPIN: f32 = 0.01;

/// Half-extent of the cube the asteroid belt is kept inside.
pub const ASTEROID_BOUND: f32 = 1000.0;
/// Half-extent of the cube spacecraft wrap around.
pub const FLEET_BOUND: f32 = 1200.0;

/// Star field rotation per frame (x, y).
pub const STAR_FIELD_SPIN: Vec2 = Vec2::new(0.00003, 0.00008);
/// Probability that a star changes size on a given frame.
pub const TWINKLE_CHANCE: f64 = 0.01;
/// Maximum size change of a twinkle (either direction).
pub const TWINKLE_DELTA: f32 = 0.25;
pub const STAR_SIZE_MIN: f32 = 1.0;
pub const STAR_SIZE_MAX: f32 = 6.0;

/// Plugin advancing all entity pools once per frame.
pub struct MotionPlugin;

impl Plugin for MotionPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(
            Update,
            (
                advance_starfield,
                advance_planets,
                advance_moons,
                advance_asteroids,
                advance_fleet,
            )
                .in_set(FrameSet::Motion),
        );
    }
}

/// Orbit and spin rate multiplier for the smoothed scroll fraction.
pub fn scroll_multiplier(scroll: f32) -> f32 {
    1.0 + scroll * SCROLL_ACCELERATION
}

/// Advance an orbital angle, keeping it in `[0, 2π)`.
pub fn advance_angle(angle: f32, speed: f32, multiplier: f32) -> f32 {
    (angle + speed * multiplier).rem_euclid(TAU)
}

/// Fixed-length step along the orbital heading, independent of scroll.
pub fn orbit_nudge(angle: f32) -> Vec3 {
    Vec3::new(angle.cos(), 0.0, angle.sin()) * ORBIT_NUDGE
}

/// Advance a planet's angle by one frame and add one nudge along the new
/// heading.
pub fn advance_orbit(planet: &mut Planet, multiplier: f32) {
    planet.angle = advance_angle(planet.angle, planet.orbital_speed, multiplier);
    planet.drift += orbit_nudge(planet.angle);
}

/// Bounded sway of a planet driven by the scroll fraction. Zero at scroll 0.
pub fn scroll_parallax(scroll: f32, index: usize) -> Vec3 {
    let phase = scroll * TAU;
    let i = index as f32;
    Vec3::new(
        ((phase + i * 0.5).sin() - (i * 0.5).sin()) * 50.0,
        ((phase + i * 0.7).cos() - (i * 0.7).cos()) * 30.0,
        0.0,
    )
}

/// Moon position relative to its parent.
pub fn moon_offset(time: f32, phase: f32, parent_radius: f32) -> Vec3 {
    let angle = time * MOON_ORBIT_RATE + phase;
    let distance = parent_radius * MOON_DISTANCE_RATIO;
    Vec3::new(angle.cos() * distance, 0.0, angle.sin() * distance)
}

/// Turn each velocity component whose position is out of bounds back inward.
///
/// Components inside the bound, or already heading inward, are untouched.
pub fn reflect_into_bounds(position: Vec3, velocity: Vec3, bound: f32) -> Vec3 {
    let reflect = |p: f32, v: f32| {
        if p.abs() > bound {
            -p.signum() * v.abs()
        } else {
            v
        }
    };
    Vec3::new(
        reflect(position.x, velocity.x),
        reflect(position.y, velocity.y),
        reflect(position.z, velocity.z),
    )
}

/// Teleport each out-of-bounds component to the opposite face.
pub fn wrap_into_bounds(position: Vec3, bound: f32) -> Vec3 {
    let wrap = |p: f32| {
        if p > bound {
            -bound
        } else if p < -bound {
            bound
        } else {
            p
        }
    };
    Vec3::new(wrap(position.x), wrap(position.y), wrap(position.z))
}

/// Apply the per-frame twinkle to one star size.
pub fn twinkle(size: f32, rng: &mut impl Rng) -> f32 {
    if !rng.random_bool(TWINKLE_CHANCE) {
        return size;
    }
    let delta = rng.random_range(-TWINKLE_DELTA..TWINKLE_DELTA);
    (size + delta).clamp(STAR_SIZE_MIN, STAR_SIZE_MAX)
}

/// Rotate the star field and twinkle individual stars.
pub fn advance_starfield(
    mut fields: Query<&mut Transform, (With<StarField>, Without<Star>)>,
    mut stars: Query<(&mut Star, &mut Transform), Without<StarField>>,
    mut rng: ResMut<SceneRng>,
) {
    for mut transform in fields.iter_mut() {
        transform.rotate_local_y(STAR_FIELD_SPIN.y);
        transform.rotate_local_x(STAR_FIELD_SPIN.x);
    }

    for (mut star, mut transform) in stars.iter_mut() {
        let size = twinkle(star.size, &mut rng.rng);
        if size != star.size {
            star.size = size;
            transform.scale = Vec3::splat(size * STAR_SCALE);
        }
    }
}

/// Spin planets, advance their orbital angle and recompute their position.
pub fn advance_planets(rig: Res<CameraRig>, mut planets: Query<(&mut Planet, &mut Transform)>) {
    let scroll = rig.scroll.current;
    let multiplier = scroll_multiplier(scroll);

    for (mut planet, mut transform) in planets.iter_mut() {
        let spin = planet.spin_speed * multiplier;
        transform.rotate_local_y(spin);
        transform.rotate_local_x(spin * SPIN_TILT_RATIO);

        advance_orbit(&mut planet, multiplier);
        transform.translation = planet.position(scroll);
    }
}

/// Revolve moons around their parent using simulation time.
pub fn advance_moons(clock: Res<SceneClock>, mut moons: Query<(&Moon, &mut Transform)>) {
    for (moon, mut transform) in moons.iter_mut() {
        transform.translation = moon_offset(clock.time, moon.phase, moon.parent_radius);
        transform.rotate_local_y(MOON_SPIN);
    }
}

/// Drift and tumble asteroids, reflecting them off the belt bounds.
pub fn advance_asteroids(mut asteroids: Query<(&mut Asteroid, &mut Transform)>) {
    for (mut asteroid, mut transform) in asteroids.iter_mut() {
        transform.translation += asteroid.velocity;
        let spin = asteroid.angular_velocity;
        transform.rotate_local_x(spin.x);
        transform.rotate_local_y(spin.y);
        transform.rotate_local_z(spin.z);

        asteroid.velocity =
            reflect_into_bounds(transform.translation, asteroid.velocity, ASTEROID_BOUND);
    }
}

/// Move spacecraft along their velocity, wrapping at the fleet bounds.
pub fn advance_fleet(mut fleet: Query<(&Spacecraft, &mut Transform)>) {
    for (craft, mut transform) in fleet.iter_mut() {
        let moved = transform.translation + craft.velocity;
        transform.translation = wrap_into_bounds(moved, FLEET_BOUND);
        let spin = craft.angular_velocity;
        transform.rotate_local_x(spin.x);
        transform.rotate_local_y(spin.y);
        transform.rotate_local_z(spin.z);
    }
}
