//! Pairwise spacecraft collisions.
//!
//! Every unordered pair of craft is tested once per frame. Craft closer than
//! the contact threshold swap velocities, get a small random perturbation and
//! are pushed apart along the line through their midpoint. Each contact
//! requests one explosion burst at the midpoint.
//!
//! The pass is O(n²), which is fine for a fleet of a dozen craft.

use bevy::prelude::*;
use rand::Rng;

use crate::effects::{BurstKind, SpawnBurstEvent};
use crate::fleet::{Spacecraft, heading_rotation};
use crate::types::{FrameSet, SceneRng};

/// Distance below which two craft are in contact.
pub const CONTACT_THRESHOLD: f32 = 20.0;
/// Distance each craft is pushed away from the contact midpoint.
pub const SEPARATION_PUSH: f32 = 15.0;
/// Largest per-component velocity perturbation after a contact.
pub const PERTURBATION: f32 = 0.1;

/// Position and velocity of one craft, detached from the ECS.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CraftBody {
    pub position: Vec3,
    pub velocity: Vec3,
}

/// A resolved contact between craft `a` and `b` (indices, `a < b`).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Contact {
    pub a: usize,
    pub b: usize,
    /// Midpoint of the pair before separation.
    pub midpoint: Vec3,
}

/// Whether two positions are in contact. Symmetric in its arguments.
pub fn in_contact(a: Vec3, b: Vec3) -> bool {
    a.distance_squared(b) < CONTACT_THRESHOLD * CONTACT_THRESHOLD
}

fn perturbation(rng: &mut impl Rng) -> Vec3 {
    Vec3::new(
        rng.random_range(-PERTURBATION..PERTURBATION),
        rng.random_range(-PERTURBATION..PERTURBATION),
        rng.random_range(-PERTURBATION..PERTURBATION),
    )
}

/// Resolve every contact in `bodies` in place and report them.
///
/// Pairs are visited in `(i, j)` order with `i < j`, so each pair yields at
/// most one contact per call. A pair resolved earlier in the pass is seen
/// with its updated positions by later pairs.
pub fn resolve_contacts(bodies: &mut [CraftBody], rng: &mut impl Rng) -> Vec<Contact> {
    let mut contacts = Vec::new();

    for i in 0..bodies.len() {
        for j in (i + 1)..bodies.len() {
            let (a, b) = (bodies[i], bodies[j]);
            if !in_contact(a.position, b.position) {
                continue;
            }

            let midpoint = (a.position + b.position) * 0.5;
            // Coincident craft separate along ±X
            let away_a = (a.position - midpoint).try_normalize().unwrap_or(-Vec3::X);
            let away_b = (b.position - midpoint).try_normalize().unwrap_or(Vec3::X);

            bodies[i] = CraftBody {
                position: a.position + away_a * SEPARATION_PUSH,
                velocity: b.velocity + perturbation(rng),
            };
            bodies[j] = CraftBody {
                position: b.position + away_b * SEPARATION_PUSH,
                velocity: a.velocity + perturbation(rng),
            };

            contacts.push(Contact { a: i, b: j, midpoint });
        }
    }

    contacts
}

/// Plugin for spacecraft collisions.
pub struct CollisionPlugin;

impl Plugin for CollisionPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Update, collide_fleet.in_set(FrameSet::Collision));
    }
}

/// Detect and resolve craft contacts, requesting an explosion for each.
pub fn collide_fleet(
    mut fleet: Query<(&mut Spacecraft, &mut Transform)>,
    mut rng: ResMut<SceneRng>,
    mut bursts: MessageWriter<SpawnBurstEvent>,
) {
    let mut craft: Vec<_> = fleet.iter_mut().collect();
    if craft.len() < 2 {
        return;
    }

    let mut bodies: Vec<CraftBody> = craft
        .iter()
        .map(|(spacecraft, transform)| CraftBody {
            position: transform.translation,
            velocity: spacecraft.velocity,
        })
        .collect();

    let contacts = resolve_contacts(&mut bodies, &mut rng.rng);
    if contacts.is_empty() {
        return;
    }

    for ((spacecraft, transform), body) in craft.iter_mut().zip(&bodies) {
        if spacecraft.velocity != body.velocity {
            // Turn the nose onto the new heading
            transform.rotation = heading_rotation(body.velocity);
            spacecraft.velocity = body.velocity;
        }
        transform.translation = body.position;
    }

    for contact in &contacts {
        debug!(
            "Spacecraft contact ({}, {}) at {:?}",
            contact.a, contact.b, contact.midpoint
        );
        bursts.write(SpawnBurstEvent {
            position: contact.midpoint,
            kind: BurstKind::Explosion,
        });
    }
}
