//! Body-body collision detection and response
//!
//! Every body is treated as its bounding circle and all bodies have equal mass.
//! Candidate pairs come from a [`BroadPhase`]; the narrow phase and resolution
//! math are the same whatever strategy produced them.

use glam::Vec2;

use super::body::Body;
use crate::consts::{LINK_MAX_ALPHA, MIN_CONTACT_DIST};

/// Overlap between two circles
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Contact {
    /// Unit normal pointing from the first body toward the second
    pub normal: Vec2,
    /// Center distance
    pub distance: f32,
    /// Total interpenetration depth
    pub penetration: f32,
}

/// Check two circles for overlap.
///
/// Returns `None` when they are apart, just touching, or so close to coincident
/// (`distance <= MIN_CONTACT_DIST`) that the normal is meaningless.
pub fn circle_contact(a_pos: Vec2, a_radius: f32, b_pos: Vec2, b_radius: f32) -> Option<Contact> {
    let delta = b_pos - a_pos;
    let distance = delta.length();
    let min_dist = a_radius + b_radius;

    if !(distance > MIN_CONTACT_DIST && distance < min_dist) {
        return None;
    }

    Some(Contact {
        normal: delta / distance,
        distance,
        penetration: min_dist - distance,
    })
}

/// Produces the unordered candidate pairs `(i, j)` with `i < j`.
///
/// Implementations must yield each pair at most once so impulses are never
/// applied twice in one tick.
pub trait BroadPhase {
    fn candidate_pairs(&mut self, bodies: &[Body]) -> Vec<(usize, usize)>;
}

/// Every unordered pair, O(n²). Fine for the few hundred bodies a panel holds.
#[derive(Debug, Clone, Copy, Default)]
pub struct AllPairs;

impl BroadPhase for AllPairs {
    fn candidate_pairs(&mut self, bodies: &[Body]) -> Vec<(usize, usize)> {
        let n = bodies.len();
        let mut pairs = Vec::with_capacity(n * n.saturating_sub(1) / 2);
        for i in 0..n {
            for j in (i + 1)..n {
                pairs.push((i, j));
            }
        }
        pairs
    }
}

/// Per-tick collision counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CollisionStats {
    /// Overlapping pairs that were pushed apart
    pub contacts: u32,
    /// Approaching pairs that exchanged an impulse
    pub impulses: u32,
}

/// Borrow two distinct bodies mutably
fn pair_mut(bodies: &mut [Body], i: usize, j: usize) -> (&mut Body, &mut Body) {
    debug_assert!(i != j, "self-collision pair");
    if i < j {
        let (head, tail) = bodies.split_at_mut(j);
        (&mut head[i], &mut tail[0])
    } else {
        let (head, tail) = bodies.split_at_mut(i);
        (&mut tail[0], &mut head[j])
    }
}

/// Separate and bounce one pair. Returns the contact when they overlapped.
pub fn resolve_pair(a: &mut Body, b: &mut Body, restitution: f32) -> Option<(Contact, bool)> {
    let contact = circle_contact(a.pos, a.radius, b.pos, b.radius)?;
    let n = contact.normal;

    // Equal mass: each body takes half the correction
    let half = contact.penetration * 0.5;
    a.pos -= n * half;
    b.pos += n * half;

    // Positive means closing along the normal
    let rel_v = (a.vel - b.vel).dot(n);
    let approaching = rel_v > 0.0;
    if approaching {
        let impulse = rel_v * restitution;
        a.vel -= n * impulse;
        b.vel += n * impulse;
    }

    Some((contact, approaching))
}

/// Resolve every overlapping pair exactly once
pub fn resolve_collisions<B: BroadPhase + ?Sized>(
    bodies: &mut [Body],
    restitution: f32,
    broad_phase: &mut B,
) -> CollisionStats {
    let mut stats = CollisionStats::default();

    for (i, j) in broad_phase.candidate_pairs(bodies) {
        if i == j || i >= bodies.len() || j >= bodies.len() {
            continue;
        }
        let (a, b) = pair_mut(bodies, i, j);
        if let Some((_, approaching)) = resolve_pair(a, b, restitution) {
            stats.contacts += 1;
            if approaching {
                stats.impulses += 1;
            }
        }
    }

    stats
}

/// A pair of bodies close enough to be drawn connected
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Link {
    pub a: usize,
    pub b: usize,
    pub distance: f32,
}

impl Link {
    /// Line opacity, fading to zero at `max_distance`
    pub fn alpha(&self, max_distance: f32) -> f32 {
        if max_distance <= 0.0 {
            return 0.0;
        }
        ((1.0 - self.distance / max_distance) * LINK_MAX_ALPHA).clamp(0.0, LINK_MAX_ALPHA)
    }
}

/// All pairs with center distance under `max_distance`, `a < b`
pub fn proximity_links(bodies: &[Body], max_distance: f32) -> Vec<Link> {
    let mut links = Vec::new();
    if max_distance <= 0.0 {
        return links;
    }
    let max_sq = max_distance * max_distance;
    for (i, a) in bodies.iter().enumerate() {
        for (j, b) in bodies.iter().enumerate().skip(i + 1) {
            let d2 = a.pos.distance_squared(b.pos);
            if d2 < max_sq {
                links.push(Link {
                    a: i,
                    b: j,
                    distance: d2.sqrt(),
                });
            }
        }
    }
    links
}
