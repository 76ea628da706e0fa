//! Ring-ring collision and tank containment
//!
//! Rings are treated as spheres of radius `min_separation / 2` for contact.
//! Overlap is resolved with a soft positional push plus an equal and opposite
//! impulse along the contact normal. Residual jitter between frames is
//! expected; this is not an exact contact solver.

use glam::Vec3;

use super::state::Ring;
use crate::params::Params;

/// Distances below this are treated as coincident centers
const COINCIDENT_EPSILON: f32 = 1e-6;

/// Relaxation passes per frame; clusters need more than one
const COLLISION_PASSES: usize = 4;

/// Result of a ring pair contact check
#[derive(Debug, Clone)]
pub struct RingContact {
    /// Whether the pair is closer than the minimum separation
    pub hit: bool,
    /// Unit normal pointing from the second ring toward the first
    pub normal: Vec3,
    /// How far inside the minimum separation the pair is
    pub penetration: f32,
}

impl RingContact {
    pub fn miss() -> Self {
        Self {
            hit: false,
            normal: Vec3::ZERO,
            penetration: 0.0,
        }
    }
}

/// Check whether two ring centers are closer than `min_separation`
pub fn ring_contact(a: Vec3, b: Vec3, min_separation: f32) -> RingContact {
    let delta = a - b;
    let dist = delta.length();
    if dist >= min_separation {
        return RingContact::miss();
    }

    // Same point: any direction works, pick +X
    let normal = if dist > COINCIDENT_EPSILON {
        delta / dist
    } else {
        Vec3::X
    };

    RingContact {
        hit: true,
        normal,
        penetration: min_separation - dist,
    }
}

/// Push an overlapping pair apart and cancel their closing speed.
/// Returns true if the pair was in contact.
pub fn separate_pair(a: &mut Ring, b: &mut Ring, params: &Params) -> bool {
    let contact = ring_contact(a.position, b.position, params.min_separation());
    if !contact.hit {
        return false;
    }

    let push = contact.normal * contact.penetration * params.collision_push;
    a.position += push;
    b.position -= push;

    let closing = (a.velocity - b.velocity).dot(contact.normal);
    if closing < 0.0 {
        let impulse = contact.normal * (-closing * (1.0 + params.collision_restitution) * 0.5);
        a.velocity += impulse;
        b.velocity -= impulse;
    }

    true
}

/// Resolve overlapping pairs of free rings, repeating until a pass finds no
/// contact or the pass budget runs out. Hooked rings are skipped. Returns the
/// number of contacts found on the first pass.
pub fn resolve_ring_collisions(rings: &mut [Ring], params: &Params) -> usize {
    let contacts = resolve_pass(rings, params);
    let mut remaining = contacts;
    for _ in 1..COLLISION_PASSES {
        if remaining == 0 {
            break;
        }
        remaining = resolve_pass(rings, params);
    }
    contacts
}

fn resolve_pass(rings: &mut [Ring], params: &Params) -> usize {
    let mut contacts = 0;
    for i in 0..rings.len() {
        let (head, tail) = rings.split_at_mut(i + 1);
        let a = &mut head[i];
        if !a.is_free() {
            continue;
        }
        for b in tail.iter_mut().filter(|r| r.is_free()) {
            if separate_pair(a, b, params) {
                contacts += 1;
            }
        }
    }
    contacts
}

/// Clamp a free ring into the tank, bouncing lossily off any wall it crossed.
/// Returns true if a wall was hit.
pub fn contain_ring(ring: &mut Ring, params: &Params) -> bool {
    let bounds = params.ring_bounds();
    let mut hit = false;

    for axis in 0..3 {
        let limit = bounds[axis];
        if ring.position[axis].abs() > limit {
            ring.position[axis] = ring.position[axis].clamp(-limit, limit);
            ring.velocity[axis] *= -params.wall_damping;
            hit = true;
        }
    }

    hit
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::HookState;
    use proptest::prelude::*;

    fn ring_at(id: u32, position: Vec3) -> Ring {
        Ring::new(id, position, Vec3::ZERO)
    }

    #[test]
    fn test_contact_miss_when_far() {
        let params = Params::default();
        let contact = ring_contact(Vec3::ZERO, Vec3::new(3.0, 0.0, 0.0), params.min_separation());
        assert!(!contact.hit);
    }

    #[test]
    fn test_contact_normal_points_from_b_to_a() {
        let contact = ring_contact(Vec3::new(0.5, 0.0, 0.0), Vec3::ZERO, 1.0);
        assert!(contact.hit);
        assert_eq!(contact.normal, Vec3::X);
        assert!((contact.penetration - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_coincident_rings_use_fallback_axis() {
        let params = Params::default();
        let mut a = ring_at(0, Vec3::new(1.0, 1.0, 0.0));
        let mut b = ring_at(1, Vec3::new(1.0, 1.0, 0.0));
        assert!(separate_pair(&mut a, &mut b, &params));

        assert!(a.position.is_finite() && b.position.is_finite());
        let dist = a.position.distance(b.position);
        assert!((dist - params.min_separation()).abs() < 1e-4);
        assert!(a.position.x > b.position.x);
    }

    #[test]
    fn test_closing_velocity_is_reversed() {
        let params = Params::default();
        let mut a = ring_at(0, Vec3::new(0.5, 0.0, 0.0));
        let mut b = ring_at(1, Vec3::new(-0.5, 0.0, 0.0));
        a.velocity = Vec3::new(-0.1, 0.0, 0.0);
        b.velocity = Vec3::new(0.1, 0.0, 0.0);

        separate_pair(&mut a, &mut b, &params);

        let closing = (a.velocity - b.velocity).x;
        assert!(closing > 0.0, "pair should now be separating");
        // Equal and opposite impulses conserve momentum
        assert!((a.velocity + b.velocity).length() < 1e-6);
        assert!((closing - 0.2 * params.collision_restitution).abs() < 1e-6);
    }

    #[test]
    fn test_separating_velocity_untouched() {
        let params = Params::default();
        let mut a = ring_at(0, Vec3::new(0.5, 0.0, 0.0));
        let mut b = ring_at(1, Vec3::new(-0.5, 0.0, 0.0));
        a.velocity = Vec3::new(0.1, 0.0, 0.0);
        separate_pair(&mut a, &mut b, &params);
        assert_eq!(a.velocity, Vec3::new(0.1, 0.0, 0.0));
        assert_eq!(b.velocity, Vec3::ZERO);
    }

    #[test]
    fn test_hooked_rings_skip_collision() {
        let params = Params::default();
        let mut rings = vec![ring_at(0, Vec3::ZERO), ring_at(1, Vec3::new(0.1, 0.0, 0.0))];
        rings[1].hook = HookState::HookedLeft;

        assert_eq!(resolve_ring_collisions(&mut rings, &params), 0);
        assert_eq!(rings[0].position, Vec3::ZERO);
    }

    #[test]
    fn test_chain_of_three_is_separated() {
        let params = Params::default();
        let sep = params.min_separation();
        // Middle ring overlaps both neighbours; one pass would push it back
        // into the first while clearing the second
        let mut rings = vec![
            ring_at(0, Vec3::new(-0.6 * sep, 0.0, 0.0)),
            ring_at(1, Vec3::ZERO),
            ring_at(2, Vec3::new(0.6 * sep, 0.0, 0.0)),
        ];
        assert_eq!(resolve_ring_collisions(&mut rings, &params), 2);

        for _ in 0..16 {
            resolve_ring_collisions(&mut rings, &params);
        }
        assert!(rings[0].position.distance(rings[1].position) >= sep - 1e-3);
        assert!(rings[1].position.distance(rings[2].position) >= sep - 1e-3);
        assert!(rings[0].position.distance(rings[2].position) >= sep - 1e-3);
    }

    #[test]
    fn test_contain_bounces_off_wall() {
        let params = Params::default();
        let bounds = params.ring_bounds();
        let mut ring = ring_at(0, Vec3::new(bounds.x + 0.3, 0.0, -bounds.z - 1.0));
        ring.velocity = Vec3::new(0.2, 0.0, -0.1);

        assert!(contain_ring(&mut ring, &params));
        assert_eq!(ring.position.x, bounds.x);
        assert_eq!(ring.position.z, -bounds.z);
        assert!((ring.velocity.x + 0.2 * params.wall_damping).abs() < 1e-6);
        assert!((ring.velocity.z - 0.1 * params.wall_damping).abs() < 1e-6);
    }

    #[test]
    fn test_contain_leaves_inside_ring_alone() {
        let params = Params::default();
        let mut ring = ring_at(0, Vec3::new(1.0, -2.0, 0.1));
        ring.velocity = Vec3::new(0.05, 0.05, 0.0);
        assert!(!contain_ring(&mut ring, &params));
        assert_eq!(ring.velocity, Vec3::new(0.05, 0.05, 0.0));
    }

    proptest! {
        #[test]
        fn prop_contain_keeps_ring_in_tank(
            x in -40.0f32..40.0, y in -40.0f32..40.0, z in -40.0f32..40.0,
            vx in -1.0f32..1.0, vy in -1.0f32..1.0, vz in -1.0f32..1.0,
        ) {
            let params = Params::default();
            let mut ring = ring_at(0, Vec3::new(x, y, z));
            ring.velocity = Vec3::new(vx, vy, vz);
            contain_ring(&mut ring, &params);

            let bounds = params.ring_bounds();
            prop_assert!(ring.position.abs().cmple(bounds + Vec3::splat(1e-5)).all());
            prop_assert!(ring.velocity.length() <= Vec3::new(vx, vy, vz).length() + 1e-6);
        }

        #[test]
        fn prop_pair_separated_after_resolution(
            ax in -2.0f32..2.0, ay in -2.0f32..2.0, az in -0.5f32..0.5,
            dx in -1.5f32..1.5, dy in -1.5f32..1.5, dz in -0.5f32..0.5,
        ) {
            let params = Params::default();
            let mut a = ring_at(0, Vec3::new(ax, ay, az));
            let mut b = ring_at(1, Vec3::new(ax + dx, ay + dy, az + dz));
            separate_pair(&mut a, &mut b, &params);
            prop_assert!(a.position.distance(b.position) >= params.min_separation() - 1e-4);
        }

        #[test]
        fn prop_cluster_separated_after_resolution(
            points in prop::collection::vec(
                (-3.0f32..3.0, -3.0f32..3.0, -0.5f32..0.5),
                3..6,
            ),
        ) {
            let params = Params::default();
            let mut rings: Vec<Ring> = points
                .iter()
                .enumerate()
                .map(|(i, &(x, y, z))| ring_at(i as u32, Vec3::new(x, y, z)))
                .collect();

            // A dense cluster may take a few frames to open up
            for _ in 0..64 {
                if resolve_ring_collisions(&mut rings, &params) == 0 {
                    break;
                }
            }

            for i in 0..rings.len() {
                for j in (i + 1)..rings.len() {
                    let dist = rings[i].position.distance(rings[j].position);
                    prop_assert!(dist >= params.min_separation() - 1e-3, "rings {} and {} at {}", i, j, dist);
                }
            }
        }
    }
}
