//! Threading rings onto posts, and stacking them once they are on
//!
//! A free ring hooks when it is close to a post's axis, within the post's
//! height range and lying roughly flat. Hooking is terminal: the ring is
//! then driven only by the stack resolver, sliding onto the axis and sinking
//! until it rests on the post base or on top of the rings hooked before it.

use std::f32::consts::{FRAC_PI_2, PI, TAU};

use glam::{Vec2, Vec3};
use rand::Rng;

use super::state::{HookState, Ring, Side};
use crate::params::Params;

/// Whether an X tilt leaves the ring flat enough to slide over a post
pub fn is_threadable(tilt_x: f32, tolerance: f32) -> bool {
    let tilt = tilt_x.rem_euclid(PI);
    (tilt - FRAC_PI_2).abs() < tolerance
}

/// Distance from `position` to a vertical post axis, ignoring height
pub fn axis_distance(position: Vec3, post_x: f32) -> f32 {
    Vec2::new(position.x - post_x, position.z).length()
}

/// Check whether a free ring threads onto `side`'s post this frame
pub fn hooks_onto(ring: &Ring, side: Side, params: &Params, rng: &mut impl Rng) -> bool {
    let dist = axis_distance(ring.position, params.post_x(side));
    if dist >= params.capture_radius() {
        return false;
    }
    if !(params.post_bottom_y..=params.post_top_y).contains(&ring.position.y) {
        return false;
    }
    if !is_threadable(ring.rotation.x, params.tilt_tolerance) {
        return false;
    }

    // Falling rings and dead-center rings always go on. Anything else in the
    // capture zone gets a small chance each frame so it can't hover forever.
    ring.velocity.y < 0.0
        || dist < params.axis_snap_radius
        || rng.random_bool(params.hook_chance as f64)
}

/// First post (left, then right) the ring threads onto this frame
pub fn detect_hook(ring: &Ring, params: &Params, rng: &mut impl Rng) -> Option<Side> {
    if !ring.is_free() {
        return None;
    }
    Side::ALL
        .into_iter()
        .find(|&side| hooks_onto(ring, side, params, rng))
}

/// Put a free ring on a post. Returns false if it was already hooked.
pub fn attach(ring: &mut Ring, side: Side, order: u32) -> bool {
    if !ring.is_free() {
        return false;
    }
    ring.hook = HookState::hooked_on(side);
    ring.hook_order = order;
    ring.velocity = Vec3::ZERO;
    ring.angular_velocity = Vec3::ZERO;
    true
}

/// Lowest height `ring` may rest at: the post base, raised to clear every
/// ring hooked before it on the same post
pub fn stack_floor(rings: &[Ring], ring: &Ring, params: &Params) -> f32 {
    let Some(side) = ring.hook.side() else {
        return params.post_bottom_y;
    };
    let spacing = params.stack_spacing();

    rings
        .iter()
        .filter(|other| other.hook.side() == Some(side) && other.hook_order < ring.hook_order)
        .fold(params.post_bottom_y, |floor, other| floor.max(other.position.y + spacing))
}

/// Nearest X rotation that lies flat
fn nearest_flat(tilt_x: f32) -> f32 {
    FRAC_PI_2 + ((tilt_x - FRAC_PI_2) / PI).round() * PI
}

/// Nearest whole turn, so damping never spins a ring the long way round
fn nearest_turn(angle: f32) -> f32 {
    (angle / TAU).round() * TAU
}

/// Advance one hooked ring toward its resting pose above `floor`
pub fn settle_hooked(ring: &mut Ring, floor: f32, params: &Params) {
    let Some(side) = ring.hook.side() else {
        return;
    };

    let axis = Vec3::new(params.post_x(side), ring.position.y, 0.0);
    ring.position.x += (axis.x - ring.position.x) * params.slide_blend;
    ring.position.z += (axis.z - ring.position.z) * params.slide_blend;

    ring.position.y = if ring.position.y > floor {
        (ring.position.y - params.hooked_sink_speed).max(floor)
    } else {
        floor
    };

    ring.velocity = Vec3::ZERO;
    ring.angular_velocity = Vec3::ZERO;

    let flat = nearest_flat(ring.rotation.x);
    ring.rotation.x += (flat - ring.rotation.x) * params.level_blend;
    for i in [1, 2] {
        let rest = nearest_turn(ring.rotation[i]);
        ring.rotation[i] = rest + (ring.rotation[i] - rest) * params.spin_damping;
    }
}

/// Run the stack resolver over every hooked ring, in ring order
pub fn resolve_stacks(rings: &mut [Ring], params: &Params) {
    for i in 0..rings.len() {
        if rings[i].is_free() {
            continue;
        }
        let floor = stack_floor(rings, &rings[i], params);
        settle_hooked(&mut rings[i], floor, params);
    }
}
