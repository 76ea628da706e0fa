//! Force field and integrator for free rings
//!
//! A running current stirs the tank into a vortex around the depth (Z) axis.
//! Left and right currents spin it in opposite directions.

use glam::Vec3;
use rand::Rng;

use super::state::{Ring, Side};
use crate::params::Params;
use crate::wrap_angle;

/// Per-frame perturbation applied to one free ring
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Impulse {
    /// Added to linear velocity
    pub force: Vec3,
    /// Added to angular velocity
    pub spin: Vec3,
}

/// The current that drives the tank this frame. Left wins when both run.
pub fn active_current(left: bool, right: bool) -> Option<Side> {
    if left {
        Some(Side::Left)
    } else if right {
        Some(Side::Right)
    } else {
        None
    }
}

/// Unit swirl direction at `position`; zero on the tank's center axis
pub fn vortex_direction(position: Vec3, side: Side) -> Vec3 {
    let swirl = Vec3::new(position.y, -position.x, 0.0).normalize_or_zero();
    match side {
        Side::Left => swirl,
        Side::Right => -swirl,
    }
}

/// Net force and spin perturbation on a free ring
pub fn ring_impulse(
    position: Vec3,
    current: Option<Side>,
    params: &Params,
    rng: &mut impl Rng,
) -> Impulse {
    let mut impulse = Impulse {
        force: Vec3::new(0.0, params.net_lift(), 0.0),
        spin: Vec3::ZERO,
    };

    if let Some(side) = current {
        impulse.force += vortex_direction(position, side) * params.push_force;
        impulse.force += jitter(rng, params.force_jitter);
        // Turbulence tumbles the ring about X and Z
        let spin = jitter(rng, params.spin_jitter);
        impulse.spin += Vec3::new(spin.x, 0.0, spin.z);
    }

    impulse
}

/// Semi-implicit Euler step with fluid drag
pub fn integrate_ring(ring: &mut Ring, impulse: Impulse, params: &Params) {
    ring.velocity += impulse.force;
    ring.velocity *= params.linear_drag;
    ring.position += ring.velocity;

    ring.angular_velocity += impulse.spin;
    ring.angular_velocity *= params.angular_drag;
    ring.rotation = Vec3::new(
        wrap_angle(ring.rotation.x + ring.angular_velocity.x),
        wrap_angle(ring.rotation.y + ring.angular_velocity.y),
        wrap_angle(ring.rotation.z + ring.angular_velocity.z),
    );
}

/// Uniform noise in [-amount, amount] on each axis
fn jitter(rng: &mut impl Rng, amount: f32) -> Vec3 {
    if amount <= 0.0 {
        return Vec3::ZERO;
    }
    Vec3::new(
        rng.random_range(-amount..=amount),
        rng.random_range(-amount..=amount),
        rng.random_range(-amount..=amount),
    )
}
