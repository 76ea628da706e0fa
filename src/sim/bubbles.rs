//! Current-indicator bubbles
//!
//! Purely visual: bubbles stream from the active jet while a current runs,
//! rise with a slight wobble, and are reaped at the ceiling or when their
//! life runs out.

use std::f32::consts::TAU;

use glam::Vec3;
use rand::Rng;

use super::state::{Bubble, Side};
use crate::params::Params;

/// Horizontal scatter around the jet mouth
const SPAWN_SPREAD: f32 = 0.3;
/// Initial sideways speed range, directed away from the jet's wall
const LATERAL_SPEED: (f32, f32) = (0.01, 0.03);
/// Initial upward speed range
const RISE_SPEED: (f32, f32) = (0.03, 0.06);
/// Wobble cycles per unit of life
const WOBBLE_FREQUENCY: f32 = 12.0;

/// Emit up to `bubble_burst` bubbles from `side`'s jet.
/// Returns true if the bubble cap stopped the burst.
pub fn spawn_bubbles(
    bubbles: &mut Vec<Bubble>,
    side: Side,
    params: &Params,
    rng: &mut impl Rng,
) -> bool {
    let source = params.current_source(side);

    for _ in 0..params.bubble_burst {
        if bubbles.len() >= params.max_bubbles {
            return true;
        }
        if !rng.random_bool(params.bubble_spawn_chance as f64) {
            continue;
        }

        let offset = Vec3::new(
            rng.random_range(-SPAWN_SPREAD..=SPAWN_SPREAD),
            0.0,
            rng.random_range(-SPAWN_SPREAD..=SPAWN_SPREAD),
        );
        let velocity = Vec3::new(
            -side.sign() * rng.random_range(LATERAL_SPEED.0..LATERAL_SPEED.1),
            rng.random_range(RISE_SPEED.0..RISE_SPEED.1),
            0.0,
        );
        bubbles.push(Bubble {
            position: source + offset,
            velocity,
            life: 1.0,
            phase: rng.random_range(0.0..TAU),
        });
    }

    false
}

/// One frame of bubble motion: drag-free rise plus sideways wobble
pub fn advance_bubble(bubble: &mut Bubble, params: &Params) {
    bubble.velocity.y += params.bubble_rise;
    bubble.position += bubble.velocity;
    bubble.position.x += (bubble.life * WOBBLE_FREQUENCY + bubble.phase).sin() * params.bubble_wobble;
    bubble.life -= params.bubble_decay;
}

/// Whether a bubble should still be shown
pub fn is_alive(bubble: &Bubble, params: &Params) -> bool {
    bubble.life > 0.0 && bubble.position.y <= params.ceiling_y() && bubble.position.is_finite()
}

/// Advance and reap every bubble, then spawn for the active current.
/// Returns true if spawning was capped.
pub fn update_bubbles(
    bubbles: &mut Vec<Bubble>,
    current: Option<Side>,
    params: &Params,
    rng: &mut impl Rng,
) -> bool {
    for bubble in bubbles.iter_mut() {
        advance_bubble(bubble, params);
    }
    bubbles.retain(|b| is_alive(b, params));

    match current {
        Some(side) => spawn_bubbles(bubbles, side, params, rng),
        None => false,
    }
}
