//! Fixed-step simulation tick
//!
//! One call advances the whole tank by one frame: stacked rings settle,
//! free rings feel the current, collide and bounce off the walls, then get
//! a chance to thread onto a post. Bubbles update last.

use serde::{Deserialize, Serialize};

use super::bubbles::update_bubbles;
use super::collision::{contain_ring, resolve_ring_collisions};
use super::forces::{active_current, integrate_ring, ring_impulse};
use super::hook::{detect_hook, resolve_stacks};
use super::state::{HookState, Side, World};

/// Input for a single tick: which current buttons are held
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TickInput {
    pub left: bool,
    pub right: bool,
}

impl TickInput {
    /// The current that actually runs. Left wins when both are held.
    pub fn current(&self) -> Option<Side> {
        active_current(self.left, self.right)
    }
}

/// Something the host may want to react to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SimEvent {
    /// A ring threaded onto a post this frame
    RingHooked { ring_id: u32, side: Side },
    /// Every ring is on a post. Fires once per session.
    AllHooked,
}

/// What happened during one tick
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StepReport {
    pub hooked_count: usize,
    pub hooked_left: usize,
    pub hooked_right: usize,
    pub events: Vec<SimEvent>,
}

/// Advance the world by one frame
pub fn tick(world: &mut World, input: &TickInput) -> StepReport {
    let current = input.current();
    world.frame += 1;

    let (params, rings, bubbles, rng) = world.parts_mut();

    // Hooked rings: slide onto the post and settle on the stack
    resolve_stacks(rings, params);

    // Free rings: forces, integration, contacts, walls
    for ring in rings.iter_mut().filter(|r| r.is_free()) {
        let impulse = ring_impulse(ring.position, current, params, rng);
        integrate_ring(ring, impulse, params);
    }
    resolve_ring_collisions(rings, params);
    for ring in rings.iter_mut().filter(|r| r.is_free()) {
        contain_ring(ring, params);
    }

    let capped = update_bubbles(bubbles, current, params, rng);
    if world.note_bubble_cap(capped) {
        log::warn!("Bubble cap of {} reached", world.params.max_bubbles);
    }

    // Threading
    let mut events = Vec::new();
    for i in 0..world.rings.len() {
        let side = {
            let (params, rings, _, rng) = world.parts_mut();
            detect_hook(&rings[i], params, rng)
        };
        if let Some(side) = side {
            if world.hook_ring(i, side) {
                let ring_id = world.rings[i].id;
                log::debug!("Ring {} hooked on {} post at frame {}", ring_id, side.as_str(), world.frame);
                events.push(SimEvent::RingHooked { ring_id, side });
            }
        }
    }

    let hooked_left = world.rings.iter().filter(|r| r.hook == HookState::HookedLeft).count();
    let hooked_right = world.rings.iter().filter(|r| r.hook == HookState::HookedRight).count();
    let hooked_count = hooked_left + hooked_right;

    if hooked_count == world.rings.len() && world.latch_all_hooked() {
        log::info!("All {} rings hooked after {} frames", hooked_count, world.frame);
        events.push(SimEvent::AllHooked);
    }

    StepReport {
        hooked_count,
        hooked_left,
        hooked_right,
        events,
    }
}
