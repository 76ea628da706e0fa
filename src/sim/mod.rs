//! Deterministic simulation module
//!
//! All physics lives here. This module must be pure and deterministic:
//! - Fixed per-frame timestep only
//! - Seeded RNG only
//! - Stable iteration order (by ring index)
//! - No rendering or input dependencies

pub mod bubbles;
pub mod collision;
pub mod forces;
pub mod hook;
pub mod state;
pub mod tick;

pub use collision::{RingContact, contain_ring, resolve_ring_collisions, ring_contact};
pub use forces::{Impulse, active_current, integrate_ring, ring_impulse, vortex_direction};
pub use hook::{detect_hook, is_threadable, resolve_stacks, stack_floor};
pub use state::{Bubble, HookState, Ring, Side, World};
pub use tick::{SimEvent, StepReport, TickInput, tick};
