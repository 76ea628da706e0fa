//! Simulation state and core entity types
//!
//! Rings and bubbles are plain data. The host reads them (or a
//! [`Snapshot`](crate::snapshot::Snapshot)) after each tick; nothing here knows
//! about meshes or input devices.

use glam::Vec3;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::hook;
use crate::error::{ConfigError, Result};
use crate::params::Params;

/// Which side of the tank: selects a post and a current jet
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    Left,
    Right,
}

impl Side {
    /// Both sides, left first
    pub const ALL: [Side; 2] = [Side::Left, Side::Right];

    /// -1 for left, +1 for right
    pub fn sign(self) -> f32 {
        match self {
            Side::Left => -1.0,
            Side::Right => 1.0,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Side::Left => "left",
            Side::Right => "right",
        }
    }
}

/// Ring attachment state. Hooked states are terminal for a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum HookState {
    #[default]
    Free,
    HookedLeft,
    HookedRight,
}

impl HookState {
    pub fn hooked_on(side: Side) -> Self {
        match side {
            Side::Left => HookState::HookedLeft,
            Side::Right => HookState::HookedRight,
        }
    }

    /// The post this ring sits on, if any
    pub fn side(self) -> Option<Side> {
        match self {
            HookState::Free => None,
            HookState::HookedLeft => Some(Side::Left),
            HookState::HookedRight => Some(Side::Right),
        }
    }

    pub fn is_hooked(self) -> bool {
        self != HookState::Free
    }
}

/// A ring entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ring {
    pub id: u32,
    pub position: Vec3,
    /// Linear velocity per frame
    pub velocity: Vec3,
    /// Per-axis rotation rate per frame
    pub angular_velocity: Vec3,
    /// Per-axis Euler angles. X = PI/2 means lying flat.
    pub rotation: Vec3,
    pub hook: HookState,
    /// Order in which the ring was hooked (0 while free)
    #[serde(default)]
    pub hook_order: u32,
}

impl Ring {
    pub fn new(id: u32, position: Vec3, rotation: Vec3) -> Self {
        Self {
            id,
            position,
            velocity: Vec3::ZERO,
            angular_velocity: Vec3::ZERO,
            rotation,
            hook: HookState::Free,
            hook_order: 0,
        }
    }

    pub fn is_free(&self) -> bool {
        self.hook == HookState::Free
    }
}

/// A current-indicator bubble (visual only, never touches rings)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bubble {
    pub position: Vec3,
    pub velocity: Vec3,
    /// 1.0 at spawn, removed at <= 0
    pub life: f32,
    /// Wobble phase offset
    pub phase: f32,
}

/// Complete session state (deterministic, serializable)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct World {
    pub params: Params,
    /// Seed the current session was laid out with
    pub seed: u64,
    /// Frames simulated this session
    pub frame: u64,
    /// Ring count is fixed for the session
    pub rings: Vec<Ring>,
    /// Owned exclusively by the bubble spawner/reaper
    pub bubbles: Vec<Bubble>,
    rng: Pcg32,
    next_hook_order: u32,
    all_hooked_fired: bool,
    #[serde(default)]
    bubble_cap_warned: bool,
}

impl World {
    /// Validate `params` and lay out `ring_count` rings.
    ///
    /// With no seed, one is drawn from the thread RNG; the session is still
    /// reproducible from [`World::seed`].
    pub fn new(params: Params, ring_count: usize, seed: Option<u64>) -> Result<Self> {
        params.validate()?;
        if ring_count == 0 {
            return Err(ConfigError::NoRings);
        }

        let seed = seed.unwrap_or_else(rand::random::<u64>);
        let mut world = Self {
            params,
            seed,
            frame: 0,
            rings: Vec::with_capacity(ring_count),
            bubbles: Vec::new(),
            rng: Pcg32::seed_from_u64(seed),
            next_hook_order: 1,
            all_hooked_fired: false,
            bubble_cap_warned: false,
        };
        world.spawn_rings(ring_count);

        log::info!("Session started: {} rings, seed {}", ring_count, seed);
        Ok(world)
    }

    /// Start a fresh session with the same ring count.
    ///
    /// The new seed is drawn from this session's generator, so a seeded
    /// world resets through a reproducible sequence of layouts.
    pub fn reset(&mut self) {
        let ring_count = self.rings.len();
        let seed = self.rng.random::<u64>();

        self.seed = seed;
        self.rng = Pcg32::seed_from_u64(seed);
        self.frame = 0;
        self.rings.clear();
        self.bubbles.clear();
        self.next_hook_order = 1;
        self.all_hooked_fired = false;
        self.bubble_cap_warned = false;
        self.spawn_rings(ring_count);

        log::info!("Session reset: {} rings, seed {}", ring_count, seed);
    }

    pub fn ring_count(&self) -> usize {
        self.rings.len()
    }

    pub fn hooked_count(&self) -> usize {
        self.rings.iter().filter(|r| r.hook.is_hooked()).count()
    }

    /// True once every ring sits on a post
    pub fn is_complete(&self) -> bool {
        self.hooked_count() == self.rings.len()
    }

    /// Split borrow for systems that need rings, bubbles and RNG at once
    pub(crate) fn parts_mut(&mut self) -> (&Params, &mut Vec<Ring>, &mut Vec<Bubble>, &mut Pcg32) {
        (&self.params, &mut self.rings, &mut self.bubbles, &mut self.rng)
    }

    /// Thread ring `index` onto a post. Returns false if there is no such
    /// ring or it is already hooked.
    pub fn hook_ring(&mut self, index: usize, side: Side) -> bool {
        let Some(ring) = self.rings.get_mut(index) else {
            return false;
        };
        if !hook::attach(ring, side, self.next_hook_order) {
            return false;
        }
        self.next_hook_order += 1;
        true
    }

    /// Latch the all-hooked signal. Returns true only the first time.
    pub(crate) fn latch_all_hooked(&mut self) -> bool {
        if self.all_hooked_fired {
            return false;
        }
        self.all_hooked_fired = true;
        true
    }

    /// Returns true the first time the bubble cap is hit this session
    pub(crate) fn note_bubble_cap(&mut self, saturated: bool) -> bool {
        if !saturated || self.bubble_cap_warned {
            return false;
        }
        self.bubble_cap_warned = true;
        true
    }

    fn spawn_rings(&mut self, ring_count: usize) {
        let center = self.params.spawn_center;
        let half = self.params.spawn_half_extents;
        let bounds = self.params.ring_bounds();

        for id in 0..ring_count {
            let offset = Vec3::new(
                self.rng.random_range(-1.0f32..=1.0) * half.x,
                self.rng.random_range(-1.0f32..=1.0) * half.y,
                self.rng.random_range(-1.0f32..=1.0) * half.z,
            );
            let position = (center + offset).clamp(-bounds, bounds);
            let rotation = Vec3::new(
                self.rng.random_range(0.0..std::f32::consts::TAU),
                self.rng.random_range(0.0..std::f32::consts::TAU),
                self.rng.random_range(0.0..std::f32::consts::TAU),
            );
            self.rings.push(Ring::new(id as u32, position, rotation));
        }
    }
}
