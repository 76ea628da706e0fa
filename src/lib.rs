//! Ring Toss - simulation core for a water ring toss game
//!
//! Rings drift in a water tank, stirred by two current jets, until each one
//! threads onto one of two vertical posts.
//!
//! Core modules:
//! - `sim`: Deterministic simulation (forces, collisions, hooking, bubbles)
//! - `params`: Data-driven tuning and validation
//! - `snapshot`: Per-frame poses for the host renderer
//! - `error`: Configuration errors

pub mod error;
pub mod params;
pub mod sim;
pub mod snapshot;

pub use error::{ConfigError, Result};
pub use params::{Difficulty, Params};
pub use sim::{SimEvent, StepReport, TickInput, World, tick};
pub use snapshot::Snapshot;

/// Host-facing constants
pub mod consts {
    /// Display refresh the per-frame tuning assumes
    pub const FRAME_RATE: u32 = 60;
    /// Rings per session in the stock game
    pub const DEFAULT_RING_COUNT: usize = 8;
}

/// Wrap an angle to [0, 2π)
#[inline]
pub fn wrap_angle(angle: f32) -> f32 {
    let wrapped = angle.rem_euclid(std::f32::consts::TAU);
    // rem_euclid can round up to exactly TAU for tiny negative inputs
    if wrapped >= std::f32::consts::TAU {
        0.0
    } else {
        wrapped
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::{PI, TAU};

    #[test]
    fn test_wrap_angle() {
        assert!((wrap_angle(TAU + 0.5) - 0.5).abs() < 1e-5);
        assert!((wrap_angle(-PI) - PI).abs() < 1e-5);
        assert_eq!(wrap_angle(0.0), 0.0);
        assert!(wrap_angle(-1e-9) < TAU);
    }
}
