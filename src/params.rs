//! Tunable parameter set
//!
//! Every constant the simulation reads lives here. Units are world units and
//! frames: velocities are per frame, forces are per-frame velocity deltas.
//! Loaded from JSON or built from a difficulty preset, and always validated
//! before a session starts.

use std::path::Path;

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, Result};
use crate::sim::Side;

/// Difficulty presets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Difficulty {
    Relaxed,
    #[default]
    Normal,
    Tricky,
}

impl Difficulty {
    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Relaxed => "Relaxed",
            Difficulty::Normal => "Normal",
            Difficulty::Tricky => "Tricky",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "relaxed" | "easy" => Some(Difficulty::Relaxed),
            "normal" => Some(Difficulty::Normal),
            "tricky" | "hard" => Some(Difficulty::Tricky),
            _ => None,
        }
    }

    /// Half-width of the accepted tilt band around horizontal (radians)
    pub fn tilt_tolerance(&self) -> f32 {
        match self {
            Difficulty::Relaxed => 0.7,
            Difficulty::Normal => 0.45,
            Difficulty::Tricky => 0.3,
        }
    }

    /// Capture allowance beyond the post, as a fraction of ring radius
    pub fn capture_allowance(&self) -> f32 {
        match self {
            Difficulty::Relaxed => 0.45,
            Difficulty::Normal => 0.35,
            Difficulty::Tricky => 0.25,
        }
    }

    /// Per-frame chance of hooking a marginal ring
    pub fn hook_chance(&self) -> f32 {
        match self {
            Difficulty::Relaxed => 0.04,
            Difficulty::Normal => 0.02,
            Difficulty::Tricky => 0.01,
        }
    }
}

/// Simulation parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Params {
    // === Forces ===
    /// Downward pull per frame (negative)
    pub gravity: f32,
    /// Upward lift per frame; `gravity + buoyancy` is the net bias and may be
    /// either sign
    pub buoyancy: f32,
    /// Magnitude of the vortex push while a current runs
    pub push_force: f32,
    /// Uniform turbulence added to the force on each axis
    pub force_jitter: f32,
    /// Uniform turbulence added to the spin on each axis
    pub spin_jitter: f32,

    // === Drag ===
    pub linear_drag: f32,
    pub angular_drag: f32,

    // === Ring geometry ===
    /// Ring (torus) major radius
    pub ring_radius: f32,
    /// Ring tube cross-section radius
    pub ring_thickness: f32,

    // === Tank ===
    pub tank_half_extents: Vec3,
    /// Fraction of speed kept (and reversed) on a wall bounce
    pub wall_damping: f32,
    pub spawn_center: Vec3,
    pub spawn_half_extents: Vec3,

    // === Collision ===
    /// Minimum center distance as a multiple of `ring_radius + ring_thickness`
    pub separation_factor: f32,
    /// Share of the overlap each ring of a pair is pushed back (0.5 = full)
    pub collision_push: f32,
    pub collision_restitution: f32,

    // === Posts ===
    /// Distance of each post from the tank's center line
    pub post_offset: f32,
    pub post_radius: f32,
    pub post_bottom_y: f32,
    pub post_top_y: f32,
    /// Capture allowance beyond the post, as a fraction of ring radius
    pub capture_allowance: f32,
    /// Horizontal distance treated as "right on the axis"
    pub axis_snap_radius: f32,
    /// Half-width of the accepted tilt band around horizontal (radians)
    pub tilt_tolerance: f32,
    /// Per-frame chance of hooking a marginal ring
    pub hook_chance: f32,

    // === Stacking ===
    /// Blend toward the post axis per frame
    pub slide_blend: f32,
    /// Blend toward horizontal per frame
    pub level_blend: f32,
    /// Multiplier applied to the remaining Y/Z rotation per frame
    pub spin_damping: f32,
    /// Descent per frame of a hooked ring above its floor
    pub hooked_sink_speed: f32,
    /// Extra spacing between stacked rings (1.0 = touching)
    pub stack_margin: f32,

    // === Bubbles ===
    /// Spawn attempts per frame while a current runs
    pub bubble_burst: u32,
    pub bubble_spawn_chance: f32,
    pub max_bubbles: usize,
    /// Upward acceleration per frame
    pub bubble_rise: f32,
    /// Life lost per frame (bubbles start at 1.0)
    pub bubble_decay: f32,
    /// Amplitude of the sideways wobble
    pub bubble_wobble: f32,
    pub bubble_radius: f32,
    /// Distance of the current jets from the tank's side walls and floor
    pub jet_inset: f32,
}

impl Default for Params {
    fn default() -> Self {
        Self {
            gravity: -0.003,
            buoyancy: 0.0018,
            push_force: 0.012,
            force_jitter: 0.003,
            spin_jitter: 0.015,

            linear_drag: 0.96,
            angular_drag: 0.95,

            ring_radius: 0.6,
            ring_thickness: 0.15,

            tank_half_extents: Vec3::new(5.0, 7.0, 1.2),
            wall_damping: 0.5,
            spawn_center: Vec3::new(0.0, 3.0, 0.0),
            spawn_half_extents: Vec3::new(3.0, 2.0, 0.4),

            separation_factor: 2.2,
            collision_push: 0.5,
            collision_restitution: 0.5,

            post_offset: 2.2,
            post_radius: 0.08,
            post_bottom_y: -6.3,
            post_top_y: -1.5,
            capture_allowance: Difficulty::Normal.capture_allowance(),
            axis_snap_radius: 0.1,
            tilt_tolerance: Difficulty::Normal.tilt_tolerance(),
            hook_chance: Difficulty::Normal.hook_chance(),

            slide_blend: 0.15,
            level_blend: 0.1,
            spin_damping: 0.9,
            hooked_sink_speed: 0.04,
            stack_margin: 1.1,

            bubble_burst: 2,
            bubble_spawn_chance: 0.6,
            max_bubbles: 256,
            bubble_rise: 0.0015,
            bubble_decay: 1.0 / 120.0,
            bubble_wobble: 0.01,
            bubble_radius: 0.08,
            jet_inset: 0.5,
        }
    }
}

impl Params {
    /// Stock parameters with the hooking knobs of a difficulty preset
    pub fn from_difficulty(difficulty: Difficulty) -> Self {
        Self {
            capture_allowance: difficulty.capture_allowance(),
            tilt_tolerance: difficulty.tilt_tolerance(),
            hook_chance: difficulty.hook_chance(),
            ..Self::default()
        }
    }

    /// Parse and validate a JSON parameter set. Missing fields take defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        let params: Self = serde_json::from_str(json)?;
        params.validate()?;
        Ok(params)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Load a JSON parameter file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Load a JSON parameter file, falling back to defaults on any error
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        match Self::load(path) {
            Ok(params) => {
                log::info!("Loaded parameters from {}", path.display());
                params
            }
            Err(err) => {
                log::warn!("Using default parameters ({}): {}", path.display(), err);
                Self::default()
            }
        }
    }

    /// Net vertical bias on a free ring
    pub fn net_lift(&self) -> f32 {
        self.gravity + self.buoyancy
    }

    /// Horizontal distance from a post axis within which a ring can thread
    pub fn capture_radius(&self) -> f32 {
        self.post_radius + self.ring_radius * self.capture_allowance
    }

    /// Radius of the hole in the middle of a ring
    pub fn hole_radius(&self) -> f32 {
        self.ring_radius - self.ring_thickness
    }

    /// Minimum center distance between two free rings
    pub fn min_separation(&self) -> f32 {
        self.separation_factor * (self.ring_radius + self.ring_thickness)
    }

    /// Vertical spacing between rings stacked on one post
    pub fn stack_spacing(&self) -> f32 {
        2.0 * self.ring_thickness * self.stack_margin
    }

    /// Per-axis limit on a free ring's |position|
    pub fn ring_bounds(&self) -> Vec3 {
        self.tank_half_extents - Vec3::splat(self.ring_radius)
    }

    /// Visible ceiling of the tank
    pub fn ceiling_y(&self) -> f32 {
        self.tank_half_extents.y
    }

    pub fn post_x(&self, side: Side) -> f32 {
        side.sign() * self.post_offset
    }

    /// Where the current for a side enters the tank
    pub fn current_source(&self, side: Side) -> Vec3 {
        Vec3::new(
            side.sign() * (self.tank_half_extents.x - self.jet_inset),
            -self.tank_half_extents.y + self.jet_inset,
            0.0,
        )
    }

    /// Reject parameter sets that would produce degenerate or divergent motion
    pub fn validate(&self) -> Result<()> {
        let scalars = [
            ("gravity", self.gravity),
            ("buoyancy", self.buoyancy),
            ("push_force", self.push_force),
            ("force_jitter", self.force_jitter),
            ("spin_jitter", self.spin_jitter),
            ("post_bottom_y", self.post_bottom_y),
            ("post_top_y", self.post_top_y),
        ];
        for (name, value) in scalars {
            finite(name, value)?;
        }
        for (name, v) in [
            ("tank_half_extents", self.tank_half_extents),
            ("spawn_center", self.spawn_center),
            ("spawn_half_extents", self.spawn_half_extents),
        ] {
            if !v.is_finite() {
                return Err(ConfigError::NonFinite { name });
            }
        }

        non_negative("push_force", self.push_force)?;
        non_negative("force_jitter", self.force_jitter)?;
        non_negative("spin_jitter", self.spin_jitter)?;

        open_unit("linear_drag", self.linear_drag)?;
        open_unit("angular_drag", self.angular_drag)?;

        positive("ring_radius", self.ring_radius)?;
        positive("ring_thickness", self.ring_thickness)?;
        in_range("wall_damping", self.wall_damping, 0.0, 1.0)?;

        for (axis, half_extent) in [
            ('x', self.tank_half_extents.x),
            ('y', self.tank_half_extents.y),
            ('z', self.tank_half_extents.z),
        ] {
            if half_extent <= self.ring_radius {
                return Err(ConfigError::TankTooSmall {
                    axis,
                    half_extent,
                    ring_radius: self.ring_radius,
                });
            }
        }

        positive("separation_factor", self.separation_factor)?;
        if !(self.collision_push > 0.0 && self.collision_push <= 0.5) {
            return Err(ConfigError::OutOfRange {
                name: "collision_push",
                value: self.collision_push,
                min: 0.0,
                max: 0.5,
            });
        }
        in_range("collision_restitution", self.collision_restitution, 0.0, 1.0)?;

        non_negative("post_radius", self.post_radius)?;
        if self.post_radius >= self.hole_radius() {
            return Err(ConfigError::PostDoesNotFit {
                post_radius: self.post_radius,
                hole_radius: self.hole_radius(),
            });
        }
        positive("capture_allowance", self.capture_allowance)?;
        if self.capture_radius() <= self.post_radius || !self.capture_radius().is_finite() {
            return Err(ConfigError::CaptureTooSmall {
                capture_radius: self.capture_radius(),
                post_radius: self.post_radius,
            });
        }
        non_negative("axis_snap_radius", self.axis_snap_radius)?;
        in_range(
            "tilt_tolerance",
            self.tilt_tolerance,
            0.0,
            std::f32::consts::FRAC_PI_2,
        )?;
        in_range("hook_chance", self.hook_chance, 0.0, 1.0)?;

        if self.post_bottom_y >= self.post_top_y {
            return Err(ConfigError::InvalidPostRange {
                bottom: self.post_bottom_y,
                top: self.post_top_y,
            });
        }
        let bounds = self.ring_bounds();
        if self.post_offset < 0.0
            || self.post_offset > bounds.x
            || self.post_bottom_y < -bounds.y
            || self.post_top_y > bounds.y
        {
            return Err(ConfigError::PostOutsideTank {
                post_x: self.post_offset,
                bottom: self.post_bottom_y,
                top: self.post_top_y,
            });
        }

        in_range("slide_blend", self.slide_blend, 0.0, 1.0)?;
        in_range("level_blend", self.level_blend, 0.0, 1.0)?;
        in_range("spin_damping", self.spin_damping, 0.0, 1.0)?;
        positive("hooked_sink_speed", self.hooked_sink_speed)?;
        if self.stack_margin < 1.0 || !self.stack_margin.is_finite() {
            return Err(ConfigError::OutOfRange {
                name: "stack_margin",
                value: self.stack_margin,
                min: 1.0,
                max: f32::MAX,
            });
        }

        in_range("bubble_spawn_chance", self.bubble_spawn_chance, 0.0, 1.0)?;
        non_negative("bubble_rise", self.bubble_rise)?;
        positive("bubble_decay", self.bubble_decay)?;
        non_negative("bubble_wobble", self.bubble_wobble)?;
        positive("bubble_radius", self.bubble_radius)?;
        non_negative("jet_inset", self.jet_inset)?;

        Ok(())
    }
}

fn finite(name: &'static str, value: f32) -> Result<()> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(ConfigError::NonFinite { name })
    }
}

fn positive(name: &'static str, value: f32) -> Result<()> {
    finite(name, value)?;
    if value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::NonPositive { name, value })
    }
}

fn non_negative(name: &'static str, value: f32) -> Result<()> {
    in_range(name, value, 0.0, f32::MAX)
}

fn in_range(name: &'static str, value: f32, min: f32, max: f32) -> Result<()> {
    finite(name, value)?;
    if (min..=max).contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::OutOfRange {
            name,
            value,
            min,
            max,
        })
    }
}

/// Strictly inside (0, 1)
fn open_unit(name: &'static str, value: f32) -> Result<()> {
    finite(name, value)?;
    if value > 0.0 && value < 1.0 {
        Ok(())
    } else {
        Err(ConfigError::OutOfRange {
            name,
            value,
            min: 0.0,
            max: 1.0,
        })
    }
}
