//! Error types for ring-toss.
//!
//! The simulation itself never fails at runtime. Everything here is raised
//! while loading or validating a parameter set, before any entity exists.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{name} must be positive, got {value}")]
    NonPositive { name: &'static str, value: f32 },

    #[error("{name} must lie in [{min}, {max}], got {value}")]
    OutOfRange {
        name: &'static str,
        value: f32,
        min: f32,
        max: f32,
    },

    #[error("{name} is not a finite number")]
    NonFinite { name: &'static str },

    #[error("tank half-extent {axis} = {half_extent} does not fit a ring of radius {ring_radius}")]
    TankTooSmall {
        axis: char,
        half_extent: f32,
        ring_radius: f32,
    },

    #[error("post radius {post_radius} does not fit through the ring hole {hole_radius}")]
    PostDoesNotFit { post_radius: f32, hole_radius: f32 },

    #[error("capture radius {capture_radius} is not wider than the post radius {post_radius}")]
    CaptureTooSmall {
        capture_radius: f32,
        post_radius: f32,
    },

    #[error("post range [{bottom}, {top}] is empty")]
    InvalidPostRange { bottom: f32, top: f32 },

    #[error("post at x = ±{post_x} with range [{bottom}, {top}] leaves the tank")]
    PostOutsideTank { post_x: f32, bottom: f32, top: f32 },

    #[error("a session needs at least one ring")]
    NoRings,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, ConfigError>;
