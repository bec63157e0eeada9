//! # Core Module
//!
//! Shared abstractions used throughout the crate: the typed movement
//! configuration and the error taxonomy of the movement pipeline.
//!
//! ## Organization
//!
//! - **Config**: Tunable constants for every movement stage
//! - **Error**: Precondition violations reported by the orchestrator

pub mod config;
pub mod error;

// Re-export foundation modules for convenience
pub use crate::foundation;

// Re-export commonly used config types
pub use config::{
    ClimbConfig,
    EntityDefaults,
    FluidConfig,
    MotionConfig,
    PistonConfig,
    StepConfig,
    SweepConfig,
};
pub use crate::config::{Config, ConfigError};
pub use error::MotionError;
