//! Foundation module - shared building blocks
//!
//! - [`math`]: double precision vectors, cell positions and axes
//! - [`time`]: the world tick counter
//! - [`logging`]: `log` macros and logger setup

pub mod logging;
pub mod math;
pub mod time;
