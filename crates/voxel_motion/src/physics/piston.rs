//! Per-tick budget for piston-driven displacement
//!
//! Pistons can push the same entity several times within one tick. Each push
//! is clamped against what was already granted this tick so the total never
//! exceeds the configured limit per axis, which keeps stacked pushes from
//! shoving an entity through a wall.

use crate::core::PistonConfig;
use crate::foundation::logging::debug;
use crate::foundation::math::{Axis, Vec3};

/// Forced displacement granted so far in the current tick
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PistonClamp {
    deltas: [f64; 3],
    tick: Option<u64>,
}

impl PistonClamp {
    /// Clamp a forced displacement requested during `tick`.
    ///
    /// Only the first non-zero axis (X, then Y, then Z) is honoured; the
    /// returned vector is zero on the other two.
    pub fn limit(&mut self, tick: u64, requested: &Vec3, config: &PistonConfig) -> Vec3 {
        if *requested == Vec3::zeros() {
            return *requested;
        }
        if self.tick != Some(tick) {
            self.deltas = [0.0; 3];
            self.tick = Some(tick);
        }

        let Some(axis) = Axis::ALL.into_iter().find(|&a| requested[a.index()] != 0.0) else {
            return *requested;
        };
        let i = axis.index();
        let granted = self.deltas[i];
        let total = (requested[i] + granted).clamp(-config.limit, config.limit);
        let permitted = total - granted;
        self.deltas[i] = total;

        if (requested[i] - permitted).abs() > f64::EPSILON {
            debug!(
                "piston push on {:?} clamped from {:.4} to {:.4} (tick {})",
                axis, requested[i], permitted, tick
            );
        }
        if permitted.abs() <= config.dead_zone {
            Vec3::zeros()
        } else {
            axis.vector(permitted)
        }
    }

    /// Displacement granted on `axis` in the tick last seen
    pub fn granted(&self, axis: Axis) -> f64 {
        self.deltas[axis.index()]
    }

    /// Tick the accumulator belongs to
    pub fn tick(&self) -> Option<u64> {
        self.tick
    }
}
