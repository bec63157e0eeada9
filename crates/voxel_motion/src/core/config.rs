//! # Movement Configuration
//!
//! Every tunable constant of the movement pipeline lives here so that a
//! server and its clients can load the same file and resolve ticks
//! identically. Defaults reproduce the classic block-game feel: a 0.51 block
//! piston budget per tick, 0.6 block auto step, ladders capped at 0.15 blocks
//! per tick.
//!
//! ## Configuration Groups
//!
//! - **Sweep**: collision epsilon and the legacy/general path switch
//! - **Piston**: per-tick forced displacement budget
//! - **Fluid**: current push strength per fluid and the minimum-flow floor
//! - **Climb**: ladder and vine speed caps
//! - **Step**: walk distance scaling and footstep cadence
//! - **Entity defaults**: size and step height used when spawning

use serde::{Deserialize, Serialize};

use crate::config::{Config, ConfigError};

/// Sweep resolver tuning
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SweepConfig {
    /// Contact tolerance; an offset a shape would cut below this snaps to zero
    pub epsilon: f64,
    /// Always take the general swept-volume path, even for single-axis moves
    pub unify_paths: bool,
}

impl Default for SweepConfig {
    fn default() -> Self {
        Self {
            epsilon: 1.0e-7,
            unify_paths: false,
        }
    }
}

/// Piston displacement budget
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PistonConfig {
    /// Largest cumulative forced displacement per axis within one tick
    pub limit: f64,
    /// Permitted displacements with a smaller magnitude are dropped
    pub dead_zone: f64,
}

impl Default for PistonConfig {
    fn default() -> Self {
        Self {
            limit: 0.51,
            dead_zone: 1.0e-5,
        }
    }
}

/// Fluid current strength
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FluidConfig {
    /// Push scale applied to water currents
    pub water_push: f64,
    /// Push scale applied to lava currents
    pub lava_push: f64,
    /// Push scale applied to lava currents in ultrawarm dimensions
    pub lava_push_ultrawarm: f64,
    /// Smallest push magnitude once a current is detected
    pub min_flow: f64,
    /// Horizontal components below this count as "barely moving"
    pub slow_current: f64,
    /// Submersion below this attenuates the current proportionally
    pub shallow_threshold: f64,
    /// How far the entity box is shrunk before scanning fluid cells
    pub deflate: f64,
}

impl Default for FluidConfig {
    fn default() -> Self {
        Self {
            water_push: 0.014,
            lava_push: 0.002_333_333_333_333_333_5,
            lava_push_ultrawarm: 0.007,
            min_flow: 0.0045,
            slow_current: 0.003,
            shallow_threshold: 0.4,
            deflate: 0.001,
        }
    }
}

/// Ladder and vine behaviour
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClimbConfig {
    /// Horizontal speed cap while on a climbable block
    pub max_horizontal: f64,
    /// Descent speed cap while on a climbable block
    pub max_descent: f64,
    /// Vertical speed when pushing into a wall while climbing
    pub ascent_speed: f64,
}

impl Default for ClimbConfig {
    fn default() -> Self {
        Self {
            max_horizontal: 0.15,
            max_descent: 0.15,
            ascent_speed: 0.2,
        }
    }
}

/// Walk distance and footstep cadence
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StepConfig {
    /// Factor applied to travelled distance before accumulating it
    pub walk_scale: f64,
    /// Accumulated distance between two footstep notifications
    pub sound_interval: f64,
    /// Horizontal shrink step used when backing off a ledge while sneaking
    pub edge_backoff_step: f64,
}

impl Default for StepConfig {
    fn default() -> Self {
        Self {
            walk_scale: 0.6,
            sound_interval: 1.0,
            edge_backoff_step: 0.05,
        }
    }
}

/// Defaults for newly spawned entities
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EntityDefaults {
    /// Box width (X and Z)
    pub width: f64,
    /// Box height
    pub height: f64,
    /// Auto step height
    pub step_height: f64,
}

impl Default for EntityDefaults {
    fn default() -> Self {
        Self {
            width: 0.6,
            height: 1.8,
            step_height: 0.6,
        }
    }
}

/// # Motion Configuration
///
/// Root configuration consumed by [`crate::physics::MovementSystem`].
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct MotionConfig {
    /// Sweep resolver tuning
    pub sweep: SweepConfig,
    /// Piston displacement budget
    pub piston: PistonConfig,
    /// Fluid current strength
    pub fluid: FluidConfig,
    /// Ladder and vine behaviour
    pub climb: ClimbConfig,
    /// Walk distance and footstep cadence
    pub step: StepConfig,
    /// Defaults for newly spawned entities
    pub entity: EntityDefaults,
}

impl Config for MotionConfig {}

fn positive(field: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::Invalid {
            field,
            reason: format!("must be a positive finite number, got {value}"),
        })
    }
}

fn non_negative(field: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ConfigError::Invalid {
            field,
            reason: format!("must be a non-negative finite number, got {value}"),
        })
    }
}

impl MotionConfig {
    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        positive("sweep.epsilon", self.sweep.epsilon)?;

        positive("piston.limit", self.piston.limit)?;
        non_negative("piston.dead_zone", self.piston.dead_zone)?;
        if self.piston.dead_zone >= self.piston.limit {
            return Err(ConfigError::Invalid {
                field: "piston.dead_zone",
                reason: "must be smaller than piston.limit".to_string(),
            });
        }

        non_negative("fluid.water_push", self.fluid.water_push)?;
        non_negative("fluid.lava_push", self.fluid.lava_push)?;
        non_negative("fluid.lava_push_ultrawarm", self.fluid.lava_push_ultrawarm)?;
        non_negative("fluid.min_flow", self.fluid.min_flow)?;
        non_negative("fluid.slow_current", self.fluid.slow_current)?;
        positive("fluid.shallow_threshold", self.fluid.shallow_threshold)?;
        non_negative("fluid.deflate", self.fluid.deflate)?;

        positive("climb.max_horizontal", self.climb.max_horizontal)?;
        positive("climb.max_descent", self.climb.max_descent)?;
        positive("climb.ascent_speed", self.climb.ascent_speed)?;

        positive("step.walk_scale", self.step.walk_scale)?;
        positive("step.sound_interval", self.step.sound_interval)?;
        positive("step.edge_backoff_step", self.step.edge_backoff_step)?;

        positive("entity.width", self.entity.width)?;
        positive("entity.height", self.entity.height)?;
        non_negative("entity.step_height", self.entity.step_height)?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_validate() {
        assert!(MotionConfig::default().validate().is_ok());
    }

    #[test]
    fn toml_round_trip_keeps_values() {
        let mut config = MotionConfig::default();
        config.piston.limit = 0.75;
        config.sweep.unify_paths = true;

        let text = config.render("motion.toml").unwrap();
        let parsed = MotionConfig::parse("motion.toml", &text).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn partial_file_falls_back_to_defaults() {
        let parsed = MotionConfig::parse("motion.toml", "[climb]\nascent_speed = 0.3\n").unwrap();
        assert_eq!(parsed.climb.ascent_speed, 0.3);
        assert_eq!(parsed.climb.max_horizontal, 0.15);
        assert_eq!(parsed.piston, PistonConfig::default());
    }

    #[test]
    fn rejects_negative_step_height() {
        let mut config = MotionConfig::default();
        config.entity.step_height = -1.0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Invalid { field: "entity.step_height", .. })
        ));
    }

    #[test]
    fn rejects_unknown_extension() {
        assert!(matches!(
            MotionConfig::parse("motion.json", "{}"),
            Err(ConfigError::UnsupportedFormat(_))
        ));
    }
}
