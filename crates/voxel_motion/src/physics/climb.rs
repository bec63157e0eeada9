//! Ladder and vine movement
//!
//! While an entity stands in a climbable block its speed is capped and its
//! fall distance cleared. Pushing into a wall while climbing makes it ascend.

use crate::core::ClimbConfig;
use crate::entity::{CollisionFlags, EntityMovementState};
use crate::foundation::math::{block_pos_of, Vec3};
use crate::world::BlockGetter;

/// Climbing rules applied around the sweep
pub struct Climbing<'a> {
    config: &'a ClimbConfig,
}

impl<'a> Climbing<'a> {
    /// Create climbing rules from `config`
    pub fn new(config: &'a ClimbConfig) -> Self {
        Self { config }
    }

    /// Refresh `state.climbing` from the block at the entity's feet
    pub fn detect(&self, state: &mut EntityMovementState, terrain: &dyn BlockGetter) -> bool {
        state.climbing = terrain
            .block_state(block_pos_of(&state.position))
            .is_some_and(|block| block.is_climbable());
        state.climbing
    }

    /// Cap the velocity of a climbing entity before it moves.
    ///
    /// Sneaking players hold on instead of sliding down.
    pub fn clamp_velocity(&self, state: &mut EntityMovementState, is_player: bool) {
        if !state.climbing {
            return;
        }
        let cap = self.config.max_horizontal;
        let floor = if state.sneaking && is_player {
            0.0
        } else {
            -self.config.max_descent
        };
        state.velocity = Vec3::new(
            state.velocity.x.clamp(-cap, cap),
            state.velocity.y.max(floor),
            state.velocity.z.clamp(-cap, cap),
        );
        state.fall_distance = 0.0;
    }

    /// Climb upward after a move that ran into a wall
    pub fn after_move(&self, state: &mut EntityMovementState) {
        if state.climbing && state.collision.contains(CollisionFlags::HORIZONTAL) {
            state.velocity.y = self.config.ascent_speed;
        }
    }
}
