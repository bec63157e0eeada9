//! # Movement Orchestrator
//!
//! [`MovementSystem`] is the per-tick entry point. For one entity it runs
//! the pipeline stages strictly in order:
//!
//! 1. **Fluid push** and **climbing** caps (per-tick self movement only)
//! 2. **Piston clamp** for forced moves
//! 3. **Sweep** with the step-up fallback
//! 4. **Commit** of the new position
//! 5. **Collision flags** and grounded state
//! 6. **Side effects** reported through a [`MovementListener`]
//!
//! Entities flagged `no_physics` skip straight to the commit.
//!
//! ## Ownership
//!
//! The orchestrator works on a detached copy of the entity's
//! [`EntityMovementState`] while it reads the registry for other entities'
//! shapes, and writes the copy back once the move is complete. The registry
//! is never mutated halfway through a move.

use crate::core::{ConfigError, MotionConfig, MotionError};
use crate::entity::{CollisionFlags, EntityId, EntityMovementState, EntityRegistry};
use crate::events::{LandingImpact, MovementListener};
use crate::foundation::logging::{debug, warn};
use crate::foundation::math::{block_pos_of, floor_to_i32, horizontal_distance, is_finite, BlockPos, Vec3};
use crate::physics::climb::Climbing;
use crate::physics::collision::BoundingVolume;
use crate::physics::fluid::FluidPush;
use crate::physics::step_up::StepUpResolver;
use crate::physics::sweep::SweepResolver;
use crate::spatial::ShapeQuery;
use crate::world::{BlockGetter, BlockState, WorldBorder};

/// Squared length below which a resolved move is not committed
const MIN_COMMIT_SQR: f64 = 1.0e-7;

/// Difference below which a horizontal component counts as unblocked
const HORIZONTAL_TOLERANCE: f64 = 1.0e-5;

/// Shrink applied to the post-move box before reporting entered cells
const INSIDE_DEFLATE: f64 = 1.0e-7;

/// What is causing a move
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoverType {
    /// The entity's own velocity
    SelfPropelled,
    /// Player input
    Player,
    /// A piston head; subject to the per-tick budget
    Piston,
    /// A shulker pushing out of its shell
    Shulker,
    /// An opening shulker box
    ShulkerBox,
}

impl MoverType {
    /// Whether the entity is moving under its own power
    pub fn is_self_propelled(self) -> bool {
        matches!(self, Self::SelfPropelled | Self::Player)
    }
}

/// World collaborators shared by every move in one tick
#[derive(Clone, Copy)]
pub struct MotionContext<'w> {
    /// Block source
    pub terrain: &'w dyn BlockGetter,
    /// World border
    pub border: &'w WorldBorder,
    /// Current simulation tick
    pub tick: u64,
    /// Ultrawarm dimension (faster lava)
    pub ultrawarm: bool,
}

impl<'w> MotionContext<'w> {
    /// Context for `tick`
    pub fn new(terrain: &'w dyn BlockGetter, border: &'w WorldBorder, tick: u64) -> Self {
        Self {
            terrain,
            border,
            tick,
            ultrawarm: false,
        }
    }

    /// Mark the dimension as ultrawarm
    pub fn with_ultrawarm(mut self, ultrawarm: bool) -> Self {
        self.ultrawarm = ultrawarm;
        self
    }
}

/// Result of one resolved move
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MoveOutcome {
    /// Displacement the caller asked for
    pub requested: Vec3,
    /// Displacement that was committed
    pub resolved: Vec3,
    /// Collisions observed
    pub flags: CollisionFlags,
    /// Grounded after the move
    pub on_ground: bool,
    /// The step-up candidate was taken
    pub stepped: bool,
}

impl MoveOutcome {
    fn unchanged(requested: Vec3, resolved: Vec3, on_ground: bool) -> Self {
        Self {
            requested,
            resolved,
            flags: CollisionFlags::empty(),
            on_ground,
            stepped: false,
        }
    }
}

/// Per-tick movement orchestrator
#[derive(Debug, Clone, Default)]
pub struct MovementSystem {
    config: MotionConfig,
}

impl MovementSystem {
    /// Create an orchestrator with `config`
    pub fn new(config: MotionConfig) -> Self {
        Self { config }
    }

    /// Create an orchestrator, rejecting a config that fails validation
    pub fn try_new(config: MotionConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::new(config))
    }

    /// Active configuration
    pub fn config(&self) -> &MotionConfig {
        &self.config
    }

    /// Advance one entity by its own velocity: fluid push, climbing caps,
    /// the move itself, then climbing ascent
    pub fn tick_entity(
        &self,
        ctx: &MotionContext<'_>,
        registry: &mut EntityRegistry,
        id: EntityId,
        listener: &mut dyn MovementListener,
    ) -> Result<MoveOutcome, MotionError> {
        let record = registry.get(id).ok_or(MotionError::UnknownEntity(id))?;
        let is_player = record.is_player;
        let mut state = record.movement.clone();
        let mover = if is_player {
            MoverType::Player
        } else {
            MoverType::SelfPropelled
        };

        if !state.no_physics {
            FluidPush::new(ctx.terrain, &self.config.fluid).apply_all(&mut state, ctx.ultrawarm, is_player);
        }
        let climbing = Climbing::new(&self.config.climb);
        climbing.detect(&mut state, ctx.terrain);
        climbing.clamp_velocity(&mut state, is_player);

        let displacement = state.velocity;
        let outcome = self.move_state(ctx, registry, id, mover, &displacement, &mut state, listener)?;
        climbing.after_move(&mut state);

        write_back(registry, id, state)?;
        Ok(outcome)
    }

    /// Move one entity by `displacement` on behalf of `mover`
    pub fn move_entity(
        &self,
        ctx: &MotionContext<'_>,
        registry: &mut EntityRegistry,
        id: EntityId,
        mover: MoverType,
        displacement: &Vec3,
        listener: &mut dyn MovementListener,
    ) -> Result<MoveOutcome, MotionError> {
        let mut state = registry
            .movement(id)
            .cloned()
            .ok_or(MotionError::UnknownEntity(id))?;
        let outcome = self.move_state(ctx, registry, id, mover, displacement, &mut state, listener)?;
        write_back(registry, id, state)?;
        Ok(outcome)
    }

    fn move_state(
        &self,
        ctx: &MotionContext<'_>,
        registry: &EntityRegistry,
        id: EntityId,
        mover: MoverType,
        requested: &Vec3,
        state: &mut EntityMovementState,
        listener: &mut dyn MovementListener,
    ) -> Result<MoveOutcome, MotionError> {
        if !is_finite(requested) {
            return Err(MotionError::NonFiniteDisplacement {
                entity: id,
                displacement: *requested,
            });
        }

        if state.no_physics {
            state.previous_position = state.position;
            state.position += requested;
            return Ok(MoveOutcome::unchanged(*requested, *requested, state.on_ground));
        }

        let mut attempt = *requested;
        if mover == MoverType::Piston {
            attempt = state.piston.limit(ctx.tick, &attempt, &self.config.piston);
            if attempt == Vec3::zeros() {
                return Ok(MoveOutcome::unchanged(*requested, attempt, state.on_ground));
            }
        }

        if let Some(multiplier) = state.stuck_multiplier.take() {
            attempt = attempt.component_mul(&multiplier);
            state.velocity = Vec3::zeros();
        }

        let volume = state.bounding_volume();
        let step = Vec3::new(0.0, state.step_height, 0.0);
        let region = volume.expand_towards(&attempt).expand_towards(&step).expand_towards(&-step);
        if !ctx.terrain.is_area_loaded(&region) {
            return Err(MotionError::UnloadedRegion { entity: id, region });
        }

        let query = ShapeQuery::new(ctx.terrain, ctx.border, registry, self.config.sweep.epsilon);
        if mover.is_self_propelled() {
            attempt = self.back_off_from_edge(&query, id, state, &volume, attempt);
        }

        let extra = query.non_block_shapes(id, &state.position, &region);
        let sweep = SweepResolver::new(query, self.config.sweep);
        let step_outcome =
            StepUpResolver::new(&sweep).resolve(&volume, &attempt, state.step_height, state.on_ground, &extra);
        let resolved = step_outcome.resolved;

        if resolved.norm_squared() > MIN_COMMIT_SQR {
            state.previous_position = state.position;
            state.position += resolved;
            debug!("entity {:?} moved {:?} (requested {:?})", id, resolved, requested);
        }

        let flags = collision_flags(&attempt, &resolved, step_outcome.stepped);
        let was_grounded = state.on_ground;
        state.collision = flags;
        state.on_ground = flags.contains(CollisionFlags::VERTICAL_BELOW);

        if flags.contains(CollisionFlags::X) {
            state.velocity.x = 0.0;
        }
        if flags.contains(CollisionFlags::Z) {
            state.velocity.z = 0.0;
        }

        let (below_pos, below) = block_below(ctx.terrain, &state.position);
        if state.on_ground {
            if state.fall_distance > 0.0 || !was_grounded {
                let impact = LandingImpact {
                    velocity_y: attempt.y,
                    fall_distance: state.fall_distance,
                };
                listener.on_grounded_landing(id, impact, below_pos, below.as_ref());
            }
            state.fall_distance = 0.0;
        } else if resolved.y < 0.0 {
            state.fall_distance -= resolved.y;
        }
        if flags.contains(CollisionFlags::VERTICAL) {
            state.velocity.y = 0.0;
        }

        let riding = registry.get(id).is_some_and(|record| record.vehicle.is_some());
        if !riding {
            self.accumulate_distance(id, state, &resolved, below.as_ref(), listener);
        }

        self.check_inside_blocks(ctx.terrain, id, state, listener);

        let factor = speed_factor(ctx.terrain, state);
        state.velocity.x *= factor;
        state.velocity.z *= factor;

        if state.fluid.in_water && state.on_fire {
            state.on_fire = false;
            listener.on_extinguished(id);
        }

        Ok(MoveOutcome {
            requested: *requested,
            resolved,
            flags,
            on_ground: state.on_ground,
            stepped: step_outcome.stepped,
        })
    }

    /// Keep a sneaking entity from walking off a ledge by shrinking its
    /// horizontal displacement until support remains below it
    fn back_off_from_edge(
        &self,
        query: &ShapeQuery<'_>,
        id: EntityId,
        state: &EntityMovementState,
        volume: &BoundingVolume,
        attempt: Vec3,
    ) -> Vec3 {
        let drop = state.step_height;
        if !state.sneaking || attempt.y > 0.0 || drop <= 0.0 || !self.is_above_ground(query, id, state, volume) {
            return attempt;
        }

        let increment = self.config.step.edge_backoff_step;
        if !(increment.is_finite() && increment > 0.0) {
            warn!("edge back-off step {} cannot shrink a move; skipping back-off", increment);
            return attempt;
        }
        let shrink = |v: f64| {
            if v.abs() < increment {
                0.0
            } else {
                v - increment.copysign(v)
            }
        };
        let unsupported = |x: f64, z: f64| query.no_collision(id, &volume.moved(&Vec3::new(x, -drop, z)));

        let (mut x, mut z) = (attempt.x, attempt.z);
        while x != 0.0 && unsupported(x, 0.0) {
            x = shrink(x);
        }
        while z != 0.0 && unsupported(0.0, z) {
            z = shrink(z);
        }
        while x != 0.0 && z != 0.0 && unsupported(x, z) {
            x = shrink(x);
            z = shrink(z);
        }
        if x != attempt.x || z != attempt.z {
            debug!("entity {:?} backed off ledge: {:?} -> ({}, {})", id, attempt, x, z);
        }
        Vec3::new(x, attempt.y, z)
    }

    fn is_above_ground(
        &self,
        query: &ShapeQuery<'_>,
        id: EntityId,
        state: &EntityMovementState,
        volume: &BoundingVolume,
    ) -> bool {
        state.on_ground
            || (state.fall_distance < state.step_height
                && !query.no_collision(
                    id,
                    &volume.moved(&Vec3::new(0.0, state.fall_distance - state.step_height, 0.0)),
                ))
    }

    fn accumulate_distance(
        &self,
        id: EntityId,
        state: &mut EntityMovementState,
        resolved: &Vec3,
        below: Option<&BlockState>,
        listener: &mut dyn MovementListener,
    ) {
        let scale = self.config.step.walk_scale;
        let vertical = if state.climbing { resolved.y } else { 0.0 };
        state.walk_distance += horizontal_distance(resolved) * scale;
        state.move_distance += Vec3::new(resolved.x, vertical, resolved.z).norm() * scale;

        if state.move_distance > state.next_step {
            if let Some(block) = below {
                state.next_step = state.move_distance.floor() + self.config.step.sound_interval;
                listener.on_step_sound_threshold(id, state.move_distance, block);
            }
        }
    }

    fn check_inside_blocks(
        &self,
        terrain: &dyn BlockGetter,
        id: EntityId,
        state: &mut EntityMovementState,
        listener: &mut dyn MovementListener,
    ) {
        let inside = state.bounding_volume().deflate(INSIDE_DEFLATE);
        let lo = block_pos_of(&inside.min);
        let hi = block_pos_of(&inside.max);
        for x in lo.x..=hi.x {
            for y in lo.y..=hi.y {
                for z in lo.z..=hi.z {
                    let pos = BlockPos::new(x, y, z);
                    let Some(block) = terrain.block_state(pos) else {
                        continue;
                    };
                    if let Some(multiplier) = block.stuck_multiplier() {
                        state.fall_distance = 0.0;
                        state.stuck_multiplier = Some(multiplier);
                    }
                    listener.on_block_entered(id, pos, &block);
                }
            }
        }
    }
}

fn write_back(registry: &mut EntityRegistry, id: EntityId, state: EntityMovementState) -> Result<(), MotionError> {
    let record = registry.get_mut(id).ok_or(MotionError::UnknownEntity(id))?;
    record.movement = state;
    Ok(())
}

/// Flags describing how `resolved` differs from `attempt`
fn collision_flags(attempt: &Vec3, resolved: &Vec3, stepped: bool) -> CollisionFlags {
    let mut flags = CollisionFlags::empty();
    if (attempt.x - resolved.x).abs() >= HORIZONTAL_TOLERANCE {
        flags |= CollisionFlags::X | CollisionFlags::HORIZONTAL;
    }
    if (attempt.z - resolved.z).abs() >= HORIZONTAL_TOLERANCE {
        flags |= CollisionFlags::Z | CollisionFlags::HORIZONTAL;
    }
    if attempt.y != resolved.y {
        flags |= CollisionFlags::VERTICAL;
        if attempt.y < 0.0 {
            flags |= CollisionFlags::VERTICAL_BELOW;
        }
    }
    if stepped {
        flags |= CollisionFlags::STEPPED;
    }
    flags
}

/// Cell the entity stands on. Fences and walls reach into the cell above
/// them, so an empty cell defers to a tall shape beneath it.
fn block_below(terrain: &dyn BlockGetter, position: &Vec3) -> (BlockPos, Option<BlockState>) {
    let pos = BlockPos::new(
        floor_to_i32(position.x),
        floor_to_i32(position.y - 0.2),
        floor_to_i32(position.z),
    );
    let state = terrain.block_state(pos);
    if state.is_none() {
        let beneath = BlockPos::new(pos.x, pos.y - 1, pos.z);
        if let Some(tall) = terrain.block_state(beneath).filter(BlockState::has_large_collision_shape) {
            return (beneath, Some(tall));
        }
    }
    (pos, state)
}

/// Horizontal velocity factor: the block at the feet, or the block under
/// it when the feet block does not slow anything
fn speed_factor(terrain: &dyn BlockGetter, state: &EntityMovementState) -> f64 {
    let factor_at = |pos: BlockPos| terrain.block_state(pos).map_or(1.0, |b| b.speed_factor());
    let feet = factor_at(block_pos_of(&state.position));
    if feet != 1.0 {
        return feet;
    }
    let below = Vec3::new(state.position.x, state.position.y - 0.500_000_1, state.position.z);
    factor_at(block_pos_of(&below))
}
