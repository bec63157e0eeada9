//! Movement pipeline tests against small hand-built worlds

mod properties;

use crate::core::{MotionConfig, MotionError};
use crate::entity::{EntityId, EntityMovementState, EntityRecord, EntityRegistry};
use crate::events::EventLog;
use crate::foundation::math::{BlockPos, Vec3};
use crate::foundation::time::TickClock;
use crate::physics::movement::{MotionContext, MoveOutcome, MoverType, MovementSystem};
use crate::spatial::ShapeQuery;
use crate::world::{BlockState, VoxelTerrain, WorldBorder};

/// A loaded world with a registry, an orchestrator and an event log
pub(super) struct Harness {
    pub terrain: VoxelTerrain,
    pub border: WorldBorder,
    pub registry: EntityRegistry,
    pub system: MovementSystem,
    pub clock: TickClock,
    pub log: EventLog,
}

impl Harness {
    pub fn new() -> Self {
        Self::with_config(MotionConfig::default())
    }

    pub fn with_config(config: MotionConfig) -> Self {
        let mut terrain = VoxelTerrain::new();
        terrain.load_area(BlockPos::new(-32, -32, -32), BlockPos::new(31, 31, 31));
        Self {
            terrain,
            border: WorldBorder::default(),
            registry: EntityRegistry::new(),
            system: MovementSystem::new(config),
            clock: TickClock::new(),
            log: EventLog::new(),
        }
    }

    /// Stone floor with its top face at y = 0
    pub fn with_floor(mut self) -> Self {
        self.terrain
            .fill(BlockPos::new(-8, -1, -8), BlockPos::new(8, -1, 8), &BlockState::stone());
        self
    }

    pub fn spawn(&mut self, state: EntityMovementState) -> EntityId {
        self.registry.spawn(EntityRecord::new(state))
    }

    pub fn move_entity(&mut self, id: EntityId, mover: MoverType, d: Vec3) -> Result<MoveOutcome, MotionError> {
        let ctx = MotionContext::new(&self.terrain, &self.border, self.clock.current());
        self.system
            .move_entity(&ctx, &mut self.registry, id, mover, &d, &mut self.log)
    }

    pub fn tick(&mut self, id: EntityId) -> Result<MoveOutcome, MotionError> {
        let ctx = MotionContext::new(&self.terrain, &self.border, self.clock.current());
        self.system.tick_entity(&ctx, &mut self.registry, id, &mut self.log)
    }

    pub fn state(&self, id: EntityId) -> &EntityMovementState {
        self.registry.movement(id).expect("entity is registered")
    }

    pub fn state_mut(&mut self, id: EntityId) -> &mut EntityMovementState {
        &mut self.registry.get_mut(id).expect("entity is registered").movement
    }

    pub fn query(&self) -> ShapeQuery<'_> {
        ShapeQuery::new(&self.terrain, &self.border, &self.registry, self.system.config().sweep.epsilon)
    }
}

/// Unit-cube entity with its feet centred in cell `(x, y, z)`
pub(super) fn cube_at(x: f64, y: f64, z: f64) -> EntityMovementState {
    EntityMovementState::new(Vec3::new(x + 0.5, y, z + 0.5), 1.0, 1.0)
}
