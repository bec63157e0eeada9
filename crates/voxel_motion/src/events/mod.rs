//! Movement side-effect notifications
//!
//! The orchestrator never applies damage, plays sounds or runs block
//! behaviour itself. It reports those moments through a [`MovementListener`]
//! after a move is committed. Key principles:
//! - Every callback has a no-op default, so collaborators implement only
//!   what they care about
//! - Callbacks receive copies of the data, never the entity state
//! - [`EventLog`] records everything as [`MovementEvent`] values for tests
//!   and tooling

use crate::entity::EntityId;
use crate::foundation::math::BlockPos;
use crate::world::BlockState;

/// Impact data passed to the landing callback
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LandingImpact {
    /// Vertical velocity just before the landing (negative)
    pub velocity_y: f64,
    /// Distance fallen before this landing
    pub fall_distance: f64,
}

/// Event type identification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MovementEventType {
    /// Entity hit the ground while moving down
    GroundedLanding,
    /// Walked distance crossed the next footstep threshold
    StepSound,
    /// Post-move box overlaps a cell
    BlockEntered,
    /// Water put the entity's fire out
    Extinguished,
}

/// One recorded notification
#[derive(Debug, Clone, PartialEq)]
pub enum MovementEvent {
    /// See [`MovementListener::on_grounded_landing`]
    GroundedLanding {
        /// Mover
        entity: EntityId,
        /// Impact data
        impact: LandingImpact,
        /// Cell the entity landed on
        pos: BlockPos,
        /// Block in that cell
        block_below: Option<BlockState>,
    },
    /// See [`MovementListener::on_step_sound_threshold`]
    StepSound {
        /// Mover
        entity: EntityId,
        /// Accumulated move distance
        distance_walked: f64,
        /// Block stepped on
        block_below: BlockState,
    },
    /// See [`MovementListener::on_block_entered`]
    BlockEntered {
        /// Mover
        entity: EntityId,
        /// Overlapped cell
        pos: BlockPos,
        /// Block in that cell
        state: BlockState,
    },
    /// See [`MovementListener::on_extinguished`]
    Extinguished {
        /// Mover
        entity: EntityId,
    },
}

impl MovementEvent {
    /// Type of this event
    pub fn event_type(&self) -> MovementEventType {
        match self {
            Self::GroundedLanding { .. } => MovementEventType::GroundedLanding,
            Self::StepSound { .. } => MovementEventType::StepSound,
            Self::BlockEntered { .. } => MovementEventType::BlockEntered,
            Self::Extinguished { .. } => MovementEventType::Extinguished,
        }
    }

    /// Entity the event concerns
    pub fn entity(&self) -> EntityId {
        match self {
            Self::GroundedLanding { entity, .. }
            | Self::StepSound { entity, .. }
            | Self::BlockEntered { entity, .. }
            | Self::Extinguished { entity } => *entity,
        }
    }
}

/// Collaborator notified of movement side effects
pub trait MovementListener {
    /// Entity collided vertically while moving down
    fn on_grounded_landing(
        &mut self,
        _entity: EntityId,
        _impact: LandingImpact,
        _pos: BlockPos,
        _block_below: Option<&BlockState>,
    ) {
    }

    /// Entity walked far enough for another footstep
    fn on_step_sound_threshold(&mut self, _entity: EntityId, _distance_walked: f64, _block_below: &BlockState) {}

    /// Entity's post-move box overlaps `pos`
    fn on_block_entered(&mut self, _entity: EntityId, _pos: BlockPos, _state: &BlockState) {}

    /// Water extinguished a burning entity
    fn on_extinguished(&mut self, _entity: EntityId) {}
}

/// Listener that ignores everything
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopListener;

impl MovementListener for NoopListener {}

/// Listener that records every notification in order
#[derive(Debug, Clone, Default)]
pub struct EventLog {
    events: Vec<MovementEvent>,
}

impl EventLog {
    /// Create an empty log
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything recorded so far
    pub fn events(&self) -> &[MovementEvent] {
        &self.events
    }

    /// Recorded events of one type
    pub fn of_type(&self, event_type: MovementEventType) -> impl Iterator<Item = &MovementEvent> {
        self.events.iter().filter(move |e| e.event_type() == event_type)
    }

    /// Number of recorded events of one type
    pub fn count(&self, event_type: MovementEventType) -> usize {
        self.of_type(event_type).count()
    }

    /// Take the recorded events, leaving the log empty
    pub fn drain(&mut self) -> Vec<MovementEvent> {
        std::mem::take(&mut self.events)
    }

    /// Clear the log
    pub fn clear(&mut self) {
        self.events.clear();
    }
}

impl MovementListener for EventLog {
    fn on_grounded_landing(
        &mut self,
        entity: EntityId,
        impact: LandingImpact,
        pos: BlockPos,
        block_below: Option<&BlockState>,
    ) {
        self.events.push(MovementEvent::GroundedLanding {
            entity,
            impact,
            pos,
            block_below: block_below.cloned(),
        });
    }

    fn on_step_sound_threshold(&mut self, entity: EntityId, distance_walked: f64, block_below: &BlockState) {
        self.events.push(MovementEvent::StepSound {
            entity,
            distance_walked,
            block_below: block_below.clone(),
        });
    }

    fn on_block_entered(&mut self, entity: EntityId, pos: BlockPos, state: &BlockState) {
        self.events.push(MovementEvent::BlockEntered {
            entity,
            pos,
            state: state.clone(),
        });
    }

    fn on_extinguished(&mut self, entity: EntityId) {
        self.events.push(MovementEvent::Extinguished { entity });
    }
}
