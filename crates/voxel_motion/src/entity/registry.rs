//! Entity registry
//!
//! Owns every entity's movement state and the passenger → vehicle links.
//! Vehicle chains are stored as id → id lookups, never as references
//! between records, so a rider and its mount can both be mutated freely.

use slotmap::{new_key_type, SlotMap};

use super::state::EntityMovementState;
use crate::physics::collision::{BoundingVolume, VoxelShape};

new_key_type! {
    /// Handle to a registered entity
    pub struct EntityId;
}

/// Everything the registry knows about one entity
#[derive(Debug, Clone, PartialEq)]
pub struct EntityRecord {
    /// Movement state, mutated only by the movement orchestrator
    pub movement: EntityMovementState,
    /// Other entities collide with this one (boats, shulkers)
    pub can_be_collided_with: bool,
    /// Spectators never collide
    pub spectator: bool,
    /// Player-controlled
    pub is_player: bool,
    /// Entity this one rides
    pub vehicle: Option<EntityId>,
}

impl EntityRecord {
    /// Record for an ordinary non-solid entity
    pub fn new(movement: EntityMovementState) -> Self {
        Self {
            movement,
            can_be_collided_with: false,
            spectator: false,
            is_player: false,
            vehicle: None,
        }
    }

    /// Make other entities collide with this one
    pub fn solid(mut self) -> Self {
        self.can_be_collided_with = true;
        self
    }

    /// Mark as player-controlled
    pub fn player(mut self) -> Self {
        self.is_player = true;
        self
    }
}

/// Registry of entities keyed by [`EntityId`]
#[derive(Debug, Clone, Default)]
pub struct EntityRegistry {
    entities: SlotMap<EntityId, EntityRecord>,
}

impl EntityRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an entity
    pub fn spawn(&mut self, record: EntityRecord) -> EntityId {
        self.entities.insert(record)
    }

    /// Remove an entity, dismounting anything riding it
    pub fn despawn(&mut self, id: EntityId) -> Option<EntityRecord> {
        let record = self.entities.remove(id)?;
        for (_, other) in &mut self.entities {
            if other.vehicle == Some(id) {
                other.vehicle = None;
            }
        }
        Some(record)
    }

    /// Look up an entity
    pub fn get(&self, id: EntityId) -> Option<&EntityRecord> {
        self.entities.get(id)
    }

    /// Look up an entity mutably
    pub fn get_mut(&mut self, id: EntityId) -> Option<&mut EntityRecord> {
        self.entities.get_mut(id)
    }

    /// Movement state of an entity
    pub fn movement(&self, id: EntityId) -> Option<&EntityMovementState> {
        self.get(id).map(|record| &record.movement)
    }

    /// Iterate over all entities
    pub fn iter(&self) -> impl Iterator<Item = (EntityId, &EntityRecord)> {
        self.entities.iter()
    }

    /// Ids of all entities
    pub fn ids(&self) -> Vec<EntityId> {
        self.entities.keys().collect()
    }

    /// Number of registered entities
    pub fn len(&self) -> usize {
        self.entities.len()
    }

    /// Whether the registry is empty
    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// Mount `passenger` on `vehicle` (or dismount with `None`).
    ///
    /// Returns `false` without changing anything when either id is unknown or
    /// the link would close a loop.
    pub fn set_vehicle(&mut self, passenger: EntityId, vehicle: Option<EntityId>) -> bool {
        if !self.entities.contains_key(passenger) {
            return false;
        }
        if let Some(vehicle) = vehicle {
            if !self.entities.contains_key(vehicle) || self.chain(vehicle).any(|id| id == passenger) {
                return false;
            }
        }
        if let Some(record) = self.entities.get_mut(passenger) {
            record.vehicle = vehicle;
        }
        true
    }

    /// `id` followed by every vehicle up its chain
    fn chain(&self, id: EntityId) -> impl Iterator<Item = EntityId> + '_ {
        let limit = self.entities.len();
        std::iter::successors(Some(id), move |&current| {
            self.entities.get(current).and_then(|record| record.vehicle)
        })
        .take(limit.max(1))
    }

    /// Bottom-most vehicle of the chain `id` belongs to (itself if it rides nothing)
    pub fn root_vehicle(&self, id: EntityId) -> EntityId {
        self.chain(id).last().unwrap_or(id)
    }

    /// Whether two entities ride in (or are) the same vehicle chain
    pub fn shares_vehicle(&self, a: EntityId, b: EntityId) -> bool {
        self.root_vehicle(a) == self.root_vehicle(b)
    }

    /// Default collision predicate for `mover`: solid, not a spectator, not
    /// the mover itself and not part of its vehicle chain
    pub fn collidable_with(&self, mover: EntityId) -> impl Fn(EntityId, &EntityRecord) -> bool + '_ {
        move |id, record| {
            id != mover
                && record.can_be_collided_with
                && !record.spectator
                && !self.shares_vehicle(mover, id)
        }
    }

    /// Collision shapes of entities overlapping `volume` accepted by `predicate`
    pub fn entity_shapes(
        &self,
        volume: &BoundingVolume,
        predicate: impl Fn(EntityId, &EntityRecord) -> bool,
    ) -> Vec<VoxelShape> {
        let probe = volume.inflate(1.0e-7);
        self.entities
            .iter()
            .filter(|(id, record)| predicate(*id, *record))
            .map(|(_, record)| record.movement.bounding_volume())
            .filter(|bounds| bounds.intersects(&probe))
            .map(VoxelShape::from_box)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::math::Vec3;

    fn record_at(x: f64) -> EntityRecord {
        EntityRecord::new(EntityMovementState::new(Vec3::new(x, 0.0, 0.5), 1.0, 1.0)).solid()
    }

    #[test]
    fn vehicle_chain_resolves_root() {
        let mut registry = EntityRegistry::new();
        let boat = registry.spawn(record_at(0.0));
        let rider = registry.spawn(record_at(0.0));
        let parrot = registry.spawn(record_at(0.0));
        assert!(registry.set_vehicle(rider, Some(boat)));
        assert!(registry.set_vehicle(parrot, Some(rider)));
        assert_eq!(registry.root_vehicle(parrot), boat);
        assert!(registry.shares_vehicle(parrot, boat));
    }

    #[test]
    fn vehicle_cycles_are_rejected() {
        let mut registry = EntityRegistry::new();
        let a = registry.spawn(record_at(0.0));
        let b = registry.spawn(record_at(0.0));
        assert!(registry.set_vehicle(a, Some(b)));
        assert!(!registry.set_vehicle(b, Some(a)));
        assert!(!registry.set_vehicle(a, Some(a)));
    }

    #[test]
    fn despawn_dismounts_passengers() {
        let mut registry = EntityRegistry::new();
        let boat = registry.spawn(record_at(0.0));
        let rider = registry.spawn(record_at(0.0));
        registry.set_vehicle(rider, Some(boat));
        registry.despawn(boat);
        assert_eq!(registry.get(rider).and_then(|r| r.vehicle), None);
        assert_eq!(registry.root_vehicle(rider), rider);
    }

    #[test]
    fn default_predicate_skips_self_and_vehicle_chain() {
        let mut registry = EntityRegistry::new();
        let mover = registry.spawn(record_at(0.0));
        let boat = registry.spawn(record_at(0.5));
        let stranger = registry.spawn(record_at(1.0));
        registry.set_vehicle(mover, Some(boat));

        let probe = BoundingVolume::from_bounds(-5.0, -5.0, -5.0, 5.0, 5.0, 5.0);
        let shapes = registry.entity_shapes(&probe, registry.collidable_with(mover));
        assert_eq!(shapes.len(), 1);
        assert_eq!(
            shapes[0].bounds(),
            registry.movement(stranger).map(EntityMovementState::bounding_volume)
        );
    }
}
