//! Per-entity movement state
//!
//! [`EntityMovementState`] is the persistent state the movement pipeline
//! reads and writes. Bounding volumes and displacements are derived from it
//! every tick and never stored.

use bitflags::bitflags;

use crate::core::EntityDefaults;
use crate::foundation::math::Vec3;
use crate::physics::collision::BoundingVolume;
use crate::physics::piston::PistonClamp;
use crate::world::FluidKind;

bitflags! {
    /// Collisions observed during the last resolved move
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct CollisionFlags: u8 {
        /// X component was reduced
        const X = 1 << 0;
        /// Z component was reduced
        const Z = 1 << 1;
        /// X or Z component was reduced
        const HORIZONTAL = 1 << 2;
        /// Y component was reduced
        const VERTICAL = 1 << 3;
        /// Y component was reduced while moving down
        const VERTICAL_BELOW = 1 << 4;
        /// The step-up candidate was selected
        const STEPPED = 1 << 5;
    }
}

/// How deep the entity sits in each fluid
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FluidContact {
    /// Submersion depth in water
    pub water_height: f64,
    /// Submersion depth in lava
    pub lava_height: f64,
    /// Touching water this tick
    pub in_water: bool,
    /// Touching lava this tick
    pub in_lava: bool,
}

impl FluidContact {
    /// Submersion depth in `kind`
    pub fn height(&self, kind: FluidKind) -> f64 {
        match kind {
            FluidKind::Water => self.water_height,
            FluidKind::Lava => self.lava_height,
        }
    }

    /// Whether the entity touches `kind`
    pub fn touching(&self, kind: FluidKind) -> bool {
        match kind {
            FluidKind::Water => self.in_water,
            FluidKind::Lava => self.in_lava,
        }
    }

    /// Record a scan result for `kind`
    pub fn record(&mut self, kind: FluidKind, height: f64, touching: bool) {
        match kind {
            FluidKind::Water => {
                self.water_height = height;
                self.in_water = touching;
            }
            FluidKind::Lava => {
                self.lava_height = height;
                self.in_lava = touching;
            }
        }
    }
}

/// Persistent movement state owned by one entity
#[derive(Debug, Clone, PartialEq)]
pub struct EntityMovementState {
    /// Feet position (centre of the bottom face)
    pub position: Vec3,
    /// Position before the last committed move
    pub previous_position: Vec3,
    /// Velocity in blocks per tick; the displacement of a self-propelled move
    pub velocity: Vec3,
    /// Box width (X and Z)
    pub width: f64,
    /// Box height
    pub height: f64,
    /// Tallest obstacle climbed automatically
    pub step_height: f64,
    /// Skip collision entirely (markers, non-colliding projectiles)
    pub no_physics: bool,
    /// Sneaking entities do not walk off ledges and hold on to ladders
    pub sneaking: bool,
    /// Resting on solid geometry after the last move
    pub on_ground: bool,
    /// Collisions observed during the last move
    pub collision: CollisionFlags,
    /// Distance fallen since last grounded
    pub fall_distance: f64,
    /// Scaled horizontal distance walked
    pub walk_distance: f64,
    /// Scaled distance moved (including climbing)
    pub move_distance: f64,
    /// `move_distance` value at which the next footstep fires
    pub next_step: f64,
    /// Forced displacement accumulated this tick
    pub piston: PistonClamp,
    /// Trap multiplier picked up from a block entered last move
    pub stuck_multiplier: Option<Vec3>,
    /// Fluid scan results of this tick
    pub fluid: FluidContact,
    /// Currents move this entity
    pub pushed_by_fluid: bool,
    /// On a climbable block this tick
    pub climbing: bool,
    /// Burning; water puts it out
    pub on_fire: bool,
}

impl EntityMovementState {
    /// State of an entity standing at `position` with the given dimensions
    pub fn new(position: Vec3, width: f64, height: f64) -> Self {
        Self {
            position,
            previous_position: position,
            velocity: Vec3::zeros(),
            width,
            height,
            step_height: 0.0,
            no_physics: false,
            sneaking: false,
            on_ground: false,
            collision: CollisionFlags::empty(),
            fall_distance: 0.0,
            walk_distance: 0.0,
            move_distance: 0.0,
            next_step: 1.0,
            piston: PistonClamp::default(),
            stuck_multiplier: None,
            fluid: FluidContact::default(),
            pushed_by_fluid: true,
            climbing: false,
            on_fire: false,
        }
    }

    /// State sized and stepped by configured defaults
    pub fn with_defaults(position: Vec3, defaults: &EntityDefaults) -> Self {
        Self::new(position, defaults.width, defaults.height).with_step_height(defaults.step_height)
    }

    /// Override the step height
    pub fn with_step_height(mut self, step_height: f64) -> Self {
        self.step_height = step_height;
        self
    }

    /// Set the initial velocity
    pub fn with_velocity(mut self, velocity: Vec3) -> Self {
        self.velocity = velocity;
        self
    }

    /// Disable collision
    pub fn without_physics(mut self) -> Self {
        self.no_physics = true;
        self
    }

    /// Box occupied at the current position
    pub fn bounding_volume(&self) -> BoundingVolume {
        BoundingVolume::of_size(&self.position, self.width, self.height)
    }
}
