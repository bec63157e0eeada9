//! Block states and fluids
//!
//! A [`BlockState`] carries everything the movement pipeline needs to know
//! about a cell: its collision shape, the fluid it holds, whether it can be
//! climbed, how it slows walkers and whether it traps entities that enter
//! it. Properties are shared behind an `Arc`, so terrain storage and
//! gathered results clone cheaply.

use std::fmt;
use std::sync::Arc;

use crate::foundation::math::Vec3;
use crate::physics::collision::VoxelShape;

/// Fluid classes that push entities
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FluidKind {
    /// Primary tier: strong current, resets fall distance
    Water,
    /// Secondary tier: weak current
    Lava,
}

impl FluidKind {
    /// All fluid kinds, in the order they are integrated each tick
    pub const ALL: [FluidKind; 2] = [FluidKind::Water, FluidKind::Lava];
}

impl fmt::Display for FluidKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Water => write!(f, "water"),
            Self::Lava => write!(f, "lava"),
        }
    }
}

/// Fluid held by a cell
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FluidState {
    /// Which fluid
    pub kind: FluidKind,
    /// Surface height inside the cell, `0..=1`
    pub height: f64,
    /// Current direction and strength at this cell
    pub flow: Vec3,
}

impl FluidState {
    /// Height of a source cell with open air above it
    pub const SOURCE_HEIGHT: f64 = 8.0 / 9.0;

    /// Motionless fluid filled to `height`
    pub fn still(kind: FluidKind, height: f64) -> Self {
        Self {
            kind,
            height,
            flow: Vec3::zeros(),
        }
    }

    /// Fluid filled to `height` with a current
    pub fn flowing(kind: FluidKind, height: f64, flow: Vec3) -> Self {
        Self { kind, height, flow }
    }
}

/// Immutable description of a block
#[derive(Debug, Clone, PartialEq)]
pub struct BlockProperties {
    /// Identifier used in logs
    pub name: String,
    /// Cell-local collision shape
    pub shape: VoxelShape,
    /// Fluid occupying the cell, if any
    pub fluid: Option<FluidState>,
    /// Ladders, vines and the like
    pub climbable: bool,
    /// Horizontal velocity factor applied to entities walking on or in it
    pub speed_factor: f64,
    /// Per-axis displacement factor for entities trapped inside (cobwebs)
    pub stuck_multiplier: Option<Vec3>,
}

impl BlockProperties {
    /// Solid full block with default properties
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            shape: VoxelShape::block(),
            fluid: None,
            climbable: false,
            speed_factor: 1.0,
            stuck_multiplier: None,
        }
    }

    /// Set the collision shape
    pub fn with_shape(mut self, shape: VoxelShape) -> Self {
        self.shape = shape;
        self
    }

    /// Set the fluid (typically together with an empty shape)
    pub fn with_fluid(mut self, fluid: FluidState) -> Self {
        self.fluid = Some(fluid);
        self
    }

    /// Mark as climbable
    pub fn climbable(mut self) -> Self {
        self.climbable = true;
        self
    }

    /// Set the walking speed factor
    pub fn with_speed_factor(mut self, factor: f64) -> Self {
        self.speed_factor = factor;
        self
    }

    /// Trap entities that enter the cell
    pub fn with_stuck_multiplier(mut self, multiplier: Vec3) -> Self {
        self.stuck_multiplier = Some(multiplier);
        self
    }
}

/// Shared handle to a block description
#[derive(Debug, Clone)]
pub struct BlockState(Arc<BlockProperties>);

impl PartialEq for BlockState {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0) || self.0 == other.0
    }
}

impl From<BlockProperties> for BlockState {
    fn from(properties: BlockProperties) -> Self {
        Self(Arc::new(properties))
    }
}

impl BlockState {
    /// Properties of this block
    pub fn properties(&self) -> &BlockProperties {
        &self.0
    }

    /// Identifier used in logs
    pub fn name(&self) -> &str {
        &self.0.name
    }

    /// Cell-local collision shape
    pub fn shape(&self) -> &VoxelShape {
        &self.0.shape
    }

    /// Fluid occupying the cell
    pub fn fluid(&self) -> Option<&FluidState> {
        self.0.fluid.as_ref()
    }

    /// Whether entities can climb it
    pub fn is_climbable(&self) -> bool {
        self.0.climbable
    }

    /// Horizontal velocity factor
    pub fn speed_factor(&self) -> f64 {
        self.0.speed_factor
    }

    /// Trap multiplier, if the block traps entities
    pub fn stuck_multiplier(&self) -> Option<Vec3> {
        self.0.stuck_multiplier
    }

    /// Whether the collision shape reaches outside its cell
    pub fn has_large_collision_shape(&self) -> bool {
        self.0.shape.exceeds_unit_cell()
    }

    /// Full solid block
    pub fn stone() -> Self {
        BlockProperties::new("stone").into()
    }

    /// Half-height slab resting on the cell floor
    pub fn bottom_slab() -> Self {
        BlockProperties::new("bottom_slab")
            .with_shape(VoxelShape::sixteenths(0.0, 0.0, 0.0, 16.0, 8.0, 16.0))
            .into()
    }

    /// Fence post, one and a half blocks tall
    pub fn fence_post() -> Self {
        BlockProperties::new("fence_post")
            .with_shape(VoxelShape::sixteenths(6.0, 0.0, 6.0, 10.0, 24.0, 10.0))
            .into()
    }

    /// Slightly sunken block that slows walkers
    pub fn soul_sand() -> Self {
        BlockProperties::new("soul_sand")
            .with_shape(VoxelShape::sixteenths(0.0, 0.0, 0.0, 16.0, 14.0, 16.0))
            .with_speed_factor(0.4)
            .into()
    }

    /// Non-solid climbable block
    pub fn ladder() -> Self {
        BlockProperties::new("ladder")
            .with_shape(VoxelShape::empty())
            .climbable()
            .into()
    }

    /// Non-solid block that traps entities
    pub fn cobweb() -> Self {
        BlockProperties::new("cobweb")
            .with_shape(VoxelShape::empty())
            .with_stuck_multiplier(Vec3::new(0.25, 0.05, 0.25))
            .into()
    }

    /// Fluid cell without collision
    pub fn fluid_block(fluid: FluidState) -> Self {
        BlockProperties::new(fluid.kind.to_string())
            .with_shape(VoxelShape::empty())
            .with_fluid(fluid)
            .into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn presets_describe_their_blocks() {
        assert!(BlockState::fence_post().has_large_collision_shape());
        assert!(!BlockState::stone().has_large_collision_shape());
        assert!(BlockState::ladder().is_climbable());
        assert!(BlockState::ladder().shape().is_empty());
        assert_eq!(BlockState::soul_sand().speed_factor(), 0.4);
        assert_eq!(
            BlockState::fluid_block(FluidState::still(FluidKind::Water, 1.0)).name(),
            "water"
        );
    }

    #[test]
    fn equality_is_by_properties() {
        assert_eq!(BlockState::stone(), BlockState::stone());
        assert_ne!(BlockState::stone(), BlockState::bottom_slab());
    }
}
