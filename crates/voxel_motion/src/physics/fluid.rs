//! Fluid currents and submersion
//!
//! Before an entity moves, every fluid class is scanned over the cells its
//! box overlaps. The scan records how deep the entity sits in the fluid and
//! whether it touches it at all, and folds the averaged current of the
//! overlapped cells into the entity's velocity.

use crate::core::FluidConfig;
use crate::entity::{EntityMovementState, FluidContact};
use crate::foundation::logging::trace;
use crate::foundation::math::{floor_to_i32, normalize_or_zero, Axis, BlockPos, Vec3};
use crate::physics::collision::BoundingVolume;
use crate::world::{BlockGetter, FluidKind};

/// Result of scanning one fluid class
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FluidSample {
    /// Fluid that was scanned
    pub kind: FluidKind,
    /// Some cell's surface reaches the bottom of the box
    pub touching: bool,
    /// Depth of the deepest contact, capped at the box height
    pub height: f64,
    /// Velocity change applied to the entity
    pub push: Vec3,
}

/// Scans fluids around an entity and applies their current
pub struct FluidPush<'a> {
    terrain: &'a dyn BlockGetter,
    config: &'a FluidConfig,
}

impl<'a> FluidPush<'a> {
    /// Create an integrator reading fluids from `terrain`
    pub fn new(terrain: &'a dyn BlockGetter, config: &'a FluidConfig) -> Self {
        Self { terrain, config }
    }

    /// Push scale of `kind`; lava flows faster in ultrawarm dimensions
    pub fn push_scale(&self, kind: FluidKind, ultrawarm: bool) -> f64 {
        match kind {
            FluidKind::Water => self.config.water_push,
            FluidKind::Lava if ultrawarm => self.config.lava_push_ultrawarm,
            FluidKind::Lava => self.config.lava_push,
        }
    }

    /// Scan `kind` around `state`, apply its current scaled by `scale` and
    /// return what was found
    pub fn update(&self, state: &mut EntityMovementState, kind: FluidKind, scale: f64, is_player: bool) -> FluidSample {
        let volume = state.bounding_volume();
        let scan = volume.deflate(self.config.deflate);
        let box_height = volume.size(Axis::Y);

        let mut touching = false;
        let mut height: f64 = 0.0;
        let mut flow = Vec3::zeros();
        let mut contributing = 0_u32;

        for pos in cells_of(&scan) {
            let Some(fluid) = self.terrain.block_state(pos).and_then(|s| s.fluid().copied()) else {
                continue;
            };
            if fluid.kind != kind {
                continue;
            }
            let surface = f64::from(pos.y) + fluid.height;
            if surface < scan.min.y {
                continue;
            }
            touching = true;
            height = height.max((surface - volume.min.y).min(box_height));
            if state.pushed_by_fluid {
                let mut current = fluid.flow;
                if height < self.config.shallow_threshold {
                    current *= height;
                }
                flow += current;
                contributing += 1;
            }
        }

        let mut push = Vec3::zeros();
        if flow.norm() > 0.0 {
            if contributing > 0 {
                flow /= f64::from(contributing);
            }
            if !is_player {
                flow = normalize_or_zero(&flow);
            }
            push = flow * scale;
            let velocity = state.velocity;
            if velocity.x.abs() < self.config.slow_current
                && velocity.z.abs() < self.config.slow_current
                && push.norm() < self.config.min_flow
            {
                push = normalize_or_zero(&push) * self.config.min_flow;
            }
            state.velocity += push;
            trace!("{} current pushed entity by {:?}", kind, push);
        }

        state.fluid.record(kind, height, touching);
        FluidSample {
            kind,
            touching,
            height,
            push,
        }
    }

    /// Scan every fluid class in order and apply their currents.
    ///
    /// Touching water also clears the fall distance.
    pub fn apply_all(&self, state: &mut EntityMovementState, ultrawarm: bool, is_player: bool) -> FluidContact {
        for kind in FluidKind::ALL {
            let sample = self.update(state, kind, self.push_scale(kind, ultrawarm), is_player);
            if kind == FluidKind::Water && sample.touching {
                state.fall_distance = 0.0;
            }
        }
        state.fluid
    }
}

/// Cells overlapped by `volume` (floor of the minimum to ceiling of the maximum, exclusive)
fn cells_of(volume: &BoundingVolume) -> impl Iterator<Item = BlockPos> {
    let (x0, x1) = (floor_to_i32(volume.min.x), ceil_to_i32(volume.max.x));
    let (y0, y1) = (floor_to_i32(volume.min.y), ceil_to_i32(volume.max.y));
    let (z0, z1) = (floor_to_i32(volume.min.z), ceil_to_i32(volume.max.z));
    (x0..x1).flat_map(move |x| (y0..y1).flat_map(move |y| (z0..z1).map(move |z| BlockPos::new(x, y, z))))
}

#[allow(clippy::cast_possible_truncation)]
fn ceil_to_i32(value: f64) -> i32 {
    value.ceil() as i32
}
