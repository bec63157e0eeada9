//! Math utilities and types
//!
//! Provides the vector and cell coordinate types used by the movement code.
//! Everything positional is double precision so that two peers resolving the
//! same tick land on the same bits.

pub use nalgebra::{Point3, Vector3};

/// 3D vector type used for positions, velocities and displacements
pub type Vec3 = Vector3<f64>;

/// Integer coordinates of a world cell
pub type BlockPos = Point3<i32>;

/// Tolerance below which a resolved offset is treated as zero
pub const COLLISION_EPSILON: f64 = 1.0e-7;

/// One of the three world axes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    /// East/west
    X,
    /// Up/down
    Y,
    /// North/south
    Z,
}

impl Axis {
    /// All axes in storage order
    pub const ALL: [Axis; 3] = [Axis::X, Axis::Y, Axis::Z];

    /// Component index of this axis
    pub const fn index(self) -> usize {
        match self {
            Self::X => 0,
            Self::Y => 1,
            Self::Z => 2,
        }
    }

    /// Pick the value belonging to this axis
    pub fn choose<T>(self, x: T, y: T, z: T) -> T {
        match self {
            Self::X => x,
            Self::Y => y,
            Self::Z => z,
        }
    }

    /// The two axes orthogonal to this one
    pub const fn others(self) -> (Axis, Axis) {
        match self {
            Self::X => (Axis::Y, Axis::Z),
            Self::Y => (Axis::X, Axis::Z),
            Self::Z => (Axis::X, Axis::Y),
        }
    }

    /// Unit-length vector pointing along this axis scaled by `amount`
    pub fn vector(self, amount: f64) -> Vec3 {
        let mut v = Vec3::zeros();
        v[self.index()] = amount;
        v
    }
}

/// Squared length of the horizontal (X/Z) part of a vector
pub fn horizontal_distance_sqr(v: &Vec3) -> f64 {
    v.x * v.x + v.z * v.z
}

/// Length of the horizontal (X/Z) part of a vector
pub fn horizontal_distance(v: &Vec3) -> f64 {
    horizontal_distance_sqr(v).sqrt()
}

/// Normalize a vector, returning zero for vectors too short to carry a direction
pub fn normalize_or_zero(v: &Vec3) -> Vec3 {
    let length = v.norm();
    if length < 1.0e-4 {
        Vec3::zeros()
    } else {
        v / length
    }
}

/// Cell containing the given world position
pub fn block_pos_of(position: &Vec3) -> BlockPos {
    BlockPos::new(
        floor_to_i32(position.x),
        floor_to_i32(position.y),
        floor_to_i32(position.z),
    )
}

/// Floor a coordinate into a cell index
#[allow(clippy::cast_possible_truncation)]
pub fn floor_to_i32(value: f64) -> i32 {
    value.floor() as i32
}

/// Whether every component is finite
pub fn is_finite(v: &Vec3) -> bool {
    v.iter().all(|c| c.is_finite())
}
