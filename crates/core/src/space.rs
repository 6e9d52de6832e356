//! Geometry primitives: vectors and axis-aligned volumes.
//!
//! Axis convention: X = width (left to right), Y = height (floor to ceiling),
//! Z = depth (front to back). The bin floor is the plane `y = 0`.

use rust_decimal::Decimal;

use crate::scalar::quantize;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A point or size in 3D space, with exact decimal components.
pub type Vector3 = nalgebra::Vector3<Decimal>;

/// Axis index for the width (X) component.
pub const AXIS_X: usize = 0;
/// Axis index for the height (Y) component.
pub const AXIS_Y: usize = 1;
/// Axis index for the depth (Z) component.
pub const AXIS_Z: usize = 2;

/// Builds a vector with every component quantized to the configured precision.
pub fn vec3(x: Decimal, y: Decimal, z: Decimal) -> Vector3 {
    Vector3::new(quantize(x), quantize(y), quantize(z))
}

/// An axis-aligned box anchored at a position.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Volume {
    /// Near-left-bottom corner in bin-local coordinates.
    pub position: Vector3,
    /// Size as (width, height, depth).
    pub size: Vector3,
}

impl Volume {
    /// Creates a volume from a position and a size.
    pub fn new(position: Vector3, size: Vector3) -> Self {
        Self { position, size }
    }

    /// Returns the volumetric measure (w * h * d).
    pub fn measure(&self) -> Decimal {
        self.size.x * self.size.y * self.size.z
    }

    /// Returns the far-right-top corner.
    pub fn max_corner(&self) -> Vector3 {
        Vector3::new(
            self.position.x + self.size.x,
            self.position.y + self.size.y,
            self.position.z + self.size.z,
        )
    }

    /// Strict AABB intersection test. Touching faces do not intersect.
    pub fn intersects(&self, other: &Volume) -> bool {
        (0..3).all(|axis| {
            self.position[axis] < other.position[axis] + other.size[axis]
                && other.position[axis] < self.position[axis] + self.size[axis]
        })
    }

    /// Overlap area of the X-Z projections of the two volumes.
    ///
    /// Zero when the footprints merely touch.
    pub fn footprint_overlap(&self, other: &Volume) -> Decimal {
        let overlap_x = (self.position.x + self.size.x).min(other.position.x + other.size.x)
            - self.position.x.max(other.position.x);
        let overlap_z = (self.position.z + self.size.z).min(other.position.z + other.size.z)
            - self.position.z.max(other.position.z);

        if overlap_x > Decimal::ZERO && overlap_z > Decimal::ZERO {
            overlap_x * overlap_z
        } else {
            Decimal::ZERO
        }
    }
}
