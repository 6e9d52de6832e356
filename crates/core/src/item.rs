//! Parcel items and their axis-aligned orientations.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::error::{Error, Result};
use crate::scalar::{quantize, quantize_vector};
use crate::space::{Vector3, Volume};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Number of axis-aligned orientations enumerated by the placers.
///
/// Three choices of which original dimension becomes the width axis, times two
/// orderings of the remaining dimensions over (height, depth), times a final
/// height-depth mirror: 3 x 2 x 2 = 12. Some states map to the same dimension
/// triple; the enumeration is kept fixed so candidate order is deterministic.
pub const ORIENTATIONS: u8 = 12;

/// Returns the dimensions of `original` under the given rotation state.
///
/// States are decoded as `axis * 4 + swap * 2 + mirror`, producing a fixed,
/// deterministic order for states `0..12`.
pub fn oriented_dimensions(original: &Vector3, state: u8) -> Vector3 {
    let state = state % ORIENTATIONS;
    let axis = (state / 4) as usize;
    let swap = (state / 2) % 2 == 1;
    let mirror = state % 2 == 1;

    let (first, second) = match axis {
        0 => (1, 2),
        1 => (0, 2),
        _ => (0, 1),
    };
    let (mut y_axis, mut z_axis) = if swap { (second, first) } else { (first, second) };
    if mirror {
        std::mem::swap(&mut y_axis, &mut z_axis);
    }

    Vector3::new(original[axis], original[y_axis], original[z_axis])
}

/// A rectangular parcel to be placed inside a bin.
///
/// `dimensions` always equals the original dimensions under the current
/// rotation state; `position` is `None` until a placement is proposed or
/// committed.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Item {
    id: String,
    dimensions: Vector3,
    original_dimensions: Vector3,
    position: Option<Vector3>,
    weight: Decimal,
    priority: i32,
    rotation_state: u8,
}

impl Item {
    /// Creates a new unplaced item with the given dimensions and weight.
    pub fn new(
        id: impl Into<String>,
        width: Decimal,
        height: Decimal,
        depth: Decimal,
        weight: Decimal,
    ) -> Self {
        let size = quantize_vector(&Vector3::new(width, height, depth));
        Self {
            id: id.into(),
            dimensions: size,
            original_dimensions: size,
            position: None,
            weight: quantize(weight),
            priority: 0,
            rotation_state: 0,
        }
    }

    /// Creates an item from a size vector.
    pub fn from_size(id: impl Into<String>, size: Vector3, weight: Decimal) -> Self {
        Self::new(id, size.x, size.y, size.z, weight)
    }

    /// Sets the placement priority (higher is placed earlier).
    pub fn with_priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }

    /// Returns the item identifier.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Returns the current dimensions, rotation applied.
    pub fn dimensions(&self) -> Vector3 {
        self.dimensions
    }

    /// Returns the dimensions the item was constructed with.
    pub fn original_dimensions(&self) -> Vector3 {
        self.original_dimensions
    }

    /// Returns the position of the near-left-bottom corner, if placed.
    pub fn position(&self) -> Option<Vector3> {
        self.position
    }

    /// Returns the weight.
    pub fn weight(&self) -> Decimal {
        self.weight
    }

    /// Returns the placement priority.
    pub fn priority(&self) -> i32 {
        self.priority
    }

    /// Returns the current rotation state in `0..12`.
    pub fn rotation_state(&self) -> u8 {
        self.rotation_state
    }

    /// Current width (X extent).
    pub fn width(&self) -> Decimal {
        self.dimensions.x
    }

    /// Current height (Y extent).
    pub fn height(&self) -> Decimal {
        self.dimensions.y
    }

    /// Current depth (Z extent).
    pub fn depth(&self) -> Decimal {
        self.dimensions.z
    }

    /// Returns the volumetric measure, invariant under rotation.
    pub fn volume(&self) -> Decimal {
        self.dimensions.x * self.dimensions.y * self.dimensions.z
    }

    /// Returns true once a position has been assigned.
    pub fn is_placed(&self) -> bool {
        self.position.is_some()
    }

    /// Assigns a position, quantized on store.
    pub fn set_position(&mut self, position: Vector3) {
        self.position = Some(quantize_vector(&position));
    }

    /// Removes the assigned position.
    pub fn clear_position(&mut self) {
        self.position = None;
    }

    /// Applies the rotation state, deriving dimensions from the originals.
    pub fn set_rotation(&mut self, state: u8) {
        self.rotation_state = state % ORIENTATIONS;
        self.dimensions = oriented_dimensions(&self.original_dimensions, self.rotation_state);
    }

    /// Unplaces the item and restores the construction orientation.
    pub fn reset(&mut self) {
        self.clear_position();
        self.set_rotation(0);
    }

    /// Returns the occupied volume for a placed item.
    pub fn volume_at(&self) -> Option<Volume> {
        self.position.map(|p| Volume::new(p, self.dimensions))
    }

    /// Returns the geometric center for a placed item.
    pub fn center(&self) -> Option<Vector3> {
        let two = dec!(2);
        self.position.map(|p| {
            Vector3::new(
                p.x + self.dimensions.x / two,
                p.y + self.dimensions.y / two,
                p.z + self.dimensions.z / two,
            )
        })
    }

    /// Re-quantizes stored values after a precision change.
    pub fn apply_precision(&mut self) {
        self.original_dimensions = quantize_vector(&self.original_dimensions);
        self.weight = quantize(self.weight);
        self.dimensions = oriented_dimensions(&self.original_dimensions, self.rotation_state);
        if let Some(p) = self.position {
            self.position = Some(quantize_vector(&p));
        }
    }

    /// Validates dimensions and weight.
    pub fn validate(&self) -> Result<()> {
        if self.original_dimensions.x <= Decimal::ZERO
            || self.original_dimensions.y <= Decimal::ZERO
            || self.original_dimensions.z <= Decimal::ZERO
        {
            return Err(Error::InvalidItem(format!(
                "all dimensions for '{}' must be positive",
                self.id
            )));
        }
        if self.weight <= Decimal::ZERO {
            return Err(Error::InvalidItem(format!(
                "weight for '{}' must be positive",
                self.id
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn sorted_components(v: &Vector3) -> [Decimal; 3] {
        let mut c = [v.x, v.y, v.z];
        c.sort();
        c
    }

    #[test]
    fn test_orientation_count_and_closure() {
        let original = Vector3::new(dec!(1), dec!(2), dec!(3));
        let base = sorted_components(&original);
        for state in 0..ORIENTATIONS {
            let dims = oriented_dimensions(&original, state);
            assert_eq!(sorted_components(&dims), base, "state {state}");
        }
    }

    #[test]
    fn test_orientations_cover_all_permutations() {
        let original = Vector3::new(dec!(1), dec!(2), dec!(3));
        let mut seen = std::collections::HashSet::new();
        for state in 0..ORIENTATIONS {
            let dims = oriented_dimensions(&original, state);
            seen.insert((dims.x, dims.y, dims.z));
        }
        // 6 distinct permutations of 3 distinct values.
        assert_eq!(seen.len(), 6);
    }

    #[test]
    fn test_identity_orientation() {
        let original = Vector3::new(dec!(1), dec!(2), dec!(3));
        assert_eq!(oriented_dimensions(&original, 0), original);
    }

    #[test]
    fn test_set_rotation_updates_dimensions() {
        let mut item = Item::new("A", dec!(1), dec!(2), dec!(3), dec!(10));
        item.set_rotation(4);
        assert_eq!(
            item.dimensions(),
            oriented_dimensions(&item.original_dimensions(), 4)
        );
        assert_eq!(item.rotation_state(), 4);

        item.set_rotation(0);
        assert_eq!(item.dimensions(), item.original_dimensions());
    }

    #[test]
    fn test_position_quantized_on_store() {
        let mut item = Item::new("A", dec!(1), dec!(1), dec!(1), dec!(1));
        item.set_position(Vector3::new(dec!(0.12349), dec!(0), dec!(0)));
        assert_eq!(item.position().unwrap().x, dec!(0.123));
    }

    #[test]
    fn test_reset_unplaces_and_restores_rotation() {
        let mut item = Item::new("A", dec!(1), dec!(2), dec!(3), dec!(1));
        item.set_rotation(7);
        item.set_position(Vector3::new(dec!(1), dec!(1), dec!(1)));
        item.reset();
        assert!(!item.is_placed());
        assert_eq!(item.dimensions(), item.original_dimensions());
    }

    #[test]
    fn test_center() {
        let mut item = Item::new("A", dec!(2), dec!(4), dec!(6), dec!(1));
        item.set_position(Vector3::new(dec!(1), dec!(0), dec!(0)));
        let c = item.center().unwrap();
        assert_eq!(c, Vector3::new(dec!(2), dec!(2), dec!(3)));
    }

    #[test]
    fn test_validation() {
        assert!(Item::new("A", dec!(1), dec!(1), dec!(1), dec!(1))
            .validate()
            .is_ok());
        assert!(Item::new("B", dec!(0), dec!(1), dec!(1), dec!(1))
            .validate()
            .is_err());
        assert!(Item::new("C", dec!(1), dec!(1), dec!(1), dec!(0))
            .validate()
            .is_err());
    }
}
