//! Greedy Left-Bottom-Back (LBB) placement.
//!
//! The baseline strategy: candidate positions are the pivot corners of the
//! items already in the bin, visited in insertion order, and the first
//! feasible (pivot, orientation) pair wins. Because early items sit near the
//! origin, placements cluster toward the left-bottom-back corner; the
//! multi-anchor strategy exists to compensate for that bias.

use rust_decimal::Decimal;
use vanpack_core::{Bin, ConstraintSet, Item, Vector3, Volume, ORIENTATIONS};

/// Attempts to place `item` in `bin`, committing the first feasible candidate.
///
/// An empty bin is probed at the origin with every orientation. Otherwise each
/// placed item contributes three pivots, one per axis, on its positive faces.
/// On failure the item is handed back unplaced, in its entry orientation.
pub fn try_place(
    bin: &mut Bin,
    mut item: Item,
    constraints: &ConstraintSet,
) -> Result<(), Item> {
    let entry_rotation = item.rotation_state();

    let origin = Vector3::new(Decimal::ZERO, Decimal::ZERO, Decimal::ZERO);
    let pivots: Vec<Vector3> = if bin.items().is_empty() {
        vec![origin]
    } else {
        bin.items()
            .iter()
            .filter_map(Item::volume_at)
            .flat_map(pivot_corners)
            .collect()
    };

    for pivot in pivots {
        for state in 0..ORIENTATIONS {
            item.set_rotation(state);
            item.set_position(pivot);
            match bin.put_item(item, constraints) {
                Ok(()) => return Ok(()),
                Err(rejected) => item = rejected,
            }
        }
    }

    item.clear_position();
    item.set_rotation(entry_rotation);
    Err(item)
}

/// The three pivot corners of a placed volume: its position shifted by its
/// extent along each axis in turn.
fn pivot_corners(volume: Volume) -> [Vector3; 3] {
    let mut corners = [volume.position; 3];
    for (axis, corner) in corners.iter_mut().enumerate() {
        corner[axis] += volume.size[axis];
    }
    corners
}
