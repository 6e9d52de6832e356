//! Multi-anchor placement.
//!
//! The greedy LBB heuristic commits the first feasible candidate it finds,
//! which concentrates load in the left-bottom-back corner. Under an active
//! center-of-gravity constraint that corner bias causes cascading rejections.
//! This strategy instead generates candidate footprint origins from several
//! anchor sources on the X-Z plane, scans the feasible resting surfaces along
//! Y for each, scores every candidate that survives the constraint chain and
//! commits only the best one.
//!
//! The score deliberately carries no balance term: anchor mirroring makes the
//! candidate set symmetric so the center-of-gravity constraint has balanced
//! placements to accept, while the constraint alone decides feasibility.

use std::collections::HashSet;

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use vanpack_core::{quantize, Bin, ConstraintSet, Item, Vector3, Volume, ORIENTATIONS};

/// How many of the most recently placed items contribute neighbour anchors.
///
/// The window keeps anchor generation constant-time per placement instead of
/// growing with the bin fill level. Eight neighbours proved a good trade-off
/// between coverage and cost.
pub const NEIGHBOR_WINDOW: usize = 8;

/// Default scoring weight for the placement height term.
pub const DEFAULT_HEIGHT_WEIGHT: f64 = 0.3;
/// Default scoring weight for the compactness term.
pub const DEFAULT_COMPACT_WEIGHT: f64 = 0.2;

struct Candidate {
    score: f64,
    position: Vector3,
    rotation: u8,
}

/// Attempts to place `item` in `bin`, committing the best-scored candidate.
///
/// Candidates are enumerated deterministically: orientations in their fixed
/// order, anchors in source order, resting surfaces from highest to lowest.
/// Ties keep the earliest candidate. On failure the item is handed back
/// unplaced, in its entry orientation.
pub fn try_place(
    bin: &mut Bin,
    mut item: Item,
    constraints: &ConstraintSet,
    height_weight: f64,
    compact_weight: f64,
) -> Result<(), Item> {
    let entry_rotation = item.rotation_state();

    let mut best: Option<Candidate> = None;
    let mut scratch = item.clone();

    for state in 0..ORIENTATIONS {
        scratch.set_rotation(state);
        for (x, z) in generate_anchors(bin, &scratch) {
            for y in support_levels(bin, &scratch, x, z) {
                scratch.set_position(Vector3::new(x, y, z));
                if !constraints.evaluate(bin, &scratch) {
                    continue;
                }
                let Some(position) = scratch.position() else {
                    continue;
                };
                let score = score_placement(bin, position, height_weight, compact_weight);
                if best.as_ref().map_or(true, |b| score < b.score) {
                    best = Some(Candidate {
                        score,
                        position,
                        rotation: state,
                    });
                }
            }
        }
    }

    match best {
        Some(candidate) => {
            item.set_rotation(candidate.rotation);
            item.set_position(candidate.position);
            match bin.put_item(item, constraints) {
                Ok(()) => Ok(()),
                Err(mut rejected) => {
                    rejected.clear_position();
                    rejected.set_rotation(entry_rotation);
                    Err(rejected)
                }
            }
        }
        None => {
            item.clear_position();
            item.set_rotation(entry_rotation);
            Err(item)
        }
    }
}

/// Produces the ordered, de-duplicated (x, z) anchor candidates for an item
/// footprint.
///
/// Sources, in order: the four floor corners, the floor center, up to five
/// neighbour positions around each of the last [`NEIGHBOR_WINDOW`] placed
/// items (most recent first), and finally the reflections of every anchor so
/// far across the two mid-planes. Corners, center and reflections are clamped
/// by the footprint extent, so a far-wall corner places the item flush to the
/// wall and a reflected anchor mirrors the item *center*, not its origin.
/// Coordinates are quantized before de-duplication; negative anchors are
/// dropped at the source.
fn generate_anchors(bin: &Bin, item: &Item) -> Vec<(Decimal, Decimal)> {
    // Largest footprint origins that keep the item inside the walls.
    let max_x = bin.width() - item.width();
    let max_z = bin.depth() - item.depth();
    let item_width = item.width();
    let item_depth = item.depth();

    let mut anchors: Vec<(Decimal, Decimal)> = Vec::new();
    let mut seen: HashSet<(Decimal, Decimal)> = HashSet::new();
    let mut push = |anchors: &mut Vec<(Decimal, Decimal)>,
                    seen: &mut HashSet<(Decimal, Decimal)>,
                    x: Decimal,
                    z: Decimal| {
        if x < Decimal::ZERO || z < Decimal::ZERO {
            return;
        }
        let anchor = (quantize(x), quantize(z));
        if seen.insert(anchor) {
            anchors.push(anchor);
        }
    };

    // Floor corners and floor center.
    push(&mut anchors, &mut seen, Decimal::ZERO, Decimal::ZERO);
    push(&mut anchors, &mut seen, max_x, Decimal::ZERO);
    push(&mut anchors, &mut seen, Decimal::ZERO, max_z);
    push(&mut anchors, &mut seen, max_x, max_z);
    push(&mut anchors, &mut seen, max_x / dec!(2), max_z / dec!(2));

    // Neighbours of recently placed items.
    for placed in bin.items().iter().rev().take(NEIGHBOR_WINDOW) {
        let Some(volume) = placed.volume_at() else {
            continue;
        };
        let px = volume.position.x;
        let pz = volume.position.z;
        push(&mut anchors, &mut seen, px + volume.size.x, pz);
        push(&mut anchors, &mut seen, px, pz + volume.size.z);
        push(&mut anchors, &mut seen, px + volume.size.x, pz + volume.size.z);
        push(&mut anchors, &mut seen, px - item_width, pz);
        push(&mut anchors, &mut seen, px, pz - item_depth);
    }

    // Mirror every anchor produced so far across both mid-planes, so both
    // halves of the bin are explored equally.
    let snapshot_len = anchors.len();
    for index in 0..snapshot_len {
        let (x, z) = anchors[index];
        push(&mut anchors, &mut seen, max_x - x, z);
        push(&mut anchors, &mut seen, x, max_z - z);
        push(&mut anchors, &mut seen, max_x - x, max_z - z);
    }

    anchors
}

/// Computes the feasible resting surfaces for a footprint at (x, z), highest
/// first.
///
/// The floor is always a candidate. Every placed item whose top face overlaps
/// the footprint contributes its top Y, unless the item under trial could not
/// fit below the ceiling there.
fn support_levels(bin: &Bin, item: &Item, x: Decimal, z: Decimal) -> Vec<Decimal> {
    let footprint = Volume::new(
        Vector3::new(x, Decimal::ZERO, z),
        item.dimensions(),
    );

    let mut levels = vec![Decimal::ZERO];
    for placed in bin.items() {
        let Some(volume) = placed.volume_at() else {
            continue;
        };
        let top = volume.position.y + volume.size.y;
        if top + item.height() > bin.height() {
            continue;
        }
        if volume.footprint_overlap(&footprint) > Decimal::ZERO {
            levels.push(top);
        }
    }

    levels.sort_unstable_by(|a, b| b.cmp(a));
    levels.dedup();
    levels
}

/// Scores a candidate placement; lower is better.
///
/// Height term: placement Y normalized by the bin height. Compactness term:
/// mean Manhattan X-Z distance to the placed items, normalized by the bin
/// footprint extent, zero for an empty bin.
fn score_placement(bin: &Bin, position: Vector3, height_weight: f64, compact_weight: f64) -> f64 {
    let height_ratio = (position.y / bin.height()).to_f64().unwrap_or(0.0);
    let mut score = height_weight * height_ratio;

    if !bin.items().is_empty() {
        let norm = (bin.width() + bin.depth()).to_f64().unwrap_or(1.0);
        let mut total = 0.0;
        for placed in bin.items() {
            if let Some(p) = placed.position() {
                let distance = (position.x - p.x).abs() + (position.z - p.z).abs();
                total += distance.to_f64().unwrap_or(0.0);
            }
        }
        let average = total / bin.items().len() as f64;
        score += compact_weight * (average / norm.max(f64::EPSILON));
    }

    score
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use vanpack_core::{vec3, BinModel, ConstraintRegistry, BUILTIN_CONSTRAINTS};

    fn full_chain() -> ConstraintSet {
        ConstraintSet::new(
            ConstraintRegistry::with_builtins()
                .resolve(&BUILTIN_CONSTRAINTS)
                .unwrap(),
        )
    }

    fn no_cog_chain() -> ConstraintSet {
        ConstraintSet::new(
            ConstraintRegistry::with_builtins()
                .resolve(&["weight_within_limit", "fits_inside_bin", "no_overlap", "is_supported"])
                .unwrap(),
        )
    }

    fn van() -> Bin {
        Bin::new(
            0,
            BinModel::from_dims("van", dec!(2), dec!(2), dec!(2), dec!(100)),
        )
    }

    #[test]
    fn test_anchors_include_corners_center_and_mirrors() {
        let bin = van();
        let item = Item::new("A", dec!(0.5), dec!(0.5), dec!(0.5), dec!(1));
        let anchors = generate_anchors(&bin, &item);

        // Far corners and the center are clamped by the footprint, so every
        // anchor keeps the item inside the walls.
        assert!(anchors.contains(&(dec!(0), dec!(0))));
        assert!(anchors.contains(&(dec!(1.5), dec!(0))));
        assert!(anchors.contains(&(dec!(0), dec!(1.5))));
        assert!(anchors.contains(&(dec!(1.5), dec!(1.5))));
        assert!(anchors.contains(&(dec!(0.75), dec!(0.75))));
    }

    #[test]
    fn test_mirrored_anchor_reflects_the_item_center() {
        let mut bin = van();
        let chain = no_cog_chain();
        let mut seed = Item::new("S", dec!(0.5), dec!(0.5), dec!(0.5), dec!(1));
        seed.set_position(vec3(dec!(0.2), dec!(0), dec!(0.5)));
        bin.put_item(seed, &chain).unwrap();

        let item = Item::new("A", dec!(0.5), dec!(0.5), dec!(0.5), dec!(1));
        let anchors = generate_anchors(&bin, &item);

        // Right-of-seed sits at (0.7, 0.5); its X reflection is 1.5 - 0.7, so
        // the mirrored item center lands symmetrically across the mid-plane.
        assert!(anchors.contains(&(dec!(0.7), dec!(0.5))));
        assert!(anchors.contains(&(dec!(0.8), dec!(0.5))));
    }

    #[test]
    fn test_anchors_deduplicated() {
        let bin = van();
        let item = Item::new("A", dec!(0.5), dec!(0.5), dec!(0.5), dec!(1));
        let anchors = generate_anchors(&bin, &item);

        let unique: HashSet<_> = anchors.iter().copied().collect();
        assert_eq!(unique.len(), anchors.len());
    }

    #[test]
    fn test_neighbour_anchors_follow_placed_items() {
        let mut bin = van();
        let chain = no_cog_chain();
        let mut seed = Item::new("S", dec!(0.5), dec!(0.5), dec!(0.5), dec!(1));
        seed.set_position(vec3(dec!(0.5), dec!(0), dec!(0.5)));
        bin.put_item(seed, &chain).unwrap();

        let item = Item::new("A", dec!(0.5), dec!(0.5), dec!(0.5), dec!(1));
        let anchors = generate_anchors(&bin, &item);

        // right, behind, diagonal, left, front of the seed.
        assert!(anchors.contains(&(dec!(1.0), dec!(0.5))));
        assert!(anchors.contains(&(dec!(0.5), dec!(1.0))));
        assert!(anchors.contains(&(dec!(1.0), dec!(1.0))));
        assert!(anchors.contains(&(dec!(0.0), dec!(0.5))));
        assert!(anchors.contains(&(dec!(0.5), dec!(0.0))));
    }

    #[test]
    fn test_support_levels_floor_and_tops() {
        let mut bin = van();
        let chain = no_cog_chain();
        let mut seed = Item::new("S", dec!(1), dec!(0.5), dec!(1), dec!(1));
        seed.set_position(vec3(dec!(0), dec!(0), dec!(0)));
        bin.put_item(seed, &chain).unwrap();

        let item = Item::new("A", dec!(1), dec!(1), dec!(1), dec!(1));
        let levels = support_levels(&bin, &item, dec!(0), dec!(0));

        // Highest first, floor last.
        assert_eq!(levels, vec![dec!(0.5), dec!(0)]);

        // A footprint that misses the seed sees only the floor.
        let levels = support_levels(&bin, &item, dec!(1), dec!(1));
        assert_eq!(levels, vec![dec!(0)]);
    }

    #[test]
    fn test_support_levels_skip_surfaces_too_close_to_ceiling() {
        let mut bin = van();
        let chain = no_cog_chain();
        let mut seed = Item::new("S", dec!(1), dec!(1.5), dec!(1), dec!(1));
        seed.set_position(vec3(dec!(0), dec!(0), dec!(0)));
        bin.put_item(seed, &chain).unwrap();

        // A 1.0-high item cannot rest at y = 1.5 under a 2.0 ceiling.
        let item = Item::new("A", dec!(1), dec!(1), dec!(1), dec!(1));
        let levels = support_levels(&bin, &item, dec!(0), dec!(0));
        assert_eq!(levels, vec![dec!(0)]);
    }

    #[test]
    fn test_scoring_combines_height_and_distance() {
        use approx::assert_relative_eq;

        let mut bin = van();
        let mut seed = Item::new("S", dec!(0.5), dec!(0.5), dec!(0.5), dec!(1));
        seed.set_position(vec3(dec!(0), dec!(0), dec!(0)));
        bin.put_item(seed, &ConstraintSet::new(Vec::new())).unwrap();

        // Height 1/2, Manhattan distance 2 over a 4.0 footprint extent.
        let score = score_placement(&bin, vec3(dec!(1), dec!(1), dec!(1)), 0.3, 0.2);
        assert_relative_eq!(score, 0.3 * 0.5 + 0.2 * 0.5, epsilon = 1e-12);
    }

    #[test]
    fn test_scoring_prefers_floor() {
        let bin = van();
        let low = score_placement(&bin, vec3(dec!(0), dec!(0), dec!(0)), 0.3, 0.2);
        let high = score_placement(&bin, vec3(dec!(0), dec!(1), dec!(0)), 0.3, 0.2);
        assert!(low < high);
    }

    #[test]
    fn test_scoring_compactness_is_zero_for_empty_bin() {
        let bin = van();
        let score = score_placement(&bin, vec3(dec!(0.5), dec!(0), dec!(0.5)), 0.3, 0.2);
        assert_eq!(score, 0.0);
    }

    #[test]
    fn test_first_item_lands_away_from_the_corner_under_cog() {
        let mut bin = van();
        let item = Item::new("A", dec!(0.2), dec!(0.2), dec!(0.2), dec!(10));

        try_place(&mut bin, item, &full_chain(), 0.3, 0.2).unwrap();
        let placed = &bin.items()[0];
        let position = placed.position().unwrap();
        // The origin anchor violates the balance constraint; the clamped
        // floor-center anchor, which centers the footprint, survives.
        assert_eq!(position, vec3(dec!(0.9), dec!(0), dec!(0.9)));
    }

    #[test]
    fn test_unfittable_item_returned_unplaced() {
        let mut bin = van();
        let item = Item::new("A", dec!(3), dec!(3), dec!(3), dec!(1));
        let rejected = try_place(&mut bin, item, &full_chain(), 0.3, 0.2).unwrap_err();
        assert!(!rejected.is_placed());
        assert!(bin.items().is_empty());
    }

    #[test]
    fn test_successive_heavy_items_keep_balance() {
        let mut bin = van();
        let chain = full_chain();

        let a = Item::new("A", dec!(0.2), dec!(0.2), dec!(0.2), dec!(30));
        let b = Item::new("B", dec!(0.2), dec!(0.2), dec!(0.2), dec!(30));
        try_place(&mut bin, a, &chain, 0.3, 0.2).unwrap();
        try_place(&mut bin, b, &chain, 0.3, 0.2).unwrap();

        // The final center stays inside the outer tolerance envelope on both
        // balanced axes.
        let cog = bin.calculate_center_of_gravity();
        assert!((cog.x - dec!(1)).abs() <= dec!(0.4));
        assert!((cog.z - dec!(0.8)).abs() <= dec!(0.4));
    }
}
