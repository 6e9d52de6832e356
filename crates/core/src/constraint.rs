//! Named, weighted placement constraints.
//!
//! A constraint is a predicate over a bin and an item carrying a trial
//! position and orientation. Constraints are registered under string keys and
//! evaluated in ascending weight order, so cheap tests short-circuit the
//! expensive ones. The built-in chain ends with the center-of-gravity test,
//! the most expensive predicate.

use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::sync::Arc;

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::bin::Bin;
use crate::error::{Error, Result};
use crate::item::Item;

/// Key of the load-weight constraint.
pub const WEIGHT_WITHIN_LIMIT: &str = "weight_within_limit";
/// Key of the wall-containment constraint.
pub const FITS_INSIDE_BIN: &str = "fits_inside_bin";
/// Key of the pairwise overlap constraint.
pub const NO_OVERLAP: &str = "no_overlap";
/// Key of the base-support constraint.
pub const IS_SUPPORTED: &str = "is_supported";
/// Key of the progressive center-of-gravity constraint.
pub const MAINTAIN_CENTER_OF_GRAVITY: &str = "maintain_center_of_gravity";

/// All built-in constraint keys, in default evaluation order.
pub const BUILTIN_CONSTRAINTS: [&str; 5] = [
    WEIGHT_WITHIN_LIMIT,
    FITS_INSIDE_BIN,
    NO_OVERLAP,
    IS_SUPPORTED,
    MAINTAIN_CENTER_OF_GRAVITY,
];

const DEFAULT_MINIMUM_SUPPORT: Decimal = dec!(0.75);
const DEFAULT_TOL_X_PERCENT: Decimal = dec!(0.2);
const DEFAULT_TOL_Z_PERCENT: Decimal = dec!(0.2);
const DEFAULT_PROGRESSIVE_TIGHTENING: Decimal = dec!(0.7);

/// Recognized option names mapped to decimal values.
pub type ConstraintParams = BTreeMap<String, Decimal>;

type Predicate = Arc<dyn Fn(&Bin, &Item, &ConstraintParams) -> bool + Send + Sync>;

/// A named, weighted predicate over a bin and an item under trial.
#[derive(Clone)]
pub struct Constraint {
    name: String,
    weight: i32,
    params: ConstraintParams,
    predicate: Predicate,
}

impl Constraint {
    /// Creates a constraint from a name, an evaluation weight and a predicate.
    ///
    /// Higher weights are evaluated later; expensive predicates should declare
    /// higher weights so the cheap ones can short-circuit them.
    pub fn new(
        name: impl Into<String>,
        weight: i32,
        predicate: impl Fn(&Bin, &Item, &ConstraintParams) -> bool + Send + Sync + 'static,
    ) -> Self {
        Self {
            name: name.into(),
            weight,
            params: ConstraintParams::new(),
            predicate: Arc::new(predicate),
        }
    }

    /// Returns the registry key.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the evaluation weight.
    pub fn weight(&self) -> i32 {
        self.weight
    }

    /// Sets a named parameter, replacing any previous value.
    pub fn set_parameter(&mut self, name: impl Into<String>, value: Decimal) {
        self.params.insert(name.into(), value);
    }

    /// Builder form of [`set_parameter`](Self::set_parameter).
    pub fn with_parameter(mut self, name: impl Into<String>, value: Decimal) -> Self {
        self.set_parameter(name, value);
        self
    }

    /// Returns a parameter value, if set.
    pub fn parameter(&self, name: &str) -> Option<Decimal> {
        self.params.get(name).copied()
    }

    /// Evaluates the predicate against a bin and an item under trial.
    pub fn evaluate(&self, bin: &Bin, item: &Item) -> bool {
        (self.predicate)(bin, item, &self.params)
    }
}

impl Constraint {
    /// The built-in load-weight constraint.
    pub fn weight_within_limit() -> Self {
        Self::new(WEIGHT_WITHIN_LIMIT, 5, weight_within_limit)
    }

    /// The built-in wall-containment constraint.
    pub fn fits_inside_bin() -> Self {
        Self::new(FITS_INSIDE_BIN, 10, fits_inside_bin)
    }

    /// The built-in pairwise overlap constraint.
    pub fn no_overlap() -> Self {
        Self::new(NO_OVERLAP, 15, no_overlap)
    }

    /// The built-in base-support constraint.
    pub fn is_supported() -> Self {
        Self::new(IS_SUPPORTED, 20, is_supported)
    }

    /// The built-in progressive center-of-gravity constraint.
    pub fn maintain_center_of_gravity() -> Self {
        Self::new(MAINTAIN_CENTER_OF_GRAVITY, 25, maintain_center_of_gravity)
    }
}

/// The three structural constraints every placement needs: weight cap, wall
/// containment and pairwise overlap.
pub fn base_constraints() -> Vec<Constraint> {
    vec![
        Constraint::weight_within_limit(),
        Constraint::fits_inside_bin(),
        Constraint::no_overlap(),
    ]
}

impl fmt::Debug for Constraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Constraint")
            .field("name", &self.name)
            .field("weight", &self.weight)
            .field("params", &self.params)
            .finish()
    }
}

/// Lookup table of available constraints, keyed by name.
#[derive(Debug, Clone)]
pub struct ConstraintRegistry {
    constraints: HashMap<String, Constraint>,
}

impl ConstraintRegistry {
    /// Creates an empty registry.
    pub fn empty() -> Self {
        Self {
            constraints: HashMap::new(),
        }
    }

    /// Creates a registry holding the five built-in constraints.
    pub fn with_builtins() -> Self {
        let mut registry = Self::empty();
        registry.register(Constraint::weight_within_limit());
        registry.register(Constraint::fits_inside_bin());
        registry.register(Constraint::no_overlap());
        registry.register(Constraint::is_supported());
        registry.register(Constraint::maintain_center_of_gravity());
        registry
    }

    /// Registers a constraint under its name, replacing any previous entry.
    pub fn register(&mut self, constraint: Constraint) {
        self.constraints
            .insert(constraint.name().to_string(), constraint);
    }

    /// Looks up a constraint by key.
    pub fn get(&self, key: &str) -> Result<Constraint> {
        self.constraints
            .get(key)
            .cloned()
            .ok_or_else(|| Error::UnknownConstraint(key.to_string()))
    }

    /// Resolves an ordered list of keys into constraints.
    pub fn resolve(&self, keys: &[&str]) -> Result<Vec<Constraint>> {
        keys.iter().map(|key| self.get(key)).collect()
    }

    /// Returns true if a key is registered.
    pub fn contains(&self, key: &str) -> bool {
        self.constraints.contains_key(key)
    }
}

impl Default for ConstraintRegistry {
    fn default() -> Self {
        Self::with_builtins()
    }
}

/// An ordered chain of constraints, sorted ascending by weight.
#[derive(Debug, Clone, Default)]
pub struct ConstraintSet {
    chain: Vec<Constraint>,
}

impl ConstraintSet {
    /// Builds a chain from constraints, sorting by ascending weight.
    ///
    /// The sort is stable, so constraints with equal weights keep the order
    /// they were supplied in.
    pub fn new(mut constraints: Vec<Constraint>) -> Self {
        constraints.sort_by_key(Constraint::weight);
        Self { chain: constraints }
    }

    /// Returns the number of constraints in the chain.
    pub fn len(&self) -> usize {
        self.chain.len()
    }

    /// Returns true if the chain is empty.
    pub fn is_empty(&self) -> bool {
        self.chain.is_empty()
    }

    /// Returns the constraint names in evaluation order.
    pub fn ordered_names(&self) -> Vec<&str> {
        self.chain.iter().map(Constraint::name).collect()
    }

    /// Iterates the chain in evaluation order.
    pub fn iter(&self) -> impl Iterator<Item = &Constraint> {
        self.chain.iter()
    }

    /// Evaluates the chain, short-circuiting on the first failure.
    ///
    /// An item without a trial position fails immediately.
    pub fn evaluate(&self, bin: &Bin, item: &Item) -> bool {
        if !item.is_placed() {
            return false;
        }
        for constraint in &self.chain {
            if !constraint.evaluate(bin, item) {
                log::trace!(
                    "item '{}' rejected by '{}' in bin {}",
                    item.id(),
                    constraint.name(),
                    bin.id()
                );
                return false;
            }
        }
        true
    }
}

impl From<Vec<Constraint>> for ConstraintSet {
    fn from(constraints: Vec<Constraint>) -> Self {
        Self::new(constraints)
    }
}

fn weight_within_limit(bin: &Bin, item: &Item, _params: &ConstraintParams) -> bool {
    bin.weight() + item.weight() <= bin.max_weight()
}

fn fits_inside_bin(bin: &Bin, item: &Item, _params: &ConstraintParams) -> bool {
    let Some(volume) = item.volume_at() else {
        return false;
    };
    let size = bin.size();
    // Flush-to-wall placements are allowed on the far faces.
    (0..3).all(|axis| {
        volume.position[axis] >= Decimal::ZERO
            && volume.position[axis] + volume.size[axis] <= size[axis]
    })
}

fn no_overlap(bin: &Bin, item: &Item, _params: &ConstraintParams) -> bool {
    let Some(volume) = item.volume_at() else {
        return false;
    };
    bin.items()
        .iter()
        .filter_map(Item::volume_at)
        .all(|placed| !placed.intersects(&volume))
}

/// Base-support test.
///
/// Floor placements are always supported. Anything higher must rest on the top
/// faces of placed items whose top Y equals the trial Y exactly (quantization
/// makes the equality reliable), with the combined projected contact area
/// covering at least `minimum_support` of the item base.
fn is_supported(bin: &Bin, item: &Item, params: &ConstraintParams) -> bool {
    let Some(volume) = item.volume_at() else {
        return false;
    };
    if volume.position.y == Decimal::ZERO {
        return true;
    }

    let minimum_support = params
        .get("minimum_support")
        .copied()
        .unwrap_or(DEFAULT_MINIMUM_SUPPORT);
    let base_area = item.width() * item.depth();
    if base_area <= Decimal::ZERO {
        return false;
    }

    let mut contact_area = Decimal::ZERO;
    for placed in bin.items() {
        let Some(placed_volume) = placed.volume_at() else {
            continue;
        };
        if placed_volume.position.y + placed_volume.size.y == volume.position.y {
            contact_area += placed_volume.footprint_overlap(&volume);
        }
    }

    contact_area >= minimum_support * base_area
}

/// Progressive center-of-gravity test.
///
/// The target center sits at half the width and 40% of the depth, slightly
/// biased toward the rear of the cargo area. Tolerances shrink linearly with
/// the load ratio, and once the current center already drifted past half of a
/// tolerance, placements that widen that drift are rejected outright.
fn maintain_center_of_gravity(bin: &Bin, item: &Item, params: &ConstraintParams) -> bool {
    let Some(center) = item.center() else {
        return false;
    };

    let tol_x_percent = params
        .get("tol_x_percent")
        .copied()
        .unwrap_or(DEFAULT_TOL_X_PERCENT);
    let tol_z_percent = params
        .get("tol_z_percent")
        .copied()
        .unwrap_or(DEFAULT_TOL_Z_PERCENT);
    let tightening = params
        .get("progressive_tightening")
        .copied()
        .unwrap_or(DEFAULT_PROGRESSIVE_TIGHTENING);

    let total_weight = bin.weight() + item.weight();
    if bin.max_weight() <= Decimal::ZERO || total_weight <= Decimal::ZERO {
        return false;
    }

    let target_x = bin.width() / dec!(2);
    let target_z = bin.depth() * dec!(0.4);

    let load_ratio = (total_weight / bin.max_weight()).clamp(Decimal::ZERO, Decimal::ONE);
    let factor = Decimal::ONE - tightening * load_ratio;
    let tol_x = tol_x_percent * bin.width() * factor;
    let tol_z = tol_z_percent * bin.depth() * factor;

    let current = bin.calculate_center_of_gravity();
    let hypothetical_x = (current.x * bin.weight() + center.x * item.weight()) / total_weight;
    let hypothetical_z = (current.z * bin.weight() + center.z * item.weight()) / total_weight;

    let current_dev_x = (current.x - target_x).abs();
    let current_dev_z = (current.z - target_z).abs();
    let dev_x = (hypothetical_x - target_x).abs();
    let dev_z = (hypothetical_z - target_z).abs();

    // Corrective bias: a drifted axis only accepts placements that pull the
    // center back toward its target. An empty bin has no load to correct, so
    // the bias starts with the second item.
    let two = dec!(2);
    if !bin.weight().is_zero() {
        if current_dev_x > tol_x / two && dev_x > current_dev_x {
            return false;
        }
        if current_dev_z > tol_z / two && dev_z > current_dev_z {
            return false;
        }
    }

    dev_x <= tol_x && dev_z <= tol_z
}
