//! Pack orchestration: item ordering, fleet iteration, strategy dispatch.

use std::collections::VecDeque;
use std::str::FromStr;

use rust_decimal::Decimal;

use vanpack_core::{
    base_constraints, set_decimal_precision, Bin, BinModel, Constraint, ConstraintSet, Error,
    Item, Result, DEFAULT_DECIMAL_PRECISION,
};

use crate::multi_anchor::{DEFAULT_COMPACT_WEIGHT, DEFAULT_HEIGHT_WEIGHT};
use crate::{greedy, multi_anchor};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Placement strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Strategy {
    /// Left-Bottom-Back: first feasible pivot wins (fast, corner-biased).
    #[default]
    Greedy,
    /// Multi-anchor: best-scored candidate over many anchors (balanced).
    MultiAnchor,
}

impl Strategy {
    /// Returns the strategy literal.
    pub fn name(&self) -> &'static str {
        match self {
            Strategy::Greedy => "greedy",
            Strategy::MultiAnchor => "multi_anchor",
        }
    }
}

impl FromStr for Strategy {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "greedy" => Ok(Strategy::Greedy),
            "multi_anchor" => Ok(Strategy::MultiAnchor),
            other => Err(Error::UnknownStrategy(other.to_string())),
        }
    }
}

/// Options for a single pack run.
#[derive(Debug, Clone)]
pub struct PackConfig {
    /// Constraints every placement must satisfy.
    pub constraints: Vec<Constraint>,

    /// Sort items (and the fleet) by descending volume.
    pub bigger_first: bool,

    /// Sort items by descending priority before volume.
    pub follow_priority: bool,

    /// Fractional digits for the process-wide decimal precision.
    pub number_of_decimals: u32,

    /// Placement strategy to dispatch to.
    pub strategy: Strategy,

    /// Multi-anchor scoring weight for placement height.
    pub height_weight: f64,

    /// Multi-anchor scoring weight for compactness.
    pub compact_weight: f64,
}

impl Default for PackConfig {
    fn default() -> Self {
        Self {
            constraints: base_constraints(),
            bigger_first: true,
            follow_priority: true,
            number_of_decimals: DEFAULT_DECIMAL_PRECISION,
            strategy: Strategy::default(),
            height_weight: DEFAULT_HEIGHT_WEIGHT,
            compact_weight: DEFAULT_COMPACT_WEIGHT,
        }
    }
}

impl PackConfig {
    /// Creates a configuration with default values and the structural
    /// constraints (weight cap, wall containment, overlap).
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the constraints to enforce.
    pub fn with_constraints(mut self, constraints: Vec<Constraint>) -> Self {
        self.constraints = constraints;
        self
    }

    /// Sets the placement strategy.
    pub fn with_strategy(mut self, strategy: Strategy) -> Self {
        self.strategy = strategy;
        self
    }

    /// Enables or disables volume-descending ordering.
    pub fn with_bigger_first(mut self, enabled: bool) -> Self {
        self.bigger_first = enabled;
        self
    }

    /// Enables or disables priority ordering.
    pub fn with_follow_priority(mut self, enabled: bool) -> Self {
        self.follow_priority = enabled;
        self
    }

    /// Sets the decimal precision for the run.
    pub fn with_decimals(mut self, digits: u32) -> Self {
        self.number_of_decimals = digits;
        self
    }

    /// Sets the multi-anchor scoring weights.
    pub fn with_scoring_weights(mut self, height_weight: f64, compact_weight: f64) -> Self {
        self.height_weight = height_weight;
        self.compact_weight = compact_weight;
        self
    }
}

/// Aggregate figures for a finished pack run.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PackStatistics {
    /// Summed volume of every placed item.
    pub loaded_volume: Decimal,
    /// Summed weight of every loaded bin.
    pub loaded_weight: Decimal,
    /// Mean of the per-bin volume fill ratios; zero when nothing was loaded.
    pub average_volume: Decimal,
}

/// Holds a batch of items and a fleet of bin models, and runs the packing.
#[derive(Debug, Clone, Default)]
pub struct Packer {
    default_bin: Option<BinModel>,
    fleet: VecDeque<BinModel>,
    items: Vec<Item>,
    current_configuration: Vec<Bin>,
    unfitted_items: Vec<Item>,
}

impl Packer {
    /// Creates an empty packer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the fallback model used once the fleet is exhausted.
    pub fn set_default_bin(&mut self, model: BinModel) {
        self.default_bin = Some(model);
    }

    /// Appends one bin model to the fleet.
    pub fn add_bin(&mut self, model: BinModel) {
        self.fleet.push_back(model);
    }

    /// Appends several bin models to the fleet.
    pub fn add_fleet(&mut self, fleet: impl IntoIterator<Item = BinModel>) {
        self.fleet.extend(fleet);
    }

    /// Appends a batch of items to pack.
    pub fn add_batch(&mut self, batch: impl IntoIterator<Item = Item>) {
        self.items.extend(batch);
    }

    /// Returns the bins produced by the last pack run.
    pub fn current_configuration(&self) -> &[Bin] {
        &self.current_configuration
    }

    /// Returns the items no bin could take.
    pub fn unfitted_items(&self) -> &[Item] {
        &self.unfitted_items
    }

    /// Returns the items still waiting to be packed.
    pub fn items(&self) -> &[Item] {
        &self.items
    }

    /// Drops the result of the last pack run.
    pub fn clear_current_configuration(&mut self) {
        self.current_configuration.clear();
        self.unfitted_items.clear();
    }

    /// Runs the packing over the current batch and fleet.
    ///
    /// Bins are opened on demand: the fleet is consumed front to back, then
    /// the default model backs every further bin. A bin that stays empty
    /// after a full pass closes the run; whatever is left becomes unfitted.
    pub fn pack(&mut self, config: &PackConfig) -> Result<()> {
        if self.fleet.is_empty() && self.default_bin.is_none() {
            return Err(Error::ConfigError(
                "no fleet and no default bin to pack into".to_string(),
            ));
        }

        set_decimal_precision(config.number_of_decimals);
        let constraints = ConstraintSet::new(config.constraints.clone());
        log::debug!(
            "pack run: strategy={}, constraint order={:?}",
            config.strategy.name(),
            constraints.ordered_names()
        );

        // Validate everything up front so a configuration error leaves the
        // packer untouched.
        for model in self.fleet.iter().chain(self.default_bin.as_ref()) {
            model.validate()?;
        }
        for item in &self.items {
            item.validate()?;
        }

        for model in self.fleet.iter_mut().chain(self.default_bin.as_mut()) {
            model.apply_precision();
        }
        let mut items = std::mem::take(&mut self.items);
        for item in &mut items {
            item.apply_precision();
            item.reset();
        }

        if config.bigger_first {
            let mut fleet: Vec<BinModel> = self.fleet.drain(..).collect();
            fleet.sort_by(|a, b| b.volume().cmp(&a.volume()));
            self.fleet = fleet.into();
        }
        sort_items(&mut items, config);

        self.current_configuration.clear();
        self.unfitted_items.clear();

        let mut remaining = items;
        loop {
            if remaining.is_empty() {
                break;
            }

            let model = match self.fleet.pop_front().or_else(|| self.default_bin.clone()) {
                Some(model) => model,
                None => {
                    self.unfitted_items.append(&mut remaining);
                    break;
                }
            };

            let mut bin = Bin::new(self.current_configuration.len(), model);
            let mut unfitted = Vec::new();
            for item in remaining.drain(..) {
                let outcome = match config.strategy {
                    Strategy::Greedy => greedy::try_place(&mut bin, item, &constraints),
                    Strategy::MultiAnchor => multi_anchor::try_place(
                        &mut bin,
                        item,
                        &constraints,
                        config.height_weight,
                        config.compact_weight,
                    ),
                };
                if let Err(rejected) = outcome {
                    unfitted.push(rejected);
                }
            }

            if bin.items().is_empty() {
                // Nothing fit a fresh bin; more bins will not help.
                self.unfitted_items.append(&mut unfitted);
                break;
            }

            log::debug!(
                "bin {} closed: {} items, weight {}/{}",
                bin.id(),
                bin.items().len(),
                bin.weight(),
                bin.max_weight()
            );
            self.current_configuration.push(bin);
            remaining = unfitted;
        }

        Ok(())
    }

    /// Trial-packs the current batch greedily into one fresh bin per model.
    ///
    /// Useful to compare candidate fleet models before committing to a pack
    /// run; the packer state is left untouched.
    pub fn pack_test_on_models(
        &self,
        models: &[BinModel],
        constraints: &ConstraintSet,
    ) -> Vec<Bin> {
        models
            .iter()
            .enumerate()
            .map(|(index, model)| {
                let mut bin = Bin::new(index, model.clone());
                for item in &self.items {
                    let mut candidate = item.clone();
                    candidate.reset();
                    let _ = greedy::try_place(&mut bin, candidate, constraints);
                }
                bin
            })
            .collect()
    }

    /// Computes aggregate statistics over the current configuration.
    pub fn calculate_statistics(&self) -> PackStatistics {
        let mut loaded_volume = Decimal::ZERO;
        let mut loaded_weight = Decimal::ZERO;
        let mut fill_sum = Decimal::ZERO;
        let mut loaded_bins = 0u32;

        for bin in &self.current_configuration {
            let bin_volume = bin.loaded_volume();
            loaded_volume += bin_volume;
            loaded_weight += bin.weight();

            let capacity = bin.model().volume();
            if capacity > Decimal::ZERO {
                fill_sum += bin_volume / capacity;
                loaded_bins += 1;
            }
        }

        let average_volume = if loaded_bins > 0 {
            fill_sum / Decimal::from(loaded_bins)
        } else {
            Decimal::ZERO
        };

        PackStatistics {
            loaded_volume,
            loaded_weight,
            average_volume,
        }
    }
}

fn sort_items(items: &mut [Item], config: &PackConfig) {
    match (config.follow_priority, config.bigger_first) {
        (true, true) => items.sort_by(|a, b| {
            b.priority()
                .cmp(&a.priority())
                .then_with(|| b.volume().cmp(&a.volume()))
        }),
        (true, false) => items.sort_by(|a, b| b.priority().cmp(&a.priority())),
        (false, true) => items.sort_by(|a, b| b.volume().cmp(&a.volume())),
        (false, false) => {}
    }
}
