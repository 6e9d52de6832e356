//! Bin models and loadable bin instances.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::constraint::ConstraintSet;
use crate::error::{Error, Result};
use crate::item::Item;
use crate::scalar::{quantize, quantize_vector};
use crate::space::Vector3;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// An immutable template describing a cargo area: name, size and weight cap.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct BinModel {
    name: String,
    size: Vector3,
    max_weight: Decimal,
}

impl BinModel {
    /// Creates a new bin model from a size vector.
    pub fn new(name: impl Into<String>, size: Vector3, max_weight: Decimal) -> Self {
        Self {
            name: name.into(),
            size: quantize_vector(&size),
            max_weight: quantize(max_weight),
        }
    }

    /// Creates a new bin model from a (width, height, depth) triple.
    pub fn from_dims(
        name: impl Into<String>,
        width: Decimal,
        height: Decimal,
        depth: Decimal,
        max_weight: Decimal,
    ) -> Self {
        Self::new(name, Vector3::new(width, height, depth), max_weight)
    }

    /// Returns the model name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the size as (width, height, depth).
    pub fn size(&self) -> Vector3 {
        self.size
    }

    /// Returns the width (X extent).
    pub fn width(&self) -> Decimal {
        self.size.x
    }

    /// Returns the height (Y extent).
    pub fn height(&self) -> Decimal {
        self.size.y
    }

    /// Returns the depth (Z extent).
    pub fn depth(&self) -> Decimal {
        self.size.z
    }

    /// Returns the maximum loadable weight.
    pub fn max_weight(&self) -> Decimal {
        self.max_weight
    }

    /// Returns the internal volume.
    pub fn volume(&self) -> Decimal {
        self.size.x * self.size.y * self.size.z
    }

    /// Re-quantizes stored values after a precision change.
    pub fn apply_precision(&mut self) {
        self.size = quantize_vector(&self.size);
        self.max_weight = quantize(self.max_weight);
    }

    /// Validates dimensions and weight cap.
    pub fn validate(&self) -> Result<()> {
        if self.size.x <= Decimal::ZERO || self.size.y <= Decimal::ZERO || self.size.z <= Decimal::ZERO
        {
            return Err(Error::InvalidBin(format!(
                "all dimensions for '{}' must be positive",
                self.name
            )));
        }
        if self.max_weight <= Decimal::ZERO {
            return Err(Error::InvalidBin(format!(
                "maximum weight for '{}' must be positive",
                self.name
            )));
        }
        Ok(())
    }
}

/// A loadable instance of a [`BinModel`].
///
/// Items are kept in insertion order; the greedy placer derives its pivot
/// candidates from that order, so it is observable behaviour.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Bin {
    id: usize,
    model: BinModel,
    items: Vec<Item>,
    weight: Decimal,
}

impl Bin {
    /// Creates an empty bin bound to a model.
    pub fn new(id: usize, model: BinModel) -> Self {
        Self {
            id,
            model,
            items: Vec::new(),
            weight: Decimal::ZERO,
        }
    }

    /// Returns the bin identifier.
    pub fn id(&self) -> usize {
        self.id
    }

    /// Returns the backing model.
    pub fn model(&self) -> &BinModel {
        &self.model
    }

    /// Returns the placed items in insertion order.
    pub fn items(&self) -> &[Item] {
        &self.items
    }

    /// Returns the total weight of the placed items.
    pub fn weight(&self) -> Decimal {
        self.weight
    }

    /// Returns the size as (width, height, depth).
    pub fn size(&self) -> Vector3 {
        self.model.size()
    }

    /// Returns the width (X extent).
    pub fn width(&self) -> Decimal {
        self.model.width()
    }

    /// Returns the height (Y extent).
    pub fn height(&self) -> Decimal {
        self.model.height()
    }

    /// Returns the depth (Z extent).
    pub fn depth(&self) -> Decimal {
        self.model.depth()
    }

    /// Returns the maximum loadable weight.
    pub fn max_weight(&self) -> Decimal {
        self.model.max_weight()
    }

    /// Returns the summed volume of the placed items.
    pub fn loaded_volume(&self) -> Decimal {
        self.items.iter().map(Item::volume).sum()
    }

    /// Attempts to insert an item at the position and orientation it carries.
    ///
    /// The constraint chain is evaluated in ascending weight order. On success
    /// the item is stored and the bin weight updated. On failure the item is
    /// handed back with position and dimensions exactly as they were at entry.
    pub fn put_item(&mut self, item: Item, constraints: &ConstraintSet) -> std::result::Result<(), Item> {
        if !constraints.evaluate(self, &item) {
            return Err(item);
        }
        self.weight += item.weight();
        self.items.push(item);
        Ok(())
    }

    /// Removes the first item with the given id, returning it.
    pub fn remove_item(&mut self, id: &str) -> Option<Item> {
        let index = self.items.iter().position(|item| item.id() == id)?;
        let item = self.items.remove(index);
        self.weight -= item.weight();
        Some(item)
    }

    /// Returns the weight-weighted mean of the item centers.
    ///
    /// An empty bin reports its own geometric center.
    pub fn calculate_center_of_gravity(&self) -> Vector3 {
        let two = dec!(2);
        if self.weight.is_zero() {
            let size = self.model.size();
            return Vector3::new(size.x / two, size.y / two, size.z / two);
        }

        let mut moment = Vector3::new(Decimal::ZERO, Decimal::ZERO, Decimal::ZERO);
        for item in &self.items {
            if let Some(center) = item.center() {
                moment.x += center.x * item.weight();
                moment.y += center.y * item.weight();
                moment.z += center.z * item.weight();
            }
        }

        Vector3::new(
            moment.x / self.weight,
            moment.y / self.weight,
            moment.z / self.weight,
        )
    }
}
