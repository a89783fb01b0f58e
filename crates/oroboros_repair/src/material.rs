//! # Material Costs
//!
//! One material requirement (or refund) and the inventory view the repair
//! bench checks it against.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// A material item id and a quantity of at least one.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "RawMaterialCost")]
pub struct MaterialCost {
    item_id: String,
    quantity: u32,
}

impl MaterialCost {
    /// Creates a material cost. Quantities below one are floored to one.
    #[must_use]
    pub fn new(item_id: impl Into<String>, quantity: u32) -> Self {
        Self {
            item_id: item_id.into(),
            quantity: quantity.max(1),
        }
    }

    /// The material item id.
    #[inline]
    #[must_use]
    pub fn item_id(&self) -> &str {
        &self.item_id
    }

    /// Units required.
    #[inline]
    #[must_use]
    pub const fn quantity(&self) -> u32 {
        self.quantity
    }
}

/// Wire shape of [`MaterialCost`]; decoded values go through
/// [`MaterialCost::new`] so the quantity floor holds.
#[derive(Deserialize)]
struct RawMaterialCost {
    item_id: String,
    quantity: u32,
}

impl From<RawMaterialCost> for MaterialCost {
    fn from(raw: RawMaterialCost) -> Self {
        Self::new(raw.item_id, raw.quantity)
    }
}

/// Read-only view of how many units of a material a player holds.
///
/// Implemented by the inventory layer; the repair core never mutates it.
pub trait MaterialLedger {
    /// Total units of `item_id` available.
    fn count_of(&self, item_id: &str) -> u32;
}

/// Simple in-memory material counts.
#[derive(Clone, Debug, Default)]
pub struct MaterialStock {
    counts: HashMap<String, u32>,
}

impl MaterialStock {
    /// Creates an empty stock.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds units of a material.
    pub fn add(&mut self, item_id: impl Into<String>, quantity: u32) {
        let entry = self.counts.entry(item_id.into()).or_insert(0);
        *entry = entry.saturating_add(quantity);
    }

    /// Builder-style [`add`](Self::add).
    #[must_use]
    pub fn with(mut self, item_id: impl Into<String>, quantity: u32) -> Self {
        self.add(item_id, quantity);
        self
    }
}

impl MaterialLedger for MaterialStock {
    fn count_of(&self, item_id: &str) -> u32 {
        self.counts.get(item_id).copied().unwrap_or(0)
    }
}

impl MaterialLedger for HashMap<String, u32> {
    fn count_of(&self, item_id: &str) -> u32 {
        self.get(item_id).copied().unwrap_or(0)
    }
}
