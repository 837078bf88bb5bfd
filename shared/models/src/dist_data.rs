//! Canonical per-distributor pricing record.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Break quantity -> unit price.
pub type PriceTiers = BTreeMap<u64, f64>;

/// Gap between the two lowest price breaks of an offer.
///
/// `Infinite` sorts after every finite gap, so an offer with a single tier
/// never beats one that exposes a real increment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QtyIncrement {
    Finite(u64),
    Infinite,
}

impl Default for QtyIncrement {
    fn default() -> Self {
        Self::Infinite
    }
}

impl QtyIncrement {
    /// Increment of a single tier table: the two lowest break quantities.
    pub fn from_tiers(tiers: &PriceTiers) -> Self {
        let mut breaks = tiers.keys();
        match (breaks.next(), breaks.next()) {
            (Some(lowest), Some(next)) => Self::Finite(next - lowest),
            _ => Self::Infinite,
        }
    }
}

/// Merged pricing and stock for one (part, distributor) pair.
///
/// Created lazily on the first accepted offer and only ever updated in place.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct DistData {
    pub currency: Option<String>,
    #[serde(default)]
    pub price_tiers: PriceTiers,
    /// Chosen vendor SKU.
    pub part_num: Option<String>,
    pub url: Option<String>,
    pub moq: Option<u64>,
    pub qty_avail: Option<u64>,
    #[serde(default)]
    pub qty_increment: QtyIncrement,
}

impl DistData {
    /// Merges tiers in; existing break quantities are overwritten.
    pub fn merge_price_tiers(&mut self, tiers: &PriceTiers) {
        self.price_tiers
            .extend(tiers.iter().map(|(qty, price)| (*qty, *price)));
    }

    /// Keeps the larger known availability.
    pub fn observe_stock(&mut self, in_stock: Option<u64>) {
        match (self.qty_avail, in_stock) {
            (None, _) => self.qty_avail = in_stock,
            (Some(current), Some(offered)) if offered > current => self.qty_avail = Some(offered),
            _ => {}
        }
    }
}
