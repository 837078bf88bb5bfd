//! Provider-shaped match results.
//!
//! These mirror what a batched part-info API returns for one query slot:
//! the matched part plus zero or more distributor offers. They are decoded
//! at the transport boundary and consumed by reconciliation.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::dist_data::PriceTiers;

/// Spec key carrying the lifecycle status of a part.
pub const SPEC_LIFECYCLE: &str = "lifecycle_status";

/// One price break as sent by the provider: `[quantity, unit_price]`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct PriceBreak(pub u64, pub f64);

impl PriceBreak {
    pub fn quantity(&self) -> u64 {
        self.0
    }

    pub fn unit_price(&self) -> f64 {
        self.1
    }
}

/// Converts a provider price list into a tier table. Later duplicates win.
pub fn price_tiers(breaks: &[PriceBreak]) -> PriceTiers {
    breaks.iter().map(|b| (b.quantity(), b.unit_price())).collect()
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct SkuRef {
    #[serde(default)]
    pub vendor: String,
    #[serde(default)]
    pub part: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct MpnRef {
    #[serde(default)]
    pub manufacturer: String,
    #[serde(default)]
    pub part: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SpecEntry {
    pub key: String,
    pub value: Option<String>,
}

/// One distributor's quote for a part.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct DistributorOffer {
    pub product_url: Option<String>,
    #[serde(default)]
    pub sku: SkuRef,
    pub description: Option<String>,
    pub moq: Option<u64>,
    pub in_stock_quantity: Option<u64>,
    /// Currency code -> price list. The provider sends `null` for
    /// currencies it has no prices in.
    #[serde(default)]
    pub prices: BTreeMap<String, Option<Vec<PriceBreak>>>,
}

/// Result slot for one query of a batch.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct PartResult {
    pub mpn: Option<MpnRef>,
    pub datasheet: Option<String>,
    pub description: Option<String>,
    #[serde(default)]
    pub specs: Vec<SpecEntry>,
    #[serde(default)]
    pub offers: Vec<DistributorOffer>,
}

impl PartResult {
    /// Value of a spec entry, if present and not null.
    pub fn spec(&self, key: &str) -> Option<&str> {
        self.specs
            .iter()
            .find(|s| s.key == key)
            .and_then(|s| s.value.as_deref())
    }

    /// Lower-cased lifecycle status.
    pub fn lifecycle(&self) -> Option<String> {
        self.spec(SPEC_LIFECYCLE).map(str::to_lowercase)
    }
}
