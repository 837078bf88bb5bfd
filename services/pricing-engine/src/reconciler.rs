//! Offer Reconciler
//!
//! Folds the offers of one query result into the part's per-distributor
//! [`DistData`] accumulators.
//!
//! Price tiers from every offer of a distributor are merged into one table
//! in a single currency. When offers disagree on currency, the requested
//! currency wins, then the default, then the lowest code; tiers in a losing
//! currency are left out. Availability keeps the largest quantity seen,
//! and exactly one canonical SKU/URL/MOQ is kept per distributor. The
//! canonical selection is the minimum over
//! `(quantity increment, MOQ, SKU, URL)`: cut-tape style packaging with a
//! small increment beats reels, then the smaller MOQ wins, and the SKU and
//! URL only break exact ties. Offers whose SKU matches the distributor's
//! ignore pattern still feed prices and stock but are never selected.

use tracing::{info, warn};

use bomprice_models::{
    price_tiers, DistData, DistributorOffer, Part, PartResult, QtyIncrement, QueryEntry,
    DEFAULT_LIFECYCLE,
};

use crate::currency::{currency_rank, select_currency};
use crate::registry::DistributorRegistry;
use crate::transport::DistributorMap;

/// What happened to one offer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OfferOutcome {
    /// Vendor unknown or not wanted by this query.
    Unwanted,
    /// No non-empty price list in any currency.
    NoPrice,
    /// Prices and stock merged; `selected` if it became the canonical SKU.
    Merged { selected: bool },
    /// Priced in a less preferred currency than the accumulator: stock and
    /// SKU selection applied, tiers left out.
    OtherCurrency { selected: bool },
}

impl OfferOutcome {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Unwanted => "unwanted",
            Self::NoPrice => "no_price",
            Self::Merged { .. } => "merged",
            Self::OtherCurrency { .. } => "other_currency",
        }
    }
}

type SelectionKey<'a> = (QtyIncrement, u64, &'a str, &'a str);

fn selection_key<'a>(
    increment: QtyIncrement,
    moq: Option<u64>,
    sku: &'a str,
    url: &'a str,
) -> SelectionKey<'a> {
    (increment, moq.unwrap_or(u64::MAX), sku, url)
}

/// True when the candidate should replace the accumulator's selection.
fn prefers(candidate: SelectionKey<'_>, dd: &DistData) -> bool {
    let Some(current_sku) = dd.part_num.as_deref() else {
        return true;
    };
    let current = selection_key(
        dd.qty_increment,
        dd.moq,
        current_sku,
        dd.url.as_deref().unwrap_or_default(),
    );
    candidate < current
}

pub struct OfferReconciler<'a> {
    registry: &'a DistributorRegistry,
    map: &'a DistributorMap,
    currency: &'a str,
    default_currency: &'a str,
}

impl<'a> OfferReconciler<'a> {
    pub fn new(
        registry: &'a DistributorRegistry,
        map: &'a DistributorMap,
        currency: &'a str,
        default_currency: &'a str,
    ) -> Self {
        Self {
            registry,
            map,
            currency,
            default_currency,
        }
    }

    /// Reconciles one result slot of a batch into `part`.
    pub fn reconcile(
        &self,
        part: &mut Part,
        entry: &QueryEntry,
        result: Option<&PartResult>,
    ) -> Vec<OfferOutcome> {
        let Some(result) = result else {
            info!(
                refs = %part.refs_label(),
                query = %entry.query,
                "No information found for part"
            );
            return Vec::new();
        };

        record_part_details(part, result);

        result
            .offers
            .iter()
            .map(|offer| self.reconcile_offer(part, entry, offer))
            .collect()
    }

    pub fn reconcile_offer(
        &self,
        part: &mut Part,
        entry: &QueryEntry,
        offer: &DistributorOffer,
    ) -> OfferOutcome {
        let Some(distributor) = self.map.to_internal(&offer.sku.vendor) else {
            return OfferOutcome::Unwanted;
        };
        if !entry.wants(distributor) {
            return OfferOutcome::Unwanted;
        }

        let selection = select_currency(&offer.prices, self.currency, self.default_currency);
        let Some(selection) = selection else {
            warn!(
                refs = %part.refs_label(),
                query = %entry.query,
                distributor,
                sku = %offer.sku.part,
                "No price information found for part"
            );
            return OfferOutcome::NoPrice;
        };

        let tiers = price_tiers(selection.prices);
        let increment = QtyIncrement::from_tiers(&tiers);
        let ignored = self.registry.is_ignored_stock_code(distributor, &offer.sku.part);
        let part_id = part.id;

        let dd = part.dist_data_mut(distributor);
        let tiers_kept = match dd.currency.as_deref() {
            None => true,
            Some(current) if current == selection.currency => true,
            Some(current) => {
                let switch = self.rank(selection.currency) < self.rank(current);
                warn!(
                    part_id = %part_id,
                    distributor,
                    previous = current,
                    currency = selection.currency,
                    switch,
                    "Offers for one distributor use different currencies"
                );
                if switch {
                    dd.price_tiers.clear();
                }
                switch
            }
        };
        if tiers_kept {
            dd.currency = Some(selection.currency.to_string());
            dd.merge_price_tiers(&tiers);
        }
        dd.observe_stock(offer.in_stock_quantity);

        let url = offer.product_url.as_deref().unwrap_or_default();
        let key = selection_key(increment, offer.moq, &offer.sku.part, url);
        let selected = !ignored && prefers(key, dd);
        if selected {
            dd.part_num = Some(offer.sku.part.clone());
            dd.url = offer.product_url.clone();
            dd.moq = offer.moq;
            dd.qty_increment = increment;
        }

        if tiers_kept {
            OfferOutcome::Merged { selected }
        } else {
            OfferOutcome::OtherCurrency { selected }
        }
    }

    fn rank<'c>(&self, currency: &'c str) -> (u8, &'c str) {
        currency_rank(currency, self.currency, self.default_currency)
    }
}

fn record_part_details(part: &mut Part, result: &PartResult) {
    if let Some(datasheet) = result.datasheet.as_deref().filter(|d| !d.is_empty()) {
        part.datasheet = Some(datasheet.to_string());
    }

    match result.lifecycle() {
        Some(lifecycle) => part.lifecycle = Some(lifecycle),
        None if part.lifecycle.is_none() => part.lifecycle = Some(DEFAULT_LIFECYCLE.to_string()),
        None => {}
    }

    part.update_specs(
        result
            .specs
            .iter()
            .filter_map(|s| s.value.as_deref().map(|v| (s.key.as_str(), v))),
    );
}
