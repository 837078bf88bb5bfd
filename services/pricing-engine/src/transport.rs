//! Transport seam between the dispatcher and a part-info provider.

use serde::Serialize;
use std::collections::BTreeMap;
use std::future::Future;

use bomprice_models::{PartResult, Query, QueryEntry};
use bomprice_utils::{PricingError, PricingResult};

/// Bidirectional internal-id <-> provider-vendor-name table.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DistributorMap {
    to_provider: BTreeMap<String, String>,
    to_internal: BTreeMap<String, String>,
}

impl DistributorMap {
    /// Builds the table, rejecting ids or vendor names that appear twice.
    pub fn new<I, K, V>(pairs: I) -> PricingResult<Self>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let mut map = Self::default();
        for (internal, vendor) in pairs {
            let (internal, vendor) = (internal.into(), vendor.into());
            if map.to_provider.contains_key(&internal) || map.to_internal.contains_key(&vendor) {
                return Err(PricingError::configuration(format!(
                    "distributor mapping {} <-> {} is not one-to-one",
                    internal, vendor
                )));
            }
            map.to_provider.insert(internal.clone(), vendor.clone());
            map.to_internal.insert(vendor, internal);
        }
        Ok(map)
    }

    pub fn to_provider(&self, distributor: &str) -> Option<&str> {
        self.to_provider.get(distributor).map(String::as_str)
    }

    pub fn to_internal(&self, vendor: &str) -> Option<&str> {
        self.to_internal.get(vendor).map(String::as_str)
    }

    /// Like [`Self::to_provider`], failing for unmapped distributors.
    pub fn require_provider(&self, distributor: &str) -> PricingResult<&str> {
        self.to_provider(distributor).ok_or_else(|| {
            PricingError::configuration(format!(
                "distributor {} has no mapping for the pricing provider",
                distributor
            ))
        })
    }
}

/// A query in the provider's wire vocabulary.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum WireQuery {
    Sku { vendor: String, part: String },
    Mpn { manufacturer: String, part: String },
}

impl WireQuery {
    /// Translates a query into provider terms. Every whitespace character is
    /// dropped from the values; the provider treats it as insignificant.
    pub fn from_query(query: &Query, map: &DistributorMap) -> PricingResult<Self> {
        Ok(match query {
            Query::Sku { distributor, part } => Self::Sku {
                vendor: strip_whitespace(map.require_provider(distributor)?),
                part: strip_whitespace(part),
            },
            Query::Mpn { manufacturer, part } => Self::Mpn {
                manufacturer: strip_whitespace(manufacturer),
                part: strip_whitespace(part),
            },
        })
    }
}

#[derive(Serialize)]
struct Variables<'a> {
    input: &'a [WireQuery],
}

/// Everything one network request carries for one batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchRequest {
    /// Provider vendor names, sorted and deduplicated.
    pub distributors: Vec<String>,
    pub queries: Vec<WireQuery>,
}

impl BatchRequest {
    pub fn new(
        batch: &[QueryEntry],
        distributors: &[String],
        map: &DistributorMap,
    ) -> PricingResult<Self> {
        let mut vendors = distributors
            .iter()
            .map(|d| map.require_provider(d).map(str::to_string))
            .collect::<PricingResult<Vec<_>>>()?;
        vendors.sort();
        vendors.dedup();

        let queries = batch
            .iter()
            .map(|entry| WireQuery::from_query(&entry.query, map))
            .collect::<PricingResult<Vec<_>>>()?;

        Ok(Self {
            distributors: vendors,
            queries,
        })
    }

    pub fn len(&self) -> usize {
        self.queries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queries.is_empty()
    }

    /// `{"input":[...]}`, compact.
    pub fn variables(&self) -> PricingResult<String> {
        Ok(serde_json::to_string(&Variables {
            input: &self.queries,
        })?)
    }
}

pub fn strip_whitespace(text: &str) -> String {
    text.chars().filter(|c| !c.is_whitespace()).collect()
}

/// A provider able to answer a batch of part queries.
pub trait PartInfoTransport: Send + Sync {
    /// Backend name, as registered in the distributor registry.
    fn name(&self) -> &str;

    fn distributor_map(&self) -> &DistributorMap;

    /// Sends one batch. The returned slots are positionally aligned with
    /// `request.queries`; `None` means no data for that query.
    fn match_parts(
        &self,
        request: &BatchRequest,
    ) -> impl Future<Output = PricingResult<Vec<Option<PartResult>>>> + Send;
}
