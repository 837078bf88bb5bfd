//! Provider-agnostic part queries.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A request for one part, addressed by distributor SKU or by manufacturer P/N.
///
/// The SKU variant names the internal distributor id; translation to the
/// provider's vendor vocabulary happens when a batch is put on the wire.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Query {
    Sku { distributor: String, part: String },
    Mpn { manufacturer: String, part: String },
}

impl Query {
    pub fn sku(distributor: impl Into<String>, part: impl Into<String>) -> Self {
        Self::Sku {
            distributor: distributor.into(),
            part: part.into(),
        }
    }

    pub fn mpn(manufacturer: impl Into<String>, part: impl Into<String>) -> Self {
        Self::Mpn {
            manufacturer: manufacturer.into(),
            part: part.into(),
        }
    }

    pub fn is_sku(&self) -> bool {
        matches!(self, Self::Sku { .. })
    }
}

impl fmt::Display for Query {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Sku { distributor, part } => write!(f, "{}#={}", distributor, part),
            Self::Mpn { manufacturer, part } => write!(f, "manf={} manf#={}", manufacturer, part),
        }
    }
}

/// A built query together with the part it prices and the distributors it
/// is allowed to answer for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryEntry {
    pub query: Query,
    /// Index into the part list of the query pass.
    pub part_index: usize,
    /// Sorted internal distributor ids.
    pub distributors_wanted: Vec<String>,
}

impl QueryEntry {
    pub fn wants(&self, distributor: &str) -> bool {
        self.distributors_wanted.iter().any(|d| d == distributor)
    }
}
