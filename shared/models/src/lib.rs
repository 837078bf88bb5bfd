//! # BOM Price Domain Models
//!
//! Data structures shared by the pricing engine and its callers.
//!
//! ## Key Models
//!
//! - **Part**: one grouped BOM line item with its fields, reference designators
//!   and per-distributor pricing
//! - **DistData**: merged price tiers, stock and chosen SKU for one
//!   (part, distributor) pair
//! - **Query / QueryEntry**: a part lookup addressed by distributor SKU or
//!   manufacturer P/N
//! - **PartResult / DistributorOffer**: typed provider responses

pub mod dist_data;
pub mod offer;
pub mod part;
pub mod query;

pub use dist_data::{DistData, PriceTiers, QtyIncrement};
pub use offer::{
    price_tiers, DistributorOffer, MpnRef, PartResult, PriceBreak, SkuRef, SpecEntry,
    SPEC_LIFECYCLE,
};
pub use part::{Part, DEFAULT_LIFECYCLE, FIELD_MANUFACTURER, FIELD_MANUFACTURER_PN};
pub use query::{Query, QueryEntry};
