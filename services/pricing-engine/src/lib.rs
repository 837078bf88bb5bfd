//! # BOM Price Pricing Engine
//!
//! Resolves distributor offers for grouped BOM parts.
//!
//! A query pass runs in four steps:
//!
//! - **Registry**: which distributors exist, which are enabled, and which
//!   backend owns each of them
//! - **Query Builder**: one SKU query per known stock code, one manufacturer
//!   P/N query for the remaining distributors
//! - **Batch Dispatcher**: provider-sized batches sent one at a time
//! - **Offer Reconciler**: merges every offer into one [`DistData`] per
//!   (part, distributor), using the **Currency Selector** to pick a price list
//!
//! [`DistData`]: bomprice_models::DistData

pub mod currency;
pub mod dispatcher;
pub mod engine;
pub mod handlers;
pub mod kitspace;
pub mod metrics;
pub mod query_builder;
pub mod reconciler;
pub mod registry;
pub mod transport;

pub use currency::{select_currency, CurrencySelection};
pub use dispatcher::{batches, BatchDispatcher, CancelFlag};
pub use engine::{EngineSettings, PricingEngine, QueryPlan};
pub use handlers::{create_app, AppState};
pub use kitspace::KitSpaceClient;
pub use query_builder::{build_queries, part_queries};
pub use reconciler::{OfferOutcome, OfferReconciler};
pub use registry::{BackendInfo, BackendKind, DistributorInfo, DistributorKind, DistributorRegistry};
pub use transport::{BatchRequest, DistributorMap, PartInfoTransport, WireQuery};
