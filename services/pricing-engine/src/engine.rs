//! Query pass entry point: resolves distributors, builds the queries and
//! drives the dispatcher over one part-info backend.

use tracing::{debug, info};

use bomprice_models::{Part, QueryEntry};
use bomprice_utils::{AppConfig, PricingError, PricingResult, ProgressSink};

use crate::dispatcher::{BatchDispatcher, CancelFlag};
use crate::query_builder::build_queries;
use crate::reconciler::OfferReconciler;
use crate::registry::DistributorRegistry;
use crate::transport::PartInfoTransport;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineSettings {
    pub max_parts_per_query: usize,
    pub default_currency: String,
}

impl EngineSettings {
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            max_parts_per_query: config.provider.max_parts_per_query,
            default_currency: config.pricing.default_currency.clone(),
        }
    }
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self::from_config(&AppConfig::default())
    }
}

/// The distributors and queries of one pass, fixed before any request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryPlan {
    pub distributors: Vec<String>,
    pub entries: Vec<QueryEntry>,
}

impl QueryPlan {
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

pub struct PricingEngine<T> {
    registry: DistributorRegistry,
    transport: T,
    settings: EngineSettings,
}

impl<T: PartInfoTransport> PricingEngine<T> {
    pub fn new(
        registry: DistributorRegistry,
        transport: T,
        settings: EngineSettings,
    ) -> PricingResult<Self> {
        if settings.max_parts_per_query == 0 {
            return Err(PricingError::configuration(
                "max_parts_per_query must be positive",
            ));
        }
        Ok(Self {
            registry,
            transport,
            settings,
        })
    }

    pub fn registry(&self) -> &DistributorRegistry {
        &self.registry
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Narrows `requested` to the distributors this backend should query.
    ///
    /// Unknown or unmapped distributors are configuration errors; disabled,
    /// local and foreign-owned ones are skipped.
    pub fn resolve_distributors(&self, requested: &[String]) -> PricingResult<Vec<String>> {
        let mut resolved = Vec::new();
        for name in requested {
            let info = self
                .registry
                .distributor(name)
                .ok_or_else(|| {
                    PricingError::configuration(format!("unknown distributor {}", name))
                })?;

            if !info.enabled || !info.is_web() {
                debug!(distributor = %name, "Skipping disabled or local distributor");
                continue;
            }
            match self.registry.owning_backend(name) {
                Some(backend) if backend.name == self.transport.name() => {}
                owner => {
                    debug!(
                        distributor = %name,
                        owner = owner.map(|b| b.name.as_str()).unwrap_or("none"),
                        "Distributor served by another backend"
                    );
                    continue;
                }
            }
            self.transport.distributor_map().require_provider(name)?;
            resolved.push(name.clone());
        }

        resolved.sort();
        resolved.dedup();
        Ok(resolved)
    }

    pub fn plan(&self, parts: &[Part], distributors: &[String]) -> PricingResult<QueryPlan> {
        let distributors = self.resolve_distributors(distributors)?;
        let entries = if distributors.is_empty() {
            Vec::new()
        } else {
            build_queries(parts, &distributors)
        };
        Ok(QueryPlan {
            distributors,
            entries,
        })
    }

    /// Runs a planned pass, writing DistData into `parts` in place.
    ///
    /// `cancel` belongs to this pass alone; setting it stops the pass at
    /// its next batch boundary.
    pub async fn execute<P>(
        &self,
        plan: &QueryPlan,
        parts: &mut [Part],
        currency: &str,
        progress: &mut P,
        cancel: &CancelFlag,
    ) -> PricingResult<()>
    where
        P: ProgressSink + ?Sized,
    {
        info!(
            backend = self.transport.name(),
            parts = parts.len(),
            queries = plan.len(),
            distributors = ?plan.distributors,
            currency,
            "Starting query pass"
        );

        let reconciler = OfferReconciler::new(
            &self.registry,
            self.transport.distributor_map(),
            currency,
            &self.settings.default_currency,
        );
        let dispatcher =
            BatchDispatcher::new(&self.transport, self.settings.max_parts_per_query, cancel)?;
        dispatcher
            .dispatch(&plan.entries, parts, &plan.distributors, &reconciler, progress)
            .await?;

        let priced = parts.iter().filter(|p| !p.dd.is_empty()).count();
        info!(
            backend = self.transport.name(),
            priced,
            parts = parts.len(),
            "Query pass finished"
        );
        Ok(())
    }

    /// Fills the DistData maps of `parts` for `distributors`, pricing in
    /// `currency` where offered.
    pub async fn query_part_info<P>(
        &self,
        parts: &mut [Part],
        distributors: &[String],
        currency: &str,
        progress: &mut P,
    ) -> PricingResult<()>
    where
        P: ProgressSink + ?Sized,
    {
        let cancel = CancelFlag::new();
        self.query_part_info_with_cancel(parts, distributors, currency, progress, &cancel)
            .await
    }

    /// [`Self::query_part_info`] with a caller-held cancellation flag.
    pub async fn query_part_info_with_cancel<P>(
        &self,
        parts: &mut [Part],
        distributors: &[String],
        currency: &str,
        progress: &mut P,
        cancel: &CancelFlag,
    ) -> PricingResult<()>
    where
        P: ProgressSink + ?Sized,
    {
        let plan = self.plan(parts, distributors)?;
        self.execute(&plan, parts, currency, progress, cancel).await
    }
}
