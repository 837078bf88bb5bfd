//! Batch Dispatcher
//!
//! Splits the built queries into provider-sized batches and runs them one
//! after the other: batch k+1 is only sent once batch k is fully
//! reconciled. Any provider failure aborts the whole pass; batches already
//! reconciled keep their results, later ones are never started.

use std::slice::Chunks;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{debug, error};

use bomprice_models::{Part, QueryEntry};
use bomprice_utils::{PricingError, PricingResult, ProgressSink};

use crate::metrics;
use crate::reconciler::OfferReconciler;
use crate::transport::{BatchRequest, PartInfoTransport};

/// Lets a caller stop a query pass at the next batch boundary.
#[derive(Debug, Clone, Default)]
pub struct CancelFlag(Arc<AtomicBool>);

impl CancelFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Contiguous batches of at most `max_batch_size` entries, in order.
pub fn batches(
    entries: &[QueryEntry],
    max_batch_size: usize,
) -> PricingResult<Chunks<'_, QueryEntry>> {
    if max_batch_size == 0 {
        return Err(PricingError::configuration("maximum batch size must be positive"));
    }
    Ok(entries.chunks(max_batch_size))
}

pub struct BatchDispatcher<'a, T> {
    transport: &'a T,
    max_batch_size: usize,
    cancel: &'a CancelFlag,
}

impl<'a, T: PartInfoTransport> BatchDispatcher<'a, T> {
    pub fn new(
        transport: &'a T,
        max_batch_size: usize,
        cancel: &'a CancelFlag,
    ) -> PricingResult<Self> {
        if max_batch_size == 0 {
            return Err(PricingError::configuration("maximum batch size must be positive"));
        }
        Ok(Self {
            transport,
            max_batch_size,
            cancel,
        })
    }

    /// Sends every batch and reconciles the results into `parts`.
    ///
    /// `distributors` is the full requested distributor list, embedded in
    /// every request. Progress advances by the batch size per batch and is
    /// closed once after the last one.
    pub async fn dispatch<P>(
        &self,
        entries: &[QueryEntry],
        parts: &mut [Part],
        distributors: &[String],
        reconciler: &OfferReconciler<'_>,
        progress: &mut P,
    ) -> PricingResult<()>
    where
        P: ProgressSink + ?Sized,
    {
        let total = entries.len().div_ceil(self.max_batch_size);

        for (index, batch) in batches(entries, self.max_batch_size)?.enumerate() {
            if self.cancel.is_cancelled() {
                return Err(PricingError::Cancelled {
                    completed: index,
                    total,
                });
            }
            if let Some(entry) = batch.iter().find(|e| e.part_index >= parts.len()) {
                return Err(PricingError::configuration(format!(
                    "query {} refers to part {} of a {} part list",
                    entry.query,
                    entry.part_index,
                    parts.len()
                )));
            }

            let request = BatchRequest::new(batch, distributors, self.transport.distributor_map())?;
            debug!(
                backend = self.transport.name(),
                batch = index + 1,
                total,
                queries = request.len(),
                distributors = ?request.distributors,
                "Sending batch"
            );

            let results = match self.transport.match_parts(&request).await {
                Ok(results) => results,
                Err(e) => {
                    metrics::record_provider_error(e.error_code());
                    error!(
                        backend = self.transport.name(),
                        batch = index + 1,
                        error = %e,
                        "Batch failed"
                    );
                    return Err(e);
                }
            };
            metrics::record_batch(batch.len());

            if results.len() > batch.len() {
                return Err(PricingError::malformed_response(format!(
                    "{} results for a batch of {} queries",
                    results.len(),
                    batch.len()
                )));
            }

            for (position, entry) in batch.iter().enumerate() {
                let result = results.get(position).and_then(Option::as_ref);
                let outcomes = reconciler.reconcile(&mut parts[entry.part_index], entry, result);
                metrics::record_offers(&outcomes);
            }

            progress.advance(batch.len());
        }

        progress.close();
        Ok(())
    }
}
