//! Prometheus counters for query passes.

use prometheus::{
    register_int_counter, register_int_counter_vec, IntCounter, IntCounterVec, TextEncoder,
};
use std::sync::LazyLock;

use crate::reconciler::OfferOutcome;

static BATCHES_DISPATCHED: LazyLock<Option<IntCounter>> = LazyLock::new(|| {
    register_int_counter!(
        "bomprice_batches_dispatched_total",
        "Batches sent to the pricing provider"
    )
    .ok()
});

static QUERIES_SENT: LazyLock<Option<IntCounter>> = LazyLock::new(|| {
    register_int_counter!(
        "bomprice_queries_sent_total",
        "Part queries sent to the pricing provider"
    )
    .ok()
});

static OFFERS_RECONCILED: LazyLock<Option<IntCounterVec>> = LazyLock::new(|| {
    register_int_counter_vec!(
        "bomprice_offers_reconciled_total",
        "Distributor offers seen, by outcome",
        &["outcome"]
    )
    .ok()
});

static PROVIDER_ERRORS: LazyLock<Option<IntCounterVec>> = LazyLock::new(|| {
    register_int_counter_vec!(
        "bomprice_provider_errors_total",
        "Failed provider requests, by error code",
        &["code"]
    )
    .ok()
});

pub fn record_batch(queries: usize) {
    if let Some(counter) = BATCHES_DISPATCHED.as_ref() {
        counter.inc();
    }
    if let Some(counter) = QUERIES_SENT.as_ref() {
        counter.inc_by(queries as u64);
    }
}

pub fn record_offers(outcomes: &[OfferOutcome]) {
    if let Some(counter) = OFFERS_RECONCILED.as_ref() {
        for outcome in outcomes {
            counter.with_label_values(&[outcome.label()]).inc();
        }
    }
}

pub fn record_provider_error(code: &str) {
    if let Some(counter) = PROVIDER_ERRORS.as_ref() {
        counter.with_label_values(&[code]).inc();
    }
}

/// Current metrics in the Prometheus text format.
pub fn gather() -> String {
    TextEncoder::new()
        .encode_to_string(&prometheus::gather())
        .unwrap_or_else(|_| "Error encoding metrics".to_string())
}
