//! HTTP handlers over the pricing engine.

use axum::{
    extract::{DefaultBodyLimit, State},
    http::{header, Method, StatusCode},
    response::Json,
    routing::{get, post},
    Router,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use validator::Validate;

use bomprice_models::Part;
use bomprice_utils::{AppConfig, ErrorResponse, LogProgress, PricingError};

use crate::dispatcher::CancelFlag;
use crate::engine::PricingEngine;
use crate::metrics;
use crate::transport::PartInfoTransport;

pub struct AppState<T> {
    pub engine: Arc<PricingEngine<T>>,
    pub config: Arc<AppConfig>,
}

impl<T> Clone for AppState<T> {
    fn clone(&self) -> Self {
        Self {
            engine: Arc::clone(&self.engine),
            config: Arc::clone(&self.config),
        }
    }
}

type ApiError = (StatusCode, Json<ErrorResponse>);

fn api_error(error: PricingError) -> ApiError {
    let status = StatusCode::from_u16(error.http_status_code())
        .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (status, Json(ErrorResponse::from(error)))
}

/// Application router: health, optional metrics and the `/api/v1` routes.
pub fn create_app<T>(state: AppState<T>) -> Router
where
    T: PartInfoTransport + 'static,
{
    let mut app = Router::new().route("/health", get(health_check));
    if state.config.monitoring.metrics_enabled {
        app = app.route("/metrics", get(metrics_handler));
    }

    let api = Router::new()
        .route("/distributors", get(list_distributors::<T>))
        .route("/pricing", post(price_parts::<T>));

    app.nest("/api/v1", api)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(
                    CorsLayer::new()
                        .allow_origin(Any)
                        .allow_methods([Method::GET, Method::POST])
                        .allow_headers([header::CONTENT_TYPE]),
                )
                .layer(DefaultBodyLimit::max(state.config.server.max_request_size)),
        )
        .with_state(state)
}

async fn health_check() -> Json<serde_json::Value> {
    Json(json!({
        "status": "healthy",
        "service": "bomprice-pricing-engine",
        "timestamp": Utc::now().to_rfc3339(),
        "version": env!("CARGO_PKG_VERSION")
    }))
}

async fn metrics_handler() -> String {
    metrics::gather()
}

#[derive(Debug, Serialize)]
pub struct DistributorSummary {
    pub name: String,
    pub label: String,
    pub backend: Option<String>,
}

/// GET /api/v1/distributors
pub async fn list_distributors<T>(
    State(state): State<AppState<T>>,
) -> Json<Vec<DistributorSummary>>
where
    T: PartInfoTransport + 'static,
{
    let registry = state.engine.registry();
    let summaries = registry
        .enabled_web_distributors()
        .into_iter()
        .filter_map(|name| registry.distributor(name))
        .map(|info| DistributorSummary {
            name: info.name.clone(),
            label: info.label.clone(),
            backend: registry.owning_backend(&info.name).map(|b| b.name.clone()),
        })
        .collect();
    Json(summaries)
}

#[derive(Debug, Deserialize, Validate)]
pub struct PricingRequest {
    pub parts: Vec<Part>,
    /// Defaults to every enabled web distributor.
    pub distributors: Option<Vec<String>>,
    #[validate(length(equal = 3, message = "Currency must be an ISO 4217 code"))]
    pub currency: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct PricingResponse {
    pub parts: Vec<Part>,
    pub distributors: Vec<String>,
    pub currency: String,
    pub queries: usize,
    pub completed_at: DateTime<Utc>,
}

/// POST /api/v1/pricing
pub async fn price_parts<T>(
    State(state): State<AppState<T>>,
    Json(request): Json<PricingRequest>,
) -> Result<Json<PricingResponse>, ApiError>
where
    T: PartInfoTransport + 'static,
{
    request
        .validate()
        .map_err(|e| api_error(PricingError::validation("request", e.to_string())))?;

    let engine = &state.engine;
    let distributors = request.distributors.unwrap_or_else(|| {
        engine
            .registry()
            .enabled_web_distributors()
            .into_iter()
            .map(str::to_string)
            .collect()
    });
    let currency = request
        .currency
        .map(|c| c.to_uppercase())
        .unwrap_or_else(|| state.config.pricing.currency.clone());

    let mut parts = request.parts;
    let plan = engine.plan(&parts, &distributors).map_err(api_error)?;
    let mut progress = LogProgress::new("pricing", plan.len());
    engine
        .execute(&plan, &mut parts, &currency, &mut progress, &CancelFlag::new())
        .await
        .map_err(api_error)?;

    let queries = plan.len();
    Ok(Json(PricingResponse {
        parts,
        distributors: plan.distributors,
        currency,
        queries,
        completed_at: Utc::now(),
    }))
}
