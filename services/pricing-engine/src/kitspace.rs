//! KitSpace PartInfo client
//!
//! Batched GraphQL `match` queries against the KitSpace part-info API.

use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, warn};

use bomprice_models::PartResult;
use bomprice_utils::{PricingError, PricingResult, ProviderConfig};

use crate::transport::{strip_whitespace, BatchRequest, DistributorMap, PartInfoTransport};

/// Currencies requested for every offer.
pub const QUERY_CURRENCIES: [&str; 3] = ["GBP", "EUR", "USD"];

const SELECTION_SET: &str = "
    mpn{manufacturer, part},
    datasheet,
    description,
    specs{key, value},
    offers(from: {DISTRIBUTORS}){
        product_url,
        sku {vendor, part},
        description,
        moq,
        in_stock_quantity,
        prices{{CURRENCIES}}
    }
";

/// GraphQL document for a batch asking offers from `vendors`.
pub fn match_query(vendors: &[String]) -> String {
    let from = format!("[\"{}\"]", vendors.join("\",\""));
    let selection = strip_whitespace(SELECTION_SET)
        .replace("{DISTRIBUTORS}", &from)
        .replace("{CURRENCIES}", &QUERY_CURRENCIES.join(","));
    format!("query ($input: [MpnOrSku]!){{ match(parts: $input) {{{}}} }}", selection)
}

#[derive(Debug, Deserialize)]
struct MatchResponse {
    data: Option<MatchData>,
    #[serde(default)]
    errors: Vec<GraphQlError>,
}

#[derive(Debug, Deserialize)]
struct MatchData {
    #[serde(rename = "match", default)]
    matches: Vec<Option<PartResult>>,
}

#[derive(Debug, Deserialize)]
struct GraphQlError {
    message: String,
}

pub struct KitSpaceClient {
    client: Client,
    name: String,
    url: String,
    distributors: DistributorMap,
}

impl KitSpaceClient {
    pub fn new(config: &ProviderConfig) -> PricingResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()
            .map_err(|e| {
                PricingError::configuration(format!("failed to create HTTP client: {}", e))
            })?;

        Ok(Self {
            client,
            name: config.name.clone(),
            url: config.url.clone(),
            distributors: DistributorMap::new(config.distributors.clone())?,
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

impl PartInfoTransport for KitSpaceClient {
    fn name(&self) -> &str {
        &self.name
    }

    fn distributor_map(&self) -> &DistributorMap {
        &self.distributors
    }

    async fn match_parts(&self, request: &BatchRequest) -> PricingResult<Vec<Option<PartResult>>> {
        let query = match_query(&request.distributors);
        let variables = request.variables()?;
        debug!(url = %self.url, %query, %variables, "Querying part info");

        let response = self
            .client
            .post(&self.url)
            .form(&[("query", query.as_str()), ("variables", variables.as_str())])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(PricingError::from_status(&self.name, status.as_u16()));
        }

        let body = response.text().await?;
        debug!(bytes = body.len(), "Part info response received");
        let decoded: MatchResponse = serde_json::from_str(&body)?;

        let Some(data) = decoded.data else {
            let reason = decoded
                .errors
                .first()
                .map(|e| e.message.as_str())
                .unwrap_or("response carries no data");
            return Err(PricingError::malformed_response(format!("{}: {}", self.name, reason)));
        };
        for error in &decoded.errors {
            warn!(provider = %self.name, message = %error.message, "Partial GraphQL error");
        }

        Ok(data.matches)
    }
}
