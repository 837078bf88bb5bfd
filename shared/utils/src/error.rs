use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum PricingError {
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    #[error("Pricing provider not found: {message}")]
    TransportNotFound { message: String },

    #[error("Pricing provider timed out: {message}")]
    TransportTimeout { message: String },

    #[error("Bad request to pricing provider: {message}")]
    TransportBadRequest { message: String },

    #[error("Pricing provider gateway timeout: {message}")]
    TransportGatewayTimeout { message: String },

    #[error("Pricing provider error: {message}")]
    TransportOther { status: Option<u16>, message: String },

    #[error("Malformed provider response: {message}")]
    MalformedResponse { message: String },

    #[error("Query pass cancelled after {completed} of {total} batches")]
    Cancelled { completed: usize, total: usize },

    #[error("Validation error: {field} - {message}")]
    Validation { field: String, message: String },
}

impl PricingError {
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    pub fn malformed_response(message: impl Into<String>) -> Self {
        Self::MalformedResponse {
            message: message.into(),
        }
    }

    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn transport_other(status: Option<u16>, message: impl Into<String>) -> Self {
        Self::TransportOther {
            status,
            message: message.into(),
        }
    }

    /// Classifies a non-success HTTP status returned by the pricing provider.
    pub fn from_status(provider: &str, status: u16) -> Self {
        match status {
            404 => Self::TransportNotFound {
                message: format!("{} server not found, check your internet connection", provider),
            },
            408 => Self::TransportTimeout {
                message: format!("{} is not responding", provider),
            },
            400 => Self::TransportBadRequest {
                message: format!(
                    "{} rejected the request, probably due to an incorrectly formatted \
                     part number; check the `manf#` and stock code fields",
                    provider
                ),
            },
            504 => Self::TransportGatewayTimeout {
                message: format!(
                    "one of the internal {} services may be experiencing problems, \
                     contact its support",
                    provider
                ),
            },
            other => {
                Self::transport_other(Some(other), format!("{} returned HTTP {}", provider, other))
            }
        }
    }

    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            Self::TransportNotFound { .. }
                | Self::TransportTimeout { .. }
                | Self::TransportBadRequest { .. }
                | Self::TransportGatewayTimeout { .. }
                | Self::TransportOther { .. }
        )
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Configuration { .. } => "CONFIGURATION_ERROR",
            Self::TransportNotFound { .. } => "TRANSPORT_NOT_FOUND",
            Self::TransportTimeout { .. } => "TRANSPORT_TIMEOUT",
            Self::TransportBadRequest { .. } => "TRANSPORT_BAD_REQUEST",
            Self::TransportGatewayTimeout { .. } => "TRANSPORT_GATEWAY_TIMEOUT",
            Self::TransportOther { .. } => "TRANSPORT_ERROR",
            Self::MalformedResponse { .. } => "MALFORMED_RESPONSE",
            Self::Cancelled { .. } => "CANCELLED",
            Self::Validation { .. } => "VALIDATION_ERROR",
        }
    }

    pub fn http_status_code(&self) -> u16 {
        match self {
            Self::Configuration { .. } => 500,
            Self::TransportTimeout { .. } | Self::TransportGatewayTimeout { .. } => 504,
            Self::TransportNotFound { .. }
            | Self::TransportBadRequest { .. }
            | Self::TransportOther { .. }
            | Self::MalformedResponse { .. } => 502,
            Self::Cancelled { .. } => 503,
            Self::Validation { .. } => 400,
        }
    }

    /// Process exit code for callers that halt the run on this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Configuration { .. } | Self::Validation { .. } => 2,
            Self::Cancelled { .. } => 130,
            _ => 3,
        }
    }
}

pub type PricingResult<T> = Result<T, PricingError>;

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: String,
    pub message: String,
    pub details: Option<serde_json::Value>,
}

impl From<PricingError> for ErrorResponse {
    fn from(error: PricingError) -> Self {
        Self {
            error: error.to_string(),
            code: error.error_code().to_string(),
            message: error.to_string(),
            details: None,
        }
    }
}

impl From<reqwest::Error> for PricingError {
    fn from(error: reqwest::Error) -> Self {
        if error.is_timeout() {
            Self::TransportTimeout {
                message: error.to_string(),
            }
        } else if error.is_decode() {
            Self::malformed_response(error.to_string())
        } else {
            Self::transport_other(error.status().map(|s| s.as_u16()), error.to_string())
        }
    }
}

impl From<serde_json::Error> for PricingError {
    fn from(error: serde_json::Error) -> Self {
        Self::malformed_response(error.to_string())
    }
}

impl From<regex::Error> for PricingError {
    fn from(error: regex::Error) -> Self {
        Self::configuration(error.to_string())
    }
}

impl From<config::ConfigError> for PricingError {
    fn from(error: config::ConfigError) -> Self {
        Self::configuration(error.to_string())
    }
}
