//! HTTP client error types.

use printshop_core::{PricingFailure, SourceError};
use thiserror::Error;

/// Errors that can occur when calling the print shop API.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FetchError {
    /// Non-success HTTP response.
    #[error("HTTP {status}: {body}")]
    Http { status: u16, body: String },

    #[error("Request timed out: {0}")]
    Timeout(String),

    #[error("Connection error: {0}")]
    Connection(String),

    /// Failed to parse the response body.
    #[error("Failed to parse response: {0}")]
    Deserialization(String),

    /// Failed to build or send the request.
    #[error("Request failed: {0}")]
    Request(String),
}

impl FetchError {
    pub fn status(&self) -> Option<u16> {
        match self {
            FetchError::Http { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }

    /// Pricing failure for a failed pricing call.
    ///
    /// Client errors mean the combination has no price; timeouts and
    /// connection problems are network errors; everything else is a server
    /// error.
    pub fn into_pricing_failure(self) -> PricingFailure {
        match self {
            FetchError::Http { status: 400 | 404 | 422, .. } => {
                PricingFailure::NoPriceForCombination
            }
            FetchError::Timeout(reason) | FetchError::Connection(reason) => {
                PricingFailure::NetworkError(reason)
            }
            other => PricingFailure::ServerError(other.to_string()),
        }
    }
}

impl From<FetchError> for SourceError {
    fn from(e: FetchError) -> Self {
        SourceError::new(e.to_string())
    }
}

impl From<reqwest::Error> for FetchError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            FetchError::Timeout(e.to_string())
        } else if e.is_connect() {
            FetchError::Connection(e.to_string())
        } else if e.is_decode() {
            FetchError::Deserialization(e.to_string())
        } else {
            FetchError::Request(e.to_string())
        }
    }
}

impl From<serde_json::Error> for FetchError {
    fn from(e: serde_json::Error) -> Self {
        FetchError::Deserialization(e.to_string())
    }
}
