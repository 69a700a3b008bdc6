//! Marketplace REST API client.
//!
//! # Architecture
//!
//! - Plain JSON-over-HTTP via `reqwest`; the backend is the source of truth,
//!   no local sync
//! - Bearer token injected per request from [`crate::auth::TokenStore`]
//! - In-memory caching via `moka` for catalog reads (products, producers);
//!   order operations are never cached
//!
//! # Example
//!
//! ```rust,ignore
//! use farmgate_client::api::MarketClient;
//!
//! let client = MarketClient::new(&config, tokens)?;
//!
//! let products = client.list_products().await?;
//! let producer = client.get_producer(products[0].producer_id).await?;
//! ```

mod client;
pub mod types;

pub use client::MarketClient;
pub use types::*;

use thiserror::Error;

/// Errors that can occur when talking to the marketplace API.
#[derive(Debug, Error)]
pub enum ApiError {
    /// HTTP request failed (connect, timeout, ...).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Request path could not be joined onto the base URL.
    #[error("invalid request URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// API returned an error response.
    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Missing or rejected bearer token.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Rate limited by the backend.
    #[error("Rate limited, retry after {0} seconds")]
    RateLimited(u64),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_display() {
        let err = ApiError::NotFound("product 123".to_string());
        assert_eq!(err.to_string(), "Not found: product 123");

        let err = ApiError::Api {
            status: 500,
            message: "boom".to_string(),
        };
        assert_eq!(err.to_string(), "API error: 500 - boom");
    }

    #[test]
    fn test_rate_limited_error() {
        let err = ApiError::RateLimited(60);
        assert_eq!(err.to_string(), "Rate limited, retry after 60 seconds");
    }
}
