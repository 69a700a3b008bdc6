//! Shared application state for embedding the client in a UI.

use std::sync::Arc;

use secrecy::SecretString;

use crate::api::{ApiError, MarketClient};
use crate::auth::TokenStore;
use crate::cart::CartStore;
use crate::checkout::Checkout;
use crate::config::ClientConfig;

/// Top-level handle bundling configuration, authentication, the API client
/// and the cart store.
///
/// Cheaply cloneable via `Arc`; hand clones to every screen that needs
/// marketplace access. There is one cart per `Market` instance.
#[derive(Clone)]
pub struct Market {
    inner: Arc<MarketInner>,
}

struct MarketInner {
    config: ClientConfig,
    tokens: TokenStore,
    api: MarketClient,
    cart: CartStore,
}

impl Market {
    /// Create the shared state from a configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client fails to build.
    pub fn new(config: ClientConfig) -> Result<Self, ApiError> {
        let tokens = TokenStore::new();
        if let Some(token) = config.api_token.clone() {
            tokens.set(token);
        }
        let api = MarketClient::new(&config, tokens.clone())?;

        Ok(Self {
            inner: Arc::new(MarketInner {
                config,
                tokens,
                api,
                cart: CartStore::new(),
            }),
        })
    }

    /// Get a reference to the client configuration.
    #[must_use]
    pub fn config(&self) -> &ClientConfig {
        &self.inner.config
    }

    /// Get a reference to the bearer-token store.
    #[must_use]
    pub fn tokens(&self) -> &TokenStore {
        &self.inner.tokens
    }

    /// Get a reference to the API client.
    #[must_use]
    pub fn api(&self) -> &MarketClient {
        &self.inner.api
    }

    /// Get a reference to the cart store.
    #[must_use]
    pub fn cart(&self) -> &CartStore {
        &self.inner.cart
    }

    /// Create a checkout over this market's cart and API client.
    ///
    /// One checkout per checkout screen; the in-flight guard lives in the
    /// returned value, so keep it alive for the duration of the screen.
    #[must_use]
    pub fn checkout(&self) -> Checkout<MarketClient> {
        Checkout::new(self.inner.cart.clone(), self.inner.api.clone())
    }

    /// Store a bearer token obtained from a login flow.
    pub fn login(&self, token: SecretString) {
        self.inner.tokens.set(token);
    }

    /// Drop the bearer token and clear the cart.
    pub fn logout(&self) {
        self.inner.tokens.clear();
        self.inner.cart.clear();
    }
}
