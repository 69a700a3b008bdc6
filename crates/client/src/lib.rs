//! Farmgate client library.
//!
//! A client for a local-producer marketplace backend: browse products and
//! producers, keep an in-memory shopping cart, and submit orders. All
//! persistent state lives server-side; the cart is volatile by design and
//! lost on process exit.
//!
//! # Architecture
//!
//! - [`api`] - REST API client (`reqwest`), the only place that touches the
//!   network. Catalog reads are cached in-memory via `moka`.
//! - [`cart`] - the cart store, an observable in-process value with
//!   stock-aware quantity arithmetic.
//! - [`checkout`] - turns the cart into an order request and reconciles
//!   local state with the submission outcome.
//! - [`state`] - the [`state::Market`] facade wiring everything together.
//!
//! # Example
//!
//! ```rust,ignore
//! use farmgate_client::{config::ClientConfig, state::Market};
//!
//! let config = ClientConfig::from_env()?;
//! let market = Market::new(config)?;
//!
//! let products = market.api().list_products().await?;
//! market.cart().add_item(products[0].clone(), 2);
//!
//! let checkout = market.checkout();
//! let order = checkout.submit(Some("12 Orchard Lane".into()), None).await?;
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod api;
pub mod auth;
pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod config;
pub mod state;

pub use api::{ApiError, MarketClient};
pub use auth::TokenStore;
pub use cart::{Cart, CartLine, CartStore};
pub use catalog::ProductFilter;
pub use checkout::{Checkout, CheckoutError, CheckoutState, OrderGateway};
pub use config::{ClientConfig, ConfigError};
pub use state::Market;
