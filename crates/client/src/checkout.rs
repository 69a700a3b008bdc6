//! Checkout orchestration: cart snapshot, order submission, reconciliation.
//!
//! The orchestrator drives a small state machine published through a watch
//! channel so the checkout screen can render progress:
//!
//! `Idle -> Submitting -> Success(order) | Failed(reason)`
//!
//! Two submissions cannot be in flight at once; a second `submit` while
//! `Submitting` fails without touching the network. On success the cart is
//! cleared; on any failure the cart is left untouched so the user can retry
//! without re-adding items. Retry is always a manual re-invocation, never
//! automatic.

use std::sync::Arc;

use thiserror::Error;
use tokio::sync::watch;
use tracing::instrument;

use crate::api::ApiError;
use crate::api::types::{CreateOrderRequest, Order, OrderItemRequest};
use crate::cart::CartStore;

/// The order-creation collaborator.
///
/// Implemented by [`crate::api::MarketClient`]; tests substitute their own.
pub trait OrderGateway: Send + Sync {
    /// Submit an order-creation request to the backend.
    fn submit_order(
        &self,
        request: CreateOrderRequest,
    ) -> impl Future<Output = Result<Order, ApiError>> + Send;
}

impl OrderGateway for crate::api::MarketClient {
    async fn submit_order(&self, request: CreateOrderRequest) -> Result<Order, ApiError> {
        self.create_order(&request).await
    }
}

/// Observable checkout progress.
#[derive(Debug, Clone, Default)]
pub enum CheckoutState {
    /// No submission attempted since creation or the last reset.
    #[default]
    Idle,
    /// A submission is in flight.
    Submitting,
    /// The last submission succeeded; the order is held for the
    /// confirmation screen to render.
    Success(Order),
    /// The last submission failed with a displayable reason.
    Failed(String),
}

impl CheckoutState {
    /// Whether a submission is currently in flight.
    #[must_use]
    pub const fn is_submitting(&self) -> bool {
        matches!(self, Self::Submitting)
    }
}

/// Errors surfaced by [`Checkout::submit`].
///
/// Every variant also lands in the state machine as `Failed(message)`
/// (except [`CheckoutError::InFlight`], which leaves the active submission's
/// state untouched).
#[derive(Debug, Error)]
pub enum CheckoutError {
    /// Checkout invoked on an empty cart.
    #[error("cart is empty")]
    EmptyCart,

    /// A submission is already in flight.
    #[error("an order submission is already in progress")]
    InFlight,

    /// The order-creation call failed (transport or server-side).
    #[error(transparent)]
    Api(#[from] ApiError),
}

/// Converts the current cart into an order request, submits it, and
/// reconciles local state with the outcome.
#[derive(Clone)]
pub struct Checkout<G> {
    cart: CartStore,
    gateway: G,
    state: Arc<watch::Sender<CheckoutState>>,
}

impl<G: OrderGateway> Checkout<G> {
    /// Create a checkout over a cart and an order gateway.
    #[must_use]
    pub fn new(cart: CartStore, gateway: G) -> Self {
        Self {
            cart,
            gateway,
            state: Arc::new(watch::Sender::new(CheckoutState::Idle)),
        }
    }

    /// The current checkout state.
    #[must_use]
    pub fn state(&self) -> CheckoutState {
        self.state.borrow().clone()
    }

    /// Subscribe to checkout state changes.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<CheckoutState> {
        self.state.subscribe()
    }

    /// Return to `Idle` after the UI has consumed a terminal state.
    ///
    /// No-op while a submission is in flight.
    pub fn reset(&self) {
        self.state.send_if_modified(|state| {
            if state.is_submitting() {
                return false;
            }
            *state = CheckoutState::Idle;
            true
        });
    }

    /// Snapshot the cart, submit it as an order, and reconcile.
    ///
    /// The outbound request carries (product ID, quantity) pairs only; unit
    /// prices are deliberately omitted because the server is the source of
    /// truth for pricing.
    ///
    /// # Errors
    ///
    /// - [`CheckoutError::EmptyCart`] if the cart has no lines; the gateway
    ///   is not contacted.
    /// - [`CheckoutError::InFlight`] if another submission is in progress.
    /// - [`CheckoutError::Api`] if the gateway call fails; the cart is left
    ///   untouched for retry.
    #[instrument(skip(self, delivery_address, delivery_notes))]
    pub async fn submit(
        &self,
        delivery_address: Option<String>,
        delivery_notes: Option<String>,
    ) -> Result<Order, CheckoutError> {
        let snapshot = self.cart.snapshot();
        if snapshot.is_empty() {
            // Fail fast without contacting the network. Does not stomp the
            // state of a submission that is already in flight.
            self.state.send_if_modified(|state| {
                if state.is_submitting() {
                    return false;
                }
                *state = CheckoutState::Failed(CheckoutError::EmptyCart.to_string());
                true
            });
            return Err(CheckoutError::EmptyCart);
        }

        // Claim the in-flight slot; the closure runs under the channel's
        // lock, so two concurrent submits cannot both claim it.
        let claimed = self.state.send_if_modified(|state| {
            if state.is_submitting() {
                return false;
            }
            *state = CheckoutState::Submitting;
            true
        });
        if !claimed {
            return Err(CheckoutError::InFlight);
        }

        let request = CreateOrderRequest {
            items: snapshot
                .lines()
                .iter()
                .map(|line| OrderItemRequest {
                    product_id: line.product.id,
                    quantity: line.quantity,
                })
                .collect(),
            delivery_address,
            delivery_notes,
        };

        match self.gateway.submit_order(request).await {
            Ok(order) => {
                self.cart.clear();
                self.state
                    .send_replace(CheckoutState::Success(order.clone()));
                tracing::info!(order_id = %order.id, "order submitted");
                Ok(order)
            }
            Err(e) => {
                // Cart intentionally untouched so the user can retry.
                tracing::warn!(error = %e, "order submission failed");
                self.state.send_replace(CheckoutState::Failed(e.to_string()));
                Err(e.into())
            }
        }
    }
}
