//! In-memory shopping cart with stock-aware quantity arithmetic.
//!
//! The cart is the authoritative record of what the user currently intends
//! to buy. It lives entirely in process memory and is lost on exit; the
//! backend only learns about it at checkout.
//!
//! State is held inside a `tokio::sync::watch` channel so any number of
//! display surfaces (line lists, total badges) can subscribe to the current
//! [`Cart`] value without polling. Mutators publish a new value; operations
//! that change nothing do not wake subscribers.
//!
//! All operations are total: unknown product IDs and zero quantities
//! degrade to no-ops, and quantities exceeding stock are silently clamped
//! rather than rejected. Stock exhaustion is therefore invisible to
//! callers; this mirrors the storefront UX where the quantity stepper just
//! stops advancing.

use std::sync::Arc;

use rust_decimal::Decimal;
use tokio::sync::watch;

use farmgate_core::{CurrencyCode, Price, ProductId};

use crate::api::types::Product;

/// One product-and-quantity entry in the shopping cart.
///
/// The product is an immutable snapshot taken when the line was created;
/// its stock figure is only re-validated server-side at checkout.
#[derive(Debug, Clone, PartialEq)]
pub struct CartLine {
    /// Product snapshot.
    pub product: Product,
    /// Quantity, kept within `1..=product.stock` by every mutator.
    pub quantity: u32,
}

impl CartLine {
    /// Line subtotal: `quantity * unit_price`.
    #[must_use]
    pub fn line_total(&self) -> Price {
        Price::new(
            self.product.unit_price.amount * Decimal::from(self.quantity),
            self.product.unit_price.currency_code,
        )
    }
}

/// The current cart contents: an ordered list of lines, at most one per
/// product ID. Insertion order is preserved for display only.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Cart {
    lines: Vec<CartLine>,
}

impl Cart {
    /// The cart lines in insertion order.
    #[must_use]
    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    /// Sum of `quantity * unit_price` across all lines.
    ///
    /// An empty cart totals zero in the default currency. Mixed-currency
    /// carts cannot occur; the backend prices everything in one currency.
    #[must_use]
    pub fn total(&self) -> Price {
        let currency = self
            .lines
            .first()
            .map_or(CurrencyCode::default(), |line| {
                line.product.unit_price.currency_code
            });
        let amount = self
            .lines
            .iter()
            .map(|line| line.product.unit_price.amount * Decimal::from(line.quantity))
            .sum();
        Price::new(amount, currency)
    }

    /// Sum of all line quantities.
    #[must_use]
    pub fn total_quantity(&self) -> u32 {
        self.lines.iter().map(|line| line.quantity).sum()
    }

    /// True iff the cart has no lines.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// The quantity held for a product, or 0 if absent.
    #[must_use]
    pub fn quantity_for(&self, product_id: ProductId) -> u32 {
        self.lines
            .iter()
            .find(|line| line.product.id == product_id)
            .map_or(0, |line| line.quantity)
    }

    fn position(&self, product_id: ProductId) -> Option<usize> {
        self.lines
            .iter()
            .position(|line| line.product.id == product_id)
    }
}

/// Shared, observable cart store.
///
/// Cheaply cloneable; all clones mutate and observe the same cart. Mutation
/// is expected from the application's single logical UI context, but the
/// watch channel makes cross-thread reads safe regardless.
#[derive(Clone)]
pub struct CartStore {
    tx: Arc<watch::Sender<Cart>>,
}

impl Default for CartStore {
    fn default() -> Self {
        Self::new()
    }
}

impl CartStore {
    /// Create an empty cart store.
    #[must_use]
    pub fn new() -> Self {
        Self {
            tx: Arc::new(watch::Sender::new(Cart::default())),
        }
    }

    /// Subscribe to cart changes.
    ///
    /// The receiver yields the full [`Cart`] value after every effective
    /// mutation. Subscribing has no side effects on the store.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<Cart> {
        self.tx.subscribe()
    }

    /// A clone of the current cart contents.
    #[must_use]
    pub fn snapshot(&self) -> Cart {
        self.tx.borrow().clone()
    }

    // =========================================================================
    // Mutators
    // =========================================================================

    /// Add `quantity` units of a product.
    ///
    /// Merges into an existing line for the same product ID, clamping the
    /// resulting quantity to the product's stock. Adding a product with zero
    /// stock, or a zero quantity, is a no-op.
    pub fn add_item(&self, product: Product, quantity: u32) {
        if product.stock == 0 || quantity == 0 {
            return;
        }
        self.tx.send_if_modified(|cart| {
            if let Some(index) = cart.position(product.id) {
                let Some(line) = cart.lines.get_mut(index) else {
                    return false;
                };
                let clamped = line.quantity.saturating_add(quantity).min(line.product.stock);
                if clamped == line.quantity {
                    return false;
                }
                line.quantity = clamped;
            } else {
                cart.lines.push(CartLine {
                    quantity: quantity.min(product.stock),
                    product,
                });
            }
            true
        });
    }

    /// Set a line's quantity, clamped to the product's stock.
    ///
    /// A quantity of 0 removes the line. No-op if the product is not in the
    /// cart.
    pub fn update_quantity(&self, product_id: ProductId, new_quantity: u32) {
        if new_quantity == 0 {
            self.remove_item(product_id);
            return;
        }
        self.tx.send_if_modified(|cart| {
            let Some(index) = cart.position(product_id) else {
                return false;
            };
            let Some(line) = cart.lines.get_mut(index) else {
                return false;
            };
            let clamped = new_quantity.min(line.product.stock);
            if clamped == line.quantity {
                return false;
            }
            line.quantity = clamped;
            true
        });
    }

    /// Increase a line's quantity by one, unless that would exceed stock.
    pub fn increment_quantity(&self, product_id: ProductId) {
        self.tx.send_if_modified(|cart| {
            let Some(index) = cart.position(product_id) else {
                return false;
            };
            let Some(line) = cart.lines.get_mut(index) else {
                return false;
            };
            if line.quantity >= line.product.stock {
                return false;
            }
            line.quantity += 1;
            true
        });
    }

    /// Decrease a line's quantity by one; at quantity 1 the line is removed
    /// entirely rather than left at zero.
    pub fn decrement_quantity(&self, product_id: ProductId) {
        self.tx.send_if_modified(|cart| {
            let Some(index) = cart.position(product_id) else {
                return false;
            };
            let Some(line) = cart.lines.get_mut(index) else {
                return false;
            };
            if line.quantity <= 1 {
                cart.lines.remove(index);
            } else {
                line.quantity -= 1;
            }
            true
        });
    }

    /// Remove a line if present.
    pub fn remove_item(&self, product_id: ProductId) {
        self.tx.send_if_modified(|cart| {
            let Some(index) = cart.position(product_id) else {
                return false;
            };
            cart.lines.remove(index);
            true
        });
    }

    /// Empty the cart unconditionally.
    pub fn clear(&self) {
        self.tx.send_if_modified(|cart| {
            if cart.lines.is_empty() {
                return false;
            }
            cart.lines.clear();
            true
        });
    }

    // =========================================================================
    // Derived Reads
    // =========================================================================

    /// Sum of `quantity * unit_price` across all lines.
    #[must_use]
    pub fn total(&self) -> Price {
        self.tx.borrow().total()
    }

    /// Sum of all line quantities (the cart-badge count).
    #[must_use]
    pub fn total_quantity(&self) -> u32 {
        self.tx.borrow().total_quantity()
    }

    /// True iff the cart has no lines.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tx.borrow().is_empty()
    }

    /// The quantity held for a product, or 0 if absent.
    #[must_use]
    pub fn quantity_for(&self, product_id: ProductId) -> u32 {
        self.tx.borrow().quantity_for(product_id)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use farmgate_core::{ProducerId, UnitOfMeasure};

    fn product(id: i64, price_minor: i64, stock: u32) -> Product {
        Product {
            id: ProductId::new(id),
            name: format!("Product {id}"),
            description: String::new(),
            unit_price: Price::from_minor_units(price_minor, CurrencyCode::EUR),
            unit: UnitOfMeasure::Piece,
            stock,
            producer_id: ProducerId::new(1),
            image_urls: Vec::new(),
        }
    }

    #[test]
    fn test_add_merges_and_clamps_to_stock() {
        let cart = CartStore::new();
        let apples = product(1, 100, 6);

        cart.add_item(apples.clone(), 3);
        cart.add_item(apples, 5);

        // 3 + 5 = 8, clamped to stock 6
        assert_eq!(cart.quantity_for(ProductId::new(1)), 6);
        assert_eq!(cart.snapshot().lines().len(), 1);
    }

    #[test]
    fn test_repeated_adds_never_exceed_stock() {
        let cart = CartStore::new();
        let eggs = product(2, 350, 4);

        for _ in 0..20 {
            cart.add_item(eggs.clone(), 3);
        }
        assert_eq!(cart.quantity_for(ProductId::new(2)), 4);
    }

    #[test]
    fn test_add_refuses_zero_stock() {
        let cart = CartStore::new();
        cart.add_item(product(3, 100, 0), 1);

        assert!(cart.is_empty());
        assert_eq!(cart.quantity_for(ProductId::new(3)), 0);
    }

    #[test]
    fn test_add_zero_quantity_is_noop() {
        let cart = CartStore::new();
        cart.add_item(product(4, 100, 10), 0);
        assert!(cart.is_empty());
    }

    #[test]
    fn test_insertion_order_preserved() {
        let cart = CartStore::new();
        cart.add_item(product(2, 100, 5), 1);
        cart.add_item(product(1, 100, 5), 1);
        cart.add_item(product(3, 100, 5), 1);

        let ids: Vec<i64> = cart
            .snapshot()
            .lines()
            .iter()
            .map(|line| line.product.id.as_i64())
            .collect();
        assert_eq!(ids, vec![2, 1, 3]);
    }

    #[test]
    fn test_update_quantity_clamps() {
        let cart = CartStore::new();
        cart.add_item(product(1, 100, 5), 2);

        cart.update_quantity(ProductId::new(1), 99);
        assert_eq!(cart.quantity_for(ProductId::new(1)), 5);
    }

    #[test]
    fn test_update_quantity_zero_removes() {
        let cart = CartStore::new();
        cart.add_item(product(1, 100, 5), 2);

        cart.update_quantity(ProductId::new(1), 0);
        assert!(cart.is_empty());
        assert_eq!(cart.quantity_for(ProductId::new(1)), 0);
    }

    #[test]
    fn test_update_unknown_product_is_noop() {
        let cart = CartStore::new();
        cart.add_item(product(1, 100, 5), 2);

        cart.update_quantity(ProductId::new(42), 3);
        assert_eq!(cart.total_quantity(), 2);
    }

    #[test]
    fn test_increment_stops_at_stock() {
        let cart = CartStore::new();
        cart.add_item(product(1, 100, 3), 2);

        cart.increment_quantity(ProductId::new(1));
        assert_eq!(cart.quantity_for(ProductId::new(1)), 3);

        // Silent ceiling, not an error
        cart.increment_quantity(ProductId::new(1));
        assert_eq!(cart.quantity_for(ProductId::new(1)), 3);
    }

    #[test]
    fn test_decrement_at_one_removes_line() {
        let cart = CartStore::new();
        cart.add_item(product(1, 100, 5), 1);

        cart.decrement_quantity(ProductId::new(1));
        assert!(cart.is_empty());
        assert_eq!(cart.quantity_for(ProductId::new(1)), 0);
    }

    #[test]
    fn test_remove_item() {
        let cart = CartStore::new();
        cart.add_item(product(1, 100, 5), 2);
        cart.add_item(product(2, 200, 5), 1);

        cart.remove_item(ProductId::new(1));
        assert_eq!(cart.snapshot().lines().len(), 1);

        // Removing again is a no-op
        cart.remove_item(ProductId::new(1));
        assert_eq!(cart.snapshot().lines().len(), 1);
    }

    #[test]
    fn test_clear_then_empty() {
        let cart = CartStore::new();
        cart.add_item(product(1, 100, 5), 2);
        cart.add_item(product(2, 200, 5), 1);

        cart.clear();
        assert!(cart.is_empty());
        assert_eq!(cart.total().amount, Decimal::ZERO);
    }

    #[test]
    fn test_totals_scenario() {
        // Product A: price 10.00, stock 5, qty 2
        // Product B: price 3.50, stock 10, qty 4
        let cart = CartStore::new();
        cart.add_item(product(1, 1000, 5), 2);
        cart.add_item(product(2, 350, 10), 4);

        assert_eq!(cart.total().amount, Decimal::new(3400, 2));
        assert_eq!(cart.total().display(), "€34.00");
        assert_eq!(cart.total_quantity(), 6);
    }

    #[test]
    fn test_empty_cart_total_is_zero() {
        let cart = CartStore::new();
        assert_eq!(cart.total().amount, Decimal::ZERO);
        assert_eq!(cart.total_quantity(), 0);
    }

    #[test]
    fn test_line_total() {
        let line = CartLine {
            product: product(1, 250, 10),
            quantity: 3,
        };
        assert_eq!(line.line_total().amount, Decimal::new(750, 2));
    }

    #[test]
    fn test_subscribers_see_mutations() {
        let cart = CartStore::new();
        let mut rx = cart.subscribe();
        assert!(!rx.has_changed().unwrap());

        cart.add_item(product(1, 100, 5), 2);
        assert!(rx.has_changed().unwrap());
        assert_eq!(rx.borrow_and_update().total_quantity(), 2);

        // No-op mutations do not wake subscribers
        cart.remove_item(ProductId::new(42));
        assert!(!rx.has_changed().unwrap());
    }

    #[tokio::test]
    async fn test_async_subscriber_wakes_on_change() {
        let cart = CartStore::new();
        let mut rx = cart.subscribe();

        cart.add_item(product(1, 100, 5), 1);
        rx.changed().await.unwrap();
        assert_eq!(rx.borrow().total_quantity(), 1);
    }
}
