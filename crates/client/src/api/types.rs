//! Domain types for the marketplace API.
//!
//! These mirror the backend's JSON payloads (camelCase on the wire) and
//! double as the client-side domain model.

use chrono::{DateTime, Utc};
use farmgate_core::{OrderId, OrderStatus, Price, ProducerId, ProductId, UnitOfMeasure};
use serde::{Deserialize, Serialize};

// =============================================================================
// Catalog Types
// =============================================================================

/// A product offered by a producer.
///
/// Cart entries hold a clone of this as an immutable snapshot taken at the
/// time of adding; stock is not re-validated against the backend until
/// checkout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    /// Product ID.
    pub id: ProductId,
    /// Display name.
    pub name: String,
    /// Plain text description.
    #[serde(default)]
    pub description: String,
    /// Price per unit of measure.
    pub unit_price: Price,
    /// How the product is sold (kg, piece, bunch, ...).
    pub unit: UnitOfMeasure,
    /// Units currently available.
    pub stock: u32,
    /// The producer offering this product.
    pub producer_id: ProducerId,
    /// Image URLs, largest first.
    #[serde(default)]
    pub image_urls: Vec<String>,
}

/// A producer (farm, dairy, bakery, ...) selling on the marketplace.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Producer {
    /// Producer ID.
    pub id: ProducerId,
    /// Display name.
    pub name: String,
    /// Plain text description.
    #[serde(default)]
    pub description: String,
    /// Region or locality shown on the producer card.
    pub region: Option<String>,
    /// Profile image URL.
    pub image_url: Option<String>,
}

// =============================================================================
// Order Types
// =============================================================================

/// A line item on a placed order, as reported by the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderLine {
    /// Product ID.
    pub product_id: ProductId,
    /// Product name at the time of ordering.
    pub product_name: String,
    /// Ordered quantity.
    pub quantity: u32,
    /// Unit price charged (server-computed).
    pub unit_price: Price,
}

/// An order record returned by the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    /// Order ID.
    pub id: OrderId,
    /// Current lifecycle status.
    pub status: OrderStatus,
    /// Line items.
    pub lines: Vec<OrderLine>,
    /// Server-computed total; the client never derives the charge from its
    /// own cached prices.
    pub total: Price,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Free-text delivery address, if given.
    pub delivery_address: Option<String>,
    /// Free-text delivery notes, if given.
    pub delivery_notes: Option<String>,
}

/// A single item in an order-creation request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItemRequest {
    /// Product ID.
    pub product_id: ProductId,
    /// Requested quantity.
    pub quantity: u32,
}

/// Outbound order-creation payload.
///
/// Unit prices are deliberately omitted; pricing is computed server-side.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrderRequest {
    /// Items to order.
    pub items: Vec<OrderItemRequest>,
    /// Free-text delivery address.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delivery_address: Option<String>,
    /// Free-text delivery notes.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delivery_notes: Option<String>,
}

/// Error body the backend attaches to non-2xx responses.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ErrorBody {
    #[serde(default)]
    pub message: Option<String>,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_create_order_request_wire_format() {
        let request = CreateOrderRequest {
            items: vec![OrderItemRequest {
                product_id: ProductId::new(7),
                quantity: 2,
            }],
            delivery_address: Some("12 Orchard Lane".to_string()),
            delivery_notes: None,
        };

        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "items": [{"productId": 7, "quantity": 2}],
                "deliveryAddress": "12 Orchard Lane",
            })
        );
        // No price fields anywhere in the outbound payload.
        assert!(!json.to_string().contains("price"));
    }

    #[test]
    fn test_product_deserializes_camel_case() {
        let json = r#"{
            "id": 3,
            "name": "Heirloom Tomatoes",
            "unitPrice": {"amount": "4.20", "currencyCode": "EUR"},
            "unit": "KILOGRAM",
            "stock": 15,
            "producerId": 1
        }"#;

        let product: Product = serde_json::from_str(json).unwrap();
        assert_eq!(product.id, ProductId::new(3));
        assert_eq!(product.stock, 15);
        assert_eq!(product.unit, UnitOfMeasure::Kilogram);
        assert!(product.image_urls.is_empty());
    }
}
