//! Client-side catalog filtering.
//!
//! Product lists are small enough to filter in memory on every keystroke;
//! a single pass over the fetched list, no server round-trip.

use farmgate_core::ProducerId;
use rust_decimal::Decimal;

use crate::api::types::Product;

/// Filter criteria applied to an in-memory product list.
///
/// All criteria are optional and combined with AND; the default filter
/// matches everything.
#[derive(Debug, Clone, Default)]
pub struct ProductFilter {
    /// Case-insensitive substring match on name or description.
    pub search: Option<String>,
    /// Minimum unit price, inclusive.
    pub min_price: Option<Decimal>,
    /// Maximum unit price, inclusive.
    pub max_price: Option<Decimal>,
    /// Only products from this producer.
    pub producer_id: Option<ProducerId>,
}

impl ProductFilter {
    /// Whether a single product satisfies every set criterion.
    #[must_use]
    pub fn matches(&self, product: &Product) -> bool {
        if let Some(search) = &self.search {
            let needle = search.to_lowercase();
            if !needle.is_empty()
                && !product.name.to_lowercase().contains(&needle)
                && !product.description.to_lowercase().contains(&needle)
            {
                return false;
            }
        }
        if let Some(min) = self.min_price
            && product.unit_price.amount < min
        {
            return false;
        }
        if let Some(max) = self.max_price
            && product.unit_price.amount > max
        {
            return false;
        }
        if let Some(producer_id) = self.producer_id
            && product.producer_id != producer_id
        {
            return false;
        }
        true
    }

    /// Filter a product list, preserving order.
    #[must_use]
    pub fn apply(&self, products: &[Product]) -> Vec<Product> {
        products
            .iter()
            .filter(|product| self.matches(product))
            .cloned()
            .collect()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use farmgate_core::{CurrencyCode, Price, ProductId, UnitOfMeasure};

    use super::*;

    fn product(id: i64, name: &str, description: &str, price_minor: i64, producer: i64) -> Product {
        Product {
            id: ProductId::new(id),
            name: name.to_string(),
            description: description.to_string(),
            unit_price: Price::from_minor_units(price_minor, CurrencyCode::EUR),
            unit: UnitOfMeasure::Piece,
            stock: 10,
            producer_id: ProducerId::new(producer),
            image_urls: Vec::new(),
        }
    }

    fn sample() -> Vec<Product> {
        vec![
            product(1, "Heirloom Tomatoes", "vine-ripened", 420, 1),
            product(2, "Goat Cheese", "soft, fresh", 650, 2),
            product(3, "Sourdough Loaf", "stone-milled tomato-free", 380, 3),
        ]
    }

    #[test]
    fn test_default_filter_matches_all() {
        let filter = ProductFilter::default();
        assert_eq!(filter.apply(&sample()).len(), 3);
    }

    #[test]
    fn test_search_is_case_insensitive_over_name_and_description() {
        let filter = ProductFilter {
            search: Some("TOMATO".to_string()),
            ..Default::default()
        };
        let matched = filter.apply(&sample());
        // "Heirloom Tomatoes" by name, "Sourdough Loaf" by description
        assert_eq!(matched.len(), 2);
        assert_eq!(matched[0].id, ProductId::new(1));
        assert_eq!(matched[1].id, ProductId::new(3));
    }

    #[test]
    fn test_empty_search_matches_all() {
        let filter = ProductFilter {
            search: Some(String::new()),
            ..Default::default()
        };
        assert_eq!(filter.apply(&sample()).len(), 3);
    }

    #[test]
    fn test_price_range_is_inclusive() {
        let filter = ProductFilter {
            min_price: Some(Decimal::new(380, 2)),
            max_price: Some(Decimal::new(420, 2)),
            ..Default::default()
        };
        let matched = filter.apply(&sample());
        assert_eq!(matched.len(), 2);
    }

    #[test]
    fn test_producer_filter() {
        let filter = ProductFilter {
            producer_id: Some(ProducerId::new(2)),
            ..Default::default()
        };
        let matched = filter.apply(&sample());
        assert_eq!(matched.len(), 1);
        assert_eq!(matched[0].name, "Goat Cheese");
    }

    #[test]
    fn test_criteria_combine_with_and() {
        let filter = ProductFilter {
            search: Some("tomato".to_string()),
            producer_id: Some(ProducerId::new(3)),
            ..Default::default()
        };
        let matched = filter.apply(&sample());
        assert_eq!(matched.len(), 1);
        assert_eq!(matched[0].id, ProductId::new(3));
    }
}
