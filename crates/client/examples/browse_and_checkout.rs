//! End-to-end walkthrough against a live backend.
//!
//! Requires `FARMGATE_API_URL` (and `FARMGATE_API_TOKEN` for the order
//! submission step) in the environment or a `.env` file.
//!
//! Run with: cargo run -p farmgate-client --example browse_and_checkout

use farmgate_client::catalog::ProductFilter;
use farmgate_client::checkout::CheckoutError;
use farmgate_client::config::ClientConfig;
use farmgate_client::state::Market;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let config = ClientConfig::from_env()?;
    let market = Market::new(config)?;

    let products = market.api().list_products().await?;
    tracing::info!(count = products.len(), "fetched products");

    let filter = ProductFilter {
        search: Some("cheese".to_string()),
        ..Default::default()
    };
    for product in filter.apply(&products) {
        tracing::info!(
            name = %product.name,
            price = %product.unit_price.display(),
            unit = %product.unit,
            stock = product.stock,
            "matched product"
        );
    }

    // Put the two cheapest in-stock products in the cart
    let mut by_price = products
        .iter()
        .filter(|p| p.stock > 0)
        .collect::<Vec<_>>();
    by_price.sort_by_key(|p| p.unit_price.amount);
    for product in by_price.into_iter().take(2) {
        market.cart().add_item(product.clone(), 1);
    }
    tracing::info!(
        items = market.cart().total_quantity(),
        total = %market.cart().total().display(),
        "cart ready"
    );

    let checkout = market.checkout();
    match checkout.submit(Some("12 Orchard Lane".to_string()), None).await {
        Ok(order) => {
            tracing::info!(order_id = %order.id, status = ?order.status, "order placed");
        }
        Err(CheckoutError::EmptyCart) => tracing::warn!("nothing in the cart"),
        Err(e) => tracing::error!(error = %e, "checkout failed; cart preserved for retry"),
    }

    Ok(())
}
