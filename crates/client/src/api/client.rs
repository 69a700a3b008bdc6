//! REST client implementation.
//!
//! Uses `reqwest` for HTTP and `moka` for catalog caching (TTL from
//! configuration, 5 minutes by default).

use std::sync::Arc;

use moka::future::Cache;
use reqwest::{Method, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, instrument};
use url::Url;

use farmgate_core::{OrderId, ProducerId, ProductId};

use crate::api::ApiError;
use crate::api::types::{CreateOrderRequest, ErrorBody, Order, Producer, Product};
use crate::auth::TokenStore;
use crate::config::ClientConfig;

/// Cached catalog values, keyed by endpoint-derived strings.
#[derive(Clone)]
enum CacheValue {
    Product(Box<Product>),
    Products(Vec<Product>),
    Producer(Box<Producer>),
    Producers(Vec<Producer>),
}

/// Client for the marketplace REST API.
///
/// Provides typed access to the catalog and to order operations. Catalog
/// reads are cached; order operations always hit the backend.
#[derive(Clone)]
pub struct MarketClient {
    inner: Arc<MarketClientInner>,
}

struct MarketClientInner {
    client: reqwest::Client,
    base_url: Url,
    tokens: TokenStore,
    cache: Cache<String, CacheValue>,
}

impl MarketClient {
    /// Create a new API client.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client fails to build.
    pub fn new(config: &ClientConfig, tokens: TokenStore) -> Result<Self, ApiError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()?;

        let cache = Cache::builder()
            .max_capacity(1000)
            .time_to_live(config.catalog_cache_ttl)
            .build();

        // Url::join drops the last path segment unless the base ends in '/'
        let mut base_url = config.base_url.clone();
        if !base_url.path().ends_with('/') {
            base_url.set_path(&format!("{}/", base_url.path()));
        }

        Ok(Self {
            inner: Arc::new(MarketClientInner {
                client,
                base_url,
                tokens,
                cache,
            }),
        })
    }

    /// Build a request for `path` relative to the base URL, injecting the
    /// bearer token when one is present.
    fn request(&self, method: Method, path: &str) -> Result<reqwest::RequestBuilder, ApiError> {
        let url = self.inner.base_url.join(path)?;

        let mut builder = self.inner.client.request(method, url);
        if let Some(bearer) = self.inner.tokens.bearer() {
            builder = builder.header(reqwest::header::AUTHORIZATION, bearer);
        }
        Ok(builder)
    }

    /// Send a request and decode the JSON response body.
    async fn execute<T: DeserializeOwned>(
        &self,
        builder: reqwest::RequestBuilder,
    ) -> Result<T, ApiError> {
        let response = builder.send().await?;
        let status = response.status();

        if status == StatusCode::TOO_MANY_REQUESTS {
            let retry_after = response
                .headers()
                .get(reqwest::header::RETRY_AFTER)
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.parse::<u64>().ok())
                .unwrap_or(1);
            return Err(ApiError::RateLimited(retry_after));
        }

        // Read as text first for better error diagnostics
        let body = response.text().await?;

        if !status.is_success() {
            let message = serde_json::from_str::<ErrorBody>(&body)
                .ok()
                .and_then(|b| b.message)
                .unwrap_or_else(|| body.chars().take(200).collect());

            tracing::error!(
                status = %status,
                message = %message,
                "API returned non-success status"
            );

            return Err(match status {
                StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                    ApiError::Unauthorized(message)
                }
                StatusCode::NOT_FOUND => ApiError::NotFound(message),
                _ => ApiError::Api {
                    status: status.as_u16(),
                    message,
                },
            });
        }

        serde_json::from_str(&body).map_err(|e| {
            tracing::error!(
                error = %e,
                body = %body.chars().take(500).collect::<String>(),
                "Failed to parse API response"
            );
            ApiError::Parse(e)
        })
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        self.execute(self.request(Method::GET, path)?).await
    }

    async fn post_json<B: Serialize + Sync, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        self.execute(self.request(Method::POST, path)?.json(body))
            .await
    }

    // =========================================================================
    // Product Methods
    // =========================================================================

    /// List all products available on the marketplace.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn list_products(&self) -> Result<Vec<Product>, ApiError> {
        let cache_key = "products".to_string();

        if let Some(CacheValue::Products(products)) = self.inner.cache.get(&cache_key).await {
            debug!("Cache hit for products");
            return Ok(products);
        }

        let products: Vec<Product> = self.get_json("products").await?;

        self.inner
            .cache
            .insert(cache_key, CacheValue::Products(products.clone()))
            .await;

        Ok(products)
    }

    /// Get a single product by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the product is not found or the request fails.
    #[instrument(skip(self), fields(product_id = %product_id))]
    pub async fn get_product(&self, product_id: ProductId) -> Result<Product, ApiError> {
        let cache_key = format!("product:{product_id}");

        if let Some(CacheValue::Product(product)) = self.inner.cache.get(&cache_key).await {
            debug!("Cache hit for product");
            return Ok(*product);
        }

        let product: Product = self.get_json(&format!("products/{product_id}")).await?;

        self.inner
            .cache
            .insert(cache_key, CacheValue::Product(Box::new(product.clone())))
            .await;

        Ok(product)
    }

    // =========================================================================
    // Producer Methods
    // =========================================================================

    /// List all producers.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn list_producers(&self) -> Result<Vec<Producer>, ApiError> {
        let cache_key = "producers".to_string();

        if let Some(CacheValue::Producers(producers)) = self.inner.cache.get(&cache_key).await {
            debug!("Cache hit for producers");
            return Ok(producers);
        }

        let producers: Vec<Producer> = self.get_json("producers").await?;

        self.inner
            .cache
            .insert(cache_key, CacheValue::Producers(producers.clone()))
            .await;

        Ok(producers)
    }

    /// Get a single producer by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the producer is not found or the request fails.
    #[instrument(skip(self), fields(producer_id = %producer_id))]
    pub async fn get_producer(&self, producer_id: ProducerId) -> Result<Producer, ApiError> {
        let cache_key = format!("producer:{producer_id}");

        if let Some(CacheValue::Producer(producer)) = self.inner.cache.get(&cache_key).await {
            debug!("Cache hit for producer");
            return Ok(*producer);
        }

        let producer: Producer = self.get_json(&format!("producers/{producer_id}")).await?;

        self.inner
            .cache
            .insert(cache_key, CacheValue::Producer(Box::new(producer.clone())))
            .await;

        Ok(producer)
    }

    /// List the products of a single producer.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self), fields(producer_id = %producer_id))]
    pub async fn list_producer_products(
        &self,
        producer_id: ProducerId,
    ) -> Result<Vec<Product>, ApiError> {
        let cache_key = format!("producer-products:{producer_id}");

        if let Some(CacheValue::Products(products)) = self.inner.cache.get(&cache_key).await {
            debug!("Cache hit for producer products");
            return Ok(products);
        }

        let products: Vec<Product> = self
            .get_json(&format!("producers/{producer_id}/products"))
            .await?;

        self.inner
            .cache
            .insert(cache_key, CacheValue::Products(products.clone()))
            .await;

        Ok(products)
    }

    // =========================================================================
    // Order Methods (not cached - mutable state)
    // =========================================================================

    /// Submit a new order.
    ///
    /// Invalidates cached catalog data on success, since stock levels have
    /// changed server-side.
    ///
    /// # Errors
    ///
    /// Returns an error if the order is rejected or the request fails.
    #[instrument(skip(self, request), fields(item_count = request.items.len()))]
    pub async fn create_order(&self, request: &CreateOrderRequest) -> Result<Order, ApiError> {
        let order: Order = self.post_json("orders", request).await?;
        self.invalidate_all().await;
        Ok(order)
    }

    /// List the authenticated user's orders, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn list_orders(&self) -> Result<Vec<Order>, ApiError> {
        self.get_json("orders").await
    }

    /// Get a single order by ID (for status tracking).
    ///
    /// # Errors
    ///
    /// Returns an error if the order is not found or the request fails.
    #[instrument(skip(self), fields(order_id = %order_id))]
    pub async fn get_order(&self, order_id: OrderId) -> Result<Order, ApiError> {
        self.get_json(&format!("orders/{order_id}")).await
    }

    // =========================================================================
    // Cache Management
    // =========================================================================

    /// Invalidate a cached product.
    pub async fn invalidate_product(&self, product_id: ProductId) {
        self.inner
            .cache
            .invalidate(&format!("product:{product_id}"))
            .await;
        self.inner.cache.invalidate(&"products".to_string()).await;
    }

    /// Invalidate all cached catalog data.
    pub async fn invalidate_all(&self) {
        self.inner.cache.invalidate_all();
        self.inner.cache.run_pending_tasks().await;
    }
}
