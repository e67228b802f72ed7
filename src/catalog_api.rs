// Functions to interact with the remote catalog API (brands, categories, banners, motorcycles)

use axum::async_trait;
use reqwest::{Client, StatusCode, Url};
use serde::{Serialize, de::DeserializeOwned};
use std::sync::Arc;

use crate::{
    error::GatewayError,
    models::{Banner, Brand, Category, Dealer, MotoListing},
};

const BRANDS_ENDPOINT: &str = "getBrands";
const CATEGORIES_ENDPOINT: &str = "GetCategories";
const BANNERS_ENDPOINT: &str = "getBannerAd";
const MOTORCYCLES_ENDPOINT: &str = "getMotorcycles";
const MOTORCYCLE_BY_CODE_ENDPOINT: &str = "getMotorcycleByCode";
const DEALERS_ENDPOINT: &str = "Dealers/sel_catalog";
const DEALER_QUERY_KEY: &str = "dealers_catalog_id";

// Read operations the storefront needs from the catalog.
// Every call is a fresh round-trip: no retries, no caching.
#[async_trait]
pub trait CatalogSource: Send + Sync {
    async fn list_brands(&self) -> Result<Vec<Brand>, GatewayError>;

    async fn list_categories(&self) -> Result<Vec<Category>, GatewayError>;

    async fn list_banners(&self, dealer: Option<&str>) -> Result<Vec<Banner>, GatewayError>;

    async fn list_motorcycles(&self, dealer: Option<&str>) -> Result<Vec<MotoListing>, GatewayError>;

    // Ok(None) when the catalog answers 404 for this code
    async fn get_motorcycle_by_code(&self, code: &str) -> Result<Option<MotoListing>, GatewayError>;

    async fn list_dealers(&self) -> Result<Vec<Dealer>, GatewayError>;
}

// Gateway backed by the shared reqwest client
pub struct HttpCatalogGateway {
    client: Arc<Client>,
    base_url: Url,
}

impl HttpCatalogGateway {
    pub fn new(client: Arc<Client>, base_url: &str) -> Result<Self, GatewayError> {
        let base_url = Url::parse(base_url).map_err(|_| GatewayError::InvalidBaseUrl(base_url.to_string()))?;
        if base_url.cannot_be_a_base() {
            return Err(GatewayError::InvalidBaseUrl(base_url.to_string()));
        }
        Ok(Self { client, base_url })
    }

    // Appends path segments to the base URL; segments are percent-encoded
    fn endpoint_url(&self, endpoint: &str, extra_segment: Option<&str>) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().extend(endpoint.split('/'));
            if let Some(extra) = extra_segment {
                segments.push(extra);
            }
        }
        url
    }

    async fn get(&self, endpoint: &str, url: Url) -> Result<reqwest::Response, GatewayError> {
        tracing::debug!(endpoint, url = %url, "[GATEWAY] GET");
        self.client.get(url).send().await.map_err(|source| {
            tracing::warn!(endpoint, error = %source, "[GATEWAY] Network error");
            GatewayError::Transport {
                endpoint: endpoint.to_string(),
                source,
            }
        })
    }

    async fn decode<T: DeserializeOwned>(endpoint: &str, response: reqwest::Response) -> Result<T, GatewayError> {
        response.json::<T>().await.map_err(|source| {
            tracing::warn!(endpoint, error = %source, "[GATEWAY] Failed to decode response body");
            GatewayError::Decode {
                endpoint: endpoint.to_string(),
                source,
            }
        })
    }

    // GET + status check + JSON decode for list endpoints
    async fn fetch_json<T: DeserializeOwned>(&self, endpoint: &str, dealer: Option<&str>) -> Result<T, GatewayError> {
        let mut url = self.endpoint_url(endpoint, None);
        if let Some(dealer) = dealer {
            url.query_pairs_mut().append_pair(DEALER_QUERY_KEY, dealer);
        }

        let response = self.get(endpoint, url).await?;
        let status = response.status();
        if !status.is_success() {
            tracing::warn!(endpoint, status = %status, "[GATEWAY] Non-success response");
            return Err(GatewayError::Status {
                endpoint: endpoint.to_string(),
                status,
            });
        }
        Self::decode(endpoint, response).await
    }
}

#[async_trait]
impl CatalogSource for HttpCatalogGateway {
    async fn list_brands(&self) -> Result<Vec<Brand>, GatewayError> {
        let brands: Vec<Brand> = self.fetch_json(BRANDS_ENDPOINT, None).await?;
        tracing::debug!("[GATEWAY] Fetched {} brands", brands.len());
        Ok(brands)
    }

    async fn list_categories(&self) -> Result<Vec<Category>, GatewayError> {
        let categories: Vec<Category> = self.fetch_json(CATEGORIES_ENDPOINT, None).await?;
        tracing::debug!("[GATEWAY] Fetched {} categories", categories.len());
        Ok(categories)
    }

    async fn list_banners(&self, dealer: Option<&str>) -> Result<Vec<Banner>, GatewayError> {
        self.fetch_json(BANNERS_ENDPOINT, dealer).await
    }

    async fn list_motorcycles(&self, dealer: Option<&str>) -> Result<Vec<MotoListing>, GatewayError> {
        // The pre-owned flag is normalized to a plain bool while decoding (see models.rs)
        let motos: Vec<MotoListing> = self.fetch_json(MOTORCYCLES_ENDPOINT, dealer).await?;
        tracing::debug!(dealer, "[GATEWAY] Fetched {} motorcycles", motos.len());
        Ok(motos)
    }

    async fn get_motorcycle_by_code(&self, code: &str) -> Result<Option<MotoListing>, GatewayError> {
        let url = self.endpoint_url(MOTORCYCLE_BY_CODE_ENDPOINT, Some(code));
        let response = self.get(MOTORCYCLE_BY_CODE_ENDPOINT, url).await?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            tracing::info!(code, "[GATEWAY] No motorcycle found for code");
            return Ok(None);
        }
        if !status.is_success() {
            tracing::warn!(code, status = %status, "[GATEWAY] Non-success response for motorcycle lookup");
            return Err(GatewayError::Status {
                endpoint: MOTORCYCLE_BY_CODE_ENDPOINT.to_string(),
                status,
            });
        }

        let moto: MotoListing = Self::decode(MOTORCYCLE_BY_CODE_ENDPOINT, response).await?;
        Ok(Some(moto))
    }

    async fn list_dealers(&self) -> Result<Vec<Dealer>, GatewayError> {
        self.fetch_json(DEALERS_ENDPOINT, None).await
    }
}

// Everything the catalog page is seeded with
#[derive(Debug, Clone, Default, Serialize)]
pub struct CatalogData {
    pub brands: Vec<Brand>,
    pub categories: Vec<Category>,
    pub banners: Vec<Banner>,
    pub motorcycles: Vec<MotoListing>,
}

/// Fetches the four catalog data sets concurrently.
///
/// Brands and motorcycles are required: if either fails, all four sets come
/// back empty. Categories and banners are optional: a failure there alone
/// only empties that set. Errors are logged, never returned.
pub async fn load_catalog(source: &dyn CatalogSource, dealer: Option<&str>) -> CatalogData {
    let (brands, categories, banners, motorcycles) = futures::join!(
        source.list_brands(),
        source.list_categories(),
        source.list_banners(dealer),
        source.list_motorcycles(dealer),
    );

    let (brands, motorcycles) = match (brands, motorcycles) {
        (Ok(brands), Ok(motorcycles)) => (brands, motorcycles),
        (brands, motorcycles) => {
            for err in [brands.err(), motorcycles.err()].into_iter().flatten() {
                tracing::error!("Error fetching catalog data: {}", err);
            }
            tracing::warn!("Required catalog data unavailable, rendering an empty catalog");
            return CatalogData::default();
        }
    };

    let categories = categories.unwrap_or_else(|e| {
        tracing::warn!("Error fetching categories, continuing without them: {}", e);
        Vec::new()
    });
    let banners = banners.unwrap_or_else(|e| {
        tracing::warn!("Error fetching banners, continuing without them: {}", e);
        Vec::new()
    });

    tracing::info!(
        brands = brands.len(),
        categories = categories.len(),
        banners = banners.len(),
        motorcycles = motorcycles.len(),
        "Catalog data loaded"
    );
    CatalogData {
        brands,
        categories,
        banners,
        motorcycles,
    }
}
