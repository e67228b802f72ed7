// Shared fixtures for unit tests: listings, an in-memory catalog and a throwaway upstream server

use axum::{Router, async_trait};
use reqwest::{Client, StatusCode};
use std::sync::Arc;
use tokio::net::TcpListener;

use crate::{
    catalog_api::CatalogSource,
    error::GatewayError,
    models::{Banner, Brand, Category, Color, Dealer, GalleryImage, ImageKind, MotoListing, MotoSpecs, PriceCurrency},
};

pub fn listing(id: i64, brand: &str, price: f64) -> MotoListing {
    MotoListing {
        id,
        code: format!("MOTO-{id}"),
        brand: brand.to_string(),
        model: format!("Moto {id}"),
        category: "Scooter".to_string(),
        logo_url: format!("https://cdn.example.com/{}.png", brand.to_lowercase()),
        image_url: String::new(),
        displacement: "150 cc".to_string(),
        performance: "100".to_string(),
        price_local: price,
        price_foreign: price / 3.8,
        price_currency: PriceCurrency::Local,
        transmission: "Mecánica".to_string(),
        is_pre_owned: false,
        fee_amount: 0.0,
        colors: vec![Color {
            color_id: 1,
            hex1: "#000000".to_string(),
            hex2: "#333333".to_string(),
            name: "Negro".to_string(),
        }],
        images: vec![
            GalleryImage {
                id: id * 10,
                url: format!("https://cdn.example.com/banner-{id}.png"),
                kind: ImageKind::Banner,
                color_id: 1,
            },
            GalleryImage {
                id: id * 10 + 1,
                url: format!("https://cdn.example.com/gallery-{id}.png"),
                kind: ImageKind::Gallery,
                color_id: 1,
            },
        ],
        specs: MotoSpecs {
            power: "14 HP".to_string(),
            ..MotoSpecs::default()
        },
    }
}

fn unavailable(endpoint: &str) -> GatewayError {
    GatewayError::Status {
        endpoint: endpoint.to_string(),
        status: StatusCode::INTERNAL_SERVER_ERROR,
    }
}

// In-memory catalog with switchable failures per endpoint
#[derive(Default, Clone)]
pub struct FakeCatalog {
    pub brands: Vec<Brand>,
    pub categories: Vec<Category>,
    pub banners: Vec<Banner>,
    pub motorcycles: Vec<MotoListing>,
    pub dealers: Vec<Dealer>,
    fail_brands: bool,
    fail_categories: bool,
    fail_banners: bool,
    fail_motorcycles: bool,
}

impl FakeCatalog {
    pub fn stocked() -> Self {
        let motorcycles = vec![
            listing(1, "Honda", 7990.0),
            listing(2, "Yamaha", 12500.0),
            listing(3, "Honda", 5400.0),
        ];
        Self {
            brands: vec![
                Brand { id: 1, name: "Honda".to_string(), logo_url: None },
                Brand { id: 2, name: "Yamaha".to_string(), logo_url: None },
            ],
            categories: vec![Category { id: 1, name: "Scooter".to_string(), logo_url: None }],
            banners: vec![Banner {
                url: "https://cdn.example.com/promo.png".to_string(),
                code: "MOTO-1".to_string(),
                description: "Promo".to_string(),
            }],
            motorcycles,
            ..Self::default()
        }
    }

    pub fn failing_brands(mut self) -> Self {
        self.fail_brands = true;
        self
    }

    pub fn failing_categories(mut self) -> Self {
        self.fail_categories = true;
        self
    }

    pub fn failing_banners(mut self) -> Self {
        self.fail_banners = true;
        self
    }

    pub fn failing_motorcycles(mut self) -> Self {
        self.fail_motorcycles = true;
        self
    }
}

#[async_trait]
impl CatalogSource for FakeCatalog {
    async fn list_brands(&self) -> Result<Vec<Brand>, GatewayError> {
        if self.fail_brands {
            return Err(unavailable("getBrands"));
        }
        Ok(self.brands.clone())
    }

    async fn list_categories(&self) -> Result<Vec<Category>, GatewayError> {
        if self.fail_categories {
            return Err(unavailable("GetCategories"));
        }
        Ok(self.categories.clone())
    }

    async fn list_banners(&self, _dealer: Option<&str>) -> Result<Vec<Banner>, GatewayError> {
        if self.fail_banners {
            return Err(unavailable("getBannerAd"));
        }
        Ok(self.banners.clone())
    }

    async fn list_motorcycles(&self, _dealer: Option<&str>) -> Result<Vec<MotoListing>, GatewayError> {
        if self.fail_motorcycles {
            return Err(unavailable("getMotorcycles"));
        }
        Ok(self.motorcycles.clone())
    }

    async fn get_motorcycle_by_code(&self, code: &str) -> Result<Option<MotoListing>, GatewayError> {
        if self.fail_motorcycles {
            return Err(unavailable("getMotorcycleByCode"));
        }
        Ok(self.motorcycles.iter().find(|m| m.code == code).cloned())
    }

    async fn list_dealers(&self) -> Result<Vec<Dealer>, GatewayError> {
        Ok(self.dealers.clone())
    }
}

// Client that ignores proxy environment variables so requests stay on localhost
pub fn test_client() -> Arc<Client> {
    Arc::new(Client::builder().no_proxy().build().unwrap())
}

// Serves `router` on an ephemeral local port and returns its base URL
pub async fn spawn_upstream(router: Router) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{}", addr)
}
