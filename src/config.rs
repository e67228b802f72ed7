// Settings for the storefront, loaded with the 'config' crate and 'dotenv'

use anyhow::Result;
use config::{Config, Environment, File};
use serde::Deserialize;

pub const DEFAULT_SERVER_ADDRESS: &str = "127.0.0.1:3000";
pub const DEFAULT_SITE_URL: &str = "http://localhost:3000";
pub const DEFAULT_API_URL: &str = "https://globalgo-api.sis360.com.pe/api/Catalog";
pub const DEFAULT_DEALER_CATALOG_ID: &str = "1";
pub const DEFAULT_ITEMS_PER_PAGE: usize = 12;
pub const DEFAULT_FINANCING_URL: &str = "https://staging.globalgo.com.pe/solicitar-financiamiento";
pub const DEFAULT_MOTO_DETAIL_URL: &str = "https://staging.globalgo.com.pe/catalogo";
pub const DEFAULT_STATIC_DIR: &str = "static";

#[derive(Debug, Deserialize, Clone)]
pub struct Settings {
    pub server_address: String,
    // Public origin of this site, used for sitemap links
    pub site_url: String,
    // Base URL of the remote catalog API (no trailing slash needed)
    pub api_url: String,
    // Dealer catalog used when a request doesn't name one
    pub dealer_catalog_id: String,
    pub items_per_page: usize,
    // Outbound links rendered on cards and detail pages
    pub financing_url: String,
    pub moto_detail_url: String,
    // Upstream request timeout. Unset means reqwest's default (no timeout).
    pub request_timeout_secs: Option<u64>,
    pub static_dir: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            server_address: DEFAULT_SERVER_ADDRESS.to_string(),
            site_url: DEFAULT_SITE_URL.to_string(),
            api_url: DEFAULT_API_URL.to_string(),
            dealer_catalog_id: DEFAULT_DEALER_CATALOG_ID.to_string(),
            items_per_page: DEFAULT_ITEMS_PER_PAGE,
            financing_url: DEFAULT_FINANCING_URL.to_string(),
            moto_detail_url: DEFAULT_MOTO_DETAIL_URL.to_string(),
            request_timeout_secs: None,
            static_dir: DEFAULT_STATIC_DIR.to_string(),
        }
    }
}

impl Settings {
    pub fn new() -> Result<Self> {
        dotenv::dotenv().ok(); // Load .env file if present

        let builder = Config::builder()
            // Add default values
            .set_default("server_address", DEFAULT_SERVER_ADDRESS)?
            .set_default("site_url", DEFAULT_SITE_URL)?
            .set_default("api_url", DEFAULT_API_URL)?
            .set_default("dealer_catalog_id", DEFAULT_DEALER_CATALOG_ID)?
            .set_default("items_per_page", DEFAULT_ITEMS_PER_PAGE as u64)?
            .set_default("financing_url", DEFAULT_FINANCING_URL)?
            .set_default("moto_detail_url", DEFAULT_MOTO_DETAIL_URL)?
            .set_default("static_dir", DEFAULT_STATIC_DIR)?
            // Load from a configuration file (e.g., config.toml)
            .add_source(File::with_name("config").required(false))
            // Load from environment variables (e.g., APP_API_URL).
            // Nested keys would use "__", so single underscores stay part of the key.
            .add_source(
                Environment::with_prefix("APP")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            );

        let settings: Settings = builder.build()?.try_deserialize()?;
        Ok(settings.normalized())
    }

    // Zero items per page would make every page empty; treat it as one.
    fn normalized(mut self) -> Self {
        if self.items_per_page == 0 {
            tracing::warn!("items_per_page was 0 in configuration, using 1 instead");
            self.items_per_page = 1;
        }
        self.site_url = self.site_url.trim_end_matches('/').to_string();
        self
    }
}
