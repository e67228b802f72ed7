// sitemap.xml listing the catalog pages and every motorcycle detail page

use askama::Template;
use axum::{
    extract::State,
    http::header,
    response::IntoResponse,
};
use chrono::Utc;

use crate::{
    AppState,
    catalog_query::{CATALOG_PATH, detail_path},
    error::AppError,
};

pub struct SitemapEntry {
    pub path: String,
    pub priority: &'static str,
}

// Paths are already percent-encoded; the template escapes them for XML
#[derive(Template)]
#[template(path = "sitemap.xml")]
pub struct SitemapTemplate {
    pub site_url: String,
    pub lastmod: String,
    pub entries: Vec<SitemapEntry>,
}

// Root page ranks highest, then detail pages, then everything else
fn priority(path: &str) -> &'static str {
    if path == "/" {
        "1.0"
    } else if path.starts_with(&format!("{}/", CATALOG_PATH)) {
        "0.8"
    } else {
        "0.7"
    }
}

impl SitemapTemplate {
    pub fn new(site_url: &str, paths: impl IntoIterator<Item = String>, lastmod: String) -> Self {
        let entries = paths
            .into_iter()
            .map(|path| SitemapEntry {
                priority: priority(&path),
                path,
            })
            .collect();
        Self {
            site_url: site_url.to_string(),
            lastmod,
            entries,
        }
    }
}

pub async fn sitemap(State(app_state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    tracing::info!("[HANDLER] /sitemap.xml - Request received.");

    let settings = &app_state.settings;
    let detail_paths: Vec<String> = match app_state
        .catalog
        .list_motorcycles(Some(&settings.dealer_catalog_id))
        .await
    {
        Ok(motos) => motos
            .iter()
            .filter(|moto| !moto.code.trim().is_empty())
            .map(|moto| detail_path(&moto.code))
            .collect(),
        Err(e) => {
            // Still serve the static pages
            tracing::warn!("[HANDLER] /sitemap.xml - Could not list motorcycles: {}", e);
            Vec::new()
        }
    };

    let paths = ["/".to_string(), CATALOG_PATH.to_string()].into_iter().chain(detail_paths);
    let template = SitemapTemplate::new(&settings.site_url, paths, Utc::now().format("%Y-%m-%d").to_string());
    match template.render() {
        Ok(xml) => Ok(([(header::CONTENT_TYPE, "application/xml; charset=utf-8")], xml)),
        Err(e) => {
            tracing::error!("Failed to render sitemap template: {}", e);
            Err(AppError::InternalServerError(anyhow::Error::new(e)))
        }
    }
}
