// Route definitions

use axum::{Router, routing::get};
use tower_http::trace::TraceLayer;

use crate::AppState;

// Declare submodules for different route groups
mod api;
mod pages;
mod sitemap;

// Pages, the JSON API under /api and the sitemap. Static files are mounted in main.rs.
pub fn create_router(app_state: AppState) -> Router {
    let api_router = Router::new()
        .route("/motorcycles", get(api::list_motorcycles))
        .route("/motorcycles/:code", get(api::get_motorcycle))
        .route("/search", get(api::search_suggestions))
        .route("/brands", get(api::get_brands))
        .route("/categories", get(api::get_categories))
        .route("/banners", get(api::get_banners))
        .route("/dealers", get(api::get_dealers))
        .with_state(app_state.clone());

    Router::new()
        .route("/", get(pages::catalog_page))
        .route("/motos", get(pages::catalog_page))
        .route("/motos/:code", get(pages::detail_page))
        .route("/sitemap.xml", get(sitemap::sitemap))
        .nest("/api", api_router)
        .layer(TraceLayer::new_for_http())
        .with_state(app_state)
}
