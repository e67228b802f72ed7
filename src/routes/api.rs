// JSON endpoints backing the catalog front end

use axum::{
    extract::{Path, Query, State},
    response::{IntoResponse, Json},
};
use serde::{Deserialize, Serialize};

use crate::{
    AppState,
    catalog_query::{CatalogQuery, detail_path},
    error::AppError,
    filters::{FilterState, SEARCH_SUGGESTION_LIMIT, compute_view, search_models},
    models::MotoListing,
    pagination::PaginationState,
};

// --- Response Wrappers ---

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct CatalogViewResponse<'a> {
    items: Vec<&'a MotoListing>,
    total_count: usize,
    pagination: PaginationState,
    has_active_filters: bool,
}

#[derive(Serialize)]
struct Suggestion {
    code: String,
    model: String,
    brand: String,
    href: String,
}

// --- Request Structs ---

#[derive(Deserialize, Debug)]
pub struct SearchQuery {
    q: Option<String>,
    dealer: Option<String>,
}

#[derive(Deserialize, Debug)]
pub struct DealerQuery {
    dealer: Option<String>,
}

// Dealer named in the request, or the configured one
fn dealer_or_default<'a>(app_state: &'a AppState, dealer: Option<&'a str>) -> &'a str {
    dealer
        .map(str::trim)
        .filter(|d| !d.is_empty())
        .unwrap_or(&app_state.settings.dealer_catalog_id)
}

// --- API Handlers ---

pub async fn list_motorcycles(
    State(app_state): State<AppState>,
    Query(query): Query<CatalogQuery>,
) -> Result<impl IntoResponse, AppError> {
    tracing::info!("[HANDLER] /api/motorcycles - Request received: {:?}", query);

    let dealer = dealer_or_default(&app_state, query.dealer());
    let motorcycles = app_state.catalog.list_motorcycles(Some(dealer)).await?;

    let filters: FilterState = query.filter_state();
    let view = compute_view(&motorcycles, &filters, query.page(), app_state.settings.items_per_page);
    tracing::info!(
        "[HANDLER] /api/motorcycles - Returning {} of {} matching listings.",
        view.visible.len(),
        view.total_count
    );

    // Serialized inside the handler since the view borrows `motorcycles`
    let body = serde_json::to_value(CatalogViewResponse {
        items: view.visible,
        total_count: view.total_count,
        pagination: view.pagination,
        has_active_filters: filters.has_active_filters(),
    })
    .map_err(|e| AppError::InternalServerError(anyhow::Error::new(e).context("Failed to serialize catalog view")))?;
    Ok(Json(body))
}

pub async fn get_motorcycle(
    State(app_state): State<AppState>,
    Path(code): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    tracing::info!("[HANDLER] /api/motorcycles/:code - Request received for code: {}", code);

    match app_state.catalog.get_motorcycle_by_code(&code).await? {
        Some(moto) => Ok(Json(moto)),
        None => Err(AppError::NotFound(format!("No motorcycle with code '{}'", code))),
    }
}

pub async fn search_suggestions(
    State(app_state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> Result<impl IntoResponse, AppError> {
    let term = query.q.as_deref().unwrap_or("").trim();
    tracing::info!("[HANDLER] /api/search - Request received for '{}'", term);
    if term.is_empty() {
        return Ok(Json(Vec::<Suggestion>::new()));
    }

    let dealer = dealer_or_default(&app_state, query.dealer.as_deref());
    let motorcycles = app_state.catalog.list_motorcycles(Some(dealer)).await?;
    let suggestions: Vec<Suggestion> = search_models(&motorcycles, term, SEARCH_SUGGESTION_LIMIT)
        .into_iter()
        .map(|moto| Suggestion {
            code: moto.code.clone(),
            model: moto.model.clone(),
            brand: moto.brand.clone(),
            href: detail_path(&moto.code),
        })
        .collect();

    tracing::debug!("[HANDLER] /api/search - {} suggestions for '{}'", suggestions.len(), term);
    Ok(Json(suggestions))
}

pub async fn get_brands(State(app_state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    tracing::info!("[HANDLER] /api/brands - Request received.");
    Ok(Json(app_state.catalog.list_brands().await?))
}

pub async fn get_categories(State(app_state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    tracing::info!("[HANDLER] /api/categories - Request received.");
    // Optional data: an upstream failure yields an empty list, as on the catalog page
    let categories = app_state.catalog.list_categories().await.unwrap_or_else(|e| {
        tracing::warn!("[HANDLER] /api/categories - Error fetching categories, returning none: {}", e);
        Vec::new()
    });
    Ok(Json(categories))
}

pub async fn get_banners(
    State(app_state): State<AppState>,
    Query(query): Query<DealerQuery>,
) -> Result<impl IntoResponse, AppError> {
    tracing::info!("[HANDLER] /api/banners - Request received.");
    let dealer = dealer_or_default(&app_state, query.dealer.as_deref());
    let banners = app_state.catalog.list_banners(Some(dealer)).await.unwrap_or_else(|e| {
        tracing::warn!("[HANDLER] /api/banners - Error fetching banners, returning none: {}", e);
        Vec::new()
    });
    Ok(Json(banners))
}

pub async fn get_dealers(State(app_state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    tracing::info!("[HANDLER] /api/dealers - Request received.");
    Ok(Json(app_state.catalog.list_dealers().await?))
}
