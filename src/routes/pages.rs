// Handlers for the server-rendered catalog and detail pages

use askama::Template;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};

use crate::{
    AppState,
    catalog_api::load_catalog,
    catalog_query::CatalogQuery,
    error::{AppError, AppResult},
    views,
};

// Renders a template or turns the failure into a 500
fn render<T: Template>(template: &T, page: &str) -> AppResult<Html<String>> {
    match template.render() {
        Ok(html) => Ok(Html(html)),
        Err(e) => {
            tracing::error!("Failed to render {} template: {}", page, e);
            Err(AppError::InternalServerError(anyhow::Error::new(e)))
        }
    }
}

pub async fn catalog_page(
    State(app_state): State<AppState>,
    Query(query): Query<CatalogQuery>,
) -> Result<impl IntoResponse, AppError> {
    tracing::info!("[HANDLER] /motos - Request received: {:?}", query);

    let dealer = query.dealer().unwrap_or(&app_state.settings.dealer_catalog_id);
    // Fetch failures degrade to an empty catalog instead of an error page
    let data = load_catalog(app_state.catalog.as_ref(), Some(dealer)).await;

    let template = views::catalog_page(&data, &query, &app_state.settings);
    tracing::debug!(
        "[HANDLER] /motos - Rendering {} of {} matching listings.",
        template.cards.len(),
        template.total_count
    );
    render(&template, "catalog")
}

pub async fn detail_page(
    State(app_state): State<AppState>,
    Path(code): Path<String>,
) -> Result<Response, AppError> {
    tracing::info!("[HANDLER] /motos/:code - Request received for code: {}", code);

    match app_state.catalog.get_motorcycle_by_code(&code).await? {
        Some(moto) => {
            let template = views::detail_page(&moto, &app_state.settings);
            Ok(render(&template, "detail")?.into_response())
        }
        None => {
            tracing::info!("[HANDLER] /motos/:code - No motorcycle with code '{}'.", code);
            let template = views::not_found_page(&code);
            Ok((StatusCode::NOT_FOUND, render(&template, "not found")?).into_response())
        }
    }
}
