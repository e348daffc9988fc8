//! Catalog home page

use axum::{extract::State, Json};

use crate::{
    error::{AppResult, ErrorResponse},
    models::CatalogCounts,
    AppState,
};

/// Document counts for the catalog home page
#[utoipa::path(
    get,
    path = "/catalog",
    tag = "catalog",
    responses(
        (status = 200, description = "Catalog counts", body = CatalogCounts),
        (status = 500, description = "A count could not be fetched", body = ErrorResponse)
    )
)]
pub async fn get_dashboard(State(state): State<AppState>) -> AppResult<Json<CatalogCounts>> {
    let counts = state.services.dashboard.counts().await?;
    Ok(Json(counts))
}
