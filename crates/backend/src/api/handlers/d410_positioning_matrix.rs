use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::response::Html;
use axum::Json;
use contracts::dashboards::d410_positioning_matrix::{
    CategoryMatrixRequest, CategoryMatrixResponse, ChannelMatrixRequest, ChannelMatrixResponse,
    FilterOptionsResponse, SkuListItem, SkuListRequest, SkuMatrixRequest, SkuMatrixResponse,
    TrendRequest, TrendResponse,
};
use contracts::shared::ApiEnvelope;

use crate::dashboards::d410_positioning_matrix::MatrixState;
use crate::shared::error::{json_body, DashboardResult};

/// GET /matriz-posicionamiento
pub async fn index(State(state): State<MatrixState>) -> Html<String> {
    state.page.render().await
}

/// GET /matriz-posicionamiento/filtros
pub async fn filter_options(
    State(state): State<MatrixState>,
) -> DashboardResult<FilterOptionsResponse> {
    let options = state.service.filter_options().await?;
    tracing::info!(
        "D410 Matrix: {} months, {} channels, {} categories available",
        options.meses_disponibles.len(),
        options.canales_disponibles.len(),
        options.categorias_disponibles.len()
    );
    Ok(Json(ApiEnvelope::ok(options)))
}

/// POST /matriz-posicionamiento/actualizar
pub async fn update_channels(
    State(state): State<MatrixState>,
    payload: Result<Json<ChannelMatrixRequest>, JsonRejection>,
) -> DashboardResult<ChannelMatrixResponse> {
    let request = json_body(payload)?;
    tracing::info!(
        "D410 Matrix: channels for {:?}, brand {:?}",
        request.mes.map(|m| m.as_yyyymm()),
        request.marca
    );

    let response = state.service.channel_matrix(&request).await?;
    tracing::info!(
        "D410 Matrix: returning {} channels",
        response.canales.len()
    );
    Ok(Json(ApiEnvelope::ok(response)))
}

/// POST /matriz-posicionamiento/actualizar-categorias
pub async fn update_categories(
    State(state): State<MatrixState>,
    payload: Result<Json<CategoryMatrixRequest>, JsonRejection>,
) -> DashboardResult<CategoryMatrixResponse> {
    let request = json_body(payload)?;
    tracing::info!(
        "D410 Matrix: categories for {:?}, channels {:?}, categories {:?}",
        request.mes.map(|m| m.as_yyyymm()),
        request.canales,
        request.categorias
    );

    let response = state.service.category_matrix(&request).await?;
    tracing::info!(
        "D410 Matrix: returning {} channel/category combinations",
        response.categorias.len()
    );
    Ok(Json(ApiEnvelope::ok(response)))
}

/// POST /matriz-posicionamiento/actualizar-clasificacion
pub async fn update_skus(
    State(state): State<MatrixState>,
    payload: Result<Json<SkuMatrixRequest>, JsonRejection>,
) -> DashboardResult<SkuMatrixResponse> {
    let request = json_body(payload)?;
    tracing::info!(
        "D410 Matrix: {} SKUs for {:?}, channels {:?}",
        request.skus.len(),
        request.mes.map(|m| m.as_yyyymm()),
        request.canales
    );

    let response = state.service.sku_matrix(&request).await?;
    tracing::info!("D410 Matrix: returning {} SKU/channel points", response.skus.len());
    Ok(Json(ApiEnvelope::ok(response)))
}

/// POST /matriz-posicionamiento/obtener-skus
pub async fn list_skus(
    State(state): State<MatrixState>,
    payload: Result<Json<SkuListRequest>, JsonRejection>,
) -> DashboardResult<Vec<SkuListItem>> {
    let request = json_body(payload)?;
    let skus = state.service.sku_list(&request).await?;
    tracing::info!(
        "D410 Matrix: {} SKUs available for {:?}",
        skus.len(),
        request.mes.map(|m| m.as_yyyymm())
    );
    Ok(Json(ApiEnvelope::ok(skus)))
}

/// POST /matriz-posicionamiento/comparar-3-meses
pub async fn compare_three_months(
    State(state): State<MatrixState>,
    payload: Result<Json<TrendRequest>, JsonRejection>,
) -> DashboardResult<TrendResponse> {
    let request = json_body(payload)?;
    tracing::info!(
        "D410 Matrix: comparing {} SKUs up to {:?}",
        request.skus.len(),
        request.mes.map(|m| m.as_yyyymm())
    );

    let response = state.service.compare_three_months(&request).await?;
    tracing::info!(
        "D410 Matrix: trend improved {}, stable {}, worsened {}",
        response.resumen.mejoraron,
        response.resumen.estable,
        response.resumen.empeoraron
    );
    Ok(Json(ApiEnvelope::ok(response)))
}
