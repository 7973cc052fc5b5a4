use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::response::{Html, IntoResponse, Response};
use axum::Json;
use contracts::dashboards::d411_bf_compliance::{
    BfComplianceRequest, BfComplianceResponse, BfFilterOptions, BfInventoryResponse,
};
use contracts::shared::ApiEnvelope;

use crate::dashboards::d411_bf_compliance::{export, BfState};
use crate::shared::error::{json_body, DashboardError, DashboardResult};

/// GET /cumplimiento-bf
pub async fn index(State(state): State<BfState>) -> Html<String> {
    state.page.render().await
}

/// GET /cumplimiento-bf/filtros
pub async fn filter_options(State(state): State<BfState>) -> DashboardResult<BfFilterOptions> {
    let options = state.service.filter_options().await?;
    Ok(Json(ApiEnvelope::ok(options)))
}

/// POST /cumplimiento-bf/datos
pub async fn compliance(
    State(state): State<BfState>,
    payload: Result<Json<BfComplianceRequest>, JsonRejection>,
) -> DashboardResult<BfComplianceResponse> {
    let request = json_body(payload)?;
    tracing::info!(
        "D411 BF: preset {:?}, type {:?}, channel '{}', category '{}'",
        request.preset,
        request.tipo,
        request.canal,
        request.categoria
    );

    let response = state.service.compliance(&request).await?;
    tracing::info!(
        "D411 BF: {} SKUs, total {:.2}",
        response.resumen_general.total_skus,
        response.resumen_general.total_real
    );
    Ok(Json(ApiEnvelope::ok(response)))
}

/// POST /cumplimiento-bf/inventario
pub async fn inventory(
    State(state): State<BfState>,
    payload: Result<Json<BfComplianceRequest>, JsonRejection>,
) -> DashboardResult<BfInventoryResponse> {
    let request = json_body(payload)?;
    let response = state.service.inventory(&request).await?;
    tracing::info!("D411 BF: inventory in {} group(s)", response.grupos.len());
    Ok(Json(ApiEnvelope::ok(response)))
}

/// POST /cumplimiento-bf/exportar
pub async fn export(
    State(state): State<BfState>,
    payload: Result<Json<BfComplianceRequest>, JsonRejection>,
) -> Result<Response, DashboardError> {
    let request = json_body(payload)?;
    let response = state.service.compliance(&request).await?;
    let body = export::to_csv(&response.skus_data)?;
    tracing::info!(
        "D411 BF: exporting {} rows ({} bytes)",
        response.skus_data.len(),
        body.len()
    );
    Ok(export::attachment(body, state.service.today()).into_response())
}

/// POST /cumplimiento-bf/exportar-inventario
pub async fn export_inventory(
    State(state): State<BfState>,
    payload: Result<Json<BfComplianceRequest>, JsonRejection>,
) -> Result<Response, DashboardError> {
    let request = json_body(payload)?;
    let response = state.service.inventory(&request).await?;
    let body = export::inventory_to_csv(&response.grupos)?;
    tracing::info!("D411 BF: exporting inventory ({} bytes)", body.len());
    Ok(export::named_attachment(
        body,
        export::inventory_file_name(state.service.today()),
    )
    .into_response())
}
