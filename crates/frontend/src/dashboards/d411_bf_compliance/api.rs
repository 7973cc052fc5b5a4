use contracts::dashboards::d411_bf_compliance::{
    BfComplianceRequest, BfComplianceResponse, BfFilterOptions, BfInventoryResponse,
};

use crate::shared::api_utils::{get_json, post_for_file, post_json};

const API_BASE: &str = "/cumplimiento-bf";
const DEFAULT_EXPORT_NAME: &str = "Cumplimiento_BF.csv";
const DEFAULT_INVENTORY_EXPORT_NAME: &str = "Inventario_BF.csv";

pub async fn get_filter_options() -> Result<BfFilterOptions, String> {
    get_json(&format!("{}/filtros", API_BASE)).await
}

pub async fn get_compliance(req: &BfComplianceRequest) -> Result<BfComplianceResponse, String> {
    post_json(&format!("{}/datos", API_BASE), req).await
}

pub async fn get_inventory(req: &BfComplianceRequest) -> Result<BfInventoryResponse, String> {
    post_json(&format!("{}/inventario", API_BASE), req).await
}

/// CSV bytes and the file name suggested by the server
pub async fn export_csv(req: &BfComplianceRequest) -> Result<(Vec<u8>, String), String> {
    let (bytes, name) = post_for_file(&format!("{}/exportar", API_BASE), req).await?;
    Ok((bytes, name.unwrap_or_else(|| DEFAULT_EXPORT_NAME.to_string())))
}

pub async fn export_inventory_csv(req: &BfComplianceRequest) -> Result<(Vec<u8>, String), String> {
    let (bytes, name) = post_for_file(&format!("{}/exportar-inventario", API_BASE), req).await?;
    Ok((bytes, name.unwrap_or_else(|| DEFAULT_INVENTORY_EXPORT_NAME.to_string())))
}
