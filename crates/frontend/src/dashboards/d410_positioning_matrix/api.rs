use contracts::dashboards::d410_positioning_matrix::{
    CategoryMatrixRequest, CategoryMatrixResponse, ChannelMatrixRequest, ChannelMatrixResponse,
    FilterOptionsResponse, SkuListItem, SkuListRequest, SkuMatrixRequest, SkuMatrixResponse,
    TrendRequest, TrendResponse,
};

use crate::shared::api_utils::{get_json, post_json};

const API_BASE: &str = "/matriz-posicionamiento";

/// Months, channels and categories for the filter bar
pub async fn get_filter_options() -> Result<FilterOptionsResponse, String> {
    get_json(&format!("{}/filtros", API_BASE)).await
}

pub async fn get_channel_matrix(req: &ChannelMatrixRequest) -> Result<ChannelMatrixResponse, String> {
    post_json(&format!("{}/actualizar", API_BASE), req).await
}

pub async fn get_category_matrix(
    req: &CategoryMatrixRequest,
) -> Result<CategoryMatrixResponse, String> {
    post_json(&format!("{}/actualizar-categorias", API_BASE), req).await
}

pub async fn get_sku_matrix(req: &SkuMatrixRequest) -> Result<SkuMatrixResponse, String> {
    post_json(&format!("{}/actualizar-clasificacion", API_BASE), req).await
}

pub async fn get_sku_list(req: &SkuListRequest) -> Result<Vec<SkuListItem>, String> {
    post_json(&format!("{}/obtener-skus", API_BASE), req).await
}

pub async fn compare_three_months(req: &TrendRequest) -> Result<TrendResponse, String> {
    post_json(&format!("{}/comparar-3-meses", API_BASE), req).await
}
