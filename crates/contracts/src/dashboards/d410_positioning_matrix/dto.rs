use serde::{Deserialize, Serialize};

use super::zone::{Zone, ZoneBadge};
use crate::shared::YearMonth;

/// Channel-list value meaning "every channel"
pub const ALL_CHANNELS: &str = "Todos";

// ---------------------------------------------------------------------------
// Requests
// ---------------------------------------------------------------------------

/// Brand filter of the channel matrix
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum BrandFilter {
    /// Only the operator's own brand
    #[serde(rename = "Loomber", alias = "own")]
    Own,
    /// Every brand except the own brand
    #[serde(rename = "Otros", alias = "others")]
    Others,
    #[default]
    #[serde(rename = "Ambos", alias = "both")]
    Both,
}

/// `POST /actualizar`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ChannelMatrixRequest {
    /// Month `YYYYMM`; current month when omitted
    #[serde(default, alias = "month", skip_serializing_if = "Option::is_none")]
    pub mes: Option<YearMonth>,
    #[serde(default, alias = "brand")]
    pub marca: BrandFilter,
}

/// `POST /actualizar-categorias`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CategoryMatrixRequest {
    #[serde(default, alias = "month", skip_serializing_if = "Option::is_none")]
    pub mes: Option<YearMonth>,
    /// Empty (or containing `Todos`) means every channel
    #[serde(default, alias = "channels")]
    pub canales: Vec<String>,
    /// Empty means every category
    #[serde(default, alias = "categories")]
    pub categorias: Vec<String>,
}

/// `POST /actualizar-clasificacion` and `POST /comparar-3-meses`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SkuMatrixRequest {
    #[serde(default, alias = "month", skip_serializing_if = "Option::is_none")]
    pub mes: Option<YearMonth>,
    #[serde(default, alias = "channels")]
    pub canales: Vec<String>,
    /// Selected SKUs; no SKUs means an empty matrix
    #[serde(default)]
    pub skus: Vec<String>,
}

/// The 3-month comparison takes the same filters as the SKU matrix,
/// but `mes` and `skus` are mandatory.
pub type TrendRequest = SkuMatrixRequest;

/// `POST /obtener-skus`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SkuListRequest {
    #[serde(default, alias = "month", skip_serializing_if = "Option::is_none")]
    pub mes: Option<YearMonth>,
}

/// Normalize a channel selection: trims entries, drops blanks and
/// collapses any list containing `Todos` to the empty "no restriction" list.
pub fn normalize_channels(channels: &[String]) -> Vec<String> {
    if channels.iter().any(|c| c.trim() == ALL_CHANNELS) {
        return Vec::new();
    }
    channels
        .iter()
        .map(|c| c.trim().to_string())
        .filter(|c| !c.is_empty())
        .collect()
}

// ---------------------------------------------------------------------------
// Chart payloads (consumed as-is by Chart.js)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PointStyle {
    #[serde(rename = "circle")]
    Circle,
    #[serde(rename = "cross")]
    Cross,
    #[serde(rename = "crossRot")]
    CrossRot,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartPoint {
    /// Real-income %
    pub x: f64,
    /// ROI %
    pub y: f64,
    /// Bubble radius in px (bubble charts only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub r: Option<f64>,
}

/// One entity on the matrix chart
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartDataset {
    pub label: String,
    pub data: Vec<ChartPoint>,
    pub background_color: String,
    pub border_color: String,
    pub border_width: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub point_style: Option<PointStyle>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub point_radius: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub point_hover_radius: Option<f64>,
    /// Tooltip extras for SKU points
    #[serde(rename = "_sku", default, skip_serializing_if = "Option::is_none")]
    pub sku: Option<String>,
    #[serde(rename = "_canal", default, skip_serializing_if = "Option::is_none")]
    pub canal: Option<String>,
    #[serde(rename = "_descripcion", default, skip_serializing_if = "Option::is_none")]
    pub descripcion: Option<String>,
    #[serde(rename = "_clasificacion", default, skip_serializing_if = "Option::is_none")]
    pub clasificacion: Option<String>,
    #[serde(rename = "_ventas", default, skip_serializing_if = "Option::is_none")]
    pub ventas: Option<f64>,
    #[serde(rename = "_ingreso_real", default, skip_serializing_if = "Option::is_none")]
    pub ingreso_real: Option<f64>,
}

// ---------------------------------------------------------------------------
// Summaries
// ---------------------------------------------------------------------------

/// Summed money fields and the percentages derived from them
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MatrixMetrics {
    /// Real income as % of the filtered set's sales (rounded to 2 decimals)
    pub ingreso_real_pct: f64,
    /// Real income as % of cost of sale (rounded to 2 decimals)
    pub roi_pct: f64,
    /// Total sales
    pub ventas: f64,
    pub ingreso_real: f64,
    pub costo_venta: f64,
    pub gastos_directos: f64,
    pub num_transacciones: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChannelSummary {
    pub canal: String,
    pub canal_abrev: String,
    pub color_canal: String,
    #[serde(flatten)]
    pub metricas: MatrixMetrics,
    #[serde(flatten)]
    pub zona: ZoneBadge,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategorySummary {
    pub canal: String,
    pub canal_abrev: String,
    pub color_canal: String,
    pub categoria: String,
    /// "ABREV - categoria"
    pub label: String,
    #[serde(flatten)]
    pub metricas: MatrixMetrics,
    #[serde(flatten)]
    pub zona: ZoneBadge,
}

/// One SKU sold through one channel
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkuSummary {
    pub sku: String,
    pub descripcion: String,
    pub marca: String,
    pub categoria: String,
    pub canal: String,
    pub canal_abrev: String,
    pub color_canal: String,
    pub clasificacion: String,
    pub color_clasificacion: String,
    #[serde(flatten)]
    pub metricas: MatrixMetrics,
    #[serde(flatten)]
    pub zona: ZoneBadge,
}

/// Entity count, keyed by what was counted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EntityCount {
    #[serde(rename = "total_canales")]
    Channels(usize),
    #[serde(rename = "total_combinaciones")]
    Categories(usize),
    #[serde(rename = "total_skus")]
    Skus(usize),
}

impl EntityCount {
    pub fn value(&self) -> usize {
        match self {
            EntityCount::Channels(n) | EntityCount::Categories(n) | EntityCount::Skus(n) => *n,
        }
    }
}

/// `estadisticas` block of every matrix response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatrixStats {
    #[serde(flatten)]
    pub total: EntityCount,
    pub ventas_totales: f64,
    pub ingreso_real_total: f64,
    pub costo_total: f64,
    /// Total real income / total sales × 100
    pub ingreso_promedio: f64,
    /// Total real income / total cost × 100
    pub roi_promedio: f64,
    pub critico: usize,
    pub eficiente: usize,
    pub a_desarrollar: usize,
    pub ideal: usize,
    /// Upper bound of the chart's ROI axis
    pub eje_y_max: f64,
}

impl MatrixStats {
    /// Zero statistics for an empty selection
    pub fn empty(total: EntityCount) -> Self {
        Self {
            total,
            ventas_totales: 0.0,
            ingreso_real_total: 0.0,
            costo_total: 0.0,
            ingreso_promedio: 0.0,
            roi_promedio: 0.0,
            critico: 0,
            eficiente: 0,
            a_desarrollar: 0,
            ideal: 0,
            eje_y_max: 100.0,
        }
    }

    pub fn zone_count(&self, zone: Zone) -> usize {
        match zone {
            Zone::Critical => self.critico,
            Zone::Efficient => self.eficiente,
            Zone::ToDevelop => self.a_desarrollar,
            Zone::Ideal => self.ideal,
        }
    }
}

// ---------------------------------------------------------------------------
// Responses
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChannelMatrixResponse {
    pub datasets: Vec<ChartDataset>,
    pub canales: Vec<ChannelSummary>,
    pub estadisticas: MatrixStats,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryMatrixResponse {
    pub datasets: Vec<ChartDataset>,
    pub categorias: Vec<CategorySummary>,
    pub estadisticas: MatrixStats,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkuMatrixResponse {
    pub datasets: Vec<ChartDataset>,
    pub skus: Vec<SkuSummary>,
    pub estadisticas: MatrixStats,
}

/// Entry of the SKU picker
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkuListItem {
    pub sku: String,
    pub descripcion: String,
    /// Sales classification label, `Sin Clasificar` when blank
    pub clasificacion: String,
}

/// One month of one SKU-channel in the comparison
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendPoint {
    pub x: f64,
    pub y: f64,
    pub ingreso_real: f64,
    pub ventas: f64,
    pub clasificacion: String,
    #[serde(flatten)]
    pub zona: ZoneBadge,
}

/// Line through the three months of one SKU-channel.
/// `data` always has three slots; `null` marks a month without sales.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrendDataset {
    pub label: String,
    pub data: Vec<Option<TrendPoint>>,
    pub border_color: String,
    pub background_color: String,
    pub show_line: bool,
    pub span_gaps: bool,
    pub fill: bool,
    pub point_radius: f64,
    pub point_style: PointStyle,
    #[serde(rename = "_sku")]
    pub sku: String,
    #[serde(rename = "_canal")]
    pub canal: String,
    #[serde(rename = "_descripcion")]
    pub descripcion: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Trend {
    #[serde(rename = "mejoro")]
    Improved,
    #[serde(rename = "estable")]
    Stable,
    #[serde(rename = "empeoro")]
    Worsened,
}

/// Comparison table row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkuTrendRow {
    pub sku: String,
    pub canal: String,
    pub canal_abrev: String,
    pub color_canal: String,
    pub descripcion: String,
    /// Aligned with `TrendResponse::meses`
    pub meses_data: Vec<Option<TrendPoint>>,
    pub tendencia: Trend,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrendSummary {
    pub mejoraron: usize,
    pub estable: usize,
    pub empeoraron: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendResponse {
    pub datasets: Vec<TrendDataset>,
    pub skus: Vec<SkuTrendRow>,
    /// Oldest first: M-2, M-1, M
    pub meses: Vec<YearMonth>,
    /// Spanish short names of `meses`
    pub meses_labels: Vec<String>,
    pub resumen: TrendSummary,
    /// Statistics of the reference month; `eje_y_max` spans all three months
    pub estadisticas: MatrixStats,
}

/// Month choice in the filter bar
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthOption {
    pub valor: YearMonth,
    pub nombre: String,
    pub anio: i32,
}

/// `GET /filtros`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterOptionsResponse {
    pub mes_actual: YearMonth,
    /// Last six months, newest first
    pub meses_disponibles: Vec<MonthOption>,
    pub canales_disponibles: Vec<String>,
    pub categorias_disponibles: Vec<String>,
}
