use serde::{Deserialize, Serialize};

/// Period preset of the BF filter bar
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum BfPreset {
    #[serde(rename = "hoy")]
    Today,
    /// Last seven days plus today
    #[serde(rename = "7")]
    LastSevenDays,
    #[default]
    #[serde(rename = "mes_completo")]
    CurrentMonth,
    /// Uses `BfComplianceRequest::rango`
    #[serde(rename = "personalizado")]
    Custom,
}

/// Catalog flag filter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum BfProductType {
    #[default]
    #[serde(rename = "todos")]
    All,
    #[serde(rename = "relevante")]
    Relevant,
    #[serde(rename = "nuevo")]
    New,
    #[serde(rename = "remate")]
    Clearance,
}

/// Channel value meaning "every BF channel"
pub const ALL_BF_CHANNELS: &str = "todos";
/// Category value meaning "every category"
pub const ALL_BF_CATEGORIES: &str = "todas";

/// Body of every `POST /cumplimiento-bf/*` query
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BfComplianceRequest {
    #[serde(default)]
    pub preset: BfPreset,
    #[serde(default, alias = "filtro_tipo")]
    pub tipo: BfProductType,
    /// `todos` or one BF channel
    #[serde(default = "default_channel", alias = "filtro_canal")]
    pub canal: String,
    /// `todas` or one catalog category
    #[serde(default = "default_category", alias = "filtro_categoria")]
    pub categoria: String,
    /// `YYYY-MM-DD` or `YYYY-MM-DD a YYYY-MM-DD`; required by `personalizado`
    #[serde(default, alias = "rango_personalizado")]
    pub rango: String,
}

fn default_channel() -> String {
    ALL_BF_CHANNELS.to_string()
}

fn default_category() -> String {
    ALL_BF_CATEGORIES.to_string()
}

impl Default for BfComplianceRequest {
    fn default() -> Self {
        Self {
            preset: BfPreset::default(),
            tipo: BfProductType::default(),
            canal: default_channel(),
            categoria: default_category(),
            rango: String::new(),
        }
    }
}

impl BfComplianceRequest {
    /// Selected channel, `None` for every BF channel
    pub fn channel(&self) -> Option<&str> {
        let c = self.canal.trim();
        if c.is_empty() || c.eq_ignore_ascii_case(ALL_BF_CHANNELS) {
            None
        } else {
            Some(c)
        }
    }

    /// Selected category, `None` for every category
    pub fn category(&self) -> Option<&str> {
        let c = self.categoria.trim();
        if c.is_empty() || c.eq_ignore_ascii_case(ALL_BF_CATEGORIES) {
            None
        } else {
            Some(c)
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BfRowKind {
    /// Units sold on their own
    #[serde(rename = "individual")]
    Individual,
    /// Units sold inside a combo, valued at the adjusted price
    #[serde(rename = "combo")]
    Combo,
}

/// Table row; every SKU has an individual row and, if it sold in combos, a combo row after it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BfSkuRow {
    pub sku: String,
    pub descripcion: String,
    pub categoria: String,
    pub tipo_fila: BfRowKind,
    pub cantidad_vendida: i64,
    pub ventas_reales: f64,
    pub costo_venta: f64,
    pub gastos_directos: f64,
    pub ingreso_real: f64,
    pub roi: f64,
    pub meta: f64,
    pub es_relevante: bool,
    pub es_nuevo: bool,
    pub es_remate: bool,
    /// Individual rows only: whether a combo row follows
    pub tiene_combo: bool,
    /// False when the SKU only sold inside combos and has no cost rows
    pub tiene_costos: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BfSummary {
    pub total_meta: f64,
    /// Individual sales plus adjusted combo sales
    pub total_real: f64,
    pub cumplimiento_porcentaje: f64,
    pub diferencia: f64,
    pub total_cantidad: i64,
    pub total_skus: usize,
    pub total_ingreso_real: f64,
    pub total_costo: f64,
    pub total_gastos_directos: f64,
    pub roi_promedio: f64,
}

/// Cumulative daily sales
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BfDailyChart {
    /// `YYYY-MM-DD`
    pub fechas: Vec<String>,
    pub ventas: Vec<f64>,
    /// Cumulative targets; empty while no targets are loaded
    pub metas: Vec<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BfComplianceResponse {
    /// Human readable period, e.g. "Últimos 7 días"
    pub periodo_texto: String,
    /// `YYYY-MM-DD`, inclusive
    pub fecha_inicio: String,
    /// `YYYY-MM-DD`, exclusive
    pub fecha_fin: String,
    pub skus_data: Vec<BfSkuRow>,
    pub resumen_general: BfSummary,
    pub grafico: BfDailyChart,
}

/// Free stock of a SKU in one warehouse
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BfWarehouseStock {
    /// Display name of the warehouse
    pub almacen: String,
    pub cantidad: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BfInventoryItem {
    pub sku: String,
    pub descripcion: String,
    pub categoria: String,
    /// Free stock over every warehouse. The channel filter never applies to stock.
    pub existencia: f64,
    /// Units sold in the period through the selected channels, combo components included
    pub venta_periodo: f64,
    pub almacenes: Vec<BfWarehouseStock>,
    pub es_relevante: bool,
    pub es_nuevo: bool,
    pub es_remate: bool,
}

/// Catalog SKUs carrying one flag (Relevante, Nuevo or Remate)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BfInventoryGroup {
    pub nombre: String,
    pub color: String,
    pub total_skus: usize,
    pub total_existencia: i64,
    pub total_venta: i64,
    /// Best sellers first
    pub productos: Vec<BfInventoryItem>,
}

/// `POST /cumplimiento-bf/inventario`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BfInventoryResponse {
    pub periodo_texto: String,
    pub fecha_inicio: String,
    pub fecha_fin: String,
    /// Only flags with at least one stocked SKU; a SKU shows in every group it is flagged for
    pub grupos: Vec<BfInventoryGroup>,
}

/// `GET /cumplimiento-bf/filtros`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BfFilterOptions {
    pub canales: Vec<String>,
    pub categorias: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_cover_whole_month_and_every_filter() {
        let req: BfComplianceRequest = serde_json::from_str("{}").unwrap();
        assert_eq!(req.preset, BfPreset::CurrentMonth);
        assert_eq!(req.tipo, BfProductType::All);
        assert_eq!(req.channel(), None);
        assert_eq!(req.category(), None);
    }

    #[test]
    fn parses_form_style_names() {
        let req: BfComplianceRequest = serde_json::from_str(
            r#"{"preset": "personalizado", "filtro_tipo": "remate",
                "filtro_canal": "Walmart", "rango_personalizado": "2024-11-01 a 2024-11-03"}"#,
        )
        .unwrap();
        assert_eq!(req.preset, BfPreset::Custom);
        assert_eq!(req.tipo, BfProductType::Clearance);
        assert_eq!(req.channel(), Some("Walmart"));
        assert_eq!(req.rango, "2024-11-01 a 2024-11-03");
    }

    #[test]
    fn rejects_unknown_preset() {
        assert!(serde_json::from_str::<BfComplianceRequest>(r#"{"preset": "30"}"#).is_err());
        assert!(serde_json::from_str::<BfComplianceRequest>(r#"{"extra": true}"#).is_err());
    }
}
