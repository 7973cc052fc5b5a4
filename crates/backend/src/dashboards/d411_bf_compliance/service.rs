use anyhow::Result;
use chrono::NaiveDate;
use contracts::dashboards::d411_bf_compliance::{
    BfComplianceRequest, BfComplianceResponse, BfDailyChart, BfFilterOptions, BfInventoryResponse,
    BfProductType, BfRowKind, BfSkuRow, BfSummary,
};
use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};
use std::sync::Arc;

use super::inventory;
use super::period::{self, BfPeriod};
use crate::shared::clock::Clock;
use crate::shared::config::BfConfig;
use crate::shared::data::warehouse::{
    BfCatalogEntry, BfDataSource, BfSaleBreakdown, DateRange, SaleType, SalesRow,
};
use crate::shared::error::DashboardError;

/// Combo units are valued at the individual average price minus this discount
pub const COMBO_PRICE_FACTOR: f64 = 0.9;
pub const COMBO_ROW_DESCRIPTION: &str = "Cantidad vendida en combo";

/// Catalog and channel restrictions of one compliance query
#[derive(Debug, Clone)]
pub struct BfSelection {
    pub range: DateRange,
    /// Every BF channel, or only the selected one
    pub channels: Vec<String>,
    pub tipo: BfProductType,
    pub category: Option<String>,
}

impl BfSelection {
    fn admits_entry(&self, entry: &BfCatalogEntry) -> bool {
        let by_type = match self.tipo {
            BfProductType::All => true,
            BfProductType::Relevant => entry.relevante,
            BfProductType::New => entry.nuevo,
            BfProductType::Clearance => entry.remate,
        };
        by_type
            && self
                .category
                .as_deref()
                .map_or(true, |c| entry.categoria.trim() == c)
    }

    pub(crate) fn admits_channel(&self, canal: &str) -> bool {
        self.channels.iter().any(|c| c == canal)
    }

    fn admits_sale(&self, row: &SalesRow, skus: &HashSet<&str>) -> bool {
        !row.is_cancelled()
            && self.range.contains(row.fecha)
            && self.admits_channel(&row.canal)
            && skus.contains(row.sku.as_str())
    }
}

#[derive(Debug, Default, Clone, Copy)]
struct Split {
    ind_qty: f64,
    ind_total: f64,
    /// Combo units carry the combo price, not a component price
    combo_qty: f64,
}

#[derive(Debug, Default, Clone)]
struct Costs {
    cantidad: f64,
    ingreso_real: f64,
    costo: f64,
    gastos: f64,
    descripcion: Option<String>,
}

/// Quantity-proportional share of the period's cost and expenses
#[derive(Debug, Clone, Copy)]
struct RowFigures {
    ventas: f64,
    costo: f64,
    gastos: f64,
    ingreso_real: f64,
    roi: f64,
}

fn ratio(num: f64, den: f64) -> f64 {
    let value = num / den;
    if value.is_finite() {
        value
    } else {
        0.0
    }
}

fn figures(qty: f64, ventas: f64, unit_cost: f64, unit_exp: f64) -> RowFigures {
    let costo = qty * unit_cost;
    let gastos = qty * unit_exp;
    let ingreso_real = ventas - costo - gastos;
    RowFigures {
        ventas,
        costo,
        gastos,
        ingreso_real,
        roi: ratio(ingreso_real, costo) * 100.0,
    }
}

struct SkuResult<'a> {
    entry: &'a BfCatalogEntry,
    descripcion: String,
    split: Split,
    costs: Option<Costs>,
    ventas_reales: f64,
    individual: RowFigures,
    combo: RowFigures,
}

impl SkuResult<'_> {
    fn row(&self, kind: BfRowKind) -> BfSkuRow {
        let (descripcion, qty, f) = match kind {
            BfRowKind::Individual => (self.descripcion.clone(), self.split.ind_qty, self.individual),
            BfRowKind::Combo => (
                COMBO_ROW_DESCRIPTION.to_string(),
                self.split.combo_qty,
                self.combo,
            ),
        };
        BfSkuRow {
            sku: self.entry.sku.clone(),
            descripcion,
            categoria: self.entry.categoria.clone(),
            tipo_fila: kind,
            cantidad_vendida: qty as i64,
            ventas_reales: f.ventas,
            costo_venta: f.costo,
            gastos_directos: f.gastos,
            ingreso_real: f.ingreso_real,
            roi: f.roi,
            meta: 0.0,
            es_relevante: self.entry.relevante,
            es_nuevo: self.entry.nuevo,
            es_remate: self.entry.remate,
            tiene_combo: kind == BfRowKind::Individual && self.split.combo_qty > 0.0,
            tiene_costos: self.costs.is_some(),
        }
    }
}

/// Catalog entries passing the type and category filters, keyed by SKU
pub(crate) fn eligible_catalog<'a>(
    catalog: &'a [BfCatalogEntry],
    selection: &BfSelection,
) -> HashMap<&'a str, &'a BfCatalogEntry> {
    catalog
        .iter()
        .filter(|e| selection.admits_entry(e))
        .map(|e| (e.sku.as_str(), e))
        .collect()
}

/// Compliance table and summary. Pure; inputs come from a `BfDataSource`.
pub fn build_compliance(
    catalog: &[BfCatalogEntry],
    breakdown: &[BfSaleBreakdown],
    sales: &[SalesRow],
    selection: &BfSelection,
) -> (Vec<BfSkuRow>, BfSummary) {
    let eligible = eligible_catalog(catalog, selection);
    let skus: HashSet<&str> = eligible.keys().copied().collect();

    // Individual / combo pivot per primary SKU
    let mut splits: BTreeMap<&str, Split> = BTreeMap::new();
    for b in breakdown.iter().filter(|b| {
        selection.range.contains(b.fecha)
            && selection.admits_channel(&b.canal)
            && skus.contains(b.sku_primario.as_str())
    }) {
        let split = splits.entry(b.sku_primario.as_str()).or_default();
        match b.tipo_venta {
            SaleType::Individual => {
                split.ind_qty += b.cantidad_vendida;
                split.ind_total += b.total_ventas;
            }
            SaleType::Combo => {
                split.combo_qty += b.cantidad_vendida;
            }
        }
    }

    let mut costs: HashMap<&str, Costs> = HashMap::new();
    for row in sales.iter().filter(|r| selection.admits_sale(r, &skus)) {
        let c = costs.entry(row.sku.as_str()).or_default();
        c.cantidad += row.cantidad;
        c.ingreso_real += row.ingreso_real;
        c.costo += row.costo_venta;
        c.gastos += row.gastos_directos;
        if c.descripcion.is_none() {
            c.descripcion = Some(row.descripcion.clone());
        }
    }

    let mut results: Vec<SkuResult> = splits
        .into_iter()
        .filter_map(|(sku, split)| {
            let entry = *eligible.get(sku)?;
            let cost = costs.remove(sku);
            let descripcion = cost
                .as_ref()
                .and_then(|c| c.descripcion.clone())
                .filter(|d| !d.trim().is_empty())
                .unwrap_or_else(|| entry.descripcion.clone());

            let avg_price = ratio(split.ind_total, split.ind_qty);
            let combo_adjusted = split.combo_qty * avg_price * COMBO_PRICE_FACTOR;
            let (unit_cost, unit_exp) = cost
                .as_ref()
                .map(|c| (ratio(c.costo, c.cantidad), ratio(c.gastos, c.cantidad)))
                .unwrap_or((0.0, 0.0));

            Some(SkuResult {
                entry,
                descripcion,
                split,
                ventas_reales: split.ind_total + combo_adjusted,
                individual: figures(split.ind_qty, split.ind_total, unit_cost, unit_exp),
                combo: figures(split.combo_qty, combo_adjusted, unit_cost, unit_exp),
                costs: cost,
            })
        })
        .collect();

    results.sort_by(|a, b| b.ventas_reales.total_cmp(&a.ventas_reales));

    let mut rows = Vec::with_capacity(results.len() * 2);
    let mut summary = BfSummary::default();
    for r in &results {
        rows.push(r.row(BfRowKind::Individual));
        if r.split.combo_qty > 0.0 {
            rows.push(r.row(BfRowKind::Combo));
        }

        summary.total_real += r.ventas_reales;
        summary.total_cantidad += (r.split.ind_qty + r.split.combo_qty) as i64;
        if let Some(c) = &r.costs {
            summary.total_ingreso_real += c.ingreso_real;
            summary.total_costo += c.costo;
            summary.total_gastos_directos += c.gastos;
        }
    }
    summary.total_skus = results.len();
    summary.diferencia = summary.total_real - summary.total_meta;
    summary.cumplimiento_porcentaje = if summary.total_meta > 0.0 {
        summary.total_real / summary.total_meta * 100.0
    } else {
        0.0
    };
    summary.roi_promedio = if summary.total_costo > 0.0 {
        summary.total_ingreso_real / summary.total_costo * 100.0
    } else {
        0.0
    };

    (rows, summary)
}

/// Cumulative sales per day for eligible SKUs
pub fn build_daily_chart(
    catalog: &[BfCatalogEntry],
    sales: &[SalesRow],
    selection: &BfSelection,
) -> BfDailyChart {
    let eligible = eligible_catalog(catalog, selection);
    let skus: HashSet<&str> = eligible.keys().copied().collect();

    let mut per_day = BTreeMap::new();
    for row in sales.iter().filter(|r| selection.admits_sale(r, &skus)) {
        *per_day.entry(row.fecha).or_insert(0.0) += row.total;
    }

    let mut running = 0.0;
    let mut chart = BfDailyChart::default();
    for (fecha, total) in per_day {
        running += total;
        chart.fechas.push(fecha.format("%Y-%m-%d").to_string());
        chart.ventas.push(running);
    }
    chart
}

/// BF compliance queries over an injected data source
#[derive(Clone)]
pub struct BfService {
    source: Arc<dyn BfDataSource>,
    config: BfConfig,
    clock: Clock,
}

impl BfService {
    pub fn new(source: Arc<dyn BfDataSource>, config: BfConfig, clock: Clock) -> Self {
        Self {
            source,
            config,
            clock,
        }
    }

    pub fn today(&self) -> NaiveDate {
        self.clock.today()
    }

    /// Configured channel matching `canal`, case-insensitively
    fn known_channel(&self, canal: &str) -> Option<&String> {
        self.config
            .channels
            .iter()
            .find(|c| c.eq_ignore_ascii_case(canal))
    }

    pub fn selection(
        &self,
        req: &BfComplianceRequest,
    ) -> Result<(BfPeriod, BfSelection), DashboardError> {
        let channels = match req.channel() {
            Some(canal) => match self.known_channel(canal) {
                Some(c) => vec![c.clone()],
                None => {
                    return Err(DashboardError::validation(format!(
                        "Canal no válido para BF: {}",
                        canal
                    )))
                }
            },
            None => self.config.channels.clone(),
        };
        let period = period::resolve(req.preset, &req.rango, self.clock.today())?;
        let selection = BfSelection {
            range: period.range,
            channels,
            tipo: req.tipo,
            category: req.category().map(str::to_string),
        };
        Ok((period, selection))
    }

    pub async fn compliance(
        &self,
        req: &BfComplianceRequest,
    ) -> Result<BfComplianceResponse, DashboardError> {
        let (period, selection) = self.selection(req)?;
        tracing::info!(
            "BF compliance for {} ({} - {}), {} channel(s)",
            period.label,
            period.range.start,
            period.range.end,
            selection.channels.len()
        );

        let (catalog, breakdown, sales) = tokio::try_join!(
            self.source.load_catalog(),
            self.source
                .load_sale_breakdown(selection.range, &selection.channels),
            self.source.load_sales(selection.range),
        )?;
        if catalog.is_empty() {
            tracing::warn!("BF catalog is empty");
        }

        let (skus_data, resumen_general) =
            build_compliance(&catalog, &breakdown, &sales, &selection);
        let grafico = build_daily_chart(&catalog, &sales, &selection);

        Ok(BfComplianceResponse {
            periodo_texto: period.label,
            fecha_inicio: period.range.start.format("%Y-%m-%d").to_string(),
            fecha_fin: period.range.end.format("%Y-%m-%d").to_string(),
            skus_data,
            resumen_general,
            grafico,
        })
    }

    /// Stock of the selected catalog SKUs grouped by flag, with the period's units sold
    pub async fn inventory(
        &self,
        req: &BfComplianceRequest,
    ) -> Result<BfInventoryResponse, DashboardError> {
        let (period, selection) = self.selection(req)?;
        let (catalog, stock, breakdown) = tokio::try_join!(
            self.source.load_catalog(),
            self.source.load_inventory(),
            self.source
                .load_sale_breakdown(selection.range, &selection.channels),
        )?;
        if stock.is_empty() {
            tracing::warn!("BF inventory is empty");
        }

        let items = inventory::inventory_items(&catalog, &stock, &breakdown, &selection);
        tracing::info!("BF inventory: {} stocked SKUs for {}", items.len(), period.label);

        Ok(BfInventoryResponse {
            periodo_texto: period.label,
            fecha_inicio: period.range.start.format("%Y-%m-%d").to_string(),
            fecha_fin: period.range.end.format("%Y-%m-%d").to_string(),
            grupos: inventory::group_by_type(&items),
        })
    }

    /// Channel and category lists for the filter bar
    pub async fn filter_options(&self) -> Result<BfFilterOptions> {
        let mut seen = HashSet::new();
        let canales = self
            .config
            .channels
            .iter()
            .filter(|c| seen.insert(c.to_lowercase()))
            .cloned()
            .collect();

        let categorias = self
            .source
            .load_catalog()
            .await?
            .iter()
            .map(|e| e.categoria.trim())
            .filter(|c| !c.is_empty())
            .map(str::to_string)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();

        Ok(BfFilterOptions {
            canales,
            categorias,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dashboards::d410_positioning_matrix::aggregator::tests::row;
    use crate::shared::data::memory::InMemoryWarehouse;
    use crate::shared::data::warehouse::BfStockRow;
    use contracts::dashboards::d411_bf_compliance::BfPreset;

    fn nov(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 11, day).unwrap()
    }

    fn entry(sku: &str, categoria: &str, relevante: bool, remate: bool) -> BfCatalogEntry {
        BfCatalogEntry {
            sku: sku.into(),
            descripcion: format!("Catálogo {}", sku),
            categoria: categoria.into(),
            relevante,
            nuevo: false,
            remate,
        }
    }

    fn split(day: u32, canal: &str, sku: &str, tipo: SaleType, qty: f64, total: f64) -> BfSaleBreakdown {
        BfSaleBreakdown {
            fecha: nov(day),
            canal: canal.into(),
            sku_primario: sku.into(),
            tipo_venta: tipo,
            cantidad_vendida: qty,
            total_ventas: total,
        }
    }

    fn sale(day: u32, sku: &str, canal: &str, qty: f64, total: f64, costo: f64, gastos: f64) -> SalesRow {
        let mut r = row(1, sku, canal, total, costo, total - costo - gastos);
        r.fecha = nov(day);
        r.cantidad = qty;
        r
    }

    fn catalog() -> Vec<BfCatalogEntry> {
        vec![
            entry("A1", "Audio", true, false),
            entry("B2", "Audio", false, true),
            entry("C3", "Video", true, false),
        ]
    }

    fn breakdown() -> Vec<BfSaleBreakdown> {
        vec![
            split(2, "Walmart", "A1", SaleType::Individual, 6.0, 600.0),
            split(3, "Walmart", "A1", SaleType::Individual, 4.0, 400.0),
            split(3, "Shein", "A1", SaleType::Combo, 5.0, 300.0),
            split(4, "Walmart", "B2", SaleType::Combo, 3.0, 90.0),
            // not in the catalog
            split(4, "Walmart", "Z9", SaleType::Individual, 1.0, 9999.0),
            // not a BF channel
            split(4, "Coppel", "C3", SaleType::Individual, 1.0, 5000.0),
        ]
    }

    fn sales() -> Vec<SalesRow> {
        let mut cancelled = sale(2, "A1", "Walmart", 50.0, 5000.0, 4000.0, 0.0);
        cancelled.estado = "Cancelado".into();
        vec![
            sale(2, "A1", "Walmart", 6.0, 600.0, 240.0, 60.0),
            sale(3, "A1", "Walmart", 4.0, 400.0, 160.0, 40.0),
            sale(4, "C3", "Coppel", 1.0, 5000.0, 10.0, 0.0),
            cancelled,
        ]
    }

    fn all_channels() -> BfSelection {
        BfSelection {
            range: DateRange::new(nov(1), nov(30)),
            channels: BfConfig::default().channels,
            tipo: BfProductType::All,
            category: None,
        }
    }

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn individual_and_combo_rows() {
        let (rows, _) = build_compliance(&catalog(), &breakdown(), &sales(), &all_channels());

        let kinds: Vec<_> = rows.iter().map(|r| (r.sku.as_str(), r.tipo_fila)).collect();
        assert_eq!(
            kinds,
            vec![
                ("A1", BfRowKind::Individual),
                ("A1", BfRowKind::Combo),
                ("B2", BfRowKind::Individual),
                ("B2", BfRowKind::Combo),
            ]
        );

        let a = &rows[0];
        assert_eq!(a.cantidad_vendida, 10);
        assert_eq!(a.descripcion, "Producto A1");
        assert!(close(a.ventas_reales, 1000.0));
        assert!(close(a.costo_venta, 400.0));
        assert!(close(a.gastos_directos, 100.0));
        assert!(close(a.ingreso_real, 500.0));
        assert!(close(a.roi, 125.0));
        assert!(a.tiene_combo && a.tiene_costos);

        // 5 units at the 100.0 average price, 10% off
        let combo = &rows[1];
        assert_eq!(combo.descripcion, COMBO_ROW_DESCRIPTION);
        assert_eq!(combo.cantidad_vendida, 5);
        assert!(close(combo.ventas_reales, 450.0));
        assert!(close(combo.costo_venta, 200.0));
        assert!(close(combo.ingreso_real, 200.0));
        assert!(close(combo.roi, 100.0));
        assert!(!combo.tiene_combo);
    }

    #[test]
    fn combo_only_sku_has_no_costs() {
        let (rows, _) = build_compliance(&catalog(), &breakdown(), &sales(), &all_channels());
        let b = &rows[2];
        assert_eq!(b.descripcion, "Catálogo B2");
        assert_eq!(b.cantidad_vendida, 0);
        assert!(!b.tiene_costos);
        assert_eq!(b.roi, 0.0);
        // no individual price to value the combo units
        assert_eq!(rows[3].ventas_reales, 0.0);
    }

    #[test]
    fn summary_totals() {
        let (_, s) = build_compliance(&catalog(), &breakdown(), &sales(), &all_channels());
        assert!(close(s.total_real, 1450.0));
        assert_eq!(s.total_cantidad, 18);
        assert_eq!(s.total_skus, 2);
        assert!(close(s.total_ingreso_real, 500.0));
        assert!(close(s.total_costo, 400.0));
        assert!(close(s.total_gastos_directos, 100.0));
        assert!(close(s.roi_promedio, 125.0));
        assert_eq!(s.total_meta, 0.0);
        assert_eq!(s.cumplimiento_porcentaje, 0.0);
        assert!(close(s.diferencia, 1450.0));
    }

    #[test]
    fn catalog_filters_apply() {
        let selection = BfSelection {
            tipo: BfProductType::Clearance,
            ..all_channels()
        };
        let (rows, s) = build_compliance(&catalog(), &breakdown(), &sales(), &selection);
        assert!(rows.iter().all(|r| r.sku == "B2"));
        assert_eq!(s.total_skus, 1);

        let selection = BfSelection {
            category: Some("Video".into()),
            ..all_channels()
        };
        let (rows, _) = build_compliance(&catalog(), &breakdown(), &sales(), &selection);
        assert!(rows.is_empty());
    }

    #[test]
    fn single_channel_restricts_breakdown_and_costs() {
        let selection = BfSelection {
            channels: vec!["Shein".into()],
            ..all_channels()
        };
        let (rows, s) = build_compliance(&catalog(), &breakdown(), &sales(), &selection);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].cantidad_vendida, 0);
        assert!(!rows[0].tiene_costos);
        assert_eq!(s.total_cantidad, 5);
    }

    #[test]
    fn daily_chart_is_cumulative() {
        let chart = build_daily_chart(&catalog(), &sales(), &all_channels());
        assert_eq!(chart.fechas, vec!["2024-11-02", "2024-11-03"]);
        assert_eq!(chart.ventas, vec![600.0, 1000.0]);
        assert!(chart.metas.is_empty());
    }

    fn service(warehouse: InMemoryWarehouse) -> BfService {
        BfService::new(Arc::new(warehouse), BfConfig::default(), Clock::Fixed(nov(20)))
    }

    #[tokio::test]
    async fn compliance_reports_period() {
        let svc = service(
            InMemoryWarehouse::new()
                .with_catalog(catalog())
                .with_breakdown(breakdown())
                .with_sales_rows(sales()),
        );
        let resp = svc.compliance(&BfComplianceRequest::default()).await.unwrap();
        assert_eq!(resp.periodo_texto, "Mes completo de noviembre");
        assert_eq!(resp.fecha_inicio, "2024-11-01");
        assert_eq!(resp.fecha_fin, "2024-12-01");
        assert_eq!(resp.resumen_general.total_skus, 2);
        assert_eq!(resp.grafico.ventas.last(), Some(&1000.0));

        let today = svc
            .compliance(&BfComplianceRequest {
                preset: BfPreset::Today,
                ..BfComplianceRequest::default()
            })
            .await
            .unwrap();
        assert!(today.skus_data.is_empty());
        assert_eq!(today.resumen_general, BfSummary::default());
    }

    #[tokio::test]
    async fn inventory_groups_stock_for_the_period() {
        let stock = |sku: &str, almacen: &str, cantidad| BfStockRow {
            sku: sku.into(),
            descripcion: String::new(),
            almacen: almacen.into(),
            cantidad_libre: cantidad,
        };
        let svc = service(
            InMemoryWarehouse::new()
                .with_catalog(catalog())
                .with_breakdown(breakdown())
                .with_inventory(vec![stock("A1", "ATS", 8.0), stock("B2", "MELI", 20.0)]),
        );

        let resp = svc.inventory(&BfComplianceRequest::default()).await.unwrap();
        assert_eq!(resp.periodo_texto, "Mes completo de noviembre");
        let names: Vec<_> = resp.grupos.iter().map(|g| g.nombre.as_str()).collect();
        assert_eq!(names, vec!["Relevante", "Remate"]);

        let relevant = &resp.grupos[0];
        assert_eq!(relevant.total_existencia, 8);
        // 10 individual units plus 5 inside combos
        assert_eq!(relevant.total_venta, 15);
        assert_eq!(relevant.productos[0].descripcion, "Catálogo A1");
        assert_eq!(resp.grupos[1].productos[0].almacenes[0].almacen, "Meli Full");

        let err = svc
            .inventory(&BfComplianceRequest {
                canal: "Coppel".into(),
                ..BfComplianceRequest::default()
            })
            .await
            .unwrap_err();
        assert!(matches!(err, DashboardError::Validation(_)));
    }

    #[tokio::test]
    async fn unknown_channel_is_rejected() {
        let svc = service(InMemoryWarehouse::unavailable("no debería consultarse"));
        let err = svc
            .compliance(&BfComplianceRequest {
                canal: "Coppel".into(),
                ..BfComplianceRequest::default()
            })
            .await
            .unwrap_err();
        assert!(matches!(err, DashboardError::Validation(_)));
    }

    #[tokio::test]
    async fn filter_options_dedupe_channels() {
        let mut blank = entry("D4", "  ", false, false);
        blank.categoria = " ".into();
        let mut catalog = catalog();
        catalog.push(blank);
        let svc = service(InMemoryWarehouse::new().with_catalog(catalog));

        let opts = svc.filter_options().await.unwrap();
        assert_eq!(opts.canales.len(), 7);
        assert!(opts.canales.contains(&"AliExpress".to_string()));
        assert_eq!(opts.categorias, vec!["Audio", "Video"]);
    }
}
