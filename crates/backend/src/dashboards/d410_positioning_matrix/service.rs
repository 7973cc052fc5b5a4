use anyhow::Result;
use chrono::Datelike;
use contracts::dashboards::d410_positioning_matrix::{
    normalize_channels, CategoryMatrixRequest, CategoryMatrixResponse, CategorySummary,
    ChannelMatrixRequest, ChannelMatrixResponse, ChannelSummary, EntityCount,
    FilterOptionsResponse, MatrixStats, MonthOption, SkuListItem, SkuListRequest,
    SkuMatrixRequest, SkuMatrixResponse, SkuSummary, TrendRequest, TrendResponse,
};
use contracts::shared::YearMonth;
use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;

use super::aggregator::{self, GroupBy, GroupKey, RowFilter, Scored, UNCATEGORIZED};
use super::channels;
use super::chart::{self, SkuTooltip};
use super::comparator::{self, MonthResult};
use crate::shared::clock::Clock;
use crate::shared::config::{MatrixConfig, ShareBasis};
use crate::shared::data::warehouse::{MonthlyDataLoader, SalesRow};
use crate::shared::error::DashboardError;

/// Months offered in the month selector, current month included
const SELECTABLE_MONTHS: i32 = 6;

/// Positioning matrix computations over an injected monthly loader
#[derive(Clone)]
pub struct MatrixService {
    loader: Arc<dyn MonthlyDataLoader>,
    config: MatrixConfig,
    cumulative: bool,
    clock: Clock,
}

impl MatrixService {
    pub fn new(
        loader: Arc<dyn MonthlyDataLoader>,
        config: MatrixConfig,
        cumulative: bool,
        clock: Clock,
    ) -> Self {
        Self {
            loader,
            config,
            cumulative,
            clock,
        }
    }

    pub fn current_month(&self) -> YearMonth {
        YearMonth::from_date(self.clock.today())
    }

    fn month_or_current(&self, mes: Option<YearMonth>) -> YearMonth {
        mes.unwrap_or_else(|| self.current_month())
    }

    async fn load(&self, month: YearMonth) -> Result<Vec<SalesRow>> {
        let rows = self.loader.load_accumulated_monthly(month).await?;
        tracing::debug!("Loaded {} rows for {}", rows.len(), month);
        Ok(rows)
    }

    /// Channel matrix for the classification channels
    pub async fn channel_matrix(&self, req: &ChannelMatrixRequest) -> Result<ChannelMatrixResponse> {
        let month = self.month_or_current(req.mes);
        let filter = RowFilter {
            brand: req.marca,
            own_brand: self.config.own_brand.clone(),
            allowed_channels: Some(self.config.classification_channels.clone()),
            ..RowFilter::default()
        };
        let rows = aggregator::prepare_rows(self.load(month).await?, &filter, self.cumulative);
        Ok(build_channel_matrix(&rows, self.config.share_basis))
    }

    /// Channel + category matrix for the classification channels
    pub async fn category_matrix(
        &self,
        req: &CategoryMatrixRequest,
    ) -> Result<CategoryMatrixResponse> {
        let month = self.month_or_current(req.mes);
        let filter = RowFilter {
            allowed_channels: Some(self.config.classification_channels.clone()),
            channels: normalize_channels(&req.canales),
            categories: clean_list(&req.categorias),
            ..RowFilter::default()
        };
        let rows = aggregator::prepare_rows(self.load(month).await?, &filter, self.cumulative);
        Ok(build_category_matrix(&rows, self.config.share_basis))
    }

    /// SKU matrix; an empty SKU selection gives an empty matrix without a query
    pub async fn sku_matrix(&self, req: &SkuMatrixRequest) -> Result<SkuMatrixResponse> {
        let skus = clean_list(&req.skus);
        if skus.is_empty() {
            return Ok(build_sku_matrix(&[], self.config.share_basis));
        }
        let month = self.month_or_current(req.mes);
        let rows = self.sku_rows(month, &req.canales, skus, None).await?;
        Ok(build_sku_matrix(&rows, self.config.share_basis))
    }

    async fn sku_rows(
        &self,
        month: YearMonth,
        canales: &[String],
        skus: Vec<String>,
        max_day: Option<u32>,
    ) -> Result<Vec<SalesRow>> {
        let filter = RowFilter {
            max_day,
            channels: normalize_channels(canales),
            skus,
            ..RowFilter::default()
        };
        Ok(aggregator::prepare_rows(self.load(month).await?, &filter, self.cumulative))
    }

    /// SKUs with sales in the month, best classification first
    pub async fn sku_list(&self, req: &SkuListRequest) -> Result<Vec<SkuListItem>> {
        let month = self.month_or_current(req.mes);
        let rows = self.load(month).await?;
        Ok(build_sku_list(rows))
    }

    /// SKU positions in the reference month and the two months before it
    pub async fn compare_three_months(
        &self,
        req: &TrendRequest,
    ) -> Result<TrendResponse, DashboardError> {
        let skus = clean_list(&req.skus);
        let (Some(current), false) = (req.mes, skus.is_empty()) else {
            return Err(DashboardError::validation("Se requiere mes y SKUs"));
        };
        let (Some(previous), Some(oldest)) = (current.checked_shift(-1), current.checked_shift(-2))
        else {
            return Err(DashboardError::validation(format!(
                "Mes fuera de rango: {}",
                current.as_yyyymm()
            )));
        };

        // Partial current month: compare the same day window in every month
        let today = self.clock.today();
        let max_day = (YearMonth::from_date(today) == current).then(|| today.day());
        if let Some(day) = max_day {
            tracing::info!("Comparing days 1-{} of {}, {} and {}", day, oldest, previous, current);
        }

        let (rows_oldest, rows_previous, rows_current) = tokio::try_join!(
            self.sku_rows(oldest, &req.canales, skus.clone(), max_day),
            self.sku_rows(previous, &req.canales, skus.clone(), max_day),
            self.sku_rows(current, &req.canales, skus.clone(), max_day),
        )?;

        let months = [
            (oldest, rows_oldest),
            (previous, rows_previous),
            (current, rows_current),
        ]
        .into_iter()
        .map(|(month, rows)| {
            let matrix = build_sku_matrix(&rows, self.config.share_basis);
            MonthResult {
                month,
                skus: matrix.skus,
                stats: matrix.estadisticas,
            }
        })
        .collect();

        Ok(comparator::build_trend(months))
    }

    /// Month selector, channel list and categories of the current month
    pub async fn filter_options(&self) -> Result<FilterOptionsResponse> {
        let current = self.current_month();
        let meses_disponibles = (0..SELECTABLE_MONTHS)
            .filter_map(|i| current.checked_shift(-i))
            .map(|m| MonthOption {
                valor: m,
                nombre: m.name_es().to_string(),
                anio: m.year(),
            })
            .collect();

        let mut canales_disponibles = self.config.classification_channels.clone();
        canales_disponibles.sort();

        let categorias_disponibles: Vec<String> = self
            .load(current)
            .await?
            .iter()
            .map(|r| r.categoria.trim())
            .filter(|c| !c.is_empty() && *c != UNCATEGORIZED)
            .map(str::to_string)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();

        Ok(FilterOptionsResponse {
            mes_actual: current,
            meses_disponibles,
            canales_disponibles,
            categorias_disponibles,
        })
    }
}

fn clean_list(values: &[String]) -> Vec<String> {
    values
        .iter()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .collect()
}

fn sales_bounds(scored: &[Scored]) -> (f64, f64) {
    chart::sales_range(scored.iter().map(|s| s.group.totals.ventas))
}

fn by_income_desc(a: &Scored, b: &Scored) -> std::cmp::Ordering {
    b.group
        .totals
        .ingreso_real
        .total_cmp(&a.group.totals.ingreso_real)
}

pub fn build_channel_matrix(rows: &[SalesRow], basis: ShareBasis) -> ChannelMatrixResponse {
    let mut scored = aggregator::score(aggregator::aggregate(rows, GroupBy::Channel), basis);
    let estadisticas = aggregator::stats(&scored, EntityCount::Channels(scored.len()));
    let (min, max) = sales_bounds(&scored);

    let mut datasets: Vec<_> = scored
        .iter()
        .map(|s| {
            let canal = s.group.key.canal();
            let m = s.metrics();
            chart::channel_dataset(
                canal,
                m.ingreso_real_pct,
                m.roi_pct,
                chart::bubble_radius(s.group.totals.ventas, min, max),
                channels::color(canal),
            )
        })
        .collect();
    chart::sort_small_first(&mut datasets);

    scored.sort_by(by_income_desc);
    let canales = scored
        .iter()
        .map(|s| {
            let canal = s.group.key.canal();
            ChannelSummary {
                canal: canal.to_string(),
                canal_abrev: channels::abbreviation(canal),
                color_canal: channels::color(canal).to_string(),
                metricas: s.metrics(),
                zona: s.zone.badge(),
            }
        })
        .collect();

    ChannelMatrixResponse {
        datasets,
        canales,
        estadisticas,
    }
}

pub fn build_category_matrix(rows: &[SalesRow], basis: ShareBasis) -> CategoryMatrixResponse {
    let mut scored = aggregator::score(aggregator::aggregate(rows, GroupBy::ChannelCategory), basis);
    let estadisticas = aggregator::stats(&scored, EntityCount::Categories(scored.len()));
    let (min, max) = sales_bounds(&scored);

    let label_of = |s: &Scored| -> (String, String) {
        let categoria = match &s.group.key {
            GroupKey::ChannelCategory { categoria, .. } => categoria.clone(),
            _ => s.group.first.categoria.clone(),
        };
        let label = format!("{} - {}", channels::abbreviation(s.group.key.canal()), categoria);
        (categoria, label)
    };

    let mut datasets: Vec<_> = scored
        .iter()
        .map(|s| {
            let m = s.metrics();
            chart::category_dataset(
                label_of(s).1,
                m.ingreso_real_pct,
                m.roi_pct,
                chart::marker_size(s.group.totals.ventas, min, max),
                channels::color(s.group.key.canal()),
            )
        })
        .collect();
    chart::sort_small_first(&mut datasets);

    // Channels with more real income first, then categories within the channel
    let mut channel_income: HashMap<String, f64> = HashMap::new();
    for s in &scored {
        *channel_income.entry(s.group.key.canal().to_string()).or_default() +=
            s.group.totals.ingreso_real;
    }
    scored.sort_by(|a, b| {
        let ca = channel_income[a.group.key.canal()];
        let cb = channel_income[b.group.key.canal()];
        cb.total_cmp(&ca)
            .then_with(|| a.group.key.canal().cmp(b.group.key.canal()))
            .then_with(|| by_income_desc(a, b))
    });

    let categorias = scored
        .iter()
        .map(|s| {
            let canal = s.group.key.canal();
            let (categoria, label) = label_of(s);
            CategorySummary {
                canal: canal.to_string(),
                canal_abrev: channels::abbreviation(canal),
                color_canal: channels::color(canal).to_string(),
                categoria,
                label,
                metricas: s.metrics(),
                zona: s.zone.badge(),
            }
        })
        .collect();

    CategoryMatrixResponse {
        datasets,
        categorias,
        estadisticas,
    }
}

pub fn build_sku_matrix(rows: &[SalesRow], basis: ShareBasis) -> SkuMatrixResponse {
    let mut scored = aggregator::score(aggregator::aggregate(rows, GroupBy::SkuChannel), basis);
    if scored.is_empty() {
        return SkuMatrixResponse {
            datasets: Vec::new(),
            skus: Vec::new(),
            estadisticas: MatrixStats::empty(EntityCount::Skus(0)),
        };
    }
    let estadisticas = aggregator::stats(&scored, EntityCount::Skus(scored.len()));
    let (min, max) = sales_bounds(&scored);

    let mut datasets: Vec<_> = scored
        .iter()
        .map(|s| {
            let first = &s.group.first;
            let canal = s.group.key.canal();
            let m = s.metrics();
            chart::sku_dataset(
                format!("{} - {}", channels::abbreviation(canal), first.sku),
                m.ingreso_real_pct,
                m.roi_pct,
                chart::bubble_radius(s.group.totals.ventas, min, max),
                channels::color(canal),
                SkuTooltip {
                    sku: first.sku.clone(),
                    canal: canal.to_string(),
                    descripcion: first.descripcion.clone(),
                    clasificacion: channels::normalize_classification(first.clasificacion.as_deref()),
                    ventas: m.ventas,
                    ingreso_real: m.ingreso_real,
                },
            )
        })
        .collect();
    chart::sort_small_first(&mut datasets);

    scored.sort_by(by_income_desc);
    let skus = scored
        .iter()
        .map(|s| {
            let first = &s.group.first;
            let canal = s.group.key.canal();
            let clasificacion = channels::normalize_classification(first.clasificacion.as_deref());
            SkuSummary {
                sku: first.sku.clone(),
                descripcion: first.descripcion.clone(),
                marca: first.marca.clone(),
                categoria: first.categoria.clone(),
                canal: canal.to_string(),
                canal_abrev: channels::abbreviation(canal),
                color_canal: channels::color(canal).to_string(),
                color_clasificacion: channels::classification_color(&clasificacion).to_string(),
                clasificacion,
                metricas: s.metrics(),
                zona: s.zone.badge(),
            }
        })
        .collect();

    SkuMatrixResponse {
        datasets,
        skus,
        estadisticas,
    }
}

/// One entry per SKU from its latest non-cancelled row
pub fn build_sku_list(rows: Vec<SalesRow>) -> Vec<SkuListItem> {
    let mut latest: HashMap<String, SalesRow> = HashMap::new();
    for row in rows.into_iter().filter(|r| !r.is_cancelled()) {
        match latest.get(&row.sku) {
            Some(existing) if existing.fecha >= row.fecha => {}
            _ => {
                latest.insert(row.sku.clone(), row);
            }
        }
    }

    let mut items: Vec<SkuListItem> = latest
        .into_values()
        .map(|r| SkuListItem {
            clasificacion: channels::normalize_classification(r.clasificacion.as_deref()),
            sku: r.sku,
            descripcion: r.descripcion,
        })
        .collect();
    items.sort_by(|a, b| {
        channels::classification_rank(&a.clasificacion)
            .cmp(&channels::classification_rank(&b.clasificacion))
            .then_with(|| a.sku.cmp(&b.sku))
    });
    items
}
