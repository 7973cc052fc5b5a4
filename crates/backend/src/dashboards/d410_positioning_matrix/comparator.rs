//! Three-month comparison of SKU positions.

use contracts::dashboards::d410_positioning_matrix::{
    EntityCount, MatrixStats, PointStyle, SkuSummary, SkuTrendRow, Trend, TrendDataset, TrendPoint,
    TrendResponse, TrendSummary,
};
use contracts::shared::YearMonth;
use std::collections::HashMap;

use super::aggregator::axis_max;

/// Change in income share (points) that counts as a move
const INCOME_DELTA: f64 = 2.0;
/// Change in ROI (points) that counts as a move
const ROI_DELTA: f64 = 5.0;
const TREND_POINT_RADIUS: f64 = 6.0;
/// An entity needs this many months with data to get a trend
const MIN_MONTHS: usize = 2;

/// SKU matrix computed for one of the compared months
#[derive(Debug, Clone)]
pub struct MonthResult {
    pub month: YearMonth,
    pub skus: Vec<SkuSummary>,
    pub stats: MatrixStats,
}

struct Entity {
    first: SkuSummary,
    points: Vec<Option<TrendPoint>>,
}

fn trend_point(s: &SkuSummary) -> TrendPoint {
    TrendPoint {
        x: s.metricas.ingreso_real_pct,
        y: s.metricas.roi_pct,
        ingreso_real: s.metricas.ingreso_real,
        ventas: s.metricas.ventas,
        clasificacion: s.clasificacion.clone(),
        zona: s.zona.clone(),
    }
}

/// Compare the first and last available points
pub fn trend_between(first: &TrendPoint, last: &TrendPoint) -> Trend {
    let d_income = last.x - first.x;
    let d_roi = last.y - first.y;
    if d_income > INCOME_DELTA || d_roi > ROI_DELTA {
        Trend::Improved
    } else if d_income < -INCOME_DELTA || d_roi < -ROI_DELTA {
        Trend::Worsened
    } else {
        Trend::Stable
    }
}

/// Build the comparison from month results ordered oldest first.
///
/// Every dataset has one slot per month; a month without data for the
/// entity is `None`. Entities with fewer than two months are dropped.
pub fn build_trend(months: Vec<MonthResult>) -> TrendResponse {
    let slots = months.len();
    let mut index: HashMap<(String, String), usize> = HashMap::new();
    let mut entities: Vec<Entity> = Vec::new();

    for (slot, month) in months.iter().enumerate() {
        for s in &month.skus {
            let key = (s.sku.clone(), s.canal.clone());
            let i = *index.entry(key).or_insert_with(|| {
                entities.push(Entity {
                    first: s.clone(),
                    points: vec![None; slots],
                });
                entities.len() - 1
            });
            entities[i].points[slot] = Some(trend_point(s));
        }
    }

    let mut datasets = Vec::new();
    let mut rows = Vec::new();
    let mut resumen = TrendSummary::default();

    for entity in entities {
        let present: Vec<&TrendPoint> = entity.points.iter().flatten().collect();
        if present.len() < MIN_MONTHS {
            continue;
        }
        let tendencia = trend_between(present[0], present[present.len() - 1]);
        match tendencia {
            Trend::Improved => resumen.mejoraron += 1,
            Trend::Stable => resumen.estable += 1,
            Trend::Worsened => resumen.empeoraron += 1,
        }

        let s = &entity.first;
        datasets.push(TrendDataset {
            label: format!("{} - {}", s.canal_abrev, s.sku),
            data: entity.points.clone(),
            border_color: s.color_canal.clone(),
            background_color: s.color_canal.clone(),
            show_line: true,
            span_gaps: true,
            fill: false,
            point_radius: TREND_POINT_RADIUS,
            point_style: PointStyle::Cross,
            sku: s.sku.clone(),
            canal: s.canal.clone(),
            descripcion: s.descripcion.clone(),
        });
        rows.push(SkuTrendRow {
            sku: s.sku.clone(),
            canal: s.canal.clone(),
            canal_abrev: s.canal_abrev.clone(),
            color_canal: s.color_canal.clone(),
            descripcion: s.descripcion.clone(),
            meses_data: entity.points,
            tendencia,
        });
    }

    let eje_y_max = axis_max(
        datasets
            .iter()
            .flat_map(|d| d.data.iter().flatten().map(|p| p.y)),
    );

    let meses: Vec<YearMonth> = months.iter().map(|m| m.month).collect();
    let meses_labels = meses
        .iter()
        .map(|m| m.short_label_es().to_string())
        .collect();

    let mut estadisticas = match months.into_iter().last() {
        Some(current) => current.stats,
        None => MatrixStats::empty(EntityCount::Skus(0)),
    };
    estadisticas.eje_y_max = eje_y_max;

    TrendResponse {
        datasets,
        skus: rows,
        meses,
        meses_labels,
        resumen,
        estadisticas,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use contracts::dashboards::d410_positioning_matrix::{MatrixMetrics, ZoneBadge};

    fn summary(sku: &str, canal: &str, income: f64, roi: f64) -> SkuSummary {
        SkuSummary {
            sku: sku.into(),
            descripcion: format!("Producto {}", sku),
            marca: "Loomber".into(),
            categoria: "Audio".into(),
            canal: canal.into(),
            canal_abrev: "WM".into(),
            color_canal: "#0071CE".into(),
            clasificacion: "Estrellas".into(),
            color_clasificacion: "#FFD700".into(),
            metricas: MatrixMetrics {
                ingreso_real_pct: income,
                roi_pct: roi,
                ventas: 100.0,
                ingreso_real: 10.0,
                ..MatrixMetrics::default()
            },
            zona: ZoneBadge::for_point(income, roi),
        }
    }

    fn month(m: u32, skus: Vec<SkuSummary>) -> MonthResult {
        let n = skus.len();
        MonthResult {
            month: YearMonth::new(2024, m).unwrap(),
            skus,
            stats: MatrixStats::empty(EntityCount::Skus(n)),
        }
    }

    fn point(x: f64, y: f64) -> TrendPoint {
        trend_point(&summary("A1", "Walmart", x, y))
    }

    #[test]
    fn trend_thresholds() {
        assert_eq!(trend_between(&point(10.0, 30.0), &point(12.5, 30.0)), Trend::Improved);
        assert_eq!(trend_between(&point(10.0, 30.0), &point(10.0, 35.5)), Trend::Improved);
        assert_eq!(trend_between(&point(10.0, 30.0), &point(7.5, 30.0)), Trend::Worsened);
        assert_eq!(trend_between(&point(10.0, 30.0), &point(10.0, 24.0)), Trend::Worsened);
        assert_eq!(trend_between(&point(10.0, 30.0), &point(12.0, 35.0)), Trend::Stable);
        // improvement on one axis wins over a drop on the other
        assert_eq!(trend_between(&point(10.0, 30.0), &point(13.0, 10.0)), Trend::Improved);
    }

    #[test]
    fn missing_middle_month_is_a_null_slot() {
        let resp = build_trend(vec![
            month(8, vec![summary("A1", "Walmart", 10.0, 30.0)]),
            month(9, vec![]),
            month(10, vec![summary("A1", "Walmart", 15.0, 30.0)]),
        ]);

        assert_eq!(resp.datasets.len(), 1);
        let data = &resp.datasets[0].data;
        assert_eq!(data.len(), 3);
        assert!(data[0].is_some() && data[1].is_none() && data[2].is_some());
        assert_eq!(resp.skus[0].tendencia, Trend::Improved);
        assert_eq!(resp.resumen.mejoraron, 1);
        assert_eq!(resp.meses_labels, vec!["Ago", "Sep", "Oct"]);

        let json = serde_json::to_value(&resp.datasets[0]).unwrap();
        assert!(json["data"][1].is_null());
        assert_eq!(json["showLine"], true);
        assert_eq!(json["_sku"], "A1");
    }

    #[test]
    fn single_month_entities_are_dropped() {
        let resp = build_trend(vec![
            month(8, vec![summary("A1", "Walmart", 10.0, 30.0)]),
            month(9, vec![summary("B2", "Walmart", 10.0, 30.0)]),
            month(10, vec![summary("A1", "Walmart", 10.0, 30.0)]),
        ]);
        assert_eq!(resp.skus.len(), 1);
        assert_eq!(resp.skus[0].sku, "A1");
        assert_eq!(resp.resumen.estable, 1);
    }

    #[test]
    fn same_sku_in_two_channels_is_two_entities() {
        let resp = build_trend(vec![
            month(8, vec![summary("A1", "Walmart", 10.0, 30.0), summary("A1", "Shein", 10.0, 30.0)]),
            month(9, vec![summary("A1", "Walmart", 10.0, 20.0), summary("A1", "Shein", 10.0, 30.0)]),
            month(10, vec![]),
        ]);
        assert_eq!(resp.skus.len(), 2);
        assert_eq!(resp.resumen.empeoraron, 1);
        assert_eq!(resp.resumen.estable, 1);
    }

    #[test]
    fn axis_spans_all_months_and_stats_come_from_current() {
        let resp = build_trend(vec![
            month(8, vec![summary("A1", "Walmart", 10.0, 250.0)]),
            month(9, vec![summary("A1", "Walmart", 10.0, 30.0)]),
            month(10, vec![summary("A1", "Walmart", 10.0, 30.0), summary("C3", "Walmart", 1.0, 1.0)]),
        ]);
        assert_eq!(resp.estadisticas.eje_y_max, 280.0);
        assert_eq!(resp.estadisticas.total, EntityCount::Skus(2));
    }
}
