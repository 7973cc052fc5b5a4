//! Row filtering, snapshot reduction and per-group profitability metrics.

use contracts::dashboards::d410_positioning_matrix::{
    BrandFilter, EntityCount, MatrixMetrics, MatrixStats, Zone,
};
use std::collections::HashMap;

use crate::shared::config::ShareBasis;
use crate::shared::data::warehouse::SalesRow;

/// Category given to rows with a blank category
pub const UNCATEGORIZED: &str = "Sin Categoría";

/// Lower bound of the chart's vertical axis
const MIN_AXIS: f64 = 100.0;

/// Restrictions applied to the rows of one month.
///
/// Empty lists mean "no restriction".
#[derive(Debug, Clone, Default)]
pub struct RowFilter {
    /// Only rows dated on or before this day of the month
    pub max_day: Option<u32>,
    pub brand: BrandFilter,
    pub own_brand: String,
    /// Channels eligible at all (classification channels); `None` = every channel
    pub allowed_channels: Option<Vec<String>>,
    pub channels: Vec<String>,
    pub categories: Vec<String>,
    pub skus: Vec<String>,
}

impl RowFilter {
    /// Conditions that hold for every snapshot of a (SKU, channel)
    fn admits_source(&self, row: &SalesRow) -> bool {
        if row.is_cancelled() {
            return false;
        }
        if let Some(max_day) = self.max_day {
            if chrono::Datelike::day(&row.fecha) > max_day {
                return false;
            }
        }
        if let Some(allowed) = &self.allowed_channels {
            if !allowed.iter().any(|c| c == &row.canal) {
                return false;
            }
        }
        match self.brand {
            BrandFilter::Both => true,
            BrandFilter::Own => row.marca == self.own_brand,
            BrandFilter::Others => row.marca != self.own_brand,
        }
    }

    /// Conditions the user selected in the filter panel
    fn admits_selection(&self, row: &SalesRow) -> bool {
        let in_list = |list: &[String], value: &str| list.is_empty() || list.iter().any(|v| v == value);
        in_list(&self.channels, &row.canal)
            && in_list(&self.categories, &row.categoria)
            && in_list(&self.skus, &row.sku)
    }
}

/// Apply `filter` to a month of rows.
///
/// Cumulative sources carry one month-to-date snapshot per day, so only the
/// latest row of each (SKU, channel) survives before the selection filters.
pub fn prepare_rows(rows: Vec<SalesRow>, filter: &RowFilter, cumulative: bool) -> Vec<SalesRow> {
    let admitted: Vec<SalesRow> = rows
        .into_iter()
        .filter(|r| filter.admits_source(r))
        .map(normalize_category)
        .collect();

    let reduced = if cumulative {
        latest_per_sku_channel(admitted)
    } else {
        admitted
    };

    reduced
        .into_iter()
        .filter(|r| filter.admits_selection(r))
        .collect()
}

fn normalize_category(mut row: SalesRow) -> SalesRow {
    if row.categoria.trim().is_empty() {
        row.categoria = UNCATEGORIZED.to_string();
    }
    row
}

/// Keep the newest row per (SKU, channel). Ties keep the first row seen.
pub fn latest_per_sku_channel(rows: Vec<SalesRow>) -> Vec<SalesRow> {
    let mut index: HashMap<(String, String), usize> = HashMap::new();
    let mut latest: Vec<SalesRow> = Vec::new();

    for row in rows {
        let key = (row.sku.clone(), row.canal.clone());
        match index.get(&key) {
            Some(&i) => {
                if row.fecha > latest[i].fecha {
                    latest[i] = row;
                }
            }
            None => {
                index.insert(key, latest.len());
                latest.push(row);
            }
        }
    }
    latest
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupBy {
    Channel,
    ChannelCategory,
    SkuChannel,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum GroupKey {
    Channel(String),
    ChannelCategory { canal: String, categoria: String },
    SkuChannel { sku: String, canal: String },
}

impl GroupKey {
    fn of(row: &SalesRow, by: GroupBy) -> Self {
        match by {
            GroupBy::Channel => GroupKey::Channel(row.canal.clone()),
            GroupBy::ChannelCategory => GroupKey::ChannelCategory {
                canal: row.canal.clone(),
                categoria: row.categoria.clone(),
            },
            GroupBy::SkuChannel => GroupKey::SkuChannel {
                sku: row.sku.clone(),
                canal: row.canal.clone(),
            },
        }
    }

    pub fn canal(&self) -> &str {
        match self {
            GroupKey::Channel(canal)
            | GroupKey::ChannelCategory { canal, .. }
            | GroupKey::SkuChannel { canal, .. } => canal,
        }
    }
}

/// Summed money fields of a group of rows
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Totals {
    pub ventas: f64,
    pub costo_venta: f64,
    pub gastos_directos: f64,
    pub ingreso_real: f64,
    pub rows: u64,
}

impl Totals {
    pub fn add(&mut self, row: &SalesRow) {
        self.ventas += row.total;
        self.costo_venta += row.costo_venta;
        self.gastos_directos += row.gastos_directos;
        self.ingreso_real += row.ingreso_real;
        self.rows += 1;
    }

    pub fn merge(&mut self, other: &Totals) {
        self.ventas += other.ventas;
        self.costo_venta += other.costo_venta;
        self.gastos_directos += other.gastos_directos;
        self.ingreso_real += other.ingreso_real;
        self.rows += other.rows;
    }
}

#[derive(Debug, Clone)]
pub struct Group {
    pub key: GroupKey,
    /// First row of the group; descriptive fields (description, brand,
    /// classification) are read from it
    pub first: SalesRow,
    pub totals: Totals,
}

/// Group rows by `by`, keeping groups in order of first appearance
pub fn aggregate(rows: &[SalesRow], by: GroupBy) -> Vec<Group> {
    let mut index: HashMap<GroupKey, usize> = HashMap::new();
    let mut groups: Vec<Group> = Vec::new();

    for row in rows {
        let key = GroupKey::of(row, by);
        let i = match index.get(&key) {
            Some(&i) => i,
            None => {
                index.insert(key.clone(), groups.len());
                groups.push(Group {
                    key,
                    first: row.clone(),
                    totals: Totals::default(),
                });
                groups.len() - 1
            }
        };
        groups[i].totals.add(row);
    }
    groups
}

/// `numerator / denominator × 100`, zero when the denominator is not positive
pub fn pct(numerator: f64, denominator: f64) -> f64 {
    if denominator > 0.0 {
        numerator / denominator * 100.0
    } else {
        0.0
    }
}

pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// A group with its position on the matrix
#[derive(Debug, Clone)]
pub struct Scored {
    pub group: Group,
    pub income_pct: f64,
    pub roi_pct: f64,
    pub zone: Zone,
}

impl Scored {
    /// Display metrics, rounded to cents
    pub fn metrics(&self) -> MatrixMetrics {
        let t = &self.group.totals;
        MatrixMetrics {
            ingreso_real_pct: round2(self.income_pct),
            roi_pct: round2(self.roi_pct),
            ventas: round2(t.ventas),
            ingreso_real: round2(t.ingreso_real),
            costo_venta: round2(t.costo_venta),
            gastos_directos: round2(t.gastos_directos),
            num_transacciones: t.rows,
        }
    }
}

/// Position every group on the matrix. Zones use unrounded percentages.
pub fn score(groups: Vec<Group>, basis: ShareBasis) -> Vec<Scored> {
    let filtered_sales: f64 = groups.iter().map(|g| g.totals.ventas).sum();

    groups
        .into_iter()
        .map(|group| {
            let t = group.totals;
            let share_denominator = match basis {
                ShareBasis::FilteredSet => filtered_sales,
                ShareBasis::OwnSales => t.ventas,
            };
            let income_pct = pct(t.ingreso_real, share_denominator);
            let roi_pct = pct(t.ingreso_real, t.costo_venta);
            Scored {
                zone: Zone::classify(income_pct, roi_pct),
                group,
                income_pct,
                roi_pct,
            }
        })
        .collect()
}

/// Upper bound of the ROI axis: 10 % headroom over the largest ROI,
/// rounded up to a multiple of ten, never below 100
pub fn axis_max<I: IntoIterator<Item = f64>>(rois: I) -> f64 {
    let max_roi = rois
        .into_iter()
        .filter(|v| v.is_finite())
        .fold(f64::NEG_INFINITY, f64::max);
    if max_roi == f64::NEG_INFINITY {
        return MIN_AXIS;
    }
    // 200 × 1.1 is 220.00000000000003 in binary; trim the noise before ceil
    let steps = ((max_roi * 1.1 / 10.0) * 1e9).round() / 1e9;
    (steps.ceil() * 10.0).max(MIN_AXIS)
}

/// Summary statistics over the scored entities
pub fn stats(scored: &[Scored], total: EntityCount) -> MatrixStats {
    if scored.is_empty() {
        return MatrixStats::empty(total);
    }

    let mut sum = Totals::default();
    let (mut critico, mut eficiente, mut a_desarrollar, mut ideal) = (0, 0, 0, 0);
    for s in scored {
        sum.merge(&s.group.totals);
        match s.zone {
            Zone::Critical => critico += 1,
            Zone::Efficient => eficiente += 1,
            Zone::ToDevelop => a_desarrollar += 1,
            Zone::Ideal => ideal += 1,
        }
    }

    MatrixStats {
        total,
        ventas_totales: round2(sum.ventas),
        ingreso_real_total: round2(sum.ingreso_real),
        costo_total: round2(sum.costo_venta),
        ingreso_promedio: round2(pct(sum.ingreso_real, sum.ventas)),
        roi_promedio: round2(pct(sum.ingreso_real, sum.costo_venta)),
        critico,
        eficiente,
        a_desarrollar,
        ideal,
        eje_y_max: axis_max(scored.iter().map(|s| s.roi_pct)),
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use chrono::NaiveDate;

    pub(crate) fn row(day: u32, sku: &str, canal: &str, total: f64, costo: f64, ir: f64) -> SalesRow {
        SalesRow {
            fecha: NaiveDate::from_ymd_opt(2024, 10, day).unwrap(),
            sku: sku.into(),
            descripcion: format!("Producto {}", sku),
            marca: "Loomber".into(),
            categoria: "Audio".into(),
            canal: canal.into(),
            almacen: String::new(),
            estado: "Activo".into(),
            total,
            costo_venta: costo,
            gastos_directos: total - costo - ir,
            ingreso_real: ir,
            cantidad: 1.0,
            clasificacion: None,
        }
    }

    #[test]
    fn cancelled_rows_never_count() {
        let mut cancelled = row(1, "A1", "Walmart", 500.0, 100.0, 100.0);
        cancelled.estado = "Cancelado".into();
        let rows = vec![cancelled, row(1, "B2", "Walmart", 100.0, 50.0, 20.0)];

        let prepared = prepare_rows(rows, &RowFilter::default(), false);
        assert_eq!(prepared.len(), 1);
        assert_eq!(prepared[0].sku, "B2");
    }

    #[test]
    fn latest_snapshot_wins() {
        let rows = vec![
            row(3, "A1", "Walmart", 300.0, 100.0, 50.0),
            row(9, "A1", "Walmart", 900.0, 300.0, 150.0),
            row(5, "A1", "Shein", 50.0, 10.0, 5.0),
        ];
        let latest = latest_per_sku_channel(rows);
        assert_eq!(latest.len(), 2);
        assert_eq!(latest[0].total, 900.0);
        assert_eq!(latest[1].canal, "Shein");
    }

    #[test]
    fn max_day_cuts_snapshots_before_reduction() {
        let rows = vec![
            row(3, "A1", "Walmart", 300.0, 100.0, 50.0),
            row(9, "A1", "Walmart", 900.0, 300.0, 150.0),
        ];
        let filter = RowFilter {
            max_day: Some(5),
            ..RowFilter::default()
        };
        let prepared = prepare_rows(rows, &filter, true);
        assert_eq!(prepared.len(), 1);
        assert_eq!(prepared[0].total, 300.0);
    }

    #[test]
    fn brand_filter_splits_own_and_others() {
        let mut other = row(1, "B2", "Walmart", 100.0, 50.0, 20.0);
        other.marca = "Genérica".into();
        let rows = vec![row(1, "A1", "Walmart", 100.0, 50.0, 20.0), other];
        let filter = |brand| RowFilter {
            brand,
            own_brand: "Loomber".into(),
            ..RowFilter::default()
        };

        assert_eq!(prepare_rows(rows.clone(), &filter(BrandFilter::Own), false)[0].sku, "A1");
        assert_eq!(prepare_rows(rows.clone(), &filter(BrandFilter::Others), false)[0].sku, "B2");
        assert_eq!(prepare_rows(rows, &filter(BrandFilter::Both), false).len(), 2);
    }

    #[test]
    fn blank_category_becomes_uncategorized_and_is_selectable() {
        let mut blank = row(1, "A1", "Walmart", 100.0, 50.0, 20.0);
        blank.categoria = "  ".into();
        let filter = RowFilter {
            categories: vec![UNCATEGORIZED.to_string()],
            ..RowFilter::default()
        };
        let prepared = prepare_rows(vec![blank], &filter, true);
        assert_eq!(prepared.len(), 1);
        assert_eq!(prepared[0].categoria, UNCATEGORIZED);
    }

    #[test]
    fn allowed_channels_restrict_before_selection() {
        let rows = vec![
            row(1, "A1", "Walmart", 100.0, 50.0, 20.0),
            row(1, "A1", "Amazon", 100.0, 50.0, 20.0),
        ];
        let filter = RowFilter {
            allowed_channels: Some(vec!["Walmart".into()]),
            ..RowFilter::default()
        };
        let prepared = prepare_rows(rows, &filter, true);
        assert_eq!(prepared.len(), 1);
        assert_eq!(prepared[0].canal, "Walmart");
    }

    #[test]
    fn worked_example_lands_in_to_develop() {
        // sales 1000, cost 600, real income 200 => 20 % income, 33.3 % ROI
        let groups = aggregate(&[row(1, "A1", "Walmart", 1000.0, 600.0, 200.0)], GroupBy::Channel);
        let scored = score(groups, ShareBasis::FilteredSet);
        assert_eq!(scored[0].zone, Zone::ToDevelop);
        let m = scored[0].metrics();
        assert_eq!(m.ingreso_real_pct, 20.0);
        assert_eq!(m.roi_pct, 33.33);
    }

    #[test]
    fn share_uses_filtered_set_total_by_default() {
        let rows = vec![
            row(1, "A1", "Walmart", 750.0, 300.0, 150.0),
            row(1, "B2", "Shein", 250.0, 100.0, 50.0),
        ];
        let filtered = score(aggregate(&rows, GroupBy::Channel), ShareBasis::FilteredSet);
        assert_eq!(filtered[0].income_pct, 15.0);
        assert_eq!(filtered[1].income_pct, 5.0);

        let own = score(aggregate(&rows, GroupBy::Channel), ShareBasis::OwnSales);
        assert_eq!(own[0].income_pct, 20.0);
        assert_eq!(own[1].income_pct, 20.0);
    }

    #[test]
    fn zero_denominators_give_zero_percentages() {
        let scored = score(
            aggregate(&[row(1, "A1", "Walmart", 0.0, 0.0, 0.0)], GroupBy::Channel),
            ShareBasis::FilteredSet,
        );
        assert_eq!(scored[0].income_pct, 0.0);
        assert_eq!(scored[0].roi_pct, 0.0);
        assert_eq!(scored[0].zone, Zone::Critical);
    }

    #[test]
    fn aggregation_is_associative_over_partitions() {
        let rows = vec![
            row(1, "A1", "Walmart", 100.0, 40.0, 30.0),
            row(2, "A2", "Walmart", 300.0, 90.0, 60.0),
            row(3, "A3", "Shein", 50.0, 20.0, 10.0),
            row(4, "A4", "Walmart", 80.0, 30.0, 25.0),
        ];
        let whole = aggregate(&rows, GroupBy::Channel);

        let (left, right) = rows.split_at(2);
        let mut merged: HashMap<GroupKey, Totals> = HashMap::new();
        for g in aggregate(left, GroupBy::Channel)
            .into_iter()
            .chain(aggregate(right, GroupBy::Channel))
        {
            merged.entry(g.key).or_default().merge(&g.totals);
        }

        for g in whole {
            assert_eq!(merged[&g.key], g.totals);
        }
    }

    #[test]
    fn groups_by_channel_category_and_sku_channel() {
        let mut video = row(1, "A2", "Walmart", 10.0, 5.0, 2.0);
        video.categoria = "Video".into();
        let rows = vec![
            row(1, "A1", "Walmart", 10.0, 5.0, 2.0),
            video,
            row(1, "A1", "Shein", 10.0, 5.0, 2.0),
        ];
        assert_eq!(aggregate(&rows, GroupBy::Channel).len(), 2);
        assert_eq!(aggregate(&rows, GroupBy::ChannelCategory).len(), 3);
        let by_sku = aggregate(&rows, GroupBy::SkuChannel);
        assert_eq!(by_sku.len(), 3);
        assert_eq!(by_sku[0].key.canal(), "Walmart");
    }

    #[test]
    fn axis_max_has_floor_and_headroom() {
        assert_eq!(axis_max(Vec::<f64>::new()), 100.0);
        assert_eq!(axis_max(vec![50.0, -20.0]), 100.0);
        assert_eq!(axis_max(vec![95.0]), 110.0);
        assert_eq!(axis_max(vec![100.0]), 110.0);
        assert_eq!(axis_max(vec![200.0]), 220.0);
        assert_eq!(axis_max(vec![f64::NAN, 150.0]), 170.0);
    }

    #[test]
    fn empty_input_gives_zero_statistics() {
        let scored = score(aggregate(&[], GroupBy::Channel), ShareBasis::FilteredSet);
        let s = stats(&scored, EntityCount::Channels(0));
        assert_eq!(s, MatrixStats::empty(EntityCount::Channels(0)));
        assert_eq!(s.ventas_totales, 0.0);
        assert_eq!(s.eje_y_max, 100.0);
    }

    #[test]
    fn stats_use_totals_and_count_zones() {
        let rows = vec![
            row(1, "A1", "Walmart", 1000.0, 600.0, 200.0),
            row(1, "B2", "Shein", 1000.0, 100.0, 100.0),
        ];
        let scored = score(aggregate(&rows, GroupBy::Channel), ShareBasis::OwnSales);
        let s = stats(&scored, EntityCount::Channels(2));
        assert_eq!(s.ventas_totales, 2000.0);
        assert_eq!(s.ingreso_real_total, 300.0);
        assert_eq!(s.ingreso_promedio, 15.0);
        assert_eq!(s.roi_promedio, round2(300.0 / 700.0 * 100.0));
        assert_eq!(s.a_desarrollar, 1);
        assert_eq!(s.eficiente, 1);
        assert_eq!(s.eje_y_max, 110.0);
    }
}
