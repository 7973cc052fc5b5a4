//! Chart.js configurations for the matrix charts.
//!
//! Configs are plain JSON; tooltip callbacks are JS function bodies attached
//! by `ChartPanel` after conversion.

use contracts::dashboards::d410_positioning_matrix::zone::{INCOME_THRESHOLD, ROI_THRESHOLD};
use contracts::dashboards::d410_positioning_matrix::{ChartDataset, TrendDataset};
use serde_json::{json, Value};

use crate::shared::chart_panel::ChartSpec;

/// The income axis always shows at least 0..50
const INCOME_AXIS_SUGGESTED_MAX: f64 = 50.0;
const THRESHOLD_COLOR: &str = "rgba(108, 117, 125, 0.8)";

/// Dashed line marking a zone threshold; `_umbral` keeps it out of tooltips
fn threshold_line(label: &str, from: (f64, f64), to: (f64, f64)) -> Value {
    json!({
        "type": "line",
        "label": label,
        "data": [{"x": from.0, "y": from.1}, {"x": to.0, "y": to.1}],
        "borderColor": THRESHOLD_COLOR,
        "borderWidth": 1,
        "borderDash": [6, 4],
        "pointRadius": 0,
        "pointHoverRadius": 0,
        "fill": false,
        "_umbral": true,
    })
}

fn threshold_lines(y_max: f64, x_max: f64) -> [Value; 2] {
    [
        threshold_line(
            &format!("Umbral ingreso {}%", INCOME_THRESHOLD),
            (INCOME_THRESHOLD, 0.0),
            (INCOME_THRESHOLD, y_max),
        ),
        threshold_line(
            &format!("Umbral ROI {}%", ROI_THRESHOLD),
            (0.0, ROI_THRESHOLD),
            (x_max, ROI_THRESHOLD),
        ),
    ]
}

/// Right end of the ROI threshold line: the axis' visible extent
fn income_extent<'a>(xs: impl Iterator<Item = &'a f64>) -> f64 {
    xs.copied()
        .filter(|x| x.is_finite())
        .fold(INCOME_AXIS_SUGGESTED_MAX, f64::max)
}

fn options(y_max: f64) -> Value {
    json!({
        "responsive": true,
        "maintainAspectRatio": false,
        "animation": {"duration": 300},
        "scales": {
            "x": {
                "type": "linear",
                "min": 0,
                "suggestedMax": INCOME_AXIS_SUGGESTED_MAX,
                "title": {"display": true, "text": "Ingreso Real (%)"},
            },
            "y": {
                "type": "linear",
                "min": 0,
                "max": y_max,
                "title": {"display": true, "text": "ROI (%)"},
            },
        },
        "plugins": {
            "legend": {"position": "bottom", "labels": {"usePointStyle": true}},
            "tooltip": {"enabled": true},
        },
    })
}

fn with_thresholds(mut datasets: Vec<Value>, y_max: f64, x_max: f64) -> Vec<Value> {
    datasets.extend(threshold_lines(y_max, x_max));
    datasets
}

const ENTITY_TOOLTIP: &str = "\
    return ctx.dataset.label + ': Ingreso ' + ctx.parsed.x.toFixed(2) + '%, ROI ' + ctx.parsed.y.toFixed(2) + '%';";

const SKU_TOOLTIP: &str = "\
    const d = ctx.dataset;\n\
    const ventas = (d._ventas || 0).toLocaleString('es-MX', {style: 'currency', currency: 'MXN'});\n\
    return [d._sku + ' (' + d._canal + ')', d._descripcion || '', 'Clasificación: ' + (d._clasificacion || ''),\n\
        'Ingreso ' + ctx.parsed.x.toFixed(2) + '%, ROI ' + ctx.parsed.y.toFixed(2) + '%', 'Ventas ' + ventas];";

/// Bubble chart of channels or channel-category pairs
pub fn bubble_chart(datasets: &[ChartDataset], y_max: f64) -> ChartSpec {
    let x_max = income_extent(datasets.iter().flat_map(|d| d.data.iter().map(|p| &p.x)));
    let entities = datasets.iter().map(|d| json!(d)).collect();
    ChartSpec {
        config: json!({
            "type": "bubble",
            "data": {"datasets": with_thresholds(entities, y_max, x_max)},
            "options": options(y_max),
        }),
        tooltip_label: Some(ENTITY_TOOLTIP.to_string()),
    }
}

/// Scatter chart of SKU-channel points, styled by sales classification
pub fn sku_scatter_chart(datasets: &[ChartDataset], y_max: f64) -> ChartSpec {
    let x_max = income_extent(datasets.iter().flat_map(|d| d.data.iter().map(|p| &p.x)));
    let entities = datasets.iter().map(|d| json!(d)).collect();
    ChartSpec {
        config: json!({
            "type": "scatter",
            "data": {"datasets": with_thresholds(entities, y_max, x_max)},
            "options": options(y_max),
        }),
        tooltip_label: Some(SKU_TOOLTIP.to_string()),
    }
}

/// Lines through three months per SKU-channel; `null` months leave a gap
/// that `spanGaps` bridges
pub fn trend_chart(datasets: &[TrendDataset], month_labels: &[String], y_max: f64) -> ChartSpec {
    let x_max = income_extent(
        datasets
            .iter()
            .flat_map(|d| d.data.iter().flatten().map(|p| &p.x)),
    );
    let lines = datasets.iter().map(|d| json!(d)).collect();
    let labels = json!(month_labels).to_string();
    let tooltip_label = format!(
        "const d = ctx.dataset;\n\
         const labels = {labels};\n\
         const p = ctx.raw || {{}};\n\
         return [d._sku + ' (' + d._canal + ') ' + (labels[ctx.dataIndex] || ''),\n\
             'Ingreso ' + ctx.parsed.x.toFixed(2) + '%, ROI ' + ctx.parsed.y.toFixed(2) + '%',\n\
             'Zona: ' + (p.zona || '') + ', Clasificación: ' + (p.clasificacion || '')];"
    );
    ChartSpec {
        config: json!({
            "type": "scatter",
            "data": {"datasets": with_thresholds(lines, y_max, x_max)},
            "options": options(y_max),
        }),
        tooltip_label: Some(tooltip_label),
    }
}
