use contracts::dashboards::d411_bf_compliance::BfDailyChart;
use serde_json::{json, Value};

use crate::shared::chart_panel::ChartSpec;

const SALES_COLOR: &str = "#0d6efd";
const TARGET_COLOR: &str = "#dc3545";

const MONEY_TOOLTIP: &str = "\
    const v = ctx.parsed.y.toLocaleString('es-MX', {style: 'currency', currency: 'MXN'});\n\
    return ctx.dataset.label + ': ' + v;";

/// Cumulative daily sales, plus the target line when targets exist
pub fn daily_chart(chart: &BfDailyChart) -> ChartSpec {
    let mut datasets: Vec<Value> = vec![json!({
        "label": "Ventas acumuladas",
        "data": chart.ventas,
        "borderColor": SALES_COLOR,
        "backgroundColor": "rgba(13, 110, 253, 0.15)",
        "fill": true,
        "tension": 0.25,
    })];
    if !chart.metas.is_empty() {
        datasets.push(json!({
            "label": "Meta acumulada",
            "data": chart.metas,
            "borderColor": TARGET_COLOR,
            "borderDash": [6, 4],
            "fill": false,
            "pointRadius": 0,
        }));
    }

    ChartSpec {
        config: json!({
            "type": "line",
            "data": {"labels": chart.fechas, "datasets": datasets},
            "options": {
                "responsive": true,
                "maintainAspectRatio": false,
                "interaction": {"mode": "index", "intersect": false},
                "scales": {
                    "y": {"beginAtZero": true, "title": {"display": true, "text": "Ventas ($)"}},
                },
                "plugins": {"legend": {"position": "bottom"}},
            },
        }),
        tooltip_label: Some(MONEY_TOOLTIP.to_string()),
    }
}
