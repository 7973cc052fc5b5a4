use contracts::dashboards::d410_positioning_matrix::{Trend, TrendPoint, TrendResponse};
use leptos::prelude::*;

use super::widgets::ZoneCell;
use crate::dashboards::d410_positioning_matrix::chart_config::trend_chart;
use crate::shared::chart_panel::ChartPanel;
use crate::shared::format::{money, percent};
use crate::shared::modal::ZoomRequest;

fn trend_marker(trend: Trend) -> (&'static str, &'static str) {
    match trend {
        Trend::Improved => ("⬆️ Mejoró", "trend trend--up"),
        Trend::Stable => ("➡️ Estable", "trend trend--flat"),
        Trend::Worsened => ("⬇️ Empeoró", "trend trend--down"),
    }
}

fn month_cell(point: Option<TrendPoint>) -> impl IntoView {
    match point {
        Some(p) => view! {
            <td class="trend-cell">
                <ZoneCell badge=p.zona />
                <div class="trend-cell__figures">
                    {format!("{} / {}", percent(p.x), percent(p.y))}
                </div>
                <div class="trend-cell__sales">{money(p.ventas)}</div>
            </td>
        }
        .into_any(),
        None => view! { <td class="trend-cell trend-cell--empty">"Sin ventas"</td> }.into_any(),
    }
}

/// Three-month evolution of the selected SKUs
#[component]
pub fn ComparisonPanel(
    #[prop(into)] data: Signal<Option<TrendResponse>>,
    zoom: RwSignal<Option<ZoomRequest>>,
) -> impl IntoView {
    let spec = Memo::new(move |_| {
        data.with(|d| {
            d.as_ref().map(|r| {
                trend_chart(&r.datasets, &r.meses_labels, r.estadisticas.eje_y_max)
            })
        })
    });

    view! {
        <Show when=move || data.with(|d| d.is_some())>
            <section class="panel panel--comparison">
                <div class="panel__header">
                    <h2>"Comparación de 3 meses"</h2>
                </div>
                {move || {
                    data.get().map(|r| {
                        view! {
                            <div class="stat-cards">
                                <div class="stat-card trend--up">
                                    <div class="stat-card__value">{r.resumen.mejoraron}</div>
                                    <div class="stat-card__label">"Mejoraron"</div>
                                </div>
                                <div class="stat-card trend--flat">
                                    <div class="stat-card__value">{r.resumen.estable}</div>
                                    <div class="stat-card__label">"Estables"</div>
                                </div>
                                <div class="stat-card trend--down">
                                    <div class="stat-card__value">{r.resumen.empeoraron}</div>
                                    <div class="stat-card__label">"Empeoraron"</div>
                                </div>
                            </div>
                        }
                    })
                }}
                <ChartPanel canvas_id="chart-comparacion" title="Evolución ingreso real vs ROI" spec=spec zoom=zoom />
                <table class="matrix-table">
                    <thead>
                        <tr>
                            <th>"SKU"</th>
                            <th>"Canal"</th>
                            {move || {
                                data.get()
                                    .map(|r| r.meses_labels)
                                    .unwrap_or_default()
                                    .into_iter()
                                    .map(|label| view! { <th>{label}</th> })
                                    .collect_view()
                            }}
                            <th>"Tendencia"</th>
                        </tr>
                    </thead>
                    <tbody>
                        {move || {
                            data.get()
                                .map(|r| r.skus)
                                .unwrap_or_default()
                                .into_iter()
                                .map(|row| {
                                    let (text, class) = trend_marker(row.tendencia);
                                    let cells = row.meses_data.into_iter().map(month_cell).collect_view();
                                    view! {
                                        <tr>
                                            <td title=row.descripcion>{row.sku}</td>
                                            <td>
                                                <span class="channel-dot" style=format!("background-color: {};", row.color_canal)></span>
                                                {row.canal_abrev}
                                            </td>
                                            {cells}
                                            <td class=class>{text}</td>
                                        </tr>
                                    }
                                })
                                .collect_view()
                        }}
                    </tbody>
                </table>
            </section>
        </Show>
    }
}
