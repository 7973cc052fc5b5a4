use contracts::dashboards::d410_positioning_matrix::{CategoryMatrixRequest, CategoryMatrixResponse};
use contracts::shared::YearMonth;
use leptos::prelude::*;
use leptos::task::spawn_local;

use super::widgets::{metric_cells, MultiSelect, StatCards, ZoneCell};
use crate::dashboards::d410_positioning_matrix::api;
use crate::dashboards::d410_positioning_matrix::chart_config::bubble_chart;
use crate::shared::chart_panel::ChartPanel;
use crate::shared::error_banner::report_error;
use crate::shared::modal::ZoomRequest;
use crate::shared::request_sequencer::RequestSequencer;

/// Matrix of channel-category pairs
#[component]
pub fn CategoryPanel(
    #[prop(into)] month: Signal<Option<YearMonth>>,
    #[prop(into)] channels: Signal<Vec<String>>,
    #[prop(into)] categories: Signal<Vec<String>>,
    zoom: RwSignal<Option<ZoomRequest>>,
    banner: RwSignal<Option<String>>,
) -> impl IntoView {
    let selected_channels = RwSignal::new(Vec::<String>::new());
    let selected_categories = RwSignal::new(Vec::<String>::new());
    let data = RwSignal::new(None::<CategoryMatrixResponse>);
    let loading = RwSignal::new(false);
    let sequencer = RequestSequencer::new();

    Effect::new(move |_| {
        let Some(mes) = month.get() else {
            return;
        };
        let request = CategoryMatrixRequest {
            mes: Some(mes),
            canales: selected_channels.get(),
            categorias: selected_categories.get(),
        };
        let ticket = sequencer.issue();
        let sequencer = sequencer.clone();
        loading.set(true);

        spawn_local(async move {
            let result = api::get_category_matrix(&request).await;
            if !sequencer.is_current(ticket) {
                log::debug!("Dropping stale category matrix response");
                return;
            }
            loading.set(false);
            match result {
                Ok(response) => data.set(Some(response)),
                Err(e) => report_error(banner, "Error al actualizar categorías", e),
            }
        });
    });

    let spec = Memo::new(move |_| {
        data.with(|d| {
            d.as_ref()
                .map(|r| bubble_chart(&r.datasets, r.estadisticas.eje_y_max))
        })
    });
    let stats = Signal::derive(move || data.with(|d| d.as_ref().map(|r| r.estadisticas.clone())));

    view! {
        <section class="panel">
            <div class="panel__header">
                <h2>"Matriz por categoría"</h2>
                <MultiSelect label="Canales" options=channels selected=selected_channels />
                <MultiSelect label="Categorías" options=categories selected=selected_categories />
                <Show when=move || loading.get()>
                    <span class="panel__loading">"Cargando..."</span>
                </Show>
            </div>

            <StatCards stats=stats entity_label="Combinaciones" />
            <ChartPanel
                canvas_id="chart-categorias"
                title="Ingreso real vs ROI por canal y categoría"
                spec=spec
                zoom=zoom
                raster_zoom=true
            />

            <table class="matrix-table">
                <thead>
                    <tr>
                        <th>"Canal - Categoría"</th>
                        <th>"Ventas"</th>
                        <th>"Ingreso real"</th>
                        <th>"Ingreso %"</th>
                        <th>"ROI %"</th>
                        <th>"Transacciones"</th>
                        <th>"Zona"</th>
                    </tr>
                </thead>
                <tbody>
                    {move || {
                        data.get()
                            .map(|r| r.categorias)
                            .unwrap_or_default()
                            .into_iter()
                            .map(|c| {
                                let m = c.metricas;
                                let row_style = format!("background-color: {};", c.zona.color_zona);
                                view! {
                                    <tr style=row_style>
                                        <td title=c.canal>
                                            <span class="channel-dot" style=format!("background-color: {};", c.color_canal)></span>
                                            {c.label}
                                        </td>
                                        {metric_cells(m.ventas, m.ingreso_real, m.ingreso_real_pct, m.roi_pct, m.num_transacciones)}
                                        <td><ZoneCell badge=c.zona /></td>
                                    </tr>
                                }
                            })
                            .collect_view()
                    }}
                </tbody>
            </table>
        </section>
    }
}
