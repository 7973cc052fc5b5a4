use contracts::dashboards::d410_positioning_matrix::{
    BrandFilter, ChannelMatrixRequest, ChannelMatrixResponse,
};
use contracts::shared::YearMonth;
use leptos::prelude::*;
use leptos::task::spawn_local;

use super::widgets::{metric_cells, StatCards, ZoneCell};
use crate::dashboards::d410_positioning_matrix::api;
use crate::dashboards::d410_positioning_matrix::chart_config::bubble_chart;
use crate::shared::chart_panel::ChartPanel;
use crate::shared::error_banner::report_error;
use crate::shared::modal::ZoomRequest;
use crate::shared::request_sequencer::RequestSequencer;

fn brand_value(brand: BrandFilter) -> &'static str {
    match brand {
        BrandFilter::Own => "Loomber",
        BrandFilter::Others => "Otros",
        BrandFilter::Both => "Ambos",
    }
}

fn brand_from_value(value: &str) -> BrandFilter {
    match value {
        "Loomber" => BrandFilter::Own,
        "Otros" => BrandFilter::Others,
        _ => BrandFilter::Both,
    }
}

/// Matrix of sales channels, filtered by brand
#[component]
pub fn ChannelPanel(
    #[prop(into)] month: Signal<Option<YearMonth>>,
    zoom: RwSignal<Option<ZoomRequest>>,
    banner: RwSignal<Option<String>>,
) -> impl IntoView {
    let brand = RwSignal::new(BrandFilter::Both);
    let data = RwSignal::new(None::<ChannelMatrixResponse>);
    let loading = RwSignal::new(false);
    let sequencer = RequestSequencer::new();

    Effect::new(move |_| {
        let Some(mes) = month.get() else {
            return;
        };
        let request = ChannelMatrixRequest {
            mes: Some(mes),
            marca: brand.get(),
        };
        let ticket = sequencer.issue();
        let sequencer = sequencer.clone();
        loading.set(true);

        spawn_local(async move {
            let result = api::get_channel_matrix(&request).await;
            if !sequencer.is_current(ticket) {
                log::debug!("Dropping stale channel matrix response");
                return;
            }
            loading.set(false);
            match result {
                Ok(response) => data.set(Some(response)),
                Err(e) => report_error(banner, "Error al actualizar canales", e),
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
                <h2>"Matriz por canal"</h2>
                <label class="filter">
                    <span class="filter__label">"Marca"</span>
                    <select
                        prop:value=move || brand_value(brand.get())
                        on:change=move |ev| brand.set(brand_from_value(&event_target_value(&ev)))
                    >
                        <option value="Ambos">"Ambos"</option>
                        <option value="Loomber">"Loomber"</option>
                        <option value="Otros">"Otros"</option>
                    </select>
                </label>
                <Show when=move || loading.get()>
                    <span class="panel__loading">"Cargando..."</span>
                </Show>
            </div>

            <StatCards stats=stats entity_label="Canales" />
            <ChartPanel canvas_id="chart-canales" title="Ingreso real vs ROI por canal" spec=spec zoom=zoom />

            <table class="matrix-table">
                <thead>
                    <tr>
                        <th>"Canal"</th>
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
                            .map(|r| r.canales)
                            .unwrap_or_default()
                            .into_iter()
                            .map(|c| {
                                let m = c.metricas;
                                let row_style = format!("background-color: {};", c.zona.color_zona);
                                view! {
                                    <tr style=row_style>
                                        <td>
                                            <span class="channel-dot" style=format!("background-color: {};", c.color_canal)></span>
                                            {c.canal}
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
