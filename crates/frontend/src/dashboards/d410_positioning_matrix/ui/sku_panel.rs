use contracts::dashboards::d410_positioning_matrix::{
    SkuListItem, SkuListRequest, SkuMatrixRequest, SkuMatrixResponse, TrendRequest, TrendResponse,
};
use contracts::shared::YearMonth;
use leptos::prelude::*;
use leptos::task::spawn_local;
use thaw::*;

use super::comparison::ComparisonPanel;
use super::sku_picker::SkuPicker;
use super::widgets::{metric_cells, MultiSelect, StatCards, ZoneCell};
use crate::dashboards::d410_positioning_matrix::api;
use crate::dashboards::d410_positioning_matrix::chart_config::sku_scatter_chart;
use crate::shared::alert;
use crate::shared::chart_panel::ChartPanel;
use crate::shared::error_banner::report_error;
use crate::shared::modal::ZoomRequest;
use crate::shared::request_sequencer::RequestSequencer;

/// SKU classification matrix and the 3-month comparison of the picked SKUs
#[component]
pub fn SkuPanel(
    #[prop(into)] month: Signal<Option<YearMonth>>,
    #[prop(into)] channels: Signal<Vec<String>>,
    zoom: RwSignal<Option<ZoomRequest>>,
    banner: RwSignal<Option<String>>,
) -> impl IntoView {
    let sku_list = RwSignal::new(Vec::<SkuListItem>::new());
    let selected_skus = RwSignal::new(Vec::<String>::new());
    let selected_channels = RwSignal::new(Vec::<String>::new());
    let data = RwSignal::new(None::<SkuMatrixResponse>);
    let trend = RwSignal::new(None::<TrendResponse>);
    let loading = RwSignal::new(false);
    let comparing = RwSignal::new(false);

    let list_sequencer = RequestSequencer::new();
    let matrix_sequencer = RequestSequencer::new();
    let trend_sequencer = RequestSequencer::new();

    // SKU list follows the month; the previous selection no longer applies
    Effect::new(move |_| {
        let Some(mes) = month.get() else {
            return;
        };
        let ticket = list_sequencer.issue();
        let sequencer = list_sequencer.clone();
        selected_skus.set(Vec::new());
        trend.set(None);

        spawn_local(async move {
            let result = api::get_sku_list(&SkuListRequest { mes: Some(mes) }).await;
            if !sequencer.is_current(ticket) {
                return;
            }
            match result {
                Ok(items) => sku_list.set(items),
                Err(e) => report_error(banner, "Error al cargar SKUs", e),
            }
        });
    });

    Effect::new(move |_| {
        let Some(mes) = month.get() else {
            return;
        };
        let request = SkuMatrixRequest {
            mes: Some(mes),
            canales: selected_channels.get(),
            skus: selected_skus.get(),
        };
        let ticket = matrix_sequencer.issue();
        let sequencer = matrix_sequencer.clone();
        loading.set(true);

        spawn_local(async move {
            let result = api::get_sku_matrix(&request).await;
            if !sequencer.is_current(ticket) {
                log::debug!("Dropping stale SKU matrix response");
                return;
            }
            loading.set(false);
            match result {
                Ok(response) => data.set(Some(response)),
                Err(e) => report_error(banner, "Error al actualizar clasificación", e),
            }
        });
    });

    let compare = move |_| {
        let skus = selected_skus.get_untracked();
        let Some(mes) = month.get_untracked() else {
            return;
        };
        if skus.is_empty() {
            alert("Selecciona al menos un SKU para comparar");
            return;
        }
        let request = TrendRequest {
            mes: Some(mes),
            canales: selected_channels.get_untracked(),
            skus,
        };
        let ticket = trend_sequencer.issue();
        let sequencer = trend_sequencer.clone();
        comparing.set(true);

        spawn_local(async move {
            let result = api::compare_three_months(&request).await;
            if !sequencer.is_current(ticket) {
                log::debug!("Dropping stale comparison response");
                return;
            }
            comparing.set(false);
            match result {
                Ok(response) => trend.set(Some(response)),
                Err(e) => report_error(banner, "Error al comparar meses", e),
            }
        });
    };

    let spec = Memo::new(move |_| {
        data.with(|d| {
            d.as_ref()
                .map(|r| sku_scatter_chart(&r.datasets, r.estadisticas.eje_y_max))
        })
    });
    let stats = Signal::derive(move || data.with(|d| d.as_ref().map(|r| r.estadisticas.clone())));

    view! {
        <section class="panel">
            <div class="panel__header">
                <h2>"Matriz por SKU"</h2>
                <MultiSelect label="Canales" options=channels selected=selected_channels />
                <Button
                    appearance=ButtonAppearance::Primary
                    disabled=Signal::derive(move || comparing.get())
                    on_click=compare
                >
                    "📊 Comparar 3 meses"
                </Button>
                <Show when=move || loading.get() || comparing.get()>
                    <span class="panel__loading">"Cargando..."</span>
                </Show>
            </div>

            <SkuPicker items=sku_list selected=selected_skus />
            <StatCards stats=stats entity_label="SKUs" />
            <ChartPanel canvas_id="chart-skus" title="Ingreso real vs ROI por SKU" spec=spec zoom=zoom />

            <table class="matrix-table">
                <thead>
                    <tr>
                        <th>"SKU"</th>
                        <th>"Descripción"</th>
                        <th>"Canal"</th>
                        <th>"Clasificación"</th>
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
                            .map(|r| r.skus)
                            .unwrap_or_default()
                            .into_iter()
                            .map(|s| {
                                let m = s.metricas;
                                let row_style = format!("background-color: {};", s.zona.color_zona);
                                view! {
                                    <tr style=row_style>
                                        <td>{s.sku}</td>
                                        <td>{s.descripcion}</td>
                                        <td>
                                            <span class="channel-dot" style=format!("background-color: {};", s.color_canal)></span>
                                            {s.canal_abrev}
                                        </td>
                                        <td>
                                            <span class="class-dot" style=format!("background-color: {};", s.color_clasificacion)></span>
                                            {s.clasificacion}
                                        </td>
                                        {metric_cells(m.ventas, m.ingreso_real, m.ingreso_real_pct, m.roi_pct, m.num_transacciones)}
                                        <td><ZoneCell badge=s.zona /></td>
                                    </tr>
                                }
                            })
                            .collect_view()
                    }}
                </tbody>
            </table>

            <ComparisonPanel data=trend zoom=zoom />
        </section>
    }
}
