use contracts::dashboards::d411_bf_compliance::{
    BfComplianceResponse, BfFilterOptions, BfInventoryResponse, BfPreset, BfSummary,
    ALL_BF_CATEGORIES, ALL_BF_CHANNELS,
};
use leptos::prelude::*;
use leptos::task::spawn_local;
use thaw::*;

use super::filters::{from_wire, wire_value, BfFilterForm, PRESETS, PRODUCT_TYPES};
use super::inventory::BfInventory;
use super::table::BfTable;
use crate::dashboards::d411_bf_compliance::api;
use crate::dashboards::d411_bf_compliance::chart_config::daily_chart;
use crate::shared::chart_panel::ChartPanel;
use crate::shared::error_banner::{report_error, ErrorBanner};
use crate::shared::export::download_csv;
use crate::shared::format::{integer, money, percent};
use crate::shared::modal::{ZoomModal, ZoomRequest};
use crate::shared::request_sequencer::RequestSequencer;

fn summary_cards(s: BfSummary) -> impl IntoView {
    let cards = [
        ("Meta", money(s.total_meta)),
        ("Venta real", money(s.total_real)),
        ("Cumplimiento", percent(s.cumplimiento_porcentaje)),
        ("Diferencia", money(s.diferencia)),
        ("Piezas", integer(s.total_cantidad)),
        ("SKUs", s.total_skus.to_string()),
        ("Ingreso real", money(s.total_ingreso_real)),
        ("Costo", money(s.total_costo)),
        ("Gastos directos", money(s.total_gastos_directos)),
        ("ROI promedio", percent(s.roi_promedio)),
    ];
    view! {
        <div class="stat-cards">
            {cards
                .into_iter()
                .map(|(label, value)| {
                    view! {
                        <div class="stat-card">
                            <div class="stat-card__value">{value}</div>
                            <div class="stat-card__label">{label}</div>
                        </div>
                    }
                })
                .collect_view()}
        </div>
    }
}

/// BF compliance: sales of the promotional catalog in a period
#[component]
pub fn BfComplianceDashboard() -> impl IntoView {
    let form = RwSignal::new(BfFilterForm::default());
    let options = RwSignal::new(None::<BfFilterOptions>);
    let data = RwSignal::new(None::<BfComplianceResponse>);
    let inventory = RwSignal::new(None::<BfInventoryResponse>);
    let loading = RwSignal::new(false);
    let exporting = RwSignal::new(false);
    let zoom = RwSignal::new(None::<ZoomRequest>);
    let banner = RwSignal::new(None::<String>);
    let sequencer = RequestSequencer::new();
    let inventory_sequencer = RequestSequencer::new();

    let load = move || {
        let current = form.get_untracked();
        if let Err(message) = current.validate() {
            report_error(banner, "Filtro inválido", message);
            return;
        }
        let request = current.to_request();
        let inventory_request = request.clone();
        let ticket = sequencer.issue();
        let sequencer = sequencer.clone();
        loading.set(true);
        banner.set(None);

        spawn_local(async move {
            let result = api::get_compliance(&request).await;
            if !sequencer.is_current(ticket) {
                log::debug!("Dropping stale BF response");
                return;
            }
            loading.set(false);
            match result {
                Ok(response) => data.set(Some(response)),
                Err(e) => report_error(banner, "Error al cargar cumplimiento BF", e),
            }
        });

        let ticket = inventory_sequencer.issue();
        let inventory_sequencer = inventory_sequencer.clone();
        spawn_local(async move {
            let result = api::get_inventory(&inventory_request).await;
            if !inventory_sequencer.is_current(ticket) {
                log::debug!("Dropping stale BF inventory response");
                return;
            }
            match result {
                Ok(response) => inventory.set(Some(response)),
                Err(e) => report_error(banner, "Error al cargar inventario BF", e),
            }
        });
    };

    // Filter lists and the default period on mount
    let initial_load = load.clone();
    Effect::new(move |_| {
        spawn_local(async move {
            match api::get_filter_options().await {
                Ok(o) => options.set(Some(o)),
                Err(e) => report_error(banner, "Error al cargar filtros BF", e),
            }
        });
        initial_load();
    });

    let export = move |_| {
        let request = form.get_untracked().to_request();
        exporting.set(true);
        spawn_local(async move {
            let result = api::export_csv(&request).await;
            exporting.set(false);
            match result.and_then(|(bytes, name)| download_csv(&bytes, &name)) {
                Ok(()) => log::info!("BF export downloaded"),
                Err(e) => report_error(banner, "Error al exportar", e),
            }
        });
    };

    let export_inventory = move |_| {
        let request = form.get_untracked().to_request();
        exporting.set(true);
        spawn_local(async move {
            let result = api::export_inventory_csv(&request).await;
            exporting.set(false);
            match result.and_then(|(bytes, name)| download_csv(&bytes, &name)) {
                Ok(()) => log::info!("BF inventory export downloaded"),
                Err(e) => report_error(banner, "Error al exportar inventario", e),
            }
        });
    };

    let refresh = load.clone();
    let channels = move || options.get().map(|o| o.canales).unwrap_or_default();
    let categories = move || options.get().map(|o| o.categorias).unwrap_or_default();
    let spec = Memo::new(move |_| data.with(|d| d.as_ref().map(|r| daily_chart(&r.grafico))));
    let rows = Signal::derive(move || data.with(|d| d.as_ref().map(|r| r.skus_data.clone()).unwrap_or_default()));
    let groups = Signal::derive(move || inventory.with(|i| i.as_ref().map(|r| r.grupos.clone()).unwrap_or_default()));

    view! {
        <div id="d411_bf_compliance--dashboard" class="dashboard">
            <header class="dashboard__header">
                <h1>"🛍️ Cumplimiento BF"</h1>
                <span class="dashboard__period">
                    {move || data.with(|d| d.as_ref().map(|r| r.periodo_texto.clone()))}
                </span>
            </header>

            <ErrorBanner message=banner />

            <div class="filter-bar">
                <label class="filter">
                    <span class="filter__label">"Periodo"</span>
                    <select
                        prop:value=move || wire_value(&form.with(|f| f.preset))
                        on:change=move |ev| {
                            if let Some(preset) = from_wire(&event_target_value(&ev)) {
                                form.update(|f| f.preset = preset);
                            }
                        }
                    >
                        {PRESETS
                            .iter()
                            .map(|(preset, label)| view! { <option value=wire_value(preset)>{*label}</option> })
                            .collect_view()}
                    </select>
                </label>

                <Show when=move || form.with(|f| f.preset == BfPreset::Custom)>
                    <label class="filter">
                        <span class="filter__label">"Desde"</span>
                        <input
                            type="date"
                            prop:value=move || form.with(|f| f.desde.clone())
                            on:input=move |ev| form.update(|f| f.desde = event_target_value(&ev))
                        />
                    </label>
                    <label class="filter">
                        <span class="filter__label">"Hasta"</span>
                        <input
                            type="date"
                            prop:value=move || form.with(|f| f.hasta.clone())
                            on:input=move |ev| form.update(|f| f.hasta = event_target_value(&ev))
                        />
                    </label>
                </Show>

                <label class="filter">
                    <span class="filter__label">"Tipo"</span>
                    <select
                        prop:value=move || wire_value(&form.with(|f| f.tipo))
                        on:change=move |ev| {
                            if let Some(tipo) = from_wire(&event_target_value(&ev)) {
                                form.update(|f| f.tipo = tipo);
                            }
                        }
                    >
                        {PRODUCT_TYPES
                            .iter()
                            .map(|(tipo, label)| view! { <option value=wire_value(tipo)>{*label}</option> })
                            .collect_view()}
                    </select>
                </label>

                <label class="filter">
                    <span class="filter__label">"Canal"</span>
                    <select
                        prop:value=move || form.with(|f| f.canal.clone())
                        on:change=move |ev| form.update(|f| f.canal = event_target_value(&ev))
                    >
                        <option value=ALL_BF_CHANNELS>"Todos"</option>
                        {move || {
                            channels()
                                .into_iter()
                                .map(|c| { let value = c.clone(); view! { <option value=value>{c}</option> } })
                                .collect_view()
                        }}
                    </select>
                </label>

                <label class="filter">
                    <span class="filter__label">"Categoría"</span>
                    <select
                        prop:value=move || form.with(|f| f.categoria.clone())
                        on:change=move |ev| form.update(|f| f.categoria = event_target_value(&ev))
                    >
                        <option value=ALL_BF_CATEGORIES>"Todas"</option>
                        {move || {
                            categories()
                                .into_iter()
                                .map(|c| { let value = c.clone(); view! { <option value=value>{c}</option> } })
                                .collect_view()
                        }}
                    </select>
                </label>

                <Button
                    appearance=ButtonAppearance::Primary
                    disabled=Signal::derive(move || loading.get())
                    on_click=move |_| refresh()
                >
                    "🔄 Actualizar"
                </Button>
                <Button
                    appearance=ButtonAppearance::Secondary
                    disabled=Signal::derive(move || exporting.get())
                    on_click=export
                >
                    "📥 Exportar CSV"
                </Button>
                <Button
                    appearance=ButtonAppearance::Secondary
                    disabled=Signal::derive(move || exporting.get())
                    on_click=export_inventory
                >
                    "📦 Exportar inventario"
                </Button>
                <Show when=move || loading.get()>
                    <span class="panel__loading">"Cargando..."</span>
                </Show>
            </div>

            {move || data.with(|d| d.as_ref().map(|r| summary_cards(r.resumen_general.clone())))}

            <section class="panel">
                <ChartPanel canvas_id="chart-bf-diario" title="Ventas acumuladas por día" spec=spec zoom=zoom />
            </section>

            <section class="panel">
                <BfTable rows=rows />
            </section>

            <section class="panel">
                <BfInventory groups=groups />
            </section>

            <ZoomModal request=zoom />
        </div>
    }
}
