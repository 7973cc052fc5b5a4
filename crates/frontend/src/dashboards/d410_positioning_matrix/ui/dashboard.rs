use contracts::dashboards::d410_positioning_matrix::FilterOptionsResponse;
use contracts::shared::YearMonth;
use leptos::prelude::*;
use leptos::task::spawn_local;

use super::category_panel::CategoryPanel;
use super::channel_panel::ChannelPanel;
use super::sku_panel::SkuPanel;
use crate::dashboards::d410_positioning_matrix::api;
use crate::shared::error_banner::{report_error, ErrorBanner};
use crate::shared::modal::{ZoomModal, ZoomRequest};

/// Positioning matrix dashboard: channel, category and SKU matrices for one month
#[component]
pub fn PositioningMatrixDashboard() -> impl IntoView {
    let options = RwSignal::new(None::<FilterOptionsResponse>);
    let month = RwSignal::new(None::<YearMonth>);
    let zoom = RwSignal::new(None::<ZoomRequest>);
    let banner = RwSignal::new(None::<String>);

    // Load filter options on mount; the current month starts the panels
    Effect::new(move |_| {
        spawn_local(async move {
            match api::get_filter_options().await {
                Ok(response) => {
                    month.set(Some(response.mes_actual));
                    options.set(Some(response));
                }
                Err(e) => report_error(banner, "Error al cargar filtros", e),
            }
        });
    });

    let channels = Signal::derive(move || {
        options.with(|o| o.as_ref().map(|o| o.canales_disponibles.clone()).unwrap_or_default())
    });
    let categories = Signal::derive(move || {
        options.with(|o| o.as_ref().map(|o| o.categorias_disponibles.clone()).unwrap_or_default())
    });

    let on_month_change = move |ev| {
        let value = event_target_value(&ev);
        match YearMonth::parse(&value) {
            Ok(m) => month.set(Some(m)),
            Err(e) => log::warn!("Ignoring month option {}: {}", value, e),
        }
    };

    view! {
        <div id="d410_positioning_matrix--dashboard" class="dashboard">
            <header class="dashboard__header">
                <h1>"🎯 Matriz de Posicionamiento"</h1>
                <label class="filter">
                    <span class="filter__label">"Mes"</span>
                    <select
                        prop:value=move || month.get().map(|m| m.as_yyyymm().to_string()).unwrap_or_default()
                        on:change=on_month_change
                    >
                        {move || {
                            options
                                .get()
                                .map(|o| o.meses_disponibles)
                                .unwrap_or_default()
                                .into_iter()
                                .map(|m| {
                                    view! {
                                        <option value=m.valor.as_yyyymm().to_string()>
                                            {format!("{} {}", m.nombre, m.anio)}
                                        </option>
                                    }
                                })
                                .collect_view()
                        }}
                    </select>
                </label>
            </header>

            <ErrorBanner message=banner />

            <ChannelPanel month=month zoom=zoom banner=banner />
            <CategoryPanel month=month channels=channels categories=categories zoom=zoom banner=banner />
            <SkuPanel month=month channels=channels zoom=zoom banner=banner />

            <ZoomModal request=zoom />
        </div>
    }
}
