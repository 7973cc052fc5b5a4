use contracts::dashboards::d410_positioning_matrix::{MatrixStats, Zone, ZoneBadge};
use leptos::ev;
use leptos::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{HtmlOptionElement, HtmlSelectElement};

use crate::shared::format::{integer, money, percent};

#[component]
pub fn ZoneCell(badge: ZoneBadge) -> impl IntoView {
    let style = format!(
        "background-color: {}; color: {};",
        badge.color_zona, badge.color_texto
    );
    view! {
        <span class="zone-badge" style=style>
            {badge.icono} " " {badge.zona.label()}
        </span>
    }
}

/// Totals and zone counts of one matrix
#[component]
pub fn StatCards(
    #[prop(into)] stats: Signal<Option<MatrixStats>>,
    #[prop(into)] entity_label: String,
) -> impl IntoView {
    move || {
        let label = entity_label.clone();
        stats.get().map(|s| {
            let zones = Zone::ALL
                .iter()
                .map(|zone| {
                    let style = format!(
                        "background-color: {}; color: {};",
                        zone.background(),
                        zone.text_color()
                    );
                    view! {
                        <div class="stat-card stat-card--zone" style=style>
                            <div class="stat-card__value">{s.zone_count(*zone)}</div>
                            <div class="stat-card__label">{zone.icon()} " " {zone.label()}</div>
                        </div>
                    }
                })
                .collect_view();
            view! {
                <div class="stat-cards">
                    <div class="stat-card">
                        <div class="stat-card__value">{s.total.value()}</div>
                        <div class="stat-card__label">{label}</div>
                    </div>
                    <div class="stat-card">
                        <div class="stat-card__value">{money(s.ventas_totales)}</div>
                        <div class="stat-card__label">"Ventas"</div>
                    </div>
                    <div class="stat-card">
                        <div class="stat-card__value">{money(s.ingreso_real_total)}</div>
                        <div class="stat-card__label">"Ingreso real"</div>
                    </div>
                    <div class="stat-card">
                        <div class="stat-card__value">{percent(s.ingreso_promedio)}</div>
                        <div class="stat-card__label">"Ingreso promedio"</div>
                    </div>
                    <div class="stat-card">
                        <div class="stat-card__value">{percent(s.roi_promedio)}</div>
                        <div class="stat-card__label">"ROI promedio"</div>
                    </div>
                    {zones}
                </div>
            }
        })
    }
}

/// Money and percentage cells shared by every matrix table
pub fn metric_cells(
    ventas: f64,
    ingreso_real: f64,
    ingreso_pct: f64,
    roi_pct: f64,
    transacciones: u64,
) -> impl IntoView {
    view! {
        <td class="num">{money(ventas)}</td>
        <td class="num">{money(ingreso_real)}</td>
        <td class="num">{percent(ingreso_pct)}</td>
        <td class="num">{percent(roi_pct)}</td>
        <td class="num">{integer(transacciones as i64)}</td>
    }
}

/// Values of the selected options of a `<select multiple>`
pub fn selected_values(event: &ev::Event) -> Vec<String> {
    let Some(select) = event
        .target()
        .and_then(|t| t.dyn_into::<HtmlSelectElement>().ok())
    else {
        return Vec::new();
    };
    let options = select.selected_options();
    (0..options.length())
        .filter_map(|i| options.item(i))
        .filter_map(|el| el.dyn_into::<HtmlOptionElement>().ok())
        .map(|option| option.value())
        .collect()
}

/// `<select multiple>` over `options`; an empty selection means "all"
#[component]
pub fn MultiSelect(
    #[prop(into)] label: String,
    #[prop(into)] options: Signal<Vec<String>>,
    selected: RwSignal<Vec<String>>,
) -> impl IntoView {
    view! {
        <label class="filter">
            <span class="filter__label">{label}</span>
            <select
                multiple=true
                class="filter__multi"
                on:change=move |ev| selected.set(selected_values(&ev))
            >
                <For each=move || options.get() key=|o| o.clone() let:option>
                    {
                        let value = option.clone();
                        let option_value = option.clone();
                        view! {
                            <option
                                value=option_value
                                prop:selected=move || selected.with(|s| s.contains(&value))
                            >
                                {option}
                            </option>
                        }
                    }
                </For>
            </select>
        </label>
    }
}
