use contracts::dashboards::d411_bf_compliance::{BfRowKind, BfSkuRow};
use leptos::prelude::*;

use crate::shared::format::{integer, money, percent};

fn flag_badges(row: &BfSkuRow) -> impl IntoView {
    let flags = [
        (row.es_relevante, "flag flag--relevante", "Relevante"),
        (row.es_nuevo, "flag flag--nuevo", "Nuevo"),
        (row.es_remate, "flag flag--remate", "Remate"),
    ];
    flags
        .into_iter()
        .filter(|(on, _, _)| *on)
        .map(|(_, class, label)| view! { <span class=class>{label}</span> })
        .collect_view()
}

fn row_view(row: BfSkuRow) -> impl IntoView {
    let combo = row.tipo_fila == BfRowKind::Combo;
    let class = if combo { "bf-row bf-row--combo" } else { "bf-row" };
    let kind = if combo { "↳ Combo" } else { "Individual" };
    let flags = flag_badges(&row);
    let costs_note = (!row.tiene_costos).then(|| {
        view! { <span class="bf-row__note" title="Sin renglones de costo en el periodo">"sin costos"</span> }
    });
    view! {
        <tr class=class>
            <td>{row.sku}</td>
            <td>{kind}</td>
            <td>{row.descripcion} " " {flags}</td>
            <td>{row.categoria}</td>
            <td class="num">{integer(row.cantidad_vendida)}</td>
            <td class="num">{money(row.ventas_reales)}</td>
            <td class="num">{money(row.costo_venta)} {costs_note}</td>
            <td class="num">{money(row.gastos_directos)}</td>
            <td class="num">{money(row.ingreso_real)}</td>
            <td class="num">{percent(row.roi)}</td>
        </tr>
    }
}

/// SKU rows; a combo row follows the individual row of the same SKU
#[component]
pub fn BfTable(#[prop(into)] rows: Signal<Vec<BfSkuRow>>) -> impl IntoView {
    view! {
        <table class="matrix-table bf-table">
            <thead>
                <tr>
                    <th>"SKU"</th>
                    <th>"Tipo"</th>
                    <th>"Descripción"</th>
                    <th>"Categoría"</th>
                    <th>"Cantidad"</th>
                    <th>"Ventas reales"</th>
                    <th>"Costo"</th>
                    <th>"Gastos directos"</th>
                    <th>"Ingreso real"</th>
                    <th>"ROI"</th>
                </tr>
            </thead>
            <tbody>
                {move || {
                    let rows = rows.get();
                    if rows.is_empty() {
                        view! {
                            <tr>
                                <td colspan="10" class="empty">"Sin ventas de SKUs BF en el periodo"</td>
                            </tr>
                        }
                        .into_any()
                    } else {
                        rows.into_iter().map(row_view).collect_view().into_any()
                    }
                }}
            </tbody>
        </table>
    }
}
