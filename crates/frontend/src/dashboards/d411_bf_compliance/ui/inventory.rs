use contracts::dashboards::d411_bf_compliance::{BfInventoryGroup, BfInventoryItem, BfWarehouseStock};
use leptos::prelude::*;

use crate::shared::format::integer;

/// `Astillero: 10 · Meli Full: 5`, largest stock first
pub fn warehouse_list(almacenes: &[BfWarehouseStock]) -> String {
    let mut sorted: Vec<&BfWarehouseStock> = almacenes.iter().collect();
    sorted.sort_by(|a, b| b.cantidad.total_cmp(&a.cantidad));
    sorted
        .into_iter()
        .map(|a| format!("{}: {}", a.almacen, integer(a.cantidad.round() as i64)))
        .collect::<Vec<_>>()
        .join(" · ")
}

fn product_row(p: BfInventoryItem) -> impl IntoView {
    let almacenes = warehouse_list(&p.almacenes);
    view! {
        <tr>
            <td>{p.sku}</td>
            <td>{p.descripcion}</td>
            <td>{p.categoria}</td>
            <td class="num">{integer(p.existencia.round() as i64)}</td>
            <td class="num">{integer(p.venta_periodo.round() as i64)}</td>
            <td class="inventory__warehouses">{almacenes}</td>
        </tr>
    }
}

fn group_view(g: BfInventoryGroup) -> impl IntoView {
    view! {
        <div class="inventory-group">
            <h3 class="inventory-group__title" style=format!("border-left-color: {};", g.color)>
                {g.nombre}
                <span class="inventory-group__totals">
                    {format!(
                        "{} SKUs · {} en existencia · {} vendidas",
                        g.total_skus,
                        integer(g.total_existencia),
                        integer(g.total_venta),
                    )}
                </span>
            </h3>
            <table class="matrix-table">
                <thead>
                    <tr>
                        <th>"SKU"</th>
                        <th>"Descripción"</th>
                        <th>"Categoría"</th>
                        <th>"Existencia"</th>
                        <th>"Venta periodo"</th>
                        <th>"Almacenes"</th>
                    </tr>
                </thead>
                <tbody>{g.productos.into_iter().map(product_row).collect_view()}</tbody>
            </table>
        </div>
    }
}

/// Catalog stock grouped by flag
#[component]
pub fn BfInventory(#[prop(into)] groups: Signal<Vec<BfInventoryGroup>>) -> impl IntoView {
    view! {
        <h2>"Inventario y ventas"</h2>
        {move || {
            let groups = groups.get();
            if groups.is_empty() {
                view! { <p class="panel__loading">"Sin inventario para los SKUs BF seleccionados"</p> }
                    .into_any()
            } else {
                groups.into_iter().map(group_view).collect_view().into_any()
            }
        }}
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stock(almacen: &str, cantidad: f64) -> BfWarehouseStock {
        BfWarehouseStock {
            almacen: almacen.into(),
            cantidad,
        }
    }

    #[test]
    fn warehouses_listed_by_stock() {
        let list = warehouse_list(&[stock("Meli Full", 5.0), stock("Astillero", 1200.0)]);
        assert_eq!(list, "Astillero: 1,200 · Meli Full: 5");
        assert_eq!(warehouse_list(&[]), "");
    }
}
