//! BF stock grouped by catalog flag, with the units sold in the period.

use contracts::dashboards::d411_bf_compliance::{
    BfInventoryGroup, BfInventoryItem, BfWarehouseStock,
};
use std::collections::{BTreeMap, HashMap};

use super::service::{eligible_catalog, BfSelection};
use crate::shared::data::warehouse::{BfCatalogEntry, BfSaleBreakdown, BfStockRow};

/// Display names of the warehouse codes; unknown codes are shown as they are
const WAREHOUSE_NAMES: &[(&str, &str)] = &[
    ("ATS", "Astillero"),
    ("MELI", "Meli Full"),
    ("1C", "Astillero 1C"),
    ("MLPS", "Manzanillo"),
    ("TIJ", "Rosarito"),
    ("NAU", "Nautica"),
    ("WFS", "Walmart Full"),
    ("BEX", "BEX"),
    ("HUMMA", "Humma"),
];

pub fn warehouse_name(code: &str) -> &str {
    WAREHOUSE_NAMES
        .iter()
        .find(|(c, _)| *c == code)
        .map_or(code, |(_, name)| *name)
}

struct GroupKind {
    nombre: &'static str,
    color: &'static str,
    flagged: fn(&BfInventoryItem) -> bool,
}

fn is_relevant(item: &BfInventoryItem) -> bool {
    item.es_relevante
}

fn is_new(item: &BfInventoryItem) -> bool {
    item.es_nuevo
}

fn is_clearance(item: &BfInventoryItem) -> bool {
    item.es_remate
}

const GROUPS: [GroupKind; 3] = [
    GroupKind {
        nombre: "Relevante",
        color: "#6f42c1",
        flagged: is_relevant,
    },
    GroupKind {
        nombre: "Nuevo",
        color: "#0dcaf0",
        flagged: is_new,
    },
    GroupKind {
        nombre: "Remate",
        color: "#fd7e14",
        flagged: is_clearance,
    },
];

#[derive(Default)]
struct Stocked<'a> {
    descripcion: Option<&'a str>,
    total: f64,
    almacenes: Vec<BfWarehouseStock>,
}

/// Stock of the selected catalog SKUs, largest stock first.
///
/// Only SKUs with inventory rows are listed. Stock is never restricted by
/// channel; the period units are.
pub fn inventory_items(
    catalog: &[BfCatalogEntry],
    stock: &[BfStockRow],
    breakdown: &[BfSaleBreakdown],
    selection: &BfSelection,
) -> Vec<BfInventoryItem> {
    let eligible = eligible_catalog(catalog, selection);

    let mut stocked: BTreeMap<&str, Stocked> = BTreeMap::new();
    for row in stock.iter().filter(|r| eligible.contains_key(r.sku.as_str())) {
        let s = stocked.entry(row.sku.as_str()).or_default();
        s.total += row.cantidad_libre;
        s.almacenes.push(BfWarehouseStock {
            almacen: warehouse_name(&row.almacen).to_string(),
            cantidad: row.cantidad_libre,
        });
        if s.descripcion.is_none() && !row.descripcion.trim().is_empty() {
            s.descripcion = Some(row.descripcion.as_str());
        }
    }

    let mut sold: HashMap<&str, f64> = HashMap::new();
    for b in breakdown.iter().filter(|b| {
        selection.range.contains(b.fecha) && selection.admits_channel(&b.canal)
    }) {
        *sold.entry(b.sku_primario.as_str()).or_insert(0.0) += b.cantidad_vendida;
    }

    let mut items: Vec<BfInventoryItem> = stocked
        .into_iter()
        .filter_map(|(sku, s)| {
            let entry = *eligible.get(sku)?;
            Some(BfInventoryItem {
                sku: entry.sku.clone(),
                descripcion: s
                    .descripcion
                    .map_or_else(|| entry.descripcion.clone(), str::to_string),
                categoria: entry.categoria.clone(),
                existencia: s.total,
                venta_periodo: sold.get(sku).copied().unwrap_or(0.0),
                almacenes: s.almacenes,
                es_relevante: entry.relevante,
                es_nuevo: entry.nuevo,
                es_remate: entry.remate,
            })
        })
        .collect();
    items.sort_by(|a, b| b.existencia.total_cmp(&a.existencia));
    items
}

/// One group per flag that has products, best sellers first inside each
pub fn group_by_type(items: &[BfInventoryItem]) -> Vec<BfInventoryGroup> {
    GROUPS
        .iter()
        .filter_map(|kind| {
            let mut productos: Vec<BfInventoryItem> =
                items.iter().filter(|i| (kind.flagged)(i)).cloned().collect();
            if productos.is_empty() {
                return None;
            }
            productos.sort_by(|a, b| b.venta_periodo.total_cmp(&a.venta_periodo));
            Some(BfInventoryGroup {
                nombre: kind.nombre.to_string(),
                color: kind.color.to_string(),
                total_skus: productos.len(),
                total_existencia: productos.iter().map(|p| p.existencia).sum::<f64>() as i64,
                total_venta: productos.iter().map(|p| p.venta_periodo).sum::<f64>() as i64,
                productos,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::config::BfConfig;
    use crate::shared::data::warehouse::{DateRange, SaleType};
    use chrono::NaiveDate;
    use contracts::dashboards::d411_bf_compliance::BfProductType;

    fn nov(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 11, day).unwrap()
    }

    fn entry(sku: &str, categoria: &str, relevante: bool, nuevo: bool, remate: bool) -> BfCatalogEntry {
        BfCatalogEntry {
            sku: sku.into(),
            descripcion: format!("Catálogo {}", sku),
            categoria: categoria.into(),
            relevante,
            nuevo,
            remate,
        }
    }

    fn stock(sku: &str, almacen: &str, cantidad: f64) -> BfStockRow {
        BfStockRow {
            sku: sku.into(),
            descripcion: format!("Inventario {}", sku),
            almacen: almacen.into(),
            cantidad_libre: cantidad,
        }
    }

    fn sold(day: u32, canal: &str, sku: &str, tipo: SaleType, qty: f64) -> BfSaleBreakdown {
        BfSaleBreakdown {
            fecha: nov(day),
            canal: canal.into(),
            sku_primario: sku.into(),
            tipo_venta: tipo,
            cantidad_vendida: qty,
            total_ventas: qty * 100.0,
        }
    }

    fn catalog() -> Vec<BfCatalogEntry> {
        vec![
            entry("A1", "Audio", true, false, false),
            entry("B2", "Audio", true, false, true),
            entry("C3", "Video", false, true, false),
            // flagged but never stocked
            entry("D4", "Video", false, false, true),
        ]
    }

    fn inventory() -> Vec<BfStockRow> {
        vec![
            stock("A1", "ATS", 10.0),
            stock("A1", "MELI", 5.0),
            stock("B2", "XYZ", 40.0),
            stock("C3", "WFS", 3.0),
            stock("Z9", "ATS", 999.0),
        ]
    }

    fn breakdown() -> Vec<BfSaleBreakdown> {
        vec![
            sold(2, "Walmart", "A1", SaleType::Individual, 4.0),
            sold(3, "Shein", "A1", SaleType::Combo, 2.0),
            sold(3, "Walmart", "B2", SaleType::Individual, 1.0),
            sold(4, "Coppel", "B2", SaleType::Individual, 50.0),
            sold(4, "Walmart", "C3", SaleType::Individual, 9.0),
            // outside the period
            sold(30, "Walmart", "C3", SaleType::Individual, 100.0),
        ]
    }

    fn selection() -> BfSelection {
        BfSelection {
            range: DateRange::new(nov(1), nov(30)),
            channels: BfConfig::default().channels,
            tipo: BfProductType::All,
            category: None,
        }
    }

    #[test]
    fn warehouse_codes_map_to_names() {
        assert_eq!(warehouse_name("MELI"), "Meli Full");
        assert_eq!(warehouse_name("WFS"), "Walmart Full");
        assert_eq!(warehouse_name("XYZ"), "XYZ");
    }

    #[test]
    fn items_sum_stock_per_sku_and_count_period_units() {
        let items = inventory_items(&catalog(), &inventory(), &breakdown(), &selection());
        let skus: Vec<_> = items.iter().map(|i| i.sku.as_str()).collect();
        assert_eq!(skus, vec!["B2", "A1", "C3"]);

        let a1 = &items[1];
        assert_eq!(a1.existencia, 15.0);
        assert_eq!(a1.descripcion, "Inventario A1");
        assert_eq!(
            a1.almacenes,
            vec![
                BfWarehouseStock { almacen: "Astillero".into(), cantidad: 10.0 },
                BfWarehouseStock { almacen: "Meli Full".into(), cantidad: 5.0 },
            ]
        );
        // combo components count as units sold
        assert_eq!(a1.venta_periodo, 6.0);
        // Coppel is not a BF channel
        assert_eq!(items[0].venta_periodo, 1.0);
        assert_eq!(items[2].venta_periodo, 9.0);
    }

    #[test]
    fn channel_filter_restricts_sales_but_not_stock() {
        let only_shein = BfSelection {
            channels: vec!["Shein".into()],
            ..selection()
        };
        let items = inventory_items(&catalog(), &inventory(), &breakdown(), &only_shein);
        let a1 = items.iter().find(|i| i.sku == "A1").unwrap();
        assert_eq!(a1.existencia, 15.0);
        assert_eq!(a1.venta_periodo, 2.0);
        assert_eq!(items.iter().map(|i| i.venta_periodo).sum::<f64>(), 2.0);
    }

    #[test]
    fn catalog_filters_apply_to_stock() {
        let video = BfSelection {
            category: Some("Video".into()),
            ..selection()
        };
        let items = inventory_items(&catalog(), &inventory(), &breakdown(), &video);
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].sku, "C3");

        let clearance = BfSelection {
            tipo: BfProductType::Clearance,
            ..selection()
        };
        let items = inventory_items(&catalog(), &inventory(), &breakdown(), &clearance);
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].sku, "B2");
    }

    #[test]
    fn groups_follow_flags_and_sort_by_sales() {
        let items = inventory_items(&catalog(), &inventory(), &breakdown(), &selection());
        let groups = group_by_type(&items);

        let names: Vec<_> = groups.iter().map(|g| g.nombre.as_str()).collect();
        assert_eq!(names, vec!["Relevante", "Nuevo", "Remate"]);

        let relevant = &groups[0];
        assert_eq!(relevant.total_skus, 2);
        assert_eq!(relevant.total_existencia, 55);
        assert_eq!(relevant.total_venta, 7);
        let order: Vec<_> = relevant.productos.iter().map(|p| p.sku.as_str()).collect();
        assert_eq!(order, vec!["A1", "B2"]);

        // B2 is both relevant and on clearance
        assert_eq!(groups[2].productos[0].sku, "B2");
        assert_eq!(groups[2].color, "#fd7e14");
    }

    #[test]
    fn groups_without_products_are_left_out() {
        let items = inventory_items(&catalog(), &[stock("C3", "ATS", 1.0)], &[], &selection());
        let groups = group_by_type(&items);
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].nombre, "Nuevo");
        assert_eq!(groups[0].total_venta, 0);

        assert!(group_by_type(&[]).is_empty());
    }
}
