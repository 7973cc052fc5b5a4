use anyhow::{Context, Result};
use axum::http::header;
use axum::response::{IntoResponse, Response};
use chrono::NaiveDate;
use contracts::dashboards::d411_bf_compliance::{BfInventoryGroup, BfRowKind, BfSkuRow};

const HEADERS: [&str; 10] = [
    "SKU",
    "Tipo",
    "Descripción",
    "Categoría",
    "Cantidad",
    "Ventas",
    "Costo Venta",
    "Gastos Directos",
    "Ingreso Real",
    "ROI %",
];

const INVENTORY_HEADERS: [&str; 7] = [
    "Tipo",
    "SKU",
    "Descripción",
    "Categoría",
    "Existencia",
    "Venta Periodo",
    "Almacenes",
];

fn kind_label(kind: BfRowKind) -> &'static str {
    match kind {
        BfRowKind::Individual => "Individual",
        BfRowKind::Combo => "Combo",
    }
}

fn money(value: f64) -> String {
    format!("{:.2}", value)
}

/// CSV of the compliance table, one line per table row
pub fn to_csv(rows: &[BfSkuRow]) -> Result<Vec<u8>> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(HEADERS)?;
    for r in rows {
        writer.write_record([
            r.sku.clone(),
            kind_label(r.tipo_fila).to_string(),
            r.descripcion.clone(),
            r.categoria.clone(),
            r.cantidad_vendida.to_string(),
            money(r.ventas_reales),
            money(r.costo_venta),
            money(r.gastos_directos),
            money(r.ingreso_real),
            money(r.roi),
        ])?;
    }
    finish(writer)
}

fn finish(writer: csv::Writer<Vec<u8>>) -> Result<Vec<u8>> {
    writer
        .into_inner()
        .map_err(|e| anyhow::anyhow!("{}", e.error()))
        .context("Failed to finish BF CSV")
}

/// CSV of the stock groups, one line per product and group. Warehouses go in
/// one cell as `name: quantity` pairs.
pub fn inventory_to_csv(groups: &[BfInventoryGroup]) -> Result<Vec<u8>> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(INVENTORY_HEADERS)?;
    for g in groups {
        for p in &g.productos {
            let almacenes = p
                .almacenes
                .iter()
                .map(|a| format!("{}: {}", a.almacen, a.cantidad))
                .collect::<Vec<_>>()
                .join("; ");
            writer.write_record([
                g.nombre.clone(),
                p.sku.clone(),
                p.descripcion.clone(),
                p.categoria.clone(),
                p.existencia.to_string(),
                p.venta_periodo.to_string(),
                almacenes,
            ])?;
        }
    }
    finish(writer)
}

pub fn file_name(today: NaiveDate) -> String {
    format!("Cumplimiento_BF_{}.csv", today.format("%Y%m%d"))
}

pub fn inventory_file_name(today: NaiveDate) -> String {
    format!("Inventario_BF_{}.csv", today.format("%Y%m%d"))
}

/// Attachment response carrying the compliance CSV
pub fn attachment(body: Vec<u8>, today: NaiveDate) -> Response {
    named_attachment(body, file_name(today))
}

pub fn named_attachment(body: Vec<u8>, name: String) -> Response {
    (
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", name),
            ),
        ],
        body,
    )
        .into_response()
}
