use anyhow::{Context, Result};
use async_trait::async_trait;
use contracts::shared::YearMonth;
use serde::de::DeserializeOwned;
use serde::Deserialize;

use super::warehouse::{
    BfCatalogEntry, BfDataSource, BfSaleBreakdown, BfStockRow, DateRange, MonthlyDataLoader,
    SaleType, SalesRow,
};
use crate::shared::config::WarehouseConfig;

/// Environment variable holding the ClickHouse password
pub const PASSWORD_ENV: &str = "CLICKHOUSE_PASSWORD";

const MONTHLY_SQL: &str = r#"
SELECT
    toDate(Fecha) AS fecha,
    toString(sku) AS sku,
    ifNull(Descripcion, '') AS descripcion,
    ifNull(Marca, '') AS marca,
    ifNull(Categoria, '') AS categoria,
    ifNull(Channel, '') AS canal,
    '' AS almacen,
    'Activo' AS estado,
    toFloat64(ifNull(Ventas, 0)) AS total,
    toFloat64(ifNull(Costo, 0)) AS costo_venta,
    toFloat64(ifNull(Gastos_Directos, 0)) AS gastos_directos,
    toFloat64(ifNull(Ingreso_real, 0)) AS ingreso_real,
    toFloat64(ifNull(Cantidad, 0)) AS cantidad,
    Clasificacion AS clasificacion
FROM Silver.RPT_Ventas_Acumulado_Mensual_SKU_Canal_MT
WHERE Fecha >= {inicio:Date} AND Fecha < {fin:Date}
ORDER BY Fecha DESC, sku ASC
"#;

const SALES_SQL: &str = r#"
SELECT
    toDate(Fecha) AS fecha,
    toString(sku) AS sku,
    ifNull(descripcion, '') AS descripcion,
    ifNull(Marca, '') AS marca,
    ifNull(Categoria, '') AS categoria,
    ifNull(Channel, '') AS canal,
    ifNull(Almacen, '') AS almacen,
    ifNull(estado, '') AS estado,
    toFloat64(ifNull(Total, 0)) AS total,
    toFloat64(ifNull(`Costo de venta`, 0)) AS costo_venta,
    toFloat64(ifNull(Gastos_directos, 0)) AS gastos_directos,
    toFloat64(ifNull(`Ingreso real`, 0)) AS ingreso_real,
    toFloat64(ifNull(cantidad, 0)) AS cantidad,
    CAST(NULL, 'Nullable(String)') AS clasificacion
FROM Silver.RPT_Ventas_Con_Costo_Prueba
WHERE Fecha >= {inicio:Date} AND Fecha < {fin:Date}
ORDER BY Fecha DESC
"#;

const CATALOG_SQL: &str = r#"
SELECT
    toString(sku) AS sku,
    ifNull(descripcion, '') AS descripcion,
    ifNull(categoria, '') AS categoria,
    toUInt8(ifNull(producto_relevante, 0)) AS producto_relevante,
    toUInt8(ifNull(producto_nuevo, 0)) AS producto_nuevo,
    toUInt8(ifNull(remate, 0)) AS remate
FROM Silver.catalogo_productos_BF
ORDER BY categoria, sku
"#;

const BREAKDOWN_SQL: &str = r#"
WITH separacion AS
(
    SELECT
        sku AS sku_vendido,
        cantidad,
        Total,
        arrayJoin(producto_comercial) AS producto,
        producto.1 AS sku_primario,
        toFloat64(cantidad) * toFloat64(producto.2) AS cantidad_total,
        if(sku_vendido = sku_primario, 'Individual', 'Combo') AS tipo_venta,
        toDate(Fecha) AS fecha,
        Channel AS canal
    FROM Gold.RPT_Ventas
    WHERE estado = 'Orden de Venta'
      AND Channel IN {canales:Array(String)}
      AND Fecha >= {inicio:Date} AND Fecha < {fin:Date}
)
SELECT
    fecha,
    canal,
    toString(sku_primario) AS sku_primario,
    tipo_venta,
    toFloat64(SUM(cantidad_total)) AS cantidad_vendida,
    toFloat64(SUM(Total)) AS total_ventas
FROM separacion
GROUP BY fecha, canal, sku_primario, tipo_venta
ORDER BY sku_primario, tipo_venta
"#;

const INVENTORY_SQL: &str = r#"
SELECT
    toString(sku) AS sku,
    ifNull(descripcion, '') AS descripcion,
    ifNull(almacen, '') AS almacen,
    toFloat64(ifNull(cantidad_libre_de_usar, 0)) AS cantidad_libre
FROM Gold.RPT_Inventarios
WHERE sku <> ''
ORDER BY sku, almacen
"#;

/// ClickHouse warehouse accessed over its HTTP interface.
///
/// Queries are sent as the POST body; values travel as `param_*` URL
/// parameters and are bound server side, never spliced into the SQL text.
pub struct ClickHouseWarehouse {
    client: reqwest::Client,
    url: String,
    user: String,
    password: Option<String>,
    database: Option<String>,
}

impl ClickHouseWarehouse {
    pub fn new(config: &WarehouseConfig) -> Result<Self> {
        let url = config
            .url
            .clone()
            .context("ClickHouse warehouse requires `url`")?;
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            url: url.trim_end_matches('/').to_string(),
            user: config.user.clone(),
            password: std::env::var(PASSWORD_ENV).ok(),
            database: config.database.clone(),
        })
    }

    async fn query<T: DeserializeOwned>(
        &self,
        sql: &str,
        params: &[(&str, String)],
    ) -> Result<Vec<T>> {
        let query_params = self.query_params(params);

        let start_time = std::time::Instant::now();
        let response = match self
            .client
            .post(&self.url)
            .query(&query_params)
            .basic_auth(&self.user, self.password.as_deref())
            .body(sql.to_string())
            .send()
            .await
        {
            Ok(resp) => resp,
            Err(e) => {
                let error_msg = if e.is_timeout() {
                    format!("ClickHouse request timeout: {}", e)
                } else if e.is_connect() {
                    format!("ClickHouse connection error: {}", e)
                } else {
                    format!("ClickHouse network error: {}", e)
                };
                tracing::error!("{}", error_msg);
                return Err(anyhow::anyhow!("{}", error_msg));
            }
        };

        let status = response.status();
        tracing::debug!(
            "ClickHouse query completed in {:.2}s with status {}",
            start_time.elapsed().as_secs_f64(),
            status
        );

        let body = response.text().await?;
        if !status.is_success() {
            tracing::error!("ClickHouse query failed: {}", body.trim());
            anyhow::bail!("ClickHouse query failed with status {}: {}", status, body.trim());
        }

        parse_json_each_row(&body)
    }

    fn query_params(&self, params: &[(&str, String)]) -> Vec<(String, String)> {
        let mut query_params = vec![
            ("default_format".to_string(), "JSONEachRow".to_string()),
            (
                "output_format_json_quote_64bit_integers".to_string(),
                "0".to_string(),
            ),
        ];
        if let Some(db) = &self.database {
            query_params.push(("database".to_string(), db.clone()));
        }
        query_params.extend(
            params
                .iter()
                .map(|(name, value)| (format!("param_{}", name), value.clone())),
        );
        query_params
    }
}

/// Parse a JSONEachRow body, one object per non-empty line
fn parse_json_each_row<T: DeserializeOwned>(body: &str) -> Result<Vec<T>> {
    body.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .enumerate()
        .map(|(i, line)| {
            serde_json::from_str(line)
                .with_context(|| format!("Failed to parse ClickHouse row {}", i + 1))
        })
        .collect()
}

/// Render a string list as a ClickHouse `Array(String)` literal for a query parameter
fn array_param(values: &[String]) -> String {
    let items: Vec<String> = values
        .iter()
        .map(|v| format!("'{}'", v.replace('\\', "\\\\").replace('\'', "\\'")))
        .collect();
    format!("[{}]", items.join(","))
}

fn range_params(range: DateRange) -> Vec<(&'static str, String)> {
    vec![
        ("inicio", range.start.to_string()),
        ("fin", range.end.to_string()),
    ]
}

#[derive(Debug, Deserialize)]
struct CatalogRecord {
    sku: String,
    descripcion: String,
    categoria: String,
    producto_relevante: u8,
    producto_nuevo: u8,
    remate: u8,
}

#[derive(Debug, Deserialize)]
struct BreakdownRecord {
    fecha: chrono::NaiveDate,
    canal: String,
    sku_primario: String,
    tipo_venta: String,
    cantidad_vendida: f64,
    total_ventas: f64,
}

#[async_trait]
impl MonthlyDataLoader for ClickHouseWarehouse {
    async fn load_accumulated_monthly(&self, month: YearMonth) -> Result<Vec<SalesRow>> {
        let range = DateRange::new(month.first_day(), month.end_exclusive());
        let rows: Vec<SalesRow> = self.query(MONTHLY_SQL, &range_params(range)).await?;
        tracing::info!("ClickHouse: {} monthly rows for {}", rows.len(), month);
        Ok(rows)
    }
}

#[async_trait]
impl BfDataSource for ClickHouseWarehouse {
    async fn load_catalog(&self) -> Result<Vec<BfCatalogEntry>> {
        let records: Vec<CatalogRecord> = self.query(CATALOG_SQL, &[]).await?;
        tracing::info!("ClickHouse: BF catalog with {} products", records.len());
        Ok(records
            .into_iter()
            .map(|r| BfCatalogEntry {
                sku: r.sku,
                descripcion: r.descripcion,
                categoria: r.categoria,
                relevante: r.producto_relevante == 1,
                nuevo: r.producto_nuevo == 1,
                remate: r.remate == 1,
            })
            .collect())
    }

    async fn load_sale_breakdown(
        &self,
        range: DateRange,
        channels: &[String],
    ) -> Result<Vec<BfSaleBreakdown>> {
        if channels.is_empty() {
            return Ok(Vec::new());
        }
        let mut params = range_params(range);
        params.push(("canales", array_param(channels)));

        let records: Vec<BreakdownRecord> = self.query(BREAKDOWN_SQL, &params).await?;
        records
            .into_iter()
            .map(|r| {
                let tipo_venta = match r.tipo_venta.as_str() {
                    "Individual" => SaleType::Individual,
                    "Combo" => SaleType::Combo,
                    other => anyhow::bail!("unknown sale type from ClickHouse: {}", other),
                };
                Ok(BfSaleBreakdown {
                    fecha: r.fecha,
                    canal: r.canal,
                    sku_primario: r.sku_primario,
                    tipo_venta,
                    cantidad_vendida: r.cantidad_vendida,
                    total_ventas: r.total_ventas,
                })
            })
            .collect()
    }

    async fn load_sales(&self, range: DateRange) -> Result<Vec<SalesRow>> {
        self.query(SALES_SQL, &range_params(range)).await
    }

    async fn load_inventory(&self) -> Result<Vec<BfStockRow>> {
        let rows: Vec<BfStockRow> = self.query(INVENTORY_SQL, &[]).await?;
        tracing::info!("ClickHouse: BF inventory with {} rows", rows.len());
        Ok(rows)
    }
}
