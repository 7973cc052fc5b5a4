use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::NaiveDate;
use contracts::shared::YearMonth;
use sea_orm::{
    ConnectionTrait, Database, DatabaseBackend, DatabaseConnection, FromQueryResult, Statement,
    Value,
};
use std::path::Path;

use super::warehouse::{
    BfCatalogEntry, BfDataSource, BfSaleBreakdown, BfStockRow, DateRange, MonthlyDataLoader,
    SaleType, SalesRow,
};

const SALES_COLUMNS: &str = "fecha, sku, descripcion, marca, categoria, canal, almacen, estado, \
     total, costo_venta, gastos_directos, ingreso_real, cantidad, clasificacion";

/// Minimal schema bootstrap; every statement is idempotent
const SCHEMA: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS sales_monthly_accumulated (
        fecha TEXT NOT NULL,
        sku TEXT NOT NULL,
        descripcion TEXT NOT NULL DEFAULT '',
        marca TEXT NOT NULL DEFAULT '',
        categoria TEXT NOT NULL DEFAULT '',
        canal TEXT NOT NULL,
        almacen TEXT NOT NULL DEFAULT '',
        estado TEXT NOT NULL DEFAULT 'Activo',
        total REAL NOT NULL DEFAULT 0,
        costo_venta REAL NOT NULL DEFAULT 0,
        gastos_directos REAL NOT NULL DEFAULT 0,
        ingreso_real REAL NOT NULL DEFAULT 0,
        cantidad REAL NOT NULL DEFAULT 0,
        clasificacion TEXT
    );
    "#,
    "CREATE INDEX IF NOT EXISTS idx_sales_monthly_fecha ON sales_monthly_accumulated (fecha);",
    r#"
    CREATE TABLE IF NOT EXISTS sales_transactions (
        fecha TEXT NOT NULL,
        sku TEXT NOT NULL,
        descripcion TEXT NOT NULL DEFAULT '',
        marca TEXT NOT NULL DEFAULT '',
        categoria TEXT NOT NULL DEFAULT '',
        canal TEXT NOT NULL,
        almacen TEXT NOT NULL DEFAULT '',
        estado TEXT NOT NULL DEFAULT 'Activo',
        total REAL NOT NULL DEFAULT 0,
        costo_venta REAL NOT NULL DEFAULT 0,
        gastos_directos REAL NOT NULL DEFAULT 0,
        ingreso_real REAL NOT NULL DEFAULT 0,
        cantidad REAL NOT NULL DEFAULT 0,
        clasificacion TEXT
    );
    "#,
    "CREATE INDEX IF NOT EXISTS idx_sales_transactions_fecha ON sales_transactions (fecha);",
    r#"
    CREATE TABLE IF NOT EXISTS bf_catalog (
        sku TEXT PRIMARY KEY NOT NULL,
        descripcion TEXT NOT NULL DEFAULT '',
        categoria TEXT NOT NULL DEFAULT '',
        producto_relevante INTEGER NOT NULL DEFAULT 0,
        producto_nuevo INTEGER NOT NULL DEFAULT 0,
        remate INTEGER NOT NULL DEFAULT 0
    );
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS bf_sale_breakdown (
        fecha TEXT NOT NULL,
        canal TEXT NOT NULL,
        sku_primario TEXT NOT NULL,
        tipo_venta TEXT NOT NULL,
        cantidad_vendida REAL NOT NULL DEFAULT 0,
        total_ventas REAL NOT NULL DEFAULT 0
    );
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS bf_inventory (
        sku TEXT NOT NULL,
        descripcion TEXT NOT NULL DEFAULT '',
        almacen TEXT NOT NULL,
        cantidad_libre_de_usar REAL NOT NULL DEFAULT 0,
        PRIMARY KEY (sku, almacen)
    );
    "#,
];

/// SQLite mirror of the warehouse views, accessed through sea-orm
pub struct SqliteWarehouse {
    conn: DatabaseConnection,
}

impl SqliteWarehouse {
    /// Open (creating if needed) the database file and bootstrap its tables
    pub async fn connect(db_file: &Path) -> Result<Self> {
        if let Some(parent) = db_file.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let absolute_path = if db_file.is_absolute() {
            db_file.to_path_buf()
        } else {
            std::env::current_dir()?.join(db_file)
        };
        // Normalize path separators and ensure proper URL form on Windows
        let normalized = absolute_path.to_string_lossy().replace('\\', "/");
        let needs_leading_slash = !normalized.starts_with('/') && normalized.contains(':');
        let prefix = if needs_leading_slash { "/" } else { "" };
        let db_url = format!("sqlite://{}{}?mode=rwc", prefix, normalized);

        tracing::info!("Opening SQLite warehouse at {}", absolute_path.display());
        let conn = Database::connect(&db_url)
            .await
            .with_context(|| format!("cannot open SQLite warehouse {}", db_url))?;

        let warehouse = Self { conn };
        warehouse.bootstrap().await?;
        Ok(warehouse)
    }

    async fn bootstrap(&self) -> Result<()> {
        for sql in SCHEMA {
            self.conn
                .execute(Statement::from_string(DatabaseBackend::Sqlite, sql.to_string()))
                .await?;
        }
        Ok(())
    }

    pub async fn insert_monthly_rows(&self, rows: &[SalesRow]) -> Result<()> {
        self.insert_sales_into("sales_monthly_accumulated", rows).await
    }

    pub async fn insert_sales_rows(&self, rows: &[SalesRow]) -> Result<()> {
        self.insert_sales_into("sales_transactions", rows).await
    }

    async fn insert_sales_into(&self, table: &str, rows: &[SalesRow]) -> Result<()> {
        let sql = format!(
            "INSERT INTO {} ({}) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
            table, SALES_COLUMNS
        );
        for r in rows {
            let values: Vec<Value> = vec![
                r.fecha.to_string().into(),
                r.sku.clone().into(),
                r.descripcion.clone().into(),
                r.marca.clone().into(),
                r.categoria.clone().into(),
                r.canal.clone().into(),
                r.almacen.clone().into(),
                r.estado.clone().into(),
                r.total.into(),
                r.costo_venta.into(),
                r.gastos_directos.into(),
                r.ingreso_real.into(),
                r.cantidad.into(),
                r.clasificacion.clone().into(),
            ];
            self.conn
                .execute(Statement::from_sql_and_values(
                    DatabaseBackend::Sqlite,
                    &sql,
                    values,
                ))
                .await?;
        }
        Ok(())
    }

    pub async fn insert_catalog(&self, entries: &[BfCatalogEntry]) -> Result<()> {
        let sql = r#"
            INSERT OR REPLACE INTO bf_catalog
                (sku, descripcion, categoria, producto_relevante, producto_nuevo, remate)
            VALUES (?, ?, ?, ?, ?, ?)
        "#;
        for e in entries {
            self.conn
                .execute(Statement::from_sql_and_values(
                    DatabaseBackend::Sqlite,
                    sql,
                    [
                        e.sku.clone().into(),
                        e.descripcion.clone().into(),
                        e.categoria.clone().into(),
                        (e.relevante as i32).into(),
                        (e.nuevo as i32).into(),
                        (e.remate as i32).into(),
                    ],
                ))
                .await?;
        }
        Ok(())
    }

    pub async fn insert_breakdown(&self, items: &[BfSaleBreakdown]) -> Result<()> {
        let sql = r#"
            INSERT INTO bf_sale_breakdown
                (fecha, canal, sku_primario, tipo_venta, cantidad_vendida, total_ventas)
            VALUES (?, ?, ?, ?, ?, ?)
        "#;
        for b in items {
            self.conn
                .execute(Statement::from_sql_and_values(
                    DatabaseBackend::Sqlite,
                    sql,
                    [
                        b.fecha.to_string().into(),
                        b.canal.clone().into(),
                        b.sku_primario.clone().into(),
                        sale_type_label(b.tipo_venta).into(),
                        b.cantidad_vendida.into(),
                        b.total_ventas.into(),
                    ],
                ))
                .await?;
        }
        Ok(())
    }

    pub async fn insert_inventory(&self, stock: &[BfStockRow]) -> Result<()> {
        let sql = r#"
            INSERT OR REPLACE INTO bf_inventory (sku, descripcion, almacen, cantidad_libre_de_usar)
            VALUES (?, ?, ?, ?)
        "#;
        for r in stock {
            self.conn
                .execute(Statement::from_sql_and_values(
                    DatabaseBackend::Sqlite,
                    sql,
                    [
                        r.sku.clone().into(),
                        r.descripcion.clone().into(),
                        r.almacen.clone().into(),
                        r.cantidad_libre.into(),
                    ],
                ))
                .await?;
        }
        Ok(())
    }

    async fn query_sales(&self, table: &str, range: DateRange) -> Result<Vec<SalesRow>> {
        let sql = format!(
            "SELECT {} FROM {} WHERE fecha >= ? AND fecha < ? ORDER BY fecha DESC, sku ASC",
            SALES_COLUMNS, table
        );
        let stmt = Statement::from_sql_and_values(
            DatabaseBackend::Sqlite,
            &sql,
            [range.start.to_string().into(), range.end.to_string().into()],
        );
        let records = SalesRecord::find_by_statement(stmt).all(&self.conn).await?;
        records.into_iter().map(SalesRecord::into_row).collect()
    }
}

fn sale_type_label(t: SaleType) -> &'static str {
    match t {
        SaleType::Individual => "Individual",
        SaleType::Combo => "Combo",
    }
}

fn parse_date(raw: &str) -> Result<NaiveDate> {
    // Accept both "YYYY-MM-DD" and "YYYY-MM-DD HH:MM:SS"
    let day = raw.get(..10).unwrap_or(raw);
    NaiveDate::parse_from_str(day, "%Y-%m-%d")
        .with_context(|| format!("invalid date in warehouse row: {}", raw))
}

#[derive(Debug, FromQueryResult)]
struct SalesRecord {
    fecha: String,
    sku: String,
    descripcion: String,
    marca: String,
    categoria: String,
    canal: String,
    almacen: String,
    estado: String,
    total: f64,
    costo_venta: f64,
    gastos_directos: f64,
    ingreso_real: f64,
    cantidad: f64,
    clasificacion: Option<String>,
}

impl SalesRecord {
    fn into_row(self) -> Result<SalesRow> {
        Ok(SalesRow {
            fecha: parse_date(&self.fecha)?,
            sku: self.sku,
            descripcion: self.descripcion,
            marca: self.marca,
            categoria: self.categoria,
            canal: self.canal,
            almacen: self.almacen,
            estado: self.estado,
            total: self.total,
            costo_venta: self.costo_venta,
            gastos_directos: self.gastos_directos,
            ingreso_real: self.ingreso_real,
            cantidad: self.cantidad,
            clasificacion: self.clasificacion,
        })
    }
}

#[derive(Debug, FromQueryResult)]
struct CatalogRecord {
    sku: String,
    descripcion: String,
    categoria: String,
    producto_relevante: i32,
    producto_nuevo: i32,
    remate: i32,
}

#[derive(Debug, FromQueryResult)]
struct BreakdownRecord {
    fecha: String,
    canal: String,
    sku_primario: String,
    tipo_venta: String,
    cantidad_vendida: f64,
    total_ventas: f64,
}

#[derive(Debug, FromQueryResult)]
struct StockRecord {
    sku: String,
    descripcion: String,
    almacen: String,
    cantidad_libre_de_usar: f64,
}

#[async_trait]
impl MonthlyDataLoader for SqliteWarehouse {
    async fn load_accumulated_monthly(&self, month: YearMonth) -> Result<Vec<SalesRow>> {
        let range = DateRange::new(month.first_day(), month.end_exclusive());
        let rows = self.query_sales("sales_monthly_accumulated", range).await?;
        tracing::debug!("SQLite warehouse: {} monthly rows for {}", rows.len(), month);
        Ok(rows)
    }
}

#[async_trait]
impl BfDataSource for SqliteWarehouse {
    async fn load_catalog(&self) -> Result<Vec<BfCatalogEntry>> {
        let stmt = Statement::from_string(
            DatabaseBackend::Sqlite,
            "SELECT sku, descripcion, categoria, producto_relevante, producto_nuevo, remate \
             FROM bf_catalog ORDER BY categoria, sku"
                .to_string(),
        );
        let records = CatalogRecord::find_by_statement(stmt).all(&self.conn).await?;
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
        let placeholders = vec!["?"; channels.len()].join(", ");
        let sql = format!(
            "SELECT fecha, canal, sku_primario, tipo_venta, cantidad_vendida, total_ventas \
             FROM bf_sale_breakdown \
             WHERE fecha >= ? AND fecha < ? AND canal IN ({}) \
             ORDER BY sku_primario, tipo_venta",
            placeholders
        );
        let mut values: Vec<Value> = vec![range.start.to_string().into(), range.end.to_string().into()];
        values.extend(channels.iter().map(|c| Value::from(c.clone())));

        let stmt = Statement::from_sql_and_values(DatabaseBackend::Sqlite, &sql, values);
        let records = BreakdownRecord::find_by_statement(stmt).all(&self.conn).await?;

        records
            .into_iter()
            .map(|r| {
                let tipo_venta = match r.tipo_venta.as_str() {
                    "Individual" => SaleType::Individual,
                    "Combo" => SaleType::Combo,
                    other => anyhow::bail!("unknown sale type in bf_sale_breakdown: {}", other),
                };
                Ok(BfSaleBreakdown {
                    fecha: parse_date(&r.fecha)?,
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
        self.query_sales("sales_transactions", range).await
    }

    async fn load_inventory(&self) -> Result<Vec<BfStockRow>> {
        let stmt = Statement::from_string(
            DatabaseBackend::Sqlite,
            "SELECT sku, descripcion, almacen, cantidad_libre_de_usar \
             FROM bf_inventory WHERE sku <> '' ORDER BY sku, almacen"
                .to_string(),
        );
        let records = StockRecord::find_by_statement(stmt).all(&self.conn).await?;
        Ok(records
            .into_iter()
            .map(|r| BfStockRow {
                sku: r.sku,
                descripcion: r.descripcion,
                almacen: r.almacen,
                cantidad_libre: r.cantidad_libre_de_usar,
            })
            .collect())
    }
}
