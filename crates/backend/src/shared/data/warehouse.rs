//! Warehouse-facing row types and the loader contracts the dashboards depend on.
//!
//! Dashboards receive the loaders at construction time; `main` decides which
//! implementation backs them (SQLite mirror, ClickHouse or in-memory).

use anyhow::Result;
use async_trait::async_trait;
use chrono::NaiveDate;
use contracts::shared::YearMonth;
use serde::{Deserialize, Serialize};

/// Status of a cancelled order; such rows never count
pub const CANCELLED_STATUS: &str = "Cancelado";

/// One sales row as read from the warehouse. Never mutated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SalesRow {
    pub fecha: NaiveDate,
    pub sku: String,
    pub descripcion: String,
    pub marca: String,
    pub categoria: String,
    pub canal: String,
    pub almacen: String,
    pub estado: String,
    /// Gross sales total
    pub total: f64,
    pub costo_venta: f64,
    pub gastos_directos: f64,
    /// Total minus cost of sale minus direct expenses
    pub ingreso_real: f64,
    pub cantidad: f64,
    /// Sales classification label (Estrellas, Prometedores, ...)
    pub clasificacion: Option<String>,
}

impl SalesRow {
    pub fn is_cancelled(&self) -> bool {
        self.estado == CANCELLED_STATUS
    }
}

/// Entry of the promotional-event (BF) catalog
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BfCatalogEntry {
    pub sku: String,
    pub descripcion: String,
    pub categoria: String,
    pub relevante: bool,
    pub nuevo: bool,
    pub remate: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SaleType {
    /// The primary SKU was the SKU sold
    Individual,
    /// The primary SKU was a component of a combo SKU
    Combo,
}

/// Units of a primary SKU sold on a day through a channel, split by sale type
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BfSaleBreakdown {
    pub fecha: NaiveDate,
    pub canal: String,
    pub sku_primario: String,
    pub tipo_venta: SaleType,
    pub cantidad_vendida: f64,
    pub total_ventas: f64,
}

/// Free stock of a SKU in one warehouse, as stored (warehouse code, not name)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BfStockRow {
    pub sku: String,
    pub descripcion: String,
    pub almacen: String,
    pub cantidad_libre: f64,
}

/// Half-open date range `[start, end)`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start && date < self.end
    }
}

/// Source of month-to-date sales rows
#[async_trait]
pub trait MonthlyDataLoader: Send + Sync {
    /// Every row of the given month
    async fn load_accumulated_monthly(&self, month: YearMonth) -> Result<Vec<SalesRow>>;
}

/// Source of the BF catalog and sales
#[async_trait]
pub trait BfDataSource: Send + Sync {
    async fn load_catalog(&self) -> Result<Vec<BfCatalogEntry>>;

    /// Component breakdown of sales in `range` restricted to `channels`
    async fn load_sale_breakdown(
        &self,
        range: DateRange,
        channels: &[String],
    ) -> Result<Vec<BfSaleBreakdown>>;

    /// Transactional sales rows (with cost and expenses) in `range`
    async fn load_sales(&self, range: DateRange) -> Result<Vec<SalesRow>>;

    /// Current free stock per SKU and warehouse
    async fn load_inventory(&self) -> Result<Vec<BfStockRow>>;
}
