use anyhow::Result;
use async_trait::async_trait;
use contracts::shared::YearMonth;

use super::warehouse::{
    BfCatalogEntry, BfDataSource, BfSaleBreakdown, BfStockRow, DateRange, MonthlyDataLoader,
    SalesRow,
};

/// Warehouse backed by fixed rows. Used by tests and offline demos.
#[derive(Debug, Clone, Default)]
pub struct InMemoryWarehouse {
    monthly: Vec<SalesRow>,
    sales: Vec<SalesRow>,
    catalog: Vec<BfCatalogEntry>,
    breakdown: Vec<BfSaleBreakdown>,
    inventory: Vec<BfStockRow>,
    failure: Option<String>,
}

impl InMemoryWarehouse {
    pub fn new() -> Self {
        Self::default()
    }

    /// A warehouse whose every query fails with `message`
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self {
            failure: Some(message.into()),
            ..Self::default()
        }
    }

    /// Month-to-date rows served by `load_accumulated_monthly`
    pub fn with_monthly_rows(mut self, rows: Vec<SalesRow>) -> Self {
        self.monthly = rows;
        self
    }

    /// Transactional rows served by `load_sales`
    pub fn with_sales_rows(mut self, rows: Vec<SalesRow>) -> Self {
        self.sales = rows;
        self
    }

    pub fn with_catalog(mut self, catalog: Vec<BfCatalogEntry>) -> Self {
        self.catalog = catalog;
        self
    }

    pub fn with_breakdown(mut self, breakdown: Vec<BfSaleBreakdown>) -> Self {
        self.breakdown = breakdown;
        self
    }

    pub fn with_inventory(mut self, inventory: Vec<BfStockRow>) -> Self {
        self.inventory = inventory;
        self
    }

    fn check(&self) -> Result<()> {
        match &self.failure {
            Some(message) => Err(anyhow::anyhow!("{}", message)),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl MonthlyDataLoader for InMemoryWarehouse {
    async fn load_accumulated_monthly(&self, month: YearMonth) -> Result<Vec<SalesRow>> {
        self.check()?;
        Ok(self
            .monthly
            .iter()
            .filter(|r| month.contains(r.fecha))
            .cloned()
            .collect())
    }
}

#[async_trait]
impl BfDataSource for InMemoryWarehouse {
    async fn load_catalog(&self) -> Result<Vec<BfCatalogEntry>> {
        self.check()?;
        Ok(self.catalog.clone())
    }

    async fn load_sale_breakdown(
        &self,
        range: DateRange,
        channels: &[String],
    ) -> Result<Vec<BfSaleBreakdown>> {
        self.check()?;
        Ok(self
            .breakdown
            .iter()
            .filter(|b| range.contains(b.fecha) && channels.iter().any(|c| c == &b.canal))
            .cloned()
            .collect())
    }

    async fn load_sales(&self, range: DateRange) -> Result<Vec<SalesRow>> {
        self.check()?;
        Ok(self
            .sales
            .iter()
            .filter(|r| range.contains(r.fecha))
            .cloned()
            .collect())
    }

    async fn load_inventory(&self) -> Result<Vec<BfStockRow>> {
        self.check()?;
        Ok(self.inventory.clone())
    }
}
