//! BF (promotional event) compliance: sales of catalog SKUs split into
//! individual and combo units, with cost, real income and ROI, and the
//! catalog's stock grouped by flag.

pub mod export;
pub mod inventory;
pub mod period;
pub mod service;

use axum::{
    routing::{get, post},
    Router,
};

use crate::api::handlers::d411_bf_compliance as handlers;
use crate::shared::page::ModulePage;
pub use service::BfService;

#[derive(Clone)]
pub struct BfState {
    pub service: BfService,
    pub page: ModulePage,
}

pub fn router(state: BfState) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        .route("/filtros", get(handlers::filter_options))
        .route("/datos", post(handlers::compliance))
        .route("/inventario", post(handlers::inventory))
        .route("/exportar", post(handlers::export))
        .route("/exportar-inventario", post(handlers::export_inventory))
        .with_state(state)
}
