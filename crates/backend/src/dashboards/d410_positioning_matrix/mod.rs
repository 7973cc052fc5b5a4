//! Positioning matrix: real-income share vs ROI per channel, channel and
//! category, and SKU, plus a three-month SKU comparison.

pub mod aggregator;
pub mod channels;
pub mod chart;
pub mod comparator;
pub mod service;

use axum::{
    routing::{get, post},
    Router,
};

use crate::api::handlers::d410_positioning_matrix as handlers;
use crate::shared::page::ModulePage;
pub use service::MatrixService;

#[derive(Clone)]
pub struct MatrixState {
    pub service: MatrixService,
    pub page: ModulePage,
}

/// Routes of the module, relative to wherever the host nests them
pub fn router(state: MatrixState) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        .route("/filtros", get(handlers::filter_options))
        .route("/actualizar", post(handlers::update_channels))
        .route("/actualizar-categorias", post(handlers::update_categories))
        .route("/actualizar-clasificacion", post(handlers::update_skus))
        .route("/obtener-skus", post(handlers::list_skus))
        .route("/comparar-3-meses", post(handlers::compare_three_months))
        .with_state(state)
}
