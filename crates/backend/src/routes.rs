use axum::http::{header, Method};
use axum::{middleware, routing::get, Router};
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;

use crate::dashboards::d410_positioning_matrix::{self, MatrixState};
use crate::dashboards::d411_bf_compliance::{self, BfState};
use crate::shared::middleware::request_logger;

/// Prefix of the positioning matrix module
pub const MATRIX_PREFIX: &str = "/matriz-posicionamiento";
/// Prefix of the BF compliance module
pub const BF_PREFIX: &str = "/cumplimiento-bf";

/// Application router: both dashboard modules, health check and the static bundle
pub fn configure_routes(matrix: MatrixState, bf: BfState, static_dir: &str) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT]);

    Router::new()
        .route("/health", get(|| async { "ok" }))
        // ========================================
        // DASHBOARDS
        // ========================================
        // D410 Positioning Matrix
        .nest(MATRIX_PREFIX, d410_positioning_matrix::router(matrix))
        // D411 BF Compliance
        .nest(BF_PREFIX, d411_bf_compliance::router(bf))
        .fallback_service(ServeDir::new(static_dir))
        .layer(middleware::from_fn(request_logger))
        .layer(cors)
}
