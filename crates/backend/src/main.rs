use std::net::SocketAddr;
use std::sync::Arc;

use backend::dashboards::d410_positioning_matrix::{MatrixService, MatrixState};
use backend::dashboards::d411_bf_compliance::{BfService, BfState};
use backend::routes::{configure_routes, BF_PREFIX, MATRIX_PREFIX};
use backend::shared::clock::Clock;
use backend::shared::config::{load_config, resolve_path, WarehouseKind};
use backend::shared::data::clickhouse::ClickHouseWarehouse;
use backend::shared::data::db::SqliteWarehouse;
use backend::shared::data::warehouse::{BfDataSource, MonthlyDataLoader};
use backend::shared::page::ModulePage;
use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Log directory
    let log_dir = std::path::Path::new("target").join("logs");
    std::fs::create_dir_all(&log_dir)?;

    let log_file_path = log_dir.join("backend.log");
    let log_file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_file_path)?;

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| {
                // SQL statement logs stay quiet, application logs do not
                "info,sqlx=warn,sea_orm=warn".into()
            }),
        ))
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(Arc::new(log_file))
                .with_ansi(false),
        )
        .init();

    let config = load_config()?;

    let (monthly, bf_source) =
        match config.warehouse.kind {
            WarehouseKind::Sqlite => {
                let path = resolve_path(&config.warehouse.path);
                let warehouse = Arc::new(SqliteWarehouse::connect(&path).await?);
                (
                    warehouse.clone() as Arc<dyn MonthlyDataLoader>,
                    warehouse as Arc<dyn BfDataSource>,
                )
            }
            WarehouseKind::Clickhouse => {
                let warehouse = Arc::new(ClickHouseWarehouse::new(&config.warehouse)?);
                tracing::info!(
                    "Using ClickHouse warehouse at {}",
                    config.warehouse.url.as_deref().unwrap_or_default()
                );
                (
                    warehouse.clone() as Arc<dyn MonthlyDataLoader>,
                    warehouse as Arc<dyn BfDataSource>,
                )
            }
        };

    let clock = Clock::System {
        utc_offset_hours: config.server.utc_offset_hours,
    };
    let static_dir = config.server.static_dir.as_str();

    let matrix = MatrixState {
        service: MatrixService::new(
            monthly,
            config.matrix.clone(),
            config.warehouse.cumulative,
            clock,
        ),
        page: ModulePage::new(static_dir, "Matriz de Posicionamiento"),
    };
    let bf = BfState {
        service: BfService::new(bf_source, config.bf.clone(), clock),
        page: ModulePage::new(static_dir, "Cumplimiento BF"),
    };

    let app = configure_routes(matrix, bf, static_dir);

    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port).parse()?;

    tracing::info!("Attempting to bind server to http://{}", addr);
    let listener = match TcpListener::bind(addr).await {
        Ok(listener) => {
            tracing::info!("Server successfully bound to {}", addr);
            tracing::info!("Dashboards: {} and {}", MATRIX_PREFIX, BF_PREFIX);
            listener
        }
        Err(e) => {
            if e.kind() == std::io::ErrorKind::AddrInUse {
                tracing::error!(
                    "Error: Port {} is already in use. Please ensure no other process is using this port.",
                    config.server.port
                );
            } else {
                tracing::error!("Failed to bind to port {}. Error: {}", config.server.port, e);
            }
            return Err(e.into());
        }
    };

    axum::serve(listener, app).await?;

    Ok(())
}
