use serde::Deserialize;
use std::path::{Path, PathBuf};

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    pub warehouse: WarehouseConfig,
    #[serde(default)]
    pub matrix: MatrixConfig,
    #[serde(default)]
    pub bf: BfConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    /// Offset used to decide what "today" is (business timezone)
    #[serde(default = "default_utc_offset")]
    pub utc_offset_hours: i32,
    /// Directory with the built frontend bundle
    #[serde(default = "default_static_dir")]
    pub static_dir: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            utc_offset_hours: default_utc_offset(),
            static_dir: default_static_dir(),
        }
    }
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum WarehouseKind {
    Sqlite,
    Clickhouse,
}

#[derive(Debug, Deserialize, Clone)]
pub struct WarehouseConfig {
    pub kind: WarehouseKind,
    /// SQLite mirror file
    #[serde(default = "default_sqlite_path")]
    pub path: String,
    /// ClickHouse HTTP endpoint, e.g. "http://localhost:8123"
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default = "default_clickhouse_user")]
    pub user: String,
    #[serde(default)]
    pub database: Option<String>,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Monthly rows are month-to-date snapshots (keep only the latest per SKU and channel)
    #[serde(default = "default_true")]
    pub cumulative: bool,
}

/// Denominator of the real-income percentage
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum ShareBasis {
    /// Total sales of the whole filtered selection
    #[default]
    FilteredSet,
    /// Each group's own sales (real-income margin)
    OwnSales,
}

#[derive(Debug, Deserialize, Clone)]
pub struct MatrixConfig {
    #[serde(default = "default_own_brand")]
    pub own_brand: String,
    /// Channels shown in the channel and category matrices
    #[serde(default = "default_classification_channels")]
    pub classification_channels: Vec<String>,
    #[serde(default)]
    pub share_basis: ShareBasis,
}

impl Default for MatrixConfig {
    fn default() -> Self {
        Self {
            own_brand: default_own_brand(),
            classification_channels: default_classification_channels(),
            share_basis: ShareBasis::default(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct BfConfig {
    #[serde(default = "default_bf_channels")]
    pub channels: Vec<String>,
}

impl Default for BfConfig {
    fn default() -> Self {
        Self {
            channels: default_bf_channels(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_utc_offset() -> i32 {
    -7
}

fn default_static_dir() -> String {
    "dist".to_string()
}

fn default_sqlite_path() -> String {
    "target/db/warehouse.db".to_string()
}

fn default_clickhouse_user() -> String {
    "default".to_string()
}

fn default_timeout_secs() -> u64 {
    120
}

fn default_true() -> bool {
    true
}

fn default_own_brand() -> String {
    "Loomber".to_string()
}

fn default_classification_channels() -> Vec<String> {
    [
        "CrediTienda",
        "Yuhu",
        "Walmart",
        "Mercado Libre",
        "Shein",
        "Liverpool",
        "Aliexpress",
        "Coppel",
        "TikTok Shop",
        "Temu",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

fn default_bf_channels() -> Vec<String> {
    [
        "Mercado Libre",
        "CrediTienda",
        "Walmart",
        "Shein",
        "Yuhu",
        "Liverpool",
        "AliExpress",
        "Aliexpress",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

/// Default configuration embedded in the binary
const DEFAULT_CONFIG: &str = r#"
[server]
host = "0.0.0.0"
port = 3000
utc_offset_hours = -7

[warehouse]
kind = "sqlite"
path = "target/db/warehouse.db"
cumulative = true
"#;

/// Load configuration from config.toml file
///
/// Search order:
/// 1. Next to the executable (for production)
/// 2. Falls back to embedded default config
pub fn load_config() -> anyhow::Result<Config> {
    if let Ok(exe_path) = std::env::current_exe() {
        if let Some(exe_dir) = exe_path.parent() {
            let config_path = exe_dir.join("config.toml");

            if config_path.exists() {
                tracing::info!("Loading config from: {}", config_path.display());
                let contents = std::fs::read_to_string(&config_path)?;
                return parse_config(&contents);
            } else {
                tracing::warn!("config.toml not found at: {}", config_path.display());
            }
        }
    }

    tracing::info!("Using default embedded configuration");
    parse_config(DEFAULT_CONFIG)
}

pub fn parse_config(contents: &str) -> anyhow::Result<Config> {
    let config: Config = toml::from_str(contents)?;
    if config.warehouse.kind == WarehouseKind::Clickhouse && config.warehouse.url.is_none() {
        anyhow::bail!("[warehouse] kind = \"clickhouse\" requires `url`");
    }
    Ok(config)
}

/// Resolve a configured path.
/// Relative paths are resolved against the executable directory.
pub fn resolve_path(configured: &str) -> PathBuf {
    let path = Path::new(configured);

    if path.is_absolute() {
        return path.to_path_buf();
    }

    if let Ok(exe_path) = std::env::current_exe() {
        if let Some(exe_dir) = exe_path.parent() {
            return exe_dir.join(path);
        }
    }

    PathBuf::from(configured)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_loads() {
        let config = parse_config(DEFAULT_CONFIG).unwrap();
        assert_eq!(config.warehouse.kind, WarehouseKind::Sqlite);
        assert_eq!(config.warehouse.path, "target/db/warehouse.db");
        assert!(config.warehouse.cumulative);
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.matrix.own_brand, "Loomber");
        assert_eq!(config.matrix.classification_channels.len(), 10);
        assert_eq!(config.matrix.share_basis, ShareBasis::FilteredSet);
        assert!(config.bf.channels.iter().any(|c| c == "AliExpress"));
    }

    #[test]
    fn clickhouse_requires_url() {
        let missing = r#"
            [warehouse]
            kind = "clickhouse"
        "#;
        assert!(parse_config(missing).is_err());

        let ok = r#"
            [warehouse]
            kind = "clickhouse"
            url = "http://localhost:8123"
            database = "Silver"

            [matrix]
            own_brand = "Acme"
            classification_channels = ["Walmart"]
            share_basis = "own_sales"
        "#;
        let config = parse_config(ok).unwrap();
        assert_eq!(config.warehouse.user, "default");
        assert_eq!(config.matrix.classification_channels, vec!["Walmart"]);
        assert_eq!(config.matrix.share_basis, ShareBasis::OwnSales);
    }

    #[test]
    fn unknown_warehouse_kind_is_rejected() {
        let bad = r#"
            [warehouse]
            kind = "postgres"
        "#;
        assert!(parse_config(bad).is_err());
    }
}
