pub mod api;
pub mod chart_config;
pub mod ui;
