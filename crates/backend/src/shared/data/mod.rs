pub mod clickhouse;
pub mod db;
pub mod memory;
pub mod warehouse;
