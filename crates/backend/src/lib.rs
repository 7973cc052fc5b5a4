#![allow(clippy::too_many_arguments, clippy::unnecessary_map_or)]

pub mod api;
pub mod dashboards;
pub mod routes;
pub mod shared;
