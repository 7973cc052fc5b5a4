mod dashboard;
mod filters;
mod inventory;
mod table;

pub use dashboard::BfComplianceDashboard;
