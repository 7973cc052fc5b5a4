mod category_panel;
mod channel_panel;
mod comparison;
mod dashboard;
mod sku_panel;
mod sku_picker;
mod widgets;

pub use dashboard::PositioningMatrixDashboard;
