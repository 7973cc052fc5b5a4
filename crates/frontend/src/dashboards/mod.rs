pub mod d410_positioning_matrix;
pub mod d411_bf_compliance;

pub use d410_positioning_matrix::ui::PositioningMatrixDashboard;
pub use d411_bf_compliance::ui::BfComplianceDashboard;
