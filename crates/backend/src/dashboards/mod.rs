pub mod d410_positioning_matrix;
pub mod d411_bf_compliance;
