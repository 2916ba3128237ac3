pub mod matrix;
pub mod normalize;
pub mod qc;
