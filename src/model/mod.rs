pub mod classifier;
pub mod params;
pub mod seed;
pub mod stability;
