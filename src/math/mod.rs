pub mod mds;
pub mod rank;
pub mod stats;
