pub mod centroids;
pub mod cli;
pub mod config;
pub mod expr;
pub mod input;
pub mod math;
pub mod model;
pub mod pipeline;
pub mod report;
pub mod submit;

pub mod prelude {
    pub use crate::centroids::defs::CentroidSet;
    pub use crate::config::Config;
    pub use crate::input::toc::SampleKey;
    pub use crate::model::params::ClassifyParams;
    pub use crate::pipeline::stage1_load::DatasetCtx;
}
