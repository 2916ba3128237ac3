use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum ToleranceSearch {
    Bisect,
    Scan,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RngScope {
    /// Independent stream per sample, seeded from the sample identity.
    PerSample,
    /// One stream seeded once and consumed in table order.
    Shared,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ClassifyParams {
    pub trials: usize,
    pub noise_alpha: f64,
    pub threshold: f64,
    pub precision: f64,
    pub search: ToleranceSearch,
    pub scan_step: f64,
    pub seed: u64,
    pub rng_scope: RngScope,
}

impl Default for ClassifyParams {
    fn default() -> Self {
        Self {
            trials: 10,
            noise_alpha: 0.5,
            threshold: 0.95,
            precision: 0.01,
            search: ToleranceSearch::Bisect,
            scan_step: 0.05,
            seed: 42,
            rng_scope: RngScope::PerSample,
        }
    }
}
