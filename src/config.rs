use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::expr::normalize::Normalization;
use crate::model::params::ClassifyParams;
use crate::model::stability::{MAX_NOISE_ALPHA, MIN_SEARCH_STEP};
use crate::submit::SubmitConfig;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("toml parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("invalid config value for {key}: {reason}")]
    Invalid { key: &'static str, reason: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ReportParams {
    /// Genes entering each pairwise MDS distance.
    pub mds_top: usize,
}

impl Default for ReportParams {
    fn default() -> Self {
        Self { mds_top: 500 }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub normalization: Normalization,
    pub classification: ClassifyParams,
    pub report: ReportParams,
    pub submit: SubmitConfig,
}

impl Config {
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let config = match path {
            Some(p) => {
                let text = std::fs::read_to_string(p)?;
                toml::from_str::<Config>(&text)?
            }
            None => Config::default(),
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let n = &self.normalization;
        if !(n.prior > 0.0 && n.prior.is_finite()) {
            return Err(invalid("normalization.prior", "must be positive"));
        }
        if !(n.scale > 0.0 && n.scale.is_finite()) {
            return Err(invalid("normalization.scale", "must be positive"));
        }
        if !(0.0..=1.0).contains(&n.quantile) {
            return Err(invalid("normalization.quantile", "must lie in [0, 1]"));
        }

        let c = &self.classification;
        if c.trials == 0 {
            return Err(invalid("classification.trials", "must be at least 1"));
        }
        if !(0.0..=1.0).contains(&c.threshold) {
            return Err(invalid("classification.threshold", "must lie in [0, 1]"));
        }
        if !(c.precision >= MIN_SEARCH_STEP && c.precision.is_finite()) {
            return Err(invalid(
                "classification.precision",
                &format!("must be finite and at least {MIN_SEARCH_STEP}"),
            ));
        }
        if !(c.scan_step >= MIN_SEARCH_STEP && c.scan_step.is_finite()) {
            return Err(invalid(
                "classification.scan_step",
                &format!("must be finite and at least {MIN_SEARCH_STEP}"),
            ));
        }
        if !(0.0..=MAX_NOISE_ALPHA).contains(&c.noise_alpha) {
            return Err(invalid(
                "classification.noise_alpha",
                &format!("must lie in [0, {MAX_NOISE_ALPHA}]"),
            ));
        }

        if self.report.mds_top == 0 {
            return Err(invalid("report.mds_top", "must be at least 1"));
        }
        if self.submit.program.trim().is_empty() {
            return Err(invalid("submit.program", "must not be empty"));
        }
        Ok(())
    }
}

fn invalid(key: &'static str, reason: &str) -> ConfigError {
    ConfigError::Invalid {
        key,
        reason: reason.to_string(),
    }
}

#[cfg(test)]
#[path = "../tests/src_inline/config.rs"]
mod tests;
