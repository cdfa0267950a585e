//! Battery configuration.
//!
//! Every field has a default matching the reference study, so a config file
//! only needs the values it changes.

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::error::{BatteryError, Result};
use crate::generator::GeneratorParams;

/// One diagnostic of the battery.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Analysis {
    Autocorrelation,
    Distribution,
    LinearComplexity,
    Monotonicity,
    Planar,
    Series,
}

impl Analysis {
    pub const ALL: [Analysis; 6] = [
        Analysis::Autocorrelation,
        Analysis::Distribution,
        Analysis::LinearComplexity,
        Analysis::Monotonicity,
        Analysis::Planar,
        Analysis::Series,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Analysis::Autocorrelation => "autocorrelation",
            Analysis::Distribution => "distribution",
            Analysis::LinearComplexity => "linear_complexity",
            Analysis::Monotonicity => "monotonicity",
            Analysis::Planar => "planar",
            Analysis::Series => "series",
        }
    }
}

impl fmt::Display for Analysis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Analysis {
    type Err = BatteryError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "autocorrelation" | "acf" => Ok(Analysis::Autocorrelation),
            "distribution" | "histogram" => Ok(Analysis::Distribution),
            "linear_complexity" | "complexity" => Ok(Analysis::LinearComplexity),
            "monotonicity" | "runs" => Ok(Analysis::Monotonicity),
            "planar" | "scatter" => Ok(Analysis::Planar),
            "series" => Ok(Analysis::Series),
            other => Err(BatteryError::invalid_argument(format!(
                "unknown analysis '{other}'"
            ))),
        }
    }
}

/// Errors loading a configuration file.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("io: {0}")]
    Io(#[from] std::io::Error),
    #[error("parse: {0}")]
    Parse(#[from] serde_json::Error),
    #[error(transparent)]
    Invalid(#[from] BatteryError),
}

/// Lengths and parameters for every analysis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BatteryConfig {
    pub generator: GeneratorParams,
    /// Analyses to run, in order.
    pub analyses: Vec<Analysis>,
    pub autocorrelation_length: usize,
    pub max_lag: usize,
    pub distribution_length: usize,
    pub num_bins: usize,
    /// Integers (not bits) fed to the complexity profile.
    pub complexity_length: usize,
    pub monotonicity_length: usize,
    pub planar_length: usize,
    pub series_length: usize,
    pub series_k: u32,
    /// Bits per value; `None` uses the generator's `⌈log2 N⌉`.
    pub bit_width: Option<u32>,
}

impl Default for BatteryConfig {
    fn default() -> Self {
        Self {
            generator: GeneratorParams::reference(),
            analyses: Analysis::ALL.to_vec(),
            autocorrelation_length: 10_000,
            max_lag: 50,
            distribution_length: 10_000,
            num_bins: 50,
            complexity_length: 100,
            monotonicity_length: 10_000,
            planar_length: 1_000,
            series_length: 1_000,
            series_k: 3,
            bit_width: None,
        }
    }
}

impl BatteryConfig {
    /// Load from a JSON file and validate.
    pub fn from_path(path: &Path) -> std::result::Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Sequence length the given analysis draws.
    pub fn length_for(&self, analysis: Analysis) -> usize {
        match analysis {
            Analysis::Autocorrelation => self.autocorrelation_length,
            Analysis::Distribution => self.distribution_length,
            Analysis::LinearComplexity => self.complexity_length,
            Analysis::Monotonicity => self.monotonicity_length,
            Analysis::Planar => self.planar_length,
            Analysis::Series => self.series_length,
        }
    }

    pub fn set_length(&mut self, analysis: Analysis, length: usize) {
        let slot = match analysis {
            Analysis::Autocorrelation => &mut self.autocorrelation_length,
            Analysis::Distribution => &mut self.distribution_length,
            Analysis::LinearComplexity => &mut self.complexity_length,
            Analysis::Monotonicity => &mut self.monotonicity_length,
            Analysis::Planar => &mut self.planar_length,
            Analysis::Series => &mut self.series_length,
        };
        *slot = length;
    }

    /// Copy with every analysis drawing `length` values, except the
    /// linear-complexity profile, which keeps `complexity_length`.
    pub fn with_length(&self, length: usize) -> Self {
        let mut config = self.clone();
        for analysis in Analysis::ALL {
            if analysis != Analysis::LinearComplexity {
                config.set_length(analysis, length);
            }
        }
        config
    }

    /// Reject settings no analysis could run with.
    pub fn validate(&self) -> Result<()> {
        if self.generator.modulus == 0 {
            return Err(BatteryError::InvalidParameter(
                "modulus must be positive".to_string(),
            ));
        }
        if self.analyses.is_empty() {
            return Err(BatteryError::invalid_argument("no analyses selected"));
        }
        for &analysis in &self.analyses {
            if self.length_for(analysis) == 0 {
                return Err(BatteryError::invalid_argument(format!(
                    "{analysis} length must be positive"
                )));
            }
        }
        if self.num_bins == 0 {
            return Err(BatteryError::invalid_argument("num_bins must be positive"));
        }
        if self.series_k == 0 {
            return Err(BatteryError::invalid_argument("series_k must be positive"));
        }
        Ok(())
    }
}
