//! Uniform-distribution fit over normalized outputs.
//!
//! Bin densities are computed here; the goodness-of-fit statistic is
//! delegated to a [`GoodnessOfFit`] implementation supplied by the caller.

use serde::Serialize;

use super::{mean, population_variance};
use crate::error::{BatteryError, Result};

/// Reference law a sample is tested against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ReferenceDistribution {
    /// Continuous uniform on `[0, 1)`.
    Uniform,
}

/// Scalar outcome of a goodness-of-fit routine.
#[derive(Debug, Clone, Serialize)]
pub struct FitStatistic {
    /// Name of the routine that produced the values.
    pub test: String,
    pub statistic: f64,
    pub p_value: f64,
}

/// One-shot goodness-of-fit routine: sample in, `(statistic, p-value)` out.
pub trait GoodnessOfFit {
    fn goodness_of_fit(
        &self,
        sample: &[f64],
        reference: ReferenceDistribution,
    ) -> Result<FitStatistic>;
}

/// Equal-width density histogram over `[0, 1)`.
#[derive(Debug, Clone, Serialize)]
pub struct Histogram {
    /// `num_bins + 1` edges from 0 to 1.
    pub edges: Vec<f64>,
    pub counts: Vec<u64>,
    /// `count / (n * bin_width)`; a perfectly uniform sample gives 1.0.
    pub densities: Vec<f64>,
}

impl Histogram {
    pub fn num_bins(&self) -> usize {
        self.counts.len()
    }

    pub fn bin_centers(&self) -> Vec<f64> {
        self.edges.windows(2).map(|w| (w[0] + w[1]) / 2.0).collect()
    }
}

/// Mean, population standard deviation and extremes of a sample.
#[derive(Debug, Clone, Serialize)]
pub struct SampleSummary {
    pub sample_size: usize,
    pub mean: f64,
    pub std_dev: f64,
    pub min: f64,
    pub max: f64,
}

impl SampleSummary {
    fn of(values: &[f64]) -> Self {
        let mu = mean(values);
        Self {
            sample_size: values.len(),
            mean: mu,
            std_dev: population_variance(values, mu).sqrt(),
            min: values.iter().copied().fold(f64::INFINITY, f64::min),
            max: values.iter().copied().fold(f64::NEG_INFINITY, f64::max),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct DistributionResult {
    pub summary: SampleSummary,
    pub histogram: Histogram,
    pub fit: FitStatistic,
}

/// Density histogram of `values` (each in `[0, 1)`) with `num_bins` bins.
pub fn histogram(values: &[f64], num_bins: usize) -> Result<Histogram> {
    if num_bins == 0 {
        return Err(BatteryError::invalid_argument("num_bins must be positive"));
    }
    if values.is_empty() {
        return Err(BatteryError::invalid_argument(
            "histogram needs a non-empty sample",
        ));
    }

    let mut counts = vec![0u64; num_bins];
    for &v in values {
        if !(0.0..1.0).contains(&v) {
            return Err(BatteryError::out_of_range(v, "outside the unit interval [0, 1)"));
        }
        let bin = ((v * num_bins as f64) as usize).min(num_bins - 1);
        counts[bin] += 1;
    }

    let width = 1.0 / num_bins as f64;
    let n = values.len() as f64;
    let densities = counts.iter().map(|&c| c as f64 / (n * width)).collect();
    let edges = (0..=num_bins).map(|i| i as f64 / num_bins as f64).collect();

    Ok(Histogram {
        edges,
        counts,
        densities,
    })
}

/// Histogram plus a uniformity fit from the supplied collaborator.
pub fn distribution_analysis(
    values: &[f64],
    num_bins: usize,
    fit: &dyn GoodnessOfFit,
) -> Result<DistributionResult> {
    let histogram = histogram(values, num_bins)?;
    let fit = fit.goodness_of_fit(values, ReferenceDistribution::Uniform)?;
    log::debug!(
        "distribution: n={} {}={:.4} p={:.4}",
        values.len(),
        fit.test,
        fit.statistic,
        fit.p_value
    );
    Ok(DistributionResult {
        summary: SampleSummary::of(values),
        histogram,
        fit,
    })
}
