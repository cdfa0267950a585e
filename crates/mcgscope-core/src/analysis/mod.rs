//! Statistical diagnostics run over materialized sequences.
//!
//! Analyzers are independent pure functions: each takes an immutable slice
//! and returns a serializable report, so any subset can be run over the same
//! sequence without coordination.

pub mod autocorrelation;
pub mod complexity;
pub mod distribution;
pub mod planar;
pub mod runs;
pub mod series;

pub use autocorrelation::{AcfResult, autocorrelation, confidence_bound};
pub use complexity::{
    ComplexityProfile, ComplexityResult, LinearComplexity, complexity_profile, linear_complexity,
    linear_complexity_analysis,
};
pub use distribution::{
    DistributionResult, FitStatistic, GoodnessOfFit, Histogram, ReferenceDistribution,
    SampleSummary, distribution_analysis, histogram,
};
pub use planar::{PlanarResult, field_size, planar_correlation};
pub use runs::{RunLengthRow, RunLengths, RunStats, RunsResult, monotonic_runs, runs_analysis};
pub use series::{
    MAX_SERIES_LEN, SeriesFrequencyTable, SeriesResult, chi_square, series_analysis,
};

// ---------------------------------------------------------------------------
// Shared helpers
// ---------------------------------------------------------------------------

pub(crate) fn mean(values: &[f64]) -> f64 {
    values.iter().sum::<f64>() / values.len() as f64
}

/// Population variance (divides by `n`).
pub(crate) fn population_variance(values: &[f64], mean: f64) -> f64 {
    values.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / values.len() as f64
}

/// Pearson correlation coefficient, `None` when either side has zero variance.
pub(crate) fn pearson_correlation(a: &[f64], b: &[f64]) -> Option<f64> {
    let mean_a = mean(a);
    let mean_b = mean(b);

    let mut cov = 0.0;
    let mut var_a = 0.0;
    let mut var_b = 0.0;
    for (&x, &y) in a.iter().zip(b) {
        let da = x - mean_a;
        let db = y - mean_b;
        cov += da * db;
        var_a += da * da;
        var_b += db * db;
    }

    let denom = (var_a * var_b).sqrt();
    if denom == 0.0 { None } else { Some(cov / denom) }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mean_and_variance() {
        let v = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
        let m = mean(&v);
        assert_eq!(m, 5.0);
        assert_eq!(population_variance(&v, m), 4.0);
    }

    #[test]
    fn test_pearson_perfect() {
        let a = [1.0, 2.0, 3.0, 4.0];
        let b = [2.0, 4.0, 6.0, 8.0];
        assert!((pearson_correlation(&a, &b).unwrap() - 1.0).abs() < 1e-12);
        let c = [8.0, 6.0, 4.0, 2.0];
        assert!((pearson_correlation(&a, &c).unwrap() + 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_pearson_constant_is_none() {
        assert!(pearson_correlation(&[1.0, 2.0, 3.0], &[5.0, 5.0, 5.0]).is_none());
    }
}
