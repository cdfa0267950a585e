//! Lag-indexed autocorrelation estimator.

use serde::Serialize;

use super::{mean, population_variance};
use crate::error::{BatteryError, Result};

/// z-score of the two-sided 95% white-noise band.
const Z_95: f64 = 1.96;

/// ACF values for lags `0..=max_lag` plus the significance band.
#[derive(Debug, Clone, Serialize)]
pub struct AcfResult {
    pub sample_size: usize,
    pub max_lag: usize,
    /// `acf[lag]`, `acf[0] == 1`.
    pub acf: Vec<f64>,
    /// Half-width of the 95% band, `1.96 / sqrt(n)`.
    pub confidence_bound: f64,
    /// Lags in `1..=max_lag` with `|acf| > confidence_bound`.
    pub significant_lags: Vec<usize>,
}

/// `1.96 / sqrt(n)`.
pub fn confidence_bound(n: usize) -> f64 {
    Z_95 / (n as f64).sqrt()
}

/// Biased ACF estimator over the z-normalized sequence.
///
/// `acf[l] = (1/n) * sum_{i < n-l} z[i] * z[i+l]`. The divisor stays `n`
/// for every lag. Requires `n >= 2` and `max_lag < n`; a constant sequence
/// fails with `DivisionByZero`.
pub fn autocorrelation(values: &[f64], max_lag: usize) -> Result<AcfResult> {
    let n = values.len();
    if n < 2 {
        return Err(BatteryError::invalid_argument(format!(
            "autocorrelation needs at least 2 values, got {n}"
        )));
    }
    if max_lag >= n {
        return Err(BatteryError::invalid_argument(format!(
            "max_lag {max_lag} must be below sequence length {n}"
        )));
    }

    let mu = mean(values);
    let var = population_variance(values, mu);
    if var == 0.0 {
        return Err(BatteryError::DivisionByZero(
            "zero-variance sequence cannot be normalized".to_string(),
        ));
    }
    let sd = var.sqrt();
    let z: Vec<f64> = values.iter().map(|x| (x - mu) / sd).collect();

    let mut acf = Vec::with_capacity(max_lag + 1);
    // sum of z^2 is n by construction
    acf.push(1.0);
    for lag in 1..=max_lag {
        let sum: f64 = z[..n - lag]
            .iter()
            .zip(&z[lag..])
            .map(|(a, b)| a * b)
            .sum();
        acf.push(sum / n as f64);
    }

    let bound = confidence_bound(n);
    let significant_lags = acf
        .iter()
        .enumerate()
        .skip(1)
        .filter(|(_, c)| c.abs() > bound)
        .map(|(lag, _)| lag)
        .collect();

    Ok(AcfResult {
        sample_size: n,
        max_lag,
        acf,
        confidence_bound: bound,
        significant_lags,
    })
}
