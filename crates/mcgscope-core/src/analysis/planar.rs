//! Consecutive-pair planar correlation `(x[i], x[i+1])`.

use serde::Serialize;

use super::pearson_correlation;
use crate::error::{BatteryError, Result};

#[derive(Debug, Clone, Serialize)]
pub struct PlanarResult {
    pub points: usize,
    /// Pearson r between `x[i]` and `x[i+1]`.
    pub correlation: f64,
    pub x: Vec<f64>,
    pub y: Vec<f64>,
}

/// Pair every value with its successor and correlate the two projections.
///
/// Fails with `InvalidArgument` below 2 values and with `DivisionByZero` when
/// either projection is constant (always the case for exactly 2 values).
pub fn planar_correlation(values: &[f64]) -> Result<PlanarResult> {
    if values.len() < 2 {
        return Err(BatteryError::invalid_argument(format!(
            "planar correlation needs at least 2 values, got {}",
            values.len()
        )));
    }
    let x = values[..values.len() - 1].to_vec();
    let y = values[1..].to_vec();
    let correlation = pearson_correlation(&x, &y).ok_or_else(|| {
        BatteryError::DivisionByZero("a successor projection has zero variance".to_string())
    })?;
    log::debug!("planar: {} points, r={correlation:.4}", x.len());
    Ok(PlanarResult {
        points: x.len(),
        correlation,
        x,
        y,
    })
}

/// Side of the plotting field for `bits`-bit values, `2^bits - 1`.
pub fn field_size(bits: u32) -> u64 {
    if bits >= u64::BITS {
        u64::MAX
    } else {
        (1u64 << bits) - 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pairs_are_shifted() {
        let r = planar_correlation(&[1.0, 3.0, 2.0, 5.0]).unwrap();
        assert_eq!(r.x, vec![1.0, 3.0, 2.0]);
        assert_eq!(r.y, vec![3.0, 2.0, 5.0]);
        assert_eq!(r.points, 3);
    }

    #[test]
    fn test_linear_ramp_is_perfectly_correlated() {
        let values: Vec<f64> = (0..50).map(|i| i as f64).collect();
        let r = planar_correlation(&values).unwrap();
        assert!((r.correlation - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_alternating_is_anticorrelated() {
        let values: Vec<f64> = (0..51).map(|i| (i % 2) as f64).collect();
        let r = planar_correlation(&values).unwrap();
        assert!((r.correlation + 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_degenerate_inputs() {
        assert!(matches!(
            planar_correlation(&[1.0]),
            Err(BatteryError::InvalidArgument(_))
        ));
        assert!(matches!(
            planar_correlation(&[1.0, 2.0]),
            Err(BatteryError::DivisionByZero(_))
        ));
    }

    #[test]
    fn test_field_size() {
        assert_eq!(field_size(31), 2_147_483_647);
        assert_eq!(field_size(64), u64::MAX);
    }
}
