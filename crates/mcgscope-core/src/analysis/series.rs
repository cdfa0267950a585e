//! Bit and k-bit series frequencies with chi-square scoring.
//!
//! Every value is expanded to its own fixed-width block; windows slide inside
//! a block and never straddle two values.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::error::{BatteryError, Result};
use crate::sequence::{check_fits, check_width};

/// Largest pattern length accepted; the table holds `2^k` entries.
pub const MAX_SERIES_LEN: u32 = 16;

/// Occurrence count of every k-bit pattern, zero counts included.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SeriesFrequencyTable {
    pub k: u32,
    /// Keyed by the zero-padded pattern, e.g. `"010"`.
    pub counts: BTreeMap<String, u64>,
}

impl SeriesFrequencyTable {
    fn from_counts(k: u32, counts: &[u64]) -> Self {
        let counts = counts
            .iter()
            .enumerate()
            .map(|(pattern, &count)| (format!("{pattern:0w$b}", w = k as usize), count))
            .collect();
        Self { k, counts }
    }

    pub fn total(&self) -> u64 {
        self.counts.values().sum()
    }

    pub fn get(&self, pattern: &str) -> Option<u64> {
        self.counts.get(pattern).copied()
    }

    /// Each count over the total number of windows.
    pub fn relative_frequencies(&self) -> BTreeMap<String, f64> {
        let total = self.total() as f64;
        self.counts
            .iter()
            .map(|(p, &c)| (p.clone(), if total > 0.0 { c as f64 / total } else { 0.0 }))
            .collect()
    }
}

/// Pearson chi-square of `observed` against a flat `expected` count.
///
/// Never negative; zero exactly when every cell equals `expected`.
pub fn chi_square(observed: &[u64], expected: f64) -> f64 {
    observed
        .iter()
        .map(|&o| {
            let diff = o as f64 - expected;
            diff * diff / expected
        })
        .sum()
}

#[derive(Debug, Clone, Serialize)]
pub struct SeriesResult {
    pub sample_size: usize,
    pub bit_width: u32,
    pub total_bits: u64,
    pub zeros: u64,
    pub ones: u64,
    /// Ones over total bits; ideal 0.5.
    pub ones_frequency: f64,
    /// Chi-square of `[zeros, ones]` against `total_bits / 2`.
    pub bit_chi_square: f64,
    pub total_windows: u64,
    /// `total_windows / 2^k`.
    pub expected_series_count: f64,
    pub series_chi_square: f64,
    pub table: SeriesFrequencyTable,
}

impl SeriesResult {
    pub fn k(&self) -> u32 {
        self.table.k
    }
}

/// Count bits and overlapping `k`-bit windows over `bit_width`-bit blocks.
pub fn series_analysis(values: &[u64], bit_width: u32, k: u32) -> Result<SeriesResult> {
    check_width(bit_width)?;
    if k == 0 || k > bit_width || k > MAX_SERIES_LEN {
        return Err(BatteryError::invalid_argument(format!(
            "series length must be in 1..={}, got {k}",
            bit_width.min(MAX_SERIES_LEN)
        )));
    }
    if values.is_empty() {
        return Err(BatteryError::invalid_argument(
            "series analysis needs at least one value",
        ));
    }

    let mask = (1u64 << k) - 1;
    let windows_per_value = bit_width - k + 1;
    let mut counts = vec![0u64; 1 << k];
    let mut ones = 0u64;

    for &value in values {
        check_fits(value, bit_width)?;
        ones += u64::from(value.count_ones());
        for start in 0..windows_per_value {
            let shift = bit_width - k - start;
            counts[((value >> shift) & mask) as usize] += 1;
        }
    }

    let total_bits = values.len() as u64 * u64::from(bit_width);
    let zeros = total_bits - ones;
    let total_windows = values.len() as u64 * u64::from(windows_per_value);
    let expected_series_count = total_windows as f64 / (1u64 << k) as f64;

    log::debug!(
        "series: {} blocks of {bit_width} bits, k={k}, {total_windows} windows",
        values.len()
    );

    Ok(SeriesResult {
        sample_size: values.len(),
        bit_width,
        total_bits,
        zeros,
        ones,
        ones_frequency: ones as f64 / total_bits as f64,
        bit_chi_square: chi_square(&[zeros, ones], total_bits as f64 / 2.0),
        total_windows,
        expected_series_count,
        series_chi_square: chi_square(&counts, expected_series_count),
        table: SeriesFrequencyTable::from_counts(k, &counts),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator::Generator;

    #[test]
    fn test_table_prepopulated() {
        let r = series_analysis(&[0], 8, 3).unwrap();
        assert_eq!(r.table.counts.len(), 8);
        assert_eq!(r.table.get("000"), Some(6));
        assert_eq!(r.table.get("111"), Some(0));
        assert_eq!(r.k(), 3);
    }

    #[test]
    fn test_windows_stay_inside_block() {
        // 0b1000 then 0b0001: crossing windows would see "10" at the seam.
        let r = series_analysis(&[0b1000, 0b0001], 4, 2).unwrap();
        assert_eq!(r.total_windows, 6);
        assert_eq!(r.table.get("10"), Some(1));
        assert_eq!(r.table.get("01"), Some(1));
        assert_eq!(r.table.get("00"), Some(4));
        assert_eq!(r.table.get("11"), Some(0));
        assert_eq!(r.table.total(), r.total_windows);
    }

    #[test]
    fn test_bit_counts() {
        let r = series_analysis(&[0b101, 0b111], 3, 1).unwrap();
        assert_eq!(r.total_bits, 6);
        assert_eq!(r.ones, 5);
        assert_eq!(r.zeros, 1);
        assert_eq!(r.table.get("1"), Some(5));
        // (1-3)^2/3 + (5-3)^2/3
        assert!((r.bit_chi_square - 8.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_chi_square_zero_only_when_exact() {
        assert_eq!(chi_square(&[5, 5, 5, 5], 5.0), 0.0);
        assert!(chi_square(&[4, 6, 5, 5], 5.0) > 0.0);
    }

    #[test]
    fn test_balanced_block_scores_zero() {
        // 0b0011 in 4 bits holds two of each bit.
        let r = series_analysis(&[0b0011], 4, 1).unwrap();
        assert_eq!(r.bit_chi_square, 0.0);
        assert_eq!(r.series_chi_square, 0.0);
    }

    #[test]
    fn test_generator_series_non_negative() {
        let seq = Generator::reference().generate_sequence(1000);
        let r = series_analysis(&seq, 31, 3).unwrap();
        assert_eq!(r.total_bits, 31_000);
        assert_eq!(r.total_windows, 29_000);
        assert_eq!(r.table.total(), 29_000);
        assert!(r.series_chi_square >= 0.0);
        assert!(r.bit_chi_square >= 0.0);
        let freq_sum: f64 = r.table.relative_frequencies().values().sum();
        assert!((freq_sum - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_argument_checks() {
        assert!(matches!(
            series_analysis(&[1], 31, 0),
            Err(BatteryError::InvalidArgument(_))
        ));
        assert!(matches!(
            series_analysis(&[1], 4, 5),
            Err(BatteryError::InvalidArgument(_))
        ));
        assert!(matches!(
            series_analysis(&[], 31, 3),
            Err(BatteryError::InvalidArgument(_))
        ));
        assert!(matches!(
            series_analysis(&[1 << 31], 31, 3),
            Err(BatteryError::RangeError { .. })
        ));
    }
}
