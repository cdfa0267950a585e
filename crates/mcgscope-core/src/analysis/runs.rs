//! Monotonicity: lengths of maximal increasing and decreasing runs.
//!
//! The first pair fixes the direction of the first run and seeds it at length
//! 1; every later run starts at length 2 because the pair that broke the
//! previous run belongs to it. Equal neighbours never continue a run, so a
//! tie forces a break and flips the direction.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::error::{BatteryError, Result};

/// Run lengths in order of occurrence.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RunLengths {
    pub increasing: Vec<usize>,
    pub decreasing: Vec<usize>,
}

impl RunLengths {
    pub fn total_runs(&self) -> usize {
        self.increasing.len() + self.decreasing.len()
    }

    /// Transitions accounted for: the summed lengths minus the pair shared
    /// at each breakpoint. Equals `n - 1` for an input of length `n`.
    pub fn transitions(&self) -> usize {
        let sum: usize = self.increasing.iter().chain(&self.decreasing).sum();
        sum - self.total_runs().saturating_sub(1)
    }

    fn record(&mut self, rising: bool, length: usize) {
        if rising {
            self.increasing.push(length);
        } else {
            self.decreasing.push(length);
        }
    }
}

/// Segment `values` (length >= 2) into maximal monotonic runs.
pub fn monotonic_runs<T: PartialOrd>(values: &[T]) -> Result<RunLengths> {
    if values.len() < 2 {
        return Err(BatteryError::invalid_argument(format!(
            "run segmentation needs at least 2 values, got {}",
            values.len()
        )));
    }

    let mut runs = RunLengths::default();
    let mut rising = values[1] > values[0];
    let mut length = 1usize;

    for pair in values[1..].windows(2) {
        let (prev, cur) = (&pair[0], &pair[1]);
        let continues = if rising { cur > prev } else { cur < prev };
        if continues {
            length += 1;
        } else {
            runs.record(rising, length);
            length = 2;
            rising = !rising;
        }
    }
    runs.record(rising, length);

    Ok(runs)
}

/// Count, mean and maximum of one direction's run lengths.
#[derive(Debug, Clone, Serialize)]
pub struct RunStats {
    pub count: usize,
    pub mean_length: f64,
    pub max_length: usize,
}

impl RunStats {
    fn of(lengths: &[usize]) -> Self {
        let count = lengths.len();
        let mean_length = if count == 0 {
            0.0
        } else {
            lengths.iter().sum::<usize>() as f64 / count as f64
        };
        Self {
            count,
            mean_length,
            max_length: lengths.iter().copied().max().unwrap_or(0),
        }
    }
}

/// How many runs of a given length occurred in each direction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RunLengthRow {
    pub length: usize,
    pub increasing: usize,
    pub decreasing: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct RunsResult {
    pub sample_size: usize,
    pub increasing: RunStats,
    pub decreasing: RunStats,
    /// Rows for every length that occurred at least once, ascending.
    pub table: Vec<RunLengthRow>,
    pub runs: RunLengths,
}

/// Segment and tabulate.
pub fn runs_analysis<T: PartialOrd>(values: &[T]) -> Result<RunsResult> {
    let runs = monotonic_runs(values)?;

    let mut by_length: BTreeMap<usize, (usize, usize)> = BTreeMap::new();
    for &len in &runs.increasing {
        by_length.entry(len).or_default().0 += 1;
    }
    for &len in &runs.decreasing {
        by_length.entry(len).or_default().1 += 1;
    }
    let table = by_length
        .into_iter()
        .map(|(length, (increasing, decreasing))| RunLengthRow {
            length,
            increasing,
            decreasing,
        })
        .collect();

    log::debug!(
        "runs: {} increasing, {} decreasing over {} values",
        runs.increasing.len(),
        runs.decreasing.len(),
        values.len()
    );

    Ok(RunsResult {
        sample_size: values.len(),
        increasing: RunStats::of(&runs.increasing),
        decreasing: RunStats::of(&runs.decreasing),
        table,
        runs,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    #[test]
    fn test_first_run_seeded_at_one() {
        let runs = monotonic_runs(&[1, 2, 3]).unwrap();
        assert_eq!(runs.increasing, vec![2]);
        assert!(runs.decreasing.is_empty());
    }

    #[test]
    fn test_up_down_up() {
        let runs = monotonic_runs(&[1, 2, 3, 2, 1, 5]).unwrap();
        assert_eq!(runs.increasing, vec![2, 2]);
        assert_eq!(runs.decreasing, vec![3]);
        assert_eq!(runs.transitions(), 5);
    }

    #[test]
    fn test_single_pair() {
        assert_eq!(monotonic_runs(&[5, 4]).unwrap().decreasing, vec![1]);
        assert_eq!(monotonic_runs(&[4, 5]).unwrap().increasing, vec![1]);
    }

    #[test]
    fn test_leading_tie_starts_decreasing() {
        let runs = monotonic_runs(&[1, 1, 2]).unwrap();
        assert_eq!(runs.decreasing, vec![1]);
        assert_eq!(runs.increasing, vec![2]);
    }

    #[test]
    fn test_tie_forces_break() {
        let runs = monotonic_runs(&[3, 1, 1, 0]).unwrap();
        assert_eq!(runs.decreasing, vec![1, 2]);
        assert_eq!(runs.increasing, vec![2]);
        assert_eq!(runs.transitions(), 3);
    }

    #[test]
    fn test_too_short() {
        assert!(matches!(
            monotonic_runs(&[1u64]),
            Err(BatteryError::InvalidArgument(_))
        ));
        assert!(monotonic_runs::<u64>(&[]).is_err());
    }

    #[test]
    fn test_transitions_cover_every_pair() {
        let mut rng = StdRng::seed_from_u64(11);
        for n in [2usize, 3, 10, 257, 5000] {
            // Small alphabet so ties occur too.
            let values: Vec<u8> = (0..n).map(|_| rng.random_range(0..6u8)).collect();
            let runs = monotonic_runs(&values).unwrap();
            assert_eq!(runs.transitions(), n - 1, "n={n}");
        }
    }

    #[test]
    fn test_analysis_table() {
        let result = runs_analysis(&[1, 2, 3, 2, 1, 5]).unwrap();
        assert_eq!(result.sample_size, 6);
        assert_eq!(result.increasing.count, 2);
        assert_eq!(result.decreasing.max_length, 3);
        assert_eq!(
            result.table,
            vec![
                RunLengthRow {
                    length: 2,
                    increasing: 2,
                    decreasing: 0
                },
                RunLengthRow {
                    length: 3,
                    increasing: 0,
                    decreasing: 1
                },
            ]
        );
    }

    #[test]
    fn test_generator_runs_alternate() {
        let seq = crate::generator::Generator::reference().generate_sequence(2000);
        let result = runs_analysis(&seq[..]).unwrap();
        let diff = result.increasing.count as i64 - result.decreasing.count as i64;
        assert!(diff.abs() <= 1);
        assert!(result.increasing.mean_length >= 1.0);
    }
}
