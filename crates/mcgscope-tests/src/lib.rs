//! Hypothesis tests layered on the mcgscope battery.
//!
//! The core computes statistics; this crate turns them into p-values and
//! grades. It also provides [`KolmogorovSmirnov`], the goodness-of-fit
//! collaborator the distribution analyzer delegates to.

use mcgscope_core::analysis::{
    AcfResult, ComplexityResult, DistributionResult, FitStatistic, GoodnessOfFit, PlanarResult,
    ReferenceDistribution, RunsResult, SeriesResult,
};
use mcgscope_core::{AnalysisReport, BatteryError};
use statrs::distribution::{ChiSquared, ContinuousCDF, DiscreteCDF, Normal, Poisson};

// ═══════════════════════════════════════════════════════════════════════════════
// Core types
// ═══════════════════════════════════════════════════════════════════════════════

/// Result of a single hypothesis test.
#[derive(Debug, Clone)]
pub struct TestResult {
    pub name: String,
    pub passed: bool,
    pub p_value: Option<f64>,
    pub statistic: f64,
    pub details: String,
    pub grade: char,
}

impl TestResult {
    /// Assign a letter grade based on p-value.
    ///
    /// - A: p >= 0.1
    /// - B: p >= 0.01
    /// - C: p >= 0.001
    /// - D: p >= 0.0001
    /// - F: otherwise or None
    pub fn grade_from_p(p: Option<f64>) -> char {
        match p {
            Some(p) if p >= 0.1 => 'A',
            Some(p) if p >= 0.01 => 'B',
            Some(p) if p >= 0.001 => 'C',
            Some(p) if p >= 0.0001 => 'D',
            _ => 'F',
        }
    }

    /// Determine pass/fail from p-value against a threshold (default 0.01).
    pub fn pass_from_p(p: Option<f64>, threshold: f64) -> bool {
        match p {
            Some(p) => p >= threshold,
            None => false,
        }
    }

    fn from_p(name: &str, statistic: f64, p: f64, details: String) -> Self {
        Self {
            name: name.to_string(),
            passed: Self::pass_from_p(Some(p), 0.01),
            p_value: Some(p),
            statistic,
            details,
            grade: Self::grade_from_p(Some(p)),
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Distribution tails
// ═══════════════════════════════════════════════════════════════════════════════

/// Upper tail `P(X >= chi2)` of a chi-square law with `df` degrees of freedom.
pub fn chi_square_p_value(chi2: f64, df: u64) -> f64 {
    if df == 0 {
        return 1.0;
    }
    match ChiSquared::new(df as f64) {
        Ok(dist) => dist.sf(chi2.max(0.0)),
        Err(_) => 1.0,
    }
}

/// Two-sided standard normal tail for `z`.
fn two_sided_normal_p(z: f64) -> f64 {
    let norm = Normal::standard();
    (2.0 * (1.0 - norm.cdf(z.abs()))).clamp(0.0, 1.0)
}

/// Asymptotic Kolmogorov distribution tail with the Stephens correction.
fn kolmogorov_p_value(d: f64, n: usize) -> f64 {
    let sqrt_n = (n as f64).sqrt();
    let lambda = (sqrt_n + 0.12 + 0.11 / sqrt_n) * d;
    if lambda < 1e-3 {
        return 1.0;
    }
    let mut p = 0.0;
    for k in 1..=100i32 {
        let sign = if k % 2 == 0 { -1.0 } else { 1.0 };
        let term = sign * (-2.0 * (k as f64 * lambda).powi(2)).exp();
        p += term;
        if term.abs() < 1e-12 {
            break;
        }
    }
    (2.0 * p).clamp(0.0, 1.0)
}

// ═══════════════════════════════════════════════════════════════════════════════
// Goodness of fit
// ═══════════════════════════════════════════════════════════════════════════════

/// One-sample Kolmogorov–Smirnov test.
#[derive(Debug, Clone, Copy, Default)]
pub struct KolmogorovSmirnov;

impl KolmogorovSmirnov {
    /// `D = max |F_n(x) - x|` for a sample on `[0, 1]`.
    pub fn uniform_statistic(sample: &[f64]) -> f64 {
        let mut sorted = sample.to_vec();
        sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
        let nf = sorted.len() as f64;
        let mut d_max = 0.0f64;
        for (i, &x) in sorted.iter().enumerate() {
            let f_x = x.clamp(0.0, 1.0);
            let d_plus = (i + 1) as f64 / nf - f_x;
            let d_minus = f_x - i as f64 / nf;
            d_max = d_max.max(d_plus).max(d_minus);
        }
        d_max
    }
}

impl GoodnessOfFit for KolmogorovSmirnov {
    fn goodness_of_fit(
        &self,
        sample: &[f64],
        reference: ReferenceDistribution,
    ) -> Result<FitStatistic, BatteryError> {
        if sample.is_empty() {
            return Err(BatteryError::InvalidArgument(
                "Kolmogorov-Smirnov needs a non-empty sample".to_string(),
            ));
        }
        let statistic = match reference {
            ReferenceDistribution::Uniform => Self::uniform_statistic(sample),
        };
        Ok(FitStatistic {
            test: "kolmogorov_smirnov".to_string(),
            statistic,
            p_value: kolmogorov_p_value(statistic, sample.len()),
        })
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Per-analysis tests
// ═══════════════════════════════════════════════════════════════════════════════

/// Lags outside the 95% band, against a Poisson count of 5% of `max_lag`.
pub fn acf_violations(acf: &AcfResult) -> TestResult {
    let violations = acf.significant_lags.len() as u64;
    let lambda = (0.05 * acf.max_lag as f64).max(1.0);
    let p = if violations == 0 {
        1.0
    } else {
        match Poisson::new(lambda) {
            Ok(poisson) => poisson.sf(violations - 1),
            Err(_) => 0.0,
        }
    };
    TestResult::from_p(
        "Autocorrelation",
        violations as f64,
        p,
        format!(
            "violations={violations}/{}, band=±{:.4}",
            acf.max_lag, acf.confidence_bound
        ),
    )
}

/// Uniformity from the fit the distribution analyzer already obtained.
pub fn uniformity(dist: &DistributionResult) -> TestResult {
    TestResult::from_p(
        "Uniformity",
        dist.fit.statistic,
        dist.fit.p_value,
        format!(
            "{} D={:.6}, mean={:.4}, sd={:.4}",
            dist.fit.test, dist.fit.statistic, dist.summary.mean, dist.summary.std_dev
        ),
    )
}

/// Distance of the final complexity from `n/2`; graded, no p-value.
pub fn complexity_deviation(result: &ComplexityResult) -> TestResult {
    let ideal = result.bit_length as f64 / 2.0;
    let gap = (result.final_complexity as f64 - ideal).abs();
    let grade = if gap <= 1.0 {
        'A'
    } else if gap <= 2.0 {
        'B'
    } else if gap <= 4.0 {
        'C'
    } else if gap <= 8.0 {
        'D'
    } else {
        'F'
    };
    TestResult {
        name: "Linear Complexity".to_string(),
        passed: gap <= 2.0,
        p_value: None,
        statistic: gap,
        details: format!(
            "L={} of {} bits, mean |L-k/2|={:.2}",
            result.final_complexity, result.bit_length, result.mean_deviation
        ),
        grade,
    }
}

/// Runs up and down: total run count against `(2n-1)/3`, variance `(16n-29)/90`.
pub fn runs_up_down(result: &RunsResult) -> TestResult {
    let n = result.sample_size as f64;
    let runs = result.runs.total_runs() as f64;
    let expected = (2.0 * n - 1.0) / 3.0;
    let variance = (16.0 * n - 29.0) / 90.0;
    let z = if variance > 0.0 {
        (runs - expected) / variance.sqrt()
    } else {
        0.0
    };
    TestResult::from_p(
        "Runs Up/Down",
        z.abs(),
        two_sided_normal_p(z),
        format!("runs={runs}, expected={expected:.1}, z={z:.4}"),
    )
}

/// Successor correlation: `t = r * sqrt((n-2)/(1-r^2))`, normal tail.
pub fn successor_correlation(result: &PlanarResult) -> TestResult {
    let n = result.points as f64;
    let r = result.correlation;
    let t = if n > 2.0 {
        r * ((n - 2.0) / (1.0 - r * r).max(1e-15)).sqrt()
    } else {
        0.0
    };
    TestResult::from_p(
        "Planar Correlation",
        r.abs(),
        two_sided_normal_p(t),
        format!("r={r:.6}, t={t:.4}"),
    )
}

/// Chi-square tails for the bit counts (1 df) and the series table (`2^k - 1` df).
pub fn series_chi_square(result: &SeriesResult) -> Vec<TestResult> {
    let k = result.k();
    let bits_p = chi_square_p_value(result.bit_chi_square, 1);
    let series_df = (1u64 << k) - 1;
    let series_p = chi_square_p_value(result.series_chi_square, series_df);
    vec![
        TestResult::from_p(
            "Bit Frequency",
            result.bit_chi_square,
            bits_p,
            format!("ones={:.4}, df=1", result.ones_frequency),
        ),
        TestResult::from_p(
            "Series Frequency",
            result.series_chi_square,
            series_p,
            format!("k={k}, windows={}, df={series_df}", result.total_windows),
        ),
    ]
}

/// Every test that applies to a report.
pub fn evaluate(report: &AnalysisReport) -> Vec<TestResult> {
    match report {
        AnalysisReport::Autocorrelation(r) => vec![acf_violations(r)],
        AnalysisReport::Distribution(r) => vec![uniformity(r)],
        AnalysisReport::LinearComplexity(r) => vec![complexity_deviation(r)],
        AnalysisReport::Monotonicity(r) => vec![runs_up_down(r)],
        AnalysisReport::Planar(r) => vec![successor_correlation(r)],
        AnalysisReport::Series(r) => series_chi_square(r),
    }
}

/// Calculate overall quality score (0-100) from test results.
///
/// Each grade maps to a score: A=100, B=75, C=50, D=25, F=0.
/// Returns the average across all tests.
pub fn calculate_quality_score(results: &[TestResult]) -> f64 {
    if results.is_empty() {
        return 0.0;
    }
    let total: f64 = results
        .iter()
        .map(|r| match r.grade {
            'A' => 100.0,
            'B' => 75.0,
            'C' => 50.0,
            'D' => 25.0,
            _ => 0.0,
        })
        .sum();
    total / results.len() as f64
}
