//! Battery driver: draws a sequence per analysis and collects the reports.
//!
//! Every analysis starts from a reset generator, so each one sees the same
//! stream prefix regardless of the order or subset selected. A failing
//! analysis is recorded and the rest still run.

use serde::Serialize;

use crate::analysis::{
    self, AcfResult, ComplexityResult, DistributionResult, GoodnessOfFit, PlanarResult,
    RunsResult, SeriesResult,
};
use crate::config::{Analysis, BatteryConfig};
use crate::error::{BatteryError, Result};
use crate::generator::{Generator, GeneratorParams};
use crate::plot::{PlotSeries, Plottable};

/// Output of one analysis.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "analysis", content = "result", rename_all = "snake_case")]
pub enum AnalysisReport {
    Autocorrelation(AcfResult),
    Distribution(DistributionResult),
    LinearComplexity(ComplexityResult),
    Monotonicity(RunsResult),
    Planar(PlanarResult),
    Series(SeriesResult),
}

impl AnalysisReport {
    pub fn analysis(&self) -> Analysis {
        match self {
            AnalysisReport::Autocorrelation(_) => Analysis::Autocorrelation,
            AnalysisReport::Distribution(_) => Analysis::Distribution,
            AnalysisReport::LinearComplexity(_) => Analysis::LinearComplexity,
            AnalysisReport::Monotonicity(_) => Analysis::Monotonicity,
            AnalysisReport::Planar(_) => Analysis::Planar,
            AnalysisReport::Series(_) => Analysis::Series,
        }
    }
}

impl Plottable for AnalysisReport {
    fn figures(&self) -> Vec<PlotSeries> {
        match self {
            AnalysisReport::Autocorrelation(r) => r.figures(),
            AnalysisReport::Distribution(r) => r.figures(),
            AnalysisReport::LinearComplexity(r) => r.figures(),
            AnalysisReport::Monotonicity(r) => r.figures(),
            AnalysisReport::Planar(r) => r.figures(),
            AnalysisReport::Series(r) => r.figures(),
        }
    }
}

/// An analysis that rejected its input.
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisFailure {
    pub analysis: Analysis,
    pub kind: &'static str,
    pub error: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct BatteryReport {
    pub generator: GeneratorParams,
    pub bit_width: u32,
    pub results: Vec<AnalysisReport>,
    pub failures: Vec<AnalysisFailure>,
}

impl BatteryReport {
    pub fn get(&self, analysis: Analysis) -> Option<&AnalysisReport> {
        self.results.iter().find(|r| r.analysis() == analysis)
    }
}

/// Runs configured analyses against a generator.
pub struct Battery<'a> {
    config: &'a BatteryConfig,
    fit: &'a dyn GoodnessOfFit,
}

impl<'a> Battery<'a> {
    pub fn new(config: &'a BatteryConfig, fit: &'a dyn GoodnessOfFit) -> Self {
        Self { config, fit }
    }

    /// Build the configured generator.
    pub fn generator(&self) -> Result<Generator> {
        Generator::from_params(&self.config.generator)
    }

    fn bit_width(&self, generator: &Generator) -> u32 {
        self.config.bit_width.unwrap_or_else(|| generator.bit_width())
    }

    /// Reset the generator, draw the configured length and run `analysis`.
    pub fn run_one(&self, analysis: Analysis, generator: &mut Generator) -> Result<AnalysisReport> {
        let c = self.config;
        let length = c.length_for(analysis);
        let width = self.bit_width(generator);
        generator.reset();
        log::debug!("{analysis}: drawing {length} values");

        let report = match analysis {
            Analysis::Autocorrelation => {
                let values = generator.generate_sequence(length).to_f64();
                AnalysisReport::Autocorrelation(analysis::autocorrelation(&values, c.max_lag)?)
            }
            Analysis::Distribution => {
                let values = generator.normalized_sequence(length);
                AnalysisReport::Distribution(analysis::distribution_analysis(
                    &values,
                    c.num_bins,
                    self.fit,
                )?)
            }
            Analysis::LinearComplexity => {
                let seq = generator.generate_sequence(length);
                AnalysisReport::LinearComplexity(analysis::linear_complexity_analysis(
                    &seq, width,
                )?)
            }
            Analysis::Monotonicity => {
                let seq = generator.generate_sequence(length);
                AnalysisReport::Monotonicity(analysis::runs_analysis(&seq[..])?)
            }
            Analysis::Planar => {
                let values = generator.generate_sequence(length).to_f64();
                AnalysisReport::Planar(analysis::planar_correlation(&values)?)
            }
            Analysis::Series => {
                let seq = generator.generate_sequence(length);
                AnalysisReport::Series(analysis::series_analysis(&seq, width, c.series_k)?)
            }
        };
        Ok(report)
    }

    /// Run every configured analysis; failures are collected, not returned.
    pub fn run(&self, generator: &mut Generator) -> BatteryReport {
        let mut results = Vec::new();
        let mut failures = Vec::new();
        for &analysis in &self.config.analyses {
            match self.run_one(analysis, generator) {
                Ok(report) => results.push(report),
                Err(e) => {
                    log::warn!("{analysis} failed: {e}");
                    failures.push(failure(analysis, &e));
                }
            }
        }
        BatteryReport {
            generator: generator.params(),
            bit_width: self.bit_width(generator),
            results,
            failures,
        }
    }
}

fn failure(analysis: Analysis, e: &BatteryError) -> AnalysisFailure {
    AnalysisFailure {
        analysis,
        kind: e.kind(),
        error: e.to_string(),
    }
}
