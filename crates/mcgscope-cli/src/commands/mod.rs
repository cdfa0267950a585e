pub mod analyze;
pub mod battery;
pub mod generate;

use std::path::{Path, PathBuf};

use mcgscope_core::{
    BatteryConfig, Generator, GeneratorParams, PlotSeries, PlotSink, Plottable,
    render_best_effort,
};
use mcgscope_tests::TestResult;
use serde::Serialize;

/// Values from the command line layered over the config file.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub config: Option<String>,
    pub modulus: Option<u64>,
    pub multiplier: Option<u64>,
    pub increment: Option<u64>,
    pub seed: Option<u64>,
    pub q: Option<u64>,
    pub max_lag: Option<usize>,
    pub num_bins: Option<usize>,
    pub series_k: Option<u32>,
    pub bit_width: Option<u32>,
}

impl ConfigOverrides {
    /// Apply onto `config`. `q` selects the reference family first; the
    /// explicit generator flags then win over it.
    pub fn apply(&self, config: &mut BatteryConfig) {
        if let Some(q) = self.q {
            config.generator = GeneratorParams::from_q(q);
        }
        let g = &mut config.generator;
        if let Some(v) = self.modulus {
            g.modulus = v;
        }
        if let Some(v) = self.multiplier {
            g.multiplier = v;
        }
        if let Some(v) = self.increment {
            g.increment = v;
        }
        if let Some(v) = self.seed {
            g.seed = v;
        }
        if let Some(v) = self.max_lag {
            config.max_lag = v;
        }
        if let Some(v) = self.num_bins {
            config.num_bins = v;
        }
        if let Some(v) = self.series_k {
            config.series_k = v;
        }
        if self.bit_width.is_some() {
            config.bit_width = self.bit_width;
        }
    }
}

/// Options for single-analysis subcommands.
#[derive(Debug, Clone, Default)]
pub struct AnalyzeOptions {
    pub length: Option<usize>,
    pub output: Option<String>,
    pub plot_dir: Option<String>,
}

/// Load the config file (if any), apply overrides and validate.
pub fn build_config(overrides: &ConfigOverrides) -> Result<BatteryConfig, String> {
    let mut config = match &overrides.config {
        Some(path) => BatteryConfig::from_path(Path::new(path))
            .map_err(|e| format!("Failed to load config {path}: {e}"))?,
        None => BatteryConfig::default(),
    };
    overrides.apply(&mut config);
    config.validate().map_err(|e| e.to_string())?;
    Ok(config)
}

/// [`build_config`] plus the generator, exiting on error.
pub fn load(overrides: &ConfigOverrides) -> (BatteryConfig, Generator) {
    let config = build_config(overrides).unwrap_or_else(|e| {
        eprintln!("{e}");
        std::process::exit(1);
    });
    let generator = Generator::from_params(&config.generator).unwrap_or_else(|e| {
        eprintln!("Invalid generator: {e}");
        std::process::exit(1);
    });
    log::debug!("battery config: {config:?}");
    (config, generator)
}

/// Parse a comma-separated list.
pub fn parse_list<T: std::str::FromStr>(s: &str) -> Result<Vec<T>, String>
where
    T::Err: std::fmt::Display,
{
    s.split(',')
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .map(|p| p.parse::<T>().map_err(|e| format!("'{p}': {e}")))
        .collect()
}

/// Pretty JSON to `path`; reports but does not abort on failure.
pub fn write_json<T: Serialize>(path: &str, value: &T) {
    let json = match serde_json::to_string_pretty(value) {
        Ok(json) => json,
        Err(e) => {
            eprintln!("Failed to serialize report: {e}");
            return;
        }
    };
    match std::fs::write(path, json) {
        Ok(()) => println!("\n📄 Report saved to: {path}"),
        Err(e) => eprintln!("Failed to write report to {path}: {e}"),
    }
}

/// Test results as JSON rows.
pub fn tests_json(tests: &[TestResult]) -> serde_json::Value {
    tests
        .iter()
        .map(|t| {
            serde_json::json!({
                "name": t.name,
                "passed": t.passed,
                "p_value": t.p_value,
                "statistic": t.statistic,
                "details": t.details,
                "grade": t.grade.to_string(),
            })
        })
        .collect()
}

/// Plot sink writing each figure as a JSON document.
pub struct JsonPlotSink;

impl PlotSink for JsonPlotSink {
    fn render(&self, figure: &PlotSeries, output: &Path) -> std::io::Result<()> {
        if let Some(parent) = output.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(figure).map_err(std::io::Error::other)?;
        std::fs::write(output, json)
    }
}

/// Write every figure of `report` to `dir/<name>_<suffix>.json`.
pub fn write_figures(report: &dyn Plottable, dir: &str, suffix: usize) -> Vec<PathBuf> {
    let mut written = Vec::new();
    for figure in report.figures() {
        let path = Path::new(dir).join(format!("{}_{suffix}.json", figure.name));
        if render_best_effort(&JsonPlotSink, &figure, &path) {
            written.push(path);
        }
    }
    written
}
