//! Figure data handed to an external rendering sink.
//!
//! Rendering is not done here: reports expose [`PlotSeries`] values and a
//! [`PlotSink`] decides what to do with them. Sink failures are reported
//! but never abort an analysis.

use std::path::Path;

use serde::Serialize;

use crate::analysis::{
    AcfResult, ComplexityResult, DistributionResult, PlanarResult, RunsResult, SeriesResult,
};

/// How the sink should draw the points.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PlotKind {
    Line,
    Stem,
    Bar,
    Scatter,
}

/// Horizontal guide such as an ideal value or a confidence band edge.
#[derive(Debug, Clone, Serialize)]
pub struct Guide {
    pub label: String,
    pub y: f64,
}

/// One figure: paired coordinates plus labelling.
#[derive(Debug, Clone, Serialize)]
pub struct PlotSeries {
    /// File-name stem, e.g. `autocorrelation`.
    pub name: String,
    pub kind: PlotKind,
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    /// Per-point tick labels (bar charts); empty otherwise.
    pub labels: Vec<String>,
    pub x: Vec<f64>,
    pub y: Vec<f64>,
    pub guides: Vec<Guide>,
}

impl PlotSeries {
    fn new(name: &str, kind: PlotKind, title: String, x_label: &str, y_label: &str) -> Self {
        Self {
            name: name.to_string(),
            kind,
            title,
            x_label: x_label.to_string(),
            y_label: y_label.to_string(),
            labels: Vec::new(),
            x: Vec::new(),
            y: Vec::new(),
            guides: Vec::new(),
        }
    }

    fn guide(mut self, label: &str, y: f64) -> Self {
        self.guides.push(Guide {
            label: label.to_string(),
            y,
        });
        self
    }
}

/// Rendering collaborator: `(x, y, labels) -> output`.
pub trait PlotSink {
    fn render(&self, figure: &PlotSeries, output: &Path) -> std::io::Result<()>;
}

/// Render and log instead of failing. Returns whether the sink succeeded.
pub fn render_best_effort(sink: &dyn PlotSink, figure: &PlotSeries, output: &Path) -> bool {
    match sink.render(figure, output) {
        Ok(()) => {
            log::debug!("rendered {} to {}", figure.name, output.display());
            true
        }
        Err(e) => {
            log::warn!("could not render {} to {}: {e}", figure.name, output.display());
            false
        }
    }
}

/// Reports that can be drawn.
pub trait Plottable {
    fn figures(&self) -> Vec<PlotSeries>;
}

impl Plottable for AcfResult {
    fn figures(&self) -> Vec<PlotSeries> {
        let mut fig = PlotSeries::new(
            "autocorrelation",
            PlotKind::Stem,
            format!("Autocorrelation (n = {})", self.sample_size),
            "lag",
            "ACF",
        )
        .guide("95% band", self.confidence_bound)
        .guide("95% band", -self.confidence_bound);
        fig.x = (0..self.acf.len()).map(|l| l as f64).collect();
        fig.y = self.acf.clone();
        vec![fig]
    }
}

impl Plottable for DistributionResult {
    fn figures(&self) -> Vec<PlotSeries> {
        let mut fig = PlotSeries::new(
            "histogram",
            PlotKind::Bar,
            format!(
                "Distribution of {} values, mean = {:.4}, sd = {:.4}",
                self.summary.sample_size, self.summary.mean, self.summary.std_dev
            ),
            "value",
            "density",
        )
        .guide("uniform", 1.0);
        fig.x = self.histogram.bin_centers();
        fig.y = self.histogram.densities.clone();
        vec![fig]
    }
}

impl Plottable for ComplexityResult {
    fn figures(&self) -> Vec<PlotSeries> {
        let mut profile = PlotSeries::new(
            "linear_complexity",
            PlotKind::Line,
            "Linear complexity profile".to_string(),
            "prefix length",
            "linear complexity",
        );
        profile.x = (1..=self.profile.len()).map(|k| k as f64).collect();
        profile.y = self.profile.values().iter().map(|&l| l as f64).collect();

        let mut ideal = PlotSeries::new(
            "linear_complexity_ideal",
            PlotKind::Line,
            "Ideal line k/2".to_string(),
            "prefix length",
            "linear complexity",
        );
        ideal.y = profile.x.iter().map(|k| k / 2.0).collect();
        ideal.x = profile.x.clone();
        vec![profile, ideal]
    }
}

impl Plottable for RunsResult {
    fn figures(&self) -> Vec<PlotSeries> {
        let rows = &self.table;
        let x: Vec<f64> = rows.iter().map(|r| r.length as f64).collect();

        let mut inc = PlotSeries::new(
            "runs_increasing",
            PlotKind::Bar,
            "Increasing run lengths".to_string(),
            "run length",
            "runs",
        );
        inc.x = x.clone();
        inc.y = rows.iter().map(|r| r.increasing as f64).collect();

        let mut dec = PlotSeries::new(
            "runs_decreasing",
            PlotKind::Bar,
            "Decreasing run lengths".to_string(),
            "run length",
            "runs",
        );
        dec.x = x;
        dec.y = rows.iter().map(|r| r.decreasing as f64).collect();
        vec![inc, dec]
    }
}

impl Plottable for PlanarResult {
    fn figures(&self) -> Vec<PlotSeries> {
        let mut fig = PlotSeries::new(
            "planar",
            PlotKind::Scatter,
            format!("Successor pairs, {} points", self.points),
            "x[i]",
            "x[i+1]",
        );
        fig.x = self.x.clone();
        fig.y = self.y.clone();
        vec![fig]
    }
}

impl Plottable for SeriesResult {
    fn figures(&self) -> Vec<PlotSeries> {
        let mut bits = PlotSeries::new(
            "bit_frequency",
            PlotKind::Bar,
            "Bit frequency".to_string(),
            "bit",
            "relative frequency",
        )
        .guide("ideal", 0.5);
        bits.labels = vec!["0".to_string(), "1".to_string()];
        bits.x = vec![0.0, 1.0];
        bits.y = vec![1.0 - self.ones_frequency, self.ones_frequency];

        let k = self.k();
        let mut series = PlotSeries::new(
            "series_frequency",
            PlotKind::Bar,
            format!("Frequency of {k}-bit series"),
            "series",
            "relative frequency",
        )
        .guide("ideal", 1.0 / (1u64 << k) as f64);
        let freqs = self.table.relative_frequencies();
        series.labels = freqs.keys().cloned().collect();
        series.x = (0..freqs.len()).map(|i| i as f64).collect();
        series.y = freqs.into_values().collect();
        vec![bits, series]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::{autocorrelation, linear_complexity_analysis, series_analysis};
    use std::cell::RefCell;

    struct Recorder(RefCell<Vec<String>>);

    impl PlotSink for Recorder {
        fn render(&self, figure: &PlotSeries, output: &Path) -> std::io::Result<()> {
            self.0
                .borrow_mut()
                .push(format!("{}@{}", figure.name, output.display()));
            Ok(())
        }
    }

    struct Broken;

    impl PlotSink for Broken {
        fn render(&self, _: &PlotSeries, _: &Path) -> std::io::Result<()> {
            Err(std::io::Error::other("no backend"))
        }
    }

    #[test]
    fn test_acf_figure() {
        let acf = autocorrelation(&[1.0, 3.0, 2.0, 5.0, 4.0], 2).unwrap();
        let figs = acf.figures();
        assert_eq!(figs.len(), 1);
        assert_eq!(figs[0].x, vec![0.0, 1.0, 2.0]);
        assert_eq!(figs[0].y[0], 1.0);
        assert_eq!(figs[0].guides.len(), 2);
    }

    #[test]
    fn test_complexity_figures_share_axis() {
        let result = linear_complexity_analysis(&[5, 9], 4).unwrap();
        let figs = result.figures();
        assert_eq!(figs[0].x.len(), 8);
        assert_eq!(figs[0].x, figs[1].x);
        assert_eq!(figs[1].y[7], 4.0);
    }

    #[test]
    fn test_series_figure_labels() {
        let result = series_analysis(&[0b0110], 4, 2).unwrap();
        let figs = result.figures();
        assert_eq!(figs[1].labels, vec!["00", "01", "10", "11"]);
        assert_eq!(figs[1].guides[0].y, 0.25);
    }

    #[test]
    fn test_best_effort_rendering() {
        let acf = autocorrelation(&[1.0, 3.0, 2.0], 1).unwrap();
        let fig = &acf.figures()[0];
        let rec = Recorder(RefCell::new(Vec::new()));
        assert!(render_best_effort(&rec, fig, Path::new("out/acf.json")));
        assert_eq!(rec.0.borrow().as_slice(), &["autocorrelation@out/acf.json"]);
        assert!(!render_best_effort(&Broken, fig, Path::new("out/acf.json")));
    }
}
