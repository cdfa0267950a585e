//! # mcgscope-core
//!
//! A multiplicative congruential generator and a battery of statistical
//! diagnostics for the sequences it produces: autocorrelation, uniform
//! distribution fit, GF(2) linear-complexity profiling (Berlekamp–Massey),
//! monotonic run lengths, consecutive-pair correlation and bit/series
//! frequencies.
//!
//! ## Quick Start
//!
//! ```
//! use mcgscope_core::{Generator, analysis};
//!
//! let mut generator = Generator::reference();
//! let seq = generator.generate_sequence(3);
//! assert_eq!(&seq[..], &[121, 1331, 14641]);
//!
//! generator.reset();
//! let values = generator.generate_sequence(1000);
//! let series = analysis::series_analysis(&values, generator.bit_width(), 3).unwrap();
//! assert_eq!(series.table.counts.len(), 8);
//! ```
//!
//! ## Architecture
//!
//! Generator → materialized [`Sequence`] → any subset of analyzers.
//!
//! The generator is the only mutable state. Analyzers are pure functions over
//! immutable slices; the [`Battery`] driver resets the generator before each
//! analysis. Goodness-of-fit p-values and figure rendering are supplied by
//! collaborators through the [`GoodnessOfFit`] and [`PlotSink`] traits.

pub mod analysis;
pub mod battery;
pub mod config;
pub mod error;
pub mod generator;
pub mod plot;
pub mod sequence;

pub use analysis::{FitStatistic, GoodnessOfFit, ReferenceDistribution};
pub use battery::{AnalysisFailure, AnalysisReport, Battery, BatteryReport};
pub use config::{Analysis, BatteryConfig, ConfigError};
pub use error::{BatteryError, Result};
pub use generator::{Generator, GeneratorParams, REFERENCE_MODULUS, REFERENCE_Q};
pub use plot::{PlotKind, PlotSeries, PlotSink, Plottable, render_best_effort};
pub use sequence::{BitSequence, Sequence, bit_string};

/// Library version (from Cargo.toml).
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
