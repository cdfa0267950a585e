//! CLI for mcgscope: run the statistical battery against a congruential generator.

mod commands;

use clap::{Args, Parser, Subcommand};

use commands::{AnalyzeOptions, ConfigOverrides};
use mcgscope_core::Analysis;

#[derive(Parser)]
#[command(name = "mcgscope")]
#[command(about = "mcgscope: statistical diagnostics for multiplicative congruential generators")]
#[command(version = mcgscope_core::VERSION)]
struct Cli {
    #[command(flatten)]
    generator: GeneratorArgs,

    #[command(subcommand)]
    command: Commands,
}

/// Generator and config-file options shared by every subcommand.
#[derive(Args)]
struct GeneratorArgs {
    /// JSON battery configuration; flags below override it
    #[arg(long, global = true)]
    config: Option<String>,

    /// Modulus N (default 2^31)
    #[arg(long, global = true)]
    modulus: Option<u64>,

    /// Multiplier a (default 2q+3)
    #[arg(long, global = true)]
    multiplier: Option<u64>,

    /// Increment c (default 0)
    #[arg(long, global = true)]
    increment: Option<u64>,

    /// Seed x0 (default 2q+3)
    #[arg(long, global = true)]
    seed: Option<u64>,

    /// Use the reference family a = x0 = 2q+3 for this q
    #[arg(long, global = true)]
    q: Option<u64>,
}

#[derive(Args)]
struct OutputArgs {
    /// Number of values to draw (defaults from config)
    #[arg(long)]
    length: Option<usize>,

    /// Write the full report as JSON
    #[arg(long)]
    output: Option<String>,

    /// Directory for figure data (one JSON file per figure)
    #[arg(long)]
    plot_dir: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the first values of the generator
    Generate {
        /// How many values to print
        #[arg(long, default_value = "10")]
        count: usize,

        /// Print values divided by N, in [0, 1)
        #[arg(long)]
        normalized: bool,
    },

    /// Autocorrelation function with the 95% band
    Acf {
        #[command(flatten)]
        out: OutputArgs,

        /// Largest lag
        #[arg(long)]
        max_lag: Option<usize>,
    },

    /// Histogram density and Kolmogorov-Smirnov uniformity fit
    Histogram {
        #[command(flatten)]
        out: OutputArgs,

        /// Number of equal-width bins over [0, 1)
        #[arg(long)]
        bins: Option<usize>,
    },

    /// Linear complexity profile (Berlekamp-Massey) of the bit expansion
    Complexity {
        #[command(flatten)]
        out: OutputArgs,

        /// Bits per value (defaults to ceil(log2 N))
        #[arg(long)]
        bit_width: Option<u32>,
    },

    /// Lengths of increasing and decreasing runs
    Runs {
        #[command(flatten)]
        out: OutputArgs,
    },

    /// Correlation of consecutive pairs (x[i], x[i+1])
    Planar {
        #[command(flatten)]
        out: OutputArgs,
    },

    /// Bit and k-bit series frequencies with chi-square
    Series {
        #[command(flatten)]
        out: OutputArgs,

        /// Series length k
        #[arg(long)]
        k: Option<u32>,

        /// Bits per value (defaults to ceil(log2 N))
        #[arg(long)]
        bit_width: Option<u32>,
    },

    /// Run the configured analyses and print a graded summary
    Battery {
        /// Comma-separated sequence lengths; each runs the whole battery.
        /// The complexity profile keeps its configured length
        #[arg(long)]
        lengths: Option<String>,

        /// Comma-separated analyses (default: all)
        #[arg(long)]
        analyses: Option<String>,

        /// Write all reports as JSON
        #[arg(long)]
        output: Option<String>,

        /// Directory for figure data
        #[arg(long)]
        plot_dir: Option<String>,
    },
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    let g = cli.generator;
    let overrides = ConfigOverrides {
        config: g.config,
        modulus: g.modulus,
        multiplier: g.multiplier,
        increment: g.increment,
        seed: g.seed,
        q: g.q,
        ..ConfigOverrides::default()
    };

    match cli.command {
        Commands::Generate { count, normalized } => {
            commands::generate::run(&overrides, count, normalized)
        }
        Commands::Acf { out, max_lag } => analyze(
            Analysis::Autocorrelation,
            ConfigOverrides {
                max_lag,
                ..overrides
            },
            out,
        ),
        Commands::Histogram { out, bins } => analyze(
            Analysis::Distribution,
            ConfigOverrides {
                num_bins: bins,
                ..overrides
            },
            out,
        ),
        Commands::Complexity { out, bit_width } => analyze(
            Analysis::LinearComplexity,
            ConfigOverrides {
                bit_width,
                ..overrides
            },
            out,
        ),
        Commands::Runs { out } => analyze(Analysis::Monotonicity, overrides, out),
        Commands::Planar { out } => analyze(Analysis::Planar, overrides, out),
        Commands::Series { out, k, bit_width } => analyze(
            Analysis::Series,
            ConfigOverrides {
                series_k: k,
                bit_width,
                ..overrides
            },
            out,
        ),
        Commands::Battery {
            lengths,
            analyses,
            output,
            plot_dir,
        } => commands::battery::run(
            &overrides,
            lengths.as_deref(),
            analyses.as_deref(),
            output.as_deref(),
            plot_dir.as_deref(),
        ),
    }
}

fn analyze(analysis: Analysis, overrides: ConfigOverrides, out: OutputArgs) {
    let options = AnalyzeOptions {
        length: out.length,
        output: out.output,
        plot_dir: out.plot_dir,
    };
    commands::analyze::run(analysis, &overrides, &options);
}
