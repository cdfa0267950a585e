use mcgscope_core::analysis::field_size;
use mcgscope_core::{Analysis, AnalysisReport, Battery};
use mcgscope_tests::{KolmogorovSmirnov, TestResult};

use super::{AnalyzeOptions, ConfigOverrides};

pub fn run(analysis: Analysis, overrides: &ConfigOverrides, options: &AnalyzeOptions) {
    let (mut config, mut generator) = super::load(overrides);
    config.analyses = vec![analysis];
    if let Some(length) = options.length {
        config.set_length(analysis, length);
    }
    if let Err(e) = config.validate() {
        eprintln!("{e}");
        std::process::exit(1);
    }

    let length = config.length_for(analysis);
    println!("🔬 {analysis} on {length} values\n");

    let fit = KolmogorovSmirnov;
    let battery = Battery::new(&config, &fit);
    let report = match battery.run_one(analysis, &mut generator) {
        Ok(report) => report,
        Err(e) => {
            eprintln!("{analysis} failed ({}): {e}", e.kind());
            std::process::exit(1);
        }
    };

    print_report(&report, config.bit_width.unwrap_or_else(|| generator.bit_width()));
    let tests = mcgscope_tests::evaluate(&report);
    print_tests(&tests);

    if let Some(dir) = &options.plot_dir {
        let written = super::write_figures(&report, dir, length);
        println!("\n🖼  {} figure(s) written to {dir}", written.len());
    }

    if let Some(path) = &options.output {
        let json = serde_json::json!({
            "generator": generator.params(),
            "length": length,
            "report": report,
            "tests": super::tests_json(&tests),
        });
        super::write_json(path, &json);
    }
}

/// Console summary of one report.
pub fn print_report(report: &AnalysisReport, bit_width: u32) {
    match report {
        AnalysisReport::Autocorrelation(r) => {
            println!("  Max lag:            {}", r.max_lag);
            println!("  95% band:           ±{:.6}", r.confidence_bound);
            let outside = &r.significant_lags;
            println!("  Lags outside band:  {} of {}", outside.len(), r.max_lag);
            for &lag in outside.iter().take(10) {
                println!("    lag {lag:>4}  acf {:+.6}", r.acf[lag]);
            }
        }
        AnalysisReport::Distribution(r) => {
            let s = &r.summary;
            println!("  Mean:     {:.6}  (ideal 0.5)", s.mean);
            println!("  Std dev:  {:.6}  (ideal {:.6})", s.std_dev, (1.0f64 / 12.0).sqrt());
            println!("  Range:    [{:.6}, {:.6}]", s.min, s.max);
            println!("  Bins:     {}", r.histogram.num_bins());
            println!(
                "  {}: D = {:.6}, p = {:.4}",
                r.fit.test, r.fit.statistic, r.fit.p_value
            );
        }
        AnalysisReport::LinearComplexity(r) => {
            println!(
                "  Bits:              {} ({} values x {} bits)",
                r.bit_length, r.integers, r.bit_width
            );
            println!(
                "  Final complexity:  {}  (ideal {:.1})",
                r.final_complexity,
                r.bit_length as f64 / 2.0
            );
            println!("  Mean |L(k) - k/2|: {:.3}", r.mean_deviation);
        }
        AnalysisReport::Monotonicity(r) => {
            println!("  {:<12} {:>8} {:>10} {:>8}", "Direction", "Runs", "Mean len", "Max");
            for (label, stats) in [("increasing", &r.increasing), ("decreasing", &r.decreasing)] {
                println!(
                    "  {:<12} {:>8} {:>10.3} {:>8}",
                    label, stats.count, stats.mean_length, stats.max_length
                );
            }
            println!("\n  {:>6} {:>10} {:>10}", "Length", "Inc", "Dec");
            for row in &r.table {
                println!(
                    "  {:>6} {:>10} {:>10}",
                    row.length, row.increasing, row.decreasing
                );
            }
        }
        AnalysisReport::Planar(r) => {
            println!("  Points:       {}", r.points);
            println!("  Correlation:  {:+.6}", r.correlation);
            println!("  Field:        [0, {}]", field_size(bit_width));
        }
        AnalysisReport::Series(r) => {
            println!(
                "  Bits:         {} ({} values x {} bits)",
                r.total_bits, r.sample_size, r.bit_width
            );
            println!(
                "  Zeros / ones: {} / {}  (ones {:.4})",
                r.zeros, r.ones, r.ones_frequency
            );
            println!("  Bit chi2:     {:.4}", r.bit_chi_square);
            println!(
                "  {}-bit series: {} windows, expected {:.2} each, chi2 {:.4}",
                r.k(),
                r.total_windows,
                r.expected_series_count,
                r.series_chi_square
            );
            if r.k() <= 4 {
                for (pattern, count) in &r.table.counts {
                    println!("    {pattern}  {count}");
                }
            }
        }
    }
}

/// One line per test, as in the battery summary.
pub fn print_tests(tests: &[TestResult]) {
    println!();
    for t in tests {
        let p = t
            .p_value
            .map(|p| format!("{p:.4}"))
            .unwrap_or_else(|| "-".to_string());
        let mark = if t.passed { "✓" } else { "✗" };
        println!(
            "  {mark} {:<22} {:>3} p={:>8}  {}",
            t.name, t.grade, p, t.details
        );
    }
}
