use std::time::Instant;

use mcgscope_core::{Analysis, Battery, BatteryConfig, BatteryReport};
use mcgscope_tests::{KolmogorovSmirnov, TestResult};

use super::ConfigOverrides;

pub fn run(
    overrides: &ConfigOverrides,
    lengths: Option<&str>,
    analyses: Option<&str>,
    output_path: Option<&str>,
    plot_dir: Option<&str>,
) {
    let (mut base, mut generator) = super::load(overrides);

    if let Some(list) = analyses {
        base.analyses = super::parse_list::<Analysis>(list).unwrap_or_else(|e| {
            eprintln!("Invalid --analyses: {e}");
            std::process::exit(1);
        });
    }

    // One config per requested length; none means the configured lengths.
    let configs: Vec<(Option<usize>, BatteryConfig)> = match lengths {
        Some(list) => {
            let parsed = super::parse_list::<usize>(list).unwrap_or_else(|e| {
                eprintln!("Invalid --lengths: {e}");
                std::process::exit(1);
            });
            parsed
                .into_iter()
                .map(|n| (Some(n), base.with_length(n)))
                .collect()
        }
        None => vec![(None, base.clone())],
    };

    for (_, config) in &configs {
        if let Err(e) = config.validate() {
            eprintln!("{e}");
            std::process::exit(1);
        }
    }

    let params = generator.params();
    println!(
        "🔬 Running {} analysis(es) on x = ({} * x + {}) mod {}, x0 = {}\n",
        base.analyses.len(),
        params.multiplier,
        params.increment,
        params.modulus,
        params.seed
    );

    let fit = KolmogorovSmirnov;
    let mut runs = Vec::new();

    for (length, config) in &configs {
        let label = length.map_or_else(|| "configured".to_string(), |n| n.to_string());
        print!("  Length {label}...");
        let t0 = Instant::now();
        let report = Battery::new(config, &fit).run(&mut generator);
        let tests: Vec<TestResult> = report
            .results
            .iter()
            .flat_map(mcgscope_tests::evaluate)
            .collect();
        let score = mcgscope_tests::calculate_quality_score(&tests);
        let passed = tests.iter().filter(|t| t.passed).count();
        println!(
            " → {:.0}/100 ({}/{} passed) [{:.1}s]",
            score,
            passed,
            tests.len(),
            t0.elapsed().as_secs_f64()
        );

        if let Some(dir) = plot_dir {
            for result in &report.results {
                super::write_figures(result, dir, config.length_for(result.analysis()));
            }
        }

        runs.push((label, config, report, tests));
    }

    for (label, _, report, tests) in &runs {
        print_summary(label, report, tests);
    }

    if let Some(dir) = plot_dir {
        println!("\n🖼  Figure data written to {dir}");
    }

    if let Some(path) = output_path {
        let json: Vec<serde_json::Value> = runs
            .iter()
            .map(|(label, config, report, tests)| {
                serde_json::json!({
                    "length": label,
                    "config": config,
                    "report": report,
                    "tests": super::tests_json(tests),
                })
            })
            .collect();
        super::write_json(path, &json);
    }
}

fn print_summary(label: &str, report: &BatteryReport, tests: &[TestResult]) {
    println!("\n{}", "=".repeat(72));
    println!("Length {label}");
    println!("{}", "-".repeat(72));
    println!(
        "  {:<24} {:>6} {:>10}  {}",
        "Test", "Grade", "p-value", "Details"
    );
    for t in tests {
        let p = t
            .p_value
            .map(|p| format!("{p:.4}"))
            .unwrap_or_else(|| "-".to_string());
        println!("  {:<24} {:>6} {:>10}  {}", t.name, t.grade, p, t.details);
    }
    for f in &report.failures {
        println!(
            "  {:<24} {:>6} {:>10}  {} ({})",
            f.analysis.as_str(),
            "-",
            "-",
            f.error,
            f.kind
        );
    }

    let score = mcgscope_tests::calculate_quality_score(tests);
    println!("{}", "-".repeat(72));
    println!("  Score {:.1}/100  grade {}", score, overall_grade(score));
}

fn overall_grade(score: f64) -> char {
    if score >= 80.0 {
        'A'
    } else if score >= 60.0 {
        'B'
    } else if score >= 40.0 {
        'C'
    } else if score >= 20.0 {
        'D'
    } else {
        'F'
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overall_grade_thresholds() {
        assert_eq!(overall_grade(100.0), 'A');
        assert_eq!(overall_grade(80.0), 'A');
        assert_eq!(overall_grade(79.9), 'B');
        assert_eq!(overall_grade(40.0), 'C');
        assert_eq!(overall_grade(20.0), 'D');
        assert_eq!(overall_grade(0.0), 'F');
    }
}
