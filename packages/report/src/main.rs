mod summary;

use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;

use summary::{Summary, TestResults, render_html};

/// Aggregate BDD result artifacts into a consolidated HTML report and a JSON
/// summary, mirroring what the CI pipeline publishes per run.
#[derive(Parser)]
#[command(name = "lakeside-report", version)]
struct Args {
    /// Directory containing downloaded test artifacts.
    artifacts_dir: PathBuf,
    /// Output directory for report.html and test-summary.json.
    output_dir: PathBuf,
    /// Print per-suite details while loading.
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> ExitCode {
    let args = Args::parse();
    match run(&args) {
        Ok(failed) if failed > 0 => {
            eprintln!("{failed} scenario(s) failed");
            ExitCode::FAILURE
        }
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Report generation failed: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Args) -> Result<u64> {
    let mut results = TestResults::default();
    load_results(&args.artifacts_dir, &mut results, args.verbose)
        .with_context(|| format!("loading artifacts from {}", args.artifacts_dir.display()))?;

    if args.verbose {
        println!(
            "Loaded: smoke={} e2e={} performance={} features={}",
            results.smoke.is_some(),
            results.e2e.is_some(),
            results.performance.is_some(),
            results.features.len(),
        );
    }

    let generated_at = chrono::Utc::now().format("%Y-%m-%d %H:%M:%S UTC").to_string();
    let summary = Summary::build(&results, generated_at);

    fs::create_dir_all(&args.output_dir)
        .with_context(|| format!("creating {}", args.output_dir.display()))?;

    let html_path = args.output_dir.join("report.html");
    fs::write(&html_path, render_html(&summary))
        .with_context(|| format!("writing {}", html_path.display()))?;

    let json_path = args.output_dir.join("test-summary.json");
    fs::write(&json_path, serde_json::to_string_pretty(&summary)?)
        .with_context(|| format!("writing {}", json_path.display()))?;

    let overall = &summary.overall.stats;
    println!("HTML report: {}", html_path.display());
    println!("JSON summary: {}", json_path.display());
    println!(
        "Scenarios: {} total, {} passed, {} failed, {} skipped ({:.1}%)",
        overall.total,
        overall.passed,
        overall.failed,
        overall.skipped,
        summary.overall.success_rate,
    );

    Ok(overall.failed)
}

/// Recursively pick up every `*.json` under the artifacts directory.
fn load_results(dir: &Path, results: &mut TestResults, verbose: bool) -> Result<()> {
    for entry in fs::read_dir(dir).with_context(|| format!("reading {}", dir.display()))? {
        let entry = entry?;
        let path = entry.path();

        if path.is_dir() {
            load_results(&path, results, verbose)?;
            continue;
        }
        if path.extension().and_then(|e| e.to_str()) != Some("json") {
            continue;
        }

        let Some(filename) = path.file_name().and_then(|n| n.to_str()) else {
            continue;
        };

        let data = match fs::read_to_string(&path)
            .map_err(anyhow::Error::from)
            .and_then(|text| Ok(serde_json::from_str(&text)?))
        {
            Ok(data) => data,
            Err(e) => {
                // Artifacts can contain unrelated or truncated JSON; skip them.
                eprintln!("Skipping {}: {e}", path.display());
                continue;
            }
        };

        if results.insert(filename, data) && verbose {
            println!("Loaded {}", path.display());
        }
    }
    Ok(())
}
