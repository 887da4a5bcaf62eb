use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use neuro_core::{summarize, Analysis, AnalyticsConfig, AnalyticsSummary};
use neuro_record::load_record_path;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(
    name = "neuro-cli",
    about = "Summarize a neurological patient record from a JSON file."
)]
struct Args {
    /// Path to the patient record JSON.
    #[arg(short, long)]
    input: PathBuf,

    /// Optional analytics config JSON; missing fields keep their defaults.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Print the full summary as JSON instead of the short report.
    #[arg(long)]
    json: bool,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let config = match &args.config {
        Some(path) => {
            let data = std::fs::read_to_string(path)
                .with_context(|| format!("cannot read config {path:?}"))?;
            serde_json::from_str::<AnalyticsConfig>(&data)
                .with_context(|| format!("invalid config {path:?}"))?
        }
        None => AnalyticsConfig::default(),
    };

    let record = load_record_path(&args.input)
        .with_context(|| format!("cannot load record {:?}", args.input))?;
    tracing::info!(input = ?args.input, "record loaded");

    let summary = summarize(&record, &config);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        print_report(&summary);
    }

    Ok(())
}

fn print_report(summary: &AnalyticsSummary) {
    println!(
        "Patient: {} ({})",
        summary.patient.name.as_deref().unwrap_or("Unknown"),
        summary.patient.patient_id.as_deref().unwrap_or("no id")
    );
    println!(
        "Status: {} ({} medications)",
        summary.patient.overall_status.as_str(),
        summary.patient.medication_count
    );

    match &summary.seizures {
        Analysis::Report(seizures) => {
            let average = seizures
                .average_duration_seconds
                .map(|seconds| format!("{seconds:.1}s"))
                .unwrap_or_else(|| "n/a".to_string());
            println!(
                "Seizures: {} (avg {average}), trend: {}",
                seizures.total_seizures, seizures.trend
            );
        }
        Analysis::NoData { message } => println!("Seizures: {message}"),
    }

    match &summary.diagnostics {
        Analysis::Report(diagnostics) => println!(
            "Diagnostic tests: {} ({:.1}% flagged)",
            diagnostics.total_tests, diagnostics.flagged_percentage
        ),
        Analysis::NoData { message } => println!("Diagnostic tests: {message}"),
    }

    println!(
        "Severity index: {:.1} ({:?})",
        summary.severity.score, summary.severity.band
    );
    println!("Timeline events: {}", summary.timeline.events.len());
}
