use anyhow::Result;
use clap::Parser;
use facility_merge::{config::MentalHealthMode, merge, MergeConfig};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

/// Merge the mental-health and substance-abuse facility exports into one
/// SQL file for a unified `facilities` table.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// YAML config; built-in defaults are used when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Where to write the combined SQL file.
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Also write a JSON run report here.
    #[arg(long)]
    report: Option<PathBuf>,

    /// Emit real INSERTs for the mental-health dump instead of a migration note.
    #[arg(long)]
    inline_mental_health: bool,
}

fn main() -> Result<()> {
    // ─── 1) init logging ─────────────────────────────────────────────
    let env = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt::Subscriber::builder()
        .with_env_filter(env)
        .with_writer(std::io::stderr)
        .init();

    // ─── 2) config: file, then flags ─────────────────────────────────
    let args = Args::parse();
    let mut cfg = match &args.config {
        Some(path) => MergeConfig::load(path)?,
        None => MergeConfig::default(),
    };
    if let Some(output) = args.output {
        cfg.output = output;
    }
    if let Some(report) = args.report {
        cfg.report_path = Some(report);
    }
    if args.inline_mental_health {
        cfg.mental_health.mode = MentalHealthMode::Inline;
    }
    info!(mode = cfg.mental_health_mode().as_str(), "startup");

    // ─── 3) merge ────────────────────────────────────────────────────
    println!("Reading substance abuse CSV file...");
    let report = merge::run(&cfg)?;

    println!("Total service code columns: {}", report.service_codes);
    println!("Found {} substance abuse facilities", report.substance_abuse_rows);
    println!("Generated {}", report.output.display());
    println!(
        "Total INSERT statements for substance abuse: {}",
        report.substance_abuse_rows
    );
    if report.mental_health_mode == MentalHealthMode::Inline {
        println!(
            "Total INSERT statements for mental health: {}",
            report.mental_health_rows
        );
    }
    println!();
    println!("INSTRUCTIONS:");
    for step in report.instructions() {
        println!("{}", step);
    }

    Ok(())
}
