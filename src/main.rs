//! TPAW Engine CLI
//!
//! Loads a settings file (or the standard defaults), runs the Monte Carlo
//! simulation, prints the run summary with per-year spending percentiles,
//! and optionally writes the per-path audit log to CSV.

use anyhow::Result;
use chrono::Utc;
use clap::Parser;
use std::path::PathBuf;

use tpaw_engine::display;
use tpaw_engine::settings::loader;
use tpaw_engine::{export, MonteCarloEngine, SimulationSettings};

#[derive(Parser, Debug)]
#[command(name = "tpaw_engine", version, about = "Monte Carlo retirement spending simulation")]
struct Args {
    /// JSON settings file; omitted fields fall back to the standard defaults
    #[arg(long)]
    settings: Option<PathBuf>,

    /// Base RNG seed for the run
    #[arg(long, default_value_t = 42)]
    seed: u64,

    /// Override the number of simulated paths
    #[arg(long)]
    paths: Option<u32>,

    /// Write the per-path audit log to this CSV file
    #[arg(long)]
    output: Option<PathBuf>,

    /// Display and export in nominal (inflated) dollars
    #[arg(long)]
    nominal: bool,

    /// Display monthly-equivalent spending amounts
    #[arg(long)]
    monthly: bool,

    /// Run paths on the rayon thread pool
    #[arg(long)]
    parallel: bool,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let mut settings = match &args.settings {
        Some(path) => loader::load_settings(path)?,
        None => SimulationSettings::default(),
    };
    if let Some(paths) = args.paths {
        settings.n_sims = paths;
    }
    if args.nominal {
        settings.display.nominal = true;
    }
    if args.monthly {
        settings.display.monthly = true;
    }

    let engine = MonteCarloEngine::new(settings.clone())?;
    let result = if args.parallel {
        engine.run_parallel(args.seed)
    } else {
        engine.run(args.seed)
    };

    let summary = result.summary();
    println!("TPAW Engine v0.1.0");
    println!("==================\n");
    println!(
        "Run: {} paths x {} years (seed {})",
        summary.paths, summary.horizon_years, args.seed
    );
    for warning in &result.warnings {
        println!("  WARNING: {}", warning);
    }
    println!();
    println!("Summary (real dollars):");
    println!("  LMP cost:           ${:>14.2}", summary.lmp_cost);
    println!("  Risk start balance: ${:>14.2}", summary.risk_start);
    println!("  Initial withdrawal: ${:>14.2}", summary.initial_withdrawal);
    println!("  Depleted paths:     {:>15}", summary.depleted_paths);
    println!();

    let dollar_kind = if settings.display.nominal { "nominal" } else { "real" };
    let period = if settings.display.monthly { "monthly" } else { "annual" };
    let today = Utc::now().date_naive();

    println!("Spending percentiles ({} {} dollars):", period, dollar_kind);
    println!("{:>8} {:>14} {:>14} {:>14}", "Year", "5th", "Median", "95th");
    println!("{}", "-".repeat(54));

    if settings.display.show_sources {
        let series = display::source_series(&result, &settings, today);
        for (t, label) in series.labels.iter().enumerate() {
            let bands = &series.risk[t];
            println!(
                "{:>8} {:>14.2} {:>14.2} {:>14.2}   (+ LMP {:.2})",
                label, bands.p5, bands.median, bands.p95, series.lmp[t]
            );
        }
    } else {
        let series = display::spending_series(&result, &settings, today);
        for (t, label) in series.labels.iter().enumerate() {
            let bands = &series.total[t];
            println!(
                "{:>8} {:>14.2} {:>14.2} {:>14.2}",
                label, bands.p5, bands.median, bands.p95
            );
        }
    }

    let legacy = display::legacy_bands(&result, &settings);
    println!();
    println!("Legacy outcomes ({} dollars):", dollar_kind);
    println!("  5th percentile:  ${:>14.2}", legacy.p5);
    println!("  Median:          ${:>14.2}", legacy.median);
    println!("  95th percentile: ${:>14.2}", legacy.p95);

    if let Some(path) = &args.output {
        export::export_to_path(path, &result.records, settings.display.nominal)?;
        println!("\nPath log written to: {}", path.display());
    }

    Ok(())
}
