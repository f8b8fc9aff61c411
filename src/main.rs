// src/main.rs - command-line front end for the lending simulation
use clap::Parser;
use lendsim::statistics::SteadyState;
use lendsim::{simulate, SimulationConfig, SimulationReport, TitleReport};
use std::path::PathBuf;

/// Simulate a library lending queue and report M/M/1/K metrics per title.
#[derive(Debug, Parser)]
#[command(name = "lendsim", version, about)]
struct Cli {
    /// TOML file with simulation parameters; built-in defaults are used when omitted
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override the random seed
    #[arg(long)]
    seed: Option<u64>,

    /// Override the simulation horizon, in days
    #[arg(long)]
    horizon: Option<i64>,

    /// Print the report as JSON instead of text
    #[arg(long)]
    json: bool,

    /// Log every visitor transition
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync + 'static>> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_max_level(if cli.verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        })
        .with_writer(std::io::stderr)
        .init();

    let mut config = match &cli.config {
        Some(path) => SimulationConfig::load(path).map_err(|e| {
            tracing::error!("Failed to load config from '{}': {}", path.display(), e);
            e
        })?,
        None => SimulationConfig::default(),
    };
    if let Some(seed) = cli.seed {
        config.random_seed = seed;
    }
    if let Some(horizon) = cli.horizon {
        config.sim_time = horizon;
    }

    let report = simulate(&config)?;

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_report(&report);
    }
    Ok(())
}

fn print_report(report: &SimulationReport) {
    for title in &report.titles {
        print_title(title);
    }
    if report.titles.len() > 1 {
        println!("\nVisitors over all titles: {}", report.visitors_spawned);
    }
}

fn print_title(title: &TitleReport) {
    let metrics = &title.metrics;
    println!("\nQueue statistics for {}:", title.title);
    println!("Arrival rate (λ): {:.2}", metrics.arrival_rate);
    println!("Service rate (μ): {:.2}", metrics.service_rate);
    println!("Theoretical utilization (ρ): {:.2}", metrics.utilization);
    match metrics.steady_state {
        SteadyState::Stable {
            mean_in_system,
            mean_time_in_system,
            mean_queue_length,
            mean_wait,
        } => {
            println!("Expected visitors in system (L): {mean_in_system:.2}");
            println!("Expected time in system (W): {mean_time_in_system:.2} days");
            println!("Expected queue length (Lq): {mean_queue_length:.2}");
            println!("Expected wait (Wq): {mean_wait:.2} days");
        },
        SteadyState::Unbounded => println!("L, W, Lq, Wq: unbounded (arrivals outpace service)"),
    }
    println!("Empirical utilization: {:.2}", metrics.empirical_utilization);
    println!("Average queue length: {:.2}", metrics.average_queue_length);
    println!("Packet drops: {}", metrics.drop_count);
    println!("Successful loans: {}", metrics.successful_loans);
    println!(
        "Throughput per loan period: {:.2} loans per loan period",
        metrics.throughput_per_loan_period
    );
    println!(
        "Returns on time / overdue: {} / {}",
        title.log.on_time_returns(),
        title.log.overdue_returns()
    );
}
