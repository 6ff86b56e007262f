//! Citywatch - traffic reading triage CLI
//!
//! The entry point for cw-core, handling:
//! - Simulated traffic generation and persistence
//! - Time-windowed data loads
//! - Isolation-forest anomaly detection over the window
//! - Summary metrics and CSV export

use clap::{Args, Parser, Subcommand, ValueEnum};
use cw_common::{Error, ErrorCategory, Result, Settings};
use cw_core::logging::{self, LogFormat};
use cw_core::{export, summarize, Simulator};
use cw_detect::detect;
use cw_store::ReadingStore;
use std::path::PathBuf;

/// Citywatch - municipal traffic readings, flagged outliers included
#[derive(Parser)]
#[command(name = "cw-core")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true, arg_required_else_help = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    #[command(flatten)]
    global: GlobalOpts,
}

/// Global options available to all commands
#[derive(Args, Debug)]
struct GlobalOpts {
    /// Path to the SQLite reading store
    #[arg(long, global = true, env = "CW_DB", default_value = "citywatch.db")]
    db: PathBuf,

    /// Path to a settings.json file (built-in defaults when omitted)
    #[arg(long, global = true, env = "CW_SETTINGS")]
    settings: Option<PathBuf>,

    /// Output format for command payloads on stdout
    #[arg(long, short = 'f', global = true, default_value = "json")]
    format: OutputFormat,

    /// Fixed random seed for the detector and simulator
    #[arg(long, global = true)]
    seed: Option<u64>,

    /// Increase verbosity (-v, -vv)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Decrease verbosity (errors only)
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Log format on stderr
    #[arg(long, global = true, default_value = "human")]
    log_format: LogFormat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Json,
    Human,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate simulated readings and append them to the store
    Simulate {
        /// Number of simulation ticks (one reading per zone per tick)
        #[arg(long, default_value_t = 1)]
        ticks: u32,
    },

    /// Load the trailing window and flag anomalous readings
    Detect {
        /// Override the lookback window in hours
        #[arg(long)]
        hours: Option<i64>,

        /// Also write the report as CSV to this path ("-" for stdout)
        #[arg(long)]
        export: Option<PathBuf>,
    },

    /// Summary metrics for the trailing window
    Summary {
        /// Override the lookback window in hours
        #[arg(long)]
        hours: Option<i64>,
    },

    /// Validate settings and print the resolved configuration
    Check,
}

fn main() {
    let cli = Cli::parse();
    logging::init_logging(cli.global.log_format, cli.global.verbose, cli.global.quiet);

    if let Err(err) = run(&cli) {
        tracing::error!(code = err.code(), category = %err.category(), "{}", err);
        eprintln!("error: {}", err);
        std::process::exit(exit_code_for(&err));
    }
}

/// 0 success, 1 runtime failure, 2 usage/config error.
fn exit_code_for(err: &Error) -> i32 {
    match err.category() {
        ErrorCategory::Config => 2,
        _ => 1,
    }
}

fn run(cli: &Cli) -> Result<()> {
    let mut settings = Settings::load_or_default(cli.global.settings.as_deref())?;
    if let Some(seed) = cli.global.seed {
        settings.detector.random_state = Some(seed);
        settings.simulator.random_state = Some(seed);
    }

    match &cli.command {
        Commands::Simulate { ticks } => cmd_simulate(cli, &settings, *ticks),
        Commands::Detect { hours, export } => {
            cmd_detect(cli, &settings, *hours, export.as_deref())
        }
        Commands::Summary { hours } => cmd_summary(cli, &settings, *hours),
        Commands::Check => cmd_check(cli, &settings),
    }
}

fn cmd_simulate(cli: &Cli, settings: &Settings, ticks: u32) -> Result<()> {
    let mut store = ReadingStore::open(&cli.global.db)?;
    let mut sim = Simulator::new(settings.simulator.random_state);

    let mut appended = 0;
    for _ in 0..ticks {
        let batch = sim.tick(chrono::Utc::now());
        appended += store.append(&batch)?;
    }
    store.close()?;

    match cli.global.format {
        OutputFormat::Json => {
            println!("{}", serde_json::json!({ "appended": appended, "ticks": ticks }));
        }
        OutputFormat::Human => {
            println!("appended {} simulated readings over {} tick(s)", appended, ticks);
        }
    }
    Ok(())
}

fn cmd_detect(
    cli: &Cli,
    settings: &Settings,
    hours: Option<i64>,
    export_path: Option<&std::path::Path>,
) -> Result<()> {
    let hours = resolve_hours(hours, settings)?;
    let store = ReadingStore::open(&cli.global.db)?;
    let window = store.load_window(chrono::Utc::now(), hours)?;
    store.close()?;

    let report = detect(&window, &settings.detector)?;

    if let Some(path) = export_path {
        if path == std::path::Path::new("-") {
            // CSV takes over the stdout payload; no report follows.
            let mut out = std::io::stdout().lock();
            export::write_csv(&report, &mut out)?;
            return Ok(());
        }
        export::export_to_path(&report, path)?;
    }

    match cli.global.format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        OutputFormat::Human => {
            if window.is_empty() {
                println!("no data in the last {} hour(s)", hours);
            } else if report.flagged.is_empty() {
                println!(
                    "no anomalies among {} reading(s) in the last {} hour(s)",
                    report.evaluated, hours
                );
            } else {
                println!(
                    "{} anomalous reading(s) among {}:",
                    report.flagged.len(),
                    report.evaluated
                );
                for f in &report.flagged {
                    println!(
                        "  {}  {:<8} volume={:<3} speed={:<5.1} score={:.3}",
                        f.reading.timestamp.to_rfc3339(),
                        f.reading.zone,
                        f.reading.volume,
                        f.reading.speed,
                        f.score
                    );
                }
            }
        }
    }
    Ok(())
}

fn cmd_summary(cli: &Cli, settings: &Settings, hours: Option<i64>) -> Result<()> {
    let hours = resolve_hours(hours, settings)?;
    let store = ReadingStore::open(&cli.global.db)?;
    let window = store.load_window(chrono::Utc::now(), hours)?;
    store.close()?;

    let summary = summarize(&window);
    match cli.global.format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&summary)?);
        }
        OutputFormat::Human => {
            println!("readings in last {} hour(s): {}", hours, summary.count);
            if let (Some(vol), Some(speed)) = (summary.mean_volume, summary.mean_speed) {
                println!("mean volume: {:.1}%", vol);
                println!("mean speed:  {:.1} km/h", speed);
            }
            for (zone, n) in &summary.zone_counts {
                println!("  {:<8} {}", zone, n);
            }
        }
    }
    Ok(())
}

fn cmd_check(cli: &Cli, settings: &Settings) -> Result<()> {
    match cli.global.format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(settings)?);
        }
        OutputFormat::Human => {
            println!("settings ok");
            println!("  window.hours:            {}", settings.window.hours);
            println!("  detector.n_trees:        {}", settings.detector.n_trees);
            println!("  detector.sample_size:    {}", settings.detector.sample_size);
            println!("  detector.contamination:  {}", settings.detector.contamination);
            match settings.detector.random_state {
                Some(seed) => println!("  detector.random_state:   {}", seed),
                None => println!("  detector.random_state:   (os entropy)"),
            }
        }
    }
    Ok(())
}

fn resolve_hours(flag: Option<i64>, settings: &Settings) -> Result<i64> {
    let hours = flag.unwrap_or(settings.window.hours);
    if hours < 1 {
        return Err(Error::Config(format!("--hours must be >= 1, got {}", hours)));
    }
    Ok(hours)
}
