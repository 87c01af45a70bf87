//! Webline CLI
//!
//! Drive the Webline shell headlessly and print what a renderer would see.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::fs;
use std::path::{Path, PathBuf};
use std::rc::Rc;
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};
use webline_core::metrics::{self, CHECKSUM, PRESSURE, STABILITY, TENSILE, VISCOSITY};
use webline_core::{HapticLog, Params};
use webline_screens::{ScreenKind, Session, ShellConfig};

mod report;

#[derive(Parser)]
#[command(name = "webline")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Webline shell simulator", long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a session for a number of frames and print snapshots
    Simulate {
        /// Screen to show (calibration, map, tactical, suits, missions, fitness)
        #[arg(short, long, default_value = "calibration")]
        screen: String,

        /// Number of frames to simulate
        #[arg(short, long, default_value = "120")]
        ticks: u32,

        /// Frames per second (overrides the config file)
        #[arg(long)]
        fps: Option<u32>,

        /// Noise seed (overrides the config file)
        #[arg(long)]
        seed: Option<u64>,

        /// Session config file (TOML)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Print every Nth frame
        #[arg(short, long, default_value = "30")]
        every: u32,

        /// Print snapshots as JSON lines
        #[arg(long)]
        json: bool,
    },

    /// List the shell's screens
    Screens,

    /// Compute calibration metrics for a set of fluid parameters
    Metrics {
        #[arg(long, default_value = "80")]
        pressure: f32,

        #[arg(long, default_value = "65")]
        viscosity: f32,

        #[arg(long, default_value = "70")]
        tensile: f32,
    },

    /// Write the default session config
    InitConfig {
        /// Output path; prints to stdout when omitted
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    match cli.command {
        Commands::Simulate {
            screen,
            ticks,
            fps,
            seed,
            config,
            every,
            json,
        } => cmd_simulate(&screen, ticks, fps, seed, config.as_deref(), every, json),

        Commands::Screens => cmd_screens(),

        Commands::Metrics {
            pressure,
            viscosity,
            tensile,
        } => cmd_metrics(pressure, viscosity, tensile),

        Commands::InitConfig { output } => cmd_init_config(output.as_deref()),
    }
}

fn load_config(path: Option<&Path>) -> Result<ShellConfig> {
    match path {
        Some(path) => ShellConfig::load(path)
            .with_context(|| format!("Failed to load config {}", path.display())),
        None => Ok(ShellConfig::default()),
    }
}

fn cmd_simulate(
    screen: &str,
    ticks: u32,
    fps: Option<u32>,
    seed: Option<u64>,
    config_path: Option<&Path>,
    every: u32,
    json: bool,
) -> Result<()> {
    let kind: ScreenKind = screen.parse()?;
    if every == 0 {
        anyhow::bail!("--every must be at least 1");
    }

    let mut config = load_config(config_path)?;
    if let Some(fps) = fps {
        config.scheduler.target_fps = fps;
    }
    if let Some(seed) = seed {
        config.seed = seed;
    }

    let haptics = HapticLog::new();
    let mut session = Session::new(&config, Rc::new(haptics.clone()))?;
    session.shell_mut().select_screen(kind);
    haptics.clear();

    info!(
        "Simulating {} for {} frames at {} fps (seed {})",
        kind, ticks, config.scheduler.target_fps, config.seed
    );

    for frame in 1..=ticks {
        session.step();
        if frame % every != 0 && frame != ticks {
            continue;
        }
        let snapshot = session.snapshot();
        if json {
            println!("{}", serde_json::to_string(&snapshot)?);
        } else {
            println!(
                "[{:>6.0} ms] {}",
                session.elapsed().as_secs_f64() * 1000.0,
                report::describe(&snapshot)
            );
        }
    }

    info!(
        "Done: {:.2}s simulated, {} animations still scheduled",
        session.elapsed().as_secs_f32(),
        session.scheduler().scheduled_count()
    );
    Ok(())
}

fn cmd_screens() -> Result<()> {
    for kind in ScreenKind::ALL {
        println!("{:>2}  {:<12} {}", kind.index(), kind.name(), kind.label());
    }
    Ok(())
}

fn cmd_metrics(pressure: f32, viscosity: f32, tensile: f32) -> Result<()> {
    let mut inputs = Params::new();
    inputs.insert(PRESSURE.to_string(), pressure);
    inputs.insert(VISCOSITY.to_string(), viscosity);
    inputs.insert(TENSILE.to_string(), tensile);

    let outputs = metrics::calibration().compute(&inputs);
    let stability = outputs.get(STABILITY).copied().unwrap_or(metrics::STABILITY_FLOOR);
    let checksum = outputs.get(CHECKSUM).copied().unwrap_or(0.0);

    println!("stability: {stability}%");
    println!("checksum:  {}", metrics::format_checksum(checksum));
    println!(
        "status:    {}",
        if stability > 50.0 { "STABLE" } else { "UNSTABLE" }
    );
    Ok(())
}

fn cmd_init_config(output: Option<&Path>) -> Result<()> {
    let text = ShellConfig::default().to_toml_string()?;
    match output {
        Some(path) => {
            if path.exists() {
                anyhow::bail!("{} already exists", path.display());
            }
            fs::write(path, text)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            info!("Wrote default config to {}", path.display());
        }
        None => print!("{text}"),
    }
    Ok(())
}
