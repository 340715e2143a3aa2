use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::thread;
use std::time::Duration;

use clap::{Args, Parser, Subcommand, ValueEnum};
use thiserror::Error;
use tracing::{info, warn};
use trainsafe::TrainsafeError;
use trainsafe_config::{json_schema, load_fleet, LogFormat, LoggingConfig, TrainsafeConfig};
use trainsafe_sim::{Engine, EngineConfig, TickReport};

#[derive(Debug, Parser)]
#[command(
    name = "trainsafe",
    version,
    about = "Command-line fleet simulator and utilities for TrainSafe"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    Run(RunArgs),
    Validate(ValidateArgs),
    Schema(SchemaArgs),
}

#[derive(Debug, Args)]
pub struct RunArgs {
    #[arg(long, help = "Fleet JSON file, a map keyed by train name")]
    pub fleet: PathBuf,
    #[arg(long, help = "Optional path to trainsafe YAML config")]
    pub config: Option<PathBuf>,
    #[arg(long, help = "Override the configured tick bound")]
    pub ticks: Option<u64>,
    #[arg(long, help = "Override the configured speed multiplier (1-10)")]
    pub multiplier: Option<u32>,
    #[arg(long, help = "Override the configured stop threshold in kilometers")]
    pub threshold_km: Option<f64>,
    #[arg(long, help = "Sleep one step between ticks like the live demo")]
    pub realtime: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ValidationFormat {
    Fleet,
    Config,
}

#[derive(Debug, Args)]
pub struct ValidateArgs {
    #[arg(long, value_enum)]
    pub format: ValidationFormat,
    #[arg(long, help = "Input file path")]
    pub input: PathBuf,
}

#[derive(Debug, Args)]
pub struct SchemaArgs {
    #[arg(long, help = "Output file path; defaults to stdout when omitted")]
    pub output: Option<PathBuf>,
}

pub fn run(cli: Cli) -> Result<(), CliError> {
    execute_command(cli.command)
}

fn execute_command(command: Command) -> Result<(), CliError> {
    match command {
        Command::Run(args) => run_simulation(args),
        Command::Validate(args) => run_validate(args),
        Command::Schema(args) => run_schema(args),
    }
}

fn run_simulation(args: RunArgs) -> Result<(), CliError> {
    let config = load_optional_config(args.config.as_deref())?;
    init_tracing(&config.logging);

    let engine_config = apply_overrides(config.simulation, &args);
    let scenario = load_fleet(&args.fleet).map_err(facade)?;
    let mut engine = Engine::from_scenario(&scenario, engine_config).map_err(facade)?;

    info!(
        scenario = %scenario.name,
        trains = scenario.trains.len(),
        multiplier = engine_config.speed_multiplier,
        "starting simulation"
    );

    let stdout = io::stdout();
    let mut out = stdout.lock();
    while !engine.is_exhausted() {
        let report = engine.advance().map_err(facade)?;
        if let Some(alert) = &report.alert {
            warn!(tick = report.tick, %alert, "conflict detected");
        }
        write_frame(&mut out, &report).map_err(|source| CliError::StdoutWrite { source })?;

        if args.realtime {
            thread::sleep(Duration::from_secs_f64(engine.config().step_seconds));
        }
    }

    info!(ticks = engine.tick(), "simulation finished");
    Ok(())
}

fn run_validate(args: ValidateArgs) -> Result<(), CliError> {
    match args.format {
        ValidationFormat::Fleet => {
            let scenario = load_fleet(&args.input).map_err(facade)?;
            let fleet = scenario.build_fleet().map_err(facade)?;
            println!("fleet `{}` ok: {} trains", scenario.name, fleet.len());
        }
        ValidationFormat::Config => {
            let config = TrainsafeConfig::load(&args.input).map_err(facade)?;
            config.validate().map_err(facade)?;
            println!("config `{}` ok", args.input.display());
        }
    }
    Ok(())
}

fn run_schema(args: SchemaArgs) -> Result<(), CliError> {
    let schema = serde_json::to_string_pretty(&json_schema())
        .map_err(|source| CliError::SchemaEncode { source })?;
    write_output_bytes(schema.as_bytes(), args.output.as_deref())
}

fn apply_overrides(mut config: EngineConfig, args: &RunArgs) -> EngineConfig {
    if let Some(ticks) = args.ticks {
        config.max_ticks = Some(ticks);
    }
    if let Some(multiplier) = args.multiplier {
        config.speed_multiplier = multiplier;
    }
    if let Some(threshold_km) = args.threshold_km {
        config.stop_threshold_km = threshold_km;
    }
    config
}

fn write_frame(out: &mut impl Write, report: &TickReport) -> io::Result<()> {
    writeln!(
        out,
        "--- tick {} ({:.0}s simulated) ---",
        report.tick, report.sim_elapsed_seconds
    )?;
    for row in &report.trains {
        writeln!(out, "{row}")?;
    }
    if let Some(alert) = &report.alert {
        writeln!(out, "!! {alert}")?;
    }
    Ok(())
}

fn load_optional_config(path: Option<&Path>) -> Result<TrainsafeConfig, CliError> {
    match path {
        Some(path) => {
            let config = TrainsafeConfig::load(path).map_err(facade)?;
            config.validate().map_err(facade)?;
            Ok(config)
        }
        None => Ok(TrainsafeConfig::default()),
    }
}

fn init_tracing(logging: &LoggingConfig) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(logging.level.as_str()));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    // A subscriber may already be installed when tests drive the CLI
    // twice; the first one wins.
    let _ = match logging.format {
        LogFormat::Json => builder.json().try_init(),
        LogFormat::Pretty => builder.pretty().try_init(),
        LogFormat::Compact => builder.compact().try_init(),
    };
}

fn facade(source: impl Into<TrainsafeError>) -> CliError {
    CliError::Facade(source.into())
}

fn write_output_bytes(payload: &[u8], output: Option<&Path>) -> Result<(), CliError> {
    match output {
        Some(path) => fs::write(path, payload).map_err(|source| CliError::OutputWrite {
            path: path.display().to_string(),
            source,
        }),
        None => io::stdout()
            .write_all(payload)
            .map_err(|source| CliError::StdoutWrite { source }),
    }
}

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Facade(#[from] TrainsafeError),

    #[error("failed to encode config schema: {source}")]
    SchemaEncode { source: serde_json::Error },

    #[error("failed to write output file `{path}`: {source}")]
    OutputWrite { path: String, source: io::Error },

    #[error("failed to write stdout: {source}")]
    StdoutWrite { source: io::Error },
}

impl CliError {
    #[must_use]
    pub const fn exit_code(&self) -> u8 {
        1
    }
}
