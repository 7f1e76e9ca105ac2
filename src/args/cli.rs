mod commands;

use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;

use super::parsers::{parse_bool_env, parse_duration_arg};

pub use commands::{Command, EventsArgs, HealthArgs, WpcArgs};

#[derive(Debug, Parser, Clone)]
#[clap(
    version,
    about = "Load generator for event collectors, health reporting and policy-data services: concurrent workers, batched XML requests and per-worker latency files."
)]
pub struct BarrageArgs {
    #[command(subcommand)]
    pub command: Command,

    /// Base URL of the service under test
    #[arg(long, env = "BARRAGE_ENDPOINT", global = true, help_heading = "Common Options")]
    pub endpoint: Option<String>,

    /// Directory the result files are written to [default: .]
    #[arg(long = "output-dir", global = true, help_heading = "Common Options")]
    pub output_dir: Option<PathBuf>,

    /// Path to config file (TOML/JSON). Defaults to ./barrage.toml or ./barrage.json if present.
    #[arg(long, global = true, help_heading = "Common Options")]
    pub config: Option<String>,

    /// Per-request timeout (supports ms/s/m/h) [default: 30s]
    #[arg(long, global = true, value_parser = parse_duration_arg, help_heading = "Common Options")]
    pub timeout: Option<Duration>,

    /// Stop waiting for workers after this long (supports ms/s/m/h)
    #[arg(long = "shutdown-timeout", global = true, value_parser = parse_duration_arg, help_heading = "Common Options")]
    pub shutdown_timeout: Option<Duration>,

    /// Write a Prometheus text export of the worker counters to this path
    #[arg(long = "prometheus-path", global = true, help_heading = "Common Options")]
    pub prometheus_path: Option<PathBuf>,

    /// Enable verbose logging (sets log level to debug unless overridden by BARRAGE_LOG/RUST_LOG)
    #[arg(long, short = 'v', alias = "debug", global = true, help_heading = "Common Options")]
    pub verbose: bool,

    /// Disable color output
    #[arg(long = "no-color", env = "NO_COLOR", global = true, value_parser = parse_bool_env)]
    pub no_color: bool,
}
