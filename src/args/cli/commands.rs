use clap::{Args, Subcommand};
use std::path::PathBuf;

use crate::args::PositiveUsize;
use crate::generators::wpc::{DEFAULT_CLIENT_IP, DEFAULT_USER};

use super::super::parsers::parse_positive_usize;

#[derive(Debug, Subcommand, Clone)]
pub enum Command {
    /// Replay BAM events from the event files listed in an index file
    Events(EventsArgs),
    /// Send health reports for the WPC and BAM agents
    Health(HealthArgs),
    /// Fetch policy data on behalf of a WPC agent
    Wpc(WpcArgs),
}

#[derive(Debug, Args, Clone)]
pub struct EventsArgs {
    /// File listing one event file per line; one worker per event file
    pub index_file: PathBuf,

    /// Number of events folded into each request
    #[arg(value_parser = parse_positive_usize)]
    pub events_in_send: PositiveUsize,

    /// Milliseconds to wait after each request
    pub delay_ms: u64,

    /// Number of passes over every event file
    #[arg(long, default_value = "1", value_parser = parse_positive_usize)]
    pub iterations: PositiveUsize,
}

#[derive(Debug, Args, Clone)]
pub struct HealthArgs {
    /// 1: agents report the current configuration, 2: agents ask for an update
    pub test_number: u32,

    /// Number of passes over the agent set in each worker
    #[arg(value_parser = parse_positive_usize)]
    pub iterations: PositiveUsize,

    /// Number of workers running at the same time
    #[arg(value_parser = parse_positive_usize)]
    pub threads: PositiveUsize,

    /// Milliseconds to wait after each request
    pub delay_ms: u64,
}

#[derive(Debug, Args, Clone)]
pub struct WpcArgs {
    /// 1: ADWPC, 2: ePOWPC, 3: CPWPC
    pub test_number: u32,

    /// Number of requests per worker
    #[arg(value_parser = parse_positive_usize)]
    pub iterations: PositiveUsize,

    /// Number of workers running at the same time
    #[arg(value_parser = parse_positive_usize)]
    pub threads: PositiveUsize,

    /// Milliseconds to wait after each request
    pub delay_ms: u64,

    /// Client IP address reported in each request
    #[arg(long = "client-ip", default_value = DEFAULT_CLIENT_IP)]
    pub client_ip: String,

    /// User name reported in each request
    #[arg(long, default_value = DEFAULT_USER)]
    pub user: String,
}
