use std::path::Path;

use clap::{Args, Subcommand};

use crate::exit::CliResult;
use crate::output::OutputFormat;

pub mod announce;
pub mod doctor;
pub mod dump;
pub mod run;
pub mod version;

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run the bridge: decode bus frames and publish readings over MQTT.
    Run(RunArgs),
    /// Decode bus frames and print readings to stdout, without MQTT.
    Dump(DumpArgs),
    /// Publish the Home Assistant discovery payloads and exit.
    Announce(AnnounceArgs),
    /// Run local environment health checks.
    Doctor(DoctorArgs),
    /// Show version information.
    Version(VersionArgs),
}

pub fn run(command: Command, config_path: &Path, format: OutputFormat) -> CliResult<i32> {
    match command {
        Command::Run(args) => run::run(args, config_path),
        Command::Dump(args) => dump::run(args, config_path, format),
        Command::Announce(args) => announce::run(args, config_path),
        Command::Doctor(args) => doctor::run(args, config_path, format),
        Command::Version(args) => version::run(args),
    }
}

#[derive(Args, Debug)]
pub struct RunArgs {
    /// Override the configured CAN interface.
    #[arg(long, value_name = "IFACE")]
    pub interface: Option<String>,
}

#[derive(Args, Debug)]
pub struct DumpArgs {
    /// CAN interface to read; when set, the config file is not consulted.
    #[arg(long, value_name = "IFACE")]
    pub interface: Option<String>,
    /// Exit after printing N readings.
    #[arg(long, value_name = "N")]
    pub count: Option<usize>,
    /// Also print frames that decode to nothing.
    #[arg(long)]
    pub raw: bool,
}

#[derive(Args, Debug, Default)]
pub struct AnnounceArgs {}

#[derive(Args, Debug, Default)]
pub struct DoctorArgs {}

#[derive(Args, Debug)]
pub struct VersionArgs {
    /// Show extended build provenance.
    #[arg(long)]
    pub extended: bool,
}
