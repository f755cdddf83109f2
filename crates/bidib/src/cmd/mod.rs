use clap::{Args, Subcommand};

use crate::exit::CliResult;

pub mod decode;
pub mod serve;
pub mod version;

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run the node against a serial device.
    Serve(ServeArgs),
    /// Decode hex-encoded wire bytes into message records.
    Decode(DecodeArgs),
    /// Show version information.
    Version(VersionArgs),
}

pub fn run(command: Command) -> CliResult<i32> {
    match command {
        Command::Serve(args) => serve::run(args),
        Command::Decode(args) => decode::run(args),
        Command::Version(args) => version::run(args),
    }
}

#[derive(Args, Debug)]
pub struct ServeArgs {
    /// Serial device to open (e.g. /dev/ttyUSB0).
    pub device: String,
    /// Baud rate.
    #[arg(long, default_value_t = 115_200)]
    pub baud: u32,
}

#[derive(Args, Debug)]
pub struct DecodeArgs {
    /// Hex bytes to decode; read from stdin when omitted.
    pub hex: Option<String>,
    /// Emit one JSON object per record instead of text.
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug, Default)]
pub struct VersionArgs {
    /// Show extended build information.
    #[arg(long)]
    pub extended: bool,
}
