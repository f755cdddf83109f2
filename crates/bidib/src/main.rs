mod cmd;
mod exit;
mod hex;
mod logging;

use clap::Parser;

use crate::cmd::Command;
use crate::logging::{init_logging, LogFormat, LogLevel};

#[derive(Parser, Debug)]
#[command(name = "bidib", version, about = "BiDiB node daemon and wire tools")]
struct Cli {
    /// Log output format (stderr).
    #[arg(long, value_name = "FORMAT", default_value = "text", global = true)]
    log_format: LogFormat,

    /// Minimum log level (stderr).
    #[arg(long, value_name = "LEVEL", default_value = "info", global = true)]
    log_level: LogLevel,

    #[command(subcommand)]
    command: Command,
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.log_format, cli.log_level);

    match cmd::run(cli.command) {
        Ok(code) => std::process::exit(code),
        Err(err) => {
            eprintln!("error: {err}");
            std::process::exit(err.code);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_serve_subcommand() {
        let cli = Cli::try_parse_from(["bidib", "serve", "/dev/ttyUSB0", "--baud", "19200"])
            .expect("serve args should parse");

        match cli.command {
            Command::Serve(args) => {
                assert_eq!(args.device, "/dev/ttyUSB0");
                assert_eq!(args.baud, 19_200);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn serve_baud_defaults_to_bus_rate() {
        let cli = Cli::try_parse_from(["bidib", "serve", "/dev/ttyUSB0"])
            .expect("serve args should parse");
        match cli.command {
            Command::Serve(args) => assert_eq!(args.baud, 115_200),
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn parses_decode_subcommand() {
        let cli = Cli::try_parse_from(["bidib", "decode", "fe00fe", "--json"])
            .expect("decode args should parse");
        match cli.command {
            Command::Decode(args) => {
                assert_eq!(args.hex.as_deref(), Some("fe00fe"));
                assert!(args.json);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn log_flags_are_global() {
        let cli = Cli::try_parse_from(["bidib", "version", "--log-level", "debug"])
            .expect("global flags should parse after the subcommand");
        assert!(matches!(cli.command, Command::Version(_)));
    }
}
