//! Command-line argument parsing for the livefeed CLI.

use std::fmt;
use std::path::PathBuf;

/// Options for streaming the live feed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RunOptions {
    /// Full live feed URL; overrides the configured base URL and path
    pub url: Option<String>,
    pub username: Option<String>,
    pub password: Option<String>,
    /// Print `ping` heartbeats too
    pub show_pings: bool,
    /// Write a history snapshot here on exit
    pub snapshot: Option<PathBuf>,
}

/// Parsed CLI command to execute.
#[derive(Debug, Clone, PartialEq)]
pub enum CliCommand {
    /// Show version information
    Version,
    /// Show usage
    Help,
    /// Stream the live feed (default)
    Run(RunOptions),
}

/// Invalid command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArgsError {
    /// A flag that needs a value was last
    MissingValue(String),
    /// Unrecognized argument
    Unknown(String),
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::MissingValue(flag) => write!(f, "{} requires a value", flag),
            ArgsError::Unknown(arg) => write!(f, "unknown argument: {}", arg),
        }
    }
}

impl std::error::Error for ArgsError {}

/// Usage text for `--help`.
pub const USAGE: &str = "\
Usage: livefeed [OPTIONS]

Options:
  --url <URL>            Live feed URL (default: $LIVEFEED_BASE_URL + $LIVEFEED_PATH)
  --username <NAME>      Admin username (default: $LIVEFEED_USERNAME or credentials file)
  --password <PASS>      Admin password (default: $LIVEFEED_PASSWORD or credentials file)
  --show-pings           Print ping heartbeats
  --snapshot <FILE>      Write a JSON history snapshot to FILE on exit
  -V, --version          Print version
  -h, --help             Print this help";

/// Parse command-line arguments and return the appropriate command.
///
/// # Arguments
///
/// * `args` - Iterator of command-line arguments (typically `std::env::args()`)
///
/// # Examples
///
/// ```
/// use livefeed::cli::args::{parse_args, CliCommand};
///
/// let args = vec!["livefeed".to_string(), "--version".to_string()];
/// assert_eq!(parse_args(args.into_iter()), Ok(CliCommand::Version));
/// ```
pub fn parse_args<I>(args: I) -> Result<CliCommand, ArgsError>
where
    I: Iterator<Item = String>,
{
    let mut options = RunOptions::default();
    // Skip the program name
    let mut args = args.skip(1);

    while let Some(arg) = args.next() {
        let (flag, inline) = match arg.split_once('=') {
            Some((flag, value)) if flag.starts_with("--") => (flag.to_string(), Some(value.to_string())),
            _ => (arg.clone(), None),
        };

        let mut value = |flag: &str| -> Result<String, ArgsError> {
            inline
                .clone()
                .or_else(|| args.next())
                .ok_or_else(|| ArgsError::MissingValue(flag.to_string()))
        };

        match flag.as_str() {
            "--version" | "-V" => return Ok(CliCommand::Version),
            "--help" | "-h" => return Ok(CliCommand::Help),
            "--show-pings" => options.show_pings = true,
            "--url" => options.url = Some(value("--url")?),
            "--username" | "-u" => options.username = Some(value("--username")?),
            "--password" | "-p" => options.password = Some(value("--password")?),
            "--snapshot" => options.snapshot = Some(PathBuf::from(value("--snapshot")?)),
            _ => return Err(ArgsError::Unknown(arg)),
        }
    }

    Ok(CliCommand::Run(options))
}
