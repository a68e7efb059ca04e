//! Command-line arguments.

use std::path::PathBuf;

use thiserror::Error;

/// Usage text printed for `--help` and argument errors.
pub const USAGE: &str = "\
Usage: prisma-decode [OPTIONS]

Reads raw terminal input from stdin and prints one JSON object per event.

Options:
  --config <FILE>   Load engine settings from a YAML file
  --sgr             Treat each input line as an SGR sequence and print the
                    compressed style state instead of input events
  --ice-color       Assume the terminal shows bright colors without bold
  -h, --help        Print this help";

/// Argument errors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CliError {
    /// Option given without its value
    #[error("Option {0} requires a value")]
    MissingValue(String),

    /// Option not recognized
    #[error("Unknown argument: {0}")]
    UnknownArgument(String),
}

/// What the tool reads from stdin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    /// Raw input bytes, decoded into events
    #[default]
    Decode,
    /// One SGR sequence per line, fed to the compressor
    Sgr,
}

/// Parsed options.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Options {
    /// YAML configuration file
    pub config: Option<PathBuf>,
    /// Input mode
    pub mode: Mode,
    /// Force ice color support on
    pub ice_color: bool,
    /// Print usage and exit
    pub help: bool,
}

impl Options {
    /// Parse arguments, excluding the program name.
    pub fn parse<I>(args: I) -> Result<Self, CliError>
    where
        I: IntoIterator<Item = String>,
    {
        let mut options = Options::default();
        let mut args = args.into_iter();

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--config" => {
                    let path = args.next().ok_or_else(|| CliError::MissingValue(arg.clone()))?;
                    options.config = Some(PathBuf::from(path));
                }
                "--sgr" => options.mode = Mode::Sgr,
                "--ice-color" => options.ice_color = true,
                "-h" | "--help" => options.help = true,
                _ => match arg.strip_prefix("--config=") {
                    Some(path) => options.config = Some(PathBuf::from(path)),
                    None => return Err(CliError::UnknownArgument(arg.clone())),
                },
            }
        }

        Ok(options)
    }
}
