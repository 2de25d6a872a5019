//! Clap CLI definition: root struct, subcommands, and shared argument types.
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use vhers_core::{Alphabet, DEFAULT_PIN_LENGTH};

/// A CLI argument that is either a filesystem path or the stdin sentinel `"-"`.
///
/// Parsing `"-"` yields [`PathOrStdin::Stdin`]; anything else yields
/// [`PathOrStdin::Path`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PathOrStdin {
    /// Read from standard input.
    Stdin,
    /// Read from the given filesystem path.
    Path(PathBuf),
}

impl std::str::FromStr for PathOrStdin {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == "-" {
            Ok(PathOrStdin::Stdin)
        } else {
            Ok(PathOrStdin::Path(PathBuf::from(s)))
        }
    }
}

/// Output format for CLI commands.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Plain text, one value per line (default).
    Human,
    /// A single JSON object on stdout.
    Json,
}

/// Built-in PIN alphabets.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum PresetArg {
    /// `A-Z` without `I` and `O`, plus `2-9` (default).
    Uppercase,
    /// `a-z` without `i`, `l` and `o`, plus `2-9`.
    Lowercase,
}

/// PIN shape shared by the `pin` subcommands.
#[derive(Args, Clone, Debug)]
pub struct PinShapeArgs {
    /// Number of characters in each PIN.
    #[arg(long, short = 'l', default_value_t = DEFAULT_PIN_LENGTH)]
    pub length: usize,

    /// Built-in alphabet to draw characters from.
    #[arg(long, value_enum, conflicts_with = "chars")]
    pub preset: Option<PresetArg>,

    /// Custom alphabet; repeated characters are ignored.
    #[arg(long, value_name = "CHARS")]
    pub chars: Option<String>,
}

impl PinShapeArgs {
    /// The alphabet selected by `--preset` or `--chars`, uppercase if neither.
    pub fn alphabet(&self) -> Alphabet {
        match (&self.chars, self.preset) {
            (Some(chars), _) => Alphabet::Custom(chars.clone()),
            (None, Some(PresetArg::Lowercase)) => Alphabet::Lowercase,
            (None, Some(PresetArg::Uppercase) | None) => Alphabet::Uppercase,
        }
    }
}

/// Subcommands of `vhers pin`.
#[derive(Subcommand, Clone, Debug)]
pub enum PinCommand {
    /// Generate a batch of distinct PINs for an initial mailing.
    Batch {
        /// Number of PINs to generate.
        #[arg(long, short = 'n')]
        quantity: usize,
        #[command(flatten)]
        shape: PinShapeArgs,
    },

    /// Generate one PIN that is not already in use.
    Single {
        /// File listing live PINs one per line, or `-` for stdin.
        #[arg(long, value_name = "FILE")]
        existing: Option<PathOrStdin>,
        /// Append the new PIN to the `--existing` file in the same step.
        #[arg(long, requires = "existing")]
        claim: bool,
        #[command(flatten)]
        shape: PinShapeArgs,
    },
}

/// All top-level subcommands exposed by the `vhers` binary.
#[derive(Subcommand, Clone, Debug)]
pub enum Command {
    /// Generate PINs.
    Pin {
        #[command(subcommand)]
        command: PinCommand,
    },

    /// Score a PIN-recreation request against a stored owner record.
    Score {
        /// JSON match request, or `-` for stdin.
        #[arg(long, value_name = "FILE")]
        request: PathOrStdin,
        /// JSON owner record, or `-` for stdin.
        #[arg(long, value_name = "FILE")]
        record: PathOrStdin,
        /// Fail with exit code 1 when the composite score is below this value.
        #[arg(long, value_parser = parse_unit_interval)]
        threshold: Option<f64>,
    },

    /// Validate and print a weights configuration.
    Weights {
        /// JSON weights file, or `-` for stdin. Defaults to `--weights`, then
        /// the built-in table.
        #[arg(value_name = "FILE")]
        file: Option<PathOrStdin>,
    },
}

/// Parses a number in `[0, 1]`.
fn parse_unit_interval(s: &str) -> Result<f64, String> {
    let value: f64 = s.parse().map_err(|e| format!("{e}"))?;
    if (0.0..=1.0).contains(&value) {
        Ok(value)
    } else {
        Err(format!("{value} is not between 0 and 1"))
    }
}

/// Root CLI struct for the `vhers` binary.
///
/// All global flags are marked `global = true` so that clap propagates them
/// to every subcommand.
#[derive(Parser, Debug)]
#[command(
    name = "vhers",
    version,
    about = "VHERS PIN service tool",
    long_about = "Generates owner PINs and scores PIN-recreation requests\n\
                  against stored owner records."
)]
pub struct Cli {
    /// Active subcommand.
    #[command(subcommand)]
    pub command: Command,

    /// Output format: human (default) or json.
    #[arg(long, short = 'f', default_value = "human", global = true)]
    pub format: OutputFormat,

    /// Only log errors to stderr (incompatible with `--verbose`).
    #[arg(long, short = 'q', global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Log debug detail to stderr (incompatible with `--quiet`).
    #[arg(long, short = 'v', global = true, conflicts_with = "quiet")]
    pub verbose: bool,

    /// Maximum input file size in bytes.
    ///
    /// Can also be set via the `VHERS_MAX_FILE_SIZE` environment variable.
    /// Default: 16777216 (16 MB).
    #[arg(
        long,
        global = true,
        env = "VHERS_MAX_FILE_SIZE",
        default_value = "16777216"
    )]
    pub max_file_size: u64,

    /// Weights configuration used by `score`; the built-in table when unset.
    #[arg(long, global = true, env = "VHERS_WEIGHTS", value_name = "FILE")]
    pub weights: Option<PathOrStdin>,
}
