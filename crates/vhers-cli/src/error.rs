/// CLI error types with associated exit codes.
///
/// [`CliError`] is the top-level error type for the `vhers` binary. Every
/// variant maps to a stable exit code (1 or 2) via [`CliError::exit_code`]:
///
/// - Exit code **2**: input failure. The tool could not read or parse its
///   input or configuration, so no PIN was generated and no match scored.
/// - Exit code **1**: logical failure. The inputs were understood but the
///   request cannot be satisfied (range errors, faults, owner-count mismatch,
///   score below threshold).
use std::fmt;
use std::path::PathBuf;

use vhers_core::{ConfigError, MatchError, PinError};

// ---------------------------------------------------------------------------
// CliError
// ---------------------------------------------------------------------------

/// All error conditions that the `vhers` CLI can produce.
#[derive(Debug)]
pub enum CliError {
    // --- Exit code 2: input failures ---
    /// A file argument could not be found on the filesystem.
    FileNotFound {
        /// The path that was not found.
        path: PathBuf,
    },

    /// The process lacks permission to read a file.
    PermissionDenied {
        /// The path that could not be read.
        path: PathBuf,
    },

    /// The input exceeds the configured `--max-file-size` limit.
    FileTooLarge {
        /// `"-"` for stdin, or the filesystem path.
        source: String,
        /// The configured size limit in bytes.
        limit: u64,
        /// The actual size in bytes; `None` for stdin.
        actual: Option<u64>,
    },

    /// The input bytes are not valid UTF-8.
    InvalidUtf8 {
        source: String,
        /// The byte offset of the first invalid byte sequence.
        byte_offset: usize,
    },

    /// An I/O error occurred while reading from stdin.
    StdinReadError { detail: String },

    /// Any other I/O error.
    IoError { source: String, detail: String },

    /// An input was not the JSON document the command expects.
    ParseFailed {
        source: String,
        detail: String,
    },

    /// Two arguments cannot be used together.
    InvalidArguments { detail: String },

    /// The weights configuration is missing tables or holds bad values.
    Config(ConfigError),

    // --- Exit code 1: logical failures ---
    /// PIN generation failed.
    Pin(PinError),

    /// Matching aborted, typically on an owner-count mismatch.
    Match(MatchError),

    /// The owner record is too sparse to score. The faults have already been
    /// printed.
    RecordFaults { count: usize },

    /// The composite score did not reach `--threshold`.
    BelowThreshold { score: f64, threshold: f64 },
}

impl CliError {
    /// Returns the process exit code for this error.
    ///
    /// - `2`: input failure (file not found, parse error, bad configuration).
    /// - `1`: logical failure (PIN range error, faults, mismatch, low score).
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::FileNotFound { .. }
            | Self::PermissionDenied { .. }
            | Self::FileTooLarge { .. }
            | Self::InvalidUtf8 { .. }
            | Self::StdinReadError { .. }
            | Self::IoError { .. }
            | Self::ParseFailed { .. }
            | Self::InvalidArguments { .. }
            | Self::Config(_) => 2,

            Self::Pin(e) if !e.is_range_error() => 2,
            Self::Match(MatchError::Config(_)) => 2,

            Self::Pin(_)
            | Self::Match(_)
            | Self::RecordFaults { .. }
            | Self::BelowThreshold { .. } => 1,
        }
    }

    /// Returns a human-readable error message suitable for printing to stderr.
    pub fn message(&self) -> String {
        match self {
            Self::FileNotFound { path } => {
                format!("error: file not found: {}", path.display())
            }
            Self::PermissionDenied { path } => {
                format!("error: permission denied: {}", path.display())
            }
            Self::FileTooLarge {
                source,
                limit,
                actual: Some(actual),
            } => {
                format!("error: file too large: {source} is {actual} bytes, limit is {limit} bytes")
            }
            Self::FileTooLarge {
                source,
                limit,
                actual: None,
            } => {
                format!("error: file too large: {source} exceeded limit of {limit} bytes")
            }
            Self::InvalidUtf8 {
                source,
                byte_offset,
            } => {
                format!(
                    "error: invalid UTF-8 in {source}: first invalid byte at offset {byte_offset}"
                )
            }
            Self::StdinReadError { detail } => {
                format!("error: failed to read stdin: {detail}")
            }
            Self::IoError { source, detail } => {
                format!("error: I/O error on {source}: {detail}")
            }
            Self::ParseFailed { source, detail } => {
                format!("error: could not parse {source}: {detail}")
            }
            Self::InvalidArguments { detail } => format!("error: {detail}"),
            Self::Config(e) => format!("error: invalid weights configuration: {e}"),
            Self::Pin(e) => format!("error: {e}"),
            Self::Match(e) => format!("error: {e}"),
            Self::RecordFaults { count } => {
                format!("error: owner record cannot be scored ({count} fault(s))")
            }
            Self::BelowThreshold { score, threshold } => {
                format!("error: match score {score:.4} is below threshold {threshold}")
            }
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message())
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Config(e) => Some(e),
            Self::Pin(e) => Some(e),
            Self::Match(e) => Some(e),
            Self::FileNotFound { .. }
            | Self::PermissionDenied { .. }
            | Self::FileTooLarge { .. }
            | Self::InvalidUtf8 { .. }
            | Self::StdinReadError { .. }
            | Self::IoError { .. }
            | Self::ParseFailed { .. }
            | Self::InvalidArguments { .. }
            | Self::RecordFaults { .. }
            | Self::BelowThreshold { .. } => None,
        }
    }
}

impl From<PinError> for CliError {
    fn from(e: PinError) -> Self {
        Self::Pin(e)
    }
}

impl From<MatchError> for CliError {
    fn from(e: MatchError) -> Self {
        Self::Match(e)
    }
}

impl From<ConfigError> for CliError {
    fn from(e: ConfigError) -> Self {
        Self::Config(e)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
