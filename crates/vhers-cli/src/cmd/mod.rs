/// Command modules for the `vhers` CLI.
///
/// Each submodule implements one subcommand. Its `run` function takes the
/// parsed arguments, writes results to stdout, and returns `Ok(())` on
/// success or a [`crate::error::CliError`] on failure.
pub mod pin;
pub mod score;
pub mod weights;

use crate::error::CliError;

/// Wraps a failed write to stdout.
pub(crate) fn stdout_error(e: std::io::Error) -> CliError {
    CliError::IoError {
        source: "stdout".to_owned(),
        detail: e.to_string(),
    }
}
