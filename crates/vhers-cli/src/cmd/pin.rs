//! Implementation of `vhers pin batch` and `vhers pin single`.
//!
//! `batch` prints `quantity` distinct PINs for an initial mailing. `single`
//! prints one PIN that does not appear in the `--existing` list; with
//! `--claim` the PIN is also appended to that list.
//!
//! Exit codes: 0 = success, 1 = range error (bad length or quantity,
//! exhausted keyspace), 2 = unreadable input.
use tracing::info;
use vhers_core::{
    InMemoryPinStore, PinOptions, create_and_claim_pin, create_batch, create_pin,
};

use crate::cli::{OutputFormat, PathOrStdin, PinShapeArgs};
use crate::cmd::stdout_error;
use crate::error::CliError;
use crate::format::{write_pin, write_pins};
use crate::io::{append_line, read_pin_list};

fn options(shape: &PinShapeArgs) -> PinOptions {
    PinOptions::default()
        .with_length(shape.length)
        .with_alphabet(shape.alphabet())
}

/// Runs `vhers pin batch`.
///
/// # Errors
///
/// [`CliError::Pin`] when the request cannot be satisfied.
pub fn run_batch(
    quantity: usize,
    shape: &PinShapeArgs,
    format: OutputFormat,
) -> Result<(), CliError> {
    let batch = create_batch(quantity, &options(shape))?;
    info!(quantity = batch.len(), "generated PIN batch");
    write_pins(&mut std::io::stdout().lock(), batch.as_slice(), format).map_err(stdout_error)
}

/// Runs `vhers pin single`.
///
/// # Errors
///
/// - [`CliError::InvalidArguments`] when `--claim` is combined with
///   `--existing -`.
/// - Any read error for the `--existing` list.
/// - [`CliError::Pin`] when no unused PIN could be found.
pub async fn run_single(
    existing: Option<&PathOrStdin>,
    claim: bool,
    shape: &PinShapeArgs,
    max_file_size: u64,
    format: OutputFormat,
) -> Result<(), CliError> {
    let claim_path = match (claim, existing) {
        (false, _) => None,
        (true, Some(PathOrStdin::Path(path))) => Some(path),
        (true, Some(PathOrStdin::Stdin) | None) => {
            return Err(CliError::InvalidArguments {
                detail: "--claim needs --existing to name a file".to_owned(),
            });
        }
    };

    let store = match existing {
        Some(source) => InMemoryPinStore::with_pins(read_pin_list(source, max_file_size)?),
        None => InMemoryPinStore::new(),
    };
    let options = options(shape);

    let pin = if let Some(path) = claim_path {
        let pin = create_and_claim_pin(&store, &options).await?;
        append_line(path, &pin)?;
        info!(live_pins = store.len(), "claimed PIN");
        pin
    } else {
        create_pin(&store, &options).await?
    };

    write_pin(&mut std::io::stdout().lock(), &pin, claim_path.is_some(), format)
        .map_err(stdout_error)
}
