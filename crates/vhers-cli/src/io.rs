/// File and stdin access with size enforcement and UTF-8 validation.
///
/// All filesystem access of the `vhers` binary goes through this module;
/// `vhers-core` scores and generates from in-memory values only.
///
/// - Disk files: size checked via `std::fs::metadata` before any read.
/// - Stdin: buffered with a `Read::take` cap so allocation is bounded.
/// - Every I/O failure becomes a [`CliError`] with exit code 2.
use std::io::{Read as _, Write as _};
use std::path::Path;

use serde::de::DeserializeOwned;

use crate::cli::PathOrStdin;
use crate::error::CliError;

// ---------------------------------------------------------------------------
// Reading
// ---------------------------------------------------------------------------

/// Reads the entire contents of `source` into a `String`.
///
/// # Errors
///
/// Returns [`CliError`] (exit code 2) when the source is missing,
/// unreadable, larger than `max_size`, or not valid UTF-8.
pub fn read_input(source: &PathOrStdin, max_size: u64) -> Result<String, CliError> {
    match source {
        PathOrStdin::Path(path) => read_file(path, max_size),
        PathOrStdin::Stdin => read_stdin(max_size),
    }
}

/// Reads `source` and deserializes it as JSON.
///
/// # Errors
///
/// As [`read_input`], plus [`CliError::ParseFailed`] when the text is not a
/// valid `T`.
pub fn read_json<T: DeserializeOwned>(source: &PathOrStdin, max_size: u64) -> Result<T, CliError> {
    let text = read_input(source, max_size)?;
    serde_json::from_str(&text).map_err(|e| CliError::ParseFailed {
        source: label(source),
        detail: e.to_string(),
    })
}

/// Reads a list of PINs, one per line. Blank lines are skipped.
///
/// # Errors
///
/// As [`read_input`].
pub fn read_pin_list(source: &PathOrStdin, max_size: u64) -> Result<Vec<String>, CliError> {
    let text = read_input(source, max_size)?;
    Ok(text
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_owned)
        .collect())
}

/// Display label for a source: `"-"` for stdin, otherwise the path.
pub fn label(source: &PathOrStdin) -> String {
    match source {
        PathOrStdin::Path(path) => path.display().to_string(),
        PathOrStdin::Stdin => "-".to_owned(),
    }
}

fn read_file(path: &Path, max_size: u64) -> Result<String, CliError> {
    let file_size = std::fs::metadata(path)
        .map_err(|e| io_error_to_cli(&e, path))?
        .len();

    if file_size > max_size {
        return Err(CliError::FileTooLarge {
            source: path.display().to_string(),
            limit: max_size,
            actual: Some(file_size),
        });
    }

    let bytes = std::fs::read(path).map_err(|e| io_error_to_cli(&e, path))?;
    bytes_to_string(bytes, &path.display().to_string())
}

/// Reads stdin, capped at `max_size` bytes.
///
/// When exactly `max_size` bytes arrive one more byte is probed to tell "at
/// the limit" from "over the limit".
fn read_stdin(max_size: u64) -> Result<String, CliError> {
    let stdin = std::io::stdin();
    let mut handle = stdin.lock();
    let mut buf: Vec<u8> = Vec::new();

    handle
        .by_ref()
        .take(max_size)
        .read_to_end(&mut buf)
        .map_err(|e| CliError::StdinReadError {
            detail: e.to_string(),
        })?;

    if buf.len() as u64 == max_size {
        let mut probe = [0u8; 1];
        let extra = handle
            .read(&mut probe)
            .map_err(|e| CliError::StdinReadError {
                detail: e.to_string(),
            })?;
        if extra > 0 {
            return Err(CliError::FileTooLarge {
                source: "-".to_owned(),
                limit: max_size,
                actual: None,
            });
        }
    }

    bytes_to_string(buf, "-")
}

fn bytes_to_string(bytes: Vec<u8>, source_label: &str) -> Result<String, CliError> {
    String::from_utf8(bytes).map_err(|e| CliError::InvalidUtf8 {
        source: source_label.to_owned(),
        byte_offset: e.utf8_error().valid_up_to(),
    })
}

/// Maps a `std::io::Error` from a disk-file operation to a [`CliError`].
#[allow(clippy::wildcard_enum_match_arm)]
fn io_error_to_cli(e: &std::io::Error, path: &Path) -> CliError {
    match e.kind() {
        std::io::ErrorKind::NotFound => CliError::FileNotFound {
            path: path.to_path_buf(),
        },
        std::io::ErrorKind::PermissionDenied => CliError::PermissionDenied {
            path: path.to_path_buf(),
        },
        _ => CliError::IoError {
            source: path.display().to_string(),
            detail: e.to_string(),
        },
    }
}

// ---------------------------------------------------------------------------
// Writing
// ---------------------------------------------------------------------------

/// Appends `line` to the file at `path`, creating the file if needed.
///
/// # Errors
///
/// [`CliError::IoError`] when the file cannot be opened or written.
pub fn append_line(path: &Path, line: &str) -> Result<(), CliError> {
    let to_cli = |e: std::io::Error| CliError::IoError {
        source: path.display().to_string(),
        detail: e.to_string(),
    };
    let mut file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(to_cli)?;
    writeln!(file, "{line}").map_err(to_cli)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
