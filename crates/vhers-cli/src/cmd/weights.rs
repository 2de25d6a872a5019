//! Implementation of `vhers weights [FILE]`, and weights resolution shared
//! with `vhers score`.
//!
//! Exit codes: 0 = valid configuration, 2 = unreadable or invalid.
use serde_json::Value;
use vhers_core::{WeightsConfig, load_weights};

use crate::cli::{OutputFormat, PathOrStdin};
use crate::cmd::stdout_error;
use crate::error::CliError;
use crate::format::write_weights;
use crate::io::read_json;

/// Loads the configuration from `source`, or the built-in table when `None`.
///
/// # Errors
///
/// Read and parse failures from [`read_json`], and [`CliError::Config`] when
/// the document is missing tables or holds out-of-range values.
pub fn resolve(source: Option<&PathOrStdin>, max_file_size: u64) -> Result<WeightsConfig, CliError> {
    let config = match source {
        Some(source) => {
            let value: Value = read_json(source, max_file_size)?;
            load_weights(&value)?
        }
        None => load_weights(&WeightsConfig::default())?,
    };
    Ok(config)
}

/// Runs `vhers weights`.
///
/// # Errors
///
/// As [`resolve`].
pub fn run(
    source: Option<&PathOrStdin>,
    max_file_size: u64,
    format: OutputFormat,
) -> Result<(), CliError> {
    let config = resolve(source, max_file_size)?;
    write_weights(&mut std::io::stdout().lock(), &config, format).map_err(stdout_error)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::expect_used)]
    #![allow(clippy::panic)]

    use std::io::Write as _;

    use vhers_core::{ConfigError, Field};

    use super::*;

    fn source_with(contents: &str) -> (tempfile::NamedTempFile, PathOrStdin) {
        let mut f = tempfile::NamedTempFile::new().expect("temp file");
        f.write_all(contents.as_bytes()).expect("write");
        let source = PathOrStdin::Path(f.path().to_path_buf());
        (f, source)
    }

    #[test]
    fn no_source_gives_built_in_table() {
        let config = resolve(None, 1024).expect("default");
        assert_eq!(config, WeightsConfig::default());
    }

    #[test]
    fn file_source_is_validated() {
        let mut doc = serde_json::to_value(WeightsConfig::default()).expect("serialize");
        doc["thresholds"]["city"] = serde_json::json!(1.5);
        let (_f, source) = source_with(&doc.to_string());
        let err = resolve(Some(&source), 1 << 20).expect_err("bad threshold");
        match err {
            CliError::Config(ConfigError::InvalidValue { field, .. }) => {
                assert_eq!(field, Field::City);
            }
            other => panic!("expected InvalidValue, got {other:?}"),
        }
    }

    #[test]
    fn missing_table_is_reported() {
        let (_f, source) = source_with(r#"{"weights": {}}"#);
        let err = resolve(Some(&source), 1024).expect_err("missing tables");
        assert!(matches!(
            err,
            CliError::Config(ConfigError::MissingRequiredFields)
        ));
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn malformed_json_is_a_parse_failure() {
        let (_f, source) = source_with("weights = 1");
        let err = resolve(Some(&source), 1024).expect_err("not json");
        assert!(matches!(err, CliError::ParseFailed { .. }));
    }
}
