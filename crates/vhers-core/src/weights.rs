/// Per-field weights, thresholds and fuzziness coefficients for matching.
///
/// A configuration is a JSON object with three required tables, each
/// mapping every [`Field`] key to a number:
///
/// ```json
/// {
///   "weights":               { "givenName": 0.1, "lastName": 0.2, ... },
///   "thresholds":            { "givenName": 0.5, "lastName": 0.5, ... },
///   "fuzzinessCoefficients": { "givenName": 0.2, "lastName": 0.1, ... }
/// }
/// ```
///
/// Loading is an explicit step. Callers load a [`WeightsConfig`] once,
/// through a [`WeightsSource`] or one of the `from_*` constructors, and pass
/// it by reference to every scoring call.
use std::fmt;
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde_json::{Map, Value};
use tracing::debug;

use crate::similarity::{check_fuzziness, check_threshold};

// ---------------------------------------------------------------------------
// Field
// ---------------------------------------------------------------------------

/// A scored field of an owner match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Field {
    GivenName,
    /// Last names 1 and 2, compared as an unordered pair.
    LastName,
    IncorporationNumber,
    /// Address lines 1 and 2 joined.
    AddressLine,
    City,
    ProvinceAbbreviation,
    Country,
    PostalCode,
}

impl Field {
    /// Every field, in scoring order.
    pub const ALL: [Field; 8] = [
        Field::GivenName,
        Field::LastName,
        Field::IncorporationNumber,
        Field::AddressLine,
        Field::City,
        Field::ProvinceAbbreviation,
        Field::Country,
        Field::PostalCode,
    ];

    /// The key used for this field in configuration tables.
    pub fn key(self) -> &'static str {
        match self {
            Self::GivenName => "givenName",
            Self::LastName => "lastName",
            Self::IncorporationNumber => "incorporationNumber",
            Self::AddressLine => "addressLine",
            Self::City => "city",
            Self::ProvinceAbbreviation => "provinceAbbreviation",
            Self::Country => "country",
            Self::PostalCode => "postalCode",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

// ---------------------------------------------------------------------------
// ConfigError
// ---------------------------------------------------------------------------

/// Errors produced while loading a [`WeightsConfig`].
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// A top-level table (`weights`, `thresholds`, `fuzzinessCoefficients`)
    /// is absent or is not an object.
    MissingRequiredFields,
    /// A table lacks a field key, or maps it to something other than a number.
    MissingField {
        /// Top-level table name.
        table: &'static str,
        /// The missing field.
        field: Field,
    },
    /// A value is out of range for its table.
    InvalidValue {
        /// Top-level table name.
        table: &'static str,
        /// The offending field.
        field: Field,
        /// The rejected value.
        value: f64,
        /// Description of the accepted range.
        expected: &'static str,
    },
    /// The weights table does not sum to 1.
    WeightsDoNotSumToOne {
        /// Sum of the configured weights.
        total: f64,
    },
    /// The input was not valid JSON.
    Parse {
        /// Parser error message.
        detail: String,
    },
    /// The configuration file could not be read.
    Io {
        /// Path that failed.
        path: PathBuf,
        /// Underlying I/O error message.
        detail: String,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingRequiredFields => f.write_str("Missing required fields in import"),
            Self::MissingField { table, field } => {
                write!(f, "Missing required field {field:?} in {table}", field = field.key())
            }
            Self::InvalidValue {
                table,
                field,
                value,
                expected,
            } => write!(
                f,
                "invalid {table} value for {key}: expected {expected}, got {value}",
                key = field.key()
            ),
            Self::WeightsDoNotSumToOne { total } => {
                write!(f, "weights must sum to 1 across all fields, got {total}")
            }
            Self::Parse { detail } => write!(f, "weights configuration is not valid JSON: {detail}"),
            Self::Io { path, detail } => {
                write!(f, "could not read weights configuration {}: {detail}", path.display())
            }
        }
    }
}

impl std::error::Error for ConfigError {}

// ---------------------------------------------------------------------------
// FieldTable
// ---------------------------------------------------------------------------

/// One number per [`Field`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldTable {
    pub given_name: f64,
    pub last_name: f64,
    pub incorporation_number: f64,
    pub address_line: f64,
    pub city: f64,
    pub province_abbreviation: f64,
    pub country: f64,
    pub postal_code: f64,
}

impl FieldTable {
    /// Returns the value stored for `field`.
    pub fn get(&self, field: Field) -> f64 {
        match field {
            Field::GivenName => self.given_name,
            Field::LastName => self.last_name,
            Field::IncorporationNumber => self.incorporation_number,
            Field::AddressLine => self.address_line,
            Field::City => self.city,
            Field::ProvinceAbbreviation => self.province_abbreviation,
            Field::Country => self.country,
            Field::PostalCode => self.postal_code,
        }
    }

    fn slot(&mut self, field: Field) -> &mut f64 {
        match field {
            Field::GivenName => &mut self.given_name,
            Field::LastName => &mut self.last_name,
            Field::IncorporationNumber => &mut self.incorporation_number,
            Field::AddressLine => &mut self.address_line,
            Field::City => &mut self.city,
            Field::ProvinceAbbreviation => &mut self.province_abbreviation,
            Field::Country => &mut self.country,
            Field::PostalCode => &mut self.postal_code,
        }
    }

    /// Sum of the values for every field.
    pub fn total(&self) -> f64 {
        Field::ALL.iter().map(|&f| self.get(f)).sum()
    }

    fn from_object(table: &'static str, obj: &Map<String, Value>) -> Result<Self, ConfigError> {
        let mut out = Self::filled(0.0);
        for field in Field::ALL {
            let value = obj
                .get(field.key())
                .and_then(Value::as_f64)
                .ok_or(ConfigError::MissingField { table, field })?;
            *out.slot(field) = value;
        }
        Ok(out)
    }

    fn filled(value: f64) -> Self {
        Self {
            given_name: value,
            last_name: value,
            incorporation_number: value,
            address_line: value,
            city: value,
            province_abbreviation: value,
            country: value,
            postal_code: value,
        }
    }
}

// ---------------------------------------------------------------------------
// WeightsConfig
// ---------------------------------------------------------------------------

/// Allowed distance of the weights total from 1.
const WEIGHT_SUM_TOLERANCE: f64 = 1e-9;

const WEIGHTS_KEY: &str = "weights";
const THRESHOLDS_KEY: &str = "thresholds";
const FUZZINESS_KEY: &str = "fuzzinessCoefficients";

fn top_level_table<'a>(value: &'a Value, key: &str) -> Result<&'a Map<String, Value>, ConfigError> {
    value
        .get(key)
        .and_then(Value::as_object)
        .ok_or(ConfigError::MissingRequiredFields)
}

/// Validated matching configuration.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeightsConfig {
    /// Share of the composite score each field contributes.
    pub weights: FieldTable,
    /// Minimum similarity for a field to count as a match at all.
    pub thresholds: FieldTable,
    /// Per-field leniency passed to [`crate::similarity::score`].
    #[serde(rename = "fuzzinessCoefficients")]
    pub fuzziness: FieldTable,
}

impl Default for WeightsConfig {
    /// Built-in table. Weights sum to 1 across all fields.
    fn default() -> Self {
        Self {
            weights: FieldTable {
                given_name: 0.1,
                last_name: 0.2,
                incorporation_number: 0.2,
                address_line: 0.2,
                city: 0.1,
                province_abbreviation: 0.05,
                country: 0.05,
                postal_code: 0.1,
            },
            thresholds: FieldTable {
                given_name: 0.5,
                last_name: 0.5,
                incorporation_number: 0.9,
                address_line: 0.5,
                city: 0.5,
                province_abbreviation: 1.0,
                country: 0.8,
                postal_code: 0.8,
            },
            fuzziness: FieldTable {
                given_name: 0.2,
                last_name: 0.1,
                incorporation_number: 0.0,
                address_line: 0.3,
                city: 0.2,
                province_abbreviation: 0.0,
                country: 0.2,
                postal_code: 0.0,
            },
        }
    }
}

impl WeightsConfig {
    /// Builds a configuration from a parsed JSON value.
    ///
    /// # Errors
    ///
    /// - [`ConfigError::MissingRequiredFields`] when a top-level table is
    ///   absent or not an object.
    /// - [`ConfigError::MissingField`] when a table lacks a numeric entry for
    ///   some field.
    /// - [`ConfigError::InvalidValue`] for negative or non-finite weights,
    ///   thresholds outside `[0, 1]`, or fuzziness above 1.
    /// - [`ConfigError::WeightsDoNotSumToOne`] when the weights total is not 1.
    pub fn from_value(value: &Value) -> Result<Self, ConfigError> {
        let weights = top_level_table(value, WEIGHTS_KEY)?;
        let thresholds = top_level_table(value, THRESHOLDS_KEY)?;
        let fuzziness = top_level_table(value, FUZZINESS_KEY)?;

        let config = Self {
            weights: FieldTable::from_object(WEIGHTS_KEY, weights)?,
            thresholds: FieldTable::from_object(THRESHOLDS_KEY, thresholds)?,
            fuzziness: FieldTable::from_object(FUZZINESS_KEY, fuzziness)?,
        };
        config.validate()?;
        Ok(config)
    }

    /// Parses and validates a JSON document.
    ///
    /// # Errors
    ///
    /// [`ConfigError::Parse`] for malformed JSON, otherwise as
    /// [`WeightsConfig::from_value`].
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let value: Value = serde_json::from_str(json).map_err(|e| ConfigError::Parse {
            detail: e.to_string(),
        })?;
        Self::from_value(&value)
    }

    /// Reads, parses and validates a JSON file.
    ///
    /// # Errors
    ///
    /// [`ConfigError::Io`] when the file cannot be read, otherwise as
    /// [`WeightsConfig::from_json_str`].
    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            detail: e.to_string(),
        })?;
        Self::from_json_str(&text)
    }

    /// Checks value ranges. Constructors call this; it is public for
    /// configurations assembled in code.
    ///
    /// # Errors
    ///
    /// [`ConfigError::InvalidValue`] naming the first offending entry, or
    /// [`ConfigError::WeightsDoNotSumToOne`] when every entry is in range but
    /// the weights total is not 1.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for field in Field::ALL {
            let w = self.weights.get(field);
            if !w.is_finite() || w < 0.0 {
                return Err(ConfigError::InvalidValue {
                    table: WEIGHTS_KEY,
                    field,
                    value: w,
                    expected: "a finite number >= 0",
                });
            }
            let t = self.thresholds.get(field);
            if check_threshold(t).is_err() {
                return Err(ConfigError::InvalidValue {
                    table: THRESHOLDS_KEY,
                    field,
                    value: t,
                    expected: "a number between 0 and 1 inclusive",
                });
            }
            let fz = self.fuzziness.get(field);
            if check_fuzziness(fz).is_err() {
                return Err(ConfigError::InvalidValue {
                    table: FUZZINESS_KEY,
                    field,
                    value: fz,
                    expected: "a number <= 1",
                });
            }
        }
        let total = self.weights.total();
        if (total - 1.0).abs() > WEIGHT_SUM_TOLERANCE {
            return Err(ConfigError::WeightsDoNotSumToOne { total });
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Sources
// ---------------------------------------------------------------------------

/// Somewhere a [`WeightsConfig`] can be loaded from.
pub trait WeightsSource {
    /// Loads and validates the configuration.
    ///
    /// # Errors
    ///
    /// Any [`ConfigError`] raised while reading or validating.
    fn load(&self) -> Result<WeightsConfig, ConfigError>;
}

impl WeightsSource for WeightsConfig {
    fn load(&self) -> Result<WeightsConfig, ConfigError> {
        self.validate()?;
        Ok(self.clone())
    }
}

impl WeightsSource for Value {
    fn load(&self) -> Result<WeightsConfig, ConfigError> {
        WeightsConfig::from_value(self)
    }
}

/// A JSON weights file on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JsonFileSource {
    path: PathBuf,
}

impl JsonFileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl WeightsSource for JsonFileSource {
    fn load(&self) -> Result<WeightsConfig, ConfigError> {
        WeightsConfig::from_path(&self.path)
    }
}

/// Loads a configuration from `source`, logging the outcome.
///
/// # Errors
///
/// Whatever `source` reports.
pub fn load_weights<S>(source: &S) -> Result<WeightsConfig, ConfigError>
where
    S: WeightsSource + ?Sized,
{
    let config = source.load()?;
    debug!(total_weight = config.weights.total(), "loaded match weights");
    Ok(config)
}
