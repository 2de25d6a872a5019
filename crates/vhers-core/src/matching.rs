/// Identity matching of PIN-recreation requests against owner records.
///
/// [`score_match`] runs three stages in order:
///
/// 1. **Fault pre-check** ([`record_faults`]): records too sparse to score
///    fairly (no address, no legal name, no city or postal code) return
///    every applicable fault as [`MatchOutcome::Faults`].
/// 2. **Owner count**: a request whose owner count differs from the
///    record's fails with [`MatchError::OwnerCountMismatch`] regardless of
///    how well the other fields agree.
/// 3. **Field scoring**: each [`Field`] the record has a value for scores in
///    `[0, weight]`. A field the request leaves empty scores 0; a field the
///    record lacks is left out, weight included. The composite is the sum of
///    the field scores divided by the weights of the fields that were scored.
///
/// Everything here is a pure function of the request, the record and the
/// [`WeightsConfig`].
use std::fmt;

use serde::Serialize;
use tracing::{debug, warn};

use crate::records::{MatchRequest, OwnerIdentity, OwnerRecord};
use crate::similarity::{ScoreError, score};
use crate::weights::{ConfigError, Field, WeightsConfig};

/// Value stored in address line 1 when the registry holds no address.
pub const NO_ADDRESS_ON_FILE: &str = "NO ADDRESS ON FILE FOR THIS OWNER";

const FAULT_NO_ADDRESS: &str = "No address is on file for this owner: please contact service BC to create or recreate your PIN";
const FAULT_NO_NAME: &str = "No legal name or corporation name is on file for this owner: please contact service BC to create or recreate your PIN";
const FAULT_NO_CITY_OR_POSTAL: &str = "No city or postal / zip code is on file for this owner: please contact service BC to create or recreate your PIN";

// ---------------------------------------------------------------------------
// Errors and results
// ---------------------------------------------------------------------------

/// Errors that abort a match.
#[derive(Debug, Clone, PartialEq)]
pub enum MatchError {
    /// The request's owner count differs from the record's.
    OwnerCountMismatch {
        /// Owner count supplied with the request.
        requested: u32,
        /// Owner count held on the record.
        on_record: u32,
    },
    /// The configuration failed [`WeightsConfig::validate`].
    Config(ConfigError),
    /// A similarity comparison rejected its arguments.
    Score(ScoreError),
}

impl fmt::Display for MatchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OwnerCountMismatch { .. } => {
                f.write_str("Number of owners does not match -- automatic fail.")
            }
            Self::Config(e) => write!(f, "{e}"),
            Self::Score(e) => write!(f, "{e}"),
        }
    }
}

impl std::error::Error for MatchError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Config(e) => Some(e),
            Self::Score(e) => Some(e),
            Self::OwnerCountMismatch { .. } => None,
        }
    }
}

impl From<ConfigError> for MatchError {
    fn from(e: ConfigError) -> Self {
        Self::Config(e)
    }
}

impl From<ScoreError> for MatchError {
    fn from(e: ScoreError) -> Self {
        Self::Score(e)
    }
}

/// Per-field scores. `None` means the record had no value for the field.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldScores {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub given_name: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub incorporation_number: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address_line: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub city: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub province_abbreviation: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub postal_code: Option<f64>,
}

impl FieldScores {
    /// Returns the score recorded for `field`.
    pub fn get(&self, field: Field) -> Option<f64> {
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

    fn set(&mut self, field: Field, value: Option<f64>) {
        let slot = match field {
            Field::GivenName => &mut self.given_name,
            Field::LastName => &mut self.last_name,
            Field::IncorporationNumber => &mut self.incorporation_number,
            Field::AddressLine => &mut self.address_line,
            Field::City => &mut self.city,
            Field::ProvinceAbbreviation => &mut self.province_abbreviation,
            Field::Country => &mut self.country,
            Field::PostalCode => &mut self.postal_code,
        };
        *slot = value;
    }
}

/// Composite result of a scored match.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchScore {
    /// Score of each field, in `[0, weight]`.
    pub fields: FieldScores,
    /// Sum of the weights of the fields that were scored.
    pub applicable_weight: f64,
    /// Field scores summed and divided by `applicable_weight`, in `[0, 1]`.
    pub weighted_average: f64,
}

impl MatchScore {
    /// Returns `true` when the composite score reaches `threshold`.
    pub fn meets(&self, threshold: f64) -> bool {
        self.weighted_average >= threshold
    }
}

/// Outcome of [`score_match`].
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum MatchOutcome {
    /// The record is too sparse to score; each entry is a user-facing
    /// message.
    Faults(Vec<String>),
    /// The record was scored.
    Scored(MatchScore),
}

impl MatchOutcome {
    /// The faults, if the record could not be scored.
    pub fn faults(&self) -> Option<&[String]> {
        match self {
            Self::Faults(f) => Some(f),
            Self::Scored(_) => None,
        }
    }

    /// The score, if the record was scored.
    pub fn score(&self) -> Option<&MatchScore> {
        match self {
            Self::Scored(s) => Some(s),
            Self::Faults(_) => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Fault pre-check
// ---------------------------------------------------------------------------

/// Lists the data-quality faults that prevent `record` from being scored.
///
/// An empty list means the record can be scored.
pub fn record_faults(record: &OwnerRecord) -> Vec<String> {
    let id = &record.identity;
    let mut faults = Vec::new();
    if id
        .address_line_1()
        .is_some_and(|a| a.eq_ignore_ascii_case(NO_ADDRESS_ON_FILE))
    {
        faults.push(FAULT_NO_ADDRESS.to_owned());
    }
    if id.last_names().is_empty() && id.incorporation_number().is_none() {
        faults.push(FAULT_NO_NAME.to_owned());
    }
    if id.city().is_none() && id.postal_code().is_none() {
        faults.push(FAULT_NO_CITY_OR_POSTAL.to_owned());
    }
    faults
}

// ---------------------------------------------------------------------------
// Scoring
// ---------------------------------------------------------------------------

/// Scores `request` against `record` using `config`.
///
/// `config` is validated before anything else, so a bad table is rejected
/// whatever the request and record hold.
///
/// # Errors
///
/// - [`MatchError::Config`] when `config` fails [`WeightsConfig::validate`].
/// - [`MatchError::OwnerCountMismatch`] when the owner counts differ and the
///   record has no faults.
pub fn score_match(
    request: &MatchRequest,
    record: &OwnerRecord,
    config: &WeightsConfig,
) -> Result<MatchOutcome, MatchError> {
    config.validate()?;

    let faults = record_faults(record);
    if !faults.is_empty() {
        warn!(faults = faults.len(), "owner record cannot be scored");
        return Ok(MatchOutcome::Faults(faults));
    }

    if request.number_of_owners != record.number_of_owners {
        return Err(MatchError::OwnerCountMismatch {
            requested: request.number_of_owners,
            on_record: record.number_of_owners,
        });
    }

    let mut fields = FieldScores::default();
    let mut total = 0.0;
    let mut applicable_weight = 0.0;
    for field in Field::ALL {
        let value = field_score(field, &record.identity, &request.identity, config)?;
        debug!(field = field.key(), score = ?value, "scored field");
        if let Some(v) = value {
            total += v;
            applicable_weight += config.weights.get(field);
        }
        fields.set(field, value);
    }

    let weighted_average = if applicable_weight > 0.0 {
        (total / applicable_weight).clamp(0.0, 1.0)
    } else {
        0.0
    };
    debug!(weighted_average, applicable_weight, "scored owner match");
    Ok(MatchOutcome::Scored(MatchScore {
        fields,
        applicable_weight,
        weighted_average,
    }))
}

/// Scores one field; `None` when the record has no value for it.
fn field_score(
    field: Field,
    record: &OwnerIdentity,
    request: &OwnerIdentity,
    config: &WeightsConfig,
) -> Result<Option<f64>, MatchError> {
    let weight = config.weights.get(field);
    let threshold = config.thresholds.get(field);
    let fuzziness = config.fuzziness.get(field);

    if field == Field::LastName {
        let stored = record.last_names();
        if stored.is_empty() {
            return Ok(None);
        }
        let similarity = last_name_similarity(&stored, &request.last_names(), threshold, fuzziness)?;
        return Ok(Some(similarity * weight));
    }

    let Some(stored) = field_value(field, record) else {
        return Ok(None);
    };
    let Some(submitted) = field_value(field, request) else {
        return Ok(Some(0.0));
    };
    Ok(Some(similarity(&stored, &submitted, threshold, fuzziness)? * weight))
}

/// Comparable value of a single-string field.
fn field_value(field: Field, identity: &OwnerIdentity) -> Option<String> {
    match field {
        Field::GivenName => identity.given_name().map(str::to_owned),
        Field::IncorporationNumber => identity.incorporation_number().map(str::to_owned),
        Field::AddressLine => identity.address_line(),
        Field::City => identity.city().map(str::to_owned),
        Field::ProvinceAbbreviation => identity.province_abbreviation().map(str::to_owned),
        Field::Country => identity.country().map(str::to_owned),
        Field::PostalCode => identity
            .postal_code()
            .map(|p| p.chars().filter(|c| !c.is_whitespace()).collect()),
        Field::LastName => None,
    }
}

/// Similarity in `[0, 1]`, with case-insensitive equality scoring 1 without
/// consulting the fuzzy comparison.
fn similarity(
    stored: &str,
    submitted: &str,
    threshold: f64,
    fuzziness: f64,
) -> Result<f64, ScoreError> {
    if stored.to_lowercase() == submitted.to_lowercase() {
        return Ok(1.0);
    }
    score(Some(stored), submitted, threshold, Some(fuzziness))
}

/// Similarity of two sets of at most two last names, ignoring order.
///
/// Tries both pairings and keeps the better one; the total is divided by the
/// larger set's size, so an extra or missing name costs its share.
fn last_name_similarity(
    stored: &[&str],
    submitted: &[&str],
    threshold: f64,
    fuzziness: f64,
) -> Result<f64, ScoreError> {
    if submitted.is_empty() {
        return Ok(0.0);
    }
    let pair = |a: Option<&&str>, b: Option<&&str>| -> Result<f64, ScoreError> {
        match (a, b) {
            (Some(a), Some(b)) => similarity(a, b, threshold, fuzziness),
            (Some(_), None) | (None, Some(_)) | (None, None) => Ok(0.0),
        }
    };
    let straight = pair(stored.first(), submitted.first())? + pair(stored.get(1), submitted.get(1))?;
    let crossed = pair(stored.first(), submitted.get(1))? + pair(stored.get(1), submitted.first())?;
    let slots = stored.len().max(submitted.len()) as f64;
    Ok((straight.max(crossed) / slots).clamp(0.0, 1.0))
}

#[cfg(test)]
mod tests;
