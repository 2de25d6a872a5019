/// Fuzzy string similarity used by the match scorer.
///
/// [`score`] compares two strings case-insensitively and returns a value in
/// `[0, 1]`:
///
/// 1. Case-insensitive equality (after trimming) scores 1.
/// 2. Otherwise the raw similarity is the normalized Levenshtein ratio.
/// 3. A fuzziness coefficient `f` forgives that share of the remaining
///    distance: `1 - (1 - raw) * (1 - f)`, clamped to `[0, 1]`. `f = 0`
///    leaves the ratio unchanged, `f = 1` accepts anything, and a negative
///    `f` makes scoring stricter.
/// 4. Results below `threshold` score 0.
use std::fmt;

use strsim::normalized_levenshtein;

/// Errors produced by [`score`] for invalid arguments.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScoreError {
    /// The base string was absent.
    NullBase,
    /// The threshold was outside `[0, 1]`.
    InvalidThreshold,
    /// The fuzziness coefficient was greater than 1.
    InvalidFuzziness,
}

impl fmt::Display for ScoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NullBase => f.write_str("Base string cannot be null."),
            Self::InvalidThreshold => f.write_str(
                "Invalid scoring threshold. Please provide thresholds between 0 and 1 inclusive.",
            ),
            Self::InvalidFuzziness => f.write_str(
                "Invalid fuzziness coefficient. Please provide fuzziness coeffiecients less than or equal to 1.",
            ),
        }
    }
}

impl std::error::Error for ScoreError {}

/// Returns `Ok(())` when `threshold` lies in `[0, 1]`.
pub(crate) fn check_threshold(threshold: f64) -> Result<(), ScoreError> {
    if (0.0..=1.0).contains(&threshold) {
        Ok(())
    } else {
        Err(ScoreError::InvalidThreshold)
    }
}

/// Returns `Ok(())` when `fuzziness` is a number no greater than 1.
pub(crate) fn check_fuzziness(fuzziness: f64) -> Result<(), ScoreError> {
    if fuzziness.is_nan() || fuzziness > 1.0 {
        Err(ScoreError::InvalidFuzziness)
    } else {
        Ok(())
    }
}

/// Scores how closely `comparison` matches `base`.
///
/// `fuzziness` defaults to 0 when `None`.
///
/// # Errors
///
/// - [`ScoreError::NullBase`] when `base` is `None`.
/// - [`ScoreError::InvalidThreshold`] when `threshold` is outside `[0, 1]`.
/// - [`ScoreError::InvalidFuzziness`] when `fuzziness` is greater than 1.
///
/// # Examples
///
/// ```
/// use vhers_core::similarity::{ScoreError, score};
///
/// assert_eq!(score(Some("Smith"), "SMITH", 1.0, None), Ok(1.0));
/// assert_eq!(score(None, "a", 1.0, None), Err(ScoreError::NullBase));
/// assert_eq!(score(Some("a"), "a", 1.5, None), Err(ScoreError::InvalidThreshold));
/// assert_eq!(score(Some("a"), "a", 1.0, Some(1.5)), Err(ScoreError::InvalidFuzziness));
/// ```
pub fn score(
    base: Option<&str>,
    comparison: &str,
    threshold: f64,
    fuzziness: Option<f64>,
) -> Result<f64, ScoreError> {
    let base = base.ok_or(ScoreError::NullBase)?;
    check_threshold(threshold)?;
    let fuzziness = fuzziness.unwrap_or(0.0);
    check_fuzziness(fuzziness)?;

    let base = base.trim().to_lowercase();
    let comparison = comparison.trim().to_lowercase();
    if base == comparison {
        return Ok(1.0);
    }

    let raw = normalized_levenshtein(&base, &comparison);
    let adjusted = (1.0 - (1.0 - raw) * (1.0 - fuzziness)).clamp(0.0, 1.0);
    if adjusted < threshold {
        Ok(0.0)
    } else {
        Ok(adjusted)
    }
}
