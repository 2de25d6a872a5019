//! Implementation of `vhers score --request FILE --record FILE`.
//!
//! Scores a PIN-recreation request against one stored owner record and
//! prints the per-field breakdown and composite score. Records too sparse to
//! score print their faults instead.
//!
//! Exit codes: 0 = scored (and at or above `--threshold` when given),
//! 1 = faults, owner-count mismatch or score below threshold,
//! 2 = unreadable input or weights.
use vhers_core::{MatchOutcome, MatchRequest, OwnerRecord, score_match};

use crate::cli::{OutputFormat, PathOrStdin};
use crate::cmd::{stdout_error, weights};
use crate::error::CliError;
use crate::format::write_outcome;
use crate::io::read_json;

/// Inputs of one `vhers score` invocation.
pub struct ScoreArgs<'a> {
    pub request: &'a PathOrStdin,
    pub record: &'a PathOrStdin,
    pub threshold: Option<f64>,
    pub weights: Option<&'a PathOrStdin>,
    pub max_file_size: u64,
    pub format: OutputFormat,
}

/// Runs `vhers score`.
///
/// # Errors
///
/// - [`CliError::InvalidArguments`] when more than one input reads stdin.
/// - Read, parse and weights errors (exit code 2).
/// - [`CliError::Match`], [`CliError::RecordFaults`] or
///   [`CliError::BelowThreshold`] (exit code 1).
pub fn run(args: &ScoreArgs<'_>) -> Result<(), CliError> {
    let stdin_inputs = [Some(args.request), Some(args.record), args.weights]
        .into_iter()
        .flatten()
        .filter(|s| **s == PathOrStdin::Stdin)
        .count();
    if stdin_inputs > 1 {
        return Err(CliError::InvalidArguments {
            detail: "at most one input may be read from stdin".to_owned(),
        });
    }

    let config = weights::resolve(args.weights, args.max_file_size)?;
    let request: MatchRequest = read_json(args.request, args.max_file_size)?;
    let record: OwnerRecord = read_json(args.record, args.max_file_size)?;

    let outcome = score_match(&request, &record, &config)?;
    write_outcome(
        &mut std::io::stdout().lock(),
        &outcome,
        &config,
        args.threshold,
        args.format,
    )
    .map_err(stdout_error)?;

    match (&outcome, args.threshold) {
        (MatchOutcome::Faults(faults), _) => Err(CliError::RecordFaults {
            count: faults.len(),
        }),
        (MatchOutcome::Scored(score), Some(threshold)) if !score.meets(threshold) => {
            Err(CliError::BelowThreshold {
                score: score.weighted_average,
                threshold,
            })
        }
        (MatchOutcome::Scored(_), _) => Ok(()),
    }
}
