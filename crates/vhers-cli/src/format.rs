/// Output rendering for the `vhers` commands: human-readable and JSON modes.
///
/// Results go to the writer passed in (stdout in practice). Logging and error
/// messages never pass through here; they go to stderr.
///
/// - **Human mode**: plain lines. PINs print one per line so the output can
///   be piped straight into a mailing merge.
/// - **JSON mode**: a single pretty-printed JSON object.
use std::io::Write;

use serde_json::{Value, json};
use vhers_core::{Field, MatchOutcome, MatchScore, WeightsConfig};

use crate::cli::OutputFormat;

// ---------------------------------------------------------------------------
// PINs
// ---------------------------------------------------------------------------

/// Writes generated PINs.
///
/// # Errors
///
/// Returns an error only if writing to `w` fails.
pub fn write_pins<W: Write>(w: &mut W, pins: &[String], format: OutputFormat) -> std::io::Result<()> {
    match format {
        OutputFormat::Human => {
            for pin in pins {
                writeln!(w, "{pin}")?;
            }
            Ok(())
        }
        OutputFormat::Json => write_json(w, &json!({ "pins": pins })),
    }
}

/// Writes a single generated PIN.
///
/// # Errors
///
/// Returns an error only if writing to `w` fails.
pub fn write_pin<W: Write>(w: &mut W, pin: &str, claimed: bool, format: OutputFormat) -> std::io::Result<()> {
    match format {
        OutputFormat::Human => writeln!(w, "{pin}"),
        OutputFormat::Json => write_json(w, &json!({ "pin": pin, "claimed": claimed })),
    }
}

// ---------------------------------------------------------------------------
// Match outcomes
// ---------------------------------------------------------------------------

/// Writes a match outcome, with the pass/fail verdict when `threshold` is set.
///
/// Human mode lists each field as `score / weight`, with `-` for fields the
/// record holds no value for.
///
/// # Errors
///
/// Returns an error only if writing to `w` fails.
pub fn write_outcome<W: Write>(
    w: &mut W,
    outcome: &MatchOutcome,
    config: &WeightsConfig,
    threshold: Option<f64>,
    format: OutputFormat,
) -> std::io::Result<()> {
    match format {
        OutputFormat::Human => match outcome {
            MatchOutcome::Faults(faults) => {
                for fault in faults {
                    writeln!(w, "fault: {fault}")?;
                }
                Ok(())
            }
            MatchOutcome::Scored(score) => write_score_human(w, score, config, threshold),
        },
        OutputFormat::Json => {
            let mut value = serde_json::to_value(outcome).map_err(std::io::Error::other)?;
            if let (Some(t), Some(score), Some(obj)) =
                (threshold, outcome.score(), value.as_object_mut())
            {
                obj.insert("threshold".to_owned(), json!(t));
                obj.insert("meetsThreshold".to_owned(), json!(score.meets(t)));
            }
            write_json(w, &value)
        }
    }
}

fn write_score_human<W: Write>(
    w: &mut W,
    score: &MatchScore,
    config: &WeightsConfig,
    threshold: Option<f64>,
) -> std::io::Result<()> {
    for field in Field::ALL {
        let weight = config.weights.get(field);
        match score.fields.get(field) {
            Some(s) => writeln!(w, "{:<22}{s:.4} / {weight:.4}", format!("{field}:"))?,
            None => writeln!(w, "{:<22}- / {weight:.4}", format!("{field}:"))?,
        }
    }
    writeln!(w, "{:<22}{:.4}", "score:", score.weighted_average)?;
    if let Some(t) = threshold {
        let verdict = if score.meets(t) { "met" } else { "not met" };
        writeln!(w, "{:<22}{t} ({verdict})", "threshold:")?;
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Weights
// ---------------------------------------------------------------------------

/// Writes a weights configuration as a table or as the JSON file format.
///
/// # Errors
///
/// Returns an error only if writing to `w` fails.
pub fn write_weights<W: Write>(w: &mut W, config: &WeightsConfig, format: OutputFormat) -> std::io::Result<()> {
    match format {
        OutputFormat::Human => {
            writeln!(w, "{:<22}{:>8}{:>11}{:>11}", "field", "weight", "threshold", "fuzziness")?;
            for field in Field::ALL {
                writeln!(
                    w,
                    "{:<22}{:>8.3}{:>11.3}{:>11.3}",
                    field.key(),
                    config.weights.get(field),
                    config.thresholds.get(field),
                    config.fuzziness.get(field),
                )?;
            }
            writeln!(w, "{:<22}{:>8.3}", "total", config.weights.total())
        }
        OutputFormat::Json => {
            let value = serde_json::to_value(config).map_err(std::io::Error::other)?;
            write_json(w, &value)
        }
    }
}

fn write_json<W: Write>(w: &mut W, value: &Value) -> std::io::Result<()> {
    serde_json::to_writer_pretty(&mut *w, value).map_err(std::io::Error::other)?;
    writeln!(w)
}
