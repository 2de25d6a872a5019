#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use super::*;
use crate::weights::FieldTable;

fn s(v: &str) -> Option<String> {
    Some(v.to_owned())
}

fn smith_identity() -> OwnerIdentity {
    OwnerIdentity {
        last_name_1: s("Smith"),
        address_line_1: s("123 example st"),
        city: s("Vancouver"),
        province_abbreviation: s("BC"),
        country: s("Canada"),
        postal_code: s("V1V1V1"),
        ..OwnerIdentity::default()
    }
}

fn record(identity: OwnerIdentity) -> OwnerRecord {
    OwnerRecord {
        identity,
        ..OwnerRecord::default()
    }
}

fn request(identity: OwnerIdentity) -> MatchRequest {
    MatchRequest {
        identity,
        number_of_owners: 1,
    }
}

fn scored(outcome: MatchOutcome) -> MatchScore {
    match outcome {
        MatchOutcome::Scored(s) => s,
        MatchOutcome::Faults(f) => panic!("expected a score, got faults {f:?}"),
    }
}

fn uniform(weight: f64, threshold: f64, fuzziness: f64) -> WeightsConfig {
    let table = |v: f64| FieldTable {
        given_name: v,
        last_name: v,
        incorporation_number: v,
        address_line: v,
        city: v,
        province_abbreviation: v,
        country: v,
        postal_code: v,
    };
    WeightsConfig {
        weights: table(weight),
        thresholds: table(threshold),
        fuzziness: table(fuzziness),
    }
}

// ── faults ───────────────────────────────────────────────────────────────────

#[test]
fn complete_record_has_no_faults() {
    assert!(record_faults(&record(smith_identity())).is_empty());
}

#[test]
fn sparse_record_reports_all_three_faults_in_order() {
    let rec = record(OwnerIdentity {
        given_name: s("Jane"),
        address_line_1: s(NO_ADDRESS_ON_FILE),
        ..OwnerIdentity::default()
    });
    let faults = record_faults(&rec);
    assert_eq!(faults.len(), 3);
    assert!(faults[0].starts_with("No address is on file for this owner"));
    assert!(faults[1].starts_with("No legal name or corporation name"));
    assert!(faults[2].starts_with("No city or postal / zip code"));
}

#[test]
fn sentinel_address_short_circuits_scoring() {
    let rec = record(OwnerIdentity {
        address_line_1: s("No Address On File For This Owner"),
        ..OwnerIdentity::default()
    });
    let outcome = score_match(&request(smith_identity()), &rec, &WeightsConfig::default())
        .expect("faults are not errors");
    let faults = outcome.faults().expect("faults");
    assert_eq!(faults.len(), 3);
    assert_eq!(
        faults[0],
        "No address is on file for this owner: please contact service BC to create or recreate your PIN"
    );
    assert!(outcome.score().is_none());
}

#[test]
fn sentinel_address_alone_is_a_single_fault() {
    let mut identity = smith_identity();
    identity.address_line_1 = s(NO_ADDRESS_ON_FILE);
    assert_eq!(record_faults(&record(identity)).len(), 1);
}

#[test]
fn incorporation_number_satisfies_the_name_check() {
    let rec = record(OwnerIdentity {
        incorporation_number: s("BC0123456"),
        postal_code: s("V1V 1V1"),
        ..OwnerIdentity::default()
    });
    assert!(record_faults(&rec).is_empty());
}

#[test]
fn faults_take_precedence_over_owner_count() {
    let rec = OwnerRecord {
        number_of_owners: 3,
        ..OwnerRecord::default()
    };
    let outcome =
        score_match(&request(smith_identity()), &rec, &WeightsConfig::default()).expect("faults");
    assert!(outcome.faults().is_some());
}

// ── owner count ──────────────────────────────────────────────────────────────

#[test]
fn owner_count_mismatch_fails_even_on_a_perfect_match() {
    let rec = OwnerRecord {
        identity: smith_identity(),
        number_of_owners: 2,
        ..OwnerRecord::default()
    };
    let err = score_match(&request(smith_identity()), &rec, &WeightsConfig::default())
        .expect_err("count mismatch");
    assert_eq!(
        err,
        MatchError::OwnerCountMismatch {
            requested: 1,
            on_record: 2,
        }
    );
    assert_eq!(
        err.to_string(),
        "Number of owners does not match -- automatic fail."
    );
}

// ── scoring ──────────────────────────────────────────────────────────────────

#[test]
fn identical_fields_score_one() {
    let outcome = score_match(
        &request(smith_identity()),
        &record(smith_identity()),
        &WeightsConfig::default(),
    )
    .expect("score");
    let score = scored(outcome);
    assert_eq!(score.weighted_average, 1.0);
    assert_eq!(score.fields.given_name, None);
    assert_eq!(score.fields.incorporation_number, None);
    assert_eq!(score.fields.last_name, Some(0.2));
    assert!(score.meets(1.0));
}

#[test]
fn exact_matches_earn_full_weight_whatever_the_fuzziness() {
    for fuzziness in [-2.0, 0.0, 0.7, 1.0] {
        let config = uniform(0.125, 1.0, fuzziness);
        let mut submitted = smith_identity();
        submitted.city = s("VANCOUVER");
        let score = scored(
            score_match(&request(submitted), &record(smith_identity()), &config).expect("score"),
        );
        assert_eq!(score.fields.city, Some(0.125), "fuzziness {fuzziness}");
    }
}

#[test]
fn field_missing_from_request_scores_zero() {
    let mut submitted = smith_identity();
    submitted.city = None;
    let score = scored(
        score_match(
            &request(submitted),
            &record(smith_identity()),
            &uniform(0.125, 0.0, 0.0),
        )
        .expect("score"),
    );
    assert_eq!(score.fields.city, Some(0.0));
    // Six fields apply; five match fully.
    assert!((score.weighted_average - 5.0 / 6.0).abs() < 1e-9);
}

#[test]
fn field_missing_from_record_is_not_scored() {
    let mut stored = smith_identity();
    stored.country = None;
    let mut submitted = smith_identity();
    submitted.country = s("Narnia");
    let score = scored(
        score_match(
            &request(submitted),
            &record(stored),
            &uniform(0.125, 0.0, 0.0),
        )
        .expect("score"),
    );
    assert_eq!(score.fields.country, None);
    assert!((score.applicable_weight - 0.625).abs() < 1e-9);
    assert_eq!(score.weighted_average, 1.0);
}

#[test]
fn last_names_are_compared_without_order() {
    let mut stored = smith_identity();
    stored.last_name_1 = s("Garcia");
    stored.last_name_2 = s("Lopez");
    let mut submitted = smith_identity();
    submitted.last_name_1 = s("lopez");
    submitted.last_name_2 = s("GARCIA");
    let score = scored(
        score_match(
            &request(submitted),
            &record(stored),
            &uniform(0.125, 0.5, 0.0),
        )
        .expect("score"),
    );
    assert_eq!(score.fields.last_name, Some(0.125));
}

#[test]
fn missing_second_last_name_costs_half_the_field() {
    let mut stored = smith_identity();
    stored.last_name_2 = s("Jones");
    let score = scored(
        score_match(
            &request(smith_identity()),
            &record(stored),
            &uniform(0.125, 0.5, 0.0),
        )
        .expect("score"),
    );
    let last = score.fields.last_name.expect("scored");
    assert!((last - 0.0625).abs() < 1e-9, "got {last}");
}

#[test]
fn address_lines_are_concatenated() {
    let mut stored = smith_identity();
    stored.address_line_1 = s("123 example st");
    stored.address_line_2 = s("unit 4");
    let mut submitted = smith_identity();
    submitted.address_line_1 = s("123 Example St Unit 4");
    let score = scored(
        score_match(
            &request(submitted),
            &record(stored),
            &uniform(0.125, 1.0, 0.0),
        )
        .expect("score"),
    );
    assert_eq!(score.fields.address_line, Some(0.125));
}

#[test]
fn postal_code_spacing_is_ignored() {
    let mut submitted = smith_identity();
    submitted.postal_code = s("v1v 1v1");
    let score = scored(
        score_match(
            &request(submitted),
            &record(smith_identity()),
            &uniform(0.125, 1.0, 0.0),
        )
        .expect("score"),
    );
    assert_eq!(score.fields.postal_code, Some(0.125));
}

#[test]
fn near_miss_scores_part_of_the_weight() {
    let mut submitted = smith_identity();
    submitted.last_name_1 = s("Smyth");
    let score = scored(
        score_match(
            &request(submitted),
            &record(smith_identity()),
            &uniform(0.125, 0.5, 0.0),
        )
        .expect("score"),
    );
    let last = score.fields.last_name.expect("scored");
    assert!((last - 0.1).abs() < 1e-9, "got {last}");
    assert!(score.weighted_average < 1.0);
    assert!(score.weighted_average > 0.9);
}

#[test]
fn below_threshold_field_scores_zero() {
    let mut submitted = smith_identity();
    submitted.city = s("Kelowna");
    let score = scored(
        score_match(
            &request(submitted),
            &record(smith_identity()),
            &uniform(0.125, 0.9, 0.0),
        )
        .expect("score"),
    );
    assert_eq!(score.fields.city, Some(0.0));
}

#[test]
fn corporate_owner_scores_on_incorporation_number() {
    let stored = OwnerIdentity {
        incorporation_number: s("BC0123456"),
        address_line_1: s("1 Corporate Way"),
        city: s("Victoria"),
        ..OwnerIdentity::default()
    };
    let submitted = OwnerIdentity {
        incorporation_number: s("bc0123456"),
        address_line_1: s("1 Corporate Way"),
        city: s("Victoria"),
        ..OwnerIdentity::default()
    };
    let score = scored(
        score_match(
            &request(submitted),
            &record(stored),
            &WeightsConfig::default(),
        )
        .expect("score"),
    );
    assert_eq!(score.fields.incorporation_number, Some(0.2));
    assert_eq!(score.fields.last_name, None);
    assert_eq!(score.weighted_average, 1.0);
}

#[test]
fn invalid_config_is_rejected_on_a_fuzzy_comparison() {
    let mut config = uniform(0.125, 0.5, 0.0);
    config.thresholds.city = 2.0;
    let mut submitted = smith_identity();
    submitted.city = s("Kelowna");
    let err = score_match(&request(submitted), &record(smith_identity()), &config)
        .expect_err("bad threshold");
    assert!(
        matches!(
            err,
            MatchError::Config(ConfigError::InvalidValue {
                table: "thresholds",
                field: Field::City,
                ..
            })
        ),
        "got {err:?}"
    );
}

#[test]
fn invalid_config_is_rejected_on_an_exact_match() {
    let mut config = uniform(0.125, 0.5, 0.0);
    config.thresholds.city = 2.0;
    let err = score_match(
        &request(smith_identity()),
        &record(smith_identity()),
        &config,
    )
    .expect_err("bad threshold");
    assert!(matches!(err, MatchError::Config(_)), "got {err:?}");
}

#[test]
fn invalid_config_is_rejected_before_the_fault_check() {
    let config = uniform(0.0, 0.5, 0.0);
    let err = score_match(
        &request(smith_identity()),
        &record(OwnerIdentity::default()),
        &config,
    )
    .expect_err("zero weights");
    assert_eq!(
        err,
        MatchError::Config(ConfigError::WeightsDoNotSumToOne { total: 0.0 })
    );
}

#[test]
fn scoring_is_repeatable() {
    let mut submitted = smith_identity();
    submitted.city = s("Vancuver");
    submitted.given_name = s("Jan");
    let mut stored = smith_identity();
    stored.given_name = s("Jane");
    let config = WeightsConfig::default();
    let first = score_match(&request(submitted.clone()), &record(stored.clone()), &config);
    let second = score_match(&request(submitted), &record(stored), &config);
    assert_eq!(first, second);
}

#[test]
fn outcome_serializes_field_scores_by_key() {
    let outcome = score_match(
        &request(smith_identity()),
        &record(smith_identity()),
        &WeightsConfig::default(),
    )
    .expect("score");
    let value = serde_json::to_value(&outcome).expect("serialize");
    assert_eq!(value["scored"]["weightedAverage"], 1.0);
    assert!(value["scored"]["fields"].get("givenName").is_none());
    assert!(value["scored"]["fields"].get("postalCode").is_some());
}
