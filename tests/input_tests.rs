use labcheck::{
    InvalidInput, compute_average,
    input::{grades_from_json, race_from_json},
};
use serde_json::json;

#[test]
fn decodes_integer_grade_lists() {
    let grades = grades_from_json(&json!([18, 25, 30, 33, 22, 28])).expect("decode");
    assert_eq!(compute_average(&grades), Ok(26.25));
}

#[test]
fn rejects_non_integer_grades() {
    for bad in [
        json!(["a", 25, 30, 33, 22, 28]),
        json!([null, 25, 30, 33, 22, 28]),
        json!([true, 25, 30, 33, 22, 28]),
        json!([18, "25", 30, 33, 22, 28]),
        json!([18, 25.5, 30, 33, 22, 28]),
    ] {
        assert!(
            matches!(grades_from_json(&bad), Err(InvalidInput::NotAnInteger { .. })),
            "{bad} should be rejected"
        );
    }
}

#[test]
fn rejects_grades_that_are_not_a_list() {
    assert_eq!(
        grades_from_json(&json!("18, 25, 30, 33, 22, 28")),
        Err(InvalidInput::NotASequence { field: "grades" })
    );
}

#[test]
fn decodes_race_records() {
    let record = race_from_json(&json!({
        "times": [120, 110, 90],
        "winner_times": [100, 100, 100],
        "n_penalties": 2,
        "penalties": [20, 10],
    }))
    .expect("decode");

    assert_eq!(record.times(), &[120, 110, 90]);
    assert_eq!(record.winner_times(), &[100, 100, 100]);
    assert_eq!(record.n_penalties(), 2);
    assert_eq!(record.penalty_total(), 30);
}

fn race_payload() -> serde_json::Value {
    json!({
        "times": [100, 110, 120],
        "winner_times": [80, 100, 110],
        "n_penalties": 2,
        "penalties": [10, 15],
    })
}

#[test]
fn rejects_race_fields_that_are_not_lists() {
    for key in ["times", "winner_times", "penalties"] {
        let mut payload = race_payload();
        payload[key] = json!("10, 15");
        assert_eq!(
            race_from_json(&payload),
            Err(InvalidInput::NotASequence { field: key }),
            "{payload}"
        );
    }
}

#[test]
fn rejects_non_integer_race_values() {
    let cases = [
        ("times", json!([true, 20, 30]), "times[0]"),
        ("times", json!([10, "20", 30]), "times[1]"),
        ("times", json!([10, 20, 30.0]), "times[2]"),
        ("winner_times", json!([80, 100.0, 110]), "winner_times[1]"),
        ("winner_times", json!([false, 100, 110]), "winner_times[0]"),
        ("winner_times", json!([80, 100, null]), "winner_times[2]"),
        ("n_penalties", json!("two"), "n_penalties"),
        ("n_penalties", json!(true), "n_penalties"),
        ("n_penalties", json!(2.0), "n_penalties"),
        ("penalties", json!([10, false]), "penalties[1]"),
        ("penalties", json!([10.0, 15]), "penalties[0]"),
        ("penalties", json!([10, "20"]), "penalties[1]"),
    ];

    for (key, value, expected) in cases {
        let mut payload = race_payload();
        payload[key] = value;
        match race_from_json(&payload) {
            Err(InvalidInput::NotAnInteger { field, .. }) => {
                assert_eq!(field, expected, "{payload}")
            }
            other => panic!("{payload} should be rejected as a non-integer, got {other:?}"),
        }
    }
}

#[test]
fn integers_beyond_i64_are_reported_as_too_large() {
    let mut payload = race_payload();
    payload["penalties"] = json!([10, u64::MAX]);
    let err = race_from_json(&payload).unwrap_err();
    assert_eq!(
        err,
        InvalidInput::IntegerTooLarge {
            field: "penalties[1]".into(),
            found: u64::MAX.to_string(),
        }
    );
    assert!(err.to_string().contains("64-bit"), "{err}");

    assert!(matches!(
        grades_from_json(&json!([18, 25, 30, u64::MAX, 22, 28])),
        Err(InvalidInput::IntegerTooLarge { .. })
    ));
}

#[test]
fn race_fields_are_checked_in_order() {
    // A short `times` list wins over a malformed `n_penalties`.
    let err = race_from_json(&json!({
        "times": [120, 110],
        "winner_times": [100, 100, 100],
        "n_penalties": "two",
        "penalties": [20, 10],
    }))
    .unwrap_err();
    assert!(matches!(err, InvalidInput::WrongLength { field: "times", .. }));

    let err = race_from_json(&json!({
        "times": [120, 110, 90],
        "winner_times": [100, 100, 100],
        "n_penalties": 3,
        "penalties": [20, 10],
    }))
    .unwrap_err();
    assert!(matches!(err, InvalidInput::PenaltyCountMismatch { .. }));
}

#[test]
fn rejects_incomplete_or_malformed_records() {
    assert_eq!(
        race_from_json(&json!({ "times": [1, 2, 3] })),
        Err(InvalidInput::MissingField("winner_times"))
    );
    assert_eq!(race_from_json(&json!([1, 2, 3])), Err(InvalidInput::NotARecord));
}
