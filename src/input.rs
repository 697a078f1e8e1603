#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

//! Strict decoding of loosely typed JSON payloads.
//!
//! JSON gives no guarantee that a "list of integers" really holds integers.
//! These helpers reject booleans, floats (including `25.0`), strings and
//! nulls before any check runs, so callers reading user supplied files get
//! the same [`InvalidInput`] errors as callers of the typed API.

use serde_json::{Map, Value};

use crate::{
    constants::EVENT_COUNT,
    error::{InvalidInput, expect_len},
    race::RaceRecord,
};

/// Decodes a single JSON integer.
fn integer(field: String, value: &Value) -> Result<i64, InvalidInput> {
    match value.as_i64() {
        Some(n) => Ok(n),
        // an integer, just not one that fits
        None if value.is_u64() => Err(InvalidInput::IntegerTooLarge {
            field,
            found: value.to_string(),
        }),
        None => Err(not_an_integer(field, value)),
    }
}

/// Builds the error for a value that is not an integer.
fn not_an_integer(field: String, value: &Value) -> InvalidInput {
    InvalidInput::NotAnInteger {
        field,
        found: value.to_string(),
    }
}

/// Decodes a JSON array of integers.
fn integers(field: &'static str, value: &Value) -> Result<Vec<i64>, InvalidInput> {
    let items = value
        .as_array()
        .ok_or(InvalidInput::NotASequence { field })?;
    items
        .iter()
        .enumerate()
        .map(|(i, item)| integer(format!("{field}[{i}]"), item))
        .collect()
}

/// Looks up a required field.
fn field<'a>(
    object: &'a Map<String, Value>,
    name: &'static str,
) -> Result<&'a Value, InvalidInput> {
    object.get(name).ok_or(InvalidInput::MissingField(name))
}

/// Decodes a grade list: a JSON array whose elements are all integers.
/// Range and length are left to [`crate::GradeAverager`].
pub fn grades_from_json(value: &Value) -> Result<Vec<i64>, InvalidInput> {
    integers("grades", value)
}

/// Decodes a race record object with the keys `times`, `winner_times`,
/// `n_penalties` and `penalties`. Each field is fully checked before the
/// next one is looked at.
pub fn race_from_json(value: &Value) -> Result<RaceRecord, InvalidInput> {
    let object = value.as_object().ok_or(InvalidInput::NotARecord)?;

    let times = integers("times", field(object, "times")?)?;
    expect_len("times", &times, EVENT_COUNT)?;
    let winner_times = integers("winner_times", field(object, "winner_times")?)?;
    expect_len("winner_times", &winner_times, EVENT_COUNT)?;
    let n_penalties = integer("n_penalties".into(), field(object, "n_penalties")?)?;
    let penalties = integers("penalties", field(object, "penalties")?)?;

    RaceRecord::new(&times, &winner_times, n_penalties, &penalties)
}
