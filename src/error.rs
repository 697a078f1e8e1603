#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

/// The single error kind raised by every check: the caller handed over
/// input that does not meet the shape, type or range constraints.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum InvalidInput {
    /// A sequence did not have the required number of elements.
    #[error("invalid input: `{field}` must contain exactly {expected} values, got {actual}")]
    WrongLength {
        /// Name of the offending input.
        field:    &'static str,
        /// Required length.
        expected: usize,
        /// Length that was supplied.
        actual:   usize,
    },
    /// A value fell outside its closed range.
    #[error("invalid input: `{field}[{index}]` is {value}, expected a value in [{min}, {max}]")]
    OutOfRange {
        /// Name of the offending input.
        field: &'static str,
        /// Position of the value within the sequence.
        index: usize,
        /// The rejected value.
        value: i64,
        /// Inclusive lower bound.
        min:   i64,
        /// Inclusive upper bound.
        max:   i64,
    },
    /// A sequence was expected but something else was supplied.
    #[error("invalid input: `{field}` must be a list of integers")]
    NotASequence {
        /// Name of the offending input.
        field: &'static str,
    },
    /// An integer was expected; booleans, floats, strings and nulls are
    /// rejected.
    #[error("invalid input: `{field}` must be an integer, got `{found}`")]
    NotAnInteger {
        /// Name (and position, for sequences) of the offending input.
        field: String,
        /// The value as it was received.
        found: String,
    },
    /// An integer was supplied that does not fit in an `i64`.
    #[error(
        "invalid input: `{field}` is {found}, which does not fit in a 64-bit signed \
         integer"
    )]
    IntegerTooLarge {
        /// Name (and position, for sequences) of the offending input.
        field: String,
        /// The value as it was received.
        found: String,
    },
    /// A record was expected but something else was supplied.
    #[error("invalid input: a race record must be a JSON object")]
    NotARecord,
    /// A required field was absent from a record.
    #[error("invalid input: missing field `{0}`")]
    MissingField(&'static str),
    /// The declared penalty count disagrees with the penalty list.
    #[error(
        "invalid input: `n_penalties` is {declared} but {actual} penalties were \
         listed"
    )]
    PenaltyCountMismatch {
        /// The declared number of penalties.
        declared: i64,
        /// The length of the penalty list.
        actual:   usize,
    },
}

/// Checks that `values` has exactly `expected` elements.
pub(crate) fn expect_len(
    field: &'static str,
    values: &[i64],
    expected: usize,
) -> Result<(), InvalidInput> {
    if values.len() == expected {
        Ok(())
    } else {
        Err(InvalidInput::WrongLength {
            field,
            expected,
            actual: values.len(),
        })
    }
}
