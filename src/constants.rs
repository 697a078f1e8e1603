#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

/// Number of grades a student submits for averaging.
pub const GRADE_COUNT: usize = 6;

/// Lowest passing grade on the Italian university scale.
pub const MIN_GRADE: i64 = 18;

/// Highest grade; 33 encodes "30 e lode".
pub const MAX_GRADE: i64 = 33;

/// Number of events in a race record.
pub const EVENT_COUNT: usize = 3;

/// A single penalty above this value disqualifies the racer.
pub const MAX_SINGLE_PENALTY: i64 = 100;

/// The summed penalties above this value disqualify the racer.
pub const MAX_PENALTY_TOTAL: i64 = 100;

/// More penalties than this disqualify the racer.
pub const MAX_PENALTY_COUNT: i64 = 5;

/// A time strictly greater than the winner's time times this factor
/// disqualifies the racer.
pub const TIME_LIMIT_FACTOR: f64 = 1.5;

/// Environment variable naming a JSON configuration file.
pub const CONFIG_ENV_VAR: &str = "LABCHECK_CONFIG";
