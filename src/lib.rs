//! # labcheck
//!
//! Input validation exercises from an introductory programming lab: a
//! trimmed grade average and a race disqualification check.

#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

/// Configuration for the grading scale and race thresholds
pub mod config;
/// A module defining the constant values used throughout
pub mod constants;
/// The invalid-input error shared by every check
pub mod error;
/// Trimmed grade averaging
pub mod grades;
/// Strict decoding of JSON payloads into typed inputs
pub mod input;
/// Race disqualification rules
pub mod race;

pub use config::{Config, GradeScale, RaceRules};
pub use error::InvalidInput;
pub use grades::{GradeAverager, GradeList, compute_average};
pub use race::{RaceDisqualifier, RaceRecord, Rule, Verdict, Violation, racer_disqualified};
