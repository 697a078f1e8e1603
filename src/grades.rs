#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

//! Trimmed average of a student's six grades.

use itertools::{Itertools, MinMaxResult};
use serde::Serialize;
use tracing::debug;

use crate::{
    config::GradeScale,
    constants::GRADE_COUNT,
    error::{InvalidInput, expect_len},
};

/// Six grades that have been checked against a [`GradeScale`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct GradeList {
    /// The grades, in the order they were supplied.
    grades: [i64; GRADE_COUNT],
}

impl GradeList {
    /// Validates `grades` against `scale`.
    ///
    /// * `grades`: exactly six values, each within the scale
    /// * `scale`: the accepted closed range
    pub fn new(grades: &[i64], scale: &GradeScale) -> Result<Self, InvalidInput> {
        expect_len("grades", grades, GRADE_COUNT)?;

        if let Some((index, &value)) = grades.iter().find_position(|g| !scale.contains(**g)) {
            return Err(InvalidInput::OutOfRange {
                field: "grades",
                index,
                value,
                min: scale.min,
                max: scale.max,
            });
        }

        let mut list = [0; GRADE_COUNT];
        list.copy_from_slice(grades);
        Ok(Self { grades: list })
    }

    /// Returns the grades in their original order.
    pub fn grades(&self) -> &[i64] {
        &self.grades
    }

    /// Mean of the grades after dropping one lowest and one highest value.
    /// Duplicated extremes lose a single instance each.
    pub fn trimmed_mean(&self) -> f64 {
        let total: i64 = self.grades.iter().sum();
        let (lowest, highest) = match self.grades.iter().minmax() {
            MinMaxResult::MinMax(lo, hi) => (*lo, *hi),
            MinMaxResult::OneElement(only) => (*only, *only),
            MinMaxResult::NoElements => (0, 0),
        };
        let kept = (GRADE_COUNT - 2) as f64;
        (total - lowest - highest) as f64 / kept
    }
}

/// Averages grade lists on a configurable scale.
#[derive(Debug, Clone, Copy, Default)]
pub struct GradeAverager {
    /// Scale every grade must fall in.
    scale: GradeScale,
}

impl GradeAverager {
    /// Creates an averager for `scale`.
    pub fn new(scale: GradeScale) -> Self {
        Self { scale }
    }

    /// Returns the scale grades are checked against.
    pub fn scale(&self) -> &GradeScale {
        &self.scale
    }

    /// Validates `grades` and returns their trimmed mean.
    pub fn compute_average(&self, grades: &[i64]) -> Result<f64, InvalidInput> {
        let list = GradeList::new(grades, &self.scale).inspect_err(|err| {
            debug!(?grades, %err, "rejected grade list");
        })?;

        let average = list.trimmed_mean();
        debug!(?grades, average, "computed trimmed average");
        Ok(average)
    }
}

/// Returns the average of six grades in [18, 33] after discarding one
/// minimum and one maximum.
///
/// ```
/// assert_eq!(labcheck::compute_average(&[18, 25, 30, 33, 22, 28]), Ok(26.25));
/// ```
pub fn compute_average(grades: &[i64]) -> Result<f64, InvalidInput> {
    GradeAverager::default().compute_average(grades)
}
