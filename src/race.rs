#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

//! Disqualification checks for a single racer.

use std::fmt::Display;

use serde::Serialize;
use tabled::Tabled;
use tracing::debug;

use crate::{
    config::RaceRules,
    constants::EVENT_COUNT,
    error::{InvalidInput, expect_len},
};

/// One racer's validated times and penalties.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RaceRecord {
    /// The racer's time for each event.
    times:        [i64; EVENT_COUNT],
    /// The winning time for each event.
    winner_times: [i64; EVENT_COUNT],
    /// Individual penalty values; the declared count equals its length.
    penalties:    Vec<i64>,
}

impl RaceRecord {
    /// Validates the four race inputs. Checks run in order and the first
    /// failure is returned:
    /// * `times`: exactly three values
    /// * `winner_times`: exactly three values
    /// * `n_penalties`: must equal `penalties.len()`
    pub fn new(
        times: &[i64],
        winner_times: &[i64],
        n_penalties: i64,
        penalties: &[i64],
    ) -> Result<Self, InvalidInput> {
        expect_len("times", times, EVENT_COUNT)?;
        expect_len("winner_times", winner_times, EVENT_COUNT)?;

        if usize::try_from(n_penalties).ok() != Some(penalties.len()) {
            return Err(InvalidInput::PenaltyCountMismatch {
                declared: n_penalties,
                actual:   penalties.len(),
            });
        }

        let mut record = Self {
            times:        [0; EVENT_COUNT],
            winner_times: [0; EVENT_COUNT],
            penalties:    penalties.to_vec(),
        };
        record.times.copy_from_slice(times);
        record.winner_times.copy_from_slice(winner_times);
        Ok(record)
    }

    /// Returns the racer's event times.
    pub fn times(&self) -> &[i64] {
        &self.times
    }

    /// Returns the winning event times.
    pub fn winner_times(&self) -> &[i64] {
        &self.winner_times
    }

    /// Returns the penalty values.
    pub fn penalties(&self) -> &[i64] {
        &self.penalties
    }

    /// Returns the number of penalties.
    pub fn n_penalties(&self) -> i64 {
        self.penalties.len() as i64
    }

    /// Sum of all penalties, widened so it cannot overflow.
    pub fn penalty_total(&self) -> i128 {
        self.penalties.iter().map(|&p| i128::from(p)).sum()
    }
}

/// A broken disqualification rule.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "rule", rename_all = "snake_case")]
pub enum Violation {
    /// A single penalty exceeded the cap.
    ExcessivePenalty {
        /// Position in the penalty list.
        index: usize,
        /// The penalty value.
        value: i64,
        /// The cap it exceeded.
        limit: i64,
    },
    /// The summed penalties exceeded the cap.
    PenaltyTotal {
        /// Sum of all penalties.
        total: i128,
        /// The cap it exceeded.
        limit: i64,
    },
    /// Too many penalties were incurred.
    PenaltyCount {
        /// Number of penalties.
        count: i64,
        /// The cap it exceeded.
        limit: i64,
    },
    /// An event time exceeded the allowed multiple of the winner's time.
    TimeOverage {
        /// Event position.
        event: usize,
        /// The racer's time.
        time:  i64,
        /// Largest time that would not disqualify.
        limit: f64,
    },
}

impl Violation {
    /// Short name of the rule family this violation belongs to.
    pub fn rule(&self) -> Rule {
        match self {
            Violation::ExcessivePenalty { .. } => Rule::SinglePenalty,
            Violation::PenaltyTotal { .. } | Violation::PenaltyCount { .. } => {
                Rule::AggregatePenalty
            }
            Violation::TimeOverage { .. } => Rule::TimeOverage,
        }
    }
}

impl Display for Violation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Violation::ExcessivePenalty {
                index,
                value,
                limit,
            } => write!(f, "penalty #{index} is {value} (limit {limit})"),
            Violation::PenaltyTotal { total, limit } => {
                write!(f, "penalties total {total} (limit {limit})")
            }
            Violation::PenaltyCount { count, limit } => {
                write!(f, "{count} penalties (limit {limit})")
            }
            Violation::TimeOverage { event, time, limit } => {
                write!(f, "event #{event} took {time} (limit {limit})")
            }
        }
    }
}

/// The three independent rule families.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Rule {
    /// Any single penalty above the cap.
    SinglePenalty,
    /// Penalty total or penalty count above their caps.
    AggregatePenalty,
    /// Any event time above the allowed multiple of the winner's.
    TimeOverage,
}

impl Rule {
    /// All rule families, in evaluation order.
    pub const ALL: [Rule; 3] = [Rule::SinglePenalty, Rule::AggregatePenalty, Rule::TimeOverage];
}

impl Display for Rule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Rule::SinglePenalty => "single penalty",
            Rule::AggregatePenalty => "aggregate penalties",
            Rule::TimeOverage => "time overage",
        };
        write!(f, "{name}")
    }
}

/// Outcome of checking a [`RaceRecord`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Verdict {
    /// True if any rule was broken; always `!violations.is_empty()`.
    disqualified: bool,
    /// Every violation found, grouped by rule family in evaluation order.
    violations:   Vec<Violation>,
}

impl Verdict {
    /// Builds a verdict from the violations found; the racer is
    /// disqualified exactly when there is at least one.
    pub fn from_violations(violations: Vec<Violation>) -> Self {
        Self {
            disqualified: !violations.is_empty(),
            violations,
        }
    }

    /// Returns true if any rule was broken.
    pub fn disqualified(&self) -> bool {
        self.disqualified
    }

    /// Returns every violation found, grouped by rule family.
    pub fn violations(&self) -> &[Violation] {
        &self.violations
    }

    /// Returns true if `rule` produced at least one violation.
    pub fn triggered(&self, rule: Rule) -> bool {
        self.violations.iter().any(|v| v.rule() == rule)
    }

    /// One row per rule family, for display.
    pub fn rows(&self) -> Vec<RuleRow> {
        Rule::ALL
            .iter()
            .map(|&rule| {
                let details = self
                    .violations
                    .iter()
                    .filter(|v| v.rule() == rule)
                    .map(ToString::to_string)
                    .collect::<Vec<_>>();
                RuleRow {
                    rule:      rule.to_string(),
                    triggered: !details.is_empty(),
                    detail:    if details.is_empty() {
                        "-".to_string()
                    } else {
                        details.join("; ")
                    },
                }
            })
            .collect()
    }
}

/// A single table row summarising one rule family.
#[derive(Tabled, Debug, Clone)]
pub struct RuleRow {
    /// Rule family name.
    #[tabled(rename = "Rule")]
    pub rule:      String,
    /// Whether the rule disqualified the racer.
    #[tabled(rename = "Triggered")]
    pub triggered: bool,
    /// What broke the rule, if anything.
    #[tabled(rename = "Detail")]
    pub detail:    String,
}

/// Applies [`RaceRules`] to race records.
#[derive(Debug, Clone, Copy, Default)]
pub struct RaceDisqualifier {
    /// Thresholds in effect.
    rules: RaceRules,
}

impl RaceDisqualifier {
    /// Creates a disqualifier enforcing `rules`.
    pub fn new(rules: RaceRules) -> Self {
        Self { rules }
    }

    /// Returns the thresholds in effect.
    pub fn rules(&self) -> &RaceRules {
        &self.rules
    }

    /// Runs every rule family against `record`.
    pub fn evaluate(&self, record: &RaceRecord) -> Verdict {
        let mut violations = Vec::new();

        violations.extend(
            record
                .penalties()
                .iter()
                .enumerate()
                .filter(|(_, p)| **p > self.rules.max_single_penalty)
                .map(|(index, &value)| Violation::ExcessivePenalty {
                    index,
                    value,
                    limit: self.rules.max_single_penalty,
                }),
        );

        let total = record.penalty_total();
        if total > i128::from(self.rules.max_penalty_total) {
            violations.push(Violation::PenaltyTotal {
                total,
                limit: self.rules.max_penalty_total,
            });
        }
        if record.n_penalties() > self.rules.max_penalty_count {
            violations.push(Violation::PenaltyCount {
                count: record.n_penalties(),
                limit: self.rules.max_penalty_count,
            });
        }

        for (event, (&time, &winner)) in record
            .times()
            .iter()
            .zip(record.winner_times())
            .enumerate()
        {
            if exceeds_scaled(time, winner, self.rules.time_limit_factor) {
                let limit = winner as f64 * self.rules.time_limit_factor;
                violations.push(Violation::TimeOverage { event, time, limit });
            }
        }

        let verdict = Verdict::from_violations(violations);
        debug!(?record, ?verdict, "evaluated race record");
        verdict
    }

    /// Validates the inputs and returns whether the racer is disqualified.
    pub fn racer_disqualified(
        &self,
        times: &[i64],
        winner_times: &[i64],
        n_penalties: i64,
        penalties: &[i64],
    ) -> Result<bool, InvalidInput> {
        let record = RaceRecord::new(times, winner_times, n_penalties, penalties)
            .inspect_err(|err| debug!(%err, "rejected race record"))?;
        Ok(self.evaluate(&record).disqualified())
    }
}

/// Splits a finite `f64` into `mantissa * 2^exponent` with no rounding.
fn decompose(value: f64) -> (i64, i32) {
    let bits = value.to_bits();
    let biased = ((bits >> 52) & 0x7ff) as i32;
    let fraction = (bits & ((1 << 52) - 1)) as i64;
    let (mantissa, exponent) = if biased == 0 {
        (fraction, -1074)
    } else {
        (fraction | (1 << 52), biased - 1075)
    };
    if value.is_sign_negative() {
        (-mantissa, exponent)
    } else {
        (mantissa, exponent)
    }
}

/// Returns true if `time > winner * factor`, compared exactly. Integers past
/// 2^53 cannot be round-tripped through `f64`, so the factor is taken apart
/// and the product is formed in `i128` instead.
fn exceeds_scaled(time: i64, winner: i64, factor: f64) -> bool {
    if !factor.is_finite() {
        return time as f64 > winner as f64 * factor;
    }

    let (mantissa, exponent) = decompose(factor);
    // |winner * mantissa| < 2^117, so this cannot overflow.
    let scaled = i128::from(winner) * i128::from(mantissa);
    let time = i128::from(time);

    if scaled == 0 {
        return time > 0;
    }
    if exponent >= 0 {
        // Overflowing the limit means it is beyond any i64 time.
        match 1i128
            .checked_shl(exponent as u32)
            .filter(|power| *power > 0)
            .and_then(|power| scaled.checked_mul(power))
        {
            Some(limit) => time > limit,
            None => scaled < 0,
        }
    } else {
        // For an integer t, t > x exactly when t > floor(x); `>>` floors.
        let shift = exponent.unsigned_abs().min(127);
        time > scaled >> shift
    }
}

/// Returns true if the racer breaks any of the default rules: a penalty
/// above 100, penalties totalling above 100, more than 5 penalties, or an
/// event time above 1.5 times the winner's.
///
/// ```
/// let out = labcheck::racer_disqualified(&[120, 110, 90], &[100, 100, 100], 2, &[20, 10]);
/// assert_eq!(out, Ok(false));
/// ```
pub fn racer_disqualified(
    times: &[i64],
    winner_times: &[i64],
    n_penalties: i64,
    penalties: &[i64],
) -> Result<bool, InvalidInput> {
    RaceDisqualifier::default().racer_disqualified(times, winner_times, n_penalties, penalties)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(times: [i64; 3], winner: [i64; 3], penalties: &[i64]) -> RaceRecord {
        RaceRecord::new(&times, &winner, penalties.len() as i64, penalties).unwrap()
    }

    #[test]
    fn every_family_is_reported() {
        let verdict = RaceDisqualifier::default().evaluate(&record(
            [200, 100, 100],
            [100, 100, 100],
            &[150, 1, 1, 1, 1, 1],
        ));
        assert!(verdict.disqualified());
        for rule in Rule::ALL {
            assert!(verdict.triggered(rule), "{rule} should have triggered");
        }
    }

    #[test]
    fn clean_record_has_no_violations() {
        let verdict =
            RaceDisqualifier::default().evaluate(&record([80, 100, 110], [80, 100, 110], &[10, 15]));
        assert_eq!(verdict, Verdict::from_violations(vec![]));
        assert!(!verdict.disqualified());
        assert!(verdict.rows().iter().all(|row| !row.triggered));
    }

    #[test]
    fn scaled_comparison_is_exact() {
        assert!(!exceeds_scaled(15, 10, 1.5));
        assert!(exceeds_scaled(16, 10, 1.5));
        // 3 * 1.5 = 4.5
        assert!(!exceeds_scaled(4, 3, 1.5));
        assert!(exceeds_scaled(5, 3, 1.5));
        assert!(exceeds_scaled(-4, -3, 1.5));
        assert!(!exceeds_scaled(-5, -3, 1.5));
        // 0.1 as f64 is a hair above 0.1, so the limit is just over 1
        assert!(!exceeds_scaled(1, 10, 0.1));
        assert!(exceeds_scaled(2, 10, 0.1));
        assert!(exceeds_scaled(1, 0, 1.5));
        assert!(!exceeds_scaled(0, 0, 1.5));
        assert!(!exceeds_scaled(i64::MAX, 1, 1e30));
        assert!(exceeds_scaled(i64::MIN, -1, 1e30));
        assert!(exceeds_scaled(1, 1, 1e-300));
    }

    #[test]
    fn verdict_flag_follows_violations() {
        let verdict = Verdict::from_violations(vec![Violation::PenaltyCount {
            count: 6,
            limit: 5,
        }]);
        assert!(verdict.disqualified());
        assert!(verdict.triggered(Rule::AggregatePenalty));
    }

    #[test]
    fn negative_count_is_a_mismatch() {
        let err = RaceRecord::new(&[1, 2, 3], &[1, 2, 3], -1, &[]).unwrap_err();
        assert_eq!(
            err,
            InvalidInput::PenaltyCountMismatch {
                declared: -1,
                actual:   0,
            }
        );
    }

    #[test]
    fn time_overage_names_the_event() {
        let verdict =
            RaceDisqualifier::default().evaluate(&record([10, 31, 30], [10, 20, 30], &[]));
        assert_eq!(
            verdict.violations(),
            &[Violation::TimeOverage {
                event: 1,
                time:  31,
                limit: 30.0,
            }]
        );
    }
}
