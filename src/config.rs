#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

use std::path::{Path, PathBuf};

use anyhow::{Context, Result, ensure};
use bon::Builder;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::constants::{
    CONFIG_ENV_VAR, MAX_GRADE, MAX_PENALTY_COUNT, MAX_PENALTY_TOTAL, MAX_SINGLE_PENALTY,
    MIN_GRADE, TIME_LIMIT_FACTOR,
};

/// The closed range of grades accepted by the averager.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Builder, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GradeScale {
    /// Lowest accepted grade.
    #[builder(default = MIN_GRADE)]
    pub min: i64,
    /// Highest accepted grade.
    #[builder(default = MAX_GRADE)]
    pub max: i64,
}

impl Default for GradeScale {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl GradeScale {
    /// Returns true if `grade` lies within the scale.
    pub fn contains(&self, grade: i64) -> bool {
        (self.min..=self.max).contains(&grade)
    }
}

/// Thresholds used to decide whether a racer is disqualified.
#[derive(Debug, Clone, Copy, PartialEq, Builder, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RaceRules {
    /// Any single penalty above this disqualifies.
    #[builder(default = MAX_SINGLE_PENALTY)]
    pub max_single_penalty: i64,
    /// A penalty total above this disqualifies.
    #[builder(default = MAX_PENALTY_TOTAL)]
    pub max_penalty_total:  i64,
    /// More penalties than this disqualifies.
    #[builder(default = MAX_PENALTY_COUNT)]
    pub max_penalty_count:  i64,
    /// Times above `winner * time_limit_factor` disqualify.
    #[builder(default = TIME_LIMIT_FACTOR)]
    pub time_limit_factor:  f64,
}

impl Default for RaceRules {
    fn default() -> Self {
        Self::builder().build()
    }
}

/// Top-level configuration, usually read from a JSON file. Missing sections
/// and fields fall back to the course defaults.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Grading scale for the averager.
    pub grades: GradeScale,
    /// Thresholds for the race checks.
    pub race:   RaceRules,
}

impl Config {
    /// Reads and validates a configuration file.
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Could not read config file: {}", path.display()))?;
        let config: Config = serde_json::from_str(&raw)
            .with_context(|| format!("Could not parse config file: {}", path.display()))?;
        config
            .validate()
            .with_context(|| format!("Invalid config file: {}", path.display()))?;

        debug!(path = %path.display(), ?config, "loaded configuration");
        Ok(config)
    }

    /// Resolves the configuration to use: an explicit path wins, then the
    /// `LABCHECK_CONFIG` environment variable, then the defaults.
    pub fn resolve(explicit: Option<&Path>) -> Result<Self> {
        let from_env = std::env::var(CONFIG_ENV_VAR)
            .ok()
            .map(|value| value.trim().to_owned())
            .filter(|value| !value.is_empty())
            .map(PathBuf::from);

        match explicit.map(Path::to_path_buf).or(from_env) {
            Some(path) => Self::load(&path),
            None => Ok(Self::default()),
        }
    }

    /// Checks that the thresholds describe a usable configuration.
    pub fn validate(&self) -> Result<()> {
        ensure!(
            self.grades.min <= self.grades.max,
            "grade scale minimum ({}) is above its maximum ({})",
            self.grades.min,
            self.grades.max
        );
        ensure!(
            self.race.time_limit_factor.is_finite() && self.race.time_limit_factor > 0.0,
            "time_limit_factor must be a positive number, got {}",
            self.race.time_limit_factor
        );
        ensure!(
            self.race.max_single_penalty >= 0
                && self.race.max_penalty_total >= 0
                && self.race.max_penalty_count >= 0,
            "penalty limits must not be negative"
        );
        Ok(())
    }
}
