//! # Simulation configuration
//!
//! Every parameter of a run, read once at setup. Any key left out of a configuration file takes the default below,
//! which reproduces the classic single-title run.
//!
//! ## Example: TOML Configuration
//!
//! ```toml
//! num_copies = 1
//! titles = ["Dune", "Emma"]
//! loan_duration = 4
//! return_probability = 0.8
//! sim_time = 365
//! max_queue_size = 10
//! random_seed = 42
//!
//! [inter_arrival]
//! low = 1
//! high = 10
//!
//! [overdue_extension]
//! low = 1
//! high = 7
//! ```
//!
//! Counts and durations are signed so that a negative value in a file is reported as
//! [`Error::InvalidConfiguration`] by [`SimulationConfig::validate()`] rather than as a parse failure.

use crate::{Days, Error};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Inclusive range of whole days, `[low, high]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub struct DayRange {
    pub low: Days,
    pub high: Days,
}

impl DayRange {
    pub fn new(low: Days, high: Days) -> Self {
        Self { low, high }
    }

    /// Both ends at least one day, `low <= high`.
    fn validate(&self, name: &str) -> crate::Result {
        if self.low < 1 || self.low > self.high {
            return Err(Error::InvalidConfiguration(format!(
                "{name} must satisfy 1 <= low <= high, got [{}, {}]",
                self.low, self.high
            )));
        }
        Ok(())
    }
}

/// Parameters of one simulation run.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct SimulationConfig {
    /// Copies of each title.
    pub num_copies: i64,
    /// One resource per title. Arrivals pick among them uniformly when there is more than one.
    pub titles: Vec<String>,
    /// Days a copy is held before the return decision.
    pub loan_duration: Days,
    /// Chance that a copy comes back exactly at the end of the loan.
    pub return_probability: f64,
    /// Horizon of the run, in days.
    pub sim_time: Days,
    /// Visitors allowed to wait per title; further arrivals are dropped.
    pub max_queue_size: i64,
    pub random_seed: u64,
    /// Gap between consecutive arrivals.
    pub inter_arrival: DayRange,
    /// Extra days a late visitor keeps the copy.
    pub overdue_extension: DayRange,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            num_copies: 1,
            titles: vec!["Server 1".to_string()],
            loan_duration: 4,
            return_probability: 0.8,
            sim_time: 365,
            max_queue_size: 10,
            random_seed: 42,
            inter_arrival: DayRange::new(1, 10),
            overdue_extension: DayRange::new(1, 7),
        }
    }
}

impl SimulationConfig {
    /// Parse and validate a TOML document.
    ///
    /// # Errors
    ///
    /// [`Error::Parse`] for malformed TOML or unknown keys, [`Error::InvalidConfiguration`] for out-of-range values.
    pub fn from_toml_str(contents: &str) -> crate::Result<Self> {
        let config: Self = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a TOML configuration file.
    ///
    /// # Errors
    ///
    /// [`Error::Io`] if the file cannot be read, otherwise as [`from_toml_str()`](Self::from_toml_str).
    pub fn load(path: impl AsRef<Path>) -> crate::Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)?;
        let config = Self::from_toml_str(&contents)?;
        tracing::info!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Check every parameter against its accepted range.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidConfiguration`] naming the first offending parameter.
    pub fn validate(&self) -> crate::Result {
        if self.num_copies < 1 {
            return Err(invalid(format!("num_copies must be at least 1, got {}", self.num_copies)));
        }
        if self.max_queue_size < 0 {
            return Err(invalid(format!(
                "max_queue_size must not be negative, got {}",
                self.max_queue_size
            )));
        }
        if !(0.0..=1.0).contains(&self.return_probability) {
            return Err(invalid(format!(
                "return_probability must lie in [0, 1], got {}",
                self.return_probability
            )));
        }
        if self.sim_time < 1 {
            return Err(invalid(format!("sim_time must be at least 1, got {}", self.sim_time)));
        }
        if self.loan_duration < 1 {
            return Err(invalid(format!(
                "loan_duration must be at least 1, got {}",
                self.loan_duration
            )));
        }
        if self.titles.is_empty() {
            return Err(invalid("at least one title is required".to_string()));
        }
        if self.titles.iter().any(|title| title.trim().is_empty()) {
            return Err(invalid("titles must not be blank".to_string()));
        }
        self.inter_arrival.validate("inter_arrival")?;
        self.overdue_extension.validate("overdue_extension")?;
        self.validate_day_arithmetic()
    }

    /// Every scheduled time stays below `sim_time + loan_duration + overdue_extension.high + inter_arrival.high`, and
    /// a title holds its copies at most `sim_time` times for at most `loan_duration + overdue_extension.high` each.
    /// Both totals have to fit in [`Days`].
    fn validate_day_arithmetic(&self) -> crate::Result {
        let longest_hold = self.loan_duration.checked_add(self.overdue_extension.high);
        let latest_event = longest_hold
            .and_then(|hold| hold.checked_add(self.sim_time))
            .and_then(|time| time.checked_add(self.inter_arrival.high));
        let busiest_title = longest_hold.and_then(|hold| hold.checked_mul(self.sim_time));

        if latest_event.is_none() || busiest_title.is_none() {
            return Err(invalid(format!(
                "sim_time {} with loan_duration {}, inter_arrival up to {} and overdue_extension up to {} overflows \
                 the day counter",
                self.sim_time, self.loan_duration, self.inter_arrival.high, self.overdue_extension.high
            )));
        }
        Ok(())
    }

    /// Copies per title as a count. Only meaningful after [`validate()`](Self::validate).
    pub(crate) fn capacity(&self) -> crate::Result<usize> {
        usize::try_from(self.num_copies).map_err(|_| invalid(format!("num_copies {} is out of range", self.num_copies)))
    }

    /// Wait queue bound as a count. Only meaningful after [`validate()`](Self::validate).
    pub(crate) fn queue_bound(&self) -> crate::Result<usize> {
        usize::try_from(self.max_queue_size)
            .map_err(|_| invalid(format!("max_queue_size {} is out of range", self.max_queue_size)))
    }
}

fn invalid(message: String) -> Error {
    Error::InvalidConfiguration(message)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let config = SimulationConfig::default();
        config.validate().unwrap();
        assert_eq!(vec!["Server 1".to_string()], config.titles);
        assert_eq!(DayRange::new(1, 10), config.inter_arrival);
    }

    #[test]
    fn missing_keys_fall_back_to_defaults() {
        let config = SimulationConfig::from_toml_str("num_copies = 3\ntitles = [\"Dune\", \"Emma\"]\n").unwrap();
        assert_eq!(3, config.num_copies);
        assert_eq!(2, config.titles.len());
        assert_eq!(365, config.sim_time);
        assert_eq!(DayRange::new(1, 7), config.overdue_extension);
    }

    #[test]
    fn ranges_parse_as_tables() {
        let config = SimulationConfig::from_toml_str("[inter_arrival]\nlow = 1\nhigh = 1\n").unwrap();
        assert_eq!(DayRange::new(1, 1), config.inter_arrival);
    }

    #[test]
    fn out_of_range_values_are_configuration_errors() {
        let cases = [
            "num_copies = 0",
            "max_queue_size = -1",
            "return_probability = 1.5",
            "return_probability = -0.1",
            "return_probability = nan",
            "sim_time = 0",
            "loan_duration = 0",
            "titles = []",
            "titles = [\"  \"]",
            "[inter_arrival]\nlow = 5\nhigh = 2",
            "[inter_arrival]\nlow = 0\nhigh = 2",
            "[overdue_extension]\nlow = 0\nhigh = 7",
            "loan_duration = 9223372036854775807",
            "sim_time = 9223372036854775807",
            "[inter_arrival]\nlow = 1\nhigh = 9223372036854775807",
            "[overdue_extension]\nlow = 1\nhigh = 9223372036854775807",
            "sim_time = 1000000000000\nloan_duration = 100000000",
        ];
        for case in cases {
            let result = SimulationConfig::from_toml_str(case);
            assert!(
                matches!(result, Err(Error::InvalidConfiguration(_))),
                "{case:?} gave {result:?}"
            );
        }
    }

    #[test]
    fn unknown_keys_are_parse_errors() {
        assert!(matches!(
            SimulationConfig::from_toml_str("copies = 2"),
            Err(Error::Parse(_))
        ));
    }

    #[test]
    fn boundary_values_are_accepted() {
        let config = SimulationConfig {
            max_queue_size: 0,
            return_probability: 0.0,
            sim_time: 1,
            ..SimulationConfig::default()
        };
        config.validate().unwrap();
        assert_eq!(0, config.queue_bound().unwrap());
        assert_eq!(1, config.capacity().unwrap());
    }

    #[test]
    fn large_durations_that_fit_are_accepted() {
        let config = SimulationConfig {
            sim_time: 1_000_000,
            loan_duration: 1_000_000_000,
            inter_arrival: DayRange::new(1, 1_000_000_000_000),
            overdue_extension: DayRange::new(1, 1_000_000_000),
            ..SimulationConfig::default()
        };
        config.validate().unwrap();
    }
}
