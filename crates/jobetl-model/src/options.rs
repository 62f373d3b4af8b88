//! Configuration options for a pipeline run.

use serde::{Deserialize, Serialize};

/// How raw values are matched against reference tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum MatchingMode {
    /// Case- and whitespace-insensitive match on canonical values and aliases.
    Strict,
    /// Strict, then a compact key that ignores every non-alphanumeric character.
    #[default]
    Lenient,
}

/// Pay period a salary amount is quoted in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PayPeriod {
    Hour,
    Week,
    Month,
    Year,
}

impl PayPeriod {
    pub const ALL: [PayPeriod; 4] = [
        PayPeriod::Hour,
        PayPeriod::Week,
        PayPeriod::Month,
        PayPeriod::Year,
    ];

    /// Multiplier that annualizes an amount quoted in this period.
    pub fn annual_multiplier(self) -> f64 {
        match self {
            PayPeriod::Hour => 2080.0,
            PayPeriod::Week => 52.0,
            PayPeriod::Month => 12.0,
            PayPeriod::Year => 1.0,
        }
    }
}

/// Plausibility bounds for salaries, in USD.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SalaryBounds {
    pub hour: (f64, f64),
    pub week: (f64, f64),
    pub month: (f64, f64),
    pub year: (f64, f64),
    pub yearly_min: f64,
    pub yearly_max: f64,
}

impl Default for SalaryBounds {
    fn default() -> Self {
        Self {
            hour: (15.0, 250.0),
            week: (400.0, 8_000.0),
            month: (1_500.0, 40_000.0),
            year: (20_000.0, 500_000.0),
            yearly_min: 20_000.0,
            yearly_max: 500_000.0,
        }
    }
}

impl SalaryBounds {
    pub fn range(&self, period: PayPeriod) -> (f64, f64) {
        match period {
            PayPeriod::Hour => self.hour,
            PayPeriod::Week => self.week,
            PayPeriod::Month => self.month,
            PayPeriod::Year => self.year,
        }
    }
}

/// Options controlling a pipeline run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineOptions {
    pub matching_mode: MatchingMode,

    /// Upper bound for `required_exp_years`; larger values are soft-flagged.
    pub max_experience_years: f64,

    pub salary_bounds: SalaryBounds,

    /// Run the per-record stages on a worker pool.
    ///
    /// Output is identical either way; records are merged in input order.
    pub parallel: bool,
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self {
            matching_mode: MatchingMode::Lenient,
            max_experience_years: 50.0,
            salary_bounds: SalaryBounds::default(),
            parallel: true,
        }
    }
}

impl PipelineOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Exact and alias matches only.
    pub fn strict() -> Self {
        Self {
            matching_mode: MatchingMode::Strict,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_matching_mode(mut self, mode: MatchingMode) -> Self {
        self.matching_mode = mode;
        self
    }

    #[must_use]
    pub fn with_max_experience_years(mut self, years: f64) -> Self {
        self.max_experience_years = years;
        self
    }

    #[must_use]
    pub fn with_salary_bounds(mut self, bounds: SalaryBounds) -> Self {
        self.salary_bounds = bounds;
        self
    }

    #[must_use]
    pub fn with_parallel(mut self, enable: bool) -> Self {
        self.parallel = enable;
        self
    }
}
