use serde::{Deserialize, Serialize};
use std::fmt;

/// A pitch or speed multiplier. Values are clamped into `[MIN, MAX]` and
/// snapped to `STEP`, the same constraint a slider control enforces. The
/// server never sees an out-of-range factor from us, but it also gets no
/// further validation.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(from = "f64", into = "f64")]
pub struct Factor(f64);

impl Factor {
    pub const MIN: f64 = 0.5;
    pub const MAX: f64 = 2.0;
    pub const STEP: f64 = 0.1;

    pub fn new(value: f64) -> Self {
        if !value.is_finite() {
            return Self::default();
        }
        let clamped = value.clamp(Self::MIN, Self::MAX);
        // Round through tenths so 0.8 prints as "0.8", not "0.8000000000000002"
        Self((clamped * 10.0).round() / 10.0)
    }

    pub fn value(self) -> f64 {
        self.0
    }

    pub fn step_up(self) -> Self {
        Self::new(self.0 + Self::STEP)
    }

    pub fn step_down(self) -> Self {
        Self::new(self.0 - Self::STEP)
    }

    /// Position of this factor within the range, from 0.0 to 1.0
    pub fn ratio(self) -> f64 {
        (self.0 - Self::MIN) / (Self::MAX - Self::MIN)
    }
}

impl Default for Factor {
    fn default() -> Self {
        Self(1.0)
    }
}

impl From<f64> for Factor {
    fn from(value: f64) -> Self {
        Self::new(value)
    }
}

impl From<Factor> for f64 {
    fn from(factor: Factor) -> Self {
        factor.0
    }
}

impl fmt::Display for Factor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
