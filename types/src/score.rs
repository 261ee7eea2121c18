//! Bounded score type.
//!
//! Verification scores and event probabilities live in [0, 1]. All
//! construction and arithmetic clamps into that range, so a `Score` can
//! never escape it no matter what sequence of weights is applied.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A value in [0, 1]. Construction clamps; NaN collapses to 0.
#[derive(Clone, Copy, Debug, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Score(f64);

impl Score {
    pub const ZERO: Self = Self(0.0);
    /// The midpoint — where fresh claims start, equidistant from the
    /// verify and reject thresholds.
    pub const NEUTRAL: Self = Self(0.5);
    pub const ONE: Self = Self(1.0);

    pub fn new(value: f64) -> Self {
        if value.is_nan() {
            return Self(0.0);
        }
        Self(value.clamp(0.0, 1.0))
    }

    pub fn value(&self) -> f64 {
        self.0
    }

    /// Apply a (possibly negative) weight, clamping the result into [0, 1].
    pub fn add_weight(self, weight: f64) -> Self {
        Self::new(self.0 + weight)
    }

    /// Whether this score meets or exceeds `threshold`.
    pub fn at_least(&self, threshold: f64) -> bool {
        self.0 >= threshold
    }

    /// Whether this score is at or below `threshold`.
    pub fn at_most(&self, threshold: f64) -> bool {
        self.0 <= threshold
    }

    /// Whole-number percentage rendering ("92%"), used in alert messages.
    pub fn as_percent(&self) -> String {
        format!("{:.0}%", self.0 * 100.0)
    }
}

impl fmt::Display for Score {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}", self.0)
    }
}

impl From<f64> for Score {
    fn from(value: f64) -> Self {
        Self::new(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn construction_clamps() {
        assert_eq!(Score::new(1.5).value(), 1.0);
        assert_eq!(Score::new(-0.3).value(), 0.0);
        assert_eq!(Score::new(0.42).value(), 0.42);
    }

    #[test]
    fn nan_collapses_to_zero() {
        assert_eq!(Score::new(f64::NAN).value(), 0.0);
    }

    #[test]
    fn add_weight_saturates_both_ends() {
        assert_eq!(Score::new(0.9).add_weight(0.55).value(), 1.0);
        assert_eq!(Score::new(0.1).add_weight(-0.30).value(), 0.0);
    }

    #[test]
    fn percent_rendering() {
        assert_eq!(Score::new(0.92).as_percent(), "92%");
        assert_eq!(Score::new(0.0).as_percent(), "0%");
    }
}
