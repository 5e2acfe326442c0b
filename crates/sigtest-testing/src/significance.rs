//! Significance levels and accept/reject decisions.

use serde::Serialize;
use sigtest_stats::error::StatsError;

/// Outcome of comparing a p-value with a significance level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, derive_more::Display, derive_more::IsVariant)]
#[serde(rename_all = "snake_case")]
pub enum Decision {
    /// The p-value is below the significance level.
    #[display("reject the null hypothesis")]
    RejectNull,
    #[display("fail to reject the null hypothesis")]
    FailToReject,
}

/// Threshold below which a p-value rejects the null hypothesis.
///
/// Any positive value enables the decision; zero or a negative value disables
/// it, in which case only the raw statistic, degrees of freedom and p-value
/// are reported.
///
/// # Examples
///
/// ```
/// use sigtest_testing::significance::{Decision, SignificanceLevel};
///
/// let level = SignificanceLevel::new(0.05).unwrap();
/// assert_eq!(level.decide(0.01), Some(Decision::RejectNull));
/// assert_eq!(level.decide(0.20), Some(Decision::FailToReject));
/// assert_eq!(SignificanceLevel::DISABLED.decide(0.01), None);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize)]
#[serde(transparent)]
pub struct SignificanceLevel(f64);

impl SignificanceLevel {
    /// Reports the raw statistics only.
    pub const DISABLED: Self = Self(0.0);
    /// Default level used by one-way ANOVA.
    pub const ANOVA_DEFAULT: Self = Self(0.001);
    /// Default level used by the Chi-square test of independence.
    pub const CHI_SQUARE_DEFAULT: Self = Self(0.0001);

    /// Creates a significance level, rejecting `NaN` and values above one.
    pub fn new(level: f64) -> Result<Self, StatsError> {
        if level.is_nan() || level > 1.0 {
            return Err(StatsError::InvalidParameter {
                name: "significance level",
                value: level,
            });
        }
        Ok(Self(level))
    }

    #[must_use]
    pub fn value(self) -> f64 {
        self.0
    }

    #[must_use]
    pub fn is_enabled(self) -> bool {
        self.0 > 0.0
    }

    /// Compares `p_value` with this level, or returns `None` when disabled.
    #[must_use]
    pub fn decide(self, p_value: f64) -> Option<Decision> {
        if !self.is_enabled() {
            return None;
        }
        if p_value < self.0 {
            Some(Decision::RejectNull)
        } else {
            Some(Decision::FailToReject)
        }
    }
}

impl TryFrom<f64> for SignificanceLevel {
    type Error = StatsError;

    fn try_from(level: f64) -> Result<Self, Self::Error> {
        Self::new(level)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_non_positive_level_disables_decision() {
        assert_eq!(SignificanceLevel::new(0.0).unwrap().decide(0.0), None);
        assert_eq!(SignificanceLevel::new(-1.0).unwrap().decide(0.5), None);
        assert!(!SignificanceLevel::DISABLED.is_enabled());
    }

    #[test]
    fn test_decision_is_strict() {
        let level = SignificanceLevel::new(0.05).unwrap();
        assert_eq!(level.decide(0.05), Some(Decision::FailToReject));
        assert_eq!(level.decide(0.049_999), Some(Decision::RejectNull));
    }

    #[test]
    fn test_invalid_levels() {
        assert!(SignificanceLevel::new(f64::NAN).is_err());
        assert!(SignificanceLevel::try_from(1.5).is_err());
        assert_eq!(SignificanceLevel::try_from(1.0).map(SignificanceLevel::value), Ok(1.0));
    }

    #[test]
    fn test_defaults() {
        assert!(SignificanceLevel::ANOVA_DEFAULT.is_enabled());
        assert_eq!(SignificanceLevel::CHI_SQUARE_DEFAULT.value(), 0.0001);
    }
}
