//! Reference probability distributions used for the p-value step.
//!
//! The tests only need cumulative probabilities of the F and Chi-squared
//! distributions. [`ReferenceDistributions`] is the seam that supplies them;
//! [`StatrsDistributions`] is the default implementation backed by `statrs`.

use sigtest_stats::error::StatsError;
use statrs::distribution::{ChiSquared, ContinuousCDF as _, FisherSnedecor};

/// Cumulative distribution functions consumed by the significance tests.
pub trait ReferenceDistributions {
    /// `P(X <= x)` for `X ~ F(df1, df2)`.
    fn f_cumulative_probability(&self, df1: f64, df2: f64, x: f64) -> Result<f64, StatsError>;

    /// `P(X <= x)` for `X ~ χ²(df)`.
    fn chi_squared_cumulative_probability(&self, df: f64, x: f64) -> Result<f64, StatsError>;
}

/// [`ReferenceDistributions`] implemented with `statrs`.
#[derive(Debug, Default, Clone, Copy)]
pub struct StatrsDistributions;

impl ReferenceDistributions for StatrsDistributions {
    fn f_cumulative_probability(&self, df1: f64, df2: f64, x: f64) -> Result<f64, StatsError> {
        check_statistic(x)?;
        let dist = FisherSnedecor::new(df1, df2).map_err(|_| {
            // report whichever degree of freedom is out of domain
            if df1.is_nan() || df1 <= 0.0 {
                invalid_df(df1)
            } else {
                invalid_df(df2)
            }
        })?;
        checked_probability(dist.cdf(x))
    }

    fn chi_squared_cumulative_probability(&self, df: f64, x: f64) -> Result<f64, StatsError> {
        check_statistic(x)?;
        let dist = ChiSquared::new(df).map_err(|_| invalid_df(df))?;
        checked_probability(dist.cdf(x))
    }
}

fn invalid_df(value: f64) -> StatsError {
    StatsError::InvalidParameter {
        name: "degrees of freedom",
        value,
    }
}

fn check_statistic(x: f64) -> Result<(), StatsError> {
    if x.is_nan() {
        return Err(StatsError::InvalidParameter {
            name: "test statistic",
            value: x,
        });
    }
    Ok(())
}

fn checked_probability(p: f64) -> Result<f64, StatsError> {
    if p.is_nan() {
        return Err(StatsError::InvalidParameter {
            name: "cumulative probability",
            value: p,
        });
    }
    Ok(p.clamp(0.0, 1.0))
}
