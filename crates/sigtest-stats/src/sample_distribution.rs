//! Summary statistics of a sample or of one group within it.
//!
//! A distribution is either numeric ([`NumericDistribution`]) or categorical
//! ([`CategoricalDistribution`]). Both can be computed from a [`Sample`] or
//! reconstructed from published summary figures when the raw observations are
//! not available, e.g. for meta-analysis.
//!
//! # Examples
//!
//! ```
//! use sigtest_stats::sample_distribution::NumericDistribution;
//!
//! // Reconstructed from published figures
//! let dist = NumericDistribution::from_summary(5.0, 2.0, 10, None).unwrap();
//! assert_eq!(dist.variance, 4.0);
//! assert_eq!(dist.sum_of_squares, 36.0);
//! ```

use serde::Serialize;

use crate::{error::StatsError, observation::ValueKind, sample::Sample};

/// Summary statistics of numeric values.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NumericDistribution {
    /// Arithmetic mean.
    pub mean: f64,
    /// Sample standard deviation (`sqrt(variance)`).
    pub sd: f64,
    /// Unbiased sample variance (`sum_of_squares / (size - 1)`).
    pub variance: f64,
    /// Sum of squared deviations from the mean.
    pub sum_of_squares: f64,
    /// Number of observations.
    pub size: usize,
    /// The group this distribution describes, `None` for the whole sample.
    pub group_id: Option<String>,
}

impl NumericDistribution {
    /// Computes the distribution of the numeric observations of `group`
    /// (`None` for the whole sample).
    ///
    /// # Errors
    ///
    /// - [`StatsError::NoObservationFound`] if the sample is empty
    /// - [`StatsError::WrongValueType`] if the sample is categorical
    /// - [`StatsError::InsufficientData`] if the group has fewer than two observations
    pub fn from_sample(sample: &Sample, group: Option<&str>) -> Result<Self, StatsError> {
        let values = sample.numeric_values(group)?;
        Self::from_values(&values, group.map(str::to_owned)).map_err(|e| match e {
            StatsError::InsufficientData { reason } => StatsError::insufficient_data(format!(
                "group {}: {reason}",
                group.unwrap_or("<total>")
            )),
            e => e,
        })
    }

    /// Computes the distribution of raw values.
    ///
    /// Requires at least two values for the unbiased variance.
    #[expect(clippy::cast_precision_loss)]
    pub fn from_values(values: &[f64], group_id: Option<String>) -> Result<Self, StatsError> {
        let size = values.len();
        if size < 2 {
            return Err(StatsError::insufficient_data(format!(
                "variance needs at least 2 observations, got {size}"
            )));
        }

        let n = size as f64;
        let mean = values.iter().sum::<f64>() / n;
        let sum_of_squares = values.iter().map(|x| (x - mean).powi(2)).sum::<f64>();
        let variance = sum_of_squares / (n - 1.0);

        Ok(Self {
            mean,
            sd: variance.sqrt(),
            variance,
            sum_of_squares,
            size,
            group_id,
        })
    }

    /// Reconstructs a distribution from its mean, standard deviation and size.
    ///
    /// The sum of squares is recovered as `sd² · (size - 1)` so that the result
    /// can be fed to ANOVA alongside distributions computed from raw data.
    #[expect(clippy::cast_precision_loss)]
    pub fn from_summary(
        mean: f64,
        sd: f64,
        size: usize,
        group_id: Option<String>,
    ) -> Result<Self, StatsError> {
        if !mean.is_finite() {
            return Err(StatsError::InvalidParameter {
                name: "mean",
                value: mean,
            });
        }
        if !sd.is_finite() || sd < 0.0 {
            return Err(StatsError::InvalidParameter {
                name: "standard deviation",
                value: sd,
            });
        }
        if size == 0 {
            return Err(StatsError::insufficient_data("sample size must be positive"));
        }

        let variance = sd * sd;
        Ok(Self {
            mean,
            sd,
            variance,
            sum_of_squares: variance * (size - 1) as f64,
            size,
            group_id,
        })
    }
}

/// Mean and size of one group.
///
/// These are the only per-group figures a variance decomposition reads, so
/// unlike [`NumericDistribution`] a single observation is enough.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GroupMean {
    pub mean: f64,
    pub size: usize,
}

impl GroupMean {
    /// Fails with [`StatsError::InsufficientData`] if `values` is empty.
    #[expect(clippy::cast_precision_loss)]
    pub fn from_values(values: &[f64]) -> Result<Self, StatsError> {
        if values.is_empty() {
            return Err(StatsError::insufficient_data("mean needs at least 1 observation"));
        }
        let size = values.len();
        Ok(Self {
            mean: values.iter().sum::<f64>() / size as f64,
            size,
        })
    }
}

impl From<&NumericDistribution> for GroupMean {
    fn from(dist: &NumericDistribution) -> Self {
        Self {
            mean: dist.mean,
            size: dist.size,
        }
    }
}

/// Summary statistics of a categorical variable with respect to one
/// "success" label.
///
/// The mean and variance follow the binomial convention: `mean = n·p` and
/// `variance = n·p·(1 - p)`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoricalDistribution {
    /// The label counted as a success.
    pub success_label: String,
    /// Fraction of observations carrying `success_label`, in `[0, 1]`.
    pub proportion: f64,
    pub mean: f64,
    pub variance: f64,
    pub sd: f64,
    pub size: usize,
    pub group_id: Option<String>,
}

impl CategoricalDistribution {
    /// Computes the distribution of `success_label` within `group` (`None` for
    /// the whole sample).
    ///
    /// # Errors
    ///
    /// - [`StatsError::NoObservationFound`] if the sample is empty
    /// - [`StatsError::WrongValueType`] if the sample is numeric
    /// - [`StatsError::InsufficientData`] if the group has no observation
    pub fn from_sample(
        sample: &Sample,
        success_label: &str,
        group: Option<&str>,
    ) -> Result<Self, StatsError> {
        let proportion = sample.proportion(success_label, group)?;
        let size = sample.count_by_group_id(group);
        Ok(Self::build(
            success_label.to_owned(),
            proportion,
            size,
            group.map(str::to_owned),
        ))
    }

    /// Reconstructs a distribution from a published proportion and sample size.
    pub fn from_summary(
        success_label: impl Into<String>,
        proportion: f64,
        size: usize,
        group_id: Option<String>,
    ) -> Result<Self, StatsError> {
        if !(0.0..=1.0).contains(&proportion) {
            return Err(StatsError::InvalidParameter {
                name: "proportion",
                value: proportion,
            });
        }
        if size == 0 {
            return Err(StatsError::insufficient_data("sample size must be positive"));
        }
        Ok(Self::build(success_label.into(), proportion, size, group_id))
    }

    #[expect(clippy::cast_precision_loss)]
    fn build(success_label: String, proportion: f64, size: usize, group_id: Option<String>) -> Self {
        let n = size as f64;
        let variance = n * proportion * (1.0 - proportion);
        Self {
            success_label,
            proportion,
            mean: n * proportion,
            variance,
            sd: variance.sqrt(),
            size,
            group_id,
        }
    }
}

/// A numeric or categorical sample distribution.
///
/// Fields that only make sense for one kind are reachable through accessors
/// that fail with [`StatsError::NotApplicable`] on the other.
#[derive(Debug, Clone, PartialEq, Serialize, derive_more::From, derive_more::IsVariant)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SampleDistribution {
    Numeric(NumericDistribution),
    Categorical(CategoricalDistribution),
}

impl SampleDistribution {
    #[must_use]
    pub fn kind(&self) -> ValueKind {
        match self {
            SampleDistribution::Numeric(_) => ValueKind::Numeric,
            SampleDistribution::Categorical(_) => ValueKind::Categorical,
        }
    }

    #[must_use]
    pub fn mean(&self) -> f64 {
        match self {
            SampleDistribution::Numeric(d) => d.mean,
            SampleDistribution::Categorical(d) => d.mean,
        }
    }

    #[must_use]
    pub fn sd(&self) -> f64 {
        match self {
            SampleDistribution::Numeric(d) => d.sd,
            SampleDistribution::Categorical(d) => d.sd,
        }
    }

    #[must_use]
    pub fn variance(&self) -> f64 {
        match self {
            SampleDistribution::Numeric(d) => d.variance,
            SampleDistribution::Categorical(d) => d.variance,
        }
    }

    #[must_use]
    pub fn size(&self) -> usize {
        match self {
            SampleDistribution::Numeric(d) => d.size,
            SampleDistribution::Categorical(d) => d.size,
        }
    }

    #[must_use]
    pub fn group_id(&self) -> Option<&str> {
        match self {
            SampleDistribution::Numeric(d) => d.group_id.as_deref(),
            SampleDistribution::Categorical(d) => d.group_id.as_deref(),
        }
    }

    pub fn sum_of_squares(&self) -> Result<f64, StatsError> {
        match self {
            SampleDistribution::Numeric(d) => Ok(d.sum_of_squares),
            SampleDistribution::Categorical(_) => Err(self.not_applicable("sum of squares")),
        }
    }

    pub fn proportion(&self) -> Result<f64, StatsError> {
        match self {
            SampleDistribution::Categorical(d) => Ok(d.proportion),
            SampleDistribution::Numeric(_) => Err(self.not_applicable("proportion")),
        }
    }

    pub fn success_label(&self) -> Result<&str, StatsError> {
        match self {
            SampleDistribution::Categorical(d) => Ok(&d.success_label),
            SampleDistribution::Numeric(_) => Err(self.not_applicable("success label")),
        }
    }

    fn not_applicable(&self, field: &'static str) -> StatsError {
        StatsError::NotApplicable {
            field,
            kind: self.kind(),
        }
    }
}

#[cfg(test)]
mod tests {
    use rand::{Rng as _, SeedableRng as _};
    use rand_distr::{Distribution as _, Normal};
    use rand_pcg::Pcg64Mcg;

    use super::*;
    use crate::observation::Observation;

    const EPS: f64 = 1e-9;

    #[test]
    fn test_numeric_from_sample() {
        let sample = Sample::from_observations(
            [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0]
                .into_iter()
                .map(|x| Observation::numeric(x, "g")),
        )
        .unwrap();
        let dist = NumericDistribution::from_sample(&sample, Some("g")).unwrap();
        assert_eq!(dist.size, 8);
        assert_eq!(dist.mean, 5.0);
        assert_eq!(dist.sum_of_squares, 32.0);
        assert!((dist.variance - 32.0 / 7.0).abs() < EPS);
        assert!((dist.sd - dist.variance.sqrt()).abs() < EPS);
    }

    #[test]
    fn test_numeric_single_observation_is_insufficient() {
        let sample = Sample::from_observations([
            Observation::numeric(1.0, "a"),
            Observation::numeric(2.0, "b"),
            Observation::numeric(3.0, "b"),
        ])
        .unwrap();
        assert!(matches!(
            NumericDistribution::from_sample(&sample, Some("a")),
            Err(StatsError::InsufficientData { .. })
        ));
        assert!(matches!(
            NumericDistribution::from_sample(&sample, Some("missing")),
            Err(StatsError::InsufficientData { .. })
        ));
        assert!(NumericDistribution::from_sample(&sample, Some("b")).is_ok());
    }

    #[test]
    fn test_group_mean_of_single_value() {
        let mean = GroupMean::from_values(&[10.0]).unwrap();
        assert_eq!(mean, GroupMean { mean: 10.0, size: 1 });
        assert!(matches!(
            GroupMean::from_values(&[]),
            Err(StatsError::InsufficientData { .. })
        ));

        let dist = NumericDistribution::from_values(&[1.0, 2.0, 6.0], None).unwrap();
        assert_eq!(GroupMean::from(&dist), GroupMean { mean: 3.0, size: 3 });
    }

    #[test]
    fn test_numeric_from_categorical_sample() {
        let sample = Sample::from_observations([Observation::categorical("yes", "a")]).unwrap();
        assert!(matches!(
            NumericDistribution::from_sample(&sample, None),
            Err(StatsError::WrongValueType {
                expected: ValueKind::Numeric,
                actual: ValueKind::Categorical,
                ..
            })
        ));
    }

    #[test]
    fn test_numeric_from_summary() {
        let dist = NumericDistribution::from_summary(5.0, 2.0, 10, Some("x".to_owned())).unwrap();
        assert_eq!(dist.mean, 5.0);
        assert_eq!(dist.variance, 4.0);
        assert_eq!(dist.sum_of_squares, 36.0);
        assert_eq!(dist.group_id.as_deref(), Some("x"));
    }

    #[test]
    fn test_numeric_from_summary_rejects_bad_input() {
        assert!(matches!(
            NumericDistribution::from_summary(5.0, -1.0, 10, None),
            Err(StatsError::InvalidParameter { .. })
        ));
        assert!(matches!(
            NumericDistribution::from_summary(f64::NAN, 1.0, 10, None),
            Err(StatsError::InvalidParameter { .. })
        ));
        assert!(matches!(
            NumericDistribution::from_summary(5.0, 1.0, 0, None),
            Err(StatsError::InsufficientData { .. })
        ));
    }

    #[test]
    fn test_summary_matches_raw_sum_of_squares() {
        let values = [3.0, 8.0, 1.0, 6.0, 2.0];
        let raw = NumericDistribution::from_values(&values, None).unwrap();
        let rebuilt = NumericDistribution::from_summary(raw.mean, raw.sd, raw.size, None).unwrap();
        assert!((raw.sum_of_squares - rebuilt.sum_of_squares).abs() < EPS);
    }

    #[test]
    fn test_random_variance_properties() {
        let mut rng = Pcg64Mcg::seed_from_u64(42);
        let normal = Normal::new(50.0, 12.0).unwrap();
        for _ in 0..100 {
            let n = rng.random_range(2..40);
            let values = (0..n).map(|_| normal.sample(&mut rng)).collect::<Vec<f64>>();
            let dist = NumericDistribution::from_values(&values, None).unwrap();
            assert!(dist.variance >= 0.0);
            assert!((dist.sd - dist.variance.sqrt()).abs() < EPS);
        }
    }

    #[test]
    fn test_categorical_from_sample() {
        let sample = Sample::from_observations(
            ["yes", "no", "yes", "yes"]
                .into_iter()
                .map(|label| Observation::categorical(label, "g")),
        )
        .unwrap();
        let dist = CategoricalDistribution::from_sample(&sample, "yes", None).unwrap();
        assert_eq!(dist.proportion, 0.75);
        assert_eq!(dist.size, 4);
        assert_eq!(dist.mean, 3.0);
        assert!((dist.variance - 4.0 * 0.75 * 0.25).abs() < EPS);
        assert!((0.0..=1.0).contains(&dist.proportion));
    }

    #[test]
    fn test_categorical_from_numeric_sample() {
        let sample = Sample::from_observations([Observation::numeric(1.0, "a")]).unwrap();
        assert!(matches!(
            CategoricalDistribution::from_sample(&sample, "yes", None),
            Err(StatsError::WrongValueType { .. })
        ));
    }

    #[test]
    fn test_categorical_from_summary_keeps_proportion() {
        let dist = CategoricalDistribution::from_summary("yes", 0.2, 50, None).unwrap();
        assert_eq!(dist.proportion, 0.2);
        assert!((dist.mean - 10.0).abs() < EPS);
        assert!((dist.variance - 8.0).abs() < EPS);

        assert!(matches!(
            CategoricalDistribution::from_summary("yes", 1.5, 50, None),
            Err(StatsError::InvalidParameter { .. })
        ));
    }

    #[test]
    fn test_type_gated_accessors() {
        let numeric = SampleDistribution::from(
            NumericDistribution::from_summary(5.0, 2.0, 10, None).unwrap(),
        );
        assert_eq!(numeric.sum_of_squares(), Ok(36.0));
        assert_eq!(
            numeric.proportion(),
            Err(StatsError::NotApplicable {
                field: "proportion",
                kind: ValueKind::Numeric,
            })
        );
        assert!(numeric.success_label().is_err());

        let categorical = SampleDistribution::from(
            CategoricalDistribution::from_summary("yes", 0.5, 4, Some("a".to_owned())).unwrap(),
        );
        assert_eq!(categorical.proportion(), Ok(0.5));
        assert_eq!(categorical.success_label(), Ok("yes"));
        assert_eq!(categorical.group_id(), Some("a"));
        assert!(matches!(
            categorical.sum_of_squares(),
            Err(StatsError::NotApplicable { .. })
        ));
        assert!(categorical.is_categorical());
    }
}
