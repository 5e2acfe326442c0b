//! One-way analysis of variance.
//!
//! ANOVA relates a numeric response variable to a categorical explanatory
//! variable with two or more levels. With group means `μ_1, ..., μ_k`:
//!
//! - H0: the mean response is the same in every group
//! - HA: at least two group means differ
//!
//! The total sum of squares is split into the variability explained by the
//! groups (SSG) and the residual within-group variability (SSE). Their mean
//! squares form the F-statistic, whose upper tail under `F(k - 1, n - k)` is
//! the p-value.

use std::fmt;

use log::debug;
use serde::Serialize;
use sigtest_stats::{
    error::StatsError,
    sample::Sample,
    sample_distribution::{GroupMean, NumericDistribution},
};

use crate::{
    reference::{ReferenceDistributions, StatrsDistributions},
    significance::{Decision, SignificanceLevel},
};

const SSE_RELATIVE_TOLERANCE: f64 = 1e-12;

/// Result of a one-way ANOVA.
///
/// Each run produces a fresh value; nothing is retained between runs.
///
/// # Examples
///
/// ```
/// use sigtest_stats::{observation::Observation, sample::Sample};
/// use sigtest_testing::{anova::Anova, significance::SignificanceLevel};
///
/// let sample = Sample::from_observations(
///     [(10.0, "A"), (12.0, "A"), (14.0, "A"), (20.0, "B"), (22.0, "B"), (24.0, "B")]
///         .into_iter()
///         .map(|(x, g)| Observation::numeric(x, g)),
/// )
/// .unwrap();
///
/// let anova = Anova::from_sample(&sample, SignificanceLevel::new(0.05).unwrap()).unwrap();
/// assert_eq!(anova.df_group, 1);
/// assert_eq!(anova.df_error, 4);
/// assert!(anova.will_reject_h0(0.05));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Anova {
    /// SST: `Σ (y_i - grand_mean)²` over every observation.
    pub sum_of_squares_total: f64,
    /// Mean of the whole sample.
    pub grand_mean: f64,
    /// SSG: between-group variability explained by the categorical variable.
    pub sum_of_squares_group: f64,
    /// SSE: within-group variability left unexplained.
    pub sum_of_squares_error: f64,
    pub df_total: usize,
    pub df_group: usize,
    pub df_error: usize,
    /// MSG: `SSG / df_group`.
    pub mean_squares_group: f64,
    /// MSE: `SSE / df_error`.
    pub mean_squares_error: f64,
    /// `MSG / MSE`.
    pub f_statistic: f64,
    /// Upper-tail probability of `f_statistic` under `F(df_group, df_error)`.
    pub p_value: f64,
    pub significance_level: SignificanceLevel,
}

impl Anova {
    /// Runs ANOVA on the raw observations of a numeric sample.
    ///
    /// The total distribution is computed over every observation. Groups
    /// only contribute their mean and size, so a group may hold a single
    /// observation.
    pub fn from_sample(
        sample: &Sample,
        significance_level: SignificanceLevel,
    ) -> Result<Self, StatsError> {
        let total = sample.total_distribution()?;
        let groups = sample.group_means()?;
        Self::decompose(
            &StatrsDistributions,
            &total,
            groups.into_values(),
            significance_level,
        )
    }

    /// Runs ANOVA from a total distribution and one distribution per group,
    /// using the `statrs` F-distribution.
    pub fn run<'a, I>(
        total: &NumericDistribution,
        groups: I,
        significance_level: SignificanceLevel,
    ) -> Result<Self, StatsError>
    where
        I: IntoIterator<Item = &'a NumericDistribution>,
    {
        Self::run_with(&StatrsDistributions, total, groups, significance_level)
    }

    /// Runs ANOVA with a caller-supplied reference distribution.
    ///
    /// # Errors
    ///
    /// - [`StatsError::ShapeMismatch`] if the group sizes do not add up to the
    ///   total size
    /// - [`StatsError::InsufficientData`] if there are fewer than two groups,
    ///   no more observations than groups, or no within-group variability
    /// - [`StatsError::InvalidParameter`] if the F-distribution cannot be evaluated
    pub fn run_with<'a, D, I>(
        distributions: &D,
        total: &NumericDistribution,
        groups: I,
        significance_level: SignificanceLevel,
    ) -> Result<Self, StatsError>
    where
        D: ReferenceDistributions + ?Sized,
        I: IntoIterator<Item = &'a NumericDistribution>,
    {
        Self::decompose(
            distributions,
            total,
            groups.into_iter().map(GroupMean::from),
            significance_level,
        )
    }

    #[expect(clippy::cast_precision_loss)]
    fn decompose<D, I>(
        distributions: &D,
        total: &NumericDistribution,
        groups: I,
        significance_level: SignificanceLevel,
    ) -> Result<Self, StatsError>
    where
        D: ReferenceDistributions + ?Sized,
        I: IntoIterator<Item = GroupMean>,
    {
        let sum_of_squares_total = total.sum_of_squares;
        let grand_mean = total.mean;

        let mut sum_of_squares_group = 0.0;
        let mut num_groups = 0_usize;
        let mut grouped_size = 0_usize;
        for group in groups {
            sum_of_squares_group += (group.mean - grand_mean).powi(2) * group.size as f64;
            num_groups += 1;
            grouped_size += group.size;
        }
        if grouped_size != total.size {
            return Err(StatsError::ShapeMismatch {
                axis: "observations across groups",
                expected: total.size,
                actual: grouped_size,
            });
        }
        let sum_of_squares_error = sum_of_squares_total - sum_of_squares_group;

        let df_total = total.size.saturating_sub(1);
        let df_group = num_groups.saturating_sub(1);
        if df_group == 0 {
            return Err(StatsError::insufficient_data(format!(
                "ANOVA needs at least 2 groups, got {num_groups}"
            )));
        }
        let df_error = df_total.saturating_sub(df_group);
        if df_error == 0 {
            return Err(StatsError::insufficient_data(format!(
                "ANOVA needs more observations than groups + 1 ({} observations, {num_groups} groups)",
                total.size
            )));
        }

        // SSE is a difference of two sums; treat a residue below rounding noise as zero
        if !sum_of_squares_error.is_finite()
            || sum_of_squares_error <= sum_of_squares_total.abs() * SSE_RELATIVE_TOLERANCE
        {
            return Err(StatsError::insufficient_data(format!(
                "no within-group variability (SSE = {sum_of_squares_error}, SST = {sum_of_squares_total})"
            )));
        }
        let mean_squares_group = sum_of_squares_group / df_group as f64;
        let mean_squares_error = sum_of_squares_error / df_error as f64;

        let f_statistic = mean_squares_group / mean_squares_error;
        let p_value = 1.0
            - distributions.f_cumulative_probability(
                df_group as f64,
                df_error as f64,
                f_statistic,
            )?;

        debug!(
            "ANOVA: SST={sum_of_squares_total} SSG={sum_of_squares_group} SSE={sum_of_squares_error} \
             df=({df_group}, {df_error}) F={f_statistic} p={p_value}"
        );

        Ok(Self {
            sum_of_squares_total,
            grand_mean,
            sum_of_squares_group,
            sum_of_squares_error,
            df_total,
            df_group,
            df_error,
            mean_squares_group,
            mean_squares_error,
            f_statistic,
            p_value,
            significance_level,
        })
    }

    /// Runs again on new inputs, keeping this result's significance level.
    pub fn rerun<'a, I>(&self, total: &NumericDistribution, groups: I) -> Result<Self, StatsError>
    where
        I: IntoIterator<Item = &'a NumericDistribution>,
    {
        Self::run(total, groups, self.significance_level)
    }

    /// Returns the same result judged at another significance level.
    #[must_use]
    pub fn with_significance_level(&self, significance_level: SignificanceLevel) -> Self {
        Self {
            significance_level,
            ..*self
        }
    }

    /// Returns `true` if the p-value is below `significance_level`.
    #[must_use]
    pub fn will_reject_h0(&self, significance_level: f64) -> bool {
        self.p_value < significance_level
    }

    /// Decision at the configured significance level, `None` when disabled.
    #[must_use]
    pub fn decision(&self) -> Option<Decision> {
        self.significance_level.decide(self.p_value)
    }
}

impl fmt::Display for Anova {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "null hypothesis: the numeric variable (response) is independent of the categorical variable (explanatory)"
        )?;
        writeln!(
            f,
            "alternative hypothesis: the numeric variable depends on the categorical variable"
        )?;
        writeln!(f, "SST (sum of squares total): {}", self.sum_of_squares_total)?;
        writeln!(f, "SSG (sum of squares group): {}", self.sum_of_squares_group)?;
        writeln!(f, "SSE (sum of squares error): {}", self.sum_of_squares_error)?;
        writeln!(f, "df (total): {}", self.df_total)?;
        writeln!(f, "df (group): {}", self.df_group)?;
        writeln!(f, "df (error): {}", self.df_error)?;
        writeln!(f, "MSG (mean squares group): {}", self.mean_squares_group)?;
        writeln!(f, "MSE (mean squares error): {}", self.mean_squares_error)?;
        writeln!(f, "F-statistic: {}", self.f_statistic)?;
        write!(f, "p-value: {}", self.p_value)?;

        if let Some(decision) = self.decision() {
            write!(
                f,
                "\nat significance level {}: {decision}",
                self.significance_level.value()
            )?;
            match decision {
                Decision::RejectNull => write!(
                    f,
                    "\n  the categorical variable has an effect on the numeric variable"
                )?,
                Decision::FailToReject => write!(
                    f,
                    "\n  no evidence that the categorical variable affects the numeric variable"
                )?,
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use rand::{Rng as _, SeedableRng as _};
    use rand_distr::{Distribution as _, Normal};
    use rand_pcg::Pcg64Mcg;
    use sigtest_stats::observation::Observation;

    use super::*;

    const EPS: f64 = 1e-9;

    fn sample_of(values: &[(f64, &str)]) -> Sample {
        Sample::from_observations(values.iter().map(|&(x, g)| Observation::numeric(x, g))).unwrap()
    }

    fn two_groups() -> Sample {
        sample_of(&[
            (10.0, "A"),
            (12.0, "A"),
            (14.0, "A"),
            (20.0, "B"),
            (22.0, "B"),
            (24.0, "B"),
        ])
    }

    #[test]
    fn test_two_separated_groups() {
        let anova = Anova::from_sample(&two_groups(), SignificanceLevel::new(0.05).unwrap()).unwrap();
        assert_eq!(anova.grand_mean, 17.0);
        assert!((anova.sum_of_squares_total - 166.0).abs() < EPS);
        assert!((anova.sum_of_squares_group - 150.0).abs() < EPS);
        assert!((anova.sum_of_squares_error - 16.0).abs() < EPS);
        assert_eq!(anova.df_total, 5);
        assert_eq!(anova.df_group, 1);
        assert_eq!(anova.df_error, 4);
        assert!((anova.f_statistic - 37.5).abs() < 1e-6);
        assert!(anova.p_value < 0.01, "p = {}", anova.p_value);
        assert!(anova.will_reject_h0(0.05));
        assert_eq!(anova.decision(), Some(Decision::RejectNull));
    }

    #[test]
    fn test_single_group_is_insufficient() {
        let sample = sample_of(&[(1.0, "A"), (2.0, "A"), (3.0, "A")]);
        assert!(matches!(
            Anova::from_sample(&sample, SignificanceLevel::ANOVA_DEFAULT),
            Err(StatsError::InsufficientData { .. })
        ));
    }

    #[test]
    fn test_too_few_observations() {
        // 3 groups need at least 4 observations
        let total = NumericDistribution::from_summary(5.0, 1.0, 3, None).unwrap();
        let groups = ["a", "b", "c"].map(|g| {
            NumericDistribution::from_summary(5.0, 1.0, 1, Some(g.to_owned())).unwrap()
        });
        assert!(matches!(
            Anova::run(&total, &groups, SignificanceLevel::DISABLED),
            Err(StatsError::InsufficientData { .. })
        ));
    }

    #[test]
    fn test_no_within_group_variability() {
        let sample = sample_of(&[(1.0, "A"), (1.0, "A"), (2.0, "B"), (2.0, "B")]);
        assert!(matches!(
            Anova::from_sample(&sample, SignificanceLevel::DISABLED),
            Err(StatsError::InsufficientData { .. })
        ));
    }

    #[test]
    fn test_single_observation_group() {
        let sample = sample_of(&[(1.0, "A"), (2.0, "A"), (3.0, "A"), (10.0, "B")]);
        let anova = Anova::from_sample(&sample, SignificanceLevel::new(0.05).unwrap()).unwrap();
        assert_eq!(anova.grand_mean, 4.0);
        assert!((anova.sum_of_squares_total - 50.0).abs() < EPS);
        assert!((anova.sum_of_squares_group - 48.0).abs() < EPS);
        assert!((anova.sum_of_squares_error - 2.0).abs() < EPS);
        assert_eq!(anova.df_group, 1);
        assert_eq!(anova.df_error, 2);
        assert!((anova.f_statistic - 48.0).abs() < 1e-6);
        assert!((0.0..1.0).contains(&anova.p_value));
    }

    #[test]
    fn test_group_sizes_must_add_up_to_total() {
        let total = NumericDistribution::from_summary(17.0, 5.0, 6, None).unwrap();
        let groups = [
            NumericDistribution::from_summary(12.0, 2.0, 3, Some("A".to_owned())).unwrap(),
            NumericDistribution::from_summary(22.0, 2.0, 5, Some("B".to_owned())).unwrap(),
        ];
        assert_eq!(
            Anova::run(&total, &groups, SignificanceLevel::DISABLED).unwrap_err(),
            StatsError::ShapeMismatch {
                axis: "observations across groups",
                expected: 6,
                actual: 8,
            }
        );
    }

    #[test]
    fn test_rounding_residue_in_sse_is_no_variability() {
        // SSG is exactly 6; SST lands just above or just below it
        let groups = [
            NumericDistribution::from_summary(1.0, 0.0, 3, Some("A".to_owned())).unwrap(),
            NumericDistribution::from_summary(3.0, 0.0, 3, Some("B".to_owned())).unwrap(),
        ];
        let mut total = NumericDistribution::from_summary(2.0, 1.0, 6, None).unwrap();
        for sum_of_squares in [6.0 * (1.0 + 1e-14), 6.0, 6.0 * (1.0 - 1e-14)] {
            total.sum_of_squares = sum_of_squares;
            assert!(matches!(
                Anova::run(&total, &groups, SignificanceLevel::DISABLED),
                Err(StatsError::InsufficientData { .. })
            ));
        }

        let sample = sample_of(&[
            (0.1, "A"),
            (0.1, "A"),
            (0.1, "A"),
            (0.3, "B"),
            (0.3, "B"),
            (0.3, "B"),
        ]);
        assert!(matches!(
            Anova::from_sample(&sample, SignificanceLevel::DISABLED),
            Err(StatsError::InsufficientData { .. })
        ));
    }

    #[test]
    fn test_categorical_sample_is_rejected() {
        let sample = Sample::from_observations([
            Observation::categorical("yes", "A"),
            Observation::categorical("no", "B"),
        ])
        .unwrap();
        assert!(matches!(
            Anova::from_sample(&sample, SignificanceLevel::DISABLED),
            Err(StatsError::WrongValueType { .. })
        ));
    }

    #[test]
    fn test_identical_groups_fail_to_reject() {
        let sample = sample_of(&[
            (1.0, "A"),
            (2.0, "A"),
            (3.0, "A"),
            (1.0, "B"),
            (2.0, "B"),
            (3.0, "B"),
        ]);
        let anova = Anova::from_sample(&sample, SignificanceLevel::new(0.05).unwrap()).unwrap();
        assert!(anova.sum_of_squares_group.abs() < EPS);
        assert!((anova.p_value - 1.0).abs() < 1e-9);
        assert_eq!(anova.decision(), Some(Decision::FailToReject));
    }

    #[test]
    fn test_summary_statistics_match_raw_data() {
        let sample = two_groups();
        let raw = Anova::from_sample(&sample, SignificanceLevel::DISABLED).unwrap();

        let total = sample.total_distribution().unwrap();
        let groups = sample
            .sample_distributions_by_group_id()
            .unwrap()
            .into_values()
            .map(|d| NumericDistribution::from_summary(d.mean, d.sd, d.size, d.group_id).unwrap())
            .collect::<Vec<_>>();
        let total = NumericDistribution::from_summary(total.mean, total.sd, total.size, None).unwrap();
        let rebuilt = Anova::run(&total, &groups, SignificanceLevel::DISABLED).unwrap();

        assert!((raw.f_statistic - rebuilt.f_statistic).abs() < 1e-6);
        assert!((raw.p_value - rebuilt.p_value).abs() < 1e-9);
        assert_eq!(rebuilt.decision(), None);
    }

    #[test]
    fn test_rerun_and_level_change_produce_new_values() {
        let sample = two_groups();
        let total = sample.total_distribution().unwrap();
        let groups = sample.sample_distributions_by_group_id().unwrap();

        let first = Anova::run(&total, groups.values(), SignificanceLevel::new(0.05).unwrap()).unwrap();
        let second = first.rerun(&total, groups.values()).unwrap();
        assert_eq!(first, second);

        let strict = first.with_significance_level(SignificanceLevel::new(1e-6).unwrap());
        assert_eq!(strict.f_statistic, first.f_statistic);
        assert_eq!(strict.decision(), Some(Decision::FailToReject));
        assert_eq!(first.decision(), Some(Decision::RejectNull));
    }

    #[test]
    fn test_random_decomposition_identities() {
        let mut rng = Pcg64Mcg::seed_from_u64(7);
        for _ in 0..50 {
            let num_groups: u32 = rng.random_range(2..6);
            let mut observations = vec![];
            for g in 0..num_groups {
                let normal = Normal::new(f64::from(g) * 2.0, 3.0).unwrap();
                for _ in 0..rng.random_range(2_usize..12) {
                    observations.push(Observation::numeric(normal.sample(&mut rng), g.to_string()));
                }
            }
            let sample = Sample::from_observations(observations).unwrap();
            let groups: BTreeMap<_, _> = sample.sample_distributions_by_group_id().unwrap();
            let anova = Anova::from_sample(&sample, SignificanceLevel::DISABLED).unwrap();

            let within = groups.values().map(|d| d.sum_of_squares).sum::<f64>();
            assert!(
                (anova.sum_of_squares_error - within).abs() < 1e-6 * anova.sum_of_squares_total.max(1.0)
            );
            assert!(
                (anova.sum_of_squares_total - anova.sum_of_squares_group - anova.sum_of_squares_error)
                    .abs()
                    < EPS
            );
            assert_eq!(anova.df_total, anova.df_group + anova.df_error);
            assert!((0.0..=1.0).contains(&anova.p_value));

            let again = Anova::from_sample(&sample, SignificanceLevel::DISABLED).unwrap();
            assert_eq!(anova, again);
        }
    }

    #[test]
    fn test_display_wording() {
        let anova = Anova::from_sample(&two_groups(), SignificanceLevel::new(0.05).unwrap()).unwrap();
        let text = anova.to_string();
        assert!(text.contains("F-statistic: "));
        assert!(text.contains("reject the null hypothesis"));
        assert!(text.contains("has an effect"));

        let silent = anova.with_significance_level(SignificanceLevel::DISABLED).to_string();
        assert!(silent.ends_with(&format!("p-value: {}", anova.p_value)));
    }
}
