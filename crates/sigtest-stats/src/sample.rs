//! Ordered collections of observations sharing one value kind.
//!
//! A [`Sample`] is the entry point of the pipeline: observations are inserted
//! one at a time, the first insert fixes the value kind, and the sample then
//! answers group-membership queries and derives the per-group
//! [`NumericDistribution`]s consumed by ANOVA.
//!
//! Group filters take an `Option<&str>`, where `None` selects the whole sample
//! (the "total" group).
//!
//! # Examples
//!
//! ```
//! use sigtest_stats::{observation::Observation, sample::Sample};
//!
//! let mut sample = Sample::new();
//! for (x, g) in [(10.0, "A"), (12.0, "A"), (20.0, "B"), (22.0, "B")] {
//!     sample.add(Observation::numeric(x, g)).unwrap();
//! }
//!
//! assert_eq!(sample.count_by_group_id(Some("A")), 2);
//! assert_eq!(sample.count_by_group_id(None), 4);
//!
//! let by_group = sample.sample_distributions_by_group_id().unwrap();
//! assert_eq!(by_group["B"].mean, 21.0);
//! ```

use std::collections::{BTreeMap, BTreeSet};

use crate::{
    error::StatsError,
    observation::{Observation, ValueKind},
    sample_distribution::{CategoricalDistribution, GroupMean, NumericDistribution},
};

/// An ordered collection of observations of a single value kind.
///
/// The sample must be treated as frozen once distributions or contingency
/// tables have been derived from it; later inserts are not reflected in
/// values computed earlier.
#[derive(Debug, Clone, Default)]
pub struct Sample {
    observations: Vec<Observation>,
    kind: Option<ValueKind>,
    groups: BTreeSet<String>,
}

impl Sample {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a sample by inserting every observation in order.
    pub fn from_observations<I>(observations: I) -> Result<Self, StatsError>
    where
        I: IntoIterator<Item = Observation>,
    {
        let mut sample = Self::new();
        for observation in observations {
            sample.add(observation)?;
        }
        Ok(sample)
    }

    /// Appends an observation.
    ///
    /// The first observation establishes the sample's value kind. Fails with
    /// [`StatsError::MixedValueType`] if a later observation disagrees with it,
    /// leaving the sample unchanged.
    pub fn add(&mut self, observation: Observation) -> Result<(), StatsError> {
        let actual = observation.kind();
        match self.kind {
            Some(expected) if expected != actual => {
                return Err(StatsError::MixedValueType { expected, actual });
            }
            Some(_) => {}
            None => self.kind = Some(actual),
        }

        self.groups.insert(observation.group_id().to_owned());
        self.observations.push(observation);
        Ok(())
    }

    /// Returns the value kind established by the first observation.
    pub fn kind(&self) -> Result<ValueKind, StatsError> {
        self.kind.ok_or(StatsError::NoObservationFound)
    }

    pub fn is_numeric(&self) -> Result<bool, StatsError> {
        Ok(self.kind()? == ValueKind::Numeric)
    }

    pub fn is_categorical(&self) -> Result<bool, StatsError> {
        Ok(self.kind()? == ValueKind::Categorical)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.observations.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.observations.is_empty()
    }

    #[must_use]
    pub fn get(&self, index: usize) -> Option<&Observation> {
        self.observations.get(index)
    }

    #[must_use]
    pub fn observations(&self) -> &[Observation] {
        &self.observations
    }

    /// Distinct group ids seen so far, in lexical order.
    #[must_use]
    pub fn groups(&self) -> &BTreeSet<String> {
        &self.groups
    }

    /// Iterates over the observations of `group` (`None` for all).
    pub fn observations_in<'a>(
        &'a self,
        group: Option<&'a str>,
    ) -> impl Iterator<Item = &'a Observation> + 'a {
        self.observations.iter().filter(move |o| o.in_group(group))
    }

    /// Counts the observations of `group` (`None` counts all of them).
    #[must_use]
    pub fn count_by_group_id(&self, group: Option<&str>) -> usize {
        self.observations_in(group).count()
    }

    /// Fails with [`StatsError::WrongValueType`] unless the sample holds `expected` values.
    pub(crate) fn ensure_kind(
        &self,
        operation: &'static str,
        expected: ValueKind,
    ) -> Result<(), StatsError> {
        let actual = self.kind()?;
        if actual != expected {
            return Err(StatsError::WrongValueType {
                operation,
                expected,
                actual,
            });
        }
        Ok(())
    }

    /// Returns the numeric values of `group` (`None` for all), in insertion order.
    pub fn numeric_values(&self, group: Option<&str>) -> Result<Vec<f64>, StatsError> {
        self.ensure_kind("numeric_values", ValueKind::Numeric)?;
        Ok(self
            .observations_in(group)
            .filter_map(Observation::numeric_value)
            .collect())
    }

    /// Fraction of the observations of `group` whose label equals `success_label`.
    ///
    /// # Errors
    ///
    /// - [`StatsError::NoObservationFound`] if the sample is empty
    /// - [`StatsError::WrongValueType`] if the sample is numeric
    /// - [`StatsError::InsufficientData`] if `group` has no observation
    #[expect(clippy::cast_precision_loss)]
    pub fn proportion(&self, success_label: &str, group: Option<&str>) -> Result<f64, StatsError> {
        self.ensure_kind("proportion", ValueKind::Categorical)?;

        let (successes, count) = self
            .observations_in(group)
            .fold((0_usize, 0_usize), |(successes, count), o| {
                let hit = o.categorical_value() == Some(success_label);
                (successes + usize::from(hit), count + 1)
            });
        if count == 0 {
            return Err(StatsError::insufficient_data(format!(
                "group {} has no observation",
                group.unwrap_or("<total>")
            )));
        }
        Ok(successes as f64 / count as f64)
    }

    /// The ungrouped distribution over every observation.
    pub fn total_distribution(&self) -> Result<NumericDistribution, StatsError> {
        NumericDistribution::from_sample(self, None)
    }

    /// One numeric distribution per distinct group id.
    pub fn sample_distributions_by_group_id(
        &self,
    ) -> Result<BTreeMap<String, NumericDistribution>, StatsError> {
        self.groups
            .iter()
            .map(|g| Ok((g.clone(), NumericDistribution::from_sample(self, Some(g))?)))
            .collect()
    }

    /// Mean and size of every group, defined even for single-observation groups.
    pub fn group_means(&self) -> Result<BTreeMap<String, GroupMean>, StatsError> {
        self.groups
            .iter()
            .map(|g| {
                let values = self.numeric_values(Some(g))?;
                Ok((g.clone(), GroupMean::from_values(&values)?))
            })
            .collect()
    }

    /// One categorical distribution per distinct group id, counting `success_label`.
    pub fn categorical_distributions_by_group_id(
        &self,
        success_label: &str,
    ) -> Result<BTreeMap<String, CategoricalDistribution>, StatsError> {
        self.groups
            .iter()
            .map(|g| {
                let dist = CategoricalDistribution::from_sample(self, success_label, Some(g))?;
                Ok((g.clone(), dist))
            })
            .collect()
    }
}
