use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use sigtest_stats::{error::StatsError, sample_distribution::NumericDistribution};

/// Published mean, standard deviation and size of one group.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub(crate) struct GroupSummary {
    pub mean: f64,
    pub sd: f64,
    pub size: usize,
}

/// Summary statistics for a meta-analysis ANOVA.
///
/// ```json
/// {
///   "total": {"mean": 17.0, "sd": 5.76, "size": 6},
///   "groups": {"A": {"mean": 12.0, "sd": 2.0, "size": 3}, "B": {...}}
/// }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct SummaryInput {
    pub total: GroupSummary,
    pub groups: BTreeMap<String, GroupSummary>,
}

impl SummaryInput {
    pub(crate) fn total_distribution(&self) -> Result<NumericDistribution, StatsError> {
        let GroupSummary { mean, sd, size } = self.total;
        NumericDistribution::from_summary(mean, sd, size, None)
    }

    pub(crate) fn group_distributions(&self) -> Result<Vec<NumericDistribution>, StatsError> {
        self.groups
            .iter()
            .map(|(name, group)| {
                NumericDistribution::from_summary(
                    group.mean,
                    group.sd,
                    group.size,
                    Some(name.clone()),
                )
            })
            .collect()
    }
}
