use std::{fmt, path::PathBuf};

use anyhow::Context as _;
use clap::Args;
use serde::Serialize;
use sigtest_stats::{
    sample::Sample,
    sample_distribution::{GroupMean, NumericDistribution},
};
use sigtest_testing::{anova::Anova, significance::SignificanceLevel};

use crate::{command::ReportArg, util};

#[derive(Debug, Clone, Args)]
pub(crate) struct AnovaArg {
    /// Path to the observations JSON file (numeric values tagged with groups)
    pub observations: PathBuf,

    /// Significance level used for the decision (<= 0 disables it)
    #[arg(long, default_value_t = SignificanceLevel::ANOVA_DEFAULT.value(), allow_negative_numbers = true)]
    pub significance_level: f64,

    #[clap(flatten)]
    pub report: ReportArg,
}

pub(crate) fn run(arg: &AnovaArg) -> anyhow::Result<()> {
    let significance_level = SignificanceLevel::new(arg.significance_level)?;
    let sample = util::read_observations_file(&arg.observations)?;
    let report = AnovaReport::from_sample(&sample, significance_level)
        .with_context(|| format!("ANOVA failed on {}", arg.observations.display()))?;
    util::save_report(&report, arg.report.json, arg.report.output.clone())
}

/// One line of the group table; `sd` is absent for single-observation groups.
#[derive(Debug, Clone, Serialize)]
pub(crate) struct GroupRow {
    pub group_id: Option<String>,
    pub size: usize,
    pub mean: f64,
    pub sd: Option<f64>,
}

impl From<&NumericDistribution> for GroupRow {
    fn from(dist: &NumericDistribution) -> Self {
        Self {
            group_id: dist.group_id.clone(),
            size: dist.size,
            mean: dist.mean,
            sd: Some(dist.sd),
        }
    }
}

/// ANOVA result together with the figures it was computed from.
#[derive(Debug, Clone, Serialize)]
pub(crate) struct AnovaReport {
    pub total: GroupRow,
    pub groups: Vec<GroupRow>,
    #[serde(flatten)]
    pub result: Anova,
}

impl AnovaReport {
    fn from_sample(sample: &Sample, significance_level: SignificanceLevel) -> anyhow::Result<Self> {
        let result = Anova::from_sample(sample, significance_level)?;
        let total = GroupRow::from(&sample.total_distribution()?);
        let groups = sample
            .group_means()?
            .into_iter()
            .map(|(group_id, GroupMean { mean, size })| {
                let sd = NumericDistribution::from_sample(sample, Some(&group_id))
                    .ok()
                    .map(|dist| dist.sd);
                GroupRow {
                    group_id: Some(group_id),
                    size,
                    mean,
                    sd,
                }
            })
            .collect();
        Ok(Self {
            total,
            groups,
            result,
        })
    }

    pub(crate) fn from_distributions(
        total: &NumericDistribution,
        groups: &[NumericDistribution],
        significance_level: SignificanceLevel,
    ) -> anyhow::Result<Self> {
        let result = Anova::run(total, groups, significance_level)?;
        Ok(Self {
            total: total.into(),
            groups: groups.iter().map(GroupRow::from).collect(),
            result,
        })
    }
}

impl fmt::Display for AnovaReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "One-way ANOVA")?;
        writeln!(f, "=============")?;
        writeln!(
            f,
            "  {:<16} {:>8} {:>12} {:>12}",
            "Group", "Size", "Mean", "SD"
        )?;
        writeln!(f, "  {}", "-".repeat(51))?;
        for group in &self.groups {
            write_row(f, group.group_id.as_deref().unwrap_or("-"), group)?;
        }
        write_row(f, "(total)", &self.total)?;
        writeln!(f)?;
        write!(f, "{}", self.result)
    }
}

fn write_row(f: &mut fmt::Formatter<'_>, name: &str, row: &GroupRow) -> fmt::Result {
    write!(f, "  {:<16} {:>8} {:>12.4}", name, row.size, row.mean)?;
    match row.sd {
        Some(sd) => writeln!(f, " {sd:>12.4}"),
        None => writeln!(f, " {:>12}", "-"),
    }
}
