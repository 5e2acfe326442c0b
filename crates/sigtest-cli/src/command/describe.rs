use std::{fmt, path::PathBuf};

use anyhow::{Context as _, bail};
use clap::Args;
use serde::Serialize;
use sigtest_stats::{
    observation::ValueKind,
    sample::Sample,
    sample_distribution::{CategoricalDistribution, SampleDistribution},
};

use crate::{command::ReportArg, util};

#[derive(Debug, Clone, Args)]
pub(crate) struct DescribeArg {
    /// Path to the observations JSON file
    pub observations: PathBuf,

    /// Label counted as a success (required for categorical samples)
    #[arg(long)]
    pub success_label: Option<String>,

    #[clap(flatten)]
    pub report: ReportArg,
}

pub(crate) fn run(arg: &DescribeArg) -> anyhow::Result<()> {
    let sample = util::read_observations_file(&arg.observations)?;
    let report = DescribeReport::new(&sample, arg.success_label.as_deref())
        .with_context(|| format!("Cannot describe {}", arg.observations.display()))?;
    util::save_report(&report, arg.report.json, arg.report.output.clone())
}

/// Total distribution followed by one distribution per group.
#[derive(Debug, Clone, Serialize)]
pub(crate) struct DescribeReport {
    pub kind: ValueKind,
    pub total: SampleDistribution,
    pub groups: Vec<SampleDistribution>,
}

impl DescribeReport {
    fn new(sample: &Sample, success_label: Option<&str>) -> anyhow::Result<Self> {
        let kind = sample.kind()?;
        let (total, groups) = match (kind, success_label) {
            (ValueKind::Numeric, _) => {
                if success_label.is_some() {
                    log::warn!("--success-label is ignored for numeric samples");
                }
                let total = sample.total_distribution()?.into();
                let groups = sample
                    .sample_distributions_by_group_id()?
                    .into_values()
                    .map(SampleDistribution::from)
                    .collect();
                (total, groups)
            }
            (ValueKind::Categorical, Some(label)) => {
                let total = CategoricalDistribution::from_sample(sample, label, None)?.into();
                let groups = sample
                    .categorical_distributions_by_group_id(label)?
                    .into_values()
                    .map(SampleDistribution::from)
                    .collect();
                (total, groups)
            }
            (ValueKind::Categorical, None) => {
                bail!("--success-label is required for a categorical sample")
            }
        };
        Ok(Self {
            kind,
            total,
            groups,
        })
    }
}

impl fmt::Display for DescribeReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{} sample", self.kind)?;
        if let Ok(label) = self.total.success_label() {
            writeln!(f, "success label: {label}")?;
        }
        write!(
            f,
            "  {:<16} {:>8} {:>12} {:>12}",
            "Group", "Size", "Mean", "SD"
        )?;
        if self.kind == ValueKind::Categorical {
            write!(f, " {:>12}", "Proportion")?;
        }
        for dist in self.groups.iter().chain([&self.total]) {
            let name = dist.group_id().unwrap_or("(total)");
            write!(
                f,
                "\n  {:<16} {:>8} {:>12.4} {:>12.4}",
                name,
                dist.size(),
                dist.mean(),
                dist.sd()
            )?;
            if let Ok(proportion) = dist.proportion() {
                write!(f, " {proportion:>12.4}")?;
            }
        }
        Ok(())
    }
}
