use std::path::PathBuf;

use anyhow::Context as _;
use clap::Args;
use sigtest_testing::significance::SignificanceLevel;

use crate::{
    command::{ReportArg, anova::AnovaReport},
    schema::summary::SummaryInput,
    util,
};

#[derive(Debug, Clone, Args)]
pub(crate) struct AnovaSummaryArg {
    /// Path to the summary JSON file (`{"total": {...}, "groups": {...}}`)
    pub summary: PathBuf,

    /// Significance level used for the decision (<= 0 disables it)
    #[arg(long, default_value_t = SignificanceLevel::ANOVA_DEFAULT.value(), allow_negative_numbers = true)]
    pub significance_level: f64,

    #[clap(flatten)]
    pub report: ReportArg,
}

pub(crate) fn run(arg: &AnovaSummaryArg) -> anyhow::Result<()> {
    let significance_level = SignificanceLevel::new(arg.significance_level)?;
    let input: SummaryInput = util::read_json_file("summary", &arg.summary)?;
    eprintln!(
        "Loaded summary of {} groups from {}",
        input.groups.len(),
        arg.summary.display()
    );

    let total = input
        .total_distribution()
        .context("Invalid total summary")?;
    let groups = input
        .group_distributions()
        .context("Invalid group summary")?;
    let report = AnovaReport::from_distributions(&total, &groups, significance_level)
        .with_context(|| format!("ANOVA failed on {}", arg.summary.display()))?;
    util::save_report(&report, arg.report.json, arg.report.output.clone())
}
