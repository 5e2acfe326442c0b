use std::{fmt, path::PathBuf};

use anyhow::{Context as _, bail};
use clap::Args;
use serde::Serialize;
use sigtest_stats::contingency_table::ContingencyTable;
use sigtest_testing::{chi_square::ChiSquareTest, significance::SignificanceLevel};

use crate::{command::ReportArg, schema::table::TableInput, util};

#[derive(Debug, Clone, Args)]
pub(crate) struct ChiSquareArg {
    /// Path to the observations JSON file (categorical values tagged with groups)
    #[arg(required_unless_present = "table", conflicts_with = "table")]
    pub observations: Option<PathBuf>,

    /// Path to a pre-tabulated counts JSON file (`{"rows", "columns", "counts"}`)
    #[arg(long)]
    pub table: Option<PathBuf>,

    /// Significance level used for the decision (<= 0 disables it)
    #[arg(long, default_value_t = SignificanceLevel::CHI_SQUARE_DEFAULT.value(), allow_negative_numbers = true)]
    pub significance_level: f64,

    #[clap(flatten)]
    pub report: ReportArg,
}

pub(crate) fn run(arg: &ChiSquareArg) -> anyhow::Result<()> {
    let significance_level = SignificanceLevel::new(arg.significance_level)?;
    let table = match (&arg.observations, &arg.table) {
        (Some(path), None) => {
            let sample = util::read_observations_file(path)?;
            ContingencyTable::from_sample(&sample)
                .with_context(|| format!("Cannot cross-tabulate {}", path.display()))?
        }
        (None, Some(path)) => {
            let input: TableInput = util::read_json_file("table", path)?;
            ContingencyTable::try_from(&input)
                .with_context(|| format!("Invalid table in {}", path.display()))?
        }
        _ => bail!("either an observations file or --table must be given"),
    };

    let report = ChiSquareReport::new(table, significance_level)?;
    util::save_report(&report, arg.report.json, arg.report.output.clone())
}

#[derive(Debug, Clone, Serialize)]
pub(crate) struct ChiSquareReport {
    #[serde(flatten)]
    pub table: ContingencyTable,
    #[serde(flatten)]
    pub result: ChiSquareTest,
}

impl ChiSquareReport {
    fn new(table: ContingencyTable, significance_level: SignificanceLevel) -> anyhow::Result<Self> {
        let result = ChiSquareTest::run(&table, significance_level)?;
        Ok(Self { table, result })
    }
}

impl fmt::Display for ChiSquareReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Chi-square test of independence")?;
        writeln!(f, "===============================")?;
        write!(f, "  {:<16}", "")?;
        for column in self.table.columns() {
            write!(f, " {column:>10}")?;
        }
        writeln!(f)?;
        for (row, counts) in self.table.rows().iter().zip(self.table.to_matrix()) {
            write!(f, "  {row:<16}")?;
            for count in counts {
                write!(f, " {count:>10}")?;
            }
            writeln!(f)?;
        }
        writeln!(f)?;
        write!(f, "{}", self.result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_keeps_table_layout() {
        let table = ContingencyTable::from_counts(
            &["yes", "no"],
            &["male", "female"],
            &[vec![20, 10], vec![10, 20]],
        )
        .unwrap();
        let report = ChiSquareReport::new(table, SignificanceLevel::new(0.05).unwrap()).unwrap();
        assert_eq!(report.table.rows(), ["yes", "no"]);

        let text = report.to_string();
        assert!(text.contains("female"));
        assert!(text.contains("are dependent"));

        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["df"], 1);
        assert_eq!(json["counts"], serde_json::json!([[20, 10], [10, 20]]));
    }
}
