use std::path::PathBuf;

use clap::{Parser, Subcommand};

use self::{
    anova::AnovaArg, anova_summary::AnovaSummaryArg, chi_square::ChiSquareArg,
    describe::DescribeArg,
};

mod anova;
mod anova_summary;
mod chi_square;
mod describe;

#[derive(Debug, Clone, Parser)]
#[command(author, version, about, long_about = None)]
pub struct CommandArgs {
    /// Which test or summary to run
    #[command(subcommand)]
    mode: Mode,
}

#[derive(Debug, Clone, Subcommand)]
enum Mode {
    /// One-way ANOVA on numeric observations grouped by a categorical variable
    Anova(#[clap(flatten)] AnovaArg),
    /// One-way ANOVA from published per-group mean, standard deviation and size
    AnovaSummary(#[clap(flatten)] AnovaSummaryArg),
    /// Chi-square test of independence between two categorical variables
    ChiSquare(#[clap(flatten)] ChiSquareArg),
    /// Summary statistics of every group of a sample
    Describe(#[clap(flatten)] DescribeArg),
}

/// Output options shared by every subcommand
#[derive(Debug, Clone, clap::Args)]
pub(crate) struct ReportArg {
    /// Write the result as JSON instead of a text report
    #[arg(long)]
    json: bool,
    /// Output file path (stdout if omitted)
    #[arg(long)]
    output: Option<PathBuf>,
}

pub fn run() -> anyhow::Result<()> {
    let args = CommandArgs::parse();
    match args.mode {
        Mode::Anova(arg) => anova::run(&arg)?,
        Mode::AnovaSummary(arg) => anova_summary::run(&arg)?,
        Mode::ChiSquare(arg) => chi_square::run(&arg)?,
        Mode::Describe(arg) => describe::run(&arg)?,
    }
    Ok(())
}
