//! Classical significance tests over sample distributions
//!
//! This crate consumes the data model of `sigtest-stats` and runs two tests:
//!
//! - **One-way ANOVA** ([`anova::Anova`]): numeric response vs. categorical
//!   explanatory variable
//! - **Chi-square test of independence** ([`chi_square::ChiSquareTest`]): two
//!   categorical variables
//!
//! # Overview
//!
//! ## ANOVA Workflow
//!
//! 1. **Collect Observations** ([`sigtest_stats::sample::Sample`]): numeric values tagged with groups
//! 2. **Summarize Groups** ([`sigtest_stats::sample_distribution::NumericDistribution`]):
//!    one total distribution plus one per group, from raw data or published figures
//! 3. **Decompose Variance** ([`anova::Anova::run`]): SST = SSG + SSE, F = MSG / MSE
//! 4. **Evaluate p-value** ([`reference::ReferenceDistributions`]): upper tail of F
//!
//! ## Chi-square Workflow
//!
//! 1. **Cross-tabulate** ([`sigtest_stats::contingency_table::ContingencyTable`])
//! 2. **Compare with Expected Counts** ([`chi_square::ChiSquareTest::run`])
//! 3. **Evaluate p-value**: upper tail of χ²
//!
//! Test results are plain values. Re-running a test, or judging it at another
//! [`significance::SignificanceLevel`], produces a new value.
//!
//! # Examples
//!
//! ## Meta-analysis from published summary statistics
//!
//! ```
//! use sigtest_stats::sample_distribution::NumericDistribution;
//! use sigtest_testing::{anova::Anova, significance::SignificanceLevel};
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//!
//! let groups = [
//!     NumericDistribution::from_summary(12.0, 2.0, 3, Some("A".to_owned()))?,
//!     NumericDistribution::from_summary(22.0, 2.0, 3, Some("B".to_owned()))?,
//! ];
//! // SST = 166 over 6 observations
//! let total = NumericDistribution::from_summary(17.0, (166.0_f64 / 5.0).sqrt(), 6, None)?;
//!
//! let anova = Anova::run(&total, &groups, SignificanceLevel::ANOVA_DEFAULT)?;
//! assert_eq!(anova.df_group, 1);
//! assert_eq!(anova.df_error, 4);
//! println!("{anova}");
//! # Ok(())
//! # }
//! ```
//!
//! ## Independence of two categorical variables
//!
//! ```
//! use sigtest_stats::{observation::Observation, sample::Sample};
//! use sigtest_testing::{chi_square::ChiSquareTest, significance::SignificanceLevel};
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//!
//! let mut observations = vec![];
//! for _ in 0..10 {
//!     observations.push(Observation::categorical("smoker", "male"));
//!     observations.push(Observation::categorical("non-smoker", "female"));
//! }
//! let sample = Sample::from_observations(observations)?;
//!
//! let test = ChiSquareTest::from_sample(&sample, SignificanceLevel::new(0.05)?)?;
//! assert!(test.will_reject_h0(0.05));
//! # Ok(())
//! # }
//! ```

pub mod anova;
pub mod chi_square;
pub mod reference;
pub mod significance;
