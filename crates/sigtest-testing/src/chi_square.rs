//! Chi-square test of independence between two categorical variables.
//!
//! - H0: the variables are independent; the value of one does not depend on
//!   the value of the other
//! - HA: the variables are dependent
//!
//! Every cell of the contingency table is compared with the count expected
//! under independence, `row_total · column_total / total`.

use std::fmt;

use log::{debug, warn};
use serde::Serialize;
use sigtest_stats::{contingency_table::ContingencyTable, error::StatsError, sample::Sample};

use crate::{
    reference::{ReferenceDistributions, StatrsDistributions},
    significance::{Decision, SignificanceLevel},
};

/// Result of a Chi-square test of independence.
///
/// # Examples
///
/// ```
/// use sigtest_stats::contingency_table::ContingencyTable;
/// use sigtest_testing::{chi_square::ChiSquareTest, significance::SignificanceLevel};
///
/// let table = ContingencyTable::from_counts(
///     &["yes", "no"],
///     &["male", "female"],
///     &[vec![10, 10], vec![10, 10]],
/// )
/// .unwrap();
///
/// let test = ChiSquareTest::run(&table, SignificanceLevel::new(0.05).unwrap()).unwrap();
/// assert_eq!(test.chi_square, 0.0);
/// assert_eq!(test.df, 1);
/// assert_eq!(test.p_value, 1.0);
/// assert!(!test.will_reject_h0(0.05));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ChiSquareTest {
    /// The χ² test statistic.
    pub chi_square: f64,
    /// `(rows - 1) · (columns - 1)`.
    pub df: usize,
    /// Probability of the observed table, or a more extreme one, under independence.
    pub p_value: f64,
    pub significance_level: SignificanceLevel,
}

impl ChiSquareTest {
    /// Cross-tabulates a categorical sample (labels × group ids) and runs the test.
    pub fn from_sample(
        sample: &Sample,
        significance_level: SignificanceLevel,
    ) -> Result<Self, StatsError> {
        let table = ContingencyTable::from_sample(sample)?;
        Self::run(&table, significance_level)
    }

    /// Runs the test using the `statrs` Chi-squared distribution.
    pub fn run(
        table: &ContingencyTable,
        significance_level: SignificanceLevel,
    ) -> Result<Self, StatsError> {
        Self::run_with(&StatrsDistributions, table, significance_level)
    }

    /// Runs the test with a caller-supplied reference distribution.
    ///
    /// # Errors
    ///
    /// - [`StatsError::InsufficientData`] if the table has fewer than two rows
    ///   or columns, or a row or column whose total is zero
    /// - [`StatsError::InvalidParameter`] if the Chi-squared distribution cannot
    ///   be evaluated
    #[expect(clippy::cast_precision_loss)]
    pub fn run_with<D>(
        distributions: &D,
        table: &ContingencyTable,
        significance_level: SignificanceLevel,
    ) -> Result<Self, StatsError>
    where
        D: ReferenceDistributions + ?Sized,
    {
        let rows = table.rows();
        let columns = table.columns();
        let df = rows.len().saturating_sub(1) * columns.len().saturating_sub(1);
        if df == 0 {
            return Err(StatsError::insufficient_data(format!(
                "Chi-square test needs at least a 2x2 table, got {}x{}",
                rows.len(),
                columns.len()
            )));
        }

        let total = table.total() as f64;
        let row_totals = table.row_totals();
        let column_totals = table.column_totals();
        if let Some(i) = row_totals.iter().position(|&n| n == 0) {
            return Err(zero_margin("row", &rows[i]));
        }
        if let Some(j) = column_totals.iter().position(|&n| n == 0) {
            return Err(zero_margin("column", &columns[j]));
        }

        let mut chi_square = 0.0;
        for (row_counts, &row_total) in table.to_matrix().iter().zip(row_totals) {
            for (&observed, &column_total) in row_counts.iter().zip(column_totals) {
                let expected = row_total as f64 * column_total as f64 / total;
                chi_square += (observed as f64 - expected).powi(2) / expected;
            }
        }

        let p_value =
            1.0 - distributions.chi_squared_cumulative_probability(df as f64, chi_square)?;

        debug!("Chi-square: χ²={chi_square} df={df} p={p_value}");

        Ok(Self {
            chi_square,
            df,
            p_value,
            significance_level,
        })
    }

    /// Runs again on a new table, keeping this result's significance level.
    pub fn rerun(&self, table: &ContingencyTable) -> Result<Self, StatsError> {
        Self::run(table, self.significance_level)
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

/// Count expected in the `(row, column)` cell if the two variables were
/// independent.
///
/// Fails with [`StatsError::InsufficientData`] if the expected count is zero,
/// i.e. the row or the column has no observation.
#[expect(clippy::cast_precision_loss)]
pub fn expected_count(
    table: &ContingencyTable,
    row: &str,
    column: &str,
) -> Result<f64, StatsError> {
    let row_total = table.row_total(row);
    let column_total = table.column_total(column);
    if row_total == 0 || column_total == 0 {
        warn!("zero margin in contingency table at ({row}, {column})");
        return Err(StatsError::insufficient_data(format!(
            "expected count of cell ({row}, {column}) is zero"
        )));
    }
    Ok(row_total as f64 * column_total as f64 / table.total() as f64)
}

fn zero_margin(axis: &str, label: &str) -> StatsError {
    warn!("zero margin in contingency table at {axis} {label}");
    StatsError::insufficient_data(format!("{axis} {label} has no observation"))
}

impl fmt::Display for ChiSquareTest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Chi^2: {}", self.chi_square)?;
        writeln!(f, "degrees of freedom: {}", self.df)?;
        write!(f, "p-value: {}", self.p_value)?;

        if let Some(decision) = self.decision() {
            write!(
                f,
                "\nat significance level {}: {decision}",
                self.significance_level.value()
            )?;
            match decision {
                Decision::RejectNull => {
                    write!(f, "\n  the two categorical variables are dependent")?;
                }
                Decision::FailToReject => write!(
                    f,
                    "\n  no evidence against independence of the two categorical variables"
                )?,
            }
        }
        Ok(())
    }
}
