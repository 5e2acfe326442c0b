//! Cross-tabulated counts of two categorical variables.

use std::collections::HashMap;

use serde::{Serialize, Serializer, ser::SerializeStruct as _};

use crate::{
    error::StatsError,
    observation::{Observation, ValueKind},
    sample::Sample,
};

/// Counts of observations for every (row label, column label) pair.
///
/// Row and column labels keep the order in which they were first seen. Pairs
/// that were never counted read as zero. Margins are maintained on every
/// insert, so totals are constant-time lookups.
///
/// Serializes as `{"rows": [...], "columns": [...], "counts": [[...]]}`.
///
/// # Examples
///
/// ```
/// use sigtest_stats::contingency_table::ContingencyTable;
///
/// let table = ContingencyTable::from_pairs([
///     ("smoker", "male"),
///     ("smoker", "female"),
///     ("non-smoker", "male"),
/// ]);
/// assert_eq!(table.rows(), ["smoker", "non-smoker"]);
/// assert_eq!(table.get("smoker", "male"), 1);
/// assert_eq!(table.get("non-smoker", "female"), 0);
/// assert_eq!(table.row_total("smoker"), 2);
/// assert_eq!(table.total(), 3);
/// ```
#[derive(Debug, Clone, Default)]
pub struct ContingencyTable {
    rows: Vec<String>,
    columns: Vec<String>,
    row_index: HashMap<String, usize>,
    column_index: HashMap<String, usize>,
    counts: HashMap<(usize, usize), u64>,
    row_totals: Vec<u64>,
    column_totals: Vec<u64>,
    total: u64,
}

impl ContingencyTable {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Cross-tabulates `(row, column)` label pairs.
    pub fn from_pairs<I, R, C>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (R, C)>,
        R: AsRef<str>,
        C: AsRef<str>,
    {
        let mut table = Self::new();
        for (row, column) in pairs {
            table.increment(row.as_ref(), column.as_ref());
        }
        table
    }

    /// Cross-tabulates a categorical sample: rows are the observed labels and
    /// columns are the group ids.
    pub fn from_sample(sample: &Sample) -> Result<Self, StatsError> {
        let actual = sample.kind()?;
        if actual != ValueKind::Categorical {
            return Err(StatsError::WrongValueType {
                operation: "contingency table",
                expected: ValueKind::Categorical,
                actual,
            });
        }
        Ok(Self::from_pairs(sample.observations().iter().filter_map(
            |o: &Observation| o.categorical_value().map(|label| (label, o.group_id())),
        )))
    }

    /// Builds a table from a dense `counts[row][column]` matrix.
    pub fn from_counts<R, C>(
        row_labels: &[R],
        column_labels: &[C],
        counts: &[Vec<u64>],
    ) -> Result<Self, StatsError>
    where
        R: AsRef<str>,
        C: AsRef<str>,
    {
        if counts.len() != row_labels.len() {
            return Err(StatsError::ShapeMismatch {
                axis: "rows",
                expected: row_labels.len(),
                actual: counts.len(),
            });
        }

        let mut table = Self::new();
        for (row, row_counts) in row_labels.iter().zip(counts) {
            if row_counts.len() != column_labels.len() {
                return Err(StatsError::ShapeMismatch {
                    axis: "columns",
                    expected: column_labels.len(),
                    actual: row_counts.len(),
                });
            }
            for (column, &count) in column_labels.iter().zip(row_counts) {
                table.add(row.as_ref(), column.as_ref(), count);
            }
        }
        Ok(table)
    }

    /// Adds `count` observations to the `(row, column)` cell, registering
    /// labels seen for the first time.
    pub fn add(&mut self, row: &str, column: &str, count: u64) {
        let r = intern(&mut self.rows, &mut self.row_index, row);
        let c = intern(&mut self.columns, &mut self.column_index, column);
        self.row_totals.resize(self.rows.len(), 0);
        self.column_totals.resize(self.columns.len(), 0);
        *self.counts.entry((r, c)).or_default() += count;
        self.row_totals[r] += count;
        self.column_totals[c] += count;
        self.total += count;
    }

    pub fn increment(&mut self, row: &str, column: &str) {
        self.add(row, column, 1);
    }

    #[must_use]
    pub fn rows(&self) -> &[String] {
        &self.rows
    }

    #[must_use]
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Returns the count of the `(row, column)` cell, zero if never counted.
    #[must_use]
    pub fn get(&self, row: &str, column: &str) -> u64 {
        let (Some(&r), Some(&c)) = (self.row_index.get(row), self.column_index.get(column)) else {
            return 0;
        };
        self.counts.get(&(r, c)).copied().unwrap_or(0)
    }

    #[must_use]
    pub fn row_total(&self, row: &str) -> u64 {
        self.row_index.get(row).map_or(0, |&r| self.row_totals[r])
    }

    #[must_use]
    pub fn column_total(&self, column: &str) -> u64 {
        self.column_index
            .get(column)
            .map_or(0, |&c| self.column_totals[c])
    }

    /// Row margins in row label order.
    #[must_use]
    pub fn row_totals(&self) -> &[u64] {
        &self.row_totals
    }

    /// Column margins in column label order.
    #[must_use]
    pub fn column_totals(&self) -> &[u64] {
        &self.column_totals
    }

    #[must_use]
    pub fn total(&self) -> u64 {
        self.total
    }

    /// Counts as a dense matrix in row/column label order.
    #[must_use]
    pub fn to_matrix(&self) -> Vec<Vec<u64>> {
        self.rows
            .iter()
            .map(|row| self.columns.iter().map(|col| self.get(row, col)).collect())
            .collect()
    }
}

impl Serialize for ContingencyTable {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut state = serializer.serialize_struct("ContingencyTable", 3)?;
        state.serialize_field("rows", &self.rows)?;
        state.serialize_field("columns", &self.columns)?;
        state.serialize_field("counts", &self.to_matrix())?;
        state.end()
    }
}

fn intern(labels: &mut Vec<String>, index: &mut HashMap<String, usize>, label: &str) -> usize {
    if let Some(&i) = index.get(label) {
        return i;
    }
    let i = labels.len();
    labels.push(label.to_owned());
    index.insert(label.to_owned(), i);
    i
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_totals() {
        let table = ContingencyTable::from_counts(
            &["yes", "no"],
            &["a", "b", "c"],
            &[vec![1, 2, 3], vec![4, 5, 6]],
        )
        .unwrap();
        assert_eq!(table.row_total("yes"), 6);
        assert_eq!(table.row_total("no"), 15);
        assert_eq!(table.column_total("a"), 5);
        assert_eq!(table.column_total("c"), 9);
        assert_eq!(table.total(), 21);
        assert_eq!(table.to_matrix(), vec![vec![1, 2, 3], vec![4, 5, 6]]);
    }

    #[test]
    fn test_margins_follow_inserts() {
        let mut table = ContingencyTable::new();
        table.add("yes", "a", 3);
        table.add("no", "b", 2);
        table.add("yes", "b", 0);
        table.increment("yes", "a");
        assert_eq!(table.row_totals(), [4, 2]);
        assert_eq!(table.column_totals(), [4, 2]);
        assert_eq!(table.row_total("yes"), 4);
        assert_eq!(table.column_total("b"), 2);
        assert_eq!(table.total(), 6);
        assert_eq!(table.row_totals().iter().sum::<u64>(), table.total());
    }

    #[test]
    fn test_serialize_as_dense_counts() {
        let table = ContingencyTable::from_counts(&["yes", "no"], &["m", "f"], &[vec![1, 2], vec![3, 4]])
            .unwrap();
        let json = serde_json::to_value(&table).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "rows": ["yes", "no"],
                "columns": ["m", "f"],
                "counts": [[1, 2], [3, 4]],
            })
        );
    }

    #[test]
    fn test_unknown_labels_read_as_zero() {
        let table = ContingencyTable::from_pairs([("x", "y")]);
        assert_eq!(table.get("x", "z"), 0);
        assert_eq!(table.get("w", "y"), 0);
        assert_eq!(table.row_total("w"), 0);
        assert_eq!(table.column_total("z"), 0);
    }

    #[test]
    fn test_labels_keep_first_seen_order() {
        let mut table = ContingencyTable::new();
        table.increment("b", "2");
        table.increment("a", "1");
        table.increment("b", "1");
        table.add("b", "2", 4);
        assert_eq!(table.rows(), ["b", "a"]);
        assert_eq!(table.columns(), ["2", "1"]);
        assert_eq!(table.get("b", "2"), 5);
    }

    #[test]
    fn test_from_sample() {
        let sample = Sample::from_observations([
            Observation::categorical("yes", "male"),
            Observation::categorical("no", "male"),
            Observation::categorical("yes", "female"),
            Observation::categorical("yes", "male"),
        ])
        .unwrap();
        let table = ContingencyTable::from_sample(&sample).unwrap();
        assert_eq!(table.rows(), ["yes", "no"]);
        assert_eq!(table.columns(), ["male", "female"]);
        assert_eq!(table.get("yes", "male"), 2);
        assert_eq!(table.column_total("male"), 3);
        assert_eq!(table.total(), 4);
    }

    #[test]
    fn test_from_numeric_sample() {
        let sample = Sample::from_observations([Observation::numeric(1.0, "a")]).unwrap();
        assert!(matches!(
            ContingencyTable::from_sample(&sample),
            Err(StatsError::WrongValueType { .. })
        ));
        assert_eq!(
            ContingencyTable::from_sample(&Sample::new()).unwrap_err(),
            StatsError::NoObservationFound
        );
    }

    #[test]
    fn test_shape_mismatch() {
        let err = ContingencyTable::from_counts(&["a"], &["x", "y"], &[vec![1]]).unwrap_err();
        assert_eq!(
            err,
            StatsError::ShapeMismatch {
                axis: "columns",
                expected: 2,
                actual: 1,
            }
        );
        assert!(ContingencyTable::from_counts(&["a", "b"], &["x"], &[vec![1]]).is_err());
    }
}
