use serde::{Deserialize, Serialize};
use sigtest_stats::{contingency_table::ContingencyTable, error::StatsError};

/// Pre-tabulated counts for a Chi-square test.
///
/// `counts[i][j]` is the number of observations in row `rows[i]` and column
/// `columns[j]`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct TableInput {
    pub rows: Vec<String>,
    pub columns: Vec<String>,
    pub counts: Vec<Vec<u64>>,
}

impl TryFrom<&TableInput> for ContingencyTable {
    type Error = StatsError;

    fn try_from(input: &TableInput) -> Result<Self, Self::Error> {
        ContingencyTable::from_counts(&input.rows, &input.columns, &input.counts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_input() {
        let input: TableInput = serde_json::from_str(
            r#"{"rows": ["yes", "no"], "columns": ["m", "f"], "counts": [[1, 2], [3, 4]]}"#,
        )
        .unwrap();
        let table = ContingencyTable::try_from(&input).unwrap();
        assert_eq!(table.get("no", "m"), 3);
        assert_eq!(table.total(), 10);
    }

    #[test]
    fn test_ragged_counts_are_rejected() {
        let input: TableInput = serde_json::from_str(
            r#"{"rows": ["yes", "no"], "columns": ["m", "f"], "counts": [[1, 2], [3]]}"#,
        )
        .unwrap();
        assert!(matches!(
            ContingencyTable::try_from(&input),
            Err(StatsError::ShapeMismatch { .. })
        ));
    }
}
