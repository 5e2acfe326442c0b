use crate::observation::ValueKind;

/// Failure kinds raised while building samples, distributions and tables.
///
/// Every variant is a local, recoverable condition. Computations fail fast at
/// the point of violation instead of propagating `NaN` or infinite values.
#[derive(Debug, Clone, PartialEq, derive_more::Display, derive_more::Error)]
pub enum StatsError {
    /// An observation's value kind disagrees with the kind already established
    /// by the sample.
    #[display("sample should only contain {expected} values, but got a {actual} observation")]
    MixedValueType {
        expected: ValueKind,
        actual: ValueKind,
    },
    /// A numeric-only or categorical-only operation was invoked on the opposite kind.
    #[display("{operation} requires {expected} values, but the sample is {actual}")]
    WrongValueType {
        operation: &'static str,
        expected: ValueKind,
        actual: ValueKind,
    },
    /// The sample has no observation to derive a kind or statistic from.
    #[display("no observation is found in the sample")]
    NoObservationFound,
    /// A precondition on sample sizes or degrees of freedom does not hold.
    #[display("insufficient data: {reason}")]
    InsufficientData { reason: String },
    /// A field was accessed on a distribution of the wrong kind.
    #[display("{field} is not applicable to a {kind} distribution")]
    NotApplicable {
        field: &'static str,
        kind: ValueKind,
    },
    /// A caller-supplied parameter is outside its domain.
    #[display("invalid {name}: {value}")]
    InvalidParameter { name: &'static str, value: f64 },
    /// A count matrix does not match the given row or column labels.
    #[display("expected {expected} {axis}, got {actual}")]
    ShapeMismatch {
        axis: &'static str,
        expected: usize,
        actual: usize,
    },
}

impl StatsError {
    /// Shorthand for [`StatsError::InsufficientData`].
    #[must_use]
    pub fn insufficient_data(reason: impl Into<String>) -> Self {
        Self::InsufficientData {
            reason: reason.into(),
        }
    }
}
