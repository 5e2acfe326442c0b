//! Single labeled data points.

use serde::{Deserialize, Serialize};

/// Whether a value is a number or a category label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, derive_more::Display)]
#[serde(rename_all = "snake_case")]
pub enum ValueKind {
    #[display("numeric")]
    Numeric,
    #[display("categorical")]
    Categorical,
}

/// The measured value of an observation.
///
/// Deserialized untagged: JSON numbers become [`Value::Numeric`] and JSON
/// strings become [`Value::Categorical`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, derive_more::From, derive_more::IsVariant)]
#[serde(untagged)]
pub enum Value {
    Numeric(f64),
    Categorical(String),
}

impl Value {
    #[must_use]
    pub fn kind(&self) -> ValueKind {
        match self {
            Value::Numeric(_) => ValueKind::Numeric,
            Value::Categorical(_) => ValueKind::Categorical,
        }
    }
}

impl From<&str> for Value {
    fn from(label: &str) -> Self {
        Value::Categorical(label.to_owned())
    }
}

/// One data point: a value tagged with the group it belongs to.
///
/// # Examples
///
/// ```
/// use sigtest_stats::observation::{Observation, ValueKind};
///
/// let obs = Observation::numeric(12.0, "A");
/// assert!(obs.is_numeric());
/// assert_eq!(obs.kind(), ValueKind::Numeric);
/// assert_eq!(obs.group_id(), "A");
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    value: Value,
    #[serde(rename = "group")]
    group_id: String,
}

impl Observation {
    #[must_use]
    pub fn new(value: impl Into<Value>, group_id: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            group_id: group_id.into(),
        }
    }

    #[must_use]
    pub fn numeric(value: f64, group_id: impl Into<String>) -> Self {
        Self::new(Value::Numeric(value), group_id)
    }

    #[must_use]
    pub fn categorical(label: impl Into<String>, group_id: impl Into<String>) -> Self {
        Self::new(Value::Categorical(label.into()), group_id)
    }

    #[must_use]
    pub fn value(&self) -> &Value {
        &self.value
    }

    #[must_use]
    pub fn group_id(&self) -> &str {
        &self.group_id
    }

    #[must_use]
    pub fn kind(&self) -> ValueKind {
        self.value.kind()
    }

    #[must_use]
    pub fn is_numeric(&self) -> bool {
        self.value.is_numeric()
    }

    #[must_use]
    pub fn is_categorical(&self) -> bool {
        self.value.is_categorical()
    }

    /// Returns the numeric value, or `None` for a categorical observation.
    #[must_use]
    pub fn numeric_value(&self) -> Option<f64> {
        match self.value {
            Value::Numeric(x) => Some(x),
            Value::Categorical(_) => None,
        }
    }

    /// Returns the category label, or `None` for a numeric observation.
    #[must_use]
    pub fn categorical_value(&self) -> Option<&str> {
        match &self.value {
            Value::Numeric(_) => None,
            Value::Categorical(label) => Some(label),
        }
    }

    /// Returns `true` if the observation belongs to `group`, where `None`
    /// selects every observation.
    #[must_use]
    pub fn in_group(&self, group: Option<&str>) -> bool {
        group.is_none_or(|g| g == self.group_id)
    }
}
