//! Structured filters as exchanged with callers and fed to the lexical engine.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::debug;

/// A single filter operand.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ScalarValue {
    Bool(bool),
    Integer(i64),
    Float(f64),
    Text(String),
}

impl ScalarValue {
    pub fn is_numeric(&self) -> bool { matches!(self, ScalarValue::Integer(_) | ScalarValue::Float(_)) }
}

impl fmt::Display for ScalarValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScalarValue::Bool(b) => write!(f, "{b}"),
            ScalarValue::Integer(n) => write!(f, "{n}"),
            ScalarValue::Float(x) => write!(f, "{x}"),
            ScalarValue::Text(s) => f.write_str(s),
        }
    }
}

impl From<&str> for ScalarValue {
    fn from(s: &str) -> Self { ScalarValue::Text(s.to_string()) }
}

impl From<String> for ScalarValue {
    fn from(s: String) -> Self { ScalarValue::Text(s) }
}

impl From<i64> for ScalarValue {
    fn from(n: i64) -> Self { ScalarValue::Integer(n) }
}

/// Inclusive bounds; a missing side is unbounded.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RangeBounds {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from: Option<ScalarValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub to: Option<ScalarValue>,
}

impl RangeBounds {
    pub fn is_unbounded(&self) -> bool { self.from.is_none() && self.to.is_none() }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FilterValue {
    /// Any of the listed values.
    List(Vec<ScalarValue>),
    Range(RangeBounds),
    Scalar(ScalarValue),
}

impl FilterValue {
    pub fn any_of<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<ScalarValue>,
    {
        FilterValue::List(values.into_iter().map(Into::into).collect())
    }

    pub fn range(from: Option<ScalarValue>, to: Option<ScalarValue>) -> Self {
        FilterValue::Range(RangeBounds { from, to })
    }

    pub fn as_list(&self) -> Option<&[ScalarValue]> {
        match self {
            FilterValue::List(values) => Some(values),
            _ => None,
        }
    }
}

/// Field name to filter value. Iteration is ordered by field name.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FilterSet(BTreeMap<String, FilterValue>);

impl FilterSet {
    pub fn new() -> Self { Self::default() }

    /// Parse a caller-supplied JSON object; anything malformed yields an empty set.
    pub fn parse_lenient(json: &str) -> Self {
        if json.trim().is_empty() {
            return Self::default();
        }
        match serde_json::from_str::<FilterSet>(json) {
            Ok(filters) => filters,
            Err(e) => {
                debug!("Ignoring malformed filter JSON: {}", e);
                Self::default()
            }
        }
    }

    pub fn insert(&mut self, field: impl Into<String>, value: FilterValue) -> Option<FilterValue> {
        self.0.insert(field.into(), value)
    }

    pub fn with(mut self, field: impl Into<String>, value: FilterValue) -> Self {
        self.insert(field, value);
        self
    }

    pub fn get(&self, field: &str) -> Option<&FilterValue> { self.0.get(field) }
    pub fn contains(&self, field: &str) -> bool { self.0.contains_key(field) }
    pub fn len(&self) -> usize { self.0.len() }
    pub fn is_empty(&self) -> bool { self.0.is_empty() }
    pub fn iter(&self) -> impl Iterator<Item = (&String, &FilterValue)> { self.0.iter() }
}

impl FromIterator<(String, FilterValue)> for FilterSet {
    fn from_iter<T: IntoIterator<Item = (String, FilterValue)>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl IntoIterator for FilterSet {
    type Item = (String, FilterValue);
    type IntoIter = std::collections::btree_map::IntoIter<String, FilterValue>;

    fn into_iter(self) -> Self::IntoIter { self.0.into_iter() }
}
