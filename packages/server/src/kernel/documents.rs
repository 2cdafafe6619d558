//! Document model shared by every store engine.
//!
//! A document is a JSON object addressed by `(collection, id)`. Each write
//! bumps its `version`, which is what conditional writes compare against.

use std::cmp::Ordering;

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde_json::Value;
use thiserror::Error;

/// Storage failures surfaced by document store engines
#[derive(Error, Debug)]
pub enum StoreError {
    /// A conditional write lost: the document changed, appeared or vanished
    /// since it was read.
    #[error("Write conflict on {collection}/{id}")]
    Conflict { collection: String, id: String },

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl StoreError {
    pub fn conflict(collection: &str, id: &str) -> Self {
        StoreError::Conflict {
            collection: collection.to_string(),
            id: id.to_string(),
        }
    }
}

/// A stored document snapshot
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub id: String,
    pub data: Value,
    pub version: i64,
    pub update_time: DateTime<Utc>,
}

impl Document {
    /// Deserialize the document body into a domain type
    pub fn to_object<T: DeserializeOwned>(&self) -> Result<T, StoreError> {
        Ok(serde_json::from_value(self.data.clone())?)
    }

    /// Value at a dotted field path (e.g. `jobPay.annualMax`)
    pub fn field(&self, path: &str) -> Option<&Value> {
        lookup_path(&self.data, path)
    }
}

/// Acknowledgment of a successful write
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WriteResult {
    pub id: String,
    pub version: i64,
    pub update_time: DateTime<Utc>,
}

/// Resolve a dotted field path inside a JSON value.
pub fn lookup_path<'a>(value: &'a Value, path: &str) -> Option<&'a Value> {
    path.split('.')
        .try_fold(value, |current, segment| current.get(segment))
}

// ============================================================================
// Queries
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterOp {
    Eq,
    Gte,
    Lte,
}

impl FilterOp {
    pub fn as_sql(&self) -> &'static str {
        match self {
            FilterOp::Eq => "=",
            FilterOp::Gte => ">=",
            FilterOp::Lte => "<=",
        }
    }

    fn accepts(&self, ordering: Ordering) -> bool {
        match self {
            FilterOp::Eq => ordering == Ordering::Equal,
            FilterOp::Gte => ordering != Ordering::Less,
            FilterOp::Lte => ordering != Ordering::Greater,
        }
    }
}

/// Typed filter operand. A filter only matches fields of the same JSON type.
#[derive(Debug, Clone, PartialEq)]
pub enum FilterValue {
    Number(f64),
    Text(String),
}

impl From<i64> for FilterValue {
    fn from(value: i64) -> Self {
        FilterValue::Number(value as f64)
    }
}

impl From<i32> for FilterValue {
    fn from(value: i32) -> Self {
        FilterValue::Number(value.into())
    }
}

impl From<f64> for FilterValue {
    fn from(value: f64) -> Self {
        FilterValue::Number(value)
    }
}

impl From<&str> for FilterValue {
    fn from(value: &str) -> Self {
        FilterValue::Text(value.to_string())
    }
}

impl From<String> for FilterValue {
    fn from(value: String) -> Self {
        FilterValue::Text(value)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FieldFilter {
    pub field: String,
    pub op: FilterOp,
    pub value: FilterValue,
}

impl FieldFilter {
    /// Field path split into segments, as used by `#>` in PostgreSQL
    pub fn path_segments(&self) -> Vec<String> {
        split_path(&self.field)
    }

    pub fn matches(&self, data: &Value) -> bool {
        let Some(field) = lookup_path(data, &self.field) else {
            return false;
        };

        let ordering = match (&self.value, field) {
            (FilterValue::Number(expected), Value::Number(actual)) => actual
                .as_f64()
                .and_then(|actual| actual.partial_cmp(expected)),
            (FilterValue::Text(expected), Value::String(actual)) => {
                Some(actual.as_str().cmp(expected.as_str()))
            }
            _ => None,
        };

        ordering.is_some_and(|ordering| self.op.accepts(ordering))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    #[default]
    Ascending,
    Descending,
}

#[derive(Debug, Clone, PartialEq)]
pub struct OrderBy {
    pub field: String,
    pub direction: SortDirection,
}

impl OrderBy {
    pub fn path_segments(&self) -> Vec<String> {
        split_path(&self.field)
    }
}

/// Filter/sort specification over one collection.
///
/// Filters are AND-ed. Results with equal sort keys are ordered by document id.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DocumentQuery {
    pub filters: Vec<FieldFilter>,
    pub order_by: Option<OrderBy>,
}

impl DocumentQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn where_equal_to(self, field: &str, value: impl Into<FilterValue>) -> Self {
        self.with_filter(field, FilterOp::Eq, value.into())
    }

    pub fn where_greater_than_or_equal_to(
        self,
        field: &str,
        value: impl Into<FilterValue>,
    ) -> Self {
        self.with_filter(field, FilterOp::Gte, value.into())
    }

    pub fn where_less_than_or_equal_to(self, field: &str, value: impl Into<FilterValue>) -> Self {
        self.with_filter(field, FilterOp::Lte, value.into())
    }

    pub fn order_by(mut self, field: &str, direction: SortDirection) -> Self {
        self.order_by = Some(OrderBy {
            field: field.to_string(),
            direction,
        });
        self
    }

    pub fn matches(&self, data: &Value) -> bool {
        self.filters.iter().all(|filter| filter.matches(data))
    }

    /// Sort documents in place according to `order_by`, ties broken by id.
    pub fn sort(&self, documents: &mut [Document]) {
        documents.sort_by(|a, b| {
            let by_field = match &self.order_by {
                Some(order) => {
                    let ordering = compare_fields(a.field(&order.field), b.field(&order.field));
                    match order.direction {
                        SortDirection::Ascending => ordering,
                        SortDirection::Descending => ordering.reverse(),
                    }
                }
                None => Ordering::Equal,
            };
            by_field.then_with(|| a.id.cmp(&b.id))
        });
    }

    fn with_filter(mut self, field: &str, op: FilterOp, value: FilterValue) -> Self {
        self.filters.push(FieldFilter {
            field: field.to_string(),
            op,
            value,
        });
        self
    }
}

fn split_path(path: &str) -> Vec<String> {
    path.split('.').map(String::from).collect()
}

/// Missing fields sort first, then strings, then numbers.
fn compare_fields(a: Option<&Value>, b: Option<&Value>) -> Ordering {
    fn rank(value: Option<&Value>) -> u8 {
        match value {
            Some(Value::String(_)) => 1,
            Some(Value::Number(_)) => 2,
            Some(_) => 3,
            None => 0,
        }
    }

    match (a, b) {
        (Some(Value::Number(x)), Some(Value::Number(y))) => {
            let x = x.as_f64().unwrap_or_default();
            let y = y.as_f64().unwrap_or_default();
            x.total_cmp(&y)
        }
        (Some(Value::String(x)), Some(Value::String(y))) => x.cmp(y),
        _ => rank(a).cmp(&rank(b)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn doc(id: &str, data: Value) -> Document {
        Document {
            id: id.to_string(),
            data,
            version: 1,
            update_time: Utc::now(),
        }
    }

    #[test]
    fn lookup_follows_dotted_paths() {
        let data = json!({"jobPay": {"annualMax": 42000}});
        assert_eq!(lookup_path(&data, "jobPay.annualMax"), Some(&json!(42000)));
        assert_eq!(lookup_path(&data, "jobPay.min"), None);
    }

    #[test]
    fn range_filters_are_inclusive() {
        let query = DocumentQuery::new()
            .where_greater_than_or_equal_to("pay", 10_i64)
            .where_less_than_or_equal_to("pay", 20_i64);

        assert!(query.matches(&json!({"pay": 10})));
        assert!(query.matches(&json!({"pay": 20})));
        assert!(!query.matches(&json!({"pay": 21})));
        assert!(!query.matches(&json!({"pay": "15"})));
        assert!(!query.matches(&json!({})));
    }

    #[test]
    fn text_equality_filter() {
        let query = DocumentQuery::new().where_equal_to("jobLocation.region", "WEST");

        assert!(query.matches(&json!({"jobLocation": {"region": "WEST"}})));
        assert!(!query.matches(&json!({"jobLocation": {"region": "EAST"}})));
    }

    #[test]
    fn sort_descending_breaks_ties_by_id() {
        let query = DocumentQuery::new().order_by("pay", SortDirection::Descending);
        let mut docs = vec![
            doc("b", json!({"pay": 5})),
            doc("c", json!({"pay": 9})),
            doc("a", json!({"pay": 5})),
        ];

        query.sort(&mut docs);

        let ids: Vec<_> = docs.iter().map(|d| d.id.as_str()).collect();
        assert_eq!(ids, vec!["c", "a", "b"]);
    }
}
