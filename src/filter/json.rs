//! Reading filter documents from JSON.
//!
//! ```json
//! {
//!   "where":   { "age": { "gt": 30 }, "publisherFk": { "name": "Acme" } },
//!   "orderBy": { "age": "DESC" },
//!   "limit":   20,
//!   "offset":  40
//! }
//! ```

use serde_json::{Map, Value as Json};

use super::clause::{Clause, Filter};
use super::operator::Operator;
use super::order::{OrderClause, Ordering};
use super::FilterSpec;
use crate::sql::query::SortDir;
use crate::value::Value;

#[derive(Debug, thiserror::Error)]
pub enum FilterParseError {
    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Expected an object for {0}")]
    ExpectedObject(String),

    #[error("Unknown top-level key: {0}")]
    UnknownKey(String),

    #[error("Invalid order direction for '{field}': {found}")]
    InvalidDirection { field: String, found: String },

    #[error("'{key}' must be a non-negative integer, got {found}")]
    InvalidPagination { key: &'static str, found: String },

    #[error("Invalid value for '{field}': {reason}")]
    InvalidValue { field: String, reason: String },
}

impl TryFrom<Json> for FilterSpec {
    type Error = FilterParseError;

    fn try_from(json: Json) -> Result<Self, Self::Error> {
        let Json::Object(root) = json else {
            return Err(FilterParseError::ExpectedObject("filter document".into()));
        };

        let mut spec = FilterSpec::default();
        for (key, value) in root {
            match key.as_str() {
                "where" => spec.conditions = parse_filter(value, "where")?,
                "orderBy" => spec.order_by = parse_ordering(value, "orderBy")?,
                "limit" => spec.limit = parse_pagination(value, "limit")?,
                "offset" => spec.offset = parse_pagination(value, "offset")?,
                _ => return Err(FilterParseError::UnknownKey(key)),
            }
        }
        Ok(spec)
    }
}

impl FilterSpec {
    /// Parse a filter document from a JSON string.
    pub fn from_json_str(s: &str) -> Result<Self, FilterParseError> {
        let json: Json = serde_json::from_str(s)?;
        Self::try_from(json)
    }
}

fn parse_filter(json: Json, context: &str) -> Result<Filter, FilterParseError> {
    match json {
        Json::Null => Ok(Filter::new()),
        Json::Object(map) => {
            let mut filter = Filter::new();
            for (field, value) in map {
                let clause = parse_clause(value, &field)?;
                filter.insert(&field, clause);
            }
            Ok(filter)
        }
        _ => Err(FilterParseError::ExpectedObject(context.into())),
    }
}

fn parse_clause(json: Json, field: &str) -> Result<Clause, FilterParseError> {
    match json {
        Json::Null => Ok(Clause::Null),
        Json::Array(items) => Ok(Clause::List(parse_list(items, field)?)),
        Json::Object(map) => parse_object_clause(map, field),
        scalar => Ok(Clause::Value(parse_value(scalar, field)?)),
    }
}

fn parse_object_clause(mut map: Map<String, Json>, field: &str) -> Result<Clause, FilterParseError> {
    // {"op": "gt", "value": 30}
    let is_dynamic = map.contains_key("op") && map.keys().all(|k| k == "op" || k == "value");
    if is_dynamic {
        let name = match map.remove("op") {
            Some(Json::String(name)) => name,
            other => {
                return Err(FilterParseError::InvalidValue {
                    field: field.into(),
                    reason: format!(
                        "operator name must be a string, got {}",
                        other.unwrap_or(Json::Null)
                    ),
                })
            }
        };
        let value = parse_value(map.remove("value").unwrap_or(Json::Null), field)?;
        return Ok(match Operator::from_wire(&name) {
            Some(op) => Clause::Op(op, value),
            None => Clause::Unrecognized(name),
        });
    }

    if map.len() == 1 {
        if let Some((key, value)) = map.iter().next() {
            if let Some(op) = Operator::from_wire(key) {
                return Ok(Clause::Op(op, parse_value(value.clone(), field)?));
            }
            if key == "id" {
                return Ok(Clause::Id(parse_value(value.clone(), field)?));
            }
        }
    }

    Ok(Clause::Nested(parse_filter(Json::Object(map), field)?))
}

fn parse_list(items: Vec<Json>, field: &str) -> Result<Vec<Value>, FilterParseError> {
    items.into_iter().map(|item| parse_value(item, field)).collect()
}

fn parse_value(json: Json, field: &str) -> Result<Value, FilterParseError> {
    match json {
        Json::Null => Ok(Value::Null),
        Json::Bool(b) => Ok(Value::Bool(b)),
        Json::Number(n) => match n.as_i64() {
            Some(i) => Ok(Value::Int(i)),
            None => n.as_f64().map(Value::Float).ok_or_else(|| {
                FilterParseError::InvalidValue {
                    field: field.into(),
                    reason: format!("number {} is out of range", n),
                }
            }),
        },
        Json::String(s) => Ok(Value::String(s)),
        Json::Array(items) => Ok(Value::List(parse_list(items, field)?)),
        Json::Object(_) => Err(FilterParseError::InvalidValue {
            field: field.into(),
            reason: "objects are only allowed as nested filters".into(),
        }),
    }
}

fn parse_ordering(json: Json, context: &str) -> Result<Ordering, FilterParseError> {
    let map = match json {
        Json::Null => return Ok(Ordering::new()),
        Json::Object(map) => map,
        _ => return Err(FilterParseError::ExpectedObject(context.into())),
    };

    let mut ordering = Ordering::new();
    for (field, value) in map {
        let clause = match value {
            Json::String(dir) if dir.eq_ignore_ascii_case("asc") => OrderClause::Dir(SortDir::Asc),
            Json::String(dir) if dir.eq_ignore_ascii_case("desc") => {
                OrderClause::Dir(SortDir::Desc)
            }
            nested @ Json::Object(_) => OrderClause::Nested(parse_ordering(nested, &field)?),
            other => {
                return Err(FilterParseError::InvalidDirection {
                    field,
                    found: other.to_string(),
                })
            }
        };
        ordering.insert(&field, clause);
    }
    Ok(ordering)
}

fn parse_pagination(json: Json, key: &'static str) -> Result<Option<u64>, FilterParseError> {
    match json {
        Json::Null => Ok(None),
        Json::Number(ref n) => n.as_u64().map(Some).ok_or_else(|| {
            FilterParseError::InvalidPagination {
                key,
                found: json.to_string(),
            }
        }),
        other => Err(FilterParseError::InvalidPagination {
            key,
            found: other.to_string(),
        }),
    }
}
