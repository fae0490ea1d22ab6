//! Domain values that appear on the right-hand side of a filter.

use std::fmt;

/// Reference to an entity instance.
///
/// `id` is `None` for an instance that has not been persisted yet; such a
/// reference cannot match any stored row.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EntityRef {
    pub entity: String,
    pub id: Option<String>,
}

impl EntityRef {
    pub fn saved(entity: &str, id: impl Into<String>) -> Self {
        Self {
            entity: entity.into(),
            id: Some(id.into()),
        }
    }

    pub fn unsaved(entity: &str) -> Self {
        Self {
            entity: entity.into(),
            id: None,
        }
    }

    pub fn is_saved(&self) -> bool {
        self.id.is_some()
    }
}

/// A filter value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
    Entity(EntityRef),
    List(Vec<Value>),
}

impl Value {
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// A reference to an entity that has no identifier yet.
    pub fn is_unsaved_ref(&self) -> bool {
        matches!(self, Value::Entity(r) if !r.is_saved())
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::Int(_) => "int",
            Value::Float(_) => "float",
            Value::String(_) => "string",
            Value::Entity(_) => "entity reference",
            Value::List(_) => "list",
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "null"),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Int(n) => write!(f, "{}", n),
            Value::Float(x) => write!(f, "{}", x),
            Value::String(s) => write!(f, "{:?}", s),
            Value::Entity(r) => match &r.id {
                Some(id) => write!(f, "{}({})", r.entity, id),
                None => write!(f, "{}(unsaved)", r.entity),
            },
            Value::List(items) => {
                write!(f, "[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", item)?;
                }
                write!(f, "]")
            }
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Int(n)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Int(n as i64)
    }
}

impl From<f64> for Value {
    fn from(x: f64) -> Self {
        Value::Float(x)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.into())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<EntityRef> for Value {
    fn from(r: EntityRef) -> Self {
        Value::Entity(r)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(items: Vec<T>) -> Self {
        Value::List(items.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map_or(Value::Null, Into::into)
    }
}
