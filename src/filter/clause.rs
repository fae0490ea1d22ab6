//! Where-clause shapes.

use super::operator::Operator;
use crate::value::Value;

/// The right-hand side of one field in a filter.
///
/// Each variant is one of the shapes a caller can write; the compiler
/// decides per column kind which shapes are legal.
#[derive(Debug, Clone, PartialEq)]
pub enum Clause {
    /// Field present but explicitly undefined.
    Absent,
    Null,
    /// Bare scalar, identifier or entity reference.
    Value(Value),
    List(Vec<Value>),
    /// `{gt: v}` or `{op: "gt", value: v}`.
    Op(Operator, Value),
    /// `{id: v}` or `{id: [v, ...]}`.
    Id(Value),
    /// Filter over the entity a foreign key points at.
    Nested(Filter),
    /// An operator name outside the supported set.
    Unrecognized(String),
}

impl Clause {
    pub fn value(value: impl Into<Value>) -> Self {
        Clause::Value(value.into())
    }

    pub fn list<T: Into<Value>>(values: impl IntoIterator<Item = T>) -> Self {
        Clause::List(values.into_iter().map(Into::into).collect())
    }

    pub fn op(op: Operator, value: impl Into<Value>) -> Self {
        Clause::Op(op, value.into())
    }

    pub fn id(value: impl Into<Value>) -> Self {
        Clause::Id(value.into())
    }

    pub fn nested(filter: Filter) -> Self {
        Clause::Nested(filter)
    }

    /// Collapse `Value(Null)` and `Value(List)` onto their dedicated shapes.
    pub fn normalized(&self) -> std::borrow::Cow<'_, Clause> {
        use std::borrow::Cow;
        match self {
            Clause::Value(Value::Null) => Cow::Owned(Clause::Null),
            Clause::Value(Value::List(items)) => Cow::Owned(Clause::List(items.clone())),
            other => Cow::Borrowed(other),
        }
    }
}

/// Field to clause mapping, in caller order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Filter {
    entries: Vec<(String, Clause)>,
}

impl Filter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the clause for `field`, replacing any earlier one.
    pub fn with(mut self, field: &str, clause: Clause) -> Self {
        self.insert(field, clause);
        self
    }

    pub fn insert(&mut self, field: &str, clause: Clause) {
        match self.entries.iter_mut().find(|(f, _)| f == field) {
            Some(entry) => entry.1 = clause,
            None => self.entries.push((field.into(), clause)),
        }
    }

    pub fn get(&self, field: &str) -> Option<&Clause> {
        self.entries
            .iter()
            .find(|(f, _)| f == field)
            .map(|(_, c)| c)
    }

    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(f, _)| f.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
