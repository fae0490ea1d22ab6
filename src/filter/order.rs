//! Order-by shapes.

use crate::sql::query::SortDir;

#[derive(Debug, Clone, PartialEq)]
pub enum OrderClause {
    Dir(SortDir),
    /// Ordering by fields of the entity a foreign key points at.
    Nested(Ordering),
}

/// Field to order clause mapping. Earlier fields take priority.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Ordering {
    entries: Vec<(String, OrderClause)>,
}

impl Ordering {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn asc(self, field: &str) -> Self {
        self.with(field, OrderClause::Dir(SortDir::Asc))
    }

    pub fn desc(self, field: &str) -> Self {
        self.with(field, OrderClause::Dir(SortDir::Desc))
    }

    pub fn nested(self, field: &str, ordering: Ordering) -> Self {
        self.with(field, OrderClause::Nested(ordering))
    }

    /// Set the clause for `field`, keeping its original position if present.
    pub fn with(mut self, field: &str, clause: OrderClause) -> Self {
        self.insert(field, clause);
        self
    }

    pub fn insert(&mut self, field: &str, clause: OrderClause) {
        match self.entries.iter_mut().find(|(f, _)| f == field) {
            Some(entry) => entry.1 = clause,
            None => self.entries.push((field.into(), clause)),
        }
    }

    pub fn get(&self, field: &str) -> Option<&OrderClause> {
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
