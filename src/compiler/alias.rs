//! Table alias allocation.
//!
//! Aliases are the table's abbreviation followed by a per-abbreviation
//! counter: `author` becomes `a0`, a second `author` (or `address`) `a1`,
//! `author_detail` becomes `ad0`. Abbreviations contain only letters and
//! suffixes only digits, so two allocations never produce the same alias.

use std::collections::HashMap;

/// Per-compilation alias allocator.
#[derive(Debug, Default)]
pub struct AliasRegistry {
    next: HashMap<String, usize>,
}

impl AliasRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate a fresh alias for `table`.
    pub fn allocate(&mut self, table: &str) -> String {
        let abbreviation = abbreviate(table);
        let counter = self.next.entry(abbreviation.clone()).or_insert(0);
        let alias = format!("{}{}", abbreviation, counter);
        *counter += 1;
        tracing::trace!(table, alias = %alias, "allocated alias");
        alias
    }
}

/// First letter of each underscore-delimited word, lowercased.
///
/// Words without letters are skipped; a name with no letters at all
/// abbreviates to `t`.
pub fn abbreviate(table: &str) -> String {
    let abbreviation: String = table
        .split('_')
        .filter_map(|word| word.chars().find(|c| c.is_alphabetic()))
        .flat_map(char::to_lowercase)
        .collect();

    if abbreviation.is_empty() {
        "t".into()
    } else {
        abbreviation
    }
}
