//! Filter specifications: what the caller asks the compiler for.
//!
//! A [`FilterSpec`] combines a where-[`Filter`], an [`Ordering`] and optional
//! pagination. Specs are built in code or read from JSON (see [`json`]).
//!
//! ```
//! use relq::filter::{Clause, Filter, FilterSpec, Operator, Ordering};
//!
//! let spec = FilterSpec::new()
//!     .filter(
//!         Filter::new()
//!             .with("age", Clause::op(Operator::Gt, 30))
//!             .with("publisherFk", Clause::nested(Filter::new().with("name", Clause::value("Acme")))),
//!     )
//!     .order(Ordering::new().desc("age"))
//!     .limit(20);
//!
//! assert_eq!(spec.limit, Some(20));
//! ```

pub mod clause;
pub mod json;
pub mod operator;
pub mod order;

pub use clause::{Clause, Filter};
pub use json::FilterParseError;
pub use operator::Operator;
pub use order::{OrderClause, Ordering};

use serde::Deserialize;

/// Where, order-by and pagination for one query.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(try_from = "serde_json::Value")]
pub struct FilterSpec {
    pub conditions: Filter,
    pub order_by: Ordering,
    pub limit: Option<u64>,
    pub offset: Option<u64>,
}

impl FilterSpec {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn filter(mut self, conditions: Filter) -> Self {
        self.conditions = conditions;
        self
    }

    pub fn order(mut self, order_by: Ordering) -> Self {
        self.order_by = order_by;
        self
    }

    pub fn limit(mut self, limit: u64) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn offset(mut self, offset: u64) -> Self {
        self.offset = Some(offset);
        self
    }
}
