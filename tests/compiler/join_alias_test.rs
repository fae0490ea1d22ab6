//! Join construction and alias allocation across nested filters.

#[path = "../common/mod.rs"]
mod common;

use std::collections::HashSet;

use common::{library_catalog, validate_sql};
use relq::compiler::{AliasRegistry, QueryAssembler};
use relq::filter::{Clause, Filter, FilterSpec, Ordering};
use relq::sql::Dialect;

fn name_is(name: &str) -> Clause {
    Clause::nested(Filter::new().with("name", Clause::value(name)))
}

#[test]
fn test_self_join_gets_fresh_alias() {
    let catalog = library_catalog();
    let spec = FilterSpec::new().filter(Filter::new().with("mentorFk", name_is("Ann")));
    let query = QueryAssembler::new(&catalog).assemble("Author", &spec).unwrap();

    let sql = query.to_sql(Dialect::Postgres);
    assert!(sql.contains("INNER JOIN \"author\" AS \"a1\" ON \"a0\".\"mentor_fk\" = \"a1\".\"id\""));
    assert!(sql.contains("WHERE \"a1\".\"name\" = 'Ann'"));
    validate_sql(&sql, Dialect::Postgres).unwrap();
}

#[test]
fn test_aliases_unique_across_many_joins() {
    let catalog = library_catalog();
    let author_filter = Filter::new()
        .with(
            "mentorFk",
            Clause::nested(
                Filter::new()
                    .with("publisherFk", name_is("Acme"))
                    .with("mentorFk", name_is("Bob")),
            ),
        )
        .with("publisherFk", name_is("Beta"))
        .with(
            "detailFk",
            Clause::nested(Filter::new().with("bio", Clause::value("x"))),
        );
    let spec = FilterSpec::new().filter(
        Filter::new()
            .with("authorFk", Clause::nested(author_filter))
            .with("editorFk", name_is("Cy")),
    );

    let query = QueryAssembler::new(&catalog).assemble("Book", &spec).unwrap();

    let aliases: Vec<&str> = query
        .joins
        .iter()
        .map(|j| j.table.reference_name())
        .collect();
    assert_eq!(aliases, vec!["a0", "a1", "p0", "a2", "p1", "ad0", "a3"]);

    let unique: HashSet<&str> = aliases.iter().copied().chain(["b0"]).collect();
    assert_eq!(unique.len(), aliases.len() + 1);

    for dialect in common::ALL_DIALECTS {
        validate_sql(&query.to_sql(dialect), dialect).unwrap();
    }
}

#[test]
fn test_join_uses_target_primary_key() {
    let catalog = library_catalog();
    let spec = FilterSpec::new().filter(Filter::new().with(
        "detailFk",
        Clause::nested(Filter::new().with("bio", Clause::value("poet"))),
    ));
    let sql = QueryAssembler::new(&catalog)
        .assemble("Author", &spec)
        .unwrap()
        .to_sql(Dialect::Postgres);

    assert!(sql.contains(
        "INNER JOIN \"author_detail\" AS \"ad0\" ON \"a0\".\"detail_fk\" = \"ad0\".\"detail_id\""
    ));
}

#[test]
fn test_where_and_order_share_one_join() {
    let catalog = library_catalog();
    let spec = FilterSpec::new()
        .filter(Filter::new().with("publisherFk", name_is("Acme")))
        .order(Ordering::new().nested("publisherFk", Ordering::new().desc("country")));
    let query = QueryAssembler::new(&catalog).assemble("Author", &spec).unwrap();

    assert_eq!(query.joins.len(), 1);
    let sql = query.to_sql(Dialect::Postgres);
    assert!(sql.contains("WHERE \"p0\".\"name\" = 'Acme'"));
    assert!(sql.contains("ORDER BY \"p0\".\"country\" DESC, \"a0\".\"id\" ASC"));
}

#[test]
fn test_same_relation_in_sibling_scopes_joins_twice() {
    let catalog = library_catalog();
    let spec = FilterSpec::new().filter(
        Filter::new()
            .with("authorFk", Clause::nested(Filter::new().with("publisherFk", name_is("Acme"))))
            .with("editorFk", Clause::nested(Filter::new().with("publisherFk", name_is("Acme")))),
    );
    let query = QueryAssembler::new(&catalog).assemble("Book", &spec).unwrap();

    let tables: Vec<(&str, &str)> = query
        .joins
        .iter()
        .map(|j| (j.table.table.as_str(), j.table.reference_name()))
        .collect();
    assert_eq!(
        tables,
        vec![
            ("author", "a0"),
            ("publisher", "p0"),
            ("author", "a1"),
            ("publisher", "p1"),
        ]
    );
}

#[test]
fn test_registry_counts() {
    let mut aliases = AliasRegistry::new();
    let allocated: Vec<String> = (0..12).map(|_| aliases.allocate("book_tag")).collect();
    assert_eq!(allocated.first().map(String::as_str), Some("bt0"));
    assert_eq!(allocated.last().map(String::as_str), Some("bt11"));
    assert_eq!(allocated.iter().collect::<HashSet<_>>().len(), 12);
}
