//! End-to-end compilation scenarios over the library schema.

#[path = "../common/mod.rs"]
mod common;

use common::{library_catalog, validate_sql};
use relq::codec::{CodecError, CodecResult, DefaultCodec, ValueCodec};
use relq::compile::{compile, compile_with_codec, CompileOptions};
use relq::compiler::{CompileError, QueryAssembler, DEFAULT_LIMIT};
use relq::expr::{table_col, ExprExt, Literal};
use relq::filter::{Clause, Filter, FilterSpec, Operator, Ordering};
use relq::query::{LimitOffset, OrderByExpr};
use relq::sql::Dialect;
use relq::value::{EntityRef, Value};

fn compile_pg(entity: &str, spec: &FilterSpec) -> String {
    let catalog = library_catalog();
    let output = compile(&catalog, entity, spec, &CompileOptions::default()).unwrap();
    validate_sql(&output.sql, Dialect::Postgres).unwrap();
    output.sql
}

fn acme_authors_over_30() -> FilterSpec {
    FilterSpec::new()
        .filter(
            Filter::new()
                .with("age", Clause::op(Operator::Gt, 30))
                .with(
                    "publisherFk",
                    Clause::nested(Filter::new().with("name", Clause::value("Acme"))),
                ),
        )
        .order(Ordering::new().desc("age"))
}

// ============================================================================
// Author / Publisher
// ============================================================================

#[test]
fn test_author_publisher_scenario() {
    let sql = compile_pg("Author", &acme_authors_over_30());

    insta::assert_snapshot!(sql, @r###"
    SELECT
      "a0".*
    FROM "author" AS "a0"
    INNER JOIN "publisher" AS "p0" ON "a0"."publisher_fk" = "p0"."id"
    WHERE "a0"."age" > 30
      AND "p0"."name" = 'Acme'
    ORDER BY "a0"."age" DESC, "a0"."id" ASC
    LIMIT 10000
    "###);
}

#[test]
fn test_compilation_is_deterministic() {
    let catalog = library_catalog();
    let assembler = QueryAssembler::new(&catalog);
    let spec = acme_authors_over_30();

    let first = assembler.assemble("Author", &spec).unwrap();
    let second = assembler.assemble("Author", &spec).unwrap();
    assert_eq!(first, second);
    assert_eq!(first.to_sql(Dialect::Postgres), second.to_sql(Dialect::Postgres));
}

#[test]
fn test_tail_order_is_base_primary_key() {
    let catalog = library_catalog();
    let specs = [
        FilterSpec::new(),
        acme_authors_over_30(),
        FilterSpec::new().order(Ordering::new().nested("publisherFk", Ordering::new().asc("name"))),
    ];

    for spec in &specs {
        let query = QueryAssembler::new(&catalog).assemble("Author", spec).unwrap();
        assert_eq!(
            query.order_by.last(),
            Some(&OrderByExpr::asc(table_col("a0", "id")))
        );
    }
}

// ============================================================================
// Foreign keys without joins
// ============================================================================

#[test]
fn test_foreign_key_null_needs_no_join() {
    let spec = FilterSpec::new().filter(Filter::new().with("publisherFk", Clause::Null));
    let catalog = library_catalog();
    let query = QueryAssembler::new(&catalog).assemble("Author", &spec).unwrap();

    assert!(query.joins.is_empty());
    assert_eq!(query.predicates, vec![table_col("a0", "publisher_fk").is_null()]);
}

#[test]
fn test_foreign_key_list_needs_no_join() {
    let spec = FilterSpec::new().filter(Filter::new().with("publisherFk", Clause::list(["p1", "p2"])));
    let sql = compile_pg("Author", &spec);

    assert!(!sql.contains("JOIN"));
    assert!(sql.contains("WHERE \"a0\".\"publisher_fk\" IN ('p1', 'p2')"));
}

#[test]
fn test_id_forms_need_no_join() {
    let forms = [
        Clause::id("p1"),
        Clause::value("p1"),
        Clause::value(EntityRef::saved("Publisher", "p1")),
        Clause::op(Operator::Eq, "p1"),
    ];

    for clause in forms {
        let spec = FilterSpec::new().filter(Filter::new().with("publisherFk", clause.clone()));
        let sql = compile_pg("Author", &spec);
        assert!(!sql.contains("JOIN"), "{:?} should not join:\n{}", clause, sql);
        assert!(sql.contains("WHERE \"a0\".\"publisher_fk\" = 'p1'"), "{}", sql);
    }
}

#[test]
fn test_foreign_key_not_null() {
    let spec = FilterSpec::new()
        .filter(Filter::new().with("publisherFk", Clause::op(Operator::Ne, Value::Null)));
    let sql = compile_pg("Author", &spec);
    assert!(sql.contains("WHERE \"a0\".\"publisher_fk\" IS NOT NULL"));
}

// ============================================================================
// Null handling and sentinels
// ============================================================================

#[test]
fn test_primitive_null_round_trip() {
    let spec = FilterSpec::new().filter(
        Filter::new()
            .with("email", Clause::Null)
            .with("name", Clause::op(Operator::Ne, Value::Null)),
    );
    let sql = compile_pg("Author", &spec);
    assert!(sql.contains("WHERE \"a0\".\"email\" IS NULL\n  AND \"a0\".\"name\" IS NOT NULL"));
}

#[test]
fn test_unsaved_reference_compiles_to_empty_result() {
    let spec = FilterSpec::new()
        .filter(Filter::new().with("publisherFk", Clause::value(EntityRef::unsaved("Publisher"))));
    let sql = compile_pg("Author", &spec);
    assert!(sql.contains("WHERE 1 = 0"));
}

#[test]
fn test_absent_clause_is_ignored() {
    let spec = FilterSpec::new().filter(
        Filter::new()
            .with("age", Clause::Absent)
            .with("publisherFk", Clause::Absent),
    );
    let catalog = library_catalog();
    let query = QueryAssembler::new(&catalog).assemble("Author", &spec).unwrap();
    assert!(query.predicates.is_empty());
    assert!(query.joins.is_empty());
}

// ============================================================================
// Pagination
// ============================================================================

#[test]
fn test_pagination_defaults() {
    let catalog = library_catalog();
    let query = QueryAssembler::new(&catalog)
        .assemble("Author", &FilterSpec::new())
        .unwrap();
    assert_eq!(
        query.limit_offset,
        Some(LimitOffset {
            limit: Some(DEFAULT_LIMIT),
            offset: None
        })
    );

    let sql = compile_pg("Author", &FilterSpec::new().limit(20).offset(40));
    assert!(sql.ends_with("LIMIT 20 OFFSET 40"));

    let sql = compile_pg("Author", &FilterSpec::new().offset(0));
    assert!(!sql.contains("OFFSET"));
}

// ============================================================================
// Ordering
// ============================================================================

#[test]
fn test_nested_ordering_keeps_priority() {
    let spec = FilterSpec::new().order(
        Ordering::new()
            .nested("publisherFk", Ordering::new().asc("name"))
            .desc("age"),
    );
    let sql = compile_pg("Author", &spec);

    insta::assert_snapshot!(sql, @r###"
    SELECT
      "a0".*
    FROM "author" AS "a0"
    INNER JOIN "publisher" AS "p0" ON "a0"."publisher_fk" = "p0"."id"
    ORDER BY "p0"."name" ASC, "a0"."age" DESC, "a0"."id" ASC
    LIMIT 10000
    "###);
}

#[test]
fn test_direction_on_foreign_key_orders_by_column() {
    let spec = FilterSpec::new().order(Ordering::new().desc("publisherFk"));
    let sql = compile_pg("Author", &spec);
    assert!(!sql.contains("JOIN"));
    assert!(sql.contains("ORDER BY \"a0\".\"publisher_fk\" DESC, \"a0\".\"id\" ASC"));
}

// ============================================================================
// Errors
// ============================================================================

#[test]
fn test_unknown_field_is_fatal() {
    let catalog = library_catalog();
    let spec = FilterSpec::new().filter(Filter::new().with("height", Clause::value(180)));
    let err = compile(&catalog, "Author", &spec, &CompileOptions::default()).unwrap_err();
    assert_eq!(err.to_string(), "Unknown field 'height' on entity 'Author'");
}

#[test]
fn test_unknown_order_field_is_fatal() {
    let catalog = library_catalog();
    let spec = FilterSpec::new().order(Ordering::new().asc("height"));
    assert!(matches!(
        compile(&catalog, "Author", &spec, &CompileOptions::default()),
        Err(CompileError::UnknownField { .. })
    ));
}

#[test]
fn test_unsupported_shapes_are_fatal() {
    let catalog = library_catalog();
    let cases = [
        Filter::new().with("age", Clause::nested(Filter::new())),
        Filter::new().with("age", Clause::op(Operator::Lt, vec![1, 2])),
        Filter::new().with("age", Clause::op(Operator::Gte, Value::Null)),
        Filter::new().with("publisherFk", Clause::op(Operator::Like, "p%")),
        Filter::new().with("publisherFk", Clause::Unrecognized("between".into())),
    ];

    for filter in cases {
        let spec = FilterSpec::new().filter(filter);
        assert!(matches!(
            compile(&catalog, "Author", &spec, &CompileOptions::default()),
            Err(CompileError::Unsupported { .. })
        ));
    }
}

#[test]
fn test_codec_errors_are_fatal() {
    let catalog = library_catalog();
    let spec = FilterSpec::new().filter(Filter::new().with("age", Clause::value(f64::INFINITY)));
    assert!(matches!(
        compile(&catalog, "Author", &spec, &CompileOptions::default()),
        Err(CompileError::Codec(_))
    ));
}

#[test]
fn test_custom_codec_non_finite_is_error() {
    let catalog = library_catalog();
    let nan_codec = |value: &Value| -> CodecResult<Literal> {
        match value {
            Value::Int(_) => Ok(Literal::Float(f64::NAN)),
            other => DefaultCodec.lower(other),
        }
    };

    for filter in [
        Filter::new().with("age", Clause::value(30)),
        Filter::new().with("age", Clause::list([30, 40])),
        Filter::new().with("age", Clause::op(Operator::Gte, 30)),
    ] {
        let spec = FilterSpec::new().filter(filter);
        let result =
            compile_with_codec(&catalog, &nan_codec, "Author", &spec, &CompileOptions::default());
        assert!(matches!(
            result,
            Err(CompileError::Codec(CodecError::NonFinite(x))) if x.is_nan()
        ));
    }
}

#[test]
fn test_oversized_pagination_is_rejected() {
    let catalog = library_catalog();
    let spec = FilterSpec::from_json_str(
        r#"{"limit": 18446744073709551615, "offset": 9223372036854775808}"#,
    )
    .unwrap();

    let err = compile(&catalog, "Author", &spec, &CompileOptions::default()).unwrap_err();
    assert_eq!(
        err,
        CompileError::PaginationOutOfRange {
            key: "limit",
            value: u64::MAX
        }
    );

    let spec = FilterSpec::new().limit(10).offset(i64::MAX as u64 + 1);
    assert!(matches!(
        compile(&catalog, "Author", &spec, &CompileOptions::default()),
        Err(CompileError::PaginationOutOfRange { key: "offset", .. })
    ));

    let sql = compile_pg("Author", &FilterSpec::new().limit(i64::MAX as u64));
    assert!(sql.ends_with("LIMIT 9223372036854775807"));
}

// ============================================================================
// Concurrency
// ============================================================================

#[test]
fn test_parallel_compilations_share_catalog() {
    let catalog = library_catalog();
    let spec = acme_authors_over_30();
    let expected = compile(&catalog, "Author", &spec, &CompileOptions::default()).unwrap();

    let outputs: Vec<_> = std::thread::scope(|scope| {
        let handles: Vec<_> = (0..8)
            .map(|_| {
                scope.spawn(|| compile(&catalog, "Author", &spec, &CompileOptions::default()))
            })
            .collect();
        handles
            .into_iter()
            .map(|handle| handle.join().unwrap().unwrap())
            .collect()
    });

    assert_eq!(outputs.len(), 8);
    for output in outputs {
        assert_eq!(output.sql, expected.sql);
        assert_eq!(output.query, expected.query);
    }
}
