//! Shared fixtures for integration tests: a small library schema and SQL
//! validation through sqlparser.

#![allow(dead_code)]

use relq::schema::{Catalog, ColumnDescriptor, EntityMetadata};
use relq::sql::Dialect;
use sqlparser::dialect::{DuckDbDialect, MsSqlDialect, MySqlDialect, PostgreSqlDialect};
use sqlparser::parser::Parser;

pub const ALL_DIALECTS: [Dialect; 4] = [
    Dialect::Postgres,
    Dialect::DuckDb,
    Dialect::MySql,
    Dialect::TSql,
];

/// Publisher <- Author (self-referencing mentor) <- Book, plus AuthorDetail.
pub fn library_catalog() -> Catalog {
    let publisher = EntityMetadata::new("Publisher", "publisher")
        .with_column(ColumnDescriptor::primitive("name", "name"))
        .unwrap()
        .with_column(ColumnDescriptor::primitive("country", "country"))
        .unwrap();

    let author = EntityMetadata::new("Author", "author")
        .with_column(ColumnDescriptor::primitive("name", "name"))
        .unwrap()
        .with_column(ColumnDescriptor::primitive("age", "age"))
        .unwrap()
        .with_column(ColumnDescriptor::primitive("email", "email"))
        .unwrap()
        .with_column(ColumnDescriptor::foreign_key(
            "publisherFk",
            "publisher_fk",
            "Publisher",
        ))
        .unwrap()
        .with_column(ColumnDescriptor::foreign_key("mentorFk", "mentor_fk", "Author"))
        .unwrap()
        .with_column(ColumnDescriptor::foreign_key(
            "detailFk",
            "detail_fk",
            "AuthorDetail",
        ))
        .unwrap();

    let detail = EntityMetadata::new("AuthorDetail", "author_detail")
        .with_primary_key("detail_id")
        .with_column(ColumnDescriptor::primitive("bio", "bio"))
        .unwrap();

    let book = EntityMetadata::new("Book", "book")
        .with_column(ColumnDescriptor::primitive("title", "title"))
        .unwrap()
        .with_column(ColumnDescriptor::primitive("price", "price"))
        .unwrap()
        .with_column(ColumnDescriptor::foreign_key("authorFk", "author_fk", "Author"))
        .unwrap()
        .with_column(ColumnDescriptor::foreign_key("editorFk", "editor_fk", "Author"))
        .unwrap();

    Catalog::builder()
        .register(publisher)
        .unwrap()
        .register(author)
        .unwrap()
        .register(detail)
        .unwrap()
        .register(book)
        .unwrap()
        .build()
        .unwrap()
}

/// Parse `sql` with the matching sqlparser dialect.
pub fn validate_sql(sql: &str, dialect: Dialect) -> Result<(), String> {
    let parser_dialect: Box<dyn sqlparser::dialect::Dialect> = match dialect {
        Dialect::Postgres => Box::new(PostgreSqlDialect {}),
        Dialect::DuckDb => Box::new(DuckDbDialect {}),
        Dialect::MySql => Box::new(MySqlDialect {}),
        Dialect::TSql => Box::new(MsSqlDialect {}),
    };

    Parser::parse_sql(&*parser_dialect, sql)
        .map(|_| ())
        .map_err(|e| format!("Invalid SQL for {:?}: {}\nSQL: {}", dialect, e, sql))
}
