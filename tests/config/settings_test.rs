//! Loading relq.toml and compiling against the catalog it describes.

use std::fs;
use std::path::PathBuf;

use relq::compile::compile;
use relq::config::{Settings, SettingsError};
use relq::filter::FilterSpec;
use relq::schema::SchemaCatalog;
use relq::sql::Dialect;

const CONFIG: &str = r#"
[query]
dialect = "mysql"
default_limit = 100

[entities.Publisher]
table = "publisher"
columns = [{ field = "name" }]

[entities.Author]
table = "author"
columns = [
  { field = "age" },
  { field = "publisherFk", column = "publisher_fk", references = "Publisher" },
]
"#;

fn write_config(name: &str, contents: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("relq-settings-{}", std::process::id()));
    fs::create_dir_all(&dir).unwrap();
    let path = dir.join(name);
    fs::write(&path, contents).unwrap();
    path
}

#[test]
fn test_from_file_and_compile() {
    let path = write_config("relq.toml", CONFIG);
    let settings = Settings::from_file(&path).unwrap();

    let catalog = settings.catalog().unwrap();
    assert!(catalog.metadata_for("Author").is_some());

    let spec = FilterSpec::from_json_str(
        r#"{"where": {"publisherFk": {"name": "Acme"}}, "orderBy": {"age": "desc"}}"#,
    )
    .unwrap();
    let output = compile(&catalog, "Author", &spec, &settings.compile_options()).unwrap();

    assert_eq!(output.dialect, Dialect::MySql);
    assert_eq!(
        output.sql,
        "SELECT\n  `a0`.*\nFROM `author` AS `a0`\n\
         INNER JOIN `publisher` AS `p0` ON `a0`.`publisher_fk` = `p0`.`id`\n\
         WHERE `p0`.`name` = 'Acme'\n\
         ORDER BY `a0`.`age` DESC, `a0`.`id` ASC\n\
         LIMIT 100"
    );
}

#[test]
fn test_load_from_env_var() {
    let path = write_config("env.toml", CONFIG);
    std::env::set_var("RELQ_CONFIG", &path);
    let settings = Settings::load();
    std::env::remove_var("RELQ_CONFIG");

    let settings = settings.unwrap();
    assert_eq!(settings.query.default_limit, 100);
    assert_eq!(settings.entities.len(), 2);
}

#[test]
fn test_missing_file() {
    let err = Settings::from_file("/definitely/not/here/relq.toml").unwrap_err();
    assert!(matches!(err, SettingsError::FileNotFound(_)));
}

#[test]
fn test_duplicate_field_in_config() {
    let settings = Settings::from_toml_str(
        r#"
        [entities.Author]
        table = "author"
        columns = [{ field = "age" }, { field = "age", column = "years" }]
        "#,
    )
    .unwrap();
    let err = settings.catalog().unwrap_err();
    assert_eq!(
        err.to_string(),
        "Invalid entity catalog: Duplicate field 'age' on entity 'Author'"
    );
}
