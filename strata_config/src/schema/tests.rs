//! Tests for schema-driven construction.

use std::collections::BTreeMap;

use rstest::rstest;
use serde::Deserialize;
use serde_json::{Value, json};

use super::{ExtraPolicy, FieldKind, FieldSpec, Schema, construct, default_value};
use crate::merge::RawMapping;
use crate::{FieldErrorKind, Settings, StrataError, ValidationErrors};

#[derive(Debug, Deserialize, PartialEq)]
struct Database {
    host: String,
    port: u16,
}

impl Settings for Database {
    fn schema() -> Schema {
        Schema::new(
            "Database",
            vec![
                FieldSpec::new("host", FieldKind::Str)
                    .with_default(|| default_value("localhost")),
                FieldSpec::new("port", FieldKind::int::<u16>()),
            ],
        )
    }
}

#[derive(Debug, Deserialize, PartialEq)]
struct App {
    app_name: String,
    port: u16,
    debug: bool,
    ratio: f64,
    features: Vec<String>,
    limits: BTreeMap<String, u32>,
    nickname: Option<String>,
    database: Database,
    #[serde(default)]
    tags: Vec<String>,
}

impl Settings for App {
    fn schema() -> Schema {
        Schema::new(
            "App",
            vec![
                FieldSpec::new("app_name", FieldKind::Str),
                FieldSpec::new("port", FieldKind::int::<u16>()).with_default(|| default_value(8000)),
                FieldSpec::new("debug", FieldKind::Bool).with_default(|| default_value(false)),
                FieldSpec::new("ratio", FieldKind::Float).with_default(|| default_value(0.5)),
                FieldSpec::new("features", FieldKind::Sequence(Box::new(FieldKind::Str)))
                    .with_default(|| json!([])),
                FieldSpec::new(
                    "limits",
                    FieldKind::Mapping(Box::new(FieldKind::int::<u32>())),
                )
                .with_default(|| json!({})),
                FieldSpec::new("nickname", FieldKind::Optional(Box::new(FieldKind::Str))),
                FieldSpec::new("database", FieldKind::Nested(Database::schema))
                    .with_default(|| json!({"host": "localhost", "port": 5432})),
                FieldSpec::new("tags", FieldKind::Sequence(Box::new(FieldKind::Str)))
                    .with_serde_default(),
            ],
        )
    }
}

#[derive(Debug, Deserialize, PartialEq)]
struct Open {
    name: String,
    extra: BTreeMap<String, Value>,
}

impl Settings for Open {
    fn schema() -> Schema {
        Schema::new(
            "Open",
            vec![
                FieldSpec::new("name", FieldKind::Str),
                FieldSpec::new("extra", FieldKind::Mapping(Box::new(FieldKind::Any))),
            ],
        )
        .with_extra_field("extra")
    }
}

#[derive(Debug, Deserialize, PartialEq)]
struct Lenient {
    name: String,
}

impl Settings for Lenient {
    fn schema() -> Schema {
        Schema::new("Lenient", vec![FieldSpec::new("name", FieldKind::Str)])
            .with_extra(ExtraPolicy::Ignore)
    }
}

fn mapping(value: Value) -> RawMapping {
    value.as_object().cloned().expect("test input is an object")
}

fn validation(err: StrataError) -> ValidationErrors {
    match err {
        StrataError::Validation(errors) => errors,
        other => panic!("expected validation error, got {other}"),
    }
}

#[test]
fn defaults_fill_absent_fields() {
    let app: App = construct(mapping(json!({"app_name": "TestApp"}))).expect("valid");
    assert_eq!(
        app,
        App {
            app_name: "TestApp".to_owned(),
            port: 8000,
            debug: false,
            ratio: 0.5,
            features: Vec::new(),
            limits: BTreeMap::new(),
            nickname: None,
            database: Database {
                host: "localhost".to_owned(),
                port: 5432,
            },
            tags: Vec::new(),
        }
    );
}

#[test]
fn strings_from_flat_sources_are_coerced() {
    let app: App = construct(mapping(json!({
        "app_name": "EnvApp",
        "port": " 9999 ",
        "debug": "yes",
        "ratio": "0.25",
        "features": "auth, cache,metrics",
        "limits": "{\"requests\": 10}",
        "nickname": "envy",
        "database": {"port": "3306"},
        "tags": "[\"a\", \"b\"]"
    })))
    .expect("valid");
    assert_eq!(app.port, 9999);
    assert!(app.debug);
    assert!((app.ratio - 0.25).abs() < f64::EPSILON);
    assert_eq!(app.features, ["auth", "cache", "metrics"]);
    assert_eq!(app.limits.get("requests"), Some(&10));
    assert_eq!(app.nickname.as_deref(), Some("envy"));
    assert_eq!(
        app.database,
        Database {
            host: "localhost".to_owned(),
            port: 3306,
        }
    );
    assert_eq!(app.tags, ["a", "b"]);
}

#[rstest]
#[case("true", true)]
#[case("FALSE", false)]
#[case("1", true)]
#[case("0", false)]
#[case("On", true)]
#[case("off", false)]
#[case("y", true)]
#[case("n", false)]
fn boolean_spellings(#[case] raw: &str, #[case] expected: bool) {
    let app: App = construct(mapping(json!({"app_name": "a", "debug": raw}))).expect("valid");
    assert_eq!(app.debug, expected);
}

#[test]
fn every_failure_is_reported_together() {
    let err = construct::<App>(mapping(json!({
        "port": "70000",
        "debug": "maybe",
        "features": 3,
        "database": {"port": "not-a-port", "replica": true},
        "unknown": 1
    })))
    .expect_err("invalid input");
    let errors = validation(err);
    assert_eq!(errors.len(), 6, "{errors}");
    assert_eq!(errors.find("app_name").map(|e| e.kind()), Some(&FieldErrorKind::Missing));
    assert_eq!(
        errors.find("port").map(|e| e.kind()),
        Some(&FieldErrorKind::OutOfRange { min: 0, max: 65_535 })
    );
    assert_eq!(
        errors.find("debug").map(|e| e.kind()),
        Some(&FieldErrorKind::TypeMismatch {
            expected: "boolean",
            found: "string",
        })
    );
    assert_eq!(
        errors.find("features").map(|e| e.kind()),
        Some(&FieldErrorKind::TypeMismatch {
            expected: "array",
            found: "number",
        })
    );
    assert!(errors.find("database.port").is_some());
    assert!(errors.find("database.replica").is_none(), "{errors}");
    assert_eq!(errors.find("unknown").map(|e| e.kind()), Some(&FieldErrorKind::Extra));
}

#[test]
fn field_without_default_is_required() {
    let err = construct::<Database>(mapping(json!({"host": "db"}))).expect_err("port missing");
    let errors = validation(err);
    assert_eq!(errors.len(), 1);
    assert_eq!(errors.find("port").map(|e| e.kind()), Some(&FieldErrorKind::Missing));
    assert_eq!(errors.to_string(), "1: port: field required");
}

#[test]
fn allowed_extras_are_collected() {
    let open: Open = construct(mapping(json!({"name": "n", "colour": "blue", "size": 3})))
        .expect("extras allowed");
    assert_eq!(open.extra.get("colour"), Some(&json!("blue")));
    assert_eq!(open.extra.get("size"), Some(&json!(3)));

    let bare: Open = construct(mapping(json!({"name": "n"}))).expect("no extras");
    assert!(bare.extra.is_empty());
}

#[test]
fn ignored_extras_are_dropped() {
    let lenient: Lenient =
        construct(mapping(json!({"name": "n", "colour": "blue"}))).expect("extras ignored");
    assert_eq!(lenient.name, "n");
}

#[derive(Debug, Deserialize, PartialEq)]
struct Pinned {
    database: Database,
}

impl Settings for Pinned {
    fn schema() -> Schema {
        fn strict_database() -> Schema {
            Database::schema().with_extra(ExtraPolicy::Forbid)
        }
        Schema::new(
            "Pinned",
            vec![FieldSpec::new("database", FieldKind::Nested(strict_database))],
        )
    }
}

#[test]
fn nested_schemas_ignore_unknown_keys_unless_declared() {
    let app: App = construct(mapping(json!({
        "app_name": "a",
        "database": {"host": "x", "port": 1, "extra_key": 1}
    })))
    .expect("nested extras ignored");
    assert_eq!(app.database.host, "x");

    let err = construct::<Pinned>(mapping(json!({
        "database": {"host": "x", "port": 1, "extra_key": 1}
    })))
    .expect_err("declared policy forbids extras");
    let errors = validation(err);
    assert_eq!(
        errors.find("database.extra_key").map(|e| e.kind()),
        Some(&FieldErrorKind::Extra)
    );
}

#[test]
fn serde_failures_surface_at_the_root() {
    #[derive(Debug, Deserialize)]
    struct Narrow {
        #[expect(dead_code, reason = "only deserialisation is exercised")]
        level: u8,
    }

    impl Settings for Narrow {
        fn schema() -> Schema {
            Schema::new("Narrow", vec![FieldSpec::new("level", FieldKind::Any)])
        }
    }

    let err = construct::<Narrow>(mapping(json!({"level": "high"}))).expect_err("serde rejects");
    let errors = validation(err);
    assert_eq!(errors.len(), 1);
    assert_eq!(errors.iter().next().map(|e| e.path()), Some(""));
}
