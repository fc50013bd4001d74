//! Tests for the raw sources.

use camino::Utf8PathBuf;
use rstest::{fixture, rstest};
use serde_json::{Value, json};
use tempfile::TempDir;

use super::{DotEnvSource, EnvSource, InitSource, KeyRules, RawSource, SecretsSource, YamlSource};
use crate::schema::{FieldKind, FieldSpec, Schema};
use crate::{FileEncoding, SourceKind, StrataError};

struct Scratch {
    _dir: TempDir,
    root: Utf8PathBuf,
}

impl Scratch {
    fn write(&self, name: &str, contents: &str) -> Utf8PathBuf {
        let path = self.root.join(name);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).expect("create parent dir");
        }
        std::fs::write(&path, contents).expect("write fixture");
        path
    }
}

#[fixture]
fn scratch() -> Scratch {
    let dir = tempfile::tempdir().expect("create temp dir");
    let root = Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).expect("utf-8 temp dir");
    Scratch { _dir: dir, root }
}

fn app_rules() -> KeyRules {
    KeyRules::new("APP_", Some("__"), false)
}

fn fetched(source: &impl RawSource) -> Value {
    let layer = source.fetch().expect("source fetch succeeds");
    assert_eq!(layer.kind(), source.kind());
    Value::Object(layer.into_value())
}

#[rstest]
#[case::lowercase_key("app_name", Some("name"))]
#[case::mixed_case_prefix("App_Name", Some("name"))]
#[case::other_prefix("OTHER_NAME", None)]
#[case::prefix_only("APP_", None)]
fn case_insensitive_prefix_is_stripped(#[case] raw: &str, #[case] expected: Option<&str>) {
    assert_eq!(app_rules().strip(raw).as_deref(), expected);
}

#[test]
fn case_sensitive_rules_keep_key_case() {
    let rules = KeyRules::new("APP_", Some("__"), true);
    assert_eq!(rules.strip("APP_Name").as_deref(), Some("Name"));
    assert_eq!(rules.strip("app_Name"), None);
}

fn camel_schema() -> Schema {
    fn replica() -> Schema {
        Schema::new("Replica", vec![FieldSpec::new("hostName", FieldKind::Str)])
    }
    Schema::new(
        "Camel",
        vec![
            FieldSpec::new("appName", FieldKind::Str),
            FieldSpec::new(
                "readReplica",
                FieldKind::Optional(Box::new(FieldKind::Nested(replica))),
            ),
        ],
    )
}

#[rstest]
#[case::top_level("APP_APPNAME", "appName")]
#[case::through_optional_nested("app_readreplica__HOSTNAME", "readReplica__hostName")]
#[case::unknown_nested_segment("APP_READREPLICA__Port", "readReplica__port")]
#[case::undeclared_field("APP_Other__Key", "other__key")]
fn keys_take_declared_spelling(#[case] raw: &str, #[case] expected: &str) {
    let rules = app_rules().with_schema(camel_schema());
    assert_eq!(rules.strip(raw).as_deref(), Some(expected));
}

#[test]
fn case_sensitive_rules_ignore_declared_spelling() {
    let rules = KeyRules::new("APP_", Some("__"), true).with_schema(camel_schema());
    assert_eq!(rules.strip("APP_APPNAME").as_deref(), Some("APPNAME"));
}

#[test]
fn env_source_uses_declared_spelling() {
    let source = EnvSource::new(app_rules().with_schema(camel_schema()))
        .restrict_to(["appName", "readReplica"])
        .with_vars([("APP_APPNAME", "Camel"), ("APP_READREPLICA__HOSTNAME", "r.db")]);
    assert_eq!(
        fetched(&source),
        json!({"appName": "Camel", "readReplica": {"hostName": "r.db"}})
    );
}

#[rstest]
#[case::exact_spelling_wins(&[("APP_PORT", "2"), ("app_port", "3")], "3")]
#[case::last_in_sorted_order_wins(&[("app_Port", "1"), ("APP_PORT", "2"), ("APP_Port", "4")], "1")]
fn case_only_duplicates_keep_one_value(#[case] vars: &[(&str, &str)], #[case] expected: &str) {
    let source = EnvSource::new(app_rules()).with_vars(vars.iter().copied());
    assert_eq!(fetched(&source), json!({"port": expected}));
}

#[test]
fn env_source_expands_declared_keys_only() {
    let source = EnvSource::new(app_rules())
        .restrict_to(["app_name", "database"])
        .with_vars([
            ("APP_APP_NAME", "EnvApp"),
            ("APP_DATABASE__HOST", "db.example.com"),
            ("APP_DATABASE__PORT", "5432"),
            ("APP_UNRELATED", "ignored"),
            ("PATH", "/usr/bin"),
        ]);
    assert_eq!(
        fetched(&source),
        json!({
            "app_name": "EnvApp",
            "database": {"host": "db.example.com", "port": "5432"}
        })
    );
}

#[test]
fn env_source_without_delimiter_keeps_flat_keys() {
    let source = EnvSource::new(KeyRules::new("APP_", None, false))
        .restrict_to(["database__host"])
        .with_vars([("APP_DATABASE__HOST", "h")]);
    assert_eq!(fetched(&source), json!({"database__host": "h"}));
}

#[test]
fn env_source_reports_collisions() {
    let source = EnvSource::new(app_rules())
        .restrict_to(["database"])
        .with_vars([("APP_DATABASE", "url"), ("APP_DATABASE__HOST", "h")]);
    let err = source.fetch().expect_err("scalar and object collide");
    assert!(matches!(
        err,
        StrataError::KeyCollision { kind: SourceKind::Environment, ref path } if path == "database"
    ));
}

#[rstest]
fn dotenv_source_reads_literal_values(scratch: Scratch) {
    let path = scratch.write(
        ".env",
        "# settings\n\nAPP_NAME=DotenvApp\nAPP_GREETING = \"hello $USER\" \nAPP_DB__PORT=5432\nOTHER=skip\n",
    );
    let source = DotEnvSource::new(&path, FileEncoding::Utf8, app_rules());
    let layer = source.fetch().expect("well-formed dotenv");
    assert_eq!(layer.path(), Some(path.as_path()));
    assert_eq!(
        Value::Object(layer.into_value()),
        json!({
            "name": "DotenvApp",
            "greeting": "\"hello $USER\"",
            "db": {"port": "5432"}
        })
    );
}

#[rstest]
fn dotenv_source_keeps_the_last_repeated_key(scratch: Scratch) {
    let path = scratch.write(".env", "APP_NAME=first\nAPP_NAME=second\n");
    let source = DotEnvSource::new(&path, FileEncoding::Utf8, app_rules());
    assert_eq!(fetched(&source), json!({"name": "second"}));
}

#[rstest]
fn dotenv_source_tolerates_missing_file(scratch: Scratch) {
    let source = DotEnvSource::new(scratch.root.join(".env"), FileEncoding::Utf8, app_rules());
    assert_eq!(fetched(&source), json!({}));
}

#[rstest]
#[case::missing_equals("APP_A=1\nAPP_B\n", 2)]
#[case::empty_key("\n\n=value\n", 3)]
fn dotenv_source_reports_malformed_line(
    scratch: Scratch,
    #[case] contents: &str,
    #[case] line: usize,
) {
    let path = scratch.write(".env", contents);
    let err = DotEnvSource::new(&path, FileEncoding::Utf8, app_rules())
        .fetch()
        .expect_err("malformed line");
    assert!(err.is_malformed());
    assert!(err.to_string().contains(&format!("at line {line}")), "{err}");
}

#[rstest]
fn dotenv_source_decodes_latin1(scratch: Scratch) {
    let path = scratch.root.join(".env");
    std::fs::write(&path, b"APP_NAME=Caf\xe9\n").expect("write fixture");
    let source = DotEnvSource::new(&path, FileEncoding::Latin1, app_rules());
    assert_eq!(fetched(&source), json!({"name": "Café"}));
}

#[rstest]
fn secrets_source_trims_file_contents(scratch: Scratch) {
    scratch.write("secrets/app_api_key", "  s3cr3t\n");
    scratch.write("secrets/app_database__password", "hunter2\n");
    scratch.write("secrets/app_unknown", "ignored");
    scratch.write("secrets/nested/app_api_key", "not a regular file entry");
    let source = SecretsSource::new(scratch.root.join("secrets"), app_rules())
        .restrict_to(["api_key", "database"]);
    assert_eq!(
        fetched(&source),
        json!({"api_key": "s3cr3t", "database": {"password": "hunter2"}})
    );
}

#[rstest]
fn secrets_source_tolerates_missing_dir(scratch: Scratch) {
    let source = SecretsSource::new(scratch.root.join("absent"), app_rules());
    assert_eq!(fetched(&source), json!({}));
}

#[rstest]
fn secrets_source_rejects_a_file_path(scratch: Scratch) {
    let path = scratch.write("secrets", "not a directory");
    let err = SecretsSource::new(&path, app_rules())
        .fetch()
        .expect_err("file is not a directory");
    assert!(matches!(err, StrataError::File { .. }));
}

#[test]
fn init_source_requires_an_object() {
    let err = InitSource::new(json!([1, 2])).fetch().expect_err("array init");
    assert!(matches!(err, StrataError::Malformed { kind: SourceKind::Init, .. }));
    assert_eq!(fetched(&InitSource::empty()), json!({}));
    assert_eq!(
        fetched(&InitSource::new(json!({"value": "from_init"}))),
        json!({"value": "from_init"})
    );
}

#[rstest]
fn yaml_source_records_its_path(scratch: Scratch) {
    let path = scratch.write("config.yaml", "port: 8080\n");
    let layer = YamlSource::new(&path, FileEncoding::Utf8)
        .fetch()
        .expect("valid yaml");
    assert_eq!(layer.kind(), SourceKind::StructuredFile);
    assert_eq!(layer.path(), Some(path.as_path()));
    assert_eq!(layer.value().get("port"), Some(&json!(8080)));
}
