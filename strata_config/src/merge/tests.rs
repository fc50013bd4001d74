//! Unit tests for precedence-ordered merging.

use rstest::rstest;
use serde_json::{Value, json};

use super::{MergeComposer, MergeLayer, RawMapping, SourceKind, SourceOrder, compose, merge_lower};

fn layer(kind: SourceKind, value: Value) -> MergeLayer<'static> {
    MergeLayer::from_value(kind, value).expect("test layers are objects")
}

fn object(value: Value) -> RawMapping {
    value.as_object().cloned().expect("test values are objects")
}

#[rstest]
#[case::scalar_over_scalar(json!({"a": 1}), json!({"a": 2}), json!({"a": 1}))]
#[case::absent_key_copied(json!({"a": 1}), json!({"b": 2}), json!({"a": 1, "b": 2}))]
#[case::objects_recurse(
    json!({"db": {"port": 1}}),
    json!({"db": {"host": "h", "port": 2}}),
    json!({"db": {"host": "h", "port": 1}})
)]
#[case::scalar_beats_lower_object(json!({"db": "url"}), json!({"db": {"host": "h"}}), json!({"db": "url"}))]
#[case::object_beats_lower_scalar(json!({"db": {"host": "h"}}), json!({"db": "url"}), json!({"db": {"host": "h"}}))]
#[case::sequences_not_concatenated(json!({"xs": [1]}), json!({"xs": [2, 3]}), json!({"xs": [1]}))]
#[case::null_still_wins(json!({"a": null}), json!({"a": 1}), json!({"a": null}))]
fn merge_lower_keeps_higher_precedence(
    #[case] acc: Value,
    #[case] incoming: Value,
    #[case] expected: Value,
) {
    let mut merged = object(acc);
    merge_lower(&mut merged, object(incoming));
    assert_eq!(Value::Object(merged), expected);
}

#[test]
fn compose_records_leaf_provenance_and_files() {
    let merged = compose([
        layer(SourceKind::Init, json!({"value": "from_init"})),
        layer(SourceKind::Environment, json!({"value": "from_env", "env_only": "e"})),
        layer(SourceKind::DotEnv, json!({"dotenv_only": "d"})).with_path(".env"),
        layer(SourceKind::StructuredFile, json!({"value": "from_yaml", "yaml_only": "y", "db": {"port": 1}}))
            .with_path("config.yaml"),
    ]);

    assert_eq!(
        Value::Object(merged.value().clone()),
        json!({
            "value": "from_init",
            "env_only": "e",
            "dotenv_only": "d",
            "yaml_only": "y",
            "db": {"port": 1}
        })
    );
    assert_eq!(merged.source_of("value"), Some(SourceKind::Init));
    assert_eq!(merged.source_of("env_only"), Some(SourceKind::Environment));
    assert_eq!(merged.source_of("dotenv_only"), Some(SourceKind::DotEnv));
    assert_eq!(merged.source_of("db.port"), Some(SourceKind::StructuredFile));
    let files: Vec<&str> = merged.files().iter().map(|p| p.as_str()).collect();
    assert_eq!(files, vec![".env", "config.yaml"]);
}

#[test]
fn compose_skips_empty_layers() {
    let merged = compose([
        MergeLayer::empty(SourceKind::Environment),
        MergeLayer::empty(SourceKind::StructuredFile).with_path("missing.yaml"),
    ]);
    assert!(merged.value().is_empty());
    assert!(merged.files().is_empty());
}

fn shuffled_composer() -> MergeComposer {
    let mut composer = MergeComposer::default();
    composer.push_layer(layer(SourceKind::StructuredFile, json!({"port": 1})));
    composer.push_layer(layer(SourceKind::DotEnv, json!({"port": 2})));
    composer.push_layer(layer(SourceKind::Init, json!({"port": 4})));
    composer.push_layer(layer(SourceKind::Environment, json!({"port": 3})));
    composer
}

#[test]
fn composer_orders_layers_regardless_of_push_order() {
    let kinds: Vec<SourceKind> = shuffled_composer().into_iter().map(|l| l.kind()).collect();
    assert_eq!(
        kinds,
        vec![
            SourceKind::Init,
            SourceKind::Environment,
            SourceKind::DotEnv,
            SourceKind::StructuredFile,
        ]
    );

    let merged = shuffled_composer().compose();
    assert_eq!(merged.value().get("port"), Some(&json!(4)));
    assert_eq!(merged.source_of("port"), Some(SourceKind::Init));
}

#[test]
fn custom_order_changes_the_winner() {
    let order = SourceOrder::new([
        SourceKind::Init,
        SourceKind::Environment,
        SourceKind::SecretFile,
        SourceKind::DotEnv,
        SourceKind::StructuredFile,
    ])
    .expect("valid permutation");
    let mut composer = MergeComposer::new(order);
    composer.push_layer(layer(SourceKind::DotEnv, json!({"token": "dotenv"})));
    composer.push_layer(layer(SourceKind::SecretFile, json!({"token": "secret"})));
    let merged = composer.compose();
    assert_eq!(merged.value().get("token"), Some(&json!("secret")));
}

#[rstest]
#[case::duplicate(vec![SourceKind::Init, SourceKind::Init, SourceKind::DotEnv, SourceKind::SecretFile, SourceKind::StructuredFile])]
#[case::missing(vec![SourceKind::Init, SourceKind::Environment])]
#[case::empty(vec![])]
fn invalid_orders_are_rejected(#[case] kinds: Vec<SourceKind>) {
    let err = SourceOrder::new(kinds).expect_err("order should be rejected");
    assert!(err.to_string().starts_with("Invalid source order"));
}

#[test]
fn default_order_matches_documented_precedence() {
    let order = SourceOrder::default();
    let kinds: Vec<SourceKind> = order.iter().collect();
    assert_eq!(kinds, SourceKind::ALL.to_vec());
    assert_eq!(
        order.to_string(),
        "init, environment, dotenv, secrets, yaml"
    );
}
