//! Unit tests for error rendering and validation collections.

use camino::Utf8Path;
use rstest::rstest;

use super::{FieldErrorKind, StrataError, ValidationErrors};
use crate::merge::SourceKind;

#[rstest]
#[case(Some(".env"), Some(2), "Malformed dotenv source in '.env' at line 2: bad")]
#[case(Some(".env"), None, "Malformed dotenv source in '.env': bad")]
#[case(None, Some(7), "Malformed dotenv source at line 7: bad")]
#[case(None, None, "Malformed dotenv source: bad")]
fn malformed_messages_include_known_location(
    #[case] path: Option<&str>,
    #[case] line: Option<usize>,
    #[case] expected: &str,
) {
    let err = StrataError::malformed(SourceKind::DotEnv, path.map(Utf8Path::new), line, "bad");
    assert_eq!(err.to_string(), expected);
    assert!(err.is_malformed());
}

#[test]
fn validation_errors_render_numbered_lines() {
    let mut errors = ValidationErrors::default();
    errors.push("app_name", FieldErrorKind::Missing);
    errors.push(
        "port",
        FieldErrorKind::TypeMismatch {
            expected: "integer",
            found: "string",
        },
    );
    errors.push("", FieldErrorKind::Custom("boom".into()));

    let rendered = errors.to_string();
    assert_eq!(
        rendered,
        "1: app_name: field required\n2: port: expected integer, found string\n3: <root>: boom"
    );
}

#[test]
fn into_result_distinguishes_empty_collections() {
    assert!(ValidationErrors::default().into_result().is_ok());
    let err = ValidationErrors::single("port", "too large")
        .into_result()
        .expect_err("non-empty collection should fail");
    assert_eq!(err.len(), 1);
    assert_eq!(
        err.find("port").map(|e| e.kind().clone()),
        Some(FieldErrorKind::Custom("too large".into()))
    );
}

#[test]
fn serde_errors_become_root_validation_failures() {
    let serde_err = serde_json::from_str::<u8>("\"nope\"").expect_err("string is not a u8");
    let err = StrataError::from(serde_err);
    let errors = err.validation_errors().expect("validation variant");
    assert_eq!(errors.len(), 1);
    assert_eq!(errors.iter().next().map(|e| e.path()), Some(""));
}
