//! Configuration documents used across the integration tests.

/// Flat application settings with a nested database section.
pub const VALID_YAML: &str = "\
app_name: TestApp
debug: true
port: 8000
database:
  host: localhost
  port: 5432
  name: testdb
  user: testuser
features:
  - auth
  - api
  - websocket
max_connections: 100
";

/// Three levels of nesting plus a list of objects.
pub const NESTED_YAML: &str = "\
level1:
  level2:
    level3:
      value: deep_value
      number: 42
      enabled: true
  items:
    - id: 1
      name: item1
    - id: 2
      name: item2
metadata:
  version: 1.0.0
  author: test
";

/// A document the YAML parser rejects.
pub const INVALID_YAML: &str = "invalid: yaml: content: [unclosed";

/// A `.env` file without a prefix.
pub const DOTENV: &str = "
APP_NAME=DotenvApp
DEBUG=false
PORT=7000
DATABASE_URL=sqlite:///test.db
SECRET_KEY=supersecret123
";

/// Render `pairs` as `.env` lines.
///
/// ```
/// use strata_config_test_helpers::fixtures::dotenv;
///
/// assert_eq!(dotenv(&[("A", "1"), ("B", "two")]), "A=1\nB=two\n");
/// ```
#[must_use]
pub fn dotenv(pairs: &[(&str, &str)]) -> String {
    pairs
        .iter()
        .map(|(key, value)| format!("{key}={value}\n"))
        .collect()
}
