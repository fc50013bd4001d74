//! Shared helpers for working with `figment::Jail` in tests.
//!
//! A jail gives each test a fresh temporary working directory and restores
//! any environment variables it sets, so file-backed and environment sources
//! can be exercised without leaking state between tests.

use anyhow::{Result, anyhow};
use camino::{Utf8Path, Utf8PathBuf};

/// Executes `f` inside a [`figment::Jail`], returning the closure's output.
///
/// The jail is torn down automatically once the closure completes, even when
/// the closure returns an error.
///
/// # Errors
///
/// Returns an error if the jail initialisation fails or the closure returns a
/// [`figment::error::Error`].
///
/// # Examples
///
/// ```
/// use strata_config_test_helpers::jail::{jail_error, with_jail};
///
/// let contents = with_jail(|j| {
///     j.create_file("config.yaml", "port: 1\n")?;
///     std::fs::read_to_string("config.yaml").map_err(jail_error)
/// })?;
/// assert_eq!(contents, "port: 1\n");
/// # Ok::<(), anyhow::Error>(())
/// ```
pub fn with_jail<F, T>(f: F) -> Result<T>
where
    F: FnOnce(&mut figment::Jail) -> figment::error::Result<T>,
{
    let mut output = None;
    figment::Jail::try_with(|j| {
        output = Some(f(j)?);
        Ok(())
    })
    .map_err(|err| anyhow!(err.to_string()))?;
    output.ok_or_else(|| anyhow!("jail closure did not return a value"))
}

/// Converts any error implementing [`ToString`] into a [`figment::Error`].
///
/// Bridges `StrataError` and I/O failures into jail closures so `?` works.
#[expect(
    clippy::needless_pass_by_value,
    reason = "used as a `map_err` adapter, which hands over owned errors"
)]
pub fn jail_error<E: ToString>(err: E) -> figment::Error {
    figment::Error::from(err.to_string())
}

/// Writes raw `bytes` to `name` relative to the jail directory.
///
/// `Jail::create_file` only accepts UTF-8 text; this covers files in other
/// encodings.
///
/// # Errors
///
/// Returns an error when the file cannot be written.
pub fn write_bytes(jail: &figment::Jail, name: &str, bytes: &[u8]) -> figment::error::Result<()> {
    std::fs::write(jail.directory().join(name), bytes).map_err(jail_error)
}

/// Creates the directory `name` (and parents) inside the jail, returning its
/// UTF-8 path relative to the jail.
///
/// # Errors
///
/// Returns an error when the directory cannot be created.
pub fn create_dir(jail: &figment::Jail, name: &str) -> figment::error::Result<Utf8PathBuf> {
    std::fs::create_dir_all(jail.directory().join(name)).map_err(jail_error)?;
    Ok(Utf8Path::new(name).to_path_buf())
}
