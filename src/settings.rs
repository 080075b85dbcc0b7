//! Loading and validation of the JSON settings files.
//!
//! Settings are deserialized into concrete types with explicit required and
//! optional members, so a missing required member fails deserialization.
//! After deserialization each type validates that required values are not
//! empty. Any failure is an [`AdminError::Config`], reported before the
//! workflow touches anything.
use color_eyre::eyre::WrapErr;
use log::*;
use secrecy::SecretString;
use serde::de::DeserializeOwned;
use std::{env, path::Path};

use crate::{error::AdminError, result::Result};

pub mod create_pr;
pub mod generator;
pub mod prepare_release;
pub mod release_type;

pub use create_pr::CreatePrSettings;
pub use generator::{ExtraInfo, GeneratorSettings};
pub use prepare_release::PrepareReleaseSettings;
pub use release_type::ReleaseType;

/// Default location of the create pull request settings file.
pub const CREATE_PR_SETTINGS_FILE: &str = "./create-pr-settings.json";

/// Default location of the prepare release settings file.
pub const PREPARE_RELEASE_SETTINGS_FILE: &str =
    "./dev-tools/prepare-release-settings.json";

/// Post-deserialization checks for a settings type.
pub trait Validate {
    fn validate(&self) -> std::result::Result<(), AdminError>;
}

/// Read, parse and validate a settings file.
pub fn load_settings<T>(path: &Path) -> Result<T>
where
    T: DeserializeOwned + Validate,
{
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| path.display().to_string());

    if !path.is_file() {
        return Err(AdminError::config(format!(
            "The settings file '{file_name}' does not exist at '{}'.",
            path.display()
        ))
        .into());
    }

    debug!("loading settings from: {}", path.display());

    let content = std::fs::read_to_string(path)
        .wrap_err_with(|| format!("failed to read '{}'", path.display()))?;

    let settings: T = serde_json::from_str(&content).map_err(|e| {
        AdminError::config(format!(
            "There was a problem parsing the file '{file_name}'.\n{e}"
        ))
    })?;

    settings.validate()?;

    Ok(settings)
}

/// Resolve a GitHub token from the environment variable with the given name.
pub fn resolve_token(env_var_name: &str) -> Result<SecretString> {
    let token = env::var(env_var_name).unwrap_or_default();
    let token = token.trim();

    if token.is_empty() {
        return Err(AdminError::TokenNotSet(env_var_name.to_string()).into());
    }

    Ok(SecretString::from(token.to_string()))
}

/// Reads a token that may be absent. An empty token means anonymous access.
pub fn optional_token(env_var_name: &str) -> SecretString {
    let token = env::var(env_var_name).unwrap_or_default();
    SecretString::from(token.trim().to_string())
}

/// Returns the trimmed value if it is present and not empty.
pub fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

/// Fails with a configuration error naming the field if the value is empty.
pub(crate) fn require(
    value: &str,
    field: &str,
) -> std::result::Result<(), AdminError> {
    if value.trim().is_empty() {
        return Err(AdminError::config(format!("The '{field}' is not set.")));
    }

    Ok(())
}
