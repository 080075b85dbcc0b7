//! Version file updates for the supported project file types.
use color_eyre::eyre::WrapErr;
use log::*;
use std::path::Path;

use crate::{error::AdminError, result::Result};

/// C# project file updater.
pub mod csproj;

/// JSON file updater.
pub mod json;

/// The kinds of version file a release can update.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VersionFile {
    /// A JSON document with the version at a dot separated key path.
    Json,
    /// A C# project file with `<Version>` and `<FileVersion>` elements.
    Csproj,
}

impl VersionFile {
    /// Select the updater for `path` from its extension.
    pub fn from_path(path: &Path) -> Result<Self> {
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_lowercase());

        match extension.as_deref() {
            Some("json") => Ok(VersionFile::Json),
            Some("csproj") => Ok(VersionFile::Csproj),
            _ => Err(AdminError::config(format!(
                "the version file '{}' is not supported, expected a '.json' or '.csproj' file",
                path.display()
            ))
            .into()),
        }
    }

    /// Write `version` into the file at `path`. Nothing is written when the
    /// file does not hold a version in the expected place.
    pub async fn update(
        &self,
        path: &Path,
        version: &str,
        key_path: &str,
    ) -> Result<()> {
        let content = tokio::fs::read_to_string(path)
            .await
            .wrap_err_with(|| {
                format!("failed to read version file: {}", path.display())
            })?;

        let updated = match self {
            VersionFile::Json => json::update_content(&content, key_path, version)?,
            VersionFile::Csproj => csproj::update_content(&content, version)?,
        };

        tokio::fs::write(path, updated).await.wrap_err_with(|| {
            format!("failed to write version file: {}", path.display())
        })?;

        info!("updated version in {} to {version}", path.display());

        Ok(())
    }
}

/// Update the version file at `path`, choosing the updater from the file
/// extension.
pub async fn update_version_file(
    path: &Path,
    version: &str,
    key_path: &str,
) -> Result<()> {
    VersionFile::from_path(path)?
        .update(path, version, key_path)
        .await
}
