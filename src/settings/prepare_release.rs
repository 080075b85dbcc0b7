use derive_builder::Builder;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::{
    error::AdminError,
    settings::{Validate, non_empty, release_type::ReleaseType, require},
};

/// Key path used when `versionJSONKeyPath` is not set.
pub const DEFAULT_VERSION_KEY_PATH: &str = "version";

/// Settings for the prepare for release command.
#[derive(
    Debug, Default, Clone, PartialEq, Serialize, Deserialize, JsonSchema, Builder,
)]
#[builder(setter(into), default)]
#[serde(rename_all = "camelCase")]
pub struct PrepareReleaseSettings {
    /// Owner of the repository.
    pub owner_name: String,
    /// Name of the repository.
    pub repo_name: String,
    /// Name of the organization project. Prompted for when not set.
    #[serde(default)]
    pub org_project_name: Option<String>,
    /// The available release types.
    pub release_types: Vec<ReleaseType>,
    /// Name of the environment variable holding the GitHub token.
    pub github_token_env_var_name: String,
    /// Full or relative path to the version file. The version is not updated
    /// when this is not set.
    #[serde(default)]
    pub version_file_path: Option<String>,
    /// Dot separated path to the JSON key that contains the version.
    #[serde(default, rename = "versionJSONKeyPath")]
    pub version_json_key_path: Option<String>,
    /// Value to prefix the release notes file name with.
    #[serde(default)]
    pub release_notes_file_prefix: Option<String>,
}

impl PrepareReleaseSettings {
    pub fn org_project_name(&self) -> Option<&str> {
        non_empty(&self.org_project_name)
    }

    pub fn version_file_path(&self) -> Option<&str> {
        non_empty(&self.version_file_path)
    }

    pub fn version_json_key_path(&self) -> &str {
        non_empty(&self.version_json_key_path)
            .unwrap_or(DEFAULT_VERSION_KEY_PATH)
    }

    pub fn release_notes_file_prefix(&self) -> &str {
        non_empty(&self.release_notes_file_prefix).unwrap_or_default()
    }

    /// Find a release type by name.
    pub fn release_type(&self, name: &str) -> Option<&ReleaseType> {
        self.release_types.iter().find(|t| t.name == name)
    }
}

impl Validate for PrepareReleaseSettings {
    fn validate(&self) -> Result<(), AdminError> {
        require(&self.owner_name, "ownerName")?;
        require(&self.repo_name, "repoName")?;
        require(&self.github_token_env_var_name, "githubTokenEnvVarName")?;

        if self.release_types.is_empty() {
            return Err(AdminError::config("The 'releaseTypes' is not set."));
        }

        for release_type in self.release_types.iter() {
            release_type.validate()?;
        }

        Ok(())
    }
}
