use derive_builder::Builder;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::{
    error::AdminError,
    settings::{Validate, require},
};

/// Settings for the create pull request command.
#[derive(
    Debug, Default, Clone, PartialEq, Serialize, Deserialize, JsonSchema, Builder,
)]
#[builder(setter(into), default)]
#[serde(rename_all = "camelCase")]
pub struct CreatePrSettings {
    /// Name of the repository owner.
    pub owner_name: String,
    /// Name of the repository.
    pub repo_name: String,
    /// Name of the environment variable holding the GitHub token.
    pub github_token_env_var_name: String,
    /// Base branches to choose from when creating a pull request.
    pub base_branches: Vec<String>,
}

impl CreatePrSettings {
    /// Base branches with surrounding whitespace removed.
    pub fn trimmed_base_branches(&self) -> Vec<String> {
        self.base_branches
            .iter()
            .map(|b| b.trim().to_string())
            .filter(|b| !b.is_empty())
            .collect()
    }
}

impl Validate for CreatePrSettings {
    fn validate(&self) -> Result<(), AdminError> {
        require(&self.owner_name, "ownerName")?;
        require(&self.repo_name, "repoName")?;
        require(&self.github_token_env_var_name, "githubTokenEnvVarName")?;

        if self.trimmed_base_branches().is_empty() {
            return Err(AdminError::config("The base branches are not set."));
        }

        Ok(())
    }
}
