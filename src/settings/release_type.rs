use derive_builder::Builder;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::{
    error::AdminError,
    settings::{Validate, non_empty, require},
};

/// Placeholder in [`ReleaseType::pr_title`] replaced with the release version.
pub const VERSION_PLACEHOLDER: &str = "${VERSION}";

/// A named release flavor (e.g. "preview" or "production") that creates a
/// release pull request from the head branch to the base branch.
#[derive(
    Debug, Default, Clone, PartialEq, Serialize, Deserialize, JsonSchema, Builder,
)]
#[builder(setter(into), default)]
#[serde(rename_all = "camelCase")]
pub struct ReleaseType {
    /// Name of the release type.
    pub name: String,
    /// Pull request reviewer. Prompted for when not set.
    #[serde(default)]
    pub reviewer: Option<String>,
    /// Pull request assignee. Prompted for when not set.
    #[serde(default)]
    pub assignee: Option<String>,
    /// Head branch of the release pull request.
    pub head_branch: String,
    /// Base branch of the release pull request.
    pub base_branch: String,
    /// Path to the release notes generator settings file.
    #[serde(default)]
    pub gen_release_settings_file_path: Option<String>,
    /// Directory the release notes are written to.
    pub release_notes_dir_path: String,
    /// Path to the template file used as the release pull request body.
    pub release_pr_template_file_path: String,
    /// Labels set on the release pull request.
    pub release_labels: Vec<String>,
    /// Title of the pull request. May contain `${VERSION}`.
    pub pr_title: String,
}

impl ReleaseType {
    /// The configured reviewer, if any.
    pub fn reviewer(&self) -> Option<&str> {
        non_empty(&self.reviewer)
    }

    /// The configured assignee, if any.
    pub fn assignee(&self) -> Option<&str> {
        non_empty(&self.assignee)
    }

    /// The configured release notes generator settings path, if any.
    pub fn gen_release_settings_file_path(&self) -> Option<&str> {
        non_empty(&self.gen_release_settings_file_path)
    }

    /// Pull request title with the version placeholder substituted.
    pub fn title_for(&self, version: &str) -> String {
        self.pr_title.replace(VERSION_PLACEHOLDER, version)
    }
}

impl Validate for ReleaseType {
    fn validate(&self) -> Result<(), AdminError> {
        require(&self.name, "name")?;

        let context = |e: AdminError| match e {
            AdminError::Config(msg) => {
                AdminError::config(format!("release type '{}': {msg}", self.name))
            }
            other => other,
        };

        require(&self.head_branch, "headBranch").map_err(context)?;
        require(&self.base_branch, "baseBranch").map_err(context)?;
        require(&self.release_notes_dir_path, "releaseNotesDirPath")
            .map_err(context)?;
        require(&self.release_pr_template_file_path, "releasePrTemplateFilePath")
            .map_err(context)?;
        require(&self.pr_title, "prTitle").map_err(context)?;

        if self.release_labels.is_empty() {
            return Err(context(AdminError::config(
                "The 'releaseLabels' is not set.",
            )));
        }

        Ok(())
    }
}
