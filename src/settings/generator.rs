use derive_builder::Builder;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::{
    error::AdminError,
    settings::{Validate, non_empty, require},
};

/// Category used for items without a mapped label when
/// `otherCategoryName` is not set.
pub const DEFAULT_OTHER_CATEGORY: &str = "Other";

/// Extra section added to the top of the release notes.
#[derive(
    Debug, Default, Clone, PartialEq, Serialize, Deserialize, JsonSchema,
)]
pub struct ExtraInfo {
    pub title: String,
    pub text: String,
}

/// Settings for generating release notes.
#[derive(
    Debug, Default, Clone, PartialEq, Serialize, Deserialize, JsonSchema, Builder,
)]
#[builder(setter(into), default)]
#[serde(rename_all = "camelCase")]
pub struct GeneratorSettings {
    pub owner_name: String,
    pub repo_name: String,
    pub github_token_env_var_name: String,
    /// Milestone the notes are generated from.
    pub milestone_name: String,
    /// Header text at the top of the notes.
    pub header_text: String,
    #[serde(default)]
    pub version: Option<String>,
    #[serde(default)]
    pub environment: Option<String>,
    #[serde(default)]
    pub extra_info: Option<ExtraInfo>,
    /// Emojis stripped from issue and pull request titles.
    #[serde(default)]
    pub emojis_to_remove_from_title: Option<Vec<String>>,
    /// Issue label to category name.
    #[serde(default)]
    pub issue_category_label_mappings: Option<BTreeMap<String, String>>,
    /// Pull request label to category name.
    #[serde(default)]
    pub pr_category_label_mappings: Option<BTreeMap<String, String>>,
    /// Items with any of these labels are left out of the notes.
    #[serde(default)]
    pub ignore_labels: Option<Vec<String>>,
    /// Words replaced anywhere in a title.
    #[serde(default)]
    pub word_replacements: BTreeMap<String, String>,
    /// Words replaced only when they are the first word of a title.
    #[serde(default)]
    pub first_word_replacements: Option<BTreeMap<String, String>>,
    /// Word to markdown style (`bold`, `italic`, `code` or `bold-italic`).
    #[serde(default)]
    pub style_words_list: Option<BTreeMap<String, String>>,
    #[serde(default)]
    pub bolded_versions: Option<bool>,
    #[serde(default)]
    pub italic_versions: Option<bool>,
    #[serde(default)]
    pub other_category_name: Option<String>,
}

impl GeneratorSettings {
    pub fn other_category_name(&self) -> &str {
        non_empty(&self.other_category_name).unwrap_or(DEFAULT_OTHER_CATEGORY)
    }

    pub fn environment(&self) -> Option<&str> {
        non_empty(&self.environment)
    }
}

impl Validate for GeneratorSettings {
    fn validate(&self) -> Result<(), AdminError> {
        require(&self.owner_name, "ownerName")?;
        require(&self.repo_name, "repoName")?;
        require(&self.header_text, "headerText")?;
        Ok(())
    }
}
