//! Records exchanged with the source-control host.
use derive_builder::Builder;
use serde::Deserialize;
use strum::{Display, EnumString};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Display, EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum IssueState {
    Open,
    Closed,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Issue {
    pub number: u64,
    pub title: String,
    pub state: IssueState,
}

impl Issue {
    pub fn is_open(&self) -> bool {
        self.state == IssueState::Open
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PullRequest {
    pub number: u64,
    /// GraphQL node id, used to add the pull request to a project.
    pub node_id: String,
    pub html_url: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Label {
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Milestone {
    pub number: u64,
    pub title: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct OrgMember {
    pub login: String,
}

/// A ProjectsV2 organization project.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct OrgProject {
    pub id: String,
    pub title: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Tag {
    pub name: String,
}

/// An issue or pull request attached to a milestone.
#[derive(Debug, Clone, Default, PartialEq, Builder)]
#[builder(setter(into), default)]
pub struct MilestoneItem {
    pub number: u64,
    pub title: String,
    pub html_url: String,
    pub labels: Vec<String>,
    pub is_pull_request: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Builder)]
#[builder(setter(into), default)]
pub struct CreatePrRequest {
    pub head_branch: String,
    pub base_branch: String,
    pub title: String,
    pub body: String,
    pub draft: bool,
    pub maintainer_can_modify: bool,
}

/// Partial update of an issue or pull request. Only fields that are set are
/// sent; `labels` replaces the existing labels.
#[derive(Debug, Clone, Default, PartialEq, Builder)]
#[builder(setter(into, strip_option), default)]
pub struct UpdateIssueRequest {
    pub number: u64,
    pub assignees: Option<Vec<String>>,
    pub labels: Option<Vec<String>>,
    pub milestone: Option<u64>,
}
