//! Traits related to the source-control host
use async_trait::async_trait;

use crate::{
    forge::{
        config::RemoteConfig,
        types::{
            CreatePrRequest, Issue, Label, Milestone, MilestoneItem, OrgMember,
            OrgProject, PullRequest, Tag, UpdateIssueRequest,
        },
    },
    result::Result,
};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Forge: Send + Sync {
    fn remote_config(&self) -> RemoteConfig;
    /// Returns `None` when the issue does not exist.
    async fn get_issue(&self, number: u64) -> Result<Option<Issue>>;
    /// Whether a user or organization named after the repository owner
    /// exists.
    async fn owner_exists(&self) -> Result<bool>;
    async fn repo_exists(&self) -> Result<bool>;
    async fn branch_exists(&self, branch: &str) -> Result<bool>;
    /// Tags in the order the host lists them, newest first.
    async fn get_tags(&self) -> Result<Vec<Tag>>;
    async fn get_labels(&self) -> Result<Vec<Label>>;
    async fn get_milestones(&self) -> Result<Vec<Milestone>>;
    async fn get_milestone_items(
        &self,
        milestone_number: u64,
    ) -> Result<Vec<MilestoneItem>>;
    async fn get_org_members(&self) -> Result<Vec<OrgMember>>;
    async fn get_org_projects(&self) -> Result<Vec<OrgProject>>;
    async fn create_pr(&self, req: CreatePrRequest) -> Result<PullRequest>;
    async fn request_reviewers(
        &self,
        pr_number: u64,
        reviewers: Vec<String>,
    ) -> Result<()>;
    async fn update_issue(&self, req: UpdateIssueRequest) -> Result<()>;
    /// Add an issue or pull request, by node id, to a ProjectsV2 project.
    async fn add_to_project(
        &self,
        project_id: String,
        content_node_id: String,
    ) -> Result<()>;
}
