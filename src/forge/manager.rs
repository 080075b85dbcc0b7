//! Manager that wraps a forge implementation
use log::*;

use crate::{
    forge::{
        config::RemoteConfig,
        traits::Forge,
        types::{
            CreatePrRequest, Issue, Milestone, MilestoneItem, OrgProject,
            PullRequest, Tag, UpdateIssueRequest,
        },
    },
    result::Result,
};

/// Wraps a [`Forge`] and adds the lookups the workflows are built from.
pub struct ForgeManager {
    forge: Box<dyn Forge>,
    remote_config: RemoteConfig,
}

impl ForgeManager {
    pub fn new(forge: Box<dyn Forge>) -> Self {
        let remote_config = forge.remote_config();
        Self {
            forge,
            remote_config,
        }
    }

    pub fn owner(&self) -> &str {
        &self.remote_config.owner
    }

    pub fn repo(&self) -> &str {
        &self.remote_config.repo
    }

    pub async fn get_issue(&self, number: u64) -> Result<Option<Issue>> {
        debug!("fetching issue #{number}");
        self.forge.get_issue(number).await
    }

    pub async fn owner_exists(&self) -> Result<bool> {
        debug!("checking if owner '{}' exists", self.owner());
        self.forge.owner_exists().await
    }

    pub async fn repo_exists(&self) -> Result<bool> {
        self.forge.repo_exists().await
    }

    pub async fn branch_exists(&self, branch: &str) -> Result<bool> {
        debug!("checking if branch '{branch}' exists");
        self.forge.branch_exists(branch).await
    }

    pub async fn get_tags(&self) -> Result<Vec<Tag>> {
        self.forge.get_tags().await
    }

    /// Name of the newest tag, if the repository has any.
    pub async fn latest_tag(&self) -> Result<Option<String>> {
        let tags = self.forge.get_tags().await?;
        Ok(tags.into_iter().next().map(|t| t.name))
    }

    pub async fn tag_exists(&self, name: &str) -> Result<bool> {
        let tags = self.forge.get_tags().await?;
        Ok(tags.iter().any(|t| t.name == name))
    }

    /// Labels from `wanted` that do not exist in the repository.
    pub async fn missing_labels(&self, wanted: &[String]) -> Result<Vec<String>> {
        let labels = self.forge.get_labels().await?;

        let missing = wanted
            .iter()
            .filter(|name| !labels.iter().any(|l| &l.name == *name))
            .cloned()
            .collect();

        Ok(missing)
    }

    pub async fn find_milestone(&self, title: &str) -> Result<Option<Milestone>> {
        let milestones = self.forge.get_milestones().await?;
        Ok(milestones.into_iter().find(|m| m.title == title))
    }

    pub async fn get_milestone_items(
        &self,
        milestone_number: u64,
    ) -> Result<Vec<MilestoneItem>> {
        self.forge.get_milestone_items(milestone_number).await
    }

    /// Logins of every organization member.
    pub async fn org_member_logins(&self) -> Result<Vec<String>> {
        let members = self.forge.get_org_members().await?;
        Ok(members.into_iter().map(|m| m.login).collect())
    }

    pub async fn get_org_projects(&self) -> Result<Vec<OrgProject>> {
        self.forge.get_org_projects().await
    }

    pub async fn create_pr(&self, req: CreatePrRequest) -> Result<PullRequest> {
        let pr = self.forge.create_pr(req).await?;
        info!("created pull request #{}", pr.number);
        Ok(pr)
    }

    pub async fn request_reviewer(
        &self,
        pr_number: u64,
        reviewer: &str,
    ) -> Result<()> {
        self.forge
            .request_reviewers(pr_number, vec![reviewer.to_string()])
            .await
    }

    pub async fn update_issue(&self, req: UpdateIssueRequest) -> Result<()> {
        self.forge.update_issue(req).await
    }

    pub async fn add_to_project(
        &self,
        project: &OrgProject,
        pr: &PullRequest,
    ) -> Result<()> {
        self.forge
            .add_to_project(project.id.clone(), pr.node_id.clone())
            .await
    }
}
