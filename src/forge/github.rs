//! Implements the Forge trait for Github
use async_trait::async_trait;
use color_eyre::eyre::eyre;
use log::*;
use octocrab::Octocrab;
use secrecy::ExposeSecret;
use serde::{Deserialize, Serialize, de::DeserializeOwned};

use crate::{
    forge::{
        config::{DEFAULT_API_BASE_URL, DEFAULT_PAGE_SIZE, RemoteConfig},
        traits::Forge,
        types::{
            CreatePrRequest, Issue, Label, Milestone, MilestoneItem, OrgMember,
            OrgProject, PullRequest, Tag, UpdateIssueRequest,
        },
    },
    result::Result,
};

const ORG_PROJECTS_QUERY: &str = r#"
query GetOrgProjects($login: String!) {
  organization(login: $login) {
    projectsV2(first: 100) {
      nodes {
        id
        title
      }
    }
  }
}"#;

const ADD_TO_PROJECT_MUTATION: &str = r#"
mutation AddToProject($projectId: ID!, $contentId: ID!) {
  addProjectV2ItemById(input: {projectId: $projectId, contentId: $contentId}) {
    item {
      id
    }
  }
}"#;

#[derive(Debug, Deserialize)]
struct GraphQlError {
    message: String,
}

#[derive(Debug, Deserialize)]
struct GraphQlResponse<T> {
    data: Option<T>,
    errors: Option<Vec<GraphQlError>>,
}

impl<T> GraphQlResponse<T> {
    fn into_data(self) -> Result<T> {
        if let Some(errors) = self.errors
            && !errors.is_empty()
        {
            let messages = errors
                .into_iter()
                .map(|e| e.message)
                .collect::<Vec<String>>()
                .join("; ");
            return Err(eyre!("GraphQL request failed: {messages}"));
        }

        self.data
            .ok_or_else(|| eyre!("GraphQL response did not contain any data"))
    }
}

#[derive(Debug, Deserialize)]
struct ProjectNodes {
    nodes: Vec<Option<OrgProject>>,
}

#[derive(Debug, Deserialize)]
struct OrgProjectsOrganization {
    #[serde(rename = "projectsV2")]
    projects: ProjectNodes,
}

#[derive(Debug, Deserialize)]
struct OrgProjectsData {
    organization: Option<OrgProjectsOrganization>,
}

#[derive(Debug, Deserialize)]
struct GithubIssueItem {
    number: u64,
    title: String,
    html_url: String,
    #[serde(default)]
    labels: Vec<Label>,
    pull_request: Option<serde_json::Value>,
}

impl From<GithubIssueItem> for MilestoneItem {
    fn from(item: GithubIssueItem) -> Self {
        Self {
            number: item.number,
            title: item.title,
            html_url: item.html_url,
            labels: item.labels.into_iter().map(|l| l.name).collect(),
            is_pull_request: item.pull_request.is_some(),
        }
    }
}

#[derive(Debug, Serialize)]
struct GithubCreatePr {
    title: String,
    head: String,
    base: String,
    body: String,
    draft: bool,
    maintainer_can_modify: bool,
}

#[derive(Debug, Serialize)]
struct GithubUpdateIssue {
    #[serde(skip_serializing_if = "Option::is_none")]
    assignees: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    labels: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    milestone: Option<u64>,
}

fn is_not_found(err: &octocrab::Error) -> bool {
    matches!(
        err,
        octocrab::Error::GitHub { source, .. }
            if source.status_code.as_u16() == 404
    )
}

fn page_endpoint(base: &str, path: &str, page: u32) -> String {
    let separator = if path.contains('?') { '&' } else { '?' };
    format!("{base}{path}{separator}per_page={DEFAULT_PAGE_SIZE}&page={page}")
}

/// GitHub forge implementation using Octocrab for REST and GraphQL calls.
pub struct Github {
    config: RemoteConfig,
    base_uri: String,
    instance: Octocrab,
}

impl Github {
    /// Create GitHub client with personal access token authentication. An
    /// empty token results in an anonymous client.
    pub fn new(config: RemoteConfig) -> Result<Self> {
        let base_uri = DEFAULT_API_BASE_URL.to_string();
        let mut builder = Octocrab::builder().base_uri(base_uri.clone())?;

        if !config.token.expose_secret().is_empty() {
            builder = builder.personal_token(config.token.clone());
        }

        let instance = builder.build()?;

        Ok(Self {
            config,
            base_uri,
            instance,
        })
    }

    fn repo_path(&self) -> String {
        format!("/repos/{}/{}", self.config.owner, self.config.repo)
    }

    /// Fetch every page of a list endpoint.
    async fn get_all<T: DeserializeOwned>(&self, path: &str) -> Result<Vec<T>> {
        let mut items = vec![];
        let mut page = 1;

        loop {
            let endpoint = page_endpoint(&self.base_uri, path, page);
            debug!("fetching page {page} of {path}");

            let batch: Vec<T> = self.instance.get(endpoint, None::<&()>).await?;
            let is_last = batch.len() < DEFAULT_PAGE_SIZE as usize;
            items.extend(batch);

            if is_last {
                break;
            }

            page += 1;
        }

        Ok(items)
    }

    /// GET a resource, mapping a 404 to `None`.
    async fn get_optional<T: DeserializeOwned>(
        &self,
        path: &str,
    ) -> Result<Option<T>> {
        let endpoint = format!("{}{path}", self.base_uri);

        match self.instance.get::<T, _, ()>(endpoint, None).await {
            Ok(value) => Ok(Some(value)),
            Err(err) if is_not_found(&err) => {
                debug!("resource not found: {path}");
                Ok(None)
            }
            Err(err) => Err(err.into()),
        }
    }
}

#[async_trait]
impl Forge for Github {
    fn remote_config(&self) -> RemoteConfig {
        self.config.clone()
    }

    async fn get_issue(&self, number: u64) -> Result<Option<Issue>> {
        let path = format!("{}/issues/{number}", self.repo_path());
        self.get_optional(&path).await
    }

    async fn owner_exists(&self) -> Result<bool> {
        let path = format!("/users/{}", self.config.owner);
        let owner: Option<serde_json::Value> = self.get_optional(&path).await?;
        Ok(owner.is_some())
    }

    async fn repo_exists(&self) -> Result<bool> {
        let repo: Option<serde_json::Value> =
            self.get_optional(&self.repo_path()).await?;
        Ok(repo.is_some())
    }

    async fn branch_exists(&self, branch: &str) -> Result<bool> {
        let path = format!("{}/branches/{branch}", self.repo_path());
        let found: Option<serde_json::Value> = self.get_optional(&path).await?;
        Ok(found.is_some())
    }

    async fn get_tags(&self) -> Result<Vec<Tag>> {
        self.get_all(&format!("{}/tags", self.repo_path())).await
    }

    async fn get_labels(&self) -> Result<Vec<Label>> {
        self.get_all(&format!("{}/labels", self.repo_path())).await
    }

    async fn get_milestones(&self) -> Result<Vec<Milestone>> {
        self.get_all(&format!("{}/milestones?state=all", self.repo_path()))
            .await
    }

    async fn get_milestone_items(
        &self,
        milestone_number: u64,
    ) -> Result<Vec<MilestoneItem>> {
        let path = format!(
            "{}/issues?milestone={milestone_number}&state=all",
            self.repo_path()
        );
        let items: Vec<GithubIssueItem> = self.get_all(&path).await?;

        Ok(items.into_iter().map(MilestoneItem::from).collect())
    }

    async fn get_org_members(&self) -> Result<Vec<OrgMember>> {
        self.get_all(&format!("/orgs/{}/members", self.config.owner))
            .await
    }

    async fn get_org_projects(&self) -> Result<Vec<OrgProject>> {
        let payload = serde_json::json!({
            "query": ORG_PROJECTS_QUERY,
            "variables": { "login": self.config.owner },
        });

        let response: GraphQlResponse<OrgProjectsData> =
            self.instance.graphql(&payload).await?;

        let projects = response
            .into_data()?
            .organization
            .map(|org| org.projects.nodes.into_iter().flatten().collect())
            .unwrap_or_default();

        Ok(projects)
    }

    async fn create_pr(&self, req: CreatePrRequest) -> Result<PullRequest> {
        let endpoint = format!("{}{}/pulls", self.base_uri, self.repo_path());

        let body = GithubCreatePr {
            title: req.title,
            head: req.head_branch,
            base: req.base_branch,
            body: req.body,
            draft: req.draft,
            maintainer_can_modify: req.maintainer_can_modify,
        };

        info!("creating pull request: {} -> {}", body.head, body.base);

        let pr: PullRequest = self.instance.post(endpoint, Some(&body)).await?;

        Ok(pr)
    }

    async fn request_reviewers(
        &self,
        pr_number: u64,
        reviewers: Vec<String>,
    ) -> Result<()> {
        let endpoint = format!(
            "{}{}/pulls/{pr_number}/requested_reviewers",
            self.base_uri,
            self.repo_path()
        );
        let body = serde_json::json!({ "reviewers": reviewers });

        let _: serde_json::Value =
            self.instance.post(endpoint, Some(&body)).await?;

        Ok(())
    }

    async fn update_issue(&self, req: UpdateIssueRequest) -> Result<()> {
        let endpoint = format!(
            "{}{}/issues/{}",
            self.base_uri,
            self.repo_path(),
            req.number
        );
        let body = GithubUpdateIssue {
            assignees: req.assignees,
            labels: req.labels,
            milestone: req.milestone,
        };

        let _: serde_json::Value =
            self.instance.patch(endpoint, Some(&body)).await?;

        Ok(())
    }

    async fn add_to_project(
        &self,
        project_id: String,
        content_node_id: String,
    ) -> Result<()> {
        let payload = serde_json::json!({
            "query": ADD_TO_PROJECT_MUTATION,
            "variables": {
                "projectId": project_id,
                "contentId": content_node_id,
            },
        });

        let response: GraphQlResponse<serde_json::Value> =
            self.instance.graphql(&payload).await?;
        response.into_data()?;

        Ok(())
    }
}
