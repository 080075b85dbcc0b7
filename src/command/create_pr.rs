//! Creates a feature branch for an issue and opens a pull request for it.
use log::*;
use std::path::Path;

use crate::{
    branch,
    command::common,
    error::AdminError,
    forge::{
        manager::ForgeManager,
        types::{CreatePrRequestBuilder, PullRequest},
    },
    git::{Git, GitCli},
    prompt::{Prompter, TerminalPrompter},
    result::Result,
    settings::{self, CreatePrSettings},
};

/// Title of every pull request opened for an issue.
pub const NEW_PR_TITLE: &str = "new pr";

/// Interactive workflow that turns an open issue into a pushed feature
/// branch with a pull request.
pub struct PrCreator<'a> {
    settings: &'a CreatePrSettings,
    forge: &'a ForgeManager,
    git: &'a dyn Git,
    prompter: &'a dyn Prompter,
}

impl<'a> PrCreator<'a> {
    pub fn new(
        settings: &'a CreatePrSettings,
        forge: &'a ForgeManager,
        git: &'a dyn Git,
        prompter: &'a dyn Prompter,
    ) -> Self {
        Self {
            settings,
            forge,
            git,
            prompter,
        }
    }

    pub async fn run(&self) -> Result<PullRequest> {
        let issue_number = self.collect_issue_number()?;
        self.validate_issue_open(issue_number).await?;

        let head_branch = self.collect_head_branch(issue_number)?;
        self.validate_head_branch_free(&head_branch).await?;

        let base_branch = self.collect_base_branch()?;
        self.validate_base_branch_exists(&base_branch).await?;

        self.git.checkout_new_branch(&head_branch).await?;
        self.git
            .commit_empty(&format!("Start work for issue #{issue_number}"))
            .await?;
        self.git.push_upstream(&head_branch).await?;

        let req = CreatePrRequestBuilder::default()
            .head_branch(head_branch)
            .base_branch(base_branch)
            .title(NEW_PR_TITLE)
            .body("")
            .draft(false)
            .maintainer_can_modify(true)
            .build()?;

        self.forge.create_pr(req).await
    }

    fn collect_issue_number(&self) -> Result<u64> {
        loop {
            let answer = self.prompter.input("Enter an issue number:")?;

            if branch::is_issue_number(&answer)
                && let Ok(number) = answer.trim().parse::<u64>()
            {
                return Ok(number);
            }

            warn!("'{answer}' is not an issue number");
        }
    }

    async fn validate_issue_open(&self, number: u64) -> Result<()> {
        info!("checking if issue #{number} exists");

        match self.forge.get_issue(number).await? {
            None => Err(AdminError::precondition(format!(
                "An issue with number '{number}' does not exist."
            ))
            .into()),
            Some(issue) if !issue.is_open() => Err(AdminError::precondition(
                format!("The issue '#{number}' is closed."),
            )
            .into()),
            Some(_) => Ok(()),
        }
    }

    fn collect_head_branch(&self, issue_number: u64) -> Result<String> {
        let answer = self.prompter.input("Enter a head branch name:")?;
        let head_branch = branch::normalize_head_branch(&answer, issue_number);

        if !branch::is_valid_feature_branch(&head_branch) {
            return Err(AdminError::precondition(format!(
                "The head branch name '{head_branch}' is invalid. It should match the pattern: 'feature/<issue-number>-<branch-name>'"
            ))
            .into());
        }

        Ok(head_branch)
    }

    async fn validate_head_branch_free(&self, head_branch: &str) -> Result<()> {
        if self.forge.branch_exists(head_branch).await? {
            return Err(AdminError::precondition(format!(
                "The head branch '{head_branch}' exists in the remote repository."
            ))
            .into());
        }

        Ok(())
    }

    fn collect_base_branch(&self) -> Result<String> {
        let branches = self.settings.trimmed_base_branches();
        self.prompter.select("Choose a base branch:", &branches)
    }

    async fn validate_base_branch_exists(&self, base_branch: &str) -> Result<()> {
        if !self.forge.branch_exists(base_branch).await? {
            return Err(AdminError::precondition(format!(
                "The branch '{base_branch}' does not exist in the remote repository."
            ))
            .into());
        }

        Ok(())
    }
}

/// Load the settings and run the workflow against GitHub and the local
/// repository.
pub async fn execute(settings_path: &Path) -> Result<()> {
    let settings: CreatePrSettings = settings::load_settings(settings_path)?;
    let token = settings::resolve_token(&settings.github_token_env_var_name)?;
    let forge =
        common::github_manager(&settings.owner_name, &settings.repo_name, token)?;
    let git = GitCli::new();
    let prompter = TerminalPrompter::stdio();

    let pr = PrCreator::new(&settings, &forge, &git, &prompter).run().await?;

    info!("Pull request created successfully!");
    info!("PR: {}", pr.html_url);

    Ok(())
}
