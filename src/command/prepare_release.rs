//! Prepares a release: branch, version bump, release notes and a release
//! pull request with its reviewer, assignee, labels, project and milestone.
//!
//! Every check that can stop the run happens before the release branch is
//! created. Once the branch exists, failures while updating the version file
//! or generating notes are logged and the run continues. Nothing is rolled
//! back.
use color_eyre::eyre::{WrapErr, eyre};
use log::*;
use std::{
    path::{Path, PathBuf},
    str::FromStr,
};
use strum::{Display, EnumIter, EnumString, IntoEnumIterator};

use crate::{
    command::common,
    error::AdminError,
    forge::{
        manager::ForgeManager,
        types::{
            CreatePrRequestBuilder, Milestone, OrgProject, PullRequest,
            UpdateIssueRequestBuilder,
        },
    },
    git::{Git, GitCli},
    notes::NotesGenerator,
    path_helpers,
    prompt::{Prompter, TerminalPrompter},
    result::Result,
    settings::{self, GeneratorSettings, PrepareReleaseSettings, ReleaseType},
    updater, version,
};

/// How a reviewer or assignee is picked when none is configured.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, EnumIter)]
pub enum MemberChoice {
    #[strum(serialize = "org members only")]
    OrgMembersOnly,
    #[strum(serialize = "manual")]
    Manual,
    #[strum(serialize = "skip")]
    Skip,
}

/// Interactive release preparation workflow.
pub struct ReleasePrepper<'a> {
    settings: &'a PrepareReleaseSettings,
    forge: &'a ForgeManager,
    git: &'a dyn Git,
    prompter: &'a dyn Prompter,
}

impl<'a> ReleasePrepper<'a> {
    pub fn new(
        settings: &'a PrepareReleaseSettings,
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
        let release_type = self.choose_release_type()?;
        let version = self.collect_version().await?;

        self.validate_repo().await?;
        self.validate_pr_template(release_type)?;

        let reviewer = match release_type.reviewer() {
            Some(reviewer) => Some(reviewer.to_string()),
            None => self.resolve_member("reviewer").await?,
        };
        let assignee = match release_type.assignee() {
            Some(assignee) => Some(assignee.to_string()),
            None => self.resolve_member("assignee").await?,
        };

        self.validate_labels(release_type).await?;
        let project = self.resolve_project().await?;
        let milestone = self.validate_milestone(&version).await?;
        let version_file = self.validate_version_file()?;

        // nothing has been changed before this point
        self.git.checkout_new_branch(&release_type.head_branch).await?;

        if let Some(path) = version_file {
            self.update_version(&path, &version).await?;
        }

        if let Some(notes_path) =
            self.create_release_notes(release_type, &version).await
        {
            self.git
                .stage(vec![notes_path.to_string_lossy().to_string()])
                .await?;
            self.git
                .commit(&format!(
                    "release: create release notes for version {version}"
                ))
                .await?;
        }

        self.git.push_upstream(&release_type.head_branch).await?;

        let pr = self.create_pr(release_type, &version).await?;

        match reviewer {
            Some(reviewer) => {
                info!("setting pr reviewer to '{reviewer}'");
                self.forge.request_reviewer(pr.number, &reviewer).await?;
            }
            None => {
                warn!("A reviewer has not been chosen. The pr will be left unassigned.")
            }
        }

        if let Some(assignee) = assignee {
            info!("setting pr assignee to '{assignee}'");
            let req = UpdateIssueRequestBuilder::default()
                .number(pr.number)
                .assignees(vec![assignee])
                .build()?;
            self.forge.update_issue(req).await?;
        }

        info!("setting pr labels");
        let req = UpdateIssueRequestBuilder::default()
            .number(pr.number)
            .labels(release_type.release_labels.clone())
            .build()?;
        self.forge.update_issue(req).await?;

        match project {
            Some(project) => {
                info!("assigning pr to project '{}'", project.title);
                self.forge.add_to_project(&project, &pr).await?;
            }
            None => warn!("The pr will not be assigned to a project."),
        }

        info!("assigning pr to milestone '{}'", milestone.title);
        let req = UpdateIssueRequestBuilder::default()
            .number(pr.number)
            .milestone(milestone.number)
            .build()?;
        self.forge.update_issue(req).await?;

        Ok(pr)
    }

    fn choose_release_type(&self) -> Result<&'a ReleaseType> {
        let names = self
            .settings
            .release_types
            .iter()
            .map(|t| t.name.clone())
            .collect::<Vec<String>>();

        let chosen = self
            .prompter
            .select("Please choose the type of release:", &names)?;

        self.settings.release_type(&chosen).ok_or_else(|| {
            AdminError::precondition("There was a problem choosing a release type.")
                .into()
        })
    }

    /// Prompt until the version is valid and not yet tagged. The tags are
    /// fetched again on every attempt.
    async fn collect_version(&self) -> Result<String> {
        loop {
            let answer = self.prompter.input("Please enter a version:")?;
            let version = version::normalize(&answer);

            if !version::is_either_valid(&version) {
                warn!(
                    "The version '{answer}' does not meet the required syntax requirements."
                );
                continue;
            }

            if self.forge.tag_exists(&version).await? {
                warn!("The version '{version}' already exists.");
                continue;
            }

            return Ok(version);
        }
    }

    async fn validate_repo(&self) -> Result<()> {
        if !self.forge.repo_exists().await? {
            return Err(AdminError::precondition(format!(
                "The repository '{}/{}' does not exist.",
                self.settings.owner_name, self.settings.repo_name
            ))
            .into());
        }

        Ok(())
    }

    fn validate_pr_template(&self, release_type: &ReleaseType) -> Result<()> {
        let path = Path::new(release_type.release_pr_template_file_path.trim());

        if !path.is_file() {
            return Err(AdminError::precondition(format!(
                "The pr template file '{}' does not exist.",
                path.display()
            ))
            .into());
        }

        Ok(())
    }

    async fn resolve_member(&self, role: &str) -> Result<Option<String>> {
        let options = MemberChoice::iter()
            .map(|c| c.to_string())
            .collect::<Vec<String>>();

        let answer = self
            .prompter
            .select(&format!("Choose the type of {role} member:"), &options)?;
        let choice = MemberChoice::from_str(&answer)
            .map_err(|_| eyre!("unknown {role} choice: {answer}"))?;

        if choice == MemberChoice::Skip {
            return Ok(None);
        }

        info!("fetching org members");
        let members = self.forge.org_member_logins().await?;

        if members.is_empty() {
            warn!("The organization has no members to choose a {role} from.");
            return Ok(None);
        }

        loop {
            let login = match choice {
                MemberChoice::OrgMembersOnly => self
                    .prompter
                    .search_select(&format!("Choose the {role}:"), &members)?,
                _ => self.prompter.input(&format!(
                    "Enter the GitHub login name of the {role}:"
                ))?,
            };
            let login = login.trim().to_string();

            if login.is_empty() {
                warn!("The {role} cannot be empty.");
                continue;
            }

            if !members.contains(&login) {
                warn!("The {role} '{login}' does not exist.");
                continue;
            }

            return Ok(Some(login));
        }
    }

    async fn validate_labels(&self, release_type: &ReleaseType) -> Result<()> {
        info!("validating labels");
        let missing = self
            .forge
            .missing_labels(&release_type.release_labels)
            .await?;

        if !missing.is_empty() {
            let list = missing
                .iter()
                .map(|l| format!(" - {l}"))
                .collect::<Vec<String>>()
                .join("\n");

            return Err(AdminError::precondition(format!(
                "The following labels do not exist in the repository:\n{list}"
            ))
            .into());
        }

        Ok(())
    }

    /// The org project the pull request goes into. A project that cannot be
    /// found is not an error.
    async fn resolve_project(&self) -> Result<Option<OrgProject>> {
        let projects = self.forge.get_org_projects().await?;

        let name = match self.settings.org_project_name() {
            Some(name) => name.to_string(),
            None => {
                let titles = projects
                    .iter()
                    .map(|p| p.title.clone())
                    .collect::<Vec<String>>();

                if titles.is_empty() {
                    warn!("The organization does not have any projects.");
                    return Ok(None);
                }

                self.prompter.select("Choose an organization project:", &titles)?
            }
        };

        info!("validating project '{name}'");
        let project = projects.into_iter().find(|p| p.title == name);

        if project.is_none() {
            warn!("The project '{name}' does not exist.");
        }

        Ok(project)
    }

    async fn validate_milestone(&self, version: &str) -> Result<Milestone> {
        info!("validating milestone '{version}'");

        self.forge.find_milestone(version).await?.ok_or_else(|| {
            AdminError::precondition(format!(
                "A milestone with the name '{version}' does not exist."
            ))
            .into()
        })
    }

    fn validate_version_file(&self) -> Result<Option<PathBuf>> {
        let Some(path) = self.settings.version_file_path() else {
            warn!(
                "The 'versionFilePath' setting is not set. The version will not be updated."
            );
            return Ok(None);
        };

        let path = PathBuf::from(path);

        if !path.is_file() {
            return Err(AdminError::precondition(format!(
                "The version file '{}' does not exist.",
                path.display()
            ))
            .into());
        }

        updater::VersionFile::from_path(&path)?;

        Ok(Some(path))
    }

    /// Update, stage and commit the version file. An update failure is
    /// logged and leaves nothing to commit.
    async fn update_version(&self, path: &Path, version: &str) -> Result<()> {
        let key_path = self.settings.version_json_key_path();

        if let Err(e) = updater::update_version_file(path, version, key_path).await
        {
            error!("failed to update the version file: {e:#}");
            return Ok(());
        }

        self.git
            .stage(vec![path.to_string_lossy().to_string()])
            .await?;
        self.git
            .commit(&format!("release: update version to {version}"))
            .await?;

        Ok(())
    }

    /// Generate and write the release notes. Returns the written file or
    /// `None` when generation was skipped or failed.
    async fn create_release_notes(
        &self,
        release_type: &ReleaseType,
        version: &str,
    ) -> Option<PathBuf> {
        let generator_settings =
            self.load_generator_settings(release_type, version)?;

        match self
            .write_release_notes(release_type, version, &generator_settings)
            .await
        {
            Ok(path) => Some(path),
            Err(e) => {
                error!("failed to create the release notes: {e:#}");
                None
            }
        }
    }

    fn load_generator_settings(
        &self,
        release_type: &ReleaseType,
        version: &str,
    ) -> Option<GeneratorSettings> {
        let Some(path) = release_type.gen_release_settings_file_path() else {
            warn!(
                "The 'genReleaseSettingsFilePath' setting for release type '{}' is not set and the 'generate release notes' process will be skipped.",
                release_type.name
            );
            return None;
        };

        if !Path::new(path).is_file() {
            warn!(
                "The release notes settings file '{path}' does not exist and the 'generate release notes' process will be skipped."
            );
            return None;
        }

        match settings::load_settings::<GeneratorSettings>(Path::new(path)) {
            Ok(mut generator_settings) => {
                generator_settings.version = Some(version.to_string());
                generator_settings.milestone_name = version.to_string();
                generator_settings.github_token_env_var_name =
                    self.settings.github_token_env_var_name.clone();
                Some(generator_settings)
            }
            Err(e) => {
                error!("{e:#}");
                None
            }
        }
    }

    async fn write_release_notes(
        &self,
        release_type: &ReleaseType,
        version: &str,
        generator_settings: &GeneratorSettings,
    ) -> Result<PathBuf> {
        info!("creating release notes");

        let notes = NotesGenerator::new(self.forge)
            .generate(generator_settings)
            .await?;

        let dir =
            path_helpers::normalize_dir(&release_type.release_notes_dir_path);
        tokio::fs::create_dir_all(&dir)
            .await
            .wrap_err_with(|| format!("failed to create directory: {dir}"))?;

        let path = PathBuf::from(format!(
            "{dir}/{}{version}.md",
            self.settings.release_notes_file_prefix()
        ));

        tokio::fs::write(&path, notes).await.wrap_err_with(|| {
            format!("failed to write release notes: {}", path.display())
        })?;

        info!("release notes written to {}", path.display());

        Ok(path)
    }

    async fn create_pr(
        &self,
        release_type: &ReleaseType,
        version: &str,
    ) -> Result<PullRequest> {
        let template_path = release_type.release_pr_template_file_path.trim();
        let body = tokio::fs::read_to_string(template_path)
            .await
            .wrap_err_with(|| {
                format!("failed to read pr template: {template_path}")
            })?;

        let req = CreatePrRequestBuilder::default()
            .head_branch(release_type.head_branch.clone())
            .base_branch(release_type.base_branch.clone())
            .title(release_type.title_for(version))
            .body(body)
            .draft(false)
            .maintainer_can_modify(true)
            .build()?;

        self.forge.create_pr(req).await
    }
}

/// Load the settings and run the workflow against GitHub and the local
/// repository.
pub async fn execute(settings_path: &Path) -> Result<()> {
    let settings: PrepareReleaseSettings =
        settings::load_settings(settings_path)?;
    let token = settings::resolve_token(&settings.github_token_env_var_name)?;
    let forge =
        common::github_manager(&settings.owner_name, &settings.repo_name, token)?;
    let git = GitCli::new();
    let prompter = TerminalPrompter::stdio();

    let pr = ReleasePrepper::new(&settings, &forge, &git, &prompter)
        .run()
        .await?;

    info!("Pull Request: {}", pr.html_url);

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn member_choices_round_trip_through_display() {
        for choice in MemberChoice::iter() {
            assert_eq!(MemberChoice::from_str(&choice.to_string()).unwrap(), choice);
        }
        assert_eq!(MemberChoice::OrgMembersOnly.to_string(), "org members only");
    }
}
