//! Updates the kd-admin wrapper scripts installed in a project to the most
//! recent release.
//!
//! A wrapper script holds a single launcher line that runs `cargo` with an
//! `https://` source and a release tag. That tag is compared with the latest
//! release and rewritten in place when it is out of date.
use color_eyre::eyre::WrapErr;
use log::*;
use regex::{NoExpand, Regex};
use secrecy::SecretString;
use std::{
    path::{Path, PathBuf},
    sync::LazyLock,
};

use crate::{
    command::common,
    error::AdminError,
    forge::manager::ForgeManager,
    install::{
        BINARY_NAME, INSTALL_OWNER, INSTALL_REPO, WRAPPER_DIR,
        env_var::{EnvVars, SystemEnvVars},
        pat,
        platform::Platform,
    },
    path_helpers,
    result::Result,
    version::EMBEDDED_VERSION_PATTERN,
};

static VERSION_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(EMBEDDED_VERSION_PATTERN).unwrap());

fn is_launcher_line(line: &str) -> bool {
    line.contains("cargo") && line.contains("https://")
}

fn corrupted(path: &Path) -> AdminError {
    AdminError::precondition(format!(
        "The file '{}' is corrupted. Please reinstall the script.",
        path.display()
    ))
}

/// Version referenced by the launcher line of a wrapper script.
pub fn current_version(path: &Path, content: &str) -> Result<String> {
    let line = content
        .split('\n')
        .find(|l| is_launcher_line(l))
        .ok_or_else(|| corrupted(path))?;

    let found = VERSION_REGEX.find(line).ok_or_else(|| corrupted(path))?;

    Ok(found.as_str().to_string())
}

/// Rewrite the launcher lines of a wrapper script to `latest`. Returns
/// `None` when the script already references `latest`.
pub fn update_content(path: &Path, content: &str, latest: &str) -> Result<Option<String>> {
    let current = current_version(path, content)?;

    if current == latest {
        return Ok(None);
    }

    let updated = content
        .split('\n')
        .map(|line| {
            if is_launcher_line(line) {
                VERSION_REGEX.replace_all(line, NoExpand(latest)).to_string()
            } else {
                line.to_string()
            }
        })
        .collect::<Vec<String>>()
        .join("\n");

    Ok(Some(updated))
}

/// Result of updating one wrapper script.
#[derive(Debug, Clone, PartialEq)]
pub enum UpdateOutcome {
    UpToDate(PathBuf),
    Updated { path: PathBuf, from: String },
}

/// Self update workflow.
pub struct Updater<'a> {
    forge: &'a ForgeManager,
    dir: PathBuf,
}

impl<'a> Updater<'a> {
    pub fn new(forge: &'a ForgeManager, dir: impl Into<PathBuf>) -> Self {
        Self {
            forge,
            dir: dir.into(),
        }
    }

    pub async fn run(&self) -> Result<Vec<UpdateOutcome>> {
        if !self.dir.is_dir() {
            warn!("{BINARY_NAME} is not installed in this directory.");
            return Ok(vec![]);
        }

        let files = path_helpers::find_files(&self.dir, |p| {
            p.file_name()
                .is_some_and(|n| n.to_string_lossy().contains(BINARY_NAME))
        })
        .await?;

        if files.is_empty() {
            warn!("{BINARY_NAME} is not installed in this directory.");
            return Ok(vec![]);
        }

        let latest = self.forge.latest_tag().await?.ok_or_else(|| {
            AdminError::precondition(format!(
                "No releases of '{}/{}' exist.",
                self.forge.owner(),
                self.forge.repo()
            ))
        })?;

        let mut outcomes = vec![];

        for path in files {
            outcomes.push(self.update_file(path, &latest).await?);
        }

        Ok(outcomes)
    }

    async fn update_file(&self, path: PathBuf, latest: &str) -> Result<UpdateOutcome> {
        let content = tokio::fs::read_to_string(&path)
            .await
            .wrap_err_with(|| format!("failed to read file: {}", path.display()))?;

        let from = current_version(&path, &content)?;

        match update_content(&path, &content, latest)? {
            Some(updated) => {
                tokio::fs::write(&path, updated).await.wrap_err_with(|| {
                    format!("failed to write file: {}", path.display())
                })?;
                info!(
                    "{} has been updated from '{from}' to '{latest}'",
                    path.display()
                );
                Ok(UpdateOutcome::Updated { path, from })
            }
            None => {
                info!("{} is up to date.", path.display());
                Ok(UpdateOutcome::UpToDate(path))
            }
        }
    }
}

/// Update the wrapper scripts in [`WRAPPER_DIR`].
pub async fn execute() -> Result<()> {
    let env = SystemEnvVars::new(Platform::current()?);
    let token = env.get(pat::TOKEN_VAR).unwrap_or_default();
    let forge = common::github_manager(
        INSTALL_OWNER,
        INSTALL_REPO,
        SecretString::from(token.trim().to_string()),
    )?;

    Updater::new(&forge, WRAPPER_DIR).run().await?;

    Ok(())
}
