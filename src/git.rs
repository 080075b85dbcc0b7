//! Local version control through the `git` command line.
use async_trait::async_trait;
use log::*;
use std::path::PathBuf;

use crate::{process, result::Result};

const GIT: &str = "git";
const REMOTE: &str = "origin";

/// The local repository operations the workflows perform.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Git: Send + Sync {
    /// Create or reset `branch` and check it out.
    async fn checkout_new_branch(&self, branch: &str) -> Result<()>;
    async fn commit_empty(&self, message: &str) -> Result<()>;
    async fn stage(&self, paths: Vec<String>) -> Result<()>;
    async fn commit(&self, message: &str) -> Result<()>;
    /// Push `branch` to the remote and set it as upstream.
    async fn push_upstream(&self, branch: &str) -> Result<()>;
}

fn checkout_args(branch: &str) -> Vec<String> {
    vec!["checkout".into(), "-B".into(), branch.into()]
}

fn commit_args(message: &str, allow_empty: bool) -> Vec<String> {
    let mut args = vec!["commit".to_string()];
    if allow_empty {
        args.push("--allow-empty".into());
    }
    args.push("-m".into());
    args.push(message.into());
    args
}

fn push_args(branch: &str) -> Vec<String> {
    vec![
        "push".into(),
        "--set-upstream".into(),
        REMOTE.into(),
        branch.into(),
    ]
}

/// [`Git`] implementation that shells out to `git`.
pub struct GitCli {
    workdir: Option<PathBuf>,
}

impl GitCli {
    /// Operate on the repository in the current directory.
    pub fn new() -> Self {
        Self { workdir: None }
    }

    /// Operate on the repository at `workdir`.
    pub fn in_dir(workdir: impl Into<PathBuf>) -> Self {
        Self {
            workdir: Some(workdir.into()),
        }
    }

    async fn git(&self, args: Vec<String>) -> Result<String> {
        process::run_in(GIT, &args, self.workdir.as_deref()).await
    }
}

impl Default for GitCli {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Git for GitCli {
    async fn checkout_new_branch(&self, branch: &str) -> Result<()> {
        info!("checking out branch: {branch}");
        self.git(checkout_args(branch)).await?;
        Ok(())
    }

    async fn commit_empty(&self, message: &str) -> Result<()> {
        info!("creating empty commit: {message}");
        self.git(commit_args(message, true)).await?;
        Ok(())
    }

    async fn stage(&self, paths: Vec<String>) -> Result<()> {
        debug!("staging: {}", paths.join(", "));
        let mut args = vec!["add".to_string()];
        args.extend(paths);
        self.git(args).await?;
        Ok(())
    }

    async fn commit(&self, message: &str) -> Result<()> {
        info!("committing: {message}");
        self.git(commit_args(message, false)).await?;
        Ok(())
    }

    async fn push_upstream(&self, branch: &str) -> Result<()> {
        info!("pushing branch '{branch}' to {REMOTE}");
        self.git(push_args(branch)).await?;
        Ok(())
    }
}
