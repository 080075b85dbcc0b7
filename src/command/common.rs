//! Common functionality shared between commands
use log::*;
use secrecy::SecretString;

use crate::{
    forge::{config::RemoteConfig, github::Github, manager::ForgeManager},
    result::Result,
};

/// Build a manager over the GitHub API for `owner/repo`.
pub fn github_manager(
    owner: &str,
    repo: &str,
    token: SecretString,
) -> Result<ForgeManager> {
    debug!("connecting to github repo {owner}/{repo}");
    let config = RemoteConfig::new(owner, repo, token);
    let forge = Github::new(config)?;
    Ok(ForgeManager::new(Box::new(forge)))
}
