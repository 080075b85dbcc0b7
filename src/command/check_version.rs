//! CI check that a version can be released: it has the shape its version
//! type requires, the owner and repository exist and the version is not yet
//! tagged. Every failure exits with code 1.
use log::*;

use crate::{
    command::common, error::AdminError, forge::manager::ForgeManager,
    result::Result, settings, version,
};

/// Environment variable holding the token used by the check. The check runs
/// anonymously when it is empty.
pub const TOKEN_VAR: &str = "GITHUB_TOKEN";

/// Parameters of the check. Missing values fall back to the environment
/// in the CLI layer.
#[derive(Debug, Clone, Default)]
pub struct CheckVersionArgs {
    pub owner: Option<String>,
    pub repo: Option<String>,
    pub version_type: Option<String>,
    pub version: Option<String>,
}

fn required(value: &Option<String>, name: &str) -> Result<String> {
    settings::non_empty(value)
        .map(str::to_string)
        .ok_or_else(|| {
            AdminError::config(format!("The '{name}' parameter is required."))
                .into()
        })
}

/// Run the version checks against the repository behind `forge`. The
/// version string is validated before anything is looked up.
pub async fn check(
    forge: &ForgeManager,
    version_type: &str,
    version: &str,
) -> Result<String> {
    let (kind, version) = version::check_release_version(version_type, version)
        .map_err(|e| AdminError::precondition(e.to_string()))?;

    if !forge.owner_exists().await? {
        return Err(AdminError::precondition(format!(
            "The owner '{}' does not exist.",
            forge.owner()
        ))
        .into());
    }

    if !forge.repo_exists().await? {
        return Err(AdminError::precondition(format!(
            "The repository '{}/{}' does not exist.",
            forge.owner(),
            forge.repo()
        ))
        .into());
    }

    if forge.tag_exists(&version).await? {
        return Err(AdminError::precondition(format!(
            "The tag '{version}' already exists."
        ))
        .into());
    }

    info!("The {kind} version '{version}' is valid.");

    Ok(version)
}

pub async fn execute(args: CheckVersionArgs) -> Result<()> {
    let owner = required(&args.owner, "OWNER_NAME")?;
    let repo = required(&args.repo, "REPO_NAME")?;
    let version_type = required(&args.version_type, "VERSION_TYPE")?;
    let version = required(&args.version, "VERSION")?;
    let token = settings::optional_token(TOKEN_VAR);

    let forge = common::github_manager(&owner, &repo, token)?;
    check(&forge, &version_type, &version).await?;

    Ok(())
}
