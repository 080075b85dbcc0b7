//! Storage of the personal access token used by installed tooling.
use log::*;
use secrecy::ExposeSecret;

use crate::{install::env_var::EnvVars, prompt::Prompter, result::Result};

/// Environment variable holding the personal access token.
pub const TOKEN_VAR: &str = "KDCLI_TOKEN";

/// Make sure a personal access token is stored. Prompts for one when
/// [`TOKEN_VAR`] is not set. Returns whether a token was stored.
pub async fn ensure_token(env: &dyn EnvVars, prompter: &dyn Prompter) -> Result<bool> {
    if env.get(TOKEN_VAR).is_some_and(|t| !t.trim().is_empty()) {
        debug!("personal access token already set");
        return Ok(false);
    }

    let store = prompter.confirm(&format!(
        "The '{TOKEN_VAR}' environment variable is not set. Do you want to set a personal access token?"
    ))?;

    if !store {
        warn!("No personal access token set. Requests will be unauthenticated.");
        return Ok(false);
    }

    let token = prompter.secret("Enter your personal access token:")?;
    let token = token.expose_secret().trim();

    if token.is_empty() {
        warn!("The personal access token was empty and was not stored.");
        return Ok(false);
    }

    env.set_persistent(TOKEN_VAR, token).await?;
    info!("personal access token stored in '{TOKEN_VAR}'");

    Ok(true)
}
