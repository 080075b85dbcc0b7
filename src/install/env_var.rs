//! Reading and persisting environment variables for the current user.
use async_trait::async_trait;
use log::*;
use std::path::Path;

use crate::{
    error::AdminError, install::platform::Platform, process, result::Result,
};

pub const PATH_VAR: &str = "PATH";

/// Access to the user's environment variables.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait EnvVars: Send + Sync {
    fn get(&self, name: &str) -> Option<String>;
    /// Store `value` so that it survives the current process.
    async fn set_persistent(&self, name: &str, value: &str) -> Result<()>;
}

/// [`EnvVars`] backed by the process environment. Persisting is only
/// supported on Windows, through `setx`.
pub struct SystemEnvVars {
    platform: Platform,
}

impl SystemEnvVars {
    pub fn new(platform: Platform) -> Self {
        Self { platform }
    }
}

#[async_trait]
impl EnvVars for SystemEnvVars {
    fn get(&self, name: &str) -> Option<String> {
        std::env::var(name).ok()
    }

    async fn set_persistent(&self, name: &str, value: &str) -> Result<()> {
        if self.platform != Platform::WinX64 {
            return Err(AdminError::unsupported(format!(
                "Persisting the '{name}' environment variable is not supported on '{}'.",
                self.platform
            ))
            .into());
        }

        debug!("persisting environment variable: {name}");
        process::run("setx", &[name.to_string(), value.to_string()]).await?;
        Ok(())
    }
}

/// Append `dir` to a separator joined list of paths, dropping empty and
/// duplicate entries. Returns `None` when `dir` is already present.
pub fn merge_path_entry(current: &str, dir: &str, separator: char) -> Option<String> {
    let mut entries: Vec<&str> = Vec::new();

    for entry in current.split(separator).map(str::trim) {
        if !entry.is_empty() && !entries.contains(&entry) {
            entries.push(entry);
        }
    }

    if entries.contains(&dir) {
        return None;
    }

    entries.push(dir);

    Some(entries.join(&separator.to_string()))
}

/// Add `dir` to the persistent `PATH`. Returns whether `PATH` changed.
pub async fn add_to_path(
    env: &dyn EnvVars,
    platform: Platform,
    dir: &Path,
) -> Result<bool> {
    if platform != Platform::WinX64 {
        return Err(AdminError::unsupported(format!(
            "Updating the PATH on '{platform}' is not supported. Add '{}' to your PATH manually.",
            dir.display()
        ))
        .into());
    }

    let dir = dir.to_string_lossy().to_string();
    let current = env.get(PATH_VAR).unwrap_or_default();

    match merge_path_entry(&current, &dir, platform.path_separator()) {
        Some(value) => {
            info!("adding '{dir}' to the PATH");
            env.set_persistent(PATH_VAR, &value).await?;
            Ok(true)
        }
        None => {
            debug!("'{dir}' is already in the PATH");
            Ok(false)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn merges_and_deduplicates_entries() {
        assert_eq!(
            merge_path_entry("C:/a; C:/b;;C:/a", "C:/kdcli", ';').unwrap(),
            "C:/a;C:/b;C:/kdcli"
        );
        assert_eq!(merge_path_entry("", "C:/kdcli", ';').unwrap(), "C:/kdcli");
    }

    #[test]
    fn existing_entry_is_not_merged() {
        assert!(merge_path_entry("C:/a;C:/kdcli", "C:/kdcli", ';').is_none());
    }

    #[tokio::test]
    async fn add_to_path_persists_merged_value() {
        let mut env = MockEnvVars::new();
        env.expect_get()
            .withf(|name| name == PATH_VAR)
            .returning(|_| Some("C:/Windows".into()));
        env.expect_set_persistent()
            .withf(|name, value| name == PATH_VAR && value == "C:/Windows;C:/kdcli")
            .times(1)
            .returning(|_, _| Ok(()));

        let changed = add_to_path(&env, Platform::WinX64, Path::new("C:/kdcli"))
            .await
            .unwrap();

        assert!(changed);
    }

    #[tokio::test]
    async fn add_to_path_is_noop_when_present() {
        let mut env = MockEnvVars::new();
        env.expect_get()
            .returning(|_| Some("C:/kdcli;C:/Windows".into()));
        env.expect_set_persistent().never();

        let changed = add_to_path(&env, Platform::WinX64, Path::new("C:/kdcli"))
            .await
            .unwrap();

        assert!(!changed);
    }

    #[tokio::test]
    async fn add_to_path_is_unsupported_on_linux() {
        let env = MockEnvVars::new();

        let report = add_to_path(&env, Platform::LinuxX64, Path::new("/usr/local/kdcli"))
            .await
            .unwrap_err();

        assert!(matches!(
            report.downcast_ref::<AdminError>(),
            Some(AdminError::Unsupported(_))
        ));
    }

    #[tokio::test]
    async fn system_env_vars_cannot_persist_on_linux() {
        let env = SystemEnvVars::new(Platform::LinuxX64);

        assert!(env.set_persistent("KD_ADMIN_TEST", "value").await.is_err());
    }
}
