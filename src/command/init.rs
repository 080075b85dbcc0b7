//! Scaffolds the wrapper scripts and empty settings files kd-admin expects
//! into a repository.
use color_eyre::eyre::WrapErr;
use log::*;
use serde::Serialize;
use std::path::{Path, PathBuf};

use crate::{
    prompt::{Prompter, TerminalPrompter},
    result::Result,
    settings::{CreatePrSettings, PrepareReleaseSettings, ReleaseType},
};

pub const CREATE_PR_SCRIPT: &str = "create-pr.ps1";
pub const PREPARE_RELEASE_SCRIPT: &str = "prepare-for-release.ps1";
pub const CREATE_PR_SETTINGS: &str = "create-pr-settings.json";
pub const PREPARE_RELEASE_SETTINGS: &str =
    "dev-tools/prepare-release-settings.json";

/// A file that can be scaffolded.
struct Scaffold {
    path: &'static str,
    question: &'static str,
    content: String,
}

fn to_json<T: Serialize>(value: &T) -> Result<String> {
    Ok(format!("{}\n", serde_json::to_string_pretty(value)?))
}

fn prepare_release_template() -> PrepareReleaseSettings {
    let empty = || Some(String::new());

    PrepareReleaseSettings {
        org_project_name: empty(),
        release_types: vec![ReleaseType {
            reviewer: empty(),
            assignee: empty(),
            gen_release_settings_file_path: empty(),
            ..Default::default()
        }],
        version_file_path: empty(),
        version_json_key_path: empty(),
        release_notes_file_prefix: empty(),
        ..Default::default()
    }
}

fn scaffolds() -> Result<Vec<Scaffold>> {
    Ok(vec![
        Scaffold {
            path: CREATE_PR_SCRIPT,
            question: "Do you want to add a powershell script to create a PR?",
            content: "& \"dev-tools/bin/kd-admin\" create-pr;\n".into(),
        },
        Scaffold {
            path: PREPARE_RELEASE_SCRIPT,
            question: "Do you want to add a powershell script to prepare for a release?",
            content: "& \"dev-tools/bin/kd-admin\" prepare-for-release;\n".into(),
        },
        Scaffold {
            path: CREATE_PR_SETTINGS,
            question: "Do you want to add a create PR settings file?",
            content: to_json(&CreatePrSettings::default())?,
        },
        Scaffold {
            path: PREPARE_RELEASE_SETTINGS,
            question: "Do you want to add the prepare for release settings file?",
            content: to_json(&prepare_release_template())?,
        },
    ])
}

/// Write every missing scaffold under `root` that the user confirms.
/// Returns the written files.
pub async fn scaffold(root: &Path, prompter: &dyn Prompter) -> Result<Vec<PathBuf>> {
    let mut created = vec![];

    for scaffold in scaffolds()? {
        let path = root.join(scaffold.path);

        if path.exists() {
            warn!("'{}' file already exists. Skipping creation.", scaffold.path);
            continue;
        }

        if !prompter.confirm(scaffold.question)? {
            continue;
        }

        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        tokio::fs::write(&path, scaffold.content)
            .await
            .wrap_err_with(|| format!("failed to write {}", path.display()))?;

        info!("Created '{}' file.", scaffold.path);
        created.push(path);
    }

    if !created.is_empty() {
        info!("Make sure to fill out all of the setting files!");
    }

    Ok(created)
}

pub async fn execute() -> Result<()> {
    let prompter = TerminalPrompter::stdio();
    let root = std::env::current_dir()?;
    scaffold(&root, &prompter).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;
    use crate::prompt::MockPrompter;

    #[tokio::test]
    async fn writes_confirmed_files() {
        let dir = TempDir::new().unwrap();
        let mut prompter = MockPrompter::new();
        prompter
            .expect_confirm()
            .withf(|q| q.contains("create a PR"))
            .returning(|_| Ok(false));
        prompter
            .expect_confirm()
            .withf(|q| !q.contains("create a PR"))
            .returning(|_| Ok(true));

        let created = scaffold(dir.path(), &prompter).await.unwrap();

        assert_eq!(created.len(), 3);
        assert!(!dir.path().join(CREATE_PR_SCRIPT).exists());

        let script =
            std::fs::read_to_string(dir.path().join(PREPARE_RELEASE_SCRIPT)).unwrap();
        assert!(script.contains("prepare-for-release"));

        let settings =
            std::fs::read_to_string(dir.path().join(CREATE_PR_SETTINGS)).unwrap();
        assert_eq!(
            settings,
            "{\n  \"ownerName\": \"\",\n  \"repoName\": \"\",\n  \"githubTokenEnvVarName\": \"\",\n  \"baseBranches\": []\n}\n"
        );

        let settings =
            std::fs::read_to_string(dir.path().join(PREPARE_RELEASE_SETTINGS)).unwrap();
        assert!(settings.contains("\"releaseTypes\": [\n    {\n      \"name\": \"\""));
        assert!(settings.contains("\"versionJSONKeyPath\": \"\""));
    }

    #[tokio::test]
    async fn existing_files_are_skipped_without_prompting() {
        let dir = TempDir::new().unwrap();
        std::fs::create_dir(dir.path().join("dev-tools")).unwrap();
        for path in [
            CREATE_PR_SCRIPT,
            PREPARE_RELEASE_SCRIPT,
            CREATE_PR_SETTINGS,
            PREPARE_RELEASE_SETTINGS,
        ] {
            std::fs::write(dir.path().join(path), "keep").unwrap();
        }
        let mut prompter = MockPrompter::new();
        prompter.expect_confirm().never();

        let created = scaffold(dir.path(), &prompter).await.unwrap();

        assert!(created.is_empty());
        assert_eq!(
            std::fs::read_to_string(dir.path().join(CREATE_PR_SETTINGS)).unwrap(),
            "keep"
        );
    }
}
