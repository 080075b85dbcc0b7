//! CI check that the release notes for a version exist.
//!
//! Each failing stage exits with its own code so a workflow can tell them
//! apart: 1 for a missing release type, 2 for a missing version, 200 for an
//! unknown release type, 300 and 400 for preview and production versions
//! of the wrong shape, and 1 when no notes file exists.
use log::*;
use std::path::{Path, PathBuf};

use crate::{
    error::AdminError, path_helpers, result::Result, settings, version,
};

/// Find the notes file for `version` of `release_type` under `root`. The
/// file is `<prefix><version>.md` inside a path that contains both
/// `release-notes` and `<release type>-releases`.
pub async fn check(
    root: &Path,
    release_type: Option<String>,
    version: Option<String>,
) -> Result<PathBuf> {
    let release_type = settings::non_empty(&release_type)
        .ok_or_else(|| AdminError::MissingParameter("RELEASE_TYPE".into()))?;
    let version = settings::non_empty(&version)
        .ok_or_else(|| AdminError::MissingParameter("VERSION".into()))?;

    let (kind, version) = version::check_release_version(release_type, version)?;

    let file_name = format!("{version}.md");
    let releases_dir = format!("{kind}-releases");

    let found = path_helpers::find_files(root, |path| {
        let path_str = path_helpers::normalize_path(&path.to_string_lossy())
            .to_string();

        path.file_name()
            .is_some_and(|n| n.to_string_lossy().ends_with(&file_name))
            && path_str.contains("release-notes")
            && path_str.contains(&releases_dir)
    })
    .await?;

    match found.into_iter().next() {
        Some(path) => {
            info!("Release notes found: {}", path.display());
            Ok(path)
        }
        None => Err(AdminError::precondition(format!(
            "The release notes for the {kind} version '{version}' could not be found."
        ))
        .into()),
    }
}

pub async fn execute(release_type: Option<String>, version: Option<String>) -> Result<()> {
    let root = std::env::current_dir()?;
    check(&root, release_type, version).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;
    use crate::error::exit_code_for;

    fn notes_repo() -> TempDir {
        let dir = TempDir::new().unwrap();
        let notes = dir.path().join("release-notes").join("preview-releases");
        std::fs::create_dir_all(&notes).unwrap();
        std::fs::write(notes.join("Release-Notes-v1.0.0-preview.1.md"), "").unwrap();
        std::fs::create_dir_all(dir.path().join("release-notes/production-releases"))
            .unwrap();
        dir
    }

    async fn exit_code(release_type: Option<&str>, version: Option<&str>) -> i32 {
        let dir = notes_repo();
        let report = check(
            dir.path(),
            release_type.map(str::to_string),
            version.map(str::to_string),
        )
        .await
        .unwrap_err();
        exit_code_for(&report)
    }

    #[tokio::test]
    async fn finds_prefixed_notes_file() {
        let dir = notes_repo();

        let path = check(
            dir.path(),
            Some("preview".into()),
            Some("1.0.0-preview.1".into()),
        )
        .await
        .unwrap();

        assert!(path.ends_with("Release-Notes-v1.0.0-preview.1.md"));
    }

    #[tokio::test]
    async fn stages_exit_with_distinct_codes() {
        assert_eq!(exit_code(None, Some("v1.0.0")).await, 1);
        assert_eq!(exit_code(Some("preview"), None).await, 2);
        assert_eq!(exit_code(Some("preview"), Some(" ")).await, 2);
        assert_eq!(exit_code(Some("beta"), Some("v1.0.0")).await, 200);
        assert_eq!(exit_code(Some("preview"), Some("v1.0.0")).await, 300);
        assert_eq!(exit_code(Some("production"), Some("v1.0")).await, 400);
        assert_eq!(exit_code(Some("production"), Some("v1.0.0")).await, 1);
    }
}
