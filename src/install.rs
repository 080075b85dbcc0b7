//! Building and installing the kd-admin executable from a tagged source
//! snapshot.
//!
//! The executable is compiled with `cargo install` into a temporary
//! `install-<uuid>` directory under the working directory, moved into the
//! per platform install directory and the temporary directories are
//! removed afterwards.
use async_trait::async_trait;
use color_eyre::eyre::WrapErr;
use log::*;
use std::path::{Path, PathBuf};
use uuid::Uuid;

use crate::{install::platform::Platform, process, result::Result};

pub mod env_var;
pub mod pat;
pub mod platform;

/// Owner of the repository kd-admin is installed from.
pub const INSTALL_OWNER: &str = "KinsonDigital";
/// Repository kd-admin is installed from.
pub const INSTALL_REPO: &str = "kd-admin";
/// Name of the installed executable and its package.
pub const BINARY_NAME: &str = "kd-admin";

/// Project directory holding the wrapper script that pins the release a
/// project runs.
pub const WRAPPER_DIR: &str = "dev-tools/bin";

const INSTALL_DIR_PREFIX: &str = "install-";

/// Compiles the executable.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Toolchain: Send + Sync {
    async fn cargo_install(&self, args: Vec<String>) -> Result<()>;
}

/// [`Toolchain`] that runs the local `cargo`.
#[derive(Default)]
pub struct CargoToolchain;

#[async_trait]
impl Toolchain for CargoToolchain {
    async fn cargo_install(&self, args: Vec<String>) -> Result<()> {
        process::run("cargo", &args).await?;
        Ok(())
    }
}

/// Name of a temporary install directory.
pub fn install_dir_name(id: Uuid) -> String {
    format!("{INSTALL_DIR_PREFIX}{id}")
}

/// Whether `name` is a temporary install directory created by
/// [`install_dir_name`].
pub fn is_temp_install_dir(name: &str) -> bool {
    name.strip_prefix(INSTALL_DIR_PREFIX)
        .is_some_and(|id| Uuid::parse_str(id).is_ok())
}

/// Arguments for `cargo install` of the given tag.
pub fn cargo_install_args(
    owner: &str,
    repo: &str,
    version: &str,
    target: &str,
    root: &Path,
) -> Vec<String> {
    vec![
        "install".into(),
        "--git".into(),
        format!("https://github.com/{owner}/{repo}"),
        "--tag".into(),
        version.into(),
        "--target".into(),
        target.into(),
        "--root".into(),
        root.to_string_lossy().to_string(),
        "--locked".into(),
        BINARY_NAME.into(),
    ]
}

/// File name of the wrapper script on `platform`.
pub fn wrapper_file_name(platform: Platform) -> String {
    match platform {
        Platform::WinX64 => format!("{BINARY_NAME}.ps1"),
        Platform::LinuxX64 => BINARY_NAME.to_string(),
    }
}

/// Wrapper script that installs the `version` tag with cargo when it is not
/// the installed one and forwards its arguments to the executable. The
/// install line is the one the update command rewrites.
pub fn wrapper_script(
    platform: Platform,
    owner: &str,
    repo: &str,
    version: &str,
) -> String {
    let install = format!(
        "cargo install --git https://github.com/{owner}/{repo} --tag {version} --locked --quiet {BINARY_NAME}"
    );

    match platform {
        Platform::WinX64 => format!("{install}
& {BINARY_NAME} @args
"),
        Platform::LinuxX64 => {
            format!("#!/bin/sh
set -e
{install}
{BINARY_NAME} \"$@\"
")
        }
    }
}

/// Write the wrapper script for `version` into [`WRAPPER_DIR`] under
/// `work_dir`, replacing an existing one.
pub async fn write_wrapper(
    work_dir: &Path,
    platform: Platform,
    owner: &str,
    repo: &str,
    version: &str,
) -> Result<PathBuf> {
    let dir = work_dir.join(WRAPPER_DIR);
    tokio::fs::create_dir_all(&dir)
        .await
        .wrap_err_with(|| format!("failed to create directory: {}", dir.display()))?;

    let path = dir.join(wrapper_file_name(platform));
    let content = wrapper_script(platform, owner, repo, version);

    tokio::fs::write(&path, content)
        .await
        .wrap_err_with(|| format!("failed to write file: {}", path.display()))?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        tokio::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755))
            .await?;
    }

    Ok(path)
}

/// Move `file` into `dir`, creating `dir` when missing. Returns the new
/// path.
pub async fn move_into(file: &Path, dir: &Path) -> Result<PathBuf> {
    tokio::fs::create_dir_all(dir)
        .await
        .wrap_err_with(|| format!("failed to create directory: {}", dir.display()))?;

    let file_name = file.file_name().unwrap_or_default();
    let dest = dir.join(file_name);

    if tokio::fs::rename(file, &dest).await.is_err() {
        // rename fails across file systems
        tokio::fs::copy(file, &dest).await.wrap_err_with(|| {
            format!("failed to copy {} to {}", file.display(), dest.display())
        })?;
        tokio::fs::remove_file(file).await?;
    }

    Ok(dest)
}

/// Remove every temporary install directory directly under `base`.
pub async fn cleanup_install_dirs(base: &Path) -> Result<Vec<PathBuf>> {
    let mut removed = vec![];
    let mut entries = tokio::fs::read_dir(base)
        .await
        .wrap_err_with(|| format!("failed to read directory: {}", base.display()))?;

    while let Some(entry) = entries.next_entry().await? {
        let name = entry.file_name().to_string_lossy().to_string();

        if entry.file_type().await?.is_dir() && is_temp_install_dir(&name) {
            debug!("removing temporary install directory: {name}");
            tokio::fs::remove_dir_all(entry.path()).await?;
            removed.push(entry.path());
        }
    }

    Ok(removed)
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;

    #[test]
    fn recognizes_temp_install_dirs() {
        let name = install_dir_name(Uuid::new_v4());

        assert!(is_temp_install_dir(&name));
        assert!(!is_temp_install_dir("install-not-a-uuid"));
        assert!(!is_temp_install_dir("src"));
    }

    #[test]
    fn builds_cargo_install_args() {
        let args = cargo_install_args(
            "KinsonDigital",
            "kd-admin",
            "v1.2.3",
            "x86_64-unknown-linux-gnu",
            Path::new("/work/install-x"),
        );

        assert_eq!(
            args.join(" "),
            "install --git https://github.com/KinsonDigital/kd-admin --tag v1.2.3 \
             --target x86_64-unknown-linux-gnu --root /work/install-x --locked kd-admin"
        );
    }

    #[tokio::test]
    async fn cleanup_removes_only_temp_install_dirs() {
        let dir = TempDir::new().unwrap();
        let temp = dir.path().join(install_dir_name(Uuid::new_v4()));
        std::fs::create_dir_all(temp.join("bin")).unwrap();
        std::fs::create_dir(dir.path().join("install-notes")).unwrap();
        std::fs::write(dir.path().join("keep.txt"), "").unwrap();

        let removed = cleanup_install_dirs(dir.path()).await.unwrap();

        assert_eq!(removed, vec![temp.clone()]);
        assert!(!temp.exists());
        assert!(dir.path().join("install-notes").exists());
        assert!(dir.path().join("keep.txt").exists());
    }

    #[test]
    fn wrapper_scripts_pin_the_tag() {
        let script = wrapper_script(
            Platform::LinuxX64,
            "KinsonDigital",
            "kd-admin",
            "v1.2.3",
        );

        assert!(script.starts_with("#!/bin/sh\n"));
        assert!(script.contains(
            "cargo install --git https://github.com/KinsonDigital/kd-admin --tag v1.2.3 "
        ));
        assert!(script.ends_with("kd-admin \"$@\"\n"));

        let script =
            wrapper_script(Platform::WinX64, "KinsonDigital", "kd-admin", "v1.2.3");
        assert!(script.ends_with("& kd-admin @args\n"));
        assert_eq!(wrapper_file_name(Platform::WinX64), "kd-admin.ps1");
    }

    #[tokio::test]
    async fn writes_wrapper_into_dev_tools() {
        let dir = TempDir::new().unwrap();

        let path = write_wrapper(
            dir.path(),
            Platform::LinuxX64,
            "KinsonDigital",
            "kd-admin",
            "v1.2.3",
        )
        .await
        .unwrap();

        assert_eq!(path, dir.path().join("dev-tools").join("bin").join("kd-admin"));
        assert!(std::fs::read_to_string(path).unwrap().contains("--tag v1.2.3"));
    }

    #[tokio::test]
    async fn moves_file_into_new_dir() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("kd-admin");
        std::fs::write(&file, "bin").unwrap();

        let dest = move_into(&file, &dir.path().join("kdcli")).await.unwrap();

        assert_eq!(dest, dir.path().join("kdcli").join("kd-admin"));
        assert_eq!(std::fs::read_to_string(dest).unwrap(), "bin");
        assert!(!file.exists());
    }
}
