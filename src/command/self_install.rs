//! Installs a tagged release of kd-admin for the current platform.
use log::*;
use secrecy::SecretString;
use std::path::PathBuf;
use uuid::Uuid;

use crate::{
    command::common,
    error::AdminError,
    forge::manager::ForgeManager,
    install::{
        self, BINARY_NAME, CargoToolchain, INSTALL_OWNER, INSTALL_REPO,
        Toolchain,
        env_var::{self, EnvVars, SystemEnvVars},
        pat,
        platform::Platform,
    },
    prompt::{Prompter, TerminalPrompter},
    result::Result,
    version,
};

/// Version answer that resolves to the most recent tag.
pub const LATEST: &str = "latest";

/// Self install workflow.
pub struct Installer<'a> {
    forge: &'a ForgeManager,
    prompter: &'a dyn Prompter,
    env: &'a dyn EnvVars,
    toolchain: &'a dyn Toolchain,
    platform: Platform,
    work_dir: PathBuf,
    install_dir: PathBuf,
}

impl<'a> Installer<'a> {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        forge: &'a ForgeManager,
        prompter: &'a dyn Prompter,
        env: &'a dyn EnvVars,
        toolchain: &'a dyn Toolchain,
        platform: Platform,
        work_dir: PathBuf,
        install_dir: PathBuf,
    ) -> Self {
        Self {
            forge,
            prompter,
            env,
            toolchain,
            platform,
            work_dir,
            install_dir,
        }
    }

    /// Install `version`, or a prompted version when `None`. Returns the
    /// installed executable.
    pub async fn run(&self, version: Option<&str>) -> Result<PathBuf> {
        let version = self.resolve_version(version).await?;

        info!("installing {BINARY_NAME} {version} for {}", self.platform);
        let result = self.compile_and_move(&version).await;

        let removed = install::cleanup_install_dirs(&self.work_dir).await?;
        debug!("removed {} temporary install directories", removed.len());

        let executable = result?;
        info!("installed {}", executable.display());

        let wrapper = install::write_wrapper(
            &self.work_dir,
            self.platform,
            self.forge.owner(),
            self.forge.repo(),
            &version,
        )
        .await?;
        info!("wrote wrapper script {}", wrapper.display());

        if let Err(e) = pat::ensure_token(self.env, self.prompter).await {
            warn!("failed to store the personal access token: {e:#}");
        }

        env_var::add_to_path(self.env, self.platform, &self.install_dir).await?;

        Ok(executable)
    }

    async fn resolve_version(&self, version: Option<&str>) -> Result<String> {
        let tags = self
            .forge
            .get_tags()
            .await?
            .into_iter()
            .map(|t| t.name)
            .collect::<Vec<String>>();

        let answer = match version {
            Some(version) => version.to_string(),
            None => {
                let options = std::iter::once(LATEST.to_string())
                    .chain(tags.iter().cloned())
                    .collect::<Vec<String>>();
                self.prompter
                    .select("Choose a version to install:", &options)?
            }
        };

        let answer = answer.trim().to_lowercase();

        if answer == LATEST {
            return tags.first().cloned().ok_or_else(|| {
                AdminError::precondition(format!(
                    "No releases of '{}/{}' exist.",
                    self.forge.owner(),
                    self.forge.repo()
                ))
                .into()
            });
        }

        let version = version::normalize(&answer);

        if !version::is_either_valid(&version) {
            return Err(AdminError::precondition(format!(
                "The version '{answer}' is not a valid version."
            ))
            .into());
        }

        if !tags.contains(&version) {
            return Err(AdminError::precondition(format!(
                "The version '{version}' does not exist. Aborting installation."
            ))
            .into());
        }

        Ok(version)
    }

    async fn compile_and_move(&self, version: &str) -> Result<PathBuf> {
        let root = self.work_dir.join(install::install_dir_name(Uuid::new_v4()));
        let args = install::cargo_install_args(
            self.forge.owner(),
            self.forge.repo(),
            version,
            self.platform.target_triple(),
            &root,
        );

        self.toolchain.cargo_install(args).await?;

        let compiled = root
            .join("bin")
            .join(self.platform.executable_name(BINARY_NAME));

        if !compiled.is_file() {
            return Err(AdminError::command(
                "cargo install",
                format!("the executable '{}' was not produced", compiled.display()),
            )
            .into());
        }

        install::move_into(&compiled, &self.install_dir).await
    }
}

/// Install kd-admin into the platform install directory.
pub async fn execute(version: Option<&str>) -> Result<()> {
    let platform = Platform::current()?;
    let env = SystemEnvVars::new(platform);
    let token = env.get(pat::TOKEN_VAR).unwrap_or_default();
    let forge = common::github_manager(
        INSTALL_OWNER,
        INSTALL_REPO,
        SecretString::from(token.trim().to_string()),
    )?;
    let prompter = TerminalPrompter::stdio();
    let toolchain = CargoToolchain;
    let install_dir = platform.install_dir(&env)?;
    let work_dir = std::env::current_dir()?;

    Installer::new(
        &forge,
        &prompter,
        &env,
        &toolchain,
        platform,
        work_dir,
        install_dir,
    )
    .run(version)
    .await?;

    info!("Installation complete!");

    Ok(())
}


#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;
    use crate::{
        command::{
            self_update,
            tests::common::{create_test_manager, is_precondition, tags},
        },
        forge::traits::MockForge,
        install::{MockToolchain, env_var::MockEnvVars, env_var::PATH_VAR},
        prompt::MockPrompter,
    };

    fn forge() -> ForgeManager {
        let mut forge = MockForge::new();
        forge
            .expect_get_tags()
            .returning(|| Ok(tags(&["v1.2.3", "v1.0.0"])));
        create_test_manager(forge)
    }

    /// Toolchain that drops an executable where `cargo install --root`
    /// would put it.
    fn compiling_toolchain() -> MockToolchain {
        let mut toolchain = MockToolchain::new();
        toolchain
            .expect_cargo_install()
            .withf(|args| args.contains(&"--tag".to_string()))
            .times(1)
            .returning(|args| {
                let root_at = args.iter().position(|a| a == "--root").unwrap();
                let bin = PathBuf::from(&args[root_at + 1]).join("bin");
                std::fs::create_dir_all(&bin).unwrap();
                std::fs::write(bin.join("kd-admin.exe"), "exe").unwrap();
                Ok(())
            });
        toolchain
    }

    fn env(install_dir: &std::path::Path) -> MockEnvVars {
        let path = install_dir.to_string_lossy().to_string();
        let mut env = MockEnvVars::new();
        env.expect_get()
            .withf(|name| name == pat::TOKEN_VAR)
            .returning(|_| Some("token".into()));
        env.expect_get()
            .withf(|name| name == PATH_VAR)
            .returning(move |_| Some(path.clone()));
        env.expect_set_persistent().never();
        env
    }

    #[tokio::test]
    async fn installs_latest_and_writes_pinned_wrapper() {
        let work = TempDir::new().unwrap();
        let install_dir = work.path().join("kdcli");
        let forge = forge();
        let prompter = MockPrompter::new();
        let env = env(&install_dir);
        let toolchain = compiling_toolchain();

        let executable = Installer::new(
            &forge,
            &prompter,
            &env,
            &toolchain,
            Platform::WinX64,
            work.path().to_path_buf(),
            install_dir.clone(),
        )
        .run(Some(LATEST))
        .await
        .unwrap();

        assert_eq!(executable, install_dir.join("kd-admin.exe"));

        let wrapper = work.path().join("dev-tools").join("bin").join("kd-admin.ps1");
        let content = std::fs::read_to_string(&wrapper).unwrap();
        assert_eq!(
            self_update::current_version(&wrapper, &content).unwrap(),
            "v1.2.3"
        );
        assert!(
            self_update::update_content(&wrapper, &content, "v1.2.3")
                .unwrap()
                .is_none()
        );
    }

    #[tokio::test]
    async fn unknown_version_is_rejected_before_compiling() {
        let work = TempDir::new().unwrap();
        let forge = forge();
        let prompter = MockPrompter::new();
        let env = MockEnvVars::new();
        let mut toolchain = MockToolchain::new();
        toolchain.expect_cargo_install().never();

        let report = Installer::new(
            &forge,
            &prompter,
            &env,
            &toolchain,
            Platform::WinX64,
            work.path().to_path_buf(),
            work.path().join("kdcli"),
        )
        .run(Some("v9.9.9"))
        .await
        .unwrap_err();

        assert!(is_precondition(&report));
        assert!(!work.path().join("dev-tools").exists());
    }
}
