use std::path::PathBuf;
use strum::{Display, EnumString};

use crate::{
    error::AdminError, install::env_var::EnvVars, result::Result,
};

const WINDOWS_APP_DATA_VAR: &str = "LOCALAPPDATA";
const INSTALL_DIR_NAME: &str = "kdcli";
const LINUX_INSTALL_ROOT: &str = "/usr/local";

/// Platforms kd-admin can be installed on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString)]
pub enum Platform {
    #[strum(serialize = "win-x64")]
    WinX64,
    #[strum(serialize = "linux-x64")]
    LinuxX64,
}

impl Platform {
    /// Resolve the platform from an operating system name as reported by
    /// [`std::env::consts::OS`].
    pub fn from_os(os: &str) -> Result<Self> {
        match os {
            "windows" => Ok(Platform::WinX64),
            "linux" => Ok(Platform::LinuxX64),
            other => Err(AdminError::unsupported(format!(
                "The operating system '{other}' is not supported."
            ))
            .into()),
        }
    }

    pub fn current() -> Result<Self> {
        Self::from_os(std::env::consts::OS)
    }

    /// Rust target triple the executable is compiled for.
    pub fn target_triple(&self) -> &'static str {
        match self {
            Platform::WinX64 => "x86_64-pc-windows-msvc",
            Platform::LinuxX64 => "x86_64-unknown-linux-gnu",
        }
    }

    pub fn executable_name(&self, name: &str) -> String {
        match self {
            Platform::WinX64 => format!("{name}.exe"),
            Platform::LinuxX64 => name.to_string(),
        }
    }

    pub fn path_separator(&self) -> char {
        match self {
            Platform::WinX64 => ';',
            Platform::LinuxX64 => ':',
        }
    }

    /// Directory the compiled executable is moved into.
    pub fn install_dir(&self, env: &dyn EnvVars) -> Result<PathBuf> {
        match self {
            Platform::WinX64 => {
                let app_data = env
                    .get(WINDOWS_APP_DATA_VAR)
                    .filter(|v| !v.trim().is_empty())
                    .ok_or_else(|| {
                        AdminError::TokenNotSet(WINDOWS_APP_DATA_VAR.into())
                    })?;
                Ok(PathBuf::from(app_data.trim()).join(INSTALL_DIR_NAME))
            }
            Platform::LinuxX64 => {
                Ok(PathBuf::from(LINUX_INSTALL_ROOT).join(INSTALL_DIR_NAME))
            }
        }
    }
}
