//! CLI argument parsing.
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::settings::{CREATE_PR_SETTINGS_FILE, PREPARE_RELEASE_SETTINGS_FILE};

/// Global CLI arguments.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
pub struct Args {
    #[arg(long, default_value_t = false, global = true)]
    /// Enable debug logging.
    pub debug: bool,

    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Command,
}

/// kd-admin subcommands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Create a feature branch and pull request for an issue.
    CreatePr {
        #[arg(long, default_value = CREATE_PR_SETTINGS_FILE)]
        /// Path to the create pr settings file.
        settings: PathBuf,
    },

    /// Create a release branch, update the version, generate release notes
    /// and open the release pull request.
    PrepareForRelease {
        #[arg(long, default_value = PREPARE_RELEASE_SETTINGS_FILE)]
        /// Path to the prepare release settings file.
        settings: PathBuf,
    },

    /// Scaffold wrapper scripts and settings files into the current
    /// directory.
    Init,

    /// Build and install kd-admin for the current platform.
    Install {
        /// Version to install, or "latest". Prompted for when omitted.
        version: Option<String>,
    },

    /// Update the installed wrapper scripts to the latest release.
    Update,

    /// Check that a version can be released.
    CheckVersion {
        #[arg(long, env = "OWNER_NAME")]
        /// Owner of the repository.
        owner: Option<String>,

        #[arg(long, env = "REPO_NAME")]
        /// Name of the repository.
        repo: Option<String>,

        #[arg(long, env = "VERSION_TYPE")]
        /// Either "preview" or "production".
        version_type: Option<String>,

        #[arg(long, env = "VERSION")]
        /// Version to check.
        version: Option<String>,
    },

    /// Check that the release notes for a version exist.
    CheckReleaseNotes {
        #[arg(long, env = "RELEASE_TYPE")]
        /// Either "preview" or "production".
        release_type: Option<String>,

        #[arg(long, env = "VERSION")]
        /// Version of the release notes.
        version: Option<String>,
    },

    /// Run a checker program against every file with an extension.
    Check {
        #[arg(long, default_value = ".")]
        /// Directory searched for files.
        dir: PathBuf,

        #[arg(long)]
        /// Extension of the files to check.
        ext: String,

        #[arg(long)]
        /// Program that checks a single file.
        program: String,

        /// Arguments passed to the program before the file path.
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        args: Vec<String>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_settings_defaults() {
        let args = Args::try_parse_from(["kd-admin", "create-pr"]).unwrap();

        match args.command {
            Command::CreatePr { settings } => {
                assert_eq!(settings, PathBuf::from(CREATE_PR_SETTINGS_FILE))
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn parses_global_debug_after_subcommand() {
        let args = Args::try_parse_from([
            "kd-admin",
            "prepare-for-release",
            "--settings",
            "custom.json",
            "--debug",
        ])
        .unwrap();

        assert!(args.debug);
        assert!(matches!(
            args.command,
            Command::PrepareForRelease { settings } if settings == PathBuf::from("custom.json")
        ));
    }

    #[test]
    fn check_passes_trailing_args() {
        let args = Args::try_parse_from([
            "kd-admin", "check", "--ext", "ts", "--program", "deno", "check", "--quiet",
        ])
        .unwrap();

        match args.command {
            Command::Check { program, args, .. } => {
                assert_eq!(program, "deno");
                assert_eq!(args, vec!["check", "--quiet"]);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn check_release_notes_falls_back_to_env() {
        temp_env::with_vars(
            [("RELEASE_TYPE", Some("preview")), ("VERSION", Some("v1.0.0"))],
            || {
                let args =
                    Args::try_parse_from(["kd-admin", "check-release-notes"]).unwrap();

                match args.command {
                    Command::CheckReleaseNotes {
                        release_type,
                        version,
                    } => {
                        assert_eq!(release_type.as_deref(), Some("preview"));
                        assert_eq!(version.as_deref(), Some("v1.0.0"));
                    }
                    other => panic!("unexpected command: {other:?}"),
                }
            },
        );
    }
}
