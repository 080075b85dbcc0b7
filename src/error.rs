//! Error taxonomy for kd-admin.
//!
//! Every fatal failure that should stop a run is expressed as an
//! [`AdminError`] and propagated to `main`, which maps it to a process exit
//! code. Non-fatal conditions are logged where they occur and never become
//! an `AdminError`.

use thiserror::Error;

/// Default exit code for fatal failures.
pub const DEFAULT_EXIT_CODE: i32 = 1;

/// Main error type for kd-admin operations.
#[derive(Error, Debug)]
pub enum AdminError {
    // Configuration errors
    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("The environment variable '{0}' is not set.")]
    TokenNotSet(String),

    // Precondition errors, checked before any state is mutated
    #[error("{0}")]
    Precondition(String),

    // External command errors
    #[error("The command '{command}' failed: {message}")]
    Command { command: String, message: String },

    #[error("{0}")]
    Unsupported(String),

    // Stage labelled errors used by the release notes check
    #[error("The '{0}' parameter is required.")]
    MissingParameter(String),

    #[error(
        "The version type must be either 'preview' or 'production' but received '{0}'."
    )]
    InvalidReleaseType(String),

    #[error("The preview version '{0}' is not valid.")]
    InvalidPreviewVersion(String),

    #[error("The production version '{0}' is not valid.")]
    InvalidProductionVersion(String),

    #[error("{0}")]
    ChecksFailed(String),

    // Wrapped library errors
    #[error("JSON parse error: {0}")]
    JsonParseError(#[from] serde_json::Error),

    #[error("Regular expression error: {0}")]
    RegexError(#[from] regex::Error),

    #[error("Template rendering failed: {0}")]
    TemplateError(#[from] tera::Error),

    #[error("GitHub API error: {0}")]
    ForgeError(#[from] octocrab::Error),

    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
}

impl AdminError {
    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a precondition error
    pub fn precondition(msg: impl Into<String>) -> Self {
        Self::Precondition(msg.into())
    }

    /// Create an external command error
    pub fn command(command: impl Into<String>, msg: impl Into<String>) -> Self {
        Self::Command {
            command: command.into(),
            message: msg.into(),
        }
    }

    /// Create an unsupported platform error
    pub fn unsupported(msg: impl Into<String>) -> Self {
        Self::Unsupported(msg.into())
    }

    /// Process exit code for this error.
    ///
    /// Most failures exit with 1. The check commands label the stage that
    /// failed with distinct codes.
    pub fn exit_code(&self) -> i32 {
        match self {
            AdminError::MissingParameter(name) if name == "VERSION" => 2,
            AdminError::InvalidReleaseType(_) => 200,
            AdminError::InvalidPreviewVersion(_) => 300,
            AdminError::InvalidProductionVersion(_) => 400,
            _ => DEFAULT_EXIT_CODE,
        }
    }
}

/// Resolve the exit code for any report produced by a command.
///
/// Reports that do not wrap an [`AdminError`] use [`DEFAULT_EXIT_CODE`].
pub fn exit_code_for(report: &color_eyre::Report) -> i32 {
    report
        .chain()
        .find_map(|cause| cause.downcast_ref::<AdminError>())
        .map(AdminError::exit_code)
        .unwrap_or(DEFAULT_EXIT_CODE)
}
