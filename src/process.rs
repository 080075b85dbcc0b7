//! Launches external programs and captures their output.
use log::*;
use std::path::Path;
use tokio::process::Command;

use crate::{error::AdminError, result::Result};

/// Captured result of a finished process.
#[derive(Debug, Clone, PartialEq)]
pub struct ProcessOutput {
    pub success: bool,
    pub stdout: String,
    pub stderr: String,
}

impl ProcessOutput {
    /// Stdout followed by stderr, trimmed.
    pub fn combined(&self) -> String {
        let mut output = self.stdout.trim_end().to_string();
        let stderr = self.stderr.trim_end();

        if !stderr.is_empty() {
            if !output.is_empty() {
                output.push('\n');
            }
            output.push_str(stderr);
        }

        output
    }
}

fn display(program: &str, args: &[String]) -> String {
    std::iter::once(program.to_string())
        .chain(args.iter().cloned())
        .collect::<Vec<String>>()
        .join(" ")
}

/// Run a program to completion without treating a non-zero exit as an
/// error. Fails only when the program cannot be started.
pub async fn execute(
    program: &str,
    args: &[String],
    dir: Option<&Path>,
) -> Result<ProcessOutput> {
    let command_line = display(program, args);
    debug!("running: {command_line}");

    let mut command = Command::new(program);
    command.args(args);

    if let Some(dir) = dir {
        command.current_dir(dir);
    }

    let output = command
        .output()
        .await
        .map_err(|e| AdminError::command(&command_line, e.to_string()))?;

    Ok(ProcessOutput {
        success: output.status.success(),
        stdout: String::from_utf8_lossy(&output.stdout).to_string(),
        stderr: String::from_utf8_lossy(&output.stderr).to_string(),
    })
}

/// Run a program and return its stdout. A non-zero exit is a
/// [`AdminError::Command`] carrying the program's stderr.
pub async fn run(program: &str, args: &[String]) -> Result<String> {
    run_in(program, args, None).await
}

/// Same as [`run`] but inside `dir`.
pub async fn run_in(
    program: &str,
    args: &[String],
    dir: Option<&Path>,
) -> Result<String> {
    let output = execute(program, args, dir).await?;

    if !output.success {
        let message = if output.stderr.trim().is_empty() {
            output.stdout.trim().to_string()
        } else {
            output.stderr.trim().to_string()
        };

        return Err(AdminError::command(display(program, args), message).into());
    }

    Ok(output.stdout)
}
