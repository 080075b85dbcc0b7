//! Runs a checker program against every file with a given extension under a
//! directory. The checks run concurrently and their results are reported
//! once all of them have finished.
use futures_util::future::join_all;
use log::*;
use std::path::{Path, PathBuf};

use crate::{error::AdminError, path_helpers, process, result::Result};

/// Outcome of checking a single file.
#[derive(Debug, Clone, PartialEq)]
pub struct CheckResult {
    pub file: PathBuf,
    pub output: String,
    pub has_passed: bool,
}

/// Files under `dir` with the extension `ext`. A leading `.` on `ext` is
/// ignored.
pub async fn matching_files(dir: &Path, ext: &str) -> Result<Vec<PathBuf>> {
    let ext = ext.trim().trim_start_matches('.').to_string();

    path_helpers::find_files(dir, |path| {
        path.extension().is_some_and(|e| e.to_string_lossy() == ext)
    })
    .await
}

async fn check_file(program: &str, args: &[String], file: PathBuf) -> CheckResult {
    let mut args = args.to_vec();
    args.push(file.to_string_lossy().to_string());

    match process::execute(program, &args, None).await {
        Ok(output) => CheckResult {
            file,
            output: output.combined(),
            has_passed: output.success,
        },
        Err(e) => CheckResult {
            file,
            output: format!("{e:#}"),
            has_passed: false,
        },
    }
}

/// Run `program args <file>` for every file concurrently.
pub async fn run_checks(
    files: Vec<PathBuf>,
    program: &str,
    args: &[String],
) -> Vec<CheckResult> {
    join_all(files.into_iter().map(|file| check_file(program, args, file))).await
}

/// Log every result and the totals. Fails when any check failed.
pub fn report(results: &[CheckResult]) -> Result<()> {
    for result in results.iter() {
        if result.has_passed {
            info!("✅ {}", result.file.display());
        } else {
            error!("❌ {}", result.file.display());
        }

        if !result.output.is_empty() {
            info!("{}", result.output);
        }
    }

    let failed = results.iter().filter(|r| !r.has_passed).count();
    let passed = results.len() - failed;

    info!("Total files checked: {}", results.len());
    info!("Passed: {passed}");
    info!("Failed: {failed}");

    if failed > 0 {
        return Err(AdminError::ChecksFailed(format!(
            "{failed} of {} checks failed.",
            results.len()
        ))
        .into());
    }

    Ok(())
}

pub async fn execute(dir: &Path, ext: &str, program: &str, args: &[String]) -> Result<()> {
    let files = matching_files(dir, ext).await?;

    if files.is_empty() {
        warn!("No '.{}' files found in {}", ext.trim_start_matches('.'), dir.display());
        return Ok(());
    }

    let results = run_checks(files, program, args).await;
    report(&results)
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;

    fn result(file: &str, has_passed: bool) -> CheckResult {
        CheckResult {
            file: PathBuf::from(file),
            output: String::new(),
            has_passed,
        }
    }

    #[tokio::test]
    async fn finds_files_by_extension() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("a.ts"), "").unwrap();
        std::fs::write(dir.path().join("b.md"), "").unwrap();

        let files = matching_files(dir.path(), ".ts").await.unwrap();

        assert_eq!(files, vec![dir.path().join("a.ts")]);
    }

    #[tokio::test]
    async fn unstartable_program_fails_every_check() {
        let files = vec![PathBuf::from("a.ts"), PathBuf::from("b.ts")];

        let results = run_checks(files, "kd-admin-no-such-checker", &[]).await;

        assert_eq!(results.len(), 2);
        assert!(results.iter().all(|r| !r.has_passed && !r.output.is_empty()));
        assert_eq!(results[0].file, PathBuf::from("a.ts"));
    }

    #[test]
    fn report_fails_when_any_check_fails() {
        assert!(report(&[result("a.ts", true)]).is_ok());

        let report = report(&[result("a.ts", true), result("b.ts", false)]).unwrap_err();
        assert!(matches!(
            report.downcast_ref::<AdminError>(),
            Some(AdminError::ChecksFailed(_))
        ));
    }
}
