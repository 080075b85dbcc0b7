use color_eyre::eyre::WrapErr;
use std::{
    borrow::Cow,
    path::{Path, PathBuf},
};

use crate::result::Result;

/// Replaces backslashes with forward slashes. Only allocates when the path
/// contains a backslash.
pub fn normalize_path(path: &str) -> Cow<'_, str> {
    if path.contains('\\') {
        Cow::Owned(path.replace('\\', "/"))
    } else {
        Cow::Borrowed(path)
    }
}

/// Normalizes a directory path: trimmed, forward slashes and no trailing
/// slash.
pub fn normalize_dir(dir: &str) -> String {
    let dir = normalize_path(dir.trim());
    dir.strip_suffix('/').unwrap_or(&dir).to_string()
}

/// Every file under `dir`, recursively, whose path satisfies `matches`.
/// The result is sorted.
pub async fn find_files<F>(dir: &Path, matches: F) -> Result<Vec<PathBuf>>
where
    F: Fn(&Path) -> bool,
{
    let mut files = vec![];
    let mut pending = vec![dir.to_path_buf()];

    while let Some(current) = pending.pop() {
        let mut entries = tokio::fs::read_dir(&current).await.wrap_err_with(|| {
            format!("failed to read directory: {}", current.display())
        })?;

        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();

            if entry.file_type().await?.is_dir() {
                pending.push(path);
            } else if matches(&path) {
                files.push(path);
            }
        }
    }

    files.sort();

    Ok(files)
}
