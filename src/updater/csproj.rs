//! Version updates for C# project files.
use color_eyre::eyre::eyre;
use regex::Regex;
use std::sync::LazyLock;

use crate::result::Result;

static VERSION_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<Version\s*>.*</Version\s*>").unwrap());

static FILE_VERSION_TAG: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"<FileVersion\s*>.*</FileVersion\s*>").unwrap()
});

/// Replace every `<Version>` and `<FileVersion>` element value with
/// `version`. Both elements must be present.
pub fn update_content(content: &str, version: &str) -> Result<String> {
    if !VERSION_TAG.is_match(content) {
        return Err(eyre!(
            "the csharp project file does not contain a version property, expected '<Version>...</Version>'"
        ));
    }

    if !FILE_VERSION_TAG.is_match(content) {
        return Err(eyre!(
            "the csharp project file does not contain a file version property, expected '<FileVersion>...</FileVersion>'"
        ));
    }

    let updated = VERSION_TAG.replace_all(
        content,
        regex::NoExpand(&format!("<Version>{version}</Version>")),
    );
    let updated = FILE_VERSION_TAG.replace_all(
        &updated,
        regex::NoExpand(&format!("<FileVersion>{version}</FileVersion>")),
    );

    Ok(updated.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    const PROJECT: &str = r#"<Project Sdk="Microsoft.NET.Sdk">
  <PropertyGroup>
    <Version>1.0.0</Version>
    <FileVersion >1.0.0</FileVersion >
    <TargetFramework>net8.0</TargetFramework>
  </PropertyGroup>
</Project>
"#;

    #[test]
    fn updates_version_and_file_version() {
        let updated = update_content(PROJECT, "v1.2.3").unwrap();

        assert!(updated.contains("<Version>v1.2.3</Version>"));
        assert!(updated.contains("<FileVersion>v1.2.3</FileVersion>"));
        assert!(updated.contains("<TargetFramework>net8.0</TargetFramework>"));
    }

    #[test]
    fn update_is_idempotent() {
        let once = update_content(PROJECT, "v1.2.3").unwrap();
        let twice = update_content(&once, "v1.2.3").unwrap();

        assert_eq!(once, twice);
    }

    #[test]
    fn missing_file_version_is_error() {
        let content = "<Project><Version>1.0.0</Version></Project>";

        let err = update_content(content, "v1.2.3").unwrap_err();
        assert!(err.to_string().contains("FileVersion"));
    }

    #[test]
    fn missing_version_is_error() {
        let content = "<Project><FileVersion>1.0.0</FileVersion></Project>";

        let err = update_content(content, "v1.2.3").unwrap_err();
        assert!(err.to_string().contains("<Version>"));
    }
}
