//! Version updates for JSON files such as `deno.json` or `package.json`.
use color_eyre::eyre::eyre;
use serde::Serialize;
use serde_json::{Value, json};

use crate::result::Result;

const INDENT: &[u8] = b"    ";

/// Set the string at the dot separated `key_path` to `version` and return
/// the re-serialized document with 4 space indentation and a trailing
/// newline.
pub fn update_content(
    content: &str,
    key_path: &str,
    version: &str,
) -> Result<String> {
    let mut doc: Value = serde_json::from_str(content)?;

    let mut current = &mut doc;
    for segment in key_path.split('.') {
        current = current
            .as_object_mut()
            .and_then(|obj| obj.get_mut(segment))
            .ok_or_else(|| {
                eyre!(
                    "the version file does not contain the key '{segment}' of key path '{key_path}'"
                )
            })?;
    }

    *current = json!(version);

    let mut buf = vec![];
    let formatter = serde_json::ser::PrettyFormatter::with_indent(INDENT);
    let mut serializer = serde_json::Serializer::with_formatter(&mut buf, formatter);
    doc.serialize(&mut serializer)?;

    let mut formatted = String::from_utf8(buf)?;
    formatted.push('\n');

    Ok(formatted)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn updates_top_level_version() {
        let content = r#"{"name":"kd-admin","version":"v1.0.0","tasks":{}}"#;

        let updated = update_content(content, "version", "v1.2.3").unwrap();

        assert_eq!(
            updated,
            "{\n    \"name\": \"kd-admin\",\n    \"version\": \"v1.2.3\",\n    \"tasks\": {}\n}\n"
        );
    }

    #[test]
    fn updates_nested_key_path_and_keeps_key_order() {
        let content = r#"{ "z": 1, "app": { "version": "v0.1.0", "name": "x" } }"#;

        let updated = update_content(content, "app.version", "v0.2.0").unwrap();
        let doc: Value = serde_json::from_str(&updated).unwrap();

        assert_eq!(doc["app"]["version"], "v0.2.0");
        assert!(updated.find("\"z\"").unwrap() < updated.find("\"app\"").unwrap());
    }

    #[test]
    fn missing_segment_is_named_in_error() {
        let content = r#"{ "app": { "name": "x" } }"#;

        let err = update_content(content, "app.version", "v1.0.0").unwrap_err();

        assert!(err.to_string().contains("'version'"));
    }

    #[test]
    fn non_object_parent_is_error() {
        let content = r#"{ "app": "v1.0.0" }"#;

        assert!(update_content(content, "app.version", "v1.0.0").is_err());
    }

    #[test]
    fn invalid_json_is_error() {
        assert!(update_content("{ nope", "version", "v1.0.0").is_err());
    }
}
