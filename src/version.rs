//! Classification of release version strings.
//!
//! Two shapes are accepted, and they are mutually exclusive:
//!
//! - production: `vMAJOR.MINOR.PATCH`
//! - preview: `vMAJOR.MINOR.PATCH-preview.N`
//!
//! Every numeric group is a non-negative integer without leading zeros,
//! except for the literal `0`. Input is trimmed and lower-cased before it is
//! checked. These checks are purely local and run before any network
//! validation of a version.
use regex::Regex;
use std::{str::FromStr, sync::LazyLock};
use strum::{Display, EnumString};

use crate::error::AdminError;

/// Production version pattern.
pub const PRODUCTION_VERSION_PATTERN: &str =
    r"^v(0|[1-9]\d*)\.(0|[1-9]\d*)\.(0|[1-9]\d*)$";

/// Preview version pattern.
pub const PREVIEW_VERSION_PATTERN: &str =
    r"^v(0|[1-9]\d*)\.(0|[1-9]\d*)\.(0|[1-9]\d*)-preview\.(0|[1-9]\d*)$";

/// Matches a version embedded anywhere in a larger string, such as a URL.
pub const EMBEDDED_VERSION_PATTERN: &str =
    r"v(0|[1-9]\d*)\.(0|[1-9]\d*)\.(0|[1-9]\d*)(-preview\.([1-9]\d*))?";

static PRODUCTION_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(PRODUCTION_VERSION_PATTERN).unwrap());

static PREVIEW_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(PREVIEW_VERSION_PATTERN).unwrap());

/// The two supported kinds of release versions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString)]
#[strum(serialize_all = "lowercase")]
pub enum VersionKind {
    Production,
    Preview,
}

fn prepare(version: &str) -> String {
    version.trim().to_lowercase()
}

/// Returns true if the version is a valid production version.
pub fn is_production(version: &str) -> bool {
    PRODUCTION_REGEX.is_match(&prepare(version))
}

/// Returns true if the version is a valid preview version.
pub fn is_preview(version: &str) -> bool {
    PREVIEW_REGEX.is_match(&prepare(version))
}

/// Returns true if the version is either a valid production or preview version.
pub fn is_either_valid(version: &str) -> bool {
    classify(version).is_some()
}

/// Classifies the version, returning `None` when it matches neither shape.
pub fn classify(version: &str) -> Option<VersionKind> {
    if is_production(version) {
        Some(VersionKind::Production)
    } else if is_preview(version) {
        Some(VersionKind::Preview)
    } else {
        None
    }
}

/// Trims and lower-cases the version and prefixes it with `v` if missing.
pub fn normalize(version: &str) -> String {
    let version = prepare(version);

    if version.starts_with('v') {
        version
    } else {
        format!("v{version}")
    }
}

/// Parses a release type name and checks that `version` has the matching
/// shape. Returns the kind and the normalized version.
pub fn check_release_version(
    release_type: &str,
    version: &str,
) -> Result<(VersionKind, String), AdminError> {
    let kind = VersionKind::from_str(&prepare(release_type))
        .map_err(|_| AdminError::InvalidReleaseType(release_type.to_string()))?;
    let version = normalize(version);

    match kind {
        VersionKind::Preview if !is_preview(&version) => {
            Err(AdminError::InvalidPreviewVersion(version))
        }
        VersionKind::Production if !is_production(&version) => {
            Err(AdminError::InvalidProductionVersion(version))
        }
        _ => Ok((kind, version)),
    }
}
