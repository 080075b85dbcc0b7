//! Feature branch naming rules.
use regex::Regex;
use std::sync::LazyLock;

/// Prefix every feature branch must start with.
pub const FEATURE_BRANCH_PREFIX: &str = "feature/";

// `feature/<issue>-<name>` where the name never starts with a hyphen
static FEATURE_BRANCH_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^feature/[1-9][0-9]*-[a-z][a-z-]*$").unwrap());

/// Normalizes a user supplied head branch name.
///
/// The name is trimmed, lower-cased and underscores and spaces are turned
/// into hyphens. Unless the result already starts with `feature/`, it is
/// prefixed with `feature/<issue_number>-`.
pub fn normalize_head_branch(input: &str, issue_number: u64) -> String {
    let branch = input.trim().to_lowercase().replace(['_', ' '], "-");

    if branch.starts_with(FEATURE_BRANCH_PREFIX) {
        branch
    } else {
        format!("{FEATURE_BRANCH_PREFIX}{issue_number}-{branch}")
    }
}

/// Returns true if the branch matches `feature/<issue-number>-<branch-name>`.
pub fn is_valid_feature_branch(branch: &str) -> bool {
    FEATURE_BRANCH_REGEX.is_match(branch)
}

/// Returns true if every character of the input is an ASCII digit.
pub fn is_issue_number(input: &str) -> bool {
    let input = input.trim();
    !input.is_empty() && input.chars().all(|c| c.is_ascii_digit())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalizes_and_prefixes_branch() {
        assert_eq!(normalize_head_branch("my fix", 42), "feature/42-my-fix");
        assert_eq!(
            normalize_head_branch("  Add_New Thing ", 7),
            "feature/7-add-new-thing"
        );
    }

    #[test]
    fn keeps_existing_feature_prefix() {
        assert_eq!(
            normalize_head_branch("feature/12-existing", 42),
            "feature/12-existing"
        );
    }

    #[test]
    fn accepts_valid_feature_branches() {
        for branch in ["feature/1-a", "feature/42-my-fix", "feature/100-a-b-c-"] {
            assert!(is_valid_feature_branch(branch), "{branch}");
        }
    }

    #[test]
    fn rejects_invalid_feature_branches() {
        for branch in [
            "feature/42-My-fix",
            "feature/42--my-fix",
            "feature/0-my-fix",
            "feature/042-my-fix",
            "feature/my-fix",
            "42-my-fix",
            "bugfix/42-my-fix",
            "feature/42-my-fix2",
            "feature/42-",
        ] {
            assert!(!is_valid_feature_branch(branch), "{branch}");
        }
    }

    #[test]
    fn issue_number_must_be_all_digits() {
        assert!(is_issue_number("42"));
        assert!(is_issue_number(" 42 "));
        assert!(!is_issue_number(""));
        assert!(!is_issue_number("4a2"));
        assert!(!is_issue_number("-1"));
    }
}
