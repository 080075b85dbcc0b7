//! Connection configuration for the GitHub API.
use secrecy::SecretString;

/// Base URL of the GitHub REST and GraphQL API.
pub const DEFAULT_API_BASE_URL: &str = "https://api.github.com";
/// Page size for paginated list queries.
pub const DEFAULT_PAGE_SIZE: u8 = 100;

/// Repository a forge client talks to along with its credentials.
#[derive(Debug, Clone)]
pub struct RemoteConfig {
    /// Repository owner. Also used as the organization login.
    pub owner: String,
    /// Repository name.
    pub repo: String,
    /// Access token. An empty token makes unauthenticated requests.
    pub token: SecretString,
}

impl RemoteConfig {
    pub fn new(
        owner: impl Into<String>,
        repo: impl Into<String>,
        token: SecretString,
    ) -> Self {
        Self {
            owner: owner.into(),
            repo: repo.into(),
            token,
        }
    }

    /// Web URL of the repository.
    pub fn repo_url(&self) -> String {
        format!("https://github.com/{}/{}", self.owner, self.repo)
    }
}

impl Default for RemoteConfig {
    fn default() -> Self {
        Self {
            owner: "".to_string(),
            repo: "".to_string(),
            token: SecretString::from("".to_string()),
        }
    }
}
