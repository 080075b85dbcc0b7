//! Client for the source-control host (GitHub).
//!
//! The [`traits::Forge`] trait is the seam the workflows talk through;
//! [`github::Github`] implements it over the REST and GraphQL APIs and
//! [`manager::ForgeManager`] layers lookups on top.

/// Connection configuration and authentication.
pub mod config;

/// GitHub API client implementation.
pub mod github;

/// Lookup helpers over a forge implementation.
pub mod manager;

/// Common trait for the host abstraction.
pub mod traits;

/// Shared records for issues, pull requests, labels and projects.
pub mod types;
