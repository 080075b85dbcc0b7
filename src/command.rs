//! Subcommand workflows.
//!
//! Each workflow has an `execute` entry point that loads its settings and
//! wires the real collaborators. The workflow itself is a struct over
//! borrowed trait objects so tests can drive it with mocks.
pub mod check;
pub mod check_release_notes;
pub mod check_version;
pub mod common;
pub mod create_pr;
pub mod init;
pub mod prepare_release;
pub mod self_install;
pub mod self_update;
