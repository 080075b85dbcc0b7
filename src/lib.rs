//! Release automation for GitHub organizations.
pub mod branch;
pub mod cli;
pub mod command;
pub mod error;
pub mod forge;
pub mod git;
pub mod install;
pub mod notes;
pub mod path_helpers;
pub mod process;
pub mod prompt;
pub mod result;
pub mod settings;
pub mod updater;
pub mod version;

pub use cli::{Args, Command};
pub use result::Result;
