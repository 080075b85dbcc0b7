//! Result type used throughout kd-admin.
//!
//! All fallible functions return [`Result<T>`], an alias for
//! `color_eyre::eyre::Result<T>`. Typed failures are raised as
//! [`crate::error::AdminError`] and converted into the report with `?`, so
//! `main` can still recover the error category when choosing an exit code.
//!
//! # Usage
//!
//! ```rust,ignore
//! use color_eyre::eyre::WrapErr;
//! use crate::result::Result;
//!
//! fn load() -> Result<String> {
//!     let content = std::fs::read_to_string("create-pr-settings.json")
//!         .wrap_err("failed to read settings file")?;
//!     Ok(content)
//! }
//! ```
use color_eyre::eyre::Result as EyreResult;

/// Standard result type used throughout kd-admin.
pub type Result<T> = EyreResult<T>;
