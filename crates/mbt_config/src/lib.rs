//! Tool configuration: the resolved source, build, and output directories.
//!
//! A [`ToolConfig`] is constructed once at startup from the source directory
//! (plus an optional `mbt.toml` project file) and passed explicitly to every
//! component that needs a path.

#![warn(missing_docs)]

pub mod error;
pub mod loader;
pub mod types;

pub use error::ConfigError;
pub use loader::{load_config, load_config_from_str, PROJECT_FILE};
pub use types::*;
