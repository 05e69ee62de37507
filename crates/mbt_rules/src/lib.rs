//! Module rules and descriptor evaluation.
//!
//! A module's descriptor is a small declarative TOML file evaluated in
//! isolation into a [`ModuleRules`] value: the module kind, its public and
//! private dependencies, and its public and private include paths.

#![warn(missing_docs)]

pub mod descriptor;
pub mod error;
pub mod rules;

pub use descriptor::{evaluate_str, DescriptorEvaluator, TomlDescriptorEvaluator};
pub use error::DescriptorError;
pub use rules::{ModuleKind, ModuleRules, ParseModuleKindError};
