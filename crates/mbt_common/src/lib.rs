//! Shared foundational types used across the module build tool.
//!
//! This crate provides the [`Module`] value produced by discovery and consumed
//! by every later stage, and the [`DescriptorNaming`] convention that ties a
//! module directory to its descriptor file.

#![warn(missing_docs)]

pub mod module;
pub mod naming;

pub use module::Module;
pub use naming::{DescriptorNaming, DEFAULT_DESCRIPTOR_SUFFIX};
