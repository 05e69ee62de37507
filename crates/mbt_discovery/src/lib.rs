//! Module discovery over a source tree.
//!
//! Each direct subdirectory of the source root is searched depth-first for a
//! descriptor file. The first directory on a path that directly contains a
//! descriptor becomes a [`Module`](mbt_common::Module), and the search does
//! not descend below it.

#![warn(missing_docs)]

pub mod error;
pub mod finder;

pub use error::DiscoveryError;
pub use finder::{discover, scan, Discovery, SkippedDir};
