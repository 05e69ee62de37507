//! Per-module manifest files consumed by the native build step.
//!
//! A manifest is an XML document with one element per [`ModuleRules`] field:
//!
//! ```xml
//! <Module>
//!   <ModuleType>Runtime</ModuleType>
//!   <PublicDependencyModuleNames>
//!     <Item>Core</Item>
//!   </PublicDependencyModuleNames>
//!   <PrivateDependencyModuleNames/>
//!   <PublicIncludePaths/>
//!   <PrivateIncludePaths/>
//! </Module>
//! ```
//!
//! [`ModuleRules`]: mbt_rules::ModuleRules

#![warn(missing_docs)]

pub mod error;
pub mod reader;
pub mod writer;

pub use error::ManifestError;
pub use reader::{parse_manifest, read_manifest};
pub use writer::{manifest_path, render_manifest, write_manifest, ManifestWriter};

/// Root element name.
pub const MODULE_ELEMENT: &str = "Module";
/// Scalar element holding the module kind.
pub const MODULE_TYPE_ELEMENT: &str = "ModuleType";
/// Container for public dependency names.
pub const PUBLIC_DEPENDENCIES_ELEMENT: &str = "PublicDependencyModuleNames";
/// Container for private dependency names.
pub const PRIVATE_DEPENDENCIES_ELEMENT: &str = "PrivateDependencyModuleNames";
/// Container for public include paths.
pub const PUBLIC_INCLUDES_ELEMENT: &str = "PublicIncludePaths";
/// Container for private include paths.
pub const PRIVATE_INCLUDES_ELEMENT: &str = "PrivateIncludePaths";
/// One entry inside a container element.
pub const ITEM_ELEMENT: &str = "Item";
