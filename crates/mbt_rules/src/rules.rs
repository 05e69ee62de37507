//! The structured result of evaluating a module descriptor.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// What kind of binary a module contributes to.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ModuleKind {
    /// Linked into every build, including shipping runtimes.
    #[default]
    Runtime,
    /// Only linked into editor builds.
    Editor,
    /// Loaded on demand as a plugin.
    Plugin,
    /// A standalone program entry point.
    Program,
}

impl ModuleKind {
    /// All kinds, in declaration order.
    pub const ALL: [ModuleKind; 4] = [
        ModuleKind::Runtime,
        ModuleKind::Editor,
        ModuleKind::Plugin,
        ModuleKind::Program,
    ];

    /// Returns the canonical name used in descriptors and manifests.
    pub fn as_str(self) -> &'static str {
        match self {
            ModuleKind::Runtime => "Runtime",
            ModuleKind::Editor => "Editor",
            ModuleKind::Plugin => "Plugin",
            ModuleKind::Program => "Program",
        }
    }
}

impl fmt::Display for ModuleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a string names no [`ModuleKind`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown module type '{0}' (expected one of Runtime, Editor, Plugin, Program)")]
pub struct ParseModuleKindError(pub String);

impl FromStr for ModuleKind {
    type Err = ParseModuleKindError;

    /// Parses a kind name, ignoring ASCII case.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ModuleKind::ALL
            .into_iter()
            .find(|kind| kind.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ParseModuleKindError(s.to_string()))
    }
}

/// A module's declared kind, dependencies, and include paths.
///
/// Each list holds unique entries in declaration order. Public entries are
/// visible to consumers of the module; private entries only to the module's
/// own compilation. Include-path order matters downstream, where earlier
/// paths take precedence.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModuleRules {
    /// The module kind.
    pub kind: ModuleKind,
    /// Modules this module depends on, re-exported to its consumers.
    pub public_dependency_names: Vec<String>,
    /// Modules only this module's own sources depend on.
    pub private_dependency_names: Vec<String>,
    /// Include paths exported to consumers.
    pub public_include_paths: Vec<String>,
    /// Include paths used only inside this module.
    pub private_include_paths: Vec<String>,
}

impl ModuleRules {
    /// Returns `true` if the rules declare nothing beyond the default kind.
    pub fn is_empty(&self) -> bool {
        self == &ModuleRules::default()
    }

    /// Iterates over public then private dependency names.
    pub fn all_dependencies(&self) -> impl Iterator<Item = &str> {
        self.public_dependency_names
            .iter()
            .chain(&self.private_dependency_names)
            .map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_kind_is_runtime() {
        assert_eq!(ModuleKind::default(), ModuleKind::Runtime);
        assert!(ModuleRules::default().is_empty());
    }

    #[test]
    fn kind_parse_ignores_case() {
        assert_eq!("editor".parse::<ModuleKind>(), Ok(ModuleKind::Editor));
        assert_eq!("PLUGIN".parse::<ModuleKind>(), Ok(ModuleKind::Plugin));
        assert_eq!("Program".parse::<ModuleKind>(), Ok(ModuleKind::Program));
    }

    #[test]
    fn kind_parse_rejects_unknown() {
        let err = "Shipping".parse::<ModuleKind>().unwrap_err();
        assert!(err.to_string().contains("unknown module type 'Shipping'"));
    }

    #[test]
    fn kind_display_matches_parse() {
        for kind in ModuleKind::ALL {
            assert_eq!(kind.to_string().parse::<ModuleKind>(), Ok(kind));
        }
    }

    #[test]
    fn all_dependencies_public_first() {
        let rules = ModuleRules {
            public_dependency_names: vec!["Core".to_string()],
            private_dependency_names: vec!["Sockets".to_string()],
            ..ModuleRules::default()
        };
        assert_eq!(rules.all_dependencies().collect::<Vec<_>>(), vec!["Core", "Sockets"]);
        assert!(!rules.is_empty());
    }

    #[test]
    fn serde_roundtrip() {
        let rules = ModuleRules {
            kind: ModuleKind::Editor,
            public_include_paths: vec!["Public".to_string()],
            ..ModuleRules::default()
        };
        let json = serde_json::to_string(&rules).unwrap();
        let back: ModuleRules = serde_json::from_str(&json).unwrap();
        assert_eq!(back, rules);
    }
}
