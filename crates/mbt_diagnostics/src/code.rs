//! Diagnostic codes with category prefixes for structured error identification.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The category of a diagnostic code, determining its prefix letter.
///
/// Each category corresponds to one pipeline stage, so `E003` is always a
/// descriptor problem and `M001` always a manifest write failure.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub enum Category {
    /// Module discovery, prefixed with `D`.
    Discovery,
    /// Descriptor evaluation, prefixed with `E`.
    Descriptor,
    /// Manifest output, prefixed with `M`.
    Manifest,
    /// Staleness ledger, prefixed with `L`.
    Ledger,
}

impl Category {
    /// Returns the single-character prefix for this category.
    pub fn prefix(self) -> char {
        match self {
            Category::Discovery => 'D',
            Category::Descriptor => 'E',
            Category::Manifest => 'M',
            Category::Ledger => 'L',
        }
    }
}

/// A structured diagnostic code combining a category prefix and a numeric identifier.
///
/// Displayed as the category prefix followed by a zero-padded 3-digit number,
/// e.g. `E001`, `M001`.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub struct DiagnosticCode {
    /// The category of this diagnostic.
    pub category: Category,
    /// The numeric identifier within the category.
    pub number: u16,
}

impl DiagnosticCode {
    /// The source root could not be read.
    pub const SOURCE_ROOT_UNREADABLE: Self = Self::new(Category::Discovery, 1);
    /// A subtree vanished or became unreadable during the walk.
    pub const SUBTREE_SKIPPED: Self = Self::new(Category::Discovery, 2);
    /// The descriptor file could not be read.
    pub const DESCRIPTOR_UNREADABLE: Self = Self::new(Category::Descriptor, 1);
    /// The descriptor is not syntactically valid.
    pub const DESCRIPTOR_SYNTAX: Self = Self::new(Category::Descriptor, 2);
    /// The descriptor parsed but declares an invalid rules object.
    pub const DESCRIPTOR_INVALID: Self = Self::new(Category::Descriptor, 3);
    /// The manifest could not be written.
    pub const MANIFEST_WRITE: Self = Self::new(Category::Manifest, 1);
    /// The ledger file was unreadable or corrupt and was discarded.
    pub const LEDGER_DISCARDED: Self = Self::new(Category::Ledger, 1);
    /// The ledger could not be persisted.
    pub const LEDGER_PERSIST: Self = Self::new(Category::Ledger, 2);

    /// Creates a new diagnostic code.
    pub const fn new(category: Category, number: u16) -> Self {
        Self { category, number }
    }
}

impl fmt::Display for DiagnosticCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{:03}", self.category.prefix(), self.number)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn category_prefixes() {
        assert_eq!(Category::Discovery.prefix(), 'D');
        assert_eq!(Category::Descriptor.prefix(), 'E');
        assert_eq!(Category::Manifest.prefix(), 'M');
        assert_eq!(Category::Ledger.prefix(), 'L');
    }

    #[test]
    fn display_format() {
        assert_eq!(format!("{}", DiagnosticCode::DESCRIPTOR_SYNTAX), "E002");
        assert_eq!(format!("{}", DiagnosticCode::MANIFEST_WRITE), "M001");
        assert_eq!(format!("{}", DiagnosticCode::new(Category::Ledger, 42)), "L042");
    }

    #[test]
    fn serde_roundtrip() {
        let code = DiagnosticCode::DESCRIPTOR_INVALID;
        let json = serde_json::to_string(&code).unwrap();
        let back: DiagnosticCode = serde_json::from_str(&json).unwrap();
        assert_eq!(code, back);
    }
}
