//! How serious a diagnostic is for the run.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The severity of a diagnostic.
///
/// Only [`Error`](Severity::Error) means a module failed or the run could not
/// finish its work. [`Warning`](Severity::Warning) covers problems the run
/// worked around, such as a skipped subtree or a discarded ledger. Variants
/// are ordered by seriousness, so the worst of several is their maximum.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Context only.
    Note,
    /// Worked around; the affected module or subtree may be missing.
    Warning,
    /// A module failed or a run-level step could not complete.
    Error,
}

impl Severity {
    /// The lowercase label used in terminal and JSON output.
    pub const fn as_str(self) -> &'static str {
        match self {
            Severity::Note => "note",
            Severity::Warning => "warning",
            Severity::Error => "error",
        }
    }

    /// Returns `true` for [`Error`](Severity::Error).
    pub fn is_error(self) -> bool {
        self == Severity::Error
    }

    /// SGR color code for the terminal header.
    pub(crate) const fn ansi_color(self) -> &'static str {
        match self {
            Severity::Note => "36",
            Severity::Warning => "33",
            Severity::Error => "31",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn worst_of_several_is_the_maximum() {
        let seen = [Severity::Warning, Severity::Note, Severity::Error, Severity::Warning];
        assert_eq!(seen.iter().copied().max(), Some(Severity::Error));
        assert_eq!(
            [Severity::Note, Severity::Warning].iter().copied().max(),
            Some(Severity::Warning)
        );
    }

    #[test]
    fn only_errors_fail_a_module() {
        assert!(Severity::Error.is_error());
        assert!(!Severity::Warning.is_error());
        assert!(!Severity::Note.is_error());
    }

    #[test]
    fn json_label_matches_display() {
        for severity in [Severity::Note, Severity::Warning, Severity::Error] {
            let json = serde_json::to_string(&severity).unwrap();
            assert_eq!(json, format!("\"{severity}\""));
        }
        let parsed: Severity = serde_json::from_str("\"warning\"").unwrap();
        assert_eq!(parsed, Severity::Warning);
    }
}
