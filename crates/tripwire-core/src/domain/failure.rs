//! Expected-failure taxonomy for the fixture corpus.
//!
//! Exactly one kind per fixture category, each owned by a different external
//! tool. These are the failures the corpus exists to provoke; a run succeeds
//! when every tool fails with its predicted kind.

use serde::{Deserialize, Serialize};

/// Failure class an external tool is expected to surface.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    /// The bundler cannot resolve an imported dependency. Unrecoverable for
    /// that build run; halts the build pipeline stage.
    UnresolvedDependency,

    /// The linter sees an identifier no enclosing scope declares. Reported
    /// per-occurrence; fails a lint gate.
    UndeclaredReference,

    /// The test runner observes an asserted value diverging from the
    /// computed one. Reported per-case; sibling cases keep running.
    AssertionMismatch,

    /// The secret scanner flags a hardcoded credential literal.
    HardcodedSecret,
}

impl FailureKind {
    /// Stable lowercase name used in logs and reports.
    pub fn name(&self) -> &'static str {
        match self {
            FailureKind::UnresolvedDependency => "unresolved_dependency",
            FailureKind::UndeclaredReference => "undeclared_reference",
            FailureKind::AssertionMismatch => "assertion_mismatch",
            FailureKind::HardcodedSecret => "hardcoded_secret",
        }
    }
}

impl std::fmt::Display for FailureKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
