//! Fixture definitions and expectation contracts.

use serde::{Deserialize, Serialize};

use crate::domain::error::{Result, TripwireError};
use crate::domain::failure::FailureKind;

/// Which external tool a fixture is aimed at.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum FailureCategory {
    /// Consumed by the bundler as a module-graph entry point.
    Build,
    /// Consumed by the linter as a single analyzable file.
    Lint,
    /// Consumed by the test runner as a test module.
    Test,
    /// Consumed by the secret scanner as a single analyzable file.
    Secret,
}

impl FailureCategory {
    /// Stable lowercase name used in logs, config, and reports.
    pub fn name(&self) -> &'static str {
        match self {
            FailureCategory::Build => "build",
            FailureCategory::Lint => "lint",
            FailureCategory::Test => "test",
            FailureCategory::Secret => "secret",
        }
    }

    /// The failure kind this category's tool is expected to surface.
    pub fn expected_kind(&self) -> FailureKind {
        match self {
            FailureCategory::Build => FailureKind::UnresolvedDependency,
            FailureCategory::Lint => FailureKind::UndeclaredReference,
            FailureCategory::Test => FailureKind::AssertionMismatch,
            FailureCategory::Secret => FailureKind::HardcodedSecret,
        }
    }

    /// All categories, in the order tools run.
    pub fn all() -> [FailureCategory; 4] {
        [
            FailureCategory::Build,
            FailureCategory::Lint,
            FailureCategory::Test,
            FailureCategory::Secret,
        ]
    }
}

impl std::fmt::Display for FailureCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl std::str::FromStr for FailureCategory {
    type Err = TripwireError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "build" => Ok(FailureCategory::Build),
            "lint" => Ok(FailureCategory::Lint),
            "test" => Ok(FailureCategory::Test),
            "secret" => Ok(FailureCategory::Secret),
            other => Err(TripwireError::UnknownCategory(other.to_string())),
        }
    }
}

/// Per-case report the test-runner fixture must produce.
///
/// The failing case's asserted and computed values differ by a known, fixed
/// delta so the diagnostic is deterministic.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct CaseSummary {
    /// Total reported cases.
    pub total: u32,

    /// Cases that must pass.
    pub passed: u32,

    /// Cases that must fail.
    pub failed: u32,

    /// Literal value the failing assertion expected.
    pub expected_value: i64,

    /// Literal value the failing case actually computed.
    pub received_value: i64,
}

/// What the external tool must emit for a fixture to count as confirmed.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Expectation {
    /// Substrings that must occur in the tool's combined output.
    pub diagnostic_substrings: Vec<String>,

    /// Rule identifier the tool is expected to report (e.g. "no-undef").
    pub rule_code: Option<String>,

    /// Per-case granularity contract. Test category only.
    pub case_summary: Option<CaseSummary>,
}

impl Expectation {
    /// Expectation matching one or more diagnostic substrings.
    pub fn substrings<I, S>(substrings: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            diagnostic_substrings: substrings.into_iter().map(Into::into).collect(),
            rule_code: None,
            case_summary: None,
        }
    }

    /// Set the expected rule identifier.
    pub fn with_rule_code(mut self, code: impl Into<String>) -> Self {
        self.rule_code = Some(code.into());
        self
    }

    /// Set the per-case contract.
    pub fn with_case_summary(mut self, summary: CaseSummary) -> Self {
        self.case_summary = Some(summary);
        self
    }
}

/// A static source artifact authored to provoke one predictable external-tool
/// failure.
///
/// Fixtures are immutable once authored and consumed read-only on each run.
/// The trigger construct must be singular: one failure cause per file, so
/// "did the right diagnostic fire" stays deterministic. A fixture's trigger
/// must not also break an unrelated tool category; in this corpus only one
/// tool ever touches each fixture.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Fixture {
    /// Unique file identifier within the corpus.
    pub id: String,

    /// Which external tool consumes this fixture.
    pub category: FailureCategory,

    /// The single language construct that causes the failure.
    pub trigger: String,

    /// Path the fixture materializes to, relative to the workspace root.
    /// Always forward-slash separated.
    pub path: String,

    /// The source text.
    pub content: String,

    /// What the external tool must emit.
    pub expectation: Expectation,
}

impl Fixture {
    /// Create a validated fixture.
    pub fn new(
        id: impl Into<String>,
        category: FailureCategory,
        trigger: impl Into<String>,
        path: impl Into<String>,
        content: impl Into<String>,
        expectation: Expectation,
    ) -> Result<Self> {
        let fixture = Self {
            id: id.into(),
            category,
            trigger: trigger.into(),
            path: path.into(),
            content: content.into(),
            expectation,
        };
        fixture.validate()?;
        Ok(fixture)
    }

    /// The failure kind this fixture is expected to provoke.
    pub fn expected_kind(&self) -> FailureKind {
        self.category.expected_kind()
    }

    fn validate(&self) -> Result<()> {
        if self.id.is_empty() {
            return Err(TripwireError::InvalidFixture {
                id: "<empty>".to_string(),
                reason: "id cannot be empty".to_string(),
            });
        }
        if self.trigger.is_empty() {
            return Err(self.invalid("trigger construct cannot be empty"));
        }
        if self.path.is_empty() {
            return Err(self.invalid("path cannot be empty"));
        }
        if is_escaping_path(&self.path) {
            return Err(TripwireError::UnsafeFixturePath(self.path.clone()));
        }
        if self.content.is_empty() {
            return Err(self.invalid("content cannot be empty"));
        }
        if self.expectation.diagnostic_substrings.is_empty() {
            return Err(self.invalid("expectation has no diagnostic substrings"));
        }
        if self.expectation.case_summary.is_some() && self.category != FailureCategory::Test {
            return Err(self.invalid("case summary only applies to the test category"));
        }
        Ok(())
    }

    fn invalid(&self, reason: &str) -> TripwireError {
        TripwireError::InvalidFixture {
            id: self.id.clone(),
            reason: reason.to_string(),
        }
    }
}

/// A collaborator artifact fixtures depend on; never expected to fail.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SupportFile {
    /// Path relative to the workspace root, forward-slash separated.
    pub path: String,

    /// The source text.
    pub content: String,
}

impl SupportFile {
    /// Create a validated support file.
    pub fn new(path: impl Into<String>, content: impl Into<String>) -> Result<Self> {
        let file = Self {
            path: path.into(),
            content: content.into(),
        };
        if file.path.is_empty() {
            return Err(TripwireError::UnsafeFixturePath("<empty>".to_string()));
        }
        if is_escaping_path(&file.path) {
            return Err(TripwireError::UnsafeFixturePath(file.path.clone()));
        }
        Ok(file)
    }
}

/// A relative path must stay inside the workspace root.
fn is_escaping_path(path: &str) -> bool {
    std::path::Path::new(path).is_absolute()
        || path.split('/').any(|component| component == "..")
}
