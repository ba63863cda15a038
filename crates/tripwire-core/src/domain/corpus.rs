//! The fixture corpus: id-unique fixtures plus collaborator support files.

use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::domain::digest;
use crate::domain::error::{Result, TripwireError};
use crate::domain::fixture::{CaseSummary, Expectation, FailureCategory, Fixture, SupportFile};

// ─── Builtin fixture sources ──────────────────────────────────────────────
//
// One trigger construct per file. Each fixture violates exactly one external
// tool's success precondition and is otherwise well-formed, so the observed
// failure is unambiguously attributable to its trigger.

/// References one real declared dependency (react) and one guaranteed-absent
/// dependency, using the unresolved symbol at both import time and usage time.
const BROKEN_IMPORT_JSX: &str = r#"import React from 'react';
import nonExistentLib from 'non-existent-lib';

const BrokenWidget = () => (
  <button onClick={() => nonExistentLib.render()}>{nonExistentLib.version}</button>
);

export default BrokenWidget;
"#;

/// Exports one normally-declared utility, then references an identifier no
/// declaration, parameter, or import binds.
const UNDECLARED_REFERENCE_JS: &str = r#"export function formatLabel(value) {
  return `[${value}]`;
}

console.log(undefinedVar);
"#;

/// Two cases against the collaborator `sum` module: one true assertion that
/// must pass, one asserting 3 where sum(1, 1) computes 2.
const ASSERTION_MISMATCH_TEST_JS: &str = r#"import { sum } from '../src/utils/sum';

test('sum 2+3 is 5', () => {
  expect(sum(2, 3)).toBe(5);
});

test('sum 1+1 is 2', () => {
  expect(sum(1, 1)).toBe(3);
});
"#;

/// A hardcoded credential literal in otherwise well-formed code.
const HARDCODED_SECRET_JS: &str = r#"const apiKey = 'sk_test_1234567890abcdef';

export function authHeader() {
  return { Authorization: `Bearer ${apiKey}` };
}
"#;

/// The collaborator module. Pure, no side effects; must resolve for the test
/// fixture's passing case to succeed.
const SUM_COLLABORATOR_JS: &str = r#"export function sum(a, b) {
  return a + b;
}
"#;

/// An ordered-irrelevant set of fixtures, unique by id.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Corpus {
    fixtures: Vec<Fixture>,
    support_files: Vec<SupportFile>,
}

impl Corpus {
    /// Create an empty corpus.
    pub fn new() -> Self {
        Self::default()
    }

    /// The builtin corpus: one fixture per failure category plus the `sum`
    /// collaborator module.
    pub fn builtin() -> Self {
        let mut corpus = Self::new();

        // Constructors below only fail on invariant violations in the
        // literals above, which the corpus tests pin down.
        let fixtures = [
            Fixture::new(
                "broken-import",
                FailureCategory::Build,
                "import of an unresolvable module path ('non-existent-lib')",
                "src/components/broken-widget.jsx",
                BROKEN_IMPORT_JSX,
                Expectation::substrings(["non-existent-lib"]),
            ),
            Fixture::new(
                "undeclared-reference",
                FailureCategory::Lint,
                "reference to 'undefinedVar', never declared in any enclosing scope",
                "src/utils/format-label.js",
                UNDECLARED_REFERENCE_JS,
                Expectation::substrings(["undefinedVar"]).with_rule_code("no-undef"),
            ),
            Fixture::new(
                "assertion-mismatch",
                FailureCategory::Test,
                "assertion of 3 against sum(1, 1), which computes 2",
                "tests/sum.test.js",
                ASSERTION_MISMATCH_TEST_JS,
                Expectation::substrings(["3", "2"]).with_case_summary(CaseSummary {
                    total: 2,
                    passed: 1,
                    failed: 1,
                    expected_value: 3,
                    received_value: 2,
                }),
            ),
            Fixture::new(
                "hardcoded-secret",
                FailureCategory::Secret,
                "hardcoded credential literal assigned to 'apiKey'",
                "src/api/auth-header.js",
                HARDCODED_SECRET_JS,
                Expectation::substrings(["sk_test_"]),
            ),
        ];

        for fixture in fixtures {
            let fixture = fixture.expect("builtin fixture is valid");
            corpus.insert(fixture).expect("builtin ids are unique");
        }

        corpus
            .add_support_file(
                SupportFile::new("src/utils/sum.js", SUM_COLLABORATOR_JS)
                    .expect("builtin support path is valid"),
            )
            .expect("builtin support paths are unique");

        corpus
    }

    /// Insert a fixture. Ids are unique within a corpus.
    pub fn insert(&mut self, fixture: Fixture) -> Result<()> {
        if self.fixtures.iter().any(|f| f.id == fixture.id) {
            return Err(TripwireError::DuplicateFixture(fixture.id));
        }
        self.fixtures.push(fixture);
        Ok(())
    }

    /// Add a collaborator support file. Paths are unique within a corpus.
    pub fn add_support_file(&mut self, file: SupportFile) -> Result<()> {
        if self.support_files.iter().any(|f| f.path == file.path)
            || self.fixtures.iter().any(|f| f.path == file.path)
        {
            return Err(TripwireError::UnsafeFixturePath(file.path));
        }
        self.support_files.push(file);
        Ok(())
    }

    /// Look up a fixture by id.
    pub fn get(&self, id: &str) -> Result<&Fixture> {
        self.fixtures
            .iter()
            .find(|f| f.id == id)
            .ok_or_else(|| TripwireError::UnknownFixture(id.to_string()))
    }

    /// The fixture for a category, if the corpus carries one.
    pub fn by_category(&self, category: FailureCategory) -> Option<&Fixture> {
        self.fixtures.iter().find(|f| f.category == category)
    }

    /// All fixtures, in insertion order.
    pub fn fixtures(&self) -> &[Fixture] {
        &self.fixtures
    }

    /// All support files, in insertion order.
    pub fn support_files(&self) -> &[SupportFile] {
        &self.support_files
    }

    pub fn len(&self) -> usize {
        self.fixtures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fixtures.is_empty()
    }

    /// Deterministic SHA-256 digest over the corpus content.
    ///
    /// Computed over id-sorted fixtures and path-sorted support files, so
    /// insertion order never changes the digest.
    pub fn digest(&self) -> Result<String> {
        let mut fixtures: Vec<&Fixture> = self.fixtures.iter().collect();
        fixtures.sort_by(|a, b| a.id.cmp(&b.id));
        let mut support: Vec<&SupportFile> = self.support_files.iter().collect();
        support.sort_by(|a, b| a.path.cmp(&b.path));

        let value = json!({
            "fixtures": fixtures,
            "support_files": support,
        });
        digest::compute_digest(&value)
    }
}
