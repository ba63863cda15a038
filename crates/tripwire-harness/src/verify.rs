//! Fixture expectation verification.
//!
//! A fixture is **confirmed** when its external tool failed in exactly the
//! predicted way: non-zero exit, every expected diagnostic substring
//! present, and (test category) the per-case report matching the contract.
//! Anything else is recorded as violations; an unconfirmed fixture is not a
//! harness error, it is a gate failure.

use serde::{Deserialize, Serialize};

use tripwire_core::{Diagnostic, FailureCategory, FailureKind, Fixture};

use crate::diagnostics::{
    parse_case_observation, parse_tool_diagnostics, DiagnosticsConfig, ObservedCases,
};
use crate::runner::ToolResult;
use crate::tool::ToolConfig;

/// Observation of a single fixture's external-tool run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FixtureVerdict {
    /// Fixture under observation.
    pub fixture_id: String,

    /// Fixture category.
    pub category: FailureCategory,

    /// Tool that consumed the fixture.
    pub tool_name: String,

    /// Failure kind the fixture was authored to provoke.
    pub expected_kind: FailureKind,

    /// Tool exit code (-1 for execution faults).
    pub exit_code: i32,

    /// Tool wall-clock duration in milliseconds.
    pub duration_ms: u64,

    /// Expected substrings found in the combined output.
    pub matched_substrings: Vec<String>,

    /// Expected substrings absent from the combined output.
    pub missing_substrings: Vec<String>,

    /// Per-case observation (test category only).
    pub observed_cases: Option<ObservedCases>,

    /// Normalized diagnostics extracted from the output.
    pub diagnostics: Vec<Diagnostic>,

    /// Whether the tool failed exactly as predicted.
    pub confirmed: bool,

    /// What diverged from the prediction (empty when confirmed).
    pub violations: Vec<String>,
}

/// Check a tool result against a fixture's expectation.
pub fn verify_fixture(
    fixture: &Fixture,
    tool: &ToolConfig,
    result: &ToolResult,
) -> FixtureVerdict {
    let output = result.combined_output();
    let mut violations = Vec::new();

    if result.exited_zero() {
        violations.push(format!(
            "tool '{}' exited 0; the fixture must provoke a failure",
            tool.name
        ));
    }

    let mut matched = Vec::new();
    let mut missing = Vec::new();
    for substring in &fixture.expectation.diagnostic_substrings {
        if output.contains(substring.as_str()) {
            matched.push(substring.clone());
        } else {
            missing.push(substring.clone());
            violations.push(format!(
                "diagnostic does not contain expected substring '{substring}'"
            ));
        }
    }

    if let Some(rule_code) = &fixture.expectation.rule_code {
        if !output.contains(rule_code.as_str()) {
            violations.push(format!(
                "diagnostic does not name expected rule '{rule_code}'"
            ));
        }
    }

    let observed_cases = fixture.expectation.case_summary.map(|expected| {
        let observed = parse_case_observation(&output);
        check_case_summary(&expected, &observed, &mut violations);
        observed
    });

    let diagnostics =
        parse_tool_diagnostics(fixture.category, result, &DiagnosticsConfig::default());

    FixtureVerdict {
        fixture_id: fixture.id.clone(),
        category: fixture.category,
        tool_name: tool.name.clone(),
        expected_kind: fixture.expected_kind(),
        exit_code: result.exit_code,
        duration_ms: result.duration_ms,
        matched_substrings: matched,
        missing_substrings: missing,
        observed_cases,
        diagnostics,
        confirmed: violations.is_empty(),
        violations,
    }
}

/// Verdict for a fixture whose tool never produced a result (spawn error,
/// timeout). An execution fault is never a confirmation.
pub fn execution_fault_verdict(
    fixture: &Fixture,
    tool: &ToolConfig,
    error: &anyhow::Error,
) -> FixtureVerdict {
    FixtureVerdict {
        fixture_id: fixture.id.clone(),
        category: fixture.category,
        tool_name: tool.name.clone(),
        expected_kind: fixture.expected_kind(),
        exit_code: -1,
        duration_ms: 0,
        matched_substrings: Vec::new(),
        missing_substrings: fixture.expectation.diagnostic_substrings.clone(),
        observed_cases: None,
        diagnostics: Vec::new(),
        confirmed: false,
        violations: vec![format!("tool '{}' execution fault: {error}", tool.name)],
    }
}

fn check_case_summary(
    expected: &tripwire_core::CaseSummary,
    observed: &ObservedCases,
    violations: &mut Vec<String>,
) {
    check_count(violations, "total cases", expected.total, observed.total);
    check_count(violations, "passed cases", expected.passed, observed.passed);
    check_count(violations, "failed cases", expected.failed, observed.failed);
    check_value(
        violations,
        "expected value",
        expected.expected_value,
        observed.expected_value,
    );
    check_value(
        violations,
        "received value",
        expected.received_value,
        observed.received_value,
    );
}

fn check_count(violations: &mut Vec<String>, what: &str, expected: u32, observed: Option<u32>) {
    match observed {
        Some(n) if n == expected => {}
        Some(n) => violations.push(format!("{what}: expected {expected}, tool reported {n}")),
        None => violations.push(format!("{what}: tool output reported no count")),
    }
}

fn check_value(violations: &mut Vec<String>, what: &str, expected: i64, observed: Option<i64>) {
    match observed {
        Some(v) if v == expected => {}
        Some(v) => violations.push(format!("{what}: expected {expected}, tool reported {v}")),
        None => violations.push(format!("{what}: not found in tool output")),
    }
}
