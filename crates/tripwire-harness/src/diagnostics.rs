//! Diagnostic extraction from external tool output.
//!
//! Normalizes raw tool output into structured [`Diagnostic`] entries and,
//! for the test runner, a per-case observation. Exact formatting varies by
//! tool version, so extraction is tolerant: whatever fails to parse is still
//! visible to expectation matching through the raw combined output.

use regex::Regex;
use serde::{Deserialize, Serialize};

use tripwire_core::{Diagnostic, DiagnosticSource, FailureCategory, Severity};

use crate::runner::ToolResult;

/// Configuration for the diagnostics parser.
#[derive(Debug, Clone, PartialEq)]
pub struct DiagnosticsConfig {
    /// Maximum number of diagnostics to retain per tool.
    pub max_per_tool: usize,

    /// Minimum severity to include.
    pub min_severity: Severity,
}

impl Default for DiagnosticsConfig {
    fn default() -> Self {
        Self {
            max_per_tool: 100,
            min_severity: Severity::Warning,
        }
    }
}

/// The [`DiagnosticSource`] for a fixture category.
pub fn source_for(category: FailureCategory) -> DiagnosticSource {
    match category {
        FailureCategory::Build => DiagnosticSource::Bundler,
        FailureCategory::Lint => DiagnosticSource::Linter,
        FailureCategory::Test => DiagnosticSource::TestRunner,
        FailureCategory::Secret => DiagnosticSource::SecretScanner,
    }
}

/// Per-case observation parsed from test-runner output.
///
/// Fields stay `None` when the output carried no recognizable counter or
/// value; the verifier treats an absent observation as a violation.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ObservedCases {
    pub total: Option<u32>,
    pub passed: Option<u32>,
    pub failed: Option<u32>,
    pub expected_value: Option<i64>,
    pub received_value: Option<i64>,
}

/// Parse a test runner's per-case report.
///
/// Understands jest-style summaries ("Tests: 1 failed, 1 passed, 2 total")
/// and assertion diffs ("Expected: 3" / "Received: 2").
pub fn parse_case_observation(output: &str) -> ObservedCases {
    let mut observed = ObservedCases::default();

    if let Ok(re) = Regex::new(r"(\d+)\s+failed") {
        observed.failed = first_capture(&re, output).and_then(|s| s.parse().ok());
    }
    if let Ok(re) = Regex::new(r"(\d+)\s+passed") {
        observed.passed = first_capture(&re, output).and_then(|s| s.parse().ok());
    }
    if let Ok(re) = Regex::new(r"(\d+)\s+total") {
        observed.total = first_capture(&re, output).and_then(|s| s.parse().ok());
    }
    if let Ok(re) = Regex::new(r"[Ee]xpected:?\s*(-?\d+)") {
        observed.expected_value = first_capture(&re, output).and_then(|s| s.parse().ok());
    }
    if let Ok(re) = Regex::new(r"[Rr]eceived:?\s*(-?\d+)") {
        observed.received_value = first_capture(&re, output).and_then(|s| s.parse().ok());
    }

    observed
}

fn first_capture<'t>(re: &Regex, text: &'t str) -> Option<&'t str> {
    re.captures(text)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

/// Parse a tool result into normalized diagnostics.
///
/// A tool that exited zero produces no diagnostics. A failing tool always
/// produces at least one, even when nothing line-level could be extracted.
pub fn parse_tool_diagnostics(
    category: FailureCategory,
    result: &ToolResult,
    config: &DiagnosticsConfig,
) -> Vec<Diagnostic> {
    if result.exited_zero() {
        return Vec::new();
    }

    let source = source_for(category);
    let output = result.combined_output();
    let mut diagnostics = Vec::new();

    match category {
        FailureCategory::Lint => extract_lint_diagnostics(&output, source, &mut diagnostics),
        FailureCategory::Build => extract_resolution_diagnostics(&output, source, &mut diagnostics),
        FailureCategory::Test => extract_assertion_diagnostics(&output, source, &mut diagnostics),
        FailureCategory::Secret => extract_generic_diagnostics(&output, source, &mut diagnostics),
    }

    // Nothing line-level matched; fall back to the first failure-looking
    // line, then to a minimal record.
    if diagnostics.is_empty() {
        if let Some(line) = output
            .lines()
            .find(|l| l.contains("error") || l.contains("FAIL") || l.contains("leak"))
        {
            diagnostics.push(
                Diagnostic::new(Severity::Error, line.trim().to_string(), source)
                    .with_evidence(line.to_string()),
            );
        }
    }
    if diagnostics.is_empty() {
        diagnostics.push(Diagnostic::new(
            Severity::Error,
            format!("tool '{}' exited with code {}", result.tool_name, result.exit_code),
            source,
        ));
    }

    diagnostics.retain(|d| d.severity >= config.min_severity);
    diagnostics.truncate(config.max_per_tool);
    diagnostics
}

/// eslint-style rows: `5:13  error  'undefinedVar' is not defined  no-undef`
fn extract_lint_diagnostics(output: &str, source: DiagnosticSource, out: &mut Vec<Diagnostic>) {
    let Ok(re) = Regex::new(r"^\s*(\d+):(\d+)\s+(error|warning)\s+(.+?)\s{2,}(\S+)\s*$") else {
        return;
    };
    for line in output.lines() {
        if let Some(caps) = re.captures(line) {
            let severity = if &caps[3] == "error" {
                Severity::Error
            } else {
                Severity::Warning
            };
            let mut diag = Diagnostic::new(severity, caps[4].to_string(), source)
                .with_code(caps[5].to_string())
                .with_evidence(line.to_string());
            if let (Ok(line_no), Ok(col)) = (caps[1].parse(), caps[2].parse()) {
                diag.line = Some(line_no);
                diag.column = Some(col);
            }
            out.push(diag);
        }
    }
}

/// Module-resolution failures across bundler generations.
fn extract_resolution_diagnostics(
    output: &str,
    source: DiagnosticSource,
    out: &mut Vec<Diagnostic>,
) {
    for line in output.lines() {
        if line.contains("Module not found")
            || line.contains("Cannot find module")
            || line.contains("Can't resolve")
        {
            out.push(
                Diagnostic::new(Severity::Error, line.trim().to_string(), source)
                    .with_evidence(line.to_string()),
            );
        }
    }
}

/// Assertion diffs: the Expected/Received pair plus failing case markers.
fn extract_assertion_diagnostics(
    output: &str,
    source: DiagnosticSource,
    out: &mut Vec<Diagnostic>,
) {
    for line in output.lines() {
        let trimmed = line.trim();
        if trimmed.starts_with("Expected")
            || trimmed.starts_with("Received")
            || trimmed.starts_with("✕")
            || trimmed.starts_with("FAIL")
        {
            out.push(
                Diagnostic::new(Severity::Error, trimmed.to_string(), source)
                    .with_evidence(line.to_string()),
            );
        }
    }
}

/// Secret-scanner findings vary widely; keep any finding-shaped line.
fn extract_generic_diagnostics(output: &str, source: DiagnosticSource, out: &mut Vec<Diagnostic>) {
    for line in output.lines() {
        let lower = line.to_ascii_lowercase();
        if lower.contains("finding") || lower.contains("secret") || lower.contains("leak") {
            out.push(
                Diagnostic::new(Severity::Error, line.trim().to_string(), source)
                    .with_evidence(line.to_string()),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn failing_result(tool: &str, output: &str) -> ToolResult {
        ToolResult {
            tool_name: tool.to_string(),
            exit_code: 1,
            stdout: output.to_string(),
            stderr: String::new(),
            duration_ms: 5,
        }
    }

    #[test]
    fn test_source_mapping() {
        assert_eq!(source_for(FailureCategory::Build), DiagnosticSource::Bundler);
        assert_eq!(source_for(FailureCategory::Lint), DiagnosticSource::Linter);
        assert_eq!(
            source_for(FailureCategory::Test),
            DiagnosticSource::TestRunner
        );
        assert_eq!(
            source_for(FailureCategory::Secret),
            DiagnosticSource::SecretScanner
        );
    }

    #[test]
    fn test_parse_case_observation_jest_summary() {
        let output = "\
FAIL tests/sum.test.js
  ✓ sum 2+3 is 5
  ✕ sum 1+1 is 2

  expect(received).toBe(expected)

  Expected: 3
  Received: 2

Tests:       1 failed, 1 passed, 2 total
";
        let observed = parse_case_observation(output);
        assert_eq!(observed.failed, Some(1));
        assert_eq!(observed.passed, Some(1));
        assert_eq!(observed.total, Some(2));
        assert_eq!(observed.expected_value, Some(3));
        assert_eq!(observed.received_value, Some(2));
    }

    #[test]
    fn test_parse_case_observation_unrecognized_output() {
        let observed = parse_case_observation("garbage with no counters");
        assert_eq!(observed, ObservedCases::default());
    }

    #[test]
    fn test_lint_diagnostics_extract_rule_and_location() {
        let result = failing_result(
            "linter",
            "src/utils/format-label.js\n  5:13  error  'undefinedVar' is not defined  no-undef\n",
        );
        let diags =
            parse_tool_diagnostics(FailureCategory::Lint, &result, &DiagnosticsConfig::default());

        assert_eq!(diags.len(), 1);
        assert_eq!(diags[0].code.as_deref(), Some("no-undef"));
        assert_eq!(diags[0].line, Some(5));
        assert_eq!(diags[0].column, Some(13));
        assert!(diags[0].message.contains("undefinedVar"));
    }

    #[test]
    fn test_build_diagnostics_extract_resolution_line() {
        let result = failing_result(
            "bundler",
            "Module not found: Error: Can't resolve 'non-existent-lib' in '/ws/src/components'\n",
        );
        let diags =
            parse_tool_diagnostics(FailureCategory::Build, &result, &DiagnosticsConfig::default());

        assert!(!diags.is_empty());
        assert!(diags[0].message.contains("non-existent-lib"));
        assert_eq!(diags[0].severity, Severity::Error);
    }

    #[test]
    fn test_zero_exit_produces_no_diagnostics() {
        let result = ToolResult {
            tool_name: "linter".to_string(),
            exit_code: 0,
            stdout: "clean".to_string(),
            stderr: String::new(),
            duration_ms: 5,
        };
        let diags =
            parse_tool_diagnostics(FailureCategory::Lint, &result, &DiagnosticsConfig::default());
        assert!(diags.is_empty());
    }

    #[test]
    fn test_failing_tool_always_produces_a_diagnostic() {
        let result = failing_result("secret_scanner", "");
        let diags = parse_tool_diagnostics(
            FailureCategory::Secret,
            &result,
            &DiagnosticsConfig::default(),
        );
        assert_eq!(diags.len(), 1);
        assert!(diags[0].message.contains("exited with code 1"));
    }

    #[test]
    fn test_max_per_tool_truncates() {
        let rows: String = (1..=10)
            .map(|i| format!("  {i}:1  error  'x{i}' is not defined  no-undef\n"))
            .collect();
        let result = failing_result("linter", &rows);
        let config = DiagnosticsConfig {
            max_per_tool: 3,
            min_severity: Severity::Hint,
        };
        let diags = parse_tool_diagnostics(FailureCategory::Lint, &result, &config);
        assert_eq!(diags.len(), 3);
    }
}
