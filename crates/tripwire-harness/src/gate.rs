//! Gate evaluation over fixture verdicts.

use serde::{Deserialize, Serialize};

use crate::tool::ToolConfig;
use crate::verify::FixtureVerdict;

/// Gate evaluation verdict.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GateVerdict {
    /// Whether the gate passed.
    pub passed: bool,

    /// Violations that caused failure (empty if passed).
    pub violations: Vec<String>,

    /// Summary message.
    pub message: String,
}

/// Corpus gate rules.
pub struct CorpusGate;

impl CorpusGate {
    /// Evaluate whether every enabled tool tripped over its fixture.
    ///
    /// Gate rule:
    /// - Every enabled tool must have produced exactly one verdict.
    /// - Every verdict must be confirmed (non-zero exit + predicted
    ///   diagnostics).
    /// - A tool that was enabled but produced no verdict fails the gate;
    ///   silence is not a confirmation.
    pub fn evaluate(tools: &[ToolConfig], verdicts: &[FixtureVerdict]) -> GateVerdict {
        let mut violations = Vec::new();

        for tool in tools.iter().filter(|t| t.enabled) {
            match verdicts.iter().find(|v| v.tool_name == tool.name) {
                None => violations.push(format!(
                    "tool '{}' was enabled but produced no verdict",
                    tool.name
                )),
                Some(verdict) if !verdict.confirmed => {
                    for violation in &verdict.violations {
                        violations.push(format!(
                            "fixture '{}' ({}): {}",
                            verdict.fixture_id, tool.name, violation
                        ));
                    }
                }
                Some(_) => {}
            }
        }

        let passed = violations.is_empty();
        let message = if passed {
            "All fixtures failed as predicted".to_string()
        } else {
            format!("Gate failed with {} violation(s)", violations.len())
        };

        GateVerdict {
            passed,
            violations,
            message,
        }
    }
}
