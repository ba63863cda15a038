//! Report artifacts for CI consumers.
//!
//! Two output artifacts per run:
//! - `tripwire_results.json` - machine-readable per-fixture verdicts
//! - `tripwire_summary.md` - human-readable Markdown summary

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::pipeline::HarnessOutcome;
use crate::spec::HarnessSpec;
use crate::verify::FixtureVerdict;

/// File name of the JSON results artifact.
pub const RESULTS_FILE: &str = "tripwire_results.json";

/// File name of the Markdown summary artifact.
pub const SUMMARY_FILE: &str = "tripwire_summary.md";

/// Aggregate report for an entire verification run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HarnessReport {
    pub run_id: String,
    pub spec_digest: String,
    pub corpus_digest: String,
    pub run_at: DateTime<Utc>,
    pub duration_ms: u64,
    pub gate_passed: bool,
    pub gate_violations: Vec<String>,
    pub verdicts: Vec<FixtureVerdict>,
    pub total: usize,
    pub confirmed: usize,
    pub unconfirmed: usize,
}

impl HarnessReport {
    /// Build a report from a run's spec and outcome.
    pub fn new(spec: &HarnessSpec, outcome: &HarnessOutcome) -> Self {
        Self {
            run_id: outcome.run_id.clone(),
            spec_digest: outcome.spec_digest.clone(),
            corpus_digest: spec.corpus_digest.clone(),
            run_at: Utc::now(),
            duration_ms: outcome.duration_ms,
            gate_passed: outcome.gate.passed,
            gate_violations: outcome.gate.violations.clone(),
            verdicts: outcome.verdicts.clone(),
            total: outcome.verdicts.len(),
            confirmed: outcome.confirmed_count(),
            unconfirmed: outcome.unconfirmed_count(),
        }
    }

    /// Render the report as a Markdown summary.
    pub fn render_markdown(&self) -> String {
        let mut md = String::new();
        md.push_str("# Tripwire Verification Summary\n\n");
        md.push_str(&format!("- Run: `{}`\n", self.run_id));
        md.push_str(&format!("- Spec digest: `{}`\n", self.spec_digest));
        md.push_str(&format!("- Duration: {} ms\n", self.duration_ms));
        md.push_str(&format!(
            "- Gate: **{}** ({}/{} fixtures confirmed)\n\n",
            if self.gate_passed { "PASSED" } else { "FAILED" },
            self.confirmed,
            self.total
        ));

        md.push_str("| Fixture | Category | Tool | Exit | Confirmed |\n");
        md.push_str("|---------|----------|------|------|-----------|\n");
        for verdict in &self.verdicts {
            md.push_str(&format!(
                "| {} | {} | {} | {} | {} |\n",
                verdict.fixture_id,
                verdict.category,
                verdict.tool_name,
                verdict.exit_code,
                if verdict.confirmed { "yes" } else { "no" }
            ));
        }

        if !self.gate_violations.is_empty() {
            md.push_str("\n## Violations\n\n");
            for violation in &self.gate_violations {
                md.push_str(&format!("- {violation}\n"));
            }
        }

        md
    }
}

/// Paths of the written report artifacts.
#[derive(Debug, Clone)]
pub struct ReportPaths {
    pub results: PathBuf,
    pub summary: PathBuf,
}

/// Write both report artifacts into `dir`, creating it if needed.
pub fn write_report(report: &HarnessReport, dir: &Path) -> anyhow::Result<ReportPaths> {
    fs::create_dir_all(dir)?;

    let results = dir.join(RESULTS_FILE);
    fs::write(&results, serde_json::to_string_pretty(report)?)?;

    let summary = dir.join(SUMMARY_FILE);
    fs::write(&summary, report.render_markdown())?;

    Ok(ReportPaths { results, summary })
}
