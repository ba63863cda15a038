//! Harness pipeline orchestration.
//!
//! materialize → invoke tools → verify → gate → report → cleanup. Tools run
//! sequentially; fixtures share no state, so ordering only affects logs.

use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::Context;
use tracing::{info, warn};

use tripwire_core::telemetry::{
    emit_fixture_verdict, emit_gate_evaluated, emit_tool_completed, emit_tool_invoked,
};
use tripwire_core::{materialize, Corpus};

use crate::gate::{CorpusGate, GateVerdict};
use crate::report::{write_report, HarnessReport};
use crate::runner::ToolRunner;
use crate::spec::HarnessSpec;
use crate::tool::ToolConfig;
use crate::verify::{execution_fault_verdict, verify_fixture, FixtureVerdict};

/// Options for a pipeline run.
#[derive(Debug, Clone, Default)]
pub struct PipelineOptions {
    /// Keep the materialized workspace after the run.
    pub keep_workspace: bool,

    /// Materialize into a non-empty workspace.
    pub force_materialize: bool,

    /// Where to write report artifacts; `None` skips reporting.
    pub report_dir: Option<PathBuf>,
}

/// Result of a complete harness run.
#[derive(Debug, Clone)]
pub struct HarnessOutcome {
    /// Run ID.
    pub run_id: String,

    /// Digest of the harness spec (corpus + tools).
    pub spec_digest: String,

    /// Aggregate gate verdict.
    pub gate: GateVerdict,

    /// Per-fixture verdicts, in tool order.
    pub verdicts: Vec<FixtureVerdict>,

    /// Total duration in milliseconds.
    pub duration_ms: u64,
}

impl HarnessOutcome {
    /// Number of fixtures whose tool failed as predicted.
    pub fn confirmed_count(&self) -> usize {
        self.verdicts.iter().filter(|v| v.confirmed).count()
    }

    /// Number of fixtures whose tool did not fail as predicted.
    pub fn unconfirmed_count(&self) -> usize {
        self.verdicts.iter().filter(|v| !v.confirmed).count()
    }
}

/// Harness pipeline orchestrator.
pub struct HarnessPipeline;

impl HarnessPipeline {
    /// Run the full verification pipeline.
    ///
    /// The returned outcome carries the gate verdict; an unconfirmed
    /// fixture fails the gate, not this function. Errors are reserved for
    /// harness faults (materialization, reporting).
    pub async fn run(
        corpus: &Corpus,
        tools: &[ToolConfig],
        workdir: &Path,
        options: &PipelineOptions,
    ) -> anyhow::Result<HarnessOutcome> {
        let start = Instant::now();

        let spec = HarnessSpec::new(corpus, tools, workdir.to_path_buf())
            .context("computing harness spec")?;
        let run_id = spec.run_id.to_string();

        info!(
            run_id = %run_id,
            spec_digest = %spec.spec_digest,
            fixtures = corpus.len(),
            "starting fixture verification run"
        );

        let materialized = materialize(corpus, workdir, options.force_materialize)
            .context("materializing corpus")?;

        let mut verdicts = Vec::new();
        for tool in tools {
            if !tool.enabled {
                info!(tool = %tool.name, "skipping disabled tool");
                continue;
            }

            let Some(fixture) = corpus.by_category(tool.category) else {
                // The gate reports this tool as verdict-less.
                warn!(
                    tool = %tool.name,
                    category = %tool.category,
                    "no fixture for tool category"
                );
                continue;
            };

            emit_tool_invoked(&run_id, &tool.name, &fixture.id);
            let fixture_path = materialized.fixture_path(fixture);

            let verdict = match ToolRunner::invoke(tool, &fixture_path, workdir).await {
                Ok(result) => {
                    emit_tool_completed(&run_id, &tool.name, result.exit_code, result.duration_ms);
                    verify_fixture(fixture, tool, &result)
                }
                Err(e) => {
                    warn!(tool = %tool.name, error = %e, "tool execution fault");
                    execution_fault_verdict(fixture, tool, &e)
                }
            };

            emit_fixture_verdict(&run_id, &fixture.id, verdict.confirmed);
            verdicts.push(verdict);
        }

        let gate = CorpusGate::evaluate(tools, &verdicts);
        let confirmed = verdicts.iter().filter(|v| v.confirmed).count();
        emit_gate_evaluated(&run_id, gate.passed, confirmed, verdicts.len());

        let outcome = HarnessOutcome {
            run_id: run_id.clone(),
            spec_digest: spec.spec_digest.clone(),
            gate,
            verdicts,
            duration_ms: start.elapsed().as_millis() as u64,
        };

        if let Some(report_dir) = &options.report_dir {
            let report = HarnessReport::new(&spec, &outcome);
            let paths = write_report(&report, report_dir).context("writing report artifacts")?;
            info!(
                results = %paths.results.display(),
                summary = %paths.summary.display(),
                "wrote report artifacts"
            );
        }

        if options.keep_workspace {
            info!(root = %materialized.root().display(), "keeping materialized workspace");
        } else {
            materialized.remove().context("cleaning up workspace")?;
        }

        if outcome.gate.passed {
            info!(run_id = %run_id, "verification run confirmed every fixture");
        } else {
            info!(
                run_id = %run_id,
                violations = outcome.gate.violations.len(),
                "verification run found unconfirmed fixtures"
            );
        }

        Ok(outcome)
    }
}
