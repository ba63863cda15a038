//! Tripwire Harness - failure-path verification for the fixture corpus
//!
//! Drives the external tools against the corpus and confirms each one
//! failed in exactly the predicted way:
//! - Materializes the corpus into a scratch workspace
//! - Invokes the configured bundler / linter / test runner / secret scanner
//! - Verifies exit codes, diagnostic substrings, and per-case granularity
//! - Evaluates a gate and renders report artifacts

pub mod diagnostics;
pub mod gate;
pub mod pipeline;
pub mod report;
pub mod runner;
pub mod spec;
pub mod tool;
pub mod verify;

// Re-export key types
pub use diagnostics::{parse_case_observation, DiagnosticsConfig, ObservedCases};
pub use gate::{CorpusGate, GateVerdict};
pub use pipeline::{HarnessOutcome, HarnessPipeline, PipelineOptions};
pub use report::{write_report, HarnessReport, ReportPaths, RESULTS_FILE, SUMMARY_FILE};
pub use runner::{ToolResult, ToolRunner};
pub use spec::HarnessSpec;
pub use tool::{
    apply_overrides, load_tool_file, BuiltinTool, ToolConfig, ToolFile, ToolOverride,
    DEFAULT_TOOL_TIMEOUT_SECS, FIXTURE_PLACEHOLDER,
};
pub use verify::{verify_fixture, FixtureVerdict};
