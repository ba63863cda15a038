//! Integration tests for the harness pipeline with stand-in tools.
//!
//! Real bundlers/linters/test runners are not available in the test
//! environment, so each tool is a shell script emitting the canned
//! diagnostics the real tool would produce. The contract under test is the
//! harness's: exit-code observation, substring matching, per-case
//! granularity, gate aggregation, reporting, and cleanup.

use tripwire_core::{Corpus, FailureCategory};
use tripwire_harness::{
    HarnessPipeline, HarnessReport, PipelineOptions, ToolConfig, RESULTS_FILE, SUMMARY_FILE,
};

fn shell_tool(name: &str, category: FailureCategory, script: &str) -> ToolConfig {
    ToolConfig::custom(
        name.to_string(),
        category,
        vec!["sh".to_string(), "-c".to_string(), script.to_string()],
        60,
    )
}

/// Stand-ins that fail exactly as the corpus predicts.
fn predictably_failing_tools() -> Vec<ToolConfig> {
    vec![
        shell_tool(
            "bundler",
            FailureCategory::Build,
            "printf \"Module not found: Error: Can't resolve 'non-existent-lib'\\n\" >&2; exit 2",
        ),
        shell_tool(
            "linter",
            FailureCategory::Lint,
            "printf \"  5:13  error  'undefinedVar' is not defined  no-undef\\n\"; exit 1",
        ),
        shell_tool(
            "test_runner",
            FailureCategory::Test,
            "printf 'FAIL tests/sum.test.js\\n  Expected: 3\\n  Received: 2\\nTests: 1 failed, 1 passed, 2 total\\n'; exit 1",
        ),
        shell_tool(
            "secret_scanner",
            FailureCategory::Secret,
            "printf \"Finding: apiKey = 'sk_test_1234567890abcdef'\\n\"; exit 1",
        ),
    ]
}

#[tokio::test]
async fn test_full_run_confirms_every_fixture() {
    let dir = tempfile::tempdir().expect("tempdir");
    let workdir = dir.path().join("workspace");
    let corpus = Corpus::builtin();
    let tools = predictably_failing_tools();

    let outcome = HarnessPipeline::run(&corpus, &tools, &workdir, &PipelineOptions::default())
        .await
        .expect("pipeline");

    assert!(outcome.gate.passed, "violations: {:?}", outcome.gate.violations);
    assert_eq!(outcome.verdicts.len(), 4);
    assert_eq!(outcome.confirmed_count(), 4);
    assert_eq!(outcome.unconfirmed_count(), 0);

    // Default options clean up the scratch workspace.
    assert!(!workdir.exists());
}

#[tokio::test]
async fn test_tool_exiting_zero_fails_the_gate() {
    let dir = tempfile::tempdir().expect("tempdir");
    let workdir = dir.path().join("workspace");
    let corpus = Corpus::builtin();

    let mut tools = predictably_failing_tools();
    // The linter wrongly finds nothing to complain about.
    tools[1] = shell_tool("linter", FailureCategory::Lint, "printf 'clean\\n'; exit 0");

    let outcome = HarnessPipeline::run(&corpus, &tools, &workdir, &PipelineOptions::default())
        .await
        .expect("pipeline");

    assert!(!outcome.gate.passed);
    assert_eq!(outcome.confirmed_count(), 3);
    assert_eq!(outcome.unconfirmed_count(), 1);
    assert!(outcome
        .gate
        .violations
        .iter()
        .any(|v| v.contains("exited 0")));
}

#[tokio::test]
async fn test_wrong_diagnostic_fails_the_gate() {
    let dir = tempfile::tempdir().expect("tempdir");
    let workdir = dir.path().join("workspace");
    let corpus = Corpus::builtin();

    let mut tools = predictably_failing_tools();
    // Non-zero exit, but the diagnostic names the wrong module.
    tools[0] = shell_tool(
        "bundler",
        FailureCategory::Build,
        "printf \"Module not found: Error: Can't resolve 'left-pad'\\n\" >&2; exit 2",
    );

    let outcome = HarnessPipeline::run(&corpus, &tools, &workdir, &PipelineOptions::default())
        .await
        .expect("pipeline");

    assert!(!outcome.gate.passed);
    assert!(outcome
        .gate
        .violations
        .iter()
        .any(|v| v.contains("non-existent-lib")));
}

#[tokio::test]
async fn test_lost_case_granularity_fails_the_gate() {
    let dir = tempfile::tempdir().expect("tempdir");
    let workdir = dir.path().join("workspace");
    let corpus = Corpus::builtin();

    let mut tools = predictably_failing_tools();
    // The passing case masked the failing one: only totals reported.
    tools[2] = shell_tool(
        "test_runner",
        FailureCategory::Test,
        "printf 'Expected: 3\\nReceived: 2\\nTests: 2 failed, 0 passed, 2 total\\n'; exit 1",
    );

    let outcome = HarnessPipeline::run(&corpus, &tools, &workdir, &PipelineOptions::default())
        .await
        .expect("pipeline");

    assert!(!outcome.gate.passed);
    assert!(outcome
        .gate
        .violations
        .iter()
        .any(|v| v.contains("passed cases")));
}

#[tokio::test]
async fn test_missing_tool_binary_is_an_unconfirmed_verdict() {
    let dir = tempfile::tempdir().expect("tempdir");
    let workdir = dir.path().join("workspace");
    let corpus = Corpus::builtin();

    let mut tools = predictably_failing_tools();
    tools[3] = ToolConfig::custom(
        "secret_scanner".to_string(),
        FailureCategory::Secret,
        vec!["tripwire-no-such-binary".to_string()],
        60,
    );

    let outcome = HarnessPipeline::run(&corpus, &tools, &workdir, &PipelineOptions::default())
        .await
        .expect("pipeline");

    assert!(!outcome.gate.passed);
    assert!(outcome
        .gate
        .violations
        .iter()
        .any(|v| v.contains("execution fault")));
}

#[tokio::test]
async fn test_keep_workspace_leaves_fixtures_on_disk() {
    let dir = tempfile::tempdir().expect("tempdir");
    let workdir = dir.path().join("workspace");
    let corpus = Corpus::builtin();
    let options = PipelineOptions {
        keep_workspace: true,
        ..PipelineOptions::default()
    };

    HarnessPipeline::run(&corpus, &predictably_failing_tools(), &workdir, &options)
        .await
        .expect("pipeline");

    assert!(workdir.join("src/components/broken-widget.jsx").exists());
    assert!(workdir.join("src/utils/sum.js").exists());
}

#[tokio::test]
async fn test_report_artifacts_written_and_parseable() {
    let dir = tempfile::tempdir().expect("tempdir");
    let workdir = dir.path().join("workspace");
    let report_dir = dir.path().join("reports");
    let corpus = Corpus::builtin();
    let options = PipelineOptions {
        report_dir: Some(report_dir.clone()),
        ..PipelineOptions::default()
    };

    let outcome = HarnessPipeline::run(&corpus, &predictably_failing_tools(), &workdir, &options)
        .await
        .expect("pipeline");

    let raw = std::fs::read_to_string(report_dir.join(RESULTS_FILE)).expect("read results");
    let report: HarnessReport = serde_json::from_str(&raw).expect("parse results");
    assert_eq!(report.run_id, outcome.run_id);
    assert_eq!(report.total, 4);
    assert_eq!(report.confirmed, 4);
    assert!(report.gate_passed);

    let summary = std::fs::read_to_string(report_dir.join(SUMMARY_FILE)).expect("read summary");
    assert!(summary.contains("**PASSED**"));
    assert!(summary.contains("assertion-mismatch"));
}

#[tokio::test]
async fn test_repeated_runs_reproduce_the_same_verdict() {
    let dir = tempfile::tempdir().expect("tempdir");
    let corpus = Corpus::builtin();
    let tools = predictably_failing_tools();

    let mut spec_digests = Vec::new();
    for workdir_name in ["run-a", "run-b"] {
        let workdir = dir.path().join(workdir_name);
        let outcome = HarnessPipeline::run(&corpus, &tools, &workdir, &PipelineOptions::default())
            .await
            .expect("pipeline");
        assert!(outcome.gate.passed);
        assert_eq!(outcome.confirmed_count(), 4);
        spec_digests.push(outcome.spec_digest);
    }

    // Same corpus + same tools = same spec identity across runs.
    assert_eq!(spec_digests[0], spec_digests[1]);
}

#[tokio::test]
async fn test_disabled_tool_is_skipped_but_gate_still_passes() {
    let dir = tempfile::tempdir().expect("tempdir");
    let workdir = dir.path().join("workspace");
    let corpus = Corpus::builtin();

    let mut tools = predictably_failing_tools();
    tools[3] = tools[3].clone().disabled();

    let outcome = HarnessPipeline::run(&corpus, &tools, &workdir, &PipelineOptions::default())
        .await
        .expect("pipeline");

    assert!(outcome.gate.passed);
    assert_eq!(outcome.verdicts.len(), 3);
    assert!(!outcome
        .verdicts
        .iter()
        .any(|v| v.tool_name == "secret_scanner"));
}

#[tokio::test]
async fn test_materialized_fixture_paths_reach_the_tool() {
    let dir = tempfile::tempdir().expect("tempdir");
    let workdir = dir.path().join("workspace");
    let corpus = Corpus::builtin();

    // A tool that greps its own fixture: confirms the placeholder resolved
    // to a readable file inside the workspace.
    let tools = vec![shell_tool(
        "linter",
        FailureCategory::Lint,
        "grep -n undefinedVar {fixture} && printf 'no-undef undefinedVar\\n'; exit 1",
    )];

    let outcome = HarnessPipeline::run(&corpus, &tools, &workdir, &PipelineOptions::default())
        .await
        .expect("pipeline");

    assert!(outcome.gate.passed, "violations: {:?}", outcome.gate.violations);
}

#[tokio::test]
async fn test_refuses_dirty_workspace_without_force() {
    let dir = tempfile::tempdir().expect("tempdir");
    let workdir = dir.path().join("workspace");
    std::fs::create_dir_all(&workdir).expect("mkdir");
    std::fs::write(workdir.join("stale.txt"), "leftover").expect("write");

    let corpus = Corpus::builtin();
    let result = HarnessPipeline::run(
        &corpus,
        &predictably_failing_tools(),
        &workdir,
        &PipelineOptions::default(),
    )
    .await;

    assert!(result.is_err());

    let options = PipelineOptions {
        force_materialize: true,
        ..PipelineOptions::default()
    };
    let outcome = HarnessPipeline::run(&corpus, &predictably_failing_tools(), &workdir, &options)
        .await
        .expect("pipeline");
    assert!(outcome.gate.passed);
}
