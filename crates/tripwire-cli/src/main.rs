//! tripwire - negative-test fixture corpus CLI
//!
//! The `tripwire` command materializes a corpus of intentionally-broken
//! fixtures and verifies that the external build / lint / test /
//! secret-scan tools fail against them in exactly the predicted way.
//!
//! ## Commands
//!
//! - `list`: Show the builtin corpus
//! - `show`: Print one fixture's source and expectation
//! - `materialize`: Write the corpus into a workspace directory
//! - `verify`: Run the external tools and evaluate the gate
//! - `clean`: Remove a materialized workspace

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::Level;

use tripwire_core::{materialize, remove_materialized, Corpus, FailureCategory};
use tripwire_harness::{
    apply_overrides, load_tool_file, HarnessPipeline, PipelineOptions, ToolConfig,
    DEFAULT_TOOL_TIMEOUT_SECS,
};

#[derive(Parser)]
#[command(name = "tripwire")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Negative-test fixture corpus for CI failure-path validation", long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Emit JSON-formatted log lines
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the builtin fixture corpus
    List,

    /// Print one fixture's source and expectation
    Show {
        /// Fixture id
        id: String,
    },

    /// Write the corpus into a workspace directory
    Materialize {
        /// Target directory
        #[arg(short, long, default_value = ".tripwire/workspace")]
        out: PathBuf,

        /// Overwrite a non-empty directory
        #[arg(long)]
        force: bool,
    },

    /// Run the external tools against the corpus and evaluate the gate
    Verify {
        /// Scratch workspace the corpus materializes into
        #[arg(long, default_value = ".tripwire/workspace")]
        workdir: PathBuf,

        /// TOML file with per-tool command overrides
        #[arg(long)]
        config: Option<PathBuf>,

        /// Directory for report artifacts
        #[arg(long)]
        report_dir: Option<PathBuf>,

        /// Keep the materialized workspace after the run
        #[arg(long)]
        keep: bool,

        /// Materialize into a non-empty workspace
        #[arg(long)]
        force: bool,

        /// Restrict the run to these categories (build, lint, test, secret)
        #[arg(long)]
        only: Vec<String>,

        /// Per-tool timeout in seconds
        #[arg(
            long,
            env = "TRIPWIRE_TOOL_TIMEOUT_SECS",
            default_value_t = DEFAULT_TOOL_TIMEOUT_SECS
        )]
        timeout_secs: u64,
    },

    /// Remove a materialized workspace
    Clean {
        /// Workspace directory to clean
        #[arg(long, default_value = ".tripwire/workspace")]
        workdir: PathBuf,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Setup logging
    let level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };
    tripwire_core::init_tracing(cli.json, level);

    match cli.command {
        Commands::List => cmd_list(),
        Commands::Show { id } => cmd_show(&id),
        Commands::Materialize { out, force } => cmd_materialize(&out, force),
        Commands::Verify {
            workdir,
            config,
            report_dir,
            keep,
            force,
            only,
            timeout_secs,
        } => {
            cmd_verify(
                &workdir,
                config.as_deref(),
                report_dir,
                keep,
                force,
                &only,
                timeout_secs,
            )
            .await
        }
        Commands::Clean { workdir } => cmd_clean(&workdir),
    }
}

/// Show the builtin fixture corpus
fn cmd_list() -> Result<()> {
    let corpus = Corpus::builtin();

    println!(
        "{} fixtures, {} support files",
        corpus.len(),
        corpus.support_files().len()
    );
    println!();
    for fixture in corpus.fixtures() {
        println!(
            "  {:<22} {:<7} {}",
            fixture.id,
            fixture.category.name(),
            fixture.trigger
        );
    }
    for support in corpus.support_files() {
        println!("  {:<22} support collaborator module", support.path);
    }
    Ok(())
}

/// Print one fixture's source and expectation
fn cmd_show(id: &str) -> Result<()> {
    let corpus = Corpus::builtin();
    let fixture = corpus.get(id)?;

    println!("id:        {}", fixture.id);
    println!("category:  {}", fixture.category);
    println!("kind:      {}", fixture.expected_kind());
    println!("path:      {}", fixture.path);
    println!("trigger:   {}", fixture.trigger);
    println!(
        "expects:   {}",
        serde_json::to_string(&fixture.expectation)?
    );
    println!();
    print!("{}", fixture.content);
    Ok(())
}

/// Write the corpus into a workspace directory
fn cmd_materialize(out: &Path, force: bool) -> Result<()> {
    let corpus = Corpus::builtin();
    let materialized = materialize(&corpus, out, force)?;

    println!(
        "Materialized {} files into {}",
        materialized.files().len(),
        materialized.root().display()
    );
    Ok(())
}

/// Run the external tools against the corpus and evaluate the gate
async fn cmd_verify(
    workdir: &Path,
    config_path: Option<&Path>,
    report_dir: Option<PathBuf>,
    keep: bool,
    force: bool,
    only: &[String],
    timeout_secs: u64,
) -> Result<()> {
    let corpus = Corpus::builtin();

    let mut tools: Vec<ToolConfig> = ToolConfig::defaults()
        .into_iter()
        .map(|mut tool| {
            tool.timeout_secs = timeout_secs;
            tool
        })
        .collect();

    if let Some(path) = config_path {
        let file = load_tool_file(path)?;
        tools = apply_overrides(tools, &file);
    }

    if let Some(categories) = parse_categories(only)? {
        tools.retain(|tool| categories.contains(&tool.category));
    }

    println!("Verifying corpus in workspace: {}", workdir.display());
    println!(
        "Tools: {}",
        tools
            .iter()
            .map(|t| t.name.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    );
    println!();

    let options = PipelineOptions {
        keep_workspace: keep,
        force_materialize: force,
        report_dir,
    };
    let outcome = HarnessPipeline::run(&corpus, &tools, workdir, &options)
        .await
        .context("verification pipeline failed to run")?;

    println!("Run ID: {}", outcome.run_id);
    println!("Duration: {}ms", outcome.duration_ms);
    println!();

    for verdict in &outcome.verdicts {
        let status = if verdict.confirmed { "✓" } else { "✗" };
        println!(
            "  {} {} [{}] ({}ms, exit code: {})",
            status, verdict.fixture_id, verdict.tool_name, verdict.duration_ms, verdict.exit_code
        );
    }

    println!();
    println!(
        "Summary: {}/{} fixtures confirmed",
        outcome.confirmed_count(),
        outcome.verdicts.len()
    );
    println!(
        "Gate: {}",
        if outcome.gate.passed {
            "✓ PASSED"
        } else {
            "✗ FAILED"
        }
    );

    if !outcome.gate.violations.is_empty() {
        println!("Violations:");
        for violation in &outcome.gate.violations {
            println!("  - {}", violation);
        }
    }

    if outcome.gate.passed {
        println!("\n✓ Every fixture failed as predicted");
        Ok(())
    } else {
        anyhow::bail!("fixture verification failed")
    }
}

/// Remove a materialized workspace
fn cmd_clean(workdir: &Path) -> Result<()> {
    let corpus = Corpus::builtin();
    remove_materialized(&corpus, workdir)?;
    println!("Cleaned {}", workdir.display());
    Ok(())
}

/// Parse `--only` categories; an empty list means "all".
fn parse_categories(only: &[String]) -> Result<Option<Vec<FailureCategory>>> {
    if only.is_empty() {
        return Ok(None);
    }
    let categories = only
        .iter()
        .map(|raw| {
            raw.parse::<FailureCategory>()
                .with_context(|| format!("invalid --only category '{raw}'"))
        })
        .collect::<Result<Vec<_>>>()?;
    Ok(Some(categories))
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_categories() {
        assert!(parse_categories(&[]).expect("empty").is_none());

        let parsed = parse_categories(&["build".to_string(), "TEST".to_string()])
            .expect("parse")
            .expect("some");
        assert_eq!(parsed, vec![FailureCategory::Build, FailureCategory::Test]);

        assert!(parse_categories(&["deploy".to_string()]).is_err());
    }

    #[test]
    fn test_materialize_then_clean_roundtrip() {
        let dir = tempfile::tempdir().expect("tempdir");
        let workdir = dir.path().join("workspace");

        cmd_materialize(&workdir, false).expect("materialize");
        assert!(workdir.join("src/utils/sum.js").exists());

        cmd_clean(&workdir).expect("clean");
        assert!(!workdir.exists());
    }

    #[test]
    fn test_show_unknown_fixture_errors() {
        assert!(cmd_show("no-such-fixture").is_err());
    }

    #[test]
    fn test_list_prints_builtin_corpus() {
        cmd_list().expect("list");
    }
}
