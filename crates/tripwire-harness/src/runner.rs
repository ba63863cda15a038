//! External tool invocation.

use std::path::Path;
use std::process::Stdio;
use std::time::Instant;

use tokio::process::Command;

use crate::tool::ToolConfig;

/// Captured result of one external tool invocation.
///
/// For a tripwire fixture the *expected* outcome is a non-zero exit: the
/// runner only reports what the tool did, it never judges. Judging belongs
/// to [`crate::verify`].
#[derive(Debug, Clone)]
pub struct ToolResult {
    /// Tool name.
    pub tool_name: String,

    /// Exit code (-1 when terminated by signal).
    pub exit_code: i32,

    /// Captured stdout.
    pub stdout: String,

    /// Captured stderr.
    pub stderr: String,

    /// Duration in milliseconds.
    pub duration_ms: u64,
}

impl ToolResult {
    /// Whether the tool exited zero.
    pub fn exited_zero(&self) -> bool {
        self.exit_code == 0
    }

    /// Stdout and stderr concatenated, in that order. External tools split
    /// diagnostics across the two streams inconsistently, so expectation
    /// matching always sees both.
    pub fn combined_output(&self) -> String {
        let mut combined = String::with_capacity(self.stdout.len() + self.stderr.len() + 1);
        combined.push_str(&self.stdout);
        if !self.stdout.is_empty() && !self.stderr.is_empty() {
            combined.push('\n');
        }
        combined.push_str(&self.stderr);
        combined
    }
}

/// Spawns external tools and captures their output.
pub struct ToolRunner;

impl ToolRunner {
    /// Invoke a tool against a materialized fixture.
    ///
    /// The command runs with `workdir` as its working directory and the
    /// fixture placeholder resolved to `fixture_path`. A spawn error or
    /// timeout is an execution fault, distinct from the (expected)
    /// non-zero tool exit.
    pub async fn invoke(
        config: &ToolConfig,
        fixture_path: &Path,
        workdir: &Path,
    ) -> anyhow::Result<ToolResult> {
        let start = Instant::now();

        let argv = config.resolved_command(fixture_path);
        if argv.is_empty() {
            anyhow::bail!("tool {} has empty command", config.name);
        }

        let child = Command::new(&argv[0])
            .args(&argv[1..])
            .current_dir(workdir)
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()?;

        let output = if config.timeout_secs > 0 {
            tokio::time::timeout(
                std::time::Duration::from_secs(config.timeout_secs),
                child.wait_with_output(),
            )
            .await
            .map_err(|_| {
                anyhow::anyhow!(
                    "tool {} timed out after {} seconds",
                    config.name,
                    config.timeout_secs
                )
            })??
        } else {
            child.wait_with_output().await?
        };

        Ok(ToolResult {
            tool_name: config.name.clone(),
            exit_code: output.status.code().unwrap_or(-1),
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
            duration_ms: start.elapsed().as_millis() as u64,
        })
    }
}
