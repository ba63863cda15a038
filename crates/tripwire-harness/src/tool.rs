//! External tool definitions and configuration.
//!
//! Tool commands are configuration, not corpus contract: the builtin
//! defaults mirror a conventional JS toolchain, and a TOML file or CLI
//! flags can swap any of them for whatever the surrounding CI actually
//! runs.

use std::collections::BTreeMap;
use std::path::Path;

use anyhow::Context;
use serde::{Deserialize, Serialize};

use tripwire_core::FailureCategory;

/// Placeholder in a tool argv that is replaced with the materialized
/// fixture path.
pub const FIXTURE_PLACEHOLDER: &str = "{fixture}";

/// Default per-tool timeout.
pub const DEFAULT_TOOL_TIMEOUT_SECS: u64 = 300;

/// Builtin external tools, one per fixture category.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum BuiltinTool {
    /// npx webpack --entry {fixture}
    Bundler,

    /// npx eslint {fixture}
    Linter,

    /// npx jest {fixture}
    TestRunner,

    /// gitleaks detect --no-git --source {fixture}
    SecretScanner,
}

impl BuiltinTool {
    /// Tool name as used in logs, config files, and reports.
    pub fn name(&self) -> &'static str {
        match self {
            BuiltinTool::Bundler => "bundler",
            BuiltinTool::Linter => "linter",
            BuiltinTool::TestRunner => "test_runner",
            BuiltinTool::SecretScanner => "secret_scanner",
        }
    }

    /// The fixture category this tool consumes.
    pub fn category(&self) -> FailureCategory {
        match self {
            BuiltinTool::Bundler => FailureCategory::Build,
            BuiltinTool::Linter => FailureCategory::Lint,
            BuiltinTool::TestRunner => FailureCategory::Test,
            BuiltinTool::SecretScanner => FailureCategory::Secret,
        }
    }

    /// The tool's default command, with the fixture placeholder unresolved.
    pub fn command(&self) -> Vec<String> {
        let argv: &[&str] = match self {
            BuiltinTool::Bundler => &["npx", "webpack", "--entry", FIXTURE_PLACEHOLDER],
            BuiltinTool::Linter => &["npx", "eslint", FIXTURE_PLACEHOLDER],
            BuiltinTool::TestRunner => &["npx", "jest", FIXTURE_PLACEHOLDER],
            BuiltinTool::SecretScanner => {
                &["gitleaks", "detect", "--no-git", "--source", FIXTURE_PLACEHOLDER]
            }
        };
        argv.iter().map(|s| s.to_string()).collect()
    }

    /// All builtin tools, in the order they run.
    pub fn all() -> [BuiltinTool; 4] {
        [
            BuiltinTool::Bundler,
            BuiltinTool::Linter,
            BuiltinTool::TestRunner,
            BuiltinTool::SecretScanner,
        ]
    }
}

/// Configuration for one external tool invocation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolConfig {
    /// Tool name (unique within a run).
    pub name: String,

    /// Which fixture category this tool consumes.
    pub category: FailureCategory,

    /// Command argv; `{fixture}` is substituted with the fixture path.
    pub command: Vec<String>,

    /// Timeout in seconds; 0 disables the timeout.
    pub timeout_secs: u64,

    /// Whether this tool runs.
    pub enabled: bool,
}

impl ToolConfig {
    /// Create a tool configuration from a builtin tool.
    pub fn from_builtin(tool: BuiltinTool, timeout_secs: u64) -> Self {
        Self {
            name: tool.name().to_string(),
            category: tool.category(),
            command: tool.command(),
            timeout_secs,
            enabled: true,
        }
    }

    /// Create a custom tool configuration.
    pub fn custom(
        name: String,
        category: FailureCategory,
        command: Vec<String>,
        timeout_secs: u64,
    ) -> Self {
        Self {
            name,
            category,
            command,
            timeout_secs,
            enabled: true,
        }
    }

    /// Disable this tool.
    pub fn disabled(mut self) -> Self {
        self.enabled = false;
        self
    }

    /// The argv with the fixture placeholder substituted.
    pub fn resolved_command(&self, fixture_path: &Path) -> Vec<String> {
        let fixture = fixture_path.to_string_lossy();
        self.command
            .iter()
            .map(|arg| arg.replace(FIXTURE_PLACEHOLDER, &fixture))
            .collect()
    }

    /// All builtin tools with the default timeout.
    pub fn defaults() -> Vec<ToolConfig> {
        BuiltinTool::all()
            .into_iter()
            .map(|tool| ToolConfig::from_builtin(tool, DEFAULT_TOOL_TIMEOUT_SECS))
            .collect()
    }
}

// ─── TOML config file ─────────────────────────────────────────────────────

/// Per-tool overrides keyed by tool name.
///
/// ```toml
/// [tools.linter]
/// command = ["npx", "eslint", "--no-eslintrc", "--rule", "{\"no-undef\": \"error\"}", "{fixture}"]
/// timeout_secs = 120
///
/// [tools.secret_scanner]
/// enabled = false
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ToolFile {
    #[serde(default)]
    pub tools: BTreeMap<String, ToolOverride>,
}

/// Overridable fields for one tool.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ToolOverride {
    pub command: Option<Vec<String>>,
    pub timeout_secs: Option<u64>,
    pub enabled: Option<bool>,
}

/// Load a tool config file.
pub fn load_tool_file(path: &Path) -> anyhow::Result<ToolFile> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("reading tool config {}", path.display()))?;
    toml::from_str(&raw).with_context(|| format!("parsing tool config {}", path.display()))
}

/// Apply file overrides onto a tool set, matched by name. Overrides naming
/// no configured tool are ignored.
pub fn apply_overrides(mut tools: Vec<ToolConfig>, file: &ToolFile) -> Vec<ToolConfig> {
    for tool in &mut tools {
        if let Some(over) = file.tools.get(&tool.name) {
            if let Some(command) = &over.command {
                tool.command = command.clone();
            }
            if let Some(timeout_secs) = over.timeout_secs {
                tool.timeout_secs = timeout_secs;
            }
            if let Some(enabled) = over.enabled {
                tool.enabled = enabled;
            }
        }
    }
    tools
}
