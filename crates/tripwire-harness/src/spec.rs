//! Harness run identity.
//!
//! A run is identified by what went in: the corpus content and the tool
//! set. Two runs with the same spec digest exercised the same inputs, so
//! any difference in outcome is the external tools' doing (formatting
//! drift across tool versions is allowed; the failure kind is not).

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;
use uuid::Uuid;

use tripwire_core::domain::digest;
use tripwire_core::{Corpus, Result};

use crate::tool::ToolConfig;

/// Identity of one harness run.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HarnessSpec {
    /// Unique identifier for this run.
    pub run_id: Uuid,

    /// SHA-256 digest over corpus digest + tools digest.
    pub spec_digest: String,

    /// Digest of the corpus content.
    pub corpus_digest: String,

    /// Digest of the ordered tool set (names, commands, timeouts).
    pub tools_digest: String,

    /// Scratch workspace the corpus materializes into.
    pub workdir: PathBuf,

    /// When this spec was created.
    pub created_at: DateTime<Utc>,
}

impl HarnessSpec {
    /// Create a spec for a corpus + tool set.
    pub fn new(corpus: &Corpus, tools: &[ToolConfig], workdir: PathBuf) -> Result<Self> {
        let corpus_digest = corpus.digest()?;
        let tools_digest = compute_tools_digest(tools);
        let spec_digest = compute_spec_digest(&corpus_digest, &tools_digest)?;

        Ok(Self {
            run_id: Uuid::new_v4(),
            spec_digest,
            corpus_digest,
            tools_digest,
            workdir,
            created_at: Utc::now(),
        })
    }

    /// Verify that this spec still describes the given corpus + tool set.
    pub fn verify_digest(&self, corpus: &Corpus, tools: &[ToolConfig]) -> Result<()> {
        let corpus_digest = corpus.digest()?;
        let tools_digest = compute_tools_digest(tools);
        let computed = compute_spec_digest(&corpus_digest, &tools_digest)?;

        if computed != self.spec_digest {
            return Err(tripwire_core::TripwireError::DigestMismatch {
                expected: self.spec_digest.clone(),
                actual: computed,
            });
        }
        Ok(())
    }
}

/// Stable digest over the two input digests.
fn compute_spec_digest(corpus_digest: &str, tools_digest: &str) -> Result<String> {
    digest::compute_digest(&json!({
        "corpus_digest": corpus_digest,
        "tools_digest": tools_digest,
    }))
}

/// Deterministic digest of the ordered tool set.
fn compute_tools_digest(tools: &[ToolConfig]) -> String {
    let mut buf = Vec::new();
    for tool in tools {
        buf.extend_from_slice(tool.name.as_bytes());
        buf.push(0);
        for arg in &tool.command {
            buf.extend_from_slice(arg.as_bytes());
            buf.push(0);
        }
        buf.extend_from_slice(&tool.timeout_secs.to_be_bytes());
        buf.push(u8::from(tool.enabled));
    }
    digest::digest_bytes(&buf)
}
