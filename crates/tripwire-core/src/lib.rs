//! Tripwire Core Library
//!
//! Domain model for the tripwire negative-test fixture corpus: the fixtures
//! themselves, the expected-failure taxonomy, normalized diagnostics,
//! deterministic digests, and corpus materialization. The external bundler,
//! linter, test runner, and secret scanner stay black boxes; this crate only
//! describes what they must be fed and what they must emit.

pub mod domain;
pub mod materialize;
pub mod telemetry;

pub use domain::{
    CaseSummary, Corpus, Diagnostic, DiagnosticSource, Expectation, FailureCategory, FailureKind,
    Fixture, Result, Severity, SupportFile, TripwireError,
};

pub use materialize::{materialize, remove_materialized, MaterializedCorpus};

pub use telemetry::init_tracing;
