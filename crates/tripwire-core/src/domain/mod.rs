//! Domain models for the tripwire fixture corpus.
//!
//! Canonical definitions for the core entities:
//! - `Fixture` / `Corpus`: the static negative-test artifacts
//! - `FailureKind`: the expected-failure taxonomy, one kind per category
//! - `Diagnostic`: normalized output from an external tool
//! - digest helpers for deterministic corpus identity

pub mod corpus;
pub mod diagnostic;
pub mod digest;
pub mod error;
pub mod failure;
pub mod fixture;

// Re-export main types and errors
pub use corpus::Corpus;
pub use diagnostic::{Diagnostic, DiagnosticSource, Severity};
pub use error::{Result, TripwireError};
pub use failure::FailureKind;
pub use fixture::{CaseSummary, Expectation, FailureCategory, Fixture, SupportFile};
