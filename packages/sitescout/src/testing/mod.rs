//! Mock implementations for testing.
//!
//! All mocks are deterministic: canned responses configured up front, call
//! recording for verification, no live services.

mod document;
mod oracle;
mod runner;

pub use document::MockDocument;
pub use oracle::MockOracle;
pub use runner::{MockRunner, ScriptedRun};
