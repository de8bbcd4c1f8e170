//! Discovery-Driven Scraper Generation
//!
//! Automates discovery and validation of field-extraction strategies for
//! job postings across multiple site families, and converts a verified
//! discovery into a reusable, deterministic extraction program.
//!
//! # Design Philosophy
//!
//! **Verify live, then generate**
//!
//! - Strategies are tested against the live page before anything is
//!   generated; the oracle documents, it does not invent
//! - Confidence-ranked evidence, not ground truth
//! - Bounded self-repair: generated artifacts are executed against real
//!   documents and repaired through the oracle a fixed number of times
//! - External collaborators (browser engine, oracle, process execution)
//!   stay behind traits so tests run on deterministic mocks
//!
//! # Usage
//!
//! ```rust,ignore
//! use sitescout::{discover, generate, validate_artifact, SiteRegistry, ScoutConfig};
//! use sitescout::browsers::RemoteDocument;
//! use sitescout::oracles::RigOracle;
//!
//! let registry = SiteRegistry::with_defaults();
//! let config = ScoutConfig::from_env()?;
//! let document = RemoteDocument::from_env().await?;
//! let oracle = RigOracle::from_env(&config)?;
//!
//! let record = discover(&registry, &document, &oracle,
//!     "https://www.linkedin.com/jobs/view/4300362234", None, &config).await?;
//! let (mut artifact, _warnings) = generate(&registry, &oracle, &record, &config).await?;
//! ```
//!
//! # Modules
//!
//! - [`sites`] - URL classification and record identifiers
//! - [`probe`] - Live strategy and interaction probing
//! - [`discovery`] - Discovery orchestration and record persistence
//! - [`generate`] - Artifact generation under contract
//! - [`validate`] - Execute-inspect-repair validation loop
//! - [`harness`] - Multi-document testing and success-rate reports
//! - [`traits`] - Capability seams (Document, Oracle, ArtifactRunner)
//! - [`testing`] - Deterministic mocks

pub mod browsers;
pub mod discovery;
pub mod error;
pub mod exec;
pub mod generate;
pub mod harness;
pub mod oracles;
pub mod probe;
pub mod prompts;
pub mod sites;
pub mod testing;
pub mod traits;
pub mod types;
pub mod validate;

// Re-export core types at crate root
pub use error::{DocumentError, DocumentResult, Result, ScoutError};
pub use sites::{SiteId, SiteProfile, SiteRegistry};
pub use traits::{ArtifactRunner, Document, ElementHandle, Oracle, RunOutput};
pub use types::{
    Artifact, Confidence, DiscoveryRecord, Field, FieldStrategyResult, InteractionStrategy,
    ScoutConfig, StrategyKind, SuccessRateReport, TestResult, WaitHints,
};

// Re-export pipeline entry points
pub use discovery::{discover, latest_record, load_record, save_record};
pub use generate::{generate, ContractReport};
pub use harness::{default_test_urls, render_report, run_batch, save_report};
pub use validate::{
    validate_artifact, ExecFailure, Outcome, ValidationAttempt, ValidationReport, ValidationState,
};

// Re-export executors
pub use exec::ProcessRunner;
