//! Data model for discovery, generation, validation and reporting.

pub mod artifact;
pub mod config;
pub mod discovery;
pub mod report;
pub mod strategy;

pub use artifact::Artifact;
pub use config::ScoutConfig;
pub use discovery::{
    DiscoveryRecord, InteractionStrategy, WaitHints, FRAGMENT_CAP, RECORD_SCHEMA_VERSION,
};
pub use report::{SuccessRateReport, TestResult};
pub use strategy::{
    rank_by_confidence, Confidence, Field, FieldStrategyResult, StrategyKind,
    EVAL_HIGH_CONFIDENCE_LEN, MIN_SAMPLE_LEN, QUERY_MEDIUM_CONFIDENCE_LEN, SAMPLE_CAP,
};
