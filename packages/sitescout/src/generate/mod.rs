//! Generation: converting a discovery record into a reusable artifact.

pub mod contract;
pub mod orchestrator;
pub mod request;

pub use contract::{check_contract, extract_source, ContractReport};
pub use orchestrator::{generate, persist_artifact};
pub use request::{build_generation_request, request_expressions};
