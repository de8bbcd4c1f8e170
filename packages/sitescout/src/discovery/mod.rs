//! Discovery: probing a live document and persisting the evidence.

pub mod annotate;
pub mod orchestrator;
pub mod store;

pub use annotate::{build_annotation_prompt, parse_annotation, Annotation};
pub use orchestrator::discover;
pub use store::{latest_record, load_record, save_record};
