//! Live probing of extraction strategies against a rendered document.

pub mod catalog;
pub mod expansion;
pub mod field;
pub mod fragments;

pub use expansion::probe_expansion;
pub use field::probe_field;
pub use fragments::capture_fragments;
