//! Document implementations.

pub mod remote;

pub use remote::RemoteDocument;
