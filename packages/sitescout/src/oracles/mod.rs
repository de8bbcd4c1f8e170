//! Oracle implementations.

pub mod rig;

pub use rig::RigOracle;
