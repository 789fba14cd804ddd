//! Testing helpers for the `torrenttp` service.
pub mod configuration;
pub mod random;
