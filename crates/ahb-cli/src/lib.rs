//! Library side of the `ahb-diff` binary, exposed for integration tests.

pub mod cli;
pub mod commands;
pub mod logging;
pub mod summary;
pub mod types;
