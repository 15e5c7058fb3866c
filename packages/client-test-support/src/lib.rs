//! Shared helpers for the client's integration test binaries.

pub mod logging;
