//! Error handling for the Bura client.

pub mod domain;

pub use domain::{DomainError, ValidationKind};
