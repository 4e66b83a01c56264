//! Error types raised by the sample resources' bridging hooks.

use thiserror::Error;

/// Errors that can occur while bridging a sample resource between versions.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ModelError {
    /// The purpose is not one the Compute API defines.
    #[error("Unknown address purpose: {0}")]
    UnknownPurpose(String),

    /// A reference field does not hold a resource URL.
    #[error("Invalid reference in {field}: {reason}")]
    InvalidReference { field: &'static str, reason: String },
}
