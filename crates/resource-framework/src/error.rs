//! # Framework Errors
//!
//! Error types for the reconciliation engine. They fall into four groups:
//!
//! - **Structural**: [`ResourceError::Schema`] and [`ResourceError::FieldPolicy`].
//!   Fatal to the operation in progress.
//! - **Conversion**: [`ConversionError`], a list of [`MissingField`]s. Informational;
//!   only surfaced by `to_*` and version inference.
//! - **Bridging hook**: [`ResourceError::Hook`], raised by a type trait during
//!   propagation.
//! - **Ambiguity**: [`ResourceError::AmbiguousVersion`], carrying all three
//!   per-version states.

use crate::path::Path;
use crate::version::{ConversionContext, Version};
use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// Error type returned by custom bridging hooks.
pub type HookError = Box<dyn std::error::Error + Send + Sync>;

/// A value that was set in a source version but has no place in the
/// destination version.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MissingField {
    /// Which version => version copy dropped the field.
    pub context: ConversionContext,
    /// Path of the field in the source value.
    pub path: Path,
    /// The source value.
    pub value: serde_json::Value,
}

impl Display for MissingField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}={}", self.context, self.path, self.value)
    }
}

/// Fields that were set but did not translate into the requested version.
///
/// Never empty: the engine reports "no error" as `None`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversionError {
    pub missing_fields: Vec<MissingField>,
}

impl ConversionError {
    /// Wraps `missing_fields`, returning `None` when nothing is missing.
    pub fn from_missing(missing_fields: Vec<MissingField>) -> Option<Self> {
        if missing_fields.is_empty() {
            None
        } else {
            Some(Self { missing_fields })
        }
    }
}

impl Display for ConversionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "ConversionError: missing fields [")?;
        for (i, mf) in self.missing_fields.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{mf}")?;
        }
        write!(f, "]")
    }
}

impl std::error::Error for ConversionError {}

/// Failures of the structural copier itself (as opposed to dropped fields,
/// which are not errors).
#[derive(Debug, thiserror::Error)]
pub enum CopyError {
    #[error("cannot serialize {type_name}: {source}")]
    Serialize {
        type_name: &'static str,
        #[source]
        source: serde_json::Error,
    },
    #[error("{type_name} is not a struct")]
    NotAStruct { type_name: &'static str },
    #[error("cannot rebuild {type_name} from copied fields: {source}")]
    Deserialize {
        type_name: &'static str,
        #[source]
        source: serde_json::Error,
    },
}

/// Errors returned by [`Resource`](crate::Resource) operations.
#[derive(Debug, thiserror::Error)]
pub enum ResourceError {
    #[error("schema error in {type_name}: {reason}")]
    Schema {
        type_name: &'static str,
        reason: String,
    },

    #[error("{version} field {path}: {reason}")]
    FieldPolicy {
        version: Version,
        path: Path,
        reason: String,
    },

    #[error(transparent)]
    Copy(#[from] CopyError),

    #[error("bridging hook {context} failed: {source}")]
    Hook {
        context: ConversionContext,
        #[source]
        source: HookError,
    },

    #[error(transparent)]
    Conversion(#[from] ConversionError),

    #[error(
        "indeterminate version (stable={}, alpha={}, beta={})",
        state(.stable),
        state(.alpha),
        state(.beta)
    )]
    AmbiguousVersion {
        stable: Option<ConversionError>,
        alpha: Option<ConversionError>,
        beta: Option<ConversionError>,
    },

    #[error("invalid path {input:?}: {reason}")]
    InvalidPath { input: String, reason: String },

    #[error("invalid resource URL {input:?}: {reason}")]
    InvalidResourceUrl { input: String, reason: String },
}

impl ResourceError {
    pub(crate) fn schema<T>(reason: impl Into<String>) -> Self {
        ResourceError::Schema {
            type_name: short_type_name::<T>(),
            reason: reason.into(),
        }
    }
}

fn state(err: &Option<ConversionError>) -> String {
    match err {
        Some(e) => e.to_string(),
        None => "<nil>".to_string(),
    }
}

/// Type name without its module path (e.g. "Address" instead of
/// "resource_recipe::model::address::Address").
pub(crate) fn short_type_name<T>() -> &'static str {
    std::any::type_name::<T>()
        .split('<')
        .next()
        .and_then(|s| s.split("::").last())
        .unwrap_or("Unknown")
}
