//! # Resource Framework
//!
//! This crate keeps one logical cloud resource consistent across the three
//! versions of its API: **stable**, **alpha** and **beta**. Callers mutate
//! whichever version they have at hand; the framework copies the change into
//! the other two, records every field that did not survive the trip, and
//! decides which version can carry the resource without loss.
//!
//! ## Why Three Versions?
//!
//! Cloud APIs ship new fields in alpha first, promote them to beta, and finally
//! to stable. A resource that uses an alpha-only field must be sent through the
//! alpha API; a resource that uses nothing new should go through stable. Code
//! that builds resources should not have to track this by hand.
//!
//! ## Architecture Overview
//!
//! ```text
//!   ┌────────────┐  access / set  ┌──────────────────────────────┐
//!   │   caller   │ ─────────────► │ Resource<S, A, B>            │
//!   └────────────┘                │  stable ◄──► alpha ◄──► beta │
//!                                 │  errors[6 contexts]          │
//!                                 └──────────────┬───────────────┘
//!                                                │ freeze
//!                                                ▼
//!                                 ┌──────────────────────────────┐
//!                                 │ FrozenResource (read-only)   │
//!                                 │  canonical version fixed     │
//!                                 └──────────────────────────────┘
//! ```
//!
//! The layers, leaves first:
//!
//! 1. **Path** ([`Path`]): field locations such as `.Rules[0].Port`
//! 2. **Structural Copier** ([`Copier`]): name-based copy between differently
//!    shaped structs through their serde form
//! 3. **Field Traits** ([`FieldTraits`]) and the **Type Trait** hook set
//!    ([`TypeTrait`]): per-type customization
//! 4. **Schema Checker** ([`schema`]): structural and policy assertions
//! 5. **Versioned Resource** ([`Resource`]) and [`FrozenResource`]
//!
//! ## Example
//!
//! ```rust
//! use resource_framework::{ConversionContext, Resource, ResourceId, Version};
//! use serde::{Deserialize, Serialize};
//!
//! #[derive(Debug, Clone, Default, Serialize, Deserialize)]
//! #[serde(rename_all = "PascalCase", default)]
//! struct Address { name: String, description: String }
//!
//! #[derive(Debug, Clone, Default, Serialize, Deserialize)]
//! #[serde(rename_all = "PascalCase", default)]
//! struct AlphaAddress { name: String, description: String, feature_flag: bool }
//!
//! type AddressResource = Resource<Address, AlphaAddress, Address>;
//! AddressResource::check_schema().unwrap();
//!
//! let id = ResourceId::global("my-project", "addresses", "foo");
//! let mut r = AddressResource::new(id, None).unwrap();
//!
//! r.access_alpha(|a| a.feature_flag = true).unwrap();
//!
//! let (_, err) = r.to_stable();
//! let missing = &err.unwrap().missing_fields[0];
//! assert_eq!(missing.context, ConversionContext::AlphaToStable);
//! assert_eq!(missing.path.to_string(), ".FeatureFlag");
//!
//! let frozen = r.freeze().unwrap();
//! assert_eq!(frozen.version(), Version::Alpha);
//! ```
//!
//! ## Ownership
//!
//! A [`Resource`] has a single owner. Every mutating operation takes
//! `&mut self`, and [`Resource::freeze`] hands out a [`FrozenResource`] that
//! borrows the resource, so nothing can change it while a frozen view exists.
//! No operation blocks or performs I/O.
//!
//! ## Testing
//!
//! The [`mock`] module provides [`mock::MockTypeTrait`], a scripted type trait
//! that records hook calls and injects hook failures.

pub mod copier;
pub mod error;
pub mod field_traits;
pub mod frozen;
pub mod mock;
pub mod path;
pub mod resource;
pub mod resource_id;
pub mod schema;
pub mod tracing;
pub mod type_trait;
pub mod version;

mod value;

// Re-export core types for convenience
pub use copier::{Copier, CopierConfig, DroppedField};
pub use error::{ConversionError, CopyError, HookError, MissingField, ResourceError};
pub use field_traits::{FieldTraits, FieldType};
pub use frozen::{Canonical, FrozenResource};
pub use path::{Path, Segment};
pub use resource::{Representation, Resource};
pub use resource_id::{Key, ResourceId, Scope};
pub use type_trait::{BaseTypeTrait, TypeTrait};
pub use value::{FORCE_SEND_FIELDS, NAME_FIELD, NULL_FIELDS};
pub use version::{ConversionContext, Version};
