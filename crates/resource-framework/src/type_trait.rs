//! # TypeTrait
//!
//! The `TypeTrait` is how a concrete resource type customizes the generic
//! engine. It supplies:
//!
//! - **Bridging hooks**: one per [`ConversionContext`](crate::ConversionContext),
//!   run after the structural copier. Use them for what name matching cannot
//!   express: renamed fields, remapped enum strings, derived values.
//! - **Field traits** per [`Version`], enforced after every access and used
//!   when freezing.
//! - **Copier configuration**, e.g. to exclude fields that a hook bridges by
//!   hand so they are not reported as dropped.
//!
//! Every method has a default, so an implementation only overrides what it
//! needs. [`BaseTypeTrait`] overrides nothing.
//!
//! ```rust
//! use resource_framework::{CopierConfig, HookError, Path, TypeTrait};
//!
//! # #[derive(Default)] struct Stable { purpose: String }
//! # #[derive(Default)] struct Alpha { address_purpose: String }
//! # #[derive(Default)] struct Beta;
//! struct RenamedPurpose;
//!
//! impl TypeTrait<Stable, Alpha, Beta> for RenamedPurpose {
//!     fn copier_config(&self) -> CopierConfig {
//!         CopierConfig::new()
//!             .exclude_path(Path::root().field("Purpose"))
//!             .exclude_path(Path::root().field("AddressPurpose"))
//!     }
//!
//!     fn copy_helper_stable_to_alpha(&self, dest: &mut Alpha, src: &Stable) -> Result<(), HookError> {
//!         dest.address_purpose = src.purpose.clone();
//!         Ok(())
//!     }
//! }
//! ```

use crate::copier::CopierConfig;
use crate::error::HookError;
use crate::field_traits::FieldTraits;
use crate::version::Version;

/// Per-type customization of a [`Resource`](crate::Resource).
///
/// `S`, `A` and `B` are the stable, alpha and beta representation types.
pub trait TypeTrait<S, A, B>: Send + Sync {
    /// Field policy for `version`.
    fn field_traits(&self, _version: Version) -> FieldTraits {
        FieldTraits::new()
    }

    /// Copier options used for every copy of this resource.
    fn copier_config(&self) -> CopierConfig {
        CopierConfig::new()
    }

    fn copy_helper_stable_to_alpha(&self, _dest: &mut A, _src: &S) -> Result<(), HookError> {
        Ok(())
    }

    fn copy_helper_stable_to_beta(&self, _dest: &mut B, _src: &S) -> Result<(), HookError> {
        Ok(())
    }

    fn copy_helper_alpha_to_stable(&self, _dest: &mut S, _src: &A) -> Result<(), HookError> {
        Ok(())
    }

    fn copy_helper_alpha_to_beta(&self, _dest: &mut B, _src: &A) -> Result<(), HookError> {
        Ok(())
    }

    fn copy_helper_beta_to_stable(&self, _dest: &mut S, _src: &B) -> Result<(), HookError> {
        Ok(())
    }

    fn copy_helper_beta_to_alpha(&self, _dest: &mut A, _src: &B) -> Result<(), HookError> {
        Ok(())
    }
}

/// A `TypeTrait` with no custom bridging and default field traits.
#[derive(Debug, Clone, Copy, Default)]
pub struct BaseTypeTrait;

impl<S, A, B> TypeTrait<S, A, B> for BaseTypeTrait {}
