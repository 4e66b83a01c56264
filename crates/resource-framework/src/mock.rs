//! # Mock Type Trait & Testing Guide
//!
//! [`MockTypeTrait`] scripts the bridging hooks of a [`Resource`](crate::Resource)
//! so tests can observe which conversions ran and inject hook failures that a
//! real type trait would only produce on bad data.
//!
//! ## When to use the Mock vs a Real Type Trait
//!
//! | Feature | MockTypeTrait | Real TypeTrait |
//! |---------|---------------|----------------|
//! | **Hook behavior** | Scripted (`return_ok` / `return_err`) | Real bridging logic |
//! | **Call order** | Recorded and checked | Not observable |
//! | **Use Case** | Testing the propagation engine | Testing a concrete resource |
//! | **Error Injection** | Easy (`return_err`) | Requires crafted input |
//!
//! ## Example
//!
//! ```rust
//! use resource_framework::mock::MockTypeTrait;
//! use resource_framework::{ConversionContext, Resource, ResourceError, ResourceId};
//! use serde::{Deserialize, Serialize};
//!
//! #[derive(Debug, Clone, Default, Serialize, Deserialize)]
//! #[serde(rename_all = "PascalCase", default)]
//! struct Thing { name: String, size: u32 }
//!
//! let mock = MockTypeTrait::new();
//! mock.expect_hook(ConversionContext::StableToAlpha).return_ok();
//! mock.expect_hook(ConversionContext::StableToBeta).return_err("beta rejected");
//!
//! let id = ResourceId::global("proj", "things", "t");
//! let mut r = Resource::<Thing, Thing, Thing>::new(id, Some(mock.type_trait())).unwrap();
//!
//! let err = r.access(|x| x.size = 3).unwrap_err();
//! assert!(matches!(err, ResourceError::Hook { context: ConversionContext::StableToBeta, .. }));
//! assert_eq!(mock.calls(), vec![ConversionContext::StableToAlpha, ConversionContext::StableToBeta]);
//! mock.verify();
//! ```

use crate::copier::CopierConfig;
use crate::error::HookError;
use crate::field_traits::FieldTraits;
use crate::type_trait::TypeTrait;
use crate::version::{ConversionContext, Version};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

// =============================================================================
// EXPECTATION BUILDER API
// =============================================================================

/// An expected bridging hook invocation and its scripted result.
struct Expectation {
    context: ConversionContext,
    response: Result<(), String>,
}

#[derive(Default)]
struct Shared {
    expectations: Mutex<VecDeque<Expectation>>,
    calls: Mutex<Vec<ConversionContext>>,
}

/// A scripted type trait with expectation tracking.
///
/// Hooks must be called in the order the expectations were declared. An
/// unexpected call panics. Field traits and copier configuration are captured
/// when [`MockTypeTrait::type_trait`] is called.
pub struct MockTypeTrait {
    shared: Arc<Shared>,
    field_traits: [FieldTraits; 3],
    copier_config: CopierConfig,
}

impl Default for MockTypeTrait {
    fn default() -> Self {
        Self::new()
    }
}

impl MockTypeTrait {
    /// Creates a mock with no expectations and default field traits.
    pub fn new() -> Self {
        Self {
            shared: Arc::new(Shared::default()),
            field_traits: Default::default(),
            copier_config: CopierConfig::new(),
        }
    }

    pub fn with_field_traits(mut self, version: Version, traits: FieldTraits) -> Self {
        self.field_traits[version.index()] = traits;
        self
    }

    pub fn with_copier_config(mut self, config: CopierConfig) -> Self {
        self.copier_config = config;
        self
    }

    /// The type trait to hand to [`Resource::new`](crate::Resource::new).
    pub fn type_trait<S, A, B>(&self) -> Box<dyn TypeTrait<S, A, B>> {
        Box::new(MockHooks {
            shared: self.shared.clone(),
            field_traits: self.field_traits.clone(),
            copier_config: self.copier_config.clone(),
        })
    }

    /// Expects the hook of `context` to run next.
    pub fn expect_hook(&self, context: ConversionContext) -> HookExpectationBuilder {
        HookExpectationBuilder {
            context,
            shared: self.shared.clone(),
        }
    }

    /// Contexts of every hook that ran, in order.
    pub fn calls(&self) -> Vec<ConversionContext> {
        self.shared.calls.lock().unwrap().clone()
    }

    /// Verifies that all expectations were met.
    pub fn verify(&self) {
        let exps = self.shared.expectations.lock().unwrap();
        if !exps.is_empty() {
            panic!("Not all expectations were met. {} remaining", exps.len());
        }
    }
}

/// Builder for hook expectations.
pub struct HookExpectationBuilder {
    context: ConversionContext,
    shared: Arc<Shared>,
}

impl HookExpectationBuilder {
    /// The hook succeeds without touching the destination.
    pub fn return_ok(self) {
        self.push(Ok(()));
    }

    /// The hook fails with `message`.
    pub fn return_err(self, message: impl Into<String>) {
        self.push(Err(message.into()));
    }

    fn push(self, response: Result<(), String>) {
        let mut exps = self.shared.expectations.lock().unwrap();
        exps.push_back(Expectation {
            context: self.context,
            response,
        });
    }
}

// =============================================================================
// TYPE TRAIT IMPLEMENTATION
// =============================================================================

struct MockHooks {
    shared: Arc<Shared>,
    field_traits: [FieldTraits; 3],
    copier_config: CopierConfig,
}

impl MockHooks {
    fn call(&self, context: ConversionContext) -> Result<(), HookError> {
        self.shared.calls.lock().unwrap().push(context);
        let expectation = self.shared.expectations.lock().unwrap().pop_front();
        match expectation {
            Some(Expectation { context: expected, response }) if expected == context => {
                response.map_err(HookError::from)
            }
            Some(Expectation { context: expected, .. }) => {
                panic!("Unexpected hook {context}, expected {expected}")
            }
            None => panic!("Unexpected hook {context}, no expectations left"),
        }
    }
}

impl<S, A, B> TypeTrait<S, A, B> for MockHooks {
    fn field_traits(&self, version: Version) -> FieldTraits {
        self.field_traits[version.index()].clone()
    }

    fn copier_config(&self) -> CopierConfig {
        self.copier_config.clone()
    }

    fn copy_helper_stable_to_alpha(&self, _dest: &mut A, _src: &S) -> Result<(), HookError> {
        self.call(ConversionContext::StableToAlpha)
    }

    fn copy_helper_stable_to_beta(&self, _dest: &mut B, _src: &S) -> Result<(), HookError> {
        self.call(ConversionContext::StableToBeta)
    }

    fn copy_helper_alpha_to_stable(&self, _dest: &mut S, _src: &A) -> Result<(), HookError> {
        self.call(ConversionContext::AlphaToStable)
    }

    fn copy_helper_alpha_to_beta(&self, _dest: &mut B, _src: &A) -> Result<(), HookError> {
        self.call(ConversionContext::AlphaToBeta)
    }

    fn copy_helper_beta_to_stable(&self, _dest: &mut S, _src: &B) -> Result<(), HookError> {
        self.call(ConversionContext::BetaToStable)
    }

    fn copy_helper_beta_to_alpha(&self, _dest: &mut A, _src: &B) -> Result<(), HookError> {
        self.call(ConversionContext::BetaToAlpha)
    }
}
