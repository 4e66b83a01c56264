//! # Versioned Resource
//!
//! [`Resource`] holds one logical cloud resource in its three API versions
//! (stable, alpha and beta) and keeps them consistent.
//!
//! ## Mutation Flow
//!
//! ```text
//!   access_alpha(|a| ...)
//!        |
//!        v
//!   check_post_access(alpha traits)          (access only; set skips it)
//!        |
//!        +--> copy alpha -> stable --> copy_helper_alpha_to_stable --> errors[AlphaToStable]
//!        |
//!        +--> copy alpha -> beta   --> copy_helper_alpha_to_beta   --> errors[AlphaToBeta]
//! ```
//!
//! Every destination is processed in context table order. A field the
//! destination cannot hold is recorded in the slot of that context and reported
//! by `to_<version>()` until a later propagation into the same destination from
//! the same source overwrites the slot.
//!
//! ## Choosing a Version
//!
//! [`Resource::implied_version`] picks the single version that can represent
//! everything that was set. [`Resource::freeze`] does the same and then fills
//! the absence bookkeeping of the other two versions so they can be sent
//! without losing explicit nulls or zero values.
//!
//! ## Preconditions
//!
//! [`Resource::check_schema`] must succeed for the concrete `S`, `A`, `B`
//! before any other operation is used. It is an associated function; run it
//! once per type, typically from a unit test.

use crate::copier::{Copier, CopierConfig, DroppedField};
use crate::error::{ConversionError, MissingField, ResourceError};
use crate::frozen::FrozenResource;
use crate::resource_id::ResourceId;
use crate::schema;
use crate::type_trait::{BaseTypeTrait, TypeTrait};
use crate::version::{ConversionContext, Version};
use paste::paste;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fmt::Debug;
use tracing::{debug, info, warn};

/// Bounds every representation type must satisfy.
///
/// The serialized form is the schema the engine reflects over, so field names
/// are the serde names (PascalCase by convention).
pub trait Representation:
    Serialize + DeserializeOwned + Default + Clone + Debug + Send + Sync + 'static
{
}

impl<T> Representation for T where
    T: Serialize + DeserializeOwned + Default + Clone + Debug + Send + Sync + 'static
{
}

/// A cloud resource held in its stable, alpha and beta representations.
pub struct Resource<S, A, B> {
    resource_id: ResourceId,
    type_trait: Box<dyn TypeTrait<S, A, B>>,
    copier_config: CopierConfig,
    pub(crate) stable: S,
    pub(crate) alpha: A,
    pub(crate) beta: B,
    /// Fields dropped by the most recent copy, indexed by `ConversionContext`.
    errors: [Vec<DroppedField>; ConversionContext::COUNT],
}

impl<S, A, B> Debug for Resource<S, A, B>
where
    S: Debug,
    A: Debug,
    B: Debug,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Resource")
            .field("resource_id", &self.resource_id)
            .field("stable", &self.stable)
            .field("alpha", &self.alpha)
            .field("beta", &self.beta)
            .field("errors", &self.errors)
            .finish_non_exhaustive()
    }
}

impl<S, A, B> Resource<S, A, B> {
    pub fn resource_id(&self) -> &ResourceId {
        &self.resource_id
    }
}

impl<S, A, B> Resource<S, A, B>
where
    S: Representation,
    A: Representation,
    B: Representation,
{
    /// Creates a resource with all three representations at their defaults and
    /// `Name` set from `resource_id`.
    ///
    /// `None` selects [`BaseTypeTrait`].
    ///
    /// # Errors
    /// [`ResourceError::Schema`] if a representation declares `Name` with a
    /// non-string type.
    pub fn new(
        resource_id: ResourceId,
        type_trait: Option<Box<dyn TypeTrait<S, A, B>>>,
    ) -> Result<Self, ResourceError> {
        let type_trait = type_trait.unwrap_or_else(|| Box::new(BaseTypeTrait));
        let copier_config = type_trait.copier_config();

        let mut stable = S::default();
        let mut alpha = A::default();
        let mut beta = B::default();
        let name = resource_id.name();
        schema::seed_name(&mut stable, name)?;
        schema::seed_name(&mut alpha, name)?;
        schema::seed_name(&mut beta, name)?;

        debug!(resource = %resource_id, "Created");
        Ok(Self {
            resource_id,
            type_trait,
            copier_config,
            stable,
            alpha,
            beta,
            errors: Default::default(),
        })
    }

    /// Checks the structural contract of `S`, `A` and `B`.
    pub fn check_schema() -> Result<(), ResourceError> {
        schema::check_schema::<S>()?;
        schema::check_schema::<A>()?;
        schema::check_schema::<B>()?;
        Ok(())
    }

    /// Checks that every field trait declared by the type trait names a field
    /// of its version.
    pub fn check_field_traits(&self) -> Result<(), ResourceError> {
        self.type_trait.field_traits(Version::Stable).check_schema::<S>()?;
        self.type_trait.field_traits(Version::Alpha).check_schema::<A>()?;
        self.type_trait.field_traits(Version::Beta).check_schema::<B>()?;
        Ok(())
    }

    /// Everything the other two versions could not represent when they were
    /// last written into `version`, or `None` if nothing was lost.
    pub fn conversion_error(&self, version: Version) -> Option<ConversionError> {
        let missing = ConversionContext::inbound(version)
            .into_iter()
            .flat_map(|context| {
                self.errors[context.index()].iter().map(move |dropped| MissingField {
                    context,
                    path: dropped.path.clone(),
                    value: dropped.value.clone(),
                })
            })
            .collect();
        ConversionError::from_missing(missing)
    }

    /// The version that can represent the resource without loss.
    ///
    /// | stable | alpha | beta | result |
    /// |--------|-------|------|--------|
    /// | ok     | ok    | ok   | Stable |
    /// | err    | ok    | err  | Alpha  |
    /// | err    | err   | ok   | Beta   |
    /// | *      | *     | *    | `AmbiguousVersion` |
    pub fn implied_version(&self) -> Result<Version, ResourceError> {
        let stable = self.conversion_error(Version::Stable);
        let alpha = self.conversion_error(Version::Alpha);
        let beta = self.conversion_error(Version::Beta);

        match (&stable, &alpha, &beta) {
            (None, None, None) => Ok(Version::Stable),
            (Some(_), None, Some(_)) => Ok(Version::Alpha),
            (Some(_), Some(_), None) => Ok(Version::Beta),
            _ => {
                let err = ResourceError::AmbiguousVersion { stable, alpha, beta };
                warn!(resource = %self.resource_id, error = %err, "Version is ambiguous");
                Err(err)
            }
        }
    }

    /// Fixes the canonical version and fills the absence bookkeeping of the
    /// other two.
    ///
    /// The returned [`FrozenResource`] borrows `self`, so the resource cannot be
    /// mutated while it is alive.
    pub fn freeze(&mut self) -> Result<FrozenResource<'_, S, A, B>, ResourceError> {
        let version = self.implied_version()?;
        for other in version.others() {
            let traits = self.type_trait.field_traits(other);
            match other {
                Version::Stable => schema::fill_absence_metadata(&traits, &mut self.stable)?,
                Version::Alpha => schema::fill_absence_metadata(&traits, &mut self.alpha)?,
                Version::Beta => schema::fill_absence_metadata(&traits, &mut self.beta)?,
            }
        }
        info!(resource = %self.resource_id, %version, "Frozen");
        Ok(FrozenResource::new(self, version))
    }
}

/// Generates the mutation and conversion operations of one version.
///
/// `$dest` lists the two other versions in context table order.
macro_rules! version_ops {
    (
        $version:ident, $field:ident: $ty:ident,
        access = $access:ident,
        set = $set:ident,
        into [$(($dest_version:ident, $dest:ident)),+ $(,)?]
    ) => {
        paste! {
            impl<S, A, B> Resource<S, A, B>
            where
                S: Representation,
                A: Representation,
                B: Representation,
            {
                #[doc = "Mutates the " $field " representation with `f`, validates it and"]
                #[doc = "propagates it into the other two versions."]
                ///
                /// # Errors
                /// Field policy violations, copy failures and bridging hook
                /// failures. On a policy violation nothing is propagated.
                pub fn $access<F>(&mut self, f: F) -> Result<(), ResourceError>
                where
                    F: FnOnce(&mut $ty),
                {
                    f(&mut self.$field);
                    self.[<propagate_from_ $field>](true)
                }

                #[doc = "Copies `src` into the " $field " representation and propagates it"]
                #[doc = "into the other two versions without field policy validation."]
                pub fn $set(&mut self, src: &$ty) -> Result<(), ResourceError> {
                    // Same type on both sides: nothing is excluded.
                    let whole = CopierConfig::new();
                    Copier::new(&whole).copy(&mut self.$field, src)?;
                    self.[<propagate_from_ $field>](false)
                }

                #[doc = "The " $field " representation and the fields it could not"]
                #[doc = "receive from the other versions."]
                pub fn [<to_ $field>](&self) -> (&$ty, Option<ConversionError>) {
                    (&self.$field, self.conversion_error(Version::$version))
                }

                fn [<propagate_from_ $field>](&mut self, validate: bool) -> Result<(), ResourceError> {
                    let source = Version::$version;
                    debug!(resource = %self.resource_id, %source, validate, "Propagating");

                    if validate {
                        let traits = self.type_trait.field_traits(source);
                        if let Err(e) = schema::check_post_access(&traits, source, &self.$field) {
                            warn!(resource = %self.resource_id, %source, error = %e, "Validation failed");
                            return Err(e);
                        }
                    }

                    $(
                        let context = ConversionContext::[<$version To $dest_version>];
                        let mut copier = Copier::new(&self.copier_config);
                        copier.copy(&mut self.$dest, &self.$field)?;
                        if let Err(e) = self.type_trait.[<copy_helper_ $field _to_ $dest>](&mut self.$dest, &self.$field) {
                            warn!(resource = %self.resource_id, %context, error = %e, "Bridging hook failed");
                            return Err(ResourceError::Hook { context, source: e });
                        }
                        let dropped = copier.into_dropped();
                        debug!(resource = %self.resource_id, %context, dropped = dropped.len(), "Converted");
                        self.errors[context.index()] = dropped;
                    )+

                    Ok(())
                }
            }
        }
    };
}

version_ops!(Stable, stable: S, access = access, set = set, into [(Alpha, alpha), (Beta, beta)]);
version_ops!(Alpha, alpha: A, access = access_alpha, set = set_alpha, into [(Stable, stable), (Beta, beta)]);
version_ops!(Beta, beta: B, access = access_beta, set = set_beta, into [(Stable, stable), (Alpha, alpha)]);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::path::Path;
    use crate::resource_id::ResourceId;
    use serde::Deserialize;
    use serde_json::json;

    #[derive(Debug, Clone, Default, Serialize, Deserialize)]
    #[serde(rename_all = "PascalCase", default)]
    struct Stable {
        name: String,
        description: String,
        null_fields: Vec<String>,
        force_send_fields: Vec<String>,
    }

    #[derive(Debug, Clone, Default, Serialize, Deserialize)]
    #[serde(rename_all = "PascalCase", default)]
    struct Alpha {
        name: String,
        description: String,
        feature_flag: bool,
        null_fields: Vec<String>,
        force_send_fields: Vec<String>,
    }

    #[derive(Debug, Clone, Default, Serialize, Deserialize)]
    #[serde(rename_all = "PascalCase", default)]
    struct Beta {
        name: String,
        description: String,
        null_fields: Vec<String>,
        force_send_fields: Vec<String>,
    }

    type TestResource = Resource<Stable, Alpha, Beta>;

    fn new_resource() -> TestResource {
        TestResource::new(ResourceId::global("proj", "addresses", "foo"), None).unwrap()
    }

    #[test]
    fn test_schema() {
        TestResource::check_schema().unwrap();
        new_resource().check_field_traits().unwrap();
    }

    #[test]
    fn test_new_seeds_name() {
        let r = new_resource();
        assert_eq!(r.to_stable().0.name, "foo");
        assert_eq!(r.to_alpha().0.name, "foo");
        assert_eq!(r.to_beta().0.name, "foo");
        assert_eq!(r.implied_version().unwrap(), Version::Stable);
    }

    #[test]
    fn test_access_propagates() {
        let mut r = new_resource();
        r.access(|x| x.description = "hello".to_string()).unwrap();

        assert_eq!(r.to_alpha().0.description, "hello");
        assert_eq!(r.to_beta().0.description, "hello");
        for v in Version::ALL {
            assert!(r.conversion_error(v).is_none(), "{v}");
        }
    }

    #[test]
    fn test_alpha_only_field() {
        let mut r = new_resource();
        r.access_alpha(|x| x.feature_flag = true).unwrap();

        let (_, err) = r.to_stable();
        let err = err.unwrap();
        assert_eq!(err.missing_fields.len(), 1);
        assert_eq!(err.missing_fields[0].context, ConversionContext::AlphaToStable);
        assert_eq!(err.missing_fields[0].path, Path::root().field("FeatureFlag"));
        assert_eq!(err.missing_fields[0].value, json!(true));

        let (_, err) = r.to_beta();
        assert_eq!(err.unwrap().missing_fields[0].context, ConversionContext::AlphaToBeta);
        assert!(r.to_alpha().1.is_none());
        assert_eq!(r.implied_version().unwrap(), Version::Alpha);
    }

    #[test]
    fn test_later_access_clears_slot() {
        let mut r = new_resource();
        r.access_alpha(|x| x.feature_flag = true).unwrap();
        r.access_alpha(|x| x.feature_flag = false).unwrap();
        assert_eq!(r.implied_version().unwrap(), Version::Stable);
    }

    #[test]
    fn test_set_copies_value() {
        let mut r = new_resource();
        let beta = Beta {
            name: "foo".to_string(),
            description: "from beta".to_string(),
            ..Default::default()
        };
        r.set_beta(&beta).unwrap();
        assert_eq!(r.to_stable().0.description, "from beta");
        assert_eq!(r.to_alpha().0.description, "from beta");
    }

    #[test]
    fn test_freeze_tags_version() {
        let mut r = new_resource();
        r.access_alpha(|x| x.feature_flag = true).unwrap();
        let frozen = r.freeze().unwrap();
        assert_eq!(frozen.version(), Version::Alpha);
        assert!(frozen.alpha().feature_flag);
    }
}
