//! Point-in-time, read-only view of a [`Resource`] with its canonical version
//! fixed.

use crate::resource::Resource;
use crate::resource_id::ResourceId;
use crate::version::Version;
use std::fmt::Debug;

/// The canonical representation of a frozen resource.
#[derive(Debug)]
pub enum Canonical<'a, S, A, B> {
    Stable(&'a S),
    Alpha(&'a A),
    Beta(&'a B),
}

/// A resource that may no longer change.
///
/// Obtained from [`Resource::freeze`]. It borrows the resource, so no access
/// or set operation can run while it is alive.
pub struct FrozenResource<'a, S, A, B> {
    resource: &'a Resource<S, A, B>,
    version: Version,
}

impl<'a, S, A, B> FrozenResource<'a, S, A, B> {
    pub(crate) fn new(resource: &'a Resource<S, A, B>, version: Version) -> Self {
        Self { resource, version }
    }

    /// The version implied at freeze time.
    pub fn version(&self) -> Version {
        self.version
    }

    pub fn stable(&self) -> &'a S {
        &self.resource.stable
    }

    pub fn alpha(&self) -> &'a A {
        &self.resource.alpha
    }

    pub fn beta(&self) -> &'a B {
        &self.resource.beta
    }

    pub fn canonical(&self) -> Canonical<'a, S, A, B> {
        match self.version {
            Version::Stable => Canonical::Stable(self.stable()),
            Version::Alpha => Canonical::Alpha(self.alpha()),
            Version::Beta => Canonical::Beta(self.beta()),
        }
    }

    pub fn resource_id(&self) -> &'a ResourceId {
        self.resource.resource_id()
    }
}

impl<S, A, B> Clone for FrozenResource<'_, S, A, B> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<S, A, B> Copy for FrozenResource<'_, S, A, B> {}

impl<S: Debug, A: Debug, B: Debug> Debug for FrozenResource<'_, S, A, B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FrozenResource")
            .field("version", &self.version)
            .field("resource", self.resource)
            .finish()
    }
}
