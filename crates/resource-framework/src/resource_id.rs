//! Identity of a cloud resource.

use crate::error::ResourceError;
use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// Where a resource lives.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Scope {
    Global,
    Regional(String),
    Zonal(String),
}

impl Display for Scope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Scope::Global => write!(f, "global"),
            Scope::Regional(region) => write!(f, "regions/{region}"),
            Scope::Zonal(zone) => write!(f, "zones/{zone}"),
        }
    }
}

/// Name and scope of a resource within its project.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Key {
    pub name: String,
    pub scope: Scope,
}

/// Type-safe identifier for a resource: project, resource kind and key.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ResourceId {
    pub project: String,
    /// Resource kind, e.g. `"addresses"`.
    pub resource: String,
    pub key: Key,
}

impl ResourceId {
    pub fn new(project: impl Into<String>, resource: impl Into<String>, key: Key) -> Self {
        Self {
            project: project.into(),
            resource: resource.into(),
            key,
        }
    }

    pub fn global(project: impl Into<String>, resource: impl Into<String>, name: impl Into<String>) -> Self {
        Self::new(project, resource, Key { name: name.into(), scope: Scope::Global })
    }

    pub fn regional(
        project: impl Into<String>,
        resource: impl Into<String>,
        region: impl Into<String>,
        name: impl Into<String>,
    ) -> Self {
        Self::new(
            project,
            resource,
            Key { name: name.into(), scope: Scope::Regional(region.into()) },
        )
    }

    pub fn zonal(
        project: impl Into<String>,
        resource: impl Into<String>,
        zone: impl Into<String>,
        name: impl Into<String>,
    ) -> Self {
        Self::new(
            project,
            resource,
            Key { name: name.into(), scope: Scope::Zonal(zone.into()) },
        )
    }

    pub fn name(&self) -> &str {
        &self.key.name
    }

    /// `projects/{project}/{scope}/{resource}/{name}`, the form resources use
    /// to reference each other.
    pub fn relative_resource_name(&self) -> String {
        format!(
            "projects/{}/{}/{}/{}",
            self.project, self.key.scope, self.resource, self.key.name
        )
    }

    /// Parses a relative resource name or a full URL that contains one, e.g.
    /// `https://compute.googleapis.com/compute/v1/projects/p/regions/r/addresses/a`.
    pub fn parse_resource_url(url: &str) -> Result<Self, ResourceError> {
        let invalid = |reason: &str| ResourceError::InvalidResourceUrl {
            input: url.to_string(),
            reason: reason.to_string(),
        };

        let start = url.find("projects/").ok_or_else(|| invalid("no projects/ segment"))?;
        let parts: Vec<&str> = url[start..].trim_end_matches('/').split('/').collect();
        if parts.iter().any(|p| p.is_empty()) {
            return Err(invalid("empty segment"));
        }

        match parts.as_slice() {
            ["projects", project, "global", resource, name] => {
                Ok(Self::global(*project, *resource, *name))
            }
            ["projects", project, "regions", region, resource, name] => {
                Ok(Self::regional(*project, *resource, *region, *name))
            }
            ["projects", project, "zones", zone, resource, name] => {
                Ok(Self::zonal(*project, *resource, *zone, *name))
            }
            _ => Err(invalid("expected projects/<project>/<scope>/<resource>/<name>")),
        }
    }
}

impl Display for ResourceId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}/{}/{}", self.resource, self.project, self.key.scope, self.key.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        assert_eq!(
            ResourceId::global("proj", "addresses", "foo").to_string(),
            "addresses:proj/global/foo"
        );
        assert_eq!(
            ResourceId::regional("proj", "forwardingRules", "us-central1", "fr").to_string(),
            "forwardingRules:proj/regions/us-central1/fr"
        );
        assert_eq!(
            ResourceId::zonal("proj", "instances", "us-central1-b", "vm").to_string(),
            "instances:proj/zones/us-central1-b/vm"
        );
    }

    #[test]
    fn test_resource_url_round_trip() {
        let ids = [
            ResourceId::global("proj", "addresses", "foo"),
            ResourceId::regional("proj", "addresses", "us-central1", "bar"),
            ResourceId::zonal("proj", "instances", "us-central1-b", "vm"),
        ];
        for id in ids {
            let name = id.relative_resource_name();
            assert_eq!(ResourceId::parse_resource_url(&name).unwrap(), id);
            let url = format!("https://compute.googleapis.com/compute/v1/{name}");
            assert_eq!(ResourceId::parse_resource_url(&url).unwrap(), id);
        }
        assert_eq!(
            ResourceId::regional("p", "addresses", "r", "a").relative_resource_name(),
            "projects/p/regions/r/addresses/a"
        );
    }

    #[test]
    fn test_parse_resource_url_rejects_malformed() {
        for bad in [
            "10.0.0.1",
            "projects/p/global/addresses",
            "projects/p/continents/eu/addresses/a",
            "projects//global/addresses/a",
        ] {
            let err = ResourceId::parse_resource_url(bad).unwrap_err();
            assert!(matches!(err, ResourceError::InvalidResourceUrl { .. }), "{bad}: {err}");
        }
    }
}
