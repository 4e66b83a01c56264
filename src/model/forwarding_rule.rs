//! # Forwarding Rule
//!
//! A forwarding rule sends traffic for an IP address to a target. Only the
//! alpha and beta APIs know about `SourceIpRanges`, and only alpha has
//! `AllowPscGlobalAccess`. Every other field matches by name, so the type trait
//! declares field traits and nothing else.
//!
//! `IPAddress` and `Target` may reference other resources by URL; see
//! [`out_refs`].

use crate::graph::OutRef;
use crate::model::error::ModelError;
use resource_framework::{
    Canonical, FieldTraits, FrozenResource, Path, Resource, ResourceError, ResourceId, TypeTrait,
    Version,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub const FORWARDING_RULES: &str = "forwardingRules";

/// Stable (v1) representation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct ForwardingRule {
    pub name: String,
    pub description: String,
    #[serde(rename = "IPAddress")]
    pub ip_address: String,
    #[serde(rename = "IPProtocol")]
    pub ip_protocol: String,
    pub load_balancing_scheme: String,
    pub network: String,
    pub port_range: String,
    pub ports: Vec<String>,
    pub target: String,
    pub labels: BTreeMap<String, String>,
    pub self_link: String,
    pub null_fields: Vec<String>,
    pub force_send_fields: Vec<String>,
}

/// Beta representation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct BetaForwardingRule {
    pub name: String,
    pub description: String,
    #[serde(rename = "IPAddress")]
    pub ip_address: String,
    #[serde(rename = "IPProtocol")]
    pub ip_protocol: String,
    pub load_balancing_scheme: String,
    pub network: String,
    pub port_range: String,
    pub ports: Vec<String>,
    pub source_ip_ranges: Vec<String>,
    pub target: String,
    pub labels: BTreeMap<String, String>,
    pub self_link: String,
    pub null_fields: Vec<String>,
    pub force_send_fields: Vec<String>,
}

/// Alpha representation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct AlphaForwardingRule {
    pub name: String,
    pub description: String,
    pub allow_psc_global_access: bool,
    #[serde(rename = "IPAddress")]
    pub ip_address: String,
    #[serde(rename = "IPProtocol")]
    pub ip_protocol: String,
    pub load_balancing_scheme: String,
    pub network: String,
    pub port_range: String,
    pub ports: Vec<String>,
    pub source_ip_ranges: Vec<String>,
    pub target: String,
    pub labels: BTreeMap<String, String>,
    pub self_link: String,
    pub null_fields: Vec<String>,
    pub force_send_fields: Vec<String>,
}

pub type ForwardingRuleResource = Resource<ForwardingRule, AlphaForwardingRule, BetaForwardingRule>;

pub fn new_forwarding_rule(id: ResourceId) -> Result<ForwardingRuleResource, ResourceError> {
    ForwardingRuleResource::new(id, Some(Box::new(ForwardingRuleTypeTrait)))
}

pub fn regional_forwarding_rule_id(project: &str, region: &str, name: &str) -> ResourceId {
    ResourceId::regional(project, FORWARDING_RULES, region, name)
}

pub struct ForwardingRuleTypeTrait;

impl TypeTrait<ForwardingRule, AlphaForwardingRule, BetaForwardingRule> for ForwardingRuleTypeTrait {
    fn field_traits(&self, _version: Version) -> FieldTraits {
        let mut traits = FieldTraits::new();
        traits.output_only(Path::root().field("SelfLink"));
        traits
    }
}

/// References held by the canonical version of a frozen forwarding rule.
///
/// `IPAddress` is a reference only when it names a resource; a literal IP is
/// not. `Target` must be a resource URL when set.
pub fn out_refs(
    frozen: &FrozenResource<'_, ForwardingRule, AlphaForwardingRule, BetaForwardingRule>,
) -> Result<Vec<OutRef>, ModelError> {
    let (ip_address, target) = match frozen.canonical() {
        Canonical::Stable(x) => (&x.ip_address, &x.target),
        Canonical::Alpha(x) => (&x.ip_address, &x.target),
        Canonical::Beta(x) => (&x.ip_address, &x.target),
    };

    let mut refs = Vec::new();
    if ip_address.contains("projects/") {
        refs.push(reference("IPAddress", ip_address)?);
    }
    if !target.is_empty() {
        refs.push(reference("Target", target)?);
    }
    Ok(refs)
}

fn reference(field: &'static str, url: &str) -> Result<OutRef, ModelError> {
    let to = ResourceId::parse_resource_url(url).map_err(|e| ModelError::InvalidReference {
        field,
        reason: e.to_string(),
    })?;
    Ok(OutRef {
        path: Path::root().field(field),
        to,
    })
}
