//! # Address
//!
//! A reserved IP address in its three API versions.
//!
//! | Field | stable | beta | alpha |
//! |-------|--------|------|-------|
//! | `Purpose` | yes | yes | renamed `AddressPurpose` |
//! | `Ipv6EndpointType` | - | yes | yes |
//! | `FeatureFlag` | - | - | yes |
//!
//! The copier cannot match a renamed field, so `Purpose` and `AddressPurpose`
//! are excluded from structural copying and bridged by [`AddressTypeTrait`].
//! Fields that exist in fewer versions need no code: the framework records
//! them as missing when they cannot be carried over.

use crate::model::error::ModelError;
use resource_framework::{
    CopierConfig, FieldTraits, HookError, Path, Resource, ResourceError, ResourceId, TypeTrait,
    Version,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::debug;

/// Resource kind used in identifiers and URLs.
pub const ADDRESSES: &str = "addresses";

/// Purposes the Compute API accepts. The empty string means unset.
const PURPOSES: &[&str] = &[
    "",
    "DNS_RESOLVER",
    "GCE_ENDPOINT",
    "IPSEC_INTERCONNECT",
    "NAT_AUTO",
    "PRIVATE_SERVICE_CONNECT",
    "SERVERLESS",
    "SHARED_LOADBALANCER_VIP",
    "VPC_PEERING",
];

/// Stable (v1) representation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct Address {
    pub name: String,
    pub description: String,
    pub address: String,
    pub address_type: String,
    pub ip_version: String,
    pub network_tier: String,
    pub purpose: String,
    pub subnetwork: String,
    pub labels: BTreeMap<String, String>,
    pub self_link: String,
    pub status: String,
    pub null_fields: Vec<String>,
    pub force_send_fields: Vec<String>,
}

/// Beta representation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct BetaAddress {
    pub name: String,
    pub description: String,
    pub address: String,
    pub address_type: String,
    pub ip_version: String,
    pub ipv6_endpoint_type: String,
    pub network_tier: String,
    pub purpose: String,
    pub subnetwork: String,
    pub labels: BTreeMap<String, String>,
    pub self_link: String,
    pub status: String,
    pub null_fields: Vec<String>,
    pub force_send_fields: Vec<String>,
}

/// Alpha representation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct AlphaAddress {
    pub name: String,
    pub description: String,
    pub address: String,
    pub address_purpose: String,
    pub address_type: String,
    pub feature_flag: bool,
    pub ip_version: String,
    pub ipv6_endpoint_type: String,
    pub network_tier: String,
    pub subnetwork: String,
    pub labels: BTreeMap<String, String>,
    pub self_link: String,
    pub status: String,
    pub null_fields: Vec<String>,
    pub force_send_fields: Vec<String>,
}

pub type AddressResource = Resource<Address, AlphaAddress, BetaAddress>;

/// Creates an empty address named by `id`.
pub fn new_address(id: ResourceId) -> Result<AddressResource, ResourceError> {
    AddressResource::new(id, Some(Box::new(AddressTypeTrait)))
}

/// Identifier of a global address.
pub fn global_address_id(project: &str, name: &str) -> ResourceId {
    ResourceId::global(project, ADDRESSES, name)
}

/// Identifier of a regional address.
pub fn regional_address_id(project: &str, region: &str, name: &str) -> ResourceId {
    ResourceId::regional(project, ADDRESSES, region, name)
}

/// Bridges the renamed purpose field and declares server-managed fields.
pub struct AddressTypeTrait;

fn bridge_purpose(purpose: &str) -> Result<String, HookError> {
    if !PURPOSES.contains(&purpose) {
        return Err(Box::new(ModelError::UnknownPurpose(purpose.to_string())));
    }
    Ok(purpose.to_string())
}

impl TypeTrait<Address, AlphaAddress, BetaAddress> for AddressTypeTrait {
    fn field_traits(&self, _version: Version) -> FieldTraits {
        let mut traits = FieldTraits::new();
        traits
            .output_only(Path::root().field("SelfLink"))
            .output_only(Path::root().field("Status"))
            .non_zero_value(Path::root().field("NetworkTier"));
        traits
    }

    fn copier_config(&self) -> CopierConfig {
        CopierConfig::new()
            .exclude_path(Path::root().field("Purpose"))
            .exclude_path(Path::root().field("AddressPurpose"))
    }

    fn copy_helper_stable_to_alpha(&self, dest: &mut AlphaAddress, src: &Address) -> Result<(), HookError> {
        debug!(name = %src.name, purpose = %src.purpose, "Bridging purpose to AddressPurpose");
        dest.address_purpose = bridge_purpose(&src.purpose)?;
        Ok(())
    }

    fn copy_helper_stable_to_beta(&self, dest: &mut BetaAddress, src: &Address) -> Result<(), HookError> {
        dest.purpose = bridge_purpose(&src.purpose)?;
        Ok(())
    }

    fn copy_helper_alpha_to_stable(&self, dest: &mut Address, src: &AlphaAddress) -> Result<(), HookError> {
        debug!(name = %src.name, purpose = %src.address_purpose, "Bridging AddressPurpose to purpose");
        dest.purpose = bridge_purpose(&src.address_purpose)?;
        Ok(())
    }

    fn copy_helper_alpha_to_beta(&self, dest: &mut BetaAddress, src: &AlphaAddress) -> Result<(), HookError> {
        dest.purpose = bridge_purpose(&src.address_purpose)?;
        Ok(())
    }

    fn copy_helper_beta_to_stable(&self, dest: &mut Address, src: &BetaAddress) -> Result<(), HookError> {
        dest.purpose = bridge_purpose(&src.purpose)?;
        Ok(())
    }

    fn copy_helper_beta_to_alpha(&self, dest: &mut AlphaAddress, src: &BetaAddress) -> Result<(), HookError> {
        dest.address_purpose = bridge_purpose(&src.purpose)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schema() {
        AddressResource::check_schema().unwrap();
        new_address(global_address_id("proj", "a")).unwrap().check_field_traits().unwrap();
    }

    #[test]
    fn test_bridge_purpose() {
        assert_eq!(bridge_purpose("VPC_PEERING").unwrap(), "VPC_PEERING");
        assert_eq!(bridge_purpose("").unwrap(), "");
        let err = bridge_purpose("TELEPORT").unwrap_err();
        assert_eq!(err.to_string(), "Unknown address purpose: TELEPORT");
    }
}
