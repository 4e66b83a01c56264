use pretty_assertions::assert_eq;
use resource_framework::{ConversionContext, MissingField, Path, ResourceError, Version};
use resource_recipe::model::{global_address_id, new_address, Address, ModelError};
use serde_json::json;

/// The scenario the framework exists for: a field only alpha has.
#[test]
fn test_alpha_feature_flag_end_to_end() {
    let mut address = new_address(global_address_id("my-project", "foo")).unwrap();

    // 1. Construction seeds the name everywhere
    assert_eq!(address.to_stable().0.name, "foo");
    assert_eq!(address.to_alpha().0.name, "foo");
    assert_eq!(address.to_beta().0.name, "foo");

    // 2. Set the alpha-only field
    address.access_alpha(|x| x.feature_flag = true).unwrap();

    // 3. Stable reports exactly one missing field
    let (_, err) = address.to_stable();
    assert_eq!(
        err.expect("stable should report the flag").missing_fields,
        vec![MissingField {
            context: ConversionContext::AlphaToStable,
            path: Path::root().field("FeatureFlag"),
            value: json!(true),
        }]
    );
    assert!(address.to_alpha().1.is_none());

    // 4. Alpha is the only lossless version
    assert_eq!(address.implied_version().unwrap(), Version::Alpha);
    let frozen = address.freeze().unwrap();
    assert_eq!(frozen.version(), Version::Alpha);
    assert!(frozen.alpha().feature_flag);
}

#[test]
fn test_renamed_purpose_is_bridged() {
    let mut address = new_address(global_address_id("my-project", "foo")).unwrap();

    // Stable -> alpha renames the field, beta keeps the name
    address.access(|x| x.purpose = "VPC_PEERING".to_string()).unwrap();
    assert_eq!(address.to_alpha().0.address_purpose, "VPC_PEERING");
    assert_eq!(address.to_beta().0.purpose, "VPC_PEERING");

    // The excluded fields are never reported as missing
    for v in Version::ALL {
        assert!(address.conversion_error(v).is_none(), "{v}");
    }

    // Alpha -> stable and beta renames it back
    address.access_alpha(|x| x.address_purpose = "GCE_ENDPOINT".to_string()).unwrap();
    assert_eq!(address.to_stable().0.purpose, "GCE_ENDPOINT");
    assert_eq!(address.to_beta().0.purpose, "GCE_ENDPOINT");
    assert_eq!(address.implied_version().unwrap(), Version::Stable);
}

#[test]
fn test_unknown_purpose_fails_in_hook() {
    let mut address = new_address(global_address_id("my-project", "foo")).unwrap();

    let err = address.access(|x| x.purpose = "TELEPORT".to_string()).unwrap_err();
    let ResourceError::Hook { context, source } = &err else {
        panic!("expected a hook error, got {err}");
    };
    assert_eq!(*context, ConversionContext::StableToAlpha);
    assert_eq!(
        source.downcast_ref::<ModelError>(),
        Some(&ModelError::UnknownPurpose("TELEPORT".to_string()))
    );
    assert_eq!(
        err.to_string(),
        "bridging hook stable->alpha failed: Unknown address purpose: TELEPORT"
    );
}

#[test]
fn test_server_managed_fields() {
    let mut address = new_address(global_address_id("my-project", "foo")).unwrap();

    // 1. Callers may not set output-only fields
    let err = address.access(|x| x.status = "RESERVED".to_string()).unwrap_err();
    assert!(
        matches!(&err, ResourceError::FieldPolicy { path, .. } if path.to_string() == ".Status"),
        "{err}"
    );

    // 2. A server response is loaded with set, which skips field policy
    let response = Address {
        name: "foo".to_string(),
        address: "34.1.2.3".to_string(),
        status: "RESERVED".to_string(),
        self_link: "https://compute.googleapis.com/compute/v1/projects/my-project/global/addresses/foo"
            .to_string(),
        ..Default::default()
    };
    address.set(&response).unwrap();
    assert_eq!(address.to_alpha().0.status, "RESERVED");
    assert_eq!(address.to_beta().0.address, "34.1.2.3");
}

#[test]
fn test_set_keeps_renamed_purpose() {
    let mut address = new_address(global_address_id("my-project", "foo")).unwrap();

    let response = Address {
        name: "foo".to_string(),
        purpose: "VPC_PEERING".to_string(),
        ..Default::default()
    };
    address.set(&response).unwrap();

    assert_eq!(address.to_stable().0.purpose, "VPC_PEERING");
    assert_eq!(address.to_alpha().0.address_purpose, "VPC_PEERING");
    assert_eq!(address.to_beta().0.purpose, "VPC_PEERING");
    assert_eq!(address.implied_version().unwrap(), Version::Stable);
}

#[test]
fn test_field_shared_by_alpha_and_beta_is_ambiguous() {
    let mut address = new_address(global_address_id("my-project", "foo")).unwrap();
    address.access_beta(|x| x.ipv6_endpoint_type = "VM".to_string()).unwrap();

    assert_eq!(address.to_alpha().0.ipv6_endpoint_type, "VM");
    let (_, err) = address.to_stable();
    assert_eq!(err.unwrap().missing_fields[0].path.to_string(), ".Ipv6EndpointType");

    // Neither alpha nor beta alone is singled out
    assert!(matches!(
        address.implied_version(),
        Err(ResourceError::AmbiguousVersion { alpha: None, beta: None, .. })
    ));
}

#[test]
fn test_freeze_records_zero_values_for_other_versions() {
    let mut address = new_address(global_address_id("my-project", "foo")).unwrap();
    address
        .access(|x| {
            x.description = "frontend".to_string();
            x.address = "34.1.2.3".to_string();
        })
        .unwrap();

    let frozen = address.freeze().unwrap();
    assert_eq!(frozen.version(), Version::Stable);
    assert!(frozen.stable().force_send_fields.is_empty());

    // Output-only and non-zero fields are never force-sent
    assert_eq!(
        frozen.alpha().force_send_fields,
        vec![
            "AddressPurpose",
            "AddressType",
            "FeatureFlag",
            "IpVersion",
            "Ipv6EndpointType",
            "Subnetwork"
        ]
    );
    assert_eq!(
        frozen.beta().force_send_fields,
        vec!["AddressType", "IpVersion", "Ipv6EndpointType", "Purpose", "Subnetwork"]
    );
}
