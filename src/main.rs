//! # Resource Recipe Demo
//!
//! Builds an alpha-only address and a stable forwarding rule that references
//! it, freezes both and prints the resulting graph in Graphviz format:
//!
//! ```bash
//! RUST_LOG=info cargo run | dot -Tsvg > graph.svg
//! ```

use resource_framework::tracing::setup_tracing;
use resource_recipe::graph::{graphviz, Graph, Operation, ResourceNode};
use resource_recipe::model::{
    forwarding_rule, new_address, new_forwarding_rule, regional_address_id, regional_forwarding_rule_id,
};
use tracing::{info, warn};

const PROJECT: &str = "my-project";
const REGION: &str = "us-central1";

fn main() -> Result<(), Box<dyn std::error::Error>> {
    setup_tracing();

    info!("Building resources");

    // An address that uses an alpha-only field
    let address_id = regional_address_id(PROJECT, REGION, "vip");
    let mut address = new_address(address_id.clone())?;
    address.access(|x| {
        x.description = "frontend VIP".to_string();
        x.address_type = "EXTERNAL".to_string();
        x.purpose = "SHARED_LOADBALANCER_VIP".to_string();
    })?;
    address.access_alpha(|x| x.feature_flag = true)?;

    if let (_, Some(err)) = address.to_stable() {
        warn!(resource = %address_id, error = %err, "Address cannot be sent as stable");
    }

    // A forwarding rule pointing at the address
    let rule_id = regional_forwarding_rule_id(PROJECT, REGION, "frontend");
    let mut rule = new_forwarding_rule(rule_id)?;
    rule.access(|x| {
        x.ip_address = address_id.relative_resource_name();
        x.ip_protocol = "TCP".to_string();
        x.port_range = "443".to_string();
    })?;

    let frozen_address = address.freeze()?;
    let frozen_rule = rule.freeze()?;

    let mut graph = Graph::new();
    graph.add(ResourceNode::from_frozen(&frozen_address, Operation::Create))?;
    graph.add(
        ResourceNode::from_frozen(&frozen_rule, Operation::Update)
            .with_out_refs(forwarding_rule::out_refs(&frozen_rule)),
    )?;
    graph.validate()?;

    info!(nodes = graph.len(), "Rendering graph");
    print!("{}", graphviz::render(&graph));
    Ok(())
}
