use tracing::info;

use crate::address::NodeAddress;
use crate::error::{RecycleError, Result};
use crate::gateway::PoolGateway;
use crate::types::Metadata;

/// Register a node that was provisioned outside the IaaS templates.
///
/// The node is added as `scheme://host:port`. When `like` names an existing
/// node, its metadata is copied onto the new one; the pool itself always
/// comes from `pool`.
pub fn register_node(
    gateway: &dyn PoolGateway,
    pool: &str,
    host: &str,
    scheme: &str,
    port: u16,
    like: Option<&str>,
) -> Result<NodeAddress> {
    let raw = format!("{scheme}://{host}:{port}");
    let address = NodeAddress::parse(&raw)
        .ok_or_else(|| RecycleError::Registration(format!("invalid node address {raw}")))?;

    let metadata = match like {
        Some(existing) => {
            let mut metadata = gateway.node_metadata(existing)?.ok_or_else(|| {
                RecycleError::Registration(format!("node {existing} not found"))
            })?;
            metadata.remove("pool");
            metadata
        }
        None => Metadata::new(),
    };

    gateway.add_node(pool, &address, &metadata)?;
    info!(pool, node = %address, "node registered");
    Ok(address)
}
