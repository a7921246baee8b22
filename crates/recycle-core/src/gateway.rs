//! Capability contract over the pool-management backend.
//!
//! The recycle workflow never talks HTTP itself: everything it needs from
//! the backend goes through [`PoolGateway`]. `tsuru-client` provides the
//! production implementation; tests use an in-memory fake.

use crate::address::NodeAddress;
use crate::error::Result;
use crate::types::{Machine, MachineMetadata, Metadata, Node, Template};

/// Lazily produced migration progress, one backend message per item.
///
/// Produced once per `move_containers` call and consumed exactly once. An
/// `Err` item means the stream broke mid-way; the consumer stops there.
pub type ProgressStream<'a> = Box<dyn Iterator<Item = Result<String>> + 'a>;

pub trait PoolGateway {
    /// Nodes currently registered to `pool`, in backend order.
    fn list_nodes(&self, pool: &str) -> Result<Vec<Node>>;

    /// Every machine known to the infrastructure provider.
    fn list_machines(&self) -> Result<Vec<Machine>>;

    /// Templates whose recipe targets `pool`, in backend order.
    fn list_templates(&self, pool: &str) -> Result<Vec<Template>>;

    /// Provision and register a node from `template`; returns its address.
    fn create_node(&self, pool: &str, template: &Template) -> Result<String>;

    /// Register an externally provisioned node.
    fn add_node(&self, pool: &str, address: &NodeAddress, metadata: &Metadata) -> Result<()>;

    /// Remove `address` from its pool, leaving the backing machine alone.
    fn deregister_node(&self, address: &str) -> Result<()>;

    /// Delete the machine backing `address` from the infrastructure provider.
    ///
    /// No matching machine is a `MachineDecommission` error.
    fn decommission_machine(&self, address: &str) -> Result<()>;

    /// Start moving every container from `from` to `to`.
    ///
    /// Migration failures are reported through the content of the stream,
    /// not through the returned `Result`; an `Err` here means the request
    /// could not be issued at all.
    fn move_containers(&self, from: &NodeAddress, to: &NodeAddress) -> Result<ProgressStream<'_>>;

    fn node_metadata(&self, address: &str) -> Result<Option<Metadata>>;

    fn machine_metadata(&self, address: &str) -> Result<Option<MachineMetadata>>;
}
