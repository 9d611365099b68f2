//! Captured fabric state, replayable as a [`Fabric`] collaborator.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use zen_atl::fabric::access::Fabric;
use zen_atl::{AccessError, AddressMap, FabricConfig};

/// One captured configuration-register word.
///
/// `instance` is `None` for broadcast reads and names the channel instance
/// for instance-scoped reads.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegisterWord {
    /// Register function.
    pub func: u8,
    /// Register offset.
    pub reg: u16,
    /// Channel instance the word was read from, if instance-scoped.
    pub instance: Option<u8>,
    /// Captured value.
    pub value: u32,
}

/// Captured state of one fabric node.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeSnapshot {
    /// Internal node identifier.
    pub node_id: u16,
    /// Socket this node sits in.
    pub socket_id: u8,
    /// Die within the socket.
    pub die_id: u8,
    /// Address maps keyed by channel instance.
    pub maps: BTreeMap<u8, AddressMap>,
    /// Captured register words.
    pub registers: Vec<RegisterWord>,
}

/// A replayable capture of the whole fabric: configuration plus per-node
/// maps and registers.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FabricSnapshot {
    /// Fabric configuration discovered at capture time.
    pub config: FabricConfig,
    /// Captured nodes.
    pub nodes: Vec<NodeSnapshot>,
}

impl FabricSnapshot {
    /// Parses a snapshot from its JSON representation.
    ///
    /// # Errors
    ///
    /// Returns the underlying parse error for malformed JSON or a capture
    /// that does not match the snapshot schema.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    fn node(&self, node_id: u16) -> Result<&NodeSnapshot, AccessError> {
        self.nodes
            .iter()
            .find(|node| node.node_id == node_id)
            .ok_or_else(|| AccessError::new(format!("node {node_id} not captured")))
    }

    fn register(
        &self,
        node_id: u16,
        func: u8,
        reg: u16,
        instance: Option<u8>,
    ) -> Result<u32, AccessError> {
        self.node(node_id)?
            .registers
            .iter()
            .find(|word| word.func == func && word.reg == reg && word.instance == instance)
            .map(|word| word.value)
            .ok_or_else(|| {
                AccessError::new(format!(
                    "register {func}:{reg:#x} (instance {instance:?}) not captured on node {node_id}"
                ))
            })
    }
}

impl Fabric for FabricSnapshot {
    fn resolve_node(&self, socket_id: u8, die_id: u8) -> Result<u16, AccessError> {
        self.nodes
            .iter()
            .find(|node| node.socket_id == socket_id && node.die_id == die_id)
            .map(|node| node.node_id)
            .ok_or_else(|| {
                AccessError::new(format!("no node captured for socket {socket_id} die {die_id}"))
            })
    }

    fn address_map(&self, node_id: u16, inst_id: u8) -> Result<AddressMap, AccessError> {
        self.node(node_id)?
            .maps
            .get(&inst_id)
            .cloned()
            .ok_or_else(|| {
                AccessError::new(format!(
                    "no address map captured for node {node_id} instance {inst_id}"
                ))
            })
    }

    fn read_instance(
        &self,
        node_id: u16,
        func: u8,
        reg: u16,
        inst_id: u8,
    ) -> Result<u32, AccessError> {
        self.register(node_id, func, reg, Some(inst_id))
    }

    fn read_broadcast(&self, node_id: u16, func: u8, reg: u16) -> Result<u32, AccessError> {
        self.register(node_id, func, reg, None)
    }
}
