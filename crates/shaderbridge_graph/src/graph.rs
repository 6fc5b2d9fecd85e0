// SPDX-License-Identifier: MIT OR Apache-2.0
//! Shading network: nodes, links and the group interface labels.

use crate::connection::Link;
use crate::hash::ContentHash;
use crate::node::{NodeRole, ShaderNode};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// A named, directed acyclic shading network
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShaderNetwork {
    /// Network name (material or group name)
    pub name: String,
    /// Nodes by ID
    nodes: IndexMap<String, ShaderNode>,
    /// Links in document order
    links: Vec<Link>,
    /// Group interface: socket identifier to display label
    socket_labels: IndexMap<String, String>,
}

impl ShaderNetwork {
    /// Create a new empty network
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            nodes: IndexMap::new(),
            links: Vec::new(),
            socket_labels: IndexMap::new(),
        }
    }

    /// Add a node, replacing any node with the same ID
    pub fn add_node(&mut self, node: ShaderNode) {
        self.nodes.insert(node.id.clone(), node);
    }

    /// Add a link between two existing nodes
    pub fn add_link(&mut self, link: Link) -> Result<(), NetworkError> {
        if !self.nodes.contains_key(&link.from_node) {
            return Err(NetworkError::UnknownNode(link.from_node));
        }
        if !self.nodes.contains_key(&link.to_node) {
            return Err(NetworkError::UnknownNode(link.to_node));
        }
        if link.from_node == link.to_node {
            return Err(NetworkError::SelfLoop(link.from_node));
        }
        self.links.push(link);
        Ok(())
    }

    /// Record the display label of a group interface socket
    pub fn set_socket_label(&mut self, identifier: impl Into<String>, label: impl Into<String>) {
        self.socket_labels.insert(identifier.into(), label.into());
    }

    /// Display label of a socket identifier, or the identifier itself
    pub fn socket_label<'a>(&'a self, identifier: &'a str) -> &'a str {
        self.socket_labels
            .get(identifier)
            .map_or(identifier, String::as_str)
    }

    /// All recorded interface labels
    pub fn socket_labels(&self) -> &IndexMap<String, String> {
        &self.socket_labels
    }

    /// Get a node by ID
    pub fn node(&self, node_id: &str) -> Option<&ShaderNode> {
        self.nodes.get(node_id)
    }

    /// Get all nodes
    pub fn nodes(&self) -> impl Iterator<Item = &ShaderNode> {
        self.nodes.values()
    }

    /// Get the number of nodes
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Get all links in order
    pub fn links(&self) -> &[Link] {
        &self.links
    }

    /// Get the number of links
    pub fn link_count(&self) -> usize {
        self.links.len()
    }

    /// Links ending at a node
    pub fn links_to<'a>(&'a self, node_id: &'a str) -> impl Iterator<Item = &'a Link> + 'a {
        self.links.iter().filter(move |l| l.to_node == node_id)
    }

    /// Role of a node, `None` if the node does not exist
    pub fn role_of(&self, node_id: &str) -> Option<NodeRole> {
        self.nodes.get(node_id).map(|n| n.role)
    }

    /// Structural content hash of this network
    pub fn content_hash(&self) -> ContentHash {
        ContentHash::of_network(self)
    }

    /// Check the link invariants, including acyclicity
    pub fn validate(&self) -> Result<(), NetworkError> {
        for link in &self.links {
            for id in [&link.from_node, &link.to_node] {
                if !self.nodes.contains_key(id) {
                    return Err(NetworkError::UnknownNode(id.clone()));
                }
            }
            if link.from_node == link.to_node {
                return Err(NetworkError::SelfLoop(link.from_node.clone()));
            }
        }
        self.topological_order().map(|_| ())
    }

    /// Get node IDs in dependency order (upstream first)
    pub fn topological_order(&self) -> Result<Vec<&str>, NetworkError> {
        let mut visited = HashSet::new();
        let mut temp_mark = HashSet::new();
        let mut order = Vec::new();

        for node_id in self.nodes.keys() {
            if !visited.contains(node_id.as_str()) {
                self.visit(node_id, &mut visited, &mut temp_mark, &mut order)?;
            }
        }

        Ok(order)
    }

    fn visit<'a>(
        &'a self,
        node_id: &'a str,
        visited: &mut HashSet<&'a str>,
        temp_mark: &mut HashSet<&'a str>,
        order: &mut Vec<&'a str>,
    ) -> Result<(), NetworkError> {
        if temp_mark.contains(node_id) {
            return Err(NetworkError::Cycle(self.name.clone()));
        }
        if visited.contains(node_id) {
            return Ok(());
        }

        temp_mark.insert(node_id);

        // Visit all nodes that this node depends on
        for link in self.links_to(node_id) {
            self.visit(&link.from_node, visited, temp_mark, order)?;
        }

        temp_mark.remove(node_id);
        visited.insert(node_id);
        order.push(node_id);

        Ok(())
    }
}

impl Default for ShaderNetwork {
    fn default() -> Self {
        Self::new("Untitled")
    }
}

/// Error when a network violates its structural invariants
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NetworkError {
    /// Link references a node that is not in the network
    #[error("Link references unknown node: {0}")]
    UnknownNode(String),

    /// Link connects a node to itself
    #[error("Self-loop on node: {0}")]
    SelfLoop(String),

    /// Links form a cycle
    #[error("Network contains a cycle: {0}")]
    Cycle(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chain() -> ShaderNetwork {
        let mut net = ShaderNetwork::new("Chain");
        net.add_node(ShaderNode::new("Output", "ShaderNodeOutputMaterial", "material_output"));
        net.add_node(ShaderNode::new("B", "ShaderNodeBsdfDiffuse", "diffuse_bsdf"));
        net.add_node(ShaderNode::new("A", "ShaderNodeTexNoise", "noise_texture"));
        net.add_link(Link::new("B", "BSDF", "Output", "Surface")).unwrap();
        net.add_link(Link::new("A", "Color", "B", "Color")).unwrap();
        net
    }

    #[test]
    fn test_topological_order_puts_upstream_first() {
        let net = chain();
        let order = net.topological_order().unwrap();
        let pos = |id: &str| order.iter().position(|n| *n == id).unwrap();
        assert!(pos("A") < pos("B"));
        assert!(pos("B") < pos("Output"));
    }

    #[test]
    fn test_link_validation() {
        let mut net = chain();
        assert_eq!(
            net.add_link(Link::new("Missing", "Out", "B", "Color")),
            Err(NetworkError::UnknownNode("Missing".to_string()))
        );
        assert_eq!(
            net.add_link(Link::new("B", "BSDF", "B", "Color")),
            Err(NetworkError::SelfLoop("B".to_string()))
        );
        assert_eq!(net.link_count(), 2);
    }

    #[test]
    fn test_cycle_detected() {
        let mut net = chain();
        net.add_link(Link::new("B", "BSDF", "A", "Vector")).unwrap();
        assert!(matches!(net.validate(), Err(NetworkError::Cycle(_))));
    }

    #[test]
    fn test_socket_labels_fall_back_to_identifier() {
        let mut net = ShaderNetwork::new("Group");
        net.set_socket_label("Socket_1", "Base Tint");
        assert_eq!(net.socket_label("Socket_1"), "Base Tint");
        assert_eq!(net.socket_label("Socket_2"), "Socket_2");
    }
}
