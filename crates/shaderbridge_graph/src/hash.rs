// SPDX-License-Identifier: MIT OR Apache-2.0
//! Structural content hashing of shading networks.
//!
//! The hash covers node types, parameters, roles, nested groups, group
//! interface labels and link topology. Nodes are visited in ID order and
//! links in sorted order, so reordering either in the input does not change
//! the hash. Editor locations and the network name are not part of it.
//! Every field is length-prefixed before it is fed to SHA-256.

use crate::graph::ShaderNetwork;
use crate::node::{NodeRole, ShaderNode};
use crate::value::{Scalar, Value};
use serde::{Serialize, Serializer};
use sha2::{Digest, Sha256};
use std::fmt;

/// SHA-256 fingerprint of a network's structure
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ContentHash([u8; 32]);

impl ContentHash {
    /// Hash a network
    pub fn of_network(network: &ShaderNetwork) -> Self {
        let mut hasher = Sha256::new();
        write_network(&mut hasher, network);
        Self(hasher.finalize().into())
    }

    /// Raw digest bytes
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// First eight hex digits, for log lines and generated names
    pub fn short(&self) -> String {
        self.to_string()[..8].to_string()
    }
}

impl fmt::Display for ContentHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for byte in &self.0 {
            write!(f, "{byte:02x}")?;
        }
        Ok(())
    }
}

impl fmt::Debug for ContentHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ContentHash({})", self.short())
    }
}

impl Serialize for ContentHash {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

fn write_len(hasher: &mut Sha256, len: usize) {
    hasher.update((len as u64).to_le_bytes());
}

fn write_str(hasher: &mut Sha256, s: &str) {
    write_len(hasher, s.len());
    hasher.update(s.as_bytes());
}

fn write_f32(hasher: &mut Sha256, f: f32) {
    hasher.update(f.to_bits().to_le_bytes());
}

fn write_network(hasher: &mut Sha256, network: &ShaderNetwork) {
    let mut nodes: Vec<&ShaderNode> = network.nodes().collect();
    nodes.sort_by(|a, b| a.id.cmp(&b.id));
    write_len(hasher, nodes.len());
    for node in nodes {
        write_node(hasher, node);
    }

    let mut links: Vec<_> = network.links().iter().collect();
    links.sort();
    write_len(hasher, links.len());
    for link in links {
        write_str(hasher, &link.from_node);
        write_str(hasher, &link.from_socket);
        write_str(hasher, &link.to_node);
        write_str(hasher, &link.to_socket);
    }

    let mut labels: Vec<_> = network.socket_labels().iter().collect();
    labels.sort();
    write_len(hasher, labels.len());
    for (identifier, label) in labels {
        write_str(hasher, identifier);
        write_str(hasher, label);
    }
}

fn write_node(hasher: &mut Sha256, node: &ShaderNode) {
    write_str(hasher, &node.id);
    write_str(hasher, &node.source_type);
    write_str(hasher, &node.resolved_type);
    hasher.update([match node.role {
        NodeRole::Regular => 0u8,
        NodeRole::Output => 1,
        NodeRole::GroupInput => 2,
        NodeRole::GroupOutput => 3,
    }]);

    let mut params: Vec<_> = node.parameters.iter().collect();
    params.sort_by(|a, b| a.0.cmp(b.0));
    write_len(hasher, params.len());
    for (name, value) in params {
        write_str(hasher, name);
        write_value(hasher, value);
    }

    match &node.nested {
        Some(nested) => {
            hasher.update([1u8]);
            write_network(hasher, nested);
        }
        None => hasher.update([0u8]),
    }
}

fn write_scalar(hasher: &mut Sha256, scalar: &Scalar) {
    match scalar {
        Scalar::Bool(b) => hasher.update([0u8, u8::from(*b)]),
        Scalar::Int(i) => {
            hasher.update([1u8]);
            hasher.update(i.to_le_bytes());
        }
        Scalar::Float(f) => {
            hasher.update([2u8]);
            write_f32(hasher, *f);
        }
        Scalar::String(s) => {
            hasher.update([3u8]);
            write_str(hasher, s);
        }
    }
}

fn write_value(hasher: &mut Sha256, value: &Value) {
    match value {
        Value::Bool(b) => write_scalar(hasher, &Scalar::Bool(*b)),
        Value::Int(i) => write_scalar(hasher, &Scalar::Int(*i)),
        Value::Float(f) => write_scalar(hasher, &Scalar::Float(*f)),
        Value::String(s) => {
            hasher.update([3u8]);
            write_str(hasher, s);
        }
        Value::Vector3(v) => {
            hasher.update([4u8]);
            v.iter().for_each(|f| write_f32(hasher, *f));
        }
        Value::Color3(c) => {
            hasher.update([5u8]);
            c.iter().for_each(|f| write_f32(hasher, *f));
        }
        Value::List(items) => {
            hasher.update([6u8]);
            write_len(hasher, items.len());
            items.iter().for_each(|s| write_scalar(hasher, s));
        }
        Value::Curve(points) => {
            hasher.update([7u8]);
            write_len(hasher, points.len());
            for point in points {
                write_f32(hasher, point.x);
                write_f32(hasher, point.y);
                write_str(hasher, point.handle.as_str());
            }
        }
        Value::Ramp(stops) => {
            hasher.update([8u8]);
            write_len(hasher, stops.len());
            for stop in stops {
                write_f32(hasher, stop.position);
                stop.color.iter().for_each(|f| write_f32(hasher, *f));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::connection::Link;

    fn network(order_flipped: bool, roughness: f32) -> ShaderNetwork {
        let mut net = ShaderNetwork::new("Mat");
        let output = ShaderNode::new("Output", "ShaderNodeOutputMaterial", "material_output");
        let bsdf = ShaderNode::new("BSDF", "ShaderNodeBsdfDiffuse", "diffuse_bsdf")
            .with_param("Roughness", Value::Float(roughness))
            .with_param("Color", Value::Color3([0.8, 0.8, 0.8]));
        let noise = ShaderNode::new("Noise", "ShaderNodeTexNoise", "noise_texture")
            .with_param("Scale", Value::Float(5.0));
        let links = [
            Link::new("BSDF", "BSDF", "Output", "Surface"),
            Link::new("Noise", "Fac", "BSDF", "Roughness"),
        ];
        if order_flipped {
            net.add_node(noise);
            net.add_node(bsdf);
            net.add_node(output);
            for link in links.into_iter().rev() {
                net.add_link(link).unwrap();
            }
        } else {
            net.add_node(output);
            net.add_node(bsdf);
            net.add_node(noise);
            for link in links {
                net.add_link(link).unwrap();
            }
        }
        net
    }

    #[test]
    fn test_hash_ignores_ordering() {
        assert_eq!(network(false, 0.5).content_hash(), network(true, 0.5).content_hash());
    }

    #[test]
    fn test_hash_changes_with_parameter_value() {
        assert_ne!(network(false, 0.5).content_hash(), network(false, 0.51).content_hash());
    }

    #[test]
    fn test_hash_ignores_name_and_location() {
        let a = network(false, 0.5);
        let mut b = network(false, 0.5);
        b.name = "Mat.001".to_string();
        let mut moved = b.node("Noise").cloned().unwrap();
        moved.location = [100.0, -40.0];
        b.add_node(moved);
        assert_eq!(a.content_hash(), b.content_hash());
    }

    #[test]
    fn test_hex_formatting() {
        let hash = network(false, 0.5).content_hash();
        assert_eq!(hash.to_string().len(), 64);
        assert_eq!(hash.short().len(), 8);
    }
}
