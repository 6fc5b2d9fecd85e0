// SPDX-License-Identifier: MIT OR Apache-2.0
//! JSON exchange document written by the source-side exporter.
//!
//! Two shapes are accepted:
//! - a combined document `{ "materials": {...}, "hierarchy": {...} }`
//! - a materials-only document keyed directly by material name

use crate::connection::Link;
use crate::graph::{NetworkError, ShaderNetwork};
use crate::node::ShaderNode;
use crate::value::Value;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value as Json;

/// A node entry of the document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeDoc {
    /// Source type identifier
    #[serde(rename = "type")]
    pub source_type: String,
    /// Target type identifier as resolved by the exporter
    #[serde(default)]
    pub cycles_type: String,
    /// Parameters by source name
    #[serde(default)]
    pub params: IndexMap<String, Json>,
    /// Editor location
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<[f32; 2]>,
    /// Embedded group network, keyed by group node name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group: Option<IndexMap<String, NetworkDoc>>,
}

/// A shading network entry of the document
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NetworkDoc {
    /// Nodes by ID
    pub nodes: IndexMap<String, NodeDoc>,
    /// Links in traversal order
    #[serde(default)]
    pub links: Vec<Link>,
    /// Group interface: socket identifier to display name
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub socket_map: IndexMap<String, String>,
}

impl NetworkDoc {
    /// Build an immutable network from this entry.
    ///
    /// Parameters whose JSON value has no [`Value`] representation (nulls,
    /// objects) are left out.
    pub fn to_network(&self, name: &str) -> Result<ShaderNetwork, DocumentError> {
        let mut network = ShaderNetwork::new(name);

        for (id, node_doc) in &self.nodes {
            let mut node = ShaderNode::new(id.clone(), &node_doc.source_type, &node_doc.cycles_type);
            if let Some([x, y]) = node_doc.location {
                node.location = [x, y];
            }
            for (param, json) in &node_doc.params {
                if let Some(value) = Value::from_json(json) {
                    node.parameters.insert(param.clone(), value);
                }
            }
            if let Some((group_name, group_doc)) = node_doc.group.as_ref().and_then(|g| g.first()) {
                node.nested = Some(Box::new(group_doc.to_network(group_name)?));
            }
            network.add_node(node);
        }

        for link in &self.links {
            network
                .add_link(link.clone())
                .map_err(|source| DocumentError::Network { network: name.to_string(), source })?;
        }
        for (identifier, label) in &self.socket_map {
            network.set_socket_label(identifier.clone(), label.clone());
        }

        network
            .validate()
            .map_err(|source| DocumentError::Network { network: name.to_string(), source })?;
        Ok(network)
    }

    /// Encode a network as a document entry
    pub fn from_network(network: &ShaderNetwork) -> Self {
        let nodes = network
            .nodes()
            .map(|node| {
                let group = node.nested.as_ref().map(|nested| {
                    let mut group = IndexMap::new();
                    group.insert(nested.name.clone(), NetworkDoc::from_network(nested));
                    group
                });
                let doc = NodeDoc {
                    source_type: node.source_type.clone(),
                    cycles_type: node.resolved_type.clone(),
                    params: node
                        .parameters
                        .iter()
                        .map(|(name, value)| (name.clone(), value.to_json()))
                        .collect(),
                    location: Some(node.location),
                    group,
                };
                (node.id.clone(), doc)
            })
            .collect();

        Self {
            nodes,
            links: network.links().to_vec(),
            socket_map: network.socket_labels().clone(),
        }
    }
}

/// A mesh object entry of the hierarchy document
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HierarchyEntry {
    /// Scene location path of the mesh
    pub path: String,
    /// Material name by slot index
    #[serde(default)]
    pub mat_by_index: IndexMap<String, String>,
    /// Whether the mesh uses more than one material
    #[serde(default)]
    pub has_multiple_mat: bool,
}

/// The combined exchange document
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SceneDocument {
    /// Shading networks by material name
    #[serde(default)]
    pub materials: IndexMap<String, NetworkDoc>,
    /// Mesh objects by object name
    #[serde(default)]
    pub hierarchy: IndexMap<String, HierarchyEntry>,
}

impl SceneDocument {
    /// Parse a combined or materials-only document
    pub fn from_json_str(text: &str) -> Result<Self, DocumentError> {
        let json: Json = serde_json::from_str(text)?;
        let Json::Object(map) = &json else {
            return Err(DocumentError::Shape("top level must be an object".to_string()));
        };
        let combined = map.get("materials").is_some_and(Json::is_object)
            && map.keys().all(|k| k == "materials" || k == "hierarchy");
        if combined {
            Ok(serde_json::from_value(json)?)
        } else {
            Ok(Self {
                materials: serde_json::from_value(json)?,
                hierarchy: IndexMap::new(),
            })
        }
    }

    /// Parse a separate hierarchy document and attach it
    pub fn with_hierarchy_json(mut self, text: &str) -> Result<Self, DocumentError> {
        self.hierarchy = serde_json::from_str(text)?;
        Ok(self)
    }

    /// Serialize as pretty JSON
    pub fn to_json_string(&self) -> Result<String, DocumentError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Error while reading a document
#[derive(Debug, thiserror::Error)]
pub enum DocumentError {
    /// Not valid JSON, or not the expected shape
    #[error("Invalid document JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// Top level shape is wrong
    #[error("Invalid document: {0}")]
    Shape(String),

    /// A network entry breaks the graph invariants
    #[error("Invalid network '{network}': {source}")]
    Network {
        /// Network name
        network: String,
        /// Underlying graph error
        #[source]
        source: NetworkError,
    },
}
