// SPDX-License-Identifier: MIT OR Apache-2.0
//! Node definitions: source shader nodes and target node schemas.

use crate::graph::ShaderNetwork;
use crate::port::Port;
use crate::value::Value;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Structural role of a node within its network
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum NodeRole {
    /// Ordinary shading node
    #[default]
    Regular,
    /// Material output marker (Surface / Volume / Displacement)
    Output,
    /// Group boundary providing the group's inputs
    GroupInput,
    /// Group boundary receiving the group's outputs
    GroupOutput,
}

impl NodeRole {
    /// Derive the role from the source type identifier and its resolved type
    pub fn from_types(source_type: &str, resolved_type: &str) -> Self {
        match (source_type, resolved_type) {
            ("ShaderNodeOutputMaterial", _) | (_, "material_output") => Self::Output,
            ("NodeGroupInput", _) | (_, "group_input") => Self::GroupInput,
            ("NodeGroupOutput", _) | (_, "group_output") => Self::GroupOutput,
            _ => Self::Regular,
        }
    }

    /// Whether nodes of this role are structural markers rather than real nodes
    pub fn is_marker(&self) -> bool {
        !matches!(self, Self::Regular)
    }
}

/// A node of a source shading network
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShaderNode {
    /// Unique ID within the network
    pub id: String,
    /// Source system type identifier (e.g. `ShaderNodeBsdfPrincipled`)
    pub source_type: String,
    /// Target system type identifier, `unknown` if it could not be mapped,
    /// empty if it has not been resolved yet
    pub resolved_type: String,
    /// Parameters by source name
    pub parameters: IndexMap<String, Value>,
    /// Structural role
    pub role: NodeRole,
    /// Position in the source editor
    pub location: [f32; 2],
    /// Nested network when this node instances a node group
    pub nested: Option<Box<ShaderNetwork>>,
}

impl ShaderNode {
    /// Create a new regular node
    pub fn new(id: impl Into<String>, source_type: impl Into<String>, resolved_type: impl Into<String>) -> Self {
        let source_type = source_type.into();
        let resolved_type = resolved_type.into();
        Self {
            id: id.into(),
            role: NodeRole::from_types(&source_type, &resolved_type),
            source_type,
            resolved_type,
            parameters: IndexMap::new(),
            location: [0.0, 0.0],
            nested: None,
        }
    }

    /// Set a parameter
    pub fn with_param(mut self, name: impl Into<String>, value: Value) -> Self {
        self.parameters.insert(name.into(), value);
        self
    }

    /// Attach a nested group network
    pub fn with_nested(mut self, network: ShaderNetwork) -> Self {
        self.nested = Some(Box::new(network));
        self
    }

    /// Set the position
    pub fn with_location(mut self, x: f32, y: f32) -> Self {
        self.location = [x, y];
        self
    }

    /// Get a parameter by name
    pub fn param(&self, name: &str) -> Option<&Value> {
        self.parameters.get(name)
    }

    /// Get a string parameter by name
    pub fn param_str(&self, name: &str) -> Option<&str> {
        self.param(name).and_then(Value::as_str)
    }

    /// Whether this node instances a node group
    pub fn is_group(&self) -> bool {
        self.nested.is_some()
    }
}

/// Category of a target node type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NodeCategory {
    /// Closure producing shaders
    Shader,
    /// Texture generators and lookups
    Texture,
    /// Colour operations
    Color,
    /// Vector operations
    Vector,
    /// Scalar/vector math and mapping
    Converter,
    /// Scene inputs (coordinates, attributes)
    Input,
    /// Type adapters inserted on mismatched links
    Adapter,
}

/// Schema of a target node type: its declared parameter and output slots
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NodeSchema {
    /// Unique type identifier (the name passed to the target's shader loader)
    pub id: String,
    /// Display name
    pub name: String,
    /// Category
    pub category: NodeCategory,
    /// Description
    pub description: String,
    /// Parameter slots
    pub inputs: Vec<Port>,
    /// Output slots
    pub outputs: Vec<Port>,
}

impl NodeSchema {
    /// Get a parameter slot by exact name
    pub fn input(&self, name: &str) -> Option<&Port> {
        self.inputs.iter().find(|p| p.name == name)
    }

    /// Get an output slot by exact name
    pub fn output(&self, name: &str) -> Option<&Port> {
        self.outputs.iter().find(|p| p.name == name)
    }
}

/// Registry of available target node types
#[derive(Debug, Clone)]
pub struct NodeRegistry {
    /// Registered node types by ID
    types: IndexMap<String, NodeSchema>,
}

impl NodeRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self {
            types: IndexMap::new(),
        }
    }

    /// Register a node type
    pub fn register(&mut self, schema: NodeSchema) {
        self.types.insert(schema.id.clone(), schema);
    }

    /// Get a node type by ID
    pub fn get(&self, id: &str) -> Option<&NodeSchema> {
        self.types.get(id)
    }

    /// Whether a node type is registered
    pub fn contains(&self, id: &str) -> bool {
        self.types.contains_key(id)
    }

    /// Get all registered types
    pub fn types(&self) -> impl Iterator<Item = &NodeSchema> {
        self.types.values()
    }

    /// Get types by category
    pub fn types_in_category(&self, category: NodeCategory) -> impl Iterator<Item = &NodeSchema> {
        self.types.values().filter(move |t| t.category == category)
    }

    /// Number of registered types
    pub fn len(&self) -> usize {
        self.types.len()
    }

    /// Whether the registry is empty
    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}

impl Default for NodeRegistry {
    fn default() -> Self {
        Self::new()
    }
}
