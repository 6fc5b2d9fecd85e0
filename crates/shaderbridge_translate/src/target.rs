// SPDX-License-Identifier: MIT OR Apache-2.0
//! The target object graph seam.
//!
//! The builder never touches a concrete scene graph. Everything it creates
//! goes through [`TargetGraph`]: containers (boxes), shader nodes from a
//! [`NodeSchema`], assignment nodes, value slots, connections, promoted
//! boundary ports and scene-flow wiring.
//!
//! ## Scene flow
//!
//! Assignment nodes and containers pass a scene through. A container's
//! input is visible inside it as [`SceneEnd::ContainerIn`]; its output is
//! driven by [`TargetGraph::set_container_output`]. Siblings see a container
//! as [`SceneEnd::Container`].

use serde::{Deserialize, Serialize};
use shaderbridge_graph::{CurvePoint, NodeSchema, PortDirection, RampStop, SocketType, Value};
use std::fmt;
use uuid::Uuid;

/// Unique identifier for a target node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TargetNodeId(pub Uuid);

impl TargetNodeId {
    /// Create a new random node ID
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for TargetNodeId {
    fn default() -> Self {
        Self::new()
    }
}

/// Unique identifier for a target container
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ContainerId(pub Uuid);

impl ContainerId {
    /// Create a new random container ID
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ContainerId {
    fn default() -> Self {
        Self::new()
    }
}

/// Owner of a socket
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Owner {
    /// A shader or assignment node
    Node(TargetNodeId),
    /// A promoted boundary port of a container
    Container(ContainerId),
}

/// A socket on a node or on a container boundary
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SocketRef {
    /// Node or container owning the socket
    pub owner: Owner,
    /// Slot or port name
    pub name: String,
}

impl SocketRef {
    /// Socket on a node
    pub fn node(node: TargetNodeId, name: impl Into<String>) -> Self {
        Self {
            owner: Owner::Node(node),
            name: name.into(),
        }
    }

    /// Promoted port on a container
    pub fn container(container: ContainerId, name: impl Into<String>) -> Self {
        Self {
            owner: Owner::Container(container),
            name: name.into(),
        }
    }
}

/// Scene-flow endpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SceneEnd {
    /// An assignment node
    Node(TargetNodeId),
    /// A container as seen by its siblings
    Container(ContainerId),
    /// A container's scene input as seen from inside it
    ContainerIn(ContainerId),
}

/// Material output stage a closure is assigned to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum TerminalRole {
    /// Surface shading
    Surface,
    /// Volume shading
    Volume,
    /// Displacement
    Displacement,
}

impl TerminalRole {
    /// Match an output marker socket name
    pub fn from_socket(socket: &str) -> Option<Self> {
        match socket.to_ascii_lowercase().as_str() {
            "surface" => Some(Self::Surface),
            "volume" => Some(Self::Volume),
            "displacement" => Some(Self::Displacement),
            _ => None,
        }
    }

    /// Attribute suffix used by the target renderer
    pub fn attribute_name(&self) -> &'static str {
        match self {
            Self::Surface => "surface",
            Self::Volume => "volume",
            Self::Displacement => "displacement",
        }
    }
}

impl fmt::Display for TerminalRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.attribute_name())
    }
}

/// Input slot of an assignment node receiving the closure
pub const ASSIGNMENT_SHADER_SLOT: &str = "shader";

/// Operations the builder needs from a target scene graph.
///
/// Names must be unique among the children of a container; creating a
/// duplicate is an error. Implementations are not required to be thread-safe.
pub trait TargetGraph {
    /// Top-level container
    fn root(&self) -> ContainerId;

    /// Names of all nodes and containers directly inside a container
    fn child_names(&self, container: ContainerId) -> Result<Vec<String>, TargetError>;

    /// Create a container
    fn create_container(&mut self, parent: ContainerId, name: &str) -> Result<ContainerId, TargetError>;

    /// Create a shader node with the slots of a schema
    fn create_shader(
        &mut self,
        parent: ContainerId,
        name: &str,
        schema: &NodeSchema,
    ) -> Result<TargetNodeId, TargetError>;

    /// Create an assignment node for one output stage
    fn create_assignment(
        &mut self,
        parent: ContainerId,
        name: &str,
        role: TerminalRole,
    ) -> Result<TargetNodeId, TargetError>;

    /// Set a value slot, coercing to the slot's declared type
    fn set_value(&mut self, node: TargetNodeId, slot: &str, value: &Value) -> Result<(), TargetError>;

    /// Remove all control points of a curve slot
    fn clear_curve(&mut self, node: TargetNodeId, slot: &str) -> Result<(), TargetError>;

    /// Append a control point to a curve slot
    fn push_curve_point(&mut self, node: TargetNodeId, slot: &str, point: CurvePoint) -> Result<(), TargetError>;

    /// Remove all stops of a ramp slot
    fn clear_ramp(&mut self, node: TargetNodeId, slot: &str) -> Result<(), TargetError>;

    /// Append a stop to a ramp slot
    fn push_ramp_stop(&mut self, node: TargetNodeId, slot: &str, stop: RampStop) -> Result<(), TargetError>;

    /// Type of an input or output socket, `None` if there is no such socket
    fn socket_type(&self, socket: &SocketRef, direction: PortDirection) -> Option<SocketType>;

    /// Connect an output socket to an input socket, replacing any existing input
    fn connect(&mut self, from: &SocketRef, to: &SocketRef) -> Result<(), TargetError>;

    /// Expose an internal input on the container boundary.
    ///
    /// Promoting the same name again binds one more internal input to it.
    fn promote_input(&mut self, container: ContainerId, name: &str, internal: &SocketRef) -> Result<(), TargetError>;

    /// Expose an internal output on the container boundary
    fn promote_output(&mut self, container: ContainerId, name: &str, internal: &SocketRef) -> Result<(), TargetError>;

    /// Names of the promoted ports of a container
    fn promoted_ports(&self, container: ContainerId, direction: PortDirection) -> Result<Vec<String>, TargetError>;

    /// Default value of a promoted input
    fn set_promoted_default(&mut self, container: ContainerId, name: &str, value: &Value) -> Result<(), TargetError>;

    /// Drive the scene input of an assignment node or container
    fn set_scene_input(&mut self, downstream: SceneEnd, upstream: SceneEnd) -> Result<(), TargetError>;

    /// Drive the scene output of a container from inside it
    fn set_container_output(&mut self, container: ContainerId, upstream: SceneEnd) -> Result<(), TargetError>;

    /// Add location paths to an assignment's filter
    fn add_filter_paths(&mut self, assignment: TargetNodeId, paths: &[String]) -> Result<(), TargetError>;

    /// Flag a container as a placeholder for a network that produced nothing
    fn mark_placeholder(&mut self, container: ContainerId, reason: &str) -> Result<(), TargetError>;
}

/// Error from a target graph operation
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum TargetError {
    /// Container does not exist
    #[error("Container not found: {0:?}")]
    ContainerNotFound(ContainerId),

    /// Node does not exist
    #[error("Node not found: {0:?}")]
    NodeNotFound(TargetNodeId),

    /// A sibling already has this name
    #[error("Duplicate name in container: {0}")]
    DuplicateName(String),

    /// Slot or port does not exist
    #[error("Slot not found: {owner}.{slot}")]
    SlotNotFound {
        /// Node or container name
        owner: String,
        /// Slot name
        slot: String,
    },

    /// Value cannot be stored in the slot
    #[error("Cannot store {value:?} in {slot} ({expected:?})")]
    ValueType {
        /// Slot name
        slot: String,
        /// Declared slot type
        expected: SocketType,
        /// Type of the rejected value
        value: SocketType,
    },

    /// Operation needs an assignment node
    #[error("Not an assignment node: {0}")]
    NotAnAssignment(String),

    /// Scene wiring is not possible between these endpoints
    #[error("Invalid scene wiring: {0}")]
    SceneWiring(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_terminal_roles() {
        assert_eq!(TerminalRole::from_socket("Surface"), Some(TerminalRole::Surface));
        assert_eq!(TerminalRole::from_socket("volume"), Some(TerminalRole::Volume));
        assert_eq!(TerminalRole::from_socket("Displacement"), Some(TerminalRole::Displacement));
        assert_eq!(TerminalRole::from_socket("Thickness"), None);
        assert!(TerminalRole::Surface < TerminalRole::Volume);
        assert!(TerminalRole::Volume < TerminalRole::Displacement);
    }

    #[test]
    fn test_socket_refs() {
        let node = TargetNodeId::new();
        let container = ContainerId::new();
        assert_eq!(SocketRef::node(node, "bsdf").owner, Owner::Node(node));
        assert_eq!(SocketRef::container(container, "Color").owner, Owner::Container(container));
        assert_ne!(TargetNodeId::new(), node);
    }
}
