// SPDX-License-Identifier: MIT OR Apache-2.0
//! In-process target graph.
//!
//! `MemoryGraph` records everything the builder creates so that a run can
//! be inspected, dumped as JSON, or asserted on in tests. It is a plain
//! owned structure and is not meant to be shared across threads while a
//! run is writing to it.

use crate::target::{
    ContainerId, Owner, SceneEnd, SocketRef, TargetError, TargetGraph, TargetNodeId, TerminalRole,
    ASSIGNMENT_SHADER_SLOT,
};
use indexmap::IndexMap;
use serde::Serialize;
use shaderbridge_graph::{CurvePoint, NodeSchema, PortDirection, RampStop, SocketType, Value};

/// A value slot of a shader node
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Slot {
    /// Declared type
    pub socket_type: SocketType,
    /// Current value, `None` for the loader default
    pub value: Option<Value>,
}

/// What a target node is
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum TargetNodeKind {
    /// Shader node loaded from a schema
    Shader {
        /// Loader type name
        shader_type: String,
        /// Parameter slots
        parameters: IndexMap<String, Slot>,
        /// Output slots
        outputs: IndexMap<String, SocketType>,
    },
    /// Assignment of a closure to filtered scene locations
    Assignment {
        /// Output stage
        role: TerminalRole,
        /// Filtered location paths
        filter: Vec<String>,
        /// Upstream scene
        scene_input: Option<SceneEnd>,
    },
}

/// A node of the target graph
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TargetNode {
    /// Node ID
    pub id: TargetNodeId,
    /// Name, unique within its container
    pub name: String,
    /// Owning container
    pub parent: ContainerId,
    /// Shader or assignment
    pub kind: TargetNodeKind,
}

impl TargetNode {
    /// Loader type name of a shader node
    pub fn shader_type(&self) -> Option<&str> {
        match &self.kind {
            TargetNodeKind::Shader { shader_type, .. } => Some(shader_type),
            TargetNodeKind::Assignment { .. } => None,
        }
    }

    /// Current value of a parameter slot
    pub fn value(&self, slot: &str) -> Option<&Value> {
        match &self.kind {
            TargetNodeKind::Shader { parameters, .. } => parameters.get(slot)?.value.as_ref(),
            TargetNodeKind::Assignment { .. } => None,
        }
    }

    /// Filter paths of an assignment node
    pub fn filter(&self) -> &[String] {
        match &self.kind {
            TargetNodeKind::Assignment { filter, .. } => filter,
            TargetNodeKind::Shader { .. } => &[],
        }
    }

    /// Output stage of an assignment node
    pub fn role(&self) -> Option<TerminalRole> {
        match &self.kind {
            TargetNodeKind::Assignment { role, .. } => Some(*role),
            TargetNodeKind::Shader { .. } => None,
        }
    }

    /// Upstream scene of an assignment node
    pub fn scene_input(&self) -> Option<SceneEnd> {
        match &self.kind {
            TargetNodeKind::Assignment { scene_input, .. } => *scene_input,
            TargetNodeKind::Shader { .. } => None,
        }
    }
}

/// A promoted boundary port of a container
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BoundaryPort {
    /// Port name
    pub name: String,
    /// Type of the first bound internal socket
    pub socket_type: SocketType,
    /// Internal sockets driven by (inputs) or driving (outputs) this port
    pub bindings: Vec<SocketRef>,
    /// Default value of an input port
    pub default: Option<Value>,
}

/// A container (box) of the target graph
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TargetContainer {
    /// Container ID
    pub id: ContainerId,
    /// Name, unique within its parent
    pub name: String,
    /// Parent container, `None` for the root
    pub parent: Option<ContainerId>,
    /// Promoted inputs
    pub inputs: Vec<BoundaryPort>,
    /// Promoted outputs
    pub outputs: Vec<BoundaryPort>,
    /// Upstream scene
    pub scene_input: Option<SceneEnd>,
    /// Inner scene driving the output
    pub scene_output: Option<SceneEnd>,
    /// Placeholder reason
    pub placeholder: Option<String>,
}

impl TargetContainer {
    fn new(name: &str, parent: Option<ContainerId>) -> Self {
        Self {
            id: ContainerId::new(),
            name: name.to_string(),
            parent,
            inputs: Vec::new(),
            outputs: Vec::new(),
            scene_input: None,
            scene_output: None,
            placeholder: None,
        }
    }

    /// Get a promoted port by name
    pub fn port(&self, direction: PortDirection, name: &str) -> Option<&BoundaryPort> {
        let ports = match direction {
            PortDirection::Input => &self.inputs,
            PortDirection::Output => &self.outputs,
        };
        ports.iter().find(|p| p.name == name)
    }

    /// Whether this container is a placeholder
    pub fn is_placeholder(&self) -> bool {
        self.placeholder.is_some()
    }
}

/// A connection from an output socket to an input socket
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TargetConnection {
    /// Output socket
    pub from: SocketRef,
    /// Input socket
    pub to: SocketRef,
}

/// In-memory implementation of [`TargetGraph`]
#[derive(Debug, Clone, Serialize)]
pub struct MemoryGraph {
    root: ContainerId,
    containers: IndexMap<ContainerId, TargetContainer>,
    nodes: IndexMap<TargetNodeId, TargetNode>,
    connections: Vec<TargetConnection>,
}

impl MemoryGraph {
    /// Create a graph with an empty root container
    pub fn new() -> Self {
        let root = TargetContainer::new("root", None);
        let id = root.id;
        let mut containers = IndexMap::new();
        containers.insert(id, root);
        Self {
            root: id,
            containers,
            nodes: IndexMap::new(),
            connections: Vec::new(),
        }
    }

    /// Get a container by ID
    pub fn container(&self, id: ContainerId) -> Option<&TargetContainer> {
        self.containers.get(&id)
    }

    /// Get a node by ID
    pub fn node(&self, id: TargetNodeId) -> Option<&TargetNode> {
        self.nodes.get(&id)
    }

    /// All containers except the root
    pub fn containers(&self) -> impl Iterator<Item = &TargetContainer> {
        self.containers.values().filter(|c| c.parent.is_some())
    }

    /// All nodes
    pub fn nodes(&self) -> impl Iterator<Item = &TargetNode> {
        self.nodes.values()
    }

    /// Nodes directly inside a container
    pub fn nodes_in(&self, container: ContainerId) -> impl Iterator<Item = &TargetNode> {
        self.nodes.values().filter(move |n| n.parent == container)
    }

    /// Containers directly inside a container
    pub fn containers_in(&self, container: ContainerId) -> impl Iterator<Item = &TargetContainer> {
        self.containers
            .values()
            .filter(move |c| c.parent == Some(container))
    }

    /// All connections
    pub fn connections(&self) -> &[TargetConnection] {
        &self.connections
    }

    /// Connection driving an input socket
    pub fn input_of(&self, socket: &SocketRef) -> Option<&SocketRef> {
        self.connections
            .iter()
            .find(|c| &c.to == socket)
            .map(|c| &c.from)
    }

    /// Find a child node by name
    pub fn node_named(&self, container: ContainerId, name: &str) -> Option<&TargetNode> {
        self.nodes_in(container).find(|n| n.name == name)
    }

    /// Find a child container by name
    pub fn container_named(&self, container: ContainerId, name: &str) -> Option<&TargetContainer> {
        self.containers_in(container).find(|c| c.name == name)
    }

    /// Resolve a `/`-separated container path below the root
    pub fn container_at(&self, path: &str) -> Option<&TargetContainer> {
        path.split('/')
            .filter(|s| !s.is_empty())
            .try_fold(self.containers.get(&self.root)?, |current, name| {
                self.container_named(current.id, name)
            })
    }

    fn container_mut(&mut self, id: ContainerId) -> Result<&mut TargetContainer, TargetError> {
        self.containers
            .get_mut(&id)
            .ok_or(TargetError::ContainerNotFound(id))
    }

    fn node_mut(&mut self, id: TargetNodeId) -> Result<&mut TargetNode, TargetError> {
        self.nodes.get_mut(&id).ok_or(TargetError::NodeNotFound(id))
    }

    fn ensure_unique(&self, parent: ContainerId, name: &str) -> Result<(), TargetError> {
        if self.child_names(parent)?.iter().any(|n| n == name) {
            return Err(TargetError::DuplicateName(name.to_string()));
        }
        Ok(())
    }

    fn slot_mut(&mut self, node: TargetNodeId, slot: &str) -> Result<&mut Slot, TargetError> {
        let target = self.node_mut(node)?;
        let owner = target.name.clone();
        match &mut target.kind {
            TargetNodeKind::Shader { parameters, .. } => {
                parameters.get_mut(slot).ok_or_else(|| TargetError::SlotNotFound {
                    owner,
                    slot: slot.to_string(),
                })
            }
            TargetNodeKind::Assignment { .. } => Err(TargetError::SlotNotFound {
                owner,
                slot: slot.to_string(),
            }),
        }
    }

    fn typed_slot_mut(
        &mut self,
        node: TargetNodeId,
        slot: &str,
        expected: SocketType,
    ) -> Result<&mut Slot, TargetError> {
        let target = self.slot_mut(node, slot)?;
        if target.socket_type != expected {
            return Err(TargetError::ValueType {
                slot: slot.to_string(),
                expected: target.socket_type,
                value: expected,
            });
        }
        Ok(target)
    }

    fn owner_name(&self, owner: &Owner) -> String {
        match owner {
            Owner::Node(id) => self.nodes.get(id).map_or_else(|| format!("{id:?}"), |n| n.name.clone()),
            Owner::Container(id) => self
                .containers
                .get(id)
                .map_or_else(|| format!("{id:?}"), |c| c.name.clone()),
        }
    }

    fn missing_socket(&self, socket: &SocketRef) -> TargetError {
        TargetError::SlotNotFound {
            owner: self.owner_name(&socket.owner),
            slot: socket.name.clone(),
        }
    }

    fn check_scene_end(&self, end: SceneEnd) -> Result<(), TargetError> {
        match end {
            SceneEnd::Node(id) => match self.nodes.get(&id) {
                Some(node) if node.role().is_some() => Ok(()),
                Some(node) => Err(TargetError::NotAnAssignment(node.name.clone())),
                None => Err(TargetError::NodeNotFound(id)),
            },
            SceneEnd::Container(id) | SceneEnd::ContainerIn(id) => {
                self.containers.get(&id).map(|_| ()).ok_or(TargetError::ContainerNotFound(id))
            }
        }
    }
}

impl Default for MemoryGraph {
    fn default() -> Self {
        Self::new()
    }
}

impl TargetGraph for MemoryGraph {
    fn root(&self) -> ContainerId {
        self.root
    }

    fn child_names(&self, container: ContainerId) -> Result<Vec<String>, TargetError> {
        if !self.containers.contains_key(&container) {
            return Err(TargetError::ContainerNotFound(container));
        }
        Ok(self
            .nodes_in(container)
            .map(|n| n.name.clone())
            .chain(self.containers_in(container).map(|c| c.name.clone()))
            .collect())
    }

    fn create_container(&mut self, parent: ContainerId, name: &str) -> Result<ContainerId, TargetError> {
        self.ensure_unique(parent, name)?;
        let container = TargetContainer::new(name, Some(parent));
        let id = container.id;
        self.containers.insert(id, container);
        Ok(id)
    }

    fn create_shader(
        &mut self,
        parent: ContainerId,
        name: &str,
        schema: &NodeSchema,
    ) -> Result<TargetNodeId, TargetError> {
        self.ensure_unique(parent, name)?;
        let parameters = schema
            .inputs
            .iter()
            .map(|port| {
                let slot = Slot {
                    socket_type: port.socket_type,
                    value: port.default_value.clone(),
                };
                (port.name.clone(), slot)
            })
            .collect();
        let outputs = schema
            .outputs
            .iter()
            .map(|port| (port.name.clone(), port.socket_type))
            .collect();

        let id = TargetNodeId::new();
        self.nodes.insert(
            id,
            TargetNode {
                id,
                name: name.to_string(),
                parent,
                kind: TargetNodeKind::Shader {
                    shader_type: schema.id.clone(),
                    parameters,
                    outputs,
                },
            },
        );
        Ok(id)
    }

    fn create_assignment(
        &mut self,
        parent: ContainerId,
        name: &str,
        role: TerminalRole,
    ) -> Result<TargetNodeId, TargetError> {
        self.ensure_unique(parent, name)?;
        let id = TargetNodeId::new();
        self.nodes.insert(
            id,
            TargetNode {
                id,
                name: name.to_string(),
                parent,
                kind: TargetNodeKind::Assignment {
                    role,
                    filter: Vec::new(),
                    scene_input: None,
                },
            },
        );
        Ok(id)
    }

    fn set_value(&mut self, node: TargetNodeId, slot: &str, value: &Value) -> Result<(), TargetError> {
        let target = self.slot_mut(node, slot)?;
        let coerced = value.coerce_to(&target.socket_type).ok_or(TargetError::ValueType {
            slot: slot.to_string(),
            expected: target.socket_type,
            value: value.socket_type(),
        })?;
        target.value = Some(coerced);
        Ok(())
    }

    fn clear_curve(&mut self, node: TargetNodeId, slot: &str) -> Result<(), TargetError> {
        let target = self.typed_slot_mut(node, slot, SocketType::Curve)?;
        target.value = Some(Value::Curve(Vec::new()));
        Ok(())
    }

    fn push_curve_point(&mut self, node: TargetNodeId, slot: &str, point: CurvePoint) -> Result<(), TargetError> {
        let target = self.typed_slot_mut(node, slot, SocketType::Curve)?;
        match &mut target.value {
            Some(Value::Curve(points)) => points.push(point),
            other => *other = Some(Value::Curve(vec![point])),
        }
        Ok(())
    }

    fn clear_ramp(&mut self, node: TargetNodeId, slot: &str) -> Result<(), TargetError> {
        let target = self.typed_slot_mut(node, slot, SocketType::Ramp)?;
        target.value = Some(Value::Ramp(Vec::new()));
        Ok(())
    }

    fn push_ramp_stop(&mut self, node: TargetNodeId, slot: &str, stop: RampStop) -> Result<(), TargetError> {
        let target = self.typed_slot_mut(node, slot, SocketType::Ramp)?;
        match &mut target.value {
            Some(Value::Ramp(stops)) => stops.push(stop),
            other => *other = Some(Value::Ramp(vec![stop])),
        }
        Ok(())
    }

    fn socket_type(&self, socket: &SocketRef, direction: PortDirection) -> Option<SocketType> {
        match socket.owner {
            Owner::Node(id) => match (&self.nodes.get(&id)?.kind, direction) {
                (TargetNodeKind::Shader { parameters, .. }, PortDirection::Input) => {
                    parameters.get(&socket.name).map(|s| s.socket_type)
                }
                (TargetNodeKind::Shader { outputs, .. }, PortDirection::Output) => {
                    outputs.get(&socket.name).copied()
                }
                (TargetNodeKind::Assignment { .. }, PortDirection::Input) => {
                    (socket.name == ASSIGNMENT_SHADER_SLOT).then_some(SocketType::Closure)
                }
                (TargetNodeKind::Assignment { .. }, PortDirection::Output) => None,
            },
            Owner::Container(id) => self
                .containers
                .get(&id)?
                .port(direction, &socket.name)
                .map(|p| p.socket_type),
        }
    }

    fn connect(&mut self, from: &SocketRef, to: &SocketRef) -> Result<(), TargetError> {
        if self.socket_type(from, PortDirection::Output).is_none() {
            return Err(self.missing_socket(from));
        }
        if self.socket_type(to, PortDirection::Input).is_none() {
            return Err(self.missing_socket(to));
        }
        self.connections.retain(|c| &c.to != to);
        self.connections.push(TargetConnection {
            from: from.clone(),
            to: to.clone(),
        });
        Ok(())
    }

    fn promote_input(&mut self, container: ContainerId, name: &str, internal: &SocketRef) -> Result<(), TargetError> {
        let socket_type = self
            .socket_type(internal, PortDirection::Input)
            .ok_or_else(|| self.missing_socket(internal))?;
        let target = self.container_mut(container)?;
        match target.inputs.iter_mut().find(|p| p.name == name) {
            Some(port) => {
                if !port.bindings.contains(internal) {
                    port.bindings.push(internal.clone());
                }
            }
            None => target.inputs.push(BoundaryPort {
                name: name.to_string(),
                socket_type,
                bindings: vec![internal.clone()],
                default: None,
            }),
        }
        Ok(())
    }

    fn promote_output(&mut self, container: ContainerId, name: &str, internal: &SocketRef) -> Result<(), TargetError> {
        let socket_type = self
            .socket_type(internal, PortDirection::Output)
            .ok_or_else(|| self.missing_socket(internal))?;
        let target = self.container_mut(container)?;
        if target.outputs.iter().any(|p| p.name == name) {
            return Err(TargetError::DuplicateName(name.to_string()));
        }
        target.outputs.push(BoundaryPort {
            name: name.to_string(),
            socket_type,
            bindings: vec![internal.clone()],
            default: None,
        });
        Ok(())
    }

    fn promoted_ports(&self, container: ContainerId, direction: PortDirection) -> Result<Vec<String>, TargetError> {
        let target = self
            .containers
            .get(&container)
            .ok_or(TargetError::ContainerNotFound(container))?;
        let ports = match direction {
            PortDirection::Input => &target.inputs,
            PortDirection::Output => &target.outputs,
        };
        Ok(ports.iter().map(|p| p.name.clone()).collect())
    }

    fn set_promoted_default(&mut self, container: ContainerId, name: &str, value: &Value) -> Result<(), TargetError> {
        let target = self.container_mut(container)?;
        let owner = target.name.clone();
        let port = target
            .inputs
            .iter_mut()
            .find(|p| p.name == name)
            .ok_or_else(|| TargetError::SlotNotFound {
                owner,
                slot: name.to_string(),
            })?;
        let coerced = value.coerce_to(&port.socket_type).ok_or(TargetError::ValueType {
            slot: name.to_string(),
            expected: port.socket_type,
            value: value.socket_type(),
        })?;
        port.default = Some(coerced);
        Ok(())
    }

    fn set_scene_input(&mut self, downstream: SceneEnd, upstream: SceneEnd) -> Result<(), TargetError> {
        self.check_scene_end(upstream)?;
        match downstream {
            SceneEnd::Node(id) => {
                let target = self.node_mut(id)?;
                let name = target.name.clone();
                match &mut target.kind {
                    TargetNodeKind::Assignment { scene_input, .. } => {
                        *scene_input = Some(upstream);
                        Ok(())
                    }
                    TargetNodeKind::Shader { .. } => Err(TargetError::NotAnAssignment(name)),
                }
            }
            SceneEnd::Container(id) => {
                self.container_mut(id)?.scene_input = Some(upstream);
                Ok(())
            }
            SceneEnd::ContainerIn(_) => Err(TargetError::SceneWiring(
                "a container input cannot be driven from inside".to_string(),
            )),
        }
    }

    fn set_container_output(&mut self, container: ContainerId, upstream: SceneEnd) -> Result<(), TargetError> {
        self.check_scene_end(upstream)?;
        self.container_mut(container)?.scene_output = Some(upstream);
        Ok(())
    }

    fn add_filter_paths(&mut self, assignment: TargetNodeId, paths: &[String]) -> Result<(), TargetError> {
        let target = self.node_mut(assignment)?;
        let name = target.name.clone();
        match &mut target.kind {
            TargetNodeKind::Assignment { filter, .. } => {
                for path in paths {
                    if !filter.contains(path) {
                        filter.push(path.clone());
                    }
                }
                Ok(())
            }
            TargetNodeKind::Shader { .. } => Err(TargetError::NotAnAssignment(name)),
        }
    }

    fn mark_placeholder(&mut self, container: ContainerId, reason: &str) -> Result<(), TargetError> {
        self.container_mut(container)?.placeholder = Some(reason.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shaderbridge_graph::graphs::cycles::create_cycles_registry;

    #[test]
    fn test_create_and_find() {
        let registry = create_cycles_registry();
        let mut graph = MemoryGraph::new();
        let materials = graph.create_container(graph.root(), "Materials").unwrap();
        let red = graph.create_container(materials, "Red").unwrap();
        let bsdf = graph
            .create_shader(red, "Principled_BSDF", registry.get("principled_bsdf").unwrap())
            .unwrap();

        assert_eq!(graph.container_at("Materials/Red").map(|c| c.id), Some(red));
        assert_eq!(graph.node_named(red, "Principled_BSDF").map(|n| n.id), Some(bsdf));
        assert_eq!(graph.child_names(materials).unwrap(), vec!["Red".to_string()]);
        assert_eq!(
            graph.create_container(materials, "Red"),
            Err(TargetError::DuplicateName("Red".to_string()))
        );
    }

    #[test]
    fn test_set_value_coerces_to_slot_type() {
        let registry = create_cycles_registry();
        let mut graph = MemoryGraph::new();
        let root = graph.root();
        let node = graph
            .create_shader(root, "Diffuse", registry.get("diffuse_bsdf").unwrap())
            .unwrap();

        graph.set_value(node, "color", &Value::Vector3([1.0, 0.5, 0.0])).unwrap();
        graph.set_value(node, "roughness", &Value::Int(1)).unwrap();
        let diffuse = graph.node(node).unwrap();
        assert_eq!(diffuse.value("color"), Some(&Value::Color3([1.0, 0.5, 0.0])));
        assert_eq!(diffuse.value("roughness"), Some(&Value::Float(1.0)));

        assert!(matches!(
            graph.set_value(node, "color", &Value::String("red".to_string())),
            Err(TargetError::ValueType { .. })
        ));
        assert!(matches!(
            graph.set_value(node, "missing", &Value::Float(0.0)),
            Err(TargetError::SlotNotFound { .. })
        ));
    }

    #[test]
    fn test_connect_replaces_existing_input() {
        let registry = create_cycles_registry();
        let mut graph = MemoryGraph::new();
        let root = graph.root();
        let a = graph.create_shader(root, "A", registry.get("noise_texture").unwrap()).unwrap();
        let b = graph.create_shader(root, "B", registry.get("noise_texture").unwrap()).unwrap();
        let bsdf = graph.create_shader(root, "C", registry.get("diffuse_bsdf").unwrap()).unwrap();

        let to = SocketRef::node(bsdf, "color");
        graph.connect(&SocketRef::node(a, "color"), &to).unwrap();
        graph.connect(&SocketRef::node(b, "color"), &to).unwrap();
        assert_eq!(graph.connections().len(), 1);
        assert_eq!(graph.input_of(&to), Some(&SocketRef::node(b, "color")));

        assert!(graph.connect(&SocketRef::node(a, "nope"), &to).is_err());
    }

    #[test]
    fn test_promoted_inputs_fan_out() {
        let registry = create_cycles_registry();
        let mut graph = MemoryGraph::new();
        let group = graph.create_container(graph.root(), "Group").unwrap();
        let a = graph.create_shader(group, "A", registry.get("diffuse_bsdf").unwrap()).unwrap();
        let b = graph.create_shader(group, "B", registry.get("emission").unwrap()).unwrap();

        graph.promote_input(group, "Tint", &SocketRef::node(a, "color")).unwrap();
        graph.promote_input(group, "Tint", &SocketRef::node(b, "color")).unwrap();
        graph.set_promoted_default(group, "Tint", &Value::Vector3([0.1, 0.2, 0.3])).unwrap();

        let port = graph.container(group).unwrap().port(PortDirection::Input, "Tint").unwrap();
        assert_eq!(port.bindings.len(), 2);
        assert_eq!(port.default, Some(Value::Color3([0.1, 0.2, 0.3])));
        assert_eq!(
            graph.socket_type(&SocketRef::container(group, "Tint"), PortDirection::Input),
            Some(SocketType::Color)
        );
    }

    #[test]
    fn test_scene_wiring_and_filters() {
        let mut graph = MemoryGraph::new();
        let materials = graph.create_container(graph.root(), "Materials").unwrap();
        let assign = graph.create_assignment(materials, "ShaderAssignment", TerminalRole::Surface).unwrap();

        graph.set_scene_input(SceneEnd::Node(assign), SceneEnd::ContainerIn(materials)).unwrap();
        graph.set_container_output(materials, SceneEnd::Node(assign)).unwrap();
        graph.add_filter_paths(assign, &["/root/Cube".to_string(), "/root/Cube".to_string()]).unwrap();

        let node = graph.node(assign).unwrap();
        assert_eq!(node.scene_input(), Some(SceneEnd::ContainerIn(materials)));
        assert_eq!(node.filter(), ["/root/Cube".to_string()]);
        assert_eq!(
            graph.container(materials).unwrap().scene_output,
            Some(SceneEnd::Node(assign))
        );
        assert!(graph
            .set_scene_input(SceneEnd::ContainerIn(materials), SceneEnd::Node(assign))
            .is_err());
    }
}
