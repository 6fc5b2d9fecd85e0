// SPDX-License-Identifier: MIT OR Apache-2.0
//! Graph builder.
//!
//! Builds one immutable [`ShaderNetwork`] into a [`TargetGraph`] container:
//!
//! ## Passes
//!
//! 1. Node pass: one target node per regular source node. Output and group
//!    boundary markers are skipped; unknown types are recorded and skipped.
//! 2. Link pass: links become connections. Links into the output marker
//!    become terminal stages. Mismatched socket types get an adapter node when
//!    one exists; otherwise the link is dropped.
//! 3. Terminal pass: one assignment node per stage, chained Surface, Volume,
//!    Displacement, wired between the container's scene input and output.
//!
//! A network without links becomes a flagged placeholder container.

use crate::config::TranslatorConfig;
use crate::params::{ParameterTranslator, SlotResolution};
use crate::report::{DropReason, NetworkReport};
use crate::resolver::{sanitize_identifier, NodeTypeResolver, ResolvedType};
use crate::special::NodeStrategy;
use crate::target::{
    ContainerId, SceneEnd, SocketRef, TargetError, TargetGraph, TargetNodeId, TerminalRole,
    ASSIGNMENT_SHADER_SLOT,
};
use indexmap::IndexMap;
use shaderbridge_graph::graphs::cycles::{converter_input_slot, converter_output_slot, converter_type_name};
use shaderbridge_graph::{Link, NodeRegistry, NodeRole, NodeSchema, Port, PortDirection, ShaderNetwork, ShaderNode, SocketType};

/// Handle to a network built into the target graph
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NetworkHandle {
    /// Container holding the network
    pub container: ContainerId,
    /// Assignment nodes in chain order
    pub stages: Vec<(TerminalRole, TargetNodeId)>,
    /// The network produced nothing and the container is a placeholder
    pub placeholder: bool,
}

impl NetworkHandle {
    /// Whether the network assigns anything
    pub fn has_stages(&self) -> bool {
        !self.stages.is_empty()
    }
}

/// Result of building one network
#[derive(Debug, Clone)]
pub struct BuildOutcome {
    /// Handle to the built container
    pub handle: NetworkHandle,
    /// Per-network report
    pub report: NetworkReport,
}

/// A source node as it exists in the target graph
#[derive(Debug, Clone)]
pub(crate) enum BuiltNode<'a> {
    /// A single shader node
    Shader {
        id: TargetNodeId,
        schema: &'a NodeSchema,
    },
    /// A container exposing promoted ports
    Group {
        container: ContainerId,
        labels: IndexMap<String, String>,
    },
}

/// Where a network's links live
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum LinkScope {
    /// Top level of a material
    Material,
    /// Inside a node group
    Group,
}

/// A link into the output marker
#[derive(Debug, Clone)]
pub(crate) struct Terminal {
    role: TerminalRole,
    socket: SocketRef,
    link: Link,
}

/// Builds shading networks into a target graph
pub struct GraphBuilder<'a, G: TargetGraph> {
    pub(crate) target: &'a mut G,
    pub(crate) registry: &'a NodeRegistry,
    pub(crate) config: &'a TranslatorConfig,
    /// Group node IDs above the node currently being built
    pub(crate) scope: Vec<String>,
}

impl<'a, G: TargetGraph> GraphBuilder<'a, G> {
    /// Create a builder writing into `target`
    pub fn new(target: &'a mut G, registry: &'a NodeRegistry, config: &'a TranslatorConfig) -> Self {
        Self {
            target,
            registry,
            config,
            scope: Vec::new(),
        }
    }

    /// The target graph being written
    pub fn target(&self) -> &G {
        &*self.target
    }

    /// Build a network into a new container under `parent`
    pub fn build(&mut self, network: &ShaderNetwork, parent: ContainerId) -> Result<BuildOutcome, TargetError> {
        let mut report = NetworkReport::new(network.name.clone());
        report.hash = Some(network.content_hash());

        let name = self.unique_name(parent, &sanitize_identifier(&network.name))?;
        let container = self.target.create_container(parent, &name)?;

        if network.link_count() == 0 {
            tracing::warn!("Network '{}' has no links, building a placeholder", network.name);
            self.target.mark_placeholder(container, "network has no links")?;
            self.target.set_container_output(container, SceneEnd::ContainerIn(container))?;
            report.empty = true;
            report.degraded = true;
            return Ok(BuildOutcome {
                handle: NetworkHandle {
                    container,
                    stages: Vec::new(),
                    placeholder: true,
                },
                report,
            });
        }

        let built = self.instantiate_nodes(network, container, &mut report)?;
        let terminals = self.wire_links(network, container, &built, LinkScope::Material, &mut report)?;
        let stages = self.build_assignment_chain(container, terminals, &mut report)?;

        if stages.is_empty() {
            tracing::warn!("Network '{}' has nothing connected to its output", network.name);
            report.degraded = true;
        }
        report.terminal_stages = stages.iter().map(|(role, _)| *role).collect();

        tracing::debug!(
            "Built network '{}': {} nodes, {} adapters, {} stages",
            network.name,
            report.nodes_built,
            report.converters_inserted,
            stages.len()
        );

        Ok(BuildOutcome {
            handle: NetworkHandle {
                container,
                stages,
                placeholder: false,
            },
            report,
        })
    }

    /// Add location paths to every assignment of a built network.
    ///
    /// Returns `false` when the network has no assignment to filter.
    pub fn register_locations(&mut self, handle: &NetworkHandle, paths: &[String]) -> Result<bool, TargetError> {
        for (_, assignment) in &handle.stages {
            self.target.add_filter_paths(*assignment, paths)?;
        }
        Ok(handle.has_stages())
    }

    /// A name not yet used by any child of `parent`, derived from `base`
    pub(crate) fn unique_name(&self, parent: ContainerId, base: &str) -> Result<String, TargetError> {
        let taken = self.target.child_names(parent)?;
        if !taken.iter().any(|n| n == base) {
            return Ok(base.to_string());
        }
        let mut index = 1;
        loop {
            let candidate = format!("{base}{index}");
            if !taken.iter().any(|n| *n == candidate) {
                return Ok(candidate);
            }
            index += 1;
        }
    }

    /// Node ID qualified by the enclosing group nodes
    pub(crate) fn qualify(&self, node_id: &str) -> String {
        if self.scope.is_empty() {
            node_id.to_string()
        } else {
            format!("{}/{}", self.scope.join("/"), node_id)
        }
    }

    /// Node pass: instantiate every regular node of a network
    pub(crate) fn instantiate_nodes(
        &mut self,
        network: &ShaderNetwork,
        container: ContainerId,
        report: &mut NetworkReport,
    ) -> Result<IndexMap<String, BuiltNode<'a>>, TargetError> {
        let mut built = IndexMap::new();

        for node in network.nodes() {
            if node.role.is_marker() {
                continue;
            }
            if let Some(nested) = &node.nested {
                let group = self.build_group_node(node, nested, container, report)?;
                built.insert(node.id.clone(), group);
                report.nodes_built += 1;
                continue;
            }

            let resolver = NodeTypeResolver::new(self.config);
            let ResolvedType::Known(type_id) = resolver.resolve_node(node) else {
                report.unknown_node(self.qualify(&node.id), &node.source_type, &node.resolved_type);
                continue;
            };

            let strategy = NodeStrategy::for_type(&type_id);
            if let NodeStrategy::ChannelCurves(layout) = strategy {
                let group = self.build_channel_curves(node, layout, container, report)?;
                built.insert(node.id.clone(), group);
                report.nodes_built += 1;
                continue;
            }

            let registry = self.registry;
            let Some(schema) = registry.get(&type_id) else {
                report.unknown_node(self.qualify(&node.id), &node.source_type, &type_id);
                continue;
            };

            let name = self.unique_name(container, &sanitize_identifier(&node.id))?;
            let id = self.target.create_shader(container, &name, schema)?;
            self.apply_strategy(strategy, node, id, schema, report)?;
            built.insert(node.id.clone(), BuiltNode::Shader { id, schema });
            report.nodes_built += 1;
        }

        Ok(built)
    }

    /// Apply the translated parameters of a node to its shader
    pub(crate) fn apply_params(
        &mut self,
        node: &ShaderNode,
        id: TargetNodeId,
        schema: &NodeSchema,
        structural: &[&str],
        report: &mut NetworkReport,
    ) {
        let translated = ParameterTranslator::new(self.config).translate(node, schema, structural);
        for (slot, value) in &translated.values {
            if let Err(e) = self.target.set_value(id, slot, value) {
                tracing::warn!("Failed to set {}.{}: {}", node.id, slot, e);
                report.unresolved_param(self.qualify(&node.id), slot, false);
            }
        }
        for param in &translated.unsupported {
            report.unsupported_param(self.qualify(&node.id), param);
        }
        for param in &translated.unresolved {
            report.unresolved_param(self.qualify(&node.id), param, false);
        }
    }

    /// Link pass. Returns the links into the output marker.
    pub(crate) fn wire_links(
        &mut self,
        network: &ShaderNetwork,
        container: ContainerId,
        built: &IndexMap<String, BuiltNode<'a>>,
        scope: LinkScope,
        report: &mut NetworkReport,
    ) -> Result<Vec<Terminal>, TargetError> {
        let mut terminals = Vec::new();

        for link in network.links() {
            let from_role = network.role_of(&link.from_node).unwrap_or_default();
            let to_role = network.role_of(&link.to_node).unwrap_or_default();

            // Links leaving an output marker carry nothing
            if matches!(from_role, NodeRole::Output | NodeRole::GroupOutput) {
                continue;
            }

            match (from_role, to_role, scope) {
                (NodeRole::Regular, NodeRole::Output, LinkScope::Material) => {
                    let Some(role) = TerminalRole::from_socket(&link.to_socket) else {
                        report.drop_link(link, DropReason::UnknownTerminal(link.to_socket.clone()));
                        continue;
                    };
                    if let Some((socket, _)) = self.source_socket(link, built, report) {
                        terminals.push(Terminal {
                            role,
                            socket,
                            link: link.clone(),
                        });
                    }
                }
                (NodeRole::GroupInput, NodeRole::GroupOutput, LinkScope::Group) => {
                    report.drop_link(link, DropReason::PassThrough);
                }
                (NodeRole::GroupInput, NodeRole::Regular, LinkScope::Group) => {
                    let Some((socket, _)) = self.destination_socket(link, built, report) else {
                        continue;
                    };
                    let name = sanitize_identifier(network.socket_label(&link.from_socket));
                    if let Err(e) = self.target.promote_input(container, &name, &socket) {
                        report.drop_link(link, DropReason::Rejected(e.to_string()));
                    }
                }
                (NodeRole::Regular, NodeRole::GroupOutput, LinkScope::Group) => {
                    let Some((socket, _)) = self.source_socket(link, built, report) else {
                        continue;
                    };
                    let name = sanitize_identifier(network.socket_label(&link.to_socket));
                    if let Err(e) = self.target.promote_output(container, &name, &socket) {
                        report.drop_link(link, DropReason::Rejected(e.to_string()));
                    }
                }
                (NodeRole::Regular, NodeRole::Regular, _) => {
                    let Some((from, from_type)) = self.source_socket(link, built, report) else {
                        continue;
                    };
                    let Some((to, to_type)) = self.destination_socket(link, built, report) else {
                        continue;
                    };
                    self.connect_typed(container, link, (&from, from_type), (&to, to_type), report)?;
                }
                (NodeRole::Regular, _, _) => {
                    report.drop_link(link, DropReason::MisplacedMarker(link.to_node.clone()));
                }
                _ => {
                    report.drop_link(link, DropReason::MisplacedMarker(link.from_node.clone()));
                }
            }
        }

        Ok(terminals)
    }

    fn source_socket(
        &self,
        link: &Link,
        built: &IndexMap<String, BuiltNode<'a>>,
        report: &mut NetworkReport,
    ) -> Option<(SocketRef, SocketType)> {
        self.endpoint(&link.from_node, &link.from_socket, PortDirection::Output, link, built, report)
    }

    fn destination_socket(
        &self,
        link: &Link,
        built: &IndexMap<String, BuiltNode<'a>>,
        report: &mut NetworkReport,
    ) -> Option<(SocketRef, SocketType)> {
        self.endpoint(&link.to_node, &link.to_socket, PortDirection::Input, link, built, report)
    }

    fn endpoint(
        &self,
        node_id: &str,
        socket: &str,
        direction: PortDirection,
        link: &Link,
        built: &IndexMap<String, BuiltNode<'a>>,
        report: &mut NetworkReport,
    ) -> Option<(SocketRef, SocketType)> {
        let Some(node) = built.get(node_id) else {
            report.drop_link(link, DropReason::MissingEndpoint(node_id.to_string()));
            return None;
        };
        let resolved = self.resolve_socket(node, socket, direction);
        if resolved.is_none() {
            report.drop_link(link, DropReason::UnresolvedSocket(format!("{node_id}.{socket}")));
        }
        resolved
    }

    /// Resolve a source socket label on a built node
    pub(crate) fn resolve_socket(
        &self,
        node: &BuiltNode<'a>,
        label: &str,
        direction: PortDirection,
    ) -> Option<(SocketRef, SocketType)> {
        match node {
            BuiltNode::Shader { id, schema } => {
                let slots = match direction {
                    PortDirection::Input => &schema.inputs,
                    PortDirection::Output => &schema.outputs,
                };
                let translator = ParameterTranslator::new(self.config);
                match translator.resolve_slot(label, slots, &schema.id, direction) {
                    SlotResolution::Slot(slot) => {
                        let socket = SocketRef::node(*id, slot);
                        let socket_type = self.target.socket_type(&socket, direction)?;
                        Some((socket, socket_type))
                    }
                    SlotResolution::Unsupported | SlotResolution::Unresolved => None,
                }
            }
            BuiltNode::Group { container, labels } => {
                let label = labels.get(label).map_or(label, String::as_str);
                self.resolve_promoted(*container, label, direction)
            }
        }
    }

    /// Resolve a label against the promoted ports of a container
    pub(crate) fn resolve_promoted(
        &self,
        container: ContainerId,
        label: &str,
        direction: PortDirection,
    ) -> Option<(SocketRef, SocketType)> {
        let names = self.target.promoted_ports(container, direction).ok()?;
        let typed = |name: &str| {
            let socket = SocketRef::container(container, name);
            let socket_type = self.target.socket_type(&socket, direction)?;
            Some((socket, socket_type))
        };

        let exact = sanitize_identifier(label);
        if names.contains(&exact) {
            return typed(&exact);
        }

        let ports: Vec<Port> = names
            .iter()
            .filter_map(|name| {
                let (_, socket_type) = typed(name)?;
                Some(match direction {
                    PortDirection::Input => Port::input(name.clone(), socket_type),
                    PortDirection::Output => Port::output(name.clone(), socket_type),
                })
            })
            .collect();
        match ParameterTranslator::new(self.config).resolve_slot(label, &ports, "", direction) {
            SlotResolution::Slot(name) => typed(&name),
            SlotResolution::Unsupported | SlotResolution::Unresolved => None,
        }
    }

    /// Connect two sockets, inserting an adapter node when their types differ
    fn connect_typed(
        &mut self,
        container: ContainerId,
        link: &Link,
        (from, from_type): (&SocketRef, SocketType),
        (to, to_type): (&SocketRef, SocketType),
        report: &mut NetworkReport,
    ) -> Result<(), TargetError> {
        if from_type.links_directly_to(&to_type) {
            if let Err(e) = self.target.connect(from, to) {
                report.drop_link(link, DropReason::Rejected(e.to_string()));
            }
            return Ok(());
        }

        let registry = self.registry;
        let adapter = converter_type_name(from_type, to_type).and_then(|name| registry.get(&name));
        let (Some(schema), Some(from_kind), Some(to_kind)) =
            (adapter, from_type.converter_kind(), to_type.converter_kind())
        else {
            report.drop_link(
                link,
                DropReason::IncompatibleTypes {
                    from: from_type,
                    to: to_type,
                },
            );
            return Ok(());
        };

        let base = format!(
            "{}_to_{}_converter",
            sanitize_identifier(&link.from_node),
            sanitize_identifier(&link.to_node)
        );
        let name = self.unique_name(container, &base)?;
        let converter = self.target.create_shader(container, &name, schema)?;
        let converter_in = SocketRef::node(converter, converter_input_slot(from_kind));
        let converter_out = SocketRef::node(converter, converter_output_slot(to_kind));

        let connected = self
            .target
            .connect(from, &converter_in)
            .and_then(|()| self.target.connect(&converter_out, to));
        match connected {
            Ok(()) => {
                tracing::debug!("Inserted {} on link {}", schema.id, link);
                report.converters_inserted += 1;
            }
            Err(e) => report.drop_link(link, DropReason::Rejected(e.to_string())),
        }
        Ok(())
    }

    /// Terminal pass: one assignment per stage, chained in stage order
    fn build_assignment_chain(
        &mut self,
        container: ContainerId,
        mut terminals: Vec<Terminal>,
        report: &mut NetworkReport,
    ) -> Result<Vec<(TerminalRole, TargetNodeId)>, TargetError> {
        terminals.sort_by_key(|t| t.role);

        let mut stages: Vec<(TerminalRole, TargetNodeId)> = Vec::new();
        let mut upstream = SceneEnd::ContainerIn(container);

        for terminal in terminals {
            if stages.iter().any(|(role, _)| *role == terminal.role) {
                report.drop_link(&terminal.link, DropReason::DuplicateTerminal(terminal.role));
                continue;
            }

            let name = self.unique_name(container, &format!("{}_assignment", terminal.role))?;
            let assignment = self.target.create_assignment(container, &name, terminal.role)?;
            let shader_slot = SocketRef::node(assignment, ASSIGNMENT_SHADER_SLOT);
            if let Err(e) = self.target.connect(&terminal.socket, &shader_slot) {
                report.drop_link(&terminal.link, DropReason::Rejected(e.to_string()));
            }
            self.target.set_scene_input(SceneEnd::Node(assignment), upstream)?;
            upstream = SceneEnd::Node(assignment);
            stages.push((terminal.role, assignment));
        }

        self.target.set_container_output(container, upstream)?;
        Ok(stages)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MemoryGraph;
    use shaderbridge_graph::graphs::cycles::create_cycles_registry;
    use shaderbridge_graph::Value;

    fn build(network: &ShaderNetwork) -> (MemoryGraph, BuildOutcome) {
        let registry = create_cycles_registry();
        let config = TranslatorConfig::default();
        let mut graph = MemoryGraph::new();
        let root = graph.root();
        let outcome = GraphBuilder::new(&mut graph, &registry, &config)
            .build(network, root)
            .unwrap();
        (graph, outcome)
    }

    fn output() -> ShaderNode {
        ShaderNode::new("Material Output", "ShaderNodeOutputMaterial", "material_output")
    }

    #[test]
    fn test_simple_chain() {
        let mut net = ShaderNetwork::new("Red Plastic");
        net.add_node(output());
        net.add_node(
            ShaderNode::new("Principled BSDF", "ShaderNodeBsdfPrincipled", "principled_bsdf")
                .with_param("Base Color", Value::Color3([0.8, 0.1, 0.1]))
                .with_param("Weight", Value::Float(1.0)),
        );
        net.add_link(Link::new("Principled BSDF", "BSDF", "Material Output", "Surface")).unwrap();

        let (graph, outcome) = build(&net);
        assert!(!outcome.report.degraded);
        assert_eq!(outcome.report.nodes_built, 1);
        assert_eq!(outcome.report.terminal_stages, vec![TerminalRole::Surface]);
        assert_eq!(outcome.report.unsupported_params.len(), 1);

        let container = graph.container(outcome.handle.container).unwrap();
        assert_eq!(container.name, "Red_Plastic");
        let bsdf = graph.node_named(container.id, "Principled_BSDF").unwrap();
        assert_eq!(bsdf.value("base_color"), Some(&Value::Color3([0.8, 0.1, 0.1])));

        let (_, assignment) = outcome.handle.stages[0];
        assert_eq!(
            graph.input_of(&SocketRef::node(assignment, ASSIGNMENT_SHADER_SLOT)),
            Some(&SocketRef::node(bsdf.id, "bsdf"))
        );
        assert_eq!(container.scene_output, Some(SceneEnd::Node(assignment)));
    }

    #[test]
    fn test_adapter_inserted_for_mismatched_types() {
        let mut net = ShaderNetwork::new("Mat");
        net.add_node(output());
        net.add_node(ShaderNode::new("Noise", "ShaderNodeTexNoise", "noise_texture"));
        net.add_node(ShaderNode::new("Diffuse", "ShaderNodeBsdfDiffuse", "diffuse_bsdf"));
        net.add_link(Link::new("Noise", "Fac", "Diffuse", "Color")).unwrap();
        net.add_link(Link::new("Diffuse", "BSDF", "Material Output", "Surface")).unwrap();

        let (graph, outcome) = build(&net);
        assert!(!outcome.report.degraded);
        assert_eq!(outcome.report.converters_inserted, 1);

        let container = outcome.handle.container;
        let converter = graph.node_named(container, "Noise_to_Diffuse_converter").unwrap();
        assert_eq!(converter.shader_type(), Some("convert_float_to_color"));
        let diffuse = graph.node_named(container, "Diffuse").unwrap();
        assert_eq!(
            graph.input_of(&SocketRef::node(diffuse.id, "color")),
            Some(&SocketRef::node(converter.id, "value_color"))
        );
    }

    #[test]
    fn test_incompatible_link_is_dropped() {
        let mut net = ShaderNetwork::new("Mat");
        net.add_node(output());
        net.add_node(ShaderNode::new("Emission", "ShaderNodeEmission", "emission"));
        net.add_node(ShaderNode::new("Diffuse", "ShaderNodeBsdfDiffuse", "diffuse_bsdf"));
        net.add_link(Link::new("Emission", "Emission", "Diffuse", "Color")).unwrap();
        net.add_link(Link::new("Diffuse", "BSDF", "Material Output", "Surface")).unwrap();

        let (_, outcome) = build(&net);
        assert!(outcome.report.degraded);
        assert_eq!(outcome.report.dropped_links.len(), 1);
        assert!(matches!(
            outcome.report.dropped_links[0].reason,
            DropReason::IncompatibleTypes {
                from: SocketType::Closure,
                to: SocketType::Color
            }
        ));
        assert_eq!(outcome.report.nodes_built, 2);
    }

    #[test]
    fn test_unresolved_socket_is_dropped() {
        let mut net = ShaderNetwork::new("Mat");
        net.add_node(output());
        net.add_node(ShaderNode::new("Noise", "ShaderNodeTexNoise", "noise_texture"));
        net.add_node(ShaderNode::new("Diffuse", "ShaderNodeBsdfDiffuse", "diffuse_bsdf"));
        net.add_link(Link::new("Noise", "Sparkle", "Diffuse", "Color")).unwrap();
        net.add_link(Link::new("Diffuse", "BSDF", "Material Output", "Surface")).unwrap();

        let (graph, outcome) = build(&net);
        assert!(outcome.report.degraded);
        assert_eq!(outcome.report.nodes_built, 2);
        assert_eq!(outcome.report.dropped_links.len(), 1);
        assert!(matches!(
            outcome.report.dropped_links[0].reason,
            DropReason::UnresolvedSocket(ref socket) if socket == "Noise.Sparkle"
        ));

        let diffuse = graph.node_named(outcome.handle.container, "Diffuse").unwrap();
        assert_eq!(graph.input_of(&SocketRef::node(diffuse.id, "color")), None);
        assert_eq!(outcome.handle.stages.len(), 1);
    }

    #[test]
    fn test_duplicate_terminal_is_dropped() {
        let mut net = ShaderNetwork::new("Mat");
        net.add_node(output());
        net.add_node(ShaderNode::new("First", "ShaderNodeBsdfDiffuse", "diffuse_bsdf"));
        net.add_node(ShaderNode::new("Second", "ShaderNodeBsdfDiffuse", "diffuse_bsdf"));
        net.add_link(Link::new("First", "BSDF", "Material Output", "Surface")).unwrap();
        net.add_link(Link::new("Second", "BSDF", "Material Output", "Surface")).unwrap();

        let (graph, outcome) = build(&net);
        assert!(outcome.report.degraded);
        assert_eq!(outcome.report.terminal_stages, vec![TerminalRole::Surface]);
        assert_eq!(outcome.report.dropped_links.len(), 1);
        let dropped = &outcome.report.dropped_links[0];
        assert_eq!(dropped.link.from_node, "Second");
        assert!(matches!(dropped.reason, DropReason::DuplicateTerminal(TerminalRole::Surface)));

        let first = graph.node_named(outcome.handle.container, "First").unwrap();
        let (_, assignment) = outcome.handle.stages[0];
        assert_eq!(
            graph.input_of(&SocketRef::node(assignment, ASSIGNMENT_SHADER_SLOT)),
            Some(&SocketRef::node(first.id, "bsdf"))
        );
    }

    #[test]
    fn test_unknown_terminal_is_dropped() {
        let mut net = ShaderNetwork::new("Mat");
        net.add_node(output());
        net.add_node(ShaderNode::new("Diffuse", "ShaderNodeBsdfDiffuse", "diffuse_bsdf"));
        net.add_node(ShaderNode::new("Value", "ShaderNodeValue", "value"));
        net.add_link(Link::new("Diffuse", "BSDF", "Material Output", "Surface")).unwrap();
        net.add_link(Link::new("Value", "Value", "Material Output", "Thickness")).unwrap();

        let (_, outcome) = build(&net);
        assert!(outcome.report.degraded);
        assert_eq!(outcome.report.terminal_stages, vec![TerminalRole::Surface]);
        assert_eq!(outcome.report.dropped_links.len(), 1);
        assert!(matches!(
            outcome.report.dropped_links[0].reason,
            DropReason::UnknownTerminal(ref socket) if socket == "Thickness"
        ));
    }

    #[test]
    fn test_empty_network_becomes_placeholder() {
        let mut net = ShaderNetwork::new("Empty");
        net.add_node(output());

        let (graph, outcome) = build(&net);
        assert!(outcome.handle.placeholder);
        assert!(outcome.report.empty);
        assert!(outcome.report.degraded);
        let container = graph.container(outcome.handle.container).unwrap();
        assert!(container.is_placeholder());
        assert_eq!(graph.nodes_in(container.id).count(), 0);
    }

    #[test]
    fn test_unknown_node_is_skipped() {
        let mut net = ShaderNetwork::new("Mat");
        net.add_node(output());
        net.add_node(ShaderNode::new("Script", "ShaderNodeScript", "unknown"));
        net.add_node(ShaderNode::new("Diffuse", "ShaderNodeBsdfDiffuse", "diffuse_bsdf"));
        net.add_link(Link::new("Script", "Color", "Diffuse", "Color")).unwrap();
        net.add_link(Link::new("Diffuse", "BSDF", "Material Output", "Surface")).unwrap();

        let (_, outcome) = build(&net);
        assert!(outcome.report.degraded);
        assert_eq!(outcome.report.unknown_nodes.len(), 1);
        assert!(matches!(
            outcome.report.dropped_links[0].reason,
            DropReason::MissingEndpoint(ref node) if node == "Script"
        ));
        assert_eq!(outcome.handle.stages.len(), 1);
    }

    #[test]
    fn test_terminal_stages_are_ordered() {
        let mut net = ShaderNetwork::new("Layered");
        net.add_node(output());
        net.add_node(ShaderNode::new("Displace", "ShaderNodeDisplacement", "displacement"));
        net.add_node(ShaderNode::new("Volume", "ShaderNodeVolumePrincipled", "principled_volume"));
        net.add_node(ShaderNode::new("Surface", "ShaderNodeBsdfDiffuse", "diffuse_bsdf"));
        net.add_link(Link::new("Displace", "Displacement", "Material Output", "Displacement")).unwrap();
        net.add_link(Link::new("Volume", "Volume", "Material Output", "Volume")).unwrap();
        net.add_link(Link::new("Surface", "BSDF", "Material Output", "Surface")).unwrap();

        let (graph, outcome) = build(&net);
        assert_eq!(
            outcome.report.terminal_stages,
            vec![TerminalRole::Surface, TerminalRole::Volume, TerminalRole::Displacement]
        );
        let [(_, surface), (_, volume), (_, displacement)] = outcome.handle.stages[..] else {
            panic!("expected three stages");
        };
        let container = outcome.handle.container;
        assert_eq!(graph.node(surface).unwrap().scene_input(), Some(SceneEnd::ContainerIn(container)));
        assert_eq!(graph.node(volume).unwrap().scene_input(), Some(SceneEnd::Node(surface)));
        assert_eq!(graph.node(displacement).unwrap().scene_input(), Some(SceneEnd::Node(volume)));
        assert_eq!(graph.container(container).unwrap().scene_output, Some(SceneEnd::Node(displacement)));
    }

    #[test]
    fn test_unique_names() {
        let registry = create_cycles_registry();
        let config = TranslatorConfig::default();
        let mut graph = MemoryGraph::new();
        let root = graph.root();
        let mut builder = GraphBuilder::new(&mut graph, &registry, &config);

        let mut net = ShaderNetwork::new("Mat");
        net.add_node(output());
        net.add_node(ShaderNode::new("Diffuse", "ShaderNodeBsdfDiffuse", "diffuse_bsdf"));
        net.add_link(Link::new("Diffuse", "BSDF", "Material Output", "Surface")).unwrap();

        let first = builder.build(&net, root).unwrap();
        let second = builder.build(&net, root).unwrap();
        assert_ne!(first.handle.container, second.handle.container);
        assert_eq!(builder.target().container(second.handle.container).unwrap().name, "Mat1");
    }
}
