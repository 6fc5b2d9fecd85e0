// SPDX-License-Identifier: MIT OR Apache-2.0
//! Node group translation.
//!
//! A nested network becomes a container. Links from the group input marker
//! promote the destination slot to a container input named after the group
//! socket's display label; links into the group output marker promote the
//! source slot to a container output. Nested groups recurse.

use crate::builder::{BuiltNode, GraphBuilder, LinkScope};
use crate::report::NetworkReport;
use crate::resolver::sanitize_identifier;
use crate::target::{ContainerId, TargetError, TargetGraph};
use shaderbridge_graph::{PortDirection, ShaderNetwork, ShaderNode};

/// Handle to a built group container
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupHandle {
    /// The container
    pub container: ContainerId,
    /// Promoted input names
    pub inputs: Vec<String>,
    /// Promoted output names
    pub outputs: Vec<String>,
}

impl<'a, G: TargetGraph> GraphBuilder<'a, G> {
    /// Build a nested network into a new container under `parent`
    pub fn build_group(
        &mut self,
        nested: &ShaderNetwork,
        parent: ContainerId,
        report: &mut NetworkReport,
    ) -> Result<GroupHandle, TargetError> {
        self.build_group_named(&nested.name, nested, parent, report)
    }

    fn build_group_named(
        &mut self,
        name: &str,
        nested: &ShaderNetwork,
        parent: ContainerId,
        report: &mut NetworkReport,
    ) -> Result<GroupHandle, TargetError> {
        let name = self.unique_name(parent, &sanitize_identifier(name))?;
        let container = self.target.create_container(parent, &name)?;

        let built = self.instantiate_nodes(nested, container, report)?;
        self.wire_links(nested, container, &built, LinkScope::Group, report)?;

        let handle = GroupHandle {
            container,
            inputs: self.target.promoted_ports(container, PortDirection::Input)?,
            outputs: self.target.promoted_ports(container, PortDirection::Output)?,
        };
        if handle.outputs.is_empty() {
            tracing::warn!("Group '{}' exposes no outputs", nested.name);
        }
        Ok(handle)
    }

    /// Build a group node: its nested network plus its input defaults
    pub(crate) fn build_group_node(
        &mut self,
        node: &ShaderNode,
        nested: &ShaderNetwork,
        parent: ContainerId,
        report: &mut NetworkReport,
    ) -> Result<BuiltNode<'a>, TargetError> {
        self.scope.push(node.id.clone());
        let built = self.build_group_named(&node.id, nested, parent, report);
        self.scope.pop();
        let handle = built?;

        let labels = nested.socket_labels().clone();
        self.apply_promoted_defaults(node, handle.container, &labels, &[], report);

        Ok(BuiltNode::Group {
            container: handle.container,
            labels,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TranslatorConfig;
    use crate::memory::MemoryGraph;
    use crate::target::SocketRef;
    use shaderbridge_graph::graphs::cycles::create_cycles_registry;
    use shaderbridge_graph::{Link, Value};

    /// Group with input `Tint` feeding two shaders mixed into one output
    fn tint_group() -> ShaderNetwork {
        let mut group = ShaderNetwork::new("TintGroup");
        group.add_node(ShaderNode::new("Group Input", "NodeGroupInput", "group_input"));
        group.add_node(ShaderNode::new("Group Output", "NodeGroupOutput", "group_output"));
        group.add_node(ShaderNode::new("Diffuse", "ShaderNodeBsdfDiffuse", "diffuse_bsdf"));
        group.add_node(ShaderNode::new("Emission", "ShaderNodeEmission", "emission"));
        group.add_node(ShaderNode::new("Add", "ShaderNodeAddShader", "add_shader"));
        group.add_link(Link::new("Group Input", "Socket_0", "Diffuse", "Color")).unwrap();
        group.add_link(Link::new("Group Input", "Socket_0", "Emission", "Color")).unwrap();
        group.add_link(Link::new("Diffuse", "BSDF", "Add", "Shader")).unwrap();
        group.add_link(Link::new("Emission", "Emission", "Add", "Shader_001")).unwrap();
        group.add_link(Link::new("Add", "Shader", "Group Output", "Socket_1")).unwrap();
        group.set_socket_label("Socket_0", "Tint Color");
        group.set_socket_label("Socket_1", "Shader");
        group
    }

    #[test]
    fn test_group_promotes_boundary() {
        let registry = create_cycles_registry();
        let config = TranslatorConfig::default();
        let mut graph = MemoryGraph::new();
        let root = graph.root();
        let mut report = NetworkReport::new("Mat");

        let handle = GraphBuilder::new(&mut graph, &registry, &config)
            .build_group(&tint_group(), root, &mut report)
            .unwrap();

        assert_eq!(handle.inputs, vec!["Tint_Color".to_string()]);
        assert_eq!(handle.outputs, vec!["Shader".to_string()]);
        assert!(!report.degraded, "{report:?}");

        let container = graph.container(handle.container).unwrap();
        let tint = container.port(PortDirection::Input, "Tint_Color").unwrap();
        assert_eq!(tint.bindings.len(), 2);
        let add = graph.node_named(handle.container, "Add").unwrap();
        assert_eq!(
            container.port(PortDirection::Output, "Shader").unwrap().bindings,
            vec![SocketRef::node(add.id, "closure")]
        );
    }

    #[test]
    fn test_group_node_in_material() {
        let registry = create_cycles_registry();
        let config = TranslatorConfig::default();
        let mut graph = MemoryGraph::new();
        let root = graph.root();

        let mut net = ShaderNetwork::new("Grouped");
        net.add_node(ShaderNode::new("Material Output", "ShaderNodeOutputMaterial", "material_output"));
        net.add_node(
            ShaderNode::new("Group", "ShaderNodeGroup", "group")
                .with_param("Socket_0", Value::Color3([0.2, 0.4, 0.6]))
                .with_nested(tint_group()),
        );
        net.add_link(Link::new("Group", "Socket_1", "Material Output", "Surface")).unwrap();

        let outcome = GraphBuilder::new(&mut graph, &registry, &config)
            .build(&net, root)
            .unwrap();
        assert!(!outcome.report.degraded, "{:?}", outcome.report);

        let group = graph.container_named(outcome.handle.container, "Group").unwrap();
        assert_eq!(
            group.port(PortDirection::Input, "Tint_Color").unwrap().default,
            Some(Value::Color3([0.2, 0.4, 0.6]))
        );
        let (_, assignment) = outcome.handle.stages[0];
        assert_eq!(
            graph.input_of(&SocketRef::node(assignment, "shader")),
            Some(&SocketRef::container(group.id, "Shader"))
        );
    }

    #[test]
    fn test_nested_groups_recurse() {
        let registry = create_cycles_registry();
        let config = TranslatorConfig::default();
        let mut graph = MemoryGraph::new();
        let root = graph.root();
        let mut report = NetworkReport::new("Mat");

        let mut outer = ShaderNetwork::new("Outer");
        outer.add_node(ShaderNode::new("Group Input", "NodeGroupInput", "group_input"));
        outer.add_node(ShaderNode::new("Group Output", "NodeGroupOutput", "group_output"));
        outer.add_node(ShaderNode::new("Inner", "ShaderNodeGroup", "group").with_nested(tint_group()));
        outer.add_node(ShaderNode::new("Script", "ShaderNodeScript", "unknown"));
        outer.add_link(Link::new("Group Input", "Socket_0", "Inner", "Socket_0")).unwrap();
        outer.add_link(Link::new("Inner", "Socket_1", "Group Output", "Socket_1")).unwrap();
        outer.set_socket_label("Socket_0", "Outer Tint");
        outer.set_socket_label("Socket_1", "Result");

        let handle = GraphBuilder::new(&mut graph, &registry, &config)
            .build_group(&outer, root, &mut report)
            .unwrap();

        assert_eq!(handle.inputs, vec!["Outer_Tint".to_string()]);
        assert_eq!(handle.outputs, vec!["Result".to_string()]);
        let inner = graph.container_named(handle.container, "Inner").unwrap();
        assert!(graph.container_named(inner.id, "Add").is_none());
        assert!(graph.node_named(inner.id, "Add").is_some());

        assert_eq!(report.unknown_nodes.len(), 1);
        assert_eq!(report.unknown_nodes[0].node, "Script");
        assert!(report.degraded);
    }
}
