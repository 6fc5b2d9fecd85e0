// SPDX-License-Identifier: MIT OR Apache-2.0
//! End-to-end translation scenarios through the public API.

use serde_json::json;
use shaderbridge_graph::graphs::cycles::create_cycles_registry;
use shaderbridge_graph::{HandleType, Link, PortDirection, SceneDocument, ShaderNetwork, ShaderNode, Value};
use shaderbridge_translate::{
    export_scene_to_document, import_document_into_graph, BuildOutcome, DropReason, ExportOptions, GraphBuilder,
    ImportResult, MemoryGraph, SceneEnd, SocketRef, SourceMaterial, SourceNode, SourceObject, SourceObjectType,
    SourceScene, SourceTree, TargetGraph, TerminalRole, TranslatorConfig,
};

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

fn diffuse(id: &str) -> ShaderNode {
    ShaderNode::new(id, "ShaderNodeBsdfDiffuse", "diffuse_bsdf")
}

fn import(text: &str) -> (MemoryGraph, ImportResult) {
    let config = TranslatorConfig::default();
    let document = SceneDocument::from_json_str(text).unwrap();
    let mut graph = MemoryGraph::new();
    let root = graph.root();
    let result = import_document_into_graph(&document, &mut graph, root, &config).unwrap();
    (graph, result)
}

#[test]
fn test_single_shader_material() {
    let mut net = ShaderNetwork::new("Plain");
    net.add_node(output());
    net.add_node(diffuse("Diffuse").with_param("Color", Value::Color3([0.2, 0.3, 0.4])));
    net.add_link(Link::new("Diffuse", "BSDF", "Material Output", "Surface")).unwrap();

    let (graph, outcome) = build(&net);
    assert!(!outcome.report.degraded, "{:?}", outcome.report);
    assert_eq!(outcome.report.nodes_built, 1);
    assert_eq!(outcome.report.converters_inserted, 0);
    assert_eq!(outcome.handle.stages.len(), 1);

    let container = outcome.handle.container;
    let shaders: Vec<_> = graph.nodes_in(container).filter(|n| n.shader_type().is_some()).collect();
    assert_eq!(shaders.len(), 1);
    assert_eq!(shaders[0].value("color"), Some(&Value::Color3([0.2, 0.3, 0.4])));
}

#[test]
fn test_closure_into_color_is_dropped_but_nodes_survive() {
    let mut net = ShaderNetwork::new("Glow");
    net.add_node(output());
    net.add_node(ShaderNode::new("Emission", "ShaderNodeEmission", "emission"));
    net.add_node(diffuse("Diffuse"));
    net.add_link(Link::new("Emission", "Emission", "Diffuse", "Color")).unwrap();
    net.add_link(Link::new("Diffuse", "BSDF", "Material Output", "Surface")).unwrap();

    let (graph, outcome) = build(&net);
    assert!(outcome.report.degraded);
    assert_eq!(outcome.report.nodes_built, 2);
    assert_eq!(outcome.report.dropped_links.len(), 1);
    assert!(matches!(outcome.report.dropped_links[0].reason, DropReason::IncompatibleTypes { .. }));

    let container = outcome.handle.container;
    assert!(graph.node_named(container, "Emission").is_some());
    let diffuse = graph.node_named(container, "Diffuse").unwrap();
    assert_eq!(graph.input_of(&SocketRef::node(diffuse.id, "color")), None);
    assert_eq!(outcome.handle.stages.len(), 1);
}

const SHARED: &str = r#"{
    "materials": {
        "Red": {
            "nodes": {
                "Material Output": {"type": "ShaderNodeOutputMaterial", "cycles_type": "material_output"},
                "BSDF": {"type": "ShaderNodeBsdfDiffuse", "cycles_type": "diffuse_bsdf", "params": {"Color": [1.0, 0.0, 0.0, 1.0]}}
            },
            "links": [{"from_node": "BSDF", "from_socket": "BSDF", "to_node": "Material Output", "to_socket": "Surface"}]
        },
        "Red.001": {
            "nodes": {
                "BSDF": {"type": "ShaderNodeBsdfDiffuse", "cycles_type": "diffuse_bsdf", "params": {"Color": [1.0, 0.0, 0.0, 1.0]}},
                "Material Output": {"type": "ShaderNodeOutputMaterial", "cycles_type": "material_output"}
            },
            "links": [{"from_node": "BSDF", "from_socket": "BSDF", "to_node": "Material Output", "to_socket": "Surface"}]
        }
    },
    "hierarchy": {
        "Cube": {"path": "/root/Cube/Cube", "mat_by_index": {"0": "Red"}, "has_multiple_mat": false},
        "Sphere": {"path": "/root/Sphere/Sphere", "mat_by_index": {"0": "Red.001"}, "has_multiple_mat": false}
    }
}"#;

#[test]
fn test_identical_networks_share_one_container() {
    let (graph, result) = import(SHARED);

    assert_eq!(result.report.dedup_hits, 1);
    assert_eq!(result.report.networks.len(), 1);
    assert_eq!(result.handles.len(), 1);

    let built: Vec<_> = graph
        .containers_in(result.materials_box)
        .filter(|c| c.id != result.fallback.container)
        .collect();
    assert_eq!(built.len(), 1);

    let handle = result.handles.values().next().unwrap();
    let (_, assignment) = handle.stages[0];
    assert_eq!(
        graph.node(assignment).unwrap().filter(),
        ["/root/Cube/Cube".to_string(), "/root/Sphere/Sphere".to_string()]
    );
    assert!(result.report.fallback_locations.is_empty());
}

#[test]
fn test_linkless_network_is_placeholder() {
    let mut net = ShaderNetwork::new("Bare");
    net.add_node(output());
    net.add_node(diffuse("Diffuse"));

    let (graph, outcome) = build(&net);
    assert!(outcome.handle.placeholder);
    assert!(!outcome.handle.has_stages());
    let container = graph.container(outcome.handle.container).unwrap();
    assert!(container.is_placeholder());
    assert_eq!(container.scene_output, Some(SceneEnd::ContainerIn(container.id)));
}

const CURVE: &str = r#"{
    "Curvy": {
        "nodes": {
            "Material Output": {"type": "ShaderNodeOutputMaterial", "cycles_type": "material_output"},
            "Float Curve": {
                "type": "ShaderNodeFloatCurve",
                "cycles_type": "float_curve",
                "params": {
                    "curve": [[0.0, 0.0, "AUTO"], [0.3, 0.8, "VECTOR"], [0.7, 0.2, "AUTO"], [1.0, 1.0, "AUTO"]],
                    "Factor": 0.5
                }
            },
            "Diffuse": {"type": "ShaderNodeBsdfDiffuse", "cycles_type": "diffuse_bsdf"}
        },
        "links": [
            {"from_node": "Float Curve", "from_socket": "Value", "to_node": "Diffuse", "to_socket": "Roughness"},
            {"from_node": "Diffuse", "from_socket": "BSDF", "to_node": "Material Output", "to_socket": "Surface"}
        ]
    }
}"#;

#[test]
fn test_float_curve_keeps_point_order() {
    let (graph, result) = import(CURVE);
    let container = result.handles["Curvy"].container;
    let curve = graph.node_named(container, "Float_Curve").unwrap();

    let Some(Value::Curve(points)) = curve.value("curve") else {
        panic!("curve not written");
    };
    let coords: Vec<(f32, f32)> = points.iter().map(|p| (p.x, p.y)).collect();
    assert_eq!(coords, vec![(0.0, 0.0), (0.3, 0.8), (0.7, 0.2), (1.0, 1.0)]);
    assert!(points.iter().all(|p| p.handle == HandleType::Auto));
    assert_eq!(curve.value("fac"), Some(&Value::Float(0.5)));

    let diffuse = graph.node_named(container, "Diffuse").unwrap();
    assert_eq!(
        graph.input_of(&SocketRef::node(diffuse.id, "roughness")),
        Some(&SocketRef::node(curve.id, "value"))
    );
}

const GROUPED: &str = r#"{
    "Grouped": {
        "nodes": {
            "Material Output": {"type": "ShaderNodeOutputMaterial", "cycles_type": "material_output"},
            "Group": {
                "type": "ShaderNodeGroup",
                "cycles_type": "group",
                "params": {"Socket_0": [0.1, 0.2, 0.3, 1.0]},
                "group": {
                    "Tinted": {
                        "nodes": {
                            "Group Input": {"type": "NodeGroupInput", "cycles_type": "group_input"},
                            "Inner": {"type": "ShaderNodeBsdfDiffuse", "cycles_type": "diffuse_bsdf"},
                            "Group Output": {"type": "NodeGroupOutput", "cycles_type": "group_output"}
                        },
                        "links": [
                            {"from_node": "Group Input", "from_socket": "Socket_0", "to_node": "Inner", "to_socket": "Color"},
                            {"from_node": "Inner", "from_socket": "BSDF", "to_node": "Group Output", "to_socket": "Socket_1"}
                        ],
                        "socket_map": {"Socket_0": "Base Tint", "Socket_1": "Shader"}
                    }
                }
            }
        },
        "links": [{"from_node": "Group", "from_socket": "Socket_1", "to_node": "Material Output", "to_socket": "Surface"}]
    }
}"#;

#[test]
fn test_group_exposes_labelled_ports() {
    let (graph, result) = import(GROUPED);
    let report = result.report.network("Grouped").unwrap();
    assert!(!report.degraded, "{report:?}");

    let handle = &result.handles["Grouped"];
    let group = graph.container_named(handle.container, "Group").unwrap();
    assert_eq!(group.inputs.len(), 1);
    assert_eq!(group.outputs.len(), 1);

    let tint = group.port(PortDirection::Input, "Base_Tint").unwrap();
    assert_eq!(tint.default, Some(Value::Color3([0.1, 0.2, 0.3])));
    let inner = graph.node_named(group.id, "Inner").unwrap();
    assert_eq!(tint.bindings, vec![SocketRef::node(inner.id, "color")]);
    assert_eq!(
        group.port(PortDirection::Output, "Shader").unwrap().bindings,
        vec![SocketRef::node(inner.id, "bsdf")]
    );

    let (_, assignment) = handle.stages[0];
    assert_eq!(
        graph.input_of(&SocketRef::node(assignment, "shader")),
        Some(&SocketRef::container(group.id, "Shader"))
    );
}

#[test]
fn test_compatible_network_builds_every_node_and_link() {
    let mut net = ShaderNetwork::new("Chain");
    net.add_node(output());
    net.add_node(ShaderNode::new("Noise", "ShaderNodeTexNoise", "noise_texture"));
    net.add_node(diffuse("Diffuse"));
    net.add_node(ShaderNode::new("Emission", "ShaderNodeEmission", "emission"));
    net.add_node(ShaderNode::new("Add", "ShaderNodeAddShader", "add_shader"));
    net.add_link(Link::new("Noise", "Color", "Diffuse", "Color")).unwrap();
    net.add_link(Link::new("Noise", "Color", "Emission", "Color")).unwrap();
    net.add_link(Link::new("Diffuse", "BSDF", "Add", "Shader")).unwrap();
    net.add_link(Link::new("Emission", "Emission", "Add", "Shader_001")).unwrap();
    net.add_link(Link::new("Add", "Shader", "Material Output", "Surface")).unwrap();

    let (graph, outcome) = build(&net);
    assert!(!outcome.report.degraded, "{:?}", outcome.report);
    assert!(outcome.report.dropped_links.is_empty());
    assert_eq!(outcome.report.nodes_built, net.node_count() - 1);

    let container = outcome.handle.container;
    let shaders = graph.nodes_in(container).filter(|n| n.shader_type().is_some()).count();
    assert_eq!(shaders, net.node_count() - 1);
    assert_eq!(graph.connections().len(), net.link_count());
}

#[test]
fn test_hash_ignores_insertion_order() {
    let mut a = ShaderNetwork::new("A");
    a.add_node(output());
    a.add_node(diffuse("Diffuse").with_param("Roughness", Value::Float(0.5)));
    a.add_node(ShaderNode::new("Noise", "ShaderNodeTexNoise", "noise_texture"));
    a.add_link(Link::new("Noise", "Fac", "Diffuse", "Roughness")).unwrap();
    a.add_link(Link::new("Diffuse", "BSDF", "Material Output", "Surface")).unwrap();

    let mut b = ShaderNetwork::new("B");
    b.add_node(ShaderNode::new("Noise", "ShaderNodeTexNoise", "noise_texture"));
    b.add_node(diffuse("Diffuse").with_param("Roughness", Value::Float(0.5)));
    b.add_node(output());
    b.add_link(Link::new("Diffuse", "BSDF", "Material Output", "Surface")).unwrap();
    b.add_link(Link::new("Noise", "Fac", "Diffuse", "Roughness")).unwrap();

    assert_eq!(a.content_hash(), b.content_hash());

    let mut c = ShaderNetwork::new("A");
    c.add_node(output());
    c.add_node(diffuse("Diffuse").with_param("Roughness", Value::Float(0.25)));
    c.add_node(ShaderNode::new("Noise", "ShaderNodeTexNoise", "noise_texture"));
    c.add_link(Link::new("Noise", "Fac", "Diffuse", "Roughness")).unwrap();
    c.add_link(Link::new("Diffuse", "BSDF", "Material Output", "Surface")).unwrap();

    assert_ne!(a.content_hash(), c.content_hash());
}

#[test]
fn test_stage_order_ignores_link_order() {
    let mut net = ShaderNetwork::new("Stages");
    net.add_node(output());
    net.add_node(ShaderNode::new("Volume", "ShaderNodeVolumePrincipled", "principled_volume"));
    net.add_node(diffuse("Surface"));
    net.add_link(Link::new("Volume", "Volume", "Material Output", "Volume")).unwrap();
    net.add_link(Link::new("Surface", "BSDF", "Material Output", "Surface")).unwrap();

    let (graph, outcome) = build(&net);
    assert_eq!(outcome.report.terminal_stages, vec![TerminalRole::Surface, TerminalRole::Volume]);
    let [(_, surface), (_, volume)] = outcome.handle.stages[..] else {
        panic!("expected two stages");
    };
    assert_eq!(graph.node(volume).unwrap().scene_input(), Some(SceneEnd::Node(surface)));
}

fn source_scene() -> SourceScene {
    let output = SourceNode::new("ShaderNodeOutputMaterial")
        .active()
        .with_input("Surface", "Surface", None)
        .with_input("Volume", "Volume", None)
        .with_input("Displacement", "Displacement", None);
    let diffuse = SourceNode::new("ShaderNodeBsdfDiffuse")
        .with_input("Color", "Color", Some(json!([0.1, 0.6, 0.2, 1.0])))
        .with_input("Roughness", "Roughness", Some(json!(0.5)))
        .with_output("BSDF", "BSDF", None);

    let mut scene = SourceScene::default();
    scene.materials.insert(
        "Leaf".to_string(),
        SourceMaterial {
            use_nodes: true,
            tree: SourceTree {
                nodes: [("Material Output".to_string(), output), ("Diffuse".to_string(), diffuse)]
                    .into_iter()
                    .collect(),
                links: vec![Link::new("Diffuse", "BSDF", "Material Output", "Surface")],
            },
        },
    );
    scene.objects.insert("Tree".to_string(), SourceObject::default());
    scene.objects.insert(
        "Bush".to_string(),
        SourceObject {
            parent: Some("Tree".to_string()),
            object_type: SourceObjectType::Mesh,
            data_name: Some("BushMesh".to_string()),
            material_slots: vec![Some("Leaf".to_string())],
            selected: true,
        },
    );
    scene.objects.insert(
        "Rock".to_string(),
        SourceObject {
            object_type: SourceObjectType::Mesh,
            data_name: Some("RockMesh".to_string()),
            material_slots: vec![None],
            ..SourceObject::default()
        },
    );
    scene
}

#[test]
fn test_export_then_import() {
    let config = TranslatorConfig::default();
    let options = ExportOptions::from_config(&config);
    let exported = export_scene_to_document(&source_scene(), &options, &config);

    assert_eq!(exported.hierarchy["Bush"].path, "/root/Tree/Bush/BushMesh");
    assert!(exported.hierarchy["Rock"].mat_by_index.is_empty());

    let text = exported.to_json_string().unwrap();
    let document = SceneDocument::from_json_str(&text).unwrap();
    assert_eq!(document, exported);

    let mut graph = MemoryGraph::new();
    let root = graph.root();
    let result = import_document_into_graph(&document, &mut graph, root, &config).unwrap();

    let handle = &result.handles["Leaf"];
    let (_, assignment) = handle.stages[0];
    assert_eq!(
        graph.node(assignment).unwrap().filter(),
        ["/root/Tree/Bush/BushMesh".to_string()]
    );
    let diffuse = graph.node_named(handle.container, "Diffuse").unwrap();
    assert_eq!(diffuse.value("color"), Some(&Value::Color3([0.1, 0.6, 0.2])));
    assert_eq!(diffuse.value("roughness"), Some(&Value::Float(0.5)));

    assert_eq!(result.report.fallback_locations, vec!["/root/Rock/RockMesh".to_string()]);
    assert_eq!(
        graph.node(result.fallback.assignment).unwrap().filter(),
        ["/root/Rock/RockMesh/...".to_string()]
    );
}
