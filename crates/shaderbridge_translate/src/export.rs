// SPDX-License-Identifier: MIT OR Apache-2.0
//! Source-side exporter.
//!
//! Turns a [`SourceScene`] (objects and node-tree materials as the source
//! application holds them) into the exchange document. Two independent
//! exporters do the work and [`SceneExporter`] composes them:
//! - [`MaterialExporter`] traces each material backward from its active output
//! - [`HierarchyExporter`] records mesh locations and their material slots
//!
//! Parameters are captured from a fixed per-type table rather than by
//! inspecting whatever a node happens to carry.

use crate::config::TranslatorConfig;
use crate::resolver::{NodeTypeResolver, ResolvedType};
use crate::special::normalize_image_path;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value as Json;
use shaderbridge_graph::{CurvePoint, HierarchyEntry, Link, NetworkDoc, NodeDoc, RampStop, SceneDocument, Value};
use std::collections::HashSet;

/// Sockets of the material output that are traced
const MATERIAL_TERMINALS: [&str; 3] = ["Surface", "Displacement", "Volume"];

/// Source object type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SourceObjectType {
    /// Polygon mesh
    Mesh,
    /// Transform only
    #[default]
    Empty,
    /// Camera
    Camera,
    /// Light
    Light,
    /// Curve object
    Curve,
}

/// An object of the source scene
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceObject {
    /// Parent object name
    pub parent: Option<String>,
    /// Object type
    #[serde(rename = "type")]
    pub object_type: SourceObjectType,
    /// Name of the mesh datablock
    pub data_name: Option<String>,
    /// Material per slot; empty slots are `None`
    pub material_slots: Vec<Option<String>>,
    /// Whether the object is selected
    pub selected: bool,
}

/// A socket of a source node
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceSocket {
    /// Unique identifier within the node
    pub identifier: String,
    /// Display name
    pub name: String,
    /// Unlinked value, if the socket has one
    #[serde(default)]
    pub default_value: Option<Json>,
}

/// Color ramp data of a ramp node
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceRamp {
    /// Color mode (`RGB`, `HSV`, `HSL`)
    pub color_mode: String,
    /// Interpolation mode
    pub interpolation: String,
    /// Stops in order
    pub elements: Vec<RampStop>,
}

/// Image datablock of a texture node
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceImage {
    /// File path as stored by the source application
    pub filepath: String,
    /// Image source (`FILE`, `SEQUENCE`, `MOVIE`, `TILED`)
    pub source: String,
    /// Color space name
    pub colorspace: String,
    /// Alpha mode
    pub alpha_mode: String,
    /// Frame count of a sequence
    pub frame_duration: i64,
    /// Frame offset of a sequence
    pub frame_offset: i64,
    /// First frame of a sequence
    pub frame_start: i64,
    /// Current frame
    pub frame_current: i64,
    /// Refresh on frame change
    pub use_auto_refresh: bool,
    /// Cycle the sequence
    pub use_cyclic: bool,
}

/// A node group instanced by a group node
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SourceGroup {
    /// Node tree name
    pub name: String,
    /// The group's node tree
    pub tree: SourceTree,
}

/// A node of a source node tree
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceNode {
    /// Node class identifier
    pub bl_idname: String,
    /// Whether this output node is the active one
    pub is_active_output: bool,
    /// Input sockets in order
    pub inputs: Vec<SourceSocket>,
    /// Output sockets in order
    pub outputs: Vec<SourceSocket>,
    /// Node properties (enums, flags)
    pub properties: IndexMap<String, Json>,
    /// Editor location
    pub location: [f32; 2],
    /// Instanced group
    pub group: Option<SourceGroup>,
    /// Curve mapping, one curve per channel
    pub curves: Vec<Vec<CurvePoint>>,
    /// Color ramp
    pub color_ramp: Option<SourceRamp>,
    /// Image datablock
    pub image: Option<SourceImage>,
}

impl SourceNode {
    /// Create a node of the given class
    pub fn new(bl_idname: impl Into<String>) -> Self {
        Self {
            bl_idname: bl_idname.into(),
            ..Self::default()
        }
    }

    /// Add an input socket
    pub fn with_input(mut self, identifier: &str, name: &str, default_value: Option<Json>) -> Self {
        self.inputs.push(SourceSocket {
            identifier: identifier.to_string(),
            name: name.to_string(),
            default_value,
        });
        self
    }

    /// Add an output socket
    pub fn with_output(mut self, identifier: &str, name: &str, default_value: Option<Json>) -> Self {
        self.outputs.push(SourceSocket {
            identifier: identifier.to_string(),
            name: name.to_string(),
            default_value,
        });
        self
    }

    /// Set a property
    pub fn with_property(mut self, name: &str, value: Json) -> Self {
        self.properties.insert(name.to_string(), value);
        self
    }

    /// Mark as the active output
    pub fn active(mut self) -> Self {
        self.is_active_output = true;
        self
    }

    fn input_default(&self, key: &str) -> Option<&Json> {
        self.inputs
            .iter()
            .find(|s| s.identifier == key)
            .or_else(|| self.inputs.iter().find(|s| s.name == key))?
            .default_value
            .as_ref()
    }

    fn output_default(&self, key: &str) -> Option<&Json> {
        self.outputs
            .iter()
            .find(|s| s.identifier == key || s.name == key)?
            .default_value
            .as_ref()
    }
}

/// A node tree
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceTree {
    /// Nodes by name
    pub nodes: IndexMap<String, SourceNode>,
    /// Links by socket identifier
    pub links: Vec<Link>,
}

impl SourceTree {
    fn is_linked(&self, node: &str, socket: &str) -> bool {
        self.links.iter().any(|l| l.to_node == node && l.to_socket == socket)
    }
}

/// A material of the source scene
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceMaterial {
    /// Whether the material uses a node tree
    #[serde(default = "default_true")]
    pub use_nodes: bool,
    /// The node tree
    #[serde(default)]
    pub tree: SourceTree,
}

fn default_true() -> bool {
    true
}

/// The source scene
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceScene {
    /// Objects by name
    pub objects: IndexMap<String, SourceObject>,
    /// Materials by name
    pub materials: IndexMap<String, SourceMaterial>,
}

/// Exporter options
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportOptions {
    /// Root of every location path
    pub root: String,
    /// Only export selected objects and the materials they use
    pub selected_only: bool,
    /// Flag meshes with several material slots for splitting
    pub set_mat_id: bool,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            root: "/root".to_string(),
            selected_only: false,
            set_mat_id: true,
        }
    }
}

impl ExportOptions {
    /// Options rooted at the configured location root
    pub fn from_config(config: &TranslatorConfig) -> Self {
        Self {
            root: config.location_root.clone(),
            ..Self::default()
        }
    }
}

/// Why a material or group was not exported
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TraceError {
    /// Material does not use nodes
    #[error("material has no nodes")]
    NoNodes,
    /// No active output node
    #[error("no active output node")]
    NoOutput,
    /// A reached node has no target type
    #[error("node '{node}' of type {source_type} has no target type")]
    UnknownType {
        /// Node name
        node: String,
        /// Node class identifier
        source_type: String,
    },
}

/// How the parameters of a node class are captured
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamCapture {
    /// Unlinked input defaults plus declared properties
    Generic,
    /// Mix node, inputs picked by data type
    Mix,
    /// Map Range node, inputs picked by data type
    MapRange,
    /// Single curve mapping
    FloatCurve,
    /// One curve per channel, keyed by channel name
    ChannelCurves {
        /// Identifier of the value input
        value_input: &'static str,
        /// Channel keys in curve order
        channels: &'static [&'static str],
    },
    /// Color ramp stops and modes
    ColorRamp,
    /// Math nodes with numbered value inputs
    Math,
    /// Constant value node
    Value,
    /// Constant color node
    Rgb,
    /// Texture coordinate node
    TexCoord,
    /// Image-backed texture node
    Image,
}

/// Capture strategy per node class; unlisted classes are [`ParamCapture::Generic`]
pub static PARAM_CAPTURES: [(&str, ParamCapture); 13] = [
    ("ShaderNodeMix", ParamCapture::Mix),
    ("ShaderNodeMapRange", ParamCapture::MapRange),
    ("ShaderNodeFloatCurve", ParamCapture::FloatCurve),
    (
        "ShaderNodeRGBCurve",
        ParamCapture::ChannelCurves {
            value_input: "Color",
            channels: &["r", "g", "b", "c"],
        },
    ),
    (
        "ShaderNodeVectorCurve",
        ParamCapture::ChannelCurves {
            value_input: "Vector",
            channels: &["x", "y", "z"],
        },
    ),
    ("ShaderNodeValToRGB", ParamCapture::ColorRamp),
    ("ShaderNodeMath", ParamCapture::Math),
    ("ShaderNodeVectorMath", ParamCapture::Math),
    ("ShaderNodeValue", ParamCapture::Value),
    ("ShaderNodeRGB", ParamCapture::Rgb),
    ("ShaderNodeTexCoord", ParamCapture::TexCoord),
    ("ShaderNodeTexImage", ParamCapture::Image),
    ("ShaderNodeTexEnvironment", ParamCapture::Image),
];

impl ParamCapture {
    /// Look up the capture strategy of a node class
    pub fn for_type(bl_idname: &str) -> Self {
        PARAM_CAPTURES
            .iter()
            .find(|(name, _)| *name == bl_idname)
            .map_or(Self::Generic, |(_, capture)| *capture)
    }
}

/// Properties exported per node class
pub static DECLARED_PROPERTIES: &[(&str, &[&str])] = &[
    ("ShaderNodeBsdfPrincipled", &["distribution", "subsurface_method"]),
    ("ShaderNodeBsdfGlass", &["distribution"]),
    ("ShaderNodeBsdfGlossy", &["distribution"]),
    ("ShaderNodeBsdfRefraction", &["distribution"]),
    ("ShaderNodeBsdfAnisotropic", &["distribution"]),
    ("ShaderNodeBsdfHair", &["component"]),
    ("ShaderNodeBsdfToon", &["component"]),
    ("ShaderNodeSubsurfaceScattering", &["falloff"]),
    ("ShaderNodeTexNoise", &["noise_dimensions", "noise_type", "normalize"]),
    ("ShaderNodeTexVoronoi", &["voronoi_dimensions", "distance", "feature", "normalize"]),
    ("ShaderNodeTexWhiteNoise", &["noise_dimensions"]),
    ("ShaderNodeTexWave", &["wave_type", "bands_direction", "rings_direction", "wave_profile"]),
    ("ShaderNodeTexMagic", &["turbulence_depth"]),
    ("ShaderNodeTexGradient", &["gradient_type"]),
    ("ShaderNodeTexBrick", &["offset", "offset_frequency", "squash", "squash_frequency"]),
    ("ShaderNodeTexSky", &["sky_type", "sun_direction", "turbidity", "ground_albedo"]),
    ("ShaderNodeTexImage", &["interpolation", "projection", "extension", "projection_blend"]),
    ("ShaderNodeTexEnvironment", &["interpolation", "projection"]),
    ("ShaderNodeMapping", &["vector_type"]),
    ("ShaderNodeNormalMap", &["space", "uv_map"]),
    ("ShaderNodeVectorDisplacement", &["space"]),
    ("ShaderNodeDisplacement", &["space"]),
    ("ShaderNodeBump", &["invert"]),
    ("ShaderNodeTangent", &["direction_type", "axis", "uv_map"]),
    ("ShaderNodeVectorTransform", &["vector_type", "convert_from", "convert_to"]),
    ("ShaderNodeVectorRotate", &["rotation_type", "invert"]),
    ("ShaderNodeAttribute", &["attribute_name", "attribute_type"]),
    ("ShaderNodeVertexColor", &["layer_name"]),
    ("ShaderNodeUVMap", &["uv_map", "from_instancer"]),
    ("ShaderNodeClamp", &["clamp_type"]),
    ("ShaderNodeSeparateColor", &["mode"]),
    ("ShaderNodeCombineColor", &["mode"]),
    ("ShaderNodeMixRGB", &["blend_type", "use_clamp"]),
];

fn declared_properties(bl_idname: &str) -> &'static [&'static str] {
    DECLARED_PROPERTIES
        .iter()
        .find(|(name, _)| *name == bl_idname)
        .map(|(_, props)| *props)
        .unwrap_or_default()
}

/// Exports node-tree materials as document entries
pub struct MaterialExporter<'a> {
    config: &'a TranslatorConfig,
}

impl<'a> MaterialExporter<'a> {
    /// Create an exporter resolving types with `config`
    pub fn new(config: &'a TranslatorConfig) -> Self {
        Self { config }
    }

    /// Export every material, or those used by selected objects
    pub fn export(&self, scene: &SourceScene, options: &ExportOptions) -> IndexMap<String, NetworkDoc> {
        let selected: Option<HashSet<&str>> = options.selected_only.then(|| {
            scene
                .objects
                .values()
                .filter(|o| o.selected)
                .flat_map(|o| o.material_slots.iter().flatten())
                .map(String::as_str)
                .collect()
        });

        let mut materials = IndexMap::new();
        for (name, material) in &scene.materials {
            if selected.as_ref().is_some_and(|s| !s.contains(name.as_str())) {
                continue;
            }
            match self.trace_material(material) {
                Ok(doc) => {
                    materials.insert(name.clone(), doc);
                }
                Err(e) => tracing::warn!("Material '{}' not exported: {}", name, e),
            }
        }
        tracing::info!("Exported {} of {} materials", materials.len(), scene.materials.len());
        materials
    }

    /// Trace one material from its active output
    pub fn trace_material(&self, material: &SourceMaterial) -> Result<NetworkDoc, TraceError> {
        if !material.use_nodes {
            return Err(TraceError::NoNodes);
        }
        let output = active_output(&material.tree, "ShaderNodeOutputMaterial").ok_or(TraceError::NoOutput)?;
        self.trace_tree(&material.tree, output, Some(&MATERIAL_TERMINALS[..]))
    }

    fn trace_group(&self, group_node: &SourceNode, group: &SourceGroup) -> Result<NetworkDoc, TraceError> {
        let output = active_output(&group.tree, "NodeGroupOutput").ok_or(TraceError::NoOutput)?;
        let mut doc = self.trace_tree(&group.tree, output, None)?;
        for socket in group_node.inputs.iter().chain(&group_node.outputs) {
            doc.socket_map.insert(socket.identifier.clone(), socket.name.clone());
        }
        Ok(doc)
    }

    /// Walk upstream from `output`. A link is kept only once its downstream
    /// node has been reached; each upstream node is captured once.
    fn trace_tree(
        &self,
        tree: &SourceTree,
        output: &str,
        terminals: Option<&[&str]>,
    ) -> Result<NetworkDoc, TraceError> {
        let mut doc = NetworkDoc::default();
        let Some(output_node) = tree.nodes.get(output) else {
            return Err(TraceError::NoOutput);
        };
        doc.nodes.insert(
            output.to_string(),
            NodeDoc {
                source_type: output_node.bl_idname.clone(),
                cycles_type: self.resolve(output, output_node, &IndexMap::new())?,
                params: IndexMap::new(),
                location: Some(output_node.location),
                group: None,
            },
        );

        let mut visited: HashSet<&str> = HashSet::from([output]);
        let mut stack: Vec<&str> = vec![output];

        while let Some(name) = stack.pop() {
            let Some(node) = tree.nodes.get(name) else {
                continue;
            };
            for socket in &node.inputs {
                if name == output
                    && terminals.is_some_and(|t| !t.contains(&socket.name.as_str()) && !t.contains(&socket.identifier.as_str()))
                {
                    continue;
                }
                for link in tree.links.iter().filter(|l| l.to_node == name && l.to_socket == socket.identifier) {
                    let Some(upstream) = tree.nodes.get(&link.from_node) else {
                        tracing::warn!("Link {} starts at a missing node", link);
                        continue;
                    };
                    if visited.insert(link.from_node.as_str()) {
                        let node_doc = self.capture_node(&link.from_node, upstream, tree)?;
                        doc.nodes.insert(link.from_node.clone(), node_doc);
                        stack.push(link.from_node.as_str());
                    }
                    if !doc.links.contains(link) {
                        doc.links.push(link.clone());
                    }
                }
            }
        }

        Ok(doc)
    }

    fn capture_node(&self, name: &str, node: &SourceNode, tree: &SourceTree) -> Result<NodeDoc, TraceError> {
        if let Some(group) = &node.group {
            let group_doc = match self.trace_group(node, group) {
                Ok(doc) => Some(IndexMap::from([(group.name.clone(), doc)])),
                Err(e) => {
                    tracing::warn!("Group '{}' not exported: {}", name, e);
                    None
                }
            };
            return Ok(NodeDoc {
                source_type: node.bl_idname.clone(),
                cycles_type: "group".to_string(),
                params: unlinked_defaults(name, node, tree),
                location: Some(node.location),
                group: group_doc,
            });
        }

        let params = capture_params(name, node, tree);
        let typed: IndexMap<String, Value> = params
            .iter()
            .filter_map(|(key, json)| Some((key.clone(), Value::from_json(json)?)))
            .collect();
        Ok(NodeDoc {
            source_type: node.bl_idname.clone(),
            cycles_type: self.resolve(name, node, &typed)?,
            params,
            location: Some(node.location),
            group: None,
        })
    }

    fn resolve(&self, name: &str, node: &SourceNode, params: &IndexMap<String, Value>) -> Result<String, TraceError> {
        match NodeTypeResolver::new(self.config).resolve(&node.bl_idname, params) {
            ResolvedType::Known(type_id) => Ok(type_id),
            ResolvedType::Unknown => Err(TraceError::UnknownType {
                node: name.to_string(),
                source_type: node.bl_idname.clone(),
            }),
        }
    }
}

fn active_output<'t>(tree: &'t SourceTree, bl_idname: &str) -> Option<&'t str> {
    tree.nodes
        .iter()
        .find(|(_, n)| n.bl_idname == bl_idname && n.is_active_output)
        .map(|(name, _)| name.as_str())
}

fn unlinked_defaults(name: &str, node: &SourceNode, tree: &SourceTree) -> IndexMap<String, Json> {
    node.inputs
        .iter()
        .filter(|s| !tree.is_linked(name, &s.identifier))
        .filter_map(|s| Some((s.identifier.clone(), s.default_value.clone()?)))
        .collect()
}

fn copy_inputs(node: &SourceNode, keys: &[&str], params: &mut IndexMap<String, Json>) {
    for key in keys {
        if let Some(value) = node.input_default(key) {
            params.insert((*key).to_string(), value.clone());
        }
    }
}

fn copy_properties(node: &SourceNode, keys: &[&str], params: &mut IndexMap<String, Json>) {
    for key in keys {
        if let Some(value) = node.properties.get(*key) {
            params.insert((*key).to_string(), value.clone());
        }
    }
}

fn curve_json(points: &[CurvePoint]) -> Json {
    Value::Curve(points.to_vec()).to_json()
}

fn capture_params(name: &str, node: &SourceNode, tree: &SourceTree) -> IndexMap<String, Json> {
    let mut params = IndexMap::new();

    match ParamCapture::for_type(&node.bl_idname) {
        ParamCapture::Generic => {
            params = unlinked_defaults(name, node, tree);
            copy_properties(node, declared_properties(&node.bl_idname), &mut params);
        }
        ParamCapture::Mix => {
            copy_properties(node, &["data_type", "factor_mode", "clamp_factor"], &mut params);
            let data_type = node.properties.get("data_type").and_then(Json::as_str).unwrap_or("FLOAT");
            let non_uniform = node.properties.get("factor_mode").and_then(Json::as_str) == Some("NON_UNIFORM");
            match data_type {
                "RGBA" => {
                    if let Some(blend) = node.properties.get("blend_type") {
                        params.insert("blending_mode".to_string(), blend.clone());
                    }
                    copy_properties(node, &["clamp_result"], &mut params);
                    copy_inputs(node, &["Factor_Float", "A_Color", "B_Color"], &mut params);
                }
                "VECTOR" => {
                    let factor = if non_uniform { "Factor_Vector" } else { "Factor_Float" };
                    copy_inputs(node, &[factor, "A_Vector", "B_Vector"], &mut params);
                }
                _ => copy_inputs(node, &["Factor_Float", "A_Float", "B_Float"], &mut params),
            }
        }
        ParamCapture::MapRange => {
            copy_properties(node, &["data_type", "interpolation_type", "clamp"], &mut params);
            match node.properties.get("data_type").and_then(Json::as_str) {
                Some("FLOAT_VECTOR") => copy_inputs(
                    node,
                    &["Vector", "Value", "From_Min_FLOAT3", "From_Max_FLOAT3", "To_Min_FLOAT3", "To_Max_FLOAT3", "Steps_FLOAT3"],
                    &mut params,
                ),
                _ => copy_inputs(node, &["Value", "From Min", "From Max", "To Min", "To Max", "Steps"], &mut params),
            }
        }
        ParamCapture::FloatCurve => {
            copy_inputs(node, &["Factor", "Value"], &mut params);
            match node.curves.first() {
                Some(curve) => {
                    params.insert("curve".to_string(), curve_json(curve));
                }
                None => tracing::warn!("Curve node '{}' has no curve mapping", name),
            }
        }
        ParamCapture::ChannelCurves { value_input, channels } => {
            if let Some(fac) = node.input_default("Fac") {
                params.insert("Factor".to_string(), fac.clone());
            }
            copy_inputs(node, &[value_input], &mut params);
            for (channel, curve) in channels.iter().zip(&node.curves) {
                params.insert((*channel).to_string(), curve_json(curve));
            }
        }
        ParamCapture::ColorRamp => {
            if let Some(fac) = node.input_default("Fac") {
                params.insert("Factor".to_string(), fac.clone());
            }
            match &node.color_ramp {
                Some(ramp) => {
                    params.insert("color_mode".to_string(), Json::from(ramp.color_mode.as_str()));
                    params.insert("interpolation".to_string(), Json::from(ramp.interpolation.as_str()));
                    params.insert("ramp_elements".to_string(), Value::Ramp(ramp.elements.clone()).to_json());
                }
                None => tracing::warn!("Ramp node '{}' has no color ramp", name),
            }
        }
        ParamCapture::Math => {
            copy_properties(node, &["operation", "use_clamp"], &mut params);
            for (index, socket) in node.inputs.iter().enumerate() {
                let Some(value) = &socket.default_value else {
                    continue;
                };
                let key = match socket.name.to_lowercase().as_str() {
                    "value" | "vector" => format!("{}{}", socket.name, index + 1),
                    _ => socket.name.clone(),
                };
                params.insert(key, value.clone());
            }
        }
        ParamCapture::Value => {
            if let Some(value) = node.output_default("Value") {
                params.insert("Value".to_string(), value.clone());
            }
        }
        ParamCapture::Rgb => {
            if let Some(color) = node.output_default("Color") {
                params.insert("Color".to_string(), color.clone());
            }
        }
        ParamCapture::TexCoord => {
            copy_properties(node, &["from_instancer"], &mut params);
            if let Some(object) = node.properties.get("object") {
                params.insert("Object".to_string(), object.clone());
            }
        }
        ParamCapture::Image => {
            params = unlinked_defaults(name, node, tree);
            copy_properties(node, declared_properties(&node.bl_idname), &mut params);
            match &node.image {
                Some(image) => {
                    params.insert("image".to_string(), Json::from(normalize_image_path(&image.filepath)));
                    params.insert("Source".to_string(), Json::from(image.source.as_str()));
                    params.insert("frame_duration".to_string(), Json::from(image.frame_duration));
                    params.insert("frame_offset".to_string(), Json::from(image.frame_offset));
                    params.insert("frame_start".to_string(), Json::from(image.frame_start));
                    params.insert("frame_current".to_string(), Json::from(image.frame_current));
                    params.insert("use_auto_refresh".to_string(), Json::from(image.use_auto_refresh));
                    params.insert("use_cyclic".to_string(), Json::from(image.use_cyclic));
                    params.insert("alpha_mode".to_string(), Json::from(image.alpha_mode.as_str()));
                    params.insert("image_color_space".to_string(), Json::from(image.colorspace.as_str()));
                }
                None => tracing::debug!("Texture node '{}' has no image", name),
            }
        }
    }

    params
}

/// Exports mesh locations and their material slots
#[derive(Debug, Default)]
pub struct HierarchyExporter;

impl HierarchyExporter {
    /// Export every mesh object with at least one material slot
    pub fn export(&self, scene: &SourceScene, options: &ExportOptions) -> IndexMap<String, HierarchyEntry> {
        let mut hierarchy = IndexMap::new();
        for (name, object) in &scene.objects {
            if object.object_type != SourceObjectType::Mesh || object.material_slots.is_empty() {
                continue;
            }
            if options.selected_only && !object.selected {
                continue;
            }
            let mat_by_index = object
                .material_slots
                .iter()
                .enumerate()
                .filter_map(|(index, slot)| Some((index.to_string(), slot.clone()?)))
                .collect();
            hierarchy.insert(
                name.clone(),
                HierarchyEntry {
                    path: self.location_path(scene, name, options),
                    mat_by_index,
                    has_multiple_mat: options.set_mat_id && object.material_slots.len() > 1,
                },
            );
        }
        hierarchy
    }

    /// `<root>/<parents...>/<object>/<mesh data>`
    pub fn location_path(&self, scene: &SourceScene, name: &str, options: &ExportOptions) -> String {
        let mut chain = vec![name];
        let mut current = scene.objects.get(name).and_then(|o| o.parent.as_deref());
        while let Some(parent) = current {
            if chain.contains(&parent) {
                tracing::warn!("Parent cycle at object '{}'", parent);
                break;
            }
            chain.push(parent);
            current = scene.objects.get(parent).and_then(|o| o.parent.as_deref());
        }

        let mut path = options.root.trim_end_matches('/').to_string();
        for part in chain.iter().rev() {
            path.push('/');
            path.push_str(part);
        }
        let data = scene
            .objects
            .get(name)
            .filter(|o| o.object_type == SourceObjectType::Mesh)
            .and_then(|o| o.data_name.as_deref());
        if let Some(data) = data {
            path.push('/');
            path.push_str(data);
        }
        path
    }
}

/// Material and hierarchy exporters run in sequence
pub struct SceneExporter<'a> {
    materials: MaterialExporter<'a>,
    hierarchy: HierarchyExporter,
}

impl<'a> SceneExporter<'a> {
    /// Create a scene exporter
    pub fn new(config: &'a TranslatorConfig) -> Self {
        Self {
            materials: MaterialExporter::new(config),
            hierarchy: HierarchyExporter,
        }
    }

    /// Export the combined document
    pub fn export(&self, scene: &SourceScene, options: &ExportOptions) -> SceneDocument {
        SceneDocument {
            materials: self.materials.export(scene, options),
            hierarchy: self.hierarchy.export(scene, options),
        }
    }
}
