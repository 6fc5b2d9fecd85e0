// SPDX-License-Identifier: MIT OR Apache-2.0
//! Node types that need more than slot-by-slot parameter copying.
//!
//! The strategy table maps a loader type name to how its nodes are built:
//! - Float curves: point lists written through the curve API
//! - RGB and vector curves: no native node, synthesized as a container of
//!   separate, per-channel float curve, combine and factor mix nodes
//! - Colour ramps: stop lists plus an interpolation name table
//! - Image and environment textures: normalized file path

use crate::builder::{BuiltNode, GraphBuilder};
use crate::report::NetworkReport;
use crate::resolver::sanitize_identifier;
use crate::target::{ContainerId, SocketRef, TargetError, TargetGraph, TargetNodeId};
use indexmap::IndexMap;
use shaderbridge_graph::{CurvePoint, NodeSchema, PortDirection, ShaderNode, Value};

/// Channel layout of a synthesized multi-channel curve
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelLayout {
    /// Red, green, blue, plus an optional combined curve applied first
    Rgb,
    /// X, Y, Z
    Xyz,
}

impl ChannelLayout {
    fn separate_type(self) -> &'static str {
        match self {
            Self::Rgb => "separate_rgb",
            Self::Xyz => "separate_xyz",
        }
    }

    fn combine_type(self) -> &'static str {
        match self {
            Self::Rgb => "combine_rgb",
            Self::Xyz => "combine_xyz",
        }
    }

    fn mix_type(self) -> &'static str {
        match self {
            Self::Rgb => "mix_color",
            Self::Xyz => "mix_vector",
        }
    }

    /// Value slot of the separate node and name of the boundary ports
    fn value_slot(self) -> (&'static str, &'static str) {
        match self {
            Self::Rgb => ("color", "Color"),
            Self::Xyz => ("vector", "Vector"),
        }
    }

    fn combine_output(self) -> &'static str {
        match self {
            Self::Rgb => "image",
            Self::Xyz => "vector",
        }
    }

    fn channels(self) -> [&'static str; 3] {
        match self {
            Self::Rgb => ["r", "g", "b"],
            Self::Xyz => ["x", "y", "z"],
        }
    }

    /// Input domain of the channel curves
    fn range(self) -> (f32, f32) {
        match self {
            Self::Rgb => (0.0, 1.0),
            Self::Xyz => (-1.0, 1.0),
        }
    }
}

/// How nodes of a loader type are built
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeStrategy {
    /// Slot-by-slot parameter copy
    Generic,
    /// Single float curve
    FloatCurve,
    /// Synthesized multi-channel curve
    ChannelCurves(ChannelLayout),
    /// Colour ramp
    ColorRamp,
    /// Image-backed texture
    ImageTexture,
}

/// Strategy table by loader type name
pub static STRATEGIES: [(&str, NodeStrategy); 6] = [
    ("float_curve", NodeStrategy::FloatCurve),
    ("rgb_curves", NodeStrategy::ChannelCurves(ChannelLayout::Rgb)),
    ("vector_curves", NodeStrategy::ChannelCurves(ChannelLayout::Xyz)),
    ("rgb_ramp", NodeStrategy::ColorRamp),
    ("image_texture", NodeStrategy::ImageTexture),
    ("environment_texture", NodeStrategy::ImageTexture),
];

impl NodeStrategy {
    /// Strategy for a loader type name
    pub fn for_type(type_id: &str) -> Self {
        STRATEGIES
            .iter()
            .find(|(name, _)| *name == type_id)
            .map_or(Self::Generic, |(_, strategy)| *strategy)
    }
}

/// Ramp interpolation names of the source mapped to the target
const RAMP_INTERPOLATION: [(&str, &str); 5] = [
    ("LINEAR", "Linear"),
    ("EASE", "MonotoneCubic"),
    ("B_SPLINE", "BSpline"),
    ("CARDINAL", "CatmullRom"),
    ("CONSTANT", "Constant"),
];

/// Normalize a source image path for the target
pub fn normalize_image_path(path: &str) -> String {
    path.replace('\\', "/")
}

impl<'a, G: TargetGraph> GraphBuilder<'a, G> {
    /// Apply a node's parameters according to its strategy
    pub(crate) fn apply_strategy(
        &mut self,
        strategy: NodeStrategy,
        node: &ShaderNode,
        id: TargetNodeId,
        schema: &NodeSchema,
        report: &mut NetworkReport,
    ) -> Result<(), TargetError> {
        match strategy {
            NodeStrategy::Generic | NodeStrategy::ChannelCurves(_) => {
                self.apply_params(node, id, schema, &[], report);
            }
            NodeStrategy::FloatCurve => {
                match node.param("curve") {
                    Some(Value::Curve(points)) => self.write_curve(id, "curve", points)?,
                    _ => report.unresolved_param(self.qualify(&node.id), "curve", true),
                }
                self.apply_params(node, id, schema, &["curve"], report);
            }
            NodeStrategy::ColorRamp => {
                match node.param("ramp_elements") {
                    Some(Value::Ramp(stops)) => {
                        self.target.clear_ramp(id, "ramp")?;
                        for stop in stops {
                            self.target.push_ramp_stop(id, "ramp", *stop)?;
                        }
                    }
                    _ => report.unresolved_param(self.qualify(&node.id), "ramp_elements", true),
                }
                if let Some(mode) = node.param_str("interpolation") {
                    match RAMP_INTERPOLATION.iter().find(|(source, _)| *source == mode) {
                        Some((_, target)) => {
                            self.target
                                .set_value(id, "interpolation", &Value::String((*target).to_string()))?;
                        }
                        None => report.unsupported_param(self.qualify(&node.id), "interpolation"),
                    }
                }
                self.apply_params(node, id, schema, &["ramp_elements", "interpolation"], report);
            }
            NodeStrategy::ImageTexture => {
                match node.param_str("image") {
                    Some(path) => {
                        let path = Value::String(normalize_image_path(path));
                        self.target.set_value(id, "filename", &path)?;
                    }
                    None => report.unresolved_param(self.qualify(&node.id), "image", true),
                }
                self.apply_params(node, id, schema, &["image"], report);
            }
        }
        Ok(())
    }

    /// Rewrite a curve slot. Every point takes the handle type of the first.
    pub(crate) fn write_curve(
        &mut self,
        id: TargetNodeId,
        slot: &str,
        points: &[CurvePoint],
    ) -> Result<(), TargetError> {
        self.target.clear_curve(id, slot)?;
        let Some(first) = points.first() else {
            return Ok(());
        };
        for point in points {
            self.target
                .push_curve_point(id, slot, CurvePoint::new(point.x, point.y, first.handle))?;
        }
        Ok(())
    }

    /// Synthesize a multi-channel curve as a container.
    ///
    /// The container exposes `Fac` and `Color`/`Vector` inputs and a
    /// `Color`/`Vector` output, matching the source node's sockets.
    pub(crate) fn build_channel_curves(
        &mut self,
        node: &ShaderNode,
        layout: ChannelLayout,
        parent: ContainerId,
        report: &mut NetworkReport,
    ) -> Result<BuiltNode<'a>, TargetError> {
        let registry = self.registry;
        let schema = move |id: &str| {
            registry.get(id).ok_or_else(|| TargetError::SlotNotFound {
                owner: "registry".to_string(),
                slot: id.to_string(),
            })
        };
        let curve_schema = schema("float_curve")?;

        let name = self.unique_name(parent, &sanitize_identifier(&node.id))?;
        let container = self.target.create_container(parent, &name)?;
        let separate = self.target.create_shader(container, "separate", schema(layout.separate_type())?)?;
        let combine = self.target.create_shader(container, "combine", schema(layout.combine_type())?)?;
        let mix = self.target.create_shader(container, "factor_mix", schema(layout.mix_type())?)?;

        let (value_slot, port) = layout.value_slot();
        let (min_x, max_x) = layout.range();

        for channel in layout.channels() {
            let mut upstream = SocketRef::node(separate, channel);
            let curves = [format!("{channel}_combined"), channel.to_string()];
            let keys = [(layout == ChannelLayout::Rgb).then_some("c"), Some(channel)];

            for (curve_name, key) in curves.iter().zip(keys) {
                let Some(key) = key else { continue };
                let Some(Value::Curve(points)) = node.param(key) else {
                    continue;
                };
                let curve = self.target.create_shader(container, &format!("{curve_name}_curve"), curve_schema)?;
                self.write_curve(curve, "curve", points)?;
                self.target.set_value(curve, "min_x", &Value::Float(min_x))?;
                self.target.set_value(curve, "max_x", &Value::Float(max_x))?;
                self.target.set_value(curve, "fac", &Value::Float(1.0))?;
                self.target.connect(&upstream, &SocketRef::node(curve, "value"))?;
                upstream = SocketRef::node(curve, "value");
            }

            self.target.connect(&upstream, &SocketRef::node(combine, channel))?;
        }

        self.target
            .connect(&SocketRef::node(combine, layout.combine_output()), &SocketRef::node(mix, "b"))?;
        self.target.promote_input(container, "Fac", &SocketRef::node(mix, "factor"))?;
        self.target.promote_input(container, port, &SocketRef::node(separate, value_slot))?;
        self.target.promote_input(container, port, &SocketRef::node(mix, "a"))?;
        self.target.promote_output(container, port, &SocketRef::node(mix, "result"))?;

        let channels = layout.channels();
        let structural: Vec<&str> = channels.iter().copied().chain(["c"]).collect();
        let aliases = IndexMap::from([("Factor".to_string(), "Fac".to_string())]);
        self.apply_promoted_defaults(node, container, &aliases, &structural, report);

        Ok(BuiltNode::Group {
            container,
            labels: aliases,
        })
    }

    /// Apply a node's parameters as defaults of a container's promoted inputs
    pub(crate) fn apply_promoted_defaults(
        &mut self,
        node: &ShaderNode,
        container: ContainerId,
        labels: &IndexMap<String, String>,
        skip: &[&str],
        report: &mut NetworkReport,
    ) {
        for (identifier, value) in &node.parameters {
            if skip.contains(&identifier.as_str()) {
                continue;
            }
            let label = labels.get(identifier).map_or(identifier.as_str(), String::as_str);
            let Some((socket, _)) = self.resolve_promoted(container, label, PortDirection::Input) else {
                report.unresolved_param(self.qualify(&node.id), identifier, false);
                continue;
            };
            if let Err(e) = self.target.set_promoted_default(container, &socket.name, value) {
                tracing::debug!("Default for '{}' of '{}' not applied: {}", identifier, node.id, e);
                report.unresolved_param(self.qualify(&node.id), identifier, false);
            }
        }
    }
}
