// SPDX-License-Identifier: MIT OR Apache-2.0
//! Translator configuration.
//!
//! This module holds the tables that drive a translation run:
//! - Source type identifier to target type name
//! - Target type remaps (UI-derived names to loader names)
//! - Per-type socket label tables (label to slot, or [`UNSUPPORTED`])
//! - Location mapping settings and the fallback marker colour
//!
//! The configuration is loaded once and passed by reference into every
//! component of a run.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value as Json;
use std::path::{Path, PathBuf};

/// Label table value marking a source parameter the target cannot represent
pub const UNSUPPORTED: &str = "UNSUPPORTED";

/// Label table key that applies to every target type
pub const WILDCARD: &str = "*";

/// Label to slot mappings of one target type
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabelTable {
    /// Input labels (lower-cased) to parameter slot names
    #[serde(default)]
    pub inputs: IndexMap<String, String>,
    /// Output labels (lower-cased) to output slot names
    #[serde(default)]
    pub outputs: IndexMap<String, String>,
}

impl LabelTable {
    fn with_inputs(entries: &[(&str, &str)]) -> Self {
        Self {
            inputs: to_map(entries),
            outputs: IndexMap::new(),
        }
    }

    fn with_outputs(mut self, entries: &[(&str, &str)]) -> Self {
        self.outputs = to_map(entries);
        self
    }
}

/// Configuration of a translation run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TranslatorConfig {
    /// Source type identifier to target type name
    pub source_types: IndexMap<String, String>,
    /// Target type names that the shader loader knows under another name
    pub type_remap: IndexMap<String, String>,
    /// Label tables by target type, [`WILDCARD`] for all types
    pub label_map: IndexMap<String, LabelTable>,
    /// Root of exported mesh location paths
    pub location_root: String,
    /// Give each material of a multi-material mesh its own sub-location
    pub split_sub_meshes: bool,
    /// Colour of the fallback emission shader
    pub fallback_color: [f32; 3],
    /// Scene attribute carrying the surface shading network
    pub surface_attribute: String,
}

impl Default for TranslatorConfig {
    fn default() -> Self {
        Self {
            source_types: default_source_types(),
            type_remap: default_type_remap(),
            label_map: default_label_map(),
            location_root: "/root".to_string(),
            split_sub_meshes: false,
            fallback_color: [1.0, 0.0, 1.0],
            surface_attribute: "cycles:surface".to_string(),
        }
    }
}

impl TranslatorConfig {
    /// Load a configuration file.
    ///
    /// `.ron` files hold a full (or partial) configuration. `.json` files hold
    /// either a full configuration or a bare label map
    /// (`{ "type": { "label": "slot" } }`) that is merged over the defaults.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let config = match path.extension().and_then(|e| e.to_str()) {
            Some("ron") => Self::from_ron_str(&content)?,
            Some("json") => Self::from_json_str(&content)?,
            _ => return Err(ConfigError::UnsupportedFormat(path.to_path_buf())),
        };

        tracing::info!(
            "Loaded translator config from {:?} ({} source types, {} label tables)",
            path,
            config.source_types.len(),
            config.label_map.len()
        );
        Ok(config)
    }

    /// Parse a RON configuration
    pub fn from_ron_str(text: &str) -> Result<Self, ConfigError> {
        Ok(ron::from_str(text)?)
    }

    /// Parse a JSON configuration or bare label map
    pub fn from_json_str(text: &str) -> Result<Self, ConfigError> {
        let json: Json = serde_json::from_str(text)?;
        let is_full_config = json.as_object().is_some_and(|map| {
            map.keys().any(|k| {
                matches!(
                    k.as_str(),
                    "source_types"
                        | "type_remap"
                        | "label_map"
                        | "location_root"
                        | "split_sub_meshes"
                        | "fallback_color"
                        | "surface_attribute"
                )
            })
        });

        if is_full_config {
            return Ok(serde_json::from_value(json)?);
        }

        let labels: IndexMap<String, IndexMap<String, String>> = serde_json::from_value(json)?;
        let mut config = Self::default();
        config.merge_label_map(labels);
        Ok(config)
    }

    /// Merge a bare label map over the current tables.
    ///
    /// Bare maps do not distinguish inputs from outputs, so every entry is
    /// added to both sides.
    pub fn merge_label_map(&mut self, labels: IndexMap<String, IndexMap<String, String>>) {
        for (target_type, entries) in labels {
            let table = self.label_map.entry(target_type).or_default();
            for (label, slot) in entries {
                let label = label.to_lowercase();
                table.inputs.insert(label.clone(), slot.clone());
                table.outputs.insert(label, slot);
            }
        }
    }

    /// Target type name for a source type identifier
    pub fn source_type(&self, source_type: &str) -> Option<&str> {
        self.source_types.get(source_type).map(String::as_str)
    }

    /// Loader name of a target type, applying the remap table
    pub fn remap_type<'a>(&'a self, target_type: &'a str) -> &'a str {
        self.type_remap
            .get(target_type)
            .map_or(target_type, String::as_str)
    }

    /// Label table entry for a lower-cased label, falling back to the
    /// wildcard table
    pub fn label_for(&self, target_type: &str, label: &str, output: bool) -> Option<&str> {
        [target_type, WILDCARD].into_iter().find_map(|key| {
            let table = self.label_map.get(key)?;
            let entries = if output { &table.outputs } else { &table.inputs };
            entries.get(label).map(String::as_str)
        })
    }
}

/// Error while loading a configuration
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The file could not be read
    #[error("Failed to read config {path:?}: {source}")]
    Io {
        /// Config path
        path: PathBuf,
        /// Underlying IO error
        #[source]
        source: std::io::Error,
    },

    /// The file extension is neither `.ron` nor `.json`
    #[error("Unsupported config format: {0:?}")]
    UnsupportedFormat(PathBuf),

    /// RON parse error
    #[error("Invalid RON config: {0}")]
    Ron(#[from] ron::error::SpannedError),

    /// JSON parse error
    #[error("Invalid JSON config: {0}")]
    Json(#[from] serde_json::Error),
}

fn to_map(entries: &[(&str, &str)]) -> IndexMap<String, String> {
    entries
        .iter()
        .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
        .collect()
}

fn default_source_types() -> IndexMap<String, String> {
    to_map(&[
        // Shaders
        ("ShaderNodeBsdfPrincipled", "principled_bsdf"),
        ("ShaderNodeBsdfDiffuse", "diffuse_bsdf"),
        ("ShaderNodeBsdfGlossy", "glossy_bsdf"),
        ("ShaderNodeBsdfGlass", "glass_bsdf"),
        ("ShaderNodeBsdfRefraction", "refraction_bsdf"),
        ("ShaderNodeBsdfTransparent", "transparent_bsdf"),
        ("ShaderNodeBsdfTranslucent", "translucent_bsdf"),
        ("ShaderNodeSubsurfaceScattering", "subsurface_scattering"),
        ("ShaderNodeEmission", "emission"),
        ("ShaderNodeBackground", "background"),
        ("ShaderNodeHoldout", "holdout"),
        ("ShaderNodeMixShader", "mix_shader"),
        ("ShaderNodeAddShader", "add_shader"),
        ("ShaderNodeVolumePrincipled", "principled_volume"),
        ("ShaderNodeVolumeAbsorption", "volume_absorption"),
        ("ShaderNodeVolumeScatter", "volume_scatter"),
        // Textures
        ("ShaderNodeTexImage", "image_texture"),
        ("ShaderNodeTexEnvironment", "environment_texture"),
        ("ShaderNodeTexNoise", "noise_texture"),
        ("ShaderNodeTexVoronoi", "voronoi_texture"),
        ("ShaderNodeTexChecker", "checker_texture"),
        ("ShaderNodeTexGradient", "gradient_texture"),
        ("ShaderNodeTexWave", "wave_texture"),
        ("ShaderNodeTexMagic", "magic_texture"),
        ("ShaderNodeTexWhiteNoise", "white_noise"),
        // Inputs
        ("ShaderNodeTexCoord", "texture_coordinate"),
        ("ShaderNodeUVMap", "uv_map"),
        ("ShaderNodeAttribute", "attribute"),
        ("ShaderNodeVertexColor", "color_attribute"),
        ("ShaderNodeNewGeometry", "geometry"),
        ("ShaderNodeObjectInfo", "object_info"),
        ("ShaderNodeValue", "value"),
        ("ShaderNodeRGB", "rgb"),
        ("ShaderNodeFresnel", "fresnel"),
        ("ShaderNodeLayerWeight", "layer_weight"),
        ("ShaderNodeBlackbody", "blackbody"),
        ("ShaderNodeWavelength", "wavelength"),
        // Colour
        ("ShaderNodeMixRGB", "mix"),
        ("ShaderNodeMix", "mix"),
        ("ShaderNodeHueSaturation", "hue/saturation/value"),
        ("ShaderNodeInvert", "invert_color"),
        ("ShaderNodeBrightContrast", "brightness/contrast"),
        ("ShaderNodeGamma", "gamma"),
        ("ShaderNodeRGBCurve", "rgb_curves"),
        ("ShaderNodeValToRGB", "color_ramp"),
        ("ShaderNodeRGBToBW", "rgb_to_bw"),
        // Vector
        ("ShaderNodeMapping", "mapping"),
        ("ShaderNodeBump", "bump"),
        ("ShaderNodeNormalMap", "normal_map"),
        ("ShaderNodeDisplacement", "displacement"),
        ("ShaderNodeVectorDisplacement", "vector_displacement"),
        ("ShaderNodeVectorTransform", "vector_transform"),
        ("ShaderNodeVectorCurve", "vector_curves"),
        // Converters
        ("ShaderNodeMath", "math"),
        ("ShaderNodeVectorMath", "vector_math"),
        ("ShaderNodeMapRange", "map_range"),
        ("ShaderNodeClamp", "clamp"),
        ("ShaderNodeFloatCurve", "float_curve"),
        ("ShaderNodeSeparateXYZ", "separate_xyz"),
        ("ShaderNodeCombineXYZ", "combine_xyz"),
        ("ShaderNodeSeparateRGB", "separate_rgb"),
        ("ShaderNodeCombineRGB", "combine_rgb"),
        ("ShaderNodeSeparateColor", "separate_color"),
        ("ShaderNodeCombineColor", "combine_color"),
        // Structure
        ("ShaderNodeOutputMaterial", "material_output"),
        ("ShaderNodeGroup", "group"),
        ("NodeGroupInput", "group_input"),
        ("NodeGroupOutput", "group_output"),
    ])
}

fn default_type_remap() -> IndexMap<String, String> {
    to_map(&[
        ("mix_shader", "mix_closure"),
        ("add_shader", "add_closure"),
        ("background", "background_shader"),
        ("white_noise", "white_noise_texture"),
        ("uv_map", "uvmap"),
        ("color_attribute", "vertex_color"),
        ("color_ramp", "rgb_ramp"),
        ("rgb", "color"),
        ("hue/saturation/value", "hsv"),
        ("invert_color", "invert"),
        ("brightness/contrast", "brightness_contrast"),
    ])
}

fn default_label_map() -> IndexMap<String, LabelTable> {
    let image_inputs: &[(&str, &str)] = &[
        ("image_color_space", "colorspace"),
        ("alpha_mode", "alpha_type"),
        ("source", UNSUPPORTED),
        ("frame_duration", UNSUPPORTED),
        ("frame_offset", UNSUPPORTED),
        ("frame_start", UNSUPPORTED),
        ("frame_current", UNSUPPORTED),
        ("use_auto_refresh", UNSUPPORTED),
        ("use_cyclic", UNSUPPORTED),
    ];
    let closure_pair = LabelTable::with_inputs(&[("shader", "closure1"), ("shader_001", "closure2")])
        .with_outputs(&[("shader", "closure")]);

    let tables = [
        (WILDCARD, LabelTable::with_inputs(&[("weight", UNSUPPORTED)])),
        ("mix_closure", closure_pair.clone()),
        ("add_closure", closure_pair),
        (
            "mix",
            LabelTable::with_inputs(&[("blend_type", "mix_type")]),
        ),
        (
            "mix_float",
            LabelTable::with_inputs(&[
                ("factor_float", "factor"),
                ("a_float", "a"),
                ("b_float", "b"),
                ("clamp_factor", "use_clamp"),
                ("data_type", UNSUPPORTED),
                ("factor_mode", UNSUPPORTED),
            ])
            .with_outputs(&[("result_float", "result")]),
        ),
        (
            "mix_vector",
            LabelTable::with_inputs(&[
                ("factor_float", "factor"),
                ("a_vector", "a"),
                ("b_vector", "b"),
                ("clamp_factor", "use_clamp"),
                ("data_type", UNSUPPORTED),
                ("factor_mode", UNSUPPORTED),
            ])
            .with_outputs(&[("result_vector", "result")]),
        ),
        (
            "mix_vector_non_uniform",
            LabelTable::with_inputs(&[
                ("factor_vector", "factor"),
                ("a_vector", "a"),
                ("b_vector", "b"),
                ("clamp_factor", "use_clamp"),
                ("data_type", UNSUPPORTED),
                ("factor_mode", UNSUPPORTED),
            ])
            .with_outputs(&[("result_vector", "result")]),
        ),
        (
            "mix_color",
            LabelTable::with_inputs(&[
                ("factor_float", "factor"),
                ("a_color", "a"),
                ("b_color", "b"),
                ("blending_mode", "blend_type"),
                ("clamp_factor", "use_clamp"),
                ("clamp_result", "use_clamp_result"),
                ("data_type", UNSUPPORTED),
                ("factor_mode", UNSUPPORTED),
            ])
            .with_outputs(&[("result_color", "result")]),
        ),
        (
            "math",
            LabelTable::with_inputs(&[
                ("value", "value1"),
                ("value_001", "value2"),
                ("value_002", "value3"),
                ("operation", "math_type"),
            ]),
        ),
        (
            "vector_math",
            LabelTable::with_inputs(&[
                ("vector", "vector1"),
                ("vector_001", "vector2"),
                ("vector_002", "vector3"),
                ("operation", "math_type"),
            ]),
        ),
        (
            "map_range",
            LabelTable::with_inputs(&[
                ("interpolation_type", "range_type"),
                ("data_type", UNSUPPORTED),
            ]),
        ),
        (
            "vector_map_range",
            LabelTable::with_inputs(&[
                ("from_min_float3", "from_min"),
                ("from_max_float3", "from_max"),
                ("to_min_float3", "to_min"),
                ("to_max_float3", "to_max"),
                ("steps_float3", "steps"),
                ("interpolation_type", "range_type"),
                ("clamp", "use_clamp"),
                ("data_type", UNSUPPORTED),
                ("value", UNSUPPORTED),
            ])
            .with_outputs(&[("vector", "vector")]),
        ),
        ("float_curve", LabelTable::with_inputs(&[("factor", "fac")])),
        (
            "rgb_ramp",
            LabelTable::with_inputs(&[("factor", "fac"), ("color_mode", UNSUPPORTED), ("hue_interpolation", UNSUPPORTED)]),
        ),
        ("color", LabelTable::with_inputs(&[("color", "value")])),
        (
            "texture_coordinate",
            LabelTable::with_inputs(&[("from_instancer", "from_dupli"), ("object", UNSUPPORTED)]),
        ),
        (
            "uvmap",
            LabelTable::with_inputs(&[("uv_map", "attribute"), ("from_instancer", "from_dupli")]),
        ),
        (
            "attribute",
            LabelTable::with_inputs(&[("attribute_name", "attribute"), ("attribute_type", UNSUPPORTED)]),
        ),
        ("mapping", LabelTable::with_inputs(&[("vector_type", "mapping_type")])),
        ("normal_map", LabelTable::with_inputs(&[("uv_map", "attribute")])),
        ("vector_displacement", LabelTable::with_inputs(&[("uv_map", "attribute")])),
        ("vector_transform", LabelTable::with_inputs(&[("vector_type", "transform_type")])),
        ("image_texture", LabelTable::with_inputs(image_inputs)),
        ("environment_texture", LabelTable::with_inputs(image_inputs)),
        (
            "noise_texture",
            LabelTable::with_inputs(&[("noise_dimensions", "dimensions"), ("noise_type", "type")]),
        ),
        (
            "voronoi_texture",
            LabelTable::with_inputs(&[
                ("voronoi_dimensions", "dimensions"),
                ("distance", "metric"),
                ("feature", "feature"),
            ]),
        ),
        ("white_noise_texture", LabelTable::with_inputs(&[("noise_dimensions", "dimensions")])),
        (
            "wave_texture",
            LabelTable::with_inputs(&[("phase_offset", "phase"), ("wave_profile", "profile")]),
        ),
        ("magic_texture", LabelTable::with_inputs(&[("turbulence_depth", "depth")])),
        ("subsurface_scattering", LabelTable::with_inputs(&[("falloff", "method")])),
        ("separate_color", LabelTable::with_inputs(&[("mode", "color_type")])),
        ("combine_color", LabelTable::with_inputs(&[("mode", "color_type")])),
    ];

    tables
        .into_iter()
        .map(|(key, table)| (key.to_string(), table))
        .collect()
}
