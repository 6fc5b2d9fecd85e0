// SPDX-License-Identifier: MIT OR Apache-2.0
//! Node type resolution.
//!
//! Maps a source type identifier, plus the node's mode parameters, to a
//! target type name. Mode-dependent variants (Mix, Map Range) are handled by
//! a table of override hooks consulted before the configured type table.

use crate::config::TranslatorConfig;
use indexmap::IndexMap;
use shaderbridge_graph::{ShaderNode, Value};

/// Sentinel type name for nodes that could not be mapped
pub const UNKNOWN_TYPE: &str = "unknown";

/// Result of resolving a node type
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolvedType {
    /// Target type name
    Known(String),
    /// No mapping exists
    Unknown,
}

impl ResolvedType {
    /// Type name, or the `unknown` sentinel
    pub fn as_str(&self) -> &str {
        match self {
            Self::Known(name) => name,
            Self::Unknown => UNKNOWN_TYPE,
        }
    }
}

/// Override hook for a source type whose target type depends on its mode
pub struct TypeOverride {
    /// Source type identifier the hook applies to
    pub source_type: &'static str,
    /// Pick the variant from the node parameters
    pub resolve: fn(&IndexMap<String, Value>) -> Option<&'static str>,
}

/// Built-in override hooks
pub static TYPE_OVERRIDES: [TypeOverride; 2] = [
    TypeOverride {
        source_type: "ShaderNodeMix",
        resolve: resolve_mix,
    },
    TypeOverride {
        source_type: "ShaderNodeMapRange",
        resolve: resolve_map_range,
    },
];

fn resolve_mix(params: &IndexMap<String, Value>) -> Option<&'static str> {
    let data_type = params.get("data_type").and_then(Value::as_str)?;
    match data_type {
        "FLOAT" => Some("mix_float"),
        "VECTOR" => {
            let non_uniform = params
                .get("factor_mode")
                .and_then(Value::as_str)
                .is_some_and(|mode| mode == "NON_UNIFORM")
                || params.contains_key("Factor_Vector");
            Some(if non_uniform { "mix_vector_non_uniform" } else { "mix_vector" })
        }
        "RGBA" => Some("mix_color"),
        _ => None,
    }
}

fn resolve_map_range(params: &IndexMap<String, Value>) -> Option<&'static str> {
    match params.get("data_type").and_then(Value::as_str)? {
        "FLOAT" => Some("map_range"),
        "FLOAT_VECTOR" | "VECTOR" => Some("vector_map_range"),
        _ => None,
    }
}

/// Resolves source node types against a configuration
pub struct NodeTypeResolver<'a> {
    config: &'a TranslatorConfig,
    overrides: &'a [TypeOverride],
}

impl<'a> NodeTypeResolver<'a> {
    /// Create a resolver with the built-in overrides
    pub fn new(config: &'a TranslatorConfig) -> Self {
        Self {
            config,
            overrides: &TYPE_OVERRIDES,
        }
    }

    /// Create a resolver with a custom override table
    pub fn with_overrides(config: &'a TranslatorConfig, overrides: &'a [TypeOverride]) -> Self {
        Self { config, overrides }
    }

    /// Resolve a source type to its target type name as written in the
    /// exchange document (before loader remapping)
    pub fn resolve(&self, source_type: &str, params: &IndexMap<String, Value>) -> ResolvedType {
        let overridden = self
            .overrides
            .iter()
            .filter(|hook| hook.source_type == source_type)
            .find_map(|hook| (hook.resolve)(params));
        if let Some(name) = overridden {
            return ResolvedType::Known(name.to_string());
        }

        match self.config.source_type(source_type) {
            Some(name) => ResolvedType::Known(name.to_string()),
            None => ResolvedType::Unknown,
        }
    }

    /// Resolve an imported node to a loader type name.
    ///
    /// The exporter's resolution is used when present; a node with an empty
    /// resolved type is resolved here. The result is remapped and sanitized.
    pub fn resolve_node(&self, node: &ShaderNode) -> ResolvedType {
        let raw = match node.resolved_type.as_str() {
            "" => self.resolve(&node.source_type, &node.parameters),
            UNKNOWN_TYPE => ResolvedType::Unknown,
            name => ResolvedType::Known(name.to_string()),
        };
        match raw {
            ResolvedType::Known(name) => ResolvedType::Known(self.loader_type(&name)),
            ResolvedType::Unknown => ResolvedType::Unknown,
        }
    }

    /// Loader type name for a document type name
    pub fn loader_type(&self, name: &str) -> String {
        sanitize_identifier(self.config.remap_type(name))
    }
}

/// Make a name usable as a node or port identifier: every character that is
/// not alphanumeric or `_` becomes `_`, and a leading digit gets a `_` prefix.
pub fn sanitize_identifier(name: &str) -> String {
    let mut out: String = name
        .chars()
        .map(|c| if c.is_alphanumeric() || c == '_' { c } else { '_' })
        .collect();
    if out.starts_with(|c: char| c.is_ascii_digit()) {
        out.insert(0, '_');
    }
    out
}
