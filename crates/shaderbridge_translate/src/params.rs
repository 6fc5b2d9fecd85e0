// SPDX-License-Identifier: MIT OR Apache-2.0
//! Parameter and socket name translation.
//!
//! Source labels are resolved to target slot names in three steps:
//! 1. Exact match after lower-casing and turning spaces into underscores
//! 2. The configured label table for the target type, then the wildcard table
//! 3. Fuzzy match with every non-alphanumeric character stripped
//!
//! A label table entry of [`UNSUPPORTED`](crate::config::UNSUPPORTED) skips the
//! parameter and reports it.

use crate::config::{TranslatorConfig, UNSUPPORTED};
use indexmap::IndexMap;
use shaderbridge_graph::{NodeSchema, Port, PortDirection, ShaderNode, Value};

/// Outcome of resolving one source label
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SlotResolution {
    /// Target slot name
    Slot(String),
    /// The target has no equivalent for this parameter
    Unsupported,
    /// No slot matched
    Unresolved,
}

/// Parameters of one node translated to target slots
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TranslatedParams {
    /// Values by slot name, coerced to the slot type
    pub values: IndexMap<String, Value>,
    /// Source parameters marked unsupported
    pub unsupported: Vec<String>,
    /// Source parameters with no matching slot, or a value of the wrong type
    pub unresolved: Vec<String>,
}

/// Resolves source labels against target slots
pub struct ParameterTranslator<'a> {
    config: &'a TranslatorConfig,
}

impl<'a> ParameterTranslator<'a> {
    /// Create a translator over a configuration
    pub fn new(config: &'a TranslatorConfig) -> Self {
        Self { config }
    }

    /// Resolve a source label to one of `slots`
    pub fn resolve_slot(
        &self,
        label: &str,
        slots: &[Port],
        target_type: &str,
        direction: PortDirection,
    ) -> SlotResolution {
        let lowered = label.to_lowercase();
        let safe = lowered.replace(' ', "_");
        if let Some(port) = slots.iter().find(|p| p.name.to_lowercase() == safe) {
            return SlotResolution::Slot(port.name.clone());
        }

        let output = direction == PortDirection::Output;
        let mapped = self
            .config
            .label_for(target_type, &lowered, output)
            .or_else(|| self.config.label_for(target_type, &safe, output));
        if let Some(mapped) = mapped {
            if mapped == UNSUPPORTED {
                return SlotResolution::Unsupported;
            }
            if let Some(port) = slots.iter().find(|p| p.name == mapped) {
                return SlotResolution::Slot(port.name.clone());
            }
        }

        let wanted = fuzzy_key(label);
        match slots.iter().find(|p| fuzzy_key(&p.name) == wanted) {
            Some(port) => SlotResolution::Slot(port.name.clone()),
            None => SlotResolution::Unresolved,
        }
    }

    /// Translate every parameter of a node, skipping the names in `structural`
    pub fn translate(&self, node: &ShaderNode, schema: &NodeSchema, structural: &[&str]) -> TranslatedParams {
        let mut translated = TranslatedParams::default();

        for (name, value) in &node.parameters {
            if structural.contains(&name.as_str()) {
                continue;
            }
            match self.resolve_slot(name, &schema.inputs, &schema.id, PortDirection::Input) {
                SlotResolution::Slot(slot) => {
                    let coerced = schema
                        .input(&slot)
                        .and_then(|port| value.coerce_to(&port.socket_type));
                    match coerced {
                        Some(value) => {
                            translated.values.insert(slot, value);
                        }
                        None => {
                            tracing::debug!(
                                "Parameter '{}' of '{}' does not fit slot {}.{}",
                                name,
                                node.id,
                                schema.id,
                                slot
                            );
                            translated.unresolved.push(name.clone());
                        }
                    }
                }
                SlotResolution::Unsupported => translated.unsupported.push(name.clone()),
                SlotResolution::Unresolved => {
                    tracing::debug!("No slot on {} for parameter '{}' of '{}'", schema.id, name, node.id);
                    translated.unresolved.push(name.clone());
                }
            }
        }

        translated
    }
}

fn fuzzy_key(name: &str) -> String {
    name.chars()
        .filter(char::is_ascii_alphanumeric)
        .map(|c| c.to_ascii_lowercase())
        .collect()
}
