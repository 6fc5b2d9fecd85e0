// SPDX-License-Identifier: MIT OR Apache-2.0
//! Socket definitions for node inputs/outputs.

use crate::value::Value;
use serde::{Deserialize, Serialize};

/// Port direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PortDirection {
    /// Input (parameter) socket
    Input,
    /// Output socket
    Output,
}

/// Data type of a socket in the target system
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SocketType {
    /// Boolean value
    Bool,
    /// Integer value
    Int,
    /// Floating point value
    Float,
    /// 3D vector, point or normal
    Vector,
    /// RGB colour
    Color,
    /// String or enum value
    String,
    /// Shading closure (BSDF, volume, emission)
    Closure,
    /// Scalar curve (ordered control points)
    Curve,
    /// Colour ramp (ordered stops)
    Ramp,
    /// Plain list of scalars
    List,
}

impl SocketType {
    /// Converter kind used to name adapter nodes (`convert_{from}_to_{to}`).
    ///
    /// Booleans travel as integers; types without a kind can never be converted.
    pub fn converter_kind(&self) -> Option<&'static str> {
        match self {
            Self::Bool | Self::Int => Some("int"),
            Self::Float => Some("float"),
            Self::Vector => Some("vector"),
            Self::Color => Some("color"),
            Self::String => Some("string"),
            Self::Closure | Self::Curve | Self::Ramp | Self::List => None,
        }
    }

    /// Check if a link from `self` into `other` needs no adapter
    pub fn links_directly_to(&self, other: &SocketType) -> bool {
        if self == other {
            return true;
        }
        match (self.converter_kind(), other.converter_kind()) {
            (Some(a), Some(b)) => a == b,
            _ => false,
        }
    }
}

/// A socket on a node schema
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Port {
    /// Slot name in the target system
    pub name: String,
    /// Port direction
    pub direction: PortDirection,
    /// Data type
    pub socket_type: SocketType,
    /// Default value (for inputs)
    pub default_value: Option<Value>,
}

impl Port {
    /// Create a new input port
    pub fn input(name: impl Into<String>, socket_type: SocketType) -> Self {
        Self {
            name: name.into(),
            direction: PortDirection::Input,
            socket_type,
            default_value: None,
        }
    }

    /// Create a new output port
    pub fn output(name: impl Into<String>, socket_type: SocketType) -> Self {
        Self {
            name: name.into(),
            direction: PortDirection::Output,
            socket_type,
            default_value: None,
        }
    }

    /// Set the default value
    pub fn with_default(mut self, value: Value) -> Self {
        self.default_value = Some(value);
        self
    }
}
