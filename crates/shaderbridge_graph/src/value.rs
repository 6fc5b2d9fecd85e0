// SPDX-License-Identifier: MIT OR Apache-2.0
//! Parameter values carried by shader nodes.

use crate::port::SocketType;
use serde::{Deserialize, Serialize};
use serde_json::Value as Json;

/// Handle type of a curve control point, as authored in the source application
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum HandleType {
    /// Automatic smooth handles
    #[default]
    Auto,
    /// Automatic handles clamped to avoid overshoot
    AutoClamped,
    /// Straight segments
    Vector,
    /// Free handles
    Free,
    /// Aligned handles
    Aligned,
}

impl HandleType {
    /// Parse the source application's handle identifier (`AUTO`, `VECTOR`, ...)
    pub fn parse(name: &str) -> Option<Self> {
        match name.to_ascii_uppercase().as_str() {
            "AUTO" => Some(Self::Auto),
            "AUTO_CLAMPED" => Some(Self::AutoClamped),
            "VECTOR" => Some(Self::Vector),
            "FREE" => Some(Self::Free),
            "ALIGNED" => Some(Self::Aligned),
            _ => None,
        }
    }

    /// Source identifier for this handle type
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Auto => "AUTO",
            Self::AutoClamped => "AUTO_CLAMPED",
            Self::Vector => "VECTOR",
            Self::Free => "FREE",
            Self::Aligned => "ALIGNED",
        }
    }
}

/// A control point of a scalar curve
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CurvePoint {
    /// Position along the curve
    pub x: f32,
    /// Curve value at `x`
    pub y: f32,
    /// Handle/interpolation hint
    pub handle: HandleType,
}

impl CurvePoint {
    /// Create a new control point
    pub fn new(x: f32, y: f32, handle: HandleType) -> Self {
        Self { x, y, handle }
    }
}

/// A colour stop of a ramp
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RampStop {
    /// Position in `[0, 1]`
    pub position: f32,
    /// RGBA colour
    pub color: [f32; 4],
}

/// Scalar element of a list value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Scalar {
    /// Boolean
    Bool(bool),
    /// Integer
    Int(i64),
    /// Float
    Float(f32),
    /// String
    String(String),
}

impl Scalar {
    fn from_json(json: &Json) -> Option<Self> {
        match json {
            Json::Bool(b) => Some(Self::Bool(*b)),
            Json::Number(n) => match n.as_i64() {
                Some(i) => Some(Self::Int(i)),
                None => n.as_f64().map(|f| Self::Float(f as f32)),
            },
            Json::String(s) => Some(Self::String(s.clone())),
            _ => None,
        }
    }

    fn to_json(&self) -> Json {
        match self {
            Self::Bool(b) => Json::from(*b),
            Self::Int(i) => Json::from(*i),
            Self::Float(f) => Json::from(f64::from(*f)),
            Self::String(s) => Json::from(s.as_str()),
        }
    }
}

/// Value of a node parameter
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Value {
    /// Boolean
    Bool(bool),
    /// Integer
    Int(i64),
    /// Float
    Float(f32),
    /// String (also used for enum parameters)
    String(String),
    /// 3D vector
    Vector3([f32; 3]),
    /// RGB colour
    Color3([f32; 3]),
    /// Plain list of scalars
    List(Vec<Scalar>),
    /// Scalar curve control points, in order
    Curve(Vec<CurvePoint>),
    /// Colour ramp stops, in order
    Ramp(Vec<RampStop>),
}

impl Value {
    /// Get the socket type for this value
    pub fn socket_type(&self) -> SocketType {
        match self {
            Self::Bool(_) => SocketType::Bool,
            Self::Int(_) => SocketType::Int,
            Self::Float(_) => SocketType::Float,
            Self::String(_) => SocketType::String,
            Self::Vector3(_) => SocketType::Vector,
            Self::Color3(_) => SocketType::Color,
            Self::List(_) => SocketType::List,
            Self::Curve(_) => SocketType::Curve,
            Self::Ramp(_) => SocketType::Ramp,
        }
    }

    /// Numeric view of a scalar value
    pub fn as_f32(&self) -> Option<f32> {
        match self {
            Self::Float(f) => Some(*f),
            Self::Int(i) => Some(*i as f32),
            Self::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
            _ => None,
        }
    }

    /// String view of a string value
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    /// Convert this value so it can be stored in a slot of type `ty`.
    ///
    /// Returns `None` when no lossless-enough conversion exists.
    pub fn coerce_to(&self, ty: &SocketType) -> Option<Value> {
        if self.socket_type() == *ty {
            return Some(self.clone());
        }
        match (self, ty) {
            (Self::Vector3(v), SocketType::Color) => Some(Self::Color3(*v)),
            (Self::Color3(c), SocketType::Vector) => Some(Self::Vector3(*c)),
            (Self::Int(_) | Self::Bool(_), SocketType::Float) => self.as_f32().map(Self::Float),
            (Self::Float(f), SocketType::Int) => Some(Self::Int(f.round() as i64)),
            (Self::Bool(b), SocketType::Int) => Some(Self::Int(i64::from(*b))),
            (Self::Int(i), SocketType::Bool) => Some(Self::Bool(*i != 0)),
            (Self::Float(f), SocketType::Bool) => Some(Self::Bool(*f != 0.0)),
            _ => None,
        }
    }

    /// Decode a value from the exchange document.
    ///
    /// Lists of three floats become vectors, lists of four floats become
    /// colours (alpha is dropped), lists of `[x, y, handle]` triples become
    /// curves and lists of `{"pos", "color"}` objects become ramps.
    pub fn from_json(json: &Json) -> Option<Value> {
        match json {
            Json::Bool(b) => Some(Self::Bool(*b)),
            Json::Number(n) => match n.as_i64() {
                Some(i) => Some(Self::Int(i)),
                None => n.as_f64().map(|f| Self::Float(f as f32)),
            },
            Json::String(s) => Some(Self::String(s.clone())),
            Json::Array(items) => Self::list_from_json(items),
            Json::Null | Json::Object(_) => None,
        }
    }

    fn list_from_json(items: &[Json]) -> Option<Value> {
        let all_floats = !items.is_empty() && items.iter().all(|v| v.is_f64());
        if all_floats {
            let floats: Vec<f32> = items.iter().filter_map(Json::as_f64).map(|f| f as f32).collect();
            return Some(match floats.as_slice() {
                [x, y, z] => Self::Vector3([*x, *y, *z]),
                [r, g, b, _] => Self::Color3([*r, *g, *b]),
                _ => Self::List(floats.into_iter().map(Scalar::Float).collect()),
            });
        }

        if !items.is_empty() && items.iter().all(Json::is_array) {
            return items
                .iter()
                .map(curve_point_from_json)
                .collect::<Option<Vec<_>>>()
                .map(Self::Curve);
        }

        if !items.is_empty() && items.iter().all(Json::is_object) {
            return items
                .iter()
                .map(ramp_stop_from_json)
                .collect::<Option<Vec<_>>>()
                .map(Self::Ramp);
        }

        items
            .iter()
            .map(Scalar::from_json)
            .collect::<Option<Vec<_>>>()
            .map(Self::List)
    }

    /// Encode this value in the exchange document format
    pub fn to_json(&self) -> Json {
        match self {
            Self::Bool(b) => Json::from(*b),
            Self::Int(i) => Json::from(*i),
            Self::Float(f) => Json::from(f64::from(*f)),
            Self::String(s) => Json::from(s.as_str()),
            Self::Vector3(v) => Json::from(v.iter().map(|f| f64::from(*f)).collect::<Vec<_>>()),
            Self::Color3([r, g, b]) => Json::from(vec![f64::from(*r), f64::from(*g), f64::from(*b), 1.0]),
            Self::List(items) => Json::Array(items.iter().map(Scalar::to_json).collect()),
            Self::Curve(points) => Json::Array(
                points
                    .iter()
                    .map(|p| serde_json::json!([f64::from(p.x), f64::from(p.y), p.handle.as_str()]))
                    .collect(),
            ),
            Self::Ramp(stops) => Json::Array(
                stops
                    .iter()
                    .map(|s| {
                        let color: Vec<f64> = s.color.iter().map(|c| f64::from(*c)).collect();
                        serde_json::json!({ "pos": f64::from(s.position), "color": color })
                    })
                    .collect(),
            ),
        }
    }
}

fn curve_point_from_json(json: &Json) -> Option<CurvePoint> {
    let [x, y, handle] = json.as_array()?.as_slice() else {
        return None;
    };
    Some(CurvePoint {
        x: x.as_f64()? as f32,
        y: y.as_f64()? as f32,
        handle: HandleType::parse(handle.as_str()?)?,
    })
}

fn ramp_stop_from_json(json: &Json) -> Option<RampStop> {
    let position = json.get("pos")?.as_f64()? as f32;
    let channels: Vec<f32> = json
        .get("color")?
        .as_array()?
        .iter()
        .map(|c| c.as_f64().map(|f| f as f32))
        .collect::<Option<_>>()?;
    let color = match channels.as_slice() {
        [r, g, b, a] => [*r, *g, *b, *a],
        [r, g, b] => [*r, *g, *b, 1.0],
        _ => return None,
    };
    Some(RampStop { position, color })
}
