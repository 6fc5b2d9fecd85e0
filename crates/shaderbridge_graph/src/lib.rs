// SPDX-License-Identifier: MIT OR Apache-2.0
//! Shading network model for `ShaderBridge`.
//!
//! This crate provides the data side of the Blender to Gaffer/Cycles bridge:
//! - Source shading networks (nodes, typed values, links, nested groups)
//! - Typed sockets and the target node schema registry
//! - The built-in Cycles node vocabulary
//! - The JSON exchange document
//! - Structural content hashing for deduplication
//!
//! ## Architecture
//!
//! A [`ShaderNetwork`] is built once from a document (or by the exporter) and is
//! immutable afterwards. Translation into a target graph lives in the
//! `shaderbridge_translate` crate; nothing here touches the target system.

pub mod value;
pub mod port;
pub mod node;
pub mod connection;
pub mod graph;
pub mod hash;
pub mod document;
pub mod graphs;

pub use value::{CurvePoint, HandleType, RampStop, Scalar, Value};
pub use port::{Port, PortDirection, SocketType};
pub use node::{NodeCategory, NodeRegistry, NodeRole, NodeSchema, ShaderNode};
pub use connection::Link;
pub use graph::{NetworkError, ShaderNetwork};
pub use hash::ContentHash;
pub use document::{DocumentError, HierarchyEntry, NetworkDoc, NodeDoc, SceneDocument};
