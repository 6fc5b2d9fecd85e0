// SPDX-License-Identifier: MIT OR Apache-2.0
//! Translation engine for `ShaderBridge`.
//!
//! Converts shading networks exported from Blender into Gaffer/Cycles node
//! graphs:
//! - Scene walking with content-hash deduplication
//! - Node type resolution, including mode-dependent variants
//! - Parameter and socket name resolution across naming conventions
//! - Graph building with adapter insertion and ordered terminal assignments
//! - Recursive node-group translation with boundary promotion
//!
//! ## Entry points
//!
//! - [`export_scene_to_document`] turns a source scene into the exchange document
//! - [`import_document_into_graph`] builds the document into a [`TargetGraph`]
//!
//! ## Threading
//!
//! The pipeline is single-threaded and synchronous. A [`TargetGraph`] must not
//! be shared between concurrent imports; calling into the same target
//! container from several threads is unsupported.

pub mod config;
pub mod error;
pub mod resolver;
pub mod params;
pub mod target;
pub mod memory;
pub mod report;
pub mod builder;
pub mod special;
pub mod group;
pub mod dedup;
pub mod walker;
pub mod export;
pub mod pipeline;

pub use config::TranslatorConfig;
pub use error::BridgeError;
pub use resolver::{sanitize_identifier, NodeTypeResolver, ResolvedType};
pub use params::{ParameterTranslator, SlotResolution};
pub use target::{ContainerId, SceneEnd, SocketRef, TargetError, TargetGraph, TargetNodeId, TerminalRole};
pub use memory::MemoryGraph;
pub use report::{DropReason, NetworkReport, TranslationReport};
pub use builder::{BuildOutcome, GraphBuilder, NetworkHandle};
pub use group::GroupHandle;
pub use dedup::DedupCache;
pub use walker::{MemoryScene, ObjectKind, SceneSource, SceneWalk, SceneWalker, ShadingAttribute, WalkedNetwork};
pub use export::{
    ExportOptions, HierarchyExporter, MaterialExporter, SceneExporter, SourceMaterial, SourceNode, SourceObject,
    SourceObjectType, SourceScene, SourceTree,
};
pub use pipeline::{
    export_scene_to_document, import_document_into_graph, load_document, FallbackHandle, ImportResult, Importer,
};
