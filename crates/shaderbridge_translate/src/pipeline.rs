// SPDX-License-Identifier: MIT OR Apache-2.0
//! Pipeline entry points.
//!
//! Import order:
//! 1. Lay the document out as a scene and walk it
//! 2. Create the `Materials` container and its fallback box
//! 3. Build each unique network once, chained after the previous box
//! 4. Route every location without a working network to the fallback box

use crate::builder::{GraphBuilder, NetworkHandle};
use crate::config::TranslatorConfig;
use crate::dedup::DedupCache;
use crate::error::BridgeError;
use crate::export::{ExportOptions, SceneExporter, SourceScene};
use crate::report::TranslationReport;
use crate::target::{ContainerId, SceneEnd, SocketRef, TargetError, TargetGraph, TargetNodeId, TerminalRole, ASSIGNMENT_SHADER_SLOT};
use crate::walker::{MemoryScene, SceneWalker};
use indexmap::IndexMap;
use shaderbridge_graph::graphs::cycles::create_cycles_registry;
use shaderbridge_graph::{NodeRegistry, SceneDocument, ShaderNetwork, Value};
use std::path::Path;

/// Name of the container holding every imported network
pub const MATERIALS_CONTAINER: &str = "Materials";

/// Name of the fallback box
pub const FALLBACK_CONTAINER: &str = "Fallback";

/// Shader type of the fallback marker
const FALLBACK_SHADER: &str = "emission";

/// Handle to the fallback box
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FallbackHandle {
    /// The box
    pub container: ContainerId,
    /// Emission shader carrying the marker color
    pub shader: TargetNodeId,
    /// Assignment filtered by the unmatched locations
    pub assignment: TargetNodeId,
}

/// Result of an import
#[derive(Debug, Clone)]
pub struct ImportResult {
    /// Run report
    pub report: TranslationReport,
    /// Container holding every box
    pub materials_box: ContainerId,
    /// Built networks by name
    pub handles: IndexMap<String, NetworkHandle>,
    /// Fallback box
    pub fallback: FallbackHandle,
}

/// Imports documents into a target graph.
///
/// The dedup cache lives as long as the importer but is cleared at the start
/// of every [`Importer::import`].
pub struct Importer<'a> {
    config: &'a TranslatorConfig,
    registry: NodeRegistry,
    cache: DedupCache,
}

impl<'a> Importer<'a> {
    /// Create an importer with the built-in Cycles vocabulary
    pub fn new(config: &'a TranslatorConfig) -> Self {
        Self::with_registry(config, create_cycles_registry())
    }

    /// Create an importer with a custom vocabulary
    pub fn with_registry(config: &'a TranslatorConfig, registry: NodeRegistry) -> Self {
        Self {
            config,
            registry,
            cache: DedupCache::new(),
        }
    }

    /// Networks built in the current run
    pub fn cache(&self) -> &DedupCache {
        &self.cache
    }

    /// Build a network unless one with the same content hash was built in
    /// this run, then assign `locations` to it.
    ///
    /// Returns the handle and whether it came from the cache. A new network's
    /// report is appended to `report`; a reused one gains the locations.
    pub fn build_or_reuse<G: TargetGraph>(
        &mut self,
        target: &mut G,
        parent: ContainerId,
        network: &ShaderNetwork,
        locations: &[String],
        report: &mut TranslationReport,
    ) -> Result<(NetworkHandle, bool), TargetError> {
        let hash = network.content_hash();
        let mut builder = GraphBuilder::new(target, &self.registry, self.config);

        if let Some(entry) = self.cache.get(&hash) {
            let handle = entry.handle.clone();
            let name = entry.network.clone();
            tracing::debug!("Reusing network '{}' for '{}'", name, network.name);
            builder.register_locations(&handle, locations)?;
            self.cache.register_locations(&hash, locations);
            if let Some(existing) = report.networks.iter_mut().find(|n| n.network == name) {
                extend_unique(&mut existing.locations, locations);
            }
            report.dedup_hits += 1;
            return Ok((handle, true));
        }

        let outcome = builder.build(network, parent)?;
        builder.register_locations(&outcome.handle, locations)?;
        let mut network_report = outcome.report;
        extend_unique(&mut network_report.locations, locations);
        report.networks.push(network_report);

        self.cache.insert(hash, network.name.clone(), outcome.handle.clone());
        self.cache.register_locations(&hash, locations);
        Ok((outcome.handle, false))
    }

    /// Import a whole document under `parent`
    pub fn import<G: TargetGraph>(
        &mut self,
        document: &SceneDocument,
        target: &mut G,
        parent: ContainerId,
    ) -> Result<ImportResult, BridgeError> {
        self.cache.clear();
        tracing::info!(
            "Importing {} materials, {} hierarchy entries",
            document.materials.len(),
            document.hierarchy.len()
        );

        let scene = MemoryScene::from_document(document, self.config);
        let walk = SceneWalker::new(&self.config.surface_attribute).walk(&scene, "/");

        let mut report = TranslationReport {
            skipped_locations: walk.skipped.clone(),
            dedup_hits: walk.dedup_hits,
            unreferenced_materials: scene.unreferenced_materials().to_vec(),
            ..TranslationReport::default()
        };

        let (materials_box, fallback) = {
            let builder = GraphBuilder::new(&mut *target, &self.registry, self.config);
            let name = builder.unique_name(parent, MATERIALS_CONTAINER)?;
            let materials_box = builder.target.create_container(parent, &name)?;
            (materials_box, self.build_fallback(target, materials_box)?)
        };

        let mut handles = IndexMap::new();
        let mut upstream = SceneEnd::Container(fallback.container);
        let mut unmatched: Vec<String> = Vec::new();

        for walked in &walk.networks {
            let (handle, reused) =
                self.build_or_reuse(target, materials_box, &walked.network, &walked.locations, &mut report)?;
            if !reused {
                target.set_scene_input(SceneEnd::Container(handle.container), upstream)?;
                upstream = SceneEnd::Container(handle.container);
            }
            if !handle.has_stages() {
                extend_unique(&mut unmatched, &walked.locations);
            }
            handles.insert(walked.network.name.clone(), handle);
        }

        extend_unique(&mut unmatched, &walk.uncovered);
        let skipped: Vec<String> = walk.skipped.iter().map(|s| s.path.clone()).collect();
        extend_unique(&mut unmatched, &skipped);

        let filter: Vec<String> = unmatched.iter().map(|path| format!("{path}/...")).collect();
        target.add_filter_paths(fallback.assignment, &filter)?;
        target.set_container_output(materials_box, upstream)?;
        report.fallback_locations = unmatched;

        tracing::info!("Import finished: {}", report.summary());
        for network in report.degraded_networks() {
            tracing::warn!("Network '{}' is degraded", network.network);
        }

        Ok(ImportResult {
            report,
            materials_box,
            handles,
            fallback,
        })
    }

    fn build_fallback<G: TargetGraph>(&self, target: &mut G, parent: ContainerId) -> Result<FallbackHandle, BridgeError> {
        let schema = self
            .registry
            .get(FALLBACK_SHADER)
            .ok_or_else(|| BridgeError::MissingNodeType(FALLBACK_SHADER.to_string()))?;

        let container = target.create_container(parent, FALLBACK_CONTAINER)?;
        let shader = target.create_shader(container, "fallback_marker", schema)?;
        let [r, g, b] = self.config.fallback_color;
        target.set_value(shader, "color", &Value::Color3([r, g, b]))?;

        let assignment = target.create_assignment(container, "surface_assignment", TerminalRole::Surface)?;
        target.connect(
            &SocketRef::node(shader, "emission"),
            &SocketRef::node(assignment, ASSIGNMENT_SHADER_SLOT),
        )?;
        target.set_scene_input(SceneEnd::Node(assignment), SceneEnd::ContainerIn(container))?;
        target.set_container_output(container, SceneEnd::Node(assignment))?;

        Ok(FallbackHandle {
            container,
            shader,
            assignment,
        })
    }
}

fn extend_unique(into: &mut Vec<String>, paths: &[String]) {
    for path in paths {
        if !into.contains(path) {
            into.push(path.clone());
        }
    }
}

/// Export a source scene as an exchange document
pub fn export_scene_to_document(scene: &SourceScene, options: &ExportOptions, config: &TranslatorConfig) -> SceneDocument {
    SceneExporter::new(config).export(scene, options)
}

/// Import a document into `target` under `parent`
pub fn import_document_into_graph<G: TargetGraph>(
    document: &SceneDocument,
    target: &mut G,
    parent: ContainerId,
    config: &TranslatorConfig,
) -> Result<ImportResult, BridgeError> {
    Importer::new(config).import(document, target, parent)
}

/// Read a document, attaching a separate hierarchy file when given
pub fn load_document(path: &Path, hierarchy: Option<&Path>) -> Result<SceneDocument, BridgeError> {
    let text = read(path)?;
    let mut document = SceneDocument::from_json_str(&text)?;
    if let Some(hierarchy) = hierarchy {
        document = document.with_hierarchy_json(&read(hierarchy)?)?;
    }
    tracing::info!("Loaded {:?}: {} materials", path, document.materials.len());
    Ok(document)
}

fn read(path: &Path) -> Result<String, BridgeError> {
    std::fs::read_to_string(path).map_err(|source| BridgeError::Io {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MemoryGraph;
    use shaderbridge_graph::HierarchyEntry;
    use std::io::Write;

    const DOC: &str = r#"{
        "materials": {
            "Red": {
                "nodes": {
                    "Material Output": {"type": "ShaderNodeOutputMaterial", "cycles_type": "material_output"},
                    "BSDF": {"type": "ShaderNodeBsdfDiffuse", "cycles_type": "diffuse_bsdf", "params": {"Color": [1.0, 0.0, 0.0, 1.0]}}
                },
                "links": [{"from_node": "BSDF", "from_socket": "BSDF", "to_node": "Material Output", "to_socket": "Surface"}]
            },
            "Empty": {
                "nodes": {"Material Output": {"type": "ShaderNodeOutputMaterial", "cycles_type": "material_output"}},
                "links": []
            }
        },
        "hierarchy": {
            "Cube": {"path": "/root/Cube/Cube", "mat_by_index": {"0": "Red"}, "has_multiple_mat": false},
            "Plane": {"path": "/root/Plane/Plane", "mat_by_index": {"0": "Empty"}, "has_multiple_mat": false},
            "Sphere": {"path": "/root/Sphere/Sphere", "mat_by_index": {"0": "Missing"}, "has_multiple_mat": false}
        }
    }"#;

    #[test]
    fn test_import_builds_chain_and_fallback() {
        let config = TranslatorConfig::default();
        let document = SceneDocument::from_json_str(DOC).unwrap();
        let mut graph = MemoryGraph::new();
        let root = graph.root();

        let result = import_document_into_graph(&document, &mut graph, root, &config).unwrap();

        let materials = graph.container(result.materials_box).unwrap();
        assert_eq!(materials.name, "Materials");
        let red = result.handles["Red"].container;
        let empty = result.handles["Empty"].container;
        assert_eq!(
            graph.container(red).unwrap().scene_input,
            Some(SceneEnd::Container(result.fallback.container))
        );
        assert_eq!(graph.container(empty).unwrap().scene_input, Some(SceneEnd::Container(red)));
        assert_eq!(materials.scene_output, Some(SceneEnd::Container(empty)));

        let (_, red_assignment) = result.handles["Red"].stages[0];
        assert_eq!(graph.node(red_assignment).unwrap().filter(), ["/root/Cube/Cube".to_string()]);

        let fallback = graph.node(result.fallback.assignment).unwrap();
        assert_eq!(
            fallback.filter(),
            ["/root/Plane/Plane/...".to_string(), "/root/Sphere/Sphere/...".to_string()]
        );
        assert_eq!(
            graph.node(result.fallback.shader).unwrap().value("color"),
            Some(&Value::Color3([1.0, 0.0, 1.0]))
        );

        assert_eq!(result.report.networks.len(), 2);
        assert!(result.report.network("Empty").unwrap().empty);
        assert_eq!(
            result.report.fallback_locations,
            vec!["/root/Plane/Plane".to_string(), "/root/Sphere/Sphere".to_string()]
        );
    }

    #[test]
    fn test_build_or_reuse_hits_cache() {
        let config = TranslatorConfig::default();
        let document = SceneDocument::from_json_str(DOC).unwrap();
        let network = document.materials["Red"].to_network("Red").unwrap();
        let mut renamed = network.clone();
        renamed.name = "RedCopy".to_string();

        let mut graph = MemoryGraph::new();
        let root = graph.root();
        let mut importer = Importer::new(&config);
        let mut report = TranslationReport::default();

        let (first, hit) = importer
            .build_or_reuse(&mut graph, root, &network, &["/a".to_string()], &mut report)
            .unwrap();
        assert!(!hit);
        let (second, hit) = importer
            .build_or_reuse(&mut graph, root, &renamed, &["/b".to_string()], &mut report)
            .unwrap();
        assert!(hit);
        assert_eq!(first, second);
        assert_eq!(graph.containers_in(root).count(), 1);
        assert_eq!(report.dedup_hits, 1);
        assert_eq!(report.networks[0].locations, vec!["/a".to_string(), "/b".to_string()]);
        assert_eq!(importer.cache().len(), 1);
    }

    #[test]
    fn test_load_document_with_hierarchy_file() {
        let dir = tempfile::tempdir().unwrap();
        let materials = dir.path().join("materials.json");
        let hierarchy = dir.path().join("hierarchy.json");
        std::fs::File::create(&materials)
            .unwrap()
            .write_all(br#"{"Red": {"nodes": {}, "links": []}}"#)
            .unwrap();
        std::fs::write(
            &hierarchy,
            r#"{"Cube": {"path": "/root/Cube", "mat_by_index": {"0": "Red"}, "has_multiple_mat": false}}"#,
        )
        .unwrap();

        let document = load_document(&materials, Some(&hierarchy)).unwrap();
        assert_eq!(document.materials.len(), 1);
        assert_eq!(document.hierarchy["Cube"].path, "/root/Cube");
    }

    #[test]
    fn test_unsplit_secondary_material_is_reported() {
        let mut document = SceneDocument::from_json_str(DOC).unwrap();
        let red = document.materials["Red"].clone();
        document.materials.insert("Second".to_string(), red);
        document.hierarchy.clear();
        document.hierarchy.insert(
            "Cube".to_string(),
            HierarchyEntry {
                path: "/root/Cube".to_string(),
                mat_by_index: [("0", "Red"), ("1", "Second")]
                    .into_iter()
                    .map(|(i, m)| (i.to_string(), m.to_string()))
                    .collect(),
                has_multiple_mat: true,
            },
        );

        let config = TranslatorConfig::default();
        let mut graph = MemoryGraph::new();
        let root = graph.root();
        let result = import_document_into_graph(&document, &mut graph, root, &config).unwrap();

        assert_eq!(result.handles.len(), 1);
        assert!(result.handles.contains_key("Red"));
        assert_eq!(
            result.report.unreferenced_materials,
            vec!["Empty".to_string(), "Second".to_string()]
        );
    }

    #[test]
    fn test_missing_document_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let result = load_document(&dir.path().join("missing.json"), None);
        assert!(matches!(result, Err(BridgeError::Io { .. })));
    }
}
