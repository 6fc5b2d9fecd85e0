// SPDX-License-Identifier: MIT OR Apache-2.0
//! Scene walker.
//!
//! Depth-first traversal of a scene hierarchy. Every mesh location carrying
//! the shading attribute yields one network; networks with a content hash
//! already seen in the walk only gain the location.

use crate::config::TranslatorConfig;
use crate::report::SkippedLocation;
use crate::resolver::sanitize_identifier;
use indexmap::IndexMap;
use serde::Deserialize;
use serde_json::Value as Json;
use shaderbridge_graph::{ContentHash, DocumentError, NetworkDoc, SceneDocument, ShaderNetwork};
use std::collections::HashMap;

/// Geometry type of a scene location
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ObjectKind {
    /// Renderable mesh
    Mesh,
    /// Anything else (transforms, groups)
    #[default]
    Other,
}

/// A shading attribute as stored on a location
#[derive(Debug, Clone, PartialEq)]
pub struct ShadingAttribute {
    /// Name of the network the attribute holds
    pub material: String,
    /// Network document entry
    pub payload: Json,
}

/// Read access to a scene hierarchy
pub trait SceneSource {
    /// Child names of a location, in scene order
    fn child_names(&self, path: &str) -> Vec<String>;

    /// Geometry type of a location
    fn object_kind(&self, path: &str) -> ObjectKind;

    /// Attribute of a location
    fn attribute(&self, path: &str, name: &str) -> Option<&ShadingAttribute>;
}

#[derive(Debug, Clone, Default)]
struct SceneLocation {
    kind: ObjectKind,
    children: Vec<String>,
    attributes: IndexMap<String, ShadingAttribute>,
}

/// In-memory scene hierarchy
#[derive(Debug, Clone)]
pub struct MemoryScene {
    locations: IndexMap<String, SceneLocation>,
    unreferenced: Vec<String>,
}

impl Default for MemoryScene {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryScene {
    /// Create a scene holding only the root location `/`
    pub fn new() -> Self {
        let mut locations = IndexMap::new();
        locations.insert("/".to_string(), SceneLocation::default());
        Self {
            locations,
            unreferenced: Vec::new(),
        }
    }

    /// Add a location and any missing ancestors
    pub fn add_location(&mut self, path: &str, kind: ObjectKind) {
        let mut parent = "/".to_string();
        for name in path.split('/').filter(|s| !s.is_empty()) {
            let child = child_path(&parent, name);
            if !self.locations.contains_key(&child) {
                self.locations.insert(child.clone(), SceneLocation::default());
                if let Some(location) = self.locations.get_mut(&parent) {
                    location.children.push(name.to_string());
                }
            }
            parent = child;
        }
        if let Some(location) = self.locations.get_mut(&parent) {
            if kind == ObjectKind::Mesh {
                location.kind = kind;
            }
        }
    }

    /// Set an attribute on an existing location
    pub fn set_attribute(&mut self, path: &str, name: &str, attribute: ShadingAttribute) -> bool {
        match self.locations.get_mut(&normalize_path(path)) {
            Some(location) => {
                location.attributes.insert(name.to_string(), attribute);
                true
            }
            None => false,
        }
    }

    /// All location paths
    pub fn locations(&self) -> impl Iterator<Item = &str> {
        self.locations.keys().map(String::as_str)
    }

    /// Materials of the source document no location refers to
    pub fn unreferenced_materials(&self) -> &[String] {
        &self.unreferenced
    }

    /// Lay out a document as a scene.
    ///
    /// Each hierarchy entry becomes a mesh location carrying its lowest-slot
    /// material. Multi-material meshes split into one sub-location per material
    /// when `split_sub_meshes` is set. A document without a hierarchy puts each
    /// material at `/<material>`.
    pub fn from_document(document: &SceneDocument, config: &TranslatorConfig) -> Self {
        let mut scene = Self::new();
        let attribute = config.surface_attribute.as_str();

        if document.hierarchy.is_empty() {
            for name in document.materials.keys() {
                let path = format!("/{}", sanitize_identifier(name));
                scene.add_location(&path, ObjectKind::Mesh);
                scene.attach_material(document, &path, attribute, name);
            }
            return scene;
        }

        let mut referenced: Vec<&str> = Vec::new();
        for (object, entry) in &document.hierarchy {
            let path = if entry.path.is_empty() {
                tracing::warn!("Hierarchy entry '{}' has no path", object);
                format!("{}/{}", config.location_root, sanitize_identifier(object))
            } else {
                normalize_path(&entry.path)
            };

            let mut slots: Vec<(&String, &String)> = entry.mat_by_index.iter().collect();
            slots.sort_by_key(|(index, _)| index.parse::<usize>().unwrap_or(usize::MAX));
            let mut materials: Vec<&str> = Vec::new();
            for (_, material) in slots {
                if !materials.contains(&material.as_str()) {
                    materials.push(material);
                }
            }

            if config.split_sub_meshes && entry.has_multiple_mat && materials.len() > 1 {
                scene.add_location(&path, ObjectKind::Other);
                for material in &materials {
                    let sub = child_path(&path, &sanitize_identifier(material));
                    scene.add_location(&sub, ObjectKind::Mesh);
                    scene.attach_material(document, &sub, attribute, material);
                }
                referenced.extend(materials);
            } else {
                scene.add_location(&path, ObjectKind::Mesh);
                if let Some((first, rest)) = materials.split_first() {
                    scene.attach_material(document, &path, attribute, first);
                    referenced.push(*first);
                    if !rest.is_empty() {
                        tracing::warn!(
                            "Location '{}' uses {} materials without sub-mesh splitting, only '{}' is assigned; dropped: {}",
                            path,
                            materials.len(),
                            first,
                            rest.join(", ")
                        );
                    }
                }
            }
        }

        scene.unreferenced = document
            .materials
            .keys()
            .filter(|name| !referenced.contains(&name.as_str()))
            .cloned()
            .collect();
        if !scene.unreferenced.is_empty() {
            tracing::info!("{} materials are not used by any location", scene.unreferenced.len());
        }
        scene
    }

    fn attach_material(&mut self, document: &SceneDocument, path: &str, attribute: &str, material: &str) {
        let Some(doc) = document.materials.get(material) else {
            tracing::warn!("Location '{}' refers to missing material '{}'", path, material);
            return;
        };
        match serde_json::to_value(doc) {
            Ok(payload) => {
                self.set_attribute(
                    path,
                    attribute,
                    ShadingAttribute {
                        material: material.to_string(),
                        payload,
                    },
                );
            }
            Err(e) => tracing::warn!("Could not encode material '{}': {}", material, e),
        }
    }
}

impl SceneSource for MemoryScene {
    fn child_names(&self, path: &str) -> Vec<String> {
        self.locations
            .get(&normalize_path(path))
            .map(|l| l.children.clone())
            .unwrap_or_default()
    }

    fn object_kind(&self, path: &str) -> ObjectKind {
        self.locations
            .get(&normalize_path(path))
            .map(|l| l.kind)
            .unwrap_or_default()
    }

    fn attribute(&self, path: &str, name: &str) -> Option<&ShadingAttribute> {
        self.locations.get(&normalize_path(path))?.attributes.get(name)
    }
}

/// A unique network found by the walk
#[derive(Debug, Clone)]
pub struct WalkedNetwork {
    /// Content hash
    pub hash: ContentHash,
    /// The network, named after the first material that produced it
    pub network: ShaderNetwork,
    /// Every location that carries it, in walk order
    pub locations: Vec<String>,
}

/// Result of a walk
#[derive(Debug, Clone, Default)]
pub struct SceneWalk {
    /// Unique networks in first-seen order
    pub networks: Vec<WalkedNetwork>,
    /// Locations whose attribute could not be parsed
    pub skipped: Vec<SkippedLocation>,
    /// Mesh locations without the attribute
    pub uncovered: Vec<String>,
    /// Locations that reused an already seen network
    pub dedup_hits: usize,
}

/// Walks a scene collecting shading networks
pub struct SceneWalker<'a> {
    attribute: &'a str,
}

impl<'a> SceneWalker<'a> {
    /// Create a walker reading the named attribute
    pub fn new(attribute: &'a str) -> Self {
        Self { attribute }
    }

    /// Walk the scene below `root`
    pub fn walk(&self, scene: &impl SceneSource, root: &str) -> SceneWalk {
        let mut walk = SceneWalk::default();
        let mut seen: HashMap<ContentHash, usize> = HashMap::new();
        let mut stack = vec![normalize_path(root)];

        while let Some(path) = stack.pop() {
            let children = scene.child_names(&path);
            stack.extend(children.iter().rev().map(|name| child_path(&path, name)));

            if scene.object_kind(&path) != ObjectKind::Mesh {
                continue;
            }
            let Some(attribute) = scene.attribute(&path, self.attribute) else {
                walk.uncovered.push(path);
                continue;
            };

            match extract(attribute) {
                Ok(network) => {
                    let hash = network.content_hash();
                    if let Some(&index) = seen.get(&hash) {
                        tracing::debug!("Location '{}' reuses network {}", path, hash.short());
                        walk.networks[index].locations.push(path);
                        walk.dedup_hits += 1;
                    } else {
                        seen.insert(hash, walk.networks.len());
                        walk.networks.push(WalkedNetwork {
                            hash,
                            network,
                            locations: vec![path],
                        });
                    }
                }
                Err(e) => {
                    tracing::warn!("Skipping location '{}': {}", path, e);
                    walk.skipped.push(SkippedLocation {
                        path,
                        reason: e.to_string(),
                    });
                }
            }
        }

        tracing::debug!(
            "Walked {} networks, {} dedup hits, {} skipped",
            walk.networks.len(),
            walk.dedup_hits,
            walk.skipped.len()
        );
        walk
    }
}

fn extract(attribute: &ShadingAttribute) -> Result<ShaderNetwork, DocumentError> {
    let doc = NetworkDoc::deserialize(&attribute.payload)?;
    doc.to_network(&attribute.material)
}

fn normalize_path(path: &str) -> String {
    let trimmed = path.trim_matches('/');
    format!("/{trimmed}")
}

fn child_path(parent: &str, name: &str) -> String {
    if parent == "/" {
        format!("/{name}")
    } else {
        format!("{parent}/{name}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shaderbridge_graph::HierarchyEntry;

    const MATERIALS: &str = r#"{
        "Red": {
            "nodes": {
                "Material Output": {"type": "ShaderNodeOutputMaterial", "cycles_type": "material_output"},
                "BSDF": {"type": "ShaderNodeBsdfDiffuse", "cycles_type": "diffuse_bsdf", "params": {"Color": [1.0, 0.0, 0.0, 1.0]}}
            },
            "links": [{"from_node": "BSDF", "from_socket": "BSDF", "to_node": "Material Output", "to_socket": "Surface"}]
        },
        "Blue": {
            "nodes": {
                "Material Output": {"type": "ShaderNodeOutputMaterial", "cycles_type": "material_output"},
                "BSDF": {"type": "ShaderNodeBsdfDiffuse", "cycles_type": "diffuse_bsdf", "params": {"Color": [0.0, 0.0, 1.0, 1.0]}}
            },
            "links": [{"from_node": "BSDF", "from_socket": "BSDF", "to_node": "Material Output", "to_socket": "Surface"}]
        }
    }"#;

    fn entry(path: &str, materials: &[&str]) -> HierarchyEntry {
        HierarchyEntry {
            path: path.to_string(),
            mat_by_index: materials
                .iter()
                .enumerate()
                .map(|(i, m)| (i.to_string(), m.to_string()))
                .collect(),
            has_multiple_mat: materials.len() > 1,
        }
    }

    #[test]
    fn test_scene_without_hierarchy() {
        let doc = SceneDocument::from_json_str(MATERIALS).unwrap();
        let scene = MemoryScene::from_document(&doc, &TranslatorConfig::default());
        assert_eq!(scene.child_names("/"), vec!["Red".to_string(), "Blue".to_string()]);
        assert_eq!(scene.object_kind("/Red"), ObjectKind::Mesh);
        assert_eq!(scene.attribute("/Red", "cycles:surface").unwrap().material, "Red");
    }

    #[test]
    fn test_scene_from_hierarchy() {
        let mut doc = SceneDocument::from_json_str(MATERIALS).unwrap();
        doc.hierarchy.insert("Cube".to_string(), entry("/root/Cube/CubeMesh", &["Red", "Blue"]));
        let scene = MemoryScene::from_document(&doc, &TranslatorConfig::default());

        assert_eq!(scene.object_kind("/root/Cube"), ObjectKind::Other);
        assert_eq!(scene.object_kind("/root/Cube/CubeMesh"), ObjectKind::Mesh);
        assert_eq!(scene.attribute("/root/Cube/CubeMesh", "cycles:surface").unwrap().material, "Red");
        assert_eq!(scene.unreferenced_materials(), ["Blue".to_string()]);
    }

    #[test]
    fn test_unsplit_secondary_material_used_elsewhere() {
        let mut doc = SceneDocument::from_json_str(MATERIALS).unwrap();
        doc.hierarchy.insert("Cube".to_string(), entry("/root/Cube", &["Red", "Blue"]));
        doc.hierarchy.insert("Ball".to_string(), entry("/root/Ball", &["Blue"]));
        let scene = MemoryScene::from_document(&doc, &TranslatorConfig::default());

        assert_eq!(scene.attribute("/root/Cube", "cycles:surface").unwrap().material, "Red");
        assert_eq!(scene.attribute("/root/Ball", "cycles:surface").unwrap().material, "Blue");
        assert!(scene.unreferenced_materials().is_empty());
    }

    #[test]
    fn test_split_sub_meshes() {
        let mut doc = SceneDocument::from_json_str(MATERIALS).unwrap();
        doc.hierarchy.insert("Cube".to_string(), entry("/root/Cube", &["Red", "Blue"]));
        let config = TranslatorConfig {
            split_sub_meshes: true,
            ..TranslatorConfig::default()
        };
        let scene = MemoryScene::from_document(&doc, &config);

        assert_eq!(scene.object_kind("/root/Cube"), ObjectKind::Other);
        assert_eq!(scene.child_names("/root/Cube"), vec!["Red".to_string(), "Blue".to_string()]);
        assert_eq!(scene.attribute("/root/Cube/Blue", "cycles:surface").unwrap().material, "Blue");
    }

    #[test]
    fn test_unreferenced_materials() {
        let mut doc = SceneDocument::from_json_str(MATERIALS).unwrap();
        doc.hierarchy.insert("Cube".to_string(), entry("/root/Cube", &["Red"]));
        let scene = MemoryScene::from_document(&doc, &TranslatorConfig::default());
        assert_eq!(scene.unreferenced_materials(), ["Blue".to_string()]);
    }

    #[test]
    fn test_walk_dedups_identical_networks() {
        let mut doc = SceneDocument::from_json_str(MATERIALS).unwrap();
        doc.hierarchy.insert("A".to_string(), entry("/root/A", &["Red"]));
        doc.hierarchy.insert("B".to_string(), entry("/root/B", &["Red"]));
        doc.hierarchy.insert("C".to_string(), entry("/root/C", &["Blue"]));
        doc.hierarchy.insert("D".to_string(), entry("/root/D", &[]));
        let scene = MemoryScene::from_document(&doc, &TranslatorConfig::default());

        let walk = SceneWalker::new("cycles:surface").walk(&scene, "/");
        assert_eq!(walk.networks.len(), 2);
        assert_eq!(walk.networks[0].network.name, "Red");
        assert_eq!(walk.networks[0].locations, vec!["/root/A".to_string(), "/root/B".to_string()]);
        assert_eq!(walk.networks[1].locations, vec!["/root/C".to_string()]);
        assert_eq!(walk.dedup_hits, 1);
        assert_eq!(walk.uncovered, vec!["/root/D".to_string()]);
    }

    #[test]
    fn test_unparseable_attribute_is_skipped() {
        let mut scene = MemoryScene::new();
        scene.add_location("/root/Broken", ObjectKind::Mesh);
        scene.add_location("/root/Dangling", ObjectKind::Mesh);
        scene.set_attribute(
            "/root/Broken",
            "cycles:surface",
            ShadingAttribute {
                material: "Broken".to_string(),
                payload: Json::String("not a network".to_string()),
            },
        );
        scene.set_attribute(
            "/root/Dangling",
            "cycles:surface",
            ShadingAttribute {
                material: "Dangling".to_string(),
                payload: serde_json::json!({
                    "nodes": {},
                    "links": [{"from_node": "A", "from_socket": "x", "to_node": "B", "to_socket": "y"}]
                }),
            },
        );

        let walk = SceneWalker::new("cycles:surface").walk(&scene, "/root");
        assert!(walk.networks.is_empty());
        assert_eq!(walk.skipped.len(), 2);
        assert_eq!(walk.skipped[0].path, "/root/Broken");
    }
}
