// SPDX-License-Identifier: MIT OR Apache-2.0
//! Run reports.
//!
//! Every per-node, per-link and per-parameter failure ends up here instead of
//! aborting the run. A network with any such failure is flagged degraded.

use crate::target::TerminalRole;
use serde::Serialize;
use shaderbridge_graph::{ContentHash, Link, SocketType};
use std::fmt;

/// Why a link was not built
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum DropReason {
    /// An endpoint node was not instantiated
    MissingEndpoint(String),
    /// A socket label matched no slot
    UnresolvedSocket(String),
    /// The socket types differ and no adapter exists
    IncompatibleTypes {
        /// Source socket type
        from: SocketType,
        /// Destination socket type
        to: SocketType,
    },
    /// A link into the output marker names no known stage
    UnknownTerminal(String),
    /// A second link into the same output stage
    DuplicateTerminal(TerminalRole),
    /// A group boundary marker used where it has no meaning
    MisplacedMarker(String),
    /// A group input wired straight to a group output
    PassThrough,
    /// The target graph refused the connection
    Rejected(String),
}

impl fmt::Display for DropReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingEndpoint(node) => write!(f, "endpoint node '{node}' was not built"),
            Self::UnresolvedSocket(socket) => write!(f, "no slot matches socket '{socket}'"),
            Self::IncompatibleTypes { from, to } => write!(f, "no adapter from {from:?} to {to:?}"),
            Self::UnknownTerminal(socket) => write!(f, "unknown output stage '{socket}'"),
            Self::DuplicateTerminal(role) => write!(f, "{role} stage already connected"),
            Self::MisplacedMarker(node) => write!(f, "marker '{node}' has no meaning here"),
            Self::PassThrough => f.write_str("group input wired straight to group output"),
            Self::Rejected(message) => write!(f, "rejected by target: {message}"),
        }
    }
}

/// A link that was not built
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DroppedLink {
    /// The source link
    pub link: Link,
    /// Why it was dropped
    pub reason: DropReason,
}

/// A node that was not instantiated because its type is unknown
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UnknownNode {
    /// Node ID, qualified by its group path
    pub node: String,
    /// Source type identifier
    pub source_type: String,
    /// Type name that was looked up
    pub resolved_type: String,
}

/// A parameter that was not applied
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParamIssue {
    /// Node ID, qualified by its group path
    pub node: String,
    /// Source parameter name
    pub param: String,
}

/// Outcome of building one network
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct NetworkReport {
    /// Network name
    pub network: String,
    /// Content hash
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hash: Option<ContentHash>,
    /// Some part of the network could not be translated
    pub degraded: bool,
    /// The network has no links and was replaced by a placeholder
    pub empty: bool,
    /// Shader nodes created, adapters excluded
    pub nodes_built: usize,
    /// Adapter nodes inserted on mismatched links
    pub converters_inserted: usize,
    /// Output stages in chain order
    pub terminal_stages: Vec<TerminalRole>,
    /// Nodes with an unknown type
    pub unknown_nodes: Vec<UnknownNode>,
    /// Links that were not built
    pub dropped_links: Vec<DroppedLink>,
    /// Parameters with no matching slot
    pub unresolved_params: Vec<ParamIssue>,
    /// Parameters the target cannot represent
    pub unsupported_params: Vec<ParamIssue>,
    /// Scene locations assigned to this network
    pub locations: Vec<String>,
}

impl NetworkReport {
    /// Create an empty report for a network
    pub fn new(network: impl Into<String>) -> Self {
        Self {
            network: network.into(),
            ..Self::default()
        }
    }

    /// Record a node with an unknown type
    pub fn unknown_node(&mut self, node: String, source_type: &str, resolved_type: &str) {
        tracing::warn!(
            "Unknown node type in '{}': {} ({} -> {})",
            self.network,
            node,
            source_type,
            resolved_type
        );
        self.degraded = true;
        self.unknown_nodes.push(UnknownNode {
            node,
            source_type: source_type.to_string(),
            resolved_type: resolved_type.to_string(),
        });
    }

    /// Record a dropped link
    pub fn drop_link(&mut self, link: &Link, reason: DropReason) {
        tracing::warn!("Dropped link in '{}': {} ({})", self.network, link, reason);
        self.degraded = true;
        self.dropped_links.push(DroppedLink {
            link: link.clone(),
            reason,
        });
    }

    /// Record a parameter with no matching slot.
    ///
    /// Structural parameters (curve points, ramp stops, image paths) degrade
    /// the network; others are best effort.
    pub fn unresolved_param(&mut self, node: String, param: &str, structural: bool) {
        if structural {
            tracing::warn!("Structural parameter '{}' of '{}' could not be applied", param, node);
            self.degraded = true;
        }
        self.unresolved_params.push(ParamIssue {
            node,
            param: param.to_string(),
        });
    }

    /// Record a parameter the target cannot represent
    pub fn unsupported_param(&mut self, node: String, param: &str) {
        tracing::debug!("Unsupported parameter '{}' of '{}'", param, node);
        self.unsupported_params.push(ParamIssue {
            node,
            param: param.to_string(),
        });
    }
}

/// A scene location that got no network
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedLocation {
    /// Location path
    pub path: String,
    /// Why it was skipped
    pub reason: String,
}

/// Outcome of a whole run
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TranslationReport {
    /// Per-network reports in build order
    pub networks: Vec<NetworkReport>,
    /// Locations whose attribute could not be read
    pub skipped_locations: Vec<SkippedLocation>,
    /// Locations assigned to the fallback shader
    pub fallback_locations: Vec<String>,
    /// Networks reused from the dedup cache
    pub dedup_hits: usize,
    /// Materials no scene location refers to
    pub unreferenced_materials: Vec<String>,
}

impl TranslationReport {
    /// Networks flagged degraded
    pub fn degraded_networks(&self) -> impl Iterator<Item = &NetworkReport> {
        self.networks.iter().filter(|n| n.degraded)
    }

    /// Find a network report by name
    pub fn network(&self, name: &str) -> Option<&NetworkReport> {
        self.networks.iter().find(|n| n.network == name)
    }

    /// One-line summary for logs
    pub fn summary(&self) -> String {
        format!(
            "{} networks ({} degraded), {} dedup hits, {} skipped locations, {} fallback locations",
            self.networks.len(),
            self.degraded_networks().count(),
            self.dedup_hits,
            self.skipped_locations.len(),
            self.fallback_locations.len()
        )
    }
}
