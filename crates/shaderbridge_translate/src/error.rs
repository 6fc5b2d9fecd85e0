// SPDX-License-Identifier: MIT OR Apache-2.0
//! Fatal pipeline errors.
//!
//! Only failures that abort a whole run surface here. Per-node, per-link and
//! per-parameter failures are recorded in the run report instead.

use crate::config::ConfigError;
use crate::target::TargetError;
use shaderbridge_graph::DocumentError;
use std::path::PathBuf;

/// Error that aborts a translation run
#[derive(Debug, thiserror::Error)]
pub enum BridgeError {
    /// Input document missing or unreadable
    #[error("Failed to read {path:?}: {source}")]
    Io {
        /// Document path
        path: PathBuf,
        /// Underlying IO error
        #[source]
        source: std::io::Error,
    },

    /// Input document is not a valid exchange document
    #[error(transparent)]
    Document(#[from] DocumentError),

    /// Configuration could not be loaded
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The node vocabulary lacks a type the pipeline needs
    #[error("Node type missing from the registry: {0}")]
    MissingNodeType(String),

    /// The target graph rejected a structural operation
    #[error("Target graph operation failed: {0}")]
    Target(#[from] TargetError),
}
