// SPDX-License-Identifier: MIT OR Apache-2.0
//! Link (edge) definitions for a shading network.

use serde::{Deserialize, Serialize};

/// A directed link between two sockets, addressed by node id and socket name
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Link {
    /// Source node ID
    pub from_node: String,
    /// Source socket identifier
    pub from_socket: String,
    /// Destination node ID
    pub to_node: String,
    /// Destination socket identifier
    pub to_socket: String,
}

impl Link {
    /// Create a new link
    pub fn new(
        from_node: impl Into<String>,
        from_socket: impl Into<String>,
        to_node: impl Into<String>,
        to_socket: impl Into<String>,
    ) -> Self {
        Self {
            from_node: from_node.into(),
            from_socket: from_socket.into(),
            to_node: to_node.into(),
            to_socket: to_socket.into(),
        }
    }
}

impl std::fmt::Display for Link {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}.{} -> {}.{}",
            self.from_node, self.from_socket, self.to_node, self.to_socket
        )
    }
}
