// SPDX-License-Identifier: MIT OR Apache-2.0
//! Content-hash cache of built networks.
//!
//! Structurally identical networks are built once per run. Later occurrences
//! only add their locations to the existing assignments.

use crate::builder::NetworkHandle;
use shaderbridge_graph::ContentHash;
use std::collections::HashMap;

/// A network built during the current run
#[derive(Debug, Clone)]
pub struct CacheEntry {
    /// Handle to the built container
    pub handle: NetworkHandle,
    /// Name of the network that was built
    pub network: String,
    /// Locations assigned so far
    pub locations: Vec<String>,
}

/// Per-run cache keyed by content hash
#[derive(Debug, Default)]
pub struct DedupCache {
    entries: HashMap<ContentHash, CacheEntry>,
}

impl DedupCache {
    /// Create an empty cache
    pub fn new() -> Self {
        Self::default()
    }

    /// Forget every entry. Called at the start of each run.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Look up a built network
    pub fn get(&self, hash: &ContentHash) -> Option<&CacheEntry> {
        self.entries.get(hash)
    }

    /// Record a newly built network
    pub fn insert(&mut self, hash: ContentHash, network: impl Into<String>, handle: NetworkHandle) {
        self.entries.insert(
            hash,
            CacheEntry {
                handle,
                network: network.into(),
                locations: Vec::new(),
            },
        );
    }

    /// Record locations for a cached network. Returns `false` when the hash is
    /// not cached.
    pub fn register_locations(&mut self, hash: &ContentHash, paths: &[String]) -> bool {
        let Some(entry) = self.entries.get_mut(hash) else {
            return false;
        };
        for path in paths {
            if !entry.locations.contains(path) {
                entry.locations.push(path.clone());
            }
        }
        true
    }

    /// Number of cached networks
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the cache is empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::target::ContainerId;
    use shaderbridge_graph::ShaderNetwork;

    #[test]
    fn test_insert_and_register() {
        let mut cache = DedupCache::new();
        let hash = ShaderNetwork::new("A").content_hash();
        let handle = NetworkHandle {
            container: ContainerId::new(),
            stages: Vec::new(),
            placeholder: false,
        };

        assert!(!cache.register_locations(&hash, &["/a".to_string()]));
        cache.insert(hash, "A", handle.clone());
        assert!(cache.register_locations(&hash, &["/a".to_string(), "/b".to_string()]));
        assert!(cache.register_locations(&hash, &["/a".to_string()]));

        let entry = cache.get(&hash).unwrap();
        assert_eq!(entry.handle, handle);
        assert_eq!(entry.locations, vec!["/a".to_string(), "/b".to_string()]);

        cache.clear();
        assert!(cache.is_empty());
    }
}
