//
//  snapshot.rs
//  Traffic
//
//  Created by hak (tharun)
//

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::HashMap;
use tracing::debug;

use super::engine::enumerate_vertices;
use super::types::*;

/// Frozen, timestamped view of a [`TrafficGraph`](super::TrafficGraph).
///
/// Owns deep copies of the adjacency data and the vertex enumeration, so later
/// writes to the originating graph never show through. Traversal engines and
/// encoders built from one snapshot can therefore cache results forever.
/// Share it between threads with `Arc<Snapshot>`.
#[derive(Debug, Clone, Serialize)]
pub struct Snapshot {
    data: GraphData,
    vertices: Vec<String>,
    #[serde(skip)]
    positions: HashMap<String, usize>,
    timestamp: DateTime<Utc>,
}

impl Snapshot {
    /// Take ownership of `data` and derive the enumeration and positional index.
    pub(crate) fn capture(data: GraphData) -> Self {
        let vertices = enumerate_vertices(&data);
        let positions = vertices
            .iter()
            .enumerate()
            .map(|(i, v)| (v.clone(), i))
            .collect();
        let timestamp = Utc::now();

        debug!(
            vertices = vertices.len(),
            sources = data.len(),
            %timestamp,
            "captured graph snapshot"
        );

        Self {
            data,
            vertices,
            positions,
            timestamp,
        }
    }

    /// Adjacency data at capture time.
    pub fn data(&self) -> &GraphData {
        &self.data
    }

    /// Vertex enumeration at capture time.
    pub fn vertices(&self) -> &[String] {
        &self.vertices
    }

    /// When the snapshot was captured.
    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    /// Position of `vertex` in the enumeration.
    pub fn position(&self, vertex: &str) -> Option<usize> {
        self.positions.get(vertex).copied()
    }

    /// Outgoing edges of `vertex`; `None` when it has no entry as a source.
    pub fn adjacency(&self, vertex: &str) -> Option<&Adjacency> {
        self.data.get(vertex)
    }

    /// Weight of `source -> dest` at capture time.
    pub fn weight(&self, source: &str, dest: &str) -> Option<f64> {
        self.adjacency(source).and_then(|adj| adj.get(dest)).copied()
    }

    pub fn has(&self, vertex: &str) -> bool {
        self.positions.contains_key(vertex)
    }
}
