//
//  engine.rs
//  Traffic
//
//  Created by hak (tharun)
//

use indexmap::IndexSet;
use tracing::warn;

use super::snapshot::Snapshot;
use super::types::*;

/// The mutable graph store: weighted directed edges keyed by vertex name.
///
/// Sources and their destinations keep insertion order; that order defines the
/// vertex enumeration used by snapshots and encoders. Cloning produces an
/// independent store.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TrafficGraph {
    /// Adjacency: source -> (dest -> weight).
    pub(crate) data: GraphData,
}

impl TrafficGraph {
    /// Create a new empty graph.
    pub fn new() -> Self {
        Self {
            data: GraphData::new(),
        }
    }

    /// Rebuild a graph from data previously returned by [`TrafficGraph::export_data`].
    ///
    /// Self-loops are not representable and are dropped.
    pub fn from_data(mut data: GraphData) -> Self {
        for (source, adjacency) in data.iter_mut() {
            if adjacency.shift_remove(source).is_some() {
                warn!(vertex = %source, "dropping self-loop from imported graph data");
            }
        }
        Self { data }
    }

    /// Deep copy of the adjacency data, suitable for [`TrafficGraph::from_data`].
    pub fn export_data(&self) -> GraphData {
        self.data.clone()
    }

    /// Capture an immutable, timestamped view of the current graph.
    pub fn snapshot(&self) -> Snapshot {
        Snapshot::capture(self.export_data())
    }

    /// All vertices in enumeration order: each source in insertion order,
    /// followed by its not-yet-seen destinations in insertion order.
    pub fn vertices(&self) -> Vec<String> {
        enumerate_vertices(&self.data)
    }

    /// Whether the vertex appears anywhere in the graph.
    pub fn has(&self, vertex: &str) -> bool {
        self.data.contains_key(vertex) || self.data.values().any(|adj| adj.contains_key(vertex))
    }

    /// Whether every listed vertex appears in the graph.
    pub fn has_all<I, S>(&self, vertices: I) -> bool
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        vertices.into_iter().all(|v| self.has(v.as_ref()))
    }

    /// Current weight of `source -> dest`, if the edge exists.
    pub fn weight(&self, source: &str, dest: &str) -> Option<f64> {
        self.data.get(source).and_then(|adj| adj.get(dest)).copied()
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices().len()
    }

    pub fn edge_count(&self) -> usize {
        self.data.values().map(|adj| adj.len()).sum()
    }
}

/// First-seen enumeration of every vertex referenced by `data`.
pub(crate) fn enumerate_vertices(data: &GraphData) -> Vec<String> {
    let mut seen: IndexSet<&str> = IndexSet::new();
    for (source, adjacency) in data {
        seen.insert(source.as_str());
        for dest in adjacency.keys() {
            seen.insert(dest.as_str());
        }
    }
    seen.into_iter().map(str::to_string).collect()
}
