//
//  mutation.rs
//  Traffic
//
//  Created by hak (tharun)
//

use tracing::debug;

use super::engine::TrafficGraph;
use super::types::*;

impl TrafficGraph {
    /// Set one-way edges from `source` to each listed destination.
    ///
    /// Existing weights are overwritten; relative updates are applied to the
    /// current weight (`0` for a new edge). A destination equal to `source` is
    /// skipped. `source` becomes a known vertex even if `destinations` is empty.
    ///
    /// ```
    /// use traffic::{TrafficGraph, WeightUpdate};
    ///
    /// let mut graph = TrafficGraph::new();
    /// graph
    ///     .connect("a", [("b", 1.0)])
    ///     .connect("a", [("b", WeightUpdate::add(2.0))]);
    /// assert_eq!(graph.weight("a", "b"), Some(3.0));
    /// ```
    pub fn connect<I, K, W>(&mut self, source: &str, destinations: I) -> &mut Self
    where
        I: IntoIterator<Item = (K, W)>,
        K: Into<String>,
        W: Into<WeightUpdate>,
    {
        let adjacency = self.data.entry(source.to_string()).or_default();
        for (dest, update) in destinations {
            let dest = dest.into();
            if dest == source {
                continue;
            }
            let weight = update.into().resolve(adjacency.get(&dest).copied());
            adjacency.insert(dest, weight);
        }
        self
    }

    /// Set edges in both directions between `a` and each listed vertex.
    ///
    /// The reverse edge `dest -> a` receives the same update value; relative
    /// updates are evaluated against each direction's own current weight.
    pub fn connect_both<I, K, W>(&mut self, a: &str, b: I) -> &mut Self
    where
        I: IntoIterator<Item = (K, W)>,
        K: Into<String>,
        W: Into<WeightUpdate>,
    {
        let updates: Vec<(String, WeightUpdate)> = b
            .into_iter()
            .map(|(dest, update)| (dest.into(), update.into()))
            .collect();

        self.connect(a, updates.iter().cloned());
        for (dest, update) in updates {
            self.connect(&dest, [(a, update)]);
        }
        self
    }

    /// Connect every listed vertex to every other listed vertex using the same
    /// weight table. `{a: 1, b: 2, c: 3}` gives `a -> {b: 2, c: 3}`,
    /// `b -> {a: 1, c: 3}` and `c -> {a: 1, b: 2}`.
    pub fn connect_all<I, K, W>(&mut self, weights: I) -> &mut Self
    where
        I: IntoIterator<Item = (K, W)>,
        K: Into<String>,
        W: Into<WeightUpdate>,
    {
        let table: Vec<(String, WeightUpdate)> = weights
            .into_iter()
            .map(|(vertex, update)| (vertex.into(), update.into()))
            .collect();

        for (vertex, _) in &table {
            self.connect(vertex, table.iter().cloned());
        }
        self
    }

    /// Remove the edge `source -> dest`. No-op if it does not exist.
    pub fn disconnect(&mut self, source: &str, dest: &str) -> &mut Self {
        if let Some(adjacency) = self.data.get_mut(source) {
            adjacency.shift_remove(dest);
        }
        self
    }

    /// Remove both `a -> b` and `b -> a`.
    pub fn disconnect_both(&mut self, a: &str, b: &str) -> &mut Self {
        self.disconnect(a, b).disconnect(b, a)
    }

    /// Remove a vertex and every edge touching it.
    pub fn remove(&mut self, vertex: &str) -> &mut Self {
        let mut stripped = 0usize;
        for adjacency in self.data.values_mut() {
            if adjacency.shift_remove(vertex).is_some() {
                stripped += 1;
            }
        }
        let outgoing = self
            .data
            .shift_remove(vertex)
            .map(|adj| adj.len())
            .unwrap_or(0);

        debug!(vertex, outgoing, incoming = stripped, "removed vertex from graph");
        self
    }

    /// Multiply every edge weight by `-1`. Turns shortest-route queries into
    /// longest-route queries; applying it twice restores the original weights.
    pub fn invert(&mut self) -> &mut Self {
        for adjacency in self.data.values_mut() {
            for weight in adjacency.values_mut() {
                *weight = -*weight;
            }
        }
        debug!(edges = self.edge_count(), "inverted graph weights");
        self
    }
}
