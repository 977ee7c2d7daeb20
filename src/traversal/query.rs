//
//  query.rs
//  Traffic
//
//  Created by hak (tharun)
//

use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use super::engine::TrafficTraversal;
use crate::error::TrafficError;

/// Depth value meaning "no limit" for [`TrafficTraversal::edges_within`].
pub const UNLIMITED_DEPTH: i64 = -1;

/// Aggregation applied to the incoming edge weights of a vertex.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WeightMode {
    /// Total incoming weight.
    Sum,
    /// Number of incoming edges.
    Count,
    /// `Sum / Count`, or `0` for a vertex without incoming edges.
    Mean,
}

/// Accepts `sum`, `count` and `mean`, plus the aliases `traffic` (sum) and `number` (count).
impl FromStr for WeightMode {
    type Err = TrafficError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "sum" | "traffic" => Ok(WeightMode::Sum),
            "count" | "number" => Ok(WeightMode::Count),
            "mean" => Ok(WeightMode::Mean),
            other => Err(TrafficError::UnsupportedMode(other.to_string())),
        }
    }
}

impl fmt::Display for WeightMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            WeightMode::Sum => "sum",
            WeightMode::Count => "count",
            WeightMode::Mean => "mean",
        };
        f.write_str(name)
    }
}

impl TrafficTraversal {
    /// Vertices reachable from `vertex` within `depth` hops, in depth-first
    /// discovery order, excluding `vertex` itself.
    ///
    /// A negative `depth` (see [`UNLIMITED_DEPTH`]) removes the limit; `0`
    /// returns nothing. A vertex is expanded only at the first time it is
    /// discovered, so the hop count used is that of its discovery path.
    pub fn edges_within(&self, vertex: &str, depth: i64) -> Vec<String> {
        let limit = usize::try_from(depth).ok();
        let found = self.edges.ensure((vertex.to_string(), limit), || {
            Arc::new(self.expand(vertex, limit))
        });
        found.as_ref().clone()
    }

    /// [`TrafficTraversal::edges_within`] using the configured default depth.
    pub fn edges_within_default(&self, vertex: &str) -> Vec<String> {
        self.edges_within(vertex, self.config.default_depth)
    }

    fn expand(&self, start: &str, limit: Option<usize>) -> Vec<String> {
        let mut found = Vec::new();
        if limit == Some(0) {
            return found;
        }
        let Some(adjacency) = self.snapshot.adjacency(start) else {
            return found;
        };

        let mut visited: HashSet<&str> = HashSet::from([start]);
        // Each frame: remaining destinations of a vertex, and that vertex's hop level.
        let mut stack = vec![(adjacency.keys(), 0usize)];

        while let Some(frame) = stack.last_mut() {
            let level = frame.1;
            let Some(next) = frame.0.next() else {
                stack.pop();
                continue;
            };
            if !visited.insert(next.as_str()) {
                continue;
            }
            found.push(next.clone());

            let child_level = level + 1;
            if limit.is_some_and(|max| child_level >= max) {
                continue;
            }
            if let Some(children) = self.snapshot.adjacency(next) {
                stack.push((children.keys(), child_level));
            }
        }

        found
    }

    /// Aggregate over the edges pointing *into* `vertex`.
    ///
    /// ```
    /// use traffic::{TrafficGraph, TrafficTraversal, WeightMode};
    ///
    /// let mut graph = TrafficGraph::new();
    /// graph.connect("a", [("c", 1.0)]).connect("b", [("c", 3.0)]);
    /// let traversal = TrafficTraversal::new(graph.snapshot());
    ///
    /// assert_eq!(traversal.weight_stats("c", WeightMode::Sum), 4.0);
    /// assert_eq!(traversal.weight_stats("c", "mean".parse().unwrap()), 2.0);
    /// ```
    pub fn weight_stats(&self, vertex: &str, mode: WeightMode) -> f64 {
        let (sum, count) = self.incoming.ensure(vertex.to_string(), || {
            self.snapshot
                .data()
                .values()
                .filter_map(|adjacency| adjacency.get(vertex))
                .fold((0.0, 0usize), |(sum, count), weight| (sum + weight, count + 1))
        });

        match mode {
            WeightMode::Sum => sum,
            WeightMode::Count => count as f64,
            WeightMode::Mean if count == 0 => 0.0,
            WeightMode::Mean => sum / count as f64,
        }
    }
}
