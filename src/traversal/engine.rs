//
//  engine.rs
//  Traffic
//
//  Created by hak (tharun)
//

use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::Arc;
use tracing::debug;

use crate::cache::Memo;
use crate::config::{RelaxationMode, TraversalConfig};
use crate::error::{Result, TrafficError};
use crate::graph::Snapshot;

/// Shortest-path predecessor of each vertex reached by a relaxation pass.
/// Vertices without an entry have no predecessor.
pub(crate) type Predecessors = HashMap<String, String>;

/// Route, reachability and weight queries over one [`Snapshot`].
///
/// Every result is computed on first request and cached for the engine's
/// lifetime. The snapshot never changes, so nothing is ever invalidated.
/// Engines are cheap to build; create one per thread from a shared
/// `Arc<Snapshot>`.
pub struct TrafficTraversal {
    pub(crate) snapshot: Arc<Snapshot>,
    pub(crate) config: TraversalConfig,
    /// Keyed by start vertex.
    predecessors: Memo<String, Arc<Predecessors>>,
    /// Raw reconstructed routes, keyed by (from, to). May be invalid.
    routes: Memo<(String, String), Arc<Vec<String>>>,
    traffic: Memo<(String, String), f64>,
    depth: Memo<(String, String), f64>,
    /// Keyed by (vertex, depth limit); `None` means unlimited.
    pub(crate) edges: Memo<(String, Option<usize>), Arc<Vec<String>>>,
    /// Incoming (sum, count), keyed by vertex.
    pub(crate) incoming: Memo<String, (f64, usize)>,
}

impl TrafficTraversal {
    /// Create an engine with the default configuration.
    ///
    /// The default [`RelaxationMode::SinglePass`] enqueues each vertex once per
    /// pass and always terminates, but can miss the minimum-sum route when a
    /// cheaper path reaches an already processed vertex. Exact minima under
    /// negative weights need [`RelaxationMode::Requeue`] via [`TrafficTraversal::with_config`].
    pub fn new(snapshot: impl Into<Arc<Snapshot>>) -> Self {
        Self::with_config(snapshot, TraversalConfig::default())
    }

    /// Create an engine with an explicit configuration.
    pub fn with_config(snapshot: impl Into<Arc<Snapshot>>, config: TraversalConfig) -> Self {
        Self {
            snapshot: snapshot.into(),
            config,
            predecessors: Memo::new(),
            routes: Memo::new(),
            traffic: Memo::new(),
            depth: Memo::new(),
            edges: Memo::new(),
            incoming: Memo::new(),
        }
    }

    /// The snapshot this engine answers queries for.
    pub fn snapshot(&self) -> &Snapshot {
        &self.snapshot
    }

    pub fn config(&self) -> &TraversalConfig {
        &self.config
    }

    // ─── Relaxation ─────────────────────────────────────────────

    fn relax(&self, from: &str) -> Arc<Predecessors> {
        self.predecessors
            .ensure(from.to_string(), || Arc::new(self.relax_uncached(from)))
    }

    /// Label-correcting relaxation over a FIFO worklist.
    ///
    /// Unlike Dijkstra this tolerates negative weights. In `Requeue` mode a
    /// reachable negative cycle keeps improving distances forever; callers must
    /// not build such snapshots in that mode.
    fn relax_uncached<'a>(&'a self, from: &'a str) -> Predecessors {
        let requeue = self.config.relaxation == RelaxationMode::Requeue;

        let mut distance: HashMap<&'a str, f64> = self
            .snapshot
            .vertices()
            .iter()
            .map(|v| (v.as_str(), f64::INFINITY))
            .collect();
        let mut predecessor: HashMap<&'a str, &'a str> = HashMap::new();
        let mut pending: HashSet<&'a str> = HashSet::new();
        let mut queue: VecDeque<&'a str> = VecDeque::new();

        distance.insert(from, 0.0);
        pending.insert(from);
        queue.push_back(from);

        let mut pops = 0usize;
        while let Some(u) = queue.pop_front() {
            pops += 1;
            if requeue {
                pending.remove(u);
            }
            let Some(adjacency) = self.snapshot.adjacency(u) else {
                continue;
            };
            let d_u = distance.get(u).copied().unwrap_or(f64::INFINITY);

            for (v, &w) in adjacency {
                let candidate = d_u + w;
                let d_v = distance.get(v.as_str()).copied().unwrap_or(f64::INFINITY);
                if candidate < d_v {
                    let v = v.as_str();
                    distance.insert(v, candidate);
                    predecessor.insert(v, u);
                    if pending.insert(v) {
                        queue.push_back(v);
                    }
                }
            }
        }

        debug!(
            from,
            pops,
            reached = predecessor.len(),
            mode = ?self.config.relaxation,
            "relaxation pass complete"
        );

        predecessor
            .into_iter()
            .map(|(v, u)| (v.to_string(), u.to_string()))
            .collect()
    }

    // ─── Routes ─────────────────────────────────────────────────

    /// Walk predecessors back from `to`, stopping at `from`, at a vertex with
    /// no predecessor, or on a revisit. The result may not start at `from`.
    fn route(&self, from: &str, to: &str) -> Arc<Vec<String>> {
        self.routes.ensure((from.to_string(), to.to_string()), || {
            let predecessors = self.relax(from);

            let mut route = vec![to.to_string()];
            let mut visited: HashSet<&str> = HashSet::from([to]);
            let mut current = to;
            while current != from {
                match predecessors.get(current) {
                    Some(prev) if visited.insert(prev.as_str()) => {
                        route.push(prev.clone());
                        current = prev.as_str();
                    }
                    _ => break,
                }
            }

            route.reverse();
            Arc::new(route)
        })
    }

    fn reaches(route: &[String], from: &str, to: &str) -> bool {
        route.first().is_some_and(|v| v == from) && route.last().is_some_and(|v| v == to)
    }

    /// The lowest-weight route from `from` to `to`, endpoints included.
    ///
    /// Returns [`TrafficError::Unreachable`] when no route exists.
    pub fn routes(&self, from: &str, to: &str) -> Result<Vec<String>> {
        let route = self.route(from, to);
        if !Self::reaches(&route, from, to) {
            return Err(TrafficError::Unreachable {
                from: from.to_string(),
                to: to.to_string(),
            });
        }
        Ok(route.as_ref().clone())
    }

    /// Whether `to` can be reached from `from`. A vertex always reaches itself.
    pub fn reachable(&self, from: &str, to: &str) -> bool {
        Self::reaches(&self.route(from, to), from, to)
    }

    /// Sum of edge weights along the lowest-weight route.
    ///
    /// `f64::INFINITY` when unreachable, `0` when `from == to`.
    pub fn traffic(&self, from: &str, to: &str) -> f64 {
        self.traffic.ensure((from.to_string(), to.to_string()), || {
            let route = self.route(from, to);
            if !Self::reaches(&route, from, to) {
                return f64::INFINITY;
            }
            let mut total = 0.0;
            for pair in route.windows(2) {
                // A route is built from existing edges; a gap ends accumulation.
                match self.snapshot.weight(&pair[0], &pair[1]) {
                    Some(weight) => total += weight,
                    None => break,
                }
            }
            total
        })
    }

    /// Hop count of the lowest-weight route (not of the fewest-hop route).
    ///
    /// `f64::INFINITY` when unreachable, `0` when `from == to`.
    pub fn depth(&self, from: &str, to: &str) -> f64 {
        self.depth.ensure((from.to_string(), to.to_string()), || {
            let route = self.route(from, to);
            if !Self::reaches(&route, from, to) {
                return f64::INFINITY;
            }
            (route.len() - 1) as f64
        })
    }

    /// Direction-agnostic hop distance: the smaller of both directed depths.
    pub fn distance(&self, a: &str, b: &str) -> f64 {
        self.depth(a, b).min(self.depth(b, a))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::TrafficGraph;
    use crate::graph::WeightUpdate;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    fn sample_graph() -> TrafficGraph {
        let mut graph = TrafficGraph::new();
        graph
            .connect("a", [("b", 1.0), ("c", 2.0)])
            .connect("b", [("d", 2.0)])
            .connect("c", [("d", 2.0)])
            .connect("A", [("B", 1.0), ("C", 2.0)])
            .connect("B", [("D", 2.0)])
            .connect("C", [("D", 2.0)])
            .connect("0", [("1", 4.0), ("2", 2.0)])
            .connect("1", [("3", 10.0), ("2", 5.0)])
            .connect("2", [("4", 3.0)])
            .connect("4", [("3", 4.0)])
            .connect("3", [("5", 11.0)]);
        graph
    }

    /// Contains negative cycles (e.g. 1 -> 2 -> 1).
    fn negative_graph() -> TrafficGraph {
        let mut graph = TrafficGraph::new();
        graph
            .connect(
                "1",
                [("2", -0.061), ("3", -0.061), ("4", -0.061), ("5", -0.061), ("7", -0.061)],
            )
            .connect("2", [("1", -0.166)])
            .connect("3", [("1", -0.071)])
            .connect("4", [("2", -0.035), ("5", -0.035)])
            .connect("5", [("1", -0.045), ("4", -0.045), ("6", -0.045)])
            .connect("6", [("1", -0.023), ("5", -0.023)])
            .connect("7", [("5", -0.179)]);
        graph
    }

    #[test]
    fn test_example_scenario() {
        let traversal = TrafficTraversal::new(sample_graph().snapshot());
        assert_eq!(traversal.routes("a", "d").unwrap(), vec!["a", "b", "d"]);
        assert_eq!(traversal.traffic("a", "d"), 3.0);
        assert_eq!(traversal.depth("a", "d"), 2.0);
    }

    #[test]
    fn test_self_queries_are_zero() {
        let traversal = TrafficTraversal::new(sample_graph().snapshot());
        for v in ["a", "d", "0", "5", "D"] {
            assert_eq!(traversal.traffic(v, v), 0.0, "traffic({v}, {v})");
            assert_eq!(traversal.depth(v, v), 0.0, "depth({v}, {v})");
            assert!(traversal.reachable(v, v));
            assert_eq!(traversal.routes(v, v).unwrap(), vec![v]);
        }
    }

    #[test]
    fn test_single_edge_route() {
        let mut graph = TrafficGraph::new();
        graph.connect("a", [("b", 2.5)]);
        let traversal = TrafficTraversal::new(graph.snapshot());
        assert_eq!(traversal.routes("a", "b").unwrap(), vec!["a", "b"]);
        assert_eq!(traversal.traffic("a", "b"), 2.5);
    }

    #[test]
    fn test_longer_route_wins_on_weight() {
        let traversal = TrafficTraversal::new(sample_graph().snapshot());
        assert_eq!(traversal.traffic("0", "5"), 20.0);
        assert_eq!(
            traversal.routes("0", "5").unwrap(),
            vec!["0", "2", "4", "3", "5"]
        );
        assert_eq!(traversal.depth("0", "5"), 4.0);
    }

    #[test]
    fn test_unreachable() {
        let traversal = TrafficTraversal::new(sample_graph().snapshot());
        assert!(!traversal.reachable("a", "C"));
        assert_eq!(traversal.traffic("a", "C"), f64::INFINITY);
        assert_eq!(traversal.depth("d", "a"), f64::INFINITY);
        assert_eq!(traversal.depth("d", "C"), f64::INFINITY);

        let err = traversal.routes("a", "C").unwrap_err();
        assert!(matches!(
            err,
            TrafficError::Unreachable { ref from, ref to } if from == "a" && to == "C"
        ));
    }

    #[test]
    fn test_reachable_agrees_with_routes() {
        let graph = sample_graph();
        let traversal = TrafficTraversal::new(graph.snapshot());
        let vertices = graph.vertices();
        for from in &vertices {
            for to in &vertices {
                assert_eq!(
                    traversal.reachable(from, to),
                    traversal.routes(from, to).is_ok(),
                    "reachable/routes disagree for {from} -> {to}"
                );
            }
        }
    }

    #[test]
    fn test_unknown_vertices() {
        let traversal = TrafficTraversal::new(sample_graph().snapshot());
        assert!(!traversal.reachable("nope", "a"));
        assert!(!traversal.reachable("a", "nope"));
        assert_eq!(traversal.traffic("a", "nope"), f64::INFINITY);
    }

    #[test]
    fn test_distance_ignores_direction() {
        let traversal = TrafficTraversal::new(sample_graph().snapshot());
        assert_eq!(traversal.distance("a", "a"), 0.0);
        assert_eq!(traversal.distance("a", "d"), 2.0);
        assert_eq!(traversal.distance("d", "a"), 2.0);
        assert_eq!(traversal.distance("a", "C"), f64::INFINITY);
    }

    #[test]
    fn test_negative_weights() {
        let mut graph = TrafficGraph::new();
        graph
            .connect("a", [("b", -1.0), ("c", -2.0)])
            .connect("b", [("d", -2.0)])
            .connect("c", [("d", -2.0)]);
        let traversal = TrafficTraversal::new(graph.snapshot());

        assert_eq!(traversal.traffic("a", "d"), -4.0);
        assert_eq!(traversal.routes("a", "d").unwrap(), vec!["a", "c", "d"]);
    }

    #[test]
    fn test_negative_cycles_terminate_in_single_pass() {
        let traversal = TrafficTraversal::new(negative_graph().snapshot());

        assert_eq!(
            traversal.routes("1", "4").unwrap(),
            vec!["1", "7", "5", "4"]
        );
        assert!(approx(traversal.traffic("1", "4"), -0.285));
        assert!(traversal.reachable("1", "4"));
        assert!(!traversal.reachable("4", "1"));
        assert!(traversal.routes("4", "1").is_err());
        assert_eq!(traversal.traffic("4", "1"), f64::INFINITY);
    }

    #[test]
    fn test_invert_twice_restores_routes() {
        let mut graph = negative_graph();

        graph.invert();
        let traversal = TrafficTraversal::new(graph.snapshot());
        assert_eq!(traversal.routes("1", "4").unwrap(), vec!["1", "4"]);

        graph.invert();
        let traversal = TrafficTraversal::new(graph.snapshot());
        assert_eq!(
            traversal.routes("1", "4").unwrap(),
            vec!["1", "7", "5", "4"]
        );
    }

    /// a -> c -> b -> d is cheapest (-4) but b is settled before c improves it.
    fn late_improvement_graph() -> TrafficGraph {
        let mut graph = TrafficGraph::new();
        graph
            .connect("a", [("b", 1.0), ("c", 5.0), ("e", 0.0)])
            .connect("c", [("b", -10.0)])
            .connect("b", [("d", 1.0)])
            .connect("e", [("d", -2.0)]);
        graph
    }

    #[test]
    fn test_requeue_finds_exact_minimum() {
        let config = TraversalConfig {
            relaxation: RelaxationMode::Requeue,
            ..TraversalConfig::default()
        };
        let traversal = TrafficTraversal::with_config(late_improvement_graph().snapshot(), config);

        assert_eq!(
            traversal.routes("a", "d").unwrap(),
            vec!["a", "c", "b", "d"]
        );
        assert_eq!(traversal.traffic("a", "d"), -4.0);
    }

    #[test]
    fn test_single_pass_does_not_requeue() {
        let traversal = TrafficTraversal::new(late_improvement_graph().snapshot());
        assert_eq!(traversal.routes("a", "d").unwrap(), vec!["a", "e", "d"]);
        assert_eq!(traversal.traffic("a", "d"), -2.0);
        // b itself still picks up the improvement through c.
        assert_eq!(traversal.routes("a", "b").unwrap(), vec!["a", "c", "b"]);
    }

    #[test]
    fn test_disconnect_falls_back_to_alternate_route() {
        let mut graph = sample_graph();
        graph.disconnect("a", "b");
        let traversal = TrafficTraversal::new(graph.snapshot());
        assert_eq!(traversal.traffic("a", "d"), 4.0);

        let mut graph = sample_graph();
        graph.disconnect_both("a", "b");
        let traversal = TrafficTraversal::new(graph.snapshot());
        assert_eq!(traversal.traffic("a", "d"), 4.0);

        let mut graph = sample_graph();
        graph.remove("b");
        let traversal = TrafficTraversal::new(graph.snapshot());
        assert_eq!(traversal.traffic("a", "d"), 4.0);
    }

    #[test]
    fn test_relative_updates_through_traversal() {
        let mut graph = TrafficGraph::new();
        graph
            .connect("a", [("b", 1.0)])
            .connect("a", [("b", WeightUpdate::add(1.0))])
            .connect(
                "a",
                [("b", WeightUpdate::add(2.0)), ("c", WeightUpdate::subtract(1.0))],
            );
        let traversal = TrafficTraversal::new(graph.snapshot());
        assert_eq!(traversal.traffic("a", "b"), 4.0);
        assert_eq!(traversal.traffic("a", "c"), -1.0);
        assert_eq!(traversal.traffic("b", "a"), f64::INFINITY);

        graph.connect_both(
            "a",
            [
                ("a", WeightUpdate::add(1.0)),
                ("b", WeightUpdate::add(2.0)),
                ("c", WeightUpdate::add(3.0)),
            ],
        );
        let traversal = TrafficTraversal::new(graph.snapshot());
        assert_eq!(traversal.traffic("a", "b"), 6.0);
        assert_eq!(traversal.traffic("a", "c"), 2.0);
        assert_eq!(traversal.traffic("b", "a"), 2.0);
        assert_eq!(traversal.traffic("c", "a"), 3.0);

        graph.connect_all([
            ("a", WeightUpdate::multiply(1.0)),
            ("b", WeightUpdate::multiply(2.0)),
            ("c", WeightUpdate::multiply(3.0)),
        ]);
        let traversal = TrafficTraversal::new(graph.snapshot());
        assert_eq!(traversal.traffic("a", "b"), 6.0);
        assert_eq!(traversal.traffic("a", "c"), 6.0);
        assert_eq!(traversal.traffic("b", "a"), 2.0);
        assert_eq!(traversal.traffic("b", "c"), 0.0);
        assert_eq!(traversal.traffic("c", "a"), 2.0);
        assert_eq!(traversal.traffic("c", "b"), 0.0);
    }

    #[test]
    fn test_results_survive_store_mutation() {
        let mut graph = sample_graph();
        let traversal = TrafficTraversal::new(graph.snapshot());
        assert_eq!(traversal.traffic("a", "d"), 3.0);

        graph.remove("b").remove("c");
        assert_eq!(traversal.traffic("a", "d"), 3.0);
        assert_eq!(traversal.routes("a", "d").unwrap(), vec!["a", "b", "d"]);
    }

    #[test]
    fn test_relaxation_is_memoized_per_start() {
        let traversal = TrafficTraversal::new(sample_graph().snapshot());
        traversal.traffic("a", "d");
        traversal.depth("a", "b");
        traversal.reachable("a", "c");
        traversal.traffic("0", "5");

        assert_eq!(traversal.predecessors.len(), 2, "one pass per start vertex");
        assert_eq!(traversal.routes.len(), 4);
    }

    #[test]
    fn test_engines_on_threads_share_snapshot() {
        let snapshot = Arc::new(sample_graph().snapshot());
        let handles: Vec<_> = ["a", "0"]
            .into_iter()
            .map(|from| {
                let snapshot = Arc::clone(&snapshot);
                std::thread::spawn(move || {
                    let traversal = TrafficTraversal::new(snapshot);
                    (traversal.traffic(from, "d"), traversal.traffic(from, "5"))
                })
            })
            .collect();

        let results: Vec<(f64, f64)> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        assert_eq!(results[0], (3.0, f64::INFINITY));
        assert_eq!(results[1], (f64::INFINITY, 20.0));
    }
}
