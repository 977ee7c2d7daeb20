//! # traffic-graph
//!
//! Weighted directed graph with snapshot-based route queries.
//!
//! A [`TrafficGraph`] is mutated in place; [`TrafficGraph::snapshot`] freezes it
//! into a [`Snapshot`] that query engines consume. Because snapshots never
//! change, every engine caches its answers for its whole lifetime.
//!
//! ## Key Features
//!
//! - **Negative weights**: routes come from a queue-based relaxation pass, not Dijkstra
//! - **Relative updates**: edge weights can be added to, subtracted from, multiplied or divided
//! - **Snapshots**: traversal and encoder results stay valid while the graph keeps changing
//! - **Encodings**: zero-hot, one-hot and label encodings of the vertex set
//!
//! ## Quick Start
//!
//! ```rust
//! use traffic::{TrafficGraph, TrafficTraversal, VertexEncoder};
//!
//! let mut graph = TrafficGraph::new();
//! graph
//!     .connect("a", [("b", 1.0), ("c", 2.0)])
//!     .connect("b", [("d", 2.0)])
//!     .connect("c", [("d", 2.0)]);
//!
//! let traversal = TrafficTraversal::new(graph.snapshot());
//! assert_eq!(traversal.routes("a", "d").unwrap(), vec!["a", "b", "d"]);
//! assert_eq!(traversal.traffic("a", "d"), 3.0);
//! assert_eq!(traversal.depth("a", "d"), 2.0);
//!
//! let encoder = VertexEncoder::new(graph.snapshot());
//! assert_eq!(encoder.label(0).unwrap()["d"], 3);
//! ```

mod cache;
pub mod config;
pub mod encoder;
pub mod error;
pub mod graph;
pub mod traversal;

// Re-exports for convenience
pub use config::{RelaxationMode, TrafficConfig, TraversalConfig};
pub use encoder::{Labels, OneHot, VertexEncoder};
pub use error::{Result, TrafficError};
pub use graph::{Adjacency, GraphData, Operator, Snapshot, TrafficGraph, WeightUpdate};
pub use traversal::{TrafficTraversal, WeightMode, UNLIMITED_DEPTH};
