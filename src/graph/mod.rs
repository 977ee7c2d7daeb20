//! Graph store module for traffic-graph: storage, mutation and snapshots.
//!
//! Provides the mutable weighted graph, its relative-update arithmetic,
//! JSON persistence helpers and immutable snapshots.

pub mod engine;
pub mod mutation;
pub mod persistence;
pub mod snapshot;
pub mod types;

pub use engine::TrafficGraph;
pub use snapshot::Snapshot;
pub use types::{Adjacency, GraphData, Operator, WeightUpdate};
