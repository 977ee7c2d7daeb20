//! Traversal engine: route, reachability and weight queries over a snapshot.
//!
//! `engine` holds the relaxation pass and route reconstruction;
//! `query` holds depth-limited expansion and incoming-weight aggregates.

pub mod engine;
pub mod query;

pub use engine::TrafficTraversal;
pub use query::{WeightMode, UNLIMITED_DEPTH};
