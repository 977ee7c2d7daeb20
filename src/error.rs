//! Error types for traffic-graph.

/// Result type alias using [`TrafficError`].
pub type Result<T> = std::result::Result<T, TrafficError>;

/// Errors raised by the graph store, the traversal engine and the encoder.
#[derive(Debug, thiserror::Error)]
pub enum TrafficError {
    /// A weight update expression used an unknown operator or operand.
    #[error("Invalid expression: {0} (expected a number or one of +=, -=, *=, /=)")]
    InvalidExpression(String),

    /// No route exists between the requested vertices.
    #[error("Vertex '{to}' cannot be reached from vertex '{from}'")]
    Unreachable { from: String, to: String },

    /// Weight aggregation mode is not one of sum, count or mean.
    #[error("Unsupported weight mode: {0}")]
    UnsupportedMode(String),

    /// A snapshot's enumeration and positional index disagree.
    #[error("Inconsistent snapshot state: {0}")]
    InconsistentState(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Config error: {0}")]
    Config(String),
}
