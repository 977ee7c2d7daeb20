//! Vertex encodings derived from a snapshot's vertex enumeration.

use indexmap::IndexMap;
use std::sync::Arc;

use crate::cache::Memo;
use crate::error::{Result, TrafficError};
use crate::graph::Snapshot;

/// One-hot vectors keyed by vertex, in enumeration order.
pub type OneHot = IndexMap<String, Vec<u8>>;

/// Integer labels keyed by vertex, in enumeration order.
pub type Labels = IndexMap<String, i64>;

/// Zero-hot, one-hot and label encodings of a snapshot's vertices.
///
/// Positions come from the snapshot's vertex enumeration, so two encoders
/// built from the same snapshot always agree. Every call returns a fresh
/// copy of the cached encoding.
pub struct VertexEncoder {
    snapshot: Arc<Snapshot>,
    zero_hot: Memo<(), Arc<Vec<u8>>>,
    one_hot: Memo<(), Arc<OneHot>>,
    labels: Memo<i64, Arc<Labels>>,
}

impl VertexEncoder {
    pub fn new(snapshot: impl Into<Arc<Snapshot>>) -> Self {
        Self {
            snapshot: snapshot.into(),
            zero_hot: Memo::new(),
            one_hot: Memo::new(),
            labels: Memo::new(),
        }
    }

    /// Number of vertices, i.e. the length of every encoding vector.
    pub fn len(&self) -> usize {
        self.snapshot.vertices().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// A vector of zeros with one slot per vertex.
    pub fn zero_hot(&self) -> Vec<u8> {
        let raw = self
            .zero_hot
            .ensure((), || Arc::new(vec![0; self.len()]));
        raw.as_ref().clone()
    }

    /// Each vertex mapped to a vector with a single `1` at its position.
    pub fn one_hot(&self) -> Result<OneHot> {
        let raw = self.one_hot.try_ensure((), || -> Result<Arc<OneHot>> {
            let len = self.len();
            let mut encoding = OneHot::with_capacity(len);
            for vertex in self.snapshot.vertices() {
                let position = self.position(vertex)?;
                let mut vector = vec![0; len];
                vector[position] = 1;
                encoding.insert(vertex.clone(), vector);
            }
            Ok(Arc::new(encoding))
        })?;
        Ok(raw.as_ref().clone())
    }

    /// Each vertex mapped to `start_from + position`.
    ///
    /// Fails with [`TrafficError::InconsistentState`] if a label would overflow `i64`.
    pub fn label(&self, start_from: i64) -> Result<Labels> {
        let raw = self.labels.try_ensure(start_from, || -> Result<Arc<Labels>> {
            let mut encoding = Labels::with_capacity(self.len());
            for vertex in self.snapshot.vertices() {
                let position = self.position(vertex)?;
                let label = i64::try_from(position)
                    .ok()
                    .and_then(|offset| start_from.checked_add(offset))
                    .ok_or_else(|| {
                        TrafficError::InconsistentState(format!(
                            "label for vertex '{}' overflows when starting from {}",
                            vertex, start_from
                        ))
                    })?;
                encoding.insert(vertex.clone(), label);
            }
            Ok(Arc::new(encoding))
        })?;
        Ok(raw.as_ref().clone())
    }

    fn position(&self, vertex: &str) -> Result<usize> {
        match self.snapshot.position(vertex) {
            Some(position) if position < self.len() => Ok(position),
            _ => Err(TrafficError::InconsistentState(format!(
                "vertex '{}' is enumerated but has no position in the snapshot index",
                vertex
            ))),
        }
    }
}
