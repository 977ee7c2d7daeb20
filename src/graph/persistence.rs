//
//  persistence.rs
//  Traffic
//
//  Created by hak (tharun)
//

use serde::ser::Error as _;
use tracing::debug;

use super::engine::TrafficGraph;
use super::types::GraphData;
use crate::error::Result;

impl TrafficGraph {
    /// Serialize the exported adjacency data as pretty-printed JSON.
    ///
    /// Where the text goes is up to the caller; the graph has no storage of its own.
    /// JSON has no representation for infinite or NaN weights, so a graph holding
    /// one fails with [`TrafficError::Serialization`](crate::error::TrafficError).
    pub fn to_json(&self) -> Result<String> {
        for (source, adjacency) in &self.data {
            for (dest, weight) in adjacency {
                if !weight.is_finite() {
                    return Err(serde_json::Error::custom(format!(
                        "edge '{}' -> '{}' has non-finite weight {}",
                        source, dest, weight
                    ))
                    .into());
                }
            }
        }
        Ok(serde_json::to_string_pretty(&self.data)?)
    }

    /// Rebuild a graph from JSON produced by [`TrafficGraph::to_json`].
    pub fn from_json(json: &str) -> Result<Self> {
        let data: GraphData = serde_json::from_str(json)?;
        debug!(sources = data.len(), "loaded graph data from json");
        Ok(Self::from_data(data))
    }
}
