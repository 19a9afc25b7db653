//! Per-node strength readings for dashboards.

use crate::decay::DecayPolicy;
use crate::topology::{MemoryNode, TopologicalMemoryGraph};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Display-oriented reading of one memory node.
///
/// Decoupled from [`MemoryNode`]: ids are plain strings and the structural
/// links are left out.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemoryTelemetry {
    /// Node id.
    pub id: String,

    /// Node content.
    pub content: String,

    /// Effective (decayed) confidence at the time of reading.
    pub strength: f64,

    /// When the node was created.
    pub last_accessed: DateTime<Utc>,
}

impl MemoryTelemetry {
    /// Read a single node through a decay policy.
    pub fn from_node(node: &MemoryNode, decay: &dyn DecayPolicy, now: DateTime<Utc>) -> Self {
        Self {
            id: node.id.to_string(),
            content: node.content.clone(),
            strength: decay.effective_confidence(node.confidence, node.timestamp, now),
            last_accessed: node.timestamp,
        }
    }
}

/// Read every node at `now`, strongest first.
pub fn telemetry(graph: &TopologicalMemoryGraph, now: DateTime<Utc>) -> Vec<MemoryTelemetry> {
    let mut readings: Vec<MemoryTelemetry> = graph
        .nodes()
        .map(|n| MemoryTelemetry::from_node(n, graph.decay_policy(), now))
        .collect();

    readings.sort_by(|a, b| b.strength.partial_cmp(&a.strength).unwrap_or(Ordering::Equal));
    readings
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decay::{ExponentialDecay, NoDecay};
    use chrono::Duration;
    use std::sync::Arc;

    #[test]
    fn test_strength_is_decayed_confidence() {
        let mut graph = TopologicalMemoryGraph::with_decay(Arc::new(ExponentialDecay::new(0.5)));
        let node = graph.insert_node("fact", 0.8, None).unwrap();

        let readings = telemetry(&graph, node.timestamp + Duration::days(1));
        assert_eq!(readings.len(), 1);
        assert!((readings[0].strength - 0.4).abs() < 1e-9);
        assert_eq!(readings[0].id, node.id.to_string());
        assert_eq!(readings[0].last_accessed, node.timestamp);
    }

    #[test]
    fn test_strongest_first() {
        let mut graph = TopologicalMemoryGraph::with_decay(Arc::new(NoDecay));
        graph.insert_node("weak", 0.2, None).unwrap();
        graph.insert_node("strong", 0.9, None).unwrap();
        graph.insert_node("middle", 0.5, None).unwrap();

        let contents: Vec<String> = telemetry(&graph, Utc::now())
            .into_iter()
            .map(|t| t.content)
            .collect();
        assert_eq!(contents, vec!["strong", "middle", "weak"]);
    }

    #[test]
    fn test_serializes_with_plain_id() {
        let mut graph = TopologicalMemoryGraph::with_decay(Arc::new(NoDecay));
        let node = graph.insert_node("fact", 0.5, None).unwrap();

        let reading = MemoryTelemetry::from_node(&node, &NoDecay, Utc::now());
        let json = serde_json::to_value(&reading).unwrap();
        assert_eq!(json["id"], node.id.to_string());
        assert_eq!(json["strength"], 0.5);
    }
}
