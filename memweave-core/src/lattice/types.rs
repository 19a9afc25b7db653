//! Concept and relation types for the symbolic lattice.

use crate::store::Keyed;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a concept node.
///
/// Caller-assigned ids are arbitrary strings; ids generated during tag
/// ingestion look like `concept-<uuid>`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConceptId(pub String);

impl ConceptId {
    /// Generate a new random concept ID.
    pub fn generate() -> Self {
        Self(format!("concept-{}", Uuid::new_v4().as_simple()))
    }

    /// The id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ConceptId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for ConceptId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl std::fmt::Display for ConceptId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Kind of symbol a lattice node stands for.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConceptKind {
    /// Abstract idea extracted from conversation.
    #[default]
    Concept,
    /// Named thing (person, product, file).
    Entity,
    /// Grouping of other concepts.
    Category,
    /// Opaque token with no further interpretation.
    Symbol,
}

impl std::fmt::Display for ConceptKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Concept => write!(f, "concept"),
            Self::Entity => write!(f, "entity"),
            Self::Category => write!(f, "category"),
            Self::Symbol => write!(f, "symbol"),
        }
    }
}

/// Semantic relationship carried by a lattice edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RelationType {
    /// Concepts were extracted together. Created and strengthened by ingestion.
    CoOccurring,

    /// Source is an instance or subtype of target.
    IsA,

    /// Source is a component of target.
    PartOf,

    /// Source brings about target.
    Causes,

    /// Generic explicit association.
    RelatedTo,
}

impl RelationType {
    /// Get a human-readable description.
    pub fn description(&self) -> &'static str {
        match self {
            Self::CoOccurring => "appears together with",
            Self::IsA => "is a",
            Self::PartOf => "is part of",
            Self::Causes => "causes",
            Self::RelatedTo => "is related to",
        }
    }
}

impl std::fmt::Display for RelationType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::CoOccurring => write!(f, "co_occurring"),
            Self::IsA => write!(f, "is_a"),
            Self::PartOf => write!(f, "part_of"),
            Self::Causes => write!(f, "causes"),
            Self::RelatedTo => write!(f, "related_to"),
        }
    }
}

/// A symbolic concept.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LatticeNode {
    /// Unique identifier.
    pub id: ConceptId,

    /// Human-readable key of the concept. Ingestion keeps labels unique.
    pub label: String,

    /// Confidence score (0.0 - 1.0).
    pub confidence: f64,

    /// What kind of symbol this is.
    #[serde(rename = "type", default)]
    pub kind: ConceptKind,
}

impl LatticeNode {
    /// Create a concept node with an explicit id.
    pub fn new(id: impl Into<ConceptId>, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            confidence: 1.0,
            kind: ConceptKind::Concept,
        }
    }

    /// Create a concept node with a generated id.
    pub fn concept(label: impl Into<String>) -> Self {
        Self::new(ConceptId::generate(), label)
    }

    /// Set the confidence score. Non-finite values leave it unchanged.
    pub fn with_confidence(mut self, confidence: f64) -> Self {
        if confidence.is_finite() {
            self.confidence = confidence.clamp(0.0, 1.0);
        }
        self
    }

    /// Set the kind.
    pub fn with_kind(mut self, kind: ConceptKind) -> Self {
        self.kind = kind;
        self
    }
}

impl Keyed for LatticeNode {
    type Key = ConceptId;

    fn key(&self) -> &ConceptId {
        &self.id
    }
}

/// A weighted, typed relation between two concepts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LatticeEdge {
    /// Source concept.
    pub source_id: ConceptId,

    /// Target concept.
    pub target_id: ConceptId,

    /// Type of relationship.
    #[serde(rename = "relation_type")]
    pub relation: RelationType,

    /// Association strength, never negative.
    pub weight: f64,
}

impl LatticeEdge {
    /// Create a new edge with weight 1.0.
    pub fn new(
        source_id: impl Into<ConceptId>,
        target_id: impl Into<ConceptId>,
        relation: RelationType,
    ) -> Self {
        Self {
            source_id: source_id.into(),
            target_id: target_id.into(),
            relation,
            weight: 1.0,
        }
    }

    /// Create a co-occurrence edge.
    pub fn co_occurring(source_id: impl Into<ConceptId>, target_id: impl Into<ConceptId>) -> Self {
        Self::new(source_id, target_id, RelationType::CoOccurring)
    }

    /// Set the weight. Negative values become 0; non-finite values are ignored.
    pub fn with_weight(mut self, weight: f64) -> Self {
        if weight.is_finite() {
            self.weight = weight.max(0.0);
        }
        self
    }

    /// Whether this edge joins `a` and `b`, in either direction.
    pub fn connects(&self, a: &ConceptId, b: &ConceptId) -> bool {
        (&self.source_id == a && &self.target_id == b)
            || (&self.source_id == b && &self.target_id == a)
    }

    /// Whether `id` is one of the endpoints.
    pub fn touches(&self, id: &ConceptId) -> bool {
        &self.source_id == id || &self.target_id == id
    }

    /// The endpoint opposite `id`, if `id` is an endpoint.
    pub fn other_end(&self, id: &ConceptId) -> Option<&ConceptId> {
        if &self.source_id == id {
            Some(&self.target_id)
        } else if &self.target_id == id {
            Some(&self.source_id)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generated_ids_are_unique() {
        let a = ConceptId::generate();
        let b = ConceptId::generate();
        assert_ne!(a, b);
        assert!(a.as_str().starts_with("concept-"));
    }

    #[test]
    fn test_node_builder() {
        let node = LatticeNode::new("1", "Apple")
            .with_confidence(1.4)
            .with_kind(ConceptKind::Entity);

        assert_eq!(node.id, ConceptId::from("1"));
        assert_eq!(node.confidence, 1.0);
        assert_eq!(node.kind, ConceptKind::Entity);

        let node = node.with_confidence(f64::NAN);
        assert_eq!(node.confidence, 1.0);
    }

    #[test]
    fn test_edge_weight_never_negative() {
        let edge = LatticeEdge::co_occurring("a", "b").with_weight(-3.0);
        assert_eq!(edge.weight, 0.0);

        let edge = LatticeEdge::co_occurring("a", "b").with_weight(7.5);
        assert_eq!(edge.weight, 7.5);
    }

    #[test]
    fn test_edge_connects_either_direction() {
        let a = ConceptId::from("a");
        let b = ConceptId::from("b");
        let c = ConceptId::from("c");
        let edge = LatticeEdge::new("a", "b", RelationType::IsA);

        assert!(edge.connects(&a, &b));
        assert!(edge.connects(&b, &a));
        assert!(!edge.connects(&a, &c));
        assert_eq!(edge.other_end(&b), Some(&a));
        assert_eq!(edge.other_end(&c), None);
    }

    #[test]
    fn test_serialized_shape() {
        let node = LatticeNode::new("1", "Apple");
        let json = serde_json::to_value(&node).unwrap();
        assert_eq!(json["id"], "1");
        assert_eq!(json["type"], "concept");

        let edge = LatticeEdge::co_occurring("1", "2");
        let json = serde_json::to_value(&edge).unwrap();
        assert_eq!(json["relation_type"], "co_occurring");
        assert_eq!(json["source_id"], "1");
    }
}
