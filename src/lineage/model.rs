//! Snapshot data model: nodes and edges as delivered by the graph service
//!
//! Nodes are tables, columns, or anything else the service knows about.
//! Edges are either containment (`belongs_to`, table -> column) or lineage
//! (data flows from `source` to `destination`).
//!
//! Metadata objects are nullable on the wire. Unknown metadata keys are kept
//! in `extra` so a snapshot survives a load/serialize cycle untouched.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Constraint type that marks an edge as table -> column containment
pub const CONTAINMENT_CONSTRAINT: &str = "belongs_to";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub id: String,
    pub name: String,
    pub display_name: String,
    #[serde(default)]
    pub metadata: Option<NodeMetadata>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NodeMetadata {
    /// Free-text classification, e.g. "Table", "BASE TABLE", "Column"
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub node_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub table_name: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Node {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        let name = name.into();
        Node {
            id: id.into(),
            display_name: name.clone(),
            name,
            metadata: None,
        }
    }

    /// Builder helper: set `metadata.node_type`, creating metadata if absent
    pub fn with_node_type(mut self, node_type: impl Into<String>) -> Self {
        self.metadata.get_or_insert_with(NodeMetadata::default).node_type = Some(node_type.into());
        self
    }

    pub fn node_type(&self) -> Option<&str> {
        self.metadata.as_ref()?.node_type.as_deref()
    }

    /// Column data type as reported by the grai integration metadata
    /// (`metadata.grai.node_attributes.data_type`)
    pub fn data_type(&self) -> Option<&str> {
        self.metadata
            .as_ref()?
            .extra
            .get("grai")?
            .get("node_attributes")?
            .get("data_type")?
            .as_str()
    }
}

/// Reference to an edge endpoint; only the id is required
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeRef {
    pub id: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Edge {
    pub id: String,
    pub source: NodeRef,
    pub destination: NodeRef,
    #[serde(default)]
    pub metadata: Option<EdgeMetadata>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EdgeMetadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub constraint_type: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// How an edge relates its endpoints
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RelationKind {
    /// Table (source) owns column (destination)
    Containment,
    /// Data flows from source to destination
    Lineage,
}

impl Edge {
    pub fn new(
        id: impl Into<String>,
        source: impl Into<String>,
        destination: impl Into<String>,
    ) -> Self {
        Edge {
            id: id.into(),
            source: NodeRef { id: source.into() },
            destination: NodeRef {
                id: destination.into(),
            },
            metadata: None,
        }
    }

    /// Containment edge from `table` to `column`
    pub fn belongs_to(
        id: impl Into<String>,
        table: impl Into<String>,
        column: impl Into<String>,
    ) -> Self {
        let mut edge = Edge::new(id, table, column);
        edge.metadata = Some(EdgeMetadata {
            constraint_type: Some(CONTAINMENT_CONSTRAINT.to_string()),
            extra: Map::new(),
        });
        edge
    }

    pub fn source_id(&self) -> &str {
        &self.source.id
    }

    pub fn destination_id(&self) -> &str {
        &self.destination.id
    }

    /// Exact, case-sensitive match on `belongs_to`; anything else is lineage
    pub fn relation_kind(&self) -> RelationKind {
        let constraint = self
            .metadata
            .as_ref()
            .and_then(|m| m.constraint_type.as_deref());
        match constraint {
            Some(CONTAINMENT_CONSTRAINT) => RelationKind::Containment,
            _ => RelationKind::Lineage,
        }
    }

    pub fn is_containment(&self) -> bool {
        self.relation_kind() == RelationKind::Containment
    }
}
