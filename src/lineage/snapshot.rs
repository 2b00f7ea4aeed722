//! Graph snapshots: one complete, immutable (nodes, edges) pair
//!
//! A snapshot is loaded in full and never patched; a changed graph is a new
//! snapshot and every derived table is recomputed from it. Node kinds are
//! tagged once when the snapshot is built.

use std::collections::{HashMap, HashSet};
use std::path::Path;

use log::{debug, info};
use serde::Deserialize;

use super::classify::{is_table, node_kind, NodeKind};
use super::columns::{column_listing, ColumnListing, ColumnListingOptions};
use super::errors::{SnapshotError, SnapshotFormat};
use super::model::{Edge, Node};
use super::neighbors::{aggregate_neighbors, node_to_table, Table};
use super::tables::NodeLookup;

/// Case-insensitive substring match on the node name; empty search matches all
pub fn matches_search(node: &Node, search: &str) -> bool {
    search.is_empty() || node.name.to_lowercase().contains(&search.to_lowercase())
}

/// Nodes whose name matches `search`, in input order
pub fn filter_nodes<'a>(nodes: &'a [Node], search: &str) -> Vec<&'a Node> {
    nodes.iter().filter(|node| matches_search(node, search)).collect()
}

/// Wire shape of a snapshot document
#[derive(Debug, Deserialize)]
struct SnapshotDocument {
    #[serde(default)]
    nodes: Vec<Node>,
    #[serde(default)]
    edges: Vec<Edge>,
}

#[derive(Debug, Clone)]
pub struct GraphSnapshot {
    nodes: Vec<Node>,
    edges: Vec<Edge>,
    /// Parallel to `nodes`
    kinds: Vec<NodeKind>,
    positions: HashMap<String, usize>,
}

impl GraphSnapshot {
    pub fn new(nodes: Vec<Node>, edges: Vec<Edge>) -> Self {
        let (kinds, positions) = {
            let lookup = NodeLookup::new(&nodes, &edges);
            let owned: HashSet<&str> = lookup.owned_ids().collect();
            let kinds: Vec<NodeKind> = nodes
                .iter()
                .map(|node| node_kind(node, owned.contains(node.id.as_str())))
                .collect();

            let mut positions = HashMap::with_capacity(nodes.len());
            for (index, node) in nodes.iter().enumerate() {
                positions.entry(node.id.clone()).or_insert(index);
            }
            (kinds, positions)
        };

        debug!(
            "Snapshot tagged {} nodes: {} tables, {} columns, {} edges",
            nodes.len(),
            kinds.iter().filter(|k| **k == NodeKind::Table).count(),
            kinds.iter().filter(|k| **k == NodeKind::Column).count(),
            edges.len()
        );

        GraphSnapshot {
            nodes,
            edges,
            kinds,
            positions,
        }
    }

    pub fn from_str(content: &str, format: SnapshotFormat) -> Result<Self, SnapshotError> {
        let document: SnapshotDocument = match format {
            SnapshotFormat::Json => {
                serde_json::from_str(content).map_err(|e| SnapshotError::parse(format, e))?
            }
            SnapshotFormat::Yaml => {
                serde_yaml::from_str(content).map_err(|e| SnapshotError::parse(format, e))?
            }
        };
        Ok(Self::new(document.nodes, document.edges))
    }

    pub fn from_json_str(content: &str) -> Result<Self, SnapshotError> {
        Self::from_str(content, SnapshotFormat::Json)
    }

    pub fn from_yaml_str(content: &str) -> Result<Self, SnapshotError> {
        Self::from_str(content, SnapshotFormat::Yaml)
    }

    /// Load a snapshot file; `.yaml`/`.yml` files are YAML, everything else JSON
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, SnapshotError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| SnapshotError::Read {
            path: path.display().to_string(),
            error: e.to_string(),
        })?;
        let snapshot = Self::from_str(&content, SnapshotFormat::from_path(path))?;
        info!(
            "Loaded snapshot from {}: {} nodes, {} edges",
            path.display(),
            snapshot.nodes.len(),
            snapshot.edges.len()
        );
        Ok(snapshot)
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    pub fn node(&self, id: &str) -> Option<&Node> {
        self.positions.get(id).map(|&index| &self.nodes[index])
    }

    pub fn kind_of(&self, id: &str) -> Option<NodeKind> {
        self.positions.get(id).map(|&index| self.kinds[index])
    }

    pub fn table_count(&self) -> usize {
        self.kinds.iter().filter(|k| **k == NodeKind::Table).count()
    }

    /// Every classified table, enriched with its neighbors
    pub fn tables(&self) -> Vec<Table> {
        self.tables_matching(None)
    }

    /// Bulk path over the table nodes whose name matches `search`
    ///
    /// The search narrows which tables are listed, and therefore which
    /// tables can appear as neighbors. Columns always resolve against the
    /// whole snapshot, so a table's column count does not depend on the search.
    pub fn tables_matching(&self, search: Option<&str>) -> Vec<Table> {
        let lookup = NodeLookup::new(&self.nodes, &self.edges);
        let search = search.unwrap_or_default();
        let base = self
            .nodes
            .iter()
            .zip(&self.kinds)
            .filter(|(node, kind)| **kind == NodeKind::Table && matches_search(node, search))
            .map(|(node, _)| lookup.base_table(node))
            .collect();
        aggregate_neighbors(base, &self.edges)
    }

    /// Single-table path; `None` only when `id` is not in the snapshot
    pub fn table(&self, id: &str) -> Option<Table> {
        let node = self.node(id)?;
        if !is_table(node) {
            debug!("Materializing unclassified node {} as a table", id);
        }
        Some(node_to_table(node, &self.nodes, &self.edges))
    }

    pub fn column_listing(
        &self,
        table_id: &str,
        options: &ColumnListingOptions<'_>,
    ) -> Option<ColumnListing> {
        let node = self.node(table_id)?;
        let table = NodeLookup::new(&self.nodes, &self.edges).base_table(node);
        Some(column_listing(&table, &self.nodes, &self.edges, options))
    }
}
