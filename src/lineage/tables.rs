//! Table materialization: tables paired with the columns they own
//!
//! Ownership is read from containment edges only, and only in the
//! table -> column direction. A containment edge whose destination id is not
//! in the node collection is skipped; a table without containment edges
//! materializes with no columns.

use std::collections::HashMap;

use log::{debug, trace};
use serde::Serialize;

use super::classify::is_table;
use super::model::{Edge, Node};

/// A table node plus its owned columns, before neighbor aggregation
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BaseTable {
    #[serde(flatten)]
    pub node: Node,
    /// Owned columns in containment-edge order
    pub columns: Vec<Node>,
}

impl BaseTable {
    pub fn id(&self) -> &str {
        &self.node.id
    }

    /// Whether `id` is this table or one of its columns
    pub fn contains(&self, id: &str) -> bool {
        self.node.id == id || self.columns.iter().any(|c| c.id == id)
    }

    /// Ids this table answers to: its own id, then its column ids
    pub fn member_ids(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.node.id.as_str()).chain(self.columns.iter().map(|c| c.id.as_str()))
    }
}

/// Id-indexed view over one (nodes, edges) pair
///
/// Built once per call and shared by every table resolved in that call, so
/// the bulk path costs O(N + E) instead of a node scan per containment edge.
#[derive(Debug)]
pub struct NodeLookup<'a> {
    nodes: &'a [Node],
    by_id: HashMap<&'a str, usize>,
    /// Containment edges grouped by source id, destinations in edge order
    containment: HashMap<&'a str, Vec<&'a str>>,
}

impl<'a> NodeLookup<'a> {
    pub fn new(nodes: &'a [Node], edges: &'a [Edge]) -> Self {
        let mut by_id = HashMap::with_capacity(nodes.len());
        for (index, node) in nodes.iter().enumerate() {
            // First occurrence wins if the service ever sends a duplicate id
            by_id.entry(node.id.as_str()).or_insert(index);
        }

        let mut containment: HashMap<&str, Vec<&str>> = HashMap::new();
        for edge in edges.iter().filter(|e| e.is_containment()) {
            containment
                .entry(edge.source_id())
                .or_default()
                .push(edge.destination_id());
        }

        NodeLookup {
            nodes,
            by_id,
            containment,
        }
    }

    pub fn get(&self, id: &str) -> Option<&'a Node> {
        self.by_id.get(id).map(|&index| &self.nodes[index])
    }

    pub fn nodes(&self) -> &'a [Node] {
        self.nodes
    }

    /// Ids of all nodes claimed as columns by a resolvable containment source
    pub fn owned_ids(&self) -> impl Iterator<Item = &'a str> + '_ {
        self.containment
            .iter()
            .filter(|(source, _)| self.by_id.contains_key(*source))
            .flat_map(|(_, columns)| columns.iter().copied())
    }

    /// Columns owned by the node with id `table_id`
    pub fn owned_columns(&self, table_id: &str) -> Vec<Node> {
        let Some(destinations) = self.containment.get(table_id) else {
            return Vec::new();
        };

        destinations
            .iter()
            .filter_map(|id| {
                let column = self.get(id);
                if column.is_none() {
                    trace!(
                        "Dropping containment edge {} -> {}: destination not in snapshot",
                        table_id,
                        id
                    );
                }
                column.cloned()
            })
            .collect()
    }

    pub fn base_table(&self, node: &Node) -> BaseTable {
        BaseTable {
            node: node.clone(),
            columns: self.owned_columns(&node.id),
        }
    }
}

/// Resolve the columns owned by `table`
///
/// # Arguments
/// * `table` - Candidate table node (not required to classify as a table)
/// * `nodes` - Full node collection used to resolve column ids
/// * `edges` - Full edge collection
///
/// # Returns
/// Destination nodes of containment edges sourced at `table`, in edge order.
/// Unresolved destinations are dropped.
pub fn owned_columns(table: &Node, nodes: &[Node], edges: &[Edge]) -> Vec<Node> {
    NodeLookup::new(nodes, edges).owned_columns(&table.id)
}

/// Materialize every node classified as a table, in node order
pub fn materialize_tables(nodes: &[Node], edges: &[Edge]) -> Vec<BaseTable> {
    let lookup = NodeLookup::new(nodes, edges);
    materialize_with(&lookup)
}

pub(crate) fn materialize_with(lookup: &NodeLookup<'_>) -> Vec<BaseTable> {
    let tables: Vec<BaseTable> = lookup
        .nodes()
        .iter()
        .filter(|node| is_table(node))
        .map(|node| lookup.base_table(node))
        .collect();

    debug!(
        "Materialized {} tables ({} columns) from {} nodes",
        tables.len(),
        tables.iter().map(|t| t.columns.len()).sum::<usize>(),
        lookup.nodes().len()
    );
    tables
}

/// Materialize one designated node as a table, skipping classification
///
/// Used by detail views: the caller already knows the node is a table even
/// when its metadata is incomplete.
pub fn materialize_table(node: &Node, nodes: &[Node], edges: &[Edge]) -> BaseTable {
    NodeLookup::new(nodes, edges).base_table(node)
}
