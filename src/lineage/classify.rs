//! Node classification for lineage snapshots
//!
//! # Purpose
//!
//! Classification decides which nodes are tables. It is driven purely by
//! `metadata.node_type`, compared case-insensitively against the values the
//! upstream integrations emit ("table" and "base table").
//!
//! Rather than re-deriving the classification from nested optional metadata
//! at every use site, a snapshot tags each node once with a [`NodeKind`].
//!
//! # Example
//!
//! ```ignore
//! use tablegraph::lineage::classify::is_table;
//!
//! if is_table(&node) {
//!     // node participates in bulk table materialization
//! }
//! ```

use super::model::Node;

/// `node_type` values (lower-cased) that mark a node as a table
const TABLE_NODE_TYPES: [&str; 2] = ["table", "base table"];

/// Explicit classification tag, computed once per node per snapshot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    Table,
    /// Destination of a containment edge whose source resolves
    Column,
    Other,
}

/// Check if a node is a table
///
/// # Arguments
/// * `node` - Node to classify
///
/// # Returns
/// `true` iff `metadata.node_type` is present and its lower-cased value is
/// exactly "table" or "base table". Absent metadata never classifies as a
/// table.
pub fn is_table(node: &Node) -> bool {
    node.node_type()
        .is_some_and(|node_type| TABLE_NODE_TYPES.contains(&node_type.to_lowercase().as_str()))
}

/// Kind of a node given whether some containment edge claims it as a column
///
/// A node that is both metadata-tagged as a table and claimed by a
/// containment edge stays a [`NodeKind::Table`].
pub fn node_kind(node: &Node, is_owned_column: bool) -> NodeKind {
    if is_table(node) {
        NodeKind::Table
    } else if is_owned_column {
        NodeKind::Column
    } else {
        NodeKind::Other
    }
}
