pub mod classify;
pub mod columns;
pub mod errors;
pub mod model;
pub mod neighbors;
pub mod snapshot;
pub mod tables;

// Re-export commonly used types
pub use classify::{is_table, NodeKind};
pub use columns::{column_link, column_listing, ColumnListing, ColumnListingOptions, ColumnRow};
pub use errors::{SnapshotError, SnapshotFormat};
pub use model::{Edge, EdgeMetadata, Node, NodeMetadata, NodeRef, RelationKind};
pub use neighbors::{
    aggregate_neighbors, neighbors_of, node_to_table, nodes_to_tables, Table, TableNeighbors,
};
pub use snapshot::{filter_nodes, matches_search, GraphSnapshot};
pub use tables::{materialize_table, materialize_tables, owned_columns, BaseTable};
