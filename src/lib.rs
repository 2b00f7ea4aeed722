//! tablegraph - Table-level lineage over column-level graph snapshots
//!
//! This crate turns a flat snapshot of nodes (tables and columns mixed
//! together) and edges (containment and lineage) into table records through:
//! - Metadata-driven table classification
//! - Column ownership from containment edges
//! - Upstream/downstream table inference through column lineage
//! - A column listing model for single-table detail views
//!
//! The aggregation is a pure function of one snapshot. The `server` module
//! and the `tablegraph` binary are thin surfaces over it.

pub mod utils;

pub mod config;
pub mod lineage;
pub mod server;
