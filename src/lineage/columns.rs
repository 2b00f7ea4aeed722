//! Column listing for a single table's detail view
//!
//! Produces display-ready rows for the columns of one table: the caller's
//! search narrows the rows, the caller's expansion set marks which rows show
//! their requirements, and each row carries a link to the column's own page.
//! Expansion state is owned by the caller and only read here.

use std::collections::{HashMap, HashSet};

use serde::Serialize;

use super::model::{Edge, Node};
use super::snapshot::matches_search;
use super::tables::{BaseTable, NodeLookup};

pub const NO_COLUMNS_MESSAGE: &str = "No columns found";
pub const CLEAR_SEARCH_HINT: &str = "Try clearing search";

#[derive(Debug, Clone, Copy)]
pub struct ColumnListingOptions<'a> {
    pub search: Option<&'a str>,
    pub expanded: &'a HashSet<String>,
    pub route_prefix: &'a str,
}

/// A downstream column this column feeds, via one lineage edge
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColumnRequirement {
    pub edge_id: String,
    pub id: String,
    pub name: String,
    pub display_name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColumnRow {
    pub index: usize,
    pub id: String,
    pub name: String,
    pub display_name: String,
    pub data_type: Option<String>,
    pub link: String,
    pub expanded: bool,
    pub requirements: Vec<ColumnRequirement>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColumnListing {
    pub table_id: String,
    pub total_columns: usize,
    pub rows: Vec<ColumnRow>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub empty_message: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hint: Option<&'static str>,
}

/// Link target for a column's detail page: `{route_prefix}/nodes/{column_id}`
pub fn column_link(route_prefix: &str, column_id: &str) -> String {
    format!("{}/nodes/{}", route_prefix, column_id)
}

pub fn column_listing(
    table: &BaseTable,
    nodes: &[Node],
    edges: &[Edge],
    options: &ColumnListingOptions<'_>,
) -> ColumnListing {
    let lookup = NodeLookup::new(nodes, edges);

    let mut lineage_by_source: HashMap<&str, Vec<&Edge>> = HashMap::new();
    for edge in edges.iter().filter(|e| !e.is_containment()) {
        lineage_by_source
            .entry(edge.source_id())
            .or_default()
            .push(edge);
    }

    let search = options.search.filter(|s| !s.is_empty());
    let rows: Vec<ColumnRow> = table
        .columns
        .iter()
        .filter(|column| search.is_none_or(|s| matches_search(column, s)))
        .enumerate()
        .map(|(index, column)| {
            let requirements = lineage_by_source
                .get(column.id.as_str())
                .into_iter()
                .flatten()
                .filter_map(|edge| {
                    lookup.get(edge.destination_id()).map(|dest| ColumnRequirement {
                        edge_id: edge.id.clone(),
                        id: dest.id.clone(),
                        name: dest.name.clone(),
                        display_name: dest.display_name.clone(),
                    })
                })
                .collect();

            ColumnRow {
                index,
                id: column.id.clone(),
                name: column.name.clone(),
                display_name: column.display_name.clone(),
                data_type: column.data_type().map(str::to_string),
                link: column_link(options.route_prefix, &column.id),
                expanded: options.expanded.contains(&column.id),
                requirements,
            }
        })
        .collect();

    let (empty_message, hint) = if rows.is_empty() {
        (Some(NO_COLUMNS_MESSAGE), search.map(|_| CLEAR_SEARCH_HINT))
    } else {
        (None, None)
    };

    ColumnListing {
        table_id: table.id().to_string(),
        total_columns: table.columns.len(),
        rows,
        empty_message,
        hint,
    }
}
