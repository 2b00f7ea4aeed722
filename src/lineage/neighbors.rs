//! Neighbor aggregation: upstream and downstream tables inferred through columns
//!
//! Two tables are neighbors when some edge (lineage or containment) has one
//! endpoint resolving to the first table and the other resolving to the
//! second. An endpoint resolves to a table when it is the table's own id or
//! the id of one of its columns.
//!
//! Direction follows data flow: for an edge `s -> d`, the table resolving
//! `s` is a source (upstream) table of the table resolving `d`, and the table
//! resolving `d` is a destination (downstream) table of the one resolving `s`.
//! The grai frontend's `nodesToTables` helper fills the two lists the other
//! way round; the data-flow reading here is intentional.
//!
//! Both the bulk path ([`aggregate_neighbors`]) and the single-table path
//! ([`neighbors_of`]) go through [`NeighborIndex::neighbors`], so a detail
//! view always agrees with the bulk listing for the same snapshot.

use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;

use log::debug;
use serde::Serialize;

use super::model::{Edge, Node};
use super::tables::{materialize_with, BaseTable, NodeLookup};

/// A base table enriched with its neighbor tables
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Table {
    #[serde(flatten)]
    pub base: BaseTable,
    #[serde(rename = "sourceTables", with = "crate::utils::serde_arc_vec")]
    pub source_tables: Vec<Arc<BaseTable>>,
    #[serde(rename = "destinationTables", with = "crate::utils::serde_arc_vec")]
    pub destination_tables: Vec<Arc<BaseTable>>,
}

/// Upstream and downstream tables of one table, in base-table order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TableNeighbors {
    pub source_tables: Vec<Arc<BaseTable>>,
    pub destination_tables: Vec<Arc<BaseTable>>,
}

impl TableNeighbors {
    pub fn source_ids(&self) -> Vec<&str> {
        self.source_tables.iter().map(|t| t.id()).collect()
    }

    pub fn destination_ids(&self) -> Vec<&str> {
        self.destination_tables.iter().map(|t| t.id()).collect()
    }
}

impl Table {
    pub fn from_parts(base: BaseTable, neighbors: TableNeighbors) -> Self {
        Table {
            base,
            source_tables: neighbors.source_tables,
            destination_tables: neighbors.destination_tables,
        }
    }

    pub fn id(&self) -> &str {
        self.base.id()
    }

    pub fn columns(&self) -> &[Node] {
        &self.base.columns
    }

    pub fn neighbors(&self) -> TableNeighbors {
        TableNeighbors {
            source_tables: self.source_tables.clone(),
            destination_tables: self.destination_tables.clone(),
        }
    }

    pub fn source_ids(&self) -> Vec<&str> {
        self.source_tables.iter().map(|t| t.id()).collect()
    }

    pub fn destination_ids(&self) -> Vec<&str> {
        self.destination_tables.iter().map(|t| t.id()).collect()
    }
}

/// Adjacency built once per snapshot
///
/// Maps every table id and column id to the candidate tables it resolves to,
/// and groups edges by endpoint, so neighbor resolution is proportional to
/// the anchor's degree rather than to the whole edge list.
#[derive(Debug)]
pub struct NeighborIndex<'a> {
    tables: &'a [Arc<BaseTable>],
    /// Node id -> positions in `tables` that answer to it
    members: HashMap<&'a str, Vec<usize>>,
    /// Edge source id -> destination ids
    outgoing: HashMap<&'a str, Vec<&'a str>>,
    /// Edge destination id -> source ids
    incoming: HashMap<&'a str, Vec<&'a str>>,
}

impl<'a> NeighborIndex<'a> {
    pub fn new(tables: &'a [Arc<BaseTable>], edges: &'a [Edge]) -> Self {
        let mut members: HashMap<&str, Vec<usize>> = HashMap::new();
        for (position, table) in tables.iter().enumerate() {
            for id in table.member_ids() {
                let positions = members.entry(id).or_default();
                if positions.last() != Some(&position) {
                    positions.push(position);
                }
            }
        }

        let mut outgoing: HashMap<&str, Vec<&str>> = HashMap::new();
        let mut incoming: HashMap<&str, Vec<&str>> = HashMap::new();
        for edge in edges {
            outgoing
                .entry(edge.source_id())
                .or_default()
                .push(edge.destination_id());
            incoming
                .entry(edge.destination_id())
                .or_default()
                .push(edge.source_id());
        }

        NeighborIndex {
            tables,
            members,
            outgoing,
            incoming,
        }
    }

    fn resolve(&self, id: &str) -> &[usize] {
        self.members.get(id).map(Vec::as_slice).unwrap_or(&[])
    }

    fn resolve_side(
        &self,
        anchor: &BaseTable,
        adjacency: &HashMap<&'a str, Vec<&'a str>>,
    ) -> Vec<Arc<BaseTable>> {
        let mut positions = BTreeSet::new();
        for id in anchor.member_ids() {
            let Some(others) = adjacency.get(id) else {
                continue;
            };
            for other in others {
                positions.extend(self.resolve(other).iter().copied());
            }
        }

        positions
            .into_iter()
            .map(|position| &self.tables[position])
            .filter(|table| table.id() != anchor.id())
            .cloned()
            .collect()
    }

    /// Neighbors of `anchor` among the indexed tables
    ///
    /// `anchor` need not be one of the indexed tables; it is never listed as
    /// its own neighbor either way.
    pub fn neighbors(&self, anchor: &BaseTable) -> TableNeighbors {
        TableNeighbors {
            source_tables: self.resolve_side(anchor, &self.incoming),
            destination_tables: self.resolve_side(anchor, &self.outgoing),
        }
    }
}

/// Enrich every base table with its source and destination tables
///
/// # Arguments
/// * `tables` - Base tables from [`materialize_tables`](super::tables::materialize_tables)
/// * `edges` - The edge collection the tables were materialized from
///
/// # Returns
/// One [`Table`] per input table, in input order.
pub fn aggregate_neighbors(tables: Vec<BaseTable>, edges: &[Edge]) -> Vec<Table> {
    let tables: Vec<Arc<BaseTable>> = tables.into_iter().map(Arc::new).collect();
    let index = NeighborIndex::new(&tables, edges);

    let enriched: Vec<Table> = tables
        .iter()
        .map(|table| Table::from_parts(BaseTable::clone(table), index.neighbors(table)))
        .collect();

    debug!(
        "Aggregated {} tables over {} edges: {} source links, {} destination links",
        enriched.len(),
        edges.len(),
        enriched.iter().map(|t| t.source_tables.len()).sum::<usize>(),
        enriched.iter().map(|t| t.destination_tables.len()).sum::<usize>()
    );
    enriched
}

/// Neighbors of one designated table, for detail views
///
/// Applies the same matching rule as [`aggregate_neighbors`]; for any table in
/// `tables` the result equals that table's entry in the bulk output.
pub fn neighbors_of(table: &BaseTable, tables: &[Arc<BaseTable>], edges: &[Edge]) -> TableNeighbors {
    NeighborIndex::new(tables, edges).neighbors(table)
}

/// Bulk path: classify, materialize, and aggregate in one call
pub fn nodes_to_tables(nodes: &[Node], edges: &[Edge]) -> Vec<Table> {
    let lookup = NodeLookup::new(nodes, edges);
    aggregate_neighbors(materialize_with(&lookup), edges)
}

/// Single-table path: `node` is materialized whether or not it classifies as
/// a table, and its neighbors are drawn from the classified tables
pub fn node_to_table(node: &Node, nodes: &[Node], edges: &[Edge]) -> Table {
    let lookup = NodeLookup::new(nodes, edges);
    let table = lookup.base_table(node);
    let tables: Vec<Arc<BaseTable>> = materialize_with(&lookup).into_iter().map(Arc::new).collect();
    let neighbors = neighbors_of(&table, &tables, edges);

    debug!(
        "Resolved table {}: {} columns, {} sources, {} destinations",
        table.id(),
        table.columns.len(),
        neighbors.source_tables.len(),
        neighbors.destination_tables.len()
    );
    Table::from_parts(table, neighbors)
}
