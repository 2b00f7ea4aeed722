//! Properties the table aggregation must hold for any snapshot:
//! idempotence, order independence, no self-neighboring, and agreement
//! between the bulk and single-table paths.

#[cfg(test)]
mod aggregation_property_tests {
    use std::collections::{BTreeMap, BTreeSet};
    use std::sync::Arc;

    use tablegraph::lineage::{
        aggregate_neighbors, materialize_table, materialize_tables, neighbors_of,
        nodes_to_tables, BaseTable, Edge, Node, Table,
    };

    type TableSets = BTreeMap<String, (BTreeSet<String>, BTreeSet<String>, BTreeSet<String>)>;

    fn table(id: &str) -> Node {
        Node::new(id, id).with_node_type("Table")
    }

    fn column(id: &str) -> Node {
        Node::new(id, id).with_node_type("Column")
    }

    /// Three tables in a chain plus a table-level edge, a self-loop inside
    /// a table, a dangling edge and an untyped node.
    fn warehouse() -> (Vec<Node>, Vec<Edge>) {
        let nodes = vec![
            table("raw"),
            column("raw.id"),
            column("raw.amount"),
            table("staging"),
            column("staging.id"),
            column("staging.amount"),
            table("mart"),
            column("mart.total"),
            Node::new("orphan", "orphan"),
        ];
        let edges = vec![
            Edge::belongs_to("c1", "raw", "raw.id"),
            Edge::belongs_to("c2", "raw", "raw.amount"),
            Edge::belongs_to("c3", "staging", "staging.id"),
            Edge::belongs_to("c4", "staging", "staging.amount"),
            Edge::belongs_to("c5", "mart", "mart.total"),
            Edge::new("l1", "raw.id", "staging.id"),
            Edge::new("l2", "raw.amount", "staging.amount"),
            Edge::new("l3", "staging.amount", "mart.total"),
            Edge::new("l4", "raw", "mart"),
            Edge::new("l5", "staging.id", "staging.amount"),
            Edge::new("l6", "mart.total", "dropped.column"),
        ];
        (nodes, edges)
    }

    fn sets(tables: &[Table]) -> TableSets {
        tables
            .iter()
            .map(|t| {
                let columns = t.columns().iter().map(|c| c.id.clone()).collect();
                let sources = t.source_ids().into_iter().map(String::from).collect();
                let destinations = t.destination_ids().into_iter().map(String::from).collect();
                (t.id().to_string(), (columns, sources, destinations))
            })
            .collect()
    }

    #[test]
    fn test_concrete_two_table_scenario() {
        let nodes = vec![table("A"), column("A.x"), table("B"), column("B.y")];
        let edges = vec![
            Edge::belongs_to("e1", "A", "A.x"),
            Edge::belongs_to("e2", "B", "B.y"),
            Edge::new("e3", "A.x", "B.y"),
        ];

        let base = materialize_tables(&nodes, &edges);
        assert_eq!(base.len(), 2);
        assert_eq!(base[0].columns, vec![column("A.x")]);
        assert_eq!(base[1].columns, vec![column("B.y")]);

        let tables = aggregate_neighbors(base, &edges);
        assert_eq!(tables[0].id(), "A");
        assert_eq!(tables[0].destination_ids(), vec!["B"]);
        assert!(tables[0].source_ids().is_empty());
        assert_eq!(tables[1].id(), "B");
        assert_eq!(tables[1].source_ids(), vec!["A"]);
        assert!(tables[1].destination_ids().is_empty());
    }

    #[test]
    fn test_chain_neighbors() {
        let (nodes, edges) = warehouse();
        let sets = sets(&nodes_to_tables(&nodes, &edges));

        let (_, raw_sources, raw_destinations) = &sets["raw"];
        assert!(raw_sources.is_empty());
        assert_eq!(
            raw_destinations,
            &BTreeSet::from(["staging".to_string(), "mart".to_string()])
        );

        let (_, mart_sources, mart_destinations) = &sets["mart"];
        assert_eq!(
            mart_sources,
            &BTreeSet::from(["raw".to_string(), "staging".to_string()])
        );
        assert!(mart_destinations.is_empty());
        assert!(!sets.contains_key("orphan"));
    }

    #[test]
    fn test_idempotent() {
        let (nodes, edges) = warehouse();
        let first = aggregate_neighbors(materialize_tables(&nodes, &edges), &edges);
        let second = aggregate_neighbors(materialize_tables(&nodes, &edges), &edges);
        assert_eq!(first, second);
    }

    #[test]
    fn test_order_independent() {
        let (nodes, edges) = warehouse();
        let expected = sets(&nodes_to_tables(&nodes, &edges));

        let mut reversed_nodes = nodes.clone();
        reversed_nodes.reverse();
        let mut reversed_edges = edges.clone();
        reversed_edges.reverse();
        assert_eq!(sets(&nodes_to_tables(&reversed_nodes, &reversed_edges)), expected);

        let mut rotated_nodes = nodes.clone();
        rotated_nodes.rotate_left(4);
        let mut rotated_edges = edges.clone();
        rotated_edges.rotate_left(7);
        assert_eq!(sets(&nodes_to_tables(&rotated_nodes, &rotated_edges)), expected);
    }

    #[test]
    fn test_no_self_neighboring() {
        let (nodes, edges) = warehouse();
        for table in nodes_to_tables(&nodes, &edges) {
            assert!(!table.source_ids().contains(&table.id()));
            assert!(!table.destination_ids().contains(&table.id()));
        }
    }

    #[test]
    fn test_single_and_bulk_agree() {
        let (nodes, edges) = warehouse();
        let bulk = nodes_to_tables(&nodes, &edges);
        let base: Vec<Arc<BaseTable>> = materialize_tables(&nodes, &edges)
            .into_iter()
            .map(Arc::new)
            .collect();

        for table in &bulk {
            let node = nodes.iter().find(|n| n.id == table.id()).unwrap();
            let single = materialize_table(node, &nodes, &edges);
            assert_eq!(&single, &table.base);
            assert_eq!(neighbors_of(&single, &base, &edges), table.neighbors());
        }
    }

    #[test]
    fn test_dangling_destination_keeps_valid_columns() {
        let (nodes, mut edges) = warehouse();
        edges.push(Edge::belongs_to("c6", "mart", "mart.ghost"));
        let sets = sets(&nodes_to_tables(&nodes, &edges));
        assert_eq!(sets["mart"].0, BTreeSet::from(["mart.total".to_string()]));
    }

    #[test]
    fn test_shared_column_ownership_is_not_dropped() {
        let nodes = vec![table("T1"), table("T2"), column("shared")];
        let edges = vec![
            Edge::belongs_to("c1", "T1", "shared"),
            Edge::belongs_to("c2", "T2", "shared"),
        ];
        let tables = nodes_to_tables(&nodes, &edges);
        assert!(tables.iter().all(|t| t.columns() == [column("shared")]));
    }

    #[test]
    fn test_null_metadata_only_reachable_through_single_path() {
        let mut nodes = vec![Node::new("T", "untyped"), column("T.a"), table("U")];
        nodes[0].metadata = None;
        let edges = vec![
            Edge::belongs_to("c1", "T", "T.a"),
            Edge::new("l1", "T.a", "U"),
        ];

        assert!(nodes_to_tables(&nodes, &edges).iter().all(|t| t.id() != "T"));

        let detail = tablegraph::lineage::node_to_table(&nodes[0], &nodes, &edges);
        assert_eq!(detail.columns(), [column("T.a")]);
        assert_eq!(detail.destination_ids(), vec!["U"]);
    }
}
