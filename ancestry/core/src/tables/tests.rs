use ancestry_core_bond::{NonNegativeF64, PositiveF64};

use crate::intervals::GenomicIntervals;

use super::{MutationId, NodeFlags, NodeId, SiteId, TableError, TreeTables};

fn pos(value: f64) -> NonNegativeF64 {
    NonNegativeF64::new(value).unwrap()
}

/// Three samples with two local trees, split at position 5:
///
/// ```text
///        [0, 5)             [5, 10)
///
///    4                         5
///   / \                       / \
///  |   3                     3   |
///  |  / \                   / \  |
///  2 0   1                 0   1 2
/// ```
fn example_tables() -> TreeTables {
    let mut tables = TreeTables::new(PositiveF64::new(10.0).unwrap());

    let p0 = tables.add_population("P0", "sampled").unwrap();
    let p1 = tables.add_population("P1", "ancestral").unwrap();
    let p2 = tables.add_population("P2", "ancestral").unwrap();

    let individual = tables.add_individual(0).unwrap();

    for _ in 0..2 {
        tables
            .add_node(NodeFlags::IS_SAMPLE, pos(0.0), Some(p0), Some(individual))
            .unwrap();
    }
    tables
        .add_node(NodeFlags::IS_SAMPLE, pos(0.0), Some(p0), None)
        .unwrap();
    tables
        .add_node(NodeFlags::empty(), pos(1.0), Some(p0), None)
        .unwrap();
    tables
        .add_node(NodeFlags::empty(), pos(2.0), Some(p1), None)
        .unwrap();
    tables
        .add_node(NodeFlags::empty(), pos(3.0), Some(p2), None)
        .unwrap();

    for (left, right, parent, child) in [
        (0.0, 10.0, 3, 0),
        (0.0, 10.0, 3, 1),
        (0.0, 5.0, 4, 2),
        (0.0, 5.0, 4, 3),
        (5.0, 10.0, 5, 2),
        (5.0, 10.0, 5, 3),
    ] {
        tables
            .add_edge(pos(left), pos(right), NodeId::new(parent), NodeId::new(child))
            .unwrap();
    }

    tables
}

fn edge_list(tables: &TreeTables) -> Vec<(u32, u32, f64, f64)> {
    tables
        .edges()
        .iter()
        .map(|edge| {
            (
                edge.parent.get(),
                edge.child.get(),
                edge.left.get(),
                edge.right.get(),
            )
        })
        .collect()
}

#[test]
fn example_tables_are_valid() {
    let tables = example_tables();

    assert!(tables.check_integrity().is_ok());
    assert_eq!(
        tables.samples(),
        vec![NodeId::new(0), NodeId::new(1), NodeId::new(2)]
    );
}

#[test]
fn sort_orders_edges_by_parent_time() {
    let mut tables = example_tables();
    let expected = tables.clone();

    let mut edges = tables.edges().to_vec();
    edges.reverse();
    tables.edges = edges;

    assert!(matches!(
        tables.check_integrity(),
        Err(TableError::UnsortedEdges { .. })
    ));

    tables.sort();

    assert_eq!(tables, expected);
}

#[test]
fn sort_remaps_sites_and_mutations() {
    let mut tables = example_tables();

    let late = tables.add_site(pos(7.0), "A").unwrap();
    let early = tables.add_site(pos(2.0), "C").unwrap();

    tables
        .add_mutation(late, NodeId::new(0), None, pos(0.5), "G")
        .unwrap();
    let young = tables
        .add_mutation(early, NodeId::new(0), None, pos(0.25), "T")
        .unwrap();
    tables
        .add_mutation(early, NodeId::new(3), None, pos(1.5), "A")
        .unwrap();
    tables.mutations[young.index()].parent = Some(MutationId::new(2));

    tables.sort();

    assert_eq!(tables.sites()[0].position, pos(2.0));
    assert_eq!(tables.sites()[1].position, pos(7.0));

    let mutations = tables.mutations();
    assert_eq!(mutations[0].site, SiteId::new(0));
    assert_eq!(mutations[0].time, pos(1.5));
    assert_eq!(mutations[1].site, SiteId::new(0));
    assert_eq!(mutations[1].parent, Some(MutationId::new(0)));
    assert_eq!(mutations[2].site, SiteId::new(1));

    assert!(tables.check_integrity().is_ok());
}

#[test]
fn squash_merges_adjacent_edges() {
    let mut tables = TreeTables::new(PositiveF64::new(10.0).unwrap());

    let child = tables
        .add_node(NodeFlags::IS_SAMPLE, pos(0.0), None, None)
        .unwrap();
    let parent = tables
        .add_node(NodeFlags::empty(), pos(1.0), None, None)
        .unwrap();

    tables.add_edge(pos(0.0), pos(3.0), parent, child).unwrap();
    tables.add_edge(pos(3.0), pos(6.0), parent, child).unwrap();
    tables.add_edge(pos(8.0), pos(10.0), parent, child).unwrap();

    tables.squash_edges();

    assert_eq!(
        edge_list(&tables),
        vec![(1, 0, 0.0, 6.0), (1, 0, 8.0, 10.0)]
    );
}

#[test]
fn integrity_check_rejects_invalid_tables() {
    let mut tables = example_tables();
    tables.edges[0].parent = NodeId::new(2);
    assert!(matches!(
        tables.check_integrity(),
        Err(TableError::BadNodeTimeOrdering { row: 0 })
    ));

    let mut tables = example_tables();
    tables.edges[0].right = pos(11.0);
    assert!(matches!(
        tables.check_integrity(),
        Err(TableError::BadEdgeInterval { row: 0, .. })
    ));

    let mut tables = example_tables();
    tables.edges[0].child = NodeId::new(42);
    assert!(matches!(
        tables.check_integrity(),
        Err(TableError::DanglingReference { table: "edge", .. })
    ));

    let mut tables = example_tables();
    let site = tables.add_site(pos(7.0), "A").unwrap();
    // Node 5, the parent of node 3 at position 7, is younger than the mutation
    tables
        .add_mutation(site, NodeId::new(3), None, pos(3.5), "C")
        .unwrap();
    assert!(matches!(
        tables.check_integrity(),
        Err(TableError::BadMutationTime { row: 0 })
    ));
}

#[test]
fn local_trees_are_queried_by_position() {
    let tables = example_tables();

    assert_eq!(tables.parent_at(NodeId::new(2), pos(4.0)), Some(NodeId::new(4)));
    assert_eq!(tables.parent_at(NodeId::new(2), pos(5.0)), Some(NodeId::new(5)));
    assert_eq!(tables.parent_at(NodeId::new(5), pos(5.0)), None);

    assert_eq!(
        tables.tmrca(NodeId::new(0), NodeId::new(1), pos(9.0)),
        Some(pos(1.0))
    );
    assert_eq!(
        tables.tmrca(NodeId::new(0), NodeId::new(2), pos(0.0)),
        Some(pos(2.0))
    );
    assert_eq!(
        tables.tmrca(NodeId::new(2), NodeId::new(1), pos(6.5)),
        Some(pos(3.0))
    );
}

#[test]
fn mutation_parents_and_states_follow_the_tree() {
    let mut tables = example_tables();

    let site = tables.add_site(pos(2.0), "A").unwrap();
    tables
        .add_mutation(site, NodeId::new(3), None, pos(1.5), "C")
        .unwrap();
    tables
        .add_mutation(site, NodeId::new(2), None, pos(1.0), "G")
        .unwrap();
    tables
        .add_mutation(site, NodeId::new(0), None, pos(0.5), "T")
        .unwrap();

    tables.sort();
    tables.compute_mutation_parents();

    let parents: Vec<Option<MutationId>> = tables
        .mutations()
        .iter()
        .map(|mutation| mutation.parent)
        .collect();
    assert_eq!(parents, vec![None, None, Some(MutationId::new(0))]);

    assert!(tables.check_integrity().is_ok());

    assert_eq!(tables.node_state(NodeId::new(0), site), Some("T"));
    assert_eq!(tables.node_state(NodeId::new(1), site), Some("C"));
    assert_eq!(tables.node_state(NodeId::new(2), site), Some("G"));
    assert_eq!(tables.node_state(NodeId::new(4), site), Some("A"));
    assert_eq!(tables.node_state(NodeId::new(42), site), None);
    assert_eq!(tables.node_state(NodeId::new(0), SiteId::new(42)), None);
}

#[test]
fn simplify_keeps_minimal_tables_unchanged() {
    let tables = example_tables();

    let (simplified, node_map) = tables.simplify(&tables.samples()).unwrap();

    assert_eq!(edge_list(&simplified), edge_list(&tables));
    assert_eq!(simplified.nodes(), tables.nodes());
    assert_eq!(simplified.populations(), tables.populations());
    assert!(node_map.iter().all(Option::is_some));
}

#[test]
fn simplify_removes_unary_nodes_and_unused_rows() {
    let mut tables = example_tables();

    let dropped = tables.add_site(pos(7.0), "A").unwrap();
    tables
        .add_mutation(dropped, NodeId::new(2), None, pos(0.5), "C")
        .unwrap();
    let kept = tables.add_site(pos(1.0), "G").unwrap();
    tables
        .add_mutation(kept, NodeId::new(4), None, pos(2.5), "T")
        .unwrap();
    tables.sort();

    let (simplified, node_map) = tables
        .simplify(&[NodeId::new(1), NodeId::new(0)])
        .unwrap();

    assert!(simplified.check_integrity().is_ok());

    // The samples come first, in the requested order
    assert_eq!(node_map[1], Some(NodeId::new(0)));
    assert_eq!(node_map[0], Some(NodeId::new(1)));
    assert_eq!(node_map[2], None);
    assert_eq!(node_map[3], Some(NodeId::new(2)));
    assert_eq!(node_map[4], None);
    assert_eq!(node_map[5], None);

    assert_eq!(edge_list(&simplified), vec![(2, 0, 0.0, 10.0), (2, 1, 0.0, 10.0)]);

    // Only the first population and individual are still referenced
    assert_eq!(simplified.populations().len(), 1);
    assert_eq!(simplified.populations()[0].name, "P0");
    assert_eq!(simplified.individuals().len(), 1);
    assert!(!simplified.node(NodeId::new(2)).flags.is_sample());

    // The mutation above the MRCA moves onto the MRCA
    assert_eq!(simplified.sites().len(), 1);
    assert_eq!(simplified.sites()[0].position, pos(1.0));
    assert_eq!(simplified.mutations().len(), 1);
    assert_eq!(simplified.mutations()[0].node, NodeId::new(2));
    assert_eq!(simplified.mutations()[0].derived_state, "T");
}

#[test]
fn simplify_removes_partially_unary_nodes() {
    let mut tables = TreeTables::new(PositiveF64::new(100.0).unwrap());

    let population = tables.add_population("P0", "").unwrap();

    for (flags, time) in [
        (NodeFlags::IS_SAMPLE, 0.0),
        (NodeFlags::IS_SAMPLE, 0.0),
        (NodeFlags::empty(), 1.0),
        (NodeFlags::empty(), 2.0),
    ] {
        tables
            .add_node(flags, pos(time), Some(population), None)
            .unwrap();
    }

    // Node 2 joins both samples on [0, 50) but only sample 0 on [50, 100)
    for (left, right, parent, child) in [
        (0.0, 100.0, 2, 0),
        (0.0, 50.0, 2, 1),
        (50.0, 100.0, 3, 1),
        (50.0, 100.0, 3, 2),
    ] {
        tables
            .add_edge(pos(left), pos(right), NodeId::new(parent), NodeId::new(child))
            .unwrap();
    }
    tables.sort();

    let (simplified, node_map) = tables.simplify(&tables.samples()).unwrap();

    assert!(simplified.check_integrity().is_ok());
    assert!(node_map.iter().all(Option::is_some));

    assert_eq!(
        edge_list(&simplified),
        vec![
            (2, 0, 0.0, 50.0),
            (2, 1, 0.0, 50.0),
            (3, 0, 50.0, 100.0),
            (3, 1, 50.0, 100.0),
        ]
    );
    assert_eq!(
        simplified.tmrca(NodeId::new(0), NodeId::new(1), pos(75.0)),
        Some(pos(2.0))
    );
}

#[test]
fn simplify_rejects_bad_samples() {
    let tables = example_tables();

    assert!(matches!(
        tables.simplify(&[NodeId::new(0), NodeId::new(0)]),
        Err(TableError::DuplicateSample(node)) if node == NodeId::new(0)
    ));
    assert!(matches!(
        tables.simplify(&[NodeId::new(17)]),
        Err(TableError::DanglingReference { table: "sample", .. })
    ));
}

#[test]
fn keep_intervals_clips_and_simplifies() {
    let mut tables = example_tables();

    let inside = tables.add_site(pos(3.0), "A").unwrap();
    tables
        .add_mutation(inside, NodeId::new(0), None, pos(0.5), "C")
        .unwrap();
    let outside = tables.add_site(pos(8.0), "A").unwrap();
    tables
        .add_mutation(outside, NodeId::new(1), None, pos(0.5), "G")
        .unwrap();

    let intervals = GenomicIntervals::new(
        [(pos(2.0), pos(4.0))],
        tables.sequence_length(),
    )
    .unwrap();

    let kept = tables.keep_intervals(&intervals).unwrap();

    assert!(kept.check_integrity().is_ok());
    assert_eq!(kept.sequence_length(), tables.sequence_length());

    // Node 5 only exists on [5, 10) and is removed
    assert_eq!(kept.nodes().len(), 5);
    assert_eq!(kept.populations().len(), 2);
    assert_eq!(
        edge_list(&kept),
        vec![
            (3, 0, 2.0, 4.0),
            (3, 1, 2.0, 4.0),
            (4, 2, 2.0, 4.0),
            (4, 3, 2.0, 4.0),
        ]
    );

    assert_eq!(kept.sites().len(), 1);
    assert_eq!(kept.sites()[0].position, pos(3.0));
    assert_eq!(kept.mutations().len(), 1);
    assert_eq!(kept.node_state(NodeId::new(0), SiteId::new(0)), Some("C"));
}

#[test]
fn keep_intervals_preserves_local_trees() {
    let tables = example_tables();

    let intervals = GenomicIntervals::new(
        [(pos(1.0), pos(3.0)), (pos(6.0), pos(9.0))],
        tables.sequence_length(),
    )
    .unwrap();

    let kept = tables.keep_intervals(&intervals).unwrap();

    for position in [1.0, 2.5, 6.0, 8.5] {
        for (a, b) in [(0, 1), (0, 2), (1, 2)] {
            assert_eq!(
                kept.tmrca(NodeId::new(a), NodeId::new(b), pos(position)),
                tables.tmrca(NodeId::new(a), NodeId::new(b), pos(position)),
            );
        }
    }

    assert_eq!(kept.tmrca(NodeId::new(0), NodeId::new(1), pos(4.0)), None);
}
