use ancestry_core::{
    provenance::ProvenanceRow,
    tables::{NodeFlags, TreeTables},
    TreeSequence,
};
use ancestry_core_bond::{NonNegativeF64, PositiveF64};
use tskit::metadata::MetadataRoundtrip;

use crate::{dump_tree_sequence, load_tree_sequence, PopulationJsonMetadata, TskitProvenance};

fn pos(value: f64) -> NonNegativeF64 {
    NonNegativeF64::new(value).unwrap()
}

fn small_tree_sequence() -> TreeSequence {
    let mut tables = TreeTables::new(PositiveF64::new(50.0).unwrap());

    let population = tables.add_population("A", "sampled").unwrap();
    let individual = tables.add_individual(0).unwrap();

    let a = tables
        .add_node(
            NodeFlags::IS_SAMPLE,
            pos(0.0),
            Some(population),
            Some(individual),
        )
        .unwrap();
    let b = tables
        .add_node(
            NodeFlags::IS_SAMPLE,
            pos(0.0),
            Some(population),
            Some(individual),
        )
        .unwrap();
    let root = tables
        .add_node(NodeFlags::empty(), pos(10.0), Some(population), None)
        .unwrap();

    tables.add_edge(pos(0.0), pos(50.0), root, a).unwrap();
    tables.add_edge(pos(0.0), pos(50.0), root, b).unwrap();

    let site = tables.add_site(pos(7.0), "G").unwrap();
    tables.add_mutation(site, b, None, pos(3.0), "C").unwrap();

    tables.add_provenance(ProvenanceRow::new(
        "ancestry-tests",
        "0.1.0",
        "sim_ancestry",
        serde_json::json!({ "random_seed": 12 }),
    ));

    TreeSequence::new(tables).unwrap()
}

#[test]
fn population_metadata_is_json() {
    let metadata = PopulationJsonMetadata {
        name: String::from("A"),
        description: String::new(),
    };

    let encoded = metadata.encode().unwrap();
    assert_eq!(encoded, br#"{"name":"A","description":""}"#.to_vec());

    assert_eq!(PopulationJsonMetadata::decode(&encoded).unwrap(), metadata);
    assert!(PopulationJsonMetadata::decode(b"not json").is_err());
}

#[test]
fn provenance_follows_the_tskit_schema() {
    let row = ProvenanceRow::new(
        "ancestry-algorithms-mutations",
        "0.1.0",
        "sim_mutations",
        serde_json::json!({ "rate": 0.0001, "random_seed": 12 }),
    );

    let provenance = serde_json::to_value(TskitProvenance::try_new(&row).unwrap()).unwrap();

    assert_eq!(provenance["schema_version"], "1.0.0");
    assert_eq!(
        provenance["software"]["name"],
        "ancestry-algorithms-mutations"
    );
    assert_eq!(provenance["parameters"]["command"], "sim_mutations");
    assert_eq!(provenance["parameters"]["random_seed"], 12);
    assert!(provenance["environment"]["os"]["system"].is_string());
    assert!(provenance["environment"]["rustc"]["version"].is_string());
}

#[test]
fn written_files_can_be_loaded() {
    let directory = tempfile::tempdir().unwrap();
    let path = directory.path().join("nested").join("small.trees");

    let tree_sequence = small_tree_sequence();

    dump_tree_sequence(&tree_sequence, &path).unwrap();
    assert!(path.is_file());

    // Existing files are replaced
    dump_tree_sequence(&tree_sequence, &path).unwrap();

    let loaded = load_tree_sequence(&path).unwrap();
    assert_eq!(loaded.sample_nodes().len(), 2);
}

#[test]
fn loading_a_missing_file_fails() {
    let directory = tempfile::tempdir().unwrap();

    assert!(load_tree_sequence(&directory.path().join("missing.trees")).is_err());
}
