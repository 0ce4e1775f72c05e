#![deny(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

#[macro_use]
extern crate log;

use serde_json::json;

use ancestry_core::{
    demography::Demography,
    provenance::ProvenanceRow,
    rng::{wyhash::WyHash, SeedableRng},
    samples::Samples,
    tables::{PopulationId, TableError},
    TreeSequence,
};
use ancestry_core_bond::{NonNegativeF64, PositiveF64};

mod arguments;
mod lineage;
mod overlap;
mod simulation;

pub use arguments::AncestryArguments;

use simulation::Simulation;


#[derive(Debug, thiserror::Error)]
pub enum HudsonError {
    #[error("the sequence length {0} is not a whole number of base pairs")]
    NonIntegerSequenceLength(PositiveF64),
    #[error("at least two sample nodes are required, but {0} were requested")]
    TooFewSamples(u64),
    #[error("the sampled population {0} is not part of the demography")]
    UnknownPopulation(PopulationId),
    #[error("{lineages} lineages remain at time {time} but no further event can happen")]
    NoFurtherEvents {
        time: NonNegativeF64,
        lineages: usize,
    },
    #[error(transparent)]
    Table(#[from] TableError),
}

/// Simulates the ancestry of the `samples` under Hudson's coalescent with
/// recombination on a discrete genome.
///
/// # Errors
///
/// Returns `HudsonError` if the sequence length is not a whole number, if
/// fewer than two sample nodes are requested, if lineages remain that can
/// never coalesce, or if the output tables cannot be built.
pub fn simulate_ancestry(
    demography: &Demography,
    samples: &Samples,
    arguments: &AncestryArguments,
) -> Result<TreeSequence, HudsonError> {
    info!(
        "Simulating the ancestry of {} sample nodes over {} base pairs with seed {} ...",
        samples.num_nodes(),
        arguments.sequence_length,
        arguments.seed,
    );

    let rng = WyHash::seed_from_u64(arguments.seed);

    let mut tables = Simulation::new(demography, samples, arguments, rng)?.run()?;

    tables.sort();
    tables.squash_edges();

    let sampled: serde_json::Map<String, serde_json::Value> = samples
        .sets()
        .iter()
        .filter_map(|set| {
            demography
                .population(set.population)
                .map(|population| (population.name.clone(), json!(set.num_individuals)))
        })
        .collect();

    tables.add_provenance(ProvenanceRow::new(
        env!("CARGO_PKG_NAME"),
        env!("CARGO_PKG_VERSION"),
        "sim_ancestry",
        json!({
            "samples": sampled,
            "ploidy": samples.ploidy(),
            "demography": demography,
            "model": "hudson",
            "discrete_genome": true,
            "sequence_length": arguments.sequence_length,
            "recombination_rate": arguments.recombination_rate,
            "random_seed": arguments.seed,
        }),
    ));

    debug!(
        "The simulated tables contain {} nodes and {} edges.",
        tables.nodes().len(),
        tables.edges().len(),
    );

    TreeSequence::new(tables).map_err(HudsonError::from)
}
