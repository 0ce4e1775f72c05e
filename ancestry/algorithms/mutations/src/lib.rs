#![deny(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

#[macro_use]
extern crate log;

use std::collections::hash_map::Entry;

use core::num::NonZeroU64;

use fnv::{FnvHashMap, FnvHashSet};
use serde_json::json;

use ancestry_core::{
    provenance::ProvenanceRow,
    rng::{wyhash::WyHash, RngCore, RngSampler, SeedableRng},
    tables::{MutationId, NodeId, SiteId, TableError, TreeTables},
    TreeSequence,
};
use ancestry_core_bond::{ClosedOpenUnitF64, NonNegativeF64};

mod arguments;
mod model;

pub use arguments::MutationArguments;
pub use model::{MutationModel, JC69};


#[derive(Debug, thiserror::Error)]
pub enum MutationError {
    #[error("the mutation model cannot mutate the state {0:?}")]
    UnknownState(String),
    #[error(transparent)]
    Table(#[from] TableError),
}

/// A mutation that has been placed on the genealogy but whose derived state
/// is only assigned once all mutation parents are known
#[derive(Debug)]
struct NewMutation {
    position: u64,
    node: NodeId,
    time: NonNegativeF64,
}

/// Layers new mutations onto the genealogy of `tree_sequence` under the
/// Jukes-Cantor nucleotide model on a discrete genome.
///
/// Existing sites and mutations are kept.
///
/// # Errors
///
/// Returns `MutationError` if an existing state cannot be mutated by the
/// model or if the output tables cannot be built.
pub fn simulate_mutations(
    tree_sequence: &TreeSequence,
    arguments: &MutationArguments,
) -> Result<TreeSequence, MutationError> {
    simulate_mutations_with_model(tree_sequence, arguments, &JC69)
}

/// # Errors
///
/// Returns `MutationError` if an existing state cannot be mutated by the
/// `model` or if the output tables cannot be built.
pub fn simulate_mutations_with_model<M: MutationModel>(
    tree_sequence: &TreeSequence,
    arguments: &MutationArguments,
    model: &M,
) -> Result<TreeSequence, MutationError> {
    info!(
        "Simulating mutations at rate {} with seed {} under the {} model ...",
        arguments.rate,
        arguments.seed,
        model.name(),
    );

    let mut rng = WyHash::seed_from_u64(arguments.seed);
    let mut tables = tree_sequence.tables().clone();

    let new_mutations = place_mutations(&tables, arguments.rate, &mut rng);

    let existing_sites = tree_sequence.tables();
    let mut new_sites: FnvHashMap<u64, SiteId> = FnvHashMap::default();

    // Mutations are identified by their exact position, node and time,
    //  which survive the sorting of the tables
    let mut pending = FnvHashSet::default();

    for mutation in &new_mutations {
        let position = NonNegativeF64::from(mutation.position);

        let site = match existing_sites.site_at(position) {
            Some(site) => site,
            None => match new_sites.entry(mutation.position) {
                Entry::Occupied(entry) => *entry.get(),
                Entry::Vacant(entry) => {
                    let ancestral_state = model.ancestral_state(&mut rng);

                    *entry.insert(tables.add_site(position, ancestral_state)?)
                },
            },
        };

        tables.add_mutation(site, mutation.node, None, mutation.time, "")?;

        pending.insert((
            mutation.position,
            mutation.node,
            mutation.time.get().to_bits(),
        ));
    }

    tables.sort();
    tables.compute_mutation_parents();

    assign_derived_states(&mut tables, &pending, model, &mut rng)?;

    debug!(
        "Placed {} new mutations, the tables now contain {} sites and {} mutations.",
        new_mutations.len(),
        tables.sites().len(),
        tables.mutations().len(),
    );

    tables.add_provenance(ProvenanceRow::new(
        env!("CARGO_PKG_NAME"),
        env!("CARGO_PKG_VERSION"),
        "sim_mutations",
        json!({
            "rate": arguments.rate,
            "random_seed": arguments.seed,
            "model": model.name(),
            "discrete_genome": true,
            "keep": true,
        }),
    ));

    TreeSequence::new(tables).map_err(MutationError::from)
}

/// Draws Poisson many mutations on every edge, at uniform integer positions
/// within the edge and at uniform times along the branch
fn place_mutations<G: RngCore>(
    tables: &TreeTables,
    rate: NonNegativeF64,
    rng: &mut G,
) -> Vec<NewMutation> {
    let mut mutations = Vec::new();

    for edge in tables.edges() {
        let child_time = tables.node(edge.child).time;
        let parent_time = tables.node(edge.parent).time;
        let branch_length = parent_time.get() - child_time.get();

        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let (left, right) = (
            edge.left.get().ceil() as u64,
            edge.right.get().ceil() as u64,
        );

        let Some(num_positions) = NonZeroU64::new(right.saturating_sub(left)) else {
            continue;
        };

        #[allow(clippy::cast_precision_loss)]
        let mean = rate.get() * branch_length * (num_positions.get() as f64);

        let Ok(mean) = NonNegativeF64::new(mean) else {
            continue;
        };

        for _ in 0..rng.sample_poisson(mean) {
            let position = left + rng.sample_index_u64(num_positions);

            let time = mutation_time(child_time, parent_time, rng.sample_uniform_closed_open());

            mutations.push(NewMutation {
                position,
                node: edge.child,
                time,
            });
        }
    }

    mutations
}

/// Interpolates between the `child_time` and the strictly older
/// `parent_time`, staying strictly below the `parent_time` even where the
/// interpolation rounds up
fn mutation_time(
    child_time: NonNegativeF64,
    parent_time: NonNegativeF64,
    u01: ClosedOpenUnitF64,
) -> NonNegativeF64 {
    let time = child_time.get() + u01.get() * (parent_time.get() - child_time.get());

    if time < parent_time.get() {
        NonNegativeF64::new(time).unwrap_or(child_time)
    } else {
        // The largest float below the positive parent time
        NonNegativeF64::new(f64::from_bits(parent_time.get().to_bits().saturating_sub(1)))
            .unwrap_or(child_time)
            .max(child_time)
    }
}

/// Assigns the derived states of the new mutations from oldest to youngest,
/// such that every mutation changes the state that it inherits
fn assign_derived_states<M: MutationModel, G: RngCore>(
    tables: &mut TreeTables,
    pending: &FnvHashSet<(u64, NodeId, u64)>,
    model: &M,
    rng: &mut G,
) -> Result<(), MutationError> {
    for index in 0..tables.mutations().len() {
        let mutation = &tables.mutations()[index];
        let site = &tables.sites()[mutation.site.index()];

        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let key = (
            site.position.get() as u64,
            mutation.node,
            mutation.time.get().to_bits(),
        );

        if !pending.contains(&key) {
            continue;
        }

        let parent_state = match mutation.parent {
            Some(parent) => tables.mutations()[parent.index()].derived_state.as_str(),
            None => site.ancestral_state.as_str(),
        };

        let derived_state = model.derived_state(parent_state, rng)?;

        #[allow(clippy::cast_possible_truncation)]
        tables.set_derived_state(MutationId::new(index as u32), derived_state);
    }

    Ok(())
}
