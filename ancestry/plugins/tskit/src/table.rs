use tskit::{TableCollection, TableSortOptions};

use ancestry_core::tables::TreeTables;

use crate::{metadata::PopulationJsonMetadata, provenance::TskitProvenance, TskitWriterError};

/// Converts a tskit id from its `u32` row index
fn tskit_id<I: From<tskit::tsk_id_t>>(table: &'static str, id: u32) -> Result<I, TskitWriterError> {
    tskit::tsk_id_t::try_from(id)
        .map(I::from)
        .map_err(|_| TskitWriterError::IdOverflow { table, id })
}

/// Copies all rows of the `tables` into a sorted tskit `TableCollection`
pub(crate) fn table_collection(tables: &TreeTables) -> Result<TableCollection, TskitWriterError> {
    let mut collection = TableCollection::new(tables.sequence_length().get())?;

    for population in tables.populations() {
        collection.add_population_with_metadata(&PopulationJsonMetadata::from(population))?;
    }

    for individual in tables.individuals() {
        collection.add_individual(individual.flags, None, None)?;
    }

    for node in tables.nodes() {
        let flags = if node.flags.is_sample() {
            tskit::NodeFlags::new_sample()
        } else {
            tskit::NodeFlags::default()
        };

        let population = match node.population {
            Some(population) => tskit_id("population", population.get())?,
            None => tskit::PopulationId::NULL,
        };
        let individual = match node.individual {
            Some(individual) => tskit_id("individual", individual.get())?,
            None => tskit::IndividualId::NULL,
        };

        collection.add_node(flags, node.time.get(), population, individual)?;
    }

    for edge in tables.edges() {
        collection.add_edge(
            edge.left.get(),
            edge.right.get(),
            tskit_id::<tskit::NodeId>("node", edge.parent.get())?,
            tskit_id::<tskit::NodeId>("node", edge.child.get())?,
        )?;
    }

    for site in tables.sites() {
        collection.add_site(site.position.get(), Some(site.ancestral_state.as_bytes()))?;
    }

    for mutation in tables.mutations() {
        let parent = match mutation.parent {
            Some(parent) => tskit_id("mutation", parent.get())?,
            None => tskit::MutationId::NULL,
        };

        collection.add_mutation(
            tskit_id::<tskit::SiteId>("site", mutation.site.get())?,
            tskit_id::<tskit::NodeId>("node", mutation.node.get())?,
            parent,
            mutation.time.get(),
            Some(mutation.derived_state.as_bytes()),
        )?;
    }

    for provenance in tables.provenances() {
        let record = serde_json::to_string(&TskitProvenance::try_new(provenance)?)?;

        collection.add_provenance(&record)?;
    }

    collection.full_sort(TableSortOptions::default())?;

    Ok(collection)
}
