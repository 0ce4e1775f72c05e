use crate::intervals::GenomicIntervals;

use super::{EdgeRow, MutationId, SiteId, TableError, TreeTables};

impl TreeTables {
    /// Restricts the tables to the genomic `intervals` and simplifies the
    /// result with respect to all samples.
    ///
    /// Edges are clipped to the intervals, and sites outside of the
    /// intervals are removed together with their mutations.
    ///
    /// # Errors
    ///
    /// Returns a `TableError` if the tables are not a valid tree sequence.
    pub fn keep_intervals(&self, intervals: &GenomicIntervals) -> Result<TreeTables, TableError> {
        let mut clipped = TreeTables::new(self.sequence_length);

        clipped.populations = self.populations.clone();
        clipped.individuals = self.individuals.clone();
        clipped.nodes = self.nodes.clone();
        clipped.provenances = self.provenances.clone();

        // Clipping preserves the edge ordering
        clipped.edges = self
            .edges
            .iter()
            .flat_map(|edge| {
                intervals
                    .clip(edge.left, edge.right)
                    .map(move |interval| EdgeRow {
                        left: interval.left,
                        right: interval.right,
                        parent: edge.parent,
                        child: edge.child,
                    })
            })
            .collect();

        let mut site_map: Vec<Option<SiteId>> = vec![None; self.sites.len()];
        for (index, site) in self.sites.iter().enumerate() {
            if intervals.contains(site.position) {
                site_map[index] = Some(clipped.add_site(site.position, site.ancestral_state.clone())?);
            }
        }

        let mut mutation_map: Vec<Option<MutationId>> = vec![None; self.mutations.len()];
        for (index, mutation) in self.mutations.iter().enumerate() {
            if let Some(site) = site_map[mutation.site.index()] {
                mutation_map[index] = Some(clipped.add_mutation(
                    site,
                    mutation.node,
                    mutation.parent.and_then(|parent| mutation_map[parent.index()]),
                    mutation.time,
                    mutation.derived_state.clone(),
                )?);
            }
        }

        debug!(
            "Clipped {} edges into {} edges and kept {} of {} sites in {}.",
            self.edges.len(),
            clipped.edges.len(),
            clipped.sites.len(),
            self.sites.len(),
            intervals,
        );

        let samples = clipped.samples();
        let (simplified, _node_map) = clipped.simplify(&samples)?;

        Ok(simplified)
    }
}
