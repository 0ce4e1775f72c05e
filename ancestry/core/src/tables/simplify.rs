use std::collections::BTreeMap;

use ancestry_core_bond::NonNegativeF64;

use super::{
    IndividualId, MutationId, NodeFlags, NodeId, PopulationId, SiteId, TableError, TreeTables,
};

impl TreeTables {
    /// Simplifies the tables with respect to `samples`, i.e. reduces them to
    /// the minimal tables that describe the genealogies of the samples.
    ///
    /// The samples become the first output nodes (in the given order),
    /// nodes that are not coalescent ancestors of the samples are removed,
    /// and sites, populations and individuals that are no longer referenced
    /// are filtered out. Mutations are moved onto the retained nodes that
    /// inherit them.
    ///
    /// Returns the simplified tables and the map from input to output nodes.
    ///
    /// # Errors
    ///
    /// Returns a `TableError` if the input tables do not form a valid tree
    /// sequence, or if a sample is missing or listed twice.
    pub fn simplify(
        &self,
        samples: &[NodeId],
    ) -> Result<(TreeTables, Vec<Option<NodeId>>), TableError> {
        self.check_integrity()?;

        let mut simplifier = Simplifier::new(self, samples)?;

        let mut start = 0;

        while start < self.edges.len() {
            let parent = self.edges[start].parent;
            let end = start
                + self.edges[start..]
                    .iter()
                    .take_while(|edge| edge.parent == parent)
                    .count();

            simplifier.process_parent_edges(parent, start, end)?;

            start = end;
        }

        simplifier.finalise()
    }
}

#[derive(Copy, Clone, Debug)]
struct Segment {
    left: NonNegativeF64,
    right: NonNegativeF64,
    node: NodeId,
}

#[derive(Debug)]
struct Overlap {
    left: NonNegativeF64,
    right: NonNegativeF64,
    nodes: Vec<NodeId>,
}

struct Simplifier<'t> {
    input: &'t TreeTables,
    output: TreeTables,

    node_map: Vec<Option<NodeId>>,
    ancestry: Vec<Vec<Segment>>,
    edge_buffer: BTreeMap<NodeId, Vec<(NonNegativeF64, NonNegativeF64)>>,
}

impl<'t> Simplifier<'t> {
    fn new(input: &'t TreeTables, samples: &[NodeId]) -> Result<Self, TableError> {
        let mut simplifier = Self {
            input,
            output: TreeTables::new(input.sequence_length),
            node_map: vec![None; input.nodes.len()],
            ancestry: vec![Vec::new(); input.nodes.len()],
            edge_buffer: BTreeMap::new(),
        };

        for (row, sample) in samples.iter().enumerate() {
            match simplifier.node_map.get(sample.index()) {
                None => {
                    return Err(TableError::DanglingReference {
                        table: "sample",
                        row,
                        target: "node",
                        id: sample.get(),
                    })
                },
                Some(Some(_)) => return Err(TableError::DuplicateSample(*sample)),
                Some(None) => (),
            }

            let output = simplifier.record_node(*sample, true)?;

            simplifier.node_map[sample.index()] = Some(output);
            simplifier.ancestry[sample.index()] = vec![Segment {
                left: NonNegativeF64::zero(),
                right: input.sequence_length.into(),
                node: output,
            }];
        }

        Ok(simplifier)
    }

    fn record_node(&mut self, input: NodeId, is_sample: bool) -> Result<NodeId, TableError> {
        let node = self.input.node(input);

        let flags = if is_sample {
            NodeFlags(node.flags.bits() | NodeFlags::IS_SAMPLE.bits())
        } else {
            NodeFlags(node.flags.bits() & !NodeFlags::IS_SAMPLE.bits())
        };

        self.output
            .add_node(flags, node.time, node.population, node.individual)
    }

    fn record_edge(&mut self, left: NonNegativeF64, right: NonNegativeF64, child: NodeId) {
        let intervals = self.edge_buffer.entry(child).or_default();

        match intervals.last_mut() {
            Some((_, last_right)) if *last_right == left => *last_right = right,
            _ => intervals.push((left, right)),
        }
    }

    fn flush_edges(&mut self, parent: NodeId) -> Result<(), TableError> {
        for (child, intervals) in std::mem::take(&mut self.edge_buffer) {
            for (left, right) in intervals {
                self.output.add_edge(left, right, parent, child)?;
            }
        }

        Ok(())
    }

    fn process_parent_edges(
        &mut self,
        parent: NodeId,
        start: usize,
        end: usize,
    ) -> Result<(), TableError> {
        let mut segments = Vec::new();

        for edge in &self.input.edges[start..end] {
            for segment in &self.ancestry[edge.child.index()] {
                if segment.right > edge.left && edge.right > segment.left {
                    segments.push(Segment {
                        left: segment.left.max(edge.left),
                        right: segment.right.min(edge.right),
                        node: segment.node,
                    });
                }
            }
        }

        self.merge_ancestors(parent, segments)
    }

    fn merge_ancestors(
        &mut self,
        parent: NodeId,
        segments: Vec<Segment>,
    ) -> Result<(), TableError> {
        let sequence_length = NonNegativeF64::from(self.input.sequence_length);

        let mut output = self.node_map[parent.index()];
        let is_sample = output.is_some();

        let mut ancestry = Vec::new();
        let mut previous_right = NonNegativeF64::zero();

        for overlap in overlapping_segments(segments) {
            let ancestry_node = match (overlap.nodes.as_slice(), output) {
                // Non-sample nodes are skipped over wherever they are unary
                ([child], _) if !is_sample => *child,
                (children, _) => {
                    let node = match output {
                        Some(node) => node,
                        None => {
                            let node = self.record_node(parent, false)?;
                            self.node_map[parent.index()] = Some(node);
                            output = Some(node);
                            node
                        },
                    };

                    for child in children {
                        self.record_edge(overlap.left, overlap.right, *child);
                    }

                    node
                },
            };

            if let (true, Some(node)) = (is_sample, output) {
                if overlap.left != previous_right {
                    add_ancestry(&mut ancestry, previous_right, overlap.left, node);
                }
            }

            add_ancestry(&mut ancestry, overlap.left, overlap.right, ancestry_node);
            previous_right = overlap.right;
        }

        if let (true, Some(node)) = (is_sample, output) {
            if previous_right != sequence_length {
                add_ancestry(&mut ancestry, previous_right, sequence_length, node);
            }
        }

        if let Some(node) = output {
            self.flush_edges(node)?;
        }

        self.ancestry[parent.index()] = ancestry;

        Ok(())
    }

    fn map_mutations(&mut self) -> Result<(), TableError> {
        let mut site_map: Vec<Option<SiteId>> = vec![None; self.input.sites.len()];
        let mut mutation_map: Vec<Option<MutationId>> = vec![None; self.input.mutations.len()];

        for (index, mutation) in self.input.mutations.iter().enumerate() {
            let site = &self.input.sites[mutation.site.index()];

            // Mutations above nodes without sample ancestry are dropped
            let node = match self.ancestry[mutation.node.index()]
                .iter()
                .find(|segment| segment.left <= site.position && site.position < segment.right)
            {
                Some(segment) => segment.node,
                None => continue,
            };

            let output_site = match site_map[mutation.site.index()] {
                Some(output_site) => output_site,
                None => {
                    let output_site = self
                        .output
                        .add_site(site.position, site.ancestral_state.clone())?;
                    site_map[mutation.site.index()] = Some(output_site);
                    output_site
                },
            };

            let mut parent = mutation.parent;
            while let Some(ancestor) = parent {
                if mutation_map[ancestor.index()].is_some() {
                    break;
                }

                parent = self.input.mutations[ancestor.index()].parent;
            }

            mutation_map[index] = Some(self.output.add_mutation(
                output_site,
                node,
                parent.and_then(|parent| mutation_map[parent.index()]),
                mutation.time,
                mutation.derived_state.clone(),
            )?);
        }

        Ok(())
    }

    fn filter_populations(&mut self) -> Result<(), TableError> {
        let mut referenced = vec![false; self.input.populations.len()];
        for population in self.output.nodes.iter().filter_map(|node| node.population) {
            referenced[population.index()] = true;
        }

        let mut population_map: Vec<Option<PopulationId>> = vec![None; referenced.len()];
        for (index, population) in self.input.populations.iter().enumerate() {
            if referenced[index] {
                population_map[index] =
                    Some(PopulationId::from_index(self.output.populations.len())?);
                self.output.populations.push(population.clone());
            }
        }

        for node in &mut self.output.nodes {
            node.population = node
                .population
                .and_then(|population| population_map[population.index()]);
        }

        Ok(())
    }

    fn filter_individuals(&mut self) -> Result<(), TableError> {
        let mut referenced = vec![false; self.input.individuals.len()];
        for individual in self.output.nodes.iter().filter_map(|node| node.individual) {
            referenced[individual.index()] = true;
        }

        let mut individual_map: Vec<Option<IndividualId>> = vec![None; referenced.len()];
        for (index, individual) in self.input.individuals.iter().enumerate() {
            if referenced[index] {
                individual_map[index] =
                    Some(IndividualId::from_index(self.output.individuals.len())?);
                self.output.individuals.push(individual.clone());
            }
        }

        for node in &mut self.output.nodes {
            node.individual = node
                .individual
                .and_then(|individual| individual_map[individual.index()]);
        }

        Ok(())
    }

    fn finalise(mut self) -> Result<(TreeTables, Vec<Option<NodeId>>), TableError> {
        self.map_mutations()?;
        self.filter_populations()?;
        self.filter_individuals()?;

        self.output
            .provenances
            .extend(self.input.provenances.iter().cloned());

        // Sample parents can precede older non-sample parents in the node ids
        self.output.sort();

        debug!(
            "Simplified {} nodes and {} edges into {} nodes and {} edges.",
            self.input.nodes.len(),
            self.input.edges.len(),
            self.output.nodes.len(),
            self.output.edges.len(),
        );

        Ok((self.output, self.node_map))
    }
}

fn add_ancestry(
    ancestry: &mut Vec<Segment>,
    left: NonNegativeF64,
    right: NonNegativeF64,
    node: NodeId,
) {
    match ancestry.last_mut() {
        Some(last) if last.right == left && last.node == node => last.right = right,
        _ => ancestry.push(Segment { left, right, node }),
    }
}

/// Sweeps over the segments from left to right and returns the maximal
/// intervals over which the same set of segments overlaps.
fn overlapping_segments(mut segments: Vec<Segment>) -> Vec<Overlap> {
    segments.sort_by_key(|segment| segment.left);

    let mut overlaps = Vec::new();
    let mut active: Vec<Segment> = Vec::new();

    let mut next = 0;
    let mut right = NonNegativeF64::zero();

    loop {
        let mut left = right;

        active.retain(|segment| segment.right > left);

        if active.is_empty() {
            match segments.get(next) {
                Some(segment) => left = segment.left,
                None => break,
            }
        }

        while let Some(segment) = segments.get(next).filter(|segment| segment.left == left) {
            active.push(*segment);
            next += 1;
        }

        right = active.iter().map(|segment| segment.right).fold(
            segments
                .get(next)
                .map_or_else(NonNegativeF64::infinity, |segment| segment.left),
            Ord::min,
        );

        overlaps.push(Overlap {
            left,
            right,
            nodes: active.iter().map(|segment| segment.node).collect(),
        });
    }

    overlaps
}
