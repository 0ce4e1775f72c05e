use serde::{Deserialize, Serialize};

use ancestry_core_bond::{NonNegativeF64, PositiveF64};

use crate::provenance::ProvenanceRow;

mod check;
mod id;
mod intervals;
mod simplify;
mod sort;
mod tree;

pub use id::{EdgeId, IndividualId, MutationId, NodeId, PopulationId, SiteId};

#[cfg(test)]
mod tests;

#[derive(Debug, thiserror::Error)]
pub enum TableError {
    #[error("the {0} table has overflowed its u32 index space")]
    TableOverflow(&'static str),
    #[error("{table} row {row} references the missing {target} {id}")]
    DanglingReference {
        table: &'static str,
        row: usize,
        target: &'static str,
        id: u32,
    },
    #[error("edge {row} has an empty or out-of-bounds interval [{left}, {right})")]
    BadEdgeInterval {
        row: usize,
        left: NonNegativeF64,
        right: NonNegativeF64,
    },
    #[error("edge {row} has a parent that is not older than its child")]
    BadNodeTimeOrdering { row: usize },
    #[error("edges are not sorted by parent time, parent, child and left at row {row}")]
    UnsortedEdges { row: usize },
    #[error("edge {row} overlaps an earlier edge with the same parent and child")]
    OverlappingEdges { row: usize },
    #[error("site {row} lies outside of the sequence or is not sorted by position")]
    BadSitePosition { row: usize },
    #[error("mutation {row} is not sorted by site and decreasing time")]
    UnsortedMutations { row: usize },
    #[error("mutation {row} has an invalid parent mutation")]
    BadMutationParent { row: usize },
    #[error("mutation {row} has a time outside of its branch")]
    BadMutationTime { row: usize },
    #[error("node {0} is listed more than once as a sample")]
    DuplicateSample(NodeId),
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeFlags(u32);

impl NodeFlags {
    pub const IS_SAMPLE: Self = Self(1_u32);

    #[must_use]
    pub const fn empty() -> Self {
        Self(0_u32)
    }

    #[must_use]
    pub const fn bits(self) -> u32 {
        self.0
    }

    #[must_use]
    pub const fn is_sample(self) -> bool {
        (self.0 & Self::IS_SAMPLE.0) != 0
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PopulationRow {
    pub name: String,
    pub description: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndividualRow {
    pub flags: u32,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeRow {
    pub flags: NodeFlags,
    pub time: NonNegativeF64,
    pub population: Option<PopulationId>,
    pub individual: Option<IndividualId>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EdgeRow {
    pub left: NonNegativeF64,
    pub right: NonNegativeF64,
    pub parent: NodeId,
    pub child: NodeId,
}

impl EdgeRow {
    #[must_use]
    pub fn span(&self) -> f64 {
        self.right.get() - self.left.get()
    }

    #[must_use]
    pub fn covers(&self, position: NonNegativeF64) -> bool {
        self.left <= position && position < self.right
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SiteRow {
    pub position: NonNegativeF64,
    pub ancestral_state: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MutationRow {
    pub site: SiteId,
    pub node: NodeId,
    pub parent: Option<MutationId>,
    pub time: NonNegativeF64,
    pub derived_state: String,
}

/// The tables of a tree sequence, following tskit's data model.
///
/// Rows can only be appended, the remaining edits ([`TreeTables::sort`],
/// [`TreeTables::squash_edges`], [`TreeTables::compute_mutation_parents`])
/// keep all cross-table references intact.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TreeTables {
    sequence_length: PositiveF64,

    populations: Vec<PopulationRow>,
    individuals: Vec<IndividualRow>,
    nodes: Vec<NodeRow>,
    edges: Vec<EdgeRow>,
    sites: Vec<SiteRow>,
    mutations: Vec<MutationRow>,
    provenances: Vec<ProvenanceRow>,
}

impl TreeTables {
    #[must_use]
    pub fn new(sequence_length: PositiveF64) -> Self {
        Self {
            sequence_length,
            populations: Vec::new(),
            individuals: Vec::new(),
            nodes: Vec::new(),
            edges: Vec::new(),
            sites: Vec::new(),
            mutations: Vec::new(),
            provenances: Vec::new(),
        }
    }

    #[must_use]
    pub fn sequence_length(&self) -> PositiveF64 {
        self.sequence_length
    }

    #[must_use]
    pub fn populations(&self) -> &[PopulationRow] {
        &self.populations
    }

    #[must_use]
    pub fn individuals(&self) -> &[IndividualRow] {
        &self.individuals
    }

    #[must_use]
    pub fn nodes(&self) -> &[NodeRow] {
        &self.nodes
    }

    #[must_use]
    pub fn edges(&self) -> &[EdgeRow] {
        &self.edges
    }

    #[must_use]
    pub fn sites(&self) -> &[SiteRow] {
        &self.sites
    }

    #[must_use]
    pub fn mutations(&self) -> &[MutationRow] {
        &self.mutations
    }

    #[must_use]
    pub fn provenances(&self) -> &[ProvenanceRow] {
        &self.provenances
    }

    #[must_use]
    pub fn node(&self, node: NodeId) -> &NodeRow {
        &self.nodes[node.index()]
    }

    /// # Errors
    ///
    /// Returns `TableError::TableOverflow` if the table is full.
    pub fn add_population(
        &mut self,
        name: impl Into<String>,
        description: impl Into<String>,
    ) -> Result<PopulationId, TableError> {
        let id = PopulationId::from_index(self.populations.len())?;

        self.populations.push(PopulationRow {
            name: name.into(),
            description: description.into(),
        });

        Ok(id)
    }

    /// # Errors
    ///
    /// Returns `TableError::TableOverflow` if the table is full.
    pub fn add_individual(&mut self, flags: u32) -> Result<IndividualId, TableError> {
        let id = IndividualId::from_index(self.individuals.len())?;

        self.individuals.push(IndividualRow { flags });

        Ok(id)
    }

    /// # Errors
    ///
    /// Returns `TableError::TableOverflow` if the table is full.
    pub fn add_node(
        &mut self,
        flags: NodeFlags,
        time: NonNegativeF64,
        population: Option<PopulationId>,
        individual: Option<IndividualId>,
    ) -> Result<NodeId, TableError> {
        let id = NodeId::from_index(self.nodes.len())?;

        self.nodes.push(NodeRow {
            flags,
            time,
            population,
            individual,
        });

        Ok(id)
    }

    /// # Errors
    ///
    /// Returns `TableError::TableOverflow` if the table is full.
    pub fn add_edge(
        &mut self,
        left: NonNegativeF64,
        right: NonNegativeF64,
        parent: NodeId,
        child: NodeId,
    ) -> Result<EdgeId, TableError> {
        let id = EdgeId::from_index(self.edges.len())?;

        self.edges.push(EdgeRow {
            left,
            right,
            parent,
            child,
        });

        Ok(id)
    }

    /// # Errors
    ///
    /// Returns `TableError::TableOverflow` if the table is full.
    pub fn add_site(
        &mut self,
        position: NonNegativeF64,
        ancestral_state: impl Into<String>,
    ) -> Result<SiteId, TableError> {
        let id = SiteId::from_index(self.sites.len())?;

        self.sites.push(SiteRow {
            position,
            ancestral_state: ancestral_state.into(),
        });

        Ok(id)
    }

    /// # Errors
    ///
    /// Returns `TableError::TableOverflow` if the table is full.
    pub fn add_mutation(
        &mut self,
        site: SiteId,
        node: NodeId,
        parent: Option<MutationId>,
        time: NonNegativeF64,
        derived_state: impl Into<String>,
    ) -> Result<MutationId, TableError> {
        let id = MutationId::from_index(self.mutations.len())?;

        self.mutations.push(MutationRow {
            site,
            node,
            parent,
            time,
            derived_state: derived_state.into(),
        });

        Ok(id)
    }

    pub fn add_provenance(&mut self, provenance: ProvenanceRow) {
        self.provenances.push(provenance);
    }

    pub fn set_derived_state(&mut self, mutation: MutationId, derived_state: impl Into<String>) {
        self.mutations[mutation.index()].derived_state = derived_state.into();
    }

    /// Returns all sample nodes in increasing id order
    #[must_use]
    pub fn samples(&self) -> Vec<NodeId> {
        self.nodes
            .iter()
            .enumerate()
            .filter(|(_, node)| node.flags.is_sample())
            .filter_map(|(index, _)| NodeId::from_index(index).ok())
            .collect()
    }

    /// Looks up the site at exactly `position` in position-sorted tables
    #[must_use]
    pub fn site_at(&self, position: NonNegativeF64) -> Option<SiteId> {
        self.sites
            .binary_search_by(|site| site.position.cmp(&position))
            .ok()
            .and_then(|index| SiteId::from_index(index).ok())
    }
}
