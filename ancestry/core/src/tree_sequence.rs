use serde_json::json;

use ancestry_core_bond::{NonNegativeF64, PositiveF64};

use crate::{
    intervals::GenomicIntervals,
    provenance::ProvenanceRow,
    tables::{NodeId, SiteId, TableError, TreeTables},
};

/// An immutable tree sequence, i.e. a set of [`TreeTables`] that has passed
/// the integrity check.
#[derive(Clone, Debug, PartialEq)]
pub struct TreeSequence {
    tables: TreeTables,
}

impl TreeSequence {
    /// # Errors
    ///
    /// Returns a `TableError` if the `tables` fail the integrity check.
    pub fn new(tables: TreeTables) -> Result<Self, TableError> {
        tables.check_integrity()?;

        Ok(Self { tables })
    }

    #[must_use]
    pub fn tables(&self) -> &TreeTables {
        &self.tables
    }

    #[must_use]
    pub fn into_tables(self) -> TreeTables {
        self.tables
    }

    #[must_use]
    pub fn sequence_length(&self) -> PositiveF64 {
        self.tables.sequence_length()
    }

    #[must_use]
    pub fn samples(&self) -> Vec<NodeId> {
        self.tables.samples()
    }

    #[must_use]
    pub fn tmrca(&self, a: NodeId, b: NodeId, position: NonNegativeF64) -> Option<NonNegativeF64> {
        self.tables.tmrca(a, b, position)
    }

    /// Returns the states of all samples at `site`, or `None` if there is no
    /// such site
    #[must_use]
    pub fn genotypes(&self, site: SiteId) -> Option<Vec<&str>> {
        self.tables.sites().get(site.index())?;

        self.samples()
            .into_iter()
            .map(|sample| self.tables.node_state(sample, site))
            .collect()
    }

    /// Returns a new tree sequence that only retains the genealogies and
    /// mutations within the `intervals`.
    ///
    /// # Errors
    ///
    /// Returns a `TableError` if the restricted tables cannot be built.
    pub fn keep_intervals(
        &self,
        intervals: &GenomicIntervals,
        record_provenance: bool,
    ) -> Result<Self, TableError> {
        let mut tables = self.tables.keep_intervals(intervals)?;

        if record_provenance {
            tables.add_provenance(ProvenanceRow::new(
                env!("CARGO_PKG_NAME"),
                env!("CARGO_PKG_VERSION"),
                "keep_intervals",
                json!({
                    "intervals": intervals,
                    "simplify": true,
                }),
            ));
        }

        info!(
            "Kept the intervals {} of a sequence of length {}.",
            intervals,
            self.sequence_length(),
        );

        Self::new(tables)
    }
}
