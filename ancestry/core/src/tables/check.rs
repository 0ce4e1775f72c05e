use core::cmp::Ordering;

use ancestry_core_bond::NonNegativeF64;

use super::{sort::compare_edges, TableError, TreeTables};

impl TreeTables {
    /// Checks the referential integrity and canonical ordering of the tables,
    /// i.e. everything that is required to interpret them as a tree sequence.
    ///
    /// # Errors
    ///
    /// Returns the first `TableError` that is found.
    pub fn check_integrity(&self) -> Result<(), TableError> {
        self.check_nodes()?;
        self.check_edges()?;
        self.check_sites()?;
        self.check_mutations()
    }

    fn check_nodes(&self) -> Result<(), TableError> {
        for (row, node) in self.nodes.iter().enumerate() {
            if let Some(population) = node.population {
                if population.index() >= self.populations.len() {
                    return Err(TableError::DanglingReference {
                        table: "node",
                        row,
                        target: "population",
                        id: population.get(),
                    });
                }
            }

            if let Some(individual) = node.individual {
                if individual.index() >= self.individuals.len() {
                    return Err(TableError::DanglingReference {
                        table: "node",
                        row,
                        target: "individual",
                        id: individual.get(),
                    });
                }
            }
        }

        Ok(())
    }

    fn check_edges(&self) -> Result<(), TableError> {
        let sequence_length = NonNegativeF64::from(self.sequence_length);

        for (row, edge) in self.edges.iter().enumerate() {
            for node in [edge.parent, edge.child] {
                if node.index() >= self.nodes.len() {
                    return Err(TableError::DanglingReference {
                        table: "edge",
                        row,
                        target: "node",
                        id: node.get(),
                    });
                }
            }

            if edge.left >= edge.right || edge.right > sequence_length {
                return Err(TableError::BadEdgeInterval {
                    row,
                    left: edge.left,
                    right: edge.right,
                });
            }

            if self.node(edge.parent).time <= self.node(edge.child).time {
                return Err(TableError::BadNodeTimeOrdering { row });
            }

            if let Some(previous) = row.checked_sub(1).map(|previous| &self.edges[previous]) {
                match compare_edges(&self.nodes, previous, edge) {
                    Ordering::Greater => return Err(TableError::UnsortedEdges { row }),
                    _ if previous.parent == edge.parent
                        && previous.child == edge.child
                        && previous.right > edge.left =>
                    {
                        return Err(TableError::OverlappingEdges { row })
                    },
                    _ => (),
                }
            }
        }

        Ok(())
    }

    fn check_sites(&self) -> Result<(), TableError> {
        let sequence_length = NonNegativeF64::from(self.sequence_length);

        for (row, site) in self.sites.iter().enumerate() {
            if site.position >= sequence_length {
                return Err(TableError::BadSitePosition { row });
            }

            if let Some(previous) = row.checked_sub(1).map(|previous| &self.sites[previous]) {
                if previous.position >= site.position {
                    return Err(TableError::BadSitePosition { row });
                }
            }
        }

        Ok(())
    }

    fn check_mutations(&self) -> Result<(), TableError> {
        for (row, mutation) in self.mutations.iter().enumerate() {
            if mutation.site.index() >= self.sites.len() {
                return Err(TableError::DanglingReference {
                    table: "mutation",
                    row,
                    target: "site",
                    id: mutation.site.get(),
                });
            }

            if mutation.node.index() >= self.nodes.len() {
                return Err(TableError::DanglingReference {
                    table: "mutation",
                    row,
                    target: "node",
                    id: mutation.node.get(),
                });
            }

            if let Some(previous) = row.checked_sub(1).map(|previous| &self.mutations[previous]) {
                if previous.site > mutation.site
                    || (previous.site == mutation.site && previous.time < mutation.time)
                {
                    return Err(TableError::UnsortedMutations { row });
                }
            }

            if let Some(parent) = mutation.parent {
                // Parents must precede their children at the same site
                match self.mutations.get(parent.index()) {
                    Some(parent_mutation)
                        if parent.index() < row && parent_mutation.site == mutation.site =>
                    {
                        if parent_mutation.time < mutation.time {
                            return Err(TableError::BadMutationTime { row });
                        }
                    },
                    _ => return Err(TableError::BadMutationParent { row }),
                }
            }

            let position = self.sites[mutation.site.index()].position;

            if mutation.time < self.node(mutation.node).time {
                return Err(TableError::BadMutationTime { row });
            }

            if let Some(parent) = self.parent_at(mutation.node, position) {
                if mutation.time >= self.node(parent).time {
                    return Err(TableError::BadMutationTime { row });
                }
            }
        }

        Ok(())
    }
}
