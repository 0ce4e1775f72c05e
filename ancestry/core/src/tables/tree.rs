use ancestry_core_bond::NonNegativeF64;

use super::{MutationId, NodeId, SiteId, TreeTables};

impl TreeTables {
    /// Returns the parent of `node` in the local tree at `position`
    #[must_use]
    pub fn parent_at(&self, node: NodeId, position: NonNegativeF64) -> Option<NodeId> {
        self.edges
            .iter()
            .find(|edge| edge.child == node && edge.covers(position))
            .map(|edge| edge.parent)
    }

    /// Returns the parent array of the local tree at `position`
    #[must_use]
    pub fn parents_at(&self, position: NonNegativeF64) -> Vec<Option<NodeId>> {
        let mut parents = vec![None; self.nodes.len()];

        for edge in self.edges.iter().filter(|edge| edge.covers(position)) {
            parents[edge.child.index()] = Some(edge.parent);
        }

        parents
    }

    /// Returns the time of the most recent common ancestor of `a` and `b` in
    /// the local tree at `position`, or `None` if they are not connected or
    /// not in the node table.
    #[must_use]
    pub fn tmrca(&self, a: NodeId, b: NodeId, position: NonNegativeF64) -> Option<NonNegativeF64> {
        if a.index() >= self.nodes.len() || b.index() >= self.nodes.len() {
            return None;
        }

        let parents = self.parents_at(position);

        let mut ancestors_of_a = vec![a];
        let mut node = a;
        while let Some(parent) = parents[node.index()] {
            ancestors_of_a.push(parent);
            node = parent;
        }

        let mut node = b;
        loop {
            if ancestors_of_a.contains(&node) {
                return Some(self.node(node).time);
            }

            node = parents[node.index()]?;
        }
    }

    /// Returns the state that `node` inherits at `site`, or `None` if either
    /// is not in its table
    #[must_use]
    pub fn node_state(&self, node: NodeId, site: SiteId) -> Option<&str> {
        let site_row = self.sites.get(site.index())?;

        if node.index() >= self.nodes.len() {
            return None;
        }

        let parents = self.parents_at(site_row.position);

        let mut current = Some(node);

        while let Some(node) = current {
            // Mutations at the same site are sorted from oldest to youngest
            if let Some(mutation) = self
                .mutations
                .iter()
                .rev()
                .find(|mutation| mutation.site == site && mutation.node == node)
            {
                return Some(&mutation.derived_state);
            }

            current = parents[node.index()];
        }

        Some(&site_row.ancestral_state)
    }

    /// Recomputes the parent of every mutation from the local trees.
    ///
    /// The tables must already be sorted.
    pub fn compute_mutation_parents(&mut self) {
        let mut start = 0;

        while start < self.mutations.len() {
            let site = self.mutations[start].site;
            let end = start
                + self.mutations[start..]
                    .iter()
                    .take_while(|mutation| mutation.site == site)
                    .count();

            let parents = self.parents_at(self.sites[site.index()].position);

            for row in start..end {
                let mut parent = None;
                let mut current = Some(self.mutations[row].node);

                while let (Some(node), None) = (current, parent) {
                    // The youngest older mutation on the closest ancestral node
                    parent = (start..row)
                        .rev()
                        .find(|older| self.mutations[*older].node == node);

                    current = parents[node.index()];
                }

                #[allow(clippy::cast_possible_truncation)]
                {
                    self.mutations[row].parent = parent.map(|older| MutationId::new(older as u32));
                }
            }

            start = end;
        }
    }
}
