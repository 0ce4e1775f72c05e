use core::cmp::Ordering;

use super::{EdgeRow, MutationId, NodeRow, SiteId, TreeTables};

impl TreeTables {
    /// Sorts the tables into the canonical order of a tree sequence:
    ///
    /// - edges by parent time, parent, child and left
    /// - sites by position
    /// - mutations by site and then by decreasing time
    ///
    /// All sorts are stable and site and mutation references are remapped.
    pub fn sort(&mut self) {
        let nodes = &self.nodes;

        self.edges.sort_by(|a, b| compare_edges(nodes, a, b));

        let mut site_order: Vec<usize> = (0..self.sites.len()).collect();
        site_order.sort_by_key(|index| self.sites[*index].position);

        let mut site_map = vec![SiteId::new(0); self.sites.len()];
        for (new, old) in site_order.iter().enumerate() {
            #[allow(clippy::cast_possible_truncation)]
            {
                site_map[*old] = SiteId::new(new as u32);
            }
        }

        self.sites = site_order
            .iter()
            .map(|index| self.sites[*index].clone())
            .collect();

        for mutation in &mut self.mutations {
            mutation.site = site_map[mutation.site.index()];
        }

        let mut mutation_order: Vec<usize> = (0..self.mutations.len()).collect();
        mutation_order.sort_by(|a, b| {
            let (a, b) = (&self.mutations[*a], &self.mutations[*b]);

            a.site.cmp(&b.site).then_with(|| b.time.cmp(&a.time))
        });

        let mut mutation_map = vec![MutationId::new(0); self.mutations.len()];
        for (new, old) in mutation_order.iter().enumerate() {
            #[allow(clippy::cast_possible_truncation)]
            {
                mutation_map[*old] = MutationId::new(new as u32);
            }
        }

        self.mutations = mutation_order
            .iter()
            .map(|index| {
                let mut mutation = self.mutations[*index].clone();
                mutation.parent = mutation.parent.map(|parent| mutation_map[parent.index()]);
                mutation
            })
            .collect();
    }

    /// Merges adjacent edges with the same parent and child.
    ///
    /// The edges must already be sorted.
    pub fn squash_edges(&mut self) {
        let mut squashed: Vec<EdgeRow> = Vec::with_capacity(self.edges.len());

        for edge in self.edges.drain(..) {
            match squashed.last_mut() {
                Some(last)
                    if last.parent == edge.parent
                        && last.child == edge.child
                        && last.right == edge.left =>
                {
                    last.right = edge.right;
                },
                _ => squashed.push(edge),
            }
        }

        self.edges = squashed;
    }
}

pub(super) fn compare_edges(nodes: &[NodeRow], a: &EdgeRow, b: &EdgeRow) -> Ordering {
    nodes[a.parent.index()]
        .time
        .cmp(&nodes[b.parent.index()].time)
        .then(a.parent.cmp(&b.parent))
        .then(a.child.cmp(&b.child))
        .then(a.left.cmp(&b.left))
}
