use ancestry_core::tables::NodeId;

/// Ancestral material `[left, right)` that is inherited by the samples
/// below `node`
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) struct Segment {
    pub left: u64,
    pub right: u64,
    pub node: NodeId,
}

/// An ancestral lineage with its sorted, non-overlapping segments
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub(crate) struct Lineage {
    segments: Vec<Segment>,
}

impl Lineage {
    pub fn new(segment: Segment) -> Self {
        Self {
            segments: vec![segment],
        }
    }

    /// Appends a segment to the right, merging it with an adjacent segment
    /// of the same node
    pub fn push(&mut self, segment: Segment) {
        match self.segments.last_mut() {
            Some(last) if last.right == segment.left && last.node == segment.node => {
                last.right = segment.right;
            },
            _ => self.segments.push(segment),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn into_segments(self) -> Vec<Segment> {
        self.segments
    }

    /// Number of breakpoints at which a recombination would split this
    /// lineage into two lineages with ancestral material each
    pub fn links(&self) -> u64 {
        match (self.segments.first(), self.segments.last()) {
            (Some(first), Some(last)) => last.right - first.left - 1,
            _ => 0,
        }
    }

    /// Returns the left end of the leftmost segment
    pub fn left(&self) -> Option<u64> {
        self.segments.first().map(|segment| segment.left)
    }

    /// Splits off all material right of the `breakpoint` into a new lineage
    pub fn split_off(&mut self, breakpoint: u64) -> Lineage {
        let mut left = Vec::with_capacity(self.segments.len());
        let mut right = Lineage::default();

        for segment in self.segments.drain(..) {
            if segment.right <= breakpoint {
                left.push(segment);
            } else if segment.left >= breakpoint {
                right.push(segment);
            } else {
                left.push(Segment {
                    right: breakpoint,
                    ..segment
                });
                right.push(Segment {
                    left: breakpoint,
                    ..segment
                });
            }
        }

        self.segments = left;

        right
    }
}
