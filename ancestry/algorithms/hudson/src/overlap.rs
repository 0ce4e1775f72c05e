use std::collections::BTreeMap;

/// Tracks how many lineages carry ancestral material at every position.
///
/// Each key starts an interval that extends to the next key, so the map
/// starts out as `{0: samples, L: 0}`.
#[derive(Debug)]
pub(crate) struct OverlapCounts(BTreeMap<u64, u64>);

impl OverlapCounts {
    pub fn new(sequence_length: u64, samples: u64) -> Self {
        let mut counts = BTreeMap::new();

        counts.insert(0, samples);
        counts.insert(sequence_length, 0);

        Self(counts)
    }

    fn split_at(&mut self, position: u64) {
        if !self.0.contains_key(&position) {
            let count = self
                .0
                .range(..position)
                .next_back()
                .map_or(0, |(_, count)| *count);

            self.0.insert(position, count);
        }
    }

    /// Records that two lineages coalesce over `[left, right)` and returns
    /// the sub-intervals that still have to be tracked further back in time.
    ///
    /// Material whose count drops to one has found its most recent common
    /// ancestor and is dropped.
    pub fn coalesce(&mut self, left: u64, right: u64) -> Vec<(u64, u64)> {
        self.split_at(left);
        self.split_at(right);

        let keys: Vec<u64> = self.0.range(left..=right).map(|(key, _)| *key).collect();

        let mut remaining: Vec<(u64, u64)> = Vec::new();

        for piece in keys.windows(2) {
            let (start, end) = (piece[0], piece[1]);

            if let Some(count) = self.0.get_mut(&start) {
                *count = count.saturating_sub(1);

                if *count > 1 {
                    match remaining.last_mut() {
                        Some((_, last_end)) if *last_end == start => *last_end = end,
                        _ => remaining.push((start, end)),
                    }
                }
            }
        }

        remaining
    }

    #[cfg(test)]
    pub fn count_at(&self, position: u64) -> u64 {
        self.0
            .range(..=position)
            .next_back()
            .map_or(0, |(_, count)| *count)
    }
}
