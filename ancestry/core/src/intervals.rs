use core::fmt;

use serde::Serialize;

use ancestry_core_bond::{NonNegativeF64, PositiveF64};

#[derive(Debug, thiserror::Error)]
pub enum IntervalError {
    #[error("at least one genomic interval is required")]
    NoIntervals,
    #[error("interval {index} [{left}, {right}) is empty")]
    EmptyInterval {
        index: usize,
        left: NonNegativeF64,
        right: NonNegativeF64,
    },
    #[error("interval {index} ends at {right}, beyond the sequence length {sequence_length}")]
    OutOfBounds {
        index: usize,
        right: NonNegativeF64,
        sequence_length: PositiveF64,
    },
    #[error("interval {index} overlaps with or precedes the previous interval")]
    Unsorted { index: usize },
}

/// A half-open `[left, right)` genomic interval
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize)]
pub struct GenomicInterval {
    pub left: NonNegativeF64,
    pub right: NonNegativeF64,
}

impl GenomicInterval {
    #[must_use]
    pub fn contains(&self, position: NonNegativeF64) -> bool {
        self.left <= position && position < self.right
    }

    #[must_use]
    pub fn span(&self) -> f64 {
        self.right.get() - self.left.get()
    }
}

impl fmt::Display for GenomicInterval {
    fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
        write!(fmt, "[{}, {})", self.left, self.right)
    }
}

/// A sorted list of non-empty, non-overlapping genomic intervals which all
/// lie within the sequence.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct GenomicIntervals(Vec<GenomicInterval>);

impl GenomicIntervals {
    /// # Errors
    ///
    /// Returns `IntervalError` if the list is empty, or if any interval is
    /// empty, out of bounds, or not strictly after its predecessor.
    pub fn new<I: IntoIterator<Item = (NonNegativeF64, NonNegativeF64)>>(
        intervals: I,
        sequence_length: PositiveF64,
    ) -> Result<Self, IntervalError> {
        let mut checked: Vec<GenomicInterval> = Vec::new();

        for (index, (left, right)) in intervals.into_iter().enumerate() {
            if left >= right {
                return Err(IntervalError::EmptyInterval { index, left, right });
            }

            if right.get() > sequence_length.get() {
                return Err(IntervalError::OutOfBounds {
                    index,
                    right,
                    sequence_length,
                });
            }

            if let Some(previous) = checked.last() {
                if previous.right > left {
                    return Err(IntervalError::Unsorted { index });
                }
            }

            checked.push(GenomicInterval { left, right });
        }

        if checked.is_empty() {
            return Err(IntervalError::NoIntervals);
        }

        Ok(Self(checked))
    }

    pub fn iter(&self) -> impl Iterator<Item = &GenomicInterval> {
        self.0.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    pub fn contains(&self, position: NonNegativeF64) -> bool {
        self.0.iter().any(|interval| interval.contains(position))
    }

    #[must_use]
    pub fn total_span(&self) -> f64 {
        self.0.iter().map(GenomicInterval::span).sum()
    }

    /// Clips `[left, right)` to the intervals, yielding the non-empty overlaps
    pub fn clip(
        &self,
        left: NonNegativeF64,
        right: NonNegativeF64,
    ) -> impl Iterator<Item = GenomicInterval> + '_ {
        self.0
            .iter()
            .filter(move |interval| interval.left < right && left < interval.right)
            .map(move |interval| GenomicInterval {
                left: interval.left.max(left),
                right: interval.right.min(right),
            })
    }
}

impl fmt::Display for GenomicIntervals {
    fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
        fmt.write_str("[")?;

        for (index, interval) in self.0.iter().enumerate() {
            if index > 0 {
                fmt.write_str(", ")?;
            }

            fmt::Display::fmt(interval, fmt)?;
        }

        fmt.write_str("]")
    }
}
