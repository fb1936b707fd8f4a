//! Per-dimension slice specifications and their normalization.

use crate::{NdarrayError, Result};

/// A `(start, stop, step)` range over one dimension.
///
/// `start` and `stop` may be omitted (run from/to the natural end for the
/// step direction) or negative (resolved against the dimension size). For a
/// negative step, a `stop` of `-1` is the terminal sentinel meaning "past the
/// first element", so `SliceRange::new(Some(7), Some(-1), -1)` over a length-8
/// dimension selects all eight elements in reverse.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SliceRange {
    /// First selected index (inclusive).
    pub start: Option<isize>,
    /// End of the range (exclusive).
    pub stop: Option<isize>,
    /// Step between selected indices; must be nonzero.
    pub step: isize,
}

/// A range in normalized form: absolute start, element count, step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct NormalizedRange {
    pub(crate) start: isize,
    pub(crate) count: usize,
    pub(crate) step: isize,
}

impl SliceRange {
    /// Range with explicit endpoints.
    pub fn new(start: Option<isize>, stop: Option<isize>, step: isize) -> Self {
        Self { start, stop, step }
    }

    /// The full dimension, unchanged.
    pub fn full() -> Self {
        Self {
            start: None,
            stop: None,
            step: 1,
        }
    }

    /// `[start, stop)` with unit step.
    pub fn bounded(start: isize, stop: isize) -> Self {
        Self {
            start: Some(start),
            stop: Some(stop),
            step: 1,
        }
    }

    /// The full dimension traversed in reverse.
    pub fn reversed() -> Self {
        Self {
            start: None,
            stop: None,
            step: -1,
        }
    }

    /// Resolve the range against a dimension of size `dim`.
    ///
    /// Fails with [`InvalidSlice`](crate::NdarrayError::InvalidSlice) when
    /// the step is zero. Out-of-range endpoints are clamped, so the count may
    /// come out zero but never negative.
    pub(crate) fn normalize(&self, dim: usize, axis: usize) -> Result<NormalizedRange> {
        if self.step == 0 {
            return Err(NdarrayError::InvalidSlice { dim: axis });
        }
        let n = dim as isize;
        let step = self.step;

        let (start, stop) = if step > 0 {
            let mut start = self.start.unwrap_or(0);
            if start < 0 {
                start += n;
            }
            let mut stop = self.stop.unwrap_or(n);
            if stop < 0 {
                stop += n;
            }
            (start.clamp(0, n), stop.clamp(0, n))
        } else {
            let mut start = self.start.unwrap_or(n - 1);
            if start < 0 {
                start += n;
            }
            // stop == -1 is the terminal sentinel; more-negative values
            // resolve relative to the dimension size.
            let mut stop = self.stop.unwrap_or(-1);
            if stop < -1 {
                stop += n;
            }
            (start.clamp(-1, n - 1), stop.clamp(-1, n - 1))
        };

        let count = if step > 0 {
            (stop - start + step - 1).div_euclid(step).max(0)
        } else {
            // Truncating division with matching signs computes the ceiling.
            ((stop - start + step + 1) / step).max(0)
        };
        Ok(NormalizedRange {
            start,
            count: count as usize,
            step,
        })
    }
}

/// Per-dimension slice specification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AxisSlice {
    /// Keep the dimension, selecting a strided range of it.
    Range(SliceRange),
    /// Reduce the dimension out entirely, selecting a single index.
    /// Negative indices address from the end.
    Index(isize),
}

impl AxisSlice {
    /// The full dimension, unchanged.
    pub fn full() -> Self {
        AxisSlice::Range(SliceRange::full())
    }

    /// A `(start, stop, step)` range.
    pub fn range(start: Option<isize>, stop: Option<isize>, step: isize) -> Self {
        AxisSlice::Range(SliceRange::new(start, stop, step))
    }
}

impl From<SliceRange> for AxisSlice {
    fn from(r: SliceRange) -> Self {
        AxisSlice::Range(r)
    }
}

impl From<isize> for AxisSlice {
    fn from(i: isize) -> Self {
        AxisSlice::Index(i)
    }
}
