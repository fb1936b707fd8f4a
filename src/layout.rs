//! Layout descriptors and index arithmetic.
//!
//! A [`Layout`] is the immutable `{ shape, strides, offset, order }` tuple
//! describing how a flat buffer is interpreted as an n-dimensional array. It
//! computes every mapping between the three index spaces involved:
//!
//! - **subscripts**: one index per dimension;
//! - **view index**: the 0-based position in the flattened view, ordered by
//!   the layout's [`Order`];
//! - **buffer index**: the position in the underlying linear buffer.
//!
//! The `order` field is informational metadata: it fixes default stride
//! generation and the flattening order, but the `strides` field may contain
//! arbitrary values (negative strides traverse a dimension in reverse, zero
//! strides denote broadcast dimensions).

use std::fmt;
use std::str::FromStr;

use crate::index::{resolve_index, IndexMode};
use crate::{NdarrayError, Result};

// ============================================================================
// Order
// ============================================================================

/// Memory order: which dimension varies fastest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Order {
    /// C-style: the last dimension varies fastest.
    #[default]
    RowMajor,
    /// Fortran-style: the first dimension varies fastest.
    ColMajor,
}

impl fmt::Display for Order {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Order::RowMajor => f.write_str("row-major"),
            Order::ColMajor => f.write_str("column-major"),
        }
    }
}

impl FromStr for Order {
    type Err = NdarrayError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "row-major" => Ok(Order::RowMajor),
            "column-major" => Ok(Order::ColMajor),
            other => Err(NdarrayError::UnsupportedOrder(other.to_string())),
        }
    }
}

/// Classification of a stride array against the canonical orders.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StrideOrder {
    /// Strides match neither canonical order.
    Neither,
    /// Absolute strides are nonincreasing (last dimension fastest).
    RowMajor,
    /// Absolute strides are nondecreasing (first dimension fastest).
    ColMajor,
    /// Both at once (rank ≤ 1, or all equal magnitudes).
    Both,
}

impl StrideOrder {
    /// Whether this classification is compatible with row-major order.
    pub fn is_row_major(&self) -> bool {
        matches!(self, StrideOrder::RowMajor | StrideOrder::Both)
    }

    /// Whether this classification is compatible with column-major order.
    pub fn is_col_major(&self) -> bool {
        matches!(self, StrideOrder::ColMajor | StrideOrder::Both)
    }
}

// ============================================================================
// Free functions over shapes and strides
// ============================================================================

/// Number of elements addressed by a shape (1 for rank 0).
pub fn numel(shape: &[usize]) -> usize {
    shape.iter().product()
}

/// Generate the canonical contiguous stride array for a shape.
pub fn contiguous_strides(shape: &[usize], order: Order) -> Vec<isize> {
    let rank = shape.len();
    if rank == 0 {
        return Vec::new();
    }
    let mut strides = vec![1isize; rank];
    match order {
        Order::RowMajor => {
            for i in (0..rank - 1).rev() {
                strides[i] = strides[i + 1] * shape[i + 1] as isize;
            }
        }
        Order::ColMajor => {
            for i in 1..rank {
                strides[i] = strides[i - 1] * shape[i - 1] as isize;
            }
        }
    }
    strides
}

/// Classify a stride array against the canonical memory orders.
pub fn strides_order(strides: &[isize]) -> StrideOrder {
    if strides.len() < 2 {
        return StrideOrder::Both;
    }
    let mut row = true;
    let mut col = true;
    let mut prev = strides[0].unsigned_abs();
    for &s in &strides[1..] {
        let cur = s.unsigned_abs();
        if cur > prev {
            row = false;
        }
        if cur < prev {
            col = false;
        }
        prev = cur;
    }
    match (row, col) {
        (true, true) => StrideOrder::Both,
        (true, false) => StrideOrder::RowMajor,
        (false, true) => StrideOrder::ColMajor,
        (false, false) => StrideOrder::Neither,
    }
}

/// Index offset locating the first indexed value for a stride array.
///
/// Negative strides push the all-zero subscript away from buffer index 0;
/// this returns the offset at which such a view must be anchored.
pub fn strides_offset(shape: &[usize], strides: &[isize]) -> usize {
    let mut offset = 0isize;
    for (&dim, &stride) in shape.iter().zip(strides.iter()) {
        if stride < 0 && dim > 0 {
            offset -= stride * (dim as isize - 1);
        }
    }
    offset as usize
}

/// Sign of the buffer traversal for a stride array.
///
/// Returns `1` when all strides are nonnegative (left-to-right traversal),
/// `-1` when all strides are negative (right-to-left), and `0` for mixed
/// signs.
pub fn iteration_order(strides: &[isize]) -> i8 {
    let mut neg = 0usize;
    for &s in strides {
        if s < 0 {
            neg += 1;
        }
    }
    if neg == 0 {
        1
    } else if neg == strides.len() {
        -1
    } else {
        0
    }
}

// ============================================================================
// Layout
// ============================================================================

/// Immutable descriptor mapping subscripts to buffer indices.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Layout {
    shape: Vec<usize>,
    strides: Vec<isize>,
    offset: usize,
    order: Order,
}

impl Layout {
    /// Create a layout, validating that shape and strides agree in rank.
    pub fn new(shape: Vec<usize>, strides: Vec<isize>, offset: usize, order: Order) -> Result<Self> {
        if shape.len() != strides.len() {
            return Err(NdarrayError::StrideLengthMismatch);
        }
        Ok(Self {
            shape,
            strides,
            offset,
            order,
        })
    }

    /// Canonical contiguous layout for a shape: offset 0, default strides.
    pub fn contiguous(shape: &[usize], order: Order) -> Self {
        Self {
            strides: contiguous_strides(shape, order),
            shape: shape.to_vec(),
            offset: 0,
            order,
        }
    }

    /// Zero-dimensional layout addressing the single element at `offset`.
    pub fn scalar(offset: usize, order: Order) -> Self {
        Self {
            shape: Vec::new(),
            strides: Vec::new(),
            offset,
            order,
        }
    }

    #[inline]
    pub fn shape(&self) -> &[usize] {
        &self.shape
    }

    #[inline]
    pub fn strides(&self) -> &[isize] {
        &self.strides
    }

    #[inline]
    pub fn offset(&self) -> usize {
        self.offset
    }

    #[inline]
    pub fn order(&self) -> Order {
        self.order
    }

    #[inline]
    pub fn ndims(&self) -> usize {
        self.shape.len()
    }

    /// Number of elements in the view (1 for rank 0, 0 for empty shapes).
    #[inline]
    pub fn len(&self) -> usize {
        numel(&self.shape)
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Sign of the buffer traversal; see [`iteration_order`].
    #[inline]
    pub fn iteration_order(&self) -> i8 {
        iteration_order(&self.strides)
    }

    /// Number of dimensions of size 1.
    pub fn singleton_dimensions(&self) -> usize {
        self.shape.iter().filter(|&&d| d == 1).count()
    }

    /// Number of dimensions of size other than 1.
    pub fn nonsingleton_dimensions(&self) -> usize {
        self.ndims() - self.singleton_dimensions()
    }

    /// Derive a layout over the same buffer from new shape/strides/offset.
    pub(crate) fn derive(&self, shape: Vec<usize>, strides: Vec<isize>, offset: usize) -> Self {
        Self {
            shape,
            strides,
            offset,
            order: self.order,
        }
    }

    // ------------------------------------------------------------------
    // Bounds
    // ------------------------------------------------------------------

    /// Minimum and maximum buffer indices ever touched by this layout.
    ///
    /// Size-1 dimensions contribute nothing regardless of their stride, so a
    /// degenerate (broadcast) stride there is interchangeable with any other
    /// value. Empty views touch nothing and report `(offset, offset)`.
    pub fn minmax_buffer_index(&self) -> (isize, isize) {
        let mut min = self.offset as isize;
        let mut max = min;
        if self.is_empty() {
            return (min, max);
        }
        for (&dim, &stride) in self.shape.iter().zip(self.strides.iter()) {
            if dim > 1 {
                let span = stride * (dim as isize - 1);
                if span > 0 {
                    max += span;
                } else {
                    min += span;
                }
            }
        }
        (min, max)
    }

    /// Minimum buffer index touched by this layout.
    pub fn min_buffer_index(&self) -> isize {
        self.minmax_buffer_index().0
    }

    /// Maximum buffer index touched by this layout.
    pub fn max_buffer_index(&self) -> isize {
        self.minmax_buffer_index().1
    }

    /// Validate that every touched buffer index lies within `[0, len)`.
    ///
    /// Uses checked arithmetic so a pathological layout reports
    /// [`OffsetOverflow`](crate::NdarrayError::OffsetOverflow) instead of
    /// wrapping.
    pub fn validate_within(&self, len: usize) -> Result<()> {
        if self.is_empty() {
            return Ok(());
        }
        let mut min = self.offset as isize;
        let mut max = min;
        for (&dim, &stride) in self.shape.iter().zip(self.strides.iter()) {
            if dim > 1 {
                let span = stride
                    .checked_mul(dim as isize - 1)
                    .ok_or(NdarrayError::OffsetOverflow)?;
                if span > 0 {
                    max = max.checked_add(span).ok_or(NdarrayError::OffsetOverflow)?;
                } else {
                    min = min.checked_add(span).ok_or(NdarrayError::OffsetOverflow)?;
                }
            }
        }
        if min < 0 || max as usize >= len {
            return Err(NdarrayError::OutOfBounds { min, max, len });
        }
        Ok(())
    }

    // ------------------------------------------------------------------
    // Contiguity
    // ------------------------------------------------------------------

    /// Whether the absolute strides match the canonical formula for `order`,
    /// ignoring dimensions of size ≤ 1.
    fn abs_strides_match(&self, order: Order) -> bool {
        let mut expected = 1isize;
        let iter: Box<dyn Iterator<Item = (&usize, &isize)> + '_> = match order {
            Order::RowMajor => Box::new(self.shape.iter().rev().zip(self.strides.iter().rev())),
            Order::ColMajor => Box::new(self.shape.iter().zip(self.strides.iter())),
        };
        for (&dim, &stride) in iter {
            if dim <= 1 {
                continue;
            }
            if stride.unsigned_abs() as isize != expected {
                return false;
            }
            expected = expected.saturating_mul(dim as isize);
        }
        true
    }

    /// Whether this layout is row-major contiguous.
    ///
    /// Holds when, ignoring size-≤1 dimensions, the absolute strides follow
    /// the row-major formula and the traversal is single-signed (all
    /// nonnegative or all negative strides). Rank-0 and empty layouts are
    /// trivially contiguous.
    pub fn is_row_major_contiguous(&self) -> bool {
        if self.ndims() == 0 || self.is_empty() {
            return true;
        }
        self.iteration_order() != 0 && self.abs_strides_match(Order::RowMajor)
    }

    /// Whether this layout is column-major contiguous.
    pub fn is_col_major_contiguous(&self) -> bool {
        if self.ndims() == 0 || self.is_empty() {
            return true;
        }
        self.iteration_order() != 0 && self.abs_strides_match(Order::ColMajor)
    }

    /// Whether this layout is contiguous in either canonical order.
    pub fn is_contiguous(&self) -> bool {
        self.is_row_major_contiguous() || self.is_col_major_contiguous()
    }

    /// Flat-addressing fast path: `Some(1)` when `buffer = offset + view`,
    /// `Some(-1)` when `buffer = offset - view`, `None` when the general
    /// subscript-resolution path is required.
    ///
    /// The fast path applies only when contiguity matches the layout's own
    /// order tag, since the view flattening order is defined by that tag.
    pub(crate) fn flat_fast_path(&self) -> Option<i8> {
        let matches = match self.order {
            Order::RowMajor => self.is_row_major_contiguous(),
            Order::ColMajor => self.is_col_major_contiguous(),
        };
        if !matches {
            return None;
        }
        match self.iteration_order() {
            1 => Some(1),
            -1 => Some(-1),
            _ => None,
        }
    }

    // ------------------------------------------------------------------
    // Index arithmetic
    // ------------------------------------------------------------------

    /// Map subscripts to a buffer index: `offset + Σ subscripts[d]*strides[d]`.
    ///
    /// Subscripts are assumed in-bounds; this is the strict kernel-tier path
    /// and performs only debug assertions.
    #[inline]
    pub fn subscript_to_buffer_index(&self, subscripts: &[usize]) -> usize {
        debug_assert_eq!(subscripts.len(), self.ndims(), "wrong number of subscripts");
        let mut idx = self.offset as isize;
        for (&sub, (&dim, &stride)) in subscripts
            .iter()
            .zip(self.shape.iter().zip(self.strides.iter()))
        {
            debug_assert!(sub < dim, "subscript {} out of bounds for dim {}", sub, dim);
            idx += sub as isize * stride;
        }
        idx as usize
    }

    /// Decompose a view index into per-dimension subscripts.
    ///
    /// Dimensions are processed from the fastest-varying axis outward
    /// (last axis for row-major, first for column-major) using successive
    /// division and remainder. Rank 0 yields an empty subscript vector.
    pub fn linear_to_subscript(&self, view_index: usize) -> Vec<usize> {
        let rank = self.ndims();
        let mut out = vec![0usize; rank];
        let mut idx = view_index;
        match self.order {
            Order::RowMajor => {
                for i in (0..rank).rev() {
                    let d = self.shape[i];
                    out[i] = idx % d;
                    idx /= d;
                }
            }
            Order::ColMajor => {
                for i in 0..rank {
                    let d = self.shape[i];
                    out[i] = idx % d;
                    idx /= d;
                }
            }
        }
        out
    }

    /// Map a view index to a buffer index.
    ///
    /// Contiguous layouts use O(1) flat addressing (`offset ± view_index`);
    /// anything else goes through subscript resolution.
    #[inline]
    pub fn view_index_to_buffer_index(&self, view_index: usize) -> usize {
        match self.flat_fast_path() {
            Some(1) => self.offset + view_index,
            Some(-1) => self.offset - view_index,
            _ => self.subscript_to_buffer_index(&self.linear_to_subscript(view_index)),
        }
    }

    /// Map a buffer index back to a view index.
    ///
    /// The index is resolved under `mode` against the span of buffer indices
    /// this layout touches. Assumes strides of canonical magnitude for the
    /// layout's order (the standard shape for this conversion family).
    pub fn buffer_index_to_view_index(&self, buffer_index: isize, mode: IndexMode) -> Result<usize> {
        let rank = self.ndims();
        if rank == 0 {
            return Ok(0);
        }
        if self.is_empty() {
            return Err(NdarrayError::IndexOutOfBounds {
                idx: buffer_index,
                size: 0,
            });
        }
        let (min, max) = self.minmax_buffer_index();
        let span = (max - min) as usize;
        let rel = resolve_index(buffer_index - min, span, mode)?;

        // Decompose relative-to-minimum using absolute strides, then flip
        // subscripts on negative-stride dimensions back to view orientation.
        let mut rem = rel;
        let mut view = 0usize;
        let canonical = contiguous_strides(&self.shape, self.order);
        let axes: Vec<usize> = match self.order {
            Order::RowMajor => (0..rank).collect(),
            Order::ColMajor => (0..rank).rev().collect(),
        };
        for &i in &axes {
            let s = self.strides[i].unsigned_abs();
            if s == 0 {
                continue;
            }
            let mut sub = rem / s;
            if sub >= self.shape[i] {
                sub = self.shape[i] - 1;
            }
            rem -= sub * s;
            let sub = if self.strides[i] < 0 {
                self.shape[i] - 1 - sub
            } else {
                sub
            };
            view += sub * canonical[i] as usize;
        }
        Ok(view)
    }

    /// Convert a linear index to subscripts under an index mode.
    ///
    /// With `offset == 0` the index is interpreted from the perspective of
    /// the view (view data is always ordered); with `offset > 0` it is
    /// interpreted as an index into the underlying buffer, and subscripts
    /// are returned from that buffer's perspective.
    pub fn ind2sub(&self, idx: isize, mode: IndexMode) -> Result<Vec<usize>> {
        if self.ndims() == 0 {
            return Ok(Vec::new());
        }
        if self.is_empty() {
            return Err(NdarrayError::IndexOutOfBounds { idx, size: 0 });
        }
        if self.offset == 0 {
            let resolved = resolve_index(idx, self.len() - 1, mode)?;
            return Ok(self.linear_to_subscript(resolved));
        }

        // Buffer perspective: resolve against the touched span, decompose
        // relative to the minimum index, then flip negative-stride axes.
        let (min, max) = self.minmax_buffer_index();
        let span = (max - min) as usize;
        let rel = resolve_index(idx - min, span, mode)?;

        let rank = self.ndims();
        let mut out = vec![0usize; rank];
        let mut rem = rel;
        let axes: Vec<usize> = match self.order {
            Order::RowMajor => (0..rank).collect(),
            Order::ColMajor => (0..rank).rev().collect(),
        };
        for &i in &axes {
            let s = self.strides[i].unsigned_abs();
            if s == 0 {
                continue;
            }
            let mut sub = rem / s;
            if sub >= self.shape[i] {
                sub = self.shape[i] - 1;
            }
            rem -= sub * s;
            out[i] = if self.strides[i] < 0 {
                self.shape[i] - 1 - sub
            } else {
                sub
            };
        }
        Ok(out)
    }

    /// Convert subscripts to a linear index under an index mode.
    ///
    /// The perspective rule mirrors [`Layout::ind2sub`]: with `offset == 0`
    /// negative-stride contributions are negated so the returned index is
    /// view-ordered; with `offset > 0` the result addresses the underlying
    /// buffer directly.
    pub fn sub2ind(&self, subscripts: &[isize], mode: IndexMode) -> Result<usize> {
        if subscripts.len() != self.ndims() {
            return Err(NdarrayError::RankMismatch(subscripts.len(), self.ndims()));
        }
        let mut idx = self.offset as isize;
        for (&sub, (&dim, &stride)) in subscripts
            .iter()
            .zip(self.shape.iter().zip(self.strides.iter()))
        {
            let max = if dim == 0 { 0 } else { dim - 1 };
            let j = resolve_index(sub, max, mode)? as isize;
            if stride < 0 && self.offset == 0 {
                idx -= j * stride;
            } else {
                idx += j * stride;
            }
        }
        Ok(idx as usize)
    }
}
