//! View constructors: pure layout-to-layout derivations.
//!
//! Every function here derives a new [`Layout`] over the same buffer — no
//! data is copied and no buffer access occurs. Validation is eager: a
//! constructor either returns a fully consistent layout or an error, never a
//! partial view.

use crate::index::normalize_subscript;
use crate::layout::{contiguous_strides, Layout};
use crate::slice::AxisSlice;
use crate::{NdarrayError, Result};

impl Layout {
    /// Derive a sliced layout from per-dimension specifications.
    ///
    /// Range specs keep their dimension with `shape = count`,
    /// `stride = old_stride * step`, and the offset advanced to the range
    /// start. Integer specs reduce their dimension out of the output shape,
    /// accumulating `old_stride * index` into the offset.
    pub fn slice(&self, specs: &[AxisSlice]) -> Result<Layout> {
        if specs.len() != self.ndims() {
            return Err(NdarrayError::RankMismatch(specs.len(), self.ndims()));
        }
        let mut shape = Vec::with_capacity(self.ndims());
        let mut strides = Vec::with_capacity(self.ndims());
        let mut offset = self.offset() as isize;
        for (axis, spec) in specs.iter().enumerate() {
            let dim = self.shape()[axis];
            let stride = self.strides()[axis];
            match spec {
                AxisSlice::Range(range) => {
                    let r = range.normalize(dim, axis)?;
                    shape.push(r.count);
                    strides.push(stride * r.step);
                    if r.count > 0 {
                        offset += stride * r.start;
                    }
                }
                AxisSlice::Index(i) => {
                    let idx = normalize_subscript(*i, dim).ok_or(
                        NdarrayError::IndexOutOfBounds {
                            idx: *i,
                            size: dim,
                        },
                    )?;
                    offset += stride * idx as isize;
                }
            }
        }
        Ok(self.derive(shape, strides, offset as usize))
    }

    /// Reorder dimensions by a permutation of axis indices.
    pub fn permute(&self, perm: &[usize]) -> Result<Layout> {
        let rank = self.ndims();
        if perm.len() != rank {
            return Err(NdarrayError::RankMismatch(perm.len(), rank));
        }
        let mut seen = vec![false; rank];
        for &p in perm {
            if p >= rank || seen[p] {
                return Err(NdarrayError::InvalidAxis { axis: p, rank });
            }
            seen[p] = true;
        }
        let shape: Vec<usize> = perm.iter().map(|&p| self.shape()[p]).collect();
        let strides: Vec<isize> = perm.iter().map(|&p| self.strides()[p]).collect();
        Ok(self.derive(shape, strides, self.offset()))
    }

    /// Reverse the dimension order.
    pub fn transpose(&self) -> Layout {
        let shape: Vec<usize> = self.shape().iter().rev().copied().collect();
        let strides: Vec<isize> = self.strides().iter().rev().copied().collect();
        self.derive(shape, strides, self.offset())
    }

    /// Remove all dimensions of size 1.
    ///
    /// A size-1 dimension is never actually indexed, so its stride is
    /// irrelevant and the addressing of the result is unchanged.
    pub fn squeeze(&self) -> Layout {
        let mut shape = Vec::new();
        let mut strides = Vec::new();
        for (&d, &s) in self.shape().iter().zip(self.strides().iter()) {
            if d != 1 {
                shape.push(d);
                strides.push(s);
            }
        }
        self.derive(shape, strides, self.offset())
    }

    /// Remove a specific size-1 dimension.
    pub fn squeeze_axis(&self, axis: usize) -> Result<Layout> {
        let rank = self.ndims();
        if axis >= rank || self.shape()[axis] != 1 {
            return Err(NdarrayError::InvalidAxis { axis, rank });
        }
        let mut shape = self.shape().to_vec();
        let mut strides = self.strides().to_vec();
        shape.remove(axis);
        strides.remove(axis);
        Ok(self.derive(shape, strides, self.offset()))
    }

    /// Insert a new dimension of size 1 (stride 0) at `axis`.
    pub fn expand_dims(&self, axis: usize) -> Result<Layout> {
        let rank = self.ndims();
        if axis > rank {
            return Err(NdarrayError::InvalidAxis { axis, rank });
        }
        let mut shape = self.shape().to_vec();
        let mut strides = self.strides().to_vec();
        shape.insert(axis, 1);
        strides.insert(axis, 0);
        Ok(self.derive(shape, strides, self.offset()))
    }

    /// Broadcast this layout to a target shape of equal or greater rank.
    ///
    /// Shapes align at the trailing dimension. A source dimension of size 1
    /// stretches to the target size with stride 0; a matching size keeps its
    /// stride; leading target-only dimensions are inserted with stride 0.
    pub fn broadcast_to(&self, target: &[usize]) -> Result<Layout> {
        let rank = self.ndims();
        let target_rank = target.len();
        if target_rank < rank {
            return Err(NdarrayError::RankMismatch(target_rank, rank));
        }
        let lead = target_rank - rank;
        let mut strides = vec![0isize; target_rank];
        for i in 0..rank {
            let dim = self.shape()[i];
            let t = target[lead + i];
            if dim == t {
                strides[lead + i] = self.strides()[i];
            } else if dim == 1 {
                strides[lead + i] = 0;
            } else {
                return Err(NdarrayError::IncompatibleShapes {
                    dim: lead + i,
                    a: dim,
                    b: t,
                });
            }
        }
        Ok(self.derive(target.to_vec(), strides, self.offset()))
    }

    /// Reinterpret the view under a new shape without copying.
    ///
    /// Permitted only when the layout is contiguous in its own order (the
    /// element sequence in the buffer then matches view order, possibly
    /// reversed). Anything else fails with
    /// [`CannotReshapeWithoutCopy`](crate::NdarrayError::CannotReshapeWithoutCopy);
    /// callers wanting the copying fallback use the owned handle's
    /// [`reshape_copy`](crate::array::NdArray::reshape_copy).
    pub fn reshape(&self, new_shape: &[usize]) -> Result<Layout> {
        if crate::layout::numel(new_shape) != self.len() {
            return Err(NdarrayError::ShapeMismatch(
                self.shape().to_vec(),
                new_shape.to_vec(),
            ));
        }
        let sign = match self.flat_fast_path() {
            Some(sign) => sign,
            None => {
                return Err(NdarrayError::CannotReshapeWithoutCopy {
                    from: self.shape().to_vec(),
                    to: new_shape.to_vec(),
                })
            }
        };
        let strides: Vec<isize> = contiguous_strides(new_shape, self.order())
            .into_iter()
            .map(|s| s * sign as isize)
            .collect();
        Ok(self.derive(new_shape.to_vec(), strides, self.offset()))
    }
}
