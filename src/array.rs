//! Owned array handles and borrowed views.
//!
//! [`NdArray`] couples a buffer with a [`Layout`]; [`NdView`] and
//! [`NdViewMut`] borrow the buffer under a derived layout. Views never copy:
//! deriving one only constructs a new layout over the same storage, so
//! mutation through a mutable view is visible through every view derived
//! afterward.
//!
//! Handles use the lenient bounds tier: `get` returns `None` and `set` is a
//! no-op for out-of-range subscripts, and negative subscripts address from
//! the end of their dimension. The strict tier lives in the view
//! constructors (which fail eagerly) and the kernel runners (which trust
//! validated layouts).

use bytemuck::Pod;
use num_complex::Complex;
use num_traits::Num;

use crate::buffer::{BufferAccess, DenseBuffer, InterleavedBuffer};
use crate::dtype::{DType, Element};
use crate::index::normalize_subscript;
use crate::kernel;
use crate::layout::{numel, Layout, Order};
use crate::slice::AxisSlice;
use crate::{NdarrayError, Result};

// ============================================================================
// NdArray
// ============================================================================

/// Owned n-dimensional array: a buffer plus the layout interpreting it.
#[derive(Debug, Clone)]
pub struct NdArray<B> {
    buffer: B,
    layout: Layout,
}

impl<B: BufferAccess> NdArray<B> {
    /// Couple a buffer with a layout, validating that every index the layout
    /// can touch stays within the buffer.
    pub fn from_parts(buffer: B, layout: Layout) -> Result<Self> {
        layout.validate_within(buffer.len())?;
        Ok(Self { buffer, layout })
    }

    #[inline]
    pub fn dtype(&self) -> DType {
        self.buffer.dtype()
    }

    #[inline]
    pub fn shape(&self) -> &[usize] {
        self.layout.shape()
    }

    #[inline]
    pub fn strides(&self) -> &[isize] {
        self.layout.strides()
    }

    #[inline]
    pub fn offset(&self) -> usize {
        self.layout.offset()
    }

    #[inline]
    pub fn order(&self) -> Order {
        self.layout.order()
    }

    #[inline]
    pub fn ndims(&self) -> usize {
        self.layout.ndims()
    }

    /// Number of elements in the view (1 for rank 0).
    #[inline]
    pub fn len(&self) -> usize {
        self.layout.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.layout.is_empty()
    }

    /// Total bytes spanned by the view's elements, or `None` for generic
    /// data types whose width is opaque.
    pub fn byte_length(&self) -> Option<usize> {
        self.dtype().bytes_per_element().map(|b| b * self.len())
    }

    #[inline]
    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    /// The underlying buffer, for collaborators that consume
    /// `(buffer, strides, offset)` tuples directly.
    #[inline]
    pub fn data(&self) -> &B {
        &self.buffer
    }

    #[inline]
    pub fn data_mut(&mut self) -> &mut B {
        &mut self.buffer
    }

    /// Split the handle back into buffer and layout.
    pub fn into_parts(self) -> (B, Layout) {
        (self.buffer, self.layout)
    }

    pub fn is_row_major_contiguous(&self) -> bool {
        self.layout.is_row_major_contiguous()
    }

    pub fn is_col_major_contiguous(&self) -> bool {
        self.layout.is_col_major_contiguous()
    }

    // ------------------------------------------------------------------
    // Lenient element access
    // ------------------------------------------------------------------

    /// Read an element by subscripts; negative subscripts address from the
    /// end. Returns `None` for out-of-range subscripts or a wrong subscript
    /// count.
    pub fn get(&self, subscripts: &[isize]) -> Option<B::Elem> {
        let idx = lenient_resolve(&self.layout, subscripts)?;
        Some(self.buffer.get(idx))
    }

    /// Write an element by subscripts; out-of-range writes are ignored.
    pub fn set(&mut self, subscripts: &[isize], value: B::Elem) -> &mut Self {
        if let Some(idx) = lenient_resolve(&self.layout, subscripts) {
            self.buffer.set(idx, value);
        }
        self
    }

    /// Read an element by flattened view index. Rank-0 arrays return their
    /// single element regardless of the index.
    pub fn iget(&self, index: usize) -> Option<B::Elem> {
        if self.ndims() == 0 {
            return Some(self.buffer.get(self.layout.offset()));
        }
        if index >= self.len() {
            return None;
        }
        Some(self.buffer.get(self.layout.view_index_to_buffer_index(index)))
    }

    /// Write an element by flattened view index; out-of-range writes are
    /// ignored. Rank-0 arrays write their single element regardless of the
    /// index.
    pub fn iset(&mut self, index: usize, value: B::Elem) -> &mut Self {
        if self.ndims() == 0 {
            let off = self.layout.offset();
            self.buffer.set(off, value);
            return self;
        }
        if index < self.len() {
            let idx = self.layout.view_index_to_buffer_index(index);
            self.buffer.set(idx, value);
        }
        self
    }

    /// Overwrite every element of the view with a value.
    pub fn fill(&mut self, value: B::Elem) {
        // Infallible for a validated handle layout.
        let _ = kernel::nullary(&mut self.buffer, &self.layout, || value.clone());
    }

    // ------------------------------------------------------------------
    // Views
    // ------------------------------------------------------------------

    /// Immutable view over the whole array.
    pub fn view(&self) -> NdView<'_, B> {
        NdView {
            buffer: &self.buffer,
            layout: self.layout.clone(),
        }
    }

    /// Mutable view over the whole array.
    pub fn view_mut(&mut self) -> NdViewMut<'_, B> {
        NdViewMut {
            buffer: &mut self.buffer,
            layout: self.layout.clone(),
        }
    }

    /// Zero-copy slice view; see [`Layout::slice`].
    pub fn slice(&self, specs: &[AxisSlice]) -> Result<NdView<'_, B>> {
        Ok(NdView {
            buffer: &self.buffer,
            layout: self.layout.slice(specs)?,
        })
    }

    /// Mutable zero-copy slice view.
    pub fn slice_mut(&mut self, specs: &[AxisSlice]) -> Result<NdViewMut<'_, B>> {
        Ok(NdViewMut {
            layout: self.layout.slice(specs)?,
            buffer: &mut self.buffer,
        })
    }

    /// Axis-permuted view.
    pub fn permute(&self, perm: &[usize]) -> Result<NdView<'_, B>> {
        Ok(NdView {
            buffer: &self.buffer,
            layout: self.layout.permute(perm)?,
        })
    }

    /// Axis-reversed view.
    pub fn transpose(&self) -> NdView<'_, B> {
        NdView {
            buffer: &self.buffer,
            layout: self.layout.transpose(),
        }
    }

    /// View with all size-1 dimensions removed.
    pub fn squeeze(&self) -> NdView<'_, B> {
        NdView {
            buffer: &self.buffer,
            layout: self.layout.squeeze(),
        }
    }

    /// View with a size-1 dimension inserted at `axis`.
    pub fn expand_dims(&self, axis: usize) -> Result<NdView<'_, B>> {
        Ok(NdView {
            buffer: &self.buffer,
            layout: self.layout.expand_dims(axis)?,
        })
    }

    /// View broadcast to a target shape; see [`Layout::broadcast_to`].
    pub fn broadcast_to(&self, target: &[usize]) -> Result<NdView<'_, B>> {
        Ok(NdView {
            buffer: &self.buffer,
            layout: self.layout.broadcast_to(target)?,
        })
    }

    /// Zero-copy reshape view; fails with
    /// [`CannotReshapeWithoutCopy`](crate::NdarrayError::CannotReshapeWithoutCopy)
    /// when the layout is not contiguous.
    pub fn reshape(&self, shape: &[usize]) -> Result<NdView<'_, B>> {
        Ok(NdView {
            buffer: &self.buffer,
            layout: self.layout.reshape(shape)?,
        })
    }

    // ------------------------------------------------------------------
    // Materialization
    // ------------------------------------------------------------------

    /// Collect all elements in view order.
    pub fn to_vec(&self) -> Vec<B::Elem> {
        self.view().to_vec()
    }

    /// Copy into a fresh row-major contiguous array with the same shape.
    pub fn to_contiguous(&self) -> NdArray<DenseBuffer<B::Elem>> {
        let data = self.to_vec();
        NdArray {
            buffer: DenseBuffer::from_parts(data, self.dtype()),
            layout: Layout::contiguous(self.shape(), Order::RowMajor),
        }
    }

    /// Reshape by copying: allocate a fresh contiguous buffer of the target
    /// shape in row-major element order, filled by iterating this view in
    /// view order.
    pub fn reshape_copy(&self, shape: &[usize]) -> Result<NdArray<DenseBuffer<B::Elem>>> {
        if numel(shape) != self.len() {
            return Err(NdarrayError::ShapeMismatch(
                self.shape().to_vec(),
                shape.to_vec(),
            ));
        }
        let data = self.to_vec();
        Ok(NdArray {
            buffer: DenseBuffer::from_parts(data, self.dtype()),
            layout: Layout::contiguous(shape, Order::RowMajor),
        })
    }
}

impl<T: Element + Default> NdArray<DenseBuffer<T>> {
    /// Allocate a default-filled array with canonical contiguous layout.
    pub fn zeros(shape: &[usize], order: Order) -> Self {
        Self {
            buffer: DenseBuffer::zeros(numel(shape)),
            layout: Layout::contiguous(shape, order),
        }
    }

    /// Build an array from a flat data vector in canonical layout.
    pub fn from_vec(data: Vec<T>, shape: &[usize], order: Order) -> Result<Self> {
        if data.len() != numel(shape) {
            return Err(NdarrayError::BufferLengthMismatch {
                expected: numel(shape),
                actual: data.len(),
            });
        }
        Ok(Self {
            buffer: DenseBuffer::new(data),
            layout: Layout::contiguous(shape, order),
        })
    }

    /// Build an array by calling `f` with each subscript vector.
    pub fn from_fn(shape: &[usize], order: Order, mut f: impl FnMut(&[usize]) -> T) -> Self {
        let mut out = Self::zeros(shape, order);
        let layout = out.layout.clone();
        let _ = kernel::nullary_indexed(&mut out.buffer, &layout, &mut f);
        out
    }

    /// Zero-dimensional array holding a single value.
    pub fn from_scalar(value: T, order: Order) -> Self {
        Self {
            buffer: DenseBuffer::new(vec![value]),
            layout: Layout::scalar(0, order),
        }
    }
}

impl<T> NdArray<InterleavedBuffer<T>>
where
    T: Copy + Num,
    Complex<T>: Element,
{
    /// Allocate a zero-filled complex array backed by interleaved real
    /// storage.
    pub fn zeros_complex(shape: &[usize], order: Order) -> Self {
        Self {
            buffer: InterleavedBuffer::zeros(numel(shape)),
            layout: Layout::contiguous(shape, order),
        }
    }

    /// Build a complex array from complex values, reinterpreted into
    /// interleaved real storage.
    pub fn from_complex_vec(data: Vec<Complex<T>>, shape: &[usize], order: Order) -> Result<Self>
    where
        T: Pod,
        Complex<T>: Pod,
    {
        if data.len() != numel(shape) {
            return Err(NdarrayError::BufferLengthMismatch {
                expected: numel(shape),
                actual: data.len(),
            });
        }
        Ok(Self {
            buffer: InterleavedBuffer::from_complex(data),
            layout: Layout::contiguous(shape, order),
        })
    }
}

fn lenient_resolve(layout: &Layout, subscripts: &[isize]) -> Option<usize> {
    if subscripts.len() != layout.ndims() {
        return None;
    }
    let mut resolved = Vec::with_capacity(subscripts.len());
    for (&sub, &dim) in subscripts.iter().zip(layout.shape().iter()) {
        resolved.push(normalize_subscript(sub, dim)?);
    }
    Some(layout.subscript_to_buffer_index(&resolved))
}

// ============================================================================
// NdView / NdViewMut
// ============================================================================

/// Immutable borrowed view: a shared buffer reference plus its own layout.
#[derive(Debug)]
pub struct NdView<'a, B> {
    buffer: &'a B,
    layout: Layout,
}

impl<B> Clone for NdView<'_, B> {
    fn clone(&self) -> Self {
        Self {
            buffer: self.buffer,
            layout: self.layout.clone(),
        }
    }
}

impl<'a, B: BufferAccess> NdView<'a, B> {
    /// Couple a borrowed buffer with a layout, validating bounds.
    pub fn new(buffer: &'a B, layout: Layout) -> Result<Self> {
        layout.validate_within(buffer.len())?;
        Ok(Self { buffer, layout })
    }

    #[inline]
    pub fn dtype(&self) -> DType {
        self.buffer.dtype()
    }

    #[inline]
    pub fn shape(&self) -> &[usize] {
        self.layout.shape()
    }

    #[inline]
    pub fn strides(&self) -> &[isize] {
        self.layout.strides()
    }

    #[inline]
    pub fn offset(&self) -> usize {
        self.layout.offset()
    }

    #[inline]
    pub fn ndims(&self) -> usize {
        self.layout.ndims()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.layout.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.layout.is_empty()
    }

    #[inline]
    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    #[inline]
    pub fn data(&self) -> &'a B {
        self.buffer
    }

    /// Lenient subscript read; see [`NdArray::get`].
    pub fn get(&self, subscripts: &[isize]) -> Option<B::Elem> {
        let idx = lenient_resolve(&self.layout, subscripts)?;
        Some(self.buffer.get(idx))
    }

    /// Lenient flattened-index read; see [`NdArray::iget`].
    pub fn iget(&self, index: usize) -> Option<B::Elem> {
        if self.ndims() == 0 {
            return Some(self.buffer.get(self.layout.offset()));
        }
        if index >= self.len() {
            return None;
        }
        Some(self.buffer.get(self.layout.view_index_to_buffer_index(index)))
    }

    /// Collect all elements in view order.
    pub fn to_vec(&self) -> Vec<B::Elem> {
        let n = self.len();
        let mut out = Vec::with_capacity(n);
        if self.ndims() == 0 {
            out.push(self.buffer.get(self.layout.offset()));
            return out;
        }
        for i in 0..n {
            out.push(self.buffer.get(self.layout.view_index_to_buffer_index(i)));
        }
        out
    }

    /// Derived slice view sharing this view's buffer.
    pub fn slice(&self, specs: &[AxisSlice]) -> Result<NdView<'a, B>> {
        Ok(NdView {
            buffer: self.buffer,
            layout: self.layout.slice(specs)?,
        })
    }

    pub fn permute(&self, perm: &[usize]) -> Result<NdView<'a, B>> {
        Ok(NdView {
            buffer: self.buffer,
            layout: self.layout.permute(perm)?,
        })
    }

    pub fn transpose(&self) -> NdView<'a, B> {
        NdView {
            buffer: self.buffer,
            layout: self.layout.transpose(),
        }
    }

    pub fn squeeze(&self) -> NdView<'a, B> {
        NdView {
            buffer: self.buffer,
            layout: self.layout.squeeze(),
        }
    }

    pub fn expand_dims(&self, axis: usize) -> Result<NdView<'a, B>> {
        Ok(NdView {
            buffer: self.buffer,
            layout: self.layout.expand_dims(axis)?,
        })
    }

    pub fn broadcast_to(&self, target: &[usize]) -> Result<NdView<'a, B>> {
        Ok(NdView {
            buffer: self.buffer,
            layout: self.layout.broadcast_to(target)?,
        })
    }

    pub fn reshape(&self, shape: &[usize]) -> Result<NdView<'a, B>> {
        Ok(NdView {
            buffer: self.buffer,
            layout: self.layout.reshape(shape)?,
        })
    }
}

/// Mutable borrowed view.
///
/// Layout transformations consume the view, preventing two mutable views of
/// one buffer from coexisting through the safe API.
#[derive(Debug)]
pub struct NdViewMut<'a, B> {
    buffer: &'a mut B,
    layout: Layout,
}

impl<'a, B: BufferAccess> NdViewMut<'a, B> {
    /// Couple a mutably borrowed buffer with a layout, validating bounds.
    pub fn new(buffer: &'a mut B, layout: Layout) -> Result<Self> {
        layout.validate_within(buffer.len())?;
        Ok(Self { buffer, layout })
    }

    #[inline]
    pub fn dtype(&self) -> DType {
        self.buffer.dtype()
    }

    #[inline]
    pub fn shape(&self) -> &[usize] {
        self.layout.shape()
    }

    #[inline]
    pub fn strides(&self) -> &[isize] {
        self.layout.strides()
    }

    #[inline]
    pub fn offset(&self) -> usize {
        self.layout.offset()
    }

    #[inline]
    pub fn ndims(&self) -> usize {
        self.layout.ndims()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.layout.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.layout.is_empty()
    }

    #[inline]
    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    /// Split into the mutable buffer and the layout, for kernel invocation.
    #[inline]
    pub fn parts_mut(&mut self) -> (&mut B, &Layout) {
        (&mut *self.buffer, &self.layout)
    }

    /// Lenient subscript read.
    pub fn get(&self, subscripts: &[isize]) -> Option<B::Elem> {
        let idx = lenient_resolve(&self.layout, subscripts)?;
        Some(self.buffer.get(idx))
    }

    /// Lenient subscript write; out-of-range writes are ignored.
    pub fn set(&mut self, subscripts: &[isize], value: B::Elem) -> &mut Self {
        if let Some(idx) = lenient_resolve(&self.layout, subscripts) {
            self.buffer.set(idx, value);
        }
        self
    }

    /// Lenient flattened-index write.
    pub fn iset(&mut self, index: usize, value: B::Elem) -> &mut Self {
        if self.ndims() == 0 {
            let off = self.layout.offset();
            self.buffer.set(off, value);
            return self;
        }
        if index < self.len() {
            let idx = self.layout.view_index_to_buffer_index(index);
            self.buffer.set(idx, value);
        }
        self
    }

    /// Overwrite every element of the view with a value.
    pub fn fill(&mut self, value: B::Elem) {
        let (buffer, layout) = self.parts_mut();
        let _ = kernel::nullary(buffer, layout, || value.clone());
    }

    /// Reborrow as an immutable view.
    pub fn as_view(&self) -> NdView<'_, B> {
        NdView {
            buffer: &*self.buffer,
            layout: self.layout.clone(),
        }
    }

    /// Consume into an axis-permuted mutable view.
    pub fn permute(self, perm: &[usize]) -> Result<NdViewMut<'a, B>> {
        Ok(NdViewMut {
            layout: self.layout.permute(perm)?,
            buffer: self.buffer,
        })
    }

    /// Consume into a sliced mutable view.
    pub fn slice(self, specs: &[AxisSlice]) -> Result<NdViewMut<'a, B>> {
        Ok(NdViewMut {
            layout: self.layout.slice(specs)?,
            buffer: self.buffer,
        })
    }

    /// Consume into a broadcast mutable view.
    ///
    /// Broadcast dimensions alias one element across many positions; writes
    /// through them land on the shared element, which is the deliberate
    /// aliasing contract of stride-0 views.
    pub fn broadcast_to(self, target: &[usize]) -> Result<NdViewMut<'a, B>> {
        Ok(NdViewMut {
            layout: self.layout.broadcast_to(target)?,
            buffer: self.buffer,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::slice::SliceRange;

    fn iota(shape: &[usize]) -> NdArray<DenseBuffer<f64>> {
        let n = numel(shape);
        NdArray::from_vec((0..n).map(|x| x as f64).collect(), shape, Order::RowMajor).unwrap()
    }

    #[test]
    fn test_zeros_and_metadata() {
        let a = NdArray::<DenseBuffer<f64>>::zeros(&[2, 3], Order::RowMajor);
        assert_eq!(a.dtype(), DType::Float64);
        assert_eq!(a.shape(), &[2, 3]);
        assert_eq!(a.strides(), &[3, 1]);
        assert_eq!(a.offset(), 0);
        assert_eq!(a.len(), 6);
        assert_eq!(a.byte_length(), Some(48));
        assert!(a.is_row_major_contiguous());
    }

    #[test]
    fn test_from_vec_length_check() {
        let err = NdArray::from_vec(vec![1.0, 2.0], &[3], Order::RowMajor).unwrap_err();
        assert!(matches!(err, NdarrayError::BufferLengthMismatch { .. }));
    }

    #[test]
    fn test_get_set_lenient() {
        let mut a = iota(&[2, 3]);
        assert_eq!(a.get(&[1, 2]), Some(5.0));
        // Negative subscripts address from the end.
        assert_eq!(a.get(&[-1, -1]), Some(5.0));
        assert_eq!(a.get(&[-2, 0]), Some(0.0));
        // Out of bounds reads the sentinel, writes are ignored.
        assert_eq!(a.get(&[2, 0]), None);
        a.set(&[9, 9], 42.0);
        assert_eq!(a.to_vec(), vec![0.0, 1.0, 2.0, 3.0, 4.0, 5.0]);
        // Wrong subscript count is lenient too.
        assert_eq!(a.get(&[0]), None);
    }

    #[test]
    fn test_negative_index_matches_positive() {
        let a = iota(&[5]);
        assert_eq!(a.get(&[-1]), a.get(&[4]));
    }

    #[test]
    fn test_iget_iset() {
        let mut a = iota(&[2, 3]);
        assert_eq!(a.iget(4), Some(4.0));
        assert_eq!(a.iget(6), None);
        a.iset(0, 9.0);
        assert_eq!(a.iget(0), Some(9.0));

        // Strided views go through the general addressing path.
        let rev = a.slice(&[AxisSlice::full(), AxisSlice::range(None, None, -1)]).unwrap();
        assert_eq!(rev.iget(0), Some(2.0));
    }

    #[test]
    fn test_rank0_iget_ignores_index() {
        let a = NdArray::from_scalar(3.5, Order::RowMajor);
        assert_eq!(a.ndims(), 0);
        assert_eq!(a.len(), 1);
        assert_eq!(a.iget(0), Some(3.5));
        assert_eq!(a.iget(100), Some(3.5));
        assert_eq!(a.get(&[]), Some(3.5));
    }

    #[test]
    fn test_from_fn() {
        let a = NdArray::from_fn(&[2, 3], Order::RowMajor, |s| (s[0] * 10 + s[1]) as f64);
        assert_eq!(a.to_vec(), vec![0.0, 1.0, 2.0, 10.0, 11.0, 12.0]);
    }

    #[test]
    fn test_slice_view_values() {
        let a = iota(&[8]);
        let even = a
            .slice(&[AxisSlice::range(Some(0), Some(8), 2)])
            .unwrap();
        assert_eq!(even.shape(), &[4]);
        assert_eq!(even.strides(), &[2]);
        assert_eq!(even.to_vec(), vec![0.0, 2.0, 4.0, 6.0]);

        let rev = a
            .slice(&[AxisSlice::range(Some(7), Some(-1), -1)])
            .unwrap();
        assert_eq!(rev.to_vec(), vec![7.0, 6.0, 5.0, 4.0, 3.0, 2.0, 1.0, 0.0]);
    }

    #[test]
    fn test_view_of_view_composes() {
        let a = iota(&[8]);
        let even = a.slice(&[AxisSlice::range(Some(0), Some(8), 2)]).unwrap();
        let second = even
            .slice(&[AxisSlice::Range(SliceRange::new(Some(1), None, 2))])
            .unwrap();
        assert_eq!(second.to_vec(), vec![2.0, 6.0]);
    }

    #[test]
    fn test_aliasing_visible_through_views() {
        let mut a = iota(&[2, 3]);
        {
            let mut col = a
                .slice_mut(&[AxisSlice::full(), AxisSlice::Index(1)])
                .unwrap();
            col.set(&[0], 100.0);
            col.set(&[1], 200.0);
        }
        // Mutation through the sliced view is visible through the handle.
        assert_eq!(a.get(&[0, 1]), Some(100.0));
        assert_eq!(a.get(&[1, 1]), Some(200.0));
    }

    #[test]
    fn test_broadcast_view_reuses_elements() {
        let a = iota(&[2, 1]);
        let b = a.broadcast_to(&[3, 2, 4]).unwrap();
        assert_eq!(b.shape(), &[3, 2, 4]);
        assert_eq!(b.strides(), &[0, 1, 0]);
        // Each source row is reused 3 * 4 times.
        let vals = b.to_vec();
        assert_eq!(vals.len(), 24);
        assert_eq!(vals.iter().filter(|&&v| v == 0.0).count(), 12);
        assert_eq!(vals.iter().filter(|&&v| v == 1.0).count(), 12);
    }

    #[test]
    fn test_reshape_view_and_copy() {
        let a = iota(&[8]);
        let r = a.reshape(&[2, 4]).unwrap();
        assert_eq!(r.shape(), &[2, 4]);
        assert_eq!(r.get(&[1, 1]), Some(5.0));

        // Strided view cannot reshape without copy.
        let even = a.slice(&[AxisSlice::range(Some(0), Some(8), 2)]).unwrap();
        assert!(matches!(
            even.reshape(&[2, 2]),
            Err(NdarrayError::CannotReshapeWithoutCopy { .. })
        ));

        // Copying reshape succeeds and is contiguous in source view order.
        let owned = NdArray::from_parts(
            DenseBuffer::new(even.to_vec()),
            Layout::contiguous(&[4], Order::RowMajor),
        )
        .unwrap();
        let r = owned.reshape_copy(&[2, 2]).unwrap();
        assert!(r.is_row_major_contiguous());
        assert_eq!(r.to_vec(), vec![0.0, 2.0, 4.0, 6.0]);
    }

    #[test]
    fn test_reshape_copy_of_strided_view_directly() {
        let a = iota(&[8]);
        // Copying path straight from a non-contiguous handle.
        let arr = NdArray::from_parts(
            DenseBuffer::new(a.to_vec()),
            Layout::new(vec![4], vec![2], 0, Order::RowMajor).unwrap(),
        )
        .unwrap();
        let r = arr.reshape_copy(&[2, 2]).unwrap();
        assert_eq!(r.to_vec(), vec![0.0, 2.0, 4.0, 6.0]);
        assert_eq!(r.strides(), &[2, 1]);
    }

    #[test]
    fn test_from_parts_validates_bounds() {
        let buf = DenseBuffer::new(vec![0.0; 5]);
        let layout = Layout::contiguous(&[2, 3], Order::RowMajor);
        assert!(matches!(
            NdArray::from_parts(buf, layout),
            Err(NdarrayError::OutOfBounds { .. })
        ));
    }

    #[test]
    fn test_fill() {
        let mut a = iota(&[2, 2]);
        a.fill(1.5);
        assert_eq!(a.to_vec(), vec![1.5; 4]);
    }

    #[test]
    fn test_complex_array_round_trip() {
        use num_complex::Complex64;
        let vals = vec![
            Complex64::new(1.0, 2.0),
            Complex64::new(3.0, 4.0),
            Complex64::new(5.0, 6.0),
            Complex64::new(7.0, 8.0),
        ];
        let mut a =
            NdArray::from_complex_vec(vals.clone(), &[2, 2], Order::RowMajor).unwrap();
        assert_eq!(a.dtype(), DType::Complex128);
        assert_eq!(a.byte_length(), Some(64));
        assert_eq!(a.get(&[0, 1]), Some(vals[1]));
        a.set(&[1, 0], Complex64::new(-1.0, -2.0));
        assert_eq!(a.get(&[1, 0]), Some(Complex64::new(-1.0, -2.0)));
        // The interleaved backing stores (re, im) pairs.
        assert_eq!(&a.data().as_real_slice()[4..6], &[-1.0, -2.0]);
    }

    #[test]
    fn test_generic_array() {
        let buf = DenseBuffer::generic(vec!["a".to_string(), "b".to_string(), "c".to_string()]);
        let a = NdArray::from_parts(buf, Layout::contiguous(&[3], Order::RowMajor)).unwrap();
        assert_eq!(a.dtype(), DType::Generic);
        assert_eq!(a.byte_length(), None);
        assert_eq!(a.get(&[-1]), Some("c".to_string()));
    }

    #[test]
    fn test_col_major_view_order() {
        let a = NdArray::from_vec(
            vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0],
            &[2, 3],
            Order::ColMajor,
        )
        .unwrap();
        assert_eq!(a.strides(), &[1, 2]);
        assert_eq!(a.get(&[1, 0]), Some(2.0));
        assert_eq!(a.get(&[0, 1]), Some(3.0));
        // View order is column-major: subscripts advance first dim fastest.
        assert_eq!(a.iget(1), Some(2.0));
    }
}
