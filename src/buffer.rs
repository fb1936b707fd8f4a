//! Buffer abstraction: homogeneous linear element stores.
//!
//! Every buffer is accessed through the [`BufferAccess`] capability, which is
//! resolved once at construction and never re-dispatched per element:
//!
//! - [`DenseBuffer`]: direct indexing into a `Vec<T>`. Covers numeric,
//!   boolean, and generic (arbitrary `T: Clone`) elements.
//! - [`InterleavedBuffer`]: logical elements are `Complex<T>` stored as
//!   adjacent real slots `(2*i, 2*i + 1)` in a real-typed backing vector.
//!   The accessor pair packs and unpacks; the real backing slice stays
//!   reachable for strided collaborators that operate on raw real data.
//!
//! The accessors do not bounds-check beyond the underlying slice indexing;
//! layout validation is the caller's responsibility, keeping the hot path
//! branch-free.

use bytemuck::Pod;
use num_complex::Complex;
use num_traits::{Num, Zero};

use crate::dtype::{DType, Element};

/// Capability for reading and writing elements of a linear store.
///
/// `get`/`set` address *logical* elements; for interleaved complex storage a
/// logical index spans two backing slots.
pub trait BufferAccess {
    /// The logical element type.
    type Elem: Clone;

    /// Number of logical elements in the buffer.
    fn len(&self) -> usize;

    /// Whether the buffer holds no elements.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Read the element at a logical index.
    fn get(&self, index: usize) -> Self::Elem;

    /// Write the element at a logical index.
    fn set(&mut self, index: usize, value: Self::Elem);

    /// The data type tag bound to this buffer.
    fn dtype(&self) -> DType;
}

// ============================================================================
// DenseBuffer
// ============================================================================

/// Directly indexed element store.
#[derive(Debug, Clone, PartialEq)]
pub struct DenseBuffer<T> {
    data: Vec<T>,
    dtype: DType,
}

impl<T: Element> DenseBuffer<T> {
    /// Create a buffer from existing data, binding the element's tag.
    pub fn new(data: Vec<T>) -> Self {
        Self {
            data,
            dtype: T::DTYPE,
        }
    }

    /// Create a buffer of `len` default-valued elements.
    pub fn zeros(len: usize) -> Self
    where
        T: Default,
    {
        Self {
            data: vec![T::default(); len],
            dtype: T::DTYPE,
        }
    }
}

impl<T: Clone> DenseBuffer<T> {
    /// Create a buffer with an explicit data type tag.
    ///
    /// Used for [`DType::Generic`] containers whose element type carries no
    /// intrinsic tag, and for copies that must preserve a source tag.
    pub fn from_parts(data: Vec<T>, dtype: DType) -> Self {
        Self { data, dtype }
    }

    /// Create a generic (boxed-value) buffer from arbitrary cloneable data.
    pub fn generic(data: Vec<T>) -> Self {
        Self {
            data,
            dtype: DType::Generic,
        }
    }

    /// Borrow the underlying elements.
    #[inline]
    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    /// Mutably borrow the underlying elements.
    #[inline]
    pub fn as_mut_slice(&mut self) -> &mut [T] {
        &mut self.data
    }

    /// Consume the buffer, returning the underlying storage.
    pub fn into_vec(self) -> Vec<T> {
        self.data
    }
}

impl<T: Clone> BufferAccess for DenseBuffer<T> {
    type Elem = T;

    #[inline]
    fn len(&self) -> usize {
        self.data.len()
    }

    #[inline]
    fn get(&self, index: usize) -> T {
        self.data[index].clone()
    }

    #[inline]
    fn set(&mut self, index: usize, value: T) {
        self.data[index] = value;
    }

    #[inline]
    fn dtype(&self) -> DType {
        self.dtype
    }
}

// ============================================================================
// InterleavedBuffer
// ============================================================================

/// Complex element store backed by interleaved real slots.
///
/// A logical element `i` occupies backing slots `2*i` (real part) and
/// `2*i + 1` (imaginary part).
#[derive(Debug, Clone, PartialEq)]
pub struct InterleavedBuffer<T> {
    data: Vec<T>,
}

impl<T> InterleavedBuffer<T>
where
    T: Copy + Num,
    Complex<T>: Element,
{
    /// Create a buffer of `len` zero-valued complex elements.
    pub fn zeros(len: usize) -> Self {
        Self {
            data: vec![T::zero(); len * 2],
        }
    }

    /// Create a buffer from an interleaved real backing vector.
    ///
    /// The vector length must be even: slot pairs `(2*i, 2*i + 1)` form the
    /// logical elements.
    pub fn from_real(data: Vec<T>) -> Self {
        assert!(
            data.len() % 2 == 0,
            "interleaved backing length must be even"
        );
        Self { data }
    }

    /// Create a buffer from complex values, reinterpreting into interleaved
    /// real storage.
    pub fn from_complex(values: Vec<Complex<T>>) -> Self
    where
        T: Pod,
        Complex<T>: Pod,
    {
        let data: Vec<T> = bytemuck::cast_slice(&values).to_vec();
        Self { data }
    }

    /// Borrow the interleaved real backing slice.
    ///
    /// Strided collaborators that consume `(buffer, stride, offset)` tuples
    /// of real scalars address this slice directly, with indices in backing
    /// slots rather than logical elements.
    #[inline]
    pub fn as_real_slice(&self) -> &[T] {
        &self.data
    }

    /// Mutably borrow the interleaved real backing slice.
    #[inline]
    pub fn as_real_mut_slice(&mut self) -> &mut [T] {
        &mut self.data
    }
}

impl<T> BufferAccess for InterleavedBuffer<T>
where
    T: Copy + Num,
    Complex<T>: Element,
{
    type Elem = Complex<T>;

    #[inline]
    fn len(&self) -> usize {
        self.data.len() / 2
    }

    #[inline]
    fn get(&self, index: usize) -> Complex<T> {
        let j = index * 2;
        Complex::new(self.data[j], self.data[j + 1])
    }

    #[inline]
    fn set(&mut self, index: usize, value: Complex<T>) {
        let j = index * 2;
        self.data[j] = value.re;
        self.data[j + 1] = value.im;
    }

    #[inline]
    fn dtype(&self) -> DType {
        <Complex<T> as Element>::DTYPE
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use num_complex::Complex64;

    #[test]
    fn test_dense_buffer_get_set() {
        let mut buf = DenseBuffer::new(vec![1.0f64, 2.0, 3.0]);
        assert_eq!(buf.len(), 3);
        assert_eq!(buf.dtype(), DType::Float64);
        assert_eq!(buf.get(1), 2.0);
        buf.set(1, 9.0);
        assert_eq!(buf.get(1), 9.0);
    }

    #[test]
    fn test_dense_buffer_zeros() {
        let buf = DenseBuffer::<i32>::zeros(4);
        assert_eq!(buf.as_slice(), &[0, 0, 0, 0]);
        assert_eq!(buf.dtype(), DType::Int32);
    }

    #[test]
    fn test_dense_buffer_generic() {
        let mut buf = DenseBuffer::generic(vec!["a".to_string(), "b".to_string()]);
        assert_eq!(buf.dtype(), DType::Generic);
        assert_eq!(buf.get(0), "a");
        buf.set(0, "c".to_string());
        assert_eq!(buf.get(0), "c");
    }

    #[test]
    fn test_interleaved_buffer_packs_slot_pairs() {
        let buf = InterleavedBuffer::from_real(vec![1.0f64, 2.0, 3.0, 4.0]);
        assert_eq!(buf.len(), 2);
        assert_eq!(buf.dtype(), DType::Complex128);
        assert_eq!(buf.get(0), Complex64::new(1.0, 2.0));
        assert_eq!(buf.get(1), Complex64::new(3.0, 4.0));
    }

    #[test]
    fn test_interleaved_buffer_set_unpacks() {
        let mut buf = InterleavedBuffer::<f64>::zeros(2);
        buf.set(1, Complex64::new(5.0, -6.0));
        assert_eq!(buf.as_real_slice(), &[0.0, 0.0, 5.0, -6.0]);
    }

    #[test]
    fn test_interleaved_from_complex_matches_pod_cast() {
        let values = vec![Complex64::new(1.0, 2.0), Complex64::new(3.0, 4.0)];
        let buf = InterleavedBuffer::from_complex(values.clone());
        let cast: &[f64] = bytemuck::cast_slice(&values);
        assert_eq!(buf.as_real_slice(), cast);
        assert_eq!(buf.get(1), values[1]);
    }

    #[test]
    fn test_interleaved_complex64_dtype() {
        let buf = InterleavedBuffer::<f32>::zeros(1);
        assert_eq!(buf.dtype(), DType::Complex64);
    }
}
