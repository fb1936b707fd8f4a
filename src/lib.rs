//! Strided multidimensional array engine.
//!
//! This crate interprets flat memory buffers as n-dimensional arrays with
//! arbitrary shape, strides, offset, and iteration order, and provides the
//! machinery around that data model:
//!
//! # Core Types
//!
//! - [`DType`] / [`Element`]: closed data type tags and their compile-time
//!   binding to Rust element types
//! - [`BufferAccess`] with [`DenseBuffer`] (direct indexing) and
//!   [`InterleavedBuffer`] (complex elements over interleaved real slots)
//! - [`Layout`]: the `{shape, strides, offset, order}` descriptor and all
//!   subscript/view-index/buffer-index arithmetic
//! - [`NdArray`] / [`NdView`] / [`NdViewMut`]: owned handles and zero-copy
//!   borrowed views
//!
//! # View Constructors
//!
//! Slicing ([`AxisSlice`]), reshape, permute/transpose, squeeze,
//! expand-dims, and broadcast-to-shape all derive a new [`Layout`] over the
//! same buffer; explicit copies go through
//! [`NdArray::reshape_copy`]/[`NdArray::to_contiguous`].
//!
//! # Broadcasting and Kernels
//!
//! - [`broadcast_shapes`]: n-ary shape resolution
//! - [`kernel`]: nullary through quinary element-wise runners with
//!   planner-selected loop nesting and contiguous fast paths
//! - [`map_into`], [`zip_map2_into`], [`add`], [`axpy`], …: broadcast-aware
//!   wrappers over the runners
//!
//! # Example
//!
//! ```rust
//! use strided_ndarray::{AxisSlice, NdArray, Order};
//!
//! let x = NdArray::from_vec(vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0], &[2, 3], Order::RowMajor)
//!     .unwrap();
//! assert_eq!(x.get(&[1, 2]), Some(6.0));
//! assert_eq!(x.get(&[-1, -1]), Some(6.0));
//!
//! // Zero-copy transpose and slice.
//! let t = x.transpose();
//! assert_eq!(t.shape(), &[3, 2]);
//! let row = x.slice(&[AxisSlice::Index(0), AxisSlice::full()]).unwrap();
//! assert_eq!(row.to_vec(), vec![1.0, 2.0, 3.0]);
//! ```
//!
//! # Broadcasting Example
//!
//! ```rust
//! use strided_ndarray::{add, DenseBuffer, NdArray, Order};
//!
//! let a = NdArray::from_vec(vec![1.0, 2.0], &[2, 1], Order::RowMajor).unwrap();
//! let b = NdArray::from_vec(vec![10.0, 20.0, 30.0], &[1, 3], Order::RowMajor).unwrap();
//! let mut out = NdArray::<DenseBuffer<f64>>::zeros(&[2, 3], Order::RowMajor);
//!
//! add(&a.view(), &b.view(), &mut out.view_mut()).unwrap();
//! assert_eq!(out.to_vec(), vec![11.0, 21.0, 31.0, 12.0, 22.0, 32.0]);
//! ```

mod array;
mod broadcast;
mod buffer;
mod dtype;
mod index;
pub mod kernel;
mod layout;
mod ops;
mod order;
mod slice;
mod transform;

// ============================================================================
// Data model
// ============================================================================
pub use array::{NdArray, NdView, NdViewMut};
pub use buffer::{BufferAccess, DenseBuffer, InterleavedBuffer};
pub use dtype::{DType, Element};

// ============================================================================
// Layout and index arithmetic
// ============================================================================
pub use index::{clamp_index, normalize_subscript, resolve_index, wrap_index, IndexMode};
pub use layout::{
    contiguous_strides, iteration_order, numel, strides_offset, strides_order, Layout, Order,
    StrideOrder,
};
pub use slice::{AxisSlice, SliceRange};

// ============================================================================
// Broadcasting and high-level operations
// ============================================================================
pub use broadcast::broadcast_shapes;
pub use kernel::MAX_SPECIALIZED_RANK;
pub use ops::{add, axpy, copy_into, fill, map_into, mul, zip_map2_into, zip_map3_into};

// ============================================================================
// Error types
// ============================================================================

/// Errors that can occur during layout construction, view derivation, or
/// kernel invocation.
#[derive(Debug, thiserror::Error)]
pub enum NdarrayError {
    /// Shape and strides disagree in rank.
    #[error("stride and shape length mismatch")]
    StrideLengthMismatch,

    /// Two rank-sensitive arguments disagree.
    #[error("rank mismatch: {0} vs {1}")]
    RankMismatch(usize, usize),

    /// Shapes disagree where they were required to match exactly.
    #[error("shape mismatch: {0:?} vs {1:?}")]
    ShapeMismatch(Vec<usize>, Vec<usize>),

    /// Axis index invalid for the given rank.
    #[error("invalid axis {axis} for rank {rank}")]
    InvalidAxis { axis: usize, rank: usize },

    /// Malformed slice specification (zero step).
    #[error("invalid slice for dim {dim}: step must be nonzero")]
    InvalidSlice { dim: usize },

    /// Shapes cannot be broadcast to a common shape.
    #[error("shapes are not broadcast compatible at dim {dim}: {a} vs {b}")]
    IncompatibleShapes { dim: usize, a: usize, b: usize },

    /// A view-only reshape was requested for a non-contiguous layout.
    #[error("cannot reshape {from:?} into {to:?} without copying")]
    CannotReshapeWithoutCopy { from: Vec<usize>, to: Vec<usize> },

    /// Unrecognized data type tag.
    #[error("unsupported data type: {0}")]
    UnsupportedDType(String),

    /// Unrecognized memory order tag.
    #[error("unsupported memory order: {0}")]
    UnsupportedOrder(String),

    /// Strict-mode index outside its admissible interval.
    #[error("index {idx} out of bounds for size {size}")]
    IndexOutOfBounds { idx: isize, size: usize },

    /// A layout addresses buffer indices outside the allocated region.
    #[error("view addresses buffer indices [{min}, {max}] outside [0, {len})")]
    OutOfBounds { min: isize, max: isize, len: usize },

    /// A data vector does not hold the number of elements a shape requires.
    #[error("buffer of length {actual} incompatible with shape requiring {expected} elements")]
    BufferLengthMismatch { expected: usize, actual: usize },

    /// Integer overflow while computing a buffer index bound.
    #[error("offset overflow while computing buffer index")]
    OffsetOverflow,
}

/// Result type for strided ndarray operations.
pub type Result<T> = std::result::Result<T, NdarrayError>;
