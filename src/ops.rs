//! Broadcast-aware high-level operations.
//!
//! These wrappers resolve broadcasting between operands, promote each input
//! layout to the destination shape (broadcast dimensions become stride 0),
//! and hand the resolved `(buffer, layout)` pairs to the kernel runners.

use num_traits::Num;

use crate::array::{NdView, NdViewMut};
use crate::broadcast::broadcast_shapes;
use crate::buffer::BufferAccess;
use crate::kernel;
use crate::{NdarrayError, Result};

/// Apply `f` element-wise from `src` into `dest`, broadcasting `src` to the
/// destination shape as needed.
pub fn map_into<X, Y, F>(src: &NdView<'_, X>, dest: &mut NdViewMut<'_, Y>, f: F) -> Result<()>
where
    X: BufferAccess,
    Y: BufferAccess,
    F: FnMut(X::Elem) -> Y::Elem,
{
    let dest_shape = dest.shape().to_vec();
    let lx = src.layout().broadcast_to(&dest_shape)?;
    let buffer = src.data();
    let (out, lo) = dest.parts_mut();
    kernel::unary(buffer, &lx, out, lo, f)
}

/// Copy elements from `src` into `dest` with broadcasting.
pub fn copy_into<T, X, Y>(src: &NdView<'_, X>, dest: &mut NdViewMut<'_, Y>) -> Result<()>
where
    T: Clone,
    X: BufferAccess<Elem = T>,
    Y: BufferAccess<Elem = T>,
{
    map_into(src, dest, |v| v)
}

/// Overwrite every element of `dest` with a value.
pub fn fill<Y>(dest: &mut NdViewMut<'_, Y>, value: Y::Elem) -> Result<()>
where
    Y: BufferAccess,
{
    let (out, lo) = dest.parts_mut();
    kernel::nullary(out, lo, || value.clone())
}

/// Binary element-wise operation with broadcasting: `dest = f(a, b)`.
///
/// The broadcast of the two input shapes must equal the destination shape
/// exactly; a disagreement is reported before any element is touched.
pub fn zip_map2_into<A, B, Y, F>(
    a: &NdView<'_, A>,
    b: &NdView<'_, B>,
    dest: &mut NdViewMut<'_, Y>,
    f: F,
) -> Result<()>
where
    A: BufferAccess,
    B: BufferAccess,
    Y: BufferAccess,
    F: FnMut(A::Elem, B::Elem) -> Y::Elem,
{
    let out_shape = broadcast_shapes(&[a.shape(), b.shape()])?;
    let dest_shape = dest.shape().to_vec();
    if out_shape != dest_shape {
        return Err(NdarrayError::ShapeMismatch(out_shape, dest_shape));
    }
    let la = a.layout().broadcast_to(&dest_shape)?;
    let lb = b.layout().broadcast_to(&dest_shape)?;
    let (ab, bb) = (a.data(), b.data());
    let (out, lo) = dest.parts_mut();
    kernel::binary(ab, &la, bb, &lb, out, lo, f)
}

/// Ternary element-wise operation with broadcasting: `dest = f(a, b, c)`.
pub fn zip_map3_into<A, B, C, Y, F>(
    a: &NdView<'_, A>,
    b: &NdView<'_, B>,
    c: &NdView<'_, C>,
    dest: &mut NdViewMut<'_, Y>,
    f: F,
) -> Result<()>
where
    A: BufferAccess,
    B: BufferAccess,
    C: BufferAccess,
    Y: BufferAccess,
    F: FnMut(A::Elem, B::Elem, C::Elem) -> Y::Elem,
{
    let out_shape = broadcast_shapes(&[a.shape(), b.shape(), c.shape()])?;
    let dest_shape = dest.shape().to_vec();
    if out_shape != dest_shape {
        return Err(NdarrayError::ShapeMismatch(out_shape, dest_shape));
    }
    let la = a.layout().broadcast_to(&dest_shape)?;
    let lb = b.layout().broadcast_to(&dest_shape)?;
    let lc = c.layout().broadcast_to(&dest_shape)?;
    let (ab, bb, cb) = (a.data(), b.data(), c.data());
    let (out, lo) = dest.parts_mut();
    kernel::ternary(ab, &la, bb, &lb, cb, &lc, out, lo, f)
}

/// Element-wise addition with broadcasting.
pub fn add<T, A, B, Y>(
    a: &NdView<'_, A>,
    b: &NdView<'_, B>,
    dest: &mut NdViewMut<'_, Y>,
) -> Result<()>
where
    T: Num + Clone,
    A: BufferAccess<Elem = T>,
    B: BufferAccess<Elem = T>,
    Y: BufferAccess<Elem = T>,
{
    zip_map2_into(a, b, dest, |x, y| x + y)
}

/// Element-wise multiplication with broadcasting.
pub fn mul<T, A, B, Y>(
    a: &NdView<'_, A>,
    b: &NdView<'_, B>,
    dest: &mut NdViewMut<'_, Y>,
) -> Result<()>
where
    T: Num + Clone,
    A: BufferAccess<Elem = T>,
    B: BufferAccess<Elem = T>,
    Y: BufferAccess<Elem = T>,
{
    zip_map2_into(a, b, dest, |x, y| x * y)
}

/// In-place scaled accumulation: `y = alpha * x + y`.
///
/// The destination is both read and written, the deliberate aliasing case
/// of in-place kernel semantics.
pub fn axpy<T, X, Y>(alpha: T, x: &NdView<'_, X>, y: &mut NdViewMut<'_, Y>) -> Result<()>
where
    T: Num + Clone,
    X: BufferAccess<Elem = T>,
    Y: BufferAccess<Elem = T>,
{
    let dest_shape = y.shape().to_vec();
    let lx = x.layout().broadcast_to(&dest_shape)?;
    let xb = x.data();
    let (out, lo) = y.parts_mut();
    kernel::unary_update(xb, &lx, out, lo, |cur, xv| alpha.clone() * xv + cur)
}
