//! Element-wise kernel runners.
//!
//! A runner walks one output and zero or more input layouts in lock-step,
//! calling a caller-supplied per-element function and writing the result
//! through the output's accessor. Participants may have wildly different
//! strides and offsets (broadcast dimensions arrive as stride 0), so each
//! participant's buffer index is tracked independently.
//!
//! Traversal strategy:
//!
//! - When every participant admits flat addressing (shared order tag,
//!   contiguous layout), the runner iterates the flattened index `0..len`
//!   with O(1) per-participant addressing.
//! - Otherwise dimensions are reordered by the planner
//!   ([`loop_order`](crate::order)) and walked with specialized nested loops
//!   for ranks 1–3, falling back to an odometer (carry-propagating counter)
//!   walker for rank ≥ 4.
//!
//! Runners assume their layouts were validated by the view constructors and
//! the broadcasting resolver: shapes are checked once at entry, and element
//! addressing inside the loops is unchecked beyond debug assertions.

use crate::buffer::BufferAccess;
use crate::layout::{Layout, Order};
use crate::order::{flat_signs, loop_order};
use crate::{NdarrayError, Result};

/// Ranks with hand-specialized nested loops; higher ranks use the odometer.
pub const MAX_SPECIALIZED_RANK: usize = 3;

fn ensure_same_shape(out: &Layout, input: &Layout) -> Result<()> {
    if out.shape() != input.shape() {
        return Err(NdarrayError::ShapeMismatch(
            out.shape().to_vec(),
            input.shape().to_vec(),
        ));
    }
    Ok(())
}

// ============================================================================
// Planned walking
// ============================================================================

/// Reorder dims and per-participant strides so index 0 is the innermost axis.
fn ordered_dims(shape: &[usize], strides_list: &[&[isize]]) -> (Vec<usize>, Vec<Vec<isize>>) {
    let order = loop_order(shape, strides_list, Some(0));
    let dims: Vec<usize> = order.iter().map(|&d| shape[d]).collect();
    let strides: Vec<Vec<isize>> = strides_list
        .iter()
        .map(|s| order.iter().map(|&d| s[d]).collect())
        .collect();
    (dims, strides)
}

/// Walk all positions, invoking `f(offsets, len, inner_strides)` once per
/// innermost run. `offsets` carries one buffer offset per participant; the
/// callback advances its own cursors and must not mutate `offsets`.
fn walk<F>(dims: &[usize], strides: &[Vec<isize>], offsets: &mut [isize], f: &mut F)
where
    F: FnMut(&[isize], usize, &[isize]),
{
    match dims.len() {
        1 => walk_1d(dims, strides, offsets, f),
        2 => walk_2d(dims, strides, offsets, f),
        3 => walk_3d(dims, strides, offsets, f),
        _ => walk_nd(dims, strides, offsets, f),
    }
}

#[inline]
fn inner_strides(strides: &[Vec<isize>]) -> Vec<isize> {
    strides.iter().map(|s| s[0]).collect()
}

fn walk_1d<F>(dims: &[usize], strides: &[Vec<isize>], offsets: &mut [isize], f: &mut F)
where
    F: FnMut(&[isize], usize, &[isize]),
{
    let inner = inner_strides(strides);
    f(offsets, dims[0], &inner);
}

fn walk_2d<F>(dims: &[usize], strides: &[Vec<isize>], offsets: &mut [isize], f: &mut F)
where
    F: FnMut(&[isize], usize, &[isize]),
{
    let (d0, d1) = (dims[0], dims[1]);
    let inner = inner_strides(strides);
    for _ in 0..d1 {
        f(offsets, d0, &inner);
        for (o, s) in offsets.iter_mut().zip(strides.iter()) {
            *o += s[1];
        }
    }
    for (o, s) in offsets.iter_mut().zip(strides.iter()) {
        *o -= d1 as isize * s[1];
    }
}

fn walk_3d<F>(dims: &[usize], strides: &[Vec<isize>], offsets: &mut [isize], f: &mut F)
where
    F: FnMut(&[isize], usize, &[isize]),
{
    let (d0, d1, d2) = (dims[0], dims[1], dims[2]);
    let inner = inner_strides(strides);
    for _ in 0..d2 {
        for _ in 0..d1 {
            f(offsets, d0, &inner);
            for (o, s) in offsets.iter_mut().zip(strides.iter()) {
                *o += s[1];
            }
        }
        for (o, s) in offsets.iter_mut().zip(strides.iter()) {
            *o -= d1 as isize * s[1];
            *o += s[2];
        }
    }
    for (o, s) in offsets.iter_mut().zip(strides.iter()) {
        *o -= d2 as isize * s[2];
    }
}

/// Rank ≥ 4: odometer walker. The innermost run is dimension 0; outer
/// dimensions increment with carry propagation over an explicit counter.
fn walk_nd<F>(dims: &[usize], strides: &[Vec<isize>], offsets: &mut [isize], f: &mut F)
where
    F: FnMut(&[isize], usize, &[isize]),
{
    let rank = dims.len();
    debug_assert!(rank > MAX_SPECIALIZED_RANK);
    let d0 = dims[0];
    let inner = inner_strides(strides);
    let mut idx = vec![0usize; rank];
    loop {
        f(offsets, d0, &inner);
        let mut level = 1usize;
        loop {
            for (o, s) in offsets.iter_mut().zip(strides.iter()) {
                *o += s[level];
            }
            idx[level] += 1;
            if idx[level] < dims[level] {
                break;
            }
            idx[level] = 0;
            for (o, s) in offsets.iter_mut().zip(strides.iter()) {
                *o -= dims[level] as isize * s[level];
            }
            level += 1;
            if level == rank {
                return;
            }
        }
    }
}

// ============================================================================
// View-order subscript walking (for indexed variants)
// ============================================================================

/// Walk subscripts in view order (the layouts' own flattening order),
/// invoking `f(subscripts, offsets)` per position. All layouts must share
/// the output's order tag for subscripts to be meaningful; traversal order
/// here is fixed by semantics, not planned.
fn walk_subscripts<F>(shape: &[usize], layouts: &[&Layout], order: Order, mut f: F)
where
    F: FnMut(&[usize], &[isize]),
{
    let rank = shape.len();
    let total = crate::layout::numel(shape);
    let mut subs = vec![0usize; rank];
    let mut offsets: Vec<isize> = layouts.iter().map(|l| l.offset() as isize).collect();
    for _ in 0..total {
        f(&subs, &offsets);
        match order {
            Order::RowMajor => {
                for d in (0..rank).rev() {
                    subs[d] += 1;
                    for (o, l) in offsets.iter_mut().zip(layouts.iter()) {
                        *o += l.strides()[d];
                    }
                    if subs[d] < shape[d] {
                        break;
                    }
                    subs[d] = 0;
                    for (o, l) in offsets.iter_mut().zip(layouts.iter()) {
                        *o -= shape[d] as isize * l.strides()[d];
                    }
                }
            }
            Order::ColMajor => {
                for d in 0..rank {
                    subs[d] += 1;
                    for (o, l) in offsets.iter_mut().zip(layouts.iter()) {
                        *o += l.strides()[d];
                    }
                    if subs[d] < shape[d] {
                        break;
                    }
                    subs[d] = 0;
                    for (o, l) in offsets.iter_mut().zip(layouts.iter()) {
                        *o -= shape[d] as isize * l.strides()[d];
                    }
                }
            }
        }
    }
}

// ============================================================================
// Nullary
// ============================================================================

/// Fill the output by calling `f()` once per element.
pub fn nullary<Y, F>(out: &mut Y, lo: &Layout, mut f: F) -> Result<()>
where
    Y: BufferAccess,
    F: FnMut() -> Y::Elem,
{
    let n = lo.len();
    if n == 0 {
        return Ok(());
    }
    if lo.ndims() == 0 {
        out.set(lo.offset(), f());
        return Ok(());
    }
    if let Some(signs) = flat_signs(&[lo]) {
        let oo = lo.offset() as isize;
        let sign = signs[0] as isize;
        for v in 0..n as isize {
            out.set((oo + sign * v) as usize, f());
        }
        return Ok(());
    }
    let (dims, strides) = ordered_dims(lo.shape(), &[lo.strides()]);
    let mut offsets = [lo.offset() as isize];
    walk(&dims, &strides, &mut offsets, &mut |offs, len, inner| {
        let mut py = offs[0];
        for _ in 0..len {
            out.set(py as usize, f());
            py += inner[0];
        }
    });
    Ok(())
}

/// Fill the output by calling `f(&subscripts)` once per element, in view
/// order.
pub fn nullary_indexed<Y, F>(out: &mut Y, lo: &Layout, mut f: F) -> Result<()>
where
    Y: BufferAccess,
    F: FnMut(&[usize]) -> Y::Elem,
{
    if lo.is_empty() {
        return Ok(());
    }
    if lo.ndims() == 0 {
        out.set(lo.offset(), f(&[]));
        return Ok(());
    }
    let order = lo.order();
    walk_subscripts(lo.shape(), &[lo], order, |subs, offs| {
        out.set(offs[0] as usize, f(subs));
    });
    Ok(())
}

// ============================================================================
// Unary
// ============================================================================

/// Apply `f` to each element of `x`, writing into `out`.
pub fn unary<X, Y, F>(x: &X, lx: &Layout, out: &mut Y, lo: &Layout, mut f: F) -> Result<()>
where
    X: BufferAccess,
    Y: BufferAccess,
    F: FnMut(X::Elem) -> Y::Elem,
{
    ensure_same_shape(lo, lx)?;
    let n = lo.len();
    if n == 0 {
        return Ok(());
    }
    if lo.ndims() == 0 {
        out.set(lo.offset(), f(x.get(lx.offset())));
        return Ok(());
    }
    if let Some(signs) = flat_signs(&[lo, lx]) {
        let (oo, ox) = (lo.offset() as isize, lx.offset() as isize);
        let (so, sx) = (signs[0] as isize, signs[1] as isize);
        for v in 0..n as isize {
            out.set((oo + so * v) as usize, f(x.get((ox + sx * v) as usize)));
        }
        return Ok(());
    }
    let (dims, strides) = ordered_dims(lo.shape(), &[lo.strides(), lx.strides()]);
    let mut offsets = [lo.offset() as isize, lx.offset() as isize];
    walk(&dims, &strides, &mut offsets, &mut |offs, len, inner| {
        let (mut py, mut px) = (offs[0], offs[1]);
        for _ in 0..len {
            out.set(py as usize, f(x.get(px as usize)));
            py += inner[0];
            px += inner[1];
        }
    });
    Ok(())
}

/// Unary runner passing the current subscripts alongside the element.
///
/// Walks in view order so the subscript vector matches the output's
/// flattening.
pub fn unary_indexed<X, Y, F>(x: &X, lx: &Layout, out: &mut Y, lo: &Layout, mut f: F) -> Result<()>
where
    X: BufferAccess,
    Y: BufferAccess,
    F: FnMut(&[usize], X::Elem) -> Y::Elem,
{
    ensure_same_shape(lo, lx)?;
    if lo.is_empty() {
        return Ok(());
    }
    if lo.ndims() == 0 {
        out.set(lo.offset(), f(&[], x.get(lx.offset())));
        return Ok(());
    }
    walk_subscripts(lo.shape(), &[lo, lx], lo.order(), |subs, offs| {
        out.set(offs[0] as usize, f(subs, x.get(offs[1] as usize)));
    });
    Ok(())
}

/// Unary runner with a skip sentinel: when `f` returns `None` the output
/// element is left unmodified.
pub fn unary_filtered<X, Y, F>(x: &X, lx: &Layout, out: &mut Y, lo: &Layout, mut f: F) -> Result<()>
where
    X: BufferAccess,
    Y: BufferAccess,
    F: FnMut(X::Elem) -> Option<Y::Elem>,
{
    ensure_same_shape(lo, lx)?;
    let n = lo.len();
    if n == 0 {
        return Ok(());
    }
    if lo.ndims() == 0 {
        if let Some(v) = f(x.get(lx.offset())) {
            out.set(lo.offset(), v);
        }
        return Ok(());
    }
    let (dims, strides) = ordered_dims(lo.shape(), &[lo.strides(), lx.strides()]);
    let mut offsets = [lo.offset() as isize, lx.offset() as isize];
    walk(&dims, &strides, &mut offsets, &mut |offs, len, inner| {
        let (mut py, mut px) = (offs[0], offs[1]);
        for _ in 0..len {
            if let Some(v) = f(x.get(px as usize)) {
                out.set(py as usize, v);
            }
            py += inner[0];
            px += inner[1];
        }
    });
    Ok(())
}

/// Unary runner with an accessor-indirection callback: each element passes
/// through `access` before `f` is applied. Supports iterating arrays whose
/// element encoding differs from what `f` understands.
pub fn unary_by<X, Y, V, G, F>(
    x: &X,
    lx: &Layout,
    out: &mut Y,
    lo: &Layout,
    mut access: G,
    mut f: F,
) -> Result<()>
where
    X: BufferAccess,
    Y: BufferAccess,
    G: FnMut(X::Elem) -> V,
    F: FnMut(V) -> Y::Elem,
{
    unary(x, lx, out, lo, move |v| f(access(v)))
}

/// In-place unary: rewrite each element of `out` through `f`.
pub fn map_inplace<Y, F>(out: &mut Y, lo: &Layout, mut f: F) -> Result<()>
where
    Y: BufferAccess,
    F: FnMut(Y::Elem) -> Y::Elem,
{
    let n = lo.len();
    if n == 0 {
        return Ok(());
    }
    if lo.ndims() == 0 {
        let cur = out.get(lo.offset());
        out.set(lo.offset(), f(cur));
        return Ok(());
    }
    if let Some(signs) = flat_signs(&[lo]) {
        let oo = lo.offset() as isize;
        let so = signs[0] as isize;
        for v in 0..n as isize {
            let i = (oo + so * v) as usize;
            let cur = out.get(i);
            out.set(i, f(cur));
        }
        return Ok(());
    }
    let (dims, strides) = ordered_dims(lo.shape(), &[lo.strides()]);
    let mut offsets = [lo.offset() as isize];
    walk(&dims, &strides, &mut offsets, &mut |offs, len, inner| {
        let mut py = offs[0];
        for _ in 0..len {
            let i = py as usize;
            let cur = out.get(i);
            out.set(i, f(cur));
            py += inner[0];
        }
    });
    Ok(())
}

/// In-place binary: `out[i] = f(out[i], x[i])`, the read-modify-write form
/// used when the output deliberately aliases an input.
pub fn unary_update<X, Y, F>(x: &X, lx: &Layout, out: &mut Y, lo: &Layout, mut f: F) -> Result<()>
where
    X: BufferAccess,
    Y: BufferAccess,
    F: FnMut(Y::Elem, X::Elem) -> Y::Elem,
{
    ensure_same_shape(lo, lx)?;
    let n = lo.len();
    if n == 0 {
        return Ok(());
    }
    if lo.ndims() == 0 {
        let cur = out.get(lo.offset());
        out.set(lo.offset(), f(cur, x.get(lx.offset())));
        return Ok(());
    }
    let (dims, strides) = ordered_dims(lo.shape(), &[lo.strides(), lx.strides()]);
    let mut offsets = [lo.offset() as isize, lx.offset() as isize];
    walk(&dims, &strides, &mut offsets, &mut |offs, len, inner| {
        let (mut py, mut px) = (offs[0], offs[1]);
        for _ in 0..len {
            let i = py as usize;
            let cur = out.get(i);
            out.set(i, f(cur, x.get(px as usize)));
            py += inner[0];
            px += inner[1];
        }
    });
    Ok(())
}

// ============================================================================
// Binary
// ============================================================================

/// Apply `f` to paired elements of `a` and `b`, writing into `out`.
pub fn binary<A, B, Y, F>(
    a: &A,
    la: &Layout,
    b: &B,
    lb: &Layout,
    out: &mut Y,
    lo: &Layout,
    mut f: F,
) -> Result<()>
where
    A: BufferAccess,
    B: BufferAccess,
    Y: BufferAccess,
    F: FnMut(A::Elem, B::Elem) -> Y::Elem,
{
    ensure_same_shape(lo, la)?;
    ensure_same_shape(lo, lb)?;
    let n = lo.len();
    if n == 0 {
        return Ok(());
    }
    if lo.ndims() == 0 {
        out.set(lo.offset(), f(a.get(la.offset()), b.get(lb.offset())));
        return Ok(());
    }
    if let Some(signs) = flat_signs(&[lo, la, lb]) {
        let (oo, oa, ob) = (
            lo.offset() as isize,
            la.offset() as isize,
            lb.offset() as isize,
        );
        let (so, sa, sb) = (signs[0] as isize, signs[1] as isize, signs[2] as isize);
        for v in 0..n as isize {
            out.set(
                (oo + so * v) as usize,
                f(a.get((oa + sa * v) as usize), b.get((ob + sb * v) as usize)),
            );
        }
        return Ok(());
    }
    let (dims, strides) = ordered_dims(lo.shape(), &[lo.strides(), la.strides(), lb.strides()]);
    let mut offsets = [
        lo.offset() as isize,
        la.offset() as isize,
        lb.offset() as isize,
    ];
    walk(&dims, &strides, &mut offsets, &mut |offs, len, inner| {
        let (mut py, mut pa, mut pb) = (offs[0], offs[1], offs[2]);
        for _ in 0..len {
            out.set(py as usize, f(a.get(pa as usize), b.get(pb as usize)));
            py += inner[0];
            pa += inner[1];
            pb += inner[2];
        }
    });
    Ok(())
}

/// Binary runner with a skip sentinel: `None` leaves the output element
/// unmodified.
pub fn binary_filtered<A, B, Y, F>(
    a: &A,
    la: &Layout,
    b: &B,
    lb: &Layout,
    out: &mut Y,
    lo: &Layout,
    mut f: F,
) -> Result<()>
where
    A: BufferAccess,
    B: BufferAccess,
    Y: BufferAccess,
    F: FnMut(A::Elem, B::Elem) -> Option<Y::Elem>,
{
    ensure_same_shape(lo, la)?;
    ensure_same_shape(lo, lb)?;
    let n = lo.len();
    if n == 0 {
        return Ok(());
    }
    if lo.ndims() == 0 {
        if let Some(v) = f(a.get(la.offset()), b.get(lb.offset())) {
            out.set(lo.offset(), v);
        }
        return Ok(());
    }
    let (dims, strides) = ordered_dims(lo.shape(), &[lo.strides(), la.strides(), lb.strides()]);
    let mut offsets = [
        lo.offset() as isize,
        la.offset() as isize,
        lb.offset() as isize,
    ];
    walk(&dims, &strides, &mut offsets, &mut |offs, len, inner| {
        let (mut py, mut pa, mut pb) = (offs[0], offs[1], offs[2]);
        for _ in 0..len {
            if let Some(v) = f(a.get(pa as usize), b.get(pb as usize)) {
                out.set(py as usize, v);
            }
            py += inner[0];
            pa += inner[1];
            pb += inner[2];
        }
    });
    Ok(())
}

/// Binary runner with per-input accessor indirection.
pub fn binary_by<A, B, Y, U, V, GA, GB, F>(
    a: &A,
    la: &Layout,
    b: &B,
    lb: &Layout,
    out: &mut Y,
    lo: &Layout,
    mut access_a: GA,
    mut access_b: GB,
    mut f: F,
) -> Result<()>
where
    A: BufferAccess,
    B: BufferAccess,
    Y: BufferAccess,
    GA: FnMut(A::Elem) -> U,
    GB: FnMut(B::Elem) -> V,
    F: FnMut(U, V) -> Y::Elem,
{
    binary(a, la, b, lb, out, lo, move |av, bv| {
        f(access_a(av), access_b(bv))
    })
}

// ============================================================================
// Ternary and higher arities
// ============================================================================

/// Apply `f` across three inputs, writing into `out`.
pub fn ternary<A, B, C, Y, F>(
    a: &A,
    la: &Layout,
    b: &B,
    lb: &Layout,
    c: &C,
    lc: &Layout,
    out: &mut Y,
    lo: &Layout,
    mut f: F,
) -> Result<()>
where
    A: BufferAccess,
    B: BufferAccess,
    C: BufferAccess,
    Y: BufferAccess,
    F: FnMut(A::Elem, B::Elem, C::Elem) -> Y::Elem,
{
    ensure_same_shape(lo, la)?;
    ensure_same_shape(lo, lb)?;
    ensure_same_shape(lo, lc)?;
    let n = lo.len();
    if n == 0 {
        return Ok(());
    }
    if lo.ndims() == 0 {
        out.set(
            lo.offset(),
            f(a.get(la.offset()), b.get(lb.offset()), c.get(lc.offset())),
        );
        return Ok(());
    }
    if let Some(signs) = flat_signs(&[lo, la, lb, lc]) {
        let offs = [
            lo.offset() as isize,
            la.offset() as isize,
            lb.offset() as isize,
            lc.offset() as isize,
        ];
        for v in 0..n as isize {
            let idx = |k: usize| (offs[k] + signs[k] as isize * v) as usize;
            out.set(idx(0), f(a.get(idx(1)), b.get(idx(2)), c.get(idx(3))));
        }
        return Ok(());
    }
    let (dims, strides) = ordered_dims(
        lo.shape(),
        &[lo.strides(), la.strides(), lb.strides(), lc.strides()],
    );
    let mut offsets = [
        lo.offset() as isize,
        la.offset() as isize,
        lb.offset() as isize,
        lc.offset() as isize,
    ];
    walk(&dims, &strides, &mut offsets, &mut |offs, len, inner| {
        let (mut py, mut pa, mut pb, mut pc) = (offs[0], offs[1], offs[2], offs[3]);
        for _ in 0..len {
            out.set(
                py as usize,
                f(a.get(pa as usize), b.get(pb as usize), c.get(pc as usize)),
            );
            py += inner[0];
            pa += inner[1];
            pb += inner[2];
            pc += inner[3];
        }
    });
    Ok(())
}

/// Apply `f` across four inputs, writing into `out`.
#[allow(clippy::too_many_arguments)]
pub fn quaternary<A, B, C, D, Y, F>(
    a: &A,
    la: &Layout,
    b: &B,
    lb: &Layout,
    c: &C,
    lc: &Layout,
    d: &D,
    ld: &Layout,
    out: &mut Y,
    lo: &Layout,
    mut f: F,
) -> Result<()>
where
    A: BufferAccess,
    B: BufferAccess,
    C: BufferAccess,
    D: BufferAccess,
    Y: BufferAccess,
    F: FnMut(A::Elem, B::Elem, C::Elem, D::Elem) -> Y::Elem,
{
    ensure_same_shape(lo, la)?;
    ensure_same_shape(lo, lb)?;
    ensure_same_shape(lo, lc)?;
    ensure_same_shape(lo, ld)?;
    let n = lo.len();
    if n == 0 {
        return Ok(());
    }
    if lo.ndims() == 0 {
        out.set(
            lo.offset(),
            f(
                a.get(la.offset()),
                b.get(lb.offset()),
                c.get(lc.offset()),
                d.get(ld.offset()),
            ),
        );
        return Ok(());
    }
    let (dims, strides) = ordered_dims(
        lo.shape(),
        &[
            lo.strides(),
            la.strides(),
            lb.strides(),
            lc.strides(),
            ld.strides(),
        ],
    );
    let mut offsets = [
        lo.offset() as isize,
        la.offset() as isize,
        lb.offset() as isize,
        lc.offset() as isize,
        ld.offset() as isize,
    ];
    walk(&dims, &strides, &mut offsets, &mut |offs, len, inner| {
        let (mut py, mut pa, mut pb, mut pc, mut pd) =
            (offs[0], offs[1], offs[2], offs[3], offs[4]);
        for _ in 0..len {
            out.set(
                py as usize,
                f(
                    a.get(pa as usize),
                    b.get(pb as usize),
                    c.get(pc as usize),
                    d.get(pd as usize),
                ),
            );
            py += inner[0];
            pa += inner[1];
            pb += inner[2];
            pc += inner[3];
            pd += inner[4];
        }
    });
    Ok(())
}

/// Apply `f` across five inputs, writing into `out`.
#[allow(clippy::too_many_arguments)]
pub fn quinary<A, B, C, D, E, Y, F>(
    a: &A,
    la: &Layout,
    b: &B,
    lb: &Layout,
    c: &C,
    lc: &Layout,
    d: &D,
    ld: &Layout,
    e: &E,
    le: &Layout,
    out: &mut Y,
    lo: &Layout,
    mut f: F,
) -> Result<()>
where
    A: BufferAccess,
    B: BufferAccess,
    C: BufferAccess,
    D: BufferAccess,
    E: BufferAccess,
    Y: BufferAccess,
    F: FnMut(A::Elem, B::Elem, C::Elem, D::Elem, E::Elem) -> Y::Elem,
{
    ensure_same_shape(lo, la)?;
    ensure_same_shape(lo, lb)?;
    ensure_same_shape(lo, lc)?;
    ensure_same_shape(lo, ld)?;
    ensure_same_shape(lo, le)?;
    let n = lo.len();
    if n == 0 {
        return Ok(());
    }
    if lo.ndims() == 0 {
        out.set(
            lo.offset(),
            f(
                a.get(la.offset()),
                b.get(lb.offset()),
                c.get(lc.offset()),
                d.get(ld.offset()),
                e.get(le.offset()),
            ),
        );
        return Ok(());
    }
    let (dims, strides) = ordered_dims(
        lo.shape(),
        &[
            lo.strides(),
            la.strides(),
            lb.strides(),
            lc.strides(),
            ld.strides(),
            le.strides(),
        ],
    );
    let mut offsets = [
        lo.offset() as isize,
        la.offset() as isize,
        lb.offset() as isize,
        lc.offset() as isize,
        ld.offset() as isize,
        le.offset() as isize,
    ];
    walk(&dims, &strides, &mut offsets, &mut |offs, len, inner| {
        let (mut py, mut pa, mut pb, mut pc, mut pd, mut pe) =
            (offs[0], offs[1], offs[2], offs[3], offs[4], offs[5]);
        for _ in 0..len {
            out.set(
                py as usize,
                f(
                    a.get(pa as usize),
                    b.get(pb as usize),
                    c.get(pc as usize),
                    d.get(pd as usize),
                    e.get(pe as usize),
                ),
            );
            py += inner[0];
            pa += inner[1];
            pb += inner[2];
            pc += inner[3];
            pd += inner[4];
            pe += inner[5];
        }
    });
    Ok(())
}
