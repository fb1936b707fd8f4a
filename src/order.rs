//! Iteration-order planning for multi-array traversals.
//!
//! Given the layouts participating in an operation, the planner picks the
//! dimension nesting that keeps the innermost loop walking the most
//! sequential memory. Dimensions are ranked by a per-array stride ordering
//! combined into an importance score, with the destination array weighted
//! double since its access pattern dominates cache behavior.
//!
//! Fully contiguous operand sets skip all of this: [`flat_signs`] detects
//! when every participant admits O(1) flat addressing and the runners then
//! iterate the flattened index directly.

use crate::layout::Layout;

/// Relative order of stride magnitudes.
///
/// `result[i]` is the rank of `|strides[i]|` among all nonzero strides,
/// counting from 1. Zero (broadcast) strides rank 1: they cost nothing to
/// keep innermost.
pub(crate) fn index_order(strides: &[isize]) -> Vec<usize> {
    let n = strides.len();
    let mut result = vec![1usize; n];
    for i in 0..n {
        let si = strides[i].unsigned_abs();
        if si == 0 {
            continue;
        }
        let mut k = 1usize;
        for &s in strides {
            if s != 0 && s.unsigned_abs() < si {
                k += 1;
            }
        }
        result[i] = k;
    }
    result
}

/// Combine per-array stride orderings into per-dimension importance scores.
///
/// Each array contributes `weight << (g * (rank - order[d]))`, so a
/// dimension that is the fastest-varying axis of many arrays accumulates the
/// largest score. Size-1 dimensions score zero and sink to the outermost
/// positions where their single iteration is free.
fn importance(dims: &[usize], orders: &[Vec<usize>], weights: &[u32]) -> Vec<u128> {
    let rank = dims.len();
    let m = orders.len();
    let g = (usize::BITS - (m + 1).leading_zeros()) as usize;
    let mut scores = vec![0u128; rank];
    for (order, &w) in orders.iter().zip(weights.iter()) {
        for d in 0..rank {
            let shift = (g * (rank - order[d])).min(120);
            scores[d] += (w as u128) << shift;
        }
    }
    for d in 0..rank {
        if dims[d] <= 1 {
            scores[d] = 0;
        }
    }
    scores
}

/// Compute the dimension traversal order for a set of stride arrays.
///
/// Returns a permutation of dimension indices with the **innermost**
/// dimension first: `order[0]` is the axis the element loop walks, the
/// remaining axes nest outward. `dest_index` names the array whose strides
/// are weighted double (conventionally the output).
pub(crate) fn loop_order(
    dims: &[usize],
    strides_list: &[&[isize]],
    dest_index: Option<usize>,
) -> Vec<usize> {
    let rank = dims.len();
    if rank == 0 || strides_list.is_empty() {
        return (0..rank).collect();
    }

    let orders: Vec<Vec<usize>> = strides_list.iter().map(|s| index_order(s)).collect();
    let mut weights = vec![1u32; strides_list.len()];
    if let Some(dest) = dest_index {
        if dest < weights.len() {
            weights[dest] = 2;
        }
    }

    let scores = importance(dims, &orders, &weights);
    let mut perm: Vec<usize> = (0..rank).collect();
    perm.sort_by(|&a, &b| scores[b].cmp(&scores[a]));
    perm
}

/// Flat-addressing signs for a set of layouts, when all admit the fast path.
///
/// Returns `Some(signs)` iff every layout shares one order tag and is
/// contiguous in that order; `signs[k]` is then `±1` such that participant
/// `k` addresses `offset + sign * view_index`. Any other configuration
/// returns `None` and the caller falls back to planned nested loops.
pub(crate) fn flat_signs(layouts: &[&Layout]) -> Option<Vec<i8>> {
    let first_order = layouts.first()?.order();
    let mut signs = Vec::with_capacity(layouts.len());
    for l in layouts {
        if l.order() != first_order {
            return None;
        }
        signs.push(l.flat_fast_path()?);
    }
    Some(signs)
}
