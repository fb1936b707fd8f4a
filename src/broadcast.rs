//! Broadcasting shape resolution.
//!
//! Given any number of input shapes, [`broadcast_shapes`] computes the unique
//! output shape under the standard broadcasting rules: shapes align at the
//! trailing dimension, and two sizes at the same position are compatible when
//! they are equal or one of them is 1. A size-0 dimension is compatible with
//! 1 and wins (the broadcast of an empty axis is empty).

use crate::{NdarrayError, Result};

/// Broadcast a list of shapes to a single output shape.
///
/// The output rank is the maximum input rank. Incompatible inputs fail with
/// [`IncompatibleShapes`](crate::NdarrayError::IncompatibleShapes) naming the
/// offending output dimension and the two conflicting sizes. An empty list
/// (or all-scalar inputs) yields the scalar shape `[]`.
pub fn broadcast_shapes(shapes: &[&[usize]]) -> Result<Vec<usize>> {
    let rank = shapes.iter().map(|s| s.len()).max().unwrap_or(0);
    let mut out = vec![1usize; rank];
    for shape in shapes {
        let lead = rank - shape.len();
        for (i, &dim) in shape.iter().enumerate() {
            let pos = lead + i;
            let cur = out[pos];
            if cur == dim || dim == 1 {
                continue;
            }
            if cur == 1 {
                out[pos] = dim;
            } else {
                return Err(NdarrayError::IncompatibleShapes {
                    dim: pos,
                    a: cur,
                    b: dim,
                });
            }
        }
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pairwise() {
        assert_eq!(
            broadcast_shapes(&[&[8, 1, 6, 1], &[7, 1, 5]]).unwrap(),
            vec![8, 7, 6, 5]
        );
        assert_eq!(broadcast_shapes(&[&[5, 4], &[1]]).unwrap(), vec![5, 4]);
        assert_eq!(broadcast_shapes(&[&[5, 4], &[4]]).unwrap(), vec![5, 4]);
        assert_eq!(
            broadcast_shapes(&[&[15, 3, 5], &[15, 1, 5]]).unwrap(),
            vec![15, 3, 5]
        );
        assert_eq!(
            broadcast_shapes(&[&[15, 3, 5], &[3, 1]]).unwrap(),
            vec![15, 3, 5]
        );
    }

    #[test]
    fn test_three_way() {
        assert_eq!(
            broadcast_shapes(&[&[8, 1, 1, 6, 1], &[1, 7, 1, 5], &[8, 4, 1, 6, 5]]).unwrap(),
            vec![8, 4, 7, 6, 5]
        );
    }

    #[test]
    fn test_zero_size_dimensions() {
        assert_eq!(
            broadcast_shapes(&[&[8, 1, 1, 6, 1], &[0]]).unwrap(),
            vec![8, 1, 1, 6, 0]
        );
        assert_eq!(
            broadcast_shapes(&[&[8, 1, 1, 6, 1], &[8, 0, 1, 6, 1]]).unwrap(),
            vec![8, 0, 1, 6, 1]
        );
        // 0 against a size >= 2 is incompatible.
        let err = broadcast_shapes(&[&[8, 8, 1, 6, 1], &[8, 0, 1, 6, 1]]).unwrap_err();
        assert!(matches!(
            err,
            NdarrayError::IncompatibleShapes { dim: 1, a: 8, b: 0 }
        ));
    }

    #[test]
    fn test_incompatible_reports_dimension() {
        let err = broadcast_shapes(&[&[2, 3], &[2, 4]]).unwrap_err();
        assert!(matches!(
            err,
            NdarrayError::IncompatibleShapes { dim: 1, a: 3, b: 4 }
        ));
    }

    #[test]
    fn test_scalars_and_empty() {
        assert!(broadcast_shapes(&[]).unwrap().is_empty());
        assert!(broadcast_shapes(&[&[]]).unwrap().is_empty());
        assert!(broadcast_shapes(&[&[], &[]]).unwrap().is_empty());
        assert_eq!(broadcast_shapes(&[&[3, 2, 1], &[]]).unwrap(), vec![3, 2, 1]);
        assert_eq!(broadcast_shapes(&[&[], &[3, 2, 1]]).unwrap(), vec![3, 2, 1]);
    }

    #[test]
    fn test_idempotent() {
        let s = [4usize, 3, 2];
        assert_eq!(broadcast_shapes(&[&s[..], &s[..]]).unwrap(), s.to_vec());
    }
}
