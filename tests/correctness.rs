//! End-to-end correctness scenarios for the strided ndarray engine.

use approx::assert_relative_eq;
use num_complex::Complex64;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

use strided_ndarray::{
    add, axpy, broadcast_shapes, copy_into, kernel, map_into, AxisSlice, BufferAccess, DType,
    DenseBuffer, IndexMode, Layout, NdArray, NdarrayError, Order, SliceRange,
};

fn iota(shape: &[usize]) -> NdArray<DenseBuffer<f64>> {
    let n: usize = shape.iter().product();
    NdArray::from_vec((0..n).map(|x| x as f64).collect(), shape, Order::RowMajor).unwrap()
}

// ---------------------------------------------------------------------------
// Broadcast scenarios
// ---------------------------------------------------------------------------

#[test]
fn broadcast_2x1_to_3x2x4_reuses_rows() {
    let x = iota(&[2, 1]);
    let b = x.broadcast_to(&[3, 2, 4]).unwrap();
    assert_eq!(b.strides(), &[0, 1, 0]);

    // Each of the 2 source rows must be reused exactly 3*4 = 12 times.
    let vals = b.to_vec();
    assert_eq!(vals.len(), 24);
    assert_eq!(vals.iter().filter(|&&v| v == 0.0).count(), 12);
    assert_eq!(vals.iter().filter(|&&v| v == 1.0).count(), 12);
}

#[test]
fn broadcast_binary_add_matches_expected_matrix() {
    // x = [[1], [2]], y = [[10, 20, 30]]:
    // out = [[11, 21, 31], [12, 22, 32]]
    let x = NdArray::from_vec(vec![1.0, 2.0], &[2, 1], Order::RowMajor).unwrap();
    let y = NdArray::from_vec(vec![10.0, 20.0, 30.0], &[1, 3], Order::RowMajor).unwrap();
    let mut out = NdArray::<DenseBuffer<f64>>::zeros(&[2, 3], Order::RowMajor);
    add(&x.view(), &y.view(), &mut out.view_mut()).unwrap();
    assert_eq!(out.to_vec(), vec![11.0, 21.0, 31.0, 12.0, 22.0, 32.0]);
}

#[test]
fn broadcast_shapes_resolves_and_reports_conflicts() {
    assert_eq!(
        broadcast_shapes(&[&[8, 1, 6, 1], &[7, 1, 5]]).unwrap(),
        vec![8, 7, 6, 5]
    );
    let err = broadcast_shapes(&[&[2, 3], &[4, 3]]).unwrap_err();
    assert!(matches!(
        err,
        NdarrayError::IncompatibleShapes { dim: 0, a: 2, b: 4 }
    ));
}

#[test]
fn broadcast_idempotence_preserves_layout() {
    let x = iota(&[4, 5]);
    let sliced = x
        .slice(&[
            AxisSlice::range(Some(1), Some(4), 2),
            AxisSlice::range(None, None, -1),
        ])
        .unwrap();
    let b = sliced.broadcast_to(sliced.shape()).unwrap();
    assert_eq!(b.strides(), sliced.strides());
    assert_eq!(b.offset(), sliced.offset());
    assert_eq!(b.to_vec(), sliced.to_vec());
}

// ---------------------------------------------------------------------------
// Slice scenarios
// ---------------------------------------------------------------------------

#[test]
fn slice_even_indices_of_length_8() {
    let x = iota(&[8]);
    let s = x.slice(&[AxisSlice::range(Some(0), Some(8), 2)]).unwrap();
    assert_eq!(s.shape(), &[4]);
    assert_eq!(s.strides(), &[2]);
    assert_eq!(s.offset(), 0);
    assert_eq!(s.to_vec(), vec![0.0, 2.0, 4.0, 6.0]);
}

#[test]
fn slice_reverse_of_length_8() {
    let x = iota(&[8]);
    let s = x.slice(&[AxisSlice::range(Some(7), Some(-1), -1)]).unwrap();
    assert_eq!(s.shape(), &[8]);
    assert_eq!(s.strides(), &[-1]);
    assert_eq!(s.offset(), 7);
    assert_eq!(
        s.to_vec(),
        vec![7.0, 6.0, 5.0, 4.0, 3.0, 2.0, 1.0, 0.0]
    );
}

#[test]
fn slice_of_slice_composes_algebraically() {
    let x = iota(&[20]);
    let a = x.slice(&[AxisSlice::range(Some(2), Some(18), 2)]).unwrap();
    let b = a.slice(&[AxisSlice::range(Some(1), Some(8), 3)]).unwrap();
    // start 2 + 1*2 = 4, step 2*3 = 6, count 3: indices 4, 10, 16.
    assert_eq!(b.shape(), &[3]);
    assert_eq!(b.strides(), &[6]);
    assert_eq!(b.offset(), 4);
    assert_eq!(b.to_vec(), vec![4.0, 10.0, 16.0]);
}

#[test]
fn slice_zero_step_rejected() {
    let x = iota(&[8]);
    let err = x
        .slice(&[AxisSlice::Range(SliceRange::new(None, None, 0))])
        .unwrap_err();
    assert!(matches!(err, NdarrayError::InvalidSlice { dim: 0 }));
}

// ---------------------------------------------------------------------------
// Reshape scenarios
// ---------------------------------------------------------------------------

#[test]
fn reshape_of_noncontiguous_view_requires_copy() {
    let x = iota(&[8]);
    let strided = x.slice(&[AxisSlice::range(Some(0), Some(8), 2)]).unwrap();

    // View-only reshape fails.
    assert!(matches!(
        strided.reshape(&[2, 2]),
        Err(NdarrayError::CannotReshapeWithoutCopy { .. })
    ));

    // Copying reshape succeeds; the fresh buffer is contiguous and holds
    // the source elements in view order.
    let strided_arr = NdArray::from_parts(
        DenseBuffer::new(x.to_vec()),
        Layout::new(vec![4], vec![2], 0, Order::RowMajor).unwrap(),
    )
    .unwrap();
    let copied = strided_arr.reshape_copy(&[2, 2]).unwrap();
    assert!(copied.is_row_major_contiguous());
    assert_eq!(copied.to_vec(), vec![0.0, 2.0, 4.0, 6.0]);
}

#[test]
fn reshape_view_of_contiguous_array() {
    let x = iota(&[12]);
    let r = x.reshape(&[3, 4]).unwrap();
    assert_eq!(r.shape(), &[3, 4]);
    assert_eq!(r.get(&[2, 3]), Some(11.0));
}

// ---------------------------------------------------------------------------
// Index arithmetic properties
// ---------------------------------------------------------------------------

#[test]
fn round_trip_over_random_layouts() {
    let mut rng = StdRng::seed_from_u64(0x5eed);
    let steps: [isize; 3] = [1, 2, -1];
    for _ in 0..200 {
        let rank = rng.gen_range(1..=4);
        let shape: Vec<usize> = (0..rank).map(|_| rng.gen_range(1..=4)).collect();
        let order = if rng.gen() {
            Order::RowMajor
        } else {
            Order::ColMajor
        };
        let base = Layout::contiguous(&shape, order);
        let specs: Vec<AxisSlice> = (0..rank)
            .map(|_| AxisSlice::range(None, None, *steps.choose(&mut rng).unwrap()))
            .collect();
        let layout = base.slice(&specs).unwrap();
        layout.validate_within(shape.iter().product()).unwrap();

        for i in 0..layout.len() {
            let subs = layout.linear_to_subscript(i);
            assert_eq!(
                layout.subscript_to_buffer_index(&subs),
                layout.view_index_to_buffer_index(i),
            );
        }
    }
}

#[test]
fn contiguity_detection_soundness() {
    for order in [Order::RowMajor, Order::ColMajor] {
        let l = Layout::contiguous(&[3, 4, 5], order);
        match order {
            Order::RowMajor => assert!(l.is_row_major_contiguous()),
            Order::ColMajor => assert!(l.is_col_major_contiguous()),
        }
        // Fast-path addressing agrees with the general formula everywhere.
        for i in 0..l.len() {
            let subs = l.linear_to_subscript(i);
            assert_eq!(
                l.view_index_to_buffer_index(i),
                l.subscript_to_buffer_index(&subs)
            );
        }
    }
}

#[test]
fn subscript_conversions_honor_perspective() {
    // Negative stride, nonzero offset: buffer perspective.
    let l = Layout::new(vec![2, 2], vec![-2, 1], 2, Order::RowMajor).unwrap();
    assert_eq!(l.ind2sub(0, IndexMode::Strict).unwrap(), vec![1, 0]);
    assert_eq!(l.sub2ind(&[1, 0], IndexMode::Strict).unwrap(), 0);

    // Same strides, zero offset: view perspective, data always ordered.
    let l = Layout::new(vec![2, 2], vec![-2, 1], 0, Order::RowMajor).unwrap();
    assert_eq!(l.ind2sub(2, IndexMode::Strict).unwrap(), vec![1, 0]);
    assert_eq!(l.sub2ind(&[1, 0], IndexMode::Strict).unwrap(), 2);
}

#[test]
fn index_modes_wrap_and_clamp() {
    let l = Layout::contiguous(&[3, 3], Order::RowMajor);
    assert!(l.sub2ind(&[3, 0], IndexMode::Strict).is_err());
    assert_eq!(l.sub2ind(&[3, 0], IndexMode::Wrap).unwrap(), 0);
    assert_eq!(l.sub2ind(&[5, 5], IndexMode::Clamp).unwrap(), 8);
}

// ---------------------------------------------------------------------------
// Handle semantics
// ---------------------------------------------------------------------------

#[test]
fn negative_index_normalization() {
    let x = iota(&[8]);
    assert_eq!(x.get(&[-1]), x.get(&[7]));
    assert_eq!(x.get(&[-8]), x.get(&[0]));
    assert_eq!(x.get(&[-9]), None);
}

#[test]
fn lenient_get_set_versus_strict_views() {
    let mut x = iota(&[2, 2]);
    // Lenient tier: sentinel reads, ignored writes.
    assert_eq!(x.get(&[5, 0]), None);
    x.set(&[5, 0], 99.0);
    assert_eq!(x.to_vec(), vec![0.0, 1.0, 2.0, 3.0]);
    // Strict tier: view constructors fail eagerly.
    assert!(x.slice(&[AxisSlice::Index(5), AxisSlice::full()]).is_err());
}

#[test]
fn aliasing_writes_visible_through_other_handles() {
    let mut x = iota(&[3, 3]);
    {
        let mut diag_row = x
            .slice_mut(&[AxisSlice::Index(1), AxisSlice::full()])
            .unwrap();
        diag_row.set(&[0], -1.0);
        diag_row.set(&[2], -3.0);
    }
    // No caching: the base handle and fresh views observe the writes.
    assert_eq!(x.get(&[1, 0]), Some(-1.0));
    assert_eq!(x.get(&[1, 2]), Some(-3.0));
    assert_eq!(
        x.slice(&[AxisSlice::Index(1), AxisSlice::full()])
            .unwrap()
            .to_vec(),
        vec![-1.0, 4.0, -3.0]
    );
}

#[test]
fn in_place_axpy_through_shared_buffer() {
    let x = iota(&[4]);
    let mut y = NdArray::from_vec(vec![1.0, 1.0, 1.0, 1.0], &[4], Order::RowMajor).unwrap();
    axpy(0.5, &x.view(), &mut y.view_mut()).unwrap();
    let result = y.to_vec();
    let expected = [1.0, 1.5, 2.0, 2.5];
    for (r, e) in result.iter().zip(expected.iter()) {
        assert_relative_eq!(r, e);
    }
}

// ---------------------------------------------------------------------------
// Data types
// ---------------------------------------------------------------------------

#[test]
fn complex_arrays_interleave_and_map() {
    let vals = vec![
        Complex64::new(1.0, 2.0),
        Complex64::new(3.0, 4.0),
        Complex64::new(5.0, 6.0),
        Complex64::new(7.0, 8.0),
    ];
    let x = NdArray::from_complex_vec(vals.clone(), &[2, 2], Order::RowMajor).unwrap();
    assert_eq!(x.dtype(), DType::Complex128);

    // The accessor pair hides the interleaved physical representation.
    assert_eq!(x.get(&[1, 1]), Some(vals[3]));
    assert_eq!(x.data().as_real_slice().len(), 8);

    // Conjugate every element into a fresh complex array.
    let mut out = NdArray::zeros_complex(&[2, 2], Order::RowMajor);
    map_into(&x.view(), &mut out.view_mut(), |z: Complex64| z.conj()).unwrap();
    assert_eq!(out.get(&[0, 1]), Some(Complex64::new(3.0, -4.0)));
}

#[test]
fn mixed_dtype_kernel_converts_elements() {
    let x = NdArray::from_vec(vec![1i32, 2, 3, 4], &[4], Order::RowMajor).unwrap();
    let mut out = NdArray::<DenseBuffer<f64>>::zeros(&[4], Order::RowMajor);
    map_into(&x.view(), &mut out.view_mut(), |v| v as f64 * 0.5).unwrap();
    assert_eq!(out.to_vec(), vec![0.5, 1.0, 1.5, 2.0]);
}

#[test]
fn generic_dtype_boxed_values() {
    let buf = DenseBuffer::generic(vec![vec![1u8], vec![2, 3], vec![]]);
    let x = NdArray::from_parts(buf, Layout::contiguous(&[3], Order::RowMajor)).unwrap();
    assert_eq!(x.dtype(), DType::Generic);
    assert_eq!(x.byte_length(), None);
    assert_eq!(x.get(&[1]), Some(vec![2u8, 3]));
}

#[test]
fn dtype_parsing_rejects_unknown_tags() {
    assert!("float64".parse::<DType>().is_ok());
    assert!(matches!(
        "quaternion".parse::<DType>(),
        Err(NdarrayError::UnsupportedDType(_))
    ));
}

// ---------------------------------------------------------------------------
// Kernel behavior across layouts
// ---------------------------------------------------------------------------

#[test]
fn kernel_handles_transposed_output() {
    // Writing through a permuted destination exercises the planner path.
    let x = iota(&[3, 4]);
    let mut out = NdArray::<DenseBuffer<f64>>::zeros(&[4, 3], Order::RowMajor);
    {
        let dest = out.view_mut().permute(&[1, 0]).unwrap();
        let mut dest = dest;
        copy_into(&x.view(), &mut dest).unwrap();
    }
    for i in 0..3 {
        for j in 0..4 {
            assert_eq!(out.get(&[j as isize, i as isize]), x.get(&[i as isize, j as isize]));
        }
    }
}

#[test]
fn kernel_rank5_matches_reference_addressing() {
    let shape = [2usize, 3, 2, 2, 2];
    let n: usize = shape.iter().product();
    let x = NdArray::from_vec((0..n).map(|v| v as f64).collect(), &shape, Order::RowMajor)
        .unwrap();
    let src = x.permute(&[4, 1, 3, 0, 2]).unwrap();
    let mut out = NdArray::<DenseBuffer<f64>>::zeros(src.shape(), Order::RowMajor);
    copy_into(&src, &mut out.view_mut()).unwrap();
    assert_eq!(out.to_vec(), src.to_vec());
}

#[test]
fn quinary_runner_combines_five_inputs() {
    let l = Layout::contiguous(&[2, 2], Order::RowMajor);
    let mk = |scale: f64| DenseBuffer::new((0..4).map(|v| v as f64 * scale).collect());
    let (a, b, c, d, e) = (mk(1.0), mk(10.0), mk(100.0), mk(1000.0), mk(10000.0));
    let mut out = DenseBuffer::<f64>::zeros(4);
    kernel::quinary(
        &a,
        &l,
        &b,
        &l,
        &c,
        &l,
        &d,
        &l,
        &e,
        &l,
        &mut out,
        &l,
        |v, w, x, y, z| v + w + x + y + z,
    )
    .unwrap();
    assert_eq!(out.get(3), 33333.0);
}

#[test]
fn zero_sized_arrays_are_no_ops() {
    let x = NdArray::<DenseBuffer<f64>>::zeros(&[0, 3], Order::RowMajor);
    let mut out = NdArray::<DenseBuffer<f64>>::zeros(&[0, 3], Order::RowMajor);
    copy_into(&x.view(), &mut out.view_mut()).unwrap();
    assert!(out.is_empty());
    assert_eq!(out.len(), 0);
}

#[test]
fn scalar_arrays_expose_single_element() {
    let mut x = NdArray::from_scalar(2.5, Order::RowMajor);
    assert_eq!(x.ndims(), 0);
    assert_eq!(x.len(), 1);
    assert_eq!(x.get(&[]), Some(2.5));
    x.iset(99, 3.5);
    assert_eq!(x.iget(0), Some(3.5));
}
