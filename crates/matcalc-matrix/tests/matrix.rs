use matcalc_matrix::{filled, from_rows, mat, randu, zeros, Matrix, MatrixError, Value};

#[test]
fn new_matrix_starts_unset() {
    let m = mat(2, 3);
    assert_eq!(m.shape(), (2, 3));
    for row in 0..2 {
        for col in 0..3 {
            assert_eq!(m.get(row, col).unwrap(), None);
        }
    }
}

#[test]
fn set_get_unset_roundtrip() {
    let mut m = mat(2, 2);
    m.set(1, 0, 7.5).unwrap();
    assert_eq!(m.get(1, 0).unwrap(), Some(7.5));
    m.unset(1, 0).unwrap();
    assert_eq!(m.get(1, 0).unwrap(), None);
}

#[test]
fn get_out_of_bounds_fails() {
    let m = mat(2, 2);
    assert_eq!(
        m.get(2, 0),
        Err(MatrixError::IndexOutOfBounds {
            row: 2,
            col: 0,
            rows: 2,
            cols: 2
        })
    );
}

#[test]
fn fill_sets_every_cell() {
    let mut m = mat(2, 2);
    m.fill(3.0);
    assert_eq!(m, filled(2, 2, 3.0));
}

#[test]
fn from_rows_pads_to_widest_row() {
    let m = from_rows(&[vec![1.0, 2.0, 3.0], vec![4.0]]);
    assert_eq!(m.shape(), (2, 3));
    assert_eq!(m.get(0, 2).unwrap(), Some(3.0));
    assert_eq!(m.get(1, 0).unwrap(), Some(4.0));
    assert_eq!(m.get(1, 1).unwrap(), None);
}

#[test]
fn zeros_and_filled() {
    assert_eq!(zeros(2, 2), filled(2, 2, 0.0));
}

#[test]
fn randu_fills_unit_interval() {
    let m = randu(3, 3);
    for cell in m.iter() {
        let v = cell.value.unwrap();
        assert!((0.0..1.0).contains(&v));
    }
}

#[test]
fn clone_aliases_storage_copy_does_not() {
    let mut a = filled(2, 2, 1.0);
    let alias = a.clone();
    let independent = a.copy();
    a.set(0, 0, 9.0).unwrap();
    assert_eq!(alias.get(0, 0).unwrap(), Some(9.0));
    assert_eq!(independent.get(0, 0).unwrap(), Some(1.0));
}

#[test]
fn iter_is_row_major_and_restartable() {
    let m = from_rows(&[vec![1.0, 2.0], vec![3.0, 4.0]]);
    let order: Vec<Option<f64>> = m.iter().map(|c| c.value).collect();
    assert_eq!(order, vec![Some(1.0), Some(2.0), Some(3.0), Some(4.0)]);
    // a second traversal starts over
    let again: Vec<Option<f64>> = m.iter().map(|c| c.value).collect();
    assert_eq!(order, again);
}

#[test]
fn iter_of_empty_view_yields_nothing() {
    let m = mat(3, 3);
    let empty = m.slice(1, 1, 0, 0);
    assert_eq!(empty.shape(), (0, 0));
    assert_eq!(empty.iter().count(), 0);
}

#[test]
fn mutating_while_iterating_does_not_panic() {
    let mut m = filled(2, 2, 1.0);
    for cell in m.iter() {
        m.set(cell.row, cell.col, cell.value.unwrap() + 1.0).unwrap();
    }
    assert_eq!(m, filled(2, 2, 2.0));
}

#[test]
fn slice_is_a_writable_alias() {
    let mut a = filled(3, 3, 0.0);
    let mut s = a.slice(1, 1, 2, 2);
    assert_eq!(s.shape(), (2, 2));
    s.set(0, 0, 5.0).unwrap();
    assert_eq!(a.get(1, 1).unwrap(), Some(5.0));
    a.set(2, 2, 6.0).unwrap();
    assert_eq!(s.get(1, 1).unwrap(), Some(6.0));
}

#[test]
fn nested_slices_compose_offsets() {
    let m = from_rows(&[
        vec![1.0, 2.0, 3.0],
        vec![4.0, 5.0, 6.0],
        vec![7.0, 8.0, 9.0],
    ]);
    let inner = m.slice(1, 1, 2, 2).slice(0, 0, 0, 0);
    assert_eq!(inner.get(0, 0).unwrap(), Some(5.0));
}

#[test]
fn row_and_col_views() {
    let m = from_rows(&[vec![1.0, 2.0, 3.0], vec![4.0, 5.0, 6.0]]);
    let r = m.row(1);
    assert_eq!(r.shape(), (1, 3));
    assert_eq!(r.get(0, 2).unwrap(), Some(6.0));
    let c = m.col(0);
    assert_eq!(c.shape(), (2, 1));
    assert_eq!(c.get(1, 0).unwrap(), Some(4.0));
}

#[test]
fn shifted_view_reads_outside_allocation_as_unset() {
    let m = from_rows(&[vec![1.0, 2.0], vec![3.0, 4.0]]);
    let down = m.shift_r(1);
    assert_eq!(down.get(0, 0).unwrap(), Some(3.0));
    assert_eq!(down.get(1, 0).unwrap(), None);
}

#[test]
fn negative_shift_writes_land_in_storage() {
    let mut m = mat(2, 2);
    let mut up = m.shift_r(-1);
    up.set(0, 0, 9.0).unwrap();
    // not addressable through the unshifted view
    assert_eq!(m.get(0, 0).unwrap(), None);
    // but visible through an equally shifted alias
    assert_eq!(m.shift_r(-1).get(0, 0).unwrap(), Some(9.0));
    m.set(0, 0, 1.0).unwrap();
    assert_eq!(m.get(0, 0).unwrap(), Some(1.0));
}

#[test]
fn wrap_shift_shrink_exposes_neighbors() {
    let m = from_rows(&[vec![1.0, 2.0], vec![3.0, 4.0]]);
    let w = m.wrap(1);
    assert_eq!(w.shape(), (4, 4));
    assert_eq!(w.shrink(1), m);
    // each cell of `up` is the upper neighbor of the matching original cell
    let up = w.shift_r(-1).shrink(1);
    assert_eq!(up.get(0, 0).unwrap(), None);
    assert_eq!(up.get(1, 0).unwrap(), Some(1.0));
    let left = w.shift_c(-1).shrink(1);
    assert_eq!(left.get(0, 0).unwrap(), None);
    assert_eq!(left.get(0, 1).unwrap(), Some(1.0));
}

#[test]
fn wrap_is_independent_of_the_source() {
    let m = filled(2, 2, 1.0);
    let mut w = m.wrap(1);
    w.set(1, 1, 9.0).unwrap();
    assert_eq!(m.get(0, 0).unwrap(), Some(1.0));
}

#[test]
fn filter_restricts_reads_and_writes() {
    let m = from_rows(&[vec![-1.0, 2.0], vec![3.0, -4.0]]);
    let mut neg = m.filter(|c| c.value.is_some_and(|v| v < 0.0));
    assert_eq!(neg.get(0, 0).unwrap(), Some(-1.0));
    assert_eq!(neg.get(0, 1), Err(MatrixError::FilterViolation { row: 0, col: 1 }));
    assert!(neg.set(1, 0, 0.0).is_err());
    neg.set(1, 1, -8.0).unwrap();
    assert_eq!(m.get(1, 1).unwrap(), Some(-8.0));
}

#[test]
fn filter_iter_skips_masked_cells() {
    let m = from_rows(&[vec![-1.0, 2.0], vec![3.0, -4.0]]);
    let neg = m.filter(|c| c.value.is_some_and(|v| v < 0.0));
    let seen: Vec<Option<f64>> = neg.iter().map(|c| c.value).collect();
    assert_eq!(seen, vec![Some(-1.0), Some(-4.0)]);
}

#[test]
fn filter_then_slice_fill_writes_only_masked_cells() {
    let m = from_rows(&[vec![-1.0, 2.0, -3.0], vec![9.0, -7.0, 5.0]]);
    let mut view = m
        .filter(|c| c.value.is_some_and(|v| v < 0.0))
        .slice(0, 0, 1, 1);
    view.fill(0.0);
    let values: Vec<Option<f64>> = m.iter().map(|c| c.value).collect();
    assert_eq!(
        values,
        vec![Some(0.0), Some(2.0), Some(-3.0), Some(9.0), Some(0.0), Some(5.0)]
    );
}

#[test]
fn filtering_a_filtered_view_intersects() {
    let m = from_rows(&[vec![1.0, 2.0], vec![3.0, 4.0]]);
    let band = m
        .filter(|c| c.value.is_some_and(|v| v > 1.0))
        .filter(|c| c.value.is_some_and(|v| v < 4.0));
    let seen: Vec<Option<f64>> = band.iter().map(|c| c.value).collect();
    assert_eq!(seen, vec![Some(2.0), Some(3.0)]);
}

#[test]
fn filter_coordinates_survive_slicing() {
    let m = from_rows(&[vec![-1.0, 2.0], vec![3.0, -4.0]]);
    let neg = m.filter(|c| c.value.is_some_and(|v| v < 0.0));
    let sliced = neg.slice(1, 1, 1, 1);
    assert_eq!(sliced.get(0, 0).unwrap(), Some(-4.0));
}

#[test]
fn copy_drops_window_and_mask() {
    let m = from_rows(&[vec![-1.0, 2.0], vec![3.0, -4.0]]);
    let mut c = m.filter(|c| c.value.is_some_and(|v| v < 0.0)).copy();
    assert_eq!(c.get(0, 1).unwrap(), None);
    c.set(0, 1, 5.0).unwrap();
    assert_eq!(m.get(0, 1).unwrap(), Some(2.0));
}

#[test]
fn add_row_and_column_grow_in_place() {
    let mut m = from_rows(&[vec![1.0, 2.0], vec![3.0, 4.0]]);
    m.add_row(1, &[8.0]).unwrap();
    assert_eq!(m.shape(), (3, 2));
    assert_eq!(m.get(1, 0).unwrap(), Some(8.0));
    assert_eq!(m.get(1, 1).unwrap(), None);
    assert_eq!(m.get(2, 0).unwrap(), Some(3.0));
    m.add_column(0, &[9.0, 9.0, 9.0]).unwrap();
    assert_eq!(m.shape(), (3, 3));
    assert_eq!(m.get(0, 0).unwrap(), Some(9.0));
    assert_eq!(m.get(0, 1).unwrap(), Some(1.0));
}

#[test]
fn growth_past_the_end_appends() {
    let mut m = from_rows(&[vec![1.0, 2.0], vec![3.0, 4.0]]);
    m.add_row(5, &[9.0]).unwrap();
    assert_eq!(m.shape(), (3, 2));
    assert_eq!(m.get(2, 0).unwrap(), Some(9.0));
    assert_eq!(m.get(0, 0).unwrap(), Some(1.0));
    m.add_column(7, &[8.0]).unwrap();
    assert_eq!(m.shape(), (3, 3));
    assert_eq!(m.get(0, 2).unwrap(), Some(8.0));
}

#[test]
fn growth_is_rejected_on_views() {
    let m = filled(2, 2, 1.0);
    let mut sliced = m.slice(0, 0, 1, 0);
    assert!(matches!(
        sliced.add_row(0, &[]),
        Err(MatrixError::Unsupported(_))
    ));
    let mut masked = m.filter(|_| true);
    assert!(matches!(
        masked.add_column(0, &[]),
        Err(MatrixError::Unsupported(_))
    ));
}

#[test]
fn growth_is_visible_through_existing_aliases() {
    let mut m = from_rows(&[vec![1.0, 2.0], vec![3.0, 4.0]]);
    let alias = m.clone();
    m.add_row(0, &[5.0, 5.0]).unwrap();
    // the alias keeps its old shape but reads the shifted storage
    assert_eq!(alias.shape(), (2, 2));
    assert_eq!(alias.get(0, 0).unwrap(), Some(5.0));
    assert_eq!(alias.get(1, 0).unwrap(), Some(1.0));
}

#[test]
fn apply_maps_visible_cells() {
    let m = filled(2, 2, 3.0);
    let doubled = m.apply(|v, _, _| v.unwrap_or(f64::NAN) * 2.0).unwrap();
    assert_eq!(doubled, filled(2, 2, 6.0));
}

#[test]
fn apply_reattaches_the_mask() {
    let m = from_rows(&[vec![-1.0, 2.0], vec![3.0, -4.0]]);
    let neg = m.filter(|c| c.value.is_some_and(|v| v < 0.0));
    let out = neg.apply(|v, _, _| v.unwrap_or(f64::NAN) * 2.0).unwrap();
    assert_eq!(out.get(0, 0).unwrap(), Some(-2.0));
    assert_eq!(out.get(1, 1).unwrap(), Some(-8.0));
    assert!(matches!(out.get(0, 1), Err(MatrixError::FilterViolation { .. })));
    // the mask keeps the result out of the source storage
    assert_eq!(m.get(0, 0).unwrap(), Some(-1.0));
}

#[test]
fn apply_on_a_windowed_masked_view_violates_its_own_mask() {
    // The mask is recorded at storage coordinates while the copied result is
    // zero-based, so a windowed source puts the two out of register.
    let m = from_rows(&[vec![1.0, 2.0, 3.0], vec![4.0, 5.0, 6.0]]);
    let view = m.slice(0, 1, 1, 2).filter(|_| true);
    let result = view.apply(|v, _, _| v.unwrap_or(f64::NAN));
    assert!(matches!(result, Err(MatrixError::FilterViolation { .. })));
}

#[test]
fn elementwise_operations() {
    let a = filled(2, 2, 6.0);
    let b = filled(2, 2, 2.0);
    assert_eq!(a.plus(&b).unwrap(), filled(2, 2, 8.0));
    assert_eq!(a.minus(&b).unwrap(), filled(2, 2, 4.0));
    assert_eq!(a.divide(&b).unwrap(), filled(2, 2, 3.0));
    assert_eq!(a.elem_w_times(&b).unwrap(), filled(2, 2, 12.0));
    assert_eq!(a.power(&b).unwrap(), filled(2, 2, 36.0));
    assert_eq!(a.modulo(&b).unwrap(), filled(2, 2, 0.0));
}

#[test]
fn unset_cells_poison_arithmetic() {
    let mut a = filled(2, 2, 1.0);
    a.unset(0, 0).unwrap();
    let sum = a.plus(&filled(2, 2, 1.0)).unwrap();
    assert!(sum.get(0, 0).unwrap().unwrap().is_nan());
    assert_eq!(sum.get(0, 1).unwrap(), Some(2.0));
}

#[test]
fn elementwise_shape_mismatch_surfaces_as_out_of_bounds() {
    let a = filled(2, 3, 1.0);
    let b = filled(2, 2, 1.0);
    assert!(matches!(
        a.plus(&b),
        Err(MatrixError::IndexOutOfBounds { .. })
    ));
}

#[test]
fn matrix_product() {
    let a = from_rows(&[vec![1.0, 2.0], vec![3.0, 4.0]]);
    let b = from_rows(&[vec![5.0, 6.0], vec![7.0, 8.0]]);
    let p = a.times(&b).unwrap();
    assert_eq!(p, from_rows(&[vec![19.0, 22.0], vec![43.0, 50.0]]));
}

#[test]
fn product_shapes_compose() {
    let a = filled(2, 3, 1.0);
    let b = filled(3, 4, 1.0);
    let p = a.times(&b).unwrap();
    assert_eq!(p, filled(2, 4, 3.0));
}

#[test]
fn product_rejects_a_masked_left_operand() {
    let a = filled(2, 2, 1.0).filter(|_| true);
    let b = filled(2, 2, 1.0);
    assert!(matches!(a.times(&b), Err(MatrixError::Unsupported(_))));
}

#[test]
fn max_and_min() {
    let m = from_rows(&[vec![3.0, -1.0], vec![7.0, 0.5]]);
    assert_eq!(m.max(), 7.0);
    assert_eq!(m.min(), -1.0);
}

#[test]
fn max_of_a_view_sees_only_visible_cells() {
    let m = from_rows(&[vec![3.0, -1.0], vec![7.0, 0.5]]);
    assert_eq!(m.row(0).max(), 3.0);
    assert_eq!(m.filter(|c| c.value.is_some_and(|v| v > 0.0)).min(), 0.5);
}

#[test]
fn max_poisons_on_unset_cells() {
    let mut m = filled(2, 2, 1.0);
    m.unset(1, 1).unwrap();
    assert!(m.max().is_nan());
    assert!(m.min().is_nan());
}

#[test]
fn max_of_an_empty_view_is_negative_infinity() {
    let m = mat(2, 2).slice(0, 0, -1, -1);
    assert_eq!(m.max(), f64::NEG_INFINITY);
    assert_eq!(m.min(), f64::INFINITY);
}

#[test]
fn equality_compares_visible_cells() {
    let mut a = filled(2, 2, 1.0);
    let b = filled(2, 2, 1.0);
    assert_eq!(a, b);
    a.unset(0, 0).unwrap();
    assert_ne!(a, b);
    assert_ne!(filled(1, 4, 1.0), filled(2, 2, 1.0));
}

#[test]
fn display_marks_invisible_cells() {
    let mut m = from_rows(&[vec![1.0, 2.0], vec![3.0, 4.0]]);
    m.unset(0, 1).unwrap();
    assert_eq!(m.to_string(), "[1 _; 3 4]");
}

#[test]
fn value_conversions() {
    let v = Value::from(2.5);
    assert_eq!(v.as_num(), Some(2.5));
    assert_eq!(f64::try_from(&v), Ok(2.5));
    let m = Value::from(mat(1, 1));
    assert!(m.as_matrix().is_some());
    assert!(f64::try_from(&m).is_err());
}
