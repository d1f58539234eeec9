use super::compare::*;
use super::core::*;
use crate::common::{CtpError, RecordArray, RecordBatch};
use crate::permute::apply_order;
use crate::uniq::is_sorted;
use proptest::prelude::*;
use std::cmp::Ordering;

fn arr(rows: &[&[i32]]) -> RecordArray<i32> {
    RecordArray::from_rows(rows).unwrap()
}

#[test]
fn test_compare_first_index_decides() {
    assert_eq!(compare_records(&[0, 9, 9], &[1, 0, 0]).unwrap(), Ordering::Less);
    assert_eq!(compare_records(&[2, 0], &[1, 5]).unwrap(), Ordering::Greater);
}

#[test]
fn test_compare_ties_fall_through() {
    assert_eq!(compare_records(&[1, 2, 3], &[1, 2, 4]).unwrap(), Ordering::Less);
    assert_eq!(compare_records(&[1, -2, 3], &[1, -2, 3]).unwrap(), Ordering::Equal);
    assert_eq!(compare_records(&[1, 0, 3], &[1, -1, 9]).unwrap(), Ordering::Greater);
}

#[test]
fn test_compare_unequal_length_is_shape_mismatch() {
    let err = compare_records(&[1, 2], &[1, 2, 3]).unwrap_err();
    assert!(matches!(err, CtpError::ShapeMismatch { expected: 2, found: 3, .. }));
}

#[test]
fn test_compare_arrays_row_major() {
    let a = arr(&[&[0, 1], &[5, 5]]);
    let b = arr(&[&[0, 2], &[0, 0]]);
    assert_eq!(compare_arrays(&a, &b).unwrap(), Ordering::Less);
    assert!(arrays_equal(&a, &a.clone()).unwrap());
    assert!(!arrays_equal(&a, &b).unwrap());
    let c = arr(&[&[0, 1]]);
    assert!(compare_arrays(&a, &c).is_err());
}

#[test]
fn test_sort_inplace_basic() {
    let mut a = arr(&[&[1, 0], &[0, 1], &[0, -1], &[1, -1]]);
    sort_inplace(&mut a);
    assert_eq!(a, arr(&[&[0, -1], &[0, 1], &[1, -1], &[1, 0]]));
}

#[test]
fn test_sort_inplace_odd_length_and_trivial() {
    let mut a = arr(&[&[3], &[1], &[2], &[0], &[4]]);
    sort_inplace(&mut a);
    assert_eq!(a.as_flat(), &[0, 1, 2, 3, 4]);

    let mut single = arr(&[&[7, 7]]);
    sort_inplace(&mut single);
    assert_eq!(single.as_flat(), &[7, 7]);

    let mut empty = RecordArray::<i32>::with_width(3);
    sort_inplace(&mut empty);
    assert!(empty.is_empty());
}

#[test]
fn test_argsort_is_stable() {
    let a = arr(&[&[5], &[3], &[3], &[1]]);
    let order = argsort(&a);
    assert_eq!(order, vec![3, 1, 2, 0]);
}

#[test]
fn test_argsort_applied_gives_sorted() {
    let mut a = arr(&[&[5], &[3], &[3], &[1]]);
    let order = argsort(&a);
    apply_order(&mut a, &order).unwrap();
    assert_eq!(a.as_flat(), &[1, 3, 3, 5]);
}

#[test]
fn test_argsort_does_not_move_input() {
    let a = arr(&[&[2, 0], &[1, 0]]);
    let before = a.clone();
    let _ = argsort(&a);
    assert_eq!(a, before);
}

#[test]
fn test_argsort_batch_orders_whole_arrays() {
    let batch = RecordBatch::new(vec![
        arr(&[&[1, 0], &[0, 0]]),
        arr(&[&[0, 1], &[9, 9]]),
        arr(&[&[0, 1], &[0, 0]]),
        arr(&[&[1, 0], &[0, 0]]),
    ]);
    let order = argsort_batch(&batch).unwrap();
    assert_eq!(order, vec![2, 1, 0, 3]);
}

#[test]
fn test_argsort_batch_rejects_mixed_shapes() {
    let batch = RecordBatch::new(vec![arr(&[&[1, 0]]), arr(&[&[1, 0], &[0, 0]])]);
    assert!(matches!(
        argsort_batch(&batch),
        Err(CtpError::ShapeMismatch { what: "array row count", .. })
    ));
}

#[test]
fn test_sort_batch_inplace() {
    let mut batch = RecordBatch::new(vec![arr(&[&[2]]), arr(&[&[0]]), arr(&[&[1]])]);
    sort_batch_inplace(&mut batch).unwrap();
    let flat: Vec<i32> = batch.arrays().iter().map(|a| a.row(0)[0]).collect();
    assert_eq!(flat, vec![0, 1, 2]);
}

fn record_array(max_rows: usize) -> impl Strategy<Value = RecordArray<i32>> {
    (1usize..5).prop_flat_map(move |width| {
        prop::collection::vec(prop::collection::vec(-3i32..=3, width), 0..max_rows)
            .prop_map(move |rows| {
                let mut a = RecordArray::with_width(width);
                for r in &rows {
                    a.push_row(r).unwrap();
                }
                a
            })
    })
}

proptest! {
    #[test]
    fn prop_sort_inplace_sorts(a in record_array(64)) {
        let mut a = a;
        sort_inplace(&mut a);
        prop_assert!(is_sorted(&a));
    }

    #[test]
    fn prop_argsort_round_trip_matches_sort(a in record_array(64)) {
        let mut sorted = a.clone();
        sort_inplace(&mut sorted);
        let mut permuted = a.clone();
        let order = argsort(&a);
        apply_order(&mut permuted, &order).unwrap();
        prop_assert_eq!(permuted, sorted);
    }

    #[test]
    fn prop_argsort_stable(a in record_array(64)) {
        let order = argsort(&a);
        for pair in order.windows(2) {
            if a.row(pair[0]) == a.row(pair[1]) {
                prop_assert!(pair[0] < pair[1]);
            }
        }
    }

    #[test]
    fn prop_sort_matches_std_stable_sort(a in record_array(64)) {
        let mut expected = a.to_rows();
        expected.sort();
        let mut ours = a.clone();
        sort_inplace(&mut ours);
        prop_assert_eq!(ours.to_rows(), expected);
    }
}
