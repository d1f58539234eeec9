use super::*;

#[test]
fn test_from_rows_and_shape() {
    let a = RecordArray::from_rows(&[[0i32, 1, -1], [0, 0, -1]]).unwrap();
    assert_eq!(a.shape(), (2, 3));
    assert_eq!(&a[1], &[0, 0, -1]);
    assert_eq!(a.to_rows(), vec![vec![0, 1, -1], vec![0, 0, -1]]);
}

#[test]
fn test_from_rows_ragged() {
    let rows: Vec<Vec<i32>> = vec![vec![1, 2], vec![3]];
    assert!(matches!(
        RecordArray::from_rows(&rows),
        Err(CtpError::ShapeMismatch { what: "record width", expected: 2, found: 1 })
    ));
}

#[test]
fn test_from_flat() {
    let a = RecordArray::from_flat(2, vec![1i32, 2, 3, 4]).unwrap();
    assert_eq!(a.len(), 2);
    assert!(RecordArray::from_flat(3, vec![1i32, 2, 3, 4]).is_err());
    assert!(RecordArray::from_flat(0, vec![1i32]).is_err());
    assert!(RecordArray::<i32>::from_flat(0, vec![]).unwrap().is_empty());
}

#[test]
fn test_swap_rows() {
    let mut a = RecordArray::from_rows(&[[1i32, 1], [2, 2], [3, 3]]).unwrap();
    a.swap_rows(2, 0);
    assert_eq!(a.as_flat(), &[3, 3, 2, 2, 1, 1]);
    a.swap_rows(1, 1);
    assert_eq!(a.as_flat(), &[3, 3, 2, 2, 1, 1]);
}

#[test]
fn test_narrow() {
    assert_eq!(narrow::<i8>(-128).unwrap(), -128);
    assert!(matches!(
        narrow::<i8>(128),
        Err(CtpError::ElementOverflow { value: 128 })
    ));
}

#[test]
fn test_uniform_shape() {
    let a = RecordArray::from_rows(&[[1i32, 2]]).unwrap();
    let b = RecordArray::from_rows(&[[1i32, 2, 3]]).unwrap();
    assert_eq!(RecordBatch::<i32>::default().uniform_shape().unwrap(), (0, 0));
    assert_eq!(RecordBatch::new(vec![a.clone(), a.clone()]).uniform_shape().unwrap(), (1, 2));
    assert!(matches!(
        RecordBatch::new(vec![a, b]).uniform_shape(),
        Err(CtpError::ShapeMismatch { what: "array width", .. })
    ));
}

#[test]
fn test_error_messages() {
    let err = CtpError::PathwayNotUnique {
        row: 2,
        reason: NotUnique::DuplicateWanted { first: 0 },
    };
    assert_eq!(err.to_string(), "wanted pathway 2 is not unique: it repeats wanted row 0");
    assert_eq!(
        CtpError::PathwayNotFound { row: 1 }.to_string(),
        "wanted pathway 1 does not appear in the full set"
    );
}

#[test]
fn test_zero_width_rows_rejected() {
    let rows: Vec<Vec<i32>> = vec![vec![], vec![]];
    assert!(matches!(
        RecordArray::from_rows(&rows),
        Err(CtpError::ShapeMismatch { what: "record width", expected: 1, found: 0 })
    ));

    let mut a = RecordArray::<i32>::with_width(0);
    assert!(a.push_row(&[]).is_err());
    assert_eq!(a.len(), 0);

    // no rows at all is still a valid empty array
    let none: Vec<Vec<i32>> = Vec::new();
    assert!(RecordArray::from_rows(&none).unwrap().is_empty());
}
