use cute_layout::{
    coalesce_layout, composition, composition_by_mode, coordinate_grid, divide_layout, lv,
    mod_shape, offset_grid, tile, ErrorKind, Grid, Layout, LayoutError,
};

// Helper to make test out easier to read/compare
fn layout(shape: cute_layout::LayoutValue, stride: cute_layout::LayoutValue) -> Layout {
    Layout::new(shape, stride).unwrap()
}

// division
// https://docs.nvidia.com/cutlass/latest/media/docs/cpp/cute/02_layout_algebra.html#computing-composition

#[test]
fn test_layout_algebra_divide() {
    // (6,2):(1,6) / 2 => (3,2):(2,6)
    let a = layout(lv!(6, 2), lv!(1, 6));
    let r = divide_layout(&a, 2).unwrap();
    assert_eq!(r, layout(lv!(3, 2), lv!(2, 6)));

    // (6,2):(1,6) / 3 => (2,2):(3,6)
    let r = divide_layout(&a, 3).unwrap();
    assert_eq!(r.to_string(), "(2,2):(3,6)");

    // (3,6,2,8):(5,15,90,180) / 72 => (1,1,1,4):(360,360,360,360)
    let b = layout(lv!(3, 6, 2, 8), lv!(5, 15, 90, 180));
    let r = divide_layout(&b, 72).unwrap();
    assert_eq!(r, layout(lv!(1, 1, 1, 4), lv!(360, 360, 360, 360)));
}

#[test]
fn test_layout_algebra_divide_keeps_nesting() {
    // (12,(4,8)):(59,(13,1)) / 24 => (1,(2,8)):(1416,(26,1))
    let a = layout(lv!(12, lv!(4, 8)), lv!(59, lv!(13, 1)));
    let r = divide_layout(&a, 24).unwrap();
    assert_eq!(r.to_string(), "(1,(2,8)):(1416,(26,1))");

    // 20:2 / 4 => 5:8
    let b = layout(lv!(20), lv!(2));
    assert_eq!(divide_layout(&b, 4).unwrap().to_string(), "5:8");
}

#[test]
fn test_layout_algebra_divide_failure() {
    let a = layout(lv!(3, 6, 2, 8), lv!(5, 15, 90, 180));

    // 3 does not divide 4
    let err = divide_layout(&a, 4).unwrap_err();
    assert_eq!(
        err,
        LayoutError::Divisibility {
            mode: 0,
            size: 3,
            remaining: 4,
        }
    );

    // 5 is not a multiple of 3
    let err = divide_layout(&a, 3 * 5).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Divisibility);

    // 3*6*2*8 = 288 is exhausted before 576
    let err = divide_layout(&a, 576).unwrap_err();
    assert!(matches!(
        err,
        LayoutError::UnconsumedDivisor { remaining: 2, .. }
    ));
}

#[test]
fn test_layout_algebra_divide_overflow() {
    // 4:2^62 / 2 would need stride 2^63
    let a = layout(lv!(4), lv!(1i64 << 62));
    let err = divide_layout(&a, 2).unwrap_err();
    assert!(matches!(err, LayoutError::Overflow { .. }));
    assert_eq!(err.kind(), ErrorKind::InvalidValue);

    // composition divides the outer layout by the inner stride
    let err = composition(&a, &layout(lv!(2), lv!(2))).unwrap_err();
    assert!(matches!(err, LayoutError::Overflow { .. }));
}

// modulo

#[test]
fn test_layout_algebra_mod_shape() {
    assert_eq!(mod_shape(&lv!(8), 2), lv!(2));
    assert_eq!(mod_shape(&lv!(6, 2), 6), lv!(6, 1));
    assert_eq!(mod_shape(&lv!(3, 6, 2, 8), 6), lv!(3, 2, 1, 1));
    assert_eq!(mod_shape(&lv!(1, 2, 2, 8), 16), lv!(1, 2, 2, 4));
    assert_eq!(mod_shape(&lv!(12, lv!(4, 8)), 24), lv!(12, lv!(2, 1)));
}

// coalesce

#[test]
fn test_layout_algebra_coalesce() {
    // (3,1):(8,2) => 3:8
    let a = layout(lv!(3, 1), lv!(8, 2));
    assert_eq!(coalesce_layout(&a), layout(lv!(3), lv!(8)));

    // (5,1):(16,80) => 5:16
    let a = layout(lv!(5, 1), lv!(16, 80));
    assert_eq!(coalesce_layout(&a).to_string(), "5:16");

    // (2,2):(24,2) has no trailing unit mode
    let a = layout(lv!(2, 2), lv!(24, 2));
    assert_eq!(coalesce_layout(&a), a);

    // (1,1):(4,8) => 1:0
    let a = layout(lv!(1, 1), lv!(4, 8));
    assert_eq!(coalesce_layout(&a).to_string(), "1:0");
}

// composition
// https://docs.nvidia.com/cutlass/latest/media/docs/cpp/cute/02_layout_algebra.html#composition

#[test]
fn test_layout_algebra_composition() {
    // (3,6,2,8):(5,15,90,180) o 16:9 => (1,2,2,4):(45,45,90,180)
    let a = layout(lv!(3, 6, 2, 8), lv!(5, 15, 90, 180));
    let b = layout(lv!(16), lv!(9));
    let r = composition(&a, &b).unwrap();
    assert_eq!(r, layout(lv!(1, 2, 2, 4), lv!(45, 45, 90, 180)));
}

// computing-composition
// https://docs.nvidia.com/cutlass/latest/media/docs/cpp/cute/02_layout_algebra.html#computing-composition

#[test]
fn test_layout_algebra_computing_composition() {
    // Example 1: A = (6,2):(8,2), B = (4,3):(3,1)
    // R = ((2,2),3):((24,2),8)
    let a = layout(lv!(6, 2), lv!(8, 2));
    let b = layout(lv!(4, 3), lv!(3, 1));
    let r = composition(&a, &b).unwrap();
    assert_eq!(r.to_string(), "((2,2),3):((24,2),8)");

    // Example 2: 20:2 o (5,4):(4,1) => (5,4):(8,2)
    // Reshape layout 20:2 as a 5x4 matrix in row-major order
    let a2 = layout(lv!(20), lv!(2));
    let b2 = layout(lv!(5, 4), lv!(4, 1));
    let r2 = composition(&a2, &b2).unwrap();
    assert_eq!(r2.to_string(), "(5,4):(8,2)");

    // Example 3: (10,2):(16,4) o (5,4):(1,5)
    // Reshape as 5x4 matrix in column-major order
    let a3 = layout(lv!(10, 2), lv!(16, 4));
    let b3 = layout(lv!(5, 4), lv!(1, 5));
    let r3 = composition(&a3, &b3).unwrap();
    assert_eq!(r3.to_string(), "(5,(2,2)):(16,(80,4))");
}

#[test]
fn test_layout_algebra_composition_is_not_commutative() {
    let a = layout(lv!(6, 2), lv!(8, 2));
    let b = layout(lv!(4, 3), lv!(3, 1));
    assert_eq!(
        composition(&a, &b).unwrap().to_string(),
        "((2,2),3):((24,2),8)"
    );
    // dividing (4,3) by 8 leaves 2, which does not divide 3
    assert!(composition(&b, &a).is_err());
}

#[test]
fn test_layout_algebra_composition_zero_stride() {
    // 5:0 divides the outer layout by 0
    let a = layout(lv!(4, 8), lv!(1, 4));
    let b = layout(lv!(5), lv!(0));
    let err = composition(&a, &b).unwrap_err();
    assert_eq!(
        err,
        LayoutError::InvalidValue {
            value: 0,
            within: lv!(4, 8),
            reason: "divisor must be positive",
        }
    );
    assert_eq!(err, divide_layout(&a, 0).unwrap_err());

    // a zero stride in any inner mode fails the whole composition
    let b = layout(lv!(2, 5), lv!(1, 0));
    assert_eq!(composition(&a, &b).unwrap_err().kind(), ErrorKind::InvalidValue);
}

#[test]
fn test_layout_algebra_composition_failure() {
    // 16:9 needs 9 to consume (2,8) cleanly
    let a = layout(lv!(2, 8), lv!(1, 2));
    let b = layout(lv!(16), lv!(9));
    let err = composition(&a, &b).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Divisibility);

    // a failure in any mode aborts the whole composition
    let b = layout(lv!(2, 4), lv!(1, 3));
    let err = composition(&a, &b).unwrap_err();
    assert_eq!(
        err,
        LayoutError::Divisibility {
            mode: 0,
            size: 2,
            remaining: 3,
        }
    );
}

// by-mode-composition
// https://docs.nvidia.com/cutlass/latest/media/docs/cpp/cute/02_layout_algebra.html#by-mode-composition

#[test]
fn test_layout_algebra_by_mode_composition() {
    // a = (12,(4,8)):(59,(13,1))
    let a = layout(lv!(12, lv!(4, 8)), lv!(59, lv!(13, 1)));

    // tiler = <3:4, 8:2> (apply 3:4 to mode-0, 8:2 to mode-1)
    let tiler = tile![layout(lv!(3), lv!(4)), layout(lv!(8), lv!(2))];
    assert_eq!(tiler.to_string(), "<3:4, 8:2>");

    // result = (3,(2,4)):(236,(26,1))
    let result = composition_by_mode(&a, &tiler).unwrap();
    assert_eq!(result.to_string(), "(3,(2,4)):(236,(26,1))");

    // tiler = <3:1, 8:1>
    let tiler = tile![
        Layout::compact(lv!(3)).unwrap(),
        Layout::compact(lv!(8)).unwrap(),
    ];

    // result = (3,(4,2)):(59,(13,1))
    let result = composition_by_mode(&a, &tiler).unwrap();
    assert_eq!(result.to_string(), "(3,(4,2)):(59,(13,1))");

    // one tile element per top-level mode
    let tiler = tile![layout(lv!(3), lv!(4))];
    let err = composition_by_mode(&a, &tiler).unwrap_err();
    assert!(matches!(
        err,
        LayoutError::ModeCountMismatch {
            expected: 2,
            got: 1,
            ..
        }
    ));

    // a leaf layout is a single mode
    let leaf = layout(lv!(20), lv!(2));
    let result = composition_by_mode(&leaf, &tile![layout(lv!(5), lv!(4))]).unwrap();
    assert_eq!(result.to_string(), "(5):(8)");
}

// grids

#[test]
fn test_offset_grid_matrix() {
    let a = layout(lv!(2, lv!(2, 2)), lv!(4, lv!(2, 1)));
    let grid = offset_grid(&a).unwrap();
    assert_eq!(grid.dims(), (2, 4));
    let Grid::Matrix { rows, cols, cells } = grid else {
        panic!("expected a matrix");
    };
    assert_eq!(rows, vec![lv!(0), lv!(1)]);
    assert_eq!(cols[2], lv!(0, 1));
    assert_eq!(cells, vec![vec![0, 2, 1, 3], vec![4, 6, 5, 7]]);
}

#[test]
fn test_coordinate_grid_of_composition_inner() {
    // the inner layout of (6,2):(8,2) o (4,3):(3,1) shown in the outer layout's shape
    let outer = layout(lv!(6, 2), lv!(8, 2));
    let inner = layout(lv!(4, 3), lv!(3, 1));
    let grid = coordinate_grid(&inner, outer.shape()).unwrap();
    assert_eq!(grid.dims(), (4, 3));
    assert_eq!(grid.get(0, 0), Some(&lv!(0, 0)));
    assert_eq!(grid.get(1, 0), Some(&lv!(3, 0)));
    assert_eq!(grid.get(2, 1), Some(&lv!(1, 1)));
    assert_eq!(grid.get(3, 2), Some(&lv!(5, 1)));
    assert_eq!(grid.get(4, 0), None);
}
