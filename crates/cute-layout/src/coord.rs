use crate::{unflatten_like, LayoutError, LayoutValue, Result};

// Coordinate Generation

/// Enumerate every coordinate of `shape` in column-major order: the first leaf varies
/// fastest, the last slowest. Each coordinate mirrors the nesting of `shape`.
///
/// `generate_coordinates(&lv!(2, 3))` yields `(0,0), (1,0), (0,1), (1,1), (0,2), (1,2)`.
pub fn generate_coordinates(shape: &LayoutValue) -> Vec<LayoutValue> {
    match shape {
        LayoutValue::Leaf(n) => (0..*n).map(LayoutValue::Leaf).collect(),
        LayoutValue::Node(modes) => {
            let per_mode: Vec<Vec<LayoutValue>> = modes.iter().map(generate_coordinates).collect();
            combine(&per_mode)
                .into_iter()
                .map(LayoutValue::Node)
                .collect()
        }
    }
}

/// Same enumeration as [`generate_coordinates`], with every coordinate flattened.
pub fn generate_flat_coordinates(shape: &LayoutValue) -> Vec<Vec<i64>> {
    generate_coordinates(shape)
        .iter()
        .map(LayoutValue::flatten)
        .collect()
}

/// Product of per-mode coordinate lists. The last mode is the outer loop so that the
/// first mode varies fastest.
fn combine(lists: &[Vec<LayoutValue>]) -> Vec<Vec<LayoutValue>> {
    let Some((last, rest)) = lists.split_last() else {
        return vec![vec![]];
    };
    let rest = combine(rest);
    last.iter()
        .flat_map(|last_coord| {
            rest.iter().map(move |rest_coord| {
                let mut coord = Vec::with_capacity(rest_coord.len() + 1);
                coord.extend_from_slice(rest_coord);
                coord.push(last_coord.clone());
                coord
            })
        })
        .collect()
}

// Offset Calculation

/// Dot product of the flattened coordinate and stride.
///
/// Only the flattened lengths have to agree, so nested and flat coordinates are both
/// accepted. No bounds checking is done against any shape. Fails with
/// [`LayoutError::Overflow`] if the offset does not fit in an `i64`.
pub fn calculate_offset(coord: &LayoutValue, stride: &LayoutValue) -> Result<i64> {
    let flat_coord = coord.flatten();
    let flat_stride = stride.flatten();
    if flat_coord.len() != flat_stride.len() {
        return Err(LayoutError::DimensionMismatch {
            lhs: coord.clone(),
            lhs_len: flat_coord.len(),
            rhs: stride.clone(),
            rhs_len: flat_stride.len(),
        });
    }
    flat_coord
        .iter()
        .zip(&flat_stride)
        .try_fold(0i64, |acc, (c, d)| acc.checked_add(c.checked_mul(*d)?))
        .ok_or_else(|| LayoutError::Overflow {
            op: "offset",
            within: coord.clone(),
        })
}

/// Recover the coordinate at column-major position `offset` of `shape`.
///
/// This inverts offsets of the *compact* column-major layout of `shape` only, i.e. the
/// layout whose strides are cumulative products of the shape. It is not an inverse of
/// [`calculate_offset`] for arbitrary strides.
pub fn offset_to_coordinate(offset: i64, shape: &LayoutValue) -> Result<LayoutValue> {
    let size = shape.size()?;
    if offset < 0 || offset >= size {
        return Err(LayoutError::OutOfRange {
            offset,
            shape: shape.clone(),
            size,
        });
    }

    let digits: Vec<i64> = shape
        .flatten()
        .into_iter()
        .scan(offset, |rest, s| {
            let digit = *rest % s;
            *rest /= s;
            Some(digit)
        })
        .collect();
    unflatten_like(&digits, shape)
}
