//! CuTe Layout Algebra - the mathematics of NVIDIA CuTe's hierarchical (shape, stride) layouts.
//!
//! A [`Layout`] maps multi-dimensional coordinates to linear offsets. On top of that this
//! crate provides coordinate enumeration, offset calculation, division, modulo, coalescing
//! and composition, all as pure functions over immutable [`LayoutValue`] trees.
//!
//! ```
//! use cute_layout::{composition, lv, Layout};
//!
//! let a = Layout::new(lv!(6, 2), lv!(8, 2))?;
//! let b = Layout::new(lv!(4, 3), lv!(3, 1))?;
//! assert_eq!(composition(&a, &b)?.to_string(), "((2,2),3):((24,2),8)");
//! # Ok::<(), cute_layout::LayoutError>(())
//! ```
//!
//! Based on: https://docs.nvidia.com/cutlass/latest/media/docs/cpp/cute/02_layout_algebra.html

#[macro_use]
mod value;

mod algebra;
mod coord;
mod error;
mod grid;
mod layout;

pub use algebra::{coalesce_layout, composition, composition_by_mode, divide_layout, mod_shape, Tile};
pub use coord::{
    calculate_offset, generate_coordinates, generate_flat_coordinates, offset_to_coordinate,
};
pub use error::{ErrorKind, LayoutError, Result};
pub use grid::{coordinate_grid, offset_grid, Grid};
pub use layout::{compact_col_major, validate_layout, Layout};
pub use value::{format_coord, unflatten_like, CoordFormat, LayoutValue};

/// Flatten a shape and stride pair into equal-length leaf sequences.
///
/// Both trees are flattened independently; for a valid layout entry `i` of each refers to
/// the same mode.
pub fn flatten(shape: &LayoutValue, stride: &LayoutValue) -> (Vec<i64>, Vec<i64>) {
    (shape.flatten(), stride.flatten())
}

/// Product of all leaves of `shape`. Fails with [`LayoutError::Overflow`] if it does not
/// fit in an `i64`.
pub fn count_elements(shape: &LayoutValue) -> Result<i64> {
    shape.size()
}
