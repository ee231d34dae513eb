use serde::Serialize;

use crate::{offset_to_coordinate, Layout, LayoutError, LayoutValue, Result};

// Grids - Per-cell values of a layout, arranged as the visualizer draws them

/// Cells of a layout in display order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum Grid<T> {
    /// A layout with exactly two top-level modes: mode 0 runs down the rows, mode 1
    /// across the columns.
    Matrix {
        rows: Vec<LayoutValue>,
        cols: Vec<LayoutValue>,
        cells: Vec<Vec<T>>,
    },
    /// Any other layout: a single row over all coordinates in column-major order.
    Vector {
        coords: Vec<LayoutValue>,
        cells: Vec<T>,
    },
}

impl<T> Grid<T> {
    /// Number of (rows, columns).
    pub fn dims(&self) -> (usize, usize) {
        match self {
            Grid::Matrix { rows, cols, .. } => (rows.len(), cols.len()),
            Grid::Vector { coords, .. } => (1, coords.len()),
        }
    }

    pub fn get(&self, row: usize, col: usize) -> Option<&T> {
        match self {
            Grid::Matrix { cells, .. } => cells.get(row)?.get(col),
            Grid::Vector { cells, .. } => match row {
                0 => cells.get(col),
                _ => None,
            },
        }
    }

    /// Apply a fallible function to every cell, keeping the labels.
    pub fn try_map<U>(self, mut f: impl FnMut(T) -> Result<U>) -> Result<Grid<U>> {
        Ok(match self {
            Grid::Matrix { rows, cols, cells } => Grid::Matrix {
                rows,
                cols,
                cells: cells
                    .into_iter()
                    .map(|row| row.into_iter().map(&mut f).collect::<Result<Vec<_>>>())
                    .collect::<Result<Vec<_>>>()?,
            },
            Grid::Vector { coords, cells } => Grid::Vector {
                coords,
                cells: cells.into_iter().map(f).collect::<Result<Vec<_>>>()?,
            },
        })
    }
}

/// Offsets of every coordinate of `layout`.
///
/// In the matrix case a cell is `offset(row coord) + offset(col coord)`, each taken in
/// its own mode. Fails with an overflow error if an offset does not fit in an `i64`.
pub fn offset_grid(layout: &Layout) -> Result<Grid<i64>> {
    if let (2, Some(row_mode), Some(col_mode)) = (layout.rank(), layout.mode(0), layout.mode(1)) {
        let rows = row_mode.coordinates();
        let cols = col_mode.coordinates();
        let row_offsets = rows
            .iter()
            .map(|c| row_mode.offset(c))
            .collect::<Result<Vec<_>>>()?;
        let col_offsets = cols
            .iter()
            .map(|c| col_mode.offset(c))
            .collect::<Result<Vec<_>>>()?;
        let cells = row_offsets
            .iter()
            .map(|r| {
                col_offsets
                    .iter()
                    .map(|c| {
                        r.checked_add(*c).ok_or_else(|| LayoutError::Overflow {
                            op: "offset",
                            within: layout.stride().clone(),
                        })
                    })
                    .collect::<Result<Vec<_>>>()
            })
            .collect::<Result<Vec<_>>>()?;
        return Ok(Grid::Matrix { rows, cols, cells });
    }

    let coords = layout.coordinates();
    let cells = coords
        .iter()
        .map(|c| layout.offset(c))
        .collect::<Result<Vec<_>>>()?;
    Ok(Grid::Vector { coords, cells })
}

/// Offsets of `layout`, each mapped to the coordinate it addresses in `coord_shape`.
///
/// Used to show an inner layout of a composition in terms of the outer layout's shape.
/// Fails with an out-of-range error if an offset falls outside `coord_shape`.
pub fn coordinate_grid(layout: &Layout, coord_shape: &LayoutValue) -> Result<Grid<LayoutValue>> {
    offset_grid(layout)?.try_map(|offset| offset_to_coordinate(offset, coord_shape))
}
