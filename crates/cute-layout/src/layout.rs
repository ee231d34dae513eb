use std::fmt::{self, Display};

use serde::{Deserialize, Serialize};

use crate::{coord, LayoutError, LayoutValue, Result};

// Layout - A validated (shape, stride) pair mapping coordinates to offsets

/// A CuTe layout. Shape and stride always have identical tree shape, every shape
/// leaf is positive, no node is empty and the size fits in an `i64`; the constructors
/// enforce this.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawLayout")]
pub struct Layout {
    shape: LayoutValue,
    stride: LayoutValue,
}

#[derive(Deserialize)]
struct RawLayout {
    shape: LayoutValue,
    stride: LayoutValue,
}

impl TryFrom<RawLayout> for Layout {
    type Error = LayoutError;

    fn try_from(raw: RawLayout) -> Result<Self> {
        Layout::new(raw.shape, raw.stride)
    }
}

impl Layout {
    /// Create a layout, checking that `shape` and `stride` are congruent trees.
    pub fn new(shape: impl Into<LayoutValue>, stride: impl Into<LayoutValue>) -> Result<Self> {
        let shape = shape.into();
        let stride = stride.into();
        validate_layout(&shape, &stride)?;
        Ok(Layout { shape, stride })
    }

    /// Create a layout with compact column-major strides.
    pub fn compact(shape: impl Into<LayoutValue>) -> Result<Self> {
        let shape = shape.into();
        validate_layout(&shape, &shape)?;
        let stride = compact_col_major(&shape)?;
        Ok(Layout { shape, stride })
    }

    /// Build a layout from parts already known to be valid, e.g. results of the algebra
    /// operating on a valid layout. The algebra never grows a shape past the size of
    /// its input, so the size invariant carries over.
    pub(crate) fn from_parts(shape: LayoutValue, stride: LayoutValue) -> Self {
        debug_assert!(shape.congruent(&stride));
        debug_assert!(shape.size().is_ok());
        Layout { shape, stride }
    }

    pub fn shape(&self) -> &LayoutValue {
        &self.shape
    }

    pub fn stride(&self) -> &LayoutValue {
        &self.stride
    }

    pub fn into_parts(self) -> (LayoutValue, LayoutValue) {
        (self.shape, self.stride)
    }

    pub fn rank(&self) -> usize {
        self.shape.rank()
    }

    pub fn depth(&self) -> usize {
        self.shape.depth()
    }

    /// Number of coordinates in the layout's domain.
    pub fn size(&self) -> i64 {
        // checked on construction
        self.shape.flatten().iter().product()
    }

    /// Flat shape and stride leaves; entry `i` of both refers to the same mode.
    pub fn flatten(&self) -> (Vec<i64>, Vec<i64>) {
        (self.shape.flatten(), self.stride.flatten())
    }

    /// All coordinates in column-major order, nested like the shape.
    pub fn coordinates(&self) -> Vec<LayoutValue> {
        coord::generate_coordinates(&self.shape)
    }

    /// All coordinates in column-major order, flattened.
    pub fn flat_coordinates(&self) -> Vec<Vec<i64>> {
        coord::generate_flat_coordinates(&self.shape)
    }

    /// Offset of a coordinate. Accepts nested or flat coordinates.
    pub fn offset(&self, coord: &LayoutValue) -> Result<i64> {
        coord::calculate_offset(coord, &self.stride)
    }

    /// Sublayout of top-level mode `i`. A leaf layout has a single mode 0.
    pub fn mode(&self, i: usize) -> Option<Layout> {
        let shape = self.shape.modes().get(i)?;
        let stride = self.stride.modes().get(i)?;
        Some(Layout::from_parts(shape.clone(), stride.clone()))
    }

    /// Sublayouts of all top-level modes.
    pub fn modes(&self) -> impl Iterator<Item = Layout> + '_ {
        self.shape
            .modes()
            .iter()
            .zip(self.stride.modes())
            .map(|(s, d)| Layout::from_parts(s.clone(), d.clone()))
    }
}

impl Display for Layout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.shape, self.stride)
    }
}

// Validation

/// Check that `shape` and `stride` form a valid layout: congruent trees, no empty
/// nodes, positive shape leaves and a size that fits in an `i64`.
pub fn validate_layout(shape: &LayoutValue, stride: &LayoutValue) -> Result<()> {
    validate_inner(shape, stride, shape)?;
    shape.size().map(|_| ())
}

fn validate_inner(shape: &LayoutValue, stride: &LayoutValue, root: &LayoutValue) -> Result<()> {
    match (shape, stride) {
        (LayoutValue::Leaf(s), LayoutValue::Leaf(_)) if *s < 1 => Err(LayoutError::InvalidValue {
            value: *s,
            within: root.clone(),
            reason: "shape leaves must be positive",
        }),
        (LayoutValue::Leaf(_), LayoutValue::Leaf(_)) => Ok(()),
        (LayoutValue::Node(shapes), LayoutValue::Node(strides)) => {
            if shapes.len() != strides.len() {
                return Err(LayoutError::StructuralMismatch {
                    shape: shape.clone(),
                    stride: stride.clone(),
                });
            }
            if shapes.is_empty() {
                return Err(LayoutError::EmptyInput(root.clone()));
            }
            shapes
                .iter()
                .zip(strides)
                .try_for_each(|(s, d)| validate_inner(s, d, root))
        }
        _ => Err(LayoutError::StructuralMismatch {
            shape: shape.clone(),
            stride: stride.clone(),
        }),
    }
}

// Stride Generation

/// Generate compact column-major strides.
/// First mode has stride 1, subsequent modes have stride = prev * prev_shape.
/// Fails with [`LayoutError::Overflow`] if the size of `shape` does not fit in an `i64`.
pub fn compact_col_major(shape: &LayoutValue) -> Result<LayoutValue> {
    compact_col_major_inner(shape, 1).ok_or_else(|| LayoutError::Overflow {
        op: "compact strides",
        within: shape.clone(),
    })
}

fn compact_col_major_inner(shape: &LayoutValue, current: i64) -> Option<LayoutValue> {
    match shape {
        LayoutValue::Leaf(_) => Some(LayoutValue::Leaf(current)),
        LayoutValue::Node(shapes) => {
            let mut strides = Vec::with_capacity(shapes.len());
            let mut stride = current;
            for s in shapes {
                strides.push(compact_col_major_inner(s, stride)?);
                stride = s.flatten().into_iter().try_fold(stride, i64::checked_mul)?;
            }
            Some(LayoutValue::Node(strides))
        }
    }
}
