use std::fmt::{self, Display};

use serde::{Deserialize, Serialize};

use crate::{LayoutError, Result};

// LayoutValue - Recursive integer or list type

/// A shape, stride or coordinate: either a single integer or an ordered list of values.
///
/// Serializes untagged, so `(12,(4,8))` is exchanged as `[12,[4,8]]`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LayoutValue {
    Leaf(i64),
    Node(Vec<LayoutValue>),
}

impl LayoutValue {
    /// Number of top-level modes. A leaf has rank 1, a node has rank = len.
    pub fn rank(&self) -> usize {
        match self {
            LayoutValue::Leaf(_) => 1,
            LayoutValue::Node(v) => v.len(),
        }
    }

    /// Maximum nesting depth. A leaf has depth 0.
    pub fn depth(&self) -> usize {
        match self {
            LayoutValue::Leaf(_) => 0,
            LayoutValue::Node(v) => 1 + v.iter().map(|x| x.depth()).max().unwrap_or(0),
        }
    }

    /// Product of all leaves. This is the size of the coordinate space of a shape.
    /// An empty node counts as 1. Fails with [`LayoutError::Overflow`] if the product
    /// does not fit in an `i64`.
    pub fn size(&self) -> Result<i64> {
        self.flatten()
            .into_iter()
            .try_fold(1i64, |acc, n| acc.checked_mul(n))
            .ok_or_else(|| LayoutError::Overflow {
                op: "size",
                within: self.clone(),
            })
    }

    /// Number of leaves, i.e. the length of [`LayoutValue::flatten`].
    pub fn leaf_count(&self) -> usize {
        match self {
            LayoutValue::Leaf(_) => 1,
            LayoutValue::Node(v) => v.iter().map(|x| x.leaf_count()).sum(),
        }
    }

    /// Leaves in pre-order, left to right. Node boundaries are discarded.
    pub fn flatten(&self) -> Vec<i64> {
        let mut leaves = Vec::with_capacity(self.leaf_count());
        self.flatten_into(&mut leaves);
        leaves
    }

    fn flatten_into(&self, leaves: &mut Vec<i64>) {
        match self {
            LayoutValue::Leaf(n) => leaves.push(*n),
            LayoutValue::Node(v) => v.iter().for_each(|x| x.flatten_into(leaves)),
        }
    }

    pub fn is_leaf(&self) -> bool {
        matches!(self, LayoutValue::Leaf(_))
    }

    pub fn as_leaf(&self) -> Option<i64> {
        match self {
            LayoutValue::Leaf(n) => Some(*n),
            LayoutValue::Node(_) => None,
        }
    }

    /// Top-level modes of a node. A leaf is treated as its own single mode.
    pub fn modes(&self) -> &[LayoutValue] {
        match self {
            LayoutValue::Leaf(_) => std::slice::from_ref(self),
            LayoutValue::Node(v) => v,
        }
    }

    /// Returns `true` if both trees have the same nesting and node lengths everywhere.
    pub fn congruent(&self, other: &LayoutValue) -> bool {
        match (self, other) {
            (LayoutValue::Leaf(_), LayoutValue::Leaf(_)) => true,
            (LayoutValue::Node(a), LayoutValue::Node(b)) => {
                a.len() == b.len() && a.iter().zip(b).all(|(x, y)| x.congruent(y))
            }
            _ => false,
        }
    }

    /// Wrap this value in a single-element node.
    /// Turns `(4,2)` into `((4,2))`.
    pub fn wrap(self) -> LayoutValue {
        LayoutValue::Node(vec![self])
    }
}

impl Display for LayoutValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LayoutValue::Leaf(n) => write!(f, "{}", n),
            LayoutValue::Node(v) => {
                write!(f, "(")?;
                for (i, x) in v.iter().enumerate() {
                    if i > 0 {
                        write!(f, ",")?;
                    }
                    write!(f, "{}", x)?;
                }
                write!(f, ")")
            }
        }
    }
}

impl From<i64> for LayoutValue {
    fn from(n: i64) -> Self {
        LayoutValue::Leaf(n)
    }
}

impl<T: Into<LayoutValue>, const N: usize> From<[T; N]> for LayoutValue {
    fn from(arr: [T; N]) -> Self {
        LayoutValue::Node(arr.into_iter().map(|x| x.into()).collect())
    }
}

impl<T: Into<LayoutValue>> From<Vec<T>> for LayoutValue {
    fn from(v: Vec<T>) -> Self {
        LayoutValue::Node(v.into_iter().map(|x| x.into()).collect())
    }
}

/// Construct a [`LayoutValue`]. Use: `lv!(2, 3)` or `lv!(12, lv!(4, 8))`.
#[macro_export]
macro_rules! lv {
    ($e:expr) => { $crate::LayoutValue::from($e) };
    ($($e:expr),+ $(,)?) => { $crate::LayoutValue::Node(vec![$( $crate::lv!($e) ),+]) };
}

/// Reassemble flat leaves into the nesting of `template`, leaf for leaf.
///
/// The inverse of [`LayoutValue::flatten`]: `unflatten_like(&t.flatten(), &t) == t`.
/// Fails if `flat` does not have exactly one entry per template leaf.
pub fn unflatten_like(flat: &[i64], template: &LayoutValue) -> Result<LayoutValue> {
    let expected = template.leaf_count();
    if flat.len() != expected {
        return Err(LayoutError::DimensionMismatch {
            lhs: LayoutValue::from(flat.to_vec()),
            lhs_len: flat.len(),
            rhs: template.clone(),
            rhs_len: expected,
        });
    }
    Ok(rebuild_like(flat, template))
}

/// [`unflatten_like`] for callers that produced `flat` from `template` themselves.
pub(crate) fn rebuild_like(flat: &[i64], template: &LayoutValue) -> LayoutValue {
    debug_assert_eq!(flat.len(), template.leaf_count());
    let mut idx = 0;
    unflatten_inner(flat, template, &mut idx)
}

fn unflatten_inner(flat: &[i64], template: &LayoutValue, idx: &mut usize) -> LayoutValue {
    match template {
        LayoutValue::Leaf(_) => {
            let val = flat[*idx];
            *idx += 1;
            LayoutValue::Leaf(val)
        }
        LayoutValue::Node(modes) => LayoutValue::Node(
            modes
                .iter()
                .map(|m| unflatten_inner(flat, m, idx))
                .collect(),
        ),
    }
}

// Coordinate labels

/// Options for [`format_coord`].
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct CoordFormat {
    /// Strip top-level single-element wrappers, so `((3))` prints as `3`.
    pub collapse_singletons: bool,
}

/// Format a coordinate for display: a leaf as its integer, a node as a
/// parenthesized comma-joined list.
///
/// With `collapse_singletons` set, all nested single-element wrappers at the top are
/// stripped, so `((3))` prints as `3`; wrappers below a multi-element node are kept.
pub fn format_coord(coord: &LayoutValue, format: CoordFormat) -> String {
    let mut coord = coord;
    if format.collapse_singletons {
        while let LayoutValue::Node(modes) = coord {
            match modes.as_slice() {
                [only] => coord = only,
                _ => break,
            }
        }
    }
    coord.to_string()
}
