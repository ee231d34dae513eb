use std::fmt::{self, Display};

use itertools::Itertools;
use log::trace;

use crate::{value::rebuild_like, Layout, LayoutError, LayoutValue, Result};

// Division

/// Divide a layout by `divisor`, consuming the divisor across the flattened modes from
/// mode 0 onwards.
///
/// A mode of size `s` that absorbs the rest of the divisor `r` (`r <= s`) becomes
/// `(s / r) : (stride * r)`. A mode that is fully consumed (`r > s`) becomes
/// `1 : (stride * r)` and the division continues with `r / s`. The result keeps the
/// nesting of the input.
///
/// Fails if a mode and the remaining divisor do not divide one another, if the modes
/// run out before the divisor is consumed, or if a scaled stride overflows.
pub fn divide_layout(layout: &Layout, divisor: i64) -> Result<Layout> {
    if divisor < 1 {
        return Err(LayoutError::InvalidValue {
            value: divisor,
            within: layout.shape().clone(),
            reason: "divisor must be positive",
        });
    }
    trace!("divide {layout} by {divisor}");

    let overflow = || LayoutError::Overflow {
        op: "divided stride",
        within: layout.stride().clone(),
    };

    let (mut shapes, mut strides) = layout.flatten();
    let mut remaining = divisor;
    for (mode, (shape, stride)) in shapes.iter_mut().zip(strides.iter_mut()).enumerate() {
        if remaining == 1 {
            break;
        }
        let size = *shape;
        if remaining <= size {
            if size % remaining != 0 {
                return Err(LayoutError::Divisibility {
                    mode,
                    size,
                    remaining,
                });
            }
            *shape = size / remaining;
            *stride = stride.checked_mul(remaining).ok_or_else(overflow)?;
            remaining = 1;
        } else {
            if remaining % size != 0 {
                return Err(LayoutError::Divisibility {
                    mode,
                    size,
                    remaining,
                });
            }
            // The stride records where the next element along this mode would start.
            *shape = 1;
            *stride = stride.checked_mul(remaining).ok_or_else(overflow)?;
            remaining /= size;
        }
    }
    if remaining != 1 {
        return Err(LayoutError::UnconsumedDivisor {
            shape: layout.shape().clone(),
            divisor,
            remaining,
        });
    }

    Ok(Layout::from_parts(
        rebuild_like(&shapes, layout.shape()),
        rebuild_like(&strides, layout.stride()),
    ))
}

// Modulo

/// Keep the first `modulus` elements of `shape` in column-major order.
///
/// Modes are kept whole while the remaining modulus covers them; the first mode it does
/// not cover is cut to the remainder and every later mode becomes 1. Never fails.
pub fn mod_shape(shape: &LayoutValue, modulus: i64) -> LayoutValue {
    let mut remaining = modulus;
    let kept: Vec<i64> = shape
        .flatten()
        .into_iter()
        .map(|size| match size {
            // degenerate leaf, left alone
            s if s < 1 => s,
            s if remaining >= s => {
                remaining /= s;
                s
            }
            _ if remaining > 0 => std::mem::replace(&mut remaining, 1),
            _ => 1,
        })
        .collect();
    rebuild_like(&kept, shape)
}

// Coalesce

/// Drop trailing size-1 top-level modes.
///
/// `(3,1):(8,2)` becomes `3:8`. If no mode is left the result is `1:0`; a single
/// remaining mode is unwrapped. Nested modes are not touched.
pub fn coalesce_layout(layout: &Layout) -> Layout {
    let (LayoutValue::Node(shapes), LayoutValue::Node(strides)) = (layout.shape(), layout.stride())
    else {
        return layout.clone();
    };

    let keep = shapes
        .iter()
        .rposition(|s| *s != LayoutValue::Leaf(1))
        .map_or(0, |i| i + 1);
    match keep {
        0 => Layout::from_parts(LayoutValue::Leaf(1), LayoutValue::Leaf(0)),
        1 => Layout::from_parts(shapes[0].clone(), strides[0].clone()),
        _ => Layout::from_parts(
            LayoutValue::Node(shapes[..keep].to_vec()),
            LayoutValue::Node(strides[..keep].to_vec()),
        ),
    }
}

// Composition

/// Functional composition `outer ∘ inner`: a layout over `inner`'s shape that addresses
/// `outer`'s offsets.
///
/// For a leaf `inner = n:d` this is `outer` divided by `d`, restricted to its first `n`
/// elements, so a non-positive `d` fails like the division does. For a node, every
/// top-level mode of `inner` is composed with the same `outer` and coalesced. Any
/// failure aborts the whole composition.
pub fn composition(outer: &Layout, inner: &Layout) -> Result<Layout> {
    match (inner.shape().as_leaf(), inner.stride().as_leaf()) {
        (Some(shape), Some(stride)) => {
            trace!("compose {outer} ∘ {inner}");
            let (tmp_shape, tmp_stride) = divide_layout(outer, stride)?.into_parts();
            Ok(Layout::from_parts(mod_shape(&tmp_shape, shape), tmp_stride))
        }
        _ => {
            let (shapes, strides): (Vec<_>, Vec<_>) = inner
                .modes()
                .map(|mode| -> Result<_> {
                    let composed = composition(outer, &mode)?;
                    Ok(coalesce_layout(&composed).into_parts())
                })
                .collect::<Result<Vec<_>>>()?
                .into_iter()
                .unzip();
            Ok(Layout::from_parts(
                LayoutValue::Node(shapes),
                LayoutValue::Node(strides),
            ))
        }
    }
}

// Tile - A tuple of Layouts for by-mode composition

/// A collection of layouts applied per-mode during composition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tile(pub Vec<Layout>);

impl Tile {
    pub fn new(layouts: Vec<Layout>) -> Self {
        Tile(layouts)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, i: usize) -> Option<&Layout> {
        self.0.get(i)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Layout> {
        self.0.iter()
    }
}

impl std::ops::Index<usize> for Tile {
    type Output = Layout;

    fn index(&self, i: usize) -> &Self::Output {
        &self.0[i]
    }
}

impl FromIterator<Layout> for Tile {
    fn from_iter<I: IntoIterator<Item = Layout>>(iter: I) -> Self {
        Tile(iter.into_iter().collect())
    }
}

impl Display for Tile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<{}>", self.0.iter().join(", "))
    }
}

/// Create a [`Tile`] from layouts for by-mode composition.
#[macro_export]
macro_rules! tile {
    ($($layout:expr),+ $(,)?) => {
        $crate::Tile::new(vec![$($layout),+])
    };
}

/// Compose each top-level mode of `layout` with the corresponding tile element.
/// A leaf layout counts as a single mode; the result is always a node.
pub fn composition_by_mode(layout: &Layout, tile: &Tile) -> Result<Layout> {
    if layout.rank() != tile.len() {
        return Err(LayoutError::ModeCountMismatch {
            layout: layout.clone(),
            expected: layout.rank(),
            got: tile.len(),
        });
    }

    let (shapes, strides): (Vec<_>, Vec<_>) = layout
        .modes()
        .zip_eq(tile.iter())
        .map(|(mode, inner)| composition(&mode, inner).map(Layout::into_parts))
        .collect::<Result<Vec<_>>>()?
        .into_iter()
        .unzip();
    Ok(Layout::from_parts(
        LayoutValue::Node(shapes),
        LayoutValue::Node(strides),
    ))
}
