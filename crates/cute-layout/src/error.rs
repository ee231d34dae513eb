use thiserror::Error;

use crate::{Layout, LayoutValue};

/// Coarse classification of a [`LayoutError`], for callers that only need to know
/// which kind of message to show.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    StructuralMismatch,
    InvalidValue,
    Divisibility,
    EmptyInput,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LayoutError {
    /// Shape and stride trees differ in nesting or length. `shape` and `stride` are the
    /// first sub-trees (in pre-order) where they disagree.
    #[error("structure mismatch: shape {shape} vs. stride {stride}")]
    StructuralMismatch {
        shape: LayoutValue,
        stride: LayoutValue,
    },
    /// A flat sequence does not have the leaf count its counterpart requires.
    #[error("dimension mismatch: {lhs} has {lhs_len} leaves but {rhs} has {rhs_len}")]
    DimensionMismatch {
        lhs: LayoutValue,
        lhs_len: usize,
        rhs: LayoutValue,
        rhs_len: usize,
    },
    #[error("invalid value {value} in {within}: {reason}")]
    InvalidValue {
        value: i64,
        within: LayoutValue,
        reason: &'static str,
    },
    /// Division hit a mode whose size neither divides nor is divided by the remaining divisor.
    #[error("divisibility error: mode {mode} of size {size} is incompatible with remaining divisor {remaining}")]
    Divisibility {
        mode: usize,
        size: i64,
        remaining: i64,
    },
    /// Division ran out of modes before the divisor was consumed.
    #[error("divisibility error: {remaining} of divisor {divisor} left after dividing {shape}")]
    UnconsumedDivisor {
        shape: LayoutValue,
        divisor: i64,
        remaining: i64,
    },
    #[error("empty node in {0}")]
    EmptyInput(LayoutValue),
    #[error("offset {offset} is out of range for shape {shape} (size {size})")]
    OutOfRange {
        offset: i64,
        shape: LayoutValue,
        size: i64,
    },
    /// A size, stride or offset does not fit in an `i64`.
    #[error("arithmetic overflow computing {op} of {within}")]
    Overflow {
        op: &'static str,
        within: LayoutValue,
    },
    #[error("mode count mismatch: layout {layout} has {expected} modes, tile has {got}")]
    ModeCountMismatch {
        layout: Layout,
        expected: usize,
        got: usize,
    },
}

impl LayoutError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            LayoutError::StructuralMismatch { .. }
            | LayoutError::DimensionMismatch { .. }
            | LayoutError::ModeCountMismatch { .. } => ErrorKind::StructuralMismatch,
            LayoutError::InvalidValue { .. }
            | LayoutError::OutOfRange { .. }
            | LayoutError::Overflow { .. } => ErrorKind::InvalidValue,
            LayoutError::Divisibility { .. } | LayoutError::UnconsumedDivisor { .. } => {
                ErrorKind::Divisibility
            }
            LayoutError::EmptyInput(_) => ErrorKind::EmptyInput,
        }
    }
}

pub type Result<T> = std::result::Result<T, LayoutError>;
