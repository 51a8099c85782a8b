use thiserror::Error;

use crate::grid::Cell;

/// Errors raised while building a layout or a puzzle from its parameters.
///
/// A failed search is not an error: see [`crate::engine::Outcome`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MazeError {
    #[error("layout has no cells")]
    EmptyLayout,

    #[error("row {row} has {found} cells, expected {expected}")]
    RaggedRow {
        row: usize,
        expected: usize,
        found: usize,
    },

    #[error("unknown token {token:?} at ({row}, {col})")]
    UnknownToken {
        token: String,
        row: usize,
        col: usize,
    },

    #[error("cell number {number} is outside a {rows}x{cols} grid")]
    CellNumber {
        number: usize,
        rows: usize,
        cols: usize,
    },

    #[error("cell {cell:?} is outside a {rows}x{cols} grid")]
    OutOfBounds { cell: Cell, rows: usize, cols: usize },

    #[error("layout has no {0} cell")]
    MissingCell(&'static str),

    #[error("no chess piece on the start cell {0:?}")]
    MissingPiece(Cell),

    #[error("invalid jump schedule {schedule:?}: {reason}")]
    InvalidSchedule {
        schedule: Vec<usize>,
        reason: &'static str,
    },

    #[error("start total {value} is outside the limit of {limit}")]
    TotalOutOfRange { value: i64, limit: u64 },

    #[error("invalid wall token {0:?}")]
    InvalidWall(String),
}
