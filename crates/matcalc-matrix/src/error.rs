use thiserror::Error;

/// Failures of the matrix view engine. All of them are fatal to the single
/// operation that raised them.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MatrixError {
    #[error("index ({row}, {col}) out of bounds for {rows}x{cols} matrix")]
    IndexOutOfBounds {
        row: usize,
        col: usize,
        rows: usize,
        cols: usize,
    },
    /// The storage coordinate is excluded by the active filter.
    #[error("coordinates ({row}, {col}) are not in filtered range")]
    FilterViolation { row: isize, col: isize },
    #[error("{0}")]
    Unsupported(String),
}
