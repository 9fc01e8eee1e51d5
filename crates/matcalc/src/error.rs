use matcalc_lexer::LexError;
use matcalc_matrix::MatrixError;
use thiserror::Error;

/// Failures of a single evaluation call. There is no retry or partial-result
/// recovery; the error carries the complete failure context to the caller.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CalcError {
    #[error("cannot parse expression: {0}")]
    Parse(String),
    #[error("miss-matching parenthesis in expression")]
    BracketMismatch,
    #[error(transparent)]
    Matrix(#[from] MatrixError),
}

impl From<LexError> for CalcError {
    fn from(e: LexError) -> Self {
        CalcError::Parse(e.to_string())
    }
}
