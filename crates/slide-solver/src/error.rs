//! Error types for board construction and the command-line front end.
//!
//! Search itself never fails: unsolvable boards, exhausted frontiers and
//! exceeded budgets are all reported through `SearchOutcome`.

use thiserror::Error;

/// Reasons a tile list cannot become a `Board`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BoardError {
    #[error("board shape {rows}x{cols} is smaller than 2x2")]
    TooSmall { rows: usize, cols: usize },

    #[error("board shape {rows}x{cols} has more than {max} cells")]
    TooManyCells { rows: usize, cols: usize, max: usize },

    #[error("expected {expected} tiles, found {found}")]
    WrongLength { expected: usize, found: usize },

    #[error("tile {value} is out of range 0..{cells}")]
    OutOfRange { value: usize, cells: usize },

    #[error("tile {0} appears more than once")]
    Duplicate(usize),

    #[error("board has no blank tile")]
    MissingBlank,

    #[error("cannot parse tile '{0}'")]
    Parse(String),
}

/// Top-level error for the binary.
#[derive(Debug, Error)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid board: {0}")]
    Board(#[from] BoardError),

    #[error("{0}")]
    Usage(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_board_error_messages() {
        let err = BoardError::WrongLength {
            expected: 16,
            found: 15,
        };
        assert_eq!(err.to_string(), "expected 16 tiles, found 15");
        assert_eq!(
            BoardError::Duplicate(7).to_string(),
            "tile 7 appears more than once"
        );
    }

    #[test]
    fn test_error_wraps_board_error() {
        let err: Error = BoardError::Parse("x".to_string()).into();
        assert_eq!(err.to_string(), "invalid board: cannot parse tile 'x'");
    }
}
