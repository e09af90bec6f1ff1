//! Sliding-tile puzzle solver library.
//!
//! This crate searches for move sequences that solve N-puzzles (the
//! 15-puzzle by default) with breadth-first search, depth-limited
//! depth-first search and A*, and reports how much work each took.

pub mod error;
pub mod generator;
pub mod puzzle;
pub mod report;
pub mod solver;

// Re-export main types
pub use error::{BoardError, Error};
pub use generator::{generate, random_board, scrambled_board, Scramble};
pub use puzzle::{
    count_inversions, misplaced_tiles, parse_tiles, BlankPolicy, Board, Configuration, Direction,
    Shape,
};
pub use solver::{SearchEngine, SearchOutcome, SolverConfig, Strategy};
