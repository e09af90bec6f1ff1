//! Random puzzle instances.

use rand::seq::SliceRandom;
use rand::Rng;
use tracing::trace;

use crate::error::BoardError;
use crate::puzzle::{Board, Shape};

/// How benchmark boards are produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scramble {
    /// Uniform shuffle, retried until solvable.
    Shuffle,
    /// Random walk of this many moves away from the goal.
    Walk(usize),
}

/// A uniformly shuffled board that is solvable and not already solved.
pub fn random_board<R: Rng + ?Sized>(shape: Shape, rng: &mut R) -> Result<Board, BoardError> {
    let solved = Board::solved(shape)?;
    let mut tiles: Vec<u8> = solved.goal().as_slice().to_vec();

    let mut attempts = 0;
    loop {
        attempts += 1;
        tiles.shuffle(rng);
        let board = Board::new(shape, &tiles)?;
        if board.is_solvable() && board.initial() != board.goal() {
            trace!(attempts, "Shuffled a solvable board");
            return Ok(board);
        }
    }
}

/// A board reached from the goal by `moves` random slides.
///
/// Solvable by construction. For `moves > 0` walks that end back on the goal
/// are retried.
pub fn scrambled_board<R: Rng + ?Sized>(
    shape: Shape,
    moves: usize,
    rng: &mut R,
) -> Result<Board, BoardError> {
    let solved = Board::solved(shape)?;
    if moves == 0 {
        return Ok(solved);
    }

    loop {
        let mut config = solved.goal().clone();
        for _ in 0..moves {
            let mut neighbors = solved.neighbors(&config);
            let pick = rng.random_range(0..neighbors.len());
            config = neighbors.swap_remove(pick);
        }
        if config != *solved.goal() {
            return solved.with_initial(config);
        }
    }
}

/// Generate a board according to `scramble`.
pub fn generate<R: Rng + ?Sized>(
    shape: Shape,
    scramble: Scramble,
    rng: &mut R,
) -> Result<Board, BoardError> {
    match scramble {
        Scramble::Shuffle => random_board(shape, rng),
        Scramble::Walk(moves) => scrambled_board(shape, moves, rng),
    }
}
