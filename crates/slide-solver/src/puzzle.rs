//! Board representation for sliding-tile puzzles.
//!
//! A configuration is the row-major list of tiles, with `0` standing for the
//! blank. Configurations are values: every move produces a new one, and the
//! tile buffer stays inline for boards of up to 16 cells.

use std::fmt;

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::error::BoardError;

/// Value of the blank cell.
pub const BLANK: u8 = 0;

/// Largest board a `u8` tile can label.
pub const MAX_CELLS: usize = 256;

/// Board dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Shape {
    pub rows: usize,
    pub cols: usize,
}

impl Shape {
    pub fn new(rows: usize, cols: usize) -> Self {
        Self { rows, cols }
    }

    /// Saturates on overflow; `validate` rejects such shapes.
    pub fn cells(self) -> usize {
        self.rows.saturating_mul(self.cols)
    }

    /// Reject shapes the parity rule and the tile encoding cannot handle.
    pub fn validate(self) -> Result<(), BoardError> {
        if self.rows < 2 || self.cols < 2 {
            return Err(BoardError::TooSmall {
                rows: self.rows,
                cols: self.cols,
            });
        }
        match self.rows.checked_mul(self.cols) {
            Some(cells) if cells <= MAX_CELLS => Ok(()),
            _ => Err(BoardError::TooManyCells {
                rows: self.rows,
                cols: self.cols,
                max: MAX_CELLS,
            }),
        }
    }

    /// (row, col) of a row-major index
    pub fn position(self, index: usize) -> (usize, usize) {
        (index / self.cols, index % self.cols)
    }

    pub fn index(self, row: usize, col: usize) -> usize {
        row * self.cols + col
    }
}

impl Default for Shape {
    fn default() -> Self {
        Self::new(4, 4)
    }
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.rows, self.cols)
    }
}

/// Direction the blank travels in a move.
///
/// `ALL` fixes the order in which successors are generated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];

    /// (row, col) offset
    pub fn delta(self) -> (isize, isize) {
        match self {
            Direction::Up => (-1, 0),
            Direction::Down => (1, 0),
            Direction::Left => (0, -1),
            Direction::Right => (0, 1),
        }
    }
}

/// One arrangement of tiles, flattened row-major.
///
/// Always a permutation of `0..len`; the constructor enforces it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "Vec<u8>", into = "Vec<u8>")]
pub struct Configuration {
    tiles: SmallVec<[u8; 16]>,
    blank: usize,
}

impl Configuration {
    /// Validate that `tiles` is a permutation of `0..tiles.len()`.
    pub fn new(tiles: &[u8]) -> Result<Self, BoardError> {
        let cells = tiles.len();
        let mut seen: SmallVec<[bool; 16]> = SmallVec::from_elem(false, cells);

        for &tile in tiles {
            let value = tile as usize;
            if value >= cells {
                return Err(BoardError::OutOfRange { value, cells });
            }
            if seen[value] {
                return Err(BoardError::Duplicate(value));
            }
            seen[value] = true;
        }

        let blank = tiles
            .iter()
            .position(|&t| t == BLANK)
            .ok_or(BoardError::MissingBlank)?;

        Ok(Self {
            tiles: SmallVec::from_slice(tiles),
            blank,
        })
    }

    /// The solved arrangement: `1, 2, ..., cells - 1, 0`.
    pub fn goal(cells: usize) -> Self {
        let mut tiles: SmallVec<[u8; 16]> = (1..cells).map(|t| t as u8).collect();
        tiles.push(BLANK);
        Self {
            tiles,
            blank: cells.saturating_sub(1),
        }
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.tiles
    }

    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    pub fn blank_index(&self) -> usize {
        self.blank
    }

    /// Copy with the blank moved to `target`.
    fn with_blank_at(&self, target: usize) -> Self {
        let mut tiles = self.tiles.clone();
        tiles.swap(self.blank, target);
        Self {
            tiles,
            blank: target,
        }
    }

    /// Render as a grid of the given shape.
    ///
    /// `shape` must cover exactly this configuration's cells.
    pub fn grid(&self, shape: Shape) -> GridDisplay<'_> {
        debug_assert_eq!(self.len(), shape.cells(), "grid shape {} does not fit", shape);
        GridDisplay {
            config: self,
            shape,
        }
    }
}

impl TryFrom<Vec<u8>> for Configuration {
    type Error = BoardError;

    fn try_from(tiles: Vec<u8>) -> Result<Self, Self::Error> {
        Configuration::new(&tiles)
    }
}

impl From<Configuration> for Vec<u8> {
    fn from(config: Configuration) -> Self {
        config.tiles.into_vec()
    }
}

/// Right-aligned grid rendering with `.` for the blank.
pub struct GridDisplay<'a> {
    config: &'a Configuration,
    shape: Shape,
}

impl fmt::Display for GridDisplay<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let width = (self.config.len().saturating_sub(1)).to_string().len();
        for (i, row) in self.config.as_slice().chunks(self.shape.cols.max(1)).enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            let cells: Vec<String> = row
                .iter()
                .map(|&t| {
                    if t == BLANK {
                        format!("{:>width$}", ".")
                    } else {
                        format!("{:>width$}", t)
                    }
                })
                .collect();
            write!(f, "{}", cells.join(" "))?;
        }
        Ok(())
    }
}

/// Whether the blank counts toward the misplaced-tile estimate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BlankPolicy {
    /// Only numbered tiles count. Admissible.
    #[default]
    Exclude,
    /// The blank counts too; can overestimate by one.
    Include,
}

/// Number of cells whose tile differs from `goal`.
///
/// Both configurations must have the same number of cells.
pub fn misplaced_tiles(config: &Configuration, goal: &Configuration, policy: BlankPolicy) -> usize {
    debug_assert_eq!(config.len(), goal.len(), "configurations differ in size");
    config
        .as_slice()
        .iter()
        .zip(goal.as_slice())
        .filter(|&(&tile, &target)| {
            tile != target && (policy == BlankPolicy::Include || tile != BLANK)
        })
        .count()
}

/// Pairs of numbered tiles that appear in descending order.
pub fn count_inversions(tiles: &[u8]) -> usize {
    let mut inversions = 0;
    for (i, &a) in tiles.iter().enumerate() {
        if a == BLANK {
            continue;
        }
        inversions += tiles[i + 1..]
            .iter()
            .filter(|&&b| b != BLANK && a > b)
            .count();
    }
    inversions
}

/// Parse a comma or whitespace separated tile list such as `"1,2,3,0"`.
pub fn parse_tiles(input: &str) -> Result<Vec<u8>, BoardError> {
    input
        .split(|c: char| c == ',' || c.is_whitespace())
        .filter(|s| !s.is_empty())
        .map(|s| s.parse::<u8>().map_err(|_| BoardError::Parse(s.to_string())))
        .collect()
}

/// A puzzle instance: shape, starting configuration and its goal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "BoardFile", into = "BoardFile")]
pub struct Board {
    shape: Shape,
    initial: Configuration,
    goal: Configuration,
}

/// On-disk form of a board: `{"rows": 4, "cols": 4, "tiles": [...]}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BoardFile {
    pub rows: usize,
    pub cols: usize,
    pub tiles: Vec<u8>,
}

impl TryFrom<BoardFile> for Board {
    type Error = BoardError;

    fn try_from(file: BoardFile) -> Result<Self, Self::Error> {
        Board::new(Shape::new(file.rows, file.cols), &file.tiles)
    }
}

impl From<Board> for BoardFile {
    fn from(board: Board) -> Self {
        BoardFile {
            rows: board.shape.rows,
            cols: board.shape.cols,
            tiles: board.initial.into(),
        }
    }
}

impl Board {
    /// Build a board from row-major tiles.
    ///
    /// Unsolvable arrangements are accepted; searching them yields an empty
    /// outcome.
    pub fn new(shape: Shape, tiles: &[u8]) -> Result<Self, BoardError> {
        shape.validate()?;
        if tiles.len() != shape.cells() {
            return Err(BoardError::WrongLength {
                expected: shape.cells(),
                found: tiles.len(),
            });
        }
        Ok(Self {
            shape,
            initial: Configuration::new(tiles)?,
            goal: Configuration::goal(shape.cells()),
        })
    }

    /// A board that starts solved.
    pub fn solved(shape: Shape) -> Result<Self, BoardError> {
        shape.validate()?;
        let goal = Configuration::goal(shape.cells());
        Ok(Self {
            shape,
            initial: goal.clone(),
            goal,
        })
    }

    /// Same shape, different starting configuration.
    pub fn with_initial(&self, initial: Configuration) -> Result<Self, BoardError> {
        Board::new(self.shape, initial.as_slice())
    }

    pub fn shape(&self) -> Shape {
        self.shape
    }

    pub fn rows(&self) -> usize {
        self.shape.rows
    }

    pub fn cols(&self) -> usize {
        self.shape.cols
    }

    pub fn initial(&self) -> &Configuration {
        &self.initial
    }

    pub fn goal(&self) -> &Configuration {
        &self.goal
    }

    pub fn is_goal(&self, config: &Configuration) -> bool {
        *config == self.goal
    }

    /// Whether the starting configuration can reach the goal.
    pub fn is_solvable(&self) -> bool {
        self.is_solvable_config(&self.initial)
    }

    /// Parity test for any configuration of this shape.
    ///
    /// With an even number of columns, a vertical move flips both the
    /// inversion parity and the blank's row parity, so the two are read
    /// together, counting the blank's row from the bottom (bottom row = 1).
    /// With an odd number of columns no move changes the inversion parity.
    pub fn is_solvable_config(&self, config: &Configuration) -> bool {
        let even_inversions = count_inversions(config.as_slice()) % 2 == 0;
        if self.shape.cols % 2 == 1 {
            return even_inversions;
        }

        let (blank_row, _) = self.shape.position(config.blank_index());
        let row_from_bottom = self.shape.rows - blank_row;
        if row_from_bottom % 2 == 1 {
            even_inversions
        } else {
            !even_inversions
        }
    }

    /// Result of sliding the blank one cell in `direction`, if it stays on
    /// the board.
    pub fn slide(&self, config: &Configuration, direction: Direction) -> Option<Configuration> {
        let (row, col) = self.shape.position(config.blank_index());
        let (dr, dc) = direction.delta();
        let row = row.checked_add_signed(dr)?;
        let col = col.checked_add_signed(dc)?;
        if row >= self.shape.rows || col >= self.shape.cols {
            return None;
        }
        Some(config.with_blank_at(self.shape.index(row, col)))
    }

    /// Successors in up, down, left, right order.
    pub fn neighbors(&self, config: &Configuration) -> SmallVec<[Configuration; 4]> {
        Direction::ALL
            .iter()
            .filter_map(|&direction| self.slide(config, direction))
            .collect()
    }

    /// g(n): moves already made along `path`.
    pub fn path_cost(&self, path: &[Configuration]) -> usize {
        path.len()
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.initial.grid(self.shape))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn board(rows: usize, cols: usize, tiles: &[u8]) -> Board {
        Board::new(Shape::new(rows, cols), tiles).unwrap()
    }

    #[test]
    fn test_configuration_rejects_bad_permutations() {
        assert_eq!(
            Configuration::new(&[1, 2, 3, 4]),
            Err(BoardError::OutOfRange { value: 4, cells: 4 })
        );
        assert_eq!(
            Configuration::new(&[1, 1, 0, 2]),
            Err(BoardError::Duplicate(1))
        );
        assert!(Configuration::new(&[3, 1, 0, 2]).is_ok());
    }

    #[test]
    fn test_board_rejects_bad_shapes() {
        assert_eq!(
            Board::new(Shape::new(1, 4), &[1, 2, 3, 0]),
            Err(BoardError::TooSmall { rows: 1, cols: 4 })
        );
        assert_eq!(
            Board::new(Shape::new(2, 2), &[1, 2, 0]),
            Err(BoardError::WrongLength {
                expected: 4,
                found: 3
            })
        );
        assert!(matches!(
            Shape::new(17, 16).validate(),
            Err(BoardError::TooManyCells { .. })
        ));
    }

    #[test]
    fn test_board_rejects_overflowing_shape() {
        let rows = usize::MAX / 2 + 2;
        let shape = Shape::new(rows, 2);
        assert_eq!(
            shape.validate(),
            Err(BoardError::TooManyCells {
                rows,
                cols: 2,
                max: MAX_CELLS
            })
        );
        assert_eq!(shape.cells(), usize::MAX);
        assert!(Board::new(shape, &[0, 1]).is_err());
        assert!(Board::solved(shape).is_err());

        let json = r#"{"rows": 9223372036854775809, "cols": 2, "tiles": [0, 1]}"#;
        assert!(serde_json::from_str::<Board>(json).is_err());
    }

    #[test]
    fn test_goal_configuration() {
        let goal = Configuration::goal(16);
        assert_eq!(
            goal.as_slice(),
            &[1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12, 13, 14, 15, 0]
        );
        assert_eq!(goal.blank_index(), 15);
    }

    #[test]
    fn test_count_inversions_ignores_blank() {
        assert_eq!(count_inversions(&[1, 2, 3, 0]), 0);
        assert_eq!(count_inversions(&[2, 1, 3, 0]), 1);
        assert_eq!(count_inversions(&[0, 3, 2, 1]), 3);
    }

    #[test]
    fn test_solvability_4x4() {
        let goal = Board::solved(Shape::default()).unwrap();
        assert!(goal.is_solvable());

        let fixed = board(4, 4, &[1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 0, 13, 14, 15, 12]);
        assert!(fixed.is_solvable());

        // Sam Loyd's 14-15 swap.
        let loyd = board(4, 4, &[1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12, 13, 15, 14, 0]);
        assert!(!loyd.is_solvable());
    }

    #[test]
    fn test_solvability_3x3() {
        assert!(board(3, 3, &[1, 2, 3, 4, 5, 6, 7, 0, 8]).is_solvable());
        assert!(board(3, 3, &[1, 2, 3, 4, 0, 6, 7, 5, 8]).is_solvable());
        assert!(!board(3, 3, &[2, 1, 3, 4, 5, 6, 7, 8, 0]).is_solvable());
    }

    #[test]
    fn test_neighbors_order_and_count() {
        let b = board(3, 3, &[1, 2, 3, 4, 0, 5, 6, 7, 8]);
        let n = b.neighbors(b.initial());
        assert_eq!(n.len(), 4);
        assert_eq!(n[0].as_slice(), &[1, 0, 3, 4, 2, 5, 6, 7, 8]);
        assert_eq!(n[1].as_slice(), &[1, 2, 3, 4, 7, 5, 6, 0, 8]);
        assert_eq!(n[2].as_slice(), &[1, 2, 3, 0, 4, 5, 6, 7, 8]);
        assert_eq!(n[3].as_slice(), &[1, 2, 3, 4, 5, 0, 6, 7, 8]);

        let corner = board(3, 3, &[0, 1, 2, 3, 4, 5, 6, 7, 8]);
        assert_eq!(corner.neighbors(corner.initial()).len(), 2);

        let edge = board(3, 3, &[1, 0, 2, 3, 4, 5, 6, 7, 8]);
        assert_eq!(edge.neighbors(edge.initial()).len(), 3);
    }

    #[test]
    fn test_slide_off_board() {
        let b = Board::solved(Shape::new(2, 2)).unwrap();
        assert!(b.slide(b.initial(), Direction::Down).is_none());
        assert!(b.slide(b.initial(), Direction::Right).is_none());
        let up = b.slide(b.initial(), Direction::Up).unwrap();
        assert_eq!(up.as_slice(), &[1, 0, 3, 2]);
        assert_eq!(up.blank_index(), 1);
    }

    #[test]
    fn test_misplaced_tiles_blank_policy() {
        let goal = Configuration::goal(9);
        let config = Configuration::new(&[1, 2, 3, 4, 5, 6, 7, 0, 8]).unwrap();
        assert_eq!(misplaced_tiles(&config, &goal, BlankPolicy::Exclude), 1);
        assert_eq!(misplaced_tiles(&config, &goal, BlankPolicy::Include), 2);
        assert_eq!(misplaced_tiles(&goal, &goal, BlankPolicy::Include), 0);
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "configurations differ in size")]
    fn test_misplaced_tiles_rejects_mismatched_sizes() {
        let config = Configuration::new(&[1, 0, 3, 2]).unwrap();
        misplaced_tiles(&config, &Configuration::goal(9), BlankPolicy::Exclude);
    }

    #[test]
    fn test_path_cost_is_path_length() {
        let b = Board::solved(Shape::new(2, 2)).unwrap();
        let path = vec![b.initial().clone(), b.goal().clone()];
        assert_eq!(b.path_cost(&path), 2);
        assert_eq!(b.path_cost(&[]), 0);
    }

    #[test]
    fn test_parse_tiles() {
        assert_eq!(parse_tiles("1,2, 3 0").unwrap(), vec![1, 2, 3, 0]);
        assert_eq!(parse_tiles("1,x"), Err(BoardError::Parse("x".to_string())));
    }

    #[test]
    fn test_board_json() {
        let json = r#"{"rows": 2, "cols": 2, "tiles": [1, 2, 0, 3]}"#;
        let b: Board = serde_json::from_str(json).unwrap();
        assert_eq!(b.initial().as_slice(), &[1, 2, 0, 3]);
        assert_eq!(b.goal().as_slice(), &[1, 2, 3, 0]);

        let bad = r#"{"rows": 2, "cols": 2, "tiles": [1, 2, 2, 3]}"#;
        assert!(serde_json::from_str::<Board>(bad).is_err());
    }

    #[test]
    fn test_grid_display() {
        let b = board(2, 2, &[1, 2, 0, 3]);
        assert_eq!(b.to_string(), "1 2\n. 3");

        let wide = board(4, 4, &[1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 0, 13, 14, 15, 12]);
        assert_eq!(
            wide.to_string(),
            " 1  2  3  4\n 5  6  7  8\n 9 10 11  .\n13 14 15 12"
        );
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "grid shape 0x0 does not fit")]
    fn test_grid_rejects_mismatched_shape() {
        Configuration::goal(4).grid(Shape::new(0, 0));
    }
}
