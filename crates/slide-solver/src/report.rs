//! Console and JSON reporting of search outcomes.

use serde::{Deserialize, Serialize};

use crate::puzzle::Board;
use crate::solver::{SearchOutcome, Strategy};

/// How a search ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    Solved,
    /// A* popped a node past its move budget
    LimitReached,
    /// Frontier ran dry
    Exhausted,
    /// Parity check failed; nothing was searched
    Unsolvable,
}

impl Status {
    pub fn of(outcome: &SearchOutcome) -> Self {
        if outcome.is_solved() {
            Status::Solved
        } else if outcome.limit_reached {
            Status::LimitReached
        } else if outcome.nodes_expanded == 0 {
            Status::Unsolvable
        } else {
            Status::Exhausted
        }
    }

    pub fn describe(self) -> &'static str {
        match self {
            Status::Solved => "solution found",
            Status::LimitReached => "move limit reached before a solution was found",
            Status::Exhausted => "no solution found",
            Status::Unsolvable => "board is not solvable",
        }
    }
}

/// JSON form of one outcome
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OutcomeOutput {
    pub strategy: Strategy,
    pub status: Status,
    pub solved: bool,
    pub nodes_expanded: usize,
    pub moves: usize,
    pub time_secs: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit_reached: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub solution: Option<Vec<Vec<u8>>>,
}

/// JSON form of every outcome for one board
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoardOutput {
    pub rows: usize,
    pub cols: usize,
    pub tiles: Vec<u8>,
    pub solvable: bool,
    pub results: Vec<OutcomeOutput>,
}

pub fn format_outcome(outcome: &SearchOutcome, include_path: bool) -> OutcomeOutput {
    OutcomeOutput {
        strategy: outcome.strategy,
        status: Status::of(outcome),
        solved: outcome.is_solved(),
        nodes_expanded: outcome.nodes_expanded,
        moves: outcome.moves,
        time_secs: outcome.elapsed.as_secs_f64(),
        limit_reached: (outcome.strategy == Strategy::AStar).then_some(outcome.limit_reached),
        solution: if include_path {
            outcome
                .solution
                .as_ref()
                .map(|path| path.iter().map(|c| c.as_slice().to_vec()).collect())
        } else {
            None
        },
    }
}

pub fn format_board(board: &Board, outcomes: &[SearchOutcome], include_path: bool) -> BoardOutput {
    BoardOutput {
        rows: board.rows(),
        cols: board.cols(),
        tiles: board.initial().as_slice().to_vec(),
        solvable: board.is_solvable(),
        results: outcomes
            .iter()
            .map(|o| format_outcome(o, include_path))
            .collect(),
    }
}

/// One table row; unsolved outcomes show `N/A` throughout.
pub fn table_row(outcome: &SearchOutcome) -> [String; 4] {
    let name = outcome.strategy.to_string();
    if outcome.is_solved() {
        [
            name,
            outcome.nodes_expanded.to_string(),
            outcome.moves.to_string(),
            format!("{:.4} s", outcome.elapsed.as_secs_f64()),
        ]
    } else {
        [name, "N/A".into(), "N/A".into(), "N/A".into()]
    }
}

const HEADERS: [&str; 4] = ["Algorithm", "Nodes Expanded", "Moves", "Time"];

/// Boxed grid table:
///
/// ```text
/// +-----------+----------------+-------+----------+
/// | Algorithm | Nodes Expanded | Moves | Time     |
/// +===========+================+=======+==========+
/// | BFS       | 12             | 3     | 0.0001 s |
/// +-----------+----------------+-------+----------+
/// ```
pub fn render_table(outcomes: &[SearchOutcome]) -> String {
    let rows: Vec<[String; 4]> = outcomes.iter().map(table_row).collect();

    let mut widths = HEADERS.map(str::len);
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.len());
        }
    }

    let rule = |fill: char| -> String {
        let mut line = String::from("+");
        for width in widths {
            line.extend(std::iter::repeat(fill).take(width + 2));
            line.push('+');
        }
        line
    };
    let line = |cells: &[&str]| -> String {
        let mut out = String::from("|");
        for (cell, width) in cells.iter().zip(widths) {
            out.push_str(&format!(" {:<width$} |", cell));
        }
        out
    };

    let mut out = vec![rule('-'), line(&HEADERS), rule('=')];
    for row in &rows {
        let cells: Vec<&str> = row.iter().map(String::as_str).collect();
        out.push(line(&cells));
        out.push(rule('-'));
    }
    out.join("\n")
}
