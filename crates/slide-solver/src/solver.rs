//! Uninformed and heuristic search over sliding-tile configurations.
//!
//! All three strategies share one loop: pop a node, skip it if already
//! expanded, test it, push its unexpanded successors. They differ only in the
//! frontier discipline and in where the search is cut off.
//!
//! Logging levels:
//! - **DEBUG**: search start and end with node counts and timing
//! - **TRACE**: individual expansions

use std::cmp::Reverse;
use std::collections::{BinaryHeap, HashSet, VecDeque};
use std::fmt;
use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::puzzle::{misplaced_tiles, BlankPolicy, Board, Configuration};

/// Depth cap used by `solve_with_dfs` when none is given.
pub const DEFAULT_MAX_DEPTH: usize = 20;

/// Move budget used by `solve_with_a_star` when none is given.
pub const DEFAULT_MAX_MOVES: usize = 50;

/// Search strategy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Strategy {
    Bfs,
    Dfs,
    AStar,
}

impl Strategy {
    /// Order the strategies are benchmarked in.
    pub const ALL: [Strategy; 3] = [Strategy::AStar, Strategy::Bfs, Strategy::Dfs];

    pub fn name(self) -> &'static str {
        match self {
            Strategy::Bfs => "BFS",
            Strategy::Dfs => "DFS",
            Strategy::AStar => "A*",
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Configuration for the solver
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SolverConfig {
    /// DFS does not expand nodes at or beyond this depth
    pub max_depth: usize,
    /// A* gives up once it pops a node deeper than this
    pub max_moves: usize,
    /// Whether the A* heuristic counts a misplaced blank
    pub blank_policy: BlankPolicy,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            max_moves: DEFAULT_MAX_MOVES,
            blank_policy: BlankPolicy::default(),
        }
    }
}

/// Result of a single search
#[derive(Debug, Clone, PartialEq)]
pub struct SearchOutcome {
    pub strategy: Strategy,
    /// Configurations from the start to the goal, both included
    pub solution: Option<Vec<Configuration>>,
    /// Nodes taken off the frontier and expanded (duplicates excluded)
    pub nodes_expanded: usize,
    /// Length of the solution, or depth reached when the A* budget ran out
    pub moves: usize,
    /// Wall-clock time spent searching
    pub elapsed: Duration,
    /// Only ever set by A*: the move budget was exceeded
    pub limit_reached: bool,
}

impl SearchOutcome {
    /// Outcome for a board that fails the parity check.
    fn unsolvable(strategy: Strategy) -> Self {
        Self {
            strategy,
            solution: None,
            nodes_expanded: 0,
            moves: 0,
            elapsed: Duration::ZERO,
            limit_reached: false,
        }
    }

    pub fn is_solved(&self) -> bool {
        self.solution.is_some()
    }
}

/// Arena of every node pushed during one search.
///
/// Nodes record their parent instead of a copy of the path so far.
struct SearchTree {
    nodes: Vec<Node>,
}

struct Node {
    config: Configuration,
    parent: Option<usize>,
    depth: usize,
}

impl SearchTree {
    fn new(root: Configuration) -> Self {
        Self {
            nodes: vec![Node {
                config: root,
                parent: None,
                depth: 0,
            }],
        }
    }

    fn push(&mut self, config: Configuration, parent: usize) -> usize {
        let depth = self.nodes[parent].depth + 1;
        self.nodes.push(Node {
            config,
            parent: Some(parent),
            depth,
        });
        self.nodes.len() - 1
    }

    fn config(&self, index: usize) -> &Configuration {
        &self.nodes[index].config
    }

    fn depth(&self, index: usize) -> usize {
        self.nodes[index].depth
    }

    /// Configurations from the root to `index`.
    fn path(&self, index: usize) -> Vec<Configuration> {
        let mut path = Vec::with_capacity(self.depth(index) + 1);
        let mut current = Some(index);
        while let Some(i) = current {
            path.push(self.nodes[i].config.clone());
            current = self.nodes[i].parent;
        }
        path.reverse();
        path
    }
}

/// Order in which pushed nodes come back out.
trait Frontier {
    fn push(&mut self, index: usize, cost: usize);
    fn pop(&mut self) -> Option<usize>;
}

/// First in, first out.
impl Frontier for VecDeque<usize> {
    fn push(&mut self, index: usize, _cost: usize) {
        self.push_back(index);
    }

    fn pop(&mut self) -> Option<usize> {
        self.pop_front()
    }
}

/// Last in, first out.
impl Frontier for Vec<usize> {
    fn push(&mut self, index: usize, _cost: usize) {
        Vec::push(self, index);
    }

    fn pop(&mut self) -> Option<usize> {
        Vec::pop(self)
    }
}

/// Lowest cost first; equal costs leave in insertion order.
#[derive(Default)]
struct PriorityFrontier {
    heap: BinaryHeap<Reverse<(usize, u64, usize)>>,
    pushed: u64,
}

impl Frontier for PriorityFrontier {
    fn push(&mut self, index: usize, cost: usize) {
        self.heap.push(Reverse((cost, self.pushed, index)));
        self.pushed += 1;
    }

    fn pop(&mut self) -> Option<usize> {
        self.heap.pop().map(|Reverse((_, _, index))| index)
    }
}

/// Where a strategy stops looking.
#[derive(Debug, Clone, Copy)]
enum Cutoff {
    None,
    /// Nodes at this depth are tested but not expanded.
    Depth(usize),
    /// Popping a node deeper than this ends the search, before the goal test.
    Budget(usize),
}

/// Runs the search strategies against one board.
#[derive(Debug, Clone)]
pub struct SearchEngine {
    board: Board,
}

impl SearchEngine {
    pub fn new(board: Board) -> Self {
        Self { board }
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Run `strategy` with the limits from `config`.
    pub fn solve(&self, strategy: Strategy, config: &SolverConfig) -> SearchOutcome {
        match strategy {
            Strategy::Bfs => self.solve_with_bfs(),
            Strategy::Dfs => self.solve_with_dfs(config.max_depth),
            Strategy::AStar => self.solve_with_a_star_using(config.max_moves, config.blank_policy),
        }
    }

    /// Breadth-first search. Finds a shortest solution; unbounded.
    pub fn solve_with_bfs(&self) -> SearchOutcome {
        self.search(Strategy::Bfs, VecDeque::new(), Cutoff::None, |_, _| 0)
    }

    /// Depth-first search that never expands nodes at `max_depth`.
    ///
    /// Returns the first solution found, which need not be the shortest.
    pub fn solve_with_dfs(&self, max_depth: usize) -> SearchOutcome {
        self.search(Strategy::Dfs, Vec::new(), Cutoff::Depth(max_depth), |_, _| 0)
    }

    /// A* with the admissible misplaced-tile heuristic.
    pub fn solve_with_a_star(&self, max_moves: usize) -> SearchOutcome {
        self.solve_with_a_star_using(max_moves, BlankPolicy::default())
    }

    /// A* ordered by `f = g + misplaced tiles`, abandoned once a node deeper
    /// than `max_moves` reaches the front of the queue.
    pub fn solve_with_a_star_using(&self, max_moves: usize, policy: BlankPolicy) -> SearchOutcome {
        let goal = self.board.goal();
        self.search(
            Strategy::AStar,
            PriorityFrontier::default(),
            Cutoff::Budget(max_moves),
            |config, g| g + misplaced_tiles(config, goal, policy),
        )
    }

    fn search<F, C>(&self, strategy: Strategy, mut frontier: F, cutoff: Cutoff, cost: C) -> SearchOutcome
    where
        F: Frontier,
        C: Fn(&Configuration, usize) -> usize,
    {
        if !self.board.is_solvable() {
            debug!(%strategy, "Board is unsolvable, skipping search");
            return SearchOutcome::unsolvable(strategy);
        }

        let start = Instant::now();
        debug!(%strategy, shape = %self.board.shape(), ?cutoff, "Search started");

        let mut tree = SearchTree::new(self.board.initial().clone());
        let mut visited: HashSet<Configuration> = HashSet::new();
        let mut nodes_expanded = 0;
        frontier.push(0, cost(self.board.initial(), 0));

        while let Some(index) = frontier.pop() {
            let config = tree.config(index).clone();
            let depth = tree.depth(index);

            if visited.contains(&config) {
                continue;
            }
            nodes_expanded += 1;
            trace!(nodes_expanded, depth, tiles = ?config.as_slice(), "Expanding");

            if let Cutoff::Budget(max_moves) = cutoff {
                if depth > max_moves {
                    let outcome = SearchOutcome {
                        strategy,
                        solution: None,
                        nodes_expanded,
                        moves: depth,
                        elapsed: start.elapsed(),
                        limit_reached: true,
                    };
                    debug!(%strategy, nodes_expanded, max_moves, "Move budget exceeded");
                    return outcome;
                }
            }

            if self.board.is_goal(&config) {
                let solution = tree.path(index);
                let outcome = SearchOutcome {
                    strategy,
                    moves: solution.len() - 1,
                    solution: Some(solution),
                    nodes_expanded,
                    elapsed: start.elapsed(),
                    limit_reached: false,
                };
                debug!(
                    %strategy,
                    nodes_expanded,
                    moves = outcome.moves,
                    elapsed_ms = outcome.elapsed.as_millis() as u64,
                    "Solution found"
                );
                return outcome;
            }

            let neighbors = self.board.neighbors(&config);
            visited.insert(config);

            if let Cutoff::Depth(max_depth) = cutoff {
                if depth >= max_depth {
                    continue;
                }
            }

            for neighbor in neighbors {
                if visited.contains(&neighbor) {
                    continue;
                }
                let priority = cost(&neighbor, depth + 1);
                let child = tree.push(neighbor, index);
                frontier.push(child, priority);
            }
        }

        let outcome = SearchOutcome {
            strategy,
            solution: None,
            nodes_expanded,
            moves: 0,
            elapsed: start.elapsed(),
            limit_reached: false,
        };
        debug!(
            %strategy,
            nodes_expanded,
            elapsed_ms = outcome.elapsed.as_millis() as u64,
            "Search exhausted"
        );
        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::puzzle::Shape;

    fn engine(rows: usize, cols: usize, tiles: &[u8]) -> SearchEngine {
        SearchEngine::new(Board::new(Shape::new(rows, cols), tiles).unwrap())
    }

    #[test]
    fn test_priority_frontier_breaks_ties_by_insertion() {
        let mut frontier = PriorityFrontier::default();
        frontier.push(10, 3);
        frontier.push(11, 2);
        frontier.push(12, 3);
        frontier.push(13, 2);
        let order: Vec<usize> = std::iter::from_fn(|| frontier.pop()).collect();
        assert_eq!(order, vec![11, 13, 10, 12]);
    }

    #[test]
    fn test_fifo_and_lifo_frontiers() {
        let mut fifo: VecDeque<usize> = VecDeque::new();
        let mut lifo: Vec<usize> = Vec::new();
        for i in 0..3 {
            Frontier::push(&mut fifo, i, 0);
            Frontier::push(&mut lifo, i, 0);
        }
        assert_eq!(Frontier::pop(&mut fifo), Some(0));
        assert_eq!(Frontier::pop(&mut lifo), Some(2));
    }

    #[test]
    fn test_search_tree_path() {
        let root = Configuration::new(&[1, 2, 0, 3]).unwrap();
        let next = Configuration::new(&[1, 2, 3, 0]).unwrap();
        let mut tree = SearchTree::new(root.clone());
        let child = tree.push(next.clone(), 0);
        assert_eq!(tree.depth(child), 1);
        assert_eq!(tree.path(child), vec![root, next]);
    }

    #[test]
    fn test_bfs_two_moves() {
        let e = engine(3, 3, &[1, 2, 3, 4, 5, 6, 0, 7, 8]);
        let outcome = e.solve_with_bfs();
        assert!(outcome.is_solved());
        assert_eq!(outcome.moves, 2);
        assert!(!outcome.limit_reached);
        let solution = outcome.solution.unwrap();
        assert_eq!(solution.first(), Some(e.board().initial()));
        assert_eq!(solution.last(), Some(e.board().goal()));
    }

    #[test]
    fn test_dfs_depth_zero_expands_only_root() {
        let e = engine(3, 3, &[1, 2, 3, 4, 5, 6, 7, 0, 8]);
        let outcome = e.solve_with_dfs(0);
        assert!(!outcome.is_solved());
        assert_eq!(outcome.nodes_expanded, 1);
        assert_eq!(outcome.moves, 0);
    }

    #[test]
    fn test_a_star_budget_checked_before_goal() {
        let e = engine(3, 3, &[1, 2, 3, 4, 5, 6, 7, 0, 8]);

        // The goal is one move away, but popping it already breaks a zero budget.
        let outcome = e.solve_with_a_star(0);
        assert!(outcome.limit_reached);
        assert!(outcome.solution.is_none());
        assert_eq!(outcome.moves, 1);
        assert_eq!(outcome.nodes_expanded, 2);

        let outcome = e.solve_with_a_star(1);
        assert!(!outcome.limit_reached);
        assert_eq!(outcome.moves, 1);
    }

    #[test]
    fn test_a_star_blank_policies_agree_on_easy_board() {
        let e = engine(3, 3, &[1, 2, 3, 4, 0, 6, 7, 5, 8]);
        let exclude = e.solve_with_a_star_using(10, BlankPolicy::Exclude);
        let include = e.solve_with_a_star_using(10, BlankPolicy::Include);
        assert_eq!(exclude.moves, 2);
        assert_eq!(include.moves, 2);
    }

    #[test]
    fn test_solve_dispatch() {
        let e = engine(2, 2, &[1, 2, 0, 3]);
        let config = SolverConfig::default();
        for strategy in Strategy::ALL {
            let outcome = e.solve(strategy, &config);
            assert_eq!(outcome.strategy, strategy);
            assert_eq!(outcome.moves, 1);
        }
    }

    #[test]
    fn test_unsolvable_short_circuits() {
        let e = engine(2, 2, &[2, 1, 3, 0]);
        for strategy in Strategy::ALL {
            let outcome = e.solve(strategy, &SolverConfig::default());
            assert_eq!(outcome.nodes_expanded, 0);
            assert_eq!(outcome.elapsed, Duration::ZERO);
            assert!(outcome.solution.is_none());
        }
    }
}
