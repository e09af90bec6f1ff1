//! CLI entry point for the sliding-tile solver.
//!
//! Usage:
//!   slide-solver solve [board.json] [options]
//!   slide-solver solve --tiles 1,2,3,4,5,6,7,8,9,10,11,0,13,14,15,12
//!   slide-solver bench [--boards 5] [--random | --scramble 10] [options]
//!
//! Options:
//!   --max-depth <n>   DFS depth limit (default: 20)
//!   --max-moves <n>   A* move budget (default: 50 for solve, 100 for bench)
//!   --count-blank     Count the blank in the misplaced-tile heuristic
//!   --json            Print results as JSON
//!
//! Log verbosity follows `RUST_LOG` (default `slide_solver=info`).

use std::collections::HashSet;
use std::fs;
use std::io::{self, Read};
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use slide_solver::report::{format_board, render_table, BoardOutput, Status};
use slide_solver::{
    generate, parse_tiles, BlankPolicy, Board, Error, Scramble, SearchEngine, SearchOutcome,
    Shape, SolverConfig, Strategy,
};

/// Board solved when no other source is given.
const DEFAULT_TILES: [u8; 16] = [1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 0, 13, 14, 15, 12];

/// A* move budget for benchmarks.
const BENCH_MAX_MOVES: usize = 100;

/// Distinct-board retries per benchmark slot before giving up.
const MAX_GENERATION_ATTEMPTS: usize = 1000;

#[derive(Parser)]
#[command(name = "slide-solver")]
#[command(about = "BFS, depth-limited DFS and A* solvers for sliding-tile puzzles")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Solve a single board
    Solve {
        /// Path to a board JSON file: {"rows": 4, "cols": 4, "tiles": [...]}
        #[arg(value_name = "FILE")]
        file: Option<PathBuf>,

        /// Read the board JSON from stdin instead of a file
        #[arg(long, conflicts_with = "file")]
        stdin: bool,

        /// Row-major tiles, 0 for the blank (e.g. "1,2,3,0")
        #[arg(long, conflicts_with_all = ["file", "stdin"])]
        tiles: Option<String>,

        /// Rows for --tiles
        #[arg(long, default_value = "4")]
        rows: usize,

        /// Columns for --tiles
        #[arg(long, default_value = "4")]
        cols: usize,

        /// Strategy to run
        #[arg(long, value_enum, default_value = "all")]
        strategy: StrategyArg,

        /// Print every configuration along each solution
        #[arg(long)]
        show_path: bool,

        #[command(flatten)]
        search: SearchArgs,
    },

    /// Generate several boards and compare all strategies on them
    Bench {
        /// Number of distinct boards
        #[arg(long, default_value = "5")]
        boards: usize,

        /// Shuffle tiles uniformly instead of scrambling from the goal
        #[arg(long)]
        random: bool,

        /// Random moves applied to the goal
        #[arg(long, default_value = "10", conflicts_with = "random")]
        scramble: usize,

        /// RNG seed; random when omitted
        #[arg(long)]
        seed: Option<u64>,

        /// Board rows
        #[arg(long, default_value = "4")]
        rows: usize,

        /// Board columns
        #[arg(long, default_value = "4")]
        cols: usize,

        #[command(flatten)]
        search: SearchArgs,
    },
}

#[derive(Args)]
struct SearchArgs {
    /// DFS depth limit
    #[arg(long, default_value = "20")]
    max_depth: usize,

    /// A* move budget
    #[arg(long)]
    max_moves: Option<usize>,

    /// Count the blank as a misplaced tile in the A* heuristic
    #[arg(long)]
    count_blank: bool,

    /// Print results as JSON
    #[arg(long)]
    json: bool,
}

impl SearchArgs {
    fn solver_config(&self, default_max_moves: usize) -> SolverConfig {
        SolverConfig {
            max_depth: self.max_depth,
            max_moves: self.max_moves.unwrap_or(default_max_moves),
            blank_policy: if self.count_blank {
                BlankPolicy::Include
            } else {
                BlankPolicy::Exclude
            },
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum StrategyArg {
    Bfs,
    Dfs,
    AStar,
    All,
}

impl StrategyArg {
    fn strategies(self) -> Vec<Strategy> {
        match self {
            StrategyArg::Bfs => vec![Strategy::Bfs],
            StrategyArg::Dfs => vec![Strategy::Dfs],
            StrategyArg::AStar => vec![Strategy::AStar],
            StrategyArg::All => Strategy::ALL.to_vec(),
        }
    }
}

fn main() {
    init_tracing();
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Solve {
            file,
            stdin,
            tiles,
            rows,
            cols,
            strategy,
            show_path,
            search,
        } => load_board(file, stdin, tiles, Shape::new(rows, cols))
            .and_then(|board| run_solve(board, strategy, show_path, &search)),
        Commands::Bench {
            boards,
            random,
            scramble,
            seed,
            rows,
            cols,
            search,
        } => {
            let scramble = if random {
                Scramble::Shuffle
            } else {
                Scramble::Walk(scramble)
            };
            run_bench(boards, scramble, seed, Shape::new(rows, cols), &search)
        }
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("slide_solver=info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

fn load_board(
    file: Option<PathBuf>,
    stdin: bool,
    tiles: Option<String>,
    shape: Shape,
) -> Result<Board, Error> {
    if stdin {
        let mut buffer = String::new();
        io::stdin().read_to_string(&mut buffer)?;
        Ok(serde_json::from_str(&buffer)?)
    } else if let Some(path) = file {
        let content = fs::read_to_string(&path)?;
        Ok(serde_json::from_str(&content)?)
    } else if let Some(tiles) = tiles {
        Ok(Board::new(shape, &parse_tiles(&tiles)?)?)
    } else {
        Ok(Board::new(Shape::default(), &DEFAULT_TILES)?)
    }
}

/// Run each strategy, logging how it ended.
fn run_strategies(engine: &SearchEngine, strategies: &[Strategy], config: &SolverConfig) -> Vec<SearchOutcome> {
    strategies
        .iter()
        .map(|&strategy| {
            let outcome = engine.solve(strategy, config);
            let status = Status::of(&outcome);
            if status == Status::Solved {
                info!(
                    %strategy,
                    nodes_expanded = outcome.nodes_expanded,
                    moves = outcome.moves,
                    "{}",
                    status.describe()
                );
            } else {
                warn!(%strategy, nodes_expanded = outcome.nodes_expanded, "{}", status.describe());
            }
            outcome
        })
        .collect()
}

fn run_solve(
    board: Board,
    strategy: StrategyArg,
    show_path: bool,
    search: &SearchArgs,
) -> Result<(), Error> {
    let config = search.solver_config(slide_solver::solver::DEFAULT_MAX_MOVES);
    if !board.is_solvable() {
        warn!("Board is not solvable; no strategy will search it");
    }

    let engine = SearchEngine::new(board);
    let outcomes = run_strategies(&engine, &strategy.strategies(), &config);

    if search.json {
        let output = format_board(engine.board(), &outcomes, show_path);
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    println!("Initial board ({}):\n{}\n", engine.board().shape(), engine.board());
    if show_path {
        for outcome in &outcomes {
            if let Some(path) = &outcome.solution {
                println!("{} solution:", outcome.strategy);
                for (step, config) in path.iter().enumerate() {
                    println!("Step {}:\n{}\n", step, config.grid(engine.board().shape()));
                }
            }
        }
    }
    println!("{}", render_table(&outcomes));
    Ok(())
}

fn run_bench(
    boards: usize,
    scramble: Scramble,
    seed: Option<u64>,
    shape: Shape,
    search: &SearchArgs,
) -> Result<(), Error> {
    let config = search.solver_config(BENCH_MAX_MOVES);
    let seed = seed.unwrap_or_else(rand::random);
    let mut rng = StdRng::seed_from_u64(seed);
    info!(seed, boards, %shape, ?scramble, "Starting benchmark");

    let mut seen = HashSet::new();
    let mut results: Vec<(Board, Vec<SearchOutcome>)> = Vec::with_capacity(boards);

    for index in 0..boards {
        let board = distinct_board(shape, scramble, &mut rng, &mut seen)?;
        if !search.json {
            println!("\n=== Board {} ===", index + 1);
            println!("{}", board);
        }

        let engine = SearchEngine::new(board);
        let outcomes = run_strategies(&engine, &Strategy::ALL, &config);
        results.push((engine.board().clone(), outcomes));
    }

    if search.json {
        let output: Vec<BoardOutput> = results
            .iter()
            .map(|(board, outcomes)| format_board(board, outcomes, false))
            .collect();
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    println!("\n=== Consolidated Report ===");
    for (index, (_, outcomes)) in results.iter().enumerate() {
        println!("\nBoard {}:", index + 1);
        println!("{}", render_table(outcomes));
    }
    Ok(())
}

/// Generate a board whose starting configuration has not been used yet.
fn distinct_board(
    shape: Shape,
    scramble: Scramble,
    rng: &mut StdRng,
    seen: &mut HashSet<Vec<u8>>,
) -> Result<Board, Error> {
    for _ in 0..MAX_GENERATION_ATTEMPTS {
        let board = generate(shape, scramble, rng)?;
        if seen.insert(board.initial().as_slice().to_vec()) {
            return Ok(board);
        }
    }
    Err(Error::Usage(format!(
        "could not generate a new {} board after {} attempts",
        shape, MAX_GENERATION_ATTEMPTS
    )))
}
