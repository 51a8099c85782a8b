//! YAML descriptions of puzzles and the glue that runs them.
//!
//! ```yaml
//! kind: jumping_labyrinth
//! layout:
//!   - "S.."
//!   - "..T"
//! schedule: [1, 2]
//! ```
//!
//! Layouts are given either one token per character (`S.#T` style grids)
//! or as whitespace separated tokens (numbers and operators). Cells are
//! `[row, col]` pairs or 1-based row-major cell numbers, as noted per field.

use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{info, instrument};

use crate::engine::{BreadthFirstSearch, SearchLimits, SearchStatus};
use crate::error::MazeError;
use crate::grid::{Cell, Dims, Walls};
use crate::layout::MazeLayout;
use crate::path::Path;
use crate::policy::arrow::ArrowMaze;
use crate::policy::calculation::{CalculationMaze, DEFAULT_LIMIT};
use crate::policy::chess::ChessMaze;
use crate::policy::jumping::{JumpingMaze, TurnRule};
use crate::policy::labyrinth::{JumpingLabyrinth, Labyrinth};
use crate::policy::life::MazeOfLife;
use crate::policy::marble::MarbleMaze;
use crate::policy::rolling::RollingBlockMaze;
use crate::policy::Policy;
use crate::stat::Stats;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case", deny_unknown_fields)]
pub enum Puzzle {
    Jumping {
        /// Whitespace separated tokens.
        layout: Vec<String>,
        #[serde(default)]
        diagonals: bool,
        #[serde(default)]
        rule: TurnRule,
        #[serde(default)]
        wildcards: bool,
        start: Option<Cell>,
        target: Option<Cell>,
    },
    JumpingLabyrinth {
        /// One token per character.
        layout: Vec<String>,
        schedule: Vec<usize>,
    },
    Labyrinth {
        rows: usize,
        cols: usize,
        /// Cell numbers.
        start: usize,
        target: usize,
        #[serde(default)]
        walls: Vec<String>,
    },
    Marble {
        rows: usize,
        cols: usize,
        /// Cell numbers.
        red: Vec<usize>,
        #[serde(default)]
        black: Vec<usize>,
        sink: usize,
        #[serde(default)]
        walls: Vec<String>,
    },
    Life {
        rows: usize,
        cols: usize,
        /// Cell numbers.
        start: usize,
        target: usize,
        live: Vec<usize>,
    },
    Rolling {
        /// One token per character.
        layout: Vec<String>,
        /// Cell numbers; each defaults to its `S` or `T` cell.
        start: Option<usize>,
        target: Option<usize>,
        #[serde(default)]
        color_matching: bool,
    },
    Arrow {
        /// Whitespace separated tokens.
        layout: Vec<String>,
        start: Option<Cell>,
        target: Option<Cell>,
        #[serde(default)]
        alternating_colors: bool,
    },
    Calculation {
        /// Whitespace separated tokens.
        layout: Vec<String>,
        #[serde(default)]
        start_value: i64,
        target_value: i64,
        limit: Option<u64>,
    },
    Chess {
        /// One token per character.
        layout: Vec<String>,
        start: Option<Cell>,
        target: Option<Cell>,
    },
}

/// Result of one solved (or abandoned) puzzle.
#[derive(Debug, Clone, Serialize)]
pub struct Report {
    pub kind: &'static str,
    pub status: SearchStatus,
    pub path: Option<Path>,
    pub stats: Stats,
}

impl Report {
    pub fn moves(&self) -> Option<usize> {
        self.path.as_ref().map(Path::len)
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}: {:?}", self.kind, self.status)?;
        if let Some(path) = &self.path {
            writeln!(f, "moves: {}", path.len())?;
            writeln!(f, "path: {path}")?;
            if !path.cells.is_empty() {
                let cells: Vec<String> = path.cells.iter().map(usize::to_string).collect();
                writeln!(f, "cells: {}", cells.join(" "))?;
            }
        }
        Ok(())
    }
}

fn endpoints(
    start: Option<Cell>,
    target: Option<Cell>,
    dims: Dims,
) -> Option<(Cell, Cell)> {
    if start.is_none() && target.is_none() {
        return None;
    }
    Some((
        start.unwrap_or((0, 0)),
        target.unwrap_or((dims.rows - 1, dims.cols - 1)),
    ))
}

fn numbered(dims: Dims, numbers: &[usize]) -> Result<Vec<Cell>, MazeError> {
    numbers
        .iter()
        .map(|&number| dims.cell_from_number(number))
        .collect()
}

#[instrument(skip_all, name = "solve_puzzle", fields(kind = kind), level = "debug")]
fn search<P: Policy>(kind: &'static str, policy: &P, limits: SearchLimits) -> Report {
    let mut search = BreadthFirstSearch::new(policy, limits);
    let outcome = search.run();
    let stats = search.stats().clone();
    stats.print();

    let path = outcome
        .goal()
        .map(|goal| Path::from_state(goal, policy.dims()));
    info!("{kind} puzzle finished: {:?}", outcome.status());

    Report {
        kind,
        status: outcome.status(),
        path,
        stats,
    }
}

impl Puzzle {
    pub fn from_yaml_str(yaml: &str) -> anyhow::Result<Self> {
        serde_yaml::from_str(yaml).context("invalid puzzle description")
    }

    pub fn load_from_file(path: &str) -> anyhow::Result<Self> {
        let yaml = std::fs::read_to_string(path)
            .with_context(|| format!("cannot read puzzle file {path}"))?;
        Self::from_yaml_str(&yaml).with_context(|| format!("error with puzzle file: {path}"))
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Puzzle::Jumping { .. } => "jumping",
            Puzzle::JumpingLabyrinth { .. } => "jumping_labyrinth",
            Puzzle::Labyrinth { .. } => "labyrinth",
            Puzzle::Marble { .. } => "marble",
            Puzzle::Life { .. } => "life",
            Puzzle::Rolling { .. } => "rolling",
            Puzzle::Arrow { .. } => "arrow",
            Puzzle::Calculation { .. } => "calculation",
            Puzzle::Chess { .. } => "chess",
        }
    }

    /// Builds the policy this description stands for and searches it.
    pub fn solve(&self, limits: SearchLimits) -> Result<Report, MazeError> {
        let kind = self.kind();
        let report = match self {
            Puzzle::Jumping {
                layout,
                diagonals,
                rule,
                wildcards,
                start,
                target,
            } => {
                let layout = MazeLayout::from_token_lines(layout)?;
                let mut maze = JumpingMaze::new(&layout).with_rule(*rule);
                if *diagonals {
                    maze = maze.with_diagonals();
                }
                if *wildcards {
                    maze = maze.with_wildcards();
                }
                if let Some((start, target)) = endpoints(*start, *target, layout.dims()) {
                    maze = maze.with_endpoints(start, target)?;
                }
                search(kind, &maze, limits)
            }
            Puzzle::JumpingLabyrinth { layout, schedule } => {
                let layout = MazeLayout::from_char_lines(layout)?;
                let maze = JumpingLabyrinth::new(&layout, schedule)?;
                search(kind, &maze, limits)
            }
            Puzzle::Labyrinth {
                rows,
                cols,
                start,
                target,
                walls,
            } => {
                let dims = Dims::new(*rows, *cols);
                let maze = Labyrinth::new(
                    dims,
                    Walls::from_tokens(dims, walls)?,
                    dims.cell_from_number(*start)?,
                    dims.cell_from_number(*target)?,
                )?;
                search(kind, &maze, limits)
            }
            Puzzle::Marble {
                rows,
                cols,
                red,
                black,
                sink,
                walls,
            } => {
                let dims = Dims::new(*rows, *cols);
                let maze = MarbleMaze::new(
                    dims,
                    Walls::from_tokens(dims, walls)?,
                    numbered(dims, red)?,
                    numbered(dims, black)?,
                    dims.cell_from_number(*sink)?,
                )?;
                search(kind, &maze, limits)
            }
            Puzzle::Life {
                rows,
                cols,
                start,
                target,
                live,
            } => {
                let dims = Dims::new(*rows, *cols);
                let maze = MazeOfLife::new(
                    dims,
                    dims.cell_from_number(*start)?,
                    dims.cell_from_number(*target)?,
                    numbered(dims, live)?,
                )?;
                search(kind, &maze, limits)
            }
            Puzzle::Rolling {
                layout,
                start,
                target,
                color_matching,
            } => {
                let layout = MazeLayout::from_char_lines(layout)?;
                let mut maze = RollingBlockMaze::with_endpoints(&layout, *start, *target)?;
                if *color_matching {
                    maze = maze.with_color_matching();
                }
                search(kind, &maze, limits)
            }
            Puzzle::Arrow {
                layout,
                start,
                target,
                alternating_colors,
            } => {
                let layout = MazeLayout::from_token_lines(layout)?;
                let mut maze = ArrowMaze::new(&layout)?;
                if let Some((start, target)) = endpoints(*start, *target, layout.dims()) {
                    maze = maze.with_endpoints(start, target)?;
                }
                if *alternating_colors {
                    maze = maze.with_alternating_colors();
                }
                search(kind, &maze, limits)
            }
            Puzzle::Calculation {
                layout,
                start_value,
                target_value,
                limit,
            } => {
                let layout = MazeLayout::from_token_lines(layout)?;
                let maze = CalculationMaze::bounded(
                    &layout,
                    *start_value,
                    *target_value,
                    limit.unwrap_or(DEFAULT_LIMIT),
                )?;
                search(kind, &maze, limits)
            }
            Puzzle::Chess {
                layout,
                start,
                target,
            } => {
                let layout = MazeLayout::from_char_lines(layout)?;
                let mut maze = ChessMaze::new(&layout)?;
                if let Some((start, target)) = endpoints(*start, *target, layout.dims()) {
                    maze = maze.with_endpoints(start, target)?;
                }
                search(kind, &maze, limits)
            }
        };
        Ok(report)
    }
}
