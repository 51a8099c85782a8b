//! Numbered jump mazes: the number on a cell is the length of the next jump.

use serde::{Deserialize, Serialize};

use super::{Policy, StateRef};
use crate::error::MazeError;
use crate::grid::{Cell, Dims};
use crate::layout::MazeLayout;
use crate::movement::{Direction, MoveType};
use crate::state::{Move, SearchState};

const WILDCARD_TOKEN: &str = "*";
const CIRCLE_PROPERTY: &str = "C";

/// Restriction on the direction of the next jump given the arriving one.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TurnRule {
    #[default]
    Free,
    /// Alternate orthogonal and diagonal jumps, starting orthogonally.
    Switch,
    /// Keep the move type, flip it on circle cells, starting orthogonally.
    Toggle,
    /// Never jump straight back the way you came.
    NoUTurn,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct JumpKey {
    cell: Cell,
    move_type: Option<MoveType>,
    arrival: Option<Direction>,
    inherited_distance: usize,
}

#[derive(Debug, Clone)]
pub struct JumpingMaze<'a> {
    layout: &'a MazeLayout,
    start: Cell,
    target: Cell,
    diagonals: bool,
    rule: TurnRule,
    wildcards: bool,
}

impl<'a> JumpingMaze<'a> {
    /// Orthogonal jumps from the top-left to the bottom-right corner.
    pub fn new(layout: &'a MazeLayout) -> Self {
        let (rows, cols) = layout.dimensions();
        JumpingMaze {
            layout,
            start: (0, 0),
            target: (rows - 1, cols - 1),
            diagonals: false,
            rule: TurnRule::Free,
            wildcards: false,
        }
    }

    pub fn with_diagonals(mut self) -> Self {
        self.diagonals = true;
        self
    }

    /// Switch and toggle rules imply diagonal jumps.
    pub fn with_rule(mut self, rule: TurnRule) -> Self {
        self.rule = rule;
        if matches!(rule, TurnRule::Switch | TurnRule::Toggle) {
            self.diagonals = true;
        }
        self
    }

    pub fn with_wildcards(mut self) -> Self {
        self.wildcards = true;
        self
    }

    pub fn with_endpoints(mut self, start: Cell, target: Cell) -> Result<Self, MazeError> {
        let dims = self.layout.dims();
        self.start = dims.check(start)?;
        self.target = dims.check(target)?;
        Ok(self)
    }

    fn is_wildcard(&self, (row, col): Cell) -> bool {
        self.wildcards && self.layout.raw_token(row, col) == WILDCARD_TOKEN
    }

    /// A wildcard cell repeats the length of the jump that landed on it.
    fn wildcard_distance(&self, state: &SearchState<Cell>) -> Option<usize> {
        if !self.is_wildcard(*state.payload()) {
            return None;
        }
        state.previous_move().and_then(|mv| mv.distance)
    }

    fn step_count(&self, state: &SearchState<Cell>) -> usize {
        let (row, col) = *state.payload();
        self.wildcard_distance(state)
            .unwrap_or_else(|| self.layout.weight(row, col))
    }

    fn base_moves(&self) -> &'static [Direction] {
        if self.diagonals {
            &Direction::COMPASS
        } else {
            &Direction::ORTHOGONAL
        }
    }

    fn allowed_moves(&self, state: &SearchState<Cell>) -> &'static [Direction] {
        let arriving = state.previous_move().and_then(Move::move_type);
        match (self.rule, arriving) {
            (TurnRule::Free | TurnRule::NoUTurn, _) => self.base_moves(),
            (TurnRule::Switch | TurnRule::Toggle, None) => &Direction::ORTHOGONAL,
            (TurnRule::Switch, Some(move_type)) => move_type.flip().directions(),
            (TurnRule::Toggle, Some(move_type)) => {
                let (row, col) = *state.payload();
                if self.layout.property(row, col) == Some(CIRCLE_PROPERTY) {
                    move_type.flip().directions()
                } else {
                    move_type.directions()
                }
            }
        }
    }
}

impl Policy for JumpingMaze<'_> {
    type Payload = Cell;
    type Key = JumpKey;

    fn dims(&self) -> Dims {
        self.layout.dims()
    }

    fn start(&self) -> StateRef<Cell> {
        SearchState::root(self.start)
    }

    fn successors<'s>(
        &'s self,
        state: &'s StateRef<Cell>,
    ) -> impl Iterator<Item = StateRef<Cell>> + 's {
        let cell = *state.payload();
        let distance = self.step_count(state);
        let excluded = match self.rule {
            TurnRule::NoUTurn => state.previous_move().map(|mv| mv.code.opposite()),
            _ => None,
        };
        let dims = self.dims();

        // A zero-length jump would only lead back to the same state.
        let moves = if distance == 0 {
            &[][..]
        } else {
            self.allowed_moves(state)
        };

        moves
            .iter()
            .copied()
            .filter(move |&direction| Some(direction) != excluded)
            .filter_map(move |direction| {
                let next = dims.offset(cell, direction.delta(), distance)?;
                Some(SearchState::child(state, Move::new(direction, distance), next))
            })
    }

    fn equivalence_key(&self, state: &SearchState<Cell>) -> JumpKey {
        let arriving = state.previous_move();
        JumpKey {
            cell: *state.payload(),
            move_type: match self.rule {
                TurnRule::Switch | TurnRule::Toggle => arriving.and_then(Move::move_type),
                _ => None,
            },
            arrival: match self.rule {
                TurnRule::NoUTurn => arriving.map(|mv| mv.code),
                _ => None,
            },
            inherited_distance: self.wildcard_distance(state).unwrap_or(0),
        }
    }

    fn is_goal(&self, state: &SearchState<Cell>) -> bool {
        state.is_goal(|cell| *cell == self.target)
    }
}
