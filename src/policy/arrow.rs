//! Arrow mazes: each cell dictates the direction of the next move, you only
//! pick how far to go.

use std::str::FromStr;

use super::{Policy, StateRef};
use crate::error::MazeError;
use crate::grid::{Cell, Dims};
use crate::layout::MazeLayout;
use crate::movement::Direction;
use crate::state::{Move, SearchState};

/// Marks a cell without an arrow, typically the target.
const END_TOKEN: &str = "*";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Sign {
    Arrow(Direction),
    /// Send the marker back the way it came.
    Reverse,
    Clockwise,
    CounterClockwise,
    End,
}

impl Sign {
    fn parse(token: &str) -> Option<Sign> {
        match token {
            "R" => Some(Sign::Reverse),
            "CW" => Some(Sign::Clockwise),
            "CCW" => Some(Sign::CounterClockwise),
            END_TOKEN => Some(Sign::End),
            code => Direction::from_str(code)
                .ok()
                .filter(|direction| direction.move_type().is_some())
                .map(Sign::Arrow),
        }
    }

    fn is_reflector(self) -> bool {
        matches!(self, Sign::Reverse | Sign::Clockwise | Sign::CounterClockwise)
    }

    fn heading(self, arrival: Option<Direction>) -> Option<Direction> {
        match self {
            Sign::Arrow(direction) => Some(direction),
            Sign::Reverse => arrival.map(Direction::opposite),
            Sign::Clockwise => arrival.map(Direction::rotate_cw),
            Sign::CounterClockwise => arrival.map(Direction::rotate_ccw),
            Sign::End => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ArrowMaze<'a> {
    layout: &'a MazeLayout,
    signs: Vec<Vec<Sign>>,
    start: Cell,
    target: Cell,
    alternating_colors: bool,
}

impl<'a> ArrowMaze<'a> {
    /// Starts in the top-left corner and ends in the bottom-right one.
    pub fn new(layout: &'a MazeLayout) -> Result<Self, MazeError> {
        let (rows, cols) = layout.dimensions();
        let signs = (0..rows)
            .map(|row| {
                (0..cols)
                    .map(|col| {
                        let token = layout.raw_token(row, col);
                        Sign::parse(token).ok_or_else(|| MazeError::UnknownToken {
                            token: token.to_string(),
                            row,
                            col,
                        })
                    })
                    .collect::<Result<Vec<_>, _>>()
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(ArrowMaze {
            layout,
            signs,
            start: (0, 0),
            target: (rows - 1, cols - 1),
            alternating_colors: false,
        })
    }

    pub fn with_endpoints(mut self, start: Cell, target: Cell) -> Result<Self, MazeError> {
        let dims = self.layout.dims();
        self.start = dims.check(start)?;
        self.target = dims.check(target)?;
        Ok(self)
    }

    /// Never move between two cells carrying the same colour property.
    pub fn with_alternating_colors(mut self) -> Self {
        self.alternating_colors = true;
        self
    }

    fn sign(&self, (row, col): Cell) -> Sign {
        self.signs[row][col]
    }

    fn color(&self, (row, col): Cell) -> Option<&str> {
        self.layout.property(row, col)
    }
}

impl Policy for ArrowMaze<'_> {
    type Payload = Cell;
    /// The arriving direction matters only on a reflector.
    type Key = (Cell, Option<Direction>);

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
        let from = *state.payload();
        let arrival = state.previous_move().map(|mv| mv.code);
        let heading = self.sign(from).heading(arrival);

        let dims = self.dims();
        heading.into_iter().flat_map(move |direction| {
            (1..).map_while(move |distance| {
                let cell = dims.offset(from, direction.delta(), distance)?;
                Some(SearchState::child(state, Move::new(direction, distance), cell))
            })
        })
    }

    fn equivalence_key(&self, state: &SearchState<Cell>) -> Self::Key {
        let cell = *state.payload();
        let arrival = state
            .previous_move()
            .filter(|_| self.sign(cell).is_reflector())
            .map(|mv| mv.code);
        (cell, arrival)
    }

    fn is_goal(&self, state: &SearchState<Cell>) -> bool {
        state.is_goal(|cell| *cell == self.target)
    }

    fn edge_filter(&self, from: &SearchState<Cell>, candidate: &SearchState<Cell>) -> bool {
        if !self.alternating_colors {
            return true;
        }
        match self.color(*from.payload()) {
            Some(color) => self.color(*candidate.payload()) != Some(color),
            None => true,
        }
    }
}
