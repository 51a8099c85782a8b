use std::collections::HashSet;

use super::{Policy, StateRef};
use crate::error::MazeError;
use crate::grid::{Cell, Dims};
use crate::movement::Direction;
use crate::state::{Move, Payload, SearchState};

/// Marker position plus the live cells of the board, kept sorted.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LifeBoard {
    marker: Cell,
    live: Vec<Cell>,
}

impl LifeBoard {
    pub fn new(marker: Cell, mut live: Vec<Cell>) -> Self {
        live.sort_unstable();
        live.dedup();
        LifeBoard { marker, live }
    }

    pub fn marker(&self) -> Cell {
        self.marker
    }

    pub fn live(&self) -> &[Cell] {
        &self.live
    }
}

impl Payload for LifeBoard {
    fn cell(&self) -> Option<Cell> {
        Some(self.marker)
    }
}

/// A maze whose walls are a Game of Life colony (B3/S23 on a bounded grid).
///
/// The marker steps to a king-move neighbour or stays put. It joins the
/// colony for one generation and the move stands only if the marker survives
/// that generation; it then leaves the colony again.
#[derive(Debug, Clone)]
pub struct MazeOfLife {
    dims: Dims,
    start: Cell,
    target: Cell,
    live: Vec<Cell>,
}

impl MazeOfLife {
    pub fn new(dims: Dims, start: Cell, target: Cell, live: Vec<Cell>) -> Result<Self, MazeError> {
        for &cell in &live {
            dims.check(cell)?;
        }
        Ok(MazeOfLife {
            dims,
            start: dims.check(start)?,
            target: dims.check(target)?,
            live,
        })
    }

    fn live_neighbours(&self, cell: Cell, live: &HashSet<Cell>) -> usize {
        Direction::COMPASS
            .iter()
            .filter_map(|direction| self.dims.offset(cell, direction.delta(), 1))
            .filter(|neighbour| live.contains(neighbour))
            .count()
    }

    /// One generation. Only live cells and their neighbours can change.
    fn next_generation(&self, live: &HashSet<Cell>) -> HashSet<Cell> {
        let candidates: HashSet<Cell> = live
            .iter()
            .flat_map(|&cell| {
                Direction::KING
                    .iter()
                    .filter_map(move |direction| self.dims.offset(cell, direction.delta(), 1))
            })
            .collect();

        candidates
            .into_iter()
            .filter(|&cell| match self.live_neighbours(cell, live) {
                3 => true,
                2 => live.contains(&cell),
                _ => false,
            })
            .collect()
    }

    fn step(&self, board: &LifeBoard, direction: Direction) -> Option<LifeBoard> {
        let marker = self.dims.offset(board.marker, direction.delta(), 1)?;

        let mut live: HashSet<Cell> = board.live.iter().copied().collect();
        if !live.insert(marker) {
            return None;
        }

        let mut next = self.next_generation(&live);
        next.remove(&marker)
            .then(|| LifeBoard::new(marker, next.into_iter().collect()))
    }
}

impl Policy for MazeOfLife {
    type Payload = LifeBoard;
    type Key = LifeBoard;

    fn dims(&self) -> Dims {
        self.dims
    }

    fn start(&self) -> StateRef<LifeBoard> {
        SearchState::root(LifeBoard::new(self.start, self.live.clone()))
    }

    fn successors<'s>(
        &'s self,
        state: &'s StateRef<LifeBoard>,
    ) -> impl Iterator<Item = StateRef<LifeBoard>> + 's {
        Direction::KING.into_iter().filter_map(move |direction| {
            let board = self.step(state.payload(), direction)?;
            Some(SearchState::child(state, Move::unit(direction), board))
        })
    }

    fn equivalence_key(&self, state: &SearchState<LifeBoard>) -> LifeBoard {
        state.payload().clone()
    }

    fn is_goal(&self, state: &SearchState<LifeBoard>) -> bool {
        state.is_goal(|board| board.marker == self.target)
    }
}
