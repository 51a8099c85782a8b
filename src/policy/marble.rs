//! Tilt mazes: every marble slides at once until it meets the edge, a wall or
//! another marble. A marble rolling over the sink drops out of the board.

use std::collections::HashMap;

use super::{Policy, StateRef};
use crate::error::MazeError;
use crate::grid::{Cell, Dims, Walls};
use crate::movement::Direction;
use crate::state::{Move, Payload, SearchState};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Colour {
    /// Marbles that have to be sunk.
    Red,
    Black,
}

/// Marble positions, kept sorted so equal boards compare equal.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Marbles {
    red: Vec<Cell>,
    black: Vec<Cell>,
}

impl Marbles {
    pub fn new(mut red: Vec<Cell>, mut black: Vec<Cell>) -> Self {
        red.sort_unstable();
        black.sort_unstable();
        Marbles { red, black }
    }

    pub fn red(&self) -> &[Cell] {
        &self.red
    }

    pub fn black(&self) -> &[Cell] {
        &self.black
    }

    fn iter(&self) -> impl Iterator<Item = (Cell, Colour)> + '_ {
        let red = self.red.iter().map(|&cell| (cell, Colour::Red));
        let black = self.black.iter().map(|&cell| (cell, Colour::Black));
        red.chain(black)
    }
}

impl Payload for Marbles {}

#[derive(Debug, Clone)]
pub struct MarbleMaze {
    dims: Dims,
    walls: Walls,
    sink: Cell,
    marbles: Marbles,
}

impl MarbleMaze {
    pub fn new(
        dims: Dims,
        walls: Walls,
        red: Vec<Cell>,
        black: Vec<Cell>,
        sink: Cell,
    ) -> Result<Self, MazeError> {
        for &cell in red.iter().chain(black.iter()) {
            dims.check(cell)?;
        }
        Ok(MarbleMaze {
            dims,
            walls,
            sink: dims.check(sink)?,
            marbles: Marbles::new(red, black),
        })
    }

    /// Marbles ordered so that the one furthest along `direction` moves first;
    /// a trailing marble then stops against the one ahead of it.
    fn scan_order(marbles: &Marbles, direction: Direction) -> Vec<(Cell, Colour)> {
        let mut order: Vec<_> = marbles.iter().collect();
        order.sort_by_key(|&((row, col), _)| {
            let (row, col) = (row as isize, col as isize);
            match direction {
                Direction::N => (row, col),
                Direction::S => (-row, col),
                Direction::W => (col, row),
                Direction::E => (-col, row),
                _ => unreachable!("marbles only tilt orthogonally, got {direction}"),
            }
        });
        order
    }

    fn tilt(&self, marbles: &Marbles, direction: Direction) -> Marbles {
        let mut placed: HashMap<Cell, Colour> = HashMap::new();

        for (start, colour) in Self::scan_order(marbles, direction) {
            let mut cell = start;
            let mut sunk = false;
            while let Some(next) = self.dims.offset(cell, direction.delta(), 1) {
                if self.walls.blocks(cell, next) || placed.contains_key(&next) {
                    break;
                }
                cell = next;
                if cell == self.sink {
                    sunk = true;
                    break;
                }
            }
            if !sunk {
                placed.insert(cell, colour);
            }
        }

        let (red, black): (Vec<_>, Vec<_>) = placed
            .into_iter()
            .partition(|&(_, colour)| colour == Colour::Red);
        Marbles::new(
            red.into_iter().map(|(cell, _)| cell).collect(),
            black.into_iter().map(|(cell, _)| cell).collect(),
        )
    }
}

impl Policy for MarbleMaze {
    type Payload = Marbles;
    type Key = Marbles;

    fn dims(&self) -> Dims {
        self.dims
    }

    fn start(&self) -> StateRef<Marbles> {
        SearchState::root(self.marbles.clone())
    }

    fn successors<'s>(
        &'s self,
        state: &'s StateRef<Marbles>,
    ) -> impl Iterator<Item = StateRef<Marbles>> + 's {
        Direction::ORTHOGONAL.into_iter().map(move |direction| {
            let marbles = self.tilt(state.payload(), direction);
            SearchState::child(state, Move::unit(direction), marbles)
        })
    }

    fn equivalence_key(&self, state: &SearchState<Marbles>) -> Marbles {
        state.payload().clone()
    }

    fn is_goal(&self, state: &SearchState<Marbles>) -> bool {
        state.is_goal(|marbles| marbles.red.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::solve;
    use crate::path::{replay, Path};
    use crate::policy::IdentityKey;

    fn maze(
        rows: usize,
        cols: usize,
        red: &[usize],
        black: &[usize],
        sink: usize,
        walls: &[&str],
    ) -> MarbleMaze {
        let dims = Dims::new(rows, cols);
        let cells = |numbers: &[usize]| -> Vec<Cell> {
            numbers
                .iter()
                .map(|&number| dims.cell_from_number(number).unwrap())
                .collect()
        };
        MarbleMaze::new(
            dims,
            Walls::from_tokens(dims, walls).unwrap(),
            cells(red),
            cells(black),
            dims.cell_from_number(sink).unwrap(),
        )
        .unwrap()
    }

    #[test]
    fn test_trailing_marble_stops_behind_leading_one() {
        // Sink at the east end, a wall just before it.
        let maze = maze(1, 6, &[1, 3], &[], 6, &["4:E"]);
        let tilted = maze.tilt(&maze.marbles, Direction::E);
        assert_eq!(tilted.red(), &[(0, 2), (0, 3)]);

        // Without a sink in the way both marbles pile up at the edge.
        let maze = self::maze(2, 5, &[1, 3], &[], 6, &[]);
        let tilted = maze.tilt(&maze.marbles, Direction::E);
        assert_eq!(tilted.red(), &[(0, 3), (0, 4)]);
        let tilted = maze.tilt(&maze.marbles, Direction::W);
        assert_eq!(tilted.red(), &[(0, 0), (0, 1)]);
    }

    #[test]
    fn test_marbles_drop_into_sink() {
        let maze = maze(1, 3, &[1], &[2], 3, &[]);
        let tilted = maze.tilt(&maze.marbles, Direction::E);
        assert!(tilted.red().is_empty());
        assert!(tilted.black().is_empty());

        let outcome = solve(&maze);
        assert_eq!(Path::from_state(outcome.goal().unwrap(), maze.dims()).compact(), "E");
    }

    #[test]
    fn test_black_marble_as_a_stopper() {
        let maze = maze(3, 3, &[1], &[9], 5, &[]);
        let outcome = solve(&maze);
        let path = Path::from_state(outcome.goal().unwrap(), maze.dims());
        assert_eq!(path.to_string(), "N : E : S");
        assert!(path.cells.is_empty());

        let replayed = replay(&maze, &path.moves).unwrap();
        assert!(maze.is_goal(&replayed));
    }

    #[test]
    fn test_walled_board() {
        let maze = maze(4, 4, &[1, 16], &[6], 11, &["10:E", "7:S"]);
        let outcome = solve(&maze);
        let goal = outcome.goal().unwrap();
        assert_eq!(goal.depth(), 6);

        let identity = IdentityKey(maze.clone());
        assert_eq!(solve(&identity).goal().unwrap().depth(), 6);
    }

    #[test]
    fn test_unsolvable_board() {
        // Mirrored red marbles never both pass over the centre.
        let maze = maze(3, 3, &[1, 9], &[], 5, &[]);
        assert!(!solve(&maze).is_found());
    }
}
