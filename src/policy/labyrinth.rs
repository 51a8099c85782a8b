//! Mazes on a plain `S T . #` grid or a walled grid, where the length of a
//! move is fixed by the rules instead of the cell.

use std::collections::HashMap;

use super::{Policy, StateRef};
use crate::error::MazeError;
use crate::grid::{Cell, Dims, Walls};
use crate::layout::MazeLayout;
use crate::movement::Direction;
use crate::state::{Move, SearchState};

pub(crate) const START_TOKEN: &str = "S";
pub(crate) const TARGET_TOKEN: &str = "T";
pub(crate) const EMPTY_TOKEN: &str = ".";
pub(crate) const BLOCKED_TOKEN: &str = "#";

/// Jump lengths follow a cyclic schedule: after a jump of `schedule[i]` the
/// next jump is `schedule[(i + 1) % len]`. Every cell jumped over must be open.
#[derive(Debug, Clone)]
pub struct JumpingLabyrinth<'a> {
    layout: &'a MazeLayout,
    start: Cell,
    target: Cell,
    first_distance: usize,
    next_distance: HashMap<usize, usize>,
}

impl<'a> JumpingLabyrinth<'a> {
    pub fn new(layout: &'a MazeLayout, schedule: &[usize]) -> Result<Self, MazeError> {
        let invalid = |reason| MazeError::InvalidSchedule {
            schedule: schedule.to_vec(),
            reason,
        };

        let first_distance = *schedule.first().ok_or_else(|| invalid("schedule is empty"))?;
        if schedule.contains(&0) {
            return Err(invalid("jump lengths must be positive"));
        }

        // The previous jump length is the only memory a state has, so it must
        // identify a unique position in the schedule.
        let mut next_distance = HashMap::new();
        for (index, &distance) in schedule.iter().enumerate() {
            let next = schedule[(index + 1) % schedule.len()];
            if next_distance.insert(distance, next).is_some() {
                return Err(invalid("jump lengths must not repeat"));
            }
        }

        let mut start = None;
        let mut target = None;
        for cell in layout.dims().cells() {
            match layout.token_at(cell) {
                START_TOKEN => start = Some(cell),
                TARGET_TOKEN => target = Some(cell),
                EMPTY_TOKEN | BLOCKED_TOKEN => {}
                token => {
                    return Err(MazeError::UnknownToken {
                        token: token.to_string(),
                        row: cell.0,
                        col: cell.1,
                    })
                }
            }
        }

        Ok(JumpingLabyrinth {
            layout,
            start: start.ok_or(MazeError::MissingCell("start"))?,
            target: target.ok_or(MazeError::MissingCell("target"))?,
            first_distance,
            next_distance,
        })
    }

    fn is_blocked(&self, cell: Cell) -> bool {
        self.layout.token_at(cell) == BLOCKED_TOKEN
    }

    fn distance(&self, state: &SearchState<Cell>) -> usize {
        match state.previous_move().and_then(|mv| mv.distance) {
            None => self.first_distance,
            Some(previous) => self.next_distance[&previous],
        }
    }

    /// Landing cell of a jump, if the whole way there is open.
    fn jump(&self, from: Cell, direction: Direction, distance: usize) -> Option<Cell> {
        let dims = self.layout.dims();
        let mut landing = from;
        for step in 1..=distance {
            landing = dims.offset(from, direction.delta(), step)?;
            if self.is_blocked(landing) {
                return None;
            }
        }
        Some(landing)
    }
}

impl Policy for JumpingLabyrinth<'_> {
    type Payload = Cell;
    type Key = (Cell, Option<usize>);

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
        let distance = self.distance(state);
        Direction::ORTHOGONAL.into_iter().filter_map(move |direction| {
            let landing = self.jump(*state.payload(), direction, distance)?;
            Some(SearchState::child(state, Move::new(direction, distance), landing))
        })
    }

    fn equivalence_key(&self, state: &SearchState<Cell>) -> Self::Key {
        (
            *state.payload(),
            state.previous_move().and_then(|mv| mv.distance),
        )
    }

    fn is_goal(&self, state: &SearchState<Cell>) -> bool {
        state.is_goal(|cell| *cell == self.target)
    }
}

/// Slide orthogonally until the edge of the grid or a wall stops you.
#[derive(Debug, Clone)]
pub struct Labyrinth {
    dims: Dims,
    walls: Walls,
    start: Cell,
    target: Cell,
}

impl Labyrinth {
    pub fn new(dims: Dims, walls: Walls, start: Cell, target: Cell) -> Result<Self, MazeError> {
        Ok(Labyrinth {
            dims,
            walls,
            start: dims.check(start)?,
            target: dims.check(target)?,
        })
    }

    fn slide(&self, from: Cell, direction: Direction) -> Cell {
        let mut cell = from;
        while let Some(next) = self.dims.offset(cell, direction.delta(), 1) {
            if self.walls.blocks(cell, next) {
                break;
            }
            cell = next;
        }
        cell
    }
}

impl Policy for Labyrinth {
    type Payload = Cell;
    type Key = Cell;

    fn dims(&self) -> Dims {
        self.dims
    }

    fn start(&self) -> StateRef<Cell> {
        SearchState::root(self.start)
    }

    fn successors<'s>(
        &'s self,
        state: &'s StateRef<Cell>,
    ) -> impl Iterator<Item = StateRef<Cell>> + 's {
        Direction::ORTHOGONAL.into_iter().map(move |direction| {
            let stop = self.slide(*state.payload(), direction);
            SearchState::child(state, Move::unit(direction), stop)
        })
    }

    fn equivalence_key(&self, state: &SearchState<Cell>) -> Cell {
        *state.payload()
    }

    fn is_goal(&self, state: &SearchState<Cell>) -> bool {
        state.is_goal(|cell| *cell == self.target)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::solve;
    use crate::path::{replay, Path};
    use crate::policy::IdentityKey;

    #[test]
    fn test_alternating_schedule() {
        let layout = MazeLayout::from_char_lines(&["S..", "..T"]).unwrap();
        let labyrinth = JumpingLabyrinth::new(&layout, &[1, 2]).unwrap();

        let outcome = solve(&labyrinth);
        let path = Path::from_state(outcome.goal().unwrap(), labyrinth.dims());
        assert_eq!(path.to_string(), "S : E");
        assert_eq!(path.cells, vec![1, 4, 6]);

        let distances: Vec<_> = path.moves.iter().map(|mv| mv.distance).collect();
        assert_eq!(distances, vec![Some(1), Some(2)]);
    }

    #[test]
    fn test_single_length_schedule_is_plain_bfs() {
        let layout = MazeLayout::from_char_lines(&["S..", "...", "..T"]).unwrap();
        let labyrinth = JumpingLabyrinth::new(&layout, &[1]).unwrap();

        let goal = solve(&labyrinth).goal().cloned().unwrap();
        assert_eq!(goal.depth(), 4);

        let path = Path::from_state(&goal, labyrinth.dims());
        let replayed = replay(&labyrinth, &path.moves).unwrap();
        assert!(labyrinth.is_goal(&replayed));
    }

    #[test]
    fn test_jumps_cannot_cross_blocks() {
        let layout = MazeLayout::from_char_lines(&["S#T"]).unwrap();
        let labyrinth = JumpingLabyrinth::new(&layout, &[2]).unwrap();
        assert!(!solve(&labyrinth).is_found());

        let layout = MazeLayout::from_char_lines(&["S..", "###", "..T"]).unwrap();
        let labyrinth = JumpingLabyrinth::new(&layout, &[1]).unwrap();
        assert!(!solve(&labyrinth).is_found());
    }

    #[test]
    fn test_schedule_key_matches_identity_key() {
        let layout = MazeLayout::from_char_lines(&["S...#", ".#...", "...#.", "#...T"]).unwrap();
        let labyrinth = JumpingLabyrinth::new(&layout, &[1, 2, 3]).unwrap();

        let pruned = solve(&labyrinth).goal().map(|goal| goal.depth());
        let identity = solve(&IdentityKey(labyrinth.clone()))
            .goal()
            .map(|goal| goal.depth());
        assert_eq!(pruned, identity);
    }

    #[test]
    fn test_rejects_bad_input() {
        let layout = MazeLayout::from_char_lines(&["S.T"]).unwrap();
        assert!(matches!(
            JumpingLabyrinth::new(&layout, &[]),
            Err(MazeError::InvalidSchedule { .. })
        ));
        assert!(matches!(
            JumpingLabyrinth::new(&layout, &[1, 2, 1]),
            Err(MazeError::InvalidSchedule { .. })
        ));
        assert!(matches!(
            JumpingLabyrinth::new(&layout, &[0]),
            Err(MazeError::InvalidSchedule { .. })
        ));

        let layout = MazeLayout::from_char_lines(&["S.x"]).unwrap();
        assert_eq!(
            JumpingLabyrinth::new(&layout, &[1]).unwrap_err(),
            MazeError::UnknownToken {
                token: "x".to_string(),
                row: 0,
                col: 2
            }
        );

        let layout = MazeLayout::from_char_lines(&["S.."]).unwrap();
        assert_eq!(
            JumpingLabyrinth::new(&layout, &[1]).unwrap_err(),
            MazeError::MissingCell("target")
        );
    }

    #[test]
    fn test_slide_until_wall() {
        // Walls on the east side of cell 4 and the south side of cell 6.
        let dims = Dims::new(3, 3);
        let walls = Walls::from_tokens(dims, &["4:E", "6:S"]).unwrap();
        let labyrinth = Labyrinth::new(dims, walls, (0, 0), (1, 1)).unwrap();

        let start = labyrinth.start();
        let stops: Vec<_> = labyrinth
            .successors(&start)
            .map(|state| *state.payload())
            .collect();
        // N, S, W, E
        assert_eq!(stops, vec![(0, 0), (2, 0), (0, 0), (0, 2)]);

        let outcome = solve(&labyrinth);
        let path = Path::from_state(outcome.goal().unwrap(), labyrinth.dims());
        assert_eq!(path.to_string(), "E : S : W");
        assert_eq!(path.cells, vec![1, 3, 6, 5]);
    }
}
