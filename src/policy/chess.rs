//! Chess mazes: you move like the piece printed on your square, and keep
//! moving like it across blank squares until you land on another piece.

use serde::Serialize;

use super::labyrinth::{BLOCKED_TOKEN, EMPTY_TOKEN};
use super::{Policy, StateRef};
use crate::error::MazeError;
use crate::grid::{Cell, Dims};
use crate::layout::MazeLayout;
use crate::movement::Direction;
use crate::state::{Move, Payload, SearchState};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Piece {
    King,
    Knight,
    Bishop,
    Rook,
    Queen,
}

impl Piece {
    fn from_token(token: &str) -> Option<Piece> {
        match token {
            "K" => Some(Piece::King),
            "N" => Some(Piece::Knight),
            "B" => Some(Piece::Bishop),
            "R" => Some(Piece::Rook),
            "Q" => Some(Piece::Queen),
            _ => None,
        }
    }

    fn directions(self) -> &'static [Direction] {
        match self {
            Piece::King | Piece::Queen => &Direction::COMPASS,
            Piece::Knight => &Direction::KNIGHT,
            Piece::Bishop => &Direction::DIAGONAL,
            Piece::Rook => &Direction::ORTHOGONAL,
        }
    }

    fn slides(self) -> bool {
        matches!(self, Piece::Bishop | Piece::Rook | Piece::Queen)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Square {
    pub cell: Cell,
    pub piece: Piece,
}

impl Payload for Square {
    fn cell(&self) -> Option<Cell> {
        Some(self.cell)
    }
}

#[derive(Debug, Clone)]
pub struct ChessMaze<'a> {
    layout: &'a MazeLayout,
    start: Square,
    target: Cell,
}

impl<'a> ChessMaze<'a> {
    /// Starts in the top-left corner and ends in the bottom-right one.
    pub fn new(layout: &'a MazeLayout) -> Result<Self, MazeError> {
        for cell in layout.dims().cells() {
            let token = layout.token_at(cell);
            let known = matches!(token, EMPTY_TOKEN | BLOCKED_TOKEN)
                || Piece::from_token(token).is_some();
            if !known {
                return Err(MazeError::UnknownToken {
                    token: token.to_string(),
                    row: cell.0,
                    col: cell.1,
                });
            }
        }

        let (rows, cols) = layout.dimensions();
        let start = (0, 0);
        Ok(ChessMaze {
            layout,
            start: Square {
                cell: start,
                piece: Piece::from_token(layout.token_at(start))
                    .ok_or(MazeError::MissingPiece(start))?,
            },
            target: (rows - 1, cols - 1),
        })
    }

    pub fn with_endpoints(mut self, start: Cell, target: Cell) -> Result<Self, MazeError> {
        let dims = self.layout.dims();
        let start = dims.check(start)?;
        self.start = Square {
            cell: start,
            piece: Piece::from_token(self.layout.token_at(start))
                .ok_or(MazeError::MissingPiece(start))?,
        };
        self.target = dims.check(target)?;
        Ok(self)
    }

    fn is_blocked(&self, cell: Cell) -> bool {
        self.layout.token_at(cell) == BLOCKED_TOKEN
    }

    /// Landing squares along one direction, nearest first.
    fn reach(
        &self,
        square: Square,
        direction: Direction,
    ) -> impl Iterator<Item = (usize, Cell)> + '_ {
        let dims = self.layout.dims();
        let max_distance = if square.piece.slides() { usize::MAX } else { 1 };
        (1..=max_distance)
            .map_while(move |distance| {
                let cell = dims.offset(square.cell, direction.delta(), distance)?;
                Some((distance, cell))
            })
            .take_while(move |&(_, cell)| !self.is_blocked(cell))
    }

    fn land(&self, cell: Cell, piece: Piece) -> Square {
        Square {
            cell,
            piece: Piece::from_token(self.layout.token_at(cell)).unwrap_or(piece),
        }
    }
}

impl Policy for ChessMaze<'_> {
    type Payload = Square;
    type Key = Square;

    fn dims(&self) -> Dims {
        self.layout.dims()
    }

    fn start(&self) -> StateRef<Square> {
        SearchState::root(self.start)
    }

    fn successors<'s>(
        &'s self,
        state: &'s StateRef<Square>,
    ) -> impl Iterator<Item = StateRef<Square>> + 's {
        let square = *state.payload();
        square.piece.directions().iter().flat_map(move |&direction| {
            self.reach(square, direction).map(move |(distance, cell)| {
                let landing = self.land(cell, square.piece);
                SearchState::child(state, Move::new(direction, distance), landing)
            })
        })
    }

    fn equivalence_key(&self, state: &SearchState<Square>) -> Square {
        *state.payload()
    }

    fn is_goal(&self, state: &SearchState<Square>) -> bool {
        state.is_goal(|square| square.cell == self.target)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::solve;
    use crate::path::{replay, Path};
    use crate::policy::IdentityKey;

    fn solve_path(maze: &ChessMaze) -> Option<Path> {
        let outcome = solve(maze);
        outcome.goal().map(|goal| Path::from_state(goal, maze.dims()))
    }

    #[test]
    fn test_rook_slides_until_blocked() {
        let layout = MazeLayout::from_char_lines(&["R..", ".#.", "..."]).unwrap();
        let maze = ChessMaze::new(&layout).unwrap();

        let start = maze.start();
        let cells: Vec<_> = maze.successors(&start).map(|s| s.payload().cell).collect();
        assert_eq!(cells, vec![(1, 0), (2, 0), (0, 1), (0, 2)]);

        let middle = SearchState::root(Square {
            cell: (0, 1),
            piece: Piece::Rook,
        });
        let cells: Vec<_> = maze.successors(&middle).map(|s| s.payload().cell).collect();
        assert_eq!(cells, vec![(0, 0), (0, 2)]);

        let path = solve_path(&maze).unwrap();
        assert_eq!(path.to_string(), "S : E");
        assert_eq!(path.cells, vec![1, 7, 9]);
    }

    #[test]
    fn test_piece_changes_on_landing() {
        let layout = MazeLayout::from_char_lines(&["K#..", "#N#.", ".##."]).unwrap();
        let maze = ChessMaze::new(&layout)
            .unwrap()
            .with_endpoints((0, 0), (0, 2))
            .unwrap();

        let outcome = solve(&maze);
        let goal = outcome.goal().unwrap();
        assert_eq!(goal.payload().piece, Piece::Knight);

        let path = Path::from_state(goal, maze.dims());
        assert_eq!(path.to_string(), "SE : ESE : NNW");
        assert_eq!(path.cells, vec![1, 6, 12, 3]);
        assert!(maze.is_goal(&replay(&maze, &path.moves).unwrap()));

        // A king on the middle square walks straight over.
        let layout = MazeLayout::from_char_lines(&["K#..", "#.#.", ".##."]).unwrap();
        let maze = ChessMaze::new(&layout)
            .unwrap()
            .with_endpoints((0, 0), (0, 2))
            .unwrap();
        assert_eq!(solve_path(&maze).unwrap().to_string(), "SE : NE");
    }

    #[test]
    fn test_key_keeps_piece() {
        let layout = MazeLayout::from_char_lines(&["B.Q.", "..#.", "R..K", "..N."]).unwrap();
        let maze = ChessMaze::new(&layout).unwrap();
        let pruned = solve(&maze).goal().map(|goal| goal.depth());
        let identity = solve(&IdentityKey(maze.clone()))
            .goal()
            .map(|goal| goal.depth());
        assert!(pruned.is_some());
        assert_eq!(pruned, identity);
    }

    #[test]
    fn test_rejects_bad_layouts() {
        let layout = MazeLayout::from_char_lines(&["..", ".K"]).unwrap();
        assert_eq!(
            ChessMaze::new(&layout).unwrap_err(),
            MazeError::MissingPiece((0, 0))
        );

        let layout = MazeLayout::from_char_lines(&["KP", ".."]).unwrap();
        assert!(matches!(
            ChessMaze::new(&layout),
            Err(MazeError::UnknownToken { .. })
        ));
    }
}
