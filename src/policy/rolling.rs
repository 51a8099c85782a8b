//! A 2x1x1 block rolled over the grid, tipping over one of its bottom edges.

use super::labyrinth::{BLOCKED_TOKEN, START_TOKEN, TARGET_TOKEN};
use super::{Policy, StateRef};
use crate::error::MazeError;
use crate::grid::{Cell, Dims};
use crate::layout::MazeLayout;
use crate::movement::Direction;
use crate::state::{Move, Payload, SearchState};

/// `(row, col, layer)`; layer 1 is the upper half of a standing block.
pub type Cube = (usize, usize, usize);

type Shift = (isize, isize, isize);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Orientation {
    Vertical,
    /// Lying along a row, first cube to the west.
    EastWest,
    /// Lying along a column, first cube to the north.
    NorthSouth,
}

/// The two unit cubes of the block. The pair is ordered: bottom cube first
/// when standing, otherwise the west or north cube first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Block([Cube; 2]);

impl Block {
    pub fn standing((row, col): Cell) -> Self {
        Block([(row, col, 0), (row, col, 1)])
    }

    pub fn cubes(&self) -> [Cube; 2] {
        self.0
    }

    /// Grid cells under the block. Both are the same cell when standing.
    pub fn cells(&self) -> [Cell; 2] {
        self.0.map(|(row, col, _)| (row, col))
    }

    pub fn orientation(&self) -> Orientation {
        let [(r1, c1, z1), (r2, c2, z2)] = self.0;
        if (r1, c1) == (r2, c2) {
            assert_eq!((z1, z2), (0, 1), "standing block {self:?} has bad layers");
            Orientation::Vertical
        } else if r1 == r2 {
            assert!(z1 == 0 && z2 == 0 && c1 + 1 == c2, "malformed lying block {self:?}");
            Orientation::EastWest
        } else {
            assert!(
                c1 == c2 && z1 == 0 && z2 == 0 && r1 + 1 == r2,
                "malformed lying block {self:?}"
            );
            Orientation::NorthSouth
        }
    }

    fn shifts(orientation: Orientation, direction: Direction) -> [Shift; 2] {
        use Direction::*;
        use Orientation::*;

        match (orientation, direction) {
            (Vertical, N) => [(-2, 0, 0), (-1, 0, -1)],
            (Vertical, S) => [(1, 0, 0), (2, 0, -1)],
            (Vertical, E) => [(0, 1, 0), (0, 2, -1)],
            (Vertical, W) => [(0, -2, 0), (0, -1, -1)],

            (EastWest, N) => [(-1, 0, 0), (-1, 0, 0)],
            (EastWest, S) => [(1, 0, 0), (1, 0, 0)],
            (EastWest, E) => [(0, 2, 0), (0, 1, 1)],
            (EastWest, W) => [(0, -1, 0), (0, -2, 1)],

            (NorthSouth, E) => [(0, 1, 0), (0, 1, 0)],
            (NorthSouth, W) => [(0, -1, 0), (0, -1, 0)],
            (NorthSouth, N) => [(-1, 0, 0), (-2, 0, 1)],
            (NorthSouth, S) => [(2, 0, 0), (1, 0, 1)],

            _ => panic!("no roll {direction} for a block lying {orientation:?}"),
        }
    }

    /// The block after tipping towards `direction`, if it stays on the grid.
    pub fn roll(&self, direction: Direction, dims: Dims) -> Option<Block> {
        let shifts = Self::shifts(self.orientation(), direction);
        let mut cubes = self.0;
        for (cube, (dr, dc, dz)) in cubes.iter_mut().zip(shifts) {
            let (row, col, layer) = *cube;
            *cube = (
                row.checked_add_signed(dr)?,
                col.checked_add_signed(dc)?,
                layer.checked_add_signed(dz)?,
            );
            if !dims.contains((cube.0, cube.1)) {
                return None;
            }
        }
        Some(Block(cubes))
    }
}

impl Payload for Block {}

#[derive(Debug, Clone)]
pub struct RollingBlockMaze<'a> {
    layout: &'a MazeLayout,
    start: Cell,
    target: Cell,
    color_matching: bool,
}

impl<'a> RollingBlockMaze<'a> {
    /// Start and target are the `S` and `T` cells of the layout.
    pub fn new(layout: &'a MazeLayout) -> Result<Self, MazeError> {
        Self::with_endpoints(layout, None, None)
    }

    /// Endpoints given as cell numbers, for layouts of colour tokens. An
    /// endpoint left out falls back to its `S` or `T` cell.
    pub fn with_endpoints(
        layout: &'a MazeLayout,
        start: Option<usize>,
        target: Option<usize>,
    ) -> Result<Self, MazeError> {
        Ok(RollingBlockMaze {
            layout,
            start: endpoint(layout, start, START_TOKEN, "start")?,
            target: endpoint(layout, target, TARGET_TOKEN, "target")?,
            color_matching: false,
        })
    }

    /// Both halves of a lying block must rest on the same token.
    pub fn with_color_matching(mut self) -> Self {
        self.color_matching = true;
        self
    }

    fn is_open(&self, cell: Cell) -> bool {
        self.layout.token_at(cell) != BLOCKED_TOKEN
    }
}

fn endpoint(
    layout: &MazeLayout,
    number: Option<usize>,
    token: &str,
    name: &'static str,
) -> Result<Cell, MazeError> {
    match number {
        Some(number) => layout.dims().cell_from_number(number),
        None => layout.find(token).ok_or(MazeError::MissingCell(name)),
    }
}

impl Policy for RollingBlockMaze<'_> {
    type Payload = Block;
    type Key = Block;

    fn dims(&self) -> Dims {
        self.layout.dims()
    }

    fn start(&self) -> StateRef<Block> {
        SearchState::root(Block::standing(self.start))
    }

    fn successors<'s>(
        &'s self,
        state: &'s StateRef<Block>,
    ) -> impl Iterator<Item = StateRef<Block>> + 's {
        let dims = self.dims();
        Direction::ORTHOGONAL.into_iter().filter_map(move |direction| {
            let block = state.payload().roll(direction, dims)?;
            block
                .cells()
                .iter()
                .all(|&cell| self.is_open(cell))
                .then(|| SearchState::child(state, Move::unit(direction), block))
        })
    }

    fn equivalence_key(&self, state: &SearchState<Block>) -> Block {
        *state.payload()
    }

    fn is_goal(&self, state: &SearchState<Block>) -> bool {
        state.is_goal(|block| block.cells() == [self.target; 2])
    }

    fn edge_filter(&self, _from: &SearchState<Block>, candidate: &SearchState<Block>) -> bool {
        if !self.color_matching {
            return true;
        }
        let [first, second] = candidate.payload().cells();
        self.layout.token_at(first) == self.layout.token_at(second)
    }
}
