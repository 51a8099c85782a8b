use std::collections::HashSet;

use crate::error::MazeError;
use crate::movement::Direction;

/// A grid position as `(row, col)`.
pub type Cell = (usize, usize);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Dims {
    pub rows: usize,
    pub cols: usize,
}

impl Dims {
    pub fn new(rows: usize, cols: usize) -> Self {
        Dims { rows, cols }
    }

    pub fn contains(&self, (row, col): Cell) -> bool {
        row < self.rows && col < self.cols
    }

    /// Moves `distance` steps along `delta`, or `None` when that leaves the grid.
    pub fn offset(
        &self,
        (row, col): Cell,
        (dr, dc): (isize, isize),
        distance: usize,
    ) -> Option<Cell> {
        let distance = isize::try_from(distance).ok()?;
        let row = row.checked_add_signed(dr.checked_mul(distance)?)?;
        let col = col.checked_add_signed(dc.checked_mul(distance)?)?;
        self.contains((row, col)).then_some((row, col))
    }

    /// 1-based, row-major.
    pub fn cell_number(&self, (row, col): Cell) -> usize {
        row * self.cols + col + 1
    }

    pub fn cell_from_number(&self, number: usize) -> Result<Cell, MazeError> {
        let size = self.rows.checked_mul(self.cols).unwrap_or(0);
        if number == 0 || number > size {
            return Err(MazeError::CellNumber {
                number,
                rows: self.rows,
                cols: self.cols,
            });
        }
        let index = number - 1;
        Ok((index / self.cols, index % self.cols))
    }

    pub fn check(&self, cell: Cell) -> Result<Cell, MazeError> {
        if self.contains(cell) {
            Ok(cell)
        } else {
            Err(MazeError::OutOfBounds {
                cell,
                rows: self.rows,
                cols: self.cols,
            })
        }
    }

    /// Every cell in row-major order.
    pub fn cells(&self) -> impl Iterator<Item = Cell> {
        let cols = self.cols;
        (0..self.rows).flat_map(move |row| (0..cols).map(move |col| (row, col)))
    }
}

/// Walls between orthogonally adjacent cells. Blocking is symmetric.
#[derive(Debug, Clone, Default)]
pub struct Walls {
    blocked: HashSet<(Cell, Cell)>,
}

impl Walls {
    /// Parses tokens such as `"7:ES"`: walls on the east and south sides of cell 7.
    pub fn from_tokens<S: AsRef<str>>(dims: Dims, tokens: &[S]) -> Result<Self, MazeError> {
        let mut walls = Walls::default();
        for token in tokens {
            let token = token.as_ref();
            let (number, sides) = token
                .split_once(':')
                .ok_or_else(|| MazeError::InvalidWall(token.to_string()))?;
            let number = number
                .trim()
                .parse::<usize>()
                .map_err(|_| MazeError::InvalidWall(token.to_string()))?;
            let cell = dims.cell_from_number(number)?;
            for side in sides.trim().chars() {
                let direction = match side {
                    'N' => Direction::N,
                    'S' => Direction::S,
                    'E' => Direction::E,
                    'W' => Direction::W,
                    _ => return Err(MazeError::InvalidWall(token.to_string())),
                };
                // A wall on the outer boundary is harmless: the grid edge already blocks.
                if let Some(neighbour) = dims.offset(cell, direction.delta(), 1) {
                    walls.insert(cell, neighbour);
                }
            }
        }
        Ok(walls)
    }

    pub fn insert(&mut self, a: Cell, b: Cell) {
        self.blocked.insert((a, b));
        self.blocked.insert((b, a));
    }

    pub fn blocks(&self, from: Cell, to: Cell) -> bool {
        self.blocked.contains(&(from, to))
    }
}
