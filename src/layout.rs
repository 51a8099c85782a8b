use crate::error::MazeError;
use crate::grid::{Cell, Dims};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tile {
    token: String,
    weight: usize,
    property: Option<String>,
}

impl Tile {
    /// Splits `token[:property]`.
    fn parse(raw: &str) -> Self {
        let (token, property) = match raw.split_once(':') {
            Some((token, property)) => (token, Some(property.to_string())),
            None => (raw, None),
        };
        Tile {
            token: token.to_string(),
            weight: token.parse().unwrap_or(0),
            property,
        }
    }
}

/// Immutable grid of tokens shared by every policy built on it.
#[derive(Debug, Clone)]
pub struct MazeLayout {
    dims: Dims,
    grid: Vec<Vec<Tile>>,
}

impl MazeLayout {
    pub fn new<S: AsRef<str>>(rows: &[Vec<S>]) -> Result<Self, MazeError> {
        let width = rows.first().map_or(0, |row| row.len());
        if width == 0 {
            return Err(MazeError::EmptyLayout);
        }

        let mut grid = Vec::with_capacity(rows.len());
        for (index, row) in rows.iter().enumerate() {
            if row.len() != width {
                return Err(MazeError::RaggedRow {
                    row: index,
                    expected: width,
                    found: row.len(),
                });
            }
            grid.push(row.iter().map(|raw| Tile::parse(raw.as_ref())).collect());
        }

        Ok(MazeLayout {
            dims: Dims::new(grid.len(), width),
            grid,
        })
    }

    /// One line per row, tokens separated by whitespace: `"3 2 4:C"`.
    pub fn from_token_lines<S: AsRef<str>>(lines: &[S]) -> Result<Self, MazeError> {
        let rows: Vec<Vec<&str>> = lines
            .iter()
            .map(|line| line.as_ref().split_whitespace().collect())
            .collect();
        Self::new(&rows)
    }

    /// One line per row, one token per character: `"S.#T"`.
    pub fn from_char_lines<S: AsRef<str>>(lines: &[S]) -> Result<Self, MazeError> {
        let rows: Vec<Vec<String>> = lines
            .iter()
            .map(|line| line.as_ref().trim().chars().map(String::from).collect())
            .collect();
        Self::new(&rows)
    }

    pub fn dimensions(&self) -> (usize, usize) {
        (self.dims.rows, self.dims.cols)
    }

    pub fn dims(&self) -> Dims {
        self.dims
    }

    pub fn raw_token(&self, row: usize, col: usize) -> &str {
        &self.grid[row][col].token
    }

    /// Numeric value of the token, 0 when it is not a number.
    pub fn weight(&self, row: usize, col: usize) -> usize {
        self.grid[row][col].weight
    }

    pub fn property(&self, row: usize, col: usize) -> Option<&str> {
        self.grid[row][col].property.as_deref()
    }

    pub fn token_at(&self, (row, col): Cell) -> &str {
        self.raw_token(row, col)
    }

    /// First cell in row-major order carrying `token`.
    pub fn find(&self, token: &str) -> Option<Cell> {
        self.dims.cells().find(|&cell| self.token_at(cell) == token)
    }
}
