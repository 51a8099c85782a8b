use super::labyrinth::{BLOCKED_TOKEN, EMPTY_TOKEN, START_TOKEN, TARGET_TOKEN};
use super::{Policy, StateRef};
use crate::error::MazeError;
use crate::grid::{Cell, Dims};
use crate::layout::MazeLayout;
use crate::movement::Direction;
use crate::state::{Move, Payload, SearchState};

pub const DEFAULT_LIMIT: u64 = 10_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Operation {
    Keep,
    Blocked,
    Assign(i64),
    Add(i64),
    Subtract(i64),
    Multiply(i64),
}

impl Operation {
    fn parse(token: &str) -> Option<Operation> {
        match token {
            EMPTY_TOKEN | START_TOKEN | TARGET_TOKEN => return Some(Operation::Keep),
            BLOCKED_TOKEN => return Some(Operation::Blocked),
            _ => {}
        }

        let mut chars = token.chars();
        let symbol = chars.next()?;
        let operand = chars.as_str().parse::<i64>().ok()?;
        match symbol {
            '=' => Some(Operation::Assign(operand)),
            '+' => Some(Operation::Add(operand)),
            '-' => Some(Operation::Subtract(operand)),
            'x' | '*' | '×' => Some(Operation::Multiply(operand)),
            _ => None,
        }
    }

    /// `None` on overflow or for a blocked cell.
    fn apply(self, value: i64) -> Option<i64> {
        match self {
            Operation::Keep => Some(value),
            Operation::Blocked => None,
            Operation::Assign(operand) => Some(operand),
            Operation::Add(operand) => value.checked_add(operand),
            Operation::Subtract(operand) => value.checked_sub(operand),
            Operation::Multiply(operand) => value.checked_mul(operand),
        }
    }
}

/// What entering a neighbouring cell does to a tally.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Step {
    Enter(Tally),
    /// The new total would leave the allowed range.
    Capped,
    Illegal,
}

/// Position and running total.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Tally {
    pub cell: Cell,
    pub value: i64,
}

impl Payload for Tally {
    fn cell(&self) -> Option<Cell> {
        Some(self.cell)
    }
}

/// Step orthogonally between `S` and `T`; each cell entered updates the
/// running total. The goal is to stand on `T` with the required total.
///
/// Totals beyond `limit` in magnitude are not allowed, which keeps the
/// state space finite. A search that drops such a move ends as
/// [`Outcome::Truncated`](crate::engine::Outcome::Truncated) rather than
/// `Exhausted`, since a larger limit might still find a solution.
#[derive(Debug, Clone)]
pub struct CalculationMaze<'a> {
    layout: &'a MazeLayout,
    operations: Vec<Vec<Operation>>,
    start: Tally,
    target: Tally,
    limit: u64,
}

impl<'a> CalculationMaze<'a> {
    /// Uses [`DEFAULT_LIMIT`].
    pub fn new(
        layout: &'a MazeLayout,
        start_value: i64,
        target_value: i64,
    ) -> Result<Self, MazeError> {
        Self::bounded(layout, start_value, target_value, DEFAULT_LIMIT)
    }

    /// Totals must stay within `limit` in magnitude, the start total included.
    pub fn bounded(
        layout: &'a MazeLayout,
        start_value: i64,
        target_value: i64,
        limit: u64,
    ) -> Result<Self, MazeError> {
        let (rows, cols) = layout.dimensions();
        let mut operations = vec![Vec::with_capacity(cols); rows];
        for (row, col) in layout.dims().cells() {
            let token = layout.raw_token(row, col);
            let operation = Operation::parse(token).ok_or_else(|| MazeError::UnknownToken {
                token: token.to_string(),
                row,
                col,
            })?;
            operations[row].push(operation);
        }

        let start = layout.find(START_TOKEN).ok_or(MazeError::MissingCell("start"))?;
        let target = layout.find(TARGET_TOKEN).ok_or(MazeError::MissingCell("target"))?;
        CalculationMaze {
            layout,
            operations,
            start: Tally {
                cell: start,
                value: start_value,
            },
            target: Tally {
                cell: target,
                value: target_value,
            },
            limit,
        }
        .checked()
    }

    /// Replaces the limit. The start total must stay within it.
    pub fn with_limit(mut self, limit: u64) -> Result<Self, MazeError> {
        self.limit = limit;
        self.checked()
    }

    fn checked(self) -> Result<Self, MazeError> {
        if !self.within_limit(self.start.value) {
            return Err(MazeError::TotalOutOfRange {
                value: self.start.value,
                limit: self.limit,
            });
        }
        Ok(self)
    }

    fn within_limit(&self, value: i64) -> bool {
        value.unsigned_abs() <= self.limit
    }

    fn step(&self, tally: Tally, direction: Direction) -> Step {
        let Some(cell) = self.layout.dims().offset(tally.cell, direction.delta(), 1) else {
            return Step::Illegal;
        };
        let operation = self.operations[cell.0][cell.1];
        if operation == Operation::Blocked {
            return Step::Illegal;
        }
        match operation.apply(tally.value) {
            Some(value) if self.within_limit(value) => Step::Enter(Tally { cell, value }),
            _ => Step::Capped,
        }
    }
}

impl Policy for CalculationMaze<'_> {
    type Payload = Tally;
    type Key = Tally;

    fn dims(&self) -> Dims {
        self.layout.dims()
    }

    fn start(&self) -> StateRef<Tally> {
        SearchState::root(self.start)
    }

    fn successors<'s>(
        &'s self,
        state: &'s StateRef<Tally>,
    ) -> impl Iterator<Item = StateRef<Tally>> + 's {
        Direction::ORTHOGONAL
            .into_iter()
            .filter_map(move |direction| match self.step(*state.payload(), direction) {
                Step::Enter(tally) => Some(SearchState::child(state, Move::unit(direction), tally)),
                Step::Capped | Step::Illegal => None,
            })
    }

    fn drops_successors(&self, state: &SearchState<Tally>) -> bool {
        Direction::ORTHOGONAL
            .into_iter()
            .any(|direction| self.step(*state.payload(), direction) == Step::Capped)
    }

    fn equivalence_key(&self, state: &SearchState<Tally>) -> Tally {
        *state.payload()
    }

    fn is_goal(&self, state: &SearchState<Tally>) -> bool {
        state.is_goal(|tally| *tally == self.target)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::{solve, SearchStatus};
    use crate::path::Path;

    #[test]
    fn test_parse_operations() {
        assert_eq!(Operation::parse("=5"), Some(Operation::Assign(5)));
        assert_eq!(Operation::parse("+12"), Some(Operation::Add(12)));
        assert_eq!(Operation::parse("-3"), Some(Operation::Subtract(3)));
        assert_eq!(Operation::parse("x2"), Some(Operation::Multiply(2)));
        assert_eq!(Operation::parse("*2"), Some(Operation::Multiply(2)));
        assert_eq!(Operation::parse("×2"), Some(Operation::Multiply(2)));
        assert_eq!(Operation::parse("T"), Some(Operation::Keep));
        assert_eq!(Operation::parse("#"), Some(Operation::Blocked));
        assert_eq!(Operation::parse("/2"), None);
        assert_eq!(Operation::parse("+"), None);
    }

    #[test]
    fn test_running_total() {
        let layout = MazeLayout::from_token_lines(&["S +3 x2 T"]).unwrap();
        let maze = CalculationMaze::new(&layout, 0, 6).unwrap();
        let goal = solve(&maze).goal().cloned().unwrap();
        assert_eq!(goal.payload().value, 6);
        assert_eq!(Path::from_state(&goal, maze.dims()).to_string(), "E : E : E");

        // Reaching T with the wrong total is not enough.
        let maze = CalculationMaze::new(&layout, 0, 7).unwrap();
        assert!(!solve(&maze).is_found());
    }

    #[test]
    fn test_revisiting_cells() {
        let layout = MazeLayout::from_token_lines(&["S +1 T", "x3 -2 ."]).unwrap();
        let maze = CalculationMaze::new(&layout, 0, 3).unwrap();
        let outcome = solve(&maze);
        let path = Path::from_state(outcome.goal().unwrap(), maze.dims());
        assert_eq!(path.to_string(), "E : W : E : W : E : E");
        assert_eq!(path.cells, vec![1, 2, 1, 2, 1, 2, 3]);

        let maze = CalculationMaze::new(&layout, 0, 3)
            .unwrap()
            .with_limit(2)
            .unwrap();
        assert!(!solve(&maze).is_found());
    }

    #[test]
    fn test_assignment_and_blocks() {
        let layout = MazeLayout::from_token_lines(&["S +2 # T", "x3 . -1 =5"]).unwrap();
        let maze = CalculationMaze::new(&layout, 1, 5).unwrap();
        let outcome = solve(&maze);
        let path = Path::from_state(outcome.goal().unwrap(), maze.dims());
        assert_eq!(path.to_string(), "S : E : E : E : N");
        assert_eq!(path.cells, vec![1, 5, 6, 7, 8, 4]);

        let maze = CalculationMaze::new(&layout, 1, 7).unwrap();
        assert!(!solve(&maze).is_found());
    }

    #[test]
    fn test_unbounded_growth_is_capped() {
        let layout = MazeLayout::from_token_lines(&["S +5 T"]).unwrap();
        let maze = CalculationMaze::new(&layout, 0, 4).unwrap();
        assert_eq!(solve(&maze).status(), SearchStatus::Truncated);
    }

    #[test]
    fn test_closed_puzzle_is_exhausted() {
        // Totals only ever take the values 0, 2 and 4, so no move hits the cap.
        let layout = MazeLayout::from_token_lines(&["S =2 T", "# =4 #"]).unwrap();
        let maze = CalculationMaze::new(&layout, 0, 3).unwrap();
        assert_eq!(solve(&maze).status(), SearchStatus::Exhausted);
    }

    #[test]
    fn test_extreme_totals_do_not_overflow() {
        let layout = MazeLayout::from_token_lines(&["S =-9223372036854775808 T"]).unwrap();
        let maze = CalculationMaze::new(&layout, 0, 0).unwrap();
        assert_eq!(solve(&maze).status(), SearchStatus::Truncated);

        let maze = CalculationMaze::new(&layout, 0, i64::MIN)
            .unwrap()
            .with_limit(u64::MAX)
            .unwrap();
        let goal = solve(&maze).goal().cloned().unwrap();
        assert_eq!(goal.payload().value, i64::MIN);
        assert_eq!(goal.depth(), 2);

        let layout = MazeLayout::from_token_lines(&["S . T"]).unwrap();
        assert_eq!(
            CalculationMaze::new(&layout, i64::MIN, i64::MIN).unwrap_err(),
            MazeError::TotalOutOfRange {
                value: i64::MIN,
                limit: DEFAULT_LIMIT,
            }
        );
        let maze = CalculationMaze::bounded(&layout, i64::MIN, i64::MIN, u64::MAX).unwrap();
        assert_eq!(solve(&maze).goal().unwrap().depth(), 2);

        assert!(CalculationMaze::new(&layout, 5, 5)
            .unwrap()
            .with_limit(4)
            .is_err());
    }

    #[test]
    fn test_rejects_unknown_tokens() {
        let layout = MazeLayout::from_token_lines(&["S ?3 T"]).unwrap();
        assert_eq!(
            CalculationMaze::new(&layout, 0, 0).unwrap_err(),
            MazeError::UnknownToken {
                token: "?3".to_string(),
                row: 0,
                col: 1
            }
        );
    }
}
