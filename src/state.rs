use serde::Serialize;
use std::fmt::Debug;
use std::rc::Rc;

use crate::grid::Cell;
use crate::movement::{Direction, MoveType};

/// One recorded move. `distance` is `None` for moves without a length,
/// such as a marble tilt or a block roll.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Move {
    pub code: Direction,
    pub distance: Option<usize>,
}

impl Move {
    pub fn new(code: Direction, distance: usize) -> Self {
        Move {
            code,
            distance: Some(distance),
        }
    }

    pub fn unit(code: Direction) -> Self {
        Move {
            code,
            distance: None,
        }
    }

    pub fn move_type(&self) -> Option<MoveType> {
        self.code.move_type()
    }

    pub fn flipped_type(&self) -> Option<MoveType> {
        self.move_type().map(MoveType::flip)
    }
}

/// Variant specific position data carried by a search state.
pub trait Payload: Clone + Debug {
    /// The single cell this payload stands on, when there is one.
    fn cell(&self) -> Option<Cell> {
        None
    }
}

impl Payload for Cell {
    fn cell(&self) -> Option<Cell> {
        Some(*self)
    }
}

/// Node of the persistent search tree.
///
/// Parents are always built before their children, so the `Rc` links only
/// ever point backwards.
#[derive(Debug)]
pub struct SearchState<P> {
    payload: P,
    previous_move: Option<Move>,
    previous_state: Option<Rc<SearchState<P>>>,
    depth: usize,
}

impl<P> SearchState<P> {
    pub fn root(payload: P) -> Rc<Self> {
        Rc::new(SearchState {
            payload,
            previous_move: None,
            previous_state: None,
            depth: 0,
        })
    }

    pub fn child(parent: &Rc<Self>, previous_move: Move, payload: P) -> Rc<Self> {
        Rc::new(SearchState {
            payload,
            previous_move: Some(previous_move),
            previous_state: Some(Rc::clone(parent)),
            depth: parent.depth + 1,
        })
    }

    pub fn payload(&self) -> &P {
        &self.payload
    }

    pub fn previous_move(&self) -> Option<&Move> {
        self.previous_move.as_ref()
    }

    pub fn previous_state(&self) -> Option<&Rc<SearchState<P>>> {
        self.previous_state.as_ref()
    }

    /// Number of moves from the start state.
    pub fn depth(&self) -> usize {
        self.depth
    }

    pub fn is_start(&self) -> bool {
        self.previous_state.is_none()
    }

    pub fn is_goal(&self, predicate: impl FnOnce(&P) -> bool) -> bool {
        predicate(&self.payload)
    }
}
