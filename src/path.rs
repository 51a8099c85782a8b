use serde::Serialize;
use std::fmt;

use crate::grid::Dims;
use crate::policy::{Policy, StateRef};
use crate::state::{Move, Payload, SearchState};

/// Moves from the start state to a terminal state, with the cell numbers
/// (1-based, row-major) visited on the way.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Path {
    pub moves: Vec<Move>,
    /// Empty for payloads without a single position, such as marble sets.
    pub cells: Vec<usize>,
}

impl Path {
    pub fn from_state<P: Payload>(state: &SearchState<P>, dims: Dims) -> Self {
        let mut moves = Vec::with_capacity(state.depth());
        let mut cells = Vec::with_capacity(state.depth() + 1);

        let mut current = Some(state);
        while let Some(node) = current {
            if let Some(previous_move) = node.previous_move() {
                moves.push(*previous_move);
            }
            if let Some(cell) = node.payload().cell() {
                cells.push(dims.cell_number(cell));
            }
            current = node.previous_state().map(|parent| parent.as_ref());
        }

        moves.reverse();
        cells.reverse();
        Path { moves, cells }
    }

    pub fn len(&self) -> usize {
        self.moves.len()
    }

    pub fn is_empty(&self) -> bool {
        self.moves.is_empty()
    }

    pub fn codes(&self) -> Vec<&'static str> {
        self.moves.iter().map(|mv| mv.code.code()).collect()
    }

    /// Codes without separators, e.g. `"NESW"`.
    pub fn compact(&self) -> String {
        self.codes().concat()
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.codes().join(" : "))
    }
}

/// Applies `moves` to a fresh start state using only the policy's own
/// successor rule. Returns `None` as soon as a move is not available.
pub fn replay<P: Policy>(policy: &P, moves: &[Move]) -> Option<StateRef<P::Payload>> {
    let mut current = policy.start();
    for mv in moves {
        let next = policy
            .successors(&current)
            .find(|candidate| {
                candidate.previous_move() == Some(mv) && policy.edge_filter(&current, candidate)
            })?;
        current = next;
    }
    Some(current)
}
