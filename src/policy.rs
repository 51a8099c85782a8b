//! The contract between the BFS engine and a maze family, plus one policy
//! per family.

pub mod arrow;
pub mod calculation;
pub mod chess;
pub mod jumping;
pub mod labyrinth;
pub mod life;
pub mod marble;
pub mod rolling;

use std::fmt::Debug;
use std::hash::Hash;
use std::rc::Rc;

use crate::grid::Dims;
use crate::state::{Move, Payload, SearchState};

pub type StateRef<P> = Rc<SearchState<P>>;

/// Rules of one puzzle family.
///
/// A policy never mutates itself while searching: successor generation is a
/// pure function of the state (its payload and the move that produced it).
pub trait Policy {
    type Payload: Payload;
    type Key: Eq + Hash + Debug;

    /// Grid used to number the cells of a reconstructed path.
    fn dims(&self) -> Dims;

    fn start(&self) -> StateRef<Self::Payload>;

    /// Lazily yields every legal successor, each linked to `state`.
    fn successors<'a>(
        &'a self,
        state: &'a StateRef<Self::Payload>,
    ) -> impl Iterator<Item = StateRef<Self::Payload>> + 'a;

    /// Visited-set key. States sharing a key must reach the same goals.
    fn equivalence_key(&self, state: &SearchState<Self::Payload>) -> Self::Key;

    fn is_goal(&self, state: &SearchState<Self::Payload>) -> bool;

    /// True when a bound internal to the policy held back a move from
    /// `state`. An exhausted search is then reported as truncated.
    fn drops_successors(&self, _state: &SearchState<Self::Payload>) -> bool {
        false
    }

    /// Extra admissibility check run on each candidate before it is queued.
    fn edge_filter(
        &self,
        _from: &SearchState<Self::Payload>,
        _candidate: &SearchState<Self::Payload>,
    ) -> bool {
        true
    }
}

/// Runs a policy with the finest possible key: the payload together with the
/// arriving move. Every policy's successors depend on nothing else, so this
/// never merges states that behave differently.
#[derive(Debug, Clone)]
pub struct IdentityKey<P>(pub P);

impl<P> Policy for IdentityKey<P>
where
    P: Policy,
    P::Payload: Eq + Hash,
{
    type Payload = P::Payload;
    type Key = (P::Payload, Option<Move>);

    fn dims(&self) -> Dims {
        self.0.dims()
    }

    fn start(&self) -> StateRef<Self::Payload> {
        self.0.start()
    }

    fn successors<'a>(
        &'a self,
        state: &'a StateRef<Self::Payload>,
    ) -> impl Iterator<Item = StateRef<Self::Payload>> + 'a {
        self.0.successors(state)
    }

    fn equivalence_key(&self, state: &SearchState<Self::Payload>) -> Self::Key {
        (state.payload().clone(), state.previous_move().copied())
    }

    fn is_goal(&self, state: &SearchState<Self::Payload>) -> bool {
        self.0.is_goal(state)
    }

    fn drops_successors(&self, state: &SearchState<Self::Payload>) -> bool {
        self.0.drops_successors(state)
    }

    fn edge_filter(
        &self,
        from: &SearchState<Self::Payload>,
        candidate: &SearchState<Self::Payload>,
    ) -> bool {
        self.0.edge_filter(from, candidate)
    }
}
