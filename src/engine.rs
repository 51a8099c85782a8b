use serde::{Deserialize, Serialize};
use std::collections::{HashSet, VecDeque};
use std::time::Instant;
use tracing::{debug, instrument, trace};

use crate::policy::{Policy, StateRef};
use crate::stat::Stats;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchStatus {
    Ready,
    Running,
    Found,
    Exhausted,
    Truncated,
}

/// Optional budget for adversarial inputs. `None` means unbounded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchLimits {
    /// Stop after expanding this many states.
    pub max_nodes: Option<usize>,
    /// Do not expand states this many moves away from the start.
    pub max_depth: Option<usize>,
}

#[derive(Debug)]
pub enum Outcome<P> {
    Found(StateRef<P>),
    /// The whole reachable space was explored without meeting a goal.
    Exhausted,
    /// A budget in [`SearchLimits`], or a bound inside the policy, cut the
    /// search short.
    Truncated,
}

impl<P> Outcome<P> {
    pub fn goal(&self) -> Option<&StateRef<P>> {
        match self {
            Outcome::Found(state) => Some(state),
            _ => None,
        }
    }

    pub fn is_found(&self) -> bool {
        matches!(self, Outcome::Found(_))
    }

    pub fn status(&self) -> SearchStatus {
        match self {
            Outcome::Found(_) => SearchStatus::Found,
            Outcome::Exhausted => SearchStatus::Exhausted,
            Outcome::Truncated => SearchStatus::Truncated,
        }
    }
}

/// Unit-cost breadth-first search over the graph a [`Policy`] induces.
///
/// The frontier is FIFO, so the first goal dequeued is a fewest-moves goal.
/// Ties between equally short paths follow the policy's enumeration order.
pub struct BreadthFirstSearch<'p, P: Policy> {
    policy: &'p P,
    limits: SearchLimits,
    status: SearchStatus,
    frontier: VecDeque<StateRef<P::Payload>>,
    visited: HashSet<P::Key>,
    stats: Stats,
}

impl<'p, P: Policy> BreadthFirstSearch<'p, P> {
    pub fn new(policy: &'p P, limits: SearchLimits) -> Self {
        BreadthFirstSearch {
            policy,
            limits,
            status: SearchStatus::Ready,
            frontier: VecDeque::new(),
            visited: HashSet::new(),
            stats: Stats::default(),
        }
    }

    pub fn status(&self) -> SearchStatus {
        self.status
    }

    pub fn stats(&self) -> &Stats {
        &self.stats
    }

    /// Number of distinct equivalence keys seen so far.
    pub fn visited_len(&self) -> usize {
        self.visited.len()
    }

    #[instrument(skip_all, name = "bfs", level = "debug")]
    pub fn run(&mut self) -> Outcome<P::Payload> {
        let solve_start_time = Instant::now();
        let policy = self.policy;

        self.frontier.clear();
        self.visited.clear();
        self.stats = Stats::default();

        let start = policy.start();
        self.visited.insert(policy.equivalence_key(&start));
        self.frontier.push_back(start);
        self.status = SearchStatus::Running;

        // Set once the depth budget or the policy leaves part of the space
        // unexplored; an empty frontier then no longer proves there is no
        // solution.
        let mut cut = false;

        let outcome = loop {
            let Some(current) = self.frontier.pop_front() else {
                break if cut {
                    Outcome::Truncated
                } else {
                    Outcome::Exhausted
                };
            };

            if policy.is_goal(&current) {
                break Outcome::Found(current);
            }

            if self
                .limits
                .max_nodes
                .is_some_and(|max_nodes| self.stats.expanded_nodes >= max_nodes)
            {
                debug!("node budget {:?} exhausted", self.limits.max_nodes);
                break Outcome::Truncated;
            }

            if self
                .limits
                .max_depth
                .is_some_and(|max_depth| current.depth() >= max_depth)
            {
                cut = true;
                continue;
            }

            trace!("expand node: {:?}", current.payload());
            self.stats.expanded_nodes += 1;

            if !cut && policy.drops_successors(&current) {
                debug!("policy bound dropped a move from {:?}", current.payload());
                cut = true;
            }

            for candidate in policy.successors(&current) {
                self.stats.generated_nodes += 1;

                if !policy.edge_filter(&current, &candidate) {
                    self.stats.filtered_nodes += 1;
                    continue;
                }

                if self.visited.insert(policy.equivalence_key(&candidate)) {
                    self.frontier.push_back(candidate);
                } else {
                    self.stats.duplicate_nodes += 1;
                }
            }

            self.stats.max_frontier = self.stats.max_frontier.max(self.frontier.len());
        };

        self.status = outcome.status();
        self.stats.time_us = solve_start_time.elapsed().as_micros() as usize;
        debug!(
            "search {:?} after {} expansions, {} keys visited",
            self.status,
            self.stats.expanded_nodes,
            self.visited.len()
        );

        outcome
    }
}

/// Runs an unbounded search.
pub fn solve<P: Policy>(policy: &P) -> Outcome<P::Payload> {
    BreadthFirstSearch::new(policy, SearchLimits::default()).run()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::{Cell, Dims};
    use crate::movement::Direction;
    use crate::state::{Move, SearchState};

    /// Walk along a single row; the target is the last cell.
    struct Corridor {
        length: usize,
        blocked: Option<usize>,
        /// Report the block as a policy bound instead of a wall.
        bounded: bool,
    }

    impl Policy for Corridor {
        type Payload = Cell;
        type Key = Cell;

        fn dims(&self) -> Dims {
            Dims::new(1, self.length)
        }

        fn start(&self) -> StateRef<Cell> {
            SearchState::root((0, 0))
        }

        fn successors<'a>(
            &'a self,
            state: &'a StateRef<Cell>,
        ) -> impl Iterator<Item = StateRef<Cell>> + 'a {
            [Direction::W, Direction::E]
                .into_iter()
                .filter_map(move |direction| {
                    let next = self.dims().offset(*state.payload(), direction.delta(), 1)?;
                    (Some(next.1) != self.blocked)
                        .then(|| SearchState::child(state, Move::new(direction, 1), next))
                })
        }

        fn equivalence_key(&self, state: &SearchState<Cell>) -> Cell {
            *state.payload()
        }

        fn is_goal(&self, state: &SearchState<Cell>) -> bool {
            *state.payload() == (0, self.length - 1)
        }

        fn drops_successors(&self, state: &SearchState<Cell>) -> bool {
            self.bounded && self.blocked == Some(state.payload().1 + 1)
        }
    }

    #[test]
    fn test_status_moves_from_ready_to_found() {
        let policy = Corridor {
            length: 5,
            blocked: None,
            bounded: false,
        };
        let mut search = BreadthFirstSearch::new(&policy, SearchLimits::default());
        assert_eq!(search.status(), SearchStatus::Ready);

        let outcome = search.run();
        assert_eq!(search.status(), SearchStatus::Found);
        assert_eq!(outcome.goal().unwrap().depth(), 4);
        assert_eq!(search.stats().expanded_nodes, 4);
        assert_eq!(search.visited_len(), 5);
    }

    #[test]
    fn test_exhausted_when_goal_is_cut_off() {
        let policy = Corridor {
            length: 5,
            blocked: Some(3),
            bounded: false,
        };
        let mut search = BreadthFirstSearch::new(&policy, SearchLimits::default());
        let outcome = search.run();
        assert!(!outcome.is_found());
        assert_eq!(search.status(), SearchStatus::Exhausted);
    }

    #[test]
    fn test_policy_bound_truncates() {
        let policy = Corridor {
            length: 5,
            blocked: Some(3),
            bounded: true,
        };
        let mut search = BreadthFirstSearch::new(&policy, SearchLimits::default());
        let outcome = search.run();
        assert_eq!(outcome.status(), SearchStatus::Truncated);
        assert_eq!(search.status(), SearchStatus::Truncated);
        assert_eq!(search.stats().expanded_nodes, 3);
    }

    #[test]
    fn test_start_state_can_be_the_goal() {
        let policy = Corridor {
            length: 1,
            blocked: None,
            bounded: false,
        };
        let outcome = solve(&policy);
        assert_eq!(outcome.goal().unwrap().depth(), 0);
    }

    #[test]
    fn test_budgets_truncate() {
        let policy = Corridor {
            length: 10,
            blocked: None,
            bounded: false,
        };

        let limits = SearchLimits {
            max_nodes: Some(3),
            max_depth: None,
        };
        let outcome = BreadthFirstSearch::new(&policy, limits).run();
        assert_eq!(outcome.status(), SearchStatus::Truncated);

        let limits = SearchLimits {
            max_nodes: None,
            max_depth: Some(5),
        };
        let outcome = BreadthFirstSearch::new(&policy, limits).run();
        assert_eq!(outcome.status(), SearchStatus::Truncated);

        let limits = SearchLimits {
            max_nodes: None,
            max_depth: Some(9),
        };
        let outcome = BreadthFirstSearch::new(&policy, limits).run();
        assert_eq!(outcome.goal().unwrap().depth(), 9);
    }
}
