//! Path reconstruction from back-links.
//!
//! Backtracks from a destination arena index to the originating access arrival through
//! `Predecessor` links, walking the arena-indexed back-links
//! `state::multicriteria::MultiCriteriaState` produces.

use itertools::Itertools;

use crate::model::StopIndex;
use crate::state::multicriteria::{Arrival, MultiCriteriaState};
use crate::time::Time;

/// One leg of a reconstructed journey. Transit and transfer legs both narrow to `(from, to,
/// departure, arrival)`; access/egress legs carry a synthetic trip reference of `None`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PathLeg {
    pub from_stop: StopIndex,
    pub to_stop: StopIndex,
    pub departure_time: Time,
    pub arrival_time: Time,
    pub is_transit: bool,
}

/// A complete, freshly allocated journey. Holds no references into worker state that is reused
/// across iterations.
#[derive(Debug, Clone, PartialEq)]
pub struct Path {
    pub legs: Vec<PathLeg>,
    pub departure_time: Time,
    pub arrival_time: Time,
    pub cost: f64,
    pub transfers: usize,
}

impl Path {
    pub fn duration(&self) -> Time {
        self.arrival_time - self.departure_time
    }

    /// Checks that every leg hands off to the next at the same stop.
    pub fn legs_are_adjacent(&self) -> bool {
        self.legs.iter().tuple_windows().all(|(a, b)| a.to_stop == b.from_stop)
    }
}

/// Walks `state`'s back-link arena from `destination_arena_index` to the originating access
/// arrival and assembles a [`Path`].
///
/// Returns `None` only if the arena index names an arrival with no predecessor chain reaching an
/// access leg (an internal inconsistency — well-formed worker output never produces one).
pub fn reconstruct_path(state: &MultiCriteriaState, destination_arena_index: usize) -> Option<Path> {
    let chain = state.predecessor_chain(destination_arena_index);
    let access = chain.first()?;
    let destination = chain.last()?;

    let mut legs = Vec::with_capacity(chain.len().saturating_sub(1));
    let mut n_transits = 0usize;
    for pair in chain.windows(2) {
        let (from, to): (&Arrival, &Arrival) = (&pair[0], &pair[1]);
        legs.push(PathLeg {
            from_stop: from.stop,
            to_stop: to.stop,
            departure_time: from.arrival_time,
            arrival_time: to.arrival_time,
            is_transit: to.arrived_by_transit,
        });
        if to.arrived_by_transit {
            n_transits += 1;
        }
    }
    // The round bound counts transfers between rides, not the first boarding itself.
    let transfers = n_transits.saturating_sub(1);

    Some(Path {
        legs,
        departure_time: access.arrival_time,
        arrival_time: destination.arrival_time,
        cost: destination.cost,
        transfers,
    })
}

/// Reconstructs every path reachable in `state`'s destination pareto front.
pub fn reconstruct_all(state: &MultiCriteriaState) -> Vec<Path> {
    let indices: Vec<usize> = state.destination_arrivals().map(|a| a.self_index).collect();
    indices
        .into_iter()
        .filter_map(|idx| reconstruct_path(state, idx))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::CostFactors;
    use crate::time::{Direction, TransitCalculator};

    fn calc() -> TransitCalculator {
        TransitCalculator::new(Direction::Forward, 60, 86_400)
    }

    #[test]
    fn reconstructs_access_transit_egress_path() {
        let mut state = MultiCriteriaState::new(3, CostFactors::default(), calc());
        let access = state.offer(0, 28_800, 0.0, 0, false, None).unwrap();
        let transit = state.offer(1, 29_500, 300.0, 1, true, Some(access)).unwrap();
        let destination = state
            .offer_destination(29_560, 300.0, 1, true, Some(transit))
            .unwrap();

        let path = reconstruct_path(&state, destination).unwrap();
        assert_eq!(path.legs.len(), 2);
        assert_eq!(path.departure_time, 28_800);
        assert_eq!(path.arrival_time, 29_560);
        assert_eq!(path.legs[0].from_stop, 0);
        assert_eq!(path.legs[1].to_stop, usize::MAX);
    }

    #[test]
    fn path_time_arithmetic_is_self_consistent() {
        let mut state = MultiCriteriaState::new(2, CostFactors::default(), calc());
        let access = state.offer(0, 0, 0.0, 0, false, None).unwrap();
        let destination = state.offer_destination(600, 100.0, 0, false, Some(access)).unwrap();
        let path = reconstruct_path(&state, destination).unwrap();
        assert_eq!(path.duration(), path.arrival_time - path.departure_time);
        for leg in &path.legs {
            assert!(leg.arrival_time >= leg.departure_time);
        }
        assert!(path.legs_are_adjacent());
    }
}
