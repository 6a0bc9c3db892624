//! Multi-criteria stop-arrival state.
//!
//! Each stop holds a [`crate::pareto::ParetoSet`] over `(round, arrival_time, cost)`, tie-broken
//! by `arrived_by_transit`. Accepted arrivals are additionally appended to an append-only arena so
//! that back-links survive eviction from a stop's *live* pareto view — path reconstruction walks
//! the arena, not the live sets.

use std::cmp::Ordering;

use crate::model::StopIndex;
use crate::pareto::{Dominance, ParetoSet};
use crate::time::{Time, TransitCalculator};

/// Weights for the generalised cost formula.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CostFactors {
    pub board_cost_per_transit: f64,
    pub walk_reluctance: f64,
    pub wait_reluctance: f64,
}

impl Default for CostFactors {
    fn default() -> Self {
        Self {
            board_cost_per_transit: 300.0,
            walk_reluctance: 4.0,
            wait_reluctance: 1.0,
        }
    }
}

impl CostFactors {
    pub fn cost(&self, n_transits: u32, walk_time: Time, wait_time: Time, in_vehicle_time: Time) -> f64 {
        self.board_cost_per_transit * n_transits as f64
            + self.walk_reluctance * walk_time as f64
            + self.wait_reluctance * wait_time as f64
            + in_vehicle_time as f64
    }
}

/// One element of a multi-criteria arrival set. `self_index`/`predecessor` are arena indices, not
/// owning references.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Arrival {
    pub stop: StopIndex,
    pub arrival_time: Time,
    pub cost: f64,
    pub round: usize,
    pub arrived_by_transit: bool,
    pub predecessor: Option<usize>,
    pub self_index: usize,
}

struct ArrivalDominance {
    calc: TransitCalculator,
}

impl Dominance<Arrival> for ArrivalDominance {
    fn compare(&self, a: &Arrival, b: &Arrival) -> Vec<Ordering> {
        let round_ord = a.round.cmp(&b.round);
        let time_ord = if self.calc.is_best(a.arrival_time, b.arrival_time) {
            Ordering::Less
        } else if self.calc.is_best(b.arrival_time, a.arrival_time) {
            Ordering::Greater
        } else {
            Ordering::Equal
        };
        let cost_ord = a.cost.partial_cmp(&b.cost).unwrap_or(Ordering::Equal);
        // Tie-break: an arrival reached by transit is preferred over one reached by transfer at
        // equal round/time/cost, since it is further-relaxable (can immediately board onward).
        let transit_ord = match (a.arrived_by_transit, b.arrived_by_transit) {
            (true, false) => Ordering::Less,
            (false, true) => Ordering::Greater,
            _ => Ordering::Equal,
        };
        vec![round_ord, time_ord, cost_ord, transit_ord]
    }
}

pub struct MultiCriteriaState {
    arena: Vec<Arrival>,
    per_stop: Vec<ParetoSet<Arrival, ArrivalDominance>>,
    destination: ParetoSet<Arrival, ArrivalDominance>,
    cost_factors: CostFactors,
}

impl MultiCriteriaState {
    pub fn new(num_stops: usize, cost_factors: CostFactors, calc: TransitCalculator) -> Self {
        Self {
            arena: Vec::new(),
            per_stop: (0..num_stops).map(|_| ParetoSet::new(ArrivalDominance { calc })).collect(),
            destination: ParetoSet::new(ArrivalDominance { calc }),
            cost_factors,
        }
    }

    pub fn cost_factors(&self) -> CostFactors {
        self.cost_factors
    }

    /// Offers an arrival at `stop`. Returns the arena index of the accepted arrival, or `None` if
    /// it was dominated or an exact duplicate of a live arrival at that stop.
    pub fn offer(
        &mut self,
        stop: StopIndex,
        arrival_time: Time,
        cost: f64,
        round: usize,
        arrived_by_transit: bool,
        predecessor: Option<usize>,
    ) -> Option<usize> {
        let candidate = Arrival {
            stop,
            arrival_time,
            cost,
            round,
            arrived_by_transit,
            predecessor,
            self_index: 0,
        };
        let set = &mut self.per_stop[stop];
        if !set.qualify(&candidate) {
            return None;
        }
        let self_index = self.arena.len();
        let stamped = Arrival { self_index, ..candidate };
        self.arena.push(stamped);
        let inserted = set.add(stamped);
        debug_assert!(inserted);
        Some(self_index)
    }

    /// Offers a candidate destination arrival (an accepted stop arrival plus an egress leg).
    /// Returns the arena index of the accepted destination arrival, if any.
    pub fn offer_destination(
        &mut self,
        arrival_time: Time,
        cost: f64,
        round: usize,
        arrived_by_transit: bool,
        predecessor: Option<usize>,
    ) -> Option<usize> {
        let candidate = Arrival {
            stop: usize::MAX,
            arrival_time,
            cost,
            round,
            arrived_by_transit,
            predecessor,
            self_index: 0,
        };
        if !self.destination.qualify(&candidate) {
            return None;
        }
        let self_index = self.arena.len();
        let stamped = Arrival { self_index, ..candidate };
        self.arena.push(stamped);
        let inserted = self.destination.add(stamped);
        debug_assert!(inserted);
        Some(self_index)
    }

    pub fn arrivals_at(&self, stop: StopIndex) -> impl Iterator<Item = &Arrival> {
        self.per_stop[stop].iter()
    }

    pub fn mark_round_cursor(&self, stop: StopIndex) -> usize {
        self.per_stop[stop].mark_at_end()
    }

    pub fn arrivals_since(&self, stop: StopIndex, marker: usize) -> &[Arrival] {
        self.per_stop[stop].stream_after_marker(marker)
    }

    pub fn destination_arrivals(&self) -> impl Iterator<Item = &Arrival> {
        self.destination.iter()
    }

    pub fn get(&self, arena_index: usize) -> &Arrival {
        &self.arena[arena_index]
    }

    /// Walks back-links from `arena_index` to the originating access arrival, earliest leg first.
    pub fn predecessor_chain(&self, arena_index: usize) -> Vec<&Arrival> {
        let mut chain = Vec::new();
        let mut cursor = Some(arena_index);
        while let Some(idx) = cursor {
            let arrival = &self.arena[idx];
            chain.push(arrival);
            cursor = arrival.predecessor;
        }
        chain.reverse();
        chain
    }
}
