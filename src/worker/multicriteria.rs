//! Multi-criteria range-RAPTOR worker.
//!
//! Same outer per-minute/per-round shape as `worker::standard`, but the per-round input is the
//! set of arrivals a stop gained in the *previous* round rather than a scalar best time, tracked
//! via `pareto::ParetoSet::mark_at_end`/`stream_after_marker` cursors instead of a diffed `Vec`.

use std::collections::HashSet;

use fixedbitset::FixedBitSet;

use crate::data::TransitDataProvider;
use crate::error::{check_invariant, RaptorError};
use crate::model::StopIndex;
use crate::path::{self, Path};
use crate::state::multicriteria::{CostFactors, MultiCriteriaState};
use crate::time::{Direction, Time, TransitCalculator};
use crate::trip_search;
use crate::worker::request::{RaptorRequest, Tuning};

const DEFAULT_MAX_TRIP_DURATION_SECONDS: Time = 24 * 3_600;

/// Running per-criterion accumulators behind one accepted arrival. Kept alongside
/// [`MultiCriteriaState`] rather than inside `Arrival` itself — the state's `Arrival` only needs
/// the already-combined scalar `cost` for pareto comparison; a worker-local, arena-index-aligned
/// table recovers the components so a later round can keep accumulating them.
#[derive(Debug, Clone, Copy, Default)]
struct Totals {
    n_transits: u32,
    walk_time: Time,
    wait_time: Time,
    in_vehicle_time: Time,
}

/// A ride currently being carried forward along one pattern's stop sequence during a single
/// round's sweep.
struct Thread {
    trip_idx: usize,
    board_time: Time,
    /// Arena index of the arrival this thread boarded from — every alight offer produced by this
    /// thread links back to it directly (a multi-stop ride is one path leg).
    boarded_from: usize,
    totals: Totals,
}

pub struct MultiCriteriaWorker<'d, D> {
    data: &'d D,
    request: &'d RaptorRequest,
    tuning: Tuning,
    calc: TransitCalculator,
    cost_factors: CostFactors,
}

impl<'d, D: TransitDataProvider> MultiCriteriaWorker<'d, D> {
    pub fn new(data: &'d D, request: &'d RaptorRequest, tuning: Tuning) -> Self {
        let calc = TransitCalculator::new(
            Direction::Forward,
            request.board_slack_seconds,
            DEFAULT_MAX_TRIP_DURATION_SECONDS,
        );
        let cost_factors = request.multi_criteria_cost_factors.unwrap_or_default();
        Self { data, request, tuning, calc, cost_factors }
    }

    /// Runs every departure minute into a single, shared [`MultiCriteriaState`] (range-RAPTOR
    /// reuse: an earlier minute can only ever add to, never invalidate, an already-accepted
    /// arrival) and reconstructs the accumulated destination pareto front.
    pub fn run(&self) -> Result<Vec<Path>, RaptorError> {
        let minutes = self.calc.minutes(
            self.request.earliest_departure_time,
            self.request.latest_departure_time,
            self.request.iteration_departure_step_seconds,
        );
        let num_rounds = self.request.num_rounds(&self.tuning);
        let num_stops = self.data.num_stops();

        let mut state = MultiCriteriaState::new(num_stops, self.cost_factors, self.calc);
        let mut totals: Vec<Totals> = Vec::new();
        let mut origin_pattern: Vec<Option<usize>> = Vec::new();

        for &minute in &minutes {
            log::debug!("multi-criteria worker: departure minute {minute}");
            let pre_seed_markers: Vec<usize> = (0..num_stops).map(|s| state.mark_round_cursor(s)).collect();
            self.seed(&mut state, &mut totals, &mut origin_pattern, minute);
            self.run_rounds(&mut state, &mut totals, &mut origin_pattern, num_rounds, pre_seed_markers)?;
        }

        Ok(path::reconstruct_all(&state))
    }

    fn offer_stop(
        &self,
        state: &mut MultiCriteriaState,
        totals: &mut Vec<Totals>,
        origin_pattern: &mut Vec<Option<usize>>,
        stop: StopIndex,
        arrival_time: Time,
        round: usize,
        arrived_by_transit: bool,
        predecessor: Option<usize>,
        new_totals: Totals,
        producing_pattern: Option<usize>,
    ) -> Option<usize> {
        let cost = self.cost_factors.cost(
            new_totals.n_transits,
            new_totals.walk_time,
            new_totals.wait_time,
            new_totals.in_vehicle_time,
        );
        let idx = state.offer(stop, arrival_time, cost, round, arrived_by_transit, predecessor)?;
        debug_assert_eq!(idx, totals.len());
        totals.push(new_totals);
        origin_pattern.push(producing_pattern);
        Some(idx)
    }

    fn seed(
        &self,
        state: &mut MultiCriteriaState,
        totals: &mut Vec<Totals>,
        origin_pattern: &mut Vec<Option<usize>>,
        minute: Time,
    ) {
        for leg in &self.request.access_legs {
            let arrival = self.calc.add(minute, leg.duration_seconds);
            self.offer_stop(
                state,
                totals,
                origin_pattern,
                leg.stop,
                arrival,
                0,
                false,
                None,
                Totals { walk_time: leg.duration_seconds, ..Totals::default() },
                None,
            );
        }
    }

    fn run_rounds(
        &self,
        state: &mut MultiCriteriaState,
        totals: &mut Vec<Totals>,
        origin_pattern: &mut Vec<Option<usize>>,
        num_rounds: usize,
        mut markers: Vec<usize>,
    ) -> Result<(), RaptorError> {
        let num_stops = self.data.num_stops();
        self.offer_destinations(state, totals, &markers, 0)?;

        for round in 1..=num_rounds {
            let mut touched_patterns = FixedBitSet::with_capacity(self.data.num_patterns());
            let mut any_new = false;
            for stop in 0..num_stops {
                if !state.arrivals_since(stop, markers[stop]).is_empty() {
                    any_new = true;
                    for &p in self.data.patterns_for_stop(stop) {
                        touched_patterns.insert(p);
                    }
                }
            }
            if !any_new {
                break;
            }

            self.sweep_patterns(state, totals, origin_pattern, round, &touched_patterns, &markers)?;
            self.relax_transfers(state, totals, origin_pattern, round, &markers)?;

            let new_markers: Vec<usize> = (0..num_stops).map(|s| state.mark_round_cursor(s)).collect();
            self.offer_destinations(state, totals, &markers, round)?;
            markers = new_markers;
        }
        Ok(())
    }

    #[allow(clippy::too_many_arguments)]
    fn sweep_patterns(
        &self,
        state: &mut MultiCriteriaState,
        totals: &mut Vec<Totals>,
        origin_pattern: &mut Vec<Option<usize>>,
        round: usize,
        touched_patterns: &FixedBitSet,
        markers: &[usize],
    ) -> Result<(), RaptorError> {
        for pattern_idx in touched_patterns.ones() {
            if pattern_idx >= self.data.num_patterns() {
                return Err(RaptorError::InvalidPattern(pattern_idx));
            }
            let pattern = self.data.pattern(pattern_idx);
            let mut threads: Vec<Thread> = Vec::new();

            for (pos, &stop) in pattern.stops.iter().enumerate() {
                for thread in &threads {
                    let trip = &pattern.trips[thread.trip_idx];
                    let alight_time = self.calc.latest_arrival_time(trip.arrival_at(pos), trip.departure_at(pos));
                    check_invariant(!self.calc.is_best(alight_time, thread.board_time), || {
                        format!(
                            "pattern {pattern_idx} trip {}: alight time {alight_time} precedes board time {}",
                            thread.trip_idx, thread.board_time
                        )
                    })?;
                    if self.calc.exceeds_time_limit(alight_time - thread.board_time) {
                        continue;
                    }
                    let new_totals = Totals {
                        in_vehicle_time: thread.totals.in_vehicle_time + (alight_time - thread.board_time),
                        ..thread.totals
                    };
                    self.offer_stop(
                        state,
                        totals,
                        origin_pattern,
                        stop,
                        alight_time,
                        round,
                        true,
                        Some(thread.boarded_from),
                        new_totals,
                        Some(pattern_idx),
                    );
                }

                // Restrict to arrivals tagged with the previous round: `markers[stop]` is a
                // round-boundary snapshot taken before this round started, but this same loop may
                // already have appended this round's own alight offers at `stop` (from a pattern
                // swept earlier) — those must not be boarded against within the same round.
                let candidates: Vec<usize> = state
                    .arrivals_since(stop, markers[stop])
                    .iter()
                    .filter(|a| a.round + 1 == round)
                    .map(|a| a.self_index)
                    .collect();
                let mut boarded_trips: HashSet<usize> = threads.iter().map(|t| t.trip_idx).collect();

                for candidate_idx in candidates {
                    if origin_pattern[candidate_idx] == Some(pattern_idx) {
                        continue;
                    }
                    let candidate = *state.get(candidate_idx);
                    let earliest_board = self.calc.earliest_board_time(candidate.arrival_time);
                    let Some((trip_idx, departure)) = trip_search::find_earliest_trip(
                        pattern,
                        pos,
                        earliest_board,
                        |service_id| self.data.is_service_active(service_id, self.request.service_date),
                        None,
                        self.tuning.scheduled_trip_binary_search_threshold,
                    ) else {
                        continue;
                    };
                    if !boarded_trips.insert(trip_idx) {
                        continue;
                    }
                    let candidate_totals = totals[candidate_idx];
                    threads.push(Thread {
                        trip_idx,
                        board_time: departure,
                        boarded_from: candidate_idx,
                        totals: Totals {
                            n_transits: candidate_totals.n_transits + 1,
                            wait_time: candidate_totals.wait_time + (departure - candidate.arrival_time),
                            ..candidate_totals
                        },
                    });
                }
            }
        }
        Ok(())
    }

    fn relax_transfers(
        &self,
        state: &mut MultiCriteriaState,
        totals: &mut Vec<Totals>,
        origin_pattern: &mut Vec<Option<usize>>,
        round: usize,
        markers: &[usize],
    ) -> Result<(), RaptorError> {
        let num_stops = self.data.num_stops();
        for from_stop in 0..num_stops {
            // Only this round's own transit arrivals relax transfers — `markers[from_stop]` is a
            // round-boundary snapshot and may also span arrivals this same round's sweep already
            // produced elsewhere, already transfer-relaxed or not yet eligible.
            let arrivals: Vec<usize> = state
                .arrivals_since(from_stop, markers[from_stop])
                .iter()
                .filter(|a| a.arrived_by_transit && a.round == round)
                .map(|a| a.self_index)
                .collect();
            for arrival_idx in arrivals {
                let arrival = *state.get(arrival_idx);
                let base_totals = totals[arrival_idx];
                for leg in self.data.transfers_from(from_stop) {
                    if leg.to_stop >= num_stops {
                        log::warn!(
                            "transfer from stop {from_stop} targets out-of-range stop {}; skipping",
                            leg.to_stop
                        );
                        continue;
                    }
                    let arrival_time = self.calc.add(arrival.arrival_time, leg.duration_seconds);
                    let new_totals = Totals {
                        walk_time: base_totals.walk_time + leg.duration_seconds,
                        ..base_totals
                    };
                    self.offer_stop(
                        state,
                        totals,
                        origin_pattern,
                        leg.to_stop,
                        arrival_time,
                        round,
                        false,
                        Some(arrival_idx),
                        new_totals,
                        None,
                    );
                }
            }
        }
        Ok(())
    }

    fn offer_destinations(
        &self,
        state: &mut MultiCriteriaState,
        totals: &mut Vec<Totals>,
        markers: &[usize],
        round_tag: usize,
    ) -> Result<(), RaptorError> {
        for leg in &self.request.egress_legs {
            if leg.stop >= self.data.num_stops() {
                return Err(RaptorError::InvalidStop(leg.stop));
            }
            let arrivals: Vec<usize> = state
                .arrivals_since(leg.stop, markers[leg.stop])
                .iter()
                .filter(|a| a.round == round_tag)
                .map(|a| a.self_index)
                .collect();
            for arrival_idx in arrivals {
                let arrival = *state.get(arrival_idx);
                let base_totals = totals[arrival_idx];
                let arrival_time = self.calc.add(arrival.arrival_time, leg.duration_seconds);
                let new_totals = Totals {
                    walk_time: base_totals.walk_time + leg.duration_seconds,
                    ..base_totals
                };
                let cost = self.cost_factors.cost(
                    new_totals.n_transits,
                    new_totals.walk_time,
                    new_totals.wait_time,
                    new_totals.in_vehicle_time,
                );
                state.offer_destination(arrival_time, cost, arrival.round, false, Some(arrival_idx));
            }
        }
        Ok(())
    }
}
