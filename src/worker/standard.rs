//! Standard / range-RAPTOR worker.
//!
//! Sweeps departure minutes latest to earliest, carrying best times forward between minutes, with
//! a route-queue pattern sweep inside each round. The re-board guard compares the boarded-from
//! stop of the *current* ride, not the pattern index, so a pattern that loops back on a stop is
//! handled correctly (see `DESIGN.md`).

use fixedbitset::FixedBitSet;

use crate::data::TransitDataProvider;
use crate::error::{check_invariant, RaptorError};
use crate::model::StopIndex;
use crate::state::standard::{StandardState, TripRef};
use crate::time::{Direction, Time, TransitCalculator};
use crate::trip_search;
use crate::worker::request::{RaptorRequest, Tuning};

/// No explicit request field bounds a single trip's duration; a generous one-day cap keeps
/// `TransitCalculator::exceeds_time_limit` meaningful without rejecting legitimate overnight
/// services.
const DEFAULT_MAX_TRIP_DURATION_SECONDS: Time = 24 * 3_600;

/// Per-minute result: elapsed seconds from that minute's departure to each egress stop, or
/// [`StandardState::unreached`] when the egress stop was not reached.
pub struct MinuteResult {
    pub departure_time: Time,
    pub arrival_at_egress_stop: Vec<Time>,
}

pub struct StandardWorker<'d, D> {
    data: &'d D,
    request: &'d RaptorRequest,
    tuning: Tuning,
    calc: TransitCalculator,
}

impl<'d, D: TransitDataProvider> StandardWorker<'d, D> {
    pub fn new(data: &'d D, request: &'d RaptorRequest, tuning: Tuning) -> Self {
        let calc = TransitCalculator::new(
            Direction::Forward,
            request.board_slack_seconds,
            DEFAULT_MAX_TRIP_DURATION_SECONDS,
        );
        Self { data, request, tuning, calc }
    }

    /// Runs the full range-RAPTOR sweep: one [`MinuteResult`] per departure minute in the
    /// request's search window, latest-to-earliest, reusing `best_time` across minutes.
    pub fn run(&self) -> Result<Vec<MinuteResult>, RaptorError> {
        let minutes = self.calc.minutes(
            self.request.earliest_departure_time,
            self.request.latest_departure_time,
            self.request.iteration_departure_step_seconds,
        );
        let num_rounds = self.request.num_rounds(&self.tuning);
        let mut state = StandardState::new(num_rounds, self.data.num_stops(), &self.calc);
        let mut results = Vec::with_capacity(minutes.len());

        for &minute in &minutes {
            log::debug!("standard worker: departure minute {minute}");
            state.reset_per_iteration();
            self.seed(&mut state, minute);
            let final_round = self.run_rounds(&mut state, num_rounds)?;
            results.push(MinuteResult {
                departure_time: minute,
                arrival_at_egress_stop: self.extract(&state, final_round, minute),
            });
        }

        Ok(results)
    }

    fn seed(&self, state: &mut StandardState, minute: Time) {
        for leg in &self.request.access_legs {
            let arrival = self.calc.add(minute, leg.duration_seconds);
            state.set_initial_time(leg.stop, arrival, &self.calc);
        }
    }

    fn run_rounds(&self, state: &mut StandardState, num_rounds: usize) -> Result<usize, RaptorError> {
        let mut final_round = 0;
        for round in 1..=num_rounds {
            if !state.has_touched_stops() {
                break;
            }
            state.begin_round(round);

            let touched_patterns = self.patterns_touched_by(state.take_touched_stops());
            self.sweep_patterns(state, round, &touched_patterns)?;

            let transit_improved = state.take_touched_stops();
            self.relax_transfers(state, round, &transit_improved)?;
            // A stop transit reached but whose transfers didn't further improve must still seed
            // the next round's pattern sweep.
            state.mark_stops_touched(&transit_improved);

            final_round = round;
        }
        Ok(final_round)
    }

    fn patterns_touched_by(&self, touched_stops: FixedBitSet) -> FixedBitSet {
        let mut patterns = FixedBitSet::with_capacity(self.data.num_patterns());
        for stop in touched_stops.ones() {
            for &p in self.data.patterns_for_stop(stop) {
                patterns.insert(p);
            }
        }
        patterns
    }

    fn sweep_patterns(
        &self,
        state: &mut StandardState,
        round: usize,
        touched_patterns: &FixedBitSet,
    ) -> Result<(), RaptorError> {
        for pattern_idx in touched_patterns.ones() {
            if pattern_idx >= self.data.num_patterns() {
                return Err(RaptorError::InvalidPattern(pattern_idx));
            }
            let pattern = self.data.pattern(pattern_idx);
            let mut on_trip: Option<(usize, StopIndex, Time)> = None;

            for (pos, &stop) in pattern.stops.iter().enumerate() {
                if let Some((trip_idx, board_stop, board_time)) = on_trip {
                    let trip = &pattern.trips[trip_idx];
                    let alight_time = self.calc.latest_arrival_time(trip.arrival_at(pos), trip.departure_at(pos));
                    check_invariant(!self.calc.is_best(alight_time, board_time), || {
                        format!(
                            "pattern {pattern_idx} trip {trip_idx}: alight time {alight_time} precedes board time {board_time}"
                        )
                    })?;
                    if !self.calc.exceeds_time_limit(alight_time - board_time) {
                        state.transit_to_stop(
                            round,
                            stop,
                            alight_time,
                            board_stop,
                            board_time,
                            TripRef { pattern: pattern_idx, trip: trip_idx },
                            &self.calc,
                        );
                    }
                }

                let boarded_here = on_trip.is_some_and(|(_, board_stop, _)| board_stop == stop);
                if boarded_here {
                    continue;
                }

                let earliest_board = self
                    .calc
                    .earliest_board_time(state.best_time_previous_round(round, stop));
                let current_trip_index = on_trip.map(|(idx, _, _)| idx);
                if let Some((trip_idx, departure)) = trip_search::find_earliest_trip(
                    pattern,
                    pos,
                    earliest_board,
                    |service_id| self.data.is_service_active(service_id, self.request.service_date),
                    current_trip_index,
                    self.tuning.scheduled_trip_binary_search_threshold,
                ) {
                    let switches = current_trip_index != Some(trip_idx);
                    if switches {
                        on_trip = Some((trip_idx, stop, departure));
                    }
                }
            }
        }
        Ok(())
    }

    fn relax_transfers(
        &self,
        state: &mut StandardState,
        round: usize,
        transit_improved: &FixedBitSet,
    ) -> Result<(), RaptorError> {
        for from_stop in transit_improved.ones() {
            if from_stop >= self.data.num_stops() {
                return Err(RaptorError::InvalidStop(from_stop));
            }
            let from_time = state.best_time(round, from_stop);
            for leg in self.data.transfers_from(from_stop) {
                if leg.to_stop >= self.data.num_stops() {
                    log::warn!(
                        "transfer from stop {from_stop} targets out-of-range stop {}; skipping",
                        leg.to_stop
                    );
                    continue;
                }
                let arrival = self.calc.add(from_time, leg.duration_seconds);
                state.transfer_to_stop(round, from_stop, leg.to_stop, arrival, &self.calc);
            }
        }
        Ok(())
    }

    fn extract(&self, state: &StandardState, final_round: usize, minute: Time) -> Vec<Time> {
        self.request
            .egress_legs
            .iter()
            .map(|leg| {
                let stop_time = state.best_time(final_round, leg.stop);
                if stop_time == state.unreached() {
                    return state.unreached();
                }
                let egress_time = self.calc.add(stop_time, leg.duration_seconds);
                egress_time - minute
            })
            .collect()
    }
}
