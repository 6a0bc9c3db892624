//! Frequency-aware boarding and Monte-Carlo range-RAPTOR.
//!
//! Reuses `worker::standard`'s round-loop shape (sweep, relax, carry best-time across minutes) so
//! the two workers read as siblings, adding a seeded draw per frequency entry for the boarding
//! assumption in effect.

use fixedbitset::FixedBitSet;

use crate::data::TransitDataProvider;
use crate::error::{check_invariant, RaptorError};
use crate::model::pattern::{StopPosition, TripSchedule};
use crate::model::StopIndex;
use crate::rng::FrequencyRng;
use crate::state::standard::{StandardState, TripRef};
use crate::time::{Direction, Time, TransitCalculator};
use crate::trip_search;
use crate::worker::request::{RaptorRequest, Tuning};
use crate::worker::standard::MinuteResult;

const DEFAULT_MAX_TRIP_DURATION_SECONDS: Time = 24 * 3_600;

/// Which boarding assumption a frequency-aware sweep uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoardingAssumption {
    /// Board immediately once the entry's window is reached, capped by the entry's end time.
    BestCase,
    /// Wait a full headway before boarding.
    WorstCase,
    /// A uniformly sampled offset within `[0, headway)`, resampled every call.
    Random,
}

/// One run's worth of per-minute results for a single boarding assumption.
pub struct FrequencyResult {
    pub assumption: BoardingAssumption,
    pub minutes: Vec<MinuteResult>,
}

/// The full distribution produced by one call: BEST_CASE and WORST_CASE bound every RANDOM draw
/// at every minute and every egress stop.
pub struct FrequencyDistribution {
    pub best_case: FrequencyResult,
    pub worst_case: FrequencyResult,
    pub random_draws: Vec<FrequencyResult>,
}

/// Earliest boardable time on `entry`, or `None` if `earliest_arrival` falls after the entry's
/// service window closes.
fn frequency_board_time(
    entry_start: Time,
    entry_end: Time,
    headway_seconds: Time,
    earliest_arrival: Time,
    assumption: BoardingAssumption,
    rng: Option<&mut FrequencyRng>,
) -> Option<Time> {
    let earliest_in_window = earliest_arrival.max(entry_start);
    if earliest_in_window > entry_end {
        return None;
    }
    let board_time = match assumption {
        BoardingAssumption::BestCase => earliest_in_window,
        BoardingAssumption::WorstCase => earliest_in_window.saturating_add(headway_seconds),
        BoardingAssumption::Random => {
            let offset = rng.expect("Random assumption requires an rng").offset_within_headway(headway_seconds);
            earliest_in_window.saturating_add(offset)
        }
    };
    (board_time <= entry_end).then_some(board_time)
}

/// Earliest boardable frequency trip+entry at `board_position`, across every frequency trip of a
/// pattern. Returns `(trip_index, board_time)`.
fn find_earliest_frequency_boarding(
    trips: &[TripSchedule],
    board_position: StopPosition,
    earliest_arrival: Time,
    assumption: BoardingAssumption,
    mut rng: Option<&mut FrequencyRng>,
) -> Option<(usize, Time)> {
    let mut best: Option<(usize, Time)> = None;
    for (trip_idx, trip) in trips.iter().enumerate() {
        if !trip.is_frequency() {
            continue;
        }
        for entry in &trip.frequencies {
            let candidate = frequency_board_time(
                entry.start_time,
                entry.end_time,
                entry.headway_seconds,
                earliest_arrival,
                assumption,
                rng.as_deref_mut(),
            );
            if let Some(board_time) = candidate {
                if best.map_or(true, |(_, best_time)| board_time < best_time) {
                    best = Some((trip_idx, board_time));
                }
            }
        }
    }
    best
}

pub struct FrequencyWorker<'d, D> {
    data: &'d D,
    request: &'d RaptorRequest,
    tuning: Tuning,
    calc: TransitCalculator,
}

impl<'d, D: TransitDataProvider> FrequencyWorker<'d, D> {
    pub fn new(data: &'d D, request: &'d RaptorRequest, tuning: Tuning) -> Self {
        let calc = TransitCalculator::new(
            Direction::Forward,
            request.board_slack_seconds,
            DEFAULT_MAX_TRIP_DURATION_SECONDS,
        );
        Self { data, request, tuning, calc }
    }

    /// Runs BEST_CASE, WORST_CASE and `monte_carlo_draws_per_minute` RANDOM sweeps. Each
    /// assumption carries its own `best_time[]` across minutes, independent of the others.
    pub fn run(&self, seed: u64, monte_carlo_draws_per_minute: usize) -> Result<FrequencyDistribution, RaptorError> {
        let best_case = self.run_assumption(BoardingAssumption::BestCase, None)?;
        let worst_case = self.run_assumption(BoardingAssumption::WorstCase, None)?;

        let mut rng = FrequencyRng::from_seed(seed);
        let mut random_draws = Vec::with_capacity(monte_carlo_draws_per_minute);
        for _ in 0..monte_carlo_draws_per_minute {
            random_draws.push(self.run_assumption(BoardingAssumption::Random, Some(&mut rng))?);
        }

        Ok(FrequencyDistribution {
            best_case: FrequencyResult { assumption: BoardingAssumption::BestCase, minutes: best_case },
            worst_case: FrequencyResult { assumption: BoardingAssumption::WorstCase, minutes: worst_case },
            random_draws: random_draws
                .into_iter()
                .map(|minutes| FrequencyResult { assumption: BoardingAssumption::Random, minutes })
                .collect(),
        })
    }

    fn run_assumption(
        &self,
        assumption: BoardingAssumption,
        mut rng: Option<&mut FrequencyRng>,
    ) -> Result<Vec<MinuteResult>, RaptorError> {
        let minutes = self.calc.minutes(
            self.request.earliest_departure_time,
            self.request.latest_departure_time,
            self.request.iteration_departure_step_seconds,
        );
        let num_rounds = self.request.num_rounds(&self.tuning);
        let mut state = StandardState::new(num_rounds, self.data.num_stops(), &self.calc);
        let mut results = Vec::with_capacity(minutes.len());

        for &minute in &minutes {
            log::debug!("frequency worker ({assumption:?}): departure minute {minute}");
            state.reset_per_iteration();
            self.seed(&mut state, minute);
            let final_round = self.run_rounds(&mut state, num_rounds, assumption, rng.as_deref_mut())?;
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

    fn run_rounds(
        &self,
        state: &mut StandardState,
        num_rounds: usize,
        assumption: BoardingAssumption,
        mut rng: Option<&mut FrequencyRng>,
    ) -> Result<usize, RaptorError> {
        let mut final_round = 0;
        for round in 1..=num_rounds {
            if !state.has_touched_stops() {
                break;
            }

            state.begin_round(round);

            let touched_patterns = self.patterns_touched_by(state.take_touched_stops());
            self.sweep_patterns(state, round, &touched_patterns, assumption, rng.as_deref_mut())?;

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

    #[allow(clippy::too_many_arguments)]
    fn sweep_patterns(
        &self,
        state: &mut StandardState,
        round: usize,
        touched_patterns: &FixedBitSet,
        assumption: BoardingAssumption,
        mut rng: Option<&mut FrequencyRng>,
    ) -> Result<(), RaptorError> {
        for pattern_idx in touched_patterns.ones() {
            if pattern_idx >= self.data.num_patterns() {
                return Err(RaptorError::InvalidPattern(pattern_idx));
            }
            let pattern = self.data.pattern(pattern_idx);
            // `board_position` is `None` for a scheduled ride (whose template carries absolute
            // times already) and `Some(pos)` for a frequency ride, whose template only carries
            // in-vehicle offsets relative to wherever it happened to be boarded.
            let mut on_trip: Option<(usize, StopIndex, Time, Option<StopPosition>)> = None;
            let mut frequency_locked = false;

            for (pos, &stop) in pattern.stops.iter().enumerate() {
                if let Some((trip_idx, board_stop, board_time, board_position)) = on_trip {
                    let trip = &pattern.trips[trip_idx];
                    let alight_time = match board_position {
                        None => self.calc.latest_arrival_time(trip.arrival_at(pos), trip.departure_at(pos)),
                        Some(boarded_at) => board_time + (trip.arrival_at(pos) - trip.departure_at(boarded_at)),
                    };
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

                let boarded_here = on_trip.is_some_and(|(_, board_stop, _, _)| board_stop == stop);
                if boarded_here || frequency_locked {
                    continue;
                }

                let earliest_arrival = state.best_time_previous_round(round, stop);
                let earliest_board = self.calc.earliest_board_time(earliest_arrival);

                if let Some((trip_idx, board_time)) = find_earliest_frequency_boarding(
                    &pattern.trips,
                    pos,
                    earliest_board,
                    assumption,
                    rng.as_deref_mut(),
                ) {
                    on_trip = Some((trip_idx, stop, board_time, Some(pos)));
                    frequency_locked = true;
                    continue;
                }

                let current_trip_index = on_trip.map(|(idx, _, _, _)| idx);
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
                        on_trip = Some((trip_idx, stop, departure, None));
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
                self.calc.add(stop_time, leg.duration_seconds) - minute
            })
            .collect()
    }
}
