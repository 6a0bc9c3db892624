//! Standard (single-criterion) stop-arrival state.
//!
//! Per-stop best arrival time plus the explicit boarding fields (`board_stop`, `trip_ref`,
//! `transfer_from_stop`) needed to reconstruct a journey, with `FixedBitSet`-backed touched sets
//! driving the round-to-round pattern sweep.

use fixedbitset::FixedBitSet;

use crate::model::StopIndex;
use crate::time::{Time, TransitCalculator};

/// Which trip of which pattern a stop is currently being carried by.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TripRef {
    pub pattern: usize,
    pub trip: usize,
}

/// Per-round best arrival times plus the current round's boarding bookkeeping.
///
/// `best_time[round]` is retained across an entire worker call and, under range-RAPTOR, across
/// every departure minute in the search window — only the touched bitsets are cleared between
/// minutes (see [`Self::reset_per_iteration`]).
pub struct StandardState {
    num_rounds: usize,
    num_stops: usize,
    unreached: Time,

    best_time: Vec<Vec<Time>>,
    best_non_transfer_time: Vec<Time>,

    board_stop: Vec<Option<StopIndex>>,
    board_time: Vec<Time>,
    trip_ref: Vec<Option<TripRef>>,
    transfer_from_stop: Vec<Option<StopIndex>>,

    touched_stops: FixedBitSet,
}

impl StandardState {
    pub fn new(num_rounds: usize, num_stops: usize, calc: &TransitCalculator) -> Self {
        let unreached = calc.unreached_time();
        Self {
            num_rounds,
            num_stops,
            unreached,
            best_time: vec![vec![unreached; num_stops]; num_rounds + 1],
            best_non_transfer_time: vec![unreached; num_stops],
            board_stop: vec![None; num_stops],
            board_time: vec![unreached; num_stops],
            trip_ref: vec![None; num_stops],
            transfer_from_stop: vec![None; num_stops],
            touched_stops: FixedBitSet::with_capacity(num_stops),
        }
    }

    pub fn num_rounds(&self) -> usize {
        self.num_rounds
    }

    pub fn unreached(&self) -> Time {
        self.unreached
    }

    /// Carries `best_time[round - 1]` forward into `best_time[round]` before that round's sweep,
    /// so unimproved stops keep their previous-round value.
    pub fn begin_round(&mut self, round: usize) {
        debug_assert!(round >= 1 && round <= self.num_rounds);
        let previous = self.best_time[round - 1].clone();
        self.best_time[round] = previous;
    }

    pub fn best_time(&self, round: usize, stop: StopIndex) -> Time {
        self.best_time[round][stop]
    }

    /// Read-only lookup of the previous round's best time, used to compute this round's earliest
    /// boardable time at a stop.
    pub fn best_time_previous_round(&self, round: usize, stop: StopIndex) -> Time {
        debug_assert!(round >= 1);
        self.best_time[round - 1][stop]
    }

    pub fn best_non_transfer_time(&self, stop: StopIndex) -> Time {
        self.best_non_transfer_time[stop]
    }

    pub fn board_stop(&self, stop: StopIndex) -> Option<StopIndex> {
        self.board_stop[stop]
    }

    pub fn board_time(&self, stop: StopIndex) -> Time {
        self.board_time[stop]
    }

    pub fn trip_ref(&self, stop: StopIndex) -> Option<TripRef> {
        self.trip_ref[stop]
    }

    pub fn transfer_from_stop(&self, stop: StopIndex) -> Option<StopIndex> {
        self.transfer_from_stop[stop]
    }

    /// Seeds round 0 from an access leg. Returns `true` iff the seed improved the stop's time.
    pub fn set_initial_time(&mut self, stop: StopIndex, arrival_time: Time, calc: &TransitCalculator) -> bool {
        if calc.is_best(arrival_time, self.best_time[0][stop]) {
            self.best_time[0][stop] = arrival_time;
            self.mark_stop_touched(stop);
            true
        } else {
            false
        }
    }

    /// Applies a transit relaxation. Returns `true` iff the stop's non-transfer (or overall) time
    /// strictly improved, in which case the caller must mark the stop touched for the next round.
    #[allow(clippy::too_many_arguments)]
    pub fn transit_to_stop(
        &mut self,
        round: usize,
        stop: StopIndex,
        alight_time: Time,
        board_stop: StopIndex,
        board_time: Time,
        trip_ref: TripRef,
        calc: &TransitCalculator,
    ) -> bool {
        if !calc.is_best(alight_time, self.best_non_transfer_time[stop]) {
            return false;
        }

        self.best_non_transfer_time[stop] = alight_time;
        self.board_stop[stop] = Some(board_stop);
        self.board_time[stop] = board_time;
        self.trip_ref[stop] = Some(trip_ref);
        self.transfer_from_stop[stop] = None;

        let improved_overall = calc.is_best(alight_time, self.best_time[round][stop]);
        if improved_overall {
            self.best_time[round][stop] = alight_time;
        }

        debug_assert!(
            !calc.is_best(self.best_time[round][stop], self.best_non_transfer_time[stop]),
            "best_non_transfer_time must never be strictly better than best_time"
        );

        self.mark_stop_touched(stop);
        true
    }

    /// Applies a transfer relaxation. Returns `true` iff the destination stop's overall time
    /// strictly improved.
    pub fn transfer_to_stop(
        &mut self,
        round: usize,
        from_stop: StopIndex,
        to_stop: StopIndex,
        arrival_time: Time,
        calc: &TransitCalculator,
    ) -> bool {
        if !calc.is_best(arrival_time, self.best_time[round][to_stop]) {
            return false;
        }
        self.best_time[round][to_stop] = arrival_time;
        self.transfer_from_stop[to_stop] = Some(from_stop);
        self.mark_stop_touched(to_stop);
        true
    }

    pub fn mark_stop_touched(&mut self, stop: StopIndex) {
        self.touched_stops.insert(stop);
    }

    /// Re-marks every stop in `stops` as touched. Used to carry a round's transit-only
    /// improvements forward into the next round's touched set after they have been taken out to
    /// drive transfer relaxation (transfer relaxation may not itself improve a stop that transit
    /// already did).
    pub fn mark_stops_touched(&mut self, stops: &FixedBitSet) {
        self.touched_stops.union_with(stops);
    }

    pub fn has_touched_stops(&self) -> bool {
        self.touched_stops.count_ones(..) > 0
    }

    /// Moves the accumulated touched-stops bitset out of the state (replacing it with an empty
    /// one of the same size), for the worker to translate into touched patterns for the next
    /// round. Used instead of a persistent touched-patterns bitset so that a stop's marks drive
    /// exactly one round's pattern sweep.
    pub fn take_touched_stops(&mut self) -> FixedBitSet {
        std::mem::replace(&mut self.touched_stops, FixedBitSet::with_capacity(self.num_stops))
    }

    /// Clears the round-local touched-stops set ahead of a new departure minute, preserving
    /// `best_time`/`best_non_transfer_time` as the range-RAPTOR upper bound.
    pub fn reset_per_iteration(&mut self) {
        self.touched_stops.clear();
    }
}
