//! Earliest-boardable-trip search.
//!
//! Binary search over a pattern's trips below a configurable threshold falls back to a linear
//! scan, and a boarded trip can be refined backward by stepping through earlier trips that still
//! depart no earlier than the earliest board time, since a pattern's scheduled trips are sorted
//! by their first stop's departure.

use crate::model::pattern::{StopPosition, TripPattern, TripSchedule};
use crate::time::Time;

/// Default threshold below which a linear scan is used instead of a binary search.
pub const DEFAULT_BINARY_SEARCH_THRESHOLD: usize = 50;

/// Finds the earliest trip in `pattern` whose departure at `stop_position` is at least
/// `earliest_board_time` and whose service is active (per `is_active`). Frequency-defined trips
/// are skipped — they are handled by `worker::frequency` instead.
///
/// When `current_trip_index` names a trip already boarded earlier in the sweep, the search first
/// tries to refine it by stepping backward through trips departing no earlier than
/// `earliest_board_time`: since a pattern's scheduled trips are sorted by `departures[0]` and
/// `earliest_board_time` can only move earlier as a round progresses, any strictly earlier
/// boardable trip must be contiguous, immediately before the current one.
///
/// Returns `None` when no trip qualifies.
pub fn find_earliest_trip(
    pattern: &TripPattern,
    stop_position: StopPosition,
    earliest_board_time: Time,
    is_active: impl Fn(usize) -> bool,
    current_trip_index: Option<usize>,
    binary_search_threshold: usize,
) -> Option<(usize, Time)> {
    let scheduled: Vec<(usize, &TripSchedule)> = pattern
        .scheduled_trips()
        .filter(|(_, trip)| is_active(trip.service_id))
        .collect();

    if scheduled.is_empty() {
        return None;
    }

    if let Some(current_idx) = current_trip_index {
        if let Some(current_pos) = scheduled.iter().position(|&(idx, _)| idx == current_idx) {
            let mut best_pos = current_pos;
            for pos in (0..current_pos).rev() {
                let (_, trip) = scheduled[pos];
                if trip.departure_at(stop_position) >= earliest_board_time {
                    best_pos = pos;
                } else {
                    break;
                }
            }
            let (idx, trip) = scheduled[best_pos];
            return Some((idx, trip.departure_at(stop_position)));
        }
    }

    let n = scheduled.len();
    let found_pos = if n < binary_search_threshold {
        scheduled
            .iter()
            .position(|(_, trip)| trip.departure_at(stop_position) >= earliest_board_time)
    } else {
        let mut lo = 0usize;
        let mut hi = n;
        while lo < hi {
            let mid = lo + (hi - lo) / 2;
            if scheduled[mid].1.departure_at(stop_position) >= earliest_board_time {
                hi = mid;
            } else {
                lo = mid + 1;
            }
        }
        (lo < n).then_some(lo)
    };

    found_pos.map(|pos| {
        let (idx, trip) = scheduled[pos];
        (idx, trip.departure_at(stop_position))
    })
}
