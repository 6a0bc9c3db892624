//! Trip patterns and trip schedules.

use crate::time::Time;

/// Position of a stop within a pattern's `stops[]` sequence (distinct from the global
/// [`crate::model::StopIndex`]).
pub type StopPosition = usize;

/// One `(start_time, end_time, headway_seconds)` entry describing a frequency-based trip. A trip
/// schedule may carry several entries (e.g. a denser headway during peak hours).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrequencyEntry {
    pub start_time: Time,
    pub end_time: Time,
    pub headway_seconds: Time,
}

/// A single trip within a pattern: per-stop arrival/departure times, monotonically non-decreasing
/// in stop position, plus an optional set of frequency entries for headway-defined service.
///
/// A trip is either scheduled (no frequency entries — `arrivals`/`departures` are exact) or
/// frequency-defined (`frequencies` is non-empty). Frequency-only trips are invisible to the plain
/// trip search; they are handled by `worker::frequency` instead.
#[derive(Debug, Clone)]
pub struct TripSchedule {
    pub arrivals: Vec<Time>,
    pub departures: Vec<Time>,
    pub service_id: usize,
    pub frequencies: Vec<FrequencyEntry>,
}

impl TripSchedule {
    pub fn is_frequency(&self) -> bool {
        !self.frequencies.is_empty()
    }

    pub fn departure_at(&self, pos: StopPosition) -> Time {
        self.departures[pos]
    }

    pub fn arrival_at(&self, pos: StopPosition) -> Time {
        self.arrivals[pos]
    }
}

/// An ordered sequence of stops traversed by a set of trips, sorted by first-stop departure time.
#[derive(Debug, Clone)]
pub struct TripPattern {
    pub stops: Vec<crate::model::StopIndex>,
    pub trips: Vec<TripSchedule>,
}

impl TripPattern {
    pub fn num_stops(&self) -> usize {
        self.stops.len()
    }

    pub fn num_trips(&self) -> usize {
        self.trips.len()
    }

    /// Position of `stop` within this pattern's stop sequence, if it is visited. When a pattern
    /// visits the same stop twice (a loop), this returns the first occurrence; callers that need
    /// to distinguish visits should scan `stops` directly (see `worker::standard`'s re-board
    /// rule).
    pub fn position_of(&self, stop: crate::model::StopIndex) -> Option<StopPosition> {
        self.stops.iter().position(|&s| s == stop)
    }

    /// Scheduled (non-frequency) trips only, in their stored order (sorted by `departures[0]`).
    pub fn scheduled_trips(&self) -> impl Iterator<Item = (usize, &TripSchedule)> {
        self.trips
            .iter()
            .enumerate()
            .filter(|(_, t)| !t.is_frequency())
    }

    /// Frequency-defined trips only.
    pub fn frequency_trips(&self) -> impl Iterator<Item = (usize, &TripSchedule)> {
        self.trips
            .iter()
            .enumerate()
            .filter(|(_, t)| t.is_frequency())
    }
}
