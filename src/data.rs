//! The transit data view.
//!
//! `TransitDataProvider` is the boundary between this crate's routing core and whatever built the
//! network — a GTFS loader, a synthetic generator, a timetable editor. The core only ever reads
//! through this trait; it never owns or mutates the underlying network.
//!
//! Implementations are expected to be safe for concurrent read access: no internal mutation, no
//! lazy-initialisation races, since the service layer may hand the same provider to several
//! workers running on different threads at once.

use chrono::NaiveDate;

use crate::model::{StopIndex, TransferLeg, TripPattern};

/// Read-only view of patterns, stops, transfers, and the service calendar.
///
/// Slices returned by `transfers_from` and `patterns_for_stop` borrow from `&self`; callers must
/// not assume a stable address across calls that could mutate the provider (there are none in
/// this trait, but a caching wrapper implementation may choose to rebuild its backing storage).
pub trait TransitDataProvider {
    fn num_stops(&self) -> usize;

    /// Transfers originating at `stop`, in no particular order. A provider may omit the implicit
    /// zero-length self-transfer.
    fn transfers_from(&self, stop: StopIndex) -> &[TransferLeg];

    /// Indices of patterns serving `stop`.
    fn patterns_for_stop(&self, stop: StopIndex) -> &[usize];

    /// The pattern at index `p`.
    fn pattern(&self, p: usize) -> &TripPattern;

    fn num_patterns(&self) -> usize;

    /// Whether `service_id` runs on `date`.
    fn is_service_active(&self, service_id: usize, date: NaiveDate) -> bool;
}

/// A simple slice-backed [`TransitDataProvider`], suitable for tests, benchmarks, and small
/// synthetic networks. Production callers with GTFS-scale networks will typically supply their
/// own flattened-array implementation (as the codebase this crate grew out of does in
/// `PublicTransitData`) for better cache locality; the trait boundary makes that an
/// implementation detail the worker never sees.
#[derive(Debug, Clone, Default)]
pub struct InMemoryTransitData {
    pub patterns: Vec<TripPattern>,
    pub transfers: Vec<Vec<TransferLeg>>,
    pub stop_patterns: Vec<Vec<usize>>,
    pub calendar: crate::model::ServiceCalendar,
}

impl InMemoryTransitData {
    pub fn new(num_stops: usize) -> Self {
        Self {
            patterns: Vec::new(),
            transfers: vec![Vec::new(); num_stops],
            stop_patterns: vec![Vec::new(); num_stops],
            calendar: crate::model::ServiceCalendar::new(),
        }
    }

    /// Registers a pattern and indexes it against the stops it serves.
    pub fn add_pattern(&mut self, pattern: TripPattern) -> usize {
        let idx = self.patterns.len();
        for &stop in &pattern.stops {
            if !self.stop_patterns[stop].contains(&idx) {
                self.stop_patterns[stop].push(idx);
            }
        }
        self.patterns.push(pattern);
        idx
    }

    pub fn add_transfer(&mut self, leg: TransferLeg) {
        self.transfers[leg.from_stop].push(leg);
    }
}

impl TransitDataProvider for InMemoryTransitData {
    fn num_stops(&self) -> usize {
        self.transfers.len()
    }

    fn transfers_from(&self, stop: StopIndex) -> &[TransferLeg] {
        &self.transfers[stop]
    }

    fn patterns_for_stop(&self, stop: StopIndex) -> &[usize] {
        &self.stop_patterns[stop]
    }

    fn pattern(&self, p: usize) -> &TripPattern {
        &self.patterns[p]
    }

    fn num_patterns(&self) -> usize {
        self.patterns.len()
    }

    fn is_service_active(&self, service_id: usize, date: NaiveDate) -> bool {
        self.calendar.is_service_active(service_id, date)
    }
}
