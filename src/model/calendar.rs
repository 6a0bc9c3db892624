//! Service-date activation.

use chrono::NaiveDate;
use hashbrown::HashMap;

/// The set of calendar dates each service identifier is active on.
///
/// This is deliberately the simplest structure that satisfies `is_service_active`: a real
/// GTFS-backed provider will usually derive this from `calendar.txt` plus `calendar_dates.txt`
/// exceptions ahead of time and hand the core a flattened per-date set, rather than evaluating
/// weekday/exception rules on every query.
#[derive(Debug, Clone, Default)]
pub struct ServiceCalendar {
    active_dates: HashMap<usize, hashbrown::HashSet<NaiveDate>>,
}

impl ServiceCalendar {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn activate(&mut self, service_id: usize, date: NaiveDate) {
        self.active_dates.entry(service_id).or_default().insert(date);
    }

    pub fn is_service_active(&self, service_id: usize, date: NaiveDate) -> bool {
        self.active_dates
            .get(&service_id)
            .is_some_and(|dates| dates.contains(&date))
    }
}
