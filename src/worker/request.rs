//! Request, tuning and profile types.
//!
//! `RaptorRequest::new` validates fully at construction, rejecting a malformed query before any
//! routing runs rather than deferring checks into the worker loop.

use chrono::NaiveDate;

use crate::error::ConfigError;
use crate::model::Leg;
use crate::state::CostFactors;
use crate::time::Time;

/// Which worker variant a request drives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RaptorProfile {
    Standard,
    MultiCriteria,
    RangeRaptor,
    StdRangeRaptorWithHeuristics,
}

/// Process-level, read-only-once-built search parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tuning {
    pub max_number_of_transfers: usize,
    pub scheduled_trip_binary_search_threshold: usize,
    pub iteration_departure_step_in_seconds: Time,
    pub search_thread_pool_size: usize,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            max_number_of_transfers: 12,
            scheduled_trip_binary_search_threshold: 50,
            iteration_departure_step_in_seconds: 60,
            search_thread_pool_size: 0,
        }
    }
}

/// A validated routing query. Constructed only through [`RaptorRequest::new`], which is the sole
/// place these checks run — once built, a request's fields are trusted invariants.
#[derive(Debug, Clone, PartialEq)]
pub struct RaptorRequest {
    pub earliest_departure_time: Time,
    pub latest_departure_time: Time,
    pub board_slack_seconds: Time,
    pub iteration_departure_step_seconds: Time,
    pub access_legs: Vec<Leg>,
    pub egress_legs: Vec<Leg>,
    pub profile: RaptorProfile,
    pub multi_criteria_cost_factors: Option<CostFactors>,
    /// The service date the request's departure times are seconds-since-midnight of.
    /// `TransitDataProvider::is_service_active` cannot be evaluated without one — every concrete
    /// query needs it.
    pub service_date: NaiveDate,
    /// Per-request override of `Tuning::max_number_of_transfers`, when a caller wants a tighter
    /// bound than the process-level default for this one query. `None` defers to `Tuning`.
    pub max_number_of_transfers: Option<usize>,
}

impl RaptorRequest {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        earliest_departure_time: Time,
        latest_departure_time: Time,
        board_slack_seconds: Time,
        iteration_departure_step_seconds: Time,
        access_legs: Vec<Leg>,
        egress_legs: Vec<Leg>,
        profile: RaptorProfile,
        multi_criteria_cost_factors: Option<CostFactors>,
        service_date: NaiveDate,
        max_number_of_transfers: Option<usize>,
    ) -> Result<Self, ConfigError> {
        if latest_departure_time < earliest_departure_time {
            return Err(ConfigError::InvertedTimeWindow {
                earliest: earliest_departure_time,
                latest: latest_departure_time,
            });
        }
        if iteration_departure_step_seconds < 60 {
            return Err(ConfigError::StepTooSmall(iteration_departure_step_seconds));
        }
        if access_legs.is_empty() {
            return Err(ConfigError::NoAccessLegs);
        }
        if egress_legs.is_empty() {
            return Err(ConfigError::NoEgressLegs);
        }
        if let Some(leg) = access_legs.iter().find(|leg| leg.duration_seconds < 0) {
            return Err(ConfigError::NegativeLegDuration {
                leg_kind: "access",
                stop: leg.stop,
            });
        }
        if let Some(leg) = egress_legs.iter().find(|leg| leg.duration_seconds < 0) {
            return Err(ConfigError::NegativeLegDuration {
                leg_kind: "egress",
                stop: leg.stop,
            });
        }
        if profile == RaptorProfile::MultiCriteria && multi_criteria_cost_factors.is_none() {
            return Err(ConfigError::MissingCostFactors);
        }

        Ok(Self {
            earliest_departure_time,
            latest_departure_time,
            board_slack_seconds,
            iteration_departure_step_seconds,
            access_legs,
            egress_legs,
            profile,
            multi_criteria_cost_factors,
            service_date,
            max_number_of_transfers,
        })
    }

    /// The number of rounds a worker must run: `max_rides + 1`, where `max_rides` is this
    /// request's override if present, else `tuning`'s process-level default.
    pub fn num_rounds(&self, tuning: &Tuning) -> usize {
        self.max_number_of_transfers.unwrap_or(tuning.max_number_of_transfers) + 1
    }

    pub fn search_window_length_seconds(&self) -> Time {
        self.latest_departure_time - self.earliest_departure_time
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn legs() -> (Vec<Leg>, Vec<Leg>) {
        (vec![Leg::new(0, 0, 0.0)], vec![Leg::new(1, 0, 0.0)])
    }

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()
    }

    #[test]
    fn rejects_inverted_time_window() {
        let (access, egress) = legs();
        let err = RaptorRequest::new(100, 50, 60, 60, access, egress, RaptorProfile::Standard, None, date(), None)
            .unwrap_err();
        assert_eq!(err, ConfigError::InvertedTimeWindow { earliest: 100, latest: 50 });
    }

    #[test]
    fn rejects_missing_access_legs() {
        let (_, egress) = legs();
        let err = RaptorRequest::new(0, 100, 60, 60, Vec::new(), egress, RaptorProfile::Standard, None, date(), None)
            .unwrap_err();
        assert_eq!(err, ConfigError::NoAccessLegs);
    }

    #[test]
    fn rejects_step_below_one_minute() {
        let (access, egress) = legs();
        let err = RaptorRequest::new(0, 100, 60, 30, access, egress, RaptorProfile::Standard, None, date(), None)
            .unwrap_err();
        assert_eq!(err, ConfigError::StepTooSmall(30));
    }

    #[test]
    fn multi_criteria_requires_cost_factors() {
        let (access, egress) = legs();
        let err = RaptorRequest::new(0, 100, 60, 60, access, egress, RaptorProfile::MultiCriteria, None, date(), None)
            .unwrap_err();
        assert_eq!(err, ConfigError::MissingCostFactors);
    }

    #[test]
    fn accepts_a_well_formed_request() {
        let (access, egress) = legs();
        let request = RaptorRequest::new(0, 100, 60, 60, access, egress, RaptorProfile::Standard, None, date(), None);
        assert!(request.is_ok());
    }

    #[test]
    fn num_rounds_defers_to_tuning_without_an_override() {
        let (access, egress) = legs();
        let request =
            RaptorRequest::new(0, 100, 60, 60, access, egress, RaptorProfile::Standard, None, date(), None).unwrap();
        assert_eq!(request.num_rounds(&Tuning::default()), 13);
    }

    #[test]
    fn num_rounds_honors_a_per_request_override() {
        let (access, egress) = legs();
        let request =
            RaptorRequest::new(0, 100, 60, 60, access, egress, RaptorProfile::Standard, None, date(), Some(2))
                .unwrap();
        assert_eq!(request.num_rounds(&Tuning::default()), 3);
    }
}
