//! Error types for the routing core.
//!
//! Two layers mirror where a failure can originate: [`ConfigError`] is surfaced at request
//! construction, before any worker runs; [`RaptorError`] is surfaced while a worker executes.

use thiserror::Error;

/// Failures that can occur while validating a [`crate::worker::request::RaptorRequest`].
///
/// A worker is never built from a request that fails validation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("latest_departure_time ({latest}) is before earliest_departure_time ({earliest})")]
    InvertedTimeWindow { earliest: i64, latest: i64 },

    #[error("negative duration on a {leg_kind} leg at stop {stop}")]
    NegativeLegDuration { leg_kind: &'static str, stop: usize },

    #[error("no access legs provided")]
    NoAccessLegs,

    #[error("no egress legs provided")]
    NoEgressLegs,

    #[error("iteration_departure_step_seconds must be at least 60, got {0}")]
    StepTooSmall(i64),

    #[error("multi_criteria_cost_factors is required for the multi_criteria profile")]
    MissingCostFactors,
}

/// Failures that can occur while a worker is executing a search.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RaptorError {
    #[error("stop index {0} is out of range")]
    InvalidStop(usize),

    #[error("pattern index {0} is out of range")]
    InvalidPattern(usize),

    #[error("trip index {0} is out of range for pattern {1}")]
    InvalidTrip(usize, usize),

    #[error("round {0} exceeds the configured maximum number of rounds")]
    RoundLimitExceeded(usize),

    #[error("internal invariant violated: {0}")]
    InvariantViolation(String),
}

/// Checks a critical invariant: negative travel time, a best-time regression, a cyclic back-link.
/// `debug_assert!` catches it immediately in debug builds with full context; a release build logs
/// via `log::error!` and returns `RaptorError::InvariantViolation` instead of panicking, so a
/// long-running service survives a single bad iteration.
pub fn check_invariant(condition: bool, message: impl FnOnce() -> String) -> Result<(), RaptorError> {
    if condition {
        return Ok(());
    }
    let message = message();
    log::error!("invariant violated: {message}");
    debug_assert!(condition, "{message}");
    Err(RaptorError::InvariantViolation(message))
}
