//! Direction-aware time arithmetic.
//!
//! All time values are integer seconds since midnight of the service date. Values at or beyond
//! 24h are valid and represent trips that cross midnight.

/// Seconds since midnight of the service date. Wide enough to comfortably hold multi-day offsets
/// without overflow concerns in the arithmetic below.
pub type Time = i64;

/// A time so far in the future (forward search) or past (reverse search) that it can never be
/// improved upon; used to seed "unreached" stops.
pub const UNREACHED_FORWARD: Time = Time::MAX;
pub const UNREACHED_REVERSE: Time = Time::MIN;

/// Search direction. The worker code is written once and reads `Direction::Forward` or
/// `Direction::Reverse` out of the [`TransitCalculator`] rather than branching in the hot loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Forward,
    Reverse,
}

/// Encapsulates every direction-dependent arithmetic operation the workers need.
///
/// A forward calculator searches from an earliest departure time towards later arrivals; a
/// reverse calculator searches backwards from a latest arrival time towards earlier departures.
/// Keeping this arithmetic behind a trait lets `worker::standard` and `worker::multicriteria`
/// stay symmetric for both directions instead of branching internally.
#[derive(Debug, Clone, Copy)]
pub struct TransitCalculator {
    direction: Direction,
    board_slack: Time,
    max_duration: Time,
}

impl TransitCalculator {
    pub fn new(direction: Direction, board_slack: Time, max_duration: Time) -> Self {
        Self {
            direction,
            board_slack,
            max_duration,
        }
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// `t + d` forward, `t - d` reverse.
    pub fn add(&self, t: Time, d: Time) -> Time {
        match self.direction {
            Direction::Forward => t.saturating_add(d),
            Direction::Reverse => t.saturating_sub(d),
        }
    }

    /// `t - d` forward, `t + d` reverse — the inverse of [`Self::add`].
    pub fn sub(&self, t: Time, d: Time) -> Time {
        match self.direction {
            Direction::Forward => t.saturating_sub(d),
            Direction::Reverse => t.saturating_add(d),
        }
    }

    /// The earliest a vehicle can be boarded after arriving at a stop at time `t`.
    pub fn earliest_board_time(&self, t: Time) -> Time {
        match self.direction {
            Direction::Forward => t.saturating_add(self.board_slack),
            Direction::Reverse => t,
        }
    }

    /// The effective arrival time at a trip's stop position: the trip's own arrival time forward,
    /// or the trip's departure time minus board slack in reverse (since a reverse search "boards"
    /// by alighting earlier than the departure it is chasing).
    pub fn latest_arrival_time(&self, trip_arrival: Time, trip_departure: Time) -> Time {
        match self.direction {
            Direction::Forward => trip_arrival,
            Direction::Reverse => trip_departure.saturating_sub(self.board_slack),
        }
    }

    pub fn exceeds_time_limit(&self, elapsed: Time) -> bool {
        elapsed.abs() > self.max_duration
    }

    /// `a` is strictly better than `b`: earlier forward, later reverse.
    pub fn is_best(&self, a: Time, b: Time) -> bool {
        match self.direction {
            Direction::Forward => a < b,
            Direction::Reverse => a > b,
        }
    }

    pub fn unreached_time(&self) -> Time {
        match self.direction {
            Direction::Forward => UNREACHED_FORWARD,
            Direction::Reverse => UNREACHED_REVERSE,
        }
    }

    /// Iterate departure minutes from latest to earliest (forward) or earliest to latest
    /// (reverse), in `step` second increments, inclusive of both endpoints.
    pub fn minutes(&self, earliest: Time, latest: Time, step: Time) -> Vec<Time> {
        debug_assert!(step > 0);
        let mut minutes = Vec::new();
        let mut t = earliest;
        while t <= latest {
            minutes.push(t);
            t += step;
        }
        match self.direction {
            Direction::Forward => minutes.reverse(),
            Direction::Reverse => {}
        }
        minutes
    }
}
