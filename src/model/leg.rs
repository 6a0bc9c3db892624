//! Access/egress legs.

use crate::model::StopIndex;
use crate::time::Time;

/// An access leg seeds the initial worker state at `stop`; an egress leg is examined at every
/// round to produce a candidate destination arrival. Both share the same shape: the core does not
/// care how the duration and cost were computed (street routing is an external collaborator).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Leg {
    pub stop: StopIndex,
    pub duration_seconds: Time,
    pub cost: f64,
}

impl Leg {
    pub fn new(stop: StopIndex, duration_seconds: Time, cost: f64) -> Self {
        Self {
            stop,
            duration_seconds,
            cost,
        }
    }
}
