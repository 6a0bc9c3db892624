//! Round-based (RAPTOR) range-query transit routing core.
//!
//! This crate implements the standard, multi-criteria and frequency-aware RAPTOR/range-RAPTOR
//! algorithms against a caller-supplied [`data::TransitDataProvider`] — it loads nothing from disk
//! and knows nothing about GTFS, OSM, or any other on-disk schedule format. Building a provider
//! from raw schedule data, and turning geographic queries into access/egress legs, is an external
//! collaborator's job.

pub mod data;
pub mod dispatch;
pub mod error;
pub mod model;
pub mod pareto;
pub mod path;
pub mod rng;
pub mod state;
pub mod time;
pub mod trip_search;
pub mod worker;

pub mod prelude {
    pub use crate::data::{InMemoryTransitData, TransitDataProvider};
    pub use crate::dispatch::Dispatcher;
    pub use crate::error::{ConfigError, RaptorError};
    pub use crate::model::{
        FrequencyEntry, Leg, ServiceCalendar, StopIndex, StopPosition, TransferLeg, TripPattern, TripSchedule,
    };
    pub use crate::pareto::{Dominance, DropCause, ParetoSet};
    pub use crate::path::{Path, PathLeg};
    pub use crate::rng::FrequencyRng;
    pub use crate::state::{Arrival, CostFactors, MultiCriteriaState, StandardState, TripRef};
    pub use crate::time::{Direction, Time, TransitCalculator};
    pub use crate::worker::frequency::{BoardingAssumption, FrequencyDistribution, FrequencyResult, FrequencyWorker};
    pub use crate::worker::multicriteria::MultiCriteriaWorker;
    pub use crate::worker::standard::{MinuteResult, StandardWorker};
    pub use crate::worker::{RaptorProfile, RaptorRequest, Tuning};
}

pub use prelude::*;
