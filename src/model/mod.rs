//! Data model for the routing core.
//!
//! `range_raptor` itself never constructs these types from a GTFS feed or any other on-disk
//! source — building a [`crate::data::TransitDataProvider`] from raw schedule data is an external
//! collaborator's job. This module only defines the shapes the worker reads.

pub mod calendar;
pub mod leg;
pub mod pattern;
pub mod stop;
pub mod transfer;

pub use calendar::ServiceCalendar;
pub use leg::Leg;
pub use pattern::{FrequencyEntry, StopPosition, TripPattern, TripSchedule};
pub use stop::StopIndex;
pub use transfer::TransferLeg;
