//! Stop-arrival state, standard and multi-criteria variants.

pub mod multicriteria;
pub mod standard;

pub use multicriteria::{Arrival, CostFactors, MultiCriteriaState};
pub use standard::{StandardState, TripRef};
