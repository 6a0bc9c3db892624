//! Foot-path transfer legs.

use crate::model::StopIndex;
use crate::time::Time;

/// A walking connection between two stops. Transfers are stored per source stop and iterated
/// lazily by [`crate::data::TransitDataProvider::transfers_from`]; a zero-length self-transfer
/// (same stop, `duration_seconds == 0`) is implicit and need not be materialised by providers.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TransferLeg {
    pub from_stop: StopIndex,
    pub to_stop: StopIndex,
    pub duration_seconds: Time,
    pub cost: f64,
}
