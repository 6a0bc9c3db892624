//! Stop identifiers.

/// A stop is identified by a contiguous non-negative integer in `[0, num_stops)`. The core keeps
/// no further state about a stop — names, coordinates, and the like live in the caller's own
/// transit-data provider.
pub type StopIndex = usize;
