//! Core index and time types shared across the engine.

/// Seconds past the reference midnight of the search day.
///
/// `Time::MAX` is used throughout the engine as the "unreached" sentinel,
/// so every arithmetic operation on a `Time` that may involve an unreached
/// value must use `saturating_add`/`saturating_sub`.
pub type Time = u32;

/// Stable integer identifier of a stop, in `[0, num_stops)`.
pub type StopId = usize;

/// Stable integer identifier of a pattern (a route with a fixed stop sequence).
pub type PatternId = usize;

/// Index of a trip within the trips of one pattern, in `[0, pattern.num_trips)`.
pub type TripIndex = usize;

/// A walking connection between two stops, or between a stop and a street
/// endpoint when used as an access/egress leg.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TransferLeg {
    pub from_stop: StopId,
    pub to_stop: StopId,
    pub duration_seconds: Time,
}

/// Arrival and departure time at one position of a trip.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StopTime {
    pub arrival: Time,
    pub departure: Time,
}

/// Search direction. See the calculator module for the operations whose
/// meaning flips with direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Direction {
    #[default]
    Forward,
    Reverse,
}

/// Which optimization criteria the worker state should track.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Criteria {
    /// Track only the best arrival time per stop per round (single-criterion RAPTOR).
    #[default]
    MinArrival,
    /// Track a Pareto frontier over (arrival time, transfers) per stop (McRAPTOR).
    Pareto,
}
