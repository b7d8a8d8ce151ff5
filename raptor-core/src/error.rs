use thiserror::Error;

use crate::model::{PatternId, StopId, TripIndex};

/// Errors the engine can return.
///
/// The variants are split, in comments below, into two groups: the first
/// is invalid input, rejected before the search loop ever runs; the
/// second is a provider-contract violation, a programmer error in a
/// `TimetableDataProvider` implementation that the engine refuses to
/// silently tolerate. Normal search behavior (an unreachable destination)
/// never produces an `Err` - it produces an empty Pareto set.
#[derive(Error, Debug, PartialEq)]
pub enum RaptorError {
    // --- invalid input ---
    #[error("invalid stop id: {0}")]
    InvalidStop(StopId),
    #[error("invalid time value: {0}")]
    InvalidTime(u32),
    #[error("request has no access legs")]
    EmptyAccessLegs,
    #[error("max_transfers must be >= 0, got {0}")]
    InvalidMaxTransfers(i64),
    #[error("earliest_departure ({earliest}) must be <= latest_departure ({latest})")]
    InvalidDepartureWindow { earliest: u32, latest: u32 },

    // --- provider contract violations ---
    #[error("invalid pattern id: {0}")]
    InvalidPattern(PatternId),
    #[error("invalid trip index {trip} for pattern {pattern}")]
    InvalidTrip { pattern: PatternId, trip: TripIndex },
    #[error("pattern {pattern} has a trip whose times are not non-decreasing")]
    MonotonicityViolation { pattern: PatternId },
    #[error("round {0} exceeds the configured max_transfers")]
    MaxTransfersExceeded(usize),

    // --- path reconstruction ---
    #[error("could not reconstruct a journey: back-pointer chain was inconsistent")]
    InvalidJourney,
}
