//! The Timetable Data Provider contract.
//!
//! The engine never reads a timetable off disk itself; it is handed an
//! implementation of [`TimetableDataProvider`] and only ever calls through
//! that interface. Loading GTFS/CSV/whatever-format timetables into an
//! implementation is an external concern.

use crate::model::types::{PatternId, StopId, StopTime, TransferLeg, TripIndex};

/// One pattern: an ordered sequence of stops shared by a set of trips.
#[derive(Debug, Clone, Copy)]
pub struct Pattern<'a> {
    pub id: PatternId,
    stops: &'a [StopId],
}

impl<'a> Pattern<'a> {
    #[must_use]
    pub fn new(id: PatternId, stops: &'a [StopId]) -> Self {
        Pattern { id, stops }
    }

    #[must_use]
    pub fn stops(&self) -> &'a [StopId] {
        self.stops
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.stops.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.stops.is_empty()
    }

    #[must_use]
    pub fn stop_at(&self, position: usize) -> StopId {
        self.stops[position]
    }
}

/// Read-only access to patterns, trips, transfers and the service calendar.
///
/// All iterators returned by this trait are single-pass and only valid
/// until the next call into the provider - implementations are free to
/// back them with scratch buffers reused across calls.
pub trait TimetableDataProvider {
    /// One-shot setup hook, e.g. to precompute a service-day mask from a
    /// GTFS calendar. The engine never calls this itself - it only ever
    /// holds a shared reference to a provider, including across the
    /// concurrent searches in `search_many`, so there is no point at
    /// which it could take `&mut self`. Callers that need day-dependent
    /// setup should run it once, with exclusive access, before handing
    /// the provider to the engine.
    fn init(&mut self) {}

    /// Total number of stops, defining the valid `StopId` range `[0, num_stops)`.
    fn num_stops(&self) -> usize;

    /// Number of distinct patterns in the timetable.
    fn num_patterns(&self) -> usize;

    /// Whether the given trip runs on the search day.
    fn is_trip_in_service(&self, pattern: PatternId, trip: TripIndex) -> bool;

    /// Fetch a pattern by id.
    fn pattern(&self, pattern: PatternId) -> Pattern<'_>;

    /// Every pattern visiting at least one stop in `touched_stops`, without
    /// duplicates. Order is unspecified but stable within one call.
    fn patterns_for_stops<'a>(
        &'a self,
        touched_stops: &'a [StopId],
    ) -> Box<dyn Iterator<Item = Pattern<'a>> + 'a>;

    /// Arrival/departure times of `trip` at every position of `pattern`.
    fn trip_times(&self, pattern: PatternId, trip: TripIndex) -> &[StopTime];

    /// Number of trips on `pattern`.
    fn num_trips(&self, pattern: PatternId) -> usize;

    /// Outgoing foot transfers from `from_stop`.
    fn transfers_from(&self, from_stop: StopId) -> &[TransferLeg];
}
