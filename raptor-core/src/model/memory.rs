//! A minimal in-process [`TimetableDataProvider`] implementation.
//!
//! This is the only concrete timetable the crate ships: it exists so the
//! engine is testable and demoable without a GTFS/CSV loader, which stays
//! out of scope. Patterns, trips and transfers are flattened into parallel
//! arrays addressed by offset-and-length pairs rather than nesting
//! `Vec<Vec<_>>`, so a cache line covers many stops or trips at once.

use itertools::Itertools;

use crate::error::RaptorError;
use crate::model::provider::{Pattern, TimetableDataProvider};
use crate::model::types::{PatternId, StopId, StopTime, TransferLeg, TripIndex};

#[derive(Debug, Clone, Copy)]
struct RouteMeta {
    stops_start: usize,
    num_stops: usize,
    trips_start: usize,
    num_trips: usize,
}

#[derive(Debug, Clone, Copy)]
struct StopMeta {
    routes_start: usize,
    routes_len: usize,
    transfers_start: usize,
    transfers_len: usize,
}

/// An in-memory timetable built once (via [`TimetableBuilder`]) and then
/// shared read-only across any number of searches.
#[derive(Debug, Clone, Default)]
pub struct InMemoryTimetable {
    routes: Vec<RouteMeta>,
    route_stops: Vec<StopId>,
    stop_times: Vec<StopTime>,
    /// `service[pattern][trip]`; `true` unless the builder was told otherwise.
    service: Vec<Vec<bool>>,
    stops: Vec<StopMeta>,
    stop_routes: Vec<PatternId>,
    transfers: Vec<TransferLeg>,
}

impl InMemoryTimetable {
    fn route(&self, pattern: PatternId) -> &RouteMeta {
        &self.routes[pattern]
    }
}

impl TimetableDataProvider for InMemoryTimetable {
    fn num_stops(&self) -> usize {
        self.stops.len()
    }

    fn num_patterns(&self) -> usize {
        self.routes.len()
    }

    fn is_trip_in_service(&self, pattern: PatternId, trip: TripIndex) -> bool {
        self.service[pattern][trip]
    }

    fn pattern(&self, pattern: PatternId) -> Pattern<'_> {
        let route = self.route(pattern);
        let stops = &self.route_stops[route.stops_start..route.stops_start + route.num_stops];
        Pattern::new(pattern, stops)
    }

    fn patterns_for_stops<'a>(
        &'a self,
        touched_stops: &'a [StopId],
    ) -> Box<dyn Iterator<Item = Pattern<'a>> + 'a> {
        let mut seen = fixedbitset::FixedBitSet::with_capacity(self.routes.len());
        let mut ordered = Vec::new();
        for &stop in touched_stops {
            let meta = &self.stops[stop];
            for &route_id in
                &self.stop_routes[meta.routes_start..meta.routes_start + meta.routes_len]
            {
                if !seen.put(route_id) {
                    ordered.push(route_id);
                }
            }
        }
        Box::new(ordered.into_iter().map(move |id| self.pattern(id)))
    }

    fn trip_times(&self, pattern: PatternId, trip: TripIndex) -> &[StopTime] {
        let route = self.route(pattern);
        let start = route.trips_start + trip * route.num_stops;
        &self.stop_times[start..start + route.num_stops]
    }

    fn num_trips(&self, pattern: PatternId) -> usize {
        self.route(pattern).num_trips
    }

    fn transfers_from(&self, from_stop: StopId) -> &[TransferLeg] {
        let meta = &self.stops[from_stop];
        &self.transfers[meta.transfers_start..meta.transfers_start + meta.transfers_len]
    }
}

/// Builds an [`InMemoryTimetable`] from patterns and transfers added one at
/// a time, computing the stop-to-routes reverse index on [`build`](Self::build).
#[derive(Debug, Default)]
pub struct TimetableBuilder {
    num_stops: usize,
    route_stops: Vec<Vec<StopId>>,
    route_trips: Vec<Vec<Vec<StopTime>>>,
    route_service: Vec<Vec<bool>>,
    transfers: Vec<Vec<TransferLeg>>,
}

impl TimetableBuilder {
    #[must_use]
    pub fn new(num_stops: usize) -> Self {
        TimetableBuilder {
            num_stops,
            route_stops: Vec::new(),
            route_trips: Vec::new(),
            route_service: Vec::new(),
            transfers: vec![Vec::new(); num_stops],
        }
    }

    /// Adds a pattern with its trips, all marked in-service. Returns the
    /// new pattern's id.
    ///
    /// # Panics
    ///
    /// Panics if `stops` has fewer than 2 entries, any stop is out of
    /// range, or a trip's times are not non-decreasing along the pattern -
    /// these are programmer errors in test/fixture code, not recoverable
    /// runtime conditions.
    pub fn add_pattern(&mut self, stops: Vec<StopId>, trips: Vec<Vec<StopTime>>) -> PatternId {
        assert!(stops.len() >= 2, "a pattern needs at least 2 stops");
        for &stop in &stops {
            assert!(stop < self.num_stops, "stop {stop} out of range");
        }
        for trip in &trips {
            assert_eq!(trip.len(), stops.len(), "trip/pattern length mismatch");
            for pair in trip.windows(2) {
                assert!(
                    pair[0].departure <= pair[1].arrival,
                    "trip times must be non-decreasing along the pattern"
                );
            }
            for st in trip {
                assert!(st.arrival <= st.departure, "arrival must not exceed departure");
            }
        }
        let service = vec![true; trips.len()];
        let id = self.route_stops.len();
        self.route_stops.push(stops);
        self.route_trips.push(trips);
        self.route_service.push(service);
        id
    }

    /// Marks a specific trip as out of service for the search day.
    pub fn set_out_of_service(&mut self, pattern: PatternId, trip: TripIndex) {
        self.route_service[pattern][trip] = false;
    }

    /// Adds a one-directional foot transfer `from_stop -> to_stop`.
    pub fn add_transfer(&mut self, from_stop: StopId, to_stop: StopId, duration_seconds: u32) {
        assert!(from_stop < self.num_stops && to_stop < self.num_stops);
        self.transfers[from_stop].push(TransferLeg {
            from_stop,
            to_stop,
            duration_seconds,
        });
    }

    /// Flattens the accumulated patterns and transfers into an
    /// [`InMemoryTimetable`], sorting each pattern's trips by their
    /// departure time at the first stop (required by the binary-search
    /// trip search).
    ///
    /// # Errors
    ///
    /// Returns [`RaptorError::MonotonicityViolation`] if any pattern's
    /// trips, once sorted, are not consistently ordered at every position
    /// (i.e. trips overtake each other along the route).
    pub fn build(mut self) -> Result<InMemoryTimetable, RaptorError> {
        let mut routes = Vec::with_capacity(self.route_stops.len());
        let mut route_stops = Vec::new();
        let mut stop_times = Vec::new();
        let mut service = Vec::with_capacity(self.route_trips.len());

        for (pattern_id, (stops, mut trips)) in self
            .route_stops
            .drain(..)
            .zip(self.route_trips.drain(..))
            .enumerate()
        {
            let mut order: Vec<usize> = (0..trips.len()).collect();
            order.sort_by_key(|&i| trips[i][0].departure);
            let sorted_service: Vec<bool> = order
                .iter()
                .map(|&i| self.route_service[pattern_id][i])
                .collect();
            // Reorder trips according to `order` without cloning StopTime rows twice.
            let mut sorted_trips = Vec::with_capacity(trips.len());
            for &i in &order {
                sorted_trips.push(std::mem::take(&mut trips[i]));
            }

            for position in 0..stops.len() {
                let mut last = 0;
                for trip in &sorted_trips {
                    if trip[position].departure < last {
                        return Err(RaptorError::MonotonicityViolation {
                            pattern: pattern_id,
                        });
                    }
                    last = trip[position].departure;
                }
            }

            let stops_start = route_stops.len();
            route_stops.extend_from_slice(&stops);
            let trips_start = stop_times.len();
            for trip in &sorted_trips {
                stop_times.extend_from_slice(trip);
            }

            routes.push(RouteMeta {
                stops_start,
                num_stops: stops.len(),
                trips_start,
                num_trips: sorted_trips.len(),
            });
            service.push(sorted_service);
        }

        let mut stop_routes_acc: Vec<Vec<PatternId>> = vec![Vec::new(); self.num_stops];
        for (pattern_id, route) in routes.iter().enumerate() {
            for &stop in &route_stops[route.stops_start..route.stops_start + route.num_stops] {
                stop_routes_acc[stop].push(pattern_id);
            }
        }

        let mut stops = Vec::with_capacity(self.num_stops);
        let mut stop_routes = Vec::new();
        let mut transfers = Vec::new();
        for stop in 0..self.num_stops {
            let routes_start = stop_routes.len();
            let unique_routes: Vec<PatternId> =
                stop_routes_acc[stop].drain(..).unique().collect();
            stop_routes.extend_from_slice(&unique_routes);
            let transfers_start = transfers.len();
            transfers.extend_from_slice(&self.transfers[stop]);
            stops.push(StopMeta {
                routes_start,
                routes_len: unique_routes.len(),
                transfers_start,
                transfers_len: self.transfers[stop].len(),
            });
        }

        Ok(InMemoryTimetable {
            routes,
            route_stops,
            stop_times,
            service,
            stops,
            stop_routes,
            transfers,
        })
    }
}

// Convenience for tests/fixtures that want to look routes up by the stops
// they pass through without going through `TimetableDataProvider`.
impl InMemoryTimetable {
    #[must_use]
    pub fn routes_serving(&self, stop: StopId) -> &[PatternId] {
        let meta = &self.stops[stop];
        &self.stop_routes[meta.routes_start..meta.routes_start + meta.routes_len]
    }
}

#[allow(unused)]
fn _assert_send_sync()
where
    InMemoryTimetable: Send + Sync,
{
}

#[cfg(test)]
mod tests {
    use super::*;

    fn st(arrival: u32, departure: u32) -> StopTime {
        StopTime { arrival, departure }
    }

    #[test]
    fn flattens_a_single_pattern() {
        let mut builder = TimetableBuilder::new(3);
        let pattern = builder.add_pattern(
            vec![0, 1, 2],
            vec![vec![st(0, 0), st(300, 310), st(600, 600)]],
        );
        builder.add_transfer(1, 2, 60);
        let table = builder.build().expect("valid timetable");

        assert_eq!(table.num_stops(), 3);
        assert_eq!(table.num_patterns(), 1);
        assert!(table.is_trip_in_service(pattern, 0));
        assert_eq!(table.pattern(pattern).stops(), &[0, 1, 2]);
        assert_eq!(table.trip_times(pattern, 0)[1], st(300, 310));
        assert_eq!(table.transfers_from(1)[0].to_stop, 2);
        assert_eq!(table.routes_serving(0), &[pattern]);
    }

    #[test]
    fn sorts_trips_by_first_departure() {
        let mut builder = TimetableBuilder::new(2);
        let pattern = builder.add_pattern(
            vec![0, 1],
            vec![
                vec![st(600, 600), st(900, 900)],
                vec![st(0, 0), st(300, 300)],
            ],
        );
        let table = builder.build().unwrap();
        assert_eq!(table.trip_times(pattern, 0)[0].departure, 0);
        assert_eq!(table.trip_times(pattern, 1)[0].departure, 600);
    }

    #[test]
    fn rejects_overtaking_trips() {
        let mut builder = TimetableBuilder::new(2);
        builder.add_pattern(
            vec![0, 1],
            vec![
                vec![st(0, 0), st(1000, 1000)],
                vec![st(100, 100), st(200, 200)],
            ],
        );
        let err = builder.build().unwrap_err();
        assert!(matches!(err, RaptorError::MonotonicityViolation { .. }));
    }

    #[test]
    fn patterns_for_stops_has_no_duplicates() {
        let mut builder = TimetableBuilder::new(3);
        let p0 = builder.add_pattern(vec![0, 1], vec![vec![st(0, 0), st(100, 100)]]);
        let p1 = builder.add_pattern(vec![1, 2], vec![vec![st(0, 0), st(100, 100)]]);
        let table = builder.build().unwrap();
        let touched = [0usize, 1];
        let found: Vec<_> = table.patterns_for_stops(&touched).map(|p| p.id).collect();
        assert_eq!(found.len(), 2);
        assert!(found.contains(&p0));
        assert!(found.contains(&p1));
    }
}
