//! Trip Schedule Search: the inner kernel that, given a pattern and an
//! earliest-boarding (forward) or latest-alighting (reverse) time at a
//! stop position, finds the best catchable trip.
//!
//! Two strategies share one [`TripScheduleSearch`] trait: [`BinaryTripSearch`]
//! always does a fresh binary search (the "cold" strategy), and
//! [`ScanningTripSearch`] additionally remembers the last query so that a
//! later, no-worse-bound query on the same pattern can resume scanning
//! from the previously found trip instead of searching from scratch - the
//! monotone scan amortization that makes repeated queries against the same
//! pattern during a Range-RAPTOR sweep cheap.

use crate::model::provider::TimetableDataProvider;
use crate::model::types::{Direction, PatternId, Time, TripIndex};

/// Returns `true` if `trip` should be skipped (out of service, a frequency
/// trip not modeled by exact departures, ...).
pub type SkipPredicate<'a> = &'a dyn Fn(TripIndex) -> bool;

/// Finds the earliest trip (forward) / latest trip (reverse) of one
/// pattern that is catchable at a given position and not skipped.
pub trait TripScheduleSearch {
    /// Returns `(trip, time_at_position)` for the best catchable trip, or
    /// `None` if no in-service trip satisfies `bound`.
    fn find(&mut self, position: usize, bound: Time) -> Option<(TripIndex, Time)>;
}

/// A stateless binary search over a pattern's trips at a fixed position.
/// Requires the provider's trips to be sorted so that the time at
/// `position` is monotonic across trip index - the [`TimetableBuilder`](crate::model::TimetableBuilder)
/// guarantees this for [`InMemoryTimetable`](crate::model::InMemoryTimetable).
pub struct BinaryTripSearch<'d, P: TimetableDataProvider + ?Sized> {
    provider: &'d P,
    pattern: PatternId,
    direction: Direction,
    skip: Box<dyn Fn(TripIndex) -> bool + 'd>,
}

impl<'d, P: TimetableDataProvider + ?Sized> BinaryTripSearch<'d, P> {
    pub fn new(
        provider: &'d P,
        pattern: PatternId,
        direction: Direction,
        skip: impl Fn(TripIndex) -> bool + 'd,
    ) -> Self {
        BinaryTripSearch {
            provider,
            pattern,
            direction,
            skip: Box::new(skip),
        }
    }

    fn time_at(&self, trip: TripIndex, position: usize) -> Time {
        let times = self.provider.trip_times(self.pattern, trip);
        match self.direction {
            Direction::Forward => times[position].departure,
            Direction::Reverse => times[position].arrival,
        }
    }

    /// The scan-range bound to use for a search with no usable hint: the
    /// start of the trip array for forward search (leftmost = earliest),
    /// the end of the trip array for reverse search (rightmost = latest).
    fn full_range_bound(&self) -> usize {
        match self.direction {
            Direction::Forward => 0,
            Direction::Reverse => self.provider.num_trips(self.pattern).saturating_sub(1),
        }
    }

    /// Binary search for the leftmost (forward) / rightmost (reverse) trip
    /// satisfying the bound, then linear-scan past skipped trips. `range_bound`
    /// is the low end of the search range for forward (trips before it are
    /// known not to satisfy any relevant bound) and the high end for reverse.
    fn search_from(&self, position: usize, bound: Time, range_bound: usize) -> Option<TripIndex> {
        let num_trips = self.provider.num_trips(self.pattern);
        if num_trips == 0 {
            return None;
        }
        let candidate = match self.direction {
            Direction::Forward => {
                let mut low = range_bound.min(num_trips);
                let mut high = num_trips;
                while low < high {
                    let mid = low + (high - low) / 2;
                    if self.time_at(mid, position) >= bound {
                        high = mid;
                    } else {
                        low = mid + 1;
                    }
                }
                let mut idx = low;
                while idx < num_trips {
                    if !(self.skip)(idx) {
                        return Some(idx);
                    }
                    idx += 1;
                }
                return None;
            }
            Direction::Reverse => {
                let mut low = 0usize;
                let mut high = range_bound.min(num_trips.saturating_sub(1)) + 1;
                let mut best: Option<usize> = None;
                while low < high {
                    let mid = low + (high - low) / 2;
                    if self.time_at(mid, position) <= bound {
                        best = Some(mid);
                        low = mid + 1;
                    } else {
                        high = mid;
                    }
                }
                best
            }
        };
        let mut idx = candidate?;
        loop {
            if !(self.skip)(idx) {
                return Some(idx);
            }
            if idx == 0 {
                return None;
            }
            idx -= 1;
            if self.time_at(idx, position) > bound {
                return None;
            }
        }
    }
}

impl<'d, P: TimetableDataProvider + ?Sized> TripScheduleSearch for BinaryTripSearch<'d, P> {
    fn find(&mut self, position: usize, bound: Time) -> Option<(TripIndex, Time)> {
        let range_bound = self.full_range_bound();
        let trip = self.search_from(position, bound, range_bound)?;
        Some((trip, self.time_at(trip, position)))
    }
}

/// Wraps a [`BinaryTripSearch`] with a last-query hint so that a sequence
/// of queries with a monotonically improving bound (later positions along
/// one pattern traversal) can resume from the previously found trip
/// instead of re-running the binary search from scratch.
pub struct ScanningTripSearch<'d, P: TimetableDataProvider + ?Sized> {
    inner: BinaryTripSearch<'d, P>,
    hint: Option<(Time, TripIndex)>,
}

impl<'d, P: TimetableDataProvider + ?Sized> ScanningTripSearch<'d, P> {
    pub fn new(
        provider: &'d P,
        pattern: PatternId,
        direction: Direction,
        skip: impl Fn(TripIndex) -> bool + 'd,
    ) -> Self {
        ScanningTripSearch {
            inner: BinaryTripSearch::new(provider, pattern, direction, skip),
            hint: None,
        }
    }
}

impl<'d, P: TimetableDataProvider + ?Sized> TripScheduleSearch for ScanningTripSearch<'d, P> {
    fn find(&mut self, position: usize, bound: Time) -> Option<(TripIndex, Time)> {
        // Resume scanning from the previous hit only when the new bound
        // moves in the direction that keeps the answer at the same trip
        // index or later (forward) / same index or earlier (reverse). A
        // bound moving the other way falls back to a fresh full-range search.
        let resumable = match self.hint {
            Some((last_bound, _)) => match self.inner.direction {
                Direction::Forward => bound >= last_bound,
                Direction::Reverse => bound <= last_bound,
            },
            None => false,
        };
        let scan_start = if resumable {
            self.hint.unwrap().1
        } else {
            self.inner.full_range_bound()
        };
        let trip = self.inner.search_from(position, bound, scan_start)?;
        let time = self.inner.time_at(trip, position);
        self.hint = Some((bound, trip));
        Some((trip, time))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{StopTime, TimetableBuilder};

    fn st(arrival: u32, departure: u32) -> StopTime {
        StopTime { arrival, departure }
    }

    fn sample_table() -> crate::model::InMemoryTimetable {
        let mut b = TimetableBuilder::new(3);
        b.add_pattern(
            vec![0, 1, 2],
            vec![
                vec![st(0, 0), st(100, 110), st(200, 200)],
                vec![st(600, 600), st(700, 710), st(800, 800)],
                vec![st(1200, 1200), st(1300, 1310), st(1400, 1400)],
            ],
        );
        b.build().unwrap()
    }

    #[test]
    fn binary_search_finds_earliest_catchable_trip() {
        let table = sample_table();
        let mut search = BinaryTripSearch::new(&table, 0, Direction::Forward, |_| false);
        let (trip, time) = search.find(0, 50).unwrap();
        assert_eq!(trip, 1);
        assert_eq!(time, 600);
    }

    #[test]
    fn binary_search_returns_none_past_last_trip() {
        let table = sample_table();
        let mut search = BinaryTripSearch::new(&table, 0, Direction::Forward, |_| false);
        assert!(search.find(0, 1_201).is_none());
    }

    #[test]
    fn skip_predicate_excludes_out_of_service_trips() {
        let table = sample_table();
        let mut search = BinaryTripSearch::new(&table, 0, Direction::Forward, |trip| trip == 1);
        let (trip, _) = search.find(0, 50).unwrap();
        assert_eq!(trip, 2);
    }

    #[test]
    fn scanning_search_resumes_from_hint_on_improving_bound() {
        let table = sample_table();
        let mut search = ScanningTripSearch::new(&table, 0, Direction::Forward, |_| false);
        let (first, _) = search.find(0, 50).unwrap();
        assert_eq!(first, 1);
        // A later bound should resume forward from the same trip, not rescan.
        let (second, _) = search.find(0, 650).unwrap();
        assert_eq!(second, 2);
    }

    #[test]
    fn reverse_search_finds_latest_alightable_trip() {
        let table = sample_table();
        let mut search = BinaryTripSearch::new(&table, 0, Direction::Reverse, |_| false);
        let (trip, time) = search.find(2, 900).unwrap();
        assert_eq!(trip, 1);
        assert_eq!(time, 800);
    }
}
