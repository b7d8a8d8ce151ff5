//! Search Context / Request: the immutable bundle a worker is built
//! from. Validation runs once here, never inside the search loop.

use std::sync::atomic::AtomicBool;

use chrono::NaiveDate;
use log::debug;

use crate::error::RaptorError;
use crate::model::provider::TimetableDataProvider;
use crate::model::types::{Criteria, Direction, StopId, Time};

/// An access or egress leg: a walk between a real stop and the implicit
/// street endpoint the rider starts from or ends at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AccessLeg {
    pub stop: StopId,
    pub duration: Time,
}

/// Which [`TripScheduleSearch`](crate::trip_search::TripScheduleSearch)
/// strategy a worker constructs its per-pattern searches with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TripSearchStrategy {
    /// Always binary-search from scratch - the cold-query default.
    #[default]
    Binary,
    /// Resume scanning from the previous query's hint when the bound
    /// allows it; only useful within one pattern traversal.
    Scanning,
}

/// A journey-planning request, independent of any one timetable instance.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Request {
    pub access_legs: Vec<AccessLeg>,
    pub egress_legs: Vec<AccessLeg>,
    pub earliest_departure: Time,
    pub latest_departure: Time,
    pub search_date: NaiveDate,
    pub direction: Direction,
    pub criteria: Criteria,
}

/// Tuning knobs that do not change the meaning of a search, only its cost
/// and the shape of the boarding rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TuningParams {
    pub max_number_of_transfers: usize,
    pub board_slack_seconds: Time,
    pub alight_slack_seconds: Time,
    pub trip_search_strategy: TripSearchStrategy,
}

impl Default for TuningParams {
    fn default() -> Self {
        TuningParams {
            max_number_of_transfers: 12,
            board_slack_seconds: 0,
            alight_slack_seconds: 0,
            trip_search_strategy: TripSearchStrategy::default(),
        }
    }
}

impl TuningParams {
    /// Validates a raw, possibly-negative transfer bound coming from an
    /// external caller (JSON, CLI, ...) before it is trusted as a `usize`.
    pub fn with_max_transfers(mut self, max_number_of_transfers: i64) -> Result<Self, RaptorError> {
        if max_number_of_transfers < 0 {
            return Err(RaptorError::InvalidMaxTransfers(max_number_of_transfers));
        }
        self.max_number_of_transfers = max_number_of_transfers as usize;
        Ok(self)
    }
}

/// The immutable bundle a [`RangeRaptorWorker`](crate::worker::RangeRaptorWorker)
/// is built from: the request, tuning parameters, and a handle to the
/// timetable. Validated once at construction.
pub struct SearchContext<'p, 'c, P: TimetableDataProvider + ?Sized> {
    provider: &'p P,
    request: Request,
    tuning: TuningParams,
    cancelled: Option<&'c AtomicBool>,
}

impl<'p, 'c, P: TimetableDataProvider + ?Sized> SearchContext<'p, 'c, P> {
    /// Validates `request` and `tuning` against `provider` and builds a
    /// context, or rejects the request before any search loop runs.
    pub fn new(
        provider: &'p P,
        request: Request,
        tuning: TuningParams,
    ) -> Result<Self, RaptorError> {
        Self::with_cancellation(provider, request, tuning, None)
    }

    pub fn with_cancellation(
        provider: &'p P,
        request: Request,
        tuning: TuningParams,
        cancelled: Option<&'c AtomicBool>,
    ) -> Result<Self, RaptorError> {
        if request.access_legs.is_empty() {
            return Err(RaptorError::EmptyAccessLegs);
        }
        if request.earliest_departure > request.latest_departure {
            return Err(RaptorError::InvalidDepartureWindow {
                earliest: request.earliest_departure,
                latest: request.latest_departure,
            });
        }
        let num_stops = provider.num_stops();
        for leg in request.access_legs.iter().chain(request.egress_legs.iter()) {
            if leg.stop >= num_stops {
                return Err(RaptorError::InvalidStop(leg.stop));
            }
        }
        debug!(
            "validated request: {} access leg(s), {} egress leg(s), window [{}, {}]",
            request.access_legs.len(),
            request.egress_legs.len(),
            request.earliest_departure,
            request.latest_departure,
        );
        Ok(SearchContext {
            provider,
            request,
            tuning,
            cancelled,
        })
    }

    pub fn provider(&self) -> &'p P {
        self.provider
    }

    pub fn request(&self) -> &Request {
        &self.request
    }

    pub fn tuning(&self) -> &TuningParams {
        &self.tuning
    }

    /// `true` once a caller has asked the search to stop early. Checked by
    /// the worker at round boundaries only, never inside the inner loop.
    pub fn is_cancelled(&self) -> bool {
        self.cancelled
            .map(|flag| flag.load(std::sync::atomic::Ordering::Relaxed))
            .unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{InMemoryTimetable, TimetableBuilder};

    fn empty_table(num_stops: usize) -> InMemoryTimetable {
        TimetableBuilder::new(num_stops).build().unwrap()
    }

    fn base_request() -> Request {
        Request {
            access_legs: vec![AccessLeg { stop: 0, duration: 60 }],
            egress_legs: vec![AccessLeg { stop: 1, duration: 60 }],
            earliest_departure: 0,
            latest_departure: 3_600,
            search_date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            direction: Direction::Forward,
            criteria: Criteria::MinArrival,
        }
    }

    #[test]
    fn rejects_empty_access_legs() {
        let table = empty_table(2);
        let mut request = base_request();
        request.access_legs.clear();
        let err = SearchContext::new(&table, request, TuningParams::default()).unwrap_err();
        assert_eq!(err, RaptorError::EmptyAccessLegs);
    }

    #[test]
    fn rejects_inverted_departure_window() {
        let table = empty_table(2);
        let mut request = base_request();
        request.earliest_departure = 100;
        request.latest_departure = 50;
        let err = SearchContext::new(&table, request, TuningParams::default()).unwrap_err();
        assert_eq!(
            err,
            RaptorError::InvalidDepartureWindow { earliest: 100, latest: 50 }
        );
    }

    #[test]
    fn rejects_out_of_range_egress_stop() {
        let table = empty_table(2);
        let mut request = base_request();
        request.egress_legs = vec![AccessLeg { stop: 5, duration: 30 }];
        let err = SearchContext::new(&table, request, TuningParams::default()).unwrap_err();
        assert_eq!(err, RaptorError::InvalidStop(5));
    }

    #[test]
    fn rejects_negative_max_transfers() {
        let err = TuningParams::default().with_max_transfers(-1).unwrap_err();
        assert_eq!(err, RaptorError::InvalidMaxTransfers(-1));
    }

    #[test]
    fn accepts_a_well_formed_request() {
        let table = empty_table(2);
        let ctx = SearchContext::new(&table, base_request(), TuningParams::default()).unwrap();
        assert!(!ctx.is_cancelled());
    }
}
