//! Range-RAPTOR Worker: the outer minute loop and round loop that
//! orchestrate the Trip Schedule Search against the Worker State,
//! plus the `search_many` helper for embarrassingly-parallel fan-out
//! across independent requests.

use std::time::Instant;

use hashbrown::HashSet;
use log::{debug, trace, warn};
use rayon::prelude::*;

use crate::context::{AccessLeg, Request, SearchContext, TripSearchStrategy};
use crate::error::RaptorError;
use crate::instrumentation::{Instrumentation, NoopInstrumentation};
use crate::model::provider::TimetableDataProvider;
use crate::model::types::{Criteria, Direction, StopId, Time};
use crate::path::{self, Journey, JourneyLeg};
use crate::state::{MultiCriterionState, Predecessor, RoundState, SingleCriterionState};
use crate::trip_search::{BinaryTripSearch, ScanningTripSearch, TripScheduleSearch};

/// Runs one search end to end, dispatching to single- or multi-criterion
/// state depending on `request.criteria`.
pub fn search<P: TimetableDataProvider + ?Sized>(
    context: &SearchContext<'_, '_, P>,
) -> Result<Vec<Journey>, RaptorError> {
    let num_stops = context.provider().num_stops();
    // A round is one transit leg; `max_number_of_transfers` transfers take
    // one more leg than that to ride, so the round ceiling is one higher.
    let max_rounds = context.tuning().max_number_of_transfers + 1;
    let direction = context.request().direction;
    match context.request().criteria {
        Criteria::MinArrival => {
            let state = SingleCriterionState::new(direction, num_stops, max_rounds);
            RangeRaptorWorker::new(context, state).run()
        }
        Criteria::Pareto => {
            let state = MultiCriterionState::new(direction, num_stops, max_rounds);
            RangeRaptorWorker::new(context, state).run()
        }
    }
}

/// Runs [`search`] for each of `requests` in parallel, one worker per
/// request, over a shared read-only provider. A single search is
/// strictly sequential, so `rayon` is used only to parallelize
/// *between* independent searches, never within one.
pub fn search_many<P: TimetableDataProvider + Sync + ?Sized>(
    provider: &P,
    requests: Vec<Request>,
    tuning: crate::context::TuningParams,
) -> Vec<Result<Vec<Journey>, RaptorError>> {
    requests
        .into_par_iter()
        .map(|request| {
            let context = SearchContext::new(provider, request, tuning)?;
            search(&context)
        })
        .collect()
}

/// Orchestrates one search: the outer Range-RAPTOR minute loop and the
/// per-minute round loop, generic over the [`RoundState`] variant so the
/// loop body is written once for both single- and multi-criterion search.
pub struct RangeRaptorWorker<'ctx, 'p, 'c, P, S, I = NoopInstrumentation>
where
    P: TimetableDataProvider + ?Sized,
    S: RoundState,
    I: Instrumentation,
{
    context: &'ctx SearchContext<'p, 'c, P>,
    state: S,
    instrumentation: I,
}

impl<'ctx, 'p, 'c, P, S> RangeRaptorWorker<'ctx, 'p, 'c, P, S, NoopInstrumentation>
where
    P: TimetableDataProvider + ?Sized,
    S: RoundState,
{
    pub fn new(context: &'ctx SearchContext<'p, 'c, P>, state: S) -> Self {
        RangeRaptorWorker { context, state, instrumentation: NoopInstrumentation }
    }
}

impl<'ctx, 'p, 'c, P, S, I> RangeRaptorWorker<'ctx, 'p, 'c, P, S, I>
where
    P: TimetableDataProvider + ?Sized,
    S: RoundState,
    I: Instrumentation,
{
    pub fn with_instrumentation(
        context: &'ctx SearchContext<'p, 'c, P>,
        state: S,
        instrumentation: I,
    ) -> Self {
        RangeRaptorWorker { context, state, instrumentation }
    }

    /// Runs the full minute/round loop and extracts the Pareto set of
    /// journeys between the request's two leg lists.
    pub fn run(&mut self) -> Result<Vec<Journey>, RaptorError> {
        let request = self.context.request();
        let tuning = self.context.tuning();
        let provider = self.context.provider();
        let direction = request.direction;

        // A forward search grows from the access legs toward the egress
        // legs; a reverse search grows backward in time from the egress
        // legs toward the access legs. The round loop below is identical
        // either way - only which leg list seeds round 0 differs.
        let (seed_legs, target_legs): (&[AccessLeg], &[AccessLeg]) = if direction.is_forward() {
            (&request.access_legs, &request.egress_legs)
        } else {
            (&request.egress_legs, &request.access_legs)
        };

        for minute in direction.range_raptor_minutes(request.earliest_departure, request.latest_departure) {
            let iteration_started = Instant::now();
            self.instrumentation.on_iteration_start(minute);

            self.state.setup_iteration(minute);
            for leg in seed_legs {
                self.state.set_initial_time_for_iteration(leg.stop, leg.duration, minute);
            }

            let mut rounds_executed = 0usize;
            while self.state.is_new_round_available() && !self.context.is_cancelled() {
                self.state.prepare_for_next_round();
                if self.state.current_round() > self.state.max_rounds() {
                    break;
                }
                let round_started = Instant::now();
                self.instrumentation.on_round_start(self.state.current_round());

                self.run_transit_round(provider, direction, tuning.board_slack_seconds, tuning.alight_slack_seconds, tuning.trip_search_strategy)?;
                let touched = self.run_transfer_round(provider, direction);

                rounds_executed += 1;
                self.instrumentation.on_round_end(self.state.current_round(), touched, round_started.elapsed());
            }
            self.state.iteration_complete();
            trace!("minute {minute}: {rounds_executed} round(s) executed");
            self.instrumentation.on_iteration_end(rounds_executed, iteration_started.elapsed());
        }

        debug!("range-raptor sweep complete over [{}, {}]", request.earliest_departure, request.latest_departure);
        self.extract_journeys(provider, direction, target_legs)
    }

    fn run_transit_round(
        &mut self,
        provider: &P,
        direction: Direction,
        board_slack: Time,
        alight_slack: Time,
        strategy: TripSearchStrategy,
    ) -> Result<(), RaptorError> {
        let touched = self.state.stops_touched_previous_round();
        if touched.is_empty() {
            return Ok(());
        }
        let touched_set: HashSet<StopId> = touched.iter().copied().collect();

        for pattern in provider.patterns_for_stops(&touched) {
            let pattern_id = pattern.id;
            let mut search: Box<dyn TripScheduleSearch + '_> = match strategy {
                TripSearchStrategy::Binary => Box::new(BinaryTripSearch::new(
                    provider,
                    pattern_id,
                    direction,
                    move |trip| !provider.is_trip_in_service(pattern_id, trip),
                )),
                TripSearchStrategy::Scanning => Box::new(ScanningTripSearch::new(
                    provider,
                    pattern_id,
                    direction,
                    move |trip| !provider.is_trip_in_service(pattern_id, trip),
                )),
            };

            let mut boarded: Option<(crate::model::types::TripIndex, StopId, Time)> = None;
            for position in direction.pattern_stop_iterator(pattern.len()) {
                let stop = pattern.stop_at(position);

                if let Some((trip, board_stop, board_time)) = boarded {
                    let times = provider.trip_times(pattern_id, trip);
                    let time_here = match direction {
                        Direction::Forward => times[position].arrival,
                        Direction::Reverse => times[position].departure,
                    };
                    self.state.transit_stop_reached(
                        stop,
                        time_here,
                        Predecessor::Transit { pattern: pattern_id, trip, board_stop, board_time },
                    );
                }

                if touched_set.contains(&stop) {
                    let prev_time = self.state.previous_round_time(stop);
                    if prev_time != direction.unreached() {
                        let bound = direction.boarding_bound(prev_time, board_slack, alight_slack);
                        if let Some((new_trip, new_time)) = search.find(position, bound) {
                            let improves = match boarded {
                                None => true,
                                Some((_, _, current_time)) => direction.is_better(new_time, current_time),
                            };
                            if improves {
                                boarded = Some((new_trip, stop, new_time));
                            }
                        }
                    }
                }
            }
        }
        Ok(())
    }

    /// Relaxes every outgoing transfer from stops touched by transit this
    /// round. Returns the number of stops touched by transit, for
    /// instrumentation only.
    fn run_transfer_round(&mut self, provider: &P, direction: Direction) -> usize {
        self.state.transits_for_round_complete();
        let touched = self.state.stops_touched_by_transit_current_round();
        let round = self.state.current_round();
        let touched_count = touched.len();

        for stop in touched {
            let base_time = self.state.time_at(round, stop);
            for transfer in provider.transfers_from(stop) {
                if transfer.to_stop >= self.state.num_stops() {
                    warn!("transfer from stop {stop} targets out-of-range stop {}; skipping", transfer.to_stop);
                    continue;
                }
                let candidate = direction.apply_transfer(base_time, transfer.duration_seconds);
                self.state.relax_transfer(
                    transfer.to_stop,
                    candidate,
                    Predecessor::Transfer { from_stop: stop, duration: transfer.duration_seconds },
                );
            }
        }
        self.state.transfers_for_round_complete();
        touched_count
    }

    /// Reconstructs journeys to every stop in `target_legs`, appends the
    /// bookend leg the round loop never touched, and coalesces duplicates.
    fn extract_journeys(
        &self,
        provider: &P,
        direction: Direction,
        target_legs: &[AccessLeg],
    ) -> Result<Vec<Journey>, RaptorError> {
        let mut journeys = Vec::new();
        for leg in target_legs {
            for mut journey in path::reconstruct(provider, &self.state, direction, leg.stop)? {
                if direction.is_forward() {
                    journey.arrival_time = journey.arrival_time.saturating_add(leg.duration);
                    journey.legs.push(JourneyLeg::Egress { from_stop: leg.stop, duration: leg.duration });
                } else {
                    journey.departure_time = journey.departure_time.saturating_sub(leg.duration);
                    journey.legs.insert(0, JourneyLeg::Access { to_stop: leg.stop, duration: leg.duration });
                }
                journeys.push(journey);
            }
        }

        journeys.sort_by_key(|j| (j.departure_time, j.arrival_time, j.transfers));
        journeys.dedup_by(|a, b| {
            a.departure_time == b.departure_time && a.arrival_time == b.arrival_time && a.transfers == b.transfers
        });
        Ok(journeys)
    }
}
