//! Worker State: per-round best arrivals per stop, back-pointers,
//! touched-stop sets, and the iteration lifecycle the Range-RAPTOR worker
//! drives every outer-loop minute.
//!
//! Two concrete variants share the [`RoundState`] trait: [`SingleCriterionState`]
//! tracks one best arrival per stop per round (and a global best used for
//! target pruning); [`MultiCriterionState`] additionally resists collapsing
//! onto a single scalar bound, so it only prunes a candidate when it is
//! genuinely dominated by an existing frontier entry.

mod multi;
mod single;

pub use multi::MultiCriterionState;
pub use single::SingleCriterionState;

use crate::model::types::{PatternId, StopId, Time, TripIndex};

/// How a stop's best time in some round was reached, enough to walk the
/// journey back to its access leg.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Predecessor {
    /// This stop has not been reached.
    None,
    /// Seeded directly by an access leg at the start of round 0.
    Access { duration: Time, departure_time: Time },
    /// Reached by riding `trip` of `pattern`, boarded at `board_stop` at `board_time`.
    Transit {
        pattern: PatternId,
        trip: TripIndex,
        board_stop: StopId,
        board_time: Time,
    },
    /// Reached by a foot transfer from `from_stop`.
    Transfer { from_stop: StopId, duration: Time },
}

/// One non-dominated (round, time) record for a stop, as exposed to the
/// Path Extractor by [`RoundState::frontier`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrontierEntry {
    pub round: usize,
    pub time: Time,
    pub predecessor: Predecessor,
}

/// The interface the Range-RAPTOR worker drives every round.
pub trait RoundState {
    fn num_stops(&self) -> usize;
    fn max_rounds(&self) -> usize;

    /// Begin a new outer-loop minute. Does not clear state carried from
    /// later minutes (Range-RAPTOR reuse); resets per-iteration scratch
    /// (touched-stop sets, round counter) only.
    fn setup_iteration(&mut self, departure_time: Time);

    /// Seed round 0 with an access arrival at `stop`.
    fn set_initial_time_for_iteration(
        &mut self,
        stop: StopId,
        duration: Time,
        departure_time: Time,
    );

    /// `true` iff the round just completed - round 0's access-leg seeding,
    /// or the transit-plus-transfer phases of a later round - touched any
    /// stops, meaning another round is worth running.
    fn is_new_round_available(&self) -> bool;

    /// Advance the round counter.
    fn prepare_for_next_round(&mut self);

    fn current_round(&self) -> usize;

    /// The board/alight bound to feed the trip search at `stop`, taken
    /// from the previous round's result.
    fn previous_round_time(&self, stop: StopId) -> Time;

    /// Stops touched (by transit or transfer) in the previous round;
    /// clears the underlying previous-round touched set as it is consumed,
    /// since it is never needed again once read.
    fn stops_touched_previous_round(&mut self) -> Vec<StopId>;

    /// Attempt to improve the current round's time at `stop`. Returns
    /// `true` iff the update was a genuine improvement (and should mark
    /// the stop as touched by transit).
    fn transit_stop_reached(
        &mut self,
        stop: StopId,
        time: Time,
        predecessor: Predecessor,
    ) -> bool;

    /// Hook called once the transit phase of a round has finished,
    /// before transfer relaxation begins.
    fn transits_for_round_complete(&mut self);

    /// Stops touched by transit (not transfer) in the current round -
    /// the snapshot [`transits_for_round_complete`](Self::transits_for_round_complete) took.
    fn stops_touched_by_transit_current_round(&self) -> Vec<StopId>;

    /// Attempt to improve the current round's time at `to_stop` via a
    /// transfer from an already-transit-reached stop.
    fn relax_transfer(
        &mut self,
        to_stop: StopId,
        time: Time,
        predecessor: Predecessor,
    ) -> bool;

    /// Hook called once transfer relaxation for a round has finished.
    fn transfers_for_round_complete(&mut self) {}

    /// The target-pruning bound to compare a candidate time against while
    /// searching toward `target` (or `Time::MAX`/`0` with no target).
    fn target_bound(&self, target: Option<StopId>) -> Time;

    /// Best time reached at `stop` across all rounds processed so far.
    fn best_time(&self, stop: StopId) -> Time;

    /// Make defensive copies of anything the next iteration may overwrite
    /// but which path extraction will still need.
    fn iteration_complete(&mut self);

    /// The non-dominated (round, time) records accumulated for `stop`
    /// across every iteration run so far.
    fn frontier(&self, stop: StopId) -> Vec<FrontierEntry>;

    /// The raw (possibly dominated) time recorded for `stop` in exactly
    /// `round` - used by the Path Extractor to walk a back-pointer chain,
    /// which may pass through a round that [`frontier`](Self::frontier)
    /// itself would filter out as non-optimal at that stop.
    fn time_at(&self, round: usize, stop: StopId) -> Time;

    /// The raw predecessor recorded for `stop` in exactly `round`.
    fn predecessor_at(&self, round: usize, stop: StopId) -> Predecessor;
}
