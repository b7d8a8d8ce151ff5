use fixedbitset::FixedBitSet;

use super::{FrontierEntry, Predecessor, RoundState};
use crate::model::types::{Direction, StopId, Time};

/// Single-criterion worker state: one best arrival per stop per round,
/// plus a global best-known arrival used to prune the search. Round-indexed
/// arrays are never reset between Range-RAPTOR iterations (minutes); only
/// the touched-stop sets and the round counter are.
pub struct SingleCriterionState {
    direction: Direction,
    num_stops: usize,
    max_rounds: usize,

    /// `times[round][stop]`.
    times: Vec<Vec<Time>>,
    /// `predecessors[round][stop]`.
    predecessors: Vec<Vec<Predecessor>>,
    /// Stops touched (transit or transfer) during `round`.
    marked: Vec<FixedBitSet>,
    /// Snapshot of `marked[round]` taken right after the transit phase,
    /// before transfer relaxation unions its own marks in.
    transit_marks: FixedBitSet,

    /// Best time seen at each stop across all rounds and all iterations
    /// run so far - used for target pruning.
    best: Vec<Time>,

    round: usize,
}

impl SingleCriterionState {
    pub fn new(direction: Direction, num_stops: usize, max_rounds: usize) -> Self {
        let unreached = direction.unreached();
        SingleCriterionState {
            direction,
            num_stops,
            max_rounds,
            times: vec![vec![unreached; num_stops]; max_rounds + 1],
            predecessors: vec![vec![Predecessor::None; num_stops]; max_rounds + 1],
            marked: (0..=max_rounds).map(|_| FixedBitSet::with_capacity(num_stops)).collect(),
            transit_marks: FixedBitSet::with_capacity(num_stops),
            best: vec![unreached; num_stops],
            round: 0,
        }
    }
}

impl RoundState for SingleCriterionState {
    fn num_stops(&self) -> usize {
        self.num_stops
    }

    fn max_rounds(&self) -> usize {
        self.max_rounds
    }

    fn setup_iteration(&mut self, _departure_time: Time) {
        self.round = 0;
        for set in &mut self.marked {
            set.clear();
        }
        self.transit_marks.clear();
    }

    fn set_initial_time_for_iteration(&mut self, to_stop: StopId, duration: Time, departure_time: Time) {
        let time = self.direction.apply_transfer(departure_time, duration);
        if self.direction.is_better(time, self.times[0][to_stop]) {
            self.times[0][to_stop] = time;
            self.predecessors[0][to_stop] = Predecessor::Access { duration, departure_time };
            self.marked[0].set(to_stop, true);
            if self.direction.is_better(time, self.best[to_stop]) {
                self.best[to_stop] = time;
            }
        }
    }

    fn is_new_round_available(&self) -> bool {
        self.marked[self.round].count_ones(..) > 0
    }

    fn prepare_for_next_round(&mut self) {
        self.round += 1;
    }

    fn current_round(&self) -> usize {
        self.round
    }

    fn previous_round_time(&self, stop: StopId) -> Time {
        self.times[self.round - 1][stop]
    }

    fn stops_touched_previous_round(&mut self) -> Vec<StopId> {
        let prev = self.round - 1;
        let touched: Vec<StopId> = self.marked[prev].ones().collect();
        self.marked[prev].clear();
        touched
    }

    fn transit_stop_reached(&mut self, stop: StopId, time: Time, predecessor: Predecessor) -> bool {
        let round = self.round;
        if !self.direction.is_better(time, self.times[round][stop]) || !self.direction.is_better(time, self.best[stop]) {
            return false;
        }
        self.times[round][stop] = time;
        self.predecessors[round][stop] = predecessor;
        self.best[stop] = time;
        self.marked[round].set(stop, true);
        true
    }

    fn transits_for_round_complete(&mut self) {
        self.transit_marks.clear();
        self.transit_marks.union_with(&self.marked[self.round]);
    }

    fn stops_touched_by_transit_current_round(&self) -> Vec<StopId> {
        self.transit_marks.ones().collect()
    }

    fn relax_transfer(&mut self, to_stop: StopId, time: Time, predecessor: Predecessor) -> bool {
        let round = self.round;
        if !self.direction.is_better(time, self.times[round][to_stop]) || !self.direction.is_better(time, self.best[to_stop]) {
            return false;
        }
        self.times[round][to_stop] = time;
        self.predecessors[round][to_stop] = predecessor;
        self.best[to_stop] = time;
        self.marked[round].set(to_stop, true);
        true
    }

    fn target_bound(&self, target: Option<StopId>) -> Time {
        match target {
            Some(stop) => self.best[stop],
            None => self.direction.unreached(),
        }
    }

    fn best_time(&self, stop: StopId) -> Time {
        self.best[stop]
    }

    fn iteration_complete(&mut self) {}

    fn frontier(&self, stop: StopId) -> Vec<FrontierEntry> {
        let mut entries = Vec::new();
        let mut best_so_far = self.direction.unreached();
        for round in 0..=self.max_rounds {
            let time = self.times[round][stop];
            if time == self.direction.unreached() {
                continue;
            }
            if entries.is_empty() || self.direction.is_better(time, best_so_far) {
                best_so_far = time;
                entries.push(FrontierEntry {
                    round,
                    time,
                    predecessor: self.predecessors[round][stop],
                });
            }
        }
        entries
    }

    fn time_at(&self, round: usize, stop: StopId) -> Time {
        self.times[round][stop]
    }

    fn predecessor_at(&self, round: usize, stop: StopId) -> Predecessor {
        self.predecessors[round][stop]
    }
}
