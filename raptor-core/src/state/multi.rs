use fixedbitset::FixedBitSet;

use super::{FrontierEntry, Predecessor, RoundState};
use crate::model::types::{Direction, StopId, Time};

/// One non-dominated (time, predecessor) label kept at a stop for a round.
#[derive(Clone, Copy)]
struct Label {
    time: Time,
    predecessor: Predecessor,
}

/// Multi-criterion worker state (McRAPTOR). Differs from [`SingleCriterionState`](super::SingleCriterionState)
/// in where domination is decided: rather than collapsing every round down
/// to one scalar best-known time, each stop keeps an explicit per-round
/// label and the target-pruning bound is read off the whole frontier, so a
/// later round is only pruned when some earlier round already reached it
/// at least as early - never merely because some *other* round did.
pub struct MultiCriterionState {
    direction: Direction,
    num_stops: usize,
    max_rounds: usize,

    /// `labels[round][stop]`, `None` meaning "not reached in this round".
    labels: Vec<Vec<Option<Label>>>,
    marked: Vec<FixedBitSet>,
    transit_marks: FixedBitSet,

    round: usize,
}

impl MultiCriterionState {
    pub fn new(direction: Direction, num_stops: usize, max_rounds: usize) -> Self {
        MultiCriterionState {
            direction,
            num_stops,
            max_rounds,
            labels: vec![vec![None; num_stops]; max_rounds + 1],
            marked: (0..=max_rounds).map(|_| FixedBitSet::with_capacity(num_stops)).collect(),
            transit_marks: FixedBitSet::with_capacity(num_stops),
            round: 0,
        }
    }

    /// `true` iff `time` is dominated by some already-recorded round at
    /// `stop` no later than `round` - i.e. an earlier-or-equal transfer
    /// count reached at least as good a time already.
    fn dominated(&self, stop: StopId, round: usize, time: Time) -> bool {
        for r in 0..=round {
            if let Some(label) = self.labels[r][stop] {
                if self.direction.is_at_least_as_good(label.time, time) {
                    return true;
                }
            }
        }
        false
    }
}

impl RoundState for MultiCriterionState {
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
        if !self.dominated(to_stop, 0, time) {
            self.labels[0][to_stop] = Some(Label {
                time,
                predecessor: Predecessor::Access { duration, departure_time },
            });
            self.marked[0].set(to_stop, true);
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
        self.labels[self.round - 1][stop]
            .map(|l| l.time)
            .unwrap_or_else(|| self.direction.unreached())
    }

    fn stops_touched_previous_round(&mut self) -> Vec<StopId> {
        let prev = self.round - 1;
        let touched: Vec<StopId> = self.marked[prev].ones().collect();
        self.marked[prev].clear();
        touched
    }

    fn transit_stop_reached(&mut self, stop: StopId, time: Time, predecessor: Predecessor) -> bool {
        let round = self.round;
        if self.dominated(stop, round, time) {
            return false;
        }
        self.labels[round][stop] = Some(Label { time, predecessor });
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
        if self.dominated(to_stop, round, time) {
            return false;
        }
        self.labels[round][to_stop] = Some(Label { time, predecessor });
        self.marked[round].set(to_stop, true);
        true
    }

    fn target_bound(&self, target: Option<StopId>) -> Time {
        match target {
            // No single scalar captures the frontier; the best *any* round
            // has reached is still a valid (if looser) pruning bound.
            Some(stop) => (0..=self.round)
                .filter_map(|r| self.labels[r][stop])
                .map(|l| l.time)
                .fold(self.direction.unreached(), |best, t| {
                    if self.direction.is_better(t, best) { t } else { best }
                }),
            None => self.direction.unreached(),
        }
    }

    fn best_time(&self, stop: StopId) -> Time {
        self.target_bound(Some(stop))
    }

    fn iteration_complete(&mut self) {}

    fn frontier(&self, stop: StopId) -> Vec<FrontierEntry> {
        let mut entries = Vec::new();
        for round in 0..=self.max_rounds {
            if let Some(label) = self.labels[round][stop] {
                if !entries.iter().any(|e: &FrontierEntry| {
                    self.direction.is_at_least_as_good(e.time, label.time)
                }) {
                    entries.push(FrontierEntry {
                        round,
                        time: label.time,
                        predecessor: label.predecessor,
                    });
                }
            }
        }
        entries
    }

    fn time_at(&self, round: usize, stop: StopId) -> Time {
        self.labels[round][stop]
            .map(|l| l.time)
            .unwrap_or_else(|| self.direction.unreached())
    }

    fn predecessor_at(&self, round: usize, stop: StopId) -> Predecessor {
        self.labels[round][stop]
            .map(|l| l.predecessor)
            .unwrap_or(Predecessor::None)
    }
}
