//! Path Extractor: walks the back-pointer chains a [`RoundState`]
//! accumulates and turns them into rider-facing [`Journey`] records.

use crate::error::RaptorError;
use crate::model::provider::TimetableDataProvider;
use crate::model::types::{Direction, PatternId, StopId, Time, TripIndex};
use crate::state::{Predecessor, RoundState};

/// One leg of a reconstructed journey, always ordered earliest-first in
/// wall-clock time regardless of which search direction produced it.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum JourneyLeg {
    Access {
        to_stop: StopId,
        duration: Time,
    },
    Transit {
        pattern: PatternId,
        trip: TripIndex,
        board_stop: StopId,
        board_time: Time,
        alight_stop: StopId,
        alight_time: Time,
    },
    Transfer {
        from_stop: StopId,
        to_stop: StopId,
        duration: Time,
    },
    Egress {
        from_stop: StopId,
        duration: Time,
    },
}

/// A complete, non-dominated itinerary. `legs` from [`reconstruct`] holds
/// everything between the round-0 seed leg and the reached stop; the
/// worker appends the opposite bookend (the leg that was never part of
/// the round loop, since it only links the reached stop to the other side
/// of the request) once it knows which of the request's leg lists that is.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Journey {
    pub departure_time: Time,
    pub arrival_time: Time,
    pub transfers: usize,
    pub legs: Vec<JourneyLeg>,
}

/// Reconstructs every non-dominated journey to `target` recorded in
/// `state`'s frontier, walking each entry's predecessor chain back to the
/// leg that seeded round 0.
///
/// In a forward search round 0 is seeded at the true origin, so that leg
/// is a genuine [`JourneyLeg::Access`] and `target` is the rider's last
/// reached stop before egress. In a reverse search round 0 is seeded at
/// the egress-adjacent stop (the search grows backward in time from
/// there), so the seed leg is really the journey's egress and `target` is
/// the stop closest to the true origin - the two are mirror images of one
/// another, so the leg ordering and labeling below are chosen to make the
/// returned `Journey` read identically either way.
pub fn reconstruct<P: TimetableDataProvider + ?Sized>(
    provider: &P,
    state: &dyn RoundState,
    direction: Direction,
    target: StopId,
) -> Result<Vec<Journey>, RaptorError> {
    let mut journeys = Vec::new();
    for entry in state.frontier(target) {
        let (legs, anchor_time) = walk_back(provider, state, direction, target, entry.round)?;
        // A round counts transit legs, not transfers: round 0 is access-only
        // (only reachable here if `target` sits right on an access/egress
        // leg with no transit at all), and each transit leg after the first
        // is one transfer, so `transfers = round.saturating_sub(1)`.
        let transfers = entry.round.saturating_sub(1);
        let journey = if direction.is_forward() {
            Journey { departure_time: anchor_time, arrival_time: entry.time, transfers, legs }
        } else {
            Journey { departure_time: entry.time, arrival_time: anchor_time, transfers, legs }
        };
        journeys.push(journey);
    }
    Ok(journeys)
}

fn walk_back<P: TimetableDataProvider + ?Sized>(
    provider: &P,
    state: &dyn RoundState,
    direction: Direction,
    mut stop: StopId,
    mut round: usize,
) -> Result<(Vec<JourneyLeg>, Time), RaptorError> {
    let mut legs = Vec::new();
    // Round 0's own recorded time/predecessor is overwritten on every
    // minute of the range loop whenever a strictly better access arrival
    // turns up, regardless of whether that minute is the one consistent
    // with the boarding actually recorded higher up the chain - by the
    // time the full sweep finishes it reflects the best access arrival
    // seen across the whole window, not necessarily the one that fed this
    // journey. The transit leg nearest round 0 carries a real, stable
    // schedule time instead, so the access/egress bookend is timed off of
    // that leg whenever one exists.
    let mut nearest_transit_board_time: Option<Time> = None;

    loop {
        let predecessor = state.predecessor_at(round, stop);
        match predecessor {
            Predecessor::None => return Err(RaptorError::InvalidJourney),
            Predecessor::Access { duration, departure_time } => {
                let anchor_time = match (direction.is_forward(), nearest_transit_board_time) {
                    (true, Some(board_time)) => board_time.saturating_sub(duration),
                    (false, Some(board_time)) => board_time.saturating_add(duration),
                    (_, None) => departure_time,
                };
                legs.push(if direction.is_forward() {
                    JourneyLeg::Access { to_stop: stop, duration }
                } else {
                    JourneyLeg::Egress { from_stop: stop, duration }
                });
                if direction.is_forward() {
                    legs.reverse();
                }
                return Ok((legs, anchor_time));
            }
            Predecessor::Transfer { from_stop, duration } => {
                legs.push(JourneyLeg::Transfer { from_stop, to_stop: stop, duration });
                stop = from_stop;
                // A transfer does not consume a round; it was relaxed
                // within the same round as the transit leg that fed it.
            }
            Predecessor::Transit {
                pattern,
                trip,
                board_stop,
                board_time,
            } => {
                if pattern >= provider.num_patterns() {
                    return Err(RaptorError::InvalidPattern(pattern));
                }
                nearest_transit_board_time = Some(board_time);
                let alight_time = state.time_at(round, stop);
                legs.push(JourneyLeg::Transit {
                    pattern,
                    trip,
                    board_stop,
                    board_time,
                    alight_stop: stop,
                    alight_time,
                });
                stop = board_stop;
                if round == 0 {
                    return Err(RaptorError::InvalidJourney);
                }
                round -= 1;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{InMemoryTimetable, StopTime, TimetableBuilder};

    fn st(arrival: u32, departure: u32) -> StopTime {
        StopTime { arrival, departure }
    }

    fn one_pattern_table() -> InMemoryTimetable {
        let mut b = TimetableBuilder::new(3);
        b.add_pattern(
            vec![0, 1, 2],
            vec![vec![st(0, 0), st(100, 110), st(200, 200)]],
        );
        b.build().unwrap()
    }

    struct FakeState {
        predecessors: Vec<Vec<Predecessor>>,
        times: Vec<Vec<Time>>,
    }

    impl RoundState for FakeState {
        fn num_stops(&self) -> usize {
            3
        }
        fn max_rounds(&self) -> usize {
            1
        }
        fn setup_iteration(&mut self, _: Time) {}
        fn set_initial_time_for_iteration(&mut self, _: StopId, _: Time, _: Time) {}
        fn is_new_round_available(&self) -> bool {
            false
        }
        fn prepare_for_next_round(&mut self) {}
        fn current_round(&self) -> usize {
            1
        }
        fn previous_round_time(&self, _: StopId) -> Time {
            0
        }
        fn stops_touched_previous_round(&mut self) -> Vec<StopId> {
            Vec::new()
        }
        fn transit_stop_reached(&mut self, _: StopId, _: Time, _: Predecessor) -> bool {
            false
        }
        fn transits_for_round_complete(&mut self) {}
        fn stops_touched_by_transit_current_round(&self) -> Vec<StopId> {
            Vec::new()
        }
        fn relax_transfer(&mut self, _: StopId, _: Time, _: Predecessor) -> bool {
            false
        }
        fn target_bound(&self, _: Option<StopId>) -> Time {
            Time::MAX
        }
        fn best_time(&self, stop: StopId) -> Time {
            self.times[self.times.len() - 1][stop]
        }
        fn iteration_complete(&mut self) {}
        fn frontier(&self, stop: StopId) -> Vec<crate::state::FrontierEntry> {
            vec![crate::state::FrontierEntry {
                round: 1,
                time: self.times[1][stop],
                predecessor: self.predecessors[1][stop],
            }]
        }
        fn time_at(&self, round: usize, stop: StopId) -> Time {
            self.times[round][stop]
        }
        fn predecessor_at(&self, round: usize, stop: StopId) -> Predecessor {
            self.predecessors[round][stop]
        }
    }

    #[test]
    fn reconstructs_one_transit_leg_from_an_access_leg() {
        let table = one_pattern_table();
        let mut predecessors = vec![vec![Predecessor::None; 3]; 2];
        let mut times = vec![vec![Time::MAX; 3]; 2];
        predecessors[0][0] = Predecessor::Access { duration: 0, departure_time: 0 };
        times[0][0] = 0;
        predecessors[1][2] = Predecessor::Transit {
            pattern: 0,
            trip: 0,
            board_stop: 0,
            board_time: 0,
        };
        times[1][2] = 200;
        let state = FakeState { predecessors, times };

        let journeys = reconstruct(&table, &state, Direction::Forward, 2).unwrap();
        assert_eq!(journeys.len(), 1);
        let journey = &journeys[0];
        assert_eq!(journey.departure_time, 0);
        assert_eq!(journey.arrival_time, 200);
        assert_eq!(journey.transfers, 0);
        assert_eq!(journey.legs.len(), 2);
        assert!(matches!(journey.legs[0], JourneyLeg::Access { to_stop: 0, duration: 0 }));
        assert!(matches!(
            journey.legs[1],
            JourneyLeg::Transit { board_stop: 0, alight_stop: 2, alight_time: 200, .. }
        ));
    }

    #[test]
    fn reverse_search_labels_the_seed_leg_as_egress_and_keeps_chronological_order() {
        let table = one_pattern_table();
        let mut predecessors = vec![vec![Predecessor::None; 3]; 2];
        let mut times = vec![vec![Time::MAX; 3]; 2];
        // Round 0 seeded at stop 2 (egress-adjacent); anchor_time 300 is the
        // true arrival bound at the destination.
        predecessors[0][2] = Predecessor::Access { duration: 0, departure_time: 300 };
        times[0][2] = 300;
        // Round 1 at stop 0 (origin-adjacent), reached by riding backward
        // from stop 2 (round 0's seed).
        predecessors[1][0] = Predecessor::Transit {
            pattern: 0,
            trip: 0,
            board_stop: 2,
            board_time: 300,
        };
        times[1][0] = 0;
        let state = FakeState { predecessors, times };

        let journeys = reconstruct(&table, &state, Direction::Reverse, 0).unwrap();
        assert_eq!(journeys.len(), 1);
        let journey = &journeys[0];
        assert_eq!(journey.departure_time, 0);
        assert_eq!(journey.arrival_time, 300);
        assert_eq!(journey.legs.len(), 2);
        assert!(matches!(
            journey.legs[0],
            JourneyLeg::Transit { board_stop: 2, alight_stop: 0, .. }
        ));
        assert!(matches!(journey.legs[1], JourneyLeg::Egress { from_stop: 2, duration: 0 }));
    }
}
