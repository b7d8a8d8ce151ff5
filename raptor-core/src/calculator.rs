//! The Transit Calculator: every operation whose meaning depends on
//! search direction, collected behind one small enum so the worker body
//! stays direction-agnostic.
//!
//! This is a tagged variant dispatched at the handful of hotspots below
//! rather than a trait object - the worker picks its `Direction` once at
//! construction, so there is no virtual dispatch inside the per-stop
//! inner loop.

use crate::model::types::Direction;
use crate::model::Time;

impl Direction {
    /// Departure (forward) / arrival (reverse) minutes to run the range
    /// loop over, from `earliest` to `latest` inclusive, in the order the
    /// range loop should visit them: forward runs latest-to-earliest so
    /// that later minutes' state can seed earlier minutes' searches;
    /// reverse runs earliest-to-latest for the symmetric reason.
    #[must_use]
    pub fn range_raptor_minutes(self, earliest: Time, latest: Time) -> Box<dyn Iterator<Item = Time>> {
        match self {
            Direction::Forward => Box::new((earliest..=latest).rev()),
            Direction::Reverse => Box::new(earliest..=latest),
        }
    }

    /// Stop positions of a pattern of length `len`, in the order the
    /// worker should scan them: forward is front-to-back (boarding then
    /// riding toward later stops), reverse is back-to-front.
    #[must_use]
    pub fn pattern_stop_iterator(self, len: usize) -> Box<dyn Iterator<Item = usize>> {
        match self {
            Direction::Forward => Box::new(0..len),
            Direction::Reverse => Box::new((0..len).rev()),
        }
    }

    /// `true` iff `candidate` is a strict improvement over `incumbent`:
    /// earlier for forward search, later for reverse search.
    #[must_use]
    pub fn is_better(self, candidate: Time, incumbent: Time) -> bool {
        match self {
            Direction::Forward => candidate < incumbent,
            Direction::Reverse => candidate > incumbent,
        }
    }

    /// `true` iff `candidate` is at least as good as `incumbent` (used by
    /// the target-pruning comparisons, which must not reject ties that a
    /// strict `is_better` would also reject but which still bound search).
    #[must_use]
    pub fn is_at_least_as_good(self, candidate: Time, incumbent: Time) -> bool {
        match self {
            Direction::Forward => candidate <= incumbent,
            Direction::Reverse => candidate >= incumbent,
        }
    }

    /// Earliest time at which a transit leg may be boarded/alighted given
    /// a stop's current best time and the configured slack: forward adds
    /// board slack to an arrival before it may be used to board; reverse
    /// subtracts alight slack from an arrival before it may be used to
    /// alight (symmetric in time).
    #[must_use]
    pub fn boarding_bound(self, stop_time: Time, board_slack: Time, alight_slack: Time) -> Time {
        match self {
            Direction::Forward => stop_time.saturating_add(board_slack),
            Direction::Reverse => stop_time.saturating_sub(alight_slack),
        }
    }

    /// The sentinel meaning "not yet reached" for this direction: `Time::MAX`
    /// for forward (anything is earlier), `0` for reverse (anything is later).
    #[must_use]
    pub fn unreached(self) -> Time {
        match self {
            Direction::Forward => Time::MAX,
            Direction::Reverse => 0,
        }
    }

    /// Applies a transfer duration to a time, in the direction-appropriate
    /// sense: forward walks forward in time, reverse walks backward.
    #[must_use]
    pub fn apply_transfer(self, time: Time, duration: Time) -> Time {
        match self {
            Direction::Forward => time.saturating_add(duration),
            Direction::Reverse => time.saturating_sub(duration),
        }
    }

    #[must_use]
    pub fn is_forward(self) -> bool {
        matches!(self, Direction::Forward)
    }
}
