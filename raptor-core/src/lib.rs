//! Range-RAPTOR: a round-based public transit journey planner.
//!
//! The engine is organized by concern, one module per stage of a search:
//!
//! - [`model`] - the timetable data model and the [`TimetableDataProvider`](model::TimetableDataProvider)
//!   contract a caller implements over their own data, plus the in-memory
//!   reference implementation this crate ships for testing and demos.
//! - [`calculator`] - [`Direction`](model::Direction)'s forward/reverse
//!   arithmetic, the one place search direction is decided.
//! - [`trip_search`] - the Trip Schedule Search kernel.
//! - [`state`] - the Worker State: [`SingleCriterionState`](state::SingleCriterionState)
//!   and [`MultiCriterionState`](state::MultiCriterionState).
//! - [`path`] - the Path Extractor, turning back-pointer chains into
//!   rider-facing [`Journey`](path::Journey) records.
//! - [`context`] - [`Request`](context::Request)/[`SearchContext`](context::SearchContext),
//!   the validated, immutable bundle a worker is built from.
//! - [`worker`] - the Range-RAPTOR Worker: [`worker::search`] and
//!   [`worker::search_many`], the two entry points callers use.
//! - [`instrumentation`] - the opt-in, no-op-by-default hook a caller can
//!   implement to observe round/iteration timings.
//!
//! Everything a typical caller needs is re-exported from [`prelude`].

pub mod calculator;
pub mod context;
pub mod error;
pub mod instrumentation;
pub mod model;
pub mod path;
pub mod state;
pub mod trip_search;
pub mod worker;

/// Re-exports covering a typical search: build a provider, wrap a
/// [`Request`](context::Request) in a [`SearchContext`](context::SearchContext),
/// call [`search`](worker::search), and read back [`Journey`](path::Journey) legs.
pub mod prelude {
    pub use crate::context::{AccessLeg, Request, SearchContext, TripSearchStrategy, TuningParams};
    pub use crate::error::RaptorError;
    pub use crate::model::{
        Criteria, Direction, InMemoryTimetable, Pattern, StopId, StopTime, TimetableBuilder,
        TimetableDataProvider, Time, TransferLeg, TripIndex,
    };
    pub use crate::path::{Journey, JourneyLeg};
    pub use crate::worker::{search, search_many};
}
