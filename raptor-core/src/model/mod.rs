//! Timetable data model: stop/pattern/trip types, the provider contract,
//! and the in-memory reference implementation.

pub mod memory;
pub mod provider;
pub mod types;

pub use memory::{InMemoryTimetable, TimetableBuilder};
pub use provider::{Pattern, TimetableDataProvider};
pub use types::{
    Criteria, Direction, PatternId, StopId, StopTime, Time, TransferLeg, TripIndex,
};
