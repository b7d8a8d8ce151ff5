use raptor_core::prelude::InMemoryTimetable;

/// Shared, read-only application state: one timetable built once at
/// startup and handed to every search as a borrow.
pub struct AppState {
    pub timetable: InMemoryTimetable,
}
