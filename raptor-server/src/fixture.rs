//! The process-wide demo timetable this surface searches against. Real
//! GTFS ingestion is out of scope; this exists so `/search` has something
//! to answer with.

use raptor_core::prelude::{InMemoryTimetable, StopTime, TimetableBuilder};

fn st(arrival: u32, departure: u32) -> StopTime {
    StopTime { arrival, departure }
}

/// Five stops and two crossing bus routes meeting at a shared interchange
/// stop, each running half-hourly from 06:00 to 10:00.
///
/// ```text
/// Route A: 0 --- 1 --- 2
/// Route B: 3 --- 1 --- 4
/// ```
pub fn demo_timetable() -> InMemoryTimetable {
    let mut builder = TimetableBuilder::new(5);

    let route_a: Vec<Vec<StopTime>> = (0..8)
        .map(|run| {
            let base = 6 * 3600 + run * 1800;
            vec![st(base, base), st(base + 600, base + 660), st(base + 1200, base + 1200)]
        })
        .collect();
    builder.add_pattern(vec![0, 1, 2], route_a);

    let route_b: Vec<Vec<StopTime>> = (0..8)
        .map(|run| {
            let base = 6 * 3600 + 300 + run * 1800;
            vec![st(base, base), st(base + 540, base + 600), st(base + 1100, base + 1100)]
        })
        .collect();
    builder.add_pattern(vec![3, 1, 4], route_b);

    builder.build().expect("demo timetable is internally consistent")
}
