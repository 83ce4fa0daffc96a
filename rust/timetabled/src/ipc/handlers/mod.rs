pub mod core;
pub mod electives;
pub mod export;
pub mod schedule;
pub mod setup;
pub mod timetables;
