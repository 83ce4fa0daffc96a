//! Timetable rendering engine and its JSON-lines sidecar.
//!
//! The engine turns a raw day-by-period grid plus a list of time-slot labels
//! into classified, display-ready slots, weekly statistics and export
//! artifacts. `ipc` wraps it for the desktop shell.

pub mod align;
pub mod classify;
pub mod electives;
pub mod export;
pub mod ipc;
pub mod labels;
pub mod matrix;
pub mod settings;
pub mod slot;
pub mod stats;
pub mod view;
