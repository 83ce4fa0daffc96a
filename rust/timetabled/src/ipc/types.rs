use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::Deserialize;

use crate::electives::ElectiveBook;
use crate::settings::Settings;
use crate::slot::TimetableGrid;

#[derive(Debug, Deserialize, Clone)]
pub struct Request {
    pub id: String,
    pub method: String,
    #[serde(default)]
    pub params: serde_json::Value,
}

/// A timetable handed over by the timetable store, with its own slot labels if it has any.
#[derive(Debug, Clone, Default)]
pub struct LoadedTimetable {
    pub grid: TimetableGrid,
    pub time_slots: Vec<String>,
}

#[derive(Debug, Default)]
pub struct AppState {
    pub workspace: Option<PathBuf>,
    pub settings: Settings,
    pub timetables: BTreeMap<String, LoadedTimetable>,
    pub electives: ElectiveBook,
}
