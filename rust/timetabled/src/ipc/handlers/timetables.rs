use crate::ipc::error::{err, ok};
use crate::ipc::helpers::{required_str, string_array};
use crate::ipc::types::{AppState, LoadedTimetable, Request};
use crate::slot::parse_grid;
use serde_json::{json, Value};

pub const TEACHER_KEY: &str = "teacher";

fn summarize(key: &str, t: &LoadedTimetable) -> Value {
    json!({
        "key": key,
        "dayCount": t.grid.len(),
        "maxPeriods": t.grid.iter().map(Vec::len).max().unwrap_or(0),
        "timeSlotCount": t.time_slots.len(),
    })
}

fn handle_timetables_load(state: &mut AppState, req: &Request) -> Value {
    let key = match required_str(req, "key") {
        Ok(v) => v,
        Err(e) => return e,
    };
    let Some(raw) = req.params.get("grid") else {
        return err(&req.id, "bad_params", "missing grid", None);
    };
    let loaded = LoadedTimetable {
        grid: parse_grid(raw),
        time_slots: string_array(req.params.get("timeSlots")),
    };
    let summary = summarize(&key, &loaded);
    tracing::info!(key = %key, days = loaded.grid.len(), "timetable loaded");
    state.timetables.insert(key, loaded);
    ok(&req.id, summary)
}

/// Reads a timetable store dump:
/// `{ "generatedTimetables": { className: grid }, "teacherTimetable"?: grid, "timeSlots"?: [..] }`.
fn handle_timetables_import_file(state: &mut AppState, req: &Request) -> Value {
    let path = match required_str(req, "path") {
        Ok(v) => v,
        Err(e) => return e,
    };
    let text = match std::fs::read_to_string(&path) {
        Ok(v) => v,
        Err(e) => {
            return err(
                &req.id,
                "io_failed",
                format!("failed to read {}: {}", path, e),
                None,
            )
        }
    };
    let doc: Value = match serde_json::from_str(&text) {
        Ok(v) => v,
        Err(e) => {
            return err(
                &req.id,
                "bad_json",
                format!("{} is not valid JSON: {}", path, e),
                None,
            )
        }
    };

    let time_slots = string_array(doc.get("timeSlots"));
    let mut loaded = Vec::new();
    if let Some(classes) = doc.get("generatedTimetables").and_then(|v| v.as_object()) {
        for (class_name, grid) in classes {
            loaded.push((
                class_name.clone(),
                LoadedTimetable {
                    grid: parse_grid(grid),
                    time_slots: time_slots.clone(),
                },
            ));
        }
    }
    if let Some(grid) = doc.get("teacherTimetable").filter(|v| !v.is_null()) {
        loaded.push((
            TEACHER_KEY.to_string(),
            LoadedTimetable {
                grid: parse_grid(grid),
                time_slots: time_slots.clone(),
            },
        ));
    }
    if loaded.is_empty() {
        return err(
            &req.id,
            "bad_params",
            "file holds neither generatedTimetables nor teacherTimetable",
            None,
        );
    }

    let summaries: Vec<Value> = loaded.iter().map(|(k, t)| summarize(k, t)).collect();
    tracing::info!(path = %path, count = loaded.len(), "timetables imported");
    for (key, t) in loaded {
        state.timetables.insert(key, t);
    }
    ok(&req.id, json!({ "timetables": summaries }))
}

fn handle_timetables_list(state: &mut AppState, req: &Request) -> Value {
    let items: Vec<Value> = state
        .timetables
        .iter()
        .map(|(k, t)| summarize(k, t))
        .collect();
    ok(&req.id, json!({ "timetables": items }))
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<Value> {
    match req.method.as_str() {
        "timetables.load" => Some(handle_timetables_load(state, req)),
        "timetables.importFile" => Some(handle_timetables_import_file(state, req)),
        "timetables.list" => Some(handle_timetables_list(state, req)),
        _ => None,
    }
}
