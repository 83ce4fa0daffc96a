use crate::ipc::error::err;
use crate::ipc::types::{AppState, LoadedTimetable, Request};
use crate::labels::{parse_labels, LabelDescriptor};
use crate::view::RenderInput;

pub fn required_str(req: &Request, key: &str) -> Result<String, serde_json::Value> {
    req.params
        .get(key)
        .and_then(|v| v.as_str())
        .map(|v| v.trim().to_string())
        .filter(|s| !s.is_empty())
        .ok_or_else(|| err(&req.id, "bad_params", format!("missing {}", key), None))
}

pub fn optional_str(req: &Request, key: &str) -> Option<String> {
    req.params
        .get(key)
        .and_then(|v| v.as_str())
        .map(|v| v.trim().to_string())
        .filter(|s| !s.is_empty())
}

/// Accepts a string or an array of strings.
pub fn string_or_array(v: Option<&serde_json::Value>) -> Option<Vec<String>> {
    match v? {
        serde_json::Value::String(s) => Some(vec![s.clone()]),
        serde_json::Value::Array(items) => items
            .iter()
            .map(|i| i.as_str().map(|s| s.to_string()))
            .collect(),
        _ => None,
    }
}

pub fn string_array(v: Option<&serde_json::Value>) -> Vec<String> {
    v.and_then(|v| v.as_array())
        .map(|items| {
            items
                .iter()
                .filter_map(|i| i.as_str())
                .map(|s| s.to_string())
                .collect()
        })
        .unwrap_or_default()
}

pub fn timetable<'a>(
    state: &'a AppState,
    req: &Request,
) -> Result<(String, &'a LoadedTimetable), serde_json::Value> {
    let key = required_str(req, "key")?;
    match state.timetables.get(&key) {
        Some(t) => Ok((key, t)),
        None => Err(err(
            &req.id,
            "not_found",
            format!("no timetable loaded for {}", key),
            None,
        )),
    }
}

/// The timetable's own slot list wins over the configured one.
pub fn labels_for(state: &AppState, loaded: &LoadedTimetable) -> Vec<LabelDescriptor> {
    if loaded.time_slots.is_empty() {
        parse_labels(&state.settings.time_slots)
    } else {
        parse_labels(&loaded.time_slots)
    }
}

pub fn render_input<'a>(
    state: &'a AppState,
    loaded: &'a LoadedTimetable,
    labels: &'a [LabelDescriptor],
    student_id: Option<&str>,
) -> RenderInput<'a> {
    RenderInput {
        grid: &loaded.grid,
        labels,
        working_days: state.settings.working_days,
        hours_per_day: state.settings.hours_per_day,
        day_names: &state.settings.day_names,
        period_minutes_fallback: state.settings.period_minutes_fallback,
        resolver: state.electives.resolver(student_id),
    }
}
