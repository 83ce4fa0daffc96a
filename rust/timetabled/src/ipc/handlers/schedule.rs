use crate::ipc::error::{err, ok};
use crate::ipc::helpers::{labels_for, optional_str, render_input, timetable};
use crate::ipc::types::{AppState, Request};
use crate::view::{day_view, today_index, week_view, weekly_stats};
use serde_json::{json, Value};

fn handle_schedule_week(state: &mut AppState, req: &Request) -> Value {
    let (key, loaded) = match timetable(state, req) {
        Ok(v) => v,
        Err(e) => return e,
    };
    let student_id = optional_str(req, "studentId");
    let labels = labels_for(state, loaded);
    let input = render_input(state, loaded, &labels, student_id.as_deref());
    let week = week_view(&input);
    ok(
        &req.id,
        json!({
            "key": key,
            "studentId": student_id,
            "labels": week.labels,
            "days": week.days,
            "stats": week.stats,
        }),
    )
}

fn handle_schedule_today(state: &mut AppState, req: &Request) -> Value {
    let (key, loaded) = match timetable(state, req) {
        Ok(v) => v,
        Err(e) => return e,
    };
    let day_index = match req.params.get("dayIndex") {
        None | Some(Value::Null) => today_index(),
        Some(v) => match v.as_u64() {
            Some(n) if n < 7 => n as usize,
            _ => {
                return err(
                    &req.id,
                    "bad_params",
                    "dayIndex must be an integer in 0..=6",
                    Some(json!({ "dayIndex": v })),
                )
            }
        },
    };
    let student_id = optional_str(req, "studentId");
    let labels = labels_for(state, loaded);
    let input = render_input(state, loaded, &labels, student_id.as_deref());
    ok(
        &req.id,
        json!({
            "key": key,
            "labels": labels,
            "day": day_view(&input, day_index),
        }),
    )
}

fn handle_schedule_stats(state: &mut AppState, req: &Request) -> Value {
    let (key, loaded) = match timetable(state, req) {
        Ok(v) => v,
        Err(e) => return e,
    };
    let student_id = optional_str(req, "studentId");
    let labels = labels_for(state, loaded);
    let input = render_input(state, loaded, &labels, student_id.as_deref());
    ok(
        &req.id,
        json!({ "key": key, "stats": weekly_stats(&input) }),
    )
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<Value> {
    match req.method.as_str() {
        "schedule.week" => Some(handle_schedule_week(state, req)),
        "schedule.today" => Some(handle_schedule_today(state, req)),
        "schedule.stats" => Some(handle_schedule_stats(state, req)),
        _ => None,
    }
}
