use crate::electives::ElectiveGroup;
use crate::ipc::error::{elective_err, err, ok};
use crate::ipc::helpers::{required_str, string_or_array};
use crate::ipc::types::{AppState, Request};
use serde_json::{json, Value};

fn handle_electives_set_groups(state: &mut AppState, req: &Request) -> Value {
    let Some(raw) = req.params.get("groups") else {
        return err(&req.id, "bad_params", "missing groups", None);
    };
    let groups: Vec<ElectiveGroup> = match serde_json::from_value(raw.clone()) {
        Ok(v) => v,
        Err(e) => {
            return err(
                &req.id,
                "bad_params",
                format!("groups must be a list of elective groups: {}", e),
                None,
            )
        }
    };
    state.electives.set_groups(groups);
    ok(
        &req.id,
        json!({ "groupCount": state.electives.groups().len() }),
    )
}

fn handle_electives_list(state: &mut AppState, req: &Request) -> Value {
    let student_id = match required_str(req, "studentId") {
        Ok(v) => v,
        Err(e) => return e,
    };
    let student = state.electives.student(&student_id);
    let groups: Vec<Value> = state
        .electives
        .groups()
        .iter()
        .map(|g| {
            let selection = student.and_then(|s| s.selections.get(&g.group_name));
            let draft = student
                .map(|s| s.draft(&g.group_name).to_vec())
                .unwrap_or_default();
            json!({
                "groupName": g.group_name,
                "chooseCount": g.choose_count,
                "options": g.options,
                "selection": selection,
                "locked": student.map(|s| s.selections.is_locked(&g.group_name)).unwrap_or(false),
                "draft": draft,
            })
        })
        .collect();
    ok(&req.id, json!({ "studentId": student_id, "groups": groups }))
}

fn handle_electives_save(state: &mut AppState, req: &Request) -> Value {
    let student_id = match required_str(req, "studentId") {
        Ok(v) => v,
        Err(e) => return e,
    };
    let group_name = match required_str(req, "groupName") {
        Ok(v) => v,
        Err(e) => return e,
    };
    let Some(values) = string_or_array(req.params.get("value")) else {
        return err(
            &req.id,
            "bad_params",
            "value must be a string or an array of strings",
            None,
        );
    };
    match state
        .electives
        .save_student_elective(&student_id, &group_name, &values)
    {
        Ok(selection) => ok(
            &req.id,
            json!({ "groupName": group_name, "selection": selection, "locked": true }),
        ),
        Err(e) => elective_err(&req.id, e),
    }
}

fn handle_electives_draft_toggle(state: &mut AppState, req: &Request) -> Value {
    let student_id = match required_str(req, "studentId") {
        Ok(v) => v,
        Err(e) => return e,
    };
    let group_name = match required_str(req, "groupName") {
        Ok(v) => v,
        Err(e) => return e,
    };
    let option = match required_str(req, "option") {
        Ok(v) => v,
        Err(e) => return e,
    };
    match state
        .electives
        .toggle_draft(&student_id, &group_name, &option)
    {
        Ok(draft) => ok(&req.id, json!({ "groupName": group_name, "draft": draft })),
        Err(e) => elective_err(&req.id, e),
    }
}

fn handle_electives_confirm_draft(state: &mut AppState, req: &Request) -> Value {
    let student_id = match required_str(req, "studentId") {
        Ok(v) => v,
        Err(e) => return e,
    };
    let group_name = match required_str(req, "groupName") {
        Ok(v) => v,
        Err(e) => return e,
    };
    match state.electives.confirm_draft(&student_id, &group_name) {
        Ok(selection) => ok(
            &req.id,
            json!({ "groupName": group_name, "selection": selection, "locked": true }),
        ),
        Err(e) => elective_err(&req.id, e),
    }
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<Value> {
    match req.method.as_str() {
        "electives.setGroups" => Some(handle_electives_set_groups(state, req)),
        "electives.list" => Some(handle_electives_list(state, req)),
        "electives.save" => Some(handle_electives_save(state, req)),
        "electives.draftToggle" => Some(handle_electives_draft_toggle(state, req)),
        "electives.confirmDraft" => Some(handle_electives_confirm_draft(state, req)),
        _ => None,
    }
}
