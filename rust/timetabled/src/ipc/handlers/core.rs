use crate::ipc::error::{err, ok};
use crate::ipc::types::{AppState, Request};
use crate::settings::{Settings, SETTINGS_FILE};
use serde_json::json;
use std::path::PathBuf;

fn handle_health(state: &mut AppState, req: &Request) -> serde_json::Value {
    ok(
        &req.id,
        json!({
            "version": env!("CARGO_PKG_VERSION"),
            "workspacePath": state.workspace.as_ref().map(|p| p.to_string_lossy().to_string()),
            "timetables": state.timetables.len(),
        }),
    )
}

fn handle_workspace_select(state: &mut AppState, req: &Request) -> serde_json::Value {
    let p = req
        .params
        .get("path")
        .and_then(|v| v.as_str())
        .map(PathBuf::from);
    let Some(path) = p else {
        return err(&req.id, "bad_params", "missing params.path", None);
    };

    if let Err(e) = std::fs::create_dir_all(&path) {
        return err(&req.id, "workspace_open_failed", e.to_string(), None);
    }

    // A broken settings file must not prevent the workspace from opening.
    let (source, settings_error) = match Settings::load_from_workspace(&path) {
        Ok(Some(settings)) => {
            state.settings = settings;
            ("file", None)
        }
        Ok(None) => {
            state.settings = Settings::default();
            ("defaults", None)
        }
        Err(e) => {
            tracing::warn!(error = %format!("{e:#}"), "ignoring workspace settings file");
            state.settings = Settings::default();
            ("defaults", Some(format!("{e:#}")))
        }
    };

    state.workspace = Some(path.clone());
    tracing::info!(path = %path.to_string_lossy(), settings = source, "workspace selected");
    ok(
        &req.id,
        json!({
            "workspacePath": path.to_string_lossy(),
            "settingsSource": source,
            "settingsFile": SETTINGS_FILE,
            "settingsError": settings_error,
        }),
    )
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "health" => Some(handle_health(state, req)),
        "workspace.select" => Some(handle_workspace_select(state, req)),
        _ => None,
    }
}
