use crate::export::{render_artifact, write_artifact, ExportFormat};
use crate::ipc::error::{err, ok};
use crate::ipc::helpers::{labels_for, optional_str, timetable};
use crate::ipc::types::{AppState, Request};
use crate::matrix::{build_matrix, filename_stem, ExportMatrix};
use serde_json::{json, Value};
use std::path::PathBuf;

/// Matrix plus the identifier used for titles and file names (defaults to the key).
fn matrix_for(state: &AppState, req: &Request) -> Result<(ExportMatrix, String), Value> {
    let (key, loaded) = timetable(state, req)?;
    let identifier = optional_str(req, "identifier").unwrap_or(key);
    let student_id = optional_str(req, "studentId");
    let labels = labels_for(state, loaded);
    let matrix = build_matrix(
        &loaded.grid,
        &labels,
        state.settings.working_days,
        &state.settings.day_names,
        &state.electives.resolver(student_id.as_deref()),
    );
    Ok((matrix, identifier))
}

fn handle_export_matrix(state: &mut AppState, req: &Request) -> Value {
    let (matrix, identifier) = match matrix_for(state, req) {
        Ok(v) => v,
        Err(e) => return e,
    };
    ok(
        &req.id,
        json!({
            "identifier": identifier,
            "filenameStem": filename_stem(&identifier),
            "matrix": matrix,
        }),
    )
}

fn handle_export_file(state: &mut AppState, req: &Request, format: ExportFormat) -> Value {
    let (matrix, identifier) = match matrix_for(state, req) {
        Ok(v) => v,
        Err(e) => return e,
    };
    let artifact = match render_artifact(format, &matrix, &identifier, &state.settings) {
        Ok(v) => v,
        Err(e) => return err(&req.id, "export_failed", format!("{e:#}"), None),
    };

    let out_path = match optional_str(req, "outPath") {
        Some(p) => PathBuf::from(p),
        None => match state.workspace.as_ref() {
            Some(ws) => ws.join("exports").join(&artifact.file_name),
            None => {
                return err(
                    &req.id,
                    "no_workspace",
                    "select a workspace or pass outPath",
                    None,
                )
            }
        },
    };

    if let Err(e) = write_artifact(&out_path, &artifact) {
        return err(&req.id, "export_failed", format!("{e:#}"), None);
    }
    ok(
        &req.id,
        json!({
            "path": out_path.to_string_lossy(),
            "fileName": artifact.file_name,
            "bytes": artifact.bytes.len(),
            "rowCount": matrix.rows.len(),
            "columnCount": matrix.column_count(),
        }),
    )
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<Value> {
    let kind = req.method.strip_prefix("export.")?;
    if kind == "matrix" {
        return Some(handle_export_matrix(state, req));
    }
    ExportFormat::parse(kind).map(|format| handle_export_file(state, req, format))
}
