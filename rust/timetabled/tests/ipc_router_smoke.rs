mod test_support;

use serde_json::json;
use test_support::{request, request_ok, spawn_sidecar, temp_dir};

#[test]
fn router_dispatch_smoke_covers_handler_families() {
    let workspace = temp_dir("timetabled-router-smoke");
    let text_out = workspace.join("smoke.txt");

    let (mut child, mut stdin, mut reader) = spawn_sidecar();

    let health = request_ok(&mut stdin, &mut reader, "1", "health", json!({}));
    assert_eq!(health.get("timetables").and_then(|v| v.as_u64()), Some(0));

    let _ = request_ok(
        &mut stdin,
        &mut reader,
        "2",
        "workspace.select",
        json!({ "path": workspace.to_string_lossy() }),
    );
    let _ = request_ok(&mut stdin, &mut reader, "3", "setup.get", json!({}));
    let _ = request_ok(
        &mut stdin,
        &mut reader,
        "4",
        "timetables.load",
        json!({ "key": "7A", "grid": [["Math", "Science"], ["Art"]] }),
    );
    let _ = request_ok(&mut stdin, &mut reader, "5", "timetables.list", json!({}));
    let _ = request_ok(&mut stdin, &mut reader, "6", "schedule.week", json!({ "key": "7A" }));
    let _ = request_ok(
        &mut stdin,
        &mut reader,
        "7",
        "schedule.today",
        json!({ "key": "7A", "dayIndex": 0 }),
    );
    let _ = request_ok(&mut stdin, &mut reader, "8", "schedule.stats", json!({ "key": "7A" }));
    let _ = request_ok(
        &mut stdin,
        &mut reader,
        "9",
        "electives.setGroups",
        json!({ "groups": [{ "groupName": "Group A", "chooseCount": 1, "options": ["Music"] }] }),
    );
    let _ = request_ok(
        &mut stdin,
        &mut reader,
        "10",
        "electives.list",
        json!({ "studentId": "s1" }),
    );
    let _ = request_ok(&mut stdin, &mut reader, "11", "export.matrix", json!({ "key": "7A" }));
    let _ = request_ok(
        &mut stdin,
        &mut reader,
        "12",
        "export.text",
        json!({ "key": "7A", "outPath": text_out.to_string_lossy() }),
    );
    assert!(text_out.is_file());

    let unknown = request(&mut stdin, &mut reader, "13", "nope.nothing", json!({}));
    assert_eq!(
        unknown
            .get("error")
            .and_then(|e| e.get("code"))
            .and_then(|v| v.as_str()),
        Some("not_implemented")
    );

    drop(stdin);
    let _ = child.wait();
    let _ = std::fs::remove_dir_all(workspace);
}

#[test]
fn malformed_line_gets_bad_json_and_loop_survives() {
    use std::io::{BufRead, Write};

    let (mut child, mut stdin, mut reader) = spawn_sidecar();
    writeln!(stdin, "{{not json").expect("write garbage");
    stdin.flush().expect("flush");
    let mut line = String::new();
    reader.read_line(&mut line).expect("read bad_json line");
    let v: serde_json::Value = serde_json::from_str(line.trim()).expect("json reply");
    assert_eq!(v.get("ok").and_then(|v| v.as_bool()), Some(false));
    assert_eq!(
        v.get("error")
            .and_then(|e| e.get("code"))
            .and_then(|v| v.as_str()),
        Some("bad_json")
    );

    let health = request_ok(&mut stdin, &mut reader, "2", "health", json!({}));
    assert!(health.get("version").and_then(|v| v.as_str()).is_some());

    drop(stdin);
    let _ = child.wait();
}
