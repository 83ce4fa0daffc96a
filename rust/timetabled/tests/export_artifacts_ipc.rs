mod test_support;

use serde_json::json;
use sha2::{Digest, Sha256};
use std::io::Read;
use test_support::{request_err, request_ok, spawn_sidecar, temp_dir};

fn load_sample(
    stdin: &mut std::process::ChildStdin,
    reader: &mut std::io::BufReader<std::process::ChildStdout>,
) {
    let _ = request_ok(
        stdin,
        reader,
        "load",
        "timetables.load",
        json!({
            "key": "7A",
            "grid": [
                ["Math", "Free", "Science"],
                ["English", "Break", "History"],
                ["Art", "Free", "Math"]
            ],
            "timeSlots": ["9:00 - 10:00", "10:00 - 10:15 (BREAK)", "10:15 - 11:15", "11:15-12:00 (LUNCH)"]
        }),
    );
}

#[test]
fn matrix_matches_screen_rows() {
    let (mut child, mut stdin, mut reader) = spawn_sidecar();
    let _ = request_ok(
        &mut stdin,
        &mut reader,
        "1",
        "setup.update",
        json!({ "patch": { "workingDays": 3 } }),
    );
    load_sample(&mut stdin, &mut reader);

    let result = request_ok(
        &mut stdin,
        &mut reader,
        "2",
        "export.matrix",
        json!({ "key": "7A", "identifier": "Grade 7/A" }),
    );
    assert_eq!(result["filenameStem"].as_str(), Some("Grade_7_A"));
    let matrix = &result["matrix"];
    assert_eq!(
        matrix["header"],
        json!(["Time", "Monday", "Tuesday", "Wednesday"])
    );
    // Monday's "Free" is a data cell under the break label, so the break is synthetic there.
    assert_eq!(
        matrix["rows"],
        json!([
            ["9:00 - 10:00", "Math", "English", "Art"],
            ["10:00 - 10:15 (BREAK)", "Break", "Break", "Break"],
            ["10:15 - 11:15", "Free", "History", "Free"],
            ["11:15-12:00 (LUNCH)", "Lunch", "Lunch", "Lunch"]
        ])
    );

    drop(stdin);
    let _ = child.wait();
}

#[test]
fn documents_are_written_under_the_workspace() {
    let workspace = temp_dir("timetabled-export-docs");
    let (mut child, mut stdin, mut reader) = spawn_sidecar();

    assert_eq!(
        request_err(&mut stdin, &mut reader, "0", "export.text", json!({ "key": "7A" })),
        "not_found"
    );
    load_sample(&mut stdin, &mut reader);
    assert_eq!(
        request_err(&mut stdin, &mut reader, "1", "export.pdf", json!({ "key": "7A" })),
        "no_workspace"
    );

    let _ = request_ok(
        &mut stdin,
        &mut reader,
        "2",
        "workspace.select",
        json!({ "path": workspace.to_string_lossy() }),
    );

    let text = request_ok(&mut stdin, &mut reader, "3", "export.text", json!({ "key": "7A" }));
    assert_eq!(text["fileName"].as_str(), Some("7A_timetable.txt"));
    let body = std::fs::read_to_string(workspace.join("exports").join("7A_timetable.txt"))
        .expect("read text export");
    assert!(body.starts_with("Time"));
    assert!(body.contains("Monday"));
    assert!(body.contains("Lunch"));

    let pdf = request_ok(&mut stdin, &mut reader, "4", "export.pdf", json!({ "key": "7A" }));
    let pdf_bytes = std::fs::read(pdf["path"].as_str().expect("pdf path")).expect("read pdf");
    assert!(pdf_bytes.starts_with(b"%PDF-1.4"));
    assert!(pdf_bytes.ends_with(b"%%EOF\n"));

    let xlsx = request_ok(&mut stdin, &mut reader, "5", "export.xlsx", json!({ "key": "7A" }));
    let xlsx_bytes = std::fs::read(xlsx["path"].as_str().expect("xlsx path")).expect("read xlsx");
    assert!(xlsx_bytes.starts_with(b"PK"));
    assert_eq!(xlsx["rowCount"].as_u64(), Some(4));

    drop(stdin);
    let _ = child.wait();
    let _ = std::fs::remove_dir_all(workspace);
}

#[test]
fn bundle_manifest_checksums_cover_every_document() {
    let workspace = temp_dir("timetabled-export-bundle");
    let out = workspace.join("out").join("week.zip");
    let (mut child, mut stdin, mut reader) = spawn_sidecar();
    load_sample(&mut stdin, &mut reader);

    let result = request_ok(
        &mut stdin,
        &mut reader,
        "1",
        "export.bundle",
        json!({ "key": "7A", "identifier": "Mr. Smith", "outPath": out.to_string_lossy() }),
    );
    assert_eq!(result["fileName"].as_str(), Some("Mr_Smith_timetable.zip"));

    let f = std::fs::File::open(&out).expect("open bundle");
    let mut archive = zip::ZipArchive::new(f).expect("open zip archive");
    let mut manifest = String::new();
    archive
        .by_name("manifest.json")
        .expect("manifest entry")
        .read_to_string(&mut manifest)
        .expect("read manifest");
    let manifest: serde_json::Value = serde_json::from_str(&manifest).expect("manifest json");
    assert_eq!(manifest["format"].as_str(), Some("timetable-export-v1"));
    assert_eq!(manifest["identifier"].as_str(), Some("Mr. Smith"));

    let files = manifest["files"].as_array().expect("files");
    let names: Vec<&str> = files.iter().filter_map(|f| f["name"].as_str()).collect();
    assert_eq!(
        names,
        vec![
            "Mr_Smith_timetable.xlsx",
            "Mr_Smith_timetable.txt",
            "Mr_Smith_timetable.pdf"
        ]
    );
    for file in files {
        let name = file["name"].as_str().expect("name");
        let mut bytes = Vec::new();
        archive
            .by_name(name)
            .expect("listed entry")
            .read_to_end(&mut bytes)
            .expect("read entry");
        assert_eq!(file["bytes"].as_u64(), Some(bytes.len() as u64));
        assert_eq!(
            file["sha256"].as_str(),
            Some(format!("{:x}", Sha256::digest(&bytes)).as_str())
        );
    }

    drop(stdin);
    let _ = child.wait();
    let _ = std::fs::remove_dir_all(workspace);
}
