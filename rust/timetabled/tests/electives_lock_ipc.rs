mod test_support;

use serde_json::json;
use test_support::{request, request_err, request_ok, spawn_sidecar};

fn set_groups(
    stdin: &mut std::process::ChildStdin,
    reader: &mut std::io::BufReader<std::process::ChildStdout>,
) {
    let _ = request_ok(
        stdin,
        reader,
        "g",
        "electives.setGroups",
        json!({
            "groups": [
                { "groupName": "Group A", "chooseCount": 1, "options": ["Music", "Drama", "Art"] },
                { "groupName": "Group B", "chooseCount": 2, "options": ["A", "B", "C"] }
            ]
        }),
    );
}

#[test]
fn confirmed_group_cannot_be_changed() {
    let (mut child, mut stdin, mut reader) = spawn_sidecar();
    set_groups(&mut stdin, &mut reader);

    let saved = request_ok(
        &mut stdin,
        &mut reader,
        "1",
        "electives.save",
        json!({ "studentId": "s1", "groupName": "Group A", "value": "Music" }),
    );
    assert_eq!(saved.get("selection").and_then(|v| v.as_str()), Some("Music"));

    let resp = request(
        &mut stdin,
        &mut reader,
        "2",
        "electives.save",
        json!({ "studentId": "s1", "groupName": "Group A", "value": "Drama" }),
    );
    assert_eq!(resp["error"]["code"].as_str(), Some("elective_locked"));
    assert_eq!(resp["error"]["details"]["groupName"].as_str(), Some("Group A"));

    assert_eq!(
        request_err(
            &mut stdin,
            &mut reader,
            "3",
            "electives.draftToggle",
            json!({ "studentId": "s1", "groupName": "Group A", "option": "Art" }),
        ),
        "elective_locked"
    );

    let listed = request_ok(
        &mut stdin,
        &mut reader,
        "4",
        "electives.list",
        json!({ "studentId": "s1" }),
    );
    let group_a = &listed["groups"][0];
    assert_eq!(group_a["selection"].as_str(), Some("Music"));
    assert_eq!(group_a["locked"].as_bool(), Some(true));
    assert_eq!(listed["groups"][1]["locked"].as_bool(), Some(false));

    // Another student is unaffected.
    let other = request_ok(
        &mut stdin,
        &mut reader,
        "5",
        "electives.save",
        json!({ "studentId": "s2", "groupName": "Group A", "value": "Drama" }),
    );
    assert_eq!(other.get("selection").and_then(|v| v.as_str()), Some("Drama"));

    drop(stdin);
    let _ = child.wait();
}

#[test]
fn multi_choice_cap_rejects_the_extra_option() {
    let (mut child, mut stdin, mut reader) = spawn_sidecar();
    set_groups(&mut stdin, &mut reader);

    for (id, option) in [("1", "A"), ("2", "B")] {
        let _ = request_ok(
            &mut stdin,
            &mut reader,
            id,
            "electives.draftToggle",
            json!({ "studentId": "s1", "groupName": "Group B", "option": option }),
        );
    }
    let resp = request(
        &mut stdin,
        &mut reader,
        "3",
        "electives.draftToggle",
        json!({ "studentId": "s1", "groupName": "Group B", "option": "C" }),
    );
    assert_eq!(resp["error"]["code"].as_str(), Some("elective_cap_exceeded"));
    assert_eq!(resp["error"]["details"]["chooseCount"].as_u64(), Some(2));

    let listed = request_ok(
        &mut stdin,
        &mut reader,
        "4",
        "electives.list",
        json!({ "studentId": "s1" }),
    );
    assert_eq!(listed["groups"][1]["draft"], json!(["A", "B"]));

    let confirmed = request_ok(
        &mut stdin,
        &mut reader,
        "5",
        "electives.confirmDraft",
        json!({ "studentId": "s1", "groupName": "Group B" }),
    );
    assert_eq!(confirmed["selection"], json!(["A", "B"]));

    // A direct save over the cap is refused the same way.
    assert_eq!(
        request_err(
            &mut stdin,
            &mut reader,
            "6",
            "electives.save",
            json!({ "studentId": "s2", "groupName": "Group B", "value": ["A", "B", "C"] }),
        ),
        "elective_cap_exceeded"
    );

    drop(stdin);
    let _ = child.wait();
}

#[test]
fn unknown_group_and_option_are_rejected() {
    let (mut child, mut stdin, mut reader) = spawn_sidecar();
    set_groups(&mut stdin, &mut reader);

    assert_eq!(
        request_err(
            &mut stdin,
            &mut reader,
            "1",
            "electives.save",
            json!({ "studentId": "s1", "groupName": "Group Z", "value": "Music" }),
        ),
        "unknown_group"
    );
    assert_eq!(
        request_err(
            &mut stdin,
            &mut reader,
            "2",
            "electives.save",
            json!({ "studentId": "s1", "groupName": "Group A", "value": "Chess" }),
        ),
        "unknown_option"
    );
    assert_eq!(
        request_err(
            &mut stdin,
            &mut reader,
            "3",
            "electives.confirmDraft",
            json!({ "studentId": "s1", "groupName": "Group A" }),
        ),
        "empty_selection"
    );
    assert_eq!(
        request_err(
            &mut stdin,
            &mut reader,
            "4",
            "electives.save",
            json!({ "studentId": "s1", "groupName": "Group A", "value": 3 }),
        ),
        "bad_params"
    );

    drop(stdin);
    let _ = child.wait();
}
