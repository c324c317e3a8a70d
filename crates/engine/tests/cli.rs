/// Integration tests for the shiftplan-engine binary.
///
/// These tests spawn the compiled binary via assert_cmd and verify
/// the JSON stdin/stdout protocol for all key scenarios.
///
/// Run with: cargo test --manifest-path crates/engine/Cargo.toml
use assert_cmd::Command;
use predicates::str::contains;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn cmd() -> Command {
    Command::cargo_bin("shiftplan-engine").unwrap()
}

fn run_ok(input: &str) -> serde_json::Value {
    let output = cmd()
        .write_stdin(input.to_string())
        .assert()
        .success()
        .stdout(contains(r#""ok":true"#))
        .get_output()
        .stdout
        .clone();

    let text = String::from_utf8(output).unwrap();
    serde_json::from_str(&text).unwrap()
}

fn same_preference_workers(count: usize, day: &str, shift: &str) -> String {
    let workers: Vec<String> = (0..count)
        .map(|i| format!(r#"{{"name":"w{}","preferences":{{"{}":"{}"}}}}"#, i, day, shift))
        .collect();
    format!("[{}]", workers.join(","))
}

// ---------------------------------------------------------------------------
// Test 1: generate_simple_schedule
// Two workers sharing a preference both land on it directly.
// ---------------------------------------------------------------------------

#[test]
fn generate_simple_schedule() {
    let input = r#"{
        "command": "generate",
        "seed": 1,
        "workers": [
            { "name": "Ann", "preferences": { "Monday": "Morning" } },
            { "name": "Bo", "preferences": { "Monday": "Morning", "Tuesday": "Evening" } }
        ]
    }"#;

    let parsed = run_ok(input);
    let data = &parsed["data"];

    let cells = data["cells"].as_array().unwrap();
    assert_eq!(cells.len(), 21);
    assert_eq!(cells[0]["day"], "Monday");
    assert_eq!(cells[0]["shift"], "Morning");
    assert_eq!(cells[0]["workers"], serde_json::json!(["Ann", "Bo"]));
    assert_eq!(cells[0]["status"], "Staffed");

    assert!(data["resolutions"].as_array().unwrap().is_empty());
    assert_eq!(data["stats"]["totalCells"], 21);
    assert_eq!(data["stats"]["preferenceMatches"], 3);
    assert_eq!(data["seed"], 1);

    let bo = &data["workers"][1];
    assert_eq!(bo["name"], "Bo");
    let tue = bo["assignments"]
        .as_array()
        .unwrap()
        .iter()
        .find(|a| a["day"] == "Tuesday")
        .unwrap();
    assert_eq!(tue["shift"], "Evening");
    assert_eq!(tue["matched"], true);
}

// ---------------------------------------------------------------------------
// Test 2: generate_with_conflict_resolution
// Nine workers want Monday morning; the ninth is moved to another Monday shift.
// ---------------------------------------------------------------------------

#[test]
fn generate_with_conflict_resolution() {
    let input = format!(
        r#"{{"command":"generate","seed":3,"workers":{}}}"#,
        same_preference_workers(9, "Monday", "Morning")
    );

    let parsed = run_ok(&input);
    let data = &parsed["data"];

    assert_eq!(data["cells"][0]["workers"].as_array().unwrap().len(), 8);
    assert_eq!(data["cells"][0]["status"], "Full");
    assert_eq!(data["stats"]["fullCells"], 1);

    let resolutions = data["resolutions"].as_array().unwrap();
    assert_eq!(resolutions.len(), 1);
    assert_eq!(resolutions[0]["worker"], "w8");
    assert_eq!(resolutions[0]["strategy"], "SameDayOtherShift");
    assert_eq!(resolutions[0]["preferredShift"], "Morning");
    assert_eq!(resolutions[0]["assignedDay"], "Monday");
    assert_eq!(resolutions[0]["assignedShift"], "Afternoon");
}

// ---------------------------------------------------------------------------
// Test 3: generate_is_reproducible_with_seed
// Same roster + same seed must give byte-identical output.
// ---------------------------------------------------------------------------

#[test]
fn generate_is_reproducible_with_seed() {
    let input = r#"{
        "command": "generate",
        "seed": 99,
        "workers": [
            { "name": "Ann" }, { "name": "Bo" }, { "name": "Cy" },
            { "name": "Di" }, { "name": "Ed" }, { "name": "Flo" }
        ]
    }"#;

    let first = cmd().write_stdin(input).assert().success().get_output().stdout.clone();
    let second = cmd().write_stdin(input).assert().success().get_output().stdout.clone();
    assert_eq!(first, second);
}

// ---------------------------------------------------------------------------
// Test 4: generate_with_custom_rules
// Capacity of one per shift and no minimum: the second worker is moved.
// Lenient day/shift spellings are accepted.
// ---------------------------------------------------------------------------

#[test]
fn generate_with_custom_rules() {
    let input = r#"{
        "command": "generate",
        "rules": { "minWorkersPerShift": 0, "maxWorkersPerShift": 1 },
        "workers": [
            { "name": "Ann", "preferences": { "mon": "0" } },
            { "name": "Bo", "preferences": { "MONDAY": "morning" } }
        ]
    }"#;

    let parsed = run_ok(input);
    let data = &parsed["data"];

    assert_eq!(data["rules"]["maxWorkersPerShift"], 1);
    assert_eq!(data["rules"]["maxDaysPerWeek"], 5);
    assert_eq!(data["cells"][0]["workers"], serde_json::json!(["Ann"]));
    assert_eq!(data["cells"][1]["workers"], serde_json::json!(["Bo"]));
    assert!(data["warnings"].as_array().unwrap().is_empty());
    assert!(data["seed"].is_null());
}

// ---------------------------------------------------------------------------
// Test 5: generate_reports_understaffed_cells
// A single worker cannot bring any cell to the minimum of two.
// ---------------------------------------------------------------------------

#[test]
fn generate_reports_understaffed_cells() {
    let input = r#"{
        "command": "generate",
        "seed": 5,
        "workers": [ { "name": "Solo", "preferences": {} } ]
    }"#;

    let parsed = run_ok(input);
    let data = &parsed["data"];

    let warnings = data["warnings"].as_array().unwrap();
    assert_eq!(warnings.len(), 21);
    assert!(warnings.iter().all(|w| w["kind"]["type"] == "understaffed"));
    assert_eq!(warnings[0]["kind"]["assigned"], 1);
    assert_eq!(warnings[0]["kind"]["required"], 2);
    assert!(warnings[0]["worker"].is_null());
    assert_eq!(data["workers"][0]["daysWorked"], 5);
}

// ---------------------------------------------------------------------------
// Test 6: generate_rejects_bad_rosters
// Empty rosters, duplicate names and bad rules fail with exit code 1.
// ---------------------------------------------------------------------------

#[test]
fn generate_empty_roster() {
    cmd()
        .write_stdin(r#"{"command":"generate","workers":[]}"#)
        .assert()
        .failure()
        .stdout(contains(r#""ok":false"#))
        .stdout(contains("No workers"));
}

#[test]
fn generate_duplicate_names() {
    cmd()
        .write_stdin(r#"{"command":"generate","workers":[{"name":"Ann"},{"name":"aNN"}]}"#)
        .assert()
        .failure()
        .stdout(contains(r#""ok":false"#))
        .stdout(contains("Duplicate worker"));
}

#[test]
fn generate_invalid_rules() {
    let input = r#"{
        "command": "generate",
        "rules": { "minWorkersPerShift": 5, "maxWorkersPerShift": 3 },
        "workers": [ { "name": "Ann" } ]
    }"#;

    cmd()
        .write_stdin(input)
        .assert()
        .failure()
        .stdout(contains(r#""ok":false"#))
        .stdout(contains("Invalid rules"));
}

// ---------------------------------------------------------------------------
// Test 7: validate_valid_roster / validate_invalid_roster
// ---------------------------------------------------------------------------

#[test]
fn validate_valid_roster() {
    let input = format!(
        r#"{{"command":"validate","workers":{}}}"#,
        same_preference_workers(9, "Friday", "Evening")
    );

    let parsed = run_ok(&input);
    let errors = parsed["data"]["errors"].as_array().unwrap();
    assert!(errors.is_empty(), "Valid roster should have no errors, got: {:?}", errors);

    let warnings = parsed["data"]["warnings"].as_array().unwrap();
    assert!(warnings
        .iter()
        .any(|w| w.as_str().unwrap_or("").contains("Friday Evening is preferred by 9 workers")));
}

#[test]
fn validate_invalid_roster() {
    let input = r#"{
        "command": "validate",
        "workers": [
            { "name": "Ann" },
            { "name": "ann" },
            { "name": "" }
        ]
    }"#;

    let parsed = run_ok(input);
    let errors = parsed["data"]["errors"].as_array().unwrap();
    assert_eq!(errors.len(), 2, "got: {:?}", errors);
}

// ---------------------------------------------------------------------------
// Test 8: malformed input
// ---------------------------------------------------------------------------

#[test]
fn invalid_json_input() {
    let input = r#"{ this is not valid json "#;

    cmd()
        .write_stdin(input)
        .assert()
        .failure()
        .stdout(contains(r#""ok":false"#))
        .stdout(contains("error"));
}

#[test]
fn unknown_command() {
    let input = r#"{ "command": "publish", "workers": [] }"#;

    cmd()
        .write_stdin(input)
        .assert()
        .failure()
        .stdout(contains(r#""ok":false"#))
        .stdout(contains("Invalid JSON input"));
}

#[test]
fn unknown_shift_name() {
    let input = r#"{
        "command": "generate",
        "workers": [ { "name": "Ann", "preferences": { "Monday": "Night" } } ]
    }"#;

    cmd()
        .write_stdin(input)
        .assert()
        .failure()
        .stdout(contains(r#""ok":false"#))
        .stdout(contains("Night"));
}
