use std::fs;

use mowersim::*;
use serde_json::json;

const SCENARIO_01: &str = include_str!("../demos/lawnmower_scenario01_valid.txt");
const SCENARIO_03: &str = include_str!("../demos/lawnmower_scenario03_rock_crash.txt");
const SCENARIO_05: &str = include_str!("../demos/lawnmower_scenario05_bad_input.txt");

#[test]
fn end_to_end_definition_to_json_file() {
    // Definition file -> engine -> result record
    let definition = Definition::parse(SCENARIO_01).unwrap();
    let status = definition.run();
    assert!(!status.did_mower_crash);
    assert_eq!(status.total_grass_squares, 22);
    assert_eq!(status.pos_history.len(), 7);
    assert_eq!(status.visited_cells.len(), 6);
    assert_eq!(status.uncut_grass_remaining, 16);
    assert_eq!(status.last_pos, Cell::new(2, 0));

    // Persist and read back
    let dir = std::env::temp_dir().join(format!("mowersim-e2e-{}", std::process::id()));
    let path = save_status(&dir, &status, true).unwrap();
    let text = fs::read_to_string(&path).unwrap();
    let value: serde_json::Value = serde_json::from_str(&text).unwrap();
    assert_eq!(value["test_name"], json!("lawnmower_scenario01_valid"));
    assert_eq!(value["valid_rocks"], json!([[1, 1], [2, 2], [3, 3]]));
    assert_eq!(value["crash_reason"], json!("None"));
    assert_eq!(value["last_pos"], json!([2, 0]));
    assert!(value["messages"].as_array().unwrap().len() > 10);
    assert_eq!(load_status(&path).unwrap(), status);
    fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn rock_crash_stops_the_path() {
    let status = Definition::parse(SCENARIO_03).unwrap().run();
    assert!(status.did_mower_crash);
    assert_eq!(status.crash_reason, CrashReason::Rock);
    // Third move is never attempted.
    assert_eq!(status.pos_history, vec![Cell::new(0, 0), Cell::new(1, 0), Cell::new(1, 1)]);
    let report = format_report(&status);
    assert!(report.iter().any(|l| l.ends_with("Crash Reason: Crashed into Rock")));
    assert!(report.iter().any(|l| l.ends_with("Result: CRASH!")));
}

#[test]
fn bad_input_is_reported_in_messages() {
    let status = Definition::parse(SCENARIO_05).unwrap().run();
    assert_eq!(status.start_pos, Cell::ORIGIN);
    assert_eq!(status.valid_rocks, vec![Cell::new(1, 1)]);
    assert_eq!(status.rock_locations.len(), 3);
    assert!(status.messages.iter().any(|m| m.contains("Rock at [7, 7] is outside the 3 x 3 lawn")));
    assert!(status.messages.iter().any(|m| m.contains("start pos at [10, 10] is outside")));
    assert_eq!(status.visited_cells, vec![Cell::new(0, 0), Cell::new(0, 1), Cell::new(0, 2), Cell::new(1, 2)]);
}

#[test]
fn definition_file_errors_surface() {
    let missing = Definition::from_file("/definitely/not/here.txt").unwrap_err();
    assert!(matches!(missing, DefinitionError::Io { .. }));

    let broken = SCENARIO_01.replace("\"Up\"", "\"Upwards\"");
    let err = Definition::parse(&broken).unwrap_err();
    assert!(err.to_string().contains("Upwards"));
}
