use std::fs;
use std::path::PathBuf;

use prosens_terminal::catalog_fetch::parse_catalog_json;

fn read_fixture(name: &str) -> String {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.push("tests");
    path.push("fixtures");
    path.push(name);
    fs::read_to_string(path).expect("fixture file should be readable")
}

#[test]
fn parses_players_fixture() {
    let raw = read_fixture("players.json");
    let players = parse_catalog_json(&raw).expect("fixture should parse");
    assert_eq!(players.len(), 10);
    assert_eq!(players[0].name, "TenZ");
    assert_eq!(players[0].team, "Sentinels");
    assert_eq!(players[0].dpi, 800);
    assert!((players[0].edpi - 320.0).abs() < 1e-9);
    assert_eq!(players[2].team, "Leviatán");
}

#[test]
fn missing_edpi_is_derived_from_sens_and_dpi() {
    let raw = read_fixture("players.json");
    let players = parse_catalog_json(&raw).expect("fixture should parse");
    let less = players
        .iter()
        .find(|p| p.name == "Less")
        .expect("Less should be present");
    assert!((less.edpi - 280.0).abs() < 1e-6);
}

#[test]
fn unusable_rows_are_skipped() {
    let raw = read_fixture("players.json");
    let players = parse_catalog_json(&raw).expect("fixture should parse");
    assert!(players.iter().all(|p| !p.name.is_empty()));
    assert!(players.iter().all(|p| p.name != "BrokenMouse"));
}

#[test]
fn unsuccessful_envelope_carries_server_message() {
    let err = parse_catalog_json(r#"{"success":false,"error":"boom"}"#)
        .expect_err("success=false should fail");
    assert_eq!(err.to_string(), "boom");
}

#[test]
fn unsuccessful_envelope_without_message_uses_generic_error() {
    let err = parse_catalog_json(r#"{"success":false}"#).expect_err("success=false should fail");
    assert_eq!(err.to_string(), "API request failed");
}

#[test]
fn success_without_data_is_an_empty_catalog() {
    let players = parse_catalog_json(r#"{"success":true}"#).expect("should parse");
    assert!(players.is_empty());
}

#[test]
fn malformed_body_is_an_error() {
    assert!(parse_catalog_json("<html>502 Bad Gateway</html>").is_err());
}

#[test]
fn one_bad_row_does_not_fail_the_catalog() {
    let raw = read_fixture("players_messy.json");
    let players = parse_catalog_json(&raw).expect("messy fixture should parse");
    let names: Vec<&str> = players.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(
        names,
        vec!["TenZ", "Roundtrip", "Backwards", "Quoted", "Nullish"]
    );
}

#[test]
fn whole_float_dpi_is_accepted() {
    let raw = read_fixture("players_messy.json");
    let players = parse_catalog_json(&raw).expect("messy fixture should parse");
    let row = players
        .iter()
        .find(|p| p.name == "Roundtrip")
        .expect("Roundtrip should be present");
    assert_eq!(row.dpi, 800);
    assert!((row.edpi - 280.0).abs() < 1e-9);
}

#[test]
fn non_positive_edpi_is_recomputed() {
    let raw = read_fixture("players_messy.json");
    let players = parse_catalog_json(&raw).expect("messy fixture should parse");
    let row = players
        .iter()
        .find(|p| p.name == "Backwards")
        .expect("Backwards should be present");
    assert!((row.edpi - 400.0).abs() < 1e-9);
    assert!(players.iter().all(|p| p.edpi > 0.0));
}

#[test]
fn numeric_strings_and_nulls_are_tolerated() {
    let raw = read_fixture("players_messy.json");
    let players = parse_catalog_json(&raw).expect("messy fixture should parse");
    let quoted = players.iter().find(|p| p.name == "Quoted").expect("Quoted");
    assert_eq!(quoted.dpi, 400);
    assert_eq!(quoted.team, "");
    assert!((quoted.edpi - 200.0).abs() < 1e-9);
    let nullish = players.iter().find(|p| p.name == "Nullish").expect("Nullish");
    assert!((nullish.edpi - 320.0).abs() < 1e-9);
}
