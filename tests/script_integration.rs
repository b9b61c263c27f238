//! Integration tests running the demo scripts end to end.

#![allow(missing_docs)]
#![allow(clippy::unwrap_used)]

use std::fs;
use std::path::PathBuf;

use rmgen::export::MapExport;
use rmgen::{MapScript, MapShape, run_script};

fn demo(name: &str) -> MapScript {
    let path = PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("demos")
        .join(name);
    MapScript::load(path).unwrap()
}

#[test]
fn test_lakes_demo_runs() {
    let script = demo("lakes.json");
    let run = run_script(&script, 2024).unwrap();
    let state = &run.context.state;

    assert_eq!(run.reports.len(), script.steps.len());
    let water = state.tile_class_id("water").unwrap();
    assert!(!state.tile_class(water).is_empty());

    // Nothing ends up in the water
    for object in state.objects() {
        assert!(!state.tile_class(water).has(object.tile()), "{object:?}");
    }
    let mines = state.tile_class_id("mines").unwrap();
    let ore = state
        .objects()
        .iter()
        .filter(|o| o.template == "gaia/ore_large")
        .count();
    assert!(ore <= 6);
    assert_eq!(state.tile_class(mines).is_empty(), ore == 0);
}

#[test]
fn test_island_demo_runs() {
    let script = demo("island.json");
    let run = run_script(&script, 7).unwrap();
    let state = &run.context.state;
    assert_eq!(state.shape(), MapShape::Circular);
    assert_eq!(run.reports[0].placed, 1);

    let land = state.tile_class_id("land").unwrap();
    for object in state.objects() {
        assert!(!state.tile_class(land).has(object.tile()));
    }
}

#[test]
fn test_seed_determinism() {
    let script = demo("lakes.json");
    let a = MapExport::from_state(&run_script(&script, 99).unwrap().context.state, 99);
    let b = MapExport::from_state(&run_script(&script, 99).unwrap().context.state, 99);
    let c = MapExport::from_state(&run_script(&script, 100).unwrap().context.state, 100);
    assert_eq!(a, b);
    assert_ne!(a.textures, c.textures);
}

#[test]
fn test_export_written_to_disk() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("island.json");

    let run = run_script(&demo("island.json"), 3).unwrap();
    let export = MapExport::from_state(&run.context.state, 3);
    export.save(&path).unwrap();

    let text = fs::read_to_string(&path).unwrap();
    let back: MapExport = serde_json::from_str(&text).unwrap();
    assert_eq!(back, export);
    assert_eq!(back.heights.len(), 65 * 65);
    assert_eq!(back.textures.len(), 64 * 64);
}

#[test]
fn test_bad_script_reports_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("broken.json");
    fs::write(&path, r#"{ "settings": { "size": 8 } }"#).unwrap();

    let script = MapScript::load(&path).unwrap();
    let err = run_script(&script, 0).unwrap_err();
    assert!(err.to_string().contains("map size"));

    fs::write(&path, "{ not json").unwrap();
    assert!(MapScript::load(&path).is_err());
}
