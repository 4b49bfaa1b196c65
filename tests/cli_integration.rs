// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Integration tests for the mapgraph CLI commands

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

/// Run mapgraph against a map directory with an isolated config file
fn mapgraph(dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("mapgraph").expect("binary should be built");
    cmd.env("MAPGRAPH_MAP_DIR", dir.path().join("map"))
        .env("MAPGRAPH_CONFIG", dir.path().join("config.toml"))
        .env_remove("MAPGRAPH_LOG_LEVEL")
        .env_remove("MAPGRAPH_PRECISION")
        .env_remove("NO_COLOR")
        .arg("--no-color");
    cmd
}

/// Draw the 0 -> 1 (3), 1 -> 2 (4), 0 -> 2 (10) triangle
fn setup_triangle(dir: &TempDir) {
    for (x, y) in [("0", "0"), ("3", "0"), ("3", "4")] {
        mapgraph(dir)
            .args(["vertex", "add", "--x", x, "--y", y])
            .assert()
            .success();
    }
    for (from, to, weight) in [("0", "1", "3"), ("1", "2", "4"), ("0", "2", "10")] {
        mapgraph(dir)
            .args(["edge", "add", "--from", from, "--to", to, "--weight", weight])
            .assert()
            .success();
    }
}

#[test]
fn test_init_creates_both_files() {
    let dir = TempDir::new().unwrap();

    mapgraph(&dir)
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("New map created"));

    let map = dir.path().join("map");
    assert_eq!(fs::read_to_string(map.join("vertices.json")).unwrap(), "[]");
    assert_eq!(fs::read_to_string(map.join("edges.json")).unwrap(), "[]");

    // A second init refuses to clobber the map
    mapgraph(&dir)
        .arg("init")
        .assert()
        .failure()
        .stderr(predicate::str::contains("already exists"));

    mapgraph(&dir).args(["init", "--force"]).assert().success();
}

#[test]
fn test_vertex_lifecycle() {
    let dir = TempDir::new().unwrap();

    mapgraph(&dir)
        .args(["vertex", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No vertices defined"));

    mapgraph(&dir)
        .args(["vertex", "add", "--x", "1.5", "--y", "-2", "--label", "harbour"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Vertex 0 drawn."));

    mapgraph(&dir)
        .args(["vertex", "add", "--x", "4", "--y", "6"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Vertex 1 drawn."));

    mapgraph(&dir)
        .args(["vertex", "rename", "1", "--label", "lighthouse"])
        .assert()
        .success();

    mapgraph(&dir)
        .args(["vertex", "move", "0", "--x", "2", "--y", "2"])
        .assert()
        .success()
        .stdout(predicate::str::contains("moved to (2.00, 2.00)"));

    mapgraph(&dir)
        .args(["vertex", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("harbour"))
        .stdout(predicate::str::contains("lighthouse"));

    mapgraph(&dir)
        .args(["vertex", "remove", "0"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Vertex 0 removed."));

    mapgraph(&dir)
        .args(["vertex", "show", "0"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not found"));
}

#[test]
fn test_edge_default_weight_is_distance() {
    let dir = TempDir::new().unwrap();
    mapgraph(&dir).args(["vertex", "add", "--x", "0", "--y", "0"]).assert().success();
    mapgraph(&dir).args(["vertex", "add", "--x", "3", "--y", "4"]).assert().success();

    mapgraph(&dir)
        .args(["edge", "add", "--from", "0", "--to", "1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Edge 0 drawn from Vertex 0 to Vertex 1."))
        .stdout(predicate::str::contains("weight: 5.00"));

    mapgraph(&dir)
        .args(["edge", "add", "--from", "0", "--to", "9"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Vertex 9 not found"));
}

#[test]
fn test_move_keeps_distance_weights_in_step() {
    let dir = TempDir::new().unwrap();
    mapgraph(&dir).args(["vertex", "add", "--x", "0", "--y", "0"]).assert().success();
    mapgraph(&dir).args(["vertex", "add", "--x", "3", "--y", "4"]).assert().success();
    mapgraph(&dir).args(["edge", "add", "--from", "0", "--to", "1"]).assert().success();
    mapgraph(&dir)
        .args(["edge", "add", "--from", "1", "--to", "0", "--weight", "2"])
        .assert()
        .success();

    mapgraph(&dir)
        .args(["vertex", "move", "1", "--x", "6", "--y", "8"])
        .assert()
        .success()
        .stdout(predicate::str::contains("reweighed edge(s): 0"));

    mapgraph(&dir)
        .args(["path", "0", "1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("distance 10.00."));
    mapgraph(&dir)
        .args(["path", "1", "0"])
        .assert()
        .success()
        .stdout(predicate::str::contains("distance 2.00."));
}

#[test]
fn test_edge_reweigh() {
    let dir = TempDir::new().unwrap();
    setup_triangle(&dir);

    mapgraph(&dir)
        .args(["edge", "reweigh", "2", "--weight", "5"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Edge 2 weight set to 5.00."));
    mapgraph(&dir)
        .args(["path", "0", "2"])
        .assert()
        .success()
        .stdout(predicate::str::contains("distance 5.00."))
        .stdout(predicate::str::contains("edges: 2"));

    // Without --weight the edge goes back to the distance between its points
    mapgraph(&dir)
        .args(["edge", "reweigh", "0"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Edge 0 weight set to 3.00."));

    mapgraph(&dir)
        .args(["edge", "reweigh", "2", "--weight=-1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid weight"));
    mapgraph(&dir)
        .args(["edge", "reweigh", "9", "--weight", "1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Edge 9 not found"));
}

#[test]
fn test_removing_vertex_removes_incident_edges() {
    let dir = TempDir::new().unwrap();
    setup_triangle(&dir);

    mapgraph(&dir)
        .args(["vertex", "remove", "1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("also removed edge(s): 0, 1"));

    let edges = fs::read_to_string(dir.path().join("map").join("edges.json")).unwrap();
    let edges: serde_json::Value = serde_json::from_str(&edges).unwrap();
    assert_eq!(edges.as_array().unwrap().len(), 1);
    assert_eq!(edges[0]["id"], 2);
}

#[test]
fn test_shortest_path() {
    let dir = TempDir::new().unwrap();
    setup_triangle(&dir);

    mapgraph(&dir)
        .args(["path", "0", "2"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Shortest path found with distance 7.00."))
        .stdout(predicate::str::contains("vertices: 0, 1, 2"))
        .stdout(predicate::str::contains("edges: 0, 1"));

    let output = mapgraph(&dir)
        .args(["--json", "path", "0", "2"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let result: serde_json::Value = serde_json::from_slice(&output).unwrap();
    assert_eq!(result["distance"], 7.0);
    assert_eq!(result["vertices"], serde_json::json!([0, 1, 2]));

    mapgraph(&dir).args(["edge", "remove", "1"]).assert().success();
    mapgraph(&dir).args(["edge", "remove", "2"]).assert().success();

    mapgraph(&dir)
        .args(["path", "0", "2"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No path found."));

    mapgraph(&dir)
        .args(["path", "1", "1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("two different vertices"));
}

#[test]
fn test_search() {
    let dir = TempDir::new().unwrap();
    setup_triangle(&dir);
    mapgraph(&dir)
        .args(["edge", "add", "--from", "2", "--to", "0", "--weight", "3.004"])
        .assert()
        .success();

    mapgraph(&dir)
        .args(["search", "weight", "3"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Found 2 edge(s) with weight 3.00: 0, 3"));

    mapgraph(&dir)
        .args(["search", "weight", "3.01"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No edge found"));

    mapgraph(&dir)
        .args(["search", "label", "2"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Found 1 vertex(es) with label 2: 2"));

    mapgraph(&dir)
        .args(["search", "weight", "heavy"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid edge weight"));
}

#[test]
fn test_corrupt_map_is_reported() {
    let dir = TempDir::new().unwrap();
    let map = dir.path().join("map");
    fs::create_dir_all(&map).unwrap();
    fs::write(map.join("vertices.json"), "{ not a list").unwrap();
    fs::write(map.join("edges.json"), "[]").unwrap();

    mapgraph(&dir)
        .args(["vertex", "list"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to load map"));
}

#[test]
fn test_config_set_and_get() {
    let dir = TempDir::new().unwrap();

    mapgraph(&dir)
        .args(["config", "precision", "3"])
        .assert()
        .success();

    mapgraph(&dir)
        .args(["config", "precision"])
        .assert()
        .success()
        .stdout(predicate::str::diff("3\n"));

    setup_triangle(&dir);
    mapgraph(&dir)
        .args(["path", "0", "2"])
        .assert()
        .success()
        .stdout(predicate::str::contains("distance 7.000."));

    mapgraph(&dir)
        .args(["config", "colour", "red"])
        .assert()
        .failure();
}

#[test]
fn test_completions() {
    let dir = TempDir::new().unwrap();

    mapgraph(&dir)
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("mapgraph"));
}
