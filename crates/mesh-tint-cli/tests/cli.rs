//! End-to-end tests driving the stl-to-glb binary.

use std::fs;
use std::path::Path;
use std::process::{Command, Output};

use tempfile::tempdir;

const ASCII_STL: &str = "solid bracket
  facet normal 0 0 1
    outer loop
      vertex 0 0 0
      vertex 10 0 0
      vertex 0 10 0
    endloop
  endfacet
  facet normal 0 0 1
    outer loop
      vertex 10 0 0
      vertex 10 10 0
      vertex 0 10 0
    endloop
  endfacet
endsolid bracket
";

const THREE_OBJECTS: &str = "\
o base
v 0 0 0
v 1 0 0
v 0 1 0
f 1 2 3
o arm
v 0 0 1
v 1 0 1
v 0 1 1
f 4 5 6
o pin
v 0 0 2
v 1 0 2
v 0 1 2
f 7 8 9
";

fn run(args: &[&str], cwd: &Path) -> Output {
    Command::new(env!("CARGO_BIN_EXE_stl-to-glb"))
        .args(args)
        .current_dir(cwd)
        .env_remove("RUST_LOG")
        .output()
        .expect("binary runs")
}

fn glb_colors(path: &Path) -> Vec<Vec<[u8; 4]>> {
    let (document, buffers, _) = gltf::import(path).expect("valid glb");
    document
        .meshes()
        .map(|mesh| {
            let primitive = mesh.primitives().next().expect("one primitive");
            let reader = primitive.reader(|b| buffers.get(b.index()).map(|d| &d.0[..]));
            reader
                .read_colors(0)
                .map(|c| c.into_rgba_u8().collect())
                .unwrap_or_default()
        })
        .collect()
}

fn dir_is_unchanged(dir: &Path, expected: &[&str]) -> bool {
    let mut names: Vec<String> = fs::read_dir(dir)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    let mut expected: Vec<String> = expected.iter().map(|s| s.to_string()).collect();
    expected.sort();
    names == expected
}

#[test]
fn convert_default_category() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("bracket.stl"), ASCII_STL).unwrap();

    let out = run(&["bracket.stl", "bracket.glb"], dir.path());
    assert!(out.status.success(), "stderr: {}", String::from_utf8_lossy(&out.stderr));

    let colors = glb_colors(&dir.path().join("bracket.glb"));
    assert_eq!(colors.len(), 1);
    assert!(!colors[0].is_empty());
    assert!(colors[0].iter().all(|c| *c == [247, 182, 0, 255]));
}

#[test]
fn convert_with_category() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("bracket.stl"), ASCII_STL).unwrap();

    let out = run(&["-q", "bracket.stl", "blue.glb", "connectors"], dir.path());
    assert!(out.status.success());
    assert!(out.stdout.is_empty());

    let colors = glb_colors(&dir.path().join("blue.glb"));
    assert!(colors[0].iter().all(|c| *c == [0, 85, 179, 255]));
}

#[test]
fn split_prints_records() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("kit.obj"), THREE_OBJECTS).unwrap();

    let out = run(&["--split", "kit.obj", "kit", "lockpins"], dir.path());
    assert!(out.status.success(), "stderr: {}", String::from_utf8_lossy(&out.stderr));

    let records: serde_json::Value = serde_json::from_slice(&out.stdout).expect("json stdout");
    assert_eq!(
        records,
        serde_json::json!([
            {"index": 1, "name": "base", "file": "kit-1.glb"},
            {"index": 2, "name": "arm", "file": "kit-2.glb"},
            {"index": 3, "name": "pin", "file": "kit-3.glb"},
        ])
    );

    for i in 1..=3 {
        let colors = glb_colors(&dir.path().join(format!("kit-{}.glb", i)));
        assert!(colors[0].iter().all(|c| *c == [196, 30, 57, 255]));
    }
}

#[test]
fn split_single_geometry() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("bracket.stl"), ASCII_STL).unwrap();

    let out = run(&["--split", "bracket.stl", "out"], dir.path());
    assert!(out.status.success());

    let records: serde_json::Value = serde_json::from_slice(&out.stdout).expect("json stdout");
    assert_eq!(
        records,
        serde_json::json!([{"index": 1, "name": "bracket.stl", "file": "out.glb"}])
    );
    assert!(dir.path().join("out.glb").exists());
}

#[test]
fn missing_arguments_exit_with_usage() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("bracket.stl"), ASCII_STL).unwrap();

    let out = run(&["bracket.stl"], dir.path());
    assert_eq!(out.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&out.stderr);
    assert!(stderr.contains("Usage: stl-to-glb <input> <output.glb> [category]"));

    let out = run(&["--split", "bracket.stl"], dir.path());
    assert_eq!(out.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&out.stderr);
    assert!(stderr.contains("Usage: stl-to-glb --split <input> <output-prefix> [category]"));

    let out = run(&[], dir.path());
    assert_eq!(out.status.code(), Some(1));

    assert!(out.stdout.is_empty());
    assert!(dir_is_unchanged(dir.path(), &["bracket.stl"]));
}

#[test]
fn unreadable_input_fails() {
    let dir = tempdir().unwrap();

    let out = run(&["missing.stl", "out.glb"], dir.path());
    assert_eq!(out.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&out.stderr).contains("missing.stl"));
    assert!(dir_is_unchanged(dir.path(), &[]));
}

#[test]
fn unsupported_format_fails() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("notes.txt"), "hello").unwrap();

    let out = run(&["notes.txt", "out.glb"], dir.path());
    assert_eq!(out.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&out.stderr).contains("unsupported mesh format"));
}
