use regex::Regex;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use tempfile::TempDir;

const SMALL_COIL: &[&str] = &[
    "--coil-length",
    "0.01",
    "--coil-radius",
    "0.01",
    "--wire-radius",
    "0.0001",
    "--windings",
    "6",
    "--turns",
    "2",
    "--groove-width",
    "0.0005",
    "--optimization-length",
    "0.009",
    "--calculation-number",
    "40",
    "--maximum-iterations",
    "2000",
    "--optimization-threshold",
    "1e-7",
];

fn coilforge(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_coilforge"))
        .args(args)
        .output()
        .expect("Failed to execute binary")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).to_string()
}

/// Runs `optimize` into `<tmp>/run` and returns the folder.
fn optimize_into(tmp: &TempDir, extra: &[&str]) -> (PathBuf, Output) {
    let out = tmp.path().join("run");
    let mut args = vec!["optimize", "--seed", "4", "--output", out.to_str().unwrap()];
    args.extend_from_slice(SMALL_COIL);
    args.extend_from_slice(extra);
    let output = coilforge(&args);
    (out, output)
}

fn table_rows(dir: &Path) -> usize {
    let text = fs::read_to_string(dir.join("wire_locations.csv")).unwrap();
    text.lines().count() - 1
}

#[test]
fn optimize_writes_the_full_results_folder() {
    let tmp = tempfile::tempdir().unwrap();
    let (out, output) = optimize_into(&tmp, &[]);
    assert!(output.status.success(), "{}", stdout(&output));

    for file in [
        "wire_locations.csv",
        "grooves.svg",
        "grooves_and_wires.svg",
        "field_profile.csv",
        "field_profile.svg",
        "wire_locations.svg",
    ] {
        assert!(out.join(file).exists(), "missing {}", file);
    }
    assert_eq!(table_rows(&out), 6);

    let text = stdout(&output);
    let status = Regex::new(r"\|\s*Status\s*\|\s*(Converged|Exhausted)\s*\|").unwrap();
    assert!(status.is_match(&text), "{}", text);

    let scores = Regex::new(r"\|\s*(Initial|Final) score\s*\|\s*([0-9.]+e-?[0-9]+)\s*\|").unwrap();
    let mut values = Vec::new();
    for cap in scores.captures_iter(&text) {
        values.push(cap[2].parse::<f64>().unwrap());
    }
    assert_eq!(values.len(), 2, "{}", text);
    assert!(values[1] <= values[0]);
}

#[test]
fn no_render_only_writes_the_table() {
    let tmp = tempfile::tempdir().unwrap();
    let (out, output) = optimize_into(&tmp, &["--no-render"]);
    assert!(output.status.success());

    assert!(out.join("wire_locations.csv").exists());
    assert!(!out.join("grooves.svg").exists());
    assert!(!out.join("field_profile.csv").exists());
}

#[test]
fn config_file_with_flag_override() {
    let tmp = tempfile::tempdir().unwrap();
    let cfg = tmp.path().join("coil.json");
    fs::write(
        &cfg,
        r#"{
            "coil": { "coil_length": 0.01, "coil_radius": 0.01, "wire_radius": 0.0001,
                      "windings": 8, "turns": 1, "groove_width": 0.0005 },
            "search": { "optimization_length": 0.009, "calculation_number": 30,
                        "maximum_iterations": 500, "optimization_threshold": 1e-6 }
        }"#,
    )
    .unwrap();
    let out = tmp.path().join("from_file");

    let output = coilforge(&[
        "optimize",
        "--config",
        cfg.to_str().unwrap(),
        "--windings",
        "4",
        "--no-render",
        "--output",
        out.to_str().unwrap(),
    ]);
    assert!(output.status.success(), "{}", stdout(&output));
    assert_eq!(table_rows(&out), 4);
}

#[test]
fn validate_accepts_an_optimized_table() {
    let tmp = tempfile::tempdir().unwrap();
    let (out, _) = optimize_into(&tmp, &["--no-render"]);
    let table = out.join("wire_locations.csv");

    let output = coilforge(&[
        "validate",
        "--table",
        table.to_str().unwrap(),
        "--groove-width",
        "0.0005",
    ]);
    assert!(output.status.success(), "{}", stdout(&output));
}

#[test]
fn validate_rejects_overlapping_wires() {
    let tmp = tempfile::tempdir().unwrap();
    let table = tmp.path().join("bad.csv");
    fs::write(
        &table,
        "r1,z,wire_radius\n0.01,-0.01,0.001\n0.01,-0.0005,0.001\n0.01,0.0005,0.001\n0.01,0.01,0.001\n",
    )
    .unwrap();

    let output = coilforge(&["validate", "--table", table.to_str().unwrap()]);
    assert!(!output.status.success());
}

#[test]
fn validate_rejects_a_lopsided_table() {
    let tmp = tempfile::tempdir().unwrap();
    let table = tmp.path().join("lopsided.csv");
    fs::write(
        &table,
        "r1,z,wire_radius\n0.01,-0.01,0.0001\n0.01,-0.004,0.0001\n0.01,0.003,0.0001\n0.01,0.01,0.0001\n",
    )
    .unwrap();

    let output = coilforge(&[
        "validate",
        "--table",
        table.to_str().unwrap(),
        "--groove-width",
        "0.0005",
    ]);
    assert!(!output.status.success());
}

#[test]
fn grooves_and_plot_run_on_a_stored_table() {
    let tmp = tempfile::tempdir().unwrap();
    let (out, _) = optimize_into(&tmp, &["--no-render"]);
    let table = out.join("wire_locations.csv");

    let grooves = coilforge(&[
        "grooves",
        "--table",
        table.to_str().unwrap(),
        "--style",
        "chamfer",
    ]);
    assert!(grooves.status.success());
    assert!(out.join("grooves.svg").exists());

    let plot = coilforge(&["plot", "--table", table.to_str().unwrap()]);
    assert!(plot.status.success());
    let text = stdout(&plot);
    for coil in ["NG", "Sol", "H 1", "H 2", "LW 1", "LW 2"] {
        assert!(text.contains(coil), "missing {} in\n{}", coil, text);
    }
    assert!(out.join("field_profile.csv").exists());
}

#[test]
fn unknown_groove_style_is_a_usage_error() {
    let output = coilforge(&["grooves", "--table", "x.csv", "--style", "round"]);
    assert!(!output.status.success());
}
