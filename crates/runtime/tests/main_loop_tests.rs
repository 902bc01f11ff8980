use std::path::PathBuf;
use std::process::{Command, Output};

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/data").join(name)
}

fn run_cubeworld(args: &[&str]) -> Output {
    let output = Command::new(env!("CARGO_BIN_EXE_cubeworld"))
        .args(args)
        .env("RUST_LOG", "info")
        .output()
        .expect("Failed to spawn cubeworld");
    eprintln!("--- cubeworld STDOUT ---\n{}", String::from_utf8_lossy(&output.stdout));
    eprintln!("--- cubeworld STDERR ---\n{}", String::from_utf8_lossy(&output.stderr));
    output
}

#[test]
fn scripted_quit_ends_the_run() {
    let scene = fixture("quit.json");
    let output = run_cubeworld(&["--scene", scene.to_str().unwrap(), "--report-every", "15"]);
    assert!(output.status.success(), "exit status {:?}", output.status.code());

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("scene loaded"));
    assert!(stdout.contains("quit requested by scene"));
    assert!(stdout.contains("simulation finished"));
    assert!(stdout.contains("frames=45"));
    // The wall pokes through the left boundary.
    assert!(stdout.contains("contacts"));
    assert!(stdout.contains("remove event names no live body"));
}

#[test]
fn frame_limit_applies_without_quit_event() {
    let scene = fixture("quit.json");
    let output = run_cubeworld(&[
        "--scene",
        scene.to_str().unwrap(),
        "--frames",
        "5",
        "--dt",
        "0.02",
        "--report-every",
        "0",
    ]);
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("frames=5"));
    assert!(!stdout.contains("quit requested by scene"));
}

#[test]
fn realtime_clock_runs_and_stops() {
    let scene = fixture("quit.json");
    let output = run_cubeworld(&["--scene", scene.to_str().unwrap(), "--realtime", "--frames", "3"]);
    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stdout).contains("frames=3"));
}

#[test]
fn invalid_scenes_fail_with_context() {
    let output = run_cubeworld(&["--scene", fixture("broken.json").to_str().unwrap()]);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("invalid body 'a'"), "{stderr}");

    let output = run_cubeworld(&["--scene", fixture("does_not_exist.json").to_str().unwrap()]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("failed to read scene file"));
}

#[test]
fn negative_timestep_is_rejected() {
    let scene = fixture("quit.json");
    let output = run_cubeworld(&["--scene", scene.to_str().unwrap(), "--dt=-0.5"]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("frame 0 failed"));
}
