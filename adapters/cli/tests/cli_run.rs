use std::{fs, path::PathBuf, process::Command};

fn scratch_file(name: &str, contents: &str) -> PathBuf {
    let path = std::env::temp_dir().join(format!("mouse-forage-{}-{name}", std::process::id()));
    fs::write(&path, contents).expect("scratch file is writable");
    path
}

#[test]
fn headless_run_prints_frame_and_score_summary() {
    let output = Command::new(env!("CARGO_BIN_EXE_mouse-forage"))
        .args(["--seed", "3", "--ticks", "1500", "--grid-size", "6"])
        .output()
        .expect("binary runs");

    assert!(output.status.success(), "run failed: {output:?}");
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("round "), "missing status line: {stdout}");
    assert!(
        stdout.contains("There have been"),
        "missing score summary: {stdout}"
    );
}

#[test]
fn config_file_and_scenario_are_honoured() {
    let config = scratch_file(
        "config.toml",
        "grid_width = 10\ngrid_height = 10\nscent_mode = \"max\"\n",
    );
    let scenario = scratch_file(
        "scenario.toml",
        "agent = { x = 5, y = 7 }\nfood = [{ x = 5, y = 5 }]\n",
    );

    let output = Command::new(env!("CARGO_BIN_EXE_mouse-forage"))
        .arg("--config")
        .arg(&config)
        .arg("--scenario")
        .arg(&scenario)
        .args(["--ticks", "2"])
        .output()
        .expect("binary runs");

    assert!(output.status.success(), "run failed: {output:?}");
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(
        stdout.contains("score 98  energy 100  food 1"),
        "unexpected final frame: {stdout}"
    );
    assert!(stdout.contains("no round has finished yet"));
}

#[test]
fn non_square_config_is_rejected() {
    let config = scratch_file("bad.toml", "grid_width = 8\ngrid_height = 5\n");

    let output = Command::new(env!("CARGO_BIN_EXE_mouse-forage"))
        .arg("--config")
        .arg(&config)
        .output()
        .expect("binary runs");

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("grid must be square"), "stderr: {stderr}");
}
