use std::process::{Command, Output};

fn run(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_meter-sim"))
        .args(args)
        .env("RUST_LOG", "warn")
        .env_remove("PORT")
        .output()
        .expect("meter-sim should run")
}

fn reading_lines(stdout: &str) -> Vec<&str> {
    stdout
        .lines()
        .filter(|line| line.contains(" | ") && line.contains("kWh"))
        .collect()
}

#[test]
fn once_with_small_preset_prints_five_readings_and_summary() {
    let output = run(&["--once", "--preset", "small"]);
    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));

    let stdout = String::from_utf8(output.stdout).unwrap();
    let lines = reading_lines(&stdout);
    assert_eq!(lines.len(), 5, "stdout:\n{stdout}");
    for (i, line) in lines.iter().enumerate() {
        assert!(
            line.starts_with(&format!("ENTITY-{:03}", i + 1)),
            "unexpected line order: {line}"
        );
    }
    assert!(stdout.contains("--- Fleet Summary ---"));
    assert!(stdout.contains("Meters:        5"));
}

#[test]
fn once_with_scenario_file_and_overrides_exports_csv() {
    let dir = tempfile::tempdir().unwrap();
    let csv_path = dir.path().join("snapshot.csv");
    let output = run(&[
        "--once",
        "--scenario",
        concat!(env!("CARGO_MANIFEST_DIR"), "/scenarios/demo.toml"),
        "--meters",
        "3",
        "--id-prefix",
        "HOUSE",
        "--telemetry-out",
        csv_path.to_str().unwrap(),
    ]);
    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));

    let content = std::fs::read_to_string(&csv_path).unwrap();
    let lines: Vec<&str> = content.lines().collect();
    assert_eq!(lines[0], "deviceId,timestamp,value,unit,status");
    assert_eq!(lines.len(), 4);
    assert!(lines[1].starts_with("HOUSE-001,"));
    assert!(lines[3].starts_with("HOUSE-003,"));
}

#[test]
fn bundled_scenarios_are_valid() {
    for file in ["demo.toml", "evening_peak.toml"] {
        let path = format!("{}/scenarios/{file}", env!("CARGO_MANIFEST_DIR"));
        let output = run(&["--once", "--scenario", &path, "--meters", "2"]);
        assert!(
            output.status.success(),
            "{file} failed: {}",
            String::from_utf8_lossy(&output.stderr)
        );
    }
}

#[test]
fn unknown_preset_fails_with_message() {
    let output = run(&["--once", "--preset", "bogus"]);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("unknown preset"), "stderr: {stderr}");
}

#[test]
fn invalid_overrides_are_rejected() {
    let output = run(&["--once", "--meters", "0", "--interval-ms", "0"]);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("simulation.meters"), "stderr: {stderr}");
    assert!(stderr.contains("simulation.interval_ms"), "stderr: {stderr}");
}
