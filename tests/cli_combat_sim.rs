use serde_json::Value;
use std::fs;
use std::path::PathBuf;
use std::process::{Command, Output};
use std::time::{SystemTime, UNIX_EPOCH};

fn unique_temp_dir(prefix: &str) -> PathBuf {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("time went backwards")
        .as_nanos();
    let dir = std::env::temp_dir().join(format!(
        "raidsim-rs-{prefix}-{}-{nanos}",
        std::process::id()
    ));
    fs::create_dir_all(&dir).expect("create temp dir");
    dir
}

fn write_file(dir: &PathBuf, name: &str, contents: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, contents).expect("write temp file");
    path
}

const MAGE_SPEC: &str = r#"
{
    "schema_version": 1,
    "iterations": 3,
    "seed": 42,
    "encounter": {
        "duration_secs": 60.0,
        "targets": [ { "name": "Boss", "debuffs": [ { "name": "misery" } ] } ]
    },
    "player": {
        "name": "mage",
        "stats": { "spell_power": 1000.0, "spell_crit": 300.0, "spell_hit": 100.0, "mana": 10000.0 },
        "resources": { "mana": {} },
        "spells": [
            {
                "name": "frostbolt",
                "id": 27072,
                "school": "frost",
                "resource": "mana",
                "cost": 345.0,
                "cast_time_secs": 2.5,
                "damage": { "kind": "spell_power", "min": 600.0, "max": 647.0, "coefficient": 0.814 },
                "outcome": "magic_hit_and_crit"
            }
        ],
        "rotation": [ "frostbolt" ]
    }
}
"#;

fn run_sim(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_combat_sim"))
        .args(args)
        .output()
        .expect("run combat_sim")
}

fn assert_success(output: &Output) {
    assert!(
        output.status.success(),
        "combat_sim failed: stderr={}",
        String::from_utf8_lossy(&output.stderr)
    );
}

#[test]
fn combat_sim_prints_a_dps_summary() {
    let dir = unique_temp_dir("summary");
    let spec = write_file(&dir, "mage.json", MAGE_SPEC);

    let output = run_sim(&["--config", spec.to_str().unwrap()]);
    assert_success(&output);

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("iterations: 3"), "stdout={stdout}");
    let line = stdout
        .lines()
        .find(|l| l.starts_with("mage: dps mean="))
        .expect("summary line for mage");
    assert!(line.contains("stdev=") && line.contains("min=") && line.contains("max="));

    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn combat_sim_report_is_reproducible_for_a_seed() {
    let dir = unique_temp_dir("report");
    let spec = write_file(&dir, "mage.json", MAGE_SPEC);
    let first = dir.join("first.json");
    let second = dir.join("second.json");

    for out in [&first, &second] {
        let output = run_sim(&[
            "--config",
            spec.to_str().unwrap(),
            "--iterations",
            "5",
            "--seed",
            "7",
            "--report-json",
            out.to_str().unwrap(),
            "--quiet",
        ]);
        assert_success(&output);
        assert!(output.stdout.is_empty(), "--quiet should print nothing");
    }

    let a = fs::read(&first).expect("read first report");
    let b = fs::read(&second).expect("read second report");
    assert_eq!(a, b, "same seed must give byte-identical reports");

    let v: Value = serde_json::from_slice(&a).expect("parse report");
    assert_eq!(v["summary"]["iterations"], 5);
    assert_eq!(v["summary"]["base_seed"], 7);
    let iterations = v["iterations"].as_array().expect("iterations array");
    assert_eq!(iterations.len(), 5);
    assert_eq!(iterations[4]["seed"], 11);

    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn combat_sim_writes_the_first_iteration_log() {
    let dir = unique_temp_dir("log");
    let spec = write_file(&dir, "mage.json", MAGE_SPEC);
    let log = dir.join("log.json");

    let output = run_sim(&[
        "--config",
        spec.to_str().unwrap(),
        "--duration-secs",
        "10",
        "--log-json",
        log.to_str().unwrap(),
        "--quiet",
    ]);
    assert_success(&output);

    let raw = fs::read_to_string(&log).expect("read log.json");
    let v: Value = serde_json::from_str(&raw).expect("parse log.json");
    assert_eq!(v["seed"], 42);
    let events = v["events"].as_array().expect("events array");
    assert!(!events.is_empty());
    assert_eq!(
        events[0].get("kind").and_then(|k| k.as_str()),
        Some("aura_gained"),
        "the permanent debuff is applied before the first cast"
    );
    let last_t = events
        .iter()
        .filter_map(|e| e["t_ns"].as_u64())
        .max()
        .expect("timestamps");
    assert!(last_t <= 10_000_000_000);
    assert!(events.iter().any(|e| e["kind"] == "cast_complete"));

    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn combat_sim_reports_config_errors() {
    let dir = unique_temp_dir("errors");
    let bad = write_file(
        &dir,
        "bad.json",
        &MAGE_SPEC.replace("\"misery\"", "\"curse_of_nonsense\""),
    );

    let output = run_sim(&["--config", bad.to_str().unwrap()]);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("unknown effect 'curse_of_nonsense'"), "stderr={stderr}");

    let missing = dir.join("missing.json");
    let output = run_sim(&["--config", missing.to_str().unwrap()]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("failed to read"));

    let _ = fs::remove_dir_all(&dir);
}
