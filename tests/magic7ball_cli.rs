use std::fs;
use std::path::PathBuf;
use std::process::{Command, Stdio};
use std::time::{SystemTime, UNIX_EPOCH};

fn combined_output(output: &std::process::Output) -> String {
    let mut combined = String::new();
    combined.push_str(&String::from_utf8_lossy(&output.stdout));
    combined.push_str(&String::from_utf8_lossy(&output.stderr));
    combined
}

fn magic7ball_bin() -> &'static str {
    option_env!("CARGO_BIN_EXE_magic7ball").expect("magic7ball test binary not built")
}

fn scratch_dir(label: &str) -> PathBuf {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("clock")
        .as_nanos();
    let dir = std::env::temp_dir().join(format!("magic7ball_cli_{label}_{nanos}"));
    fs::create_dir_all(&dir).expect("create scratch dir");
    dir
}

#[test]
fn magic7ball_help_mentions_name() {
    let output = Command::new(magic7ball_bin())
        .arg("--help")
        .output()
        .expect("run magic7ball --help");
    assert!(output.status.success());
    let combined = combined_output(&output);
    assert!(combined.contains("Magic 7-Ball"));
    assert!(combined.contains("--print-config"));
}

#[test]
fn magic7ball_print_config_reports_effective_values() {
    let dir = scratch_dir("print");
    let config = dir.join("show.yaml");
    fs::write(
        &config,
        "name: \"Oracle\"\nui:\n  fps: 30\noutcomes:\n  - text: \"Yes\"\n    type: positive\n",
    )
    .expect("write config");

    let output = Command::new(magic7ball_bin())
        .arg("--config")
        .arg(&config)
        .args(["--print-config", "--fps", "24", "--no-fades", "--no-logs"])
        .env_remove("MAGIC7BALL_LOGS")
        .stdin(Stdio::null())
        .output()
        .expect("run magic7ball --print-config");
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(output.status.success(), "{}", combined_output(&output));

    let json: serde_json::Value = serde_json::from_str(&stdout).expect("print-config emits JSON");
    assert_eq!(json["name"], "Oracle");
    assert_eq!(json["ui"]["fps"], 24);
    assert_eq!(json["behavior"]["fades_enabled"], false);
    assert_eq!(json["outcomes"][0]["text"], "Yes");
    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn magic7ball_rejects_zero_fps() {
    let output = Command::new(magic7ball_bin())
        .args(["--fps", "0", "--print-config", "--no-logs"])
        .output()
        .expect("run magic7ball --fps 0");
    assert!(!output.status.success());
    assert!(combined_output(&output).contains("fps"));
}
