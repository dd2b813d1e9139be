use std::process::Command;

fn temp_path(label: &str) -> std::path::PathBuf {
    std::env::temp_dir().join(format!(
        "staminaplan-cli-{label}-{}",
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap_or_default()
            .as_nanos()
    ))
}

#[test]
fn cli_list_scenarios_writes_output() {
    let exe = env!("CARGO_BIN_EXE_staminaplan");
    let output_path = temp_path("list");
    let status = Command::new(exe)
        .args(["--list-scenarios", "--output"])
        .arg(&output_path)
        .status()
        .expect("run cli");
    assert!(status.success());
    let content = std::fs::read_to_string(output_path).expect("read output");
    assert!(content.contains("Available scenarios"));
    assert!(content.contains("reference-default"));
}

#[test]
fn cli_plan_writes_csv_report() {
    let exe = env!("CARGO_BIN_EXE_staminaplan");
    let output_path = temp_path("plan.csv");
    let output = Command::new(exe)
        .args([
            "--start", "50", "--target", "30", "--turns", "2", "--report", "csv", "--output",
        ])
        .arg(&output_path)
        .output()
        .expect("run cli");
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("StaminaPlan"));

    let content = std::fs::read_to_string(output_path).expect("read output");
    let lines: Vec<&str> = content.lines().collect();
    assert_eq!(
        lines[0],
        "rank,label,tag,recommended,final_stamina,deviation,school,research,fitness,work,rest"
    );
    assert_eq!(lines[1], "1,Plan 1,perfect_match,true,30,0,0,0,0,1,1");
    assert_eq!(lines.len(), 3);
}

#[test]
fn cli_verify_runs_all_scenarios_as_json() {
    let exe = env!("CARGO_BIN_EXE_staminaplan");
    let output_path = temp_path("verify.json");
    let output = Command::new(exe)
        .args(["--mode", "verify", "--report", "json", "--output"])
        .arg(&output_path)
        .output()
        .expect("run cli");
    assert!(output.status.success());
    let content = std::fs::read_to_string(output_path).expect("read output");
    let parsed: serde_json::Value = serde_json::from_str(&content).expect("json report");
    let results = parsed.as_array().expect("array");
    assert_eq!(results.len(), 5);
    assert!(results.iter().all(|r| r["passed"] == true));
}

#[test]
fn cli_interactive_reads_commands_from_stdin() {
    use std::io::Write;
    use std::process::Stdio;

    let exe = env!("CARGO_BIN_EXE_staminaplan");
    let mut child = Command::new(exe)
        .args(["--mode", "interactive", "--limit", "1"])
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .spawn()
        .expect("spawn cli");
    child
        .stdin
        .take()
        .expect("stdin")
        .write_all(b"skill +\ncosts\nquit\n")
        .expect("write commands");
    let output = child.wait_with_output().expect("wait cli");
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Skill Lv.1"));
    assert!(stdout.contains("Results"));
}

#[test]
fn cli_rejects_missing_catalog_file() {
    let exe = env!("CARGO_BIN_EXE_staminaplan");
    let output = Command::new(exe)
        .args(["--actions", "/nonexistent/actions.json"])
        .output()
        .expect("run cli");
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("failed to load planner inputs"));
}
