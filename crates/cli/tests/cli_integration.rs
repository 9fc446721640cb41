use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use std::time::{SystemTime, UNIX_EPOCH};

fn make_temp_dir(prefix: &str) -> PathBuf {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("system clock is before UNIX_EPOCH")
        .as_nanos();
    let pid = std::process::id();
    let dir = std::env::temp_dir().join(format!("flagwise-integ-{prefix}-{pid}-{nanos}"));
    fs::create_dir_all(&dir).expect("failed to create temp dir");
    dir
}

fn flagwise() -> Command {
    Command::new(env!("CARGO_BIN_EXE_flagwise"))
}

fn init_manifest(dir: &Path) -> PathBuf {
    let out = flagwise()
        .arg("init")
        .arg(dir)
        .output()
        .expect("failed to run flagwise init");
    assert_success(&out, "flagwise init");
    dir.join("flagwise.json")
}

fn assert_success(out: &Output, what: &str) {
    assert!(
        out.status.success(),
        "{what} failed:\nstatus: {}\nstderr:\n{}",
        out.status,
        String::from_utf8_lossy(&out.stderr),
    );
}

#[test]
fn help_works() {
    let out = flagwise()
        .arg("--help")
        .output()
        .expect("failed to run flagwise --help");
    assert_success(&out, "flagwise --help");
    let stdout = String::from_utf8_lossy(&out.stdout);
    assert!(
        stdout.contains("check") && stdout.contains("usage") && stdout.contains("init"),
        "unexpected help output:\n{stdout}"
    );
}

#[test]
fn init_writes_manifest_once() {
    let dir = make_temp_dir("init");
    let manifest = init_manifest(&dir);
    assert!(manifest.is_file(), "flagwise.json not created");

    let text = fs::read_to_string(&manifest).unwrap();
    let json: serde_json::Value = serde_json::from_str(&text).expect("manifest is JSON");
    assert_eq!(json["binary"], "greet");
    assert_eq!(json["flags"][0]["flag"], "--name");

    let out = flagwise()
        .arg("init")
        .arg(&dir)
        .output()
        .expect("failed to run flagwise init");
    assert!(!out.status.success(), "second init should refuse to overwrite");
    assert!(String::from_utf8_lossy(&out.stderr).contains("already exists"));

    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn check_prints_resolved_flags() {
    let dir = make_temp_dir("check-ok");
    let manifest = init_manifest(&dir);

    let out = flagwise()
        .arg("check")
        .arg("--manifest")
        .arg(&manifest)
        .args(["--", "greet", "--name=Alice", "notes.txt"])
        .output()
        .expect("failed to run flagwise check");
    assert_success(&out, "flagwise check");
    let stdout = String::from_utf8_lossy(&out.stdout);
    assert_eq!(stdout, "--name=Alice\n--greeting=Hello\nnotes.txt\n");

    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn check_json_output() {
    let dir = make_temp_dir("check-json");
    let manifest = init_manifest(&dir);

    let out = flagwise()
        .arg("check")
        .arg("-m")
        .arg(&manifest)
        .arg("--json")
        .args(["--", "greet", "-n", "Bob", "-g", "Hi", "a.txt"])
        .output()
        .expect("failed to run flagwise check --json");
    assert_success(&out, "flagwise check --json");
    let json: serde_json::Value = serde_json::from_slice(&out.stdout).expect("stdout is JSON");
    assert_eq!(json["status"], "ready");
    assert_eq!(json["flags"]["--name"], "Bob");
    assert_eq!(json["flags"]["--greeting"], "Hi");
    assert_eq!(json["nonFlags"][0], "a.txt");

    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn check_rejects_missing_required_flag() {
    let dir = make_temp_dir("check-missing");
    let manifest = init_manifest(&dir);

    let out = flagwise()
        .arg("check")
        .arg("-m")
        .arg(&manifest)
        .args(["--", "greet", "notes.txt"])
        .output()
        .expect("failed to run flagwise check");
    assert_eq!(out.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&out.stderr);
    assert!(stderr.contains("Usage: greet "), "stderr:\n{stderr}");
    assert!(stderr.contains("must specify --name"), "stderr:\n{stderr}");
    assert!(out.stdout.is_empty());

    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn check_help_prints_usage() {
    let dir = make_temp_dir("check-help");
    let manifest = init_manifest(&dir);

    let out = flagwise()
        .arg("check")
        .arg("-m")
        .arg(&manifest)
        .args(["--", "greet", "-h"])
        .output()
        .expect("failed to run flagwise check");
    assert_success(&out, "flagwise check -- greet -h");
    let stdout = String::from_utf8_lossy(&out.stdout);
    assert!(stdout.starts_with("Usage: greet "), "stdout:\n{stdout}");
    assert!(stdout.contains("Required flags:"));
    assert!(stdout.contains("--help/-h"));

    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn usage_uses_binary_override() {
    let dir = make_temp_dir("usage");
    let manifest = init_manifest(&dir);

    let out = flagwise()
        .arg("usage")
        .arg("-m")
        .arg(&manifest)
        .args(["--binary", "hello"])
        .output()
        .expect("failed to run flagwise usage");
    assert_success(&out, "flagwise usage");
    let stdout = String::from_utf8_lossy(&out.stdout);
    assert!(
        stdout.starts_with(
            "Usage: hello [--greeting=value|-g=value] [--verbose|-v] [--help|-h] --name=value|-n=value <--> nonflag1 \n"
        ),
        "stdout:\n{stdout}"
    );
    assert!(stdout.ends_with("\nExample: greet --name Alice notes.txt\n"));

    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn missing_manifest_is_reported() {
    let dir = make_temp_dir("no-manifest");
    let out = flagwise()
        .arg("usage")
        .arg("-m")
        .arg(dir.join("absent.json"))
        .output()
        .expect("failed to run flagwise usage");
    assert!(!out.status.success());
    assert!(String::from_utf8_lossy(&out.stderr).contains("failed to read"));

    let _ = fs::remove_dir_all(&dir);
}
