use assert_cmd::Command;

#[test]
fn help_describes_options() {
    let output = Command::cargo_bin("flowtimer")
        .unwrap()
        .arg("--help")
        .output()
        .unwrap();

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("--config"));
    assert!(stdout.contains("--protect-first-row"));
}

#[test]
fn version_flag_prints_version() {
    let output = Command::cargo_bin("flowtimer")
        .unwrap()
        .arg("--version")
        .output()
        .unwrap();

    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stdout).contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn refuses_to_run_without_a_tty() {
    let dir = tempfile::tempdir().unwrap();
    Command::cargo_bin("flowtimer")
        .unwrap()
        .arg("--config")
        .arg(dir.path().join("config.json"))
        .write_stdin("")
        .assert()
        .failure();
}
