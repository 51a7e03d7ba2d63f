use std::net::TcpListener;
use std::path::PathBuf;
use std::process::Command;

fn unique_temp_dir(tag: &str) -> PathBuf {
    let dir = PathBuf::from(format!(
        "/tmp/remeha2mqtt-{tag}-{}-{}",
        std::process::id(),
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .expect("time should be after epoch")
            .as_nanos()
    ));
    std::fs::create_dir_all(&dir).expect("temp dir should be creatable");
    dir
}

/// A local port nothing listens on.
fn free_port() -> u16 {
    let listener = TcpListener::bind("127.0.0.1:0").expect("ephemeral port should bind");
    listener
        .local_addr()
        .expect("bound socket should have an address")
        .port()
}

#[test]
fn version_prints_package_version() {
    let output = Command::new(env!("CARGO_BIN_EXE_remeha2mqtt"))
        .arg("version")
        .output()
        .expect("version should run");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert_eq!(
        stdout.trim(),
        format!("remeha2mqtt {}", env!("CARGO_PKG_VERSION"))
    );
}

#[test]
fn version_extended_lists_build_provenance() {
    let output = Command::new(env!("CARGO_BIN_EXE_remeha2mqtt"))
        .arg("version")
        .arg("--extended")
        .output()
        .expect("version should run");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("name: remeha2mqtt"));
    assert!(stdout.contains("target_os:"));
    assert!(stdout.contains("rustc:"));
}

#[test]
fn run_without_config_exits_with_config_code() {
    let output = Command::new(env!("CARGO_BIN_EXE_remeha2mqtt"))
        .arg("run")
        .arg("--config")
        .arg("/nonexistent/remeha2mqtt.conf")
        .output()
        .expect("run should start");

    assert_eq!(output.status.code(), Some(71));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("config load failed"), "stderr: {stderr}");
}

#[test]
fn invalid_port_exits_with_config_code() {
    let dir = unique_temp_dir("badport");
    let config_path = dir.join("remeha2mqtt.conf");
    std::fs::write(&config_path, "broker = localhost\nport = not-a-number\n")
        .expect("config file should be writable");

    let output = Command::new(env!("CARGO_BIN_EXE_remeha2mqtt"))
        .arg("run")
        .arg("--config")
        .arg(&config_path)
        .output()
        .expect("run should start");

    assert_eq!(output.status.code(), Some(71));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("invalid port value"), "stderr: {stderr}");

    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn announce_without_config_exits_with_config_code() {
    let output = Command::new(env!("CARGO_BIN_EXE_remeha2mqtt"))
        .arg("announce")
        .arg("--config")
        .arg("/nonexistent/remeha2mqtt.conf")
        .output()
        .expect("announce should start");

    assert_eq!(output.status.code(), Some(71));
}

#[test]
fn dump_with_missing_interface_reports_bus_failure() {
    let output = Command::new(env!("CARGO_BIN_EXE_remeha2mqtt"))
        .arg("dump")
        .arg("--interface")
        .arg("nonexistent0")
        .arg("--count")
        .arg("1")
        .output()
        .expect("dump should start");

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("bus open failed"), "stderr: {stderr}");
}

#[test]
fn doctor_fails_without_config() {
    let output = Command::new(env!("CARGO_BIN_EXE_remeha2mqtt"))
        .arg("--format")
        .arg("json")
        .arg("doctor")
        .arg("--config")
        .arg("/nonexistent/remeha2mqtt.conf")
        .output()
        .expect("doctor should run");

    assert_eq!(output.status.code(), Some(30));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("\"overall\":\"fail\""), "stdout: {stdout}");
    // Checks that depend on the config are skipped, not failed.
    assert!(stdout.contains("\"status\":\"skip\""), "stdout: {stdout}");
}

#[test]
fn doctor_probes_configured_endpoints() {
    let dir = unique_temp_dir("doctor");
    let config_path = dir.join("remeha2mqtt.conf");
    std::fs::write(
        &config_path,
        format!(
            "broker = 127.0.0.1\nport = {}\ncan_interface = nonexistent0\n",
            free_port()
        ),
    )
    .expect("config file should be writable");

    let output = Command::new(env!("CARGO_BIN_EXE_remeha2mqtt"))
        .arg("--format")
        .arg("json")
        .arg("doctor")
        .arg("--config")
        .arg(&config_path)
        .output()
        .expect("doctor should run");

    // The config itself parses; the probes against dead endpoints fail.
    assert_eq!(output.status.code(), Some(30));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(
        stdout.contains("\"name\":\"config_file\",\"status\":\"pass\""),
        "stdout: {stdout}"
    );
    assert!(stdout.contains("\"overall\":\"fail\""), "stdout: {stdout}");

    let _ = std::fs::remove_dir_all(&dir);
}
