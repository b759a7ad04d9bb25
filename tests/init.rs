use std::process::Command;

#[test]
fn init_creates_valid_toml() {
    let dir = tempfile::tempdir().unwrap();

    let output = Command::new(env!("CARGO_BIN_EXE_satdtrack"))
        .arg("init")
        .current_dir(dir.path())
        .output()
        .unwrap();

    assert!(output.status.success(), "satdtrack init failed: {}", String::from_utf8_lossy(&output.stderr));

    let config_path = dir.path().join(".satdtrack.toml");
    assert!(config_path.exists(), ".satdtrack.toml should exist");

    let content = std::fs::read_to_string(&config_path).unwrap();
    assert!(content.contains("[mining]"));
    assert!(content.contains("[classifier]"));

    // Every option is commented out, so it parses to the defaults
    let config = satd_core::SatdConfig::from_toml(&content).unwrap();
    assert_eq!(config.mining.extensions, vec!["java"]);
    let _value: toml::Value = toml::from_str(&content).unwrap();
}

#[test]
fn init_refuses_if_exists() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join(".satdtrack.toml"), "# existing").unwrap();

    let output = Command::new(env!("CARGO_BIN_EXE_satdtrack"))
        .arg("init")
        .current_dir(dir.path())
        .output()
        .unwrap();

    assert!(!output.status.success());
    let content = std::fs::read_to_string(dir.path().join(".satdtrack.toml")).unwrap();
    assert_eq!(content, "# existing");
}
