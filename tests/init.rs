use std::process::Command;

#[test]
fn init_creates_valid_toml() {
    let dir = tempfile::tempdir().unwrap();

    let output = Command::new(env!("CARGO_BIN_EXE_wikigraph"))
        .arg("init")
        .current_dir(dir.path())
        .output()
        .unwrap();

    assert!(
        output.status.success(),
        "wikigraph init failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );

    let config_path = dir.path().join(".wikigraph.toml");
    assert!(config_path.exists(), ".wikigraph.toml should exist");

    let content = std::fs::read_to_string(&config_path).unwrap();
    assert!(content.contains("[site]"));
    assert!(content.contains("[graph]"));

    // The template must parse and leave every setting at its default.
    let config = wikigraph_core::WikigraphConfig::from_toml(&content).unwrap();
    assert_eq!(config.graph.output, "assets/js/graph.json");
    assert_eq!(config.graph.sizing, wikigraph_core::SizingMode::Depth);
    let _raw: toml::Value = toml::from_str(&content).unwrap();
}

#[test]
fn init_refuses_if_exists() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join(".wikigraph.toml"), "# existing").unwrap();

    let output = Command::new(env!("CARGO_BIN_EXE_wikigraph"))
        .arg("init")
        .current_dir(dir.path())
        .output()
        .unwrap();

    assert!(!output.status.success());
    let existing = std::fs::read_to_string(dir.path().join(".wikigraph.toml")).unwrap();
    assert_eq!(existing, "# existing");
}
