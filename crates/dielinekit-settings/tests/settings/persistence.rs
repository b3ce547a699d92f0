use dielinekit_designer::SnapMode;
use dielinekit_settings::{Config, SettingsError};
use std::path::PathBuf;

fn customized() -> Config {
    let mut config = Config::new();
    config.default_template = "fefco-0201".into();
    config.default_material = "corr_b".into();
    config.bleed_override = Some(2.5);
    config.editor.snap_mode = SnapMode::Vertex;
    config.editor.capture_radius = 6.0;
    config.export.include_dims = false;
    config.export.output_dir = Some(PathBuf::from("/tmp/dielines"));
    config
}

#[test]
fn test_toml_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("config.toml");
    let config = customized();
    config.save_to_file(&path).unwrap();

    let text = std::fs::read_to_string(&path).unwrap();
    assert!(text.contains("snap_mode = \"vertex\""));

    let loaded = Config::load_from_file(&path).unwrap();
    assert_eq!(loaded, config);
}

#[test]
fn test_json_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.json");
    let config = customized();
    config.save_to_file(&path).unwrap();
    assert_eq!(Config::load_from_file(&path).unwrap(), config);
}

#[test]
fn test_partial_file_uses_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(&path, "units = \"imperial\"\n\n[editor]\ngrid_step = 0.5\n").unwrap();

    let loaded = Config::load_from_file(&path).unwrap();
    assert_eq!(loaded.editor.grid_step, 0.5);
    assert_eq!(loaded.editor.snap_mode, SnapMode::Grid);
    assert_eq!(loaded.default_material, Config::default().default_material);
}

#[test]
fn test_rejects_invalid_files() {
    let dir = tempfile::tempdir().unwrap();

    let path = dir.path().join("config.yaml");
    assert!(matches!(
        Config::new().save_to_file(&path),
        Err(SettingsError::UnsupportedFormat(_))
    ));

    let path = dir.path().join("config.toml");
    std::fs::write(&path, "[editor]\ngrid_step = -1.0\n").unwrap();
    assert!(matches!(
        Config::load_from_file(&path),
        Err(SettingsError::InvalidSetting { .. })
    ));

    std::fs::write(&path, "units = ").unwrap();
    assert!(matches!(Config::load_from_file(&path), Err(SettingsError::TomlError(_))));
}

#[test]
fn test_missing_file_gives_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let config = Config::load_or_default(&dir.path().join("absent.toml")).unwrap();
    assert_eq!(config, Config::default());
}
