use std::fs;
use std::path::PathBuf;

use nmt_engine::{ConfigManager, EngineConfig, JsonConfigManager};

fn temp_config_path(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!("nmt-engine-{}-{}.json", name, std::process::id()))
}

#[test]
fn defaults_apply_when_fields_missing() {
    let config: EngineConfig =
        serde_json::from_str(r#"{"model_dir": "models/nmt/opus-mt-ja-en"}"#).unwrap();
    assert_eq!(config.max_steps, 50);
    assert_eq!(config.max_eos_count, 8);
}

#[test]
fn new_uses_decode_defaults() {
    let config = EngineConfig::new("models/nmt/opus-mt-ja-en");
    assert_eq!(config.max_steps, 50);
    assert_eq!(config.max_eos_count, 8);
}

#[tokio::test]
async fn json_manager_loads_and_caches() {
    let path = temp_config_path("load");
    fs::write(
        &path,
        r#"{"model_dir": "models/nmt/opus-mt-ja-en", "max_steps": 32, "max_eos_count": 4}"#,
    )
    .unwrap();

    let manager = JsonConfigManager::new(&path);
    let loaded = manager.load().await.unwrap();
    assert_eq!(loaded.max_steps, 32);
    assert_eq!(loaded.max_eos_count, 4);

    // current() must serve the cached snapshot even after the file is gone
    fs::remove_file(&path).unwrap();
    let current = manager.current().await.unwrap();
    assert_eq!(current.max_steps, 32);
}

#[tokio::test]
async fn missing_file_is_an_error() {
    let manager = JsonConfigManager::new("does/not/exist.json");
    assert!(manager.load().await.is_err());
}
