use anyhow::Context;
use runo_core::GameConfig;
use std::fs;
use std::path::Path;

/// Game-rule overrides from an optional JSON file; defaults when the file
/// does not exist. Missing fields fall back to their defaults too.
pub fn load_game_config(path: &Path) -> anyhow::Result<GameConfig> {
    if !path.exists() {
        return Ok(GameConfig::default());
    }
    let raw = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    let config = serde_json::from_str(&raw).with_context(|| format!("parse {}", path.display()))?;
    Ok(config)
}
