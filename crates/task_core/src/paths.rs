use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};

/// Application data directory (~/.taskdeck).
pub fn taskdeck_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(std::env::temp_dir)
        .join(".taskdeck")
}

/// Path of the persisted credential slots under `data_dir`. Owns the file
/// name so the store and its callers cannot drift apart.
pub fn credentials_json_path(data_dir: &Path) -> PathBuf {
    data_dir.join(".session.json")
}

/// Load a JSON file into a deserializable value.
pub fn load_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T> {
    if !path.exists() {
        return Err(anyhow!("file not found: {}", path.display()));
    }
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    serde_json::from_str(&content)
        .with_context(|| format!("failed to parse {}", path.display()))
}

/// Save a serializable value as pretty-printed JSON.
pub fn save_json<T: serde::Serialize>(path: &Path, value: &T) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }
    let content = serde_json::to_string_pretty(value).context("failed to serialize value")?;
    std::fs::write(path, content).with_context(|| format!("failed to write {}", path.display()))
}
