use anyhow::{bail, Context};
use chipputt_core::MatchState;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

pub const SAVE_SCHEMA_VERSION: u32 = 1;
const SAVE_ENV: &str = "CHIPPUTT_SAVE";
const SAVE_FILE_NAME: &str = ".chipputt_state.json";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SavedMatch {
    pub version: u32,
    /// Milliseconds since the unix epoch.
    pub saved_at: i64,
    pub state: MatchState,
}

pub fn default_state_path() -> Option<PathBuf> {
    if let Some(path) = std::env::var_os(SAVE_ENV) {
        return Some(PathBuf::from(path));
    }
    std::env::var_os("HOME").map(|home| PathBuf::from(home).join(SAVE_FILE_NAME))
}

pub fn save_state_file(state: &MatchState, path: &Path) -> anyhow::Result<SavedMatch> {
    let payload = SavedMatch {
        version: SAVE_SCHEMA_VERSION,
        saved_at: chrono::Utc::now().timestamp_millis(),
        state: state.clone(),
    };
    let body = serde_json::to_string_pretty(&payload).context("serialize save")?;
    if let Some(parent) = path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
        fs::create_dir_all(parent).with_context(|| format!("create {}", parent.display()))?;
    }
    fs::write(path, body).with_context(|| format!("write {}", path.display()))?;
    Ok(payload)
}

pub fn load_state_file(path: &Path) -> anyhow::Result<SavedMatch> {
    let body = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    let payload: SavedMatch =
        serde_json::from_str(&body).with_context(|| format!("parse {}", path.display()))?;
    if payload.version != SAVE_SCHEMA_VERSION {
        bail!(
            "unsupported save version {} (expected {})",
            payload.version,
            SAVE_SCHEMA_VERSION
        );
    }
    Ok(payload)
}
