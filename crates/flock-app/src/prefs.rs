//! Persisted display preferences.
//!
//! Only two knobs survive between runs: whether trails are drawn and
//! the boid fill color. Stored as a small JSON document next to
//! whatever path the caller chooses.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::warn;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Preferences {
    /// Draw the per-boid position trail.
    pub show_path: bool,
    /// Boid fill color as a `#RRGGBB` hex string.
    pub color: String,
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            show_path: false,
            color: "#E0177B".to_string(),
        }
    }
}

impl Preferences {
    /// Load preferences. A missing, unreadable, or corrupt file falls
    /// back to defaults; preferences are a convenience, not state the
    /// run depends on.
    pub fn load(path: &Path) -> Self {
        if !path.exists() {
            return Self::default();
        }
        let raw = match fs::read_to_string(path) {
            Ok(raw) => raw,
            Err(err) => {
                warn!(path = %path.display(), %err, "Unreadable preferences, using defaults");
                return Self::default();
            }
        };
        match serde_json::from_str(&raw) {
            Ok(prefs) => prefs,
            Err(err) => {
                warn!(path = %path.display(), %err, "Corrupt preferences, using defaults");
                Self::default()
            }
        }
    }

    /// Write preferences back out, creating parent directories as needed.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)
                    .with_context(|| format!("creating {}", parent.display()))?;
            }
        }
        let raw = serde_json::to_string_pretty(self).context("serializing preferences")?;
        fs::write(path, raw)
            .with_context(|| format!("writing preferences to {}", path.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempdir().expect("tempdir");
        let path = dir.path().join("prefs.json");
        assert_eq!(Preferences::load(&path), Preferences::default());
    }

    #[test]
    fn round_trips_through_disk() {
        let dir = tempdir().expect("tempdir");
        let path = dir.path().join("nested").join("prefs.json");
        let prefs = Preferences {
            show_path: true,
            color: "#1E90FF".to_string(),
        };
        prefs.save(&path).expect("save");
        assert_eq!(Preferences::load(&path), prefs);
    }

    #[test]
    fn corrupt_file_falls_back_to_defaults() {
        let dir = tempdir().expect("tempdir");
        let path = dir.path().join("prefs.json");
        std::fs::write(&path, "{not json").expect("write");
        assert_eq!(Preferences::load(&path), Preferences::default());
    }
}
