//! Persisted game settings

use std::{fs, path::PathBuf, sync::Mutex};

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::state::DEFAULT_TIME_MINUTES;

/// On-disk settings schema - a single field today
#[derive(Debug, Clone, Serialize, Deserialize)]
struct PersistedSettings {
    time_minutes: u64,
}

/// Store for the one persisted setting: time per player in minutes
///
/// Loading is tolerant: a missing or unreadable file falls back to the
/// default rather than failing startup. The value is written back whenever
/// a new game is configured.
#[derive(Debug)]
pub struct SettingsStore {
    path: PathBuf,
    time_minutes: Mutex<u64>,
}

impl SettingsStore {
    /// Open the store at `path`, reading the persisted value if present
    pub fn open(path: PathBuf) -> Self {
        let time_minutes = match fs::read_to_string(&path) {
            Ok(contents) => match serde_json::from_str::<PersistedSettings>(&contents) {
                Ok(settings) if settings.time_minutes > 0 => {
                    info!(
                        "Loaded settings from {}: {} minutes per player",
                        path.display(),
                        settings.time_minutes
                    );
                    settings.time_minutes
                }
                Ok(settings) => {
                    warn!(
                        "Persisted time of {} minutes is not positive, using default",
                        settings.time_minutes
                    );
                    DEFAULT_TIME_MINUTES
                }
                Err(e) => {
                    warn!("Failed to parse settings file {}: {}", path.display(), e);
                    DEFAULT_TIME_MINUTES
                }
            },
            Err(_) => {
                info!(
                    "No settings file at {}, using default of {} minutes",
                    path.display(),
                    DEFAULT_TIME_MINUTES
                );
                DEFAULT_TIME_MINUTES
            }
        };

        Self {
            path,
            time_minutes: Mutex::new(time_minutes),
        }
    }

    /// Currently configured time per player in minutes
    pub fn time_minutes(&self) -> u64 {
        self.time_minutes
            .lock()
            .map(|minutes| *minutes)
            .unwrap_or(DEFAULT_TIME_MINUTES)
    }

    /// Update the configured time and write it back to disk
    pub fn set_time_minutes(&self, minutes: u64) -> Result<(), String> {
        {
            let mut current = self
                .time_minutes
                .lock()
                .map_err(|e| format!("Failed to lock settings: {}", e))?;
            *current = minutes;
        }

        let contents = serde_json::to_string_pretty(&PersistedSettings {
            time_minutes: minutes,
        })
        .map_err(|e| format!("Failed to serialize settings: {}", e))?;

        fs::write(&self.path, contents)
            .map_err(|e| format!("Failed to write settings file {}: {}", self.path.display(), e))?;

        info!("Persisted settings: {} minutes per player", minutes);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("game-clock-{}-{}.json", name, std::process::id()))
    }

    #[test]
    fn missing_file_yields_the_default() {
        let store = SettingsStore::open(scratch_path("missing"));
        assert_eq!(store.time_minutes(), DEFAULT_TIME_MINUTES);
    }

    #[test]
    fn corrupt_file_yields_the_default() {
        let path = scratch_path("corrupt");
        fs::write(&path, "not json").unwrap();
        let store = SettingsStore::open(path.clone());
        assert_eq!(store.time_minutes(), DEFAULT_TIME_MINUTES);
        let _ = fs::remove_file(path);
    }

    #[test]
    fn configured_time_round_trips() {
        let path = scratch_path("roundtrip");
        let store = SettingsStore::open(path.clone());
        store.set_time_minutes(25).unwrap();
        assert_eq!(store.time_minutes(), 25);

        let reopened = SettingsStore::open(path.clone());
        assert_eq!(reopened.time_minutes(), 25);
        let _ = fs::remove_file(path);
    }
}
