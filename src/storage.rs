use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use directories::ProjectDirs;

use crate::models::{AppSettings, AppTheme};

const SETTINGS_FILE: &str = "settings.json";

pub fn get_config_dir() -> PathBuf {
    ProjectDirs::from("", "", "pdfdesk")
        .map_or_else(|| PathBuf::from("."), |dirs| dirs.config_dir().to_path_buf())
}

pub fn settings_path() -> PathBuf {
    get_config_dir().join(SETTINGS_FILE)
}

fn atomic_write(path: &Path, data: &str) -> io::Result<()> {
    let tmp_path = path.with_extension("tmp");

    {
        let mut file = fs::File::create(&tmp_path)?;
        file.write_all(data.as_bytes())?;
        file.sync_all()?;
    }

    fs::rename(&tmp_path, path)
}

pub fn load_settings() -> AppSettings {
    load_settings_from(&settings_path())
}

/// Reads settings, salvaging what it can from a file that no longer matches
/// the current layout.
pub fn load_settings_from(path: &Path) -> AppSettings {
    let Ok(data) = fs::read_to_string(path) else {
        return AppSettings::default();
    };
    match serde_json::from_str::<AppSettings>(&data) {
        Ok(loaded) => loaded.sanitized(),
        Err(e) => {
            tracing::warn!(path = %path.display(), "corrupted settings, using defaults: {e}");
            let mut settings = AppSettings::default();
            if let Ok(value) = serde_json::from_str::<serde_json::Value>(&data)
                && let Some(obj) = value.as_object()
            {
                if let Some(theme) = obj.get("theme").and_then(|v| v.as_str()) {
                    settings.theme = AppTheme::from(theme);
                }
                if let Some(zoom) = obj.get("default_zoom").and_then(serde_json::Value::as_f64) {
                    settings.default_zoom = zoom as f32;
                }
            }
            settings.sanitized()
        }
    }
}

pub fn save_settings(settings: &AppSettings) {
    if let Err(e) = save_settings_to(&settings_path(), settings) {
        tracing::error!("failed to save settings: {e}");
    }
}

pub fn save_settings_to(path: &Path, settings: &AppSettings) -> io::Result<()> {
    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir)?;
    }
    let data = serde_json::to_string_pretty(settings)?;
    atomic_write(path, &data)?;
    tracing::debug!(path = %path.display(), "saved settings");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn settings_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join(SETTINGS_FILE);
        let settings = AppSettings {
            theme: AppTheme::Dark,
            default_zoom: 1.5,
        };
        save_settings_to(&path, &settings).unwrap();
        assert_eq!(load_settings_from(&path), settings);
        assert!(!path.with_extension("tmp").exists());
    }

    #[test]
    fn missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(
            load_settings_from(&dir.path().join(SETTINGS_FILE)),
            AppSettings::default()
        );
    }

    #[test]
    fn salvages_known_fields_from_corrupt_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(SETTINGS_FILE);
        fs::write(&path, r#"{"theme":"Light","default_zoom":"big"}"#).unwrap();
        let settings = load_settings_from(&path);
        assert_eq!(settings.theme, AppTheme::Light);
        assert_eq!(settings.default_zoom, AppSettings::default().default_zoom);
    }

    #[test]
    fn unreadable_json_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(SETTINGS_FILE);
        fs::write(&path, "{ not json").unwrap();
        assert_eq!(load_settings_from(&path), AppSettings::default());
    }
}
