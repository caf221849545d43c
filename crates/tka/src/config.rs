use crate::events::AppEvent;
use async_channel::Sender;
use directories::ProjectDirs;
use notify::{EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use pictograph::PictographEnv;
use pictograph::constants::{DEFAULT_BETA_OFFSET, GridMode, PropType};
use pictograph::pictograph::GlyphVisibility;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const SETTINGS_FILE: &str = "settings.toml";

fn default_beta_offset() -> f64 {
    DEFAULT_BETA_OFFSET
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct Settings {
    #[serde(default)]
    pub data_dir: Option<PathBuf>,
    #[serde(default)]
    pub author: String,
    #[serde(default)]
    pub prop_type: PropType,
    #[serde(default)]
    pub grid_mode: GridMode,
    #[serde(default = "default_beta_offset")]
    pub beta_offset: f64,
    #[serde(default)]
    pub glyphs: GlyphVisibility,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            data_dir: None,
            author: String::new(),
            prop_type: PropType::default(),
            grid_mode: GridMode::default(),
            beta_offset: DEFAULT_BETA_OFFSET,
            glyphs: GlyphVisibility::default(),
        }
    }
}

impl Settings {
    pub fn apply_to(&self, env: &mut PictographEnv) {
        env.beta_offset = self.beta_offset;
        env.visibility = self.glyphs;
        env.prop_type = self.prop_type;
    }

    pub fn pictograph_env(&self) -> PictographEnv {
        let mut env = PictographEnv::embedded();
        self.apply_to(&mut env);
        env
    }
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to determine config directory")]
    ConfigDirNotFound,
    #[error("Config error: {0}")]
    Config(#[from] config::ConfigError),
}

pub fn project_dirs() -> Result<ProjectDirs, ConfigError> {
    ProjectDirs::from("org", "kinetic-alphabet", "tka").ok_or(ConfigError::ConfigDirNotFound)
}

pub fn get_settings_path() -> Result<PathBuf, ConfigError> {
    Ok(project_dirs()?.config_dir().join(SETTINGS_FILE))
}

pub fn load_settings_from(path: &Path) -> Result<Settings, ConfigError> {
    let s = config::Config::builder()
        .add_source(config::File::from(path).required(false))
        .add_source(
            config::Environment::with_prefix("TKA")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    Ok(s.try_deserialize()?)
}

pub fn load_settings() -> Result<Settings, ConfigError> {
    load_settings_from(&get_settings_path()?)
}

/// A missing file gives defaults silently; a broken one gives defaults and an
/// error in the log.
pub fn load_or_default_from(path: &Path) -> Settings {
    match load_settings_from(path) {
        Ok(settings) => settings,
        Err(e) => {
            log::error!("Ignoring settings at {}: {}", path.display(), e);
            Settings::default()
        }
    }
}

pub fn load_or_default() -> Settings {
    match get_settings_path() {
        Ok(path) => load_or_default_from(&path),
        Err(e) => {
            log::error!("{}", e);
            Settings::default()
        }
    }
}

/// The JSON effect configuration as a plain map. Missing is empty without
/// complaint; anything unreadable is empty with a warning.
pub fn load_effect_config(path: &Path) -> Map<String, Value> {
    let content = match fs_err::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Map::new(),
        Err(e) => {
            log::warn!("{}", e);
            return Map::new();
        }
    };
    match serde_json::from_str::<Value>(&content) {
        Ok(Value::Object(map)) => map,
        Ok(_) => {
            log::warn!("{} is not a JSON object", path.display());
            Map::new()
        }
        Err(e) => {
            log::warn!("Invalid JSON in {}: {}", path.display(), e);
            Map::new()
        }
    }
}

/// Sends `ConfigReload` whenever one of `files` is created, modified or
/// removed. Watches the parent directories so editors that replace files by
/// rename are still seen.
pub async fn run_async_watcher(tx: Sender<AppEvent>, files: Vec<PathBuf>) {
    let dirs: BTreeSet<PathBuf> = files
        .iter()
        .filter_map(|f| f.parent().map(Path::to_path_buf))
        .collect();

    for dir in &dirs {
        if let Err(e) = fs_err::create_dir_all(dir) {
            log::error!("Failed to create directory for watching: {}", e);
            return;
        }
    }
    // notify reports absolute paths
    let files = match absolute_paths(&files) {
        Ok(files) => files,
        Err(e) => {
            log::error!("Failed to resolve watched files: {}", e);
            return;
        }
    };

    let (bridge_tx, bridge_rx) = async_channel::unbounded();

    let mut watcher = match RecommendedWatcher::new(
        move |res| {
            let _ = bridge_tx.send_blocking(res);
        },
        notify::Config::default(),
    ) {
        Ok(w) => w,
        Err(e) => {
            log::error!("Failed to create watcher: {}", e);
            return;
        }
    };

    for dir in &dirs {
        if let Err(e) = watcher.watch(dir, RecursiveMode::NonRecursive) {
            log::error!("Failed to watch {}: {}", dir.display(), e);
            return;
        }
    }

    while let Ok(res) = bridge_rx.recv().await {
        match res {
            Ok(event) => {
                let meaningful_event = matches!(
                    event.kind,
                    EventKind::Modify(_) | EventKind::Create(_) | EventKind::Remove(_)
                );

                if meaningful_event
                    && event.paths.iter().any(|p| files.contains(p))
                    && tx.send(AppEvent::ConfigReload).await.is_err()
                {
                    break;
                }
            }
            Err(e) => log::error!("Watch error: {}", e),
        }
    }
}

/// Canonical form of each file. The parent must exist; the file itself may
/// not yet.
fn absolute_paths(files: &[PathBuf]) -> std::io::Result<Vec<PathBuf>> {
    files
        .iter()
        .map(|file| {
            let dir = match file.parent() {
                Some(dir) if !dir.as_os_str().is_empty() => dir,
                _ => Path::new("."),
            };
            let dir = fs_err::canonicalize(dir)?;
            Ok(match file.file_name() {
                Some(name) => dir.join(name),
                None => dir,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_missing_settings_are_defaults() {
        let dir = tempdir().unwrap();
        let settings = load_settings_from(&dir.path().join(SETTINGS_FILE)).unwrap();
        assert_eq!(settings.prop_type, PropType::Staff);
        assert_eq!(settings.beta_offset, DEFAULT_BETA_OFFSET);
        assert!(settings.glyphs.tka);
    }

    #[test]
    fn test_settings_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join(SETTINGS_FILE);
        std::fs::write(
            &path,
            "author = \"ana\"\nprop_type = \"Club\"\ngrid_mode = \"box\"\nbeta_offset = 30.0\n\n[glyphs]\nvtg = true\n",
        )
        .unwrap();
        let settings = load_settings_from(&path).unwrap();
        assert_eq!(settings.author, "ana");
        assert_eq!(settings.prop_type, PropType::Club);
        assert_eq!(settings.grid_mode, GridMode::Box);
        assert!(settings.glyphs.vtg);
        assert!(settings.glyphs.reversals);

        let env = settings.pictograph_env();
        assert_eq!(env.beta_offset, 30.0);
        assert_eq!(env.prop_type, PropType::Club);
    }

    #[test]
    fn test_broken_settings_fall_back() {
        let dir = tempdir().unwrap();
        let path = dir.path().join(SETTINGS_FILE);
        std::fs::write(&path, "prop_type = [").unwrap();
        assert!(load_settings_from(&path).is_err());
        assert_eq!(load_or_default_from(&path), Settings::default());
    }

    #[test]
    fn test_relative_watch_paths_are_resolved() {
        let dir = tempdir().unwrap();
        let nested = dir.path().join("data");
        std::fs::create_dir_all(&nested).unwrap();
        let relative = nested.join("..").join("data").join(SETTINGS_FILE);

        let resolved = absolute_paths(&[relative]).unwrap();
        let expected = std::fs::canonicalize(&nested).unwrap().join(SETTINGS_FILE);
        assert_eq!(resolved, vec![expected]);
        assert!(resolved[0].is_absolute());
    }

    #[test]
    fn test_effect_config() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("snowflake_config.json");
        assert!(load_effect_config(&path).is_empty());

        std::fs::write(&path, r#"{"count": 40, "speed": 1.5}"#).unwrap();
        let map = load_effect_config(&path);
        assert_eq!(map["count"], serde_json::json!(40));

        std::fs::write(&path, "[1, 2").unwrap();
        assert!(load_effect_config(&path).is_empty());
    }
}
