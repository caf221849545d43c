use crate::config::{ConfigError, Settings, project_dirs};
use pictograph::dictionary::DICTIONARY_DIR;
use pictograph::sequence::store::CURRENT_SEQUENCE_FILE;
use std::path::{Path, PathBuf};

pub const EFFECT_CONFIG_FILE: &str = "snowflake_config.json";
pub const SOCKET_PATH: &str = "/tmp/tka.sock";

/// Every location the host reads or writes, resolved once at startup and
/// handed to whoever needs it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppPaths {
    pub data_root: PathBuf,
    pub settings_file: PathBuf,
    pub current_sequence: PathBuf,
    pub dictionary: PathBuf,
    pub effect_config: PathBuf,
    pub socket: PathBuf,
}

impl AppPaths {
    /// Lays out all data files under `data_root`.
    pub fn at(data_root: impl Into<PathBuf>, settings_file: impl Into<PathBuf>) -> Self {
        let data_root = data_root.into();
        Self {
            current_sequence: data_root.join(CURRENT_SEQUENCE_FILE),
            dictionary: data_root.join(DICTIONARY_DIR),
            effect_config: data_root.join(EFFECT_CONFIG_FILE),
            socket: PathBuf::from(SOCKET_PATH),
            settings_file: settings_file.into(),
            data_root,
        }
    }

    /// An explicit override wins, then `data_dir` from the settings, then
    /// the platform data directory.
    pub fn resolve(settings: &Settings, data_root: Option<PathBuf>) -> Result<Self, ConfigError> {
        let dirs = project_dirs()?;
        let settings_file = dirs.config_dir().join(crate::config::SETTINGS_FILE);
        let root = data_root
            .or_else(|| settings.data_dir.clone())
            .unwrap_or_else(|| dirs.data_dir().to_path_buf());
        Ok(Self::at(root, settings_file))
    }

    pub fn with_socket(mut self, socket: impl Into<PathBuf>) -> Self {
        self.socket = socket.into();
        self
    }

    /// Files whose changes trigger a config reload.
    pub fn watched_files(&self) -> Vec<PathBuf> {
        vec![self.settings_file.clone(), self.effect_config.clone()]
    }

    pub fn data_root(&self) -> &Path {
        &self.data_root
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layout_under_data_root() {
        let paths = AppPaths::at("/data/tka", "/config/tka/settings.toml");
        assert_eq!(
            paths.current_sequence,
            PathBuf::from("/data/tka/current_sequence.json")
        );
        assert_eq!(paths.dictionary, PathBuf::from("/data/tka/dictionary"));
        assert_eq!(paths.watched_files().len(), 2);
    }

    #[test]
    fn test_override_beats_settings() {
        let settings = Settings {
            data_dir: Some(PathBuf::from("/from/settings")),
            ..Settings::default()
        };
        if let Ok(paths) = AppPaths::resolve(&settings, Some(PathBuf::from("/from/cli"))) {
            assert_eq!(paths.data_root, PathBuf::from("/from/cli"));
        }
        if let Ok(paths) = AppPaths::resolve(&settings, None) {
            assert_eq!(paths.data_root, PathBuf::from("/from/settings"));
        }
    }
}
