use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

pub const CURRENT_THEME_KEY: &str = "theme/current";
pub const DEFAULT_THEME: &str = "gruvbox_dark";

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to write settings to {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to encode settings: {0}")]
    Json(#[from] serde_json::Error),
}

/// Key/value persistence handed to the controller.
pub trait SettingsStore {
    fn value(&self, key: &str) -> Option<String>;
    fn set_value(&mut self, key: &str, value: &str);
    /// Flushes pending writes to durable storage.
    fn sync(&mut self) -> Result<(), SettingsError>;

    fn value_or(&self, key: &str, default: &str) -> String {
        self.value(key).unwrap_or_else(|| default.to_string())
    }
}

/// Settings stored as a flat JSON object.
#[derive(Debug)]
pub struct FileSettings {
    path: PathBuf,
    values: BTreeMap<String, String>,
}

impl FileSettings {
    /// Loads `path`; a missing or corrupt file starts empty.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let values = match fs::read_to_string(&path) {
            Ok(content) => serde_json::from_str(&content).unwrap_or_else(|err| {
                log::warn!("Ignoring corrupt settings file {:?}: {}", path, err);
                BTreeMap::new()
            }),
            Err(err) if err.kind() == io::ErrorKind::NotFound => BTreeMap::new(),
            Err(err) => {
                log::warn!("Failed to read settings file {:?}: {}", path, err);
                BTreeMap::new()
            }
        };
        Self { path, values }
    }
}

impl SettingsStore for FileSettings {
    fn value(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn set_value(&mut self, key: &str, value: &str) {
        self.values.insert(key.to_string(), value.to_string());
    }

    fn sync(&mut self) -> Result<(), SettingsError> {
        let io_err = |source| SettingsError::Io {
            path: self.path.clone(),
            source,
        };
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(io_err)?;
        }
        let content = serde_json::to_string_pretty(&self.values)?;
        fs::write(&self.path, content).map_err(io_err)
    }
}
