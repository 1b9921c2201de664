//! Persisted settings - the selected server and the list source URL

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use crate::constants::{APP_DIR_NAME, SETTINGS_FILE};

/// Keys understood by the settings store
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SettingKey {
    /// Address of the currently selected Anisette server
    SelectedServer,
    /// URL the server list is fetched from
    ServerListSource,
}

impl SettingKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            SettingKey::SelectedServer => "selected_server",
            SettingKey::ServerListSource => "server_list_source",
        }
    }
}

/// String-valued key/value store that survives restarts
pub trait SettingsStore: Send {
    fn get(&self, key: SettingKey) -> Option<String>;
    fn set(&mut self, key: SettingKey, value: &str) -> Result<()>;
}

/// Resolve the application directory (config dir, then home, then cwd)
pub fn app_dir() -> PathBuf {
    if let Some(config) = dirs::config_dir() {
        return config.join(APP_DIR_NAME);
    }
    dirs::home_dir()
        .map(|home| home.join(format!(".{}", APP_DIR_NAME)))
        .unwrap_or_else(|| PathBuf::from("."))
}

/// On-disk layout of the settings file
#[derive(Debug, Default, Serialize, Deserialize)]
struct SettingsFile {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    selected_server: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    server_list_source: Option<String>,
}

impl SettingsFile {
    fn slot(&mut self, key: SettingKey) -> &mut Option<String> {
        match key {
            SettingKey::SelectedServer => &mut self.selected_server,
            SettingKey::ServerListSource => &mut self.server_list_source,
        }
    }
}

/// YAML-file backed settings
pub struct FileSettings {
    path: PathBuf,
    data: SettingsFile,
}

impl FileSettings {
    /// Open the settings file in the given directory. Missing or unreadable
    /// files fall back to empty settings.
    pub fn open(dir: &Path) -> Self {
        let path = dir.join(SETTINGS_FILE);
        let data = match fs::read_to_string(&path) {
            Ok(content) => serde_yaml::from_str(&content).unwrap_or_else(|e| {
                tracing::warn!(path = %path.display(), error = %e, "Ignoring corrupt settings file");
                SettingsFile::default()
            }),
            Err(_) => SettingsFile::default(),
        };
        FileSettings { path, data }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn save(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.exists() {
                fs::create_dir_all(parent)?;
            }
        }
        let content = serde_yaml::to_string(&self.data)?;
        fs::write(&self.path, content)?;
        Ok(())
    }
}

impl SettingsStore for FileSettings {
    fn get(&self, key: SettingKey) -> Option<String> {
        match key {
            SettingKey::SelectedServer => self.data.selected_server.clone(),
            SettingKey::ServerListSource => self.data.server_list_source.clone(),
        }
    }

    fn set(&mut self, key: SettingKey, value: &str) -> Result<()> {
        *self.data.slot(key) = Some(value.to_string());
        self.save()
    }
}

#[derive(Debug, Default)]
struct MemoryInner {
    values: HashMap<SettingKey, String>,
    writes: Vec<(SettingKey, String)>,
}

/// In-process settings store. Clones share the same data, so a handle kept
/// outside the app can observe every write.
#[derive(Clone, Debug, Default)]
pub struct MemorySettings {
    inner: Arc<Mutex<MemoryInner>>,
}

impl MemorySettings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a value without recording it as a write
    pub fn with(self, key: SettingKey, value: &str) -> Self {
        if let Ok(mut inner) = self.inner.lock() {
            inner.values.insert(key, value.to_string());
        }
        self
    }

    /// Every `set` call so far, in order
    pub fn writes(&self) -> Vec<(SettingKey, String)> {
        self.inner
            .lock()
            .map(|inner| inner.writes.clone())
            .unwrap_or_default()
    }
}

impl SettingsStore for MemorySettings {
    fn get(&self, key: SettingKey) -> Option<String> {
        self.inner
            .lock()
            .ok()
            .and_then(|inner| inner.values.get(&key).cloned())
    }

    fn set(&mut self, key: SettingKey, value: &str) -> Result<()> {
        let mut inner = self
            .inner
            .lock()
            .map_err(|_| anyhow::anyhow!("settings lock poisoned"))?;
        inner.values.insert(key, value.to_string());
        inner.writes.push((key, value.to_string()));
        Ok(())
    }
}
