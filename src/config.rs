use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("com", "meghendra", "caltrack")
}

fn default_data_dir() -> PathBuf {
    if let Some(path) = std::env::var_os("CALTRACK_DATA_DIR") {
        return PathBuf::from(path);
    }
    if let Some(dirs) = project_dirs() {
        return dirs.data_dir().to_path_buf();
    }
    std::env::current_dir()
        .unwrap_or_else(|_| PathBuf::from("."))
        .join(".caltrack")
}

fn default_save_file() -> PathBuf {
    if let Some(path) = std::env::var_os("CALTRACK_SAVE_FILE") {
        return PathBuf::from(path);
    }
    default_data_dir().join("tasks.txt")
}

pub fn config_path() -> PathBuf {
    if let Some(path) = std::env::var_os("CALTRACK_CONFIG") {
        return PathBuf::from(path);
    }
    if let Some(dirs) = project_dirs() {
        return dirs.config_dir().join("config.toml");
    }
    std::env::current_dir()
        .unwrap_or_else(|_| PathBuf::from("."))
        .join(".caltrack-config.toml")
}

#[derive(Debug, Serialize, Deserialize, Clone, Default)]
#[serde(default)]
pub struct Config {
    pub data: DataConfig,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct DataConfig {
    pub save_file: PathBuf,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            save_file: default_save_file(),
        }
    }
}

impl Config {
    pub fn load() -> Self {
        let config_path = config_path();

        let mut config = if let Ok(content) = fs::read_to_string(&config_path) {
            match toml::from_str::<Config>(&content) {
                Ok(config) => config,
                Err(e) => {
                    eprintln!("Failed to parse config.toml ({config_path:?}), using defaults: {e}");
                    Config::default()
                }
            }
        } else {
            Config::default()
        };

        let changed = config.normalize_paths();
        if changed || !config_path.exists() {
            let _ = config.save_to_path(&config_path);
        }

        config
    }

    pub fn save_to_path(&self, path: &Path) -> io::Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self).unwrap_or_default();
        fs::write(path, content)
    }

    fn normalize_paths(&mut self) -> bool {
        let mut changed = false;

        if self.data.save_file.as_os_str().is_empty() {
            self.data.save_file = default_save_file();
            changed = true;
        }

        if self.data.save_file.is_relative() {
            self.data.save_file = default_data_dir().join(&self.data.save_file);
            changed = true;
        }

        changed
    }
}
