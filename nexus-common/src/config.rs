//! Configuration loading and root folder resolution
//!
//! Root folder priority order:
//! 1. Command-line argument (highest priority)
//! 2. `NEXUS_ROOT_FOLDER` environment variable
//! 3. TOML config file (`root_folder` key)
//! 4. OS-dependent compiled default (fallback)

use crate::{Error, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Environment variable consulted for the root folder
pub const ROOT_FOLDER_ENV: &str = "NEXUS_ROOT_FOLDER";

/// File name of the shared SQLite database inside the root folder
pub const DATABASE_FILE: &str = "nexus.db";

/// Optional TOML configuration (`~/.config/nexus/config.toml`)
///
/// All fields are optional; a missing file or missing keys fall back to
/// compiled defaults rather than failing startup.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TomlConfig {
    pub root_folder: Option<PathBuf>,
    pub canvas_base_url: Option<String>,
    pub gradescope_base_url: Option<String>,
}

impl TomlConfig {
    /// Parse a TOML document into a config
    pub fn parse(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| Error::Config(format!("Invalid config file: {}", e)))
    }

    /// Load from an explicit path
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::parse(&content)
    }

    /// Load from the default platform location, falling back to defaults
    /// when no config file exists or it cannot be parsed
    pub fn load_default() -> Self {
        let Some(path) = default_config_path() else {
            return Self::default();
        };

        match Self::load(&path) {
            Ok(config) => config,
            Err(Error::Io(_)) => Self::default(),
            Err(e) => {
                tracing::warn!("Ignoring unreadable config file {}: {}", path.display(), e);
                Self::default()
            }
        }
    }
}

/// Default configuration file path for the platform
///
/// Linux also consults `/etc/nexus/config.toml` when no user config exists.
pub fn default_config_path() -> Option<PathBuf> {
    let user_config = dirs::config_dir().map(|d| d.join("nexus").join("config.toml"));

    if cfg!(target_os = "linux") {
        if let Some(path) = &user_config {
            if path.exists() {
                return user_config;
            }
        }
        let system_config = PathBuf::from("/etc/nexus/config.toml");
        if system_config.exists() {
            return Some(system_config);
        }
    }

    user_config
}

/// Resolve the root folder following the 4-tier priority order
pub fn resolve_root_folder(cli_arg: Option<&str>, config: &TomlConfig) -> PathBuf {
    // Priority 1: Command-line argument
    if let Some(path) = cli_arg {
        return PathBuf::from(path);
    }

    // Priority 2: Environment variable
    if let Ok(path) = std::env::var(ROOT_FOLDER_ENV) {
        if !path.is_empty() {
            return PathBuf::from(path);
        }
    }

    // Priority 3: TOML config file
    if let Some(path) = &config.root_folder {
        return path.clone();
    }

    // Priority 4: OS-dependent compiled default
    default_root_folder()
}

/// OS-dependent default root folder path
pub fn default_root_folder() -> PathBuf {
    dirs::data_local_dir()
        .map(|d| d.join("nexus"))
        .unwrap_or_else(|| PathBuf::from("./nexus_data"))
}

/// Create the root folder if missing and return the database path inside it
pub fn ensure_root_folder(root: &Path) -> Result<PathBuf> {
    std::fs::create_dir_all(root)?;
    Ok(root.join(DATABASE_FILE))
}
