//! Configuration loading and data folder resolution

use crate::{Error, Result};
use std::path::PathBuf;

/// Service configuration assembled at startup
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    /// Folder holding revdb.db
    pub data_folder: PathBuf,
    /// Address the HTTP server binds to
    pub bind_address: String,
    /// Base URL prepended to stored photo paths when rendering
    /// absolute URLs in responses
    pub host_url: String,
}

impl ServiceConfig {
    /// Path of the SQLite database file inside the data folder
    pub fn database_path(&self) -> PathBuf {
        self.data_folder.join("revdb.db")
    }
}

/// Data folder resolution priority order:
/// 1. Command-line argument (highest priority)
/// 2. Environment variable REVDB_DATA
/// 3. TOML config file (`data_folder` key)
/// 4. OS-dependent compiled default (fallback)
pub fn resolve_data_folder(cli_arg: Option<&str>) -> Result<PathBuf> {
    // Priority 1: Command-line argument
    if let Some(path) = cli_arg {
        return Ok(PathBuf::from(path));
    }

    // Priority 2: Environment variable
    if let Ok(path) = std::env::var("REVDB_DATA") {
        return Ok(PathBuf::from(path));
    }

    // Priority 3: TOML config file
    if let Ok(config_path) = locate_config_file() {
        if let Ok(toml_content) = std::fs::read_to_string(&config_path) {
            if let Ok(config) = toml::from_str::<toml::Value>(&toml_content) {
                if let Some(folder) = config.get("data_folder").and_then(|v| v.as_str()) {
                    return Ok(PathBuf::from(folder));
                }
            }
        }
    }

    // Priority 4: OS-dependent compiled default
    Ok(default_data_folder())
}

/// Read a string key from the TOML config file, if both exist
pub fn config_file_value(key: &str) -> Option<String> {
    let config_path = locate_config_file().ok()?;
    let toml_content = std::fs::read_to_string(&config_path).ok()?;
    let config = toml::from_str::<toml::Value>(&toml_content).ok()?;
    config.get(key).and_then(|v| v.as_str()).map(String::from)
}

/// Get configuration file path for the platform
fn locate_config_file() -> Result<PathBuf> {
    if cfg!(target_os = "linux") {
        // Try ~/.config/revdb/config.toml first, then /etc/revdb/config.toml
        let user_config = dirs::config_dir().map(|d| d.join("revdb").join("config.toml"));
        let system_config = PathBuf::from("/etc/revdb/config.toml");

        if let Some(path) = user_config {
            if path.exists() {
                return Ok(path);
            }
        }
        if system_config.exists() {
            return Ok(system_config);
        }
        Err(Error::Config("No config file found".to_string()))
    } else {
        let path = dirs::config_dir()
            .map(|d| d.join("revdb").join("config.toml"))
            .ok_or_else(|| Error::Config("Could not determine config directory".to_string()))?;

        if path.exists() {
            Ok(path)
        } else {
            Err(Error::Config(format!("Config file not found: {:?}", path)))
        }
    }
}

/// Get OS-dependent default data folder path
fn default_data_folder() -> PathBuf {
    if cfg!(target_os = "windows") {
        dirs::data_local_dir()
            .map(|d| d.join("revdb"))
            .unwrap_or_else(|| PathBuf::from("C:\\ProgramData\\revdb"))
    } else {
        // ~/.local/share/revdb on Linux, ~/Library/Application Support/revdb on macOS
        dirs::data_local_dir()
            .map(|d| d.join("revdb"))
            .unwrap_or_else(|| PathBuf::from("/var/lib/revdb"))
    }
}

/// Ensure the data folder exists, creating it if necessary
pub fn ensure_data_folder(folder: &PathBuf) -> Result<()> {
    std::fs::create_dir_all(folder)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_argument_wins() {
        let folder = resolve_data_folder(Some("/tmp/revdb-test")).unwrap();
        assert_eq!(folder, PathBuf::from("/tmp/revdb-test"));
    }

    #[test]
    fn default_is_non_empty() {
        let folder = default_data_folder();
        assert!(!folder.as_os_str().is_empty());
    }

    #[test]
    fn database_path_joins_filename() {
        let config = ServiceConfig {
            data_folder: PathBuf::from("/tmp/revdb-test"),
            bind_address: "127.0.0.1:8000".to_string(),
            host_url: "http://localhost:8000".to_string(),
        };
        assert_eq!(
            config.database_path(),
            PathBuf::from("/tmp/revdb-test/revdb.db")
        );
    }
}
