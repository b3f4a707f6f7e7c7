//! Configuration resolution for the Palaro results services
//!
//! Every setting resolves in the same priority order:
//! 1. Command-line argument (highest priority)
//! 2. Environment variable
//! 3. TOML config file
//! 4. OS-dependent compiled default (fallback)
//!
//! A missing TOML file is not an error; the caller is told which file (if any)
//! was loaded so it can warn after logging is up.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Environment variable naming the results store path
pub const ENV_DB_PATH: &str = "PALARO_DB";
/// Environment variable naming the HTTP bind address
pub const ENV_BIND: &str = "PALARO_BIND";
/// Environment variable naming the tabulation page size
pub const ENV_PAGE_SIZE: &str = "PALARO_PAGE_SIZE";
/// Environment variable naming an explicit TOML config file
pub const ENV_CONFIG: &str = "PALARO_CONFIG";

/// Largest page size a caller may configure
pub const MAX_PAGE_SIZE: i64 = 1000;

/// Logging section of the TOML file
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default tracing directive (overridden by RUST_LOG)
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

/// On-disk TOML configuration
///
/// All fields are optional so a partial file only overrides what it names.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct TomlConfig {
    pub db_path: Option<PathBuf>,
    pub bind: Option<String>,
    pub page_size: Option<i64>,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Compiled defaults for the current platform
#[derive(Debug, Clone)]
pub struct CompiledDefaults {
    pub db_path: PathBuf,
    pub bind: String,
    pub page_size: i64,
    pub log_level: String,
}

impl CompiledDefaults {
    pub fn for_current_platform() -> Self {
        Self {
            db_path: default_data_dir().join("palaro.db"),
            bind: "127.0.0.1:5830".to_string(),
            page_size: 100,
            log_level: "info".to_string(),
        }
    }
}

/// Values supplied on the command line
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub db_path: Option<PathBuf>,
    pub bind: Option<String>,
    pub page_size: Option<i64>,
    pub config_path: Option<PathBuf>,
}

/// Fully resolved service configuration
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    pub db_path: PathBuf,
    pub bind: String,
    pub page_size: i64,
    pub log_level: String,
    /// TOML file that contributed values, if one was found
    pub config_file: Option<PathBuf>,
}

/// Resolve configuration from CLI overrides, environment, TOML file and defaults
pub fn resolve(overrides: &Overrides) -> Result<ServiceConfig> {
    let defaults = CompiledDefaults::for_current_platform();

    // An explicitly named file must exist; the default location may be absent.
    let explicit_config = overrides
        .config_path
        .clone()
        .or_else(|| env_value(ENV_CONFIG).map(PathBuf::from));

    let (toml_config, config_file) = match explicit_config {
        Some(path) => {
            if !path.exists() {
                return Err(Error::Config(format!(
                    "Config file not found: {}",
                    path.display()
                )));
            }
            (load_toml_config(&path)?, Some(path))
        }
        None => match default_config_path().filter(|p| p.exists()) {
            Some(path) => (load_toml_config(&path)?, Some(path)),
            None => (TomlConfig::default(), None),
        },
    };

    let db_path = overrides
        .db_path
        .clone()
        .or_else(|| env_value(ENV_DB_PATH).map(PathBuf::from))
        .or(toml_config.db_path)
        .unwrap_or(defaults.db_path);

    let bind = overrides
        .bind
        .clone()
        .or_else(|| env_value(ENV_BIND))
        .or(toml_config.bind)
        .unwrap_or(defaults.bind);

    let env_page_size = match env_value(ENV_PAGE_SIZE) {
        Some(raw) => Some(raw.trim().parse::<i64>().map_err(|_| {
            Error::Config(format!("{} must be an integer, got '{}'", ENV_PAGE_SIZE, raw))
        })?),
        None => None,
    };

    let page_size = overrides
        .page_size
        .or(env_page_size)
        .or(toml_config.page_size)
        .unwrap_or(defaults.page_size);
    validate_page_size(page_size)?;

    Ok(ServiceConfig {
        db_path,
        bind,
        page_size,
        log_level: toml_config.logging.level,
        config_file,
    })
}

/// Parse a TOML config file
pub fn load_toml_config(path: &Path) -> Result<TomlConfig> {
    let content = std::fs::read_to_string(path)?;
    toml::from_str(&content).map_err(|source| Error::ConfigParse {
        path: path.to_path_buf(),
        source,
    })
}

/// Reject page sizes outside `1..=MAX_PAGE_SIZE`
pub fn validate_page_size(page_size: i64) -> Result<()> {
    if (1..=MAX_PAGE_SIZE).contains(&page_size) {
        Ok(())
    } else {
        Err(Error::Config(format!(
            "page_size must be between 1 and {}, got {}",
            MAX_PAGE_SIZE, page_size
        )))
    }
}

/// Default TOML location: `<config_dir>/palaro/palaro-rt.toml`
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("palaro").join("palaro-rt.toml"))
}

/// Empty environment values count as unset
fn env_value(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}

fn default_data_dir() -> PathBuf {
    if cfg!(target_os = "linux") {
        // ~/.local/share/palaro (or /var/lib/palaro for system-wide)
        dirs::data_local_dir()
            .map(|d| d.join("palaro"))
            .unwrap_or_else(|| PathBuf::from("/var/lib/palaro"))
    } else if cfg!(target_os = "macos") {
        dirs::data_dir()
            .map(|d| d.join("palaro"))
            .unwrap_or_else(|| PathBuf::from("/Library/Application Support/palaro"))
    } else if cfg!(target_os = "windows") {
        dirs::data_local_dir()
            .map(|d| d.join("palaro"))
            .unwrap_or_else(|| PathBuf::from("C:\\ProgramData\\palaro"))
    } else {
        PathBuf::from("./palaro_data")
    }
}
