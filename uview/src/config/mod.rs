//! Configuration file handling.
//!
//! Configuration lives in an INI file, by default
//! `~/.config/uview/config.ini` (platform equivalent via `dirs`):
//!
//! ```ini
//! [package]
//! max_asset_size = 512MB
//!
//! [logging]
//! level = info
//! directory = /var/log/uview
//! ```
//!
//! `level` takes any `EnvFilter` directive, e.g. `uview=debug,tar=warn`.
//! Every key is optional. Unknown sections and keys are ignored.

mod size;

use std::io;
use std::path::{Path, PathBuf};

use ini::Ini;
use thiserror::Error;
use tracing_subscriber::EnvFilter;

use crate::logging::LoggingConfig;
use crate::manager::{ManagerConfig, DEFAULT_MAX_ASSET_SIZE};

pub use size::{format_size, parse_size};

/// Directory name under the platform config directory.
pub const CONFIG_DIR_NAME: &str = "uview";

/// Configuration file name.
pub const CONFIG_FILE_NAME: &str = "config.ini";

const PACKAGE_SECTION: &str = "package";
const LOGGING_SECTION: &str = "logging";

/// Result type for configuration loading.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Errors raised while loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The file exists but could not be read.
    #[error("failed to read config file {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The file is not valid INI.
    #[error("failed to parse config file: {0}")]
    Parse(String),

    /// A key holds a value that cannot be used.
    #[error("invalid value '{value}' for {key}: {reason}")]
    InvalidValue {
        key: String,
        value: String,
        reason: String,
    },
}

/// Settings for package operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageSettings {
    /// Largest file accepted by `add_asset`, in bytes.
    pub max_asset_size: u64,
}

impl Default for PackageSettings {
    fn default() -> Self {
        Self {
            max_asset_size: DEFAULT_MAX_ASSET_SIZE,
        }
    }
}

/// Parsed configuration file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigFile {
    pub package: PackageSettings,
    pub logging: LoggingConfig,
}

impl ConfigFile {
    /// Path of the default configuration file, if the platform has a config
    /// directory.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME))
    }

    /// Load the default configuration file, or defaults if it does not exist.
    pub fn load() -> ConfigResult<Self> {
        match Self::default_path() {
            Some(path) if path.exists() => Self::load_from(&path),
            _ => Ok(Self::default()),
        }
    }

    /// Load configuration from an INI file.
    pub fn load_from(path: &Path) -> ConfigResult<Self> {
        let ini = Ini::load_from_file(path).map_err(|e| match e {
            ini::Error::Io(source) => ConfigError::Read {
                path: path.to_path_buf(),
                source,
            },
            ini::Error::Parse(e) => ConfigError::Parse(format!("{}: {}", path.display(), e)),
        })?;
        Self::from_ini(&ini)
    }

    /// Parse configuration from INI text.
    pub fn from_ini_str(text: &str) -> ConfigResult<Self> {
        let ini = Ini::load_from_str(text).map_err(|e| ConfigError::Parse(e.to_string()))?;
        Self::from_ini(&ini)
    }

    fn from_ini(ini: &Ini) -> ConfigResult<Self> {
        let mut config = Self::default();

        if let Some(section) = ini.section(Some(PACKAGE_SECTION)) {
            if let Some(value) = section.get("max_asset_size") {
                config.package.max_asset_size =
                    parse_size(value).ok_or_else(|| ConfigError::InvalidValue {
                        key: format!("{PACKAGE_SECTION}.max_asset_size"),
                        value: value.to_string(),
                        reason: "expected a size such as 512MB".to_string(),
                    })?;
            }
        }

        if let Some(section) = ini.section(Some(LOGGING_SECTION)) {
            if let Some(value) = section.get("level") {
                let level = value.trim();
                EnvFilter::try_new(level).map_err(|e| ConfigError::InvalidValue {
                    key: format!("{LOGGING_SECTION}.level"),
                    value: value.to_string(),
                    reason: e.to_string(),
                })?;
                config.logging.level = level.to_string();
            }
            if let Some(value) = section.get("directory") {
                let value = value.trim();
                config.logging.directory = (!value.is_empty()).then(|| PathBuf::from(value));
            }
            if let Some(value) = section.get("file_name") {
                config.logging.file_name = value.trim().to_string();
            }
        }

        Ok(config)
    }

    /// Package manager settings derived from this file.
    pub fn manager_config(&self) -> ManagerConfig {
        ManagerConfig::default().with_max_asset_size(self.package.max_asset_size)
    }
}
