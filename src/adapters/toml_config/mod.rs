// TOML config adapter - Configuration loading with CLI > env > file > defaults

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

use crate::ports::AcquisitionStrategy;

/// Environment variable naming a config file
pub const CONFIG_ENV: &str = "FRAMEDOC_CONFIG";

/// Config file picked up from the working directory when present
pub const DEFAULT_CONFIG_FILE: &str = "framedoc.toml";

const ENV_PREFIX: &str = "FRAMEDOC_";

/// Configuration loading errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse TOML config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid value for {key}: {value}")]
    InvalidValue { key: String, value: String },

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Application configuration, passed explicitly to every component
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Flat directory for downloads, cookies and documents
    pub output_dir: PathBuf,
    /// Largest accepted HTTP request body
    pub max_upload_bytes: usize,
    /// Interval used when a request does not name one
    pub default_interval: u32,
    /// Resolution recorded for document pages
    pub page_resolution_dpi: u32,
    /// HTTP listen address
    pub bind: String,
    /// Acquisition strategy
    pub strategy: AcquisitionStrategy,
    /// yt-dlp executable
    pub yt_dlp_path: PathBuf,
    /// Default log filter
    pub log_level: String,
    /// Emit logs as JSON
    pub json_logs: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("downloaded_videos"),
            max_upload_bytes: 500 * 1024 * 1024,
            default_interval: 20,
            page_resolution_dpi: 100,
            bind: "0.0.0.0:5000".to_string(),
            strategy: AcquisitionStrategy::Hardened,
            yt_dlp_path: PathBuf::from("yt-dlp"),
            log_level: "info".to_string(),
            json_logs: false,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct ConfigFile {
    #[serde(default)]
    framedoc: AppConfig,
}

/// Where a loaded configuration came from, reported once logging is up
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConfigOrigin {
    pub file: Option<PathBuf>,
    /// Names of the `FRAMEDOC_*` variables that were applied
    pub env_overrides: Vec<String>,
}

impl ConfigOrigin {
    pub fn log(&self) {
        match &self.file {
            Some(path) => info!("Loaded configuration from: {}", path.display()),
            None => info!("No configuration file, using defaults"),
        }
        for name in &self.env_overrides {
            info!("Found environment override: {}", name);
        }
    }
}

impl AppConfig {
    /// Load defaults, then the config file, then `FRAMEDOC_*` variables.
    ///
    /// The file is `explicit` when given, else `$FRAMEDOC_CONFIG`, else
    /// `framedoc.toml` in the working directory if it exists. Nothing is
    /// logged here since this runs before the subscriber is installed.
    pub fn load(explicit: Option<&Path>) -> Result<(Self, ConfigOrigin), ConfigError> {
        let file = explicit
            .map(Path::to_path_buf)
            .or_else(|| std::env::var_os(CONFIG_ENV).map(PathBuf::from))
            .or_else(|| {
                let local = PathBuf::from(DEFAULT_CONFIG_FILE);
                local.is_file().then_some(local)
            });
        Self::load_with(file, std::env::vars())
    }

    /// `load` with the file and environment given explicitly
    pub fn load_with<I>(file: Option<PathBuf>, vars: I) -> Result<(Self, ConfigOrigin), ConfigError>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let mut config = match &file {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        let env_overrides = config.apply_env_overrides(vars)?;
        config.validate()?;

        Ok((config, ConfigOrigin { file, env_overrides }))
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    /// Parse a `[framedoc]` table; missing keys keep their defaults
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let parsed: ConfigFile = toml::from_str(content)?;
        Ok(parsed.framedoc)
    }

    /// Apply `FRAMEDOC_*` overrides from `vars`, returning the names applied
    pub fn apply_env_overrides<I>(&mut self, vars: I) -> Result<Vec<String>, ConfigError>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let mut applied = Vec::new();
        for (name, value) in vars {
            let Some(key) = name.strip_prefix(ENV_PREFIX) else {
                continue;
            };
            match key {
                "OUTPUT_DIR" => self.output_dir = PathBuf::from(&value),
                "MAX_UPLOAD_BYTES" => self.max_upload_bytes = parse_value(&name, &value)?,
                "DEFAULT_INTERVAL" => self.default_interval = parse_value(&name, &value)?,
                "PAGE_RESOLUTION_DPI" => self.page_resolution_dpi = parse_value(&name, &value)?,
                "BIND" => self.bind = value.clone(),
                "STRATEGY" => {
                    self.strategy = AcquisitionStrategy::parse(&value).map_err(|_| {
                        ConfigError::InvalidValue {
                            key: name.clone(),
                            value: value.clone(),
                        }
                    })?
                }
                "YT_DLP_PATH" => self.yt_dlp_path = PathBuf::from(&value),
                "LOG_LEVEL" => self.log_level = value.clone(),
                "JSON_LOGS" => self.json_logs = parse_value(&name, &value)?,
                _ => continue,
            }
            applied.push(name);
        }
        Ok(applied)
    }

    /// Reject values the pipeline cannot work with
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.default_interval == 0 {
            return Err(ConfigError::Invalid("default_interval must be positive".into()));
        }
        if self.page_resolution_dpi == 0 {
            return Err(ConfigError::Invalid("page_resolution_dpi must be positive".into()));
        }
        if self.max_upload_bytes == 0 {
            return Err(ConfigError::Invalid("max_upload_bytes must be positive".into()));
        }
        if self.output_dir.as_os_str().is_empty() {
            return Err(ConfigError::Invalid("output_dir must not be empty".into()));
        }
        Ok(())
    }
}

fn parse_value<T: std::str::FromStr>(key: &str, value: &str) -> Result<T, ConfigError> {
    value.trim().parse().map_err(|_| ConfigError::InvalidValue {
        key: key.to_string(),
        value: value.to_string(),
    })
}
