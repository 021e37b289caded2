use precis_core::{MAX_SUMMARY_WORDS, MIN_SUMMARY_WORDS, SummaryStyle};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

const CONFIG_VERSION: u32 = 1;

pub const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

#[cfg(unix)]
use std::os::unix::fs::PermissionsExt;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("home directory not found; set HOME")]
    HomeMissing,
    #[error("config io error: {0}")]
    Io(#[from] io::Error),
    #[error("config parse error: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("config serialize error: {0}")]
    Serialize(#[from] toml::ser::Error),
    #[error("config validation error: {0}")]
    Validation(String),
}

#[derive(Debug, Clone)]
pub struct ConfigPaths {
    pub base_dir: PathBuf,
    pub config_path: PathBuf,
}

impl ConfigPaths {
    pub fn from_home() -> Result<Self, ConfigError> {
        let home = std::env::var("HOME").map_err(|_| ConfigError::HomeMissing)?;
        Ok(Self::from_base(PathBuf::from(home).join(".precis")))
    }

    pub fn from_base(base_dir: PathBuf) -> Self {
        let config_path = base_dir.join("config.toml");
        Self {
            base_dir,
            config_path,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub version: u32,
    pub summary: SummaryConfig,
    pub provider: ProviderConfig,
    pub output: OutputConfig,
    pub log: LogConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            version: CONFIG_VERSION,
            summary: SummaryConfig::default(),
            provider: ProviderConfig::default(),
            output: OutputConfig::default(),
            log: LogConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SummaryConfig {
    pub style: String,
    pub length: u32,
    pub language: String,
}

impl Default for SummaryConfig {
    fn default() -> Self {
        Self {
            style: SummaryStyle::Brief.label().to_string(),
            length: precis_core::DEFAULT_SUMMARY_WORDS,
            language: precis_core::DEFAULT_LANGUAGE.to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderConfig {
    pub api_key: String,
    pub base_url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub save: bool,
    pub dir: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            save: true,
            dir: String::new(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    pub level: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
        }
    }
}

impl Config {
    pub fn load_or_create(paths: &ConfigPaths) -> Result<Self, ConfigError> {
        let (config, warnings) = Self::load_or_create_with_warnings(paths)?;
        emit_warnings(&warnings);
        Ok(config)
    }

    /// Like [`Config::load_or_create`], but hands warnings back instead of
    /// logging them, for callers that set up logging from the loaded config.
    pub fn load_or_create_with_warnings(
        paths: &ConfigPaths,
    ) -> Result<(Self, Vec<String>), ConfigError> {
        ensure_dirs(paths)?;
        if paths.config_path.exists() {
            return Self::load_with_warnings(paths);
        }

        let config = Self::default();
        Self::write(paths, &config)?;
        Ok((config, Vec::new()))
    }

    pub fn load(paths: &ConfigPaths) -> Result<Self, ConfigError> {
        let (config, warnings) = Self::load_with_warnings(paths)?;
        emit_warnings(&warnings);
        Ok(config)
    }

    fn load_with_warnings(paths: &ConfigPaths) -> Result<(Self, Vec<String>), ConfigError> {
        ensure_dirs(paths)?;
        let content = fs::read_to_string(&paths.config_path)?;
        let raw: toml::Value = toml::from_str(&content)?;
        let file_version = match raw.get("version").and_then(|value| value.as_integer()) {
            Some(value) => u32::try_from(value).map_err(|_| {
                ConfigError::Validation(format!("config version {value} is out of range"))
            })?,
            None => 0,
        };

        let mut config: Config = toml::from_str(&content)?;
        let mut warnings = Vec::new();
        let mut migrated = false;

        if file_version < CONFIG_VERSION {
            config.version = CONFIG_VERSION;
            migrated = true;
        } else if file_version > CONFIG_VERSION {
            warnings.push(format!(
                "config version {file_version} is newer than supported {CONFIG_VERSION}; proceeding"
            ));
        }

        if let Some(warning) = loose_permissions_warning(&paths.config_path)? {
            warnings.push(warning);
        }

        if migrated {
            Self::write(paths, &config)?;
        }

        Ok((config, warnings))
    }

    pub fn write(paths: &ConfigPaths, config: &Config) -> Result<(), ConfigError> {
        ensure_dirs(paths)?;
        let content = toml::to_string_pretty(config)?;
        write_atomic(&paths.config_path, content.as_bytes())?;
        Ok(())
    }

    pub fn redacted(&self) -> Self {
        let mut redacted = self.clone();
        if !redacted.provider.api_key.trim().is_empty() {
            redacted.provider.api_key = "<redacted>".to_string();
        }
        redacted
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if SummaryStyle::parse(&self.summary.style).is_none() {
            return Err(ConfigError::Validation(format!(
                "summary.style must be brief, detailed or bullet-points (got {})",
                self.summary.style
            )));
        }
        if !(MIN_SUMMARY_WORDS..=MAX_SUMMARY_WORDS).contains(&self.summary.length) {
            return Err(ConfigError::Validation(format!(
                "summary.length must be between {MIN_SUMMARY_WORDS} and {MAX_SUMMARY_WORDS}"
            )));
        }
        if self.summary.language.trim().is_empty() {
            return Err(ConfigError::Validation(
                "summary.language must not be empty".into(),
            ));
        }
        let base_url = self.provider.base_url.trim();
        if !base_url.is_empty()
            && !(base_url.starts_with("https://") || base_url.starts_with("http://"))
        {
            return Err(ConfigError::Validation(format!(
                "provider.base_url must start with http:// or https:// (got {base_url})"
            )));
        }
        if !LOG_LEVELS.contains(&self.log.level.as_str()) {
            return Err(ConfigError::Validation(format!(
                "log.level must be one of {} (got {})",
                LOG_LEVELS.join(", "),
                self.log.level
            )));
        }
        Ok(())
    }

    /// Directory that receives `summary.txt`, relative paths resolved against `cwd`.
    pub fn output_dir(&self, cwd: &Path) -> PathBuf {
        let trimmed = self.output.dir.trim();
        if trimmed.is_empty() {
            return cwd.to_path_buf();
        }
        let path = PathBuf::from(trimmed);
        if path.is_absolute() {
            path
        } else {
            cwd.join(path)
        }
    }
}

fn ensure_dirs(paths: &ConfigPaths) -> Result<(), ConfigError> {
    fs::create_dir_all(&paths.base_dir)?;
    Ok(())
}

fn write_atomic(path: &Path, contents: &[u8]) -> Result<(), ConfigError> {
    let parent = path
        .parent()
        .ok_or_else(|| io::Error::other("config path missing parent directory"))?;
    let tmp_path = parent.join("config.toml.tmp");
    fs::write(&tmp_path, contents)?;
    set_strict_permissions(&tmp_path)?;
    fs::rename(&tmp_path, path)?;
    Ok(())
}

fn set_strict_permissions(path: &Path) -> Result<(), ConfigError> {
    #[cfg(unix)]
    {
        let perm = fs::Permissions::from_mode(0o600);
        fs::set_permissions(path, perm)?;
    }
    Ok(())
}

pub fn emit_warnings(warnings: &[String]) {
    for warning in warnings {
        tracing::warn!("{warning}");
    }
}

fn loose_permissions_warning(path: &Path) -> Result<Option<String>, ConfigError> {
    #[cfg(unix)]
    {
        let metadata = fs::metadata(path)?;
        let mode = metadata.permissions().mode() & 0o777;
        if mode & 0o077 != 0 {
            return Ok(Some(format!(
                "config file {} is group/world readable; set permissions to 0600",
                path.display()
            )));
        }
    }
    #[cfg(not(unix))]
    let _ = path;
    Ok(None)
}
