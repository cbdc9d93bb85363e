//! Runtime configuration for the inventory store.
//!
//! # Responsibility
//! - Resolve database path, low-stock threshold and logging settings.
//! - Keep environment lookup injectable so resolution is testable.
//!
//! # Invariants
//! - Blank environment values are treated as unset.
//! - `log_dir` is always absolute once resolved.

use crate::logging::default_log_level;
use crate::model::item::DEFAULT_LOW_STOCK_THRESHOLD;
use log::LevelFilter;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};

pub const DB_PATH_ENV: &str = "STOCKROOM_DB_PATH";
pub const LOW_STOCK_THRESHOLD_ENV: &str = "STOCKROOM_LOW_STOCK_THRESHOLD";
pub const LOG_LEVEL_ENV: &str = "STOCKROOM_LOG_LEVEL";
pub const LOG_DIR_ENV: &str = "STOCKROOM_LOG_DIR";

/// Database file used when nothing else is configured.
pub const DEFAULT_DB_FILE_NAME: &str = "inventory.db";
const DEFAULT_LOG_DIR_NAME: &str = "logs";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    InvalidThreshold { value: String },
    InvalidLogLevel { value: String },
    CurrentDir(String),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidThreshold { value } => write!(
                f,
                "{LOW_STOCK_THRESHOLD_ENV} must be an integer, got `{value}`"
            ),
            Self::InvalidLogLevel { value } => write!(
                f,
                "log level must be off|error|warn|info|debug|trace, got `{value}`"
            ),
            Self::CurrentDir(message) => {
                write!(f, "cannot resolve current directory: {message}")
            }
        }
    }
}

impl Error for ConfigError {}

/// Effective settings for one process run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    pub db_path: PathBuf,
    pub low_stock_threshold: i64,
    pub log_level: LevelFilter,
    pub log_dir: PathBuf,
}

/// Explicit values that take precedence over the environment.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigOverrides {
    pub db_path: Option<PathBuf>,
    pub low_stock_threshold: Option<i64>,
    pub log_level: Option<String>,
    pub log_dir: Option<PathBuf>,
}

impl StoreConfig {
    /// Resolves settings from process environment and overrides.
    pub fn from_env(overrides: ConfigOverrides) -> Result<Self, ConfigError> {
        let cwd = std::env::current_dir().map_err(|err| ConfigError::CurrentDir(err.to_string()))?;
        Self::resolve(overrides, &cwd, |key| std::env::var(key).ok())
    }

    /// Resolves settings with an injectable environment lookup.
    ///
    /// Precedence: override, then environment, then default. Relative paths
    /// are anchored at `cwd`; the default log directory sits next to the
    /// database file.
    pub fn resolve(
        overrides: ConfigOverrides,
        cwd: &Path,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        let env_value = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let db_path = overrides
            .db_path
            .or_else(|| env_value(DB_PATH_ENV).map(PathBuf::from))
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DB_FILE_NAME));
        let db_path = anchor(cwd, db_path);

        let low_stock_threshold = match overrides.low_stock_threshold {
            Some(value) => value,
            None => match env_value(LOW_STOCK_THRESHOLD_ENV) {
                Some(raw) => raw
                    .parse::<i64>()
                    .map_err(|_| ConfigError::InvalidThreshold { value: raw })?,
                None => DEFAULT_LOW_STOCK_THRESHOLD,
            },
        };

        let log_level = match overrides.log_level.or_else(|| env_value(LOG_LEVEL_ENV)) {
            Some(raw) => parse_log_level(&raw)?,
            None => default_log_level(),
        };

        let log_dir = match overrides
            .log_dir
            .or_else(|| env_value(LOG_DIR_ENV).map(PathBuf::from))
        {
            Some(dir) => anchor(cwd, dir),
            None => db_path
                .parent()
                .map_or_else(|| cwd.to_path_buf(), Path::to_path_buf)
                .join(DEFAULT_LOG_DIR_NAME),
        };

        Ok(Self {
            db_path,
            low_stock_threshold,
            log_level,
            log_dir,
        })
    }
}

/// Case-insensitive; `warning` is accepted for `warn`.
fn parse_log_level(raw: &str) -> Result<LevelFilter, ConfigError> {
    let trimmed = raw.trim();
    if trimmed.eq_ignore_ascii_case("warning") {
        return Ok(LevelFilter::Warn);
    }
    trimmed
        .parse::<LevelFilter>()
        .map_err(|_| ConfigError::InvalidLogLevel {
            value: raw.to_string(),
        })
}

fn anchor(cwd: &Path, path: PathBuf) -> PathBuf {
    if path.is_absolute() {
        path
    } else {
        cwd.join(path)
    }
}

#[cfg(test)]
mod tests {
    use super::{
        ConfigError, ConfigOverrides, StoreConfig, DB_PATH_ENV, LOG_DIR_ENV, LOG_LEVEL_ENV,
        LOW_STOCK_THRESHOLD_ENV,
    };
    use crate::logging::default_log_level;
    use log::LevelFilter;
    use std::collections::HashMap;
    use std::path::{Path, PathBuf};

    fn cwd() -> PathBuf {
        std::env::temp_dir().join("stockroom-config")
    }

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map = pairs
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect::<HashMap<_, _>>();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn defaults_apply_when_nothing_is_set() {
        let config = StoreConfig::resolve(ConfigOverrides::default(), &cwd(), lookup(&[])).unwrap();
        assert_eq!(config.db_path, cwd().join("inventory.db"));
        assert_eq!(config.low_stock_threshold, 5);
        assert_eq!(config.log_dir, cwd().join("logs"));
        assert!(config.log_dir.is_absolute());
        assert_eq!(config.log_level, default_log_level());
    }

    #[test]
    fn log_level_is_parsed_from_environment_and_overrides() {
        let env = lookup(&[(LOG_LEVEL_ENV, " Warning ")]);
        let from_env = StoreConfig::resolve(ConfigOverrides::default(), &cwd(), &env).unwrap();
        assert_eq!(from_env.log_level, LevelFilter::Warn);

        let overrides = ConfigOverrides {
            log_level: Some("TRACE".to_string()),
            ..ConfigOverrides::default()
        };
        let overridden = StoreConfig::resolve(overrides, &cwd(), &env).unwrap();
        assert_eq!(overridden.log_level, LevelFilter::Trace);

        let err = StoreConfig::resolve(
            ConfigOverrides::default(),
            &cwd(),
            lookup(&[(LOG_LEVEL_ENV, "verbose")]),
        )
        .unwrap_err();
        assert_eq!(
            err,
            ConfigError::InvalidLogLevel {
                value: "verbose".to_string()
            }
        );
    }

    #[test]
    fn environment_is_read_and_overrides_win() {
        let env = lookup(&[
            (DB_PATH_ENV, "data/stock.db"),
            (LOW_STOCK_THRESHOLD_ENV, "12"),
            (LOG_DIR_ENV, "  "),
        ]);
        let from_env = StoreConfig::resolve(ConfigOverrides::default(), &cwd(), &env).unwrap();
        assert_eq!(from_env.db_path, cwd().join("data/stock.db"));
        assert_eq!(from_env.low_stock_threshold, 12);
        assert_eq!(from_env.log_dir, cwd().join("data").join("logs"));

        let overrides = ConfigOverrides {
            low_stock_threshold: Some(2),
            log_dir: Some(PathBuf::from("/var/log/stockroom")),
            ..ConfigOverrides::default()
        };
        let overridden = StoreConfig::resolve(overrides, &cwd(), &env).unwrap();
        assert_eq!(overridden.low_stock_threshold, 2);
        assert_eq!(overridden.log_dir, Path::new("/var/log/stockroom"));
    }

    #[test]
    fn non_numeric_threshold_is_rejected() {
        let err = StoreConfig::resolve(
            ConfigOverrides::default(),
            &cwd(),
            lookup(&[(LOW_STOCK_THRESHOLD_ENV, "few")]),
        )
        .unwrap_err();
        assert_eq!(
            err,
            ConfigError::InvalidThreshold {
                value: "few".to_string()
            }
        );
    }
}
