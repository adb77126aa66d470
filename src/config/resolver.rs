//! Precedence resolution for server configuration.
//!
//! ## Precedence (highest to lowest)
//!
//! 1. CLI flags (passed at runtime)
//! 2. `TB_*` environment variables
//! 3. taskboard.kdl (`<data-dir>/taskboard.kdl`, or `--config` / `TB_CONFIG`)
//! 4. Built-in defaults
//!
//! The data directory and config path are resolved first since the config
//! file cannot relocate itself.

use crate::config::{Mode, TaskboardConfig};
use crate::storage::{
    CorruptPolicy, MINIMAL_USERS_FILE, PROJECTS_FILE, StorageOptions, USERS_FILE,
    default_data_dir,
};
use crate::{Error, Result};
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};

/// Name of the config file inside the data directory.
pub const CONFIG_FILE_NAME: &str = "taskboard.kdl";

pub const DEFAULT_HOST: &str = "127.0.0.1";
pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_STATIC_DIR: &str = "public";

pub const DATA_DIR_ENV: &str = "TB_DATA_DIR";
pub const CONFIG_ENV: &str = "TB_CONFIG";
pub const HOST_ENV: &str = "TB_HOST";
pub const PORT_ENV: &str = "TB_PORT";
pub const MODE_ENV: &str = "TB_MODE";
pub const STATIC_DIR_ENV: &str = "TB_STATIC_DIR";
pub const CORRUPT_POLICY_ENV: &str = "TB_CORRUPT_POLICY";
pub const LOG_DIR_ENV: &str = "TB_LOG_DIR";

/// Tracks where a resolved value came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValueSource {
    /// Value from environment variable
    EnvVar(String),
    /// Value from taskboard.kdl
    ConfigFile,
    /// Value from CLI flag
    CliFlag,
    /// Built-in default value
    Default,
}

impl std::fmt::Display for ValueSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ValueSource::EnvVar(name) => write!(f, "env:{}", name),
            ValueSource::ConfigFile => write!(f, "config"),
            ValueSource::CliFlag => write!(f, "cli"),
            ValueSource::Default => write!(f, "default"),
        }
    }
}

impl Serialize for ValueSource {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// A resolved value with its source.
#[derive(Debug, Clone, Serialize)]
pub struct Resolved<T> {
    pub value: T,
    pub source: ValueSource,
}

impl<T> Resolved<T> {
    pub fn new(value: T, source: ValueSource) -> Self {
        Self { value, source }
    }
}

/// Values supplied on the command line.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub data_dir: Option<PathBuf>,
    pub config_path: Option<PathBuf>,
    pub host: Option<String>,
    pub port: Option<u16>,
    pub mode: Option<Mode>,
    pub static_dir: Option<PathBuf>,
}

/// Fully resolved configuration with source tracking.
#[derive(Debug, Clone, Serialize)]
pub struct ResolvedConfig {
    pub data_dir: Resolved<PathBuf>,
    pub config_path: Resolved<PathBuf>,
    pub host: Resolved<String>,
    pub port: Resolved<u16>,
    pub mode: Resolved<String>,
    pub static_dir: Resolved<PathBuf>,
    pub landing_page: Option<Resolved<String>>,
    pub users_file: Resolved<String>,
    pub projects_file: Resolved<String>,
    pub corrupt_policy: Resolved<String>,
    pub log_dir: Option<Resolved<PathBuf>>,
    #[serde(skip)]
    parsed_mode: Mode,
    #[serde(skip)]
    parsed_policy: CorruptPolicy,
}

impl ResolvedConfig {
    pub fn mode(&self) -> Mode {
        self.parsed_mode
    }

    pub fn corrupt_policy(&self) -> CorruptPolicy {
        self.parsed_policy
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir.value
    }

    /// `host:port` to bind the server to.
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host.value, self.port.value)
    }

    pub fn storage_options(&self) -> StorageOptions {
        StorageOptions {
            users_file: self.users_file.value.clone(),
            projects_file: self.projects_file.value.clone(),
            corrupt_policy: self.parsed_policy,
        }
    }
}

/// Resolve configuration from flags, the process environment and the config file.
pub fn resolve_config(overrides: &ConfigOverrides) -> Result<ResolvedConfig> {
    resolve_config_with_env(overrides, |name| std::env::var(name).ok())
}

/// Resolve configuration using `env` to look up environment variables.
pub fn resolve_config_with_env<F>(overrides: &ConfigOverrides, env: F) -> Result<ResolvedConfig>
where
    F: Fn(&str) -> Option<String>,
{
    let env = |name: &str| env(name).filter(|v| !v.is_empty());

    let data_dir = match (&overrides.data_dir, env(DATA_DIR_ENV)) {
        (Some(dir), _) => Resolved::new(dir.clone(), ValueSource::CliFlag),
        (None, Some(dir)) => Resolved::new(PathBuf::from(dir), env_source(DATA_DIR_ENV)),
        (None, None) => Resolved::new(default_data_dir()?, ValueSource::Default),
    };

    let (config_path, explicit) = match (&overrides.config_path, env(CONFIG_ENV)) {
        (Some(path), _) => (Resolved::new(path.clone(), ValueSource::CliFlag), true),
        (None, Some(path)) => (
            Resolved::new(PathBuf::from(path), env_source(CONFIG_ENV)),
            true,
        ),
        (None, None) => (
            Resolved::new(data_dir.value.join(CONFIG_FILE_NAME), ValueSource::Default),
            false,
        ),
    };
    let file = load_config_file(&config_path.value, explicit)?;

    let host = pick(
        overrides.host.clone(),
        HOST_ENV,
        &env,
        file.host.clone(),
        DEFAULT_HOST.to_string(),
        |s| Ok(s.to_string()),
    )?;

    let port = pick(overrides.port, PORT_ENV, &env, file.port, DEFAULT_PORT, |s| {
        s.parse::<u16>()
            .map_err(|_| Error::Config(format!("{} must be a port number, got {}", PORT_ENV, s)))
    })?;

    let mode = pick(overrides.mode, MODE_ENV, &env, file.mode, Mode::default(), |s| {
        Mode::parse(s).ok_or_else(|| Error::Config(format!("unknown mode: {}", s)))
    })?;

    let static_dir = pick(
        overrides.static_dir.clone(),
        STATIC_DIR_ENV,
        &env,
        file.static_dir.clone().map(PathBuf::from),
        PathBuf::from(DEFAULT_STATIC_DIR),
        |s| Ok(PathBuf::from(s)),
    )?;

    let corrupt_policy = pick(
        None,
        CORRUPT_POLICY_ENV,
        &env,
        file.corrupt_policy,
        CorruptPolicy::default(),
        |s| {
            CorruptPolicy::parse(s)
                .ok_or_else(|| Error::Config(format!("unknown corrupt-policy: {}", s)))
        },
    )?;

    let log_dir = match (env(LOG_DIR_ENV), file.log_dir.clone()) {
        (Some(dir), _) => Some(Resolved::new(PathBuf::from(dir), env_source(LOG_DIR_ENV))),
        (None, Some(dir)) => Some(Resolved::new(PathBuf::from(dir), ValueSource::ConfigFile)),
        (None, None) => None,
    };

    let default_users_file = match mode.value {
        Mode::Full => USERS_FILE,
        Mode::Minimal => MINIMAL_USERS_FILE,
    };
    let users_file = match file.users_file.clone() {
        Some(name) => Resolved::new(name, ValueSource::ConfigFile),
        None => Resolved::new(default_users_file.to_string(), ValueSource::Default),
    };
    let projects_file = match file.projects_file.clone() {
        Some(name) => Resolved::new(name, ValueSource::ConfigFile),
        None => Resolved::new(PROJECTS_FILE.to_string(), ValueSource::Default),
    };

    let landing_page = file
        .landing_page
        .clone()
        .map(|page| Resolved::new(page, ValueSource::ConfigFile));

    Ok(ResolvedConfig {
        data_dir,
        config_path,
        host,
        port,
        mode: Resolved::new(mode.value.as_str().to_string(), mode.source),
        static_dir,
        landing_page,
        users_file,
        projects_file,
        corrupt_policy: Resolved::new(
            corrupt_policy.value.as_str().to_string(),
            corrupt_policy.source,
        ),
        log_dir,
        parsed_mode: mode.value,
        parsed_policy: corrupt_policy.value,
    })
}

fn env_source(name: &str) -> ValueSource {
    ValueSource::EnvVar(name.to_string())
}

/// Pick a value by precedence: flag > env var > config file > default.
fn pick<T, E, P>(
    flag: Option<T>,
    env_name: &str,
    env: &E,
    from_file: Option<T>,
    default: T,
    parse: P,
) -> Result<Resolved<T>>
where
    E: Fn(&str) -> Option<String>,
    P: Fn(&str) -> Result<T>,
{
    if let Some(value) = flag {
        return Ok(Resolved::new(value, ValueSource::CliFlag));
    }
    if let Some(raw) = env(env_name) {
        return Ok(Resolved::new(parse(&raw)?, env_source(env_name)));
    }
    if let Some(value) = from_file {
        return Ok(Resolved::new(value, ValueSource::ConfigFile));
    }
    Ok(Resolved::new(default, ValueSource::Default))
}

/// Load taskboard.kdl. A missing default file is an empty config; a missing
/// explicitly requested file is an error.
fn load_config_file(path: &Path, explicit: bool) -> Result<TaskboardConfig> {
    match fs::read_to_string(path) {
        Ok(text) => TaskboardConfig::parse(&text)
            .map_err(|e| Error::Config(format!("{}: {}", path.display(), e))),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound && !explicit => {
            Ok(TaskboardConfig::new())
        }
        Err(e) => Err(Error::Config(format!(
            "Could not read {}: {}",
            path.display(),
            e
        ))),
    }
}
