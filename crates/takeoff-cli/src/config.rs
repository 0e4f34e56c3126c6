// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result, anyhow, bail};
use serde::Deserialize;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use takeoff_app::DEFAULT_HISTORY_LIMIT;
use tracing::Level;

use crate::logging::LogFormat;

const APP_NAME: &str = "takeoff";
const CONFIG_VERSION: i64 = 1;
const DEFAULT_BASE_URL: &str = "http://localhost:8080/api";
const DEFAULT_TIMEOUT: &str = "5s";
const DEFAULT_LOG_LEVEL: Level = Level::WARN;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub version: i64,
    #[serde(default)]
    pub catalog: Catalog,
    #[serde(default)]
    pub session: Session,
    #[serde(default)]
    pub clipboard: Clipboard,
    #[serde(default)]
    pub log: Log,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            version: CONFIG_VERSION,
            catalog: Catalog::default(),
            session: Session::default(),
            clipboard: Clipboard::default(),
            log: Log::default(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Catalog {
    pub base_url: Option<String>,
    pub file: Option<String>,
    pub timeout: Option<String>,
}

impl Default for Catalog {
    fn default() -> Self {
        Self {
            base_url: Some(DEFAULT_BASE_URL.to_owned()),
            file: None,
            timeout: Some(DEFAULT_TIMEOUT.to_owned()),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Session {
    pub history_limit: Option<i64>,
}

impl Default for Session {
    fn default() -> Self {
        Self {
            history_limit: Some(DEFAULT_HISTORY_LIMIT as i64),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Clipboard {
    pub path: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Log {
    pub level: Option<String>,
    pub format: Option<String>,
}

/// Where the catalog comes from once config and flags are combined.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogLocation {
    File(PathBuf),
    Http { base_url: String, timeout: Duration },
}

impl Config {
    pub fn default_path() -> Result<PathBuf> {
        if let Some(path) = env::var_os("TAKEOFF_CONFIG_PATH") {
            return Ok(PathBuf::from(path));
        }

        let config_root = dirs::config_dir().ok_or_else(|| {
            anyhow!("cannot resolve config directory; set TAKEOFF_CONFIG_PATH to the config file")
        })?;

        let app_dir = config_root.join(APP_NAME);
        fs::create_dir_all(&app_dir)
            .with_context(|| format!("create config directory {}", app_dir.display()))?;
        Ok(app_dir.join("config.toml"))
    }

    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let raw = fs::read_to_string(path)
            .with_context(|| format!("read config file {}", path.display()))?;
        let value: toml::Value = toml::from_str(&raw)
            .with_context(|| format!("parse TOML config {}", path.display()))?;

        let version = value
            .get("version")
            .and_then(toml::Value::as_integer)
            .ok_or_else(|| {
                anyhow!(
                    "config file {} has no version. Add `version = 1` at the top and keep values under [catalog], [session], [clipboard], and [log]",
                    path.display()
                )
            })?;

        if version != CONFIG_VERSION {
            bail!(
                "unsupported config version {} in {}; expected version = 1",
                version,
                path.display()
            );
        }

        let config: Config = value
            .try_into()
            .with_context(|| format!("decode config {}", path.display()))?;
        config.validate(path)?;
        Ok(config)
    }

    fn validate(&self, path: &Path) -> Result<()> {
        if let Some(timeout) = &self.catalog.timeout {
            let parsed = parse_duration(timeout)
                .with_context(|| format!("catalog.timeout in {}", path.display()))?;
            if parsed <= Duration::ZERO {
                bail!(
                    "catalog.timeout in {} must be positive, got {}",
                    path.display(),
                    timeout
                );
            }
        }

        if let Some(file) = &self.catalog.file
            && file.trim().is_empty()
        {
            bail!(
                "catalog.file in {} must not be empty; remove it to use catalog.base_url",
                path.display()
            );
        }

        if let Some(limit) = self.session.history_limit
            && limit <= 0
        {
            bail!(
                "session.history_limit in {} must be positive, got {}",
                path.display(),
                limit
            );
        }

        if let Some(level) = &self.log.level {
            parse_level(level).with_context(|| format!("log.level in {}", path.display()))?;
        }
        if let Some(format) = &self.log.format {
            LogFormat::parse(format).ok_or_else(|| {
                anyhow!(
                    "log.format in {} must be pretty, compact or json, got {format:?}",
                    path.display()
                )
            })?;
        }

        Ok(())
    }

    /// `file` wins over `base_url` when both are set.
    pub fn catalog_location(&self) -> Result<CatalogLocation> {
        if let Some(file) = &self.catalog.file {
            return Ok(CatalogLocation::File(PathBuf::from(file)));
        }
        Ok(CatalogLocation::Http {
            base_url: self.catalog_base_url().to_owned(),
            timeout: self.catalog_timeout()?,
        })
    }

    pub fn catalog_base_url(&self) -> &str {
        self.catalog
            .base_url
            .as_deref()
            .unwrap_or(DEFAULT_BASE_URL)
            .trim_end_matches('/')
    }

    pub fn catalog_timeout(&self) -> Result<Duration> {
        parse_duration(self.catalog.timeout.as_deref().unwrap_or(DEFAULT_TIMEOUT))
    }

    pub fn history_limit(&self) -> usize {
        self.session
            .history_limit
            .and_then(|limit| usize::try_from(limit).ok())
            .filter(|limit| *limit > 0)
            .unwrap_or(DEFAULT_HISTORY_LIMIT)
    }

    pub fn clipboard_path(&self) -> Option<PathBuf> {
        self.clipboard.path.as_deref().map(PathBuf::from)
    }

    pub fn log_level(&self) -> Result<Level> {
        match &self.log.level {
            Some(level) => parse_level(level),
            None => Ok(DEFAULT_LOG_LEVEL),
        }
    }

    pub fn log_format(&self) -> LogFormat {
        self.log
            .format
            .as_deref()
            .and_then(LogFormat::parse)
            .unwrap_or_default()
    }

    pub fn example_config(path: &Path) -> String {
        format!(
            "# takeoff config\n# Place this file at: {}\n\nversion = 1\n\n[catalog]\nbase_url = \"{}\"\n# Optional. A JSON catalog file; wins over base_url when set.\n# file = \"/absolute/path/to/catalog.json\"\ntimeout = \"{}\"\n\n[session]\nhistory_limit = {}\n\n[clipboard]\n# Optional. Copied text goes here instead of stdout.\n# path = \"/tmp/takeoff.txt\"\n\n[log]\nlevel = \"warn\"\nformat = \"compact\"\n",
            path.display(),
            DEFAULT_BASE_URL,
            DEFAULT_TIMEOUT,
            DEFAULT_HISTORY_LIMIT,
        )
    }
}

fn parse_level(raw: &str) -> Result<Level> {
    raw.trim().parse::<Level>().map_err(|_| {
        anyhow!("invalid log level {raw:?}; use one of: error, warn, info, debug, trace")
    })
}

fn parse_duration(raw: &str) -> Result<Duration> {
    if let Some(value) = raw.strip_suffix("ms") {
        let millis: u64 = value
            .parse()
            .with_context(|| format!("invalid timeout duration {raw:?}"))?;
        return Ok(Duration::from_millis(millis));
    }
    if let Some(value) = raw.strip_suffix('s') {
        let secs: u64 = value
            .parse()
            .with_context(|| format!("invalid timeout duration {raw:?}"))?;
        return Ok(Duration::from_secs(secs));
    }
    if let Some(value) = raw.strip_suffix('m') {
        let mins: u64 = value
            .parse()
            .with_context(|| format!("invalid timeout duration {raw:?}"))?;
        let secs = mins
            .checked_mul(60)
            .ok_or_else(|| anyhow!("timeout duration {raw:?} is too large"))?;
        return Ok(Duration::from_secs(secs));
    }

    bail!("invalid duration {raw:?}; use one of: <N>ms, <N>s, <N>m (for example 500ms or 5s)")
}
