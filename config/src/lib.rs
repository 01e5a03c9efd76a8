//! Configuration for Bulwark executors.
//!
//! Settings are read from `$BULWARK_CONFIG`, or `~/.bulwark/config.toml` when
//! the variable is unset:
//!
//! ```toml
//! [executor]
//! thread_name = "bulwark-worker"
//! stack_size = 2097152
//! quiet_guards = false
//! ```
//!
//! Every key is optional. A missing or unreadable file yields the defaults;
//! problems are reported through `tracing` rather than returned.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use toml::de;

pub const CONFIG_ENV: &str = "BULWARK_CONFIG";
pub const QUIET_GUARDS_ENV: &str = "BULWARK_QUIET_GUARDS";
pub const DEFAULT_THREAD_NAME: &str = "bulwark-worker";

/// Raw file contents. Sections and keys mirror the TOML layout.
#[derive(Debug, Default, Deserialize)]
pub struct BulwarkConfig {
    pub executor: Option<ExecutorConfig>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ExecutorConfig {
    pub thread_name: Option<String>,
    pub stack_size: Option<usize>,
    pub quiet_guards: Option<bool>,
}

impl BulwarkConfig {
    pub fn parse(content: &str) -> Result<Self, de::Error> {
        toml::from_str(content)
    }

    pub fn load() -> Option<Self> {
        let path = config_path()?;
        Self::load_from(&path)
    }

    pub fn load_from(path: &Path) -> Option<Self> {
        if !path.exists() {
            return None;
        }

        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(err) => {
                tracing::warn!("Failed to read config at {:?}: {}", path, err);
                return None;
            }
        };

        match Self::parse(&content) {
            Ok(config) => Some(config),
            Err(err) => {
                tracing::warn!("Failed to parse config at {:?}: {}", path, err);
                None
            }
        }
    }

    pub fn path() -> Option<PathBuf> {
        config_path()
    }
}

/// Resolved executor settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BarrierConfig {
    /// Name given to every spawned worker thread. `None` leaves threads unnamed.
    pub thread_name: Option<String>,
    /// Stack size for spawned worker threads. `None` uses the platform default.
    pub stack_size: Option<usize>,
    /// Route guard panics to `tracing` instead of the default panic message.
    pub quiet_guards: bool,
}

impl Default for BarrierConfig {
    fn default() -> Self {
        Self {
            thread_name: Some(DEFAULT_THREAD_NAME.to_string()),
            stack_size: None,
            quiet_guards: false,
        }
    }
}

impl BarrierConfig {
    /// Load the config file and the environment override, falling back to
    /// defaults for anything missing.
    #[must_use]
    pub fn load() -> Self {
        let file = BulwarkConfig::load().unwrap_or_default();
        let mut config = Self::from_file(&file);
        if let Some(quiet) = quiet_guards_override() {
            config.quiet_guards = quiet;
        }
        config
    }

    #[must_use]
    pub fn from_file(file: &BulwarkConfig) -> Self {
        let mut config = Self::default();
        let Some(executor) = file.executor.as_ref() else {
            return config;
        };

        if let Some(name) = executor.thread_name.as_deref() {
            config.thread_name = sanitize_thread_name(name);
        }

        match executor.stack_size {
            Some(0) => tracing::warn!("Ignoring executor.stack_size = 0"),
            Some(size) => config.stack_size = Some(size),
            None => {}
        }

        if let Some(quiet) = executor.quiet_guards {
            config.quiet_guards = quiet;
        }

        config
    }

    /// Replace settings that would make a thread spawn fail or panic.
    ///
    /// A name with an interior NUL falls back to [`DEFAULT_THREAD_NAME`], a
    /// blank name leaves threads unnamed, and a zero stack size is dropped.
    #[must_use]
    pub fn sanitized(mut self) -> Self {
        self.thread_name = self.thread_name.as_deref().and_then(sanitize_thread_name);
        if self.stack_size == Some(0) {
            tracing::warn!("Ignoring executor.stack_size = 0");
            self.stack_size = None;
        }
        self
    }
}

fn sanitize_thread_name(name: &str) -> Option<String> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return None;
    }
    // Thread names with interior NULs make the spawn itself panic.
    if trimmed.contains('\0') {
        tracing::warn!(
            "Ignoring executor.thread_name containing a NUL byte; using {DEFAULT_THREAD_NAME:?}"
        );
        return Some(DEFAULT_THREAD_NAME.to_string());
    }
    Some(trimmed.to_string())
}

fn quiet_guards_override() -> Option<bool> {
    env::var(QUIET_GUARDS_ENV).ok().map(|raw| is_truthy(&raw))
}

fn is_truthy(raw: &str) -> bool {
    matches!(
        raw.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes"
    )
}

fn config_path() -> Option<PathBuf> {
    if let Some(path) = env::var_os(CONFIG_ENV).filter(|value| !value.is_empty()) {
        return Some(PathBuf::from(path));
    }
    dirs::home_dir().map(|home| home.join(".bulwark").join("config.toml"))
}
