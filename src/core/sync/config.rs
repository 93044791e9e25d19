/*!
 * Synchronization Configuration
 *
 * Runtime configuration for backend selection
 */

use crate::core::limits::{DEFAULT_MAX_SYNC_HANDLES, DEFAULT_POLL_INTERVAL_CAP};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use std::time::Duration;

/// Read-write lock backend selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RwBackendKind {
    /// Slim lock: try-acquire primitive, timed waits emulated by polling
    Slim,
    /// Toolkit lock: native timed acquire, selectable recursion
    Toolkit,
    /// POSIX rwlock (named, not available)
    Posix,
    /// Auto-select for the current platform
    Auto,
}

impl FromStr for RwBackendKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "slim" | "srw" => Ok(Self::Slim),
            "toolkit" | "qt" => Ok(Self::Toolkit),
            "posix" | "pthread" => Ok(Self::Posix),
            "auto" | "" => Ok(Self::Auto),
            other => Err(format!("unknown rw backend: {}", other)),
        }
    }
}

/// Whether the owner of a lock may acquire it again
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecursionMode {
    Recursive,
    NonRecursive,
}

impl RecursionMode {
    #[inline]
    pub fn is_recursive(self) -> bool {
        matches!(self, Self::Recursive)
    }
}

impl From<bool> for RecursionMode {
    fn from(recursive: bool) -> Self {
        if recursive {
            Self::Recursive
        } else {
            Self::NonRecursive
        }
    }
}

/// Synchronization configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncConfig {
    /// Preferred read-write lock backend
    pub rw_backend: RwBackendKind,
    /// Recursion mode for toolkit locks
    pub recursion: RecursionMode,
    /// Longest sleep between attempts of an emulated timed acquire
    pub poll_interval_cap: Duration,
    /// Capacity of the process handle table
    pub max_handles: usize,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            rw_backend: RwBackendKind::Auto,
            recursion: RecursionMode::Recursive,
            poll_interval_cap: DEFAULT_POLL_INTERVAL_CAP,
            max_handles: DEFAULT_MAX_SYNC_HANDLES,
        }
    }
}

impl SyncConfig {
    /// Toolkit locks with the given recursion mode
    pub fn toolkit(recursion: RecursionMode) -> Self {
        Self {
            rw_backend: RwBackendKind::Toolkit,
            recursion,
            ..Default::default()
        }
    }

    /// Slim locks with the default poll cap
    pub fn slim() -> Self {
        Self {
            rw_backend: RwBackendKind::Slim,
            recursion: RecursionMode::NonRecursive,
            ..Default::default()
        }
    }

    /// Read overrides from the environment
    ///
    /// Environment variables:
    /// - SYNCTL_RW_BACKEND: auto | slim | toolkit | posix
    /// - SYNCTL_RW_RECURSIVE: 1 | true | 0 | false
    /// - SYNCTL_POLL_CAP_MS: poll interval cap in milliseconds
    /// - SYNCTL_MAX_HANDLES: handle table capacity
    ///
    /// Unparseable values are logged and ignored.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`SyncConfig::from_env`] with an injectable lookup
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(value) = lookup("SYNCTL_RW_BACKEND") {
            match value.parse() {
                Ok(kind) => config.rw_backend = kind,
                Err(e) => tracing::warn!(error = %e, "Ignoring SYNCTL_RW_BACKEND"),
            }
        }

        if let Some(value) = lookup("SYNCTL_RW_RECURSIVE") {
            match value.trim() {
                "1" | "true" => config.recursion = RecursionMode::Recursive,
                "0" | "false" => config.recursion = RecursionMode::NonRecursive,
                other => tracing::warn!(value = other, "Ignoring SYNCTL_RW_RECURSIVE"),
            }
        }

        if let Some(value) = lookup("SYNCTL_POLL_CAP_MS") {
            match value.trim().parse::<u64>() {
                Ok(ms) => config.poll_interval_cap = Duration::from_millis(ms.max(1)),
                Err(e) => tracing::warn!(error = %e, "Ignoring SYNCTL_POLL_CAP_MS"),
            }
        }

        if let Some(value) = lookup("SYNCTL_MAX_HANDLES") {
            match value.trim().parse::<usize>() {
                Ok(n) => config.max_handles = n,
                Err(e) => tracing::warn!(error = %e, "Ignoring SYNCTL_MAX_HANDLES"),
            }
        }

        config
    }

    /// Resolve `Auto` to a concrete backend
    pub fn select_backend(&self) -> RwBackendKind {
        match self.rw_backend {
            RwBackendKind::Auto => {
                // Native timed acquire avoids the polling loop
                RwBackendKind::Toolkit
            }
            other => other,
        }
    }
}
