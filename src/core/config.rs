/*!
 * Filesystem Configuration
 *
 * Runtime configuration for tree capacity, naming, and startup layout
 */

use serde::{Deserialize, Serialize};
use tracing::warn;

use super::limits::MAX_NAME_LEN;

/// Environment variable: total content capacity in bytes (unset = unlimited)
pub const ENV_CAPACITY: &str = "SIMFS_CAPACITY";
/// Environment variable: maximum entity name length in bytes
pub const ENV_MAX_NAME_LEN: &str = "SIMFS_MAX_NAME_LEN";
/// Environment variable: JSON tracing output (`1` or `true`), read by `init_tracing`
pub const ENV_TRACE_JSON: &str = "SIMFS_TRACE_JSON";
/// Environment variable: create the standard directory layout at startup
pub const ENV_SEED_DIRS: &str = "SIMFS_SEED_DIRS";

/// Filesystem configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", default, deny_unknown_fields)]
pub struct FsConfig {
    /// Upper bound on the sum of all file content, in bytes
    pub capacity: Option<usize>,
    /// Upper bound on a single entity name, in bytes
    pub max_name_len: usize,
    /// Create the standard directory layout on startup
    pub seed_standard_dirs: bool,
}

impl Default for FsConfig {
    fn default() -> Self {
        Self {
            capacity: None,
            max_name_len: MAX_NAME_LEN,
            seed_standard_dirs: true,
        }
    }
}

impl FsConfig {
    /// Configuration with a content capacity
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            capacity: Some(capacity),
            ..Self::default()
        }
    }

    /// Load configuration from process environment variables
    ///
    /// Environment variables:
    /// - SIMFS_CAPACITY: content capacity in bytes (default: unlimited)
    /// - SIMFS_MAX_NAME_LEN: maximum name length (default: 255)
    /// - SIMFS_SEED_DIRS: seed the standard layout (default: true)
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary key lookup
    ///
    /// Unparseable values are logged and replaced by their defaults.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let capacity = match lookup(ENV_CAPACITY) {
            Some(raw) => match raw.trim().parse::<usize>() {
                Ok(value) => Some(value),
                Err(e) => {
                    warn!(key = ENV_CAPACITY, value = %raw, error = %e, "Invalid capacity, using unlimited");
                    defaults.capacity
                }
            },
            None => defaults.capacity,
        };

        let max_name_len = match lookup(ENV_MAX_NAME_LEN) {
            Some(raw) => match raw.trim().parse::<usize>() {
                Ok(value) if value > 0 => value,
                _ => {
                    warn!(key = ENV_MAX_NAME_LEN, value = %raw, "Invalid name length limit, using default");
                    defaults.max_name_len
                }
            },
            None => defaults.max_name_len,
        };

        let seed_standard_dirs = lookup(ENV_SEED_DIRS)
            .map(|v| parse_flag(&v))
            .unwrap_or(defaults.seed_standard_dirs);

        Self {
            capacity,
            max_name_len,
            seed_standard_dirs,
        }
    }
}

fn parse_flag(raw: &str) -> bool {
    matches!(raw.trim(), "1" | "true" | "TRUE" | "yes")
}
