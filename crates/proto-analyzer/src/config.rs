//! Resolver settings with defaults, partial JSON overrides, and clamped
//! normalization.

use std::time::Duration;

use serde::Deserialize;
use serde_json::Value;

pub const MIN_MAX_FILE_SIZE_KB: u64 = 16;
pub const MAX_MAX_FILE_SIZE_KB: u64 = 1024 * 64;
pub const MIN_LOCK_WARN_MS: u64 = 1;
pub const MAX_LOCK_WARN_MS: u64 = 1000;

/// Tunables of the import resolver.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolverOptions {
    /// Files above this size are refused by the file-system strategy.
    pub max_file_size: u64,
    /// Threshold above which waiting on the path-table lock logs a
    /// warning.
    pub lock_warn: Duration,
}

impl Default for ResolverOptions {
    fn default() -> Self {
        Self {
            max_file_size: 1024 * 1024,
            lock_warn: Duration::from_millis(10),
        }
    }
}

/// Partial deserialization target; absent keys keep their defaults.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct ResolverOptionsPatch {
    max_file_size_kb: Option<u64>,
    lock_warn_ms: Option<u64>,
}

impl ResolverOptions {
    pub fn from_json(value: &Value) -> Self {
        let patch: ResolverOptionsPatch = serde_json::from_value(value.clone()).unwrap_or_default();
        let mut options = Self::default();
        options.apply_patch(patch);
        options.normalize();
        options
    }

    fn apply_patch(
        &mut self,
        patch: ResolverOptionsPatch,
    ) {
        if let Some(kb) = patch.max_file_size_kb {
            self.max_file_size = kb * 1024;
        }
        if let Some(ms) = patch.lock_warn_ms {
            self.lock_warn = Duration::from_millis(ms);
        }
    }

    fn normalize(&mut self) {
        self.max_file_size =
            self.max_file_size.clamp(MIN_MAX_FILE_SIZE_KB * 1024, MAX_MAX_FILE_SIZE_KB * 1024);
        let warn_ms = (self.lock_warn.as_millis() as u64).clamp(MIN_LOCK_WARN_MS, MAX_LOCK_WARN_MS);
        self.lock_warn = Duration::from_millis(warn_ms);
    }
}
