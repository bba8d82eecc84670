//! Configuration for Lineage GC

use serde::{Deserialize, Serialize};
use std::str::FromStr;
use tracing::warn;

pub const ENV_ENABLED: &str = "LINEAGE_GC_ENABLED";
pub const ENV_VERIFY_INTEGRITY: &str = "LINEAGE_GC_VERIFY_INTEGRITY";
pub const ENV_VERIFY_RESULT: &str = "LINEAGE_GC_VERIFY_RESULT";
pub const ENV_MAX_SNAPSHOT_SIZE: &str = "LINEAGE_GC_MAX_SNAPSHOT_SIZE";
pub const ENV_INCLUDE_OUTPUT_REFS: &str = "LINEAGE_GC_INCLUDE_OUTPUT_REFS";

/// Garbage collection configuration
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GcConfig {
    /// Master switch; a disabled collector refuses to run
    pub enabled: bool,
    /// Reject snapshots with duplicate ids or double-consumed outputs
    pub verify_integrity: bool,
    /// Re-check every result against the invariant oracle (slow)
    pub verify_result: bool,
    /// Maximum transactions in one snapshot (anti-OOM)
    pub max_snapshot_size: usize,
    /// Report the output slots owned by collectible transactions
    pub include_output_refs: bool,
}

impl Default for GcConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            verify_integrity: true,
            verify_result: false,
            max_snapshot_size: 10_000_000,
            include_output_refs: true,
        }
    }
}

impl GcConfig {
    /// Defaults overridden by `LINEAGE_GC_*` environment variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Defaults overridden by whatever `lookup` returns per variable.
    ///
    /// Unparsable values are ignored with a warning.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        override_from(&lookup, ENV_ENABLED, &mut config.enabled);
        override_from(&lookup, ENV_VERIFY_INTEGRITY, &mut config.verify_integrity);
        override_from(&lookup, ENV_VERIFY_RESULT, &mut config.verify_result);
        override_from(&lookup, ENV_MAX_SNAPSHOT_SIZE, &mut config.max_snapshot_size);
        override_from(&lookup, ENV_INCLUDE_OUTPUT_REFS, &mut config.include_output_refs);

        config
    }
}

fn override_from<F, T>(lookup: &F, key: &str, target: &mut T)
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    let Some(raw) = lookup(key) else {
        return;
    };
    match raw.trim().parse() {
        Ok(value) => *target = value,
        Err(_) => warn!(key, value = %raw, "[lineage-gc] Ignoring unparsable config override"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_default_config() {
        let config = GcConfig::default();
        assert!(config.enabled);
        assert!(config.verify_integrity);
        assert!(!config.verify_result);
        assert_eq!(config.max_snapshot_size, 10_000_000);
        assert!(config.include_output_refs);
    }

    #[test]
    fn test_env_overrides() {
        let vars: HashMap<&str, &str> = [
            (ENV_ENABLED, "false"),
            (ENV_VERIFY_RESULT, "true"),
            (ENV_MAX_SNAPSHOT_SIZE, " 500 "),
        ]
        .into_iter()
        .collect();

        let config = GcConfig::from_lookup(|key| vars.get(key).map(|v| v.to_string()));

        assert!(!config.enabled);
        assert!(config.verify_result);
        assert_eq!(config.max_snapshot_size, 500);
        // Untouched fields keep defaults
        assert!(config.verify_integrity);
        assert!(config.include_output_refs);
    }

    #[test]
    fn test_unparsable_override_is_ignored() {
        let config = GcConfig::from_lookup(|key| {
            (key == ENV_MAX_SNAPSHOT_SIZE).then(|| "lots".to_string())
        });
        assert_eq!(config.max_snapshot_size, 10_000_000);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: GcConfig = serde_json::from_str(r#"{"verify_result": true}"#).unwrap();

        assert!(config.verify_result);
        assert!(config.enabled);
        assert_eq!(config.max_snapshot_size, 10_000_000);
    }
}
