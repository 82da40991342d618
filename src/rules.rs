// src/rules.rs
//! Active-rule configuration: registry collaborator and the per-session
//! transfer artifact consumed by every engine invocation.

use std::collections::BTreeMap;
use std::io::Write;
use std::path::Path;

use serde::Deserialize;
use tempfile::Builder;

use crate::error::{Result, ScanError};

/// Rule repository the platform scopes this system's diagnostics to.
pub const REPOSITORY_KEY: &str = "powerscript-rules";

/// Fixed prefix on every rule identifier in the repository. The engine works
/// with bare identifiers, so the exporter strips it and the ingestor puts it
/// back.
pub const RULE_PREFIX: &str = "PB";

/// One enabled rule with its configured parameter values.
#[derive(Debug, Clone, Deserialize)]
pub struct ActiveRule {
    pub key: String,
    #[serde(default)]
    pub params: BTreeMap<String, String>,
}

/// Supplies the enabled rules for one run, already scoped to
/// [`REPOSITORY_KEY`].
pub trait ActiveRuleRegistry {
    fn active_rules(&self) -> Vec<ActiveRule>;
}

/// Registry backed by a JSON file mapping rule key to parameter map:
/// `{"PBLineLength": {"maximumLineLength": "120"}, ...}`.
#[derive(Debug, Default)]
pub struct FileRegistry {
    rules: Vec<ActiveRule>,
}

impl FileRegistry {
    /// Loads the active-rule set from `path`.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|source| ScanError::Io {
            source,
            path: path.to_path_buf(),
        })?;
        let map: BTreeMap<String, BTreeMap<String, String>> = serde_json::from_str(&text)?;
        let rules = map
            .into_iter()
            .map(|(key, params)| ActiveRule { key, params })
            .collect();
        Ok(Self { rules })
    }

    /// An empty set; the engine falls back to its own defaults.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }
}

impl ActiveRuleRegistry for FileRegistry {
    fn active_rules(&self) -> Vec<ActiveRule> {
        self.rules.clone()
    }
}

/// Serializes the active rules to a session-scoped transfer file and returns
/// its path, to be passed as the last argument of every engine invocation.
///
/// Rule keys are exported with [`RULE_PREFIX`] stripped, the form the engine
/// expects. The file is left on disk for the session (and after it; cleanup
/// is the host's concern). Export failure is not fatal: it is logged and an
/// empty path is returned, which makes the engine use its default
/// configuration for every rule.
#[must_use]
pub fn export_active_rules(registry: &dyn ActiveRuleRegistry) -> String {
    let exported: BTreeMap<String, BTreeMap<String, String>> = registry
        .active_rules()
        .into_iter()
        .map(|rule| (bare_key(&rule.key).to_string(), rule.params))
        .collect();

    match write_artifact(&exported) {
        Ok(path) => {
            tracing::debug!("active rules exported to {path}");
            path
        }
        Err(e) => {
            tracing::error!("could not export active rules to JSON: {e}");
            String::new()
        }
    }
}

fn bare_key(key: &str) -> &str {
    key.strip_prefix(RULE_PREFIX).unwrap_or(key)
}

fn write_artifact(exported: &BTreeMap<String, BTreeMap<String, String>>) -> Result<String> {
    let mut file = Builder::new()
        .prefix("activeRules")
        .suffix(".json")
        .tempfile()?;
    serde_json::to_writer(&mut file, exported)?;
    file.flush()?;
    let (_, path) = file.keep().map_err(|e| ScanError::Process(e.error))?;
    Ok(path.display().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    // The exporter writes into the process temp dir, which the degrade-path
    // test redirects via TMPDIR. Serialize the tests that touch it.
    static TEMP_DIR_LOCK: Mutex<()> = Mutex::new(());

    struct Fixed(Vec<ActiveRule>);

    impl ActiveRuleRegistry for Fixed {
        fn active_rules(&self) -> Vec<ActiveRule> {
            self.0.clone()
        }
    }

    #[test]
    fn exports_bare_keys_and_params() {
        let _guard = TEMP_DIR_LOCK
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        let registry = Fixed(vec![
            ActiveRule {
                key: "PBLineLength".to_string(),
                params: BTreeMap::from([(
                    "maximumLineLength".to_string(),
                    "120".to_string(),
                )]),
            },
            ActiveRule {
                key: "PBEmptyCatch".to_string(),
                params: BTreeMap::new(),
            },
        ]);

        let path = export_active_rules(&registry);
        assert!(!path.is_empty());

        let text = std::fs::read_to_string(&path).unwrap();
        let parsed: BTreeMap<String, BTreeMap<String, String>> =
            serde_json::from_str(&text).unwrap();
        assert_eq!(parsed.len(), 2);
        assert_eq!(parsed["LineLength"]["maximumLineLength"], "120");
        assert!(parsed["EmptyCatch"].is_empty());

        std::fs::remove_file(path).ok();
    }

    #[test]
    fn unwritable_target_degrades_to_empty_path() {
        let _guard = TEMP_DIR_LOCK
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        let original = std::env::var_os("TMPDIR");
        std::env::set_var("TMPDIR", "/nonexistent/powerscan-tmpdir");

        let path = export_active_rules(&FileRegistry::empty());

        match original {
            Some(value) => std::env::set_var("TMPDIR", value),
            None => std::env::remove_var("TMPDIR"),
        }
        assert_eq!(path, "", "export failure must fall back to the empty path");
    }

    #[test]
    fn key_without_prefix_survives() {
        assert_eq!(bare_key("PBDynamic"), "Dynamic");
        assert_eq!(bare_key("X"), "X");
    }
}
