// src/config.rs
//! Session settings and the optional `powerscan.toml` overlay.

use std::path::Path;

use serde::Deserialize;

/// Command used to launch the engine artifact.
pub const LAUNCHER_DEFAULT: &str = "dotnet";

/// Where the engine artifact lives when the host configures nothing.
pub const ANALYZER_PATH_DEFAULT: &str =
    "~/git/PowerScriptAnalyzer/PowerScriptAnalyzer/bin/Release/netcoreapp2.2/PowerScriptAnalyzer.dll";

/// Resolved configuration for one analysis session.
#[derive(Debug, Clone)]
pub struct Settings {
    /// Runtime launcher invoked as the subprocess command.
    pub launcher: String,
    /// Absolute path to the engine's runnable artifact.
    pub analyzer_path: String,
    /// Worker count; 1 keeps the reference single-subprocess behavior.
    pub jobs: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            launcher: LAUNCHER_DEFAULT.to_string(),
            analyzer_path: ANALYZER_PATH_DEFAULT.to_string(),
            jobs: 1,
        }
    }
}

/// On-disk shape of `powerscan.toml`; every field optional.
#[derive(Debug, Default, Deserialize)]
struct SettingsFile {
    launcher: Option<String>,
    analyzer_path: Option<String>,
    jobs: Option<usize>,
}

impl Settings {
    /// Defaults overlaid with `powerscan.toml` from `root`, when present.
    /// A malformed file is logged and ignored rather than failing the run.
    #[must_use]
    pub fn load(root: &Path) -> Self {
        let mut settings = Self::default();
        let config_path = root.join("powerscan.toml");
        let Ok(text) = std::fs::read_to_string(&config_path) else {
            return settings;
        };
        match toml::from_str::<SettingsFile>(&text) {
            Ok(file) => settings.apply(file),
            Err(e) => {
                tracing::warn!("ignoring malformed {}: {e}", config_path.display());
            }
        }
        settings
    }

    fn apply(&mut self, file: SettingsFile) {
        if let Some(launcher) = file.launcher {
            self.launcher = launcher;
        }
        if let Some(analyzer_path) = file.analyzer_path {
            self.analyzer_path = analyzer_path;
        }
        if let Some(jobs) = file.jobs {
            self.jobs = jobs.max(1);
        }
    }
}
