//! Configuration management with layered loading
//!
//! Precedence (lowest to highest):
//! 1. Compiled defaults
//! 2. Global config: `$XDG_CONFIG_HOME/playreg/playreg.toml`
//! 3. Local config: `<project_dir>/.playreg.toml`
//! 4. Environment variables: `PLAYREG_*` prefix

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use config::{Config, ConfigError, Environment};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::application::ApplicationError;

/// Raw settings for intermediate parsing (arrays are Option to detect "not specified").
///
/// Used during layered config merging to distinguish between:
/// - `None` → field not specified, inherit from base
/// - `Some([])` → explicit empty array
/// - `Some([...])` → explicit values to merge
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawSettings {
    pub plays_dir: Option<PathBuf>,
    pub extensions: Option<Vec<String>>,
    pub ignore: Option<Vec<String>>,
}

/// Unified configuration for playreg.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    /// Root of the play hierarchy (default: ./plays)
    pub plays_dir: PathBuf,
    /// File extensions that hold plays (default: ["py"])
    pub extensions: Vec<String>,
    /// File stems that are never plays (default: ["__init__"])
    pub ignore: Vec<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            plays_dir: PathBuf::from("plays"),
            extensions: vec!["py".into()],
            ignore: vec!["__init__".into()],
        }
    }
}

/// Get the XDG config directory for playreg.
pub fn global_config_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "playreg").map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the path to the global config file.
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("playreg.toml"))
}

/// Get the path to the local config file in a project directory.
pub fn local_config_path(project_dir: &Path) -> PathBuf {
    project_dir.join(".playreg.toml")
}

/// Load a TOML file into RawSettings for manual merging.
fn load_raw_settings(path: &Path) -> Result<RawSettings, ApplicationError> {
    let content = std::fs::read_to_string(path).map_err(|e| ApplicationError::Config {
        message: format!("read {}: {}", path.display(), e),
    })?;
    toml::from_str(&content).map_err(|e| ApplicationError::Config {
        message: format!("parse {}: {}", path.display(), e),
    })
}

/// Expand `~`, `$VAR` and `${VAR}` in a path string; unknown variables are left as is.
fn expand_env_vars(path: &str) -> String {
    shellexpand::full(path)
        .map(|s| s.into_owned())
        .unwrap_or_else(|_| path.to_string())
}

impl Settings {
    /// Merge arrays with union semantics and negation support.
    ///
    /// - Items from overlay are added to base
    /// - Items prefixed with `!` remove the corresponding item from the result
    /// - Duplicates are de-duplicated
    ///
    /// # Examples
    /// ```ignore
    /// merge_array(&["py"], &["lua"])        // → ["lua", "py"]
    /// merge_array(&["py", "lua"], &["!py"]) // → ["lua"]
    /// ```
    pub fn merge_array(base: &[String], overlay: &[String]) -> Vec<String> {
        let mut result: HashSet<String> = base.iter().cloned().collect();

        for pattern in overlay {
            if let Some(negated) = pattern.strip_prefix('!') {
                result.remove(negated);
            } else {
                result.insert(pattern.clone());
            }
        }

        // Convert to sorted Vec for deterministic output
        let mut vec: Vec<String> = result.into_iter().collect();
        vec.sort();
        vec
    }

    /// Expand shell variables and tilde in `plays_dir`.
    fn expand_paths(&mut self) {
        let expanded = expand_env_vars(self.plays_dir.to_string_lossy().as_ref());
        self.plays_dir = PathBuf::from(expanded);
    }

    /// Merge overlay config onto self (base) with union semantics for arrays.
    fn merge_with(&self, overlay: &RawSettings) -> Self {
        Self {
            plays_dir: overlay
                .plays_dir
                .clone()
                .unwrap_or_else(|| self.plays_dir.clone()),
            extensions: overlay
                .extensions
                .as_ref()
                .map(|o| Self::merge_array(&self.extensions, o))
                .unwrap_or_else(|| self.extensions.clone()),
            ignore: overlay
                .ignore
                .as_ref()
                .map(|o| Self::merge_array(&self.ignore, o))
                .unwrap_or_else(|| self.ignore.clone()),
        }
    }

    /// Apply global config onto defaults with REPLACE semantics for arrays.
    fn apply_global(&self, global: &RawSettings) -> Self {
        Self {
            plays_dir: global
                .plays_dir
                .clone()
                .unwrap_or_else(|| self.plays_dir.clone()),
            extensions: global
                .extensions
                .clone()
                .unwrap_or_else(|| self.extensions.clone()),
            ignore: global.ignore.clone().unwrap_or_else(|| self.ignore.clone()),
        }
    }

    /// Load settings with layered precedence.
    ///
    /// # Arguments
    /// * `project_dir` - Optional project directory holding `.playreg.toml`
    ///
    /// # Array Merge Semantics
    /// - Defaults → Global: REPLACE
    /// - Global → Local: UNION with `!item` negation
    /// - Any → Env vars: REPLACE
    ///
    /// A relative `plays_dir` from the local file is resolved against `project_dir`.
    pub fn load(project_dir: Option<&Path>) -> Result<Self, ApplicationError> {
        let mut current = Self::default();

        if let Some(global_path) = global_config_path() {
            if global_path.exists() {
                let raw = load_raw_settings(&global_path)?;
                current = current.apply_global(&raw);
            }
        }

        if let Some(project) = project_dir {
            let local_path = local_config_path(project);
            if local_path.exists() {
                let raw = load_raw_settings(&local_path)?;
                current = current.merge_with(&raw);
            }
        }

        current = Self::apply_env_overrides(current)?;
        current.expand_paths();

        if let Some(project) = project_dir {
            if current.plays_dir.is_relative() {
                current.plays_dir = project.join(&current.plays_dir);
            }
        }

        Ok(current)
    }

    /// Apply PLAYREG_* environment variables as explicit overrides.
    fn apply_env_overrides(mut settings: Self) -> Result<Self, ApplicationError> {
        let builder = Config::builder().add_source(
            Environment::with_prefix("PLAYREG")
                .prefix_separator("_")
                .separator("__")
                .list_separator(",")
                .with_list_parse_key("extensions")
                .with_list_parse_key("ignore"),
        );

        let config = builder.build().map_err(config_err)?;

        if let Ok(val) = config.get_string("plays_dir") {
            settings.plays_dir = PathBuf::from(val);
        }
        if let Ok(val) = config.get::<Vec<String>>("extensions") {
            settings.extensions = val;
        }
        if let Ok(val) = config.get::<Vec<String>>("ignore") {
            settings.ignore = val;
        }

        Ok(settings)
    }

    /// Show the effective configuration as TOML.
    pub fn to_toml(&self) -> Result<String, ApplicationError> {
        toml::to_string_pretty(self).map_err(|e| ApplicationError::Config {
            message: format!("serialize config: {e}"),
        })
    }

    /// Generate a template config file.
    pub fn template() -> String {
        r#"# playreg configuration
#
# Locations (by precedence, lowest to highest):
#   Global: ~/.config/playreg/playreg.toml  (defines your baseline)
#   Local:  <project>/.playreg.toml         (project-specific additions)
#   Env:    PLAYREG_* environment variables (explicit overrides)
#
# Array Merge Semantics:
#   Global config REPLACES compiled defaults.
#   Local config UNIONS with global.
#   Use "!item" in local config to REMOVE an inherited item:
#     extensions = ["lua", "!py"]  # adds lua, removes py

# Root of the play hierarchy; folders become categories
# plays_dir = "plays"

# File extensions that contain plays
# extensions = ["py"]

# File stems that are never registered as plays
# ignore = ["__init__"]
"#
        .to_string()
    }
}

fn config_err(e: ConfigError) -> ApplicationError {
    ApplicationError::Config {
        message: e.to_string(),
    }
}
