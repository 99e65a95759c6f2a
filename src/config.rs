//! Configuration management with layered loading
//!
//! Precedence (lowest to highest):
//! 1. Compiled defaults
//! 2. Global config: `$XDG_CONFIG_HOME/sortree/sortree.toml`
//! 3. Local config: file passed with `--config`
//! 4. Environment variables: `SORTREE_*` prefix (`__` separates sections)

use std::path::{Path, PathBuf};

use config::{Config, ConfigError, Environment};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::application::{ApplicationError, TreeOptions};

/// Raw tree options for intermediate parsing (`None` means "not specified").
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawTreeOptions {
    pub allow_nesting: Option<bool>,
    pub edit_mode: Option<bool>,
    pub indentation: Option<i32>,
}

/// Raw settings for intermediate parsing.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawSettings {
    pub base_dir: Option<PathBuf>,
    pub default_index: Option<usize>,
    pub pretty: Option<bool>,
    pub tree: RawTreeOptions,
}

/// Unified configuration for sortree.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    /// Directory that relative tree document paths resolve against (default: cwd)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_dir: Option<PathBuf>,
    /// Child index used by `nest` when none is given
    pub default_index: usize,
    /// Pretty-print JSON output
    pub pretty: bool,
    /// Drag interaction options
    pub tree: TreeOptions,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            base_dir: None,
            default_index: 0,
            pretty: true,
            tree: TreeOptions::default(),
        }
    }
}

/// Get the XDG config directory for sortree.
pub fn global_config_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "sortree").map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the path to the global config file.
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("sortree.toml"))
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

fn config_err(e: ConfigError) -> ApplicationError {
    ApplicationError::Config {
        message: format!("environment override: {e}"),
    }
}

/// Expand `~`, `$VAR` and `${VAR}`; leaves the input alone if expansion fails.
pub fn expand_env_vars(path: &str) -> String {
    shellexpand::full(path)
        .map(|s| s.into_owned())
        .unwrap_or_else(|_| path.to_string())
}

impl Settings {
    /// Overlay wins wherever it specifies a value.
    fn merge_with(&self, overlay: &RawSettings) -> Self {
        Self {
            base_dir: overlay.base_dir.clone().or_else(|| self.base_dir.clone()),
            default_index: overlay.default_index.unwrap_or(self.default_index),
            pretty: overlay.pretty.unwrap_or(self.pretty),
            tree: TreeOptions {
                allow_nesting: overlay.tree.allow_nesting.unwrap_or(self.tree.allow_nesting),
                edit_mode: overlay.tree.edit_mode.unwrap_or(self.tree.edit_mode),
                indentation: overlay.tree.indentation.unwrap_or(self.tree.indentation),
            },
        }
    }

    /// Expand shell variables and tilde in path-like fields.
    fn expand_paths(&mut self) {
        if let Some(base_dir) = &self.base_dir {
            self.base_dir = Some(PathBuf::from(expand_env_vars(&base_dir.to_string_lossy())));
        }
    }

    /// Load settings from the global config, an optional local file and the
    /// environment.
    pub fn load(local: Option<&Path>) -> Result<Self, ApplicationError> {
        Self::load_layers(global_config_path().as_deref(), local)
    }

    /// Load settings from explicit config file locations.
    ///
    /// A missing global file is skipped; a missing local file is an error
    /// because it was asked for explicitly.
    pub fn load_layers(global: Option<&Path>, local: Option<&Path>) -> Result<Self, ApplicationError> {
        let mut current = Self::default();

        if let Some(global_path) = global {
            if global_path.exists() {
                debug!("global config: {}", global_path.display());
                current = current.merge_with(&load_raw_settings(global_path)?);
            }
        }

        if let Some(local_path) = local {
            debug!("local config: {}", local_path.display());
            current = current.merge_with(&load_raw_settings(local_path)?);
        }

        current = Self::apply_env_overrides(current)?;
        current.expand_paths();
        Ok(current)
    }

    /// Apply SORTREE_* environment variables as explicit overrides.
    ///
    /// A variable that is set but does not parse is a config error.
    fn apply_env_overrides(settings: Self) -> Result<Self, ApplicationError> {
        // SORTREE_TREE__INDENTATION -> tree.indentation
        let overrides: RawSettings = Config::builder()
            .add_source(
                Environment::with_prefix("SORTREE")
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()
            .and_then(Config::try_deserialize)
            .map_err(config_err)?;
        debug!(?overrides, "environment overrides");
        Ok(settings.merge_with(&overrides))
    }

    /// Resolve a tree document path against `base_dir`.
    pub fn resolve_path(&self, path: &Path) -> PathBuf {
        match &self.base_dir {
            Some(base) if path.is_relative() => base.join(path),
            _ => path.to_path_buf(),
        }
    }

    /// Render the effective settings as TOML.
    pub fn to_toml(&self) -> Result<String, ApplicationError> {
        toml::to_string_pretty(self).map_err(|e| ApplicationError::Config {
            message: format!("serialize settings: {e}"),
        })
    }
}
