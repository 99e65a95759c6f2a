//! Tree document service
//!
//! Loads and saves trees as JSON or TOML documents. Each node is stored as
//! `id`, `data` and an ordered `children` list.

use std::path::Path;
use std::sync::Arc;

use clap::ValueEnum;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::application::{ApplicationError, ApplicationResult, IoResultExt};
use crate::domain::Tree;
use crate::infrastructure::traits::FileSystem;

/// On-disk document format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum TreeFormat {
    Json,
    Toml,
}

impl TreeFormat {
    /// Pick the format from the file extension.
    pub fn from_path(path: &Path) -> ApplicationResult<Self> {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => Ok(Self::Json),
            Some(ext) if ext.eq_ignore_ascii_case("toml") => Ok(Self::Toml),
            _ => Err(ApplicationError::UnsupportedFormat(path.to_path_buf())),
        }
    }
}

/// Service for reading and writing tree documents.
pub struct TreeStore {
    fs: Arc<dyn FileSystem>,
    pretty: bool,
}

impl TreeStore {
    /// Create a new tree store.
    pub fn new(fs: Arc<dyn FileSystem>) -> Self {
        Self { fs, pretty: true }
    }

    /// Pretty-print JSON output (TOML is always multi-line).
    pub fn with_pretty(mut self, pretty: bool) -> Self {
        self.pretty = pretty;
        self
    }

    /// Load a tree document. Duplicate ids are rejected while parsing.
    #[instrument(level = "debug", skip(self))]
    pub fn load<T: DeserializeOwned>(&self, path: &Path) -> ApplicationResult<Tree<T>> {
        let format = TreeFormat::from_path(path)?;
        let content = self
            .fs
            .read_to_string(path)
            .with_path_context("read tree document", path)?;
        let tree = Self::parse(&content, format).map_err(|message| ApplicationError::Parse {
            path: path.to_path_buf(),
            message,
        })?;
        debug!(nodes = tree.node_count(), "loaded tree");
        Ok(tree)
    }

    /// Save a tree document, creating parent directories as needed.
    #[instrument(level = "debug", skip(self, tree))]
    pub fn save<T: Serialize>(&self, path: &Path, tree: &Tree<T>) -> ApplicationResult<()> {
        let format = TreeFormat::from_path(path)?;
        let content = self.render(tree, format)?;
        self.fs
            .ensure_parent(path)
            .with_path_context("create directory for", path)?;
        self.fs
            .write(path, &content)
            .with_path_context("write tree document", path)?;
        debug!(nodes = tree.node_count(), "saved tree");
        Ok(())
    }

    /// Serialize a tree in the given format.
    pub fn render<T: Serialize>(&self, tree: &Tree<T>, format: TreeFormat) -> ApplicationResult<String> {
        let rendered = match format {
            TreeFormat::Json if self.pretty => serde_json::to_string_pretty(tree).map_err(boxed),
            TreeFormat::Json => serde_json::to_string(tree).map_err(boxed),
            TreeFormat::Toml => toml::to_string(tree).map_err(boxed),
        };
        rendered.map_err(|source| ApplicationError::OperationFailed {
            context: format!("serialize tree as {format:?}"),
            source,
        })
    }

    fn parse<T: DeserializeOwned>(content: &str, format: TreeFormat) -> Result<Tree<T>, String> {
        match format {
            TreeFormat::Json => serde_json::from_str(content).map_err(|e| e.to_string()),
            TreeFormat::Toml => toml::from_str(content).map_err(|e| e.to_string()),
        }
    }
}

fn boxed<E: std::error::Error + Send + Sync + 'static>(e: E) -> Box<dyn std::error::Error + Send + Sync> {
    Box::new(e)
}
