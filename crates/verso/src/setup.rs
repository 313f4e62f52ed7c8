//! Error types for app setup.

use std::path::PathBuf;
use thiserror::Error;
use verso_dispatch::RenderError;

/// Error type for building an [`App`](crate::App).
#[derive(Debug, Error)]
pub enum SetupError {
    /// A view directory could not be registered, or a view failed to compile.
    #[error("view setup failed: {0}")]
    Views(#[from] RenderError),

    /// The configured layout is not a registered view.
    #[error("layout view not found: {0}")]
    LayoutNotFound(String),

    /// A layout was configured together with a custom renderer.
    #[error("a layout requires registry-backed views, but a custom renderer was set")]
    LayoutWithCustomRenderer,

    /// The configuration file could not be used.
    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Error type for loading [`AppConfig`](crate::AppConfig).
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config: {0}")]
    Parse(#[from] serde_yaml::Error),

    /// A plugin name that no known plugin answers to.
    #[error("unknown plugin: {0}")]
    UnknownPlugin(String),
}
