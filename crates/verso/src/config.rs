//! YAML app configuration.
//!
//! ```yaml
//! views:
//!   dirs: [views, shared/views]
//!   layout: layout
//! plugins:
//!   - symbol_views
//! ```
//!
//! Relative view directories are resolved against the directory of the
//! config file when loaded with [`AppConfig::load`].

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::setup::ConfigError;

/// View settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ViewsConfig {
    /// Directories to load views from, in registration order.
    pub dirs: Vec<PathBuf>,
    /// Name of the view every rendered view is wrapped in.
    pub layout: Option<String>,
}

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
    pub views: ViewsConfig,
    /// Built-in plugins to install, by name.
    pub plugins: Vec<String>,
}

impl AppConfig {
    pub fn from_yaml_str(source: &str) -> Result<Self, ConfigError> {
        Ok(serde_yaml::from_str(source)?)
    }

    /// Reads a config file and resolves relative view directories against it.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let mut config = Self::from_yaml_str(&source)?;
        if let Some(base) = path.parent() {
            config.resolve_relative_to(base);
        }
        Ok(config)
    }

    fn resolve_relative_to(&mut self, base: &Path) {
        for dir in &mut self.views.dirs {
            if dir.is_relative() {
                *dir = base.join(&*dir);
            }
        }
    }
}
